mod common;

use std::io::{Cursor, Read};
use std::sync::Arc;

use approx::assert_relative_eq;
use common::*;
use snaptriage_core::analyze::ScoreEntry;
use snaptriage_core::batch::{BatchRef, Item, TriageController};
use snaptriage_core::export::{
    build_archive, export_archive, scores_meet_threshold, select_by_threshold, threshold_fraction,
    unique_entry_names, write_archive,
};
use snaptriage_core::payload::ImagePayload;

fn read_archive(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

/// Run `payloads` through a controller whose analyzer scores each name as
/// given in `scores`.
async fn analyzed(payloads: Vec<ImagePayload>, scores: &[(&str, Scripted)]) -> BatchRef {
    let mut analyzer = FakeAnalyzer::new();
    for (name, response) in scores {
        analyzer = analyzer.with(name, response.clone());
    }
    let controller = TriageController::new(Arc::new(analyzer))
        .unwrap()
        .with_reducer(Arc::new(TaggingReducer));
    let (batch, _) = controller.process(payloads).await.unwrap();
    batch
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

#[test]
fn test_threshold_fraction() {
    assert_relative_eq!(threshold_fraction(68.0), 0.68);
    assert_relative_eq!(threshold_fraction(0.0), 0.0);
    assert_relative_eq!(threshold_fraction(150.0), 1.0);
    assert_relative_eq!(threshold_fraction(-5.0), 0.0);
    assert_relative_eq!(threshold_fraction(f32::NAN), 0.0);
}

#[test]
fn test_scores_meet_threshold() {
    let scores = vec![ScoreEntry::new("people", 0.7), ScoreEntry::new("food", 0.3)];
    assert!(scores_meet_threshold(&scores, 0.68, "people"));
    assert!(scores_meet_threshold(&scores, 0.7, "people"));
    assert!(!scores_meet_threshold(&scores, 0.71, "people"));
}

#[test]
fn test_missing_label_never_qualifies() {
    let scores = vec![ScoreEntry::new("food", 0.99)];
    assert!(!scores_meet_threshold(&scores, 0.0, "people"));
    assert!(!scores_meet_threshold(&[], 0.0, "people"));
}

#[test]
fn test_unfinished_items_never_qualify() {
    let item = Item::new(0, opaque_image("queued.jpg"));
    assert!(select_by_threshold([&item], 0.0).is_empty());
}

#[tokio::test]
async fn test_select_by_threshold() {
    let batch = analyzed(
        images(&["high.jpg", "edge.jpg", "low.jpg", "none.jpg", "failed.jpg"]),
        &[
            ("high.jpg", Scripted::Scores(people(0.9))),
            ("edge.jpg", Scripted::Scores(people(0.68))),
            ("low.jpg", Scripted::Scores(people(0.2))),
            ("none.jpg", Scripted::Scores(vec![ScoreEntry::new("cat", 1.0)])),
            ("failed.jpg", Scripted::Fail("boom".into())),
        ],
    )
    .await;
    let batch = batch.lock().await;

    let names = |percent: f32| -> Vec<String> {
        select_by_threshold(batch.completed_items(), percent)
            .iter()
            .map(|item| item.name().to_string())
            .collect()
    };
    assert_eq!(names(68.0), vec!["high.jpg", "edge.jpg"]);
    assert_eq!(names(95.0), Vec::<String>::new());
    assert_eq!(names(0.0), vec!["high.jpg", "edge.jpg", "low.jpg"]);
}

fn images(names: &[&str]) -> Vec<ImagePayload> {
    names.iter().map(|n| opaque_image(n)).collect()
}

// ---------------------------------------------------------------------------
// Entry names
// ---------------------------------------------------------------------------

#[test]
fn test_unique_names_keep_distinct_names() {
    let names = unique_entry_names([Some("a.jpg"), Some("b.jpg")]);
    assert_eq!(names, vec!["a.jpg", "b.jpg"]);
}

#[test]
fn test_duplicate_names_get_position_suffix() {
    let names = unique_entry_names([Some("IMG.jpg"), Some("IMG.jpg"), Some("x.png"), Some("IMG.jpg")]);
    assert_eq!(names, vec!["IMG.jpg", "IMG_2.jpg", "x.png", "IMG_4.jpg"]);
}

#[test]
fn test_duplicate_without_extension() {
    let names = unique_entry_names([Some("scan"), Some("scan")]);
    assert_eq!(names, vec!["scan", "scan_2"]);
}

#[test]
fn test_missing_names_are_generated() {
    let names = unique_entry_names([None, Some(""), Some("a.jpg")]);
    assert_eq!(names, vec!["image_1.jpg", "image_2.jpg", "a.jpg"]);
}

#[test]
fn test_suffix_collision_is_resolved() {
    let names = unique_entry_names([Some("a.jpg"), Some("a_3.jpg"), Some("a.jpg")]);
    assert_eq!(names, vec!["a.jpg", "a_3.jpg", "a_3_2.jpg"]);
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[test]
fn test_write_archive_round_trip() {
    let entries = vec![
        ("one.jpg".to_string(), b"first".as_slice()),
        ("two.png".to_string(), b"second".as_slice()),
    ];
    let cursor = write_archive(Cursor::new(Vec::new()), &entries).unwrap();
    let read = read_archive(&cursor.into_inner());
    assert_eq!(
        read,
        vec![
            ("one.jpg".to_string(), b"first".to_vec()),
            ("two.png".to_string(), b"second".to_vec()),
        ]
    );
}

#[tokio::test]
async fn test_archive_holds_originals_of_qualifying_items() {
    let batch = analyzed(
        images(&["IMG.jpg", "IMG.jpg", "IMG.jpg"]),
        &[("IMG.jpg", Scripted::Scores(people(0.9)))],
    )
    .await;
    let batch = batch.lock().await;
    let selected = select_by_threshold(batch.completed_items(), 68.0);
    assert_eq!(selected.len(), 3);

    let (names, bytes) = build_archive(&selected).unwrap();
    assert_eq!(names, vec!["IMG.jpg", "IMG_2.jpg", "IMG_3.jpg"]);

    let read = read_archive(&bytes);
    assert_eq!(read.len(), 3);
    for ((_, data), item) in read.iter().zip(&selected) {
        // Originals, not the reduced copies.
        assert_eq!(data.as_slice(), item.source().bytes());
        assert_ne!(Some(data.as_slice()), item.reduced().map(|r| r.bytes()));
    }
}

#[tokio::test]
async fn test_export_archive_writes_file() {
    let batch = analyzed(
        images(&["a.jpg", "b.jpg"]),
        &[
            ("a.jpg", Scripted::Scores(people(0.9))),
            ("b.jpg", Scripted::Scores(people(0.1))),
        ],
    )
    .await;
    let batch = batch.lock().await;
    let selected = select_by_threshold(batch.completed_items(), 68.0);

    let dir = tempfile::tempdir().unwrap();
    let summary = export_archive(&selected, dir.path()).unwrap();

    assert_eq!(summary.path, dir.path().join("people_threshold.zip"));
    assert_eq!(summary.entries, vec!["a.jpg"]);
    let written = std::fs::read(&summary.path).unwrap();
    assert_eq!(written.len() as u64, summary.bytes);
    assert_eq!(read_archive(&written)[0].0, "a.jpg");
}

#[test]
fn test_export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = export_archive(&[], &missing).unwrap_err();
    assert!(matches!(err, snaptriage_core::TriageError::ArchiveFailed(_)));
    assert!(!missing.join("people_threshold.zip").exists());
}
