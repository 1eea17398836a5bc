use std::path::Path;

use console::Style;
use snaptriage_core::analyze::{sorted_by_score, HealthStatus};
use snaptriage_core::batch::{Batch, Item};
use snaptriage_core::config::TriageConfig;
use snaptriage_core::consts::PEOPLE_LABEL;
use snaptriage_core::export::ExportSummary;
use snaptriage_core::payload::ImagePayload;
use snaptriage_core::reduce::{ReduceParams, Reduction};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    ok: Style,
    error: Style,
    highlight: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            error: Style::new().red(),
            highlight: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

fn rule(len: usize) -> String {
    "\u{2550}".repeat(len)
}

fn kib(bytes: usize) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

pub fn print_run_header(config: &TriageConfig, files: usize, threshold: f32) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("SnapTriage"));
    println!("  {}", s.title.apply_to(rule(10)));
    println!();
    println!("  {:<14}{}", s.label.apply_to("Service"), s.path.apply_to(&config.api_url));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Files"),
        s.value.apply_to(format!("{files} (limit {})", config.max_files))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Budget"),
        s.value.apply_to(kib(config.reduce.byte_budget))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(format!("{threshold:.0}% {PEOPLE_LABEL}"))
    );
    println!();
}

pub fn print_health(api_url: &str, status: &HealthStatus) {
    let s = Styles::new();
    let style = match status {
        HealthStatus::Checking => &s.label,
        HealthStatus::Ok(_) => &s.ok,
        HealthStatus::Unavailable => &s.error,
    };
    println!("  {:<14}{}  {}", s.label.apply_to("Health"), style.apply_to(status), s.label.apply_to(api_url));
}

fn print_item(s: &Styles, position: usize, item: &Item) {
    let status_style = if item.error().is_some() { &s.error } else { &s.ok };
    println!(
        "  {:>2}. {:<32}{}",
        position,
        s.value.apply_to(item.name()),
        status_style.apply_to(item.status_text())
    );
    for entry in sorted_by_score(item.scores()) {
        let style = if entry.label == PEOPLE_LABEL { &s.highlight } else { &s.label };
        println!("        {:<20}{:>7}", style.apply_to(&entry.label), entry.percent_label());
    }
}

pub fn print_batch_results(batch: &Batch) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Results"));
    println!("  {}", s.title.apply_to(rule(7)));
    for (index, item) in batch.items().iter().enumerate() {
        print_item(&s, index + 1, item);
    }
    println!();
    println!(
        "  {:<14}{} ({})",
        s.label.apply_to("Progress"),
        s.value.apply_to(batch.progress()),
        batch.progress().label()
    );
}

pub fn print_threshold(threshold: f32, selected: &[&Item], completed: usize) {
    let s = Styles::new();
    println!(
        "  {:<14}{} of {} completed images at or above {:.0}% {}",
        s.label.apply_to("Matches"),
        s.highlight.apply_to(selected.len()),
        completed,
        threshold,
        PEOPLE_LABEL
    );
    for item in selected {
        println!("      {}", item.name());
    }
}

pub fn print_export(summary: &ExportSummary) {
    let s = Styles::new();
    println!();
    println!(
        "  {:<14}{} ({} file(s), {})",
        s.label.apply_to("Archive"),
        s.path.apply_to(summary.path.display()),
        summary.entries.len(),
        kib(summary.bytes as usize)
    );
}

pub fn print_reduction(source: &ImagePayload, reduction: &Reduction, params: &ReduceParams, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Reduce"));
    println!("  {}", s.title.apply_to(rule(6)));
    println!(
        "  {:<14}{} ({}, {})",
        s.label.apply_to("Input"),
        s.path.apply_to(source.name()),
        source.media_type(),
        kib(source.len())
    );

    match reduction.step {
        Some(step) => {
            println!(
                "  {:<14}{} at {:.0}% scale, quality {}",
                s.label.apply_to("Encoded"),
                s.value.apply_to(reduction.image.media_type()),
                step.scale * 100.0,
                step.quality
            );
            println!(
                "  {:<14}{}",
                s.label.apply_to("Attempts"),
                s.value.apply_to(reduction.attempts)
            );
        }
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Encoded"),
            s.label.apply_to("unchanged (not a decodable image)")
        ),
    }

    let budget_style = if reduction.within_budget { &s.ok } else { &s.error };
    println!(
        "  {:<14}{} / {}",
        s.label.apply_to("Size"),
        budget_style.apply_to(kib(reduction.image.len())),
        kib(params.byte_budget)
    );
    println!("  {:<14}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!();
}
