pub mod analyze;
pub mod batch;
pub mod config;
pub mod consts;
pub mod error;
pub mod export;
pub mod io;
pub mod payload;
pub mod reduce;

pub use error::{Result, TriageError};
