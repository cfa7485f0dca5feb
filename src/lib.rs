//! Logistics Semaphore Library
//!
//! Traffic-light classification of logistics records. Two worksheets come
//! in as untyped text (the logistics log and the pending-orders sheet); out
//! comes an ordered set of records, each with its operational stage and a
//! severity tier, plus per-tier and per-stage counts.
//!
//! This library provides tools for:
//! - Normalizing identifiers and parsing day-first dates and `H:MM:SS` durations
//! - Classifying a record's stage and tiering it against configurable thresholds
//! - Joining against pending orders and applying per-view completeness filters
//! - Re-running the pipeline over live sources with stale results discarded
//! - A stopwatch state machine kept apart from the read-only pipeline

pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod source;
pub mod table;
pub mod timer;

pub use config::{ColumnMapping, ColumnProfile, PipelineConfig};
pub use error::{Result, SemaforoError};
pub use models::{
    CellValue, ClassifiedRecord, DateValue, PipelineOutput, Record, Severity, Stage, Summary, View,
};
pub use pipeline::Pipeline;
pub use runner::PipelineRunner;
pub use source::{CsvTableSource, MemoryTableSource, TableSource};
pub use table::RawTable;
