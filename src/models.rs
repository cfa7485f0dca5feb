//! Core data structures and types for record classification.
//!
//! Defines the typed cell values produced by the parser layer, the record
//! built from one spreadsheet row, the stage/severity/release enums and the
//! classified output handed to the rendering side.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A calendar date as written in the sheets: one day, or a `start - end` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Single(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl DateValue {
    /// The date a single-day value stands for; ranges have no single day
    pub fn single(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Single(date) => Some(*date),
            DateValue::Range(..) => None,
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Single(date) => write!(f, "{}", date.format("%d/%m/%Y")),
            DateValue::Range(start, end) => {
                write!(f, "{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
            }
        }
    }
}

/// A spreadsheet cell after it went through the parser layer exactly once
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank, whitespace-only or the "N/A" placeholder
    Absent,
    /// Free text kept as-is (normalized)
    RawText(String),
    ParsedDate(DateValue),
    ParsedDuration(TimeDelta),
    ParsedNumber(f64),
    /// Non-empty text that failed to parse; the original text is kept for display
    Invalid(String),
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// True for any non-absent cell, including unparseable text
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            CellValue::ParsedDate(date) => Some(date),
            _ => None,
        }
    }

    pub fn is_valid_date(&self) -> bool {
        self.as_date().is_some()
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            CellValue::ParsedDuration(duration) => Some(*duration),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::ParsedNumber(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::RawText(text) | CellValue::Invalid(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::RawText(text) | CellValue::Invalid(text) => f.write_str(text),
            CellValue::ParsedDate(date) => write!(f, "{date}"),
            CellValue::ParsedDuration(duration) => f.write_str(&format_duration(*duration)),
            CellValue::ParsedNumber(value) => write!(f, "{value}"),
        }
    }
}

/// Format a duration as `H:MM:SS`, hours unbounded, sign kept for negative gaps
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Operational stage a record currently occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Fulfillment,
    Shipping,
    Invoicing,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Fulfillment,
        Stage::Shipping,
        Stage::Invoicing,
        Stage::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Fulfillment => "Fulfillment",
            Stage::Shipping => "Shipping",
            Stage::Invoicing => "Invoicing",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Semaphore tier. Declaration order is the display precedence: Late sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Late,
    Warning,
    OnTime,
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Late,
        Severity::Warning,
        Severity::OnTime,
        Severity::Unknown,
    ];

    /// Fixed sort precedence: Late(0) < Warning(1) < On-Time(2) < Unknown(3)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Late => 0,
            Severity::Warning => 1,
            Severity::OnTime => 2,
            Severity::Unknown => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Late => "Late",
            Severity::Warning => "Warning",
            Severity::OnTime => "On-Time",
            Severity::Unknown => "Unknown",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Late => "🔴",
            Severity::Warning => "🟡",
            Severity::OnTime => "🟢",
            Severity::Unknown => "⚪",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Logistics release flag ("Liberacion")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ReleaseStatus {
    Released,
    Stopped,
    #[default]
    Pending,
}

impl ReleaseStatus {
    /// Case-insensitive mapping of the free-text column; anything unrecognized is pending
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "liberado" => ReleaseStatus::Released,
            "detenido" => ReleaseStatus::Stopped,
            _ => ReleaseStatus::Pending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReleaseStatus::Released => "Released",
            ReleaseStatus::Stopped => "Stopped",
            ReleaseStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dashboard view selecting the completeness filter, join and severity basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Fulfillment,
    Shipping,
    Invoicing,
    All,
}

impl View {
    pub const ALL: [View; 4] = [View::Fulfillment, View::Shipping, View::Invoicing, View::All];

    pub fn name(&self) -> &'static str {
        match self {
            View::Fulfillment => "fulfillment",
            View::Shipping => "shipping",
            View::Invoicing => "invoicing",
            View::All => "all",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fulfillment" | "surtimiento" => Ok(View::Fulfillment),
            "shipping" | "embarques" => Ok(View::Shipping),
            "invoicing" | "facturacion" => Ok(View::Invoicing),
            "all" | "global" => Ok(View::All),
            other => Err(format!(
                "unknown view '{other}' (expected fulfillment, shipping, invoicing or all)"
            )),
        }
    }
}

/// One row of the primary log, typed
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Zero-based data row index in the source table (header excluded)
    pub row_index: usize,
    pub remision: String,
    pub order_id: String,
    pub client: String,
    /// `None` when blank or the "N/A" placeholder
    pub invoice_number: Option<String>,
    pub elaboration_date: CellValue,
    pub delivery_date: CellValue,
    pub invoicing_date: CellValue,
    /// Time of day the invoice was issued
    pub invoicing_time: CellValue,
    pub fulfillment_date: CellValue,
    pub shipment_date: CellValue,
    pub fulfillment_duration: CellValue,
    pub shipping_duration: CellValue,
    pub service_time: CellValue,
    pub delay: CellValue,
    pub release_status: ReleaseStatus,
    /// Filled from the pending-orders table when the record went through the join
    pub operational_status: Option<String>,
}

impl Record {
    /// Empty record carrying only identifiers; every other field absent
    pub fn new(row_index: usize, remision: impl Into<String>, order_id: impl Into<String>) -> Self {
        Self {
            row_index,
            remision: remision.into(),
            order_id: order_id.into(),
            client: String::new(),
            invoice_number: None,
            elaboration_date: CellValue::Absent,
            delivery_date: CellValue::Absent,
            invoicing_date: CellValue::Absent,
            invoicing_time: CellValue::Absent,
            fulfillment_date: CellValue::Absent,
            shipment_date: CellValue::Absent,
            fulfillment_duration: CellValue::Absent,
            shipping_duration: CellValue::Absent,
            service_time: CellValue::Absent,
            delay: CellValue::Absent,
            release_status: ReleaseStatus::Pending,
            operational_status: None,
        }
    }
}

/// Which quantity a severity tier was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    FulfillmentDuration,
    ShippingDuration,
    InvoiceGap,
    DelayCount,
}

impl MetricKind {
    pub fn is_duration(&self) -> bool {
        !matches!(self, MetricKind::DelayCount)
    }
}

/// Metric value in seconds for durations, unitless for the delay count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub kind: MetricKind,
    pub value: f64,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_duration() {
            f.write_str(&format_duration(TimeDelta::seconds(self.value as i64)))
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// A record with its derived stage and severity
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub record: Record,
    pub stage: Stage,
    pub severity: Severity,
    /// `None` when the metric was absent or unparseable (severity is then Unknown)
    pub metric: Option<Metric>,
}

/// Frequency counts over the post-filter working set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_stage: BTreeMap<Stage, usize>,
    pub by_release: BTreeMap<ReleaseStatus, usize>,
}

impl Summary {
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn stage_count(&self, stage: Stage) -> usize {
        self.by_stage.get(&stage).copied().unwrap_or(0)
    }

    pub fn release_count(&self, status: ReleaseStatus) -> usize {
        self.by_release.get(&status).copied().unwrap_or(0)
    }
}

/// Row accounting for one pipeline pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub input_rows: usize,
    pub blank_id_dropped: usize,
    pub join_dropped: usize,
    pub status_dropped: usize,
    pub filter_dropped: usize,
    pub classified: usize,
}

impl PipelineStats {
    pub fn summary(&self) -> String {
        format!(
            "{} rows -> {} classified | blank id: {} | no pending order: {} | status: {} | filter: {}",
            self.input_rows,
            self.classified,
            self.blank_id_dropped,
            self.join_dropped,
            self.status_dropped,
            self.filter_dropped
        )
    }
}

/// Complete, ordered result of one pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub view: View,
    pub records: Vec<ClassifiedRecord>,
    pub summary: Summary,
    pub stats: PipelineStats,
}
