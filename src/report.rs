//! Terminal rendering of classification results
//!
//! Builds the text the commands print: tier and stage counts, the tile grid
//! of display ids, and the per-view overview.

use crate::constants::GRID_TILES_PER_ROW;
use crate::models::{ClassifiedRecord, PipelineOutput, ReleaseStatus, Severity, Stage};
use crate::pipeline::ViewOverview;
use colored::*;
use std::fmt::Write;

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Late => text.bright_red().bold(),
        Severity::Warning => text.bright_yellow().bold(),
        Severity::OnTime => text.bright_green(),
        Severity::Unknown => text.bright_black(),
    }
}

/// Per-tier, per-stage and per-release counts
pub fn render_summary(output: &PipelineOutput) -> String {
    let summary = &output.summary;
    let mut text = String::new();

    let _ = writeln!(
        text,
        "\n{} {}",
        "View:".bright_cyan(),
        output.view.name().bright_white().bold()
    );
    let _ = writeln!(
        text,
        "  {} {}",
        "Records:".bright_cyan(),
        summary.total.to_string().bright_white().bold()
    );

    let _ = writeln!(text, "\n{}", "By severity".bright_green().bold());
    for severity in Severity::ALL {
        let _ = writeln!(
            text,
            "  {} {:<10} {}",
            severity.symbol(),
            paint(severity.label(), severity),
            summary.severity_count(severity)
        );
    }

    let _ = writeln!(text, "\n{}", "By stage".bright_green().bold());
    for stage in Stage::ALL {
        let _ = writeln!(
            text,
            "  {:<12} {}",
            stage.label().bright_cyan(),
            summary.stage_count(stage)
        );
    }

    let _ = writeln!(text, "\n{}", "By release".bright_green().bold());
    for status in [
        ReleaseStatus::Released,
        ReleaseStatus::Stopped,
        ReleaseStatus::Pending,
    ] {
        let _ = writeln!(
            text,
            "  {:<12} {}",
            status.label().bright_cyan(),
            summary.release_count(status)
        );
    }

    text
}

/// Display ids as colored tiles in severity order
pub fn render_grid(records: &[ClassifiedRecord]) -> String {
    let mut text = String::new();
    for row in records.chunks(GRID_TILES_PER_ROW) {
        let tiles: Vec<String> = row
            .iter()
            .map(|record| paint(&record.record.remision, record.severity).to_string())
            .collect();
        let _ = writeln!(text, "{}", tiles.join(" "));
    }
    text
}

/// One line per classified record with its stage, tier and metric
pub fn render_detail(records: &[ClassifiedRecord]) -> String {
    let mut text = String::new();
    for record in records {
        let metric = record
            .metric
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            text,
            "{} {:<12} {:<12} {:<12} {:>10}  {}",
            record.severity.symbol(),
            record.record.remision.bright_white(),
            record.record.order_id,
            record.stage.label(),
            metric,
            record.record.client
        );
    }
    text
}

/// Totals per view, the global dashboard
pub fn render_overview(overview: &[ViewOverview]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "\n{}", "Overview".bright_green().bold());
    let _ = writeln!(
        text,
        "  {:<12} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "view", "total", "late", "warn", "ok", "unknown"
    );
    for entry in overview {
        let summary = &entry.summary;
        let _ = writeln!(
            text,
            "  {:<12} {:>7} {:>7} {:>7} {:>7} {:>7}",
            entry.view.name().bright_cyan(),
            summary.total,
            summary.severity_count(Severity::Late).to_string().bright_red(),
            summary
                .severity_count(Severity::Warning)
                .to_string()
                .bright_yellow(),
            summary.severity_count(Severity::OnTime).to_string().bright_green(),
            summary.severity_count(Severity::Unknown),
        );
    }
    text
}
