//! Pass-by-pass behaviour of the pipeline

use super::{PrimaryRow, pending_table, primary_table};
use crate::config::{ColumnMapping, PipelineConfig};
use crate::constants::PRIMARY_TABLE_NAME;
use crate::error::SemaforoError;
use crate::models::{ReleaseStatus, Severity, Stage, View};
use crate::pipeline::Pipeline;
use crate::table::RawTable;

fn mixed_rows() -> Vec<PrimaryRow> {
    vec![
        PrimaryRow {
            fulfillment_duration: "1:00:00",
            release_status: "Liberado",
            ..PrimaryRow::new("R1", "P1")
        },
        PrimaryRow {
            fulfillment_duration: "5:00:00",
            ..PrimaryRow::new("R2", "P2")
        },
        PrimaryRow {
            fulfillment_duration: "x",
            ..PrimaryRow::new("R3", "P3")
        },
        PrimaryRow {
            fulfillment_duration: "2:50:00",
            ..PrimaryRow::new("R4", "P4")
        },
        PrimaryRow {
            fulfillment_duration: "4:00:00",
            ..PrimaryRow::new("R5", "P5")
        },
    ]
}

fn all_pending() -> RawTable {
    pending_table(&[
        ("P1", "EMBARQUES"),
        ("P2", "EMBARQUES"),
        ("P3", "EMBARQUES"),
        ("P4", "EMBARQUES"),
        ("P5", "EMBARQUES"),
    ])
}

fn ids(output: &crate::models::PipelineOutput) -> Vec<&str> {
    output
        .records
        .iter()
        .map(|r| r.record.remision.as_str())
        .collect()
}

#[test]
fn test_output_is_ordered_by_severity() {
    let output = Pipeline::default()
        .run(View::Invoicing, &primary_table(&mixed_rows()), &all_pending())
        .unwrap();

    assert_eq!(ids(&output), ["R2", "R5", "R4", "R1", "R3"]);
    let tiers: Vec<_> = output.records.iter().map(|r| r.severity).collect();
    assert_eq!(
        tiers,
        [
            Severity::Late,
            Severity::Late,
            Severity::Warning,
            Severity::OnTime,
            Severity::Unknown
        ]
    );
    assert_eq!(output.summary.total, 5);
    assert_eq!(output.summary.release_count(ReleaseStatus::Released), 1);
}

#[test]
fn test_rerun_is_identical() {
    let pipeline = Pipeline::default();
    let primary = primary_table(&mixed_rows());
    let secondary = all_pending();

    let first = pipeline.run(View::Invoicing, &primary, &secondary).unwrap();
    let second = pipeline.run(View::Invoicing, &primary, &secondary).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_only_blank_ids_are_dropped() {
    let rows = vec![
        PrimaryRow::new("R1", "P1"),
        PrimaryRow::new("", "P2"),
        PrimaryRow::new("  \u{200b} ", "P3"),
        PrimaryRow::new("N/A", "P4"),
    ];
    let output = Pipeline::default()
        .run(View::Invoicing, &primary_table(&rows), &all_pending())
        .unwrap();

    // A literal "N/A" remision is not blank and stays in the working set
    assert_eq!(ids(&output), ["R1", "N/A"]);
    assert_eq!(output.stats.input_rows, 4);
    assert_eq!(output.stats.blank_id_dropped, 2);
    assert_eq!(output.stats.classified, 2);
}

#[test]
fn test_garbage_time_of_day_does_not_abort_the_pass() {
    let rows = vec![
        PrimaryRow {
            invoicing_date: "10/06/2025",
            fulfillment_date: "10/06/2025",
            invoicing_time: "3000000000:00",
            ..PrimaryRow::new("R1", "P1")
        },
        PrimaryRow {
            invoicing_date: "10/06/2025",
            fulfillment_date: "10/06/2025",
            invoicing_time: "3:00",
            ..PrimaryRow::new("R2", "P2")
        },
    ];
    let output = Pipeline::default()
        .run(View::All, &primary_table(&rows), &all_pending())
        .unwrap();

    let r1 = output.records.iter().find(|r| r.record.remision == "R1").unwrap();
    assert_eq!(r1.stage, Stage::Invoicing);
    // Unparseable time of day counts as midnight: a zero gap
    assert_eq!(r1.severity, Severity::OnTime);

    let r2 = output.records.iter().find(|r| r.record.remision == "R2").unwrap();
    assert_eq!(r2.stage, Stage::Invoicing);
    assert_eq!(r2.severity, Severity::Warning);
}

#[test]
fn test_order_ids_are_normalized_before_join() {
    let rows = vec![PrimaryRow::new("R1", " P1\u{a0}")];
    let output = Pipeline::default()
        .run(
            View::Invoicing,
            &primary_table(&rows),
            &pending_table(&[("\u{feff}P1 ", "EMBARQUES")]),
        )
        .unwrap();

    assert_eq!(ids(&output), ["R1"]);
}

#[test]
fn test_completeness_filter_drops_progressed_records() {
    let rows = vec![
        PrimaryRow::new("R1", "P1"),
        PrimaryRow {
            invoice_number: "F-001",
            ..PrimaryRow::new("R2", "P2")
        },
        PrimaryRow {
            invoicing_date: "10/06/2025",
            ..PrimaryRow::new("R3", "P3")
        },
        PrimaryRow {
            delivery_date: "pendiente",
            ..PrimaryRow::new("R4", "P4")
        },
        PrimaryRow {
            invoice_number: "n/a",
            delivery_date: "N/A",
            ..PrimaryRow::new("R5", "P5")
        },
    ];
    let output = Pipeline::default()
        .run(View::Invoicing, &primary_table(&rows), &all_pending())
        .unwrap();

    assert_eq!(ids(&output), ["R1", "R5"]);
    assert_eq!(output.stats.filter_dropped, 3);
}

#[test]
fn test_fulfillment_view_skips_join() {
    let rows = vec![
        PrimaryRow::new("R1", "P1"),
        PrimaryRow {
            fulfillment_date: "10/06/2025",
            ..PrimaryRow::new("R2", "P9")
        },
        PrimaryRow::new("R3", "P9"),
    ];
    let output = Pipeline::default()
        .run(View::Fulfillment, &primary_table(&rows), &pending_table(&[]))
        .unwrap();

    assert_eq!(ids(&output), ["R1", "R3"]);
    assert_eq!(output.stats.join_dropped, 0);
    assert!(output.records.iter().all(|r| r.stage == Stage::Fulfillment));
}

#[test]
fn test_shipping_view_tiers_by_delay_count() {
    let rows = vec![
        PrimaryRow {
            service_time: "2:00:00",
            delay: "0",
            ..PrimaryRow::new("R1", "P1")
        },
        PrimaryRow {
            service_time: "2:00:00",
            delay: "2",
            ..PrimaryRow::new("R2", "P2")
        },
        PrimaryRow {
            service_time: "2:00:00",
            delay: "1",
            ..PrimaryRow::new("R3", "P3")
        },
        PrimaryRow {
            delay: "5",
            ..PrimaryRow::new("R4", "P4")
        },
        PrimaryRow {
            service_time: "2:00:00",
            delivery_date: "11/06/2025",
            ..PrimaryRow::new("R5", "P5")
        },
    ];
    let output = Pipeline::default()
        .run(View::Shipping, &primary_table(&rows), &pending_table(&[]))
        .unwrap();

    assert_eq!(ids(&output), ["R2", "R3", "R1"]);
    assert_eq!(output.records[1].severity, Severity::Warning);
}

#[test]
fn test_all_view_reports_every_stage() {
    let rows = vec![
        PrimaryRow {
            invoicing_date: "10/06/2025",
            delivery_date: "11/06/2025",
            fulfillment_date: "09/06/2025",
            invoicing_time: "2:00",
            ..PrimaryRow::new("R1", "P1")
        },
        PrimaryRow {
            invoicing_date: "10/06/2025",
            fulfillment_date: "10/06/2025",
            invoicing_time: "5:00",
            ..PrimaryRow::new("R2", "P2")
        },
        PrimaryRow {
            delivery_date: "11/06/2025",
            shipping_duration: "20:00:00",
            ..PrimaryRow::new("R3", "P3")
        },
        PrimaryRow {
            fulfillment_duration: "1:00:00",
            ..PrimaryRow::new("R4", "P4")
        },
    ];
    let output = Pipeline::default()
        .run(View::All, &primary_table(&rows), &all_pending())
        .unwrap();

    for stage in Stage::ALL {
        assert_eq!(output.summary.stage_count(stage), 1, "{stage}");
    }
    let r1 = output.records.iter().find(|r| r.record.remision == "R1").unwrap();
    assert_eq!(r1.stage, Stage::Done);
    // 24h + 2h from fulfillment day to invoice
    assert_eq!(r1.severity, Severity::Late);
    let r2 = output.records.iter().find(|r| r.record.remision == "R2").unwrap();
    assert_eq!(r2.stage, Stage::Invoicing);
    assert_eq!(r2.severity, Severity::Warning);
}

#[test]
fn test_overview_covers_every_view() {
    let overview = Pipeline::default()
        .overview(&primary_table(&mixed_rows()), &all_pending())
        .unwrap();

    let views: Vec<_> = overview.iter().map(|o| o.view).collect();
    assert_eq!(views, View::ALL);
    let all = overview.iter().find(|o| o.view == View::All).unwrap();
    assert_eq!(all.summary.total, 5);
}

#[test]
fn test_missing_join_key_is_fatal() {
    let secondary = RawTable::new(
        "Ped Pendientes",
        vec!["Pedido".into(), "Estatus operativo".into()],
        vec![vec!["P1".into(), "EMBARQUES".into()]],
    );
    let result = Pipeline::default().run(View::Invoicing, &primary_table(&mixed_rows()), &secondary);
    assert!(matches!(result, Err(SemaforoError::MissingColumn { .. })));
}

#[test]
fn test_missing_display_column_is_fatal() {
    let primary = RawTable::new(
        PRIMARY_TABLE_NAME,
        vec!["no. pedido".into()],
        vec![vec!["P1".into()]],
    );
    match Pipeline::default().run(View::Fulfillment, &primary, &all_pending()) {
        Err(SemaforoError::MissingColumn { table, column }) => {
            assert_eq!(table, PRIMARY_TABLE_NAME);
            assert_eq!(column, "Remision");
        }
        other => panic!("Expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_missing_optional_column_degrades_to_unknown() {
    let primary = RawTable::new(
        PRIMARY_TABLE_NAME,
        vec!["Remision".into(), "no. pedido".into()],
        vec![vec!["R1".into(), "P1".into()]],
    );
    let output = Pipeline::default()
        .run(View::Invoicing, &primary, &all_pending())
        .unwrap();

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].stage, Stage::Fulfillment);
    assert_eq!(output.records[0].severity, Severity::Unknown);
}

#[test]
fn test_legacy_column_profile() {
    let primary = RawTable::new(
        PRIMARY_TABLE_NAME,
        vec!["Remision".into(), "Pedido".into(), "Tiempo surtimiento".into()],
        vec![vec!["R1".into(), "P1".into(), "0:30:00".into()]],
    );
    let secondary = RawTable::new(
        "Ped Pendientes",
        vec!["Pedido".into(), "Estatus operativo".into()],
        vec![vec!["P1".into(), "EMBARQUES".into()]],
    );
    let pipeline =
        Pipeline::new(PipelineConfig::default().with_columns(ColumnMapping::legacy()));
    let output = pipeline.run(View::Invoicing, &primary, &secondary).unwrap();

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].severity, Severity::OnTime);
}
