//! Per-record fulfillment stopwatch
//!
//! The stopwatch is kept apart from classification. It is rebuilt from
//! three persisted text fields (start, pause, total), advanced by explicit
//! transitions, and reports the field writes a transition implies. Whether
//! those writes reach the worksheet is up to the caller; nothing in the
//! classification pipeline calls into this module.

use crate::classify::normalize::normalize;
use crate::classify::parse::{parse_duration, parse_timestamp};
use crate::classify::validity::is_present_with;
use crate::config::PipelineConfig;
use crate::constants::TIMESTAMP_FORMAT;
use crate::error::{Result, SemaforoError};
use crate::models::format_duration;
use crate::table::RawTable;
use chrono::{NaiveDateTime, TimeDelta};
use std::fmt;
use tracing::warn;

/// Stopwatch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stopwatch {
    #[default]
    NotStarted,
    Running {
        started_at: NaiveDateTime,
        /// Time banked before `started_at`
        accumulated: TimeDelta,
    },
    /// Terminal
    Completed {
        paused_at: NaiveDateTime,
        total: TimeDelta,
    },
}

/// Persisted stopwatch field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerField {
    Start,
    Pause,
    Total,
}

/// One field write implied by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerWrite {
    pub field: TimerField,
    pub value: String,
}

impl TimerWrite {
    fn timestamp(field: TimerField, at: NaiveDateTime) -> Self {
        Self {
            field,
            value: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    fn total(total: TimeDelta) -> Self {
        Self {
            field: TimerField::Total,
            value: format_duration(total),
        }
    }
}

impl Stopwatch {
    /// Rebuild state from the persisted text fields
    ///
    /// A parseable pause timestamp means completed. Otherwise a parseable
    /// start means running. Unparseable fields count as empty and an
    /// unparseable total as zero.
    pub fn from_fields(start: Option<&str>, pause: Option<&str>, total: Option<&str>) -> Self {
        let started_at = start.and_then(parse_timestamp);
        let paused_at = pause.and_then(parse_timestamp);
        let total = total.and_then(parse_duration).unwrap_or_default();

        match (started_at, paused_at) {
            (_, Some(paused_at)) => Stopwatch::Completed { paused_at, total },
            (Some(started_at), None) => Stopwatch::Running {
                started_at,
                accumulated: total,
            },
            (None, None) => Stopwatch::NotStarted,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Stopwatch::Running { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Stopwatch::Completed { .. })
    }

    /// NotStarted -> Running
    pub fn start(&mut self, now: NaiveDateTime) -> Result<Vec<TimerWrite>> {
        match self {
            Stopwatch::NotStarted => {
                *self = Stopwatch::Running {
                    started_at: now,
                    accumulated: TimeDelta::zero(),
                };
                Ok(vec![
                    TimerWrite::timestamp(TimerField::Start, now),
                    TimerWrite::total(TimeDelta::zero()),
                ])
            }
            Stopwatch::Running { .. } => Err(SemaforoError::InvalidTimerTransition {
                reason: "stopwatch is already running".to_string(),
            }),
            Stopwatch::Completed { .. } => Err(SemaforoError::InvalidTimerTransition {
                reason: "stopwatch has already completed".to_string(),
            }),
        }
    }

    /// Running -> Completed, banking the running time
    pub fn complete(&mut self, now: NaiveDateTime) -> Result<Vec<TimerWrite>> {
        match *self {
            Stopwatch::Running {
                started_at,
                accumulated,
            } => {
                let total = running_total(started_at, accumulated, now);
                *self = Stopwatch::Completed {
                    paused_at: now,
                    total,
                };
                Ok(vec![
                    TimerWrite::timestamp(TimerField::Pause, now),
                    TimerWrite::total(total),
                ])
            }
            Stopwatch::NotStarted => Err(SemaforoError::InvalidTimerTransition {
                reason: "stopwatch was never started".to_string(),
            }),
            Stopwatch::Completed { .. } => Err(SemaforoError::InvalidTimerTransition {
                reason: "stopwatch has already completed".to_string(),
            }),
        }
    }

    /// Apply the automatic transitions for a record's current data
    ///
    /// A display id starts the stopwatch; a recorded fulfillment completes it.
    /// Both can happen in one call.
    pub fn advance(
        &mut self,
        has_display_id: bool,
        fulfillment_recorded: bool,
        now: NaiveDateTime,
    ) -> Vec<TimerWrite> {
        let mut writes = Vec::new();
        if has_display_id && *self == Stopwatch::NotStarted {
            writes.extend(self.start(now).unwrap_or_default());
        }
        if fulfillment_recorded && self.is_running() {
            writes.extend(self.complete(now).unwrap_or_default());
        }
        writes
    }

    /// Banked time plus the running stretch, if any
    pub fn elapsed(&self, now: NaiveDateTime) -> TimeDelta {
        match *self {
            Stopwatch::NotStarted => TimeDelta::zero(),
            Stopwatch::Running {
                started_at,
                accumulated,
            } => running_total(started_at, accumulated, now),
            Stopwatch::Completed { total, .. } => total,
        }
    }

    /// `H:MM:SS` rendering of [`Stopwatch::elapsed`]
    pub fn format_elapsed(&self, now: NaiveDateTime) -> String {
        format_duration(self.elapsed(now))
    }
}

/// Banked total plus the stretch since `started_at`; a total too large to add to counts as zero
fn running_total(started_at: NaiveDateTime, accumulated: TimeDelta, now: NaiveDateTime) -> TimeDelta {
    let stretch = now.signed_duration_since(started_at);
    accumulated.checked_add(&stretch).unwrap_or(stretch)
}

impl fmt::Display for Stopwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stopwatch::NotStarted => f.write_str("not started"),
            Stopwatch::Running { started_at, .. } => {
                write!(f, "running since {}", started_at.format(TIMESTAMP_FORMAT))
            }
            Stopwatch::Completed { paused_at, .. } => {
                write!(f, "completed at {}", paused_at.format(TIMESTAMP_FORMAT))
            }
        }
    }
}

/// Stopwatch of one primary row before and after the automatic transitions
#[derive(Debug, Clone, PartialEq)]
pub struct TimerPlan {
    pub row_index: usize,
    pub remision: String,
    pub before: Stopwatch,
    pub after: Stopwatch,
    /// Writes as `(column name, value)`; nothing is written by this crate
    pub writes: Vec<(String, String)>,
    pub elapsed: String,
}

/// Work out every row's stopwatch transitions without touching the source
pub fn plan_timers(
    primary: &RawTable,
    config: &PipelineConfig,
    now: NaiveDateTime,
) -> Result<Vec<TimerPlan>> {
    let columns = &config.columns;
    primary.require_column(&columns.remision)?;
    for column in [
        &columns.timer_start,
        &columns.timer_pause,
        &columns.timer_total,
        &columns.fulfillment_date,
    ] {
        if primary.column_index(column).is_none() {
            warn!(
                "Column '{}' not found in table '{}', treated as empty",
                column,
                primary.name()
            );
        }
    }

    let column_for = |field: TimerField| match field {
        TimerField::Start => columns.timer_start.clone(),
        TimerField::Pause => columns.timer_pause.clone(),
        TimerField::Total => columns.timer_total.clone(),
    };

    let plans = primary
        .rows()
        .map(|row| {
            let remision = normalize(row.get(&columns.remision));
            let has_display_id = !remision.is_empty();
            let fulfillment_recorded =
                is_present_with(row.get(&columns.fulfillment_date), &config.placeholder);

            let before = Stopwatch::from_fields(
                row.get(&columns.timer_start),
                row.get(&columns.timer_pause),
                row.get(&columns.timer_total),
            );
            let mut after = before;
            let writes = after
                .advance(has_display_id, fulfillment_recorded, now)
                .into_iter()
                .map(|write| (column_for(write.field), write.value))
                .collect();

            TimerPlan {
                row_index: row.index(),
                remision,
                before,
                after,
                writes,
                elapsed: after.format_elapsed(now),
            }
        })
        .collect();

    Ok(plans)
}
