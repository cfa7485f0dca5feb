//! Command-line argument definitions for the semaforo tool
//!
//! The dashboards this replaces were one script per view; here every view is
//! a `--view` of the same `classify` command.

use crate::config::{ColumnMapping, ColumnProfile, PipelineConfig};
use crate::models::View;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Classify logistics records into traffic-light severity tiers
#[derive(Debug, Clone, Parser)]
#[command(
    name = "semaforo",
    version,
    about = "Traffic-light classification of logistics records",
    long_about = "Reads CSV exports of the logistics log and the pending-orders sheet, \
                  works out which operational stage every shipment is in and how late it is, \
                  and prints the records worst-first."
)]
pub struct Args {
    /// Config file (TOML); defaults to <config dir>/semaforo/config.toml when present
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Column-name preset of the worksheets (logistica or legacy)
    #[arg(long = "column-profile", value_name = "PROFILE", global = true)]
    pub column_profile: Option<ColumnProfile>,

    #[command(subcommand)]
    pub command: Command,
}

/// The two worksheets every classification needs
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    /// CSV export of the primary logistics log
    #[arg(short = 'p', long = "primary", value_name = "CSV")]
    pub primary: PathBuf,

    /// CSV export of the pending-orders sheet
    #[arg(short = 's', long = "secondary", value_name = "CSV")]
    pub secondary: PathBuf,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Classify one view and print its records worst-first
    Classify {
        #[command(flatten)]
        sources: SourceArgs,

        /// fulfillment, shipping, invoicing or all (Spanish names accepted)
        #[arg(long = "view", default_value = "invoicing")]
        view: View,

        /// Also write the ordered records to this CSV file
        #[arg(short = 'o', long = "output", value_name = "CSV")]
        output: Option<PathBuf>,

        /// Skip the tile grid and print one line per record
        #[arg(long = "no-grid")]
        no_grid: bool,
    },

    /// Totals for every view
    Overview {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Re-classify on an interval until Ctrl-C
    Watch {
        #[command(flatten)]
        sources: SourceArgs,

        #[arg(long = "view", default_value = "invoicing")]
        view: View,

        /// Seconds between passes; overrides the configured refresh interval
        #[arg(long = "interval", value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Show each row's stopwatch and the writes it would need (nothing is written)
    Timers {
        #[arg(short = 'p', long = "primary", value_name = "CSV")]
        primary: PathBuf,

        /// Reference time as dd/mm/yyyy HH:MM:SS; defaults to now
        #[arg(long = "now", value_name = "TIMESTAMP")]
        now: Option<String>,
    },
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Last configuration layer: command-line flags
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(profile) = self.column_profile {
            config.columns = ColumnMapping::for_profile(profile);
        }
        if let Command::Watch {
            interval: Some(secs),
            ..
        } = &self.command
        {
            config.refresh_interval_secs = *secs;
        }
    }
}
