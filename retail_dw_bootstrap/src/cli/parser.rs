// /////////////////////////////////////////////////////////////////////////////
// Retail Data Warehouse ETL
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI parser
//!
//! The command surface, as clap derive types (spec §6). Security
//! validation happens afterward in `validator`, not here.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "retail-dw")]
#[command(about = concat!("Retail data warehouse ETL v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the warehouse schema, tables, and partitions
    Setup {
        /// Drop and recreate existing objects first
        #[arg(long)]
        drop_existing: bool,
    },

    /// Run a pipeline against a CSV extract
    Etl {
        /// Path to the source CSV file
        #[arg(short, long)]
        source: PathBuf,

        /// Job name recorded in lineage (default: "retail-etl")
        #[arg(long)]
        job_name: Option<String>,

        /// Records per batch (default: 1000)
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Validate database connectivity
    Test,

    /// Manage scheduled jobs
    #[command(subcommand)]
    Schedule(ScheduleCommands),

    /// On-demand data quality evaluation
    #[command(subcommand)]
    Quality(QualityCommands),

    /// Inspect data versions
    #[command(subcommand)]
    Versions(VersionsCommands),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScheduleCommands {
    /// Add a daily scheduled job
    Daily {
        /// Job name
        #[arg(long)]
        name: String,

        /// Time of day to run, HH:MM (24h, local time)
        #[arg(long)]
        time: String,

        /// CSV path the job will load
        #[arg(long)]
        csv_path: PathBuf,
    },
    /// List scheduled jobs
    List,
    /// Run the scheduler loop, firing due jobs until shutdown
    Start,
}

#[derive(Subcommand, Debug, Clone)]
pub enum QualityCommands {
    /// Evaluate current metrics against thresholds for a table
    Check {
        #[arg(long)]
        table: String,
    },
    /// Print a trend summary for a table
    Report {
        #[arg(long)]
        table: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum VersionsCommands {
    /// List recent versions
    List,
    /// Show a single version
    Show {
        version_number: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_setup_with_drop_existing() {
        let cli = Cli::parse_from(["retail-dw", "setup", "--drop-existing"]);
        assert!(matches!(cli.command, Commands::Setup { drop_existing: true }));
    }

    #[test]
    fn parses_etl_with_all_options() {
        let cli = Cli::parse_from(["retail-dw", "etl", "--source", "data.csv", "--job-name", "nightly", "--batch-size", "500"]);
        match cli.command {
            Commands::Etl { source, job_name, batch_size } => {
                assert_eq!(source, PathBuf::from("data.csv"));
                assert_eq!(job_name.as_deref(), Some("nightly"));
                assert_eq!(batch_size, Some(500));
            }
            other => panic!("expected Etl, got {other:?}"),
        }
    }

    #[test]
    fn parses_schedule_daily() {
        let cli = Cli::parse_from(["retail-dw", "schedule", "daily", "--name", "nightly", "--time", "02:00", "--csv-path", "a.csv"]);
        assert!(matches!(cli.command, Commands::Schedule(ScheduleCommands::Daily { .. })));
    }

    #[test]
    fn parses_quality_check() {
        let cli = Cli::parse_from(["retail-dw", "quality", "check", "--table", "fact_sales"]);
        assert!(matches!(cli.command, Commands::Quality(QualityCommands::Check { .. })));
    }

    #[test]
    fn parses_versions_show() {
        let cli = Cli::parse_from(["retail-dw", "versions", "show", "v20260101_000000"]);
        assert!(matches!(cli.command, Commands::Versions(VersionsCommands::Show { .. })));
    }
}
