// /////////////////////////////////////////////////////////////////////////////
// Retail Data Warehouse ETL
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-line interface
//!
//! ```text
//! parser::parse_cli()   -> Cli              clap parsing
//! validate_cli(cli)     -> ValidatedCli      security validation
//! ```
//!
//! `main.rs` matches on `ValidatedCli::command` and never touches the
//! raw clap `Cli`/`Commands` types directly.

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands, QualityCommands, ScheduleCommands, VersionsCommands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Setup {
        drop_existing: bool,
    },
    Etl {
        source: PathBuf,
        job_name: Option<String>,
        batch_size: Option<usize>,
    },
    Test,
    ScheduleDaily {
        name: String,
        time: String,
        csv_path: PathBuf,
    },
    ScheduleList,
    ScheduleStart,
    QualityCheck {
        table: String,
    },
    QualityReport {
        table: String,
    },
    VersionsList,
    VersionsShow {
        version_number: String,
    },
}

pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let command = match cli.command {
        Commands::Setup { drop_existing } => ValidatedCommand::Setup { drop_existing },

        Commands::Etl { source, job_name, batch_size } => {
            let validated_source = SecureArgParser::validate_path(&source.to_string_lossy())?;

            if let Some(ref name) = job_name {
                SecureArgParser::validate_argument(name)?;
            }

            if let Some(size) = batch_size {
                SecureArgParser::validate_number("batch-size", &size.to_string(), Some(1usize), Some(1_000_000usize))?;
            }

            ValidatedCommand::Etl { source: validated_source, job_name, batch_size }
        }

        Commands::Test => ValidatedCommand::Test,

        Commands::Schedule(ScheduleCommands::Daily { name, time, csv_path }) => {
            SecureArgParser::validate_argument(&name)?;
            SecureArgParser::validate_argument(&time)?;
            let validated_csv_path = SecureArgParser::validate_path(&csv_path.to_string_lossy())?;
            ValidatedCommand::ScheduleDaily { name, time, csv_path: validated_csv_path }
        }
        Commands::Schedule(ScheduleCommands::List) => ValidatedCommand::ScheduleList,
        Commands::Schedule(ScheduleCommands::Start) => ValidatedCommand::ScheduleStart,

        Commands::Quality(QualityCommands::Check { table }) => {
            SecureArgParser::validate_argument(&table)?;
            ValidatedCommand::QualityCheck { table }
        }
        Commands::Quality(QualityCommands::Report { table }) => {
            SecureArgParser::validate_argument(&table)?;
            ValidatedCommand::QualityReport { table }
        }

        Commands::Versions(VersionsCommands::List) => ValidatedCommand::VersionsList,
        Commands::Versions(VersionsCommands::Show { version_number }) => {
            SecureArgParser::validate_argument(&version_number)?;
            ValidatedCommand::VersionsShow { version_number }
        }
    };

    Ok(ValidatedCli { command, verbose: cli.verbose })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn setup_passes_through_unvalidated() {
        let cli = Cli::parse_from(["retail-dw", "setup"]);
        let validated = validate_cli(cli).unwrap();
        assert!(matches!(validated.command, ValidatedCommand::Setup { drop_existing: false }));
    }

    #[test]
    fn etl_rejects_nonexistent_source() {
        let cli = Cli::parse_from(["retail-dw", "etl", "--source", "/no/such/file.csv"]);
        assert!(matches!(validate_cli(cli), Err(ParseError::PathNotFound(_))));
    }

    #[test]
    fn versions_show_rejects_dangerous_version_number() {
        let cli = Cli::parse_from(["retail-dw", "versions", "show", "v1;drop table fact_sales"]);
        assert!(matches!(validate_cli(cli), Err(ParseError::DangerousPattern { .. })));
    }
}
