// /////////////////////////////////////////////////////////////////////////////
// Retail Data Warehouse ETL
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # Bootstrap
//!
//! Sits outside the domain/application/infrastructure layers and owns
//! everything that has to happen before or around them: CLI parsing and
//! security validation, process exit codes, and OS shutdown signals.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              retail_dw_bootstrap             │
//! │  - CLI parsing + security validation          │
//! │  - Exit code mapping                          │
//! │  - Signal handling / shutdown coordination    │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │   retail_dw (application + infrastructure)    │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │            retail_dw_domain                   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! `retail_dw_bootstrap` has no dependency on `retail_dw` or
//! `retail_dw_domain`; `main.rs` (in `retail_dw`) is the only place that
//! wires all three together.

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ParseError, ValidatedCli, ValidatedCommand};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};

/// Parses and validates the command line. Clap handles `--help`/
/// `--version` itself and exits the process before returning.
pub fn bootstrap_cli() -> Result<ValidatedCli, ParseError> {
    cli::parse_and_validate()
}
