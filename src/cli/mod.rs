//! # CLI Module
//!
//! Command-line surface of the `foundry-gen` binary.
//!
//! ## Commands
//!
//! ### `compile`
//!
//! Compile all three artifacts and write them out:
//!
//! ```bash
//! foundry-gen compile --spec openapi.yaml --dialect postgres --output gen
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Path to OpenAPI specification (required)
//! - `--dialect <D>` - sqlite, postgres, mysql, or none to skip the schema
//! - `--router-syntax <S>` - colon (default), brace or angle
//! - `--output <DIR>` - Output directory (default: generated/{slug})
//! - `--config <FILE>` - foundry.toml (auto-detected next to the spec)
//! - `--dry-run` - List the files without writing them
//!
//! ### `schema`
//!
//! Relational schema only; `paths` may be missing:
//!
//! ```bash
//! foundry-gen schema --spec models.yaml --dialect sqlite > schema.sql
//! ```
//!
//! ### `lint`
//!
//! ```bash
//! foundry-gen lint --spec openapi.yaml --fail-on-error
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use foundry::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
