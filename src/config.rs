//! # Configuration
//!
//! Compiler settings come from three layers, later ones winning:
//!
//! 1. `foundry.toml`, either passed explicitly or found next to the spec
//! 2. Environment variables
//! 3. CLI flags (applied by the caller)
//!
//! ## `foundry.toml`
//!
//! ```toml
//! dialect = "postgres"          # "none" disables schema compilation
//! router_syntax = "colon"       # colon | brace | angle
//! junction_detection = "naming" # naming | extension | either
//! output = "generated"
//! ```
//!
//! ## Environment Variables
//!
//! - `FOUNDRY_DIALECT` - overrides `dialect`
//! - `FOUNDRY_ROUTER_SYNTAX` - overrides `router_syntax`

use crate::assembly::CompileOptions;
use crate::routes::RouterSyntax;
use crate::schema::{Dialect, JunctionDetection};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked for next to the specification
pub const CONFIG_FILE_NAME: &str = "foundry.toml";

pub const ENV_DIALECT: &str = "FOUNDRY_DIALECT";
pub const ENV_ROUTER_SYNTAX: &str = "FOUNDRY_ROUTER_SYNTAX";

/// Dialect value that turns the schema stage off
const NO_DIALECT: &str = "none";

/// Settings loaded from `foundry.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoundryConfig {
    /// Target SQL dialect; absent or `none` skips schema compilation
    pub dialect: Option<String>,
    pub router_syntax: RouterSyntax,
    pub junction_detection: JunctionDetection,
    /// Output directory for emitted artifacts
    pub output: Option<PathBuf>,
}

impl FoundryConfig {
    /// Parsed dialect, `None` when schema compilation is off
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case(NO_DIALECT))
            .map(Dialect::parse)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any variable source
    ///
    /// # Errors
    ///
    /// An unrecognised router syntax.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(dialect) = lookup(ENV_DIALECT) {
            debug!(dialect = %dialect, "dialect from environment");
            self.dialect = Some(dialect);
        }
        if let Some(syntax) = lookup(ENV_ROUTER_SYNTAX) {
            self.router_syntax = RouterSyntax::parse(&syntax)
                .ok_or_else(|| anyhow!("{ENV_ROUTER_SYNTAX}: unknown router syntax '{syntax}'"))?;
        }
        Ok(())
    }

    /// The immutable options value handed to the compiler
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            dialect: self.dialect(),
            router_syntax: self.router_syntax,
            junction: self.junction_detection.predicate(),
        }
    }
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// The file cannot be read or does not parse.
pub fn load_config(config_path: &Path) -> anyhow::Result<FoundryConfig> {
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))
}

/// `foundry.toml` in the spec's directory, if it exists
pub fn auto_detect_config_path(spec_path: &Path) -> Option<PathBuf> {
    let config_path = spec_path.parent()?.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected alongside spec
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, spec_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    auto_detect_config_path(spec_path)
}

/// Resolve, load and apply environment overrides
///
/// # Errors
///
/// A missing explicit config file, an unreadable or invalid one, or an
/// invalid environment override.
pub fn load_effective_config(
    explicit_path: Option<&Path>,
    spec_path: &Path,
) -> anyhow::Result<FoundryConfig> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
    }
    let mut config = match resolve_config_path(explicit_path, spec_path) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)?
        }
        None => FoundryConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}
