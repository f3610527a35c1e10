use crate::assembly::{compile, compile_schema};
use crate::config::{load_effective_config, FoundryConfig};
use crate::generator::{write_artifacts, write_schema, EmitOptions, EmittedFile};
use crate::linter::{has_errors, lint_spec, print_lint_issues, LintSeverity};
use crate::routes::RouterSyntax;
use crate::schema::Dialect;
use crate::spec::load_spec;
use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Default output root; artifacts land in `<root>/<spec slug>`
const DEFAULT_OUTPUT_ROOT: &str = "generated";

/// Command-line interface for the Foundry compiler
#[derive(Parser)]
#[command(name = "foundry-gen")]
#[command(about = "Compile an OpenAPI specification into schema, validation and route artifacts", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides FOUNDRY_LOG_LEVEL
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile all three artifacts and write them to an output directory
    Compile {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// SQL dialect (sqlite, postgres, mysql, none); overrides config
        #[arg(short, long)]
        dialect: Option<String>,

        /// Router parameter syntax (colon, brace, angle); overrides config
        #[arg(long)]
        router_syntax: Option<String>,

        /// Output directory (default: generated/{slug})
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to foundry.toml
        /// If not provided, will auto-detect alongside the OpenAPI spec
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show what would be written without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Compile only the relational schema
    ///
    /// Prints DDL and migrations to stdout unless --output is given.
    /// `paths` may be absent from the specification.
    Schema {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// SQL dialect (sqlite, postgres, mysql)
        #[arg(short, long)]
        dialect: String,

        /// Output directory for db/schema.sql and db/migrations/
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Lint a specification
    ///
    /// Reports unknown security schemes, dangling references, invalid
    /// validator schemas, text-degraded column types and no-content stubs.
    Lint {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

fn parse_router_syntax(value: &str) -> anyhow::Result<RouterSyntax> {
    RouterSyntax::parse(value)
        .ok_or_else(|| anyhow!("unknown router syntax '{value}' (expected colon, brace or angle)"))
}

fn report(out_dir: &Path, files: &[EmittedFile], dry_run: bool) {
    let verb = if dry_run { "🔍 Would write" } else { "✅ Wrote" };
    for file in files {
        println!("{verb} {}", out_dir.join(&file.path).display());
    }
}

/// Apply CLI overrides on top of file and environment configuration
fn effective_config(
    spec: &Path,
    config: Option<&Path>,
    dialect: Option<&str>,
    router_syntax: Option<&str>,
) -> anyhow::Result<FoundryConfig> {
    let mut effective = load_effective_config(config, spec)?;
    if let Some(dialect) = dialect {
        effective.dialect = Some(dialect.to_string());
    }
    if let Some(syntax) = router_syntax {
        effective.router_syntax = parse_router_syntax(syntax)?;
    }
    Ok(effective)
}

/// Run a parsed command line
///
/// # Errors
///
/// Any load, compile or write failure, or lint errors with `--fail-on-error`.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Compile {
            spec,
            dialect,
            router_syntax,
            output,
            config,
            dry_run,
        } => {
            let effective = effective_config(
                &spec,
                config.as_deref(),
                dialect.as_deref(),
                router_syntax.as_deref(),
            )?;
            let document = load_spec(&spec)?;
            let artifacts = compile(&document, &effective.compile_options())?;
            for conflict in &artifacts.conflicts {
                eprintln!("⚠️  {conflict}");
            }

            let out_dir = output
                .or(effective.output)
                .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_ROOT).join(document.slug()));
            let files = write_artifacts(&out_dir, &artifacts, &EmitOptions { dry_run })?;
            report(&out_dir, &files, dry_run);
            Ok(())
        }
        Commands::Schema {
            spec,
            dialect,
            output,
        } => {
            let effective = effective_config(&spec, None, Some(&dialect), None)?;
            let dialect = Dialect::parse(&dialect);
            if !dialect.is_supported() {
                eprintln!("⚠️  Unknown dialect '{dialect}'; every column will be TEXT");
            }
            let document = load_spec(&spec)?;
            let schema = compile_schema(
                &document,
                &dialect,
                effective.junction_detection.predicate(),
            )?;

            match output {
                Some(out_dir) => {
                    let files = write_schema(&out_dir, &schema, &EmitOptions::default())?;
                    report(&out_dir, &files, false);
                }
                None => {
                    print!("{}", schema.ddl());
                    for migration in &schema.migrations {
                        println!("\n-- migration: {}", migration.name);
                        print!("{}", migration.sql);
                    }
                }
            }
            Ok(())
        }
        Commands::Lint {
            spec,
            fail_on_error,
            errors_only,
        } => {
            let effective = effective_config(&spec, None, None, None)?;
            let document = load_spec(&spec)?;
            let mut issues = lint_spec(&document, &effective.compile_options());
            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);

            if fail_on_error && has_errors(&issues) {
                bail!("lint found errors in {}", spec.display());
            }
            Ok(())
        }
    }
}
