//! # Generator Module
//!
//! Writes compiled [`Artifacts`] to disk. This is the only part of the crate
//! that touches the filesystem on the output side; the compilers produce
//! values and never write.
//!
//! ## Output Layout
//!
//! ```text
//! out/
//! ├── db/
//! │   ├── schema.sql                      # CREATE TABLE for every compiled table
//! │   └── migrations/
//! │       └── 0001_add_order_relations.sql
//! ├── validation.json                     # operationId → {path, query, headers, body}
//! └── routes/
//!     └── <resource>.json                 # ordered registrations per resource
//! ```
//!
//! Migration files are numbered by their position in the compiled list, so
//! regenerating from the same specification produces the same file names.
//! Each file is written once with no retry; a failed write aborts the run.
//!
//! `db/migrations/` and `routes/` are owned by the generator: files in them
//! that the current artifacts no longer produce are removed, so the output
//! directory always mirrors one compilation.


use crate::assembly::Artifacts;
use crate::schema::SchemaArtifact;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SCHEMA_FILE: &str = "db/schema.sql";
pub const MIGRATIONS_DIR: &str = "db/migrations";
pub const VALIDATION_FILE: &str = "validation.json";
pub const ROUTES_DIR: &str = "routes";

/// Emission options
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    /// Report the files that would be written without touching disk
    pub dry_run: bool,
}

/// A file produced (or, in a dry run, planned) by [`write_artifacts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    /// Path relative to the output directory
    pub path: PathBuf,
    pub contents: String,
}

fn to_pretty_json<T: serde::Serialize>(value: &T, what: &str) -> anyhow::Result<String> {
    let mut json =
        serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {what}"))?;
    json.push('\n');
    Ok(json)
}

/// Render the relational schema: `db/schema.sql` then numbered migrations
pub fn render_schema(schema: &SchemaArtifact) -> Vec<EmittedFile> {
    let mut files = vec![EmittedFile {
        path: PathBuf::from(SCHEMA_FILE),
        contents: schema.ddl(),
    }];
    for (i, migration) in schema.migrations.iter().enumerate() {
        files.push(EmittedFile {
            path: Path::new(MIGRATIONS_DIR).join(migration_file_name(i + 1, &migration.name)),
            contents: migration.sql.clone(),
        });
    }
    files
}

/// Render every artifact into its relative path and contents, in write order
pub fn render_artifacts(artifacts: &Artifacts) -> anyhow::Result<Vec<EmittedFile>> {
    let mut files = artifacts.schema.as_ref().map(render_schema).unwrap_or_default();

    files.push(EmittedFile {
        path: PathBuf::from(VALIDATION_FILE),
        contents: to_pretty_json(&artifacts.validation, "validation configs")?,
    });

    for resource in &artifacts.routes.resources {
        files.push(EmittedFile {
            path: Path::new(ROUTES_DIR).join(format!("{}.json", resource.resource)),
            contents: to_pretty_json(resource, &format!("routes for '{}'", resource.resource))?,
        });
    }

    Ok(files)
}

/// `NNNN_<name>.sql`
pub fn migration_file_name(ordinal: usize, name: &str) -> String {
    format!("{ordinal:04}_{name}.sql")
}

/// Write the artifacts under `out_dir`
///
/// Returns the files written, or that would be written when
/// [`EmitOptions::dry_run`] is set.
pub fn write_artifacts(
    out_dir: &Path,
    artifacts: &Artifacts,
    options: &EmitOptions,
) -> anyhow::Result<Vec<EmittedFile>> {
    let files = render_artifacts(artifacts)?;
    write_files(out_dir, files, options)
}

/// Write only the relational schema under `out_dir`
pub fn write_schema(
    out_dir: &Path,
    schema: &SchemaArtifact,
    options: &EmitOptions,
) -> anyhow::Result<Vec<EmittedFile>> {
    write_files(out_dir, render_schema(schema), options)
}

fn write_files(
    out_dir: &Path,
    files: Vec<EmittedFile>,
    options: &EmitOptions,
) -> anyhow::Result<Vec<EmittedFile>> {
    if options.dry_run {
        info!(out_dir = %out_dir.display(), files = files.len(), "dry run; nothing written");
        return Ok(files);
    }

    if files.iter().any(|f| f.path == Path::new(SCHEMA_FILE)) {
        prune_stale(out_dir, MIGRATIONS_DIR, "sql", &files)?;
    }
    if files.iter().any(|f| f.path == Path::new(VALIDATION_FILE)) {
        prune_stale(out_dir, ROUTES_DIR, "json", &files)?;
    }

    for file in &files {
        let target = out_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, &file.contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        info!(path = %target.display(), bytes = file.contents.len(), "wrote artifact");
    }
    Ok(files)
}

/// Remove `*.<extension>` files under `out_dir/dir` that `files` does not produce
fn prune_stale(
    out_dir: &Path,
    dir: &str,
    extension: &str,
    files: &[EmittedFile],
) -> anyhow::Result<()> {
    let managed = out_dir.join(dir);
    if !managed.is_dir() {
        return Ok(());
    }
    let entries = fs::read_dir(&managed)
        .with_context(|| format!("Failed to read directory {}", managed.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory {}", managed.display()))?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(out_dir) else {
            continue;
        };
        if files.iter().any(|f| f.path == relative) {
            continue;
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove stale {}", path.display()))?;
        info!(path = %path.display(), "removed stale artifact");
    }
    Ok(())
}
