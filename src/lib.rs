//! # Foundry
//!
//! **Foundry** compiles an [OpenAPI 3.x](https://spec.openapis.org/oas/v3.1.0) specification
//! into three artifacts that must agree with each other:
//!
//! - a **relational schema**: `CREATE TABLE` DDL per component schema plus junction-table
//!   migrations for array-of-`$ref` relations
//! - **validation configs**: per-operation JSON Schemas for path, query, headers and body
//! - **route registrations**: per-resource, ordered method registrations with their
//!   security → validation → middleware handler chain and a response stub
//!
//! Output is deterministic: the same document and options always produce byte-identical
//! artifacts, in the document's declaration order.
//!
//! ## Architecture
//!
//! - **[`spec`]** - document loading (YAML/JSON) and the Spec Model Extractor
//! - **[`schema`]** - relational schema compiler (dialects, junction detection, DDL)
//! - **[`validation`]** - validation config deriver
//! - **[`routes`]** - route & middleware compiler
//! - **[`assembly`]** - [`compile`], the immutable compilation context and cross-checks
//! - **[`generator`]** - writes artifacts to an output directory
//! - **[`linter`]** - non-fatal diagnostics over a specification
//! - **[`config`]** / **[`logging`]** / **[`cli`]** - the `foundry-gen` binary's surface
//!
//! ### Compilation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(foundry-gen)
//!     participant Load as spec::load_spec
//!     participant Extract as spec::extract_model
//!     participant Schema as schema
//!     participant Validation as validation
//!     participant Routes as routes
//!     participant Gen as generator
//!
//!     CLI->>Load: load_spec("openapi.yaml")
//!     Load-->>CLI: Specification
//!     CLI->>Extract: compile(&spec, &options)
//!     Extract-->>Schema: SpecModel + components.schemas
//!     Schema-->>CLI: tables, migrations
//!     Extract-->>Validation: operations
//!     Validation-->>CLI: ValidationConfig per operationId
//!     Extract-->>Routes: path items
//!     Routes-->>CLI: ResourceRoutes per resource
//!     CLI->>Gen: write_artifacts(out_dir, &artifacts)
//!     Gen-->>CLI: db/schema.sql, db/migrations/*, validation.json, routes/*.json
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use foundry::assembly::{compile, CompileOptions};
//! use foundry::schema::Dialect;
//! use foundry::spec::{parse_spec, SpecFormat};
//!
//! let spec = parse_spec(
//!     r#"
//! paths:
//!   /widgets/{id}:
//!     get:
//!       operationId: get_widget
//! components:
//!   schemas:
//!     Widget:
//!       type: object
//!       properties:
//!         name: { type: string }
//! "#,
//!     SpecFormat::Yaml,
//! )?;
//!
//! let artifacts = compile(&spec, &CompileOptions::with_dialect(Dialect::Sqlite))?;
//! assert!(artifacts.schema.unwrap().ddl().contains("CREATE TABLE IF NOT EXISTS widget"));
//! assert_eq!(artifacts.routes.resources[0].routes[0].path, "/widgets/:id");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod assembly;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod naming;
pub mod registry;
pub mod routes;
pub mod schema;
pub mod spec;
pub mod validation;

pub use assembly::{compile, Artifacts, CompileOptions};
pub use error::{CompileError, RegistrationConflict};
pub use spec::{load_spec, Specification};
