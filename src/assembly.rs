//! Artifact assembly.
//!
//! [`compile`] threads one immutable [`CompilationContext`] through the
//! extractor and the three compilers, then cross-checks the results before
//! handing them to the emission layer. Compilation is a pure function of the
//! specification and the options: the same input always yields identical
//! artifacts.

use crate::error::{CompileError, RegistrationConflict};
use crate::naming::to_snake_case;
use crate::routes::{compile_routes, RouteArtifact, RouterSyntax};
use crate::schema::{
    compile_spec_schemas, is_junction_by_naming, Dialect, JunctionPredicate, SchemaArtifact, Table,
};
use crate::spec::{extract_model, SpecModel, Specification};
use crate::validation::{derive_validation_configs, ValidationArtifact};
use tracing::{debug, info};

/// Inputs that are not part of the specification
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Target SQL dialect; `None` skips the relational schema stage
    pub dialect: Option<Dialect>,
    pub router_syntax: RouterSyntax,
    pub junction: JunctionPredicate,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            dialect: None,
            router_syntax: RouterSyntax::default(),
            junction: is_junction_by_naming,
        }
    }
}

impl CompileOptions {
    pub fn with_dialect(dialect: Dialect) -> Self {
        CompileOptions {
            dialect: Some(dialect),
            ..Self::default()
        }
    }
}

/// Read-only state shared by every stage of one run
#[derive(Debug)]
pub struct CompilationContext<'a> {
    pub spec: &'a Specification,
    pub model: SpecModel,
    pub options: &'a CompileOptions,
}

impl<'a> CompilationContext<'a> {
    /// Run the extractor
    ///
    /// # Errors
    ///
    /// Propagates `MalformedSpecification` from [`extract_model`].
    pub fn new(spec: &'a Specification, options: &'a CompileOptions) -> Result<Self, CompileError> {
        Ok(CompilationContext {
            spec,
            model: extract_model(spec)?,
            options,
        })
    }

    /// Relational schema stage; `None` when no dialect was requested
    ///
    /// # Errors
    ///
    /// `MalformedSpecification` when a dialect was requested but the
    /// document has no `components.schemas`.
    pub fn schema_stage(&self) -> Result<Option<SchemaArtifact>, CompileError> {
        self.options
            .dialect
            .as_ref()
            .map(|dialect| compile_spec_schemas(self.spec, dialect, self.options.junction))
            .transpose()
    }

    pub fn validation_stage(&self) -> (ValidationArtifact, Vec<RegistrationConflict>) {
        derive_validation_configs(&self.model)
    }

    pub fn route_stage(&self) -> (RouteArtifact, Vec<RegistrationConflict>) {
        compile_routes(
            &self.model,
            self.spec.security_schemes(),
            self.options.router_syntax,
        )
    }
}

/// The three compiled outputs of one run
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub schema: Option<SchemaArtifact>,
    pub validation: ValidationArtifact,
    pub routes: RouteArtifact,
    /// Rejected registrations, reported but not fatal
    pub conflicts: Vec<RegistrationConflict>,
}

impl Artifacts {
    /// The table backing a route resource, if one was compiled
    ///
    /// Resource and table names share [`to_snake_case`], so `/orderLines`
    /// and schema `OrderLine` only line up when the spec is consistent
    /// about pluralization; an exact snake-case match is required.
    pub fn table_for_resource(&self, resource: &str) -> Option<&Table> {
        let name = to_snake_case(resource);
        self.schema.as_ref()?.table(&name)
    }
}

/// Compile a specification into schema, validation and route artifacts
///
/// # Errors
///
/// `MalformedSpecification` from extraction or the schema stage, or when two
/// schemas compile to the same table; `UnresolvableReference` when a foreign
/// key or relation names a schema that did not compile to a keyed table.
pub fn compile(spec: &Specification, options: &CompileOptions) -> Result<Artifacts, CompileError> {
    let context = CompilationContext::new(spec, options)?;

    let schema = context.schema_stage()?;
    if let Some(schema) = &schema {
        check_references(schema)?;
    }
    let (validation, mut conflicts) = context.validation_stage();
    let (routes, route_conflicts) = context.route_stage();
    conflicts.extend(route_conflicts);

    info!(
        tables = schema.as_ref().map_or(0, |s| s.tables.len()),
        migrations = schema.as_ref().map_or(0, |s| s.migrations.len()),
        operations = validation.len(),
        resources = routes.resources.len(),
        conflicts = conflicts.len(),
        "compilation finished"
    );

    Ok(Artifacts {
        schema,
        validation,
        routes,
        conflicts,
    })
}

/// Compile only the relational schema, without extracting routes
///
/// Used when a document is consumed purely as a data model: `paths` may be
/// absent. The reference cross-check still applies.
///
/// # Errors
///
/// `MalformedSpecification` when `components.schemas` is absent and
/// `UnresolvableReference` for a dangling foreign key or relation.
pub fn compile_schema(
    spec: &Specification,
    dialect: &Dialect,
    junction: JunctionPredicate,
) -> Result<SchemaArtifact, CompileError> {
    let schema = compile_spec_schemas(spec, dialect, junction)?;
    check_references(&schema)?;
    Ok(schema)
}

/// Cross-check the compiled tables before anything is emitted
///
/// Two schemas may not share a table name. Every foreign key and relation
/// must point at a table that is rendered and carries the generated `_id`
/// key, which rules out junction tables.
fn check_references(schema: &SchemaArtifact) -> Result<(), CompileError> {
    for (i, table) in schema.tables.iter().enumerate() {
        if let Some(first) = schema.tables[..i].iter().find(|t| t.name == table.name) {
            return Err(CompileError::malformed(
                format!("components.schemas.{}", table.schema_name),
                format!(
                    "schemas '{}' and '{}' both compile to table '{}'",
                    first.schema_name, table.schema_name, table.name
                ),
            ));
        }
    }

    let keyed = |table: &str| {
        schema
            .tables
            .iter()
            .any(|t| t.name == table && t.has_primary_key())
    };

    for table in &schema.tables {
        for fk in &table.foreign_keys {
            if !keyed(&fk.target_table) {
                return Err(CompileError::UnresolvableReference {
                    owner: table.schema_name.clone(),
                    property: fk.column.clone(),
                    target: fk.target_schema.clone(),
                });
            }
        }
    }
    for migration in &schema.migrations {
        for (table, target) in [
            (&migration.owner_table, &migration.owner_schema),
            (&migration.target_table, &migration.target_schema),
        ] {
            if !keyed(table) {
                return Err(CompileError::UnresolvableReference {
                    owner: migration.owner_schema.clone(),
                    property: migration.property.clone(),
                    target: target.clone(),
                });
            }
        }
    }
    debug!(tables = schema.tables.len(), "references resolved");
    Ok(())
}
