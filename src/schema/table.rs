use super::dialect::{Dialect, CREATED_AT_COLUMN, PRIMARY_KEY_COLUMN};
use super::junction::JunctionPredicate;
use super::literal::{format_default, format_example};
use crate::error::CompileError;
use crate::naming::{ref_name, table_name};
use crate::spec::{OrderedMap, SchemaDefinition, Specification};
use serde::Serialize;
use tracing::debug;

const INDENT: &str = "    ";

/// One column of a compiled table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub sql_type: String,
    pub primary_key: bool,
    pub not_null: bool,
    /// Rendered DEFAULT expression
    pub default: Option<String>,
    /// Rendered CHECK expression (enum constraint)
    pub check: Option<String>,
    /// Property description, emitted as a comment above the column
    pub comment: Option<String>,
}

impl Column {
    fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            sql_type: sql_type.into(),
            primary_key: false,
            not_null: false,
            default: None,
            check: None,
            comment: None,
        }
    }

    fn render(&self, dialect: &Dialect) -> String {
        let mut sql = format!("{} {}", dialect.quote_ident(&self.name), self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        if let Some(check) = &self.check {
            sql.push_str(" CHECK (");
            sql.push_str(check);
            sql.push(')');
        }
        sql
    }
}

/// FOREIGN KEY constraint produced by a `$ref` property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub column: String,
    /// Schema name as written in the `$ref`
    pub target_schema: String,
    pub target_table: String,
}

/// Compiled form of one object schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub schema_name: String,
    pub name: String,
    pub junction: bool,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Seed row built from property examples
    pub example_insert: Option<String>,
}

impl Table {
    /// Whether the table carries the generated `_id` key other tables reference
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
    }

    /// Render `CREATE TABLE IF NOT EXISTS` plus the trailing example block
    ///
    /// A table without columns (an `x-junction` schema with no properties)
    /// renders nothing.
    pub fn render(&self, dialect: &Dialect) -> Option<String> {
        if self.columns.is_empty() {
            return None;
        }

        let mut entries: Vec<(Option<&str>, String)> = self
            .columns
            .iter()
            .map(|c| (c.comment.as_deref(), c.render(dialect)))
            .collect();
        entries.extend(self.foreign_keys.iter().map(|fk| {
            (
                None,
                format!(
                    "FOREIGN KEY ({}) REFERENCES {}({})",
                    dialect.quote_ident(&fk.column),
                    dialect.quote_ident(&fk.target_table),
                    dialect.quote_ident(PRIMARY_KEY_COLUMN)
                ),
            )
        }));

        let last = entries.len() - 1;
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n",
            dialect.quote_ident(&self.name)
        );
        for (i, (comment, line)) in entries.iter().enumerate() {
            if let Some(comment) = comment {
                sql.push_str(INDENT);
                sql.push_str("-- ");
                sql.push_str(comment);
                sql.push('\n');
            }
            sql.push_str(INDENT);
            sql.push_str(line);
            if i != last {
                sql.push(',');
            }
            sql.push('\n');
        }
        sql.push_str(");");

        if let Some(insert) = &self.example_insert {
            sql.push_str("\n\n-- EXAMPLE FROM OpenAPI SPECIFICATION\n");
            sql.push_str(insert);
        }
        Some(sql)
    }
}

/// A relation migration creating one junction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// `add_<owner table>_relations`
    pub name: String,
    pub owner_schema: String,
    pub property: String,
    pub target_schema: String,
    pub owner_table: String,
    pub target_table: String,
    /// `<owner table>_<target table>`
    pub junction_table: String,
    pub sql: String,
}

/// A property whose type had no mapping and degraded to the text type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDegradation {
    pub schema: String,
    pub property: String,
    pub json_type: Option<String>,
    pub format: Option<String>,
}

/// Output of the relational schema compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaArtifact {
    #[serde(serialize_with = "serialize_dialect")]
    pub dialect: Dialect,
    pub tables: Vec<Table>,
    pub migrations: Vec<Migration>,
    pub degraded: Vec<TypeDegradation>,
}

fn serialize_dialect<S: serde::Serializer>(dialect: &Dialect, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(dialect.as_str())
}

impl SchemaArtifact {
    /// All table DDL, in schema declaration order
    pub fn ddl(&self) -> String {
        let blocks: Vec<String> = self
            .tables
            .iter()
            .filter_map(|t| t.render(&self.dialect))
            .collect();
        if blocks.is_empty() {
            return String::new();
        }
        blocks.join("\n\n") + "\n"
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Compile the specification's component schemas
///
/// # Errors
///
/// `MalformedSpecification` when the document has no `components.schemas`.
pub fn compile_spec_schemas(
    spec: &Specification,
    dialect: &Dialect,
    junction: JunctionPredicate,
) -> Result<SchemaArtifact, CompileError> {
    let schemas = spec.schemas().ok_or_else(|| {
        CompileError::malformed(
            "components.schemas",
            "schema compilation requested but the specification declares no component schemas",
        )
    })?;
    Ok(compile_schemas(schemas, dialect, junction))
}

/// Compile named schema definitions into tables and relation migrations
///
/// Iterates in declaration order; non-object schemas produce nothing.
pub fn compile_schemas(
    schemas: &OrderedMap<SchemaDefinition>,
    dialect: &Dialect,
    junction: JunctionPredicate,
) -> SchemaArtifact {
    let mut artifact = SchemaArtifact {
        dialect: dialect.clone(),
        tables: Vec::new(),
        migrations: Vec::new(),
        degraded: Vec::new(),
    };

    for (name, definition) in schemas.iter() {
        if !definition.is_object() {
            debug!(schema = %name, "skipping non-object schema");
            continue;
        }
        let table = compile_table(name, definition, dialect, junction, &mut artifact);
        debug!(
            schema = %name,
            table = %table.name,
            columns = table.columns.len(),
            junction = table.junction,
            "compiled table"
        );
        artifact.tables.push(table);
    }
    artifact
}

fn compile_table(
    name: &str,
    definition: &SchemaDefinition,
    dialect: &Dialect,
    junction: JunctionPredicate,
    artifact: &mut SchemaArtifact,
) -> Table {
    let is_junction = junction(name, definition);
    let table = table_name(name);
    let mut columns = Vec::new();
    let mut foreign_keys = Vec::new();
    let mut examples: Vec<(String, String)> = Vec::new();

    if !is_junction {
        columns.extend(standard_columns(dialect));
    }

    for (prop_name, prop) in definition.properties.iter() {
        if !is_junction && (prop_name == PRIMARY_KEY_COLUMN || prop_name == CREATED_AT_COLUMN) {
            continue;
        }

        let linked = is_junction && prop.array_item_ref().is_some();
        let mut column = if let Some(reference) = prop.reference.as_deref() {
            let target = ref_name(reference);
            foreign_keys.push(ForeignKey {
                column: prop_name.to_string(),
                target_schema: target.to_string(),
                target_table: table_name(target),
            });
            Column::new(prop_name, dialect.key_type())
        } else if let Some(reference) = prop.array_item_ref() {
            let target = ref_name(reference);
            if !is_junction {
                artifact
                    .migrations
                    .push(relation_migration(name, prop_name, target, dialect));
                continue;
            }
            // a junction schema is the association itself: link in place
            let target_table = table_name(target);
            let column = format!("{target_table}_id");
            foreign_keys.push(ForeignKey {
                column: column.clone(),
                target_schema: target.to_string(),
                target_table,
            });
            Column::new(column, dialect.key_type())
        } else {
            scalar_column(name, prop_name, prop, dialect, artifact)
        };

        column.not_null = definition.property_required(prop_name, prop);
        column.comment = prop.description.as_deref().map(one_line);
        if linked {
            // defaults and examples describe the array, not the key
            columns.push(column);
            continue;
        }
        column.default = prop.default.as_ref().map(|v| format_default(v, dialect));
        columns.push(column);

        let example = prop
            .example
            .as_ref()
            .or_else(|| prop.items.as_ref().and_then(|i| i.example.as_ref()));
        if let Some(example) = example {
            examples.push((prop_name.to_string(), format_example(example)));
        }
    }

    Table {
        schema_name: name.to_string(),
        example_insert: example_insert(&table, &examples, dialect),
        name: table,
        junction: is_junction,
        columns,
        foreign_keys,
    }
}

fn standard_columns(dialect: &Dialect) -> [Column; 2] {
    let mut id = Column::new(PRIMARY_KEY_COLUMN, dialect.key_type());
    id.primary_key = true;
    id.default = Some(dialect.uuid_default().to_string());

    let (ts_type, ts_default) = dialect.timestamp_column();
    let mut created = Column::new(CREATED_AT_COLUMN, ts_type);
    created.not_null = true;
    created.default = Some(ts_default.to_string());

    [id, created]
}

fn scalar_column(
    schema: &str,
    prop_name: &str,
    prop: &SchemaDefinition,
    dialect: &Dialect,
    artifact: &mut SchemaArtifact,
) -> Column {
    let json_type = prop.json_type();
    let format = prop.format.as_deref();
    let sql_type = dialect.sql_type(json_type, format).unwrap_or_else(|| {
        debug!(
            schema,
            property = prop_name,
            json_type,
            format,
            dialect = %dialect,
            "no type mapping; degrading to text"
        );
        artifact.degraded.push(TypeDegradation {
            schema: schema.to_string(),
            property: prop_name.to_string(),
            json_type: json_type.map(str::to_string),
            format: format.map(str::to_string),
        });
        dialect.text_type()
    });

    let mut column = Column::new(prop_name, sql_type);
    let scalar = !matches!(json_type, Some("array" | "object"));
    if let Some(values) = prop.enum_values.as_ref().filter(|v| scalar && !v.is_empty()) {
        let literals: Vec<String> = values.iter().map(|v| format_default(v, dialect)).collect();
        column.check = Some(format!(
            "{} IN ({})",
            dialect.quote_ident(prop_name),
            literals.join(", ")
        ));
    }
    column
}

fn relation_migration(owner: &str, property: &str, target: &str, dialect: &Dialect) -> Migration {
    let owner_table = table_name(owner);
    let target_table = table_name(target);
    let junction_table = format!("{owner_table}_{target_table}");
    let owner_column = format!("{owner_table}_id");
    let target_column = if owner_table == target_table {
        format!("related_{target_table}_id")
    } else {
        format!("{target_table}_id")
    };

    let key = dialect.key_type();
    let (ts_type, ts_default) = dialect.timestamp_column();
    let q = |ident: &str| dialect.quote_ident(ident);
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {junction} (\n\
         {INDENT}{oc} {key} REFERENCES {ot}({pk}),\n\
         {INDENT}{tc} {key} REFERENCES {tt}({pk}),\n\
         {INDENT}{created} {ts_type} NOT NULL DEFAULT {ts_default},\n\
         {INDENT}PRIMARY KEY ({oc}, {tc})\n\
         );\n",
        junction = q(&junction_table),
        oc = q(&owner_column),
        tc = q(&target_column),
        ot = q(&owner_table),
        tt = q(&target_table),
        pk = q(PRIMARY_KEY_COLUMN),
        created = q(CREATED_AT_COLUMN),
    );

    Migration {
        name: format!("add_{owner_table}_relations"),
        owner_schema: owner.to_string(),
        property: property.to_string(),
        target_schema: target.to_string(),
        owner_table,
        target_table,
        junction_table,
        sql,
    }
}

fn example_insert(table: &str, examples: &[(String, String)], dialect: &Dialect) -> Option<String> {
    if examples.is_empty() {
        return None;
    }
    let columns: Vec<String> = examples.iter().map(|(c, _)| dialect.quote_ident(c)).collect();
    let values: Vec<&str> = examples.iter().map(|(_, v)| v.as_str()).collect();
    Some(format!(
        "INSERT INTO {} ({})\nVALUES ({});",
        dialect.quote_ident(table),
        columns.join(", "),
        values.join(", ")
    ))
}

fn one_line(description: &str) -> String {
    description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
