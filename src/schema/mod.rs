//! Relational schema compiler.
//!
//! Turns `components.schemas` into `CREATE TABLE` statements for a target
//! [`Dialect`]. Scalar properties become typed columns, `$ref` properties
//! become foreign-key columns, and arrays of `$ref` become junction tables
//! emitted as separate relation [`Migration`]s.

mod dialect;
mod junction;
mod literal;
mod table;

pub use dialect::{Dialect, CREATED_AT_COLUMN, PRIMARY_KEY_COLUMN};
pub use junction::{
    is_junction_by_either, is_junction_by_extension, is_junction_by_naming, JunctionDetection,
    JunctionPredicate,
};
pub use literal::{format_default, format_example};
pub use table::{
    compile_schemas, compile_spec_schemas, Column, ForeignKey, Migration, SchemaArtifact, Table,
    TypeDegradation,
};
