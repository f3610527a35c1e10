use std::fmt;

/// Target SQL dialect
///
/// Unknown identifiers are kept as [`Dialect::Other`]: every property maps to
/// `TEXT` and the standard columns use the SQLite definitions. This is the
/// documented permissive fallback, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Postgres,
    Mysql,
    Other(String),
}

const SQLITE_UUID_DEFAULT: &str = "(lower(hex(randomblob(4))) || '-' || lower(hex(randomblob(2))) || '-4' || substr(lower(hex(randomblob(2))),2) || '-' || substr('89ab', abs(random()) % 4 + 1, 1) || substr(lower(hex(randomblob(2))),2) || '-' || lower(hex(randomblob(6))))";
const SQLITE_NOW_DEFAULT: &str = "(strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))";

/// Reserved property names the compiler owns on every non-junction table
pub const PRIMARY_KEY_COLUMN: &str = "_id";
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Words that must be quoted when used as identifiers
const RESERVED_WORDS: &[&str] = &[
    "all", "alter", "and", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "cross", "current_date", "current_time", "current_timestamp",
    "default", "delete", "desc", "distinct", "drop", "else", "end", "except", "exists",
    "foreign", "from", "full", "group", "having", "in", "index", "inner", "insert",
    "intersect", "into", "is", "join", "key", "left", "like", "limit", "not", "null",
    "offset", "on", "or", "order", "outer", "primary", "references", "right", "select",
    "set", "table", "then", "to", "union", "unique", "update", "user", "using", "values",
    "when", "where", "with",
];

impl Dialect {
    /// Parse a dialect identifier (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            "postgres" | "postgresql" | "pg" => Dialect::Postgres,
            "mysql" | "mariadb" => Dialect::Mysql,
            other => Dialect::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Dialect::Other(_))
    }

    /// Column type for a JSON type / format pair
    ///
    /// Returns `None` when the pair has no mapping; callers degrade to
    /// [`Dialect::text_type`] (the UnsupportedType rule).
    pub fn sql_type(&self, json_type: Option<&str>, format: Option<&str>) -> Option<&'static str> {
        let json_type = json_type?;
        let ty = match (self, json_type) {
            (Dialect::Sqlite, "string") => "TEXT",
            (Dialect::Sqlite, "number") => "REAL",
            (Dialect::Sqlite, "integer") => "INTEGER",
            (Dialect::Sqlite, "boolean") => "INTEGER(1)",
            (Dialect::Sqlite, "array" | "object") => "TEXT",

            (Dialect::Postgres, "string") => match format {
                Some("date-time") => "TIMESTAMP",
                Some("date") => "DATE",
                Some("time") => "TIME",
                Some("uuid") => "UUID",
                _ => "TEXT",
            },
            (Dialect::Postgres, "number") => match format {
                Some("float") => "REAL",
                Some("double") => "DOUBLE PRECISION",
                _ => "NUMERIC",
            },
            (Dialect::Postgres, "integer") => match format {
                Some("int64") => "BIGINT",
                _ => "INTEGER",
            },
            (Dialect::Postgres, "boolean") => "BOOLEAN",
            (Dialect::Postgres, "array" | "object") => "JSONB",

            (Dialect::Mysql, "string") => match format {
                Some("date-time") => "DATETIME",
                Some("date") => "DATE",
                Some("time") => "TIME",
                Some("uuid") => "CHAR(36)",
                _ => "TEXT",
            },
            (Dialect::Mysql, "number") => match format {
                Some("float") => "FLOAT",
                _ => "DOUBLE",
            },
            (Dialect::Mysql, "integer") => match format {
                Some("int64") => "BIGINT",
                _ => "INT",
            },
            (Dialect::Mysql, "boolean") => "BOOLEAN",
            (Dialect::Mysql, "array" | "object") => "JSON",

            _ => return None,
        };
        Some(ty)
    }

    /// The fallback column type
    pub fn text_type(&self) -> &'static str {
        "TEXT"
    }

    /// Type of primary keys and of the columns that reference them
    pub fn key_type(&self) -> &'static str {
        match self {
            Dialect::Mysql => "VARCHAR(36)",
            _ => "TEXT",
        }
    }

    /// Default expression generating a UUID primary key at insert time
    pub fn uuid_default(&self) -> &'static str {
        match self {
            Dialect::Postgres => "gen_random_uuid()::text",
            Dialect::Mysql => "(UUID())",
            Dialect::Sqlite | Dialect::Other(_) => SQLITE_UUID_DEFAULT,
        }
    }

    /// Type and default of the creation-timestamp column
    pub fn timestamp_column(&self) -> (&'static str, &'static str) {
        match self {
            Dialect::Postgres => ("TIMESTAMP", "CURRENT_TIMESTAMP"),
            Dialect::Mysql => ("DATETIME", "CURRENT_TIMESTAMP"),
            Dialect::Sqlite | Dialect::Other(_) => ("TEXT", SQLITE_NOW_DEFAULT),
        }
    }

    /// Whether boolean literals can be written as TRUE/FALSE
    pub fn has_native_boolean(&self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::Mysql)
    }

    /// Quote an identifier when it is not a plain lowercase name or is reserved
    pub fn quote_ident(&self, ident: &str) -> String {
        let plain = ident
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase() || c == '_')
            .unwrap_or(false)
            && ident
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if plain && !RESERVED_WORDS.contains(&ident) {
            return ident.to_string();
        }
        match self {
            Dialect::Mysql => format!("`{}`", ident.replace('`', "``")),
            _ => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
