//! Storage backends and their type and naming policies.

use serde::Serialize;

/// Storage backend the generated code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Sql,
    Mongodb,
    Cassandra,
}

impl DatabaseType {
    /// Parse database type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sql" => Some(Self::Sql),
            "mongodb" | "mongo" => Some(Self::Mongodb),
            "cassandra" => Some(Self::Cassandra),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        self.types().name
    }

    /// The policy tables for this backend.
    pub fn types(self) -> &'static DatabaseTypes {
        match self {
            Self::Sql => &SQL,
            Self::Mongodb => &MONGODB,
            Self::Cassandra => &CASSANDRA,
        }
    }
}

/// Allowed primitive types and reserved words of one backend.
#[derive(Debug)]
pub struct DatabaseTypes {
    database: DatabaseType,
    name: &'static str,
    types: &'static [&'static str],
    reserved_tables: &'static [&'static str],
    reserved_fields: &'static [&'static str],
}

impl DatabaseTypes {
    pub fn database(&self) -> DatabaseType {
        self.database
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Backend spelling of a primitive type, matched case-insensitively.
    pub fn canonical_type(&self, name: &str) -> Option<&'static str> {
        let name = name.trim();
        self.types
            .iter()
            .copied()
            .find(|t| t.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_type(name).is_some()
    }

    pub fn is_reserved_class_name(&self, name: &str) -> bool {
        contains_ignore_case(JAVA_KEYWORDS, name) || contains_ignore_case(RESERVED_CLASSES, name)
    }

    pub fn is_reserved_table_name(&self, name: &str) -> bool {
        contains_ignore_case(self.reserved_tables, name)
    }

    pub fn is_reserved_field_name(&self, name: &str) -> bool {
        contains_ignore_case(JAVA_KEYWORDS, name) || contains_ignore_case(self.reserved_fields, name)
    }
}

fn contains_ignore_case(words: &[&str], name: &str) -> bool {
    let name = name.trim();
    words.iter().any(|w| w.eq_ignore_ascii_case(name))
}

static SQL: DatabaseTypes = DatabaseTypes {
    database: DatabaseType::Sql,
    name: "sql",
    types: &[
        "String", "Integer", "Long", "BigDecimal", "Float", "Double", "Boolean", "LocalDate",
        "ZonedDateTime", "Instant", "Duration", "UUID", "Blob", "AnyBlob", "ImageBlob",
        "TextBlob",
    ],
    reserved_tables: SQL_KEYWORDS,
    reserved_fields: SQL_KEYWORDS,
};

static MONGODB: DatabaseTypes = DatabaseTypes {
    database: DatabaseType::Mongodb,
    name: "mongodb",
    types: &[
        "String", "Integer", "Long", "BigDecimal", "Float", "Double", "Boolean", "LocalDate",
        "ZonedDateTime", "Instant", "Duration", "Blob", "AnyBlob", "ImageBlob", "TextBlob",
    ],
    reserved_tables: &["system", "admin", "local", "config"],
    reserved_fields: &["_id", "_class"],
};

static CASSANDRA: DatabaseTypes = DatabaseTypes {
    database: DatabaseType::Cassandra,
    name: "cassandra",
    types: &[
        "UUID", "String", "Integer", "Long", "BigDecimal", "Float", "Double", "Boolean",
        "LocalDate", "Instant", "ZonedDateTime", "Blob", "AnyBlob", "ImageBlob",
    ],
    reserved_tables: CQL_KEYWORDS,
    reserved_fields: CQL_KEYWORDS,
};

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

// Entities the generated application already ships.
const RESERVED_CLASSES: &[&str] = &[
    "Account",
    "Authority",
    "Application",
    "Configuration",
    "PersistentToken",
    "PersistentAuditEvent",
    "Object",
];

const SQL_KEYWORDS: &[&str] = &[
    "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "database", "delete", "desc", "distinct", "drop", "else", "end",
    "exists", "foreign", "from", "grant", "group", "having", "in", "index", "inner", "insert",
    "into", "is", "join", "key", "left", "like", "limit", "not", "null", "offset", "on", "or",
    "order", "outer", "primary", "references", "revoke", "right", "schema", "select", "set",
    "table", "then", "trigger", "union", "unique", "update", "values", "view", "when", "where",
];

const CQL_KEYWORDS: &[&str] = &[
    "add", "allow", "alter", "and", "apply", "asc", "authorize", "batch", "begin", "by",
    "columnfamily", "create", "delete", "desc", "describe", "drop", "entries", "execute",
    "from", "full", "grant", "if", "in", "index", "infinity", "insert", "into", "keyspace",
    "limit", "modify", "nan", "norecursive", "not", "null", "of", "on", "or", "order",
    "primary", "rename", "replace", "revoke", "schema", "select", "set", "table", "to",
    "token", "truncate", "unlogged", "update", "use", "using", "where", "with",
];
