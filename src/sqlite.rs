use std::collections::HashMap;

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use serde::Deserialize;

use crate::error::Result;
use crate::storage::{Row, Storage};

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

// Booleans are stored as 0/1.
impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Blob(b) => ToSqlOutput::from(b.as_slice()),
            Value::Boolean(b) => ToSqlOutput::from(i64::from(*b)),
        })
    }
}

/// Named parameter bindings (`:name` style) for SQL queries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: HashMap<String, Value>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a named value; `name` includes the leading `:`
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    fn as_named(&self) -> Vec<(&str, &dyn ToSql)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

/// SQL Query with typed parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Params,
}

impl SqlQuery {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            params: Params::new(),
        }
    }
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            columns.join(", ")
        )
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut parts = vec![self.name.clone(), self.data_type.as_sql().to_string()];
        parts.extend(self.constraints.iter().map(|c| c.as_sql().to_string()));
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    pub fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    PrimaryKey,
    AutoIncrement,
    NotNull,
}

impl ColumnConstraint {
    pub fn as_sql(self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::AutoIncrement => "AUTOINCREMENT",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

pub const DEFAULT_DB_PATH: &str = "hotel.db";
pub const DEFAULT_SCHEMA_VERSION: u32 = 2;
pub const IN_MEMORY_PATH: &str = ":memory:";

/// SQLite store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    /// Schema version the caller expects; a higher value than the stored one
    /// resets the guest table
    pub schema_version: u32,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            schema_version: DEFAULT_SCHEMA_VERSION,
        }
    }
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema version
    pub fn new(db_path: impl Into<String>, schema_version: u32) -> Self {
        Self {
            db_path: db_path.into(),
            schema_version,
        }
    }

    pub fn in_memory(schema_version: u32) -> Self {
        Self::new(IN_MEMORY_PATH, schema_version)
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY_PATH
    }
}

/// `Storage` backed by a single rusqlite connection.
///
/// The schema version is kept in `PRAGMA user_version`.
pub struct SqliteStorage {
    connection: Connection,
}

impl SqliteStorage {
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let connection = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.db_path)?
        };
        Ok(Self { connection })
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl Storage for SqliteStorage {
    fn schema_version(&self) -> Result<u32> {
        let version: u32 = self
            .connection
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    fn apply_schema(&mut self, statements: &[String], version: u32) -> Result<()> {
        let tx = self.connection.transaction()?;
        for statement in statements {
            tx.execute(statement, [])?;
        }
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        Ok(())
    }

    fn execute(&self, query: &SqlQuery) -> Result<usize> {
        let mut stmt = self.connection.prepare(&query.statement)?;
        let affected = stmt.execute(query.params.as_named().as_slice())?;
        Ok(affected)
    }

    fn insert(&self, query: &SqlQuery) -> Result<i64> {
        let mut stmt = self.connection.prepare(&query.statement)?;
        let id = stmt.insert(query.params.as_named().as_slice())?;
        Ok(id)
    }

    fn query(&self, query: &SqlQuery) -> Result<Vec<Row>> {
        let mut stmt = self.connection.prepare(&query.statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt.query_map(query.params.as_named().as_slice(), |row| {
            let mut map = HashMap::with_capacity(columns.len());
            for (idx, name) in columns.iter().enumerate() {
                map.insert(name.clone(), Value::from(row.get_ref(idx)?));
            }
            Ok(map)
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_create_table() {
        let table = TableDefinition::new("rooms")
            .add_column(
                ColumnDefinition::new("id", DataType::Integer)
                    .with_constraint(ColumnConstraint::PrimaryKey)
                    .with_constraint(ColumnConstraint::AutoIncrement),
            )
            .add_column(
                ColumnDefinition::new("label", DataType::Text)
                    .with_constraint(ColumnConstraint::NotNull),
            );
        assert_eq!(
            table.create_sql(),
            "CREATE TABLE IF NOT EXISTS rooms (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT NOT NULL)"
        );
        assert_eq!(table.drop_sql(), "DROP TABLE IF EXISTS rooms");
    }

    #[test]
    fn booleans_round_trip_as_integers() {
        let storage = SqliteStorage::open(&SqliteConfig::in_memory(1)).unwrap();
        let query = SqlQuery::new("SELECT :flag AS flag")
            .with_params(Params::new().with_value(":flag", true));
        let rows = storage.query(&query).unwrap();
        assert_eq!(rows[0]["flag"], Value::Integer(1));
    }

    #[test]
    fn fresh_store_reports_version_zero() {
        let mut storage = SqliteStorage::open(&SqliteConfig::in_memory(1)).unwrap();
        assert_eq!(storage.schema_version().unwrap(), 0);
        storage
            .apply_schema(&["CREATE TABLE t (x INTEGER)".to_string()], 3)
            .unwrap();
        assert_eq!(storage.schema_version().unwrap(), 3);
    }

    #[test]
    fn failed_schema_leaves_version_untouched() {
        let mut storage = SqliteStorage::open(&SqliteConfig::in_memory(1)).unwrap();
        let statements = vec![
            "CREATE TABLE t (x INTEGER)".to_string(),
            "NOT VALID SQL".to_string(),
        ];
        assert!(storage.apply_schema(&statements, 5).is_err());
        assert_eq!(storage.schema_version().unwrap(), 0);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SqliteConfig = serde_json::from_str(r#"{"db_path": "guests.db"}"#).unwrap();
        assert_eq!(config.db_path, "guests.db");
        assert_eq!(config.schema_version, DEFAULT_SCHEMA_VERSION);
    }
}
