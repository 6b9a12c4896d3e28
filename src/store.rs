//! `GuestStore`: schema lifecycle and CRUD access to the guest table.
//!
//! The mutating operations keep a boolean contract (`true` on success, `false`
//! on any failure). Each has a `try_*` twin that returns the underlying
//! [`StoreError`] for callers that want the detail.

use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::guest::{
    Guest, NewGuest, COLUMN_BREAKFAST, COLUMN_DAYS, COLUMN_ID, COLUMN_NAME, COLUMN_PAYMENT,
    COLUMN_ROOM, TABLE,
};
use crate::sqlite::{
    ColumnConstraint, ColumnDefinition, DataType, Params, SqlQuery, SqliteConfig, SqliteStorage,
    TableDefinition,
};
use crate::storage::{Row, Storage};

/// Definition of the guest table, columns in persisted order.
pub fn guest_table() -> TableDefinition {
    TableDefinition::new(TABLE)
        .add_column(
            ColumnDefinition::new(COLUMN_ID, DataType::Integer)
                .with_constraint(ColumnConstraint::PrimaryKey)
                .with_constraint(ColumnConstraint::AutoIncrement),
        )
        .add_column(required(COLUMN_NAME, DataType::Text))
        .add_column(required(COLUMN_ROOM, DataType::Text))
        .add_column(required(COLUMN_DAYS, DataType::Integer))
        .add_column(required(COLUMN_PAYMENT, DataType::Text))
        .add_column(required(COLUMN_BREAKFAST, DataType::Integer))
}

fn required(name: &str, data_type: DataType) -> ColumnDefinition {
    ColumnDefinition::new(name, data_type).with_constraint(ColumnConstraint::NotNull)
}

pub struct GuestStore<S: Storage = SqliteStorage> {
    storage: S,
    table: TableDefinition,
}

impl GuestStore<SqliteStorage> {
    /// Open (or create) the SQLite file named by `config` and bring the schema
    /// to `config.schema_version`.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        info!(path = %config.db_path, version = config.schema_version, "opening guest store");
        let storage = SqliteStorage::open(config)?;
        Self::open_with(storage, config.schema_version)
    }

    pub fn open_in_memory(schema_version: u32) -> Result<Self> {
        Self::open(&SqliteConfig::in_memory(schema_version))
    }
}

impl<S: Storage> GuestStore<S> {
    /// Wrap an already-open storage and ensure the guest table exists.
    ///
    /// A stored version below `schema_version` drops the table and recreates
    /// it empty. A stored version above it is refused.
    pub fn open_with(mut storage: S, schema_version: u32) -> Result<Self> {
        if schema_version == 0 {
            return Err(StoreError::InvalidVersion(schema_version));
        }
        let table = guest_table();
        let stored = storage.schema_version()?;

        if stored > schema_version {
            return Err(StoreError::Downgrade {
                stored,
                requested: schema_version,
            });
        }

        if stored == 0 {
            info!(version = schema_version, "creating guest table");
            storage.apply_schema(&[table.create_sql()], schema_version)?;
        } else if stored < schema_version {
            warn!(
                from = stored,
                to = schema_version,
                "schema upgrade: dropping guest table, existing records are discarded"
            );
            storage.apply_schema(&[table.drop_sql(), table.create_sql()], schema_version)?;
        } else {
            storage.apply_schema(&[table.create_sql()], schema_version)?;
        }

        Ok(Self { storage, table })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Insert a guest; `true` iff the store assigned a new id.
    pub fn insert(
        &self,
        name: &str,
        room: &str,
        stay_days: i64,
        payment_method: &str,
        breakfast_included: bool,
    ) -> bool {
        let guest = NewGuest::new(name, room, stay_days, payment_method, breakfast_included);
        report("insert", self.try_insert(&guest).map(|id| id > 0))
    }

    pub fn try_insert(&self, guest: &NewGuest) -> Result<i64> {
        guest.validate()?;
        let statement = format!(
            "INSERT INTO {TABLE} ({COLUMN_NAME}, {COLUMN_ROOM}, {COLUMN_DAYS}, {COLUMN_PAYMENT}, {COLUMN_BREAKFAST}) \
             VALUES (:name, :room, :days, :payment, :breakfast)"
        );
        let id = self
            .storage
            .insert(&SqlQuery::new(statement).with_params(guest_params(guest)))?;
        debug!(id, "guest inserted");
        Ok(id)
    }

    /// Overwrite every field of guest `id`; `true` iff a row matched.
    pub fn update(
        &self,
        id: i64,
        name: &str,
        room: &str,
        stay_days: i64,
        payment_method: &str,
        breakfast_included: bool,
    ) -> bool {
        let guest = NewGuest::new(name, room, stay_days, payment_method, breakfast_included);
        report("update", self.try_update(id, &guest).map(|n| n > 0))
    }

    pub fn try_update(&self, id: i64, guest: &NewGuest) -> Result<usize> {
        guest.validate()?;
        let statement = format!(
            "UPDATE {TABLE} SET {COLUMN_NAME} = :name, {COLUMN_ROOM} = :room, {COLUMN_DAYS} = :days, \
             {COLUMN_PAYMENT} = :payment, {COLUMN_BREAKFAST} = :breakfast WHERE {COLUMN_ID} = :id"
        );
        let params = guest_params(guest).with_value(":id", id);
        let affected = self
            .storage
            .execute(&SqlQuery::new(statement).with_params(params))?;
        debug!(id, affected, "guest updated");
        Ok(affected)
    }

    /// Remove guest `id`; `true` iff a row was removed.
    pub fn delete(&self, id: i64) -> bool {
        report("delete", self.try_delete(id).map(|n| n > 0))
    }

    pub fn try_delete(&self, id: i64) -> Result<usize> {
        let statement = format!("DELETE FROM {TABLE} WHERE {COLUMN_ID} = :id");
        let affected = self.storage.execute(
            &SqlQuery::new(statement).with_params(Params::new().with_value(":id", id)),
        )?;
        debug!(id, affected, "guest deleted");
        Ok(affected)
    }

    /// Every guest as a summary line, in retrieval order.
    ///
    /// Read failures are logged and yield an empty list. A row that cannot be
    /// decoded is logged and left out; the others are still listed.
    pub fn list_all(&self) -> Vec<String> {
        let rows = match self.rows() {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "listing guests failed");
                return Vec::new();
            }
        };
        rows.iter()
            .filter_map(|row| match Guest::from_row(row) {
                Ok(guest) => Some(guest.summary()),
                Err(err) => {
                    warn!(id = ?row.get(COLUMN_ID), error = %err, "skipping unreadable guest row");
                    None
                }
            })
            .collect()
    }

    pub fn guests(&self) -> Result<Vec<Guest>> {
        self.rows()?.iter().map(Guest::from_row).collect()
    }

    fn rows(&self) -> Result<Vec<Row>> {
        let statement = format!("SELECT {} FROM {TABLE}", self.table.column_names().join(", "));
        self.storage.query(&SqlQuery::new(statement))
    }

    pub fn find(&self, id: i64) -> Result<Option<Guest>> {
        let statement = format!(
            "SELECT {} FROM {TABLE} WHERE {COLUMN_ID} = :id",
            self.table.column_names().join(", ")
        );
        let rows = self.storage.query(
            &SqlQuery::new(statement).with_params(Params::new().with_value(":id", id)),
        )?;
        rows.first().map(Guest::from_row).transpose()
    }
}

fn guest_params(guest: &NewGuest) -> Params {
    Params::new()
        .with_value(":name", guest.name.as_str())
        .with_value(":room", guest.room.as_str())
        .with_value(":days", guest.stay_days)
        .with_value(":payment", guest.payment_method.as_str())
        .with_value(":breakfast", guest.breakfast_included)
}

fn report(op: &str, outcome: Result<bool>) -> bool {
    match outcome {
        Ok(done) => done,
        Err(err) => {
            warn!(op, error = %err, "guest store operation failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_table_matches_persisted_layout() {
        assert_eq!(
            guest_table().create_sql(),
            "CREATE TABLE IF NOT EXISTS hospedes (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             nome TEXT NOT NULL, quarto TEXT NOT NULL, dias INTEGER NOT NULL, \
             pagamento TEXT NOT NULL, cafe INTEGER NOT NULL)"
        );
    }

    #[test]
    fn version_zero_is_rejected() {
        assert!(matches!(
            GuestStore::open_in_memory(0),
            Err(StoreError::InvalidVersion(0))
        ));
    }
}
