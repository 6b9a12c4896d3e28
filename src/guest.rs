//! The guest record and its summary line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::storage::Row;
use crate::sqlite::Value;

pub const TABLE: &str = "hospedes";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "nome";
pub const COLUMN_ROOM: &str = "quarto";
pub const COLUMN_DAYS: &str = "dias";
pub const COLUMN_PAYMENT: &str = "pagamento";
pub const COLUMN_BREAKFAST: &str = "cafe";

/// Guest fields as supplied by a caller, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub room: String,
    pub stay_days: i64,
    pub payment_method: String,
    pub breakfast_included: bool,
}

impl NewGuest {
    pub fn new(
        name: impl Into<String>,
        room: impl Into<String>,
        stay_days: i64,
        payment_method: impl Into<String>,
        breakfast_included: bool,
    ) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            stay_days,
            payment_method: payment_method.into(),
            breakfast_included,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(StoreError::InvalidGuest("name must not be empty".into()));
        }
        Ok(())
    }
}

/// A stored guest. `id` is assigned by the store on insert and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub room: String,
    pub stay_days: i64,
    pub payment_method: String,
    pub breakfast_included: bool,
}

impl Guest {
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: integer(row, COLUMN_ID)?,
            name: text(row, COLUMN_NAME)?,
            room: text(row, COLUMN_ROOM)?,
            stay_days: integer(row, COLUMN_DAYS)?,
            payment_method: text(row, COLUMN_PAYMENT)?,
            breakfast_included: integer(row, COLUMN_BREAKFAST)? == 1,
        })
    }

    /// One-line summary, e.g. `1 | Ana | 101 quarto | 3 dias | Cartão | Café: Sim`
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Guest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} quarto | {} dias | {} | Café: {}",
            self.id,
            self.name,
            self.room,
            self.stay_days,
            self.payment_method,
            breakfast_label(self.breakfast_included)
        )
    }
}

pub fn breakfast_label(included: bool) -> &'static str {
    if included {
        "Sim"
    } else {
        "Não"
    }
}

fn column<'a>(row: &'a Row, name: &str) -> Result<&'a Value> {
    row.get(name)
        .ok_or_else(|| StoreError::decode(name, "missing"))
}

fn integer(row: &Row, name: &str) -> Result<i64> {
    let value = column(row, name)?;
    value
        .as_integer()
        .ok_or_else(|| StoreError::decode(name, format!("expected integer, got {value:?}")))
}

fn text(row: &Row, name: &str) -> Result<String> {
    let value = column(row, name)?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| StoreError::decode(name, format!("expected text, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Guest {
        Guest {
            id: 1,
            name: "Ana".into(),
            room: "101".into(),
            stay_days: 3,
            payment_method: "Cartão".into(),
            breakfast_included: true,
        }
    }

    #[test]
    fn summary_matches_legacy_format() {
        assert_eq!(ana().summary(), "1 | Ana | 101 quarto | 3 dias | Cartão | Café: Sim");

        let guest = Guest {
            breakfast_included: false,
            ..ana()
        };
        assert_eq!(guest.summary(), "1 | Ana | 101 quarto | 3 dias | Cartão | Café: Não");
    }

    #[test]
    fn empty_name_is_rejected() {
        let guest = NewGuest::new("", "101", 3, "Pix", false);
        assert!(matches!(guest.validate(), Err(StoreError::InvalidGuest(_))));
        assert!(NewGuest::new("   ", "101", 3, "Pix", false).validate().is_ok());
        assert!(NewGuest::new("Bruno", "", 0, "", false).validate().is_ok());
    }

    #[test]
    fn guest_serializes_with_field_names() {
        let json = serde_json::to_value(ana()).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["stay_days"], 3);
        assert_eq!(json["breakfast_included"], true);

        let back: Guest = serde_json::from_value(json).unwrap();
        assert_eq!(back, ana());

        let new_guest: NewGuest = serde_json::from_str(
            r#"{"name":"Bruno","room":"202","stay_days":5,"payment_method":"Pix","breakfast_included":false}"#,
        )
        .unwrap();
        assert_eq!(new_guest, NewGuest::new("Bruno", "202", 5, "Pix", false));
    }

    #[test]
    fn from_row_reads_breakfast_flag() {
        let mut row = Row::new();
        row.insert(COLUMN_ID.into(), Value::Integer(7));
        row.insert(COLUMN_NAME.into(), Value::Text("Ana".into()));
        row.insert(COLUMN_ROOM.into(), Value::Text("101".into()));
        row.insert(COLUMN_DAYS.into(), Value::Integer(3));
        row.insert(COLUMN_PAYMENT.into(), Value::Text("Pix".into()));
        row.insert(COLUMN_BREAKFAST.into(), Value::Integer(0));

        let guest = Guest::from_row(&row).unwrap();
        assert_eq!(guest.id, 7);
        assert!(!guest.breakfast_included);

        row.remove(COLUMN_ROOM);
        assert!(matches!(
            Guest::from_row(&row),
            Err(StoreError::Decode { column, .. }) if column == COLUMN_ROOM
        ));
    }
}
