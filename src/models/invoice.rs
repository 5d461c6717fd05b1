//! Receivable records eligible for a collection notice

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::sql_types::{Date, Nullable, Numeric, Text};
use jiff::civil;
use serde::{Deserialize, Serialize};

/// Outstanding balance as delivered by the source
///
/// Sources are not trusted to deliver a number; anything else is kept as-is
/// so the formatter can reject it per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Value(BigDecimal),
    Unparsed(String),
}

/// Due date as delivered by the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DueDate {
    Date(civil::Date),
    Text(String),
}

/// One invoice-and-debtor tuple
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(default)]
    pub debtor_name: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub phone_raw: Option<String>,
}

impl InvoiceRecord {
    /// Short label for status lines and logs
    pub fn label(&self) -> &str {
        self.debtor_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Cliente")
    }
}

/// Row shape of the receivables query
#[derive(Debug, QueryableByName)]
pub struct InvoiceRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub debtor_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub document_number: Option<String>,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub amount: Option<BigDecimal>,
    #[diesel(sql_type = Nullable<Date>)]
    pub due_date: Option<jiff_diesel::Date>,
    #[diesel(sql_type = Nullable<Text>)]
    pub barcode: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub phone_raw: Option<String>,
}

impl From<InvoiceRow> for InvoiceRecord {
    fn from(row: InvoiceRow) -> Self {
        Self {
            debtor_name: row.debtor_name,
            document_number: row.document_number,
            amount: row.amount.map(Amount::Value),
            due_date: row.due_date.map(|d| DueDate::Date(d.to_jiff())),
            barcode: row.barcode.filter(|b| !b.trim().is_empty()),
            phone_raw: row.phone_raw,
        }
    }
}
