//! Billing record input types and display formatting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single field value in a billing record.
///
/// The variant is fixed when the record is constructed, so formatting never
/// needs to inspect the value again. JSON input maps whole numbers to
/// `Integer`, other numbers to `Money`, `YYYY-MM-DD` strings to `Date` and
/// any other string to `Text`.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole number, e.g. a customer id or a unit count
    Integer(i64),
    /// Monetary amount, always displayed with two decimal places
    Money(#[schemars(with = "f64")] Decimal),
    /// Calendar date, displayed as YYYY-MM-DD
    Date(NaiveDate),
    /// Free text, passed through unchanged
    Text(String),
}

impl FieldValue {
    /// Display text substituted into the template.
    pub fn format(&self) -> String {
        match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Money(amount) => format!("{amount:.2}"),
            FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<Decimal> for FieldValue {
    fn from(amount: Decimal) -> Self {
        FieldValue::Money(amount)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(date: NaiveDate) -> Self {
        FieldValue::Date(date)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_owned())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldValueVisitor;

        impl<'de> Visitor<'de> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number, a YYYY-MM-DD date or a string")
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
                Ok(FieldValue::Integer(n))
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
                i64::try_from(n).map(FieldValue::Integer).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, amount: f64) -> Result<Self::Value, E> {
                Decimal::try_from(amount)
                    .map(FieldValue::Money)
                    .map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    Ok(date) => Ok(FieldValue::Date(date)),
                    Err(_) => Ok(FieldValue::Text(text.to_owned())),
                }
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// One customer's billing record: field name → value.
///
/// There is no fixed schema; any key present is a candidate substitution
/// target. `customer_id` is only required when the output filename is
/// computed. Keys are held in a BTreeMap so iteration order, and with it the
/// tie order of the length-descending substitution sort, is deterministic.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Bill(BTreeMap<String, FieldValue>);

impl Bill {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldValue)> for Bill {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Bill(iter.into_iter().collect())
    }
}
