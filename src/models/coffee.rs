//! Coffee data models and API request/response types.
//!
//! This module defines:
//! - `CoffeeId`: the store-assigned identifier, parsed from URL paths
//! - `Coffee`: a stored coffee document together with its identifier
//! - `CoffeeUpdate`: the nine-field contract accepted by `PUT /coffees/{id}`
//! - `InsertAck`, `UpdateAck`, `DeleteAck`: write acknowledgements
//!
//! Coffee documents are untyped at the boundary. Whatever object a client
//! posts is stored as-is; only updates are narrowed to the mutable fields.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;

/// Field-name to value mapping holding a coffee's attributes.
pub type CoffeeDocument = Map<String, Value>;

/// Key under which the identifier is exposed on the wire.
pub const ID_FIELD: &str = "_id";

/// Identifier of a coffee document.
///
/// Always generated by the database on insert. Parsing a path segment into a
/// `CoffeeId` is the only validation the access layer performs on ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CoffeeId(Uuid);

impl CoffeeId {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for CoffeeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for CoffeeId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| AppError::MalformedId(s.to_string()))
    }
}

impl fmt::Display for CoffeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Row shape of the `coffees` table.
#[derive(Debug, sqlx::FromRow)]
pub struct CoffeeRow {
    pub id: Uuid,
    pub doc: sqlx::types::Json<CoffeeDocument>,
}

/// A stored coffee as returned to clients.
///
/// # JSON Example
///
/// ```json
/// {
///   "_id": "550e8400-e29b-41d4-a716-446655440000",
///   "company_name": "Acme",
///   "coffee_name": "Latte",
///   "price": 4.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coffee {
    #[serde(rename = "_id")]
    pub id: CoffeeId,

    /// Every stored attribute, flattened next to `_id`
    #[serde(flatten)]
    pub fields: CoffeeDocument,
}

impl From<CoffeeRow> for Coffee {
    fn from(row: CoffeeRow) -> Self {
        Self {
            id: row.id.into(),
            fields: row.doc.0,
        }
    }
}

/// Turn a create request body into a document ready for insertion.
///
/// Only JSON objects are documents. Any `_id` the caller sent is dropped since
/// identifiers are assigned by the store.
pub fn new_document(body: Value) -> Result<CoffeeDocument, AppError> {
    match body {
        Value::Object(mut document) => {
            document.remove(ID_FIELD);
            Ok(document)
        }
        other => Err(AppError::InvalidRequest(format!(
            "coffee must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Request body for `PUT /coffees/{id}`.
///
/// Fields missing from the body are written as `null`. Anything else in the
/// body, including a caller supplied `added_by`, is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CoffeeUpdate {
    pub company_name: Value,
    pub coffee_name: Value,
    pub chef_name: Value,
    pub supplier_name: Value,
    pub taste: Value,
    pub category: Value,
    pub details: Value,
    pub price: Value,
}

impl CoffeeUpdate {
    /// Build the field-level set applied to the stored document.
    ///
    /// Contains exactly the nine mutable fields; `added_by` is always the
    /// configured attribution.
    pub fn into_set(self, added_by: &str) -> CoffeeDocument {
        let mut set = CoffeeDocument::new();
        set.insert("company_name".into(), self.company_name);
        set.insert("coffee_name".into(), self.coffee_name);
        set.insert("chef_name".into(), self.chef_name);
        set.insert("supplier_name".into(), self.supplier_name);
        set.insert("taste".into(), self.taste);
        set.insert("category".into(), self.category);
        set.insert("details".into(), self.details);
        set.insert("price".into(), self.price);
        set.insert("added_by".into(), Value::String(added_by.to_string()));
        set
    }
}

/// Acknowledgement returned by `POST /coffees`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: CoffeeId,
}

impl InsertAck {
    pub fn new(inserted_id: CoffeeId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Acknowledgement returned by `PUT /coffees/{id}`.
///
/// Updates never upsert, so `upserted_count` is always 0 and `upserted_id`
/// always `null`. Both are kept so clients see the full write result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<CoffeeId>,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Acknowledgement returned by `DELETE /coffees/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
