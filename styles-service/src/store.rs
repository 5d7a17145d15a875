//! Storage seam between the HTTP handlers and the database

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Column names of the eight box-model fields, in update order
pub const STYLE_COLUMNS: [&str; 8] = [
    "margin_top",
    "margin_right",
    "margin_bottom",
    "margin_left",
    "padding_top",
    "padding_right",
    "padding_bottom",
    "padding_left",
];

/// Body of a style update.
///
/// Every field is written on update. A field that is missing or `null` is
/// stored as SQL `NULL`; values are coerced to the column types by Postgres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxStyles {
    pub margin_top: Option<Value>,
    pub margin_right: Option<Value>,
    pub margin_bottom: Option<Value>,
    pub margin_left: Option<Value>,
    pub padding_top: Option<Value>,
    pub padding_right: Option<Value>,
    pub padding_bottom: Option<Value>,
    pub padding_left: Option<Value>,
}

impl BoxStyles {
    /// Field values paired with their column names, in [`STYLE_COLUMNS`] order
    pub fn columns(&self) -> [(&'static str, &Option<Value>); 8] {
        [
            (STYLE_COLUMNS[0], &self.margin_top),
            (STYLE_COLUMNS[1], &self.margin_right),
            (STYLE_COLUMNS[2], &self.margin_bottom),
            (STYLE_COLUMNS[3], &self.margin_left),
            (STYLE_COLUMNS[4], &self.padding_top),
            (STYLE_COLUMNS[5], &self.padding_right),
            (STYLE_COLUMNS[6], &self.padding_bottom),
            (STYLE_COLUMNS[7], &self.padding_left),
        ]
    }
}

/// Read/write access to the example and style tables.
///
/// Rows come back as JSON objects exactly as the database produced them.
#[async_trait]
pub trait StyleStore: Send + Sync {
    /// All rows of the example table
    async fn list_examples(&self) -> Result<Vec<Value>, StoreError>;

    /// The style record for `element_id`, if one exists.
    ///
    /// The id is passed through as text and coerced to the key column's type
    /// by the database.
    async fn get_element_styles(&self, element_id: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite all eight fields for `element_id` and return the stored row.
    /// `None` when no record has that id.
    async fn update_element_styles(
        &self,
        element_id: &str,
        styles: &BoxStyles,
    ) -> Result<Option<Value>, StoreError>;

    /// Round trip to the database
    async fn ping(&self) -> Result<(), StoreError>;
}
