//! Element style queries
//!
//! The element id and the style values travel as one `jsonb` parameter and
//! are turned into a typed `element_styles` record by `jsonb_populate_record`.
//! Postgres coerces each value, the id included, to its column type, so the
//! key column may be an integer, text or uuid.

use serde_json::{Map, Value};
use sqlx::types::Json;

use super::Database;
use crate::error::StoreError;
use crate::store::BoxStyles;

const SELECT_STYLES: &str = r#"
    SELECT to_jsonb(s)
    FROM element_styles AS s,
         jsonb_populate_record(NULL::element_styles, $1) AS k
    WHERE s.element_id = k.element_id
"#;

// Missing keys come out of jsonb_populate_record as NULL, so the overwrite
// always covers all eight columns.
const UPDATE_STYLES: &str = r#"
    UPDATE element_styles AS s
    SET margin_top = r.margin_top,
        margin_right = r.margin_right,
        margin_bottom = r.margin_bottom,
        margin_left = r.margin_left,
        padding_top = r.padding_top,
        padding_right = r.padding_right,
        padding_bottom = r.padding_bottom,
        padding_left = r.padding_left
    FROM jsonb_populate_record(NULL::element_styles, $1) AS r
    WHERE s.element_id = r.element_id
    RETURNING to_jsonb(s)
"#;

/// JSON object with the raw id and, when given, all eight style columns
fn style_record(element_id: &str, styles: Option<&BoxStyles>) -> Value {
    let mut record = Map::new();
    record.insert(
        "element_id".to_string(),
        Value::String(element_id.to_string()),
    );
    if let Some(styles) = styles {
        for (column, value) in styles.columns() {
            record.insert(column.to_string(), value.clone().unwrap_or(Value::Null));
        }
    }
    Value::Object(record)
}

impl Database {
    /// Get the style record for an element
    pub async fn get_element_styles(&self, element_id: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Value>(SELECT_STYLES)
            .bind(Json(style_record(element_id, None)))
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Overwrite all eight style fields of an element
    pub async fn update_element_styles(
        &self,
        element_id: &str,
        styles: &BoxStyles,
    ) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Value>(UPDATE_STYLES)
            .bind(Json(style_record(element_id, Some(styles))))
            .fetch_optional(self.pool())
            .await?;

        if row.is_some() {
            tracing::debug!(element_id, "Updated element styles");
        }
        Ok(row)
    }
}
