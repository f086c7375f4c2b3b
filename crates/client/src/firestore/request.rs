//! Structured query request types for the `runQuery` endpoint.
//!
//! Only the slice of the query surface the collection scanner needs is
//! modeled: select a collection, order by resource name, bound the page,
//! and resume strictly after a cursor document.

use serde::Serialize;

use vodsite_core::PageCursor;

/// Request body for `documents:runQuery`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryBody {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    pub order_by: Vec<Order>,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<CursorPosition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub field: FieldReference,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ascending,
    Descending,
}

/// Cursor position within the ordered result set.
///
/// `before: false` positions the query strictly after the referenced
/// document, which is what page continuation needs.
#[derive(Debug, Clone, Serialize)]
pub struct CursorPosition {
    pub values: Vec<CursorValue>,
    pub before: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorValue {
    ReferenceValue(String),
}

impl RunQueryBody {
    /// One page of `collection` in resource-name order.
    pub fn page(collection: &str, limit: usize, after: Option<&PageCursor>) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector { collection_id: collection.to_string() }],
                order_by: vec![Order {
                    field: FieldReference { field_path: "__name__".into() },
                    direction: Direction::Ascending,
                }],
                limit: limit as i64,
                start_at: after.map(|cursor| CursorPosition {
                    values: vec![CursorValue::ReferenceValue(cursor.token().to_string())],
                    before: false,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_page_body() {
        let body = RunQueryBody::page("videos", 20, None);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({
                "structuredQuery": {
                    "from": [{"collectionId": "videos"}],
                    "orderBy": [{"field": {"fieldPath": "__name__"}, "direction": "ASCENDING"}],
                    "limit": 20,
                }
            })
        );
    }

    #[test]
    fn test_continuation_body_carries_cursor() {
        let cursor = PageCursor::new("projects/p/databases/(default)/documents/videos/abc");
        let body = RunQueryBody::page("videos", 20, Some(&cursor));
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value["structuredQuery"]["startAt"],
            json!({
                "values": [{"referenceValue": "projects/p/databases/(default)/documents/videos/abc"}],
                "before": false,
            })
        );
    }
}
