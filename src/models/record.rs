use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Open-schema payload: whatever fields the caller stored.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const CREATED_FIELD: &str = "_createdDate";
pub const UPDATED_FIELD: &str = "_updatedDate";

/// A stored entity: the envelope the store manages plus the caller's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T = Document> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_updatedDate", serialize_with = "serialize_millis")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

/// A record that has not been stored yet. Missing envelope fields are filled
/// in by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft<T = Document> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_createdDate", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Draft<T> {
    pub fn new(data: T) -> Self {
        Self {
            id: None,
            created_at: None,
            data,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// Timestamps are stored the way browsers print them: millisecond precision, `Z` suffix.
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Non-empty string `_id` of a stored or incoming document.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Payload-agnostic list result, shaped like the UI expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T = Document> {
    pub items: Vec<Record<T>>,
    pub total_count: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> QueryResult<T> {
    pub fn new(items: Vec<Record<T>>) -> Self {
        Self {
            total_count: items.len(),
            items,
            has_next: false,
            has_prev: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_flattens_payload() {
        let record: Record = serde_json::from_value(json!({
            "_id": "abc",
            "_createdDate": "2024-03-01T10:00:00.000Z",
            "_updatedDate": "2024-03-02T10:00:00.000Z",
            "amount": 42.5,
            "category": "Food"
        }))
        .unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.data.get("amount"), Some(&json!(42.5)));
        assert!(!record.data.contains_key("_id"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["category"], "Food");
        assert_eq!(back["_createdDate"], "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_empty_id_counts_as_absent() {
        let doc = json!({ "_id": "" }).as_object().cloned().unwrap();
        assert_eq!(document_id(&doc), None);
    }
}
