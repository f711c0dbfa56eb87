//! Backend objects as returned by the read API

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::ObjectId;

/// The backend object a tree node was built from.
///
/// Only the fields the tree needs are typed; everything else the backend
/// sends is kept in [`Payload::other`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Payload {
    /// Creates a payload carrying only an id.
    pub fn with_id(id: impl Into<ObjectId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// The activity counter used for sorting, if the backend sent one.
    pub fn counter(&self) -> Option<i64> {
        self.extra.as_ref().and_then(|e| e.counter)
    }

    /// `true` when the backend reports at least one child.
    pub fn has_child_count(&self) -> bool {
        self.child_count.is_some_and(|c| c > 0)
    }

    /// Display name of an experimenter: first and last name joined by a space.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{} {}", first, last)
    }
}

/// The `extra` block some listings attach to their objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    #[serde(
        default,
        deserialize_with = "deserialize_counter",
        skip_serializing_if = "Option::is_none"
    )]
    pub counter: Option<i64>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Counters arrive either as numbers or as numeric strings.
fn deserialize_counter<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_preserved() {
        let payload: Payload = serde_json::from_str(
            r#"{"id": 5, "name": "plate 1", "childCount": 2, "ownerId": 3}"#,
        )
        .unwrap();
        assert_eq!(payload.id, Some(ObjectId::Int(5)));
        assert!(payload.has_child_count());
        assert_eq!(payload.other.get("ownerId"), Some(&Value::from(3)));
    }

    #[test]
    fn test_counter_from_string_or_number() {
        let a: Payload = serde_json::from_str(r#"{"extra": {"counter": "12"}}"#).unwrap();
        let b: Payload = serde_json::from_str(r#"{"extra": {"counter": 7}}"#).unwrap();
        let c: Payload = serde_json::from_str(r#"{"extra": {"value": "x"}}"#).unwrap();
        assert_eq!(a.counter(), Some(12));
        assert_eq!(b.counter(), Some(7));
        assert_eq!(c.counter(), None);
    }

    #[test]
    fn test_full_name() {
        let payload: Payload =
            serde_json::from_str(r#"{"id": 1, "firstName": "Ada", "lastName": "Lovelace"}"#)
                .unwrap();
        assert_eq!(payload.full_name(), "Ada Lovelace");
    }
}
