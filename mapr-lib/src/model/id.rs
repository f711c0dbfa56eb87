//! Backend object identifiers

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Identifier of a backend object.
///
/// Most objects carry an integer id. Map annotations are keyed by their
/// value, so their id is text. Integers order numerically and sort before
/// any text id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectId {
    Int(i64),
    Text(String),
}

impl ObjectId {
    /// The id used for the aggregate "all users" experimenter.
    pub const AGGREGATE: ObjectId = ObjectId::Int(-1);

    /// Parses a raw parameter: integers become [`ObjectId::Int`], anything else text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(v) => Self::Int(v),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl Ord for ObjectId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Int(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Int(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ObjectId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ObjectId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ObjectId {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_before_text() {
        let mut ids = vec![
            ObjectId::from("CDC20"),
            ObjectId::Int(10),
            ObjectId::from("ACTB"),
            ObjectId::Int(2),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                ObjectId::Int(2),
                ObjectId::Int(10),
                ObjectId::from("ACTB"),
                ObjectId::from("CDC20"),
            ]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(ObjectId::parse("42"), ObjectId::Int(42));
        assert_eq!(ObjectId::parse("-1"), ObjectId::AGGREGATE);
        assert_eq!(ObjectId::parse("tag-1"), ObjectId::Text("tag-1".into()));
    }

    #[test]
    fn test_deserialize_untagged() {
        let ids: Vec<ObjectId> = serde_json::from_str(r#"[3, "PAX6"]"#).unwrap();
        assert_eq!(ids, vec![ObjectId::Int(3), ObjectId::Text("PAX6".into())]);
    }
}
