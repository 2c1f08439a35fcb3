//! Changelog types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use chyle_git::CommitRecord;

/// Per-commit data accumulated by extractors and decorators
pub type Entry = Map<String, Value>;

/// Changelog-wide data accumulated by metadata decorators
pub type Metadata = Map<String, Value>;

/// The document handed to senders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changelog {
    /// One entry per kept commit, in history order
    pub entries: Vec<Entry>,
    /// Changelog-wide data
    pub metadata: Metadata,
}

impl Changelog {
    /// Create a changelog with empty metadata
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            metadata: Metadata::new(),
        }
    }

    /// Changelog as a JSON value, the shape templates are rendered over
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("entries".to_string(), Value::Array(self.entries.iter().cloned().map(Value::Object).collect()));
        map.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        Value::Object(map)
    }
}

/// Seed an entry with the commit's own fields
pub fn entry_from_commit(commit: &CommitRecord) -> Entry {
    let mut entry = Entry::new();
    let mut insert = |key: &str, value: String| {
        entry.insert(key.to_string(), Value::String(value));
    };

    insert("id", commit.hash.clone());
    insert("authorName", commit.author.name.clone());
    insert("authorEmail", commit.author.email.clone());
    insert("authorDate", commit.author.date.to_rfc3339());
    insert("committerName", commit.committer.name.clone());
    insert("committerEmail", commit.committer.email.clone());
    insert("committerDate", commit.committer.date.to_rfc3339());
    insert("message", commit.message.clone());
    insert("type", commit.commit_type().to_string());

    entry
}

/// String view of an entry value, if it is a scalar
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chyle_git::Signature;

    #[test]
    fn test_entry_from_commit() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let commit = CommitRecord::new(
            "abc1234567890",
            "feat: add feature",
            Signature::new("Author", "author@example.com", date),
        )
        .with_parent_count(2);

        let entry = entry_from_commit(&commit);

        assert_eq!(entry["id"], "abc1234567890");
        assert_eq!(entry["authorName"], "Author");
        assert_eq!(entry["authorDate"], "2024-03-01T12:00:00+00:00");
        assert_eq!(entry["committerEmail"], "author@example.com");
        assert_eq!(entry["type"], "merge");
    }

    #[test]
    fn test_changelog_json_shape() {
        let mut entry = Entry::new();
        entry.insert("message".to_string(), Value::from("fix: bug"));
        let mut changelog = Changelog::new(vec![entry]);
        changelog
            .metadata
            .insert("version".to_string(), Value::from("1.0.0"));

        let json = serde_json::to_value(&changelog).unwrap();
        assert_eq!(json, changelog.to_value());
        assert_eq!(json["entries"][0]["message"], "fix: bug");
        assert_eq!(json["metadata"]["version"], "1.0.0");
    }

    #[test]
    fn test_value_as_string() {
        assert_eq!(value_as_string(&Value::from("12")), Some("12".to_string()));
        assert_eq!(value_as_string(&Value::from(12)), Some("12".to_string()));
        assert_eq!(value_as_string(&Value::Null), None);
    }
}
