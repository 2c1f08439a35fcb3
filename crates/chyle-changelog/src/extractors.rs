//! Entry field extractors
//!
//! Each extractor applies a pattern to one entry value and stores the
//! match under a new key. The first capture group is stored when the
//! pattern has one, the whole match otherwise.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use chyle_core::config::ExtractorConfig;
use chyle_core::error::ConfigError;
use chyle_git::CommitRecord;

use crate::error::Result;
use crate::types::{entry_from_commit, value_as_string, Entry};

/// Copies a pattern match from one entry key to another
#[derive(Debug)]
pub struct Extractor {
    name: String,
    orig_key: String,
    dest_key: String,
    regex: Regex,
}

impl Extractor {
    pub fn new(
        name: impl Into<String>,
        orig_key: impl Into<String>,
        dest_key: impl Into<String>,
        regex: Regex,
    ) -> Self {
        Self {
            name: name.into(),
            orig_key: orig_key.into(),
            dest_key: dest_key.into(),
            regex,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the pattern to `entry`, leaving it untouched on no match
    pub fn extract(&self, entry: &mut Entry) {
        let Some(input) = entry.get(&self.orig_key).and_then(value_as_string) else {
            return;
        };
        let Some(captures) = self.regex.captures(&input) else {
            return;
        };

        let value = captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        entry.insert(self.dest_key.clone(), Value::String(value));
    }
}

/// Build extractors from their definitions, keeping definition order
pub fn create(configs: &[ExtractorConfig]) -> Result<Vec<Extractor>> {
    configs
        .iter()
        .map(|config| -> Result<Extractor> {
            let regex = Regex::new(&config.reg).map_err(|e| ConfigError::InvalidRegex {
                key: format!("CHYLE_EXTRACTORS_{}_REG", config.name),
                message: e.to_string(),
            })?;
            Ok(Extractor::new(
                &config.name,
                &config.orig_key,
                &config.dest_key,
                regex,
            ))
        })
        .collect()
}

/// Turn commits into entries and run every extractor over each of them
pub fn extract(extractors: &[Extractor], commits: &[CommitRecord]) -> Vec<Entry> {
    let entries: Vec<Entry> = commits
        .iter()
        .map(|commit| {
            let mut entry = entry_from_commit(commit);
            for extractor in extractors {
                extractor.extract(&mut entry);
            }
            entry
        })
        .collect();

    debug!(extractors = extractors.len(), entries = entries.len(), "entries extracted");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chyle_git::Signature;

    fn commit(message: &str) -> CommitRecord {
        CommitRecord::new(
            "0123456789abcdef",
            message,
            Signature::new("Dev", "dev@example.com", Utc::now()),
        )
    }

    fn config(name: &str, orig: &str, dest: &str, reg: &str) -> ExtractorConfig {
        ExtractorConfig {
            name: name.to_string(),
            orig_key: orig.to_string(),
            dest_key: dest.to_string(),
            reg: reg.to_string(),
        }
    }

    #[test]
    fn test_capture_group_stored() {
        let extractors = create(&[config("ISSUE", "message", "jiraIssueId", r"([A-Z]+-\d+)")]).unwrap();
        let entries = extract(&extractors, &[commit("PROJ-42 fix login")]);

        assert_eq!(entries[0]["jiraIssueId"], "PROJ-42");
        assert_eq!(entries[0]["message"], "PROJ-42 fix login");
    }

    #[test]
    fn test_whole_match_without_group() {
        let extractors = create(&[config("TYPE", "message", "kind", r"^\w+")]).unwrap();
        let entries = extract(&extractors, &[commit("feat: something")]);

        assert_eq!(entries[0]["kind"], "feat");
    }

    #[test]
    fn test_no_match_leaves_entry() {
        let extractors = create(&[config("ISSUE", "message", "githubIssueId", r"#(\d+)")]).unwrap();
        let entries = extract(&extractors, &[commit("chore: tidy")]);

        assert!(!entries[0].contains_key("githubIssueId"));
    }

    #[test]
    fn test_missing_orig_key() {
        let extractors = create(&[config("X", "unknown", "dest", r".*")]).unwrap();
        let entries = extract(&extractors, &[commit("chore: tidy")]);

        assert!(!entries[0].contains_key("dest"));
    }

    #[test]
    fn test_chained_extractors() {
        let extractors = create(&[
            config("A", "message", "ref", r"\(([^)]+)\)"),
            config("B", "ref", "refNumber", r"\d+"),
        ])
        .unwrap();
        let entries = extract(&extractors, &[commit("fix(issue 17): bug")]);

        assert_eq!(entries[0]["ref"], "issue 17");
        assert_eq!(entries[0]["refNumber"], "17");
    }

    #[test]
    fn test_no_extractors_seeds_entries() {
        let entries = extract(&[], &[commit("a"), commit("b")]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["message"], "b");
    }

    #[test]
    fn test_invalid_pattern_reports_key() {
        let err = create(&[config("BAD", "message", "x", "(")]).unwrap_err();
        assert!(err.to_string().contains("CHYLE_EXTRACTORS_BAD_REG"));
    }
}
