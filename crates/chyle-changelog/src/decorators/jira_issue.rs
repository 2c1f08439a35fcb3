//! Jira issue decorator

use async_trait::async_trait;
use tracing::debug;

use chyle_core::config::JiraIssueDecoratorConfig;

use super::api::RemoteLookup;
use super::Decorator;
use crate::error::Result;
use crate::http;
use crate::types::Entry;

/// Entry key holding the Jira issue key
pub const ID_KEY: &str = "jiraIssueId";

/// Fetches the issue through the Jira REST API with basic auth
pub struct JiraIssueDecorator {
    endpoint_url: String,
    username: String,
    password: String,
    lookup: RemoteLookup,
}

impl JiraIssueDecorator {
    pub fn new(config: &JiraIssueDecoratorConfig) -> Result<Self> {
        Ok(Self {
            endpoint_url: config.endpoint_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            lookup: RemoteLookup::new(ID_KEY, config.keys.clone())?,
        })
    }
}

#[async_trait]
impl Decorator for JiraIssueDecorator {
    fn name(&self) -> &str {
        "jiraissue"
    }

    async fn decorate(&self, entry: Entry) -> Result<Entry> {
        let Some(id) = self.lookup.entry_id(&entry) else {
            return Ok(entry);
        };

        let url = format!(
            "{}/rest/api/2/issue/{}",
            self.endpoint_url,
            http::encode_segment(&id)
        );
        debug!(%url, "fetching Jira issue");
        let request = self
            .lookup
            .client()
            .get(&url)
            .basic_auth(&self.username, Some(&self.password));
        self.lookup.fetch_into(entry, request, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chyle_core::config::KeyMapping;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_issue_fields_copied() {
        let server = MockServer::start().await;
        // "user:pass" in base64
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/PROJ-12"))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key": "PROJ-12",
                "fields": {"summary": "Broken login", "status": {"name": "Done"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let decorator = JiraIssueDecorator::new(&JiraIssueDecoratorConfig {
            endpoint_url: format!("{}/", server.uri()),
            username: "user".to_string(),
            password: "pass".to_string(),
            keys: vec![
                KeyMapping {
                    field: "fields.summary".to_string(),
                    dest_key: "jiraSummary".to_string(),
                },
                KeyMapping {
                    field: "fields.status.name".to_string(),
                    dest_key: "jiraStatus".to_string(),
                },
            ],
        })
        .unwrap();

        let mut entry = Entry::new();
        entry.insert(ID_KEY.to_string(), Value::from("PROJ-12"));
        let entry = decorator.decorate(entry).await.unwrap();

        assert_eq!(entry["jiraSummary"], "Broken login");
        assert_eq!(entry["jiraStatus"], "Done");
    }

    #[tokio::test]
    async fn test_issue_key_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/PROJ%2012%3F"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "PROJ-12"})))
            .expect(1)
            .mount(&server)
            .await;

        let decorator = JiraIssueDecorator::new(&JiraIssueDecoratorConfig {
            endpoint_url: server.uri(),
            username: "user".to_string(),
            password: "pass".to_string(),
            keys: vec![KeyMapping {
                field: "key".to_string(),
                dest_key: "jiraKey".to_string(),
            }],
        })
        .unwrap();

        let mut entry = Entry::new();
        entry.insert(ID_KEY.to_string(), Value::from("PROJ 12?"));
        let entry = decorator.decorate(entry).await.unwrap();
        assert_eq!(entry["jiraKey"], "PROJ-12");
    }
}
