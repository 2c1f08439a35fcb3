//! GitHub issue decorator

use async_trait::async_trait;
use tracing::debug;

use chyle_core::config::GithubIssueDecoratorConfig;

use super::api::RemoteLookup;
use super::Decorator;
use crate::error::Result;
use crate::http;
use crate::types::Entry;

/// Entry key holding the issue number
pub const ID_KEY: &str = "githubIssueId";

/// Fetches the issue from the repository's GitHub API
pub struct GithubIssueDecorator {
    issues_url: String,
    oauth_token: String,
    lookup: RemoteLookup,
}

impl GithubIssueDecorator {
    pub fn new(config: &GithubIssueDecoratorConfig) -> Result<Self> {
        Ok(Self {
            issues_url: format!(
                "{}/repos/{}/{}/issues",
                config.api_url.trim_end_matches('/'),
                config.owner,
                config.repository_name
            ),
            oauth_token: config.oauth_token.clone(),
            lookup: RemoteLookup::new(ID_KEY, config.keys.clone())?,
        })
    }
}

#[async_trait]
impl Decorator for GithubIssueDecorator {
    fn name(&self) -> &str {
        "githubissue"
    }

    async fn decorate(&self, entry: Entry) -> Result<Entry> {
        let Some(id) = self.lookup.entry_id(&entry) else {
            return Ok(entry);
        };

        let number = http::encode_segment(id.trim_start_matches('#'));
        let url = format!("{}/{}", self.issues_url, number);
        debug!(%url, "fetching GitHub issue");
        let request = self
            .lookup
            .client()
            .get(&url)
            .header("Authorization", http::token_header(&self.oauth_token));
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
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/issues/12"))
            .and(header("Authorization", "token gh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Crash on start",
                "labels": [{"name": "bug"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let decorator = GithubIssueDecorator::new(&GithubIssueDecoratorConfig {
            api_url: server.uri(),
            oauth_token: "gh-token".to_string(),
            owner: "acme".to_string(),
            repository_name: "widgets".to_string(),
            keys: vec![
                KeyMapping {
                    field: "title".to_string(),
                    dest_key: "issueTitle".to_string(),
                },
                KeyMapping {
                    field: "labels.0.name".to_string(),
                    dest_key: "issueLabel".to_string(),
                },
            ],
        })
        .unwrap();

        let mut entry = Entry::new();
        entry.insert(ID_KEY.to_string(), Value::from("#12"));
        let entry = decorator.decorate(entry).await.unwrap();

        assert_eq!(entry["issueTitle"], "Crash on start");
        assert_eq!(entry["issueLabel"], "bug");
    }
}
