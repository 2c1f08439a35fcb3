//! Generic custom API decorator

use async_trait::async_trait;
use regex::NoExpand;
use tracing::debug;

use chyle_core::config::validation::ID_PLACEHOLDER;
use chyle_core::config::CustomApiDecoratorConfig;

use super::api::RemoteLookup;
use super::Decorator;
use crate::error::Result;
use crate::http;
use crate::types::Entry;

/// Entry key holding the identifier interpolated into the endpoint URL
pub const ID_KEY: &str = "customApiId";

/// Fetches `ENDPOINT_URL` with `{{ID}}` replaced by the entry's identifier
pub struct CustomApiDecorator {
    endpoint_url: String,
    token: String,
    lookup: RemoteLookup,
}

impl CustomApiDecorator {
    pub fn new(config: &CustomApiDecoratorConfig) -> Result<Self> {
        Ok(Self {
            endpoint_url: config.endpoint_url.clone(),
            token: config.token.clone(),
            lookup: RemoteLookup::new(ID_KEY, config.keys.clone())?,
        })
    }

    fn url(&self, id: &str) -> String {
        ID_PLACEHOLDER
            .replace_all(&self.endpoint_url, NoExpand(&http::encode_segment(id)))
            .into_owned()
    }
}

#[async_trait]
impl Decorator for CustomApiDecorator {
    fn name(&self) -> &str {
        "customapi"
    }

    async fn decorate(&self, entry: Entry) -> Result<Entry> {
        let Some(id) = self.lookup.entry_id(&entry) else {
            return Ok(entry);
        };

        let url = self.url(&id);
        debug!(%url, "fetching custom API object");
        let request = self
            .lookup
            .client()
            .get(&url)
            .header("Authorization", http::token_header(&self.token));
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

    use crate::error::PipelineError;

    fn decorator(server: &MockServer, keys: &[(&str, &str)]) -> CustomApiDecorator {
        CustomApiDecorator::new(&CustomApiDecoratorConfig {
            endpoint_url: format!("{}/objects/{{{{ ID }}}}", server.uri()),
            token: "s3cr3t".to_string(),
            keys: keys
                .iter()
                .map(|(field, dest)| KeyMapping {
                    field: field.to_string(),
                    dest_key: dest.to_string(),
                })
                .collect(),
        })
        .unwrap()
    }

    fn entry_with_id(id: &str) -> Entry {
        let mut entry = Entry::new();
        entry.insert(ID_KEY.to_string(), Value::from(id));
        entry
    }

    #[tokio::test]
    async fn test_fields_copied_into_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/objects/42"))
            .and(header("Authorization", "token s3cr3t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": {"id": 1234, "title": "Login page"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let decorator = decorator(&server, &[("fields.id", "objectId"), ("fields.title", "title")]);
        let entry = decorator.decorate(entry_with_id("42")).await.unwrap();

        assert_eq!(entry["objectId"], 1234);
        assert_eq!(entry["title"], "Login page");
        assert_eq!(entry[ID_KEY], "42");
    }

    #[tokio::test]
    async fn test_entry_without_id_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let decorator = decorator(&server, &[("fields.id", "objectId")]);
        let mut entry = Entry::new();
        entry.insert("message".to_string(), Value::from("chore"));

        let decorated = decorator.decorate(entry.clone()).await.unwrap();
        assert_eq!(decorated, entry);
    }

    #[tokio::test]
    async fn test_missing_field_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fields": {}})))
            .mount(&server)
            .await;

        let decorator = decorator(&server, &[("fields.id", "objectId")]);
        let err = decorator.decorate(entry_with_id("7")).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { ref field, .. } if field == "fields.id"));
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let decorator = decorator(&server, &[("fields.id", "objectId")]);
        let err = decorator.decorate(entry_with_id("7")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Api { status: 401, .. }));
    }

    #[test]
    fn test_url_interpolation() {
        let decorator = CustomApiDecorator::new(&CustomApiDecoratorConfig {
            endpoint_url: "http://test.com/{{ID}}/details?id={{ ID }}".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(decorator.url("42"), "http://test.com/42/details?id=42");
        assert_eq!(decorator.url("$1"), "http://test.com/%241/details?id=%241");
    }

    #[tokio::test]
    async fn test_id_stays_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/objects/a%2Fb%3Fc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fields": {"id": 5}})))
            .expect(1)
            .mount(&server)
            .await;

        let decorator = decorator(&server, &[("fields.id", "objectId")]);
        let entry = decorator.decorate(entry_with_id("a/b?c")).await.unwrap();
        assert_eq!(entry["objectId"], 5);
    }
}
