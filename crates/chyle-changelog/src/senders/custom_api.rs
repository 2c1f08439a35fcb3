//! Generic custom API sender

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use chyle_core::config::CustomApiSenderConfig;

use super::Sender;
use crate::error::Result;
use crate::http;
use crate::types::Changelog;

/// POSTs the JSON changelog to an endpoint
pub struct CustomApiSender {
    client: Client,
    endpoint_url: String,
    token: String,
}

impl CustomApiSender {
    pub fn new(config: &CustomApiSenderConfig) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            endpoint_url: config.endpoint_url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl Sender for CustomApiSender {
    fn name(&self) -> &str {
        "customapi"
    }

    async fn send(&self, changelog: &Changelog) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .header("Authorization", http::token_header(&self.token))
            .json(changelog)
            .send()
            .await?;
        http::check(response, &self.endpoint_url).await?;

        info!(url = %self.endpoint_url, entries = changelog.entries.len(), "changelog posted");
        Ok(())
    }
}
