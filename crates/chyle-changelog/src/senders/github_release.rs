//! GitHub release sender
//!
//! Creates a release for the configured tag, or updates the existing one
//! when `UPDATE` is set. The release body is the rendered template.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use chyle_core::config::GithubReleaseSenderConfig;
use chyle_core::Template;

use super::Sender;
use crate::error::Result;
use crate::http;
use crate::types::Changelog;

/// Release body sent on create and update
#[derive(Debug, Serialize)]
struct ReleasePayload<'a> {
    tag_name: &'a str,
    name: &'a str,
    target_commitish: &'a str,
    body: String,
    draft: bool,
    prerelease: bool,
}

#[derive(Debug, Deserialize)]
struct Release {
    id: u64,
}

pub struct GithubReleaseSender {
    client: Client,
    config: GithubReleaseSenderConfig,
    template: Template,
    releases_url: String,
}

impl GithubReleaseSender {
    pub fn new(config: &GithubReleaseSenderConfig) -> Result<Self> {
        let template = Template::parse(&config.release.template)?;

        Ok(Self {
            client: http::client()?,
            releases_url: format!(
                "{}/repos/{}/{}/releases",
                config.api_url.trim_end_matches('/'),
                config.owner,
                config.repository_name
            ),
            config: config.clone(),
            template,
        })
    }

    fn payload(&self, changelog: &Changelog) -> ReleasePayload<'_> {
        let release = &self.config.release;
        ReleasePayload {
            tag_name: &release.tag_name,
            name: &release.name,
            target_commitish: &release.target_commitish,
            body: self.template.render(&changelog.to_value()),
            draft: release.draft,
            prerelease: release.prerelease,
        }
    }

    /// Release currently attached to the tag, if any
    async fn find_release(&self) -> Result<Option<Release>> {
        let url = format!(
            "{}/tags/{}",
            self.releases_url,
            http::encode_segment(&self.config.release.tag_name)
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", http::token_header(&self.config.oauth_token))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(http::check(response, &url).await?.json().await?))
    }

    async fn create(&self, payload: &ReleasePayload<'_>) -> Result<()> {
        let url = &self.releases_url;
        let response = self
            .client
            .post(url)
            .header("Authorization", http::token_header(&self.config.oauth_token))
            .json(payload)
            .send()
            .await?;
        http::check(response, url).await?;
        info!(tag = payload.tag_name, "release created");
        Ok(())
    }

    async fn update(&self, id: u64, payload: &ReleasePayload<'_>) -> Result<()> {
        let url = format!("{}/{}", self.releases_url, id);
        let response = self
            .client
            .patch(&url)
            .header("Authorization", http::token_header(&self.config.oauth_token))
            .json(payload)
            .send()
            .await?;
        http::check(response, &url).await?;
        info!(tag = payload.tag_name, id, "release updated");
        Ok(())
    }
}

#[async_trait]
impl Sender for GithubReleaseSender {
    fn name(&self) -> &str {
        "githubrelease"
    }

    async fn send(&self, changelog: &Changelog) -> Result<()> {
        let payload = self.payload(changelog);

        if !self.config.release.update {
            return self.create(&payload).await;
        }

        match self.find_release().await? {
            Some(release) => self.update(release.id, &payload).await,
            None => {
                debug!(tag = payload.tag_name, "no release for tag, creating one");
                self.create(&payload).await
            }
        }
    }
}
