//! Remote lookup shared by the API decorators
//!
//! An identifier produced earlier by an extractor is used to fetch a JSON
//! document, then each configured `{FIELD, DESTKEY}` pair copies a field
//! of that document into the entry.

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use chyle_core::config::KeyMapping;
use chyle_core::template::lookup_path;

use crate::error::{PipelineError, Result};
use crate::http;
use crate::types::{value_as_string, Entry};

pub(crate) struct RemoteLookup {
    client: Client,
    id_key: &'static str,
    keys: Vec<KeyMapping>,
}

impl RemoteLookup {
    pub(crate) fn new(id_key: &'static str, keys: Vec<KeyMapping>) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            id_key,
            keys,
        })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Identifier the entry carries, if any
    pub(crate) fn entry_id(&self, entry: &Entry) -> Option<String> {
        let id = entry
            .get(self.id_key)
            .and_then(value_as_string)
            .filter(|id| !id.is_empty());
        if id.is_none() {
            debug!(key = self.id_key, "no identifier in entry, skipped");
        }
        id
    }

    /// Send `request` and copy the mapped fields into `entry`
    pub(crate) async fn fetch_into(
        &self,
        mut entry: Entry,
        request: RequestBuilder,
        url: &str,
    ) -> Result<Entry> {
        let response = request.header("Accept", "application/json").send().await?;
        let payload: Value = http::check(response, url).await?.json().await?;

        for mapping in &self.keys {
            let value = lookup_path(&payload, mapping.field.split('.')).ok_or_else(|| {
                PipelineError::MissingField {
                    field: mapping.field.clone(),
                    url: url.to_string(),
                }
            })?;
            entry.insert(mapping.dest_key.clone(), value.clone());
        }

        Ok(entry)
    }
}
