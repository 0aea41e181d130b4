//! Remote client facade.
//!
//! Performs the same logical search against a remote engine instance over
//! its HTTP API, for callers without direct store access. Search is
//! advisory, so every transport problem (connect failure, timeout,
//! non-success status, body parse) degrades to an empty envelope with a
//! logged diagnostic instead of propagating.

use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::error::SearchError;
use crate::model::types::{SearchQuery, SearchResultEnvelope};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RemoteClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Runs the query against the remote engine. Never fails: transport
    /// errors yield an empty envelope.
    pub fn search(&self, query: &SearchQuery) -> SearchResultEnvelope {
        match self.try_search(query) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(url = %self.base_url, error = %err, "remote search failed");
                SearchResultEnvelope::default()
            }
        }
    }

    fn try_search(&self, query: &SearchQuery) -> Result<SearchResultEnvelope, SearchError> {
        let url = format!("{}/api/search-conversations", self.base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("limit", query.limit.to_string()),
            ("conversation_type", query.conversation_type.as_str().to_string()),
            ("logic", query.logic.as_str().to_string()),
        ];
        if let Some(project) = &query.project {
            params.push(("project", project.clone()));
        }
        if !query.keywords.is_empty() {
            params.push(("keywords", query.keywords.join(",")));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Transport(format!(
                "{url} returned status {status}"
            )));
        }

        response
            .json::<SearchResultEnvelope>()
            .map_err(|e| SearchError::Transport(format!("invalid response body: {e}")))
    }
}
