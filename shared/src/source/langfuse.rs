//! Langfuse public API client.
//!
//! Reads traces and observations over `GET /api/public/...` with basic auth
//! (public key as user, secret key as password).

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use reqwest::Url;

use super::{ObservationQuery, SourceError, TraceQuery, TraceSource};
use crate::config::LangfuseConfig;
use crate::models::{Observation, Trace};

/// Upper bound on observation pages fetched for one trace.
const MAX_PAGES: u32 = 50;

/// One page of a Langfuse list endpoint.
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    page: u32,
    total_pages: u32,
}

/// HTTP client for the Langfuse public API.
#[derive(Debug, Clone)]
pub struct LangfuseClient {
    client: reqwest::Client,
    base_url: Url,
    public_key: String,
    secret_key: String,
    page_size: u32,
}

impl LangfuseClient {
    /// Creates a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path or the HTTP
    /// client cannot be built.
    pub fn new(config: &LangfuseConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| SourceError::InvalidUrl(config.base_url.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("llmscope/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            "Langfuse client initialized"
        );

        Ok(Self {
            client,
            base_url,
            public_key: config.public_key.clone(),
            secret_key: config.secret_key.clone(),
            page_size: config.page_size,
        })
    }

    /// Builds `{base}/api/public/{segments...}`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "public"])
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body.
    ///
    /// A 404 answer yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, String)],
    ) -> Result<Option<T>, SourceError> {
        let url = self.url(path)?;
        let resp = self
            .client
            .get(url.clone())
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, String)],
    ) -> Result<Page<T>, SourceError> {
        // List endpoints never 404 on an empty result; treat one as no data.
        Ok(self.get_json(path, query).await?.unwrap_or(Page {
            data: Vec::new(),
            meta: None,
        }))
    }
}

#[async_trait]
impl TraceSource for LangfuseClient {
    async fn fetch_trace(&self, trace_id: &str) -> Result<Option<Trace>, SourceError> {
        // Dot segments would be dropped from the path and address the list endpoint.
        if matches!(trace_id, "" | "." | "..") {
            return Ok(None);
        }
        self.get_json(&["traces", trace_id], &[]).await
    }

    async fn fetch_traces(&self, query: &TraceQuery) -> Result<Vec<Trace>, SourceError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref name) = query.name {
            params.push(("name", name.clone()));
        }
        if let Some(ref user_id) = query.user_id {
            params.push(("userId", user_id.clone()));
        }
        if let Some(ref session_id) = query.session_id {
            params.push(("sessionId", session_id.clone()));
        }
        if let Some(from) = query.from_timestamp {
            params.push((
                "fromTimestamp",
                from.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        params.push(("orderBy", "timestamp.desc".to_string()));

        let page: Page<Trace> = self.get_page(&["traces"], &params).await?;
        tracing::debug!(count = page.data.len(), "Fetched traces");
        Ok(page.data)
    }

    async fn fetch_observations(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, SourceError> {
        let mut observations = Vec::new();
        let mut page = 1;

        loop {
            let mut params = vec![
                ("traceId", query.trace_id.clone()),
                ("page", page.to_string()),
                ("limit", self.page_size.to_string()),
            ];
            if let Some(ref user_id) = query.user_id {
                params.push(("userId", user_id.clone()));
            }

            let batch: Page<Observation> = self.get_page(&["observations"], &params).await?;
            let received = batch.data.len();
            observations.extend(batch.data);

            let more = batch
                .meta
                .is_some_and(|meta| meta.page < meta.total_pages);
            if !more || received == 0 {
                break;
            }
            if page >= MAX_PAGES {
                tracing::warn!(
                    trace_id = %query.trace_id,
                    pages = page,
                    "Observation listing truncated"
                );
                break;
            }
            page += 1;
        }

        tracing::debug!(
            trace_id = %query.trace_id,
            count = observations.len(),
            "Fetched observations"
        );
        Ok(observations)
    }
}
