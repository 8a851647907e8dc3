//! Keyword document-search client.
//!
//! Talks to an Azure Cognitive Search-style REST index: POST the query to
//! `{endpoint}/indexes/{index}/docs/search` with an `api-key` header and
//! read the hits from the `value` array. Implements [`SnippetSource`] so
//! the pipeline never sees the wire format.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use semagent_shared::config::SearchSettings;
use semagent_shared::{Result, RetrievedSnippet, SemagentError, SnippetSource};

/// REST client for the document-search service.
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
    index: String,
    api_key: String,
    api_version: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for the search REST call.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    top: usize,
}

/// Response envelope: hits live under `value`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchHit>,
}

/// A single search hit. Only `content` matters downstream; document
/// metadata is carried through when the index provides it.
#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    content: String,

    #[serde(default, rename = "metadata_storage_name")]
    source: Option<String>,

    #[serde(default, rename = "@search.score")]
    score: Option<f64>,
}

impl From<SearchHit> for RetrievedSnippet {
    fn from(hit: SearchHit) -> Self {
        Self {
            content: hit.content,
            source: hit.source,
            score: hit.score,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl SearchClient {
    /// Build a client from resolved settings.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|e| SemagentError::config(format!("invalid search endpoint: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("semagent/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SemagentError::Search(format!("client build: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            index: settings.index.clone(),
            api_key: settings.api_key.clone(),
            api_version: settings.api_version.clone(),
        })
    }

    /// URL of the search operation for this client's index.
    fn search_url(&self) -> Result<Url> {
        let mut url = self
            .endpoint
            .join(&format!("indexes/{}/docs/search", self.index))
            .map_err(|e| SemagentError::Search(format!("search URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

#[async_trait]
impl SnippetSource for SearchClient {
    async fn fetch(&self, query: &str, top: usize) -> Result<Vec<RetrievedSnippet>> {
        let url = self.search_url()?;
        debug!(%url, query, top, "querying search index");

        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(&SearchRequest { search: query, top })
            .send()
            .await
            .map_err(|e| SemagentError::Search(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SemagentError::Search(format!("HTTP {status}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SemagentError::Search(format!("response body: {e}")))?;

        debug!(hits = parsed.value.len(), "search returned");
        Ok(parsed.value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> SearchClient {
        SearchClient::new(&SearchSettings {
            endpoint: "https://example.search.windows.net/".into(),
            api_key: "test-key".into(),
            index: "pdf-index".into(),
            api_version: "2023-11-01".into(),
        })
        .expect("build client")
    }

    #[test]
    fn search_url_includes_index_and_api_version() {
        let url = test_client().search_url().expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.search.windows.net/indexes/pdf-index/docs/search?api-version=2023-11-01"
        );
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let result = SearchClient::new(&SearchSettings {
            endpoint: "not a url".into(),
            api_key: "k".into(),
            index: "i".into(),
            api_version: "v".into(),
        });
        assert!(matches!(result, Err(SemagentError::Config { .. })));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_string(&SearchRequest {
            search: "categoria de produtos",
            top: 3,
        })
        .expect("serialize");
        assert_eq!(body, r#"{"search":"categoria de produtos","top":3}"#);
    }

    #[test]
    fn response_hits_deserialize_with_metadata() {
        let json = r#"{
            "@odata.context": "https://example.search.windows.net/$metadata",
            "value": [
                {"@search.score": 1.25, "content": "primeiro trecho", "metadata_storage_name": "relatorio.pdf"},
                {"content": "segundo trecho"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.value.len(), 2);

        let first: RetrievedSnippet = parsed.value.into_iter().next().unwrap().into();
        assert_eq!(first.content, "primeiro trecho");
        assert_eq!(first.source.as_deref(), Some("relatorio.pdf"));
        assert_eq!(first.score, Some(1.25));
    }

    #[test]
    fn response_without_value_is_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(parsed.value.is_empty());
    }
}
