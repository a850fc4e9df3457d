//! Tavily search API adapter.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::instrument;

use strategos_core::{SearchBackend, SearchError, SearchResponse};
use strategos_settings::SearchSettings;

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

pub struct TavilySearch {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    settings: SearchSettings,
    timeout: Duration,
}

impl TavilySearch {
    pub fn new(settings: SearchSettings, api_key: SecretString) -> Self {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("strategos/0.1")
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            settings,
            timeout,
        }
    }

    fn build_body(&self, query: &str) -> Value {
        let mut body = json!({
            "query": query,
            "topic": self.settings.topic,
            "search_depth": self.settings.search_depth,
            "include_answer": self.settings.include_answer,
            "include_raw_content": self.settings.include_raw_content,
        });
        if let Some(country) = &self.settings.country {
            body["country"] = json!(country);
        }
        if !self.settings.include_domains.is_empty() {
            body["include_domains"] = json!(self.settings.include_domains);
        }
        body
    }
}

#[async_trait]
impl SearchBackend for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    #[instrument(skip(self), fields(backend = "tavily"))]
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.build_body(query))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(self.timeout)
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        Ok(SearchResponse::Json(body))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn search(server: &MockServer) -> TavilySearch {
        let settings = SearchSettings {
            base_url: Some(server.uri()),
            ..Default::default()
        };
        TavilySearch::new(settings, SecretString::from("tvly-test"))
    }

    #[test]
    fn body_carries_configured_filters() {
        let s = TavilySearch::new(SearchSettings::default(), SecretString::from("k"));
        let body = s.build_body("lease termination notice");
        assert_eq!(body["query"], "lease termination notice");
        assert_eq!(body["topic"], "news");
        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["country"], "india");
        assert_eq!(body["include_domains"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn country_omitted_when_unset() {
        let settings = SearchSettings {
            country: None,
            include_domains: Vec::new(),
            ..Default::default()
        };
        let s = TavilySearch::new(settings, SecretString::from("k"));
        let body = s.build_body("q");
        assert!(body.get("country").is_none());
        assert!(body.get("include_domains").is_none());
    }

    #[tokio::test]
    async fn search_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test"))
            .and(body_partial_json(json!({ "query": "eviction" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "Rent Control Act applies",
                "results": [{ "url": "https://indiankanoon.org/doc/1/" }]
            })))
            .mount(&server)
            .await;

        let resp = search(&server).search("eviction").await.unwrap();
        let text = resp.into_text();
        assert!(text.contains("Rent Control Act applies"));
        assert!(text.contains("indiankanoon.org"));
    }

    #[tokio::test]
    async fn search_maps_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = search(&server).search("q").await.unwrap_err();
        assert!(matches!(err, SearchError::Api { status: 401, .. }));
    }
}
