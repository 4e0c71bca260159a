//! HTTP word source for the experiment backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::instrument;

use wordslide_core::error::SourceError;
use wordslide_core::model::{ExperimentWords, RatingRecord};
use wordslide_core::traits::WordSource;

/// Word source backed by the REST endpoints under `/api/experiments`.
pub struct HttpWordSource {
    base_url: Url,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpWordSource {
    /// Create a source for `base_url`. Requests have no timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("invalid base URL '{base_url}': {e}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("invalid base URL '{base_url}': cannot be a base");
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn transport_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.timeout.map_or(0, |t| t.as_millis() as u64))
        } else if e.is_connect() {
            SourceError::Network(format!(
                "experiment backend not reachable at {}",
                self.base_url
            ))
        } else {
            SourceError::Network(e.to_string())
        }
    }

    async fn check_status(
        response: reqwest::Response,
        experiment_id: &str,
    ) -> Result<reqwest::Response, SourceError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(experiment_id.to_string()));
        }
        if status.is_client_error() || status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl WordSource for HttpWordSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_experiment(&self, experiment_id: &str) -> anyhow::Result<ExperimentWords> {
        let url = self.endpoint(&["api", "experiments", experiment_id]);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_status(response, experiment_id).await?;

        let words: ExperimentWords = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(format!("failed to parse experiment words: {e}")))?;
        tracing::debug!(words = words.words.len(), "fetched experiment");
        Ok(words)
    }

    #[instrument(skip(self, record), fields(word = %record.current_word))]
    async fn submit_rating(
        &self,
        experiment_id: &str,
        record: &RatingRecord,
    ) -> anyhow::Result<()> {
        let url = self.endpoint(&["api", "experiments", "ratings", experiment_id]);
        let response = self
            .client
            .post(url)
            .json(record)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::check_status(response, experiment_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wordslide_core::model::{Slider, SliderValues};

    #[tokio::test]
    async fn fetches_experiment_words() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "seedWord": "tree",
            "words": [{"id": 1, "word": "forest"}, {"id": 2, "word": "leaf"}]
        });

        Mock::given(method("GET"))
            .and(path("/api/experiments/e1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let source = HttpWordSource::new(&server.uri(), None).unwrap();
        let words = source.fetch_experiment("e1").await.unwrap();
        assert_eq!(
            words.word_list().iter().collect::<Vec<_>>(),
            ["tree", "forest", "leaf"]
        );
        assert_eq!(words.words[0].id, "1");
    }

    #[tokio::test]
    async fn posts_rating_payload() {
        let server = MockServer::start().await;

        let mut values = SliderValues::default();
        values.set(Slider::NegativePositive, -0.5);
        values.set(Slider::Relevance, 0.75);
        let record = RatingRecord::new("tree", "forest", &values);

        Mock::given(method("POST"))
            .and(path("/api/experiments/ratings/e1"))
            .and(body_json(serde_json::json!({
                "prevWord": "tree",
                "currentWord": "forest",
                "negativePositive": -0.5,
                "relevance": 0.75,
                "timePerspective": 0.0
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpWordSource::new(&server.uri(), None).unwrap();
        source.submit_rating("e1", &record).await.unwrap();
    }

    #[tokio::test]
    async fn missing_experiment_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/experiments/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = HttpWordSource::new(&server.uri(), None).unwrap();
        let err = source.fetch_experiment("nope").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::NotFound(id)) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn server_error_on_submit() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/experiments/ratings/e1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let source = HttpWordSource::new(&server.uri(), None).unwrap();
        let record = RatingRecord::new("", "forest", &SliderValues::default());
        let err = source.submit_rating("e1", &record).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
        assert!(err.to_string().contains("database down"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/experiments/e1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let source = HttpWordSource::new(&server.uri(), None).unwrap();
        let err = source.fetch_experiment("e1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/experiments/e1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"seedWord": "tree", "words": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let source = HttpWordSource::new(&server.uri(), Some(Duration::from_millis(200))).unwrap();
        let err = source.fetch_experiment("e1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Timeout(200))
        ));
        assert_eq!(err.to_string(), "request timed out after 200ms");
    }

    #[test]
    fn endpoint_encodes_experiment_id_and_keeps_base_path() {
        let source = HttpWordSource::new("http://localhost:3000/lab/", None).unwrap();
        let url = source.endpoint(&["api", "experiments", "a b/c"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/lab/api/experiments/a%20b%2Fc"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(HttpWordSource::new("not a url", None).is_err());
        assert!(HttpWordSource::new("mailto:someone@example.com", None).is_err());
    }
}
