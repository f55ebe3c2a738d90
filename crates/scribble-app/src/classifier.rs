//! Classification service client.

use crate::config::ClassifierConfig;
use scribble_core::{Prediction, PredictRequest, PredictResponse};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Classification errors.
///
/// Callers treat every variant the same way; the distinction only feeds the
/// log line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned status {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for classification.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Boxed future returned by [`Classifier`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external service that turns a bitmap into a label.
pub trait Classifier: Send + Sync {
    /// Submit one request. No retries.
    fn classify(&self, request: PredictRequest) -> BoxFuture<'_, ClassifyResult<Prediction>>;
}

/// Classifier reached over HTTP with a JSON POST.
pub struct HttpClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    /// Create a client for the configured endpoint.
    pub fn new(config: ClassifierConfig) -> ClassifyResult<Self> {
        Self::with_builder(config, reqwest::Client::builder())
    }

    /// Create a client from a caller-prepared builder (proxies, TLS roots).
    /// The configured timeout is applied on top.
    pub fn with_builder(
        config: ClassifierConfig,
        mut builder: reqwest::ClientBuilder,
    ) -> ClassifyResult<Self> {
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClassifyError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Classifier for HttpClassifier {
    fn classify(&self, request: PredictRequest) -> BoxFuture<'_, ClassifyResult<Prediction>> {
        Box::pin(async move {
            log::debug!("POST {}", self.config.endpoint);
            let response = self
                .client
                .post(self.config.endpoint.clone())
                .json(&request)
                .send()
                .await
                .map_err(|e| ClassifyError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ClassifyError::Status(status.as_u16()));
            }

            let body: PredictResponse = response
                .json()
                .await
                .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;
            Ok(body.prediction)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubServer, init_logging};
    use scribble_core::DataUri;

    fn request() -> PredictRequest {
        PredictRequest::new(&DataUri::png(vec![0x89, 0x50, 0x4E, 0x47]))
    }

    fn classifier_for(server: &StubServer) -> HttpClassifier {
        let config = ClassifierConfig::from_base_url(&server.base_url).unwrap();
        HttpClassifier::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_posts_json_to_predict() {
        init_logging();
        let server = StubServer::start(vec![(200, r#"{"prediction":"hand"}"#)]).await;
        let classifier = classifier_for(&server);

        let prediction = classifier.classify(request()).await.unwrap();
        assert_eq!(prediction.as_str(), Some("hand"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/predict");
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(requests[0].body["image"], "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_error_status() {
        init_logging();
        let server = StubServer::start(vec![(500, r#"{"error":"Model is not loaded"}"#)]).await;
        let classifier = classifier_for(&server);

        let result = classifier.classify(request()).await;
        assert_eq!(result, Err(ClassifyError::Status(500)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        init_logging();
        let server = StubServer::start(vec![(200, "<html>oops</html>"), (200, r#"{"label":"x"}"#)]).await;
        let classifier = classifier_for(&server);

        assert!(matches!(
            classifier.classify(request()).await,
            Err(ClassifyError::MalformedResponse(_))
        ));
        assert!(matches!(
            classifier.classify(request()).await,
            Err(ClassifyError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        init_logging();
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClassifierConfig::from_base_url(&format!("http://{}", addr)).unwrap();
        let classifier = HttpClassifier::new(config).unwrap();

        assert!(matches!(
            classifier.classify(request()).await,
            Err(ClassifyError::Network(_))
        ));
    }

    #[test]
    fn test_client_setup_failure() {
        let config = ClassifierConfig::from_base_url("localhost:5000").unwrap();
        let builder = reqwest::Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_3)
            .max_tls_version(reqwest::tls::Version::TLS_1_2);

        assert!(matches!(
            HttpClassifier::with_builder(config, builder),
            Err(ClassifyError::Client(_))
        ));
    }
}
