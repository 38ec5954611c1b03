//! Audit document loading from the upstream audit producer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use elevora_core::{AuditDocument, AuditEnvelope, AuditRequest};
use reqwest::blocking::Client;

const DEFAULT_AUDIT_ENDPOINT: &str = "http://localhost:8000/audit";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Sample document served in mock mode.
const SAMPLE_DOCUMENT: &str = r#"{
    "category_scores": [
        {"category": "Performance", "percentage": 85},
        {"category": "SEO", "percentage": 72},
        {"category": "Accessibility", "percentage": 64},
        {"category": "Best Practices", "percentage": 91},
        {"category": "Content", "percentage": 78}
    ],
    "page_scores": [
        {"url": "https://en.wikipedia.org/wiki/Muhammad_Ali_Jinnah", "percentage": 86},
        {"url": "https://en.wikipedia.org/wiki/Pakistan_Movement", "percentage": 74},
        {"url": "https://en.wikipedia.org/wiki/Partition_of_India", "percentage": 68}
    ],
    "time_series": {"timestamp": 1714918308, "score": 76},
    "issues_by_category": {
        "performance": {
            "images": [
                {"count": 3, "recommendation": "Optimize image size and format"},
                {"count": 2, "recommendation": "Implement lazy loading for below-the-fold images"}
            ],
            "scripts": [{"count": 4, "recommendation": "Defer non-critical JavaScript"}]
        },
        "seo": {
            "meta": [
                {"count": 1, "recommendation": "Missing meta description"},
                {"count": 2, "recommendation": "Improve title tags with primary keywords"}
            ],
            "content": [{"count": 3, "recommendation": "Add alt text to images"}]
        },
        "accessibility": {
            "contrast": [{"count": 5, "recommendation": "Improve text contrast ratios"}],
            "structure": [
                {"count": 2, "recommendation": "Use proper heading hierarchy"},
                {"count": 1, "recommendation": "Add ARIA labels to interactive elements"}
            ]
        }
    }
}"#;

/// Error raised when the producer cannot deliver a document.
#[derive(Debug, Clone)]
pub struct LoadError {
    message: String,
}

impl LoadError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LoadError {}

/// Source of audit documents.
pub trait AuditProducer {
    /// Run one audit and return its document.
    fn fetch(&self, request: &AuditRequest) -> Result<AuditDocument, LoadError>;
}

/// Producer backed by the audit HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpAuditProducer {
    endpoint: String,
    timeout: Duration,
}

impl HttpAuditProducer {
    /// Build a producer for an explicit endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build a producer from environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Self {
        let endpoint = std::env::var("ELEVORA_AUDIT_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_AUDIT_ENDPOINT.to_string());
        let timeout = std::env::var("ELEVORA_AUDIT_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let mut producer = Self::new(endpoint);
        producer.timeout = Duration::from_secs(timeout);
        producer
    }
}

impl AuditProducer for HttpAuditProducer {
    fn fetch(&self, request: &AuditRequest) -> Result<AuditDocument, LoadError> {
        // Built per call: a blocking client must not be created on an async worker.
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| LoadError::new(format!("audit client setup failed: {err}")))?;
        log::info!("requesting audit of {} from {}", request.url, self.endpoint);
        let response = client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|err| LoadError::new(format!("audit request failed: {err}")))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(LoadError::new(format!(
                "audit producer error ({status}): {body}"
            )));
        }
        let envelope: AuditEnvelope = response
            .json()
            .map_err(|err| LoadError::new(format!("audit response decode failed: {err}")))?;
        Ok(envelope.message)
    }
}

/// Producer that always returns the bundled sample document.
#[derive(Debug, Clone, Default)]
pub struct SampleAuditProducer;

impl AuditProducer for SampleAuditProducer {
    fn fetch(&self, request: &AuditRequest) -> Result<AuditDocument, LoadError> {
        log::info!("serving sample audit for {}", request.url);
        AuditDocument::from_json(SAMPLE_DOCUMENT)
            .map_err(|err| LoadError::new(format!("sample document invalid: {err}")))
    }
}

/// Shared document loader used by the handlers.
#[derive(Clone)]
pub struct AuditLoader {
    producer: Arc<dyn AuditProducer + Send + Sync>,
}

impl AuditLoader {
    /// Build a loader serving the bundled sample document.
    pub fn mock() -> Self {
        Self::with_producer(Arc::new(SampleAuditProducer))
    }

    /// Build a loader around an explicit producer.
    pub fn with_producer(producer: Arc<dyn AuditProducer + Send + Sync>) -> Self {
        Self { producer }
    }

    /// Build a loader from environment configuration.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Self {
        let mode = std::env::var("ELEVORA_PRODUCER_MODE").unwrap_or_else(|_| "live".to_string());
        if mode.eq_ignore_ascii_case("mock") {
            return Self::mock();
        }
        Self::with_producer(Arc::new(HttpAuditProducer::from_env()))
    }

    /// Fetch one document.
    pub fn load(&self, request: &AuditRequest) -> Result<AuditDocument, LoadError> {
        self.producer.fetch(request)
    }
}
