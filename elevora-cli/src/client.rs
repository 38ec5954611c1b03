//! Audit producer client for the Elevora CLI.

use crate::CliResult;
use clap::Args;
use elevora_core::{AuditDocument, AuditEnvelope, AuditRequest};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const DEFAULT_AUDIT_ENDPOINT: &str = "http://localhost:8000/audit";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// CLI arguments for running a fresh audit.
#[derive(Args, Clone, Debug)]
pub struct FetchArgs {
    /// Website URL to audit.
    #[arg(long)]
    pub url: String,
    /// Maximum URLs crawled per domain.
    #[arg(long, default_value_t = 3)]
    pub max_urls_per_domain: u32,
    /// Maximum pages audited.
    #[arg(long, default_value_t = 2)]
    pub max_pages: u32,
    /// Audit producer endpoint.
    #[arg(long, env = "ELEVORA_AUDIT_ENDPOINT", default_value = DEFAULT_AUDIT_ENDPOINT)]
    pub endpoint: String,
}

impl FetchArgs {
    fn to_request(&self) -> CliResult<AuditRequest> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err("url is required".into());
        }
        let mut request = AuditRequest::new(url);
        request.max_urls_per_domain = self.max_urls_per_domain;
        request.max_pages = self.max_pages;
        Ok(request)
    }
}

/// Trim an endpoint and reject blank values.
fn normalize_endpoint(endpoint: &str) -> CliResult<String> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err("audit endpoint is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// HTTP client abstraction for the audit producer.
pub trait AuditClient {
    /// Run one audit and return the document it produced.
    fn run_audit<'a>(
        &'a self,
        endpoint: &'a str,
        request: &'a AuditRequest,
    ) -> Pin<Box<dyn Future<Output = CliResult<AuditDocument>> + Send + 'a>>;
}

/// Reqwest-backed audit client.
#[cfg_attr(test, allow(dead_code))]
pub struct ReqwestAuditClient {
    client: Client,
}

impl ReqwestAuditClient {
    /// Build a new reqwest audit client.
    #[cfg_attr(test, allow(dead_code))]
    pub fn new() -> CliResult<Self> {
        let client = Client::builder()
            .user_agent("elevora-cli")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl AuditClient for ReqwestAuditClient {
    fn run_audit<'a>(
        &'a self,
        endpoint: &'a str,
        request: &'a AuditRequest,
    ) -> Pin<Box<dyn Future<Output = CliResult<AuditDocument>> + Send + 'a>> {
        Box::pin(post_audit(&self.client, endpoint, request))
    }
}

/// Post an audit request and unwrap the producer envelope.
#[cfg_attr(test, allow(dead_code))]
async fn post_audit(
    client: &Client,
    endpoint: &str,
    request: &AuditRequest,
) -> CliResult<AuditDocument> {
    let response = client
        .post(endpoint)
        .json(request)
        .send()
        .await?
        .error_for_status()?;
    let envelope = response.json::<AuditEnvelope>().await?;
    Ok(envelope.message)
}

/// Run an audit through the given client.
pub async fn fetch_document_with<C: AuditClient>(
    args: &FetchArgs,
    client: &C,
) -> CliResult<AuditDocument> {
    let endpoint = normalize_endpoint(&args.endpoint)?;
    let request = args.to_request()?;
    log::info!("auditing {} via {endpoint}", request.url);
    client.run_audit(&endpoint, &request).await
}
