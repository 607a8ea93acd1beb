use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::cin7::{auth::encode_basic_auth, error::UpstreamError, traits::FulfillmentPlatform};
use crate::config::Cin7Config;
use crate::error::AppResult;
use crate::orders::models::{FailedUpdate, RemoteOrder, UpdateReport, UpdateRequest};
use crate::retry::RetryPolicy;
use crate::sync::date_range::DateRange;

/// Fields requested on every sales order read
const ORDER_FIELDS: &str = "id,createdDate,reference,dispatchedDate";

/// Per-item result returned by Cin7 for batched writes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cin7ItemResult {
    pub index: Option<usize>,
    #[serde(default)]
    pub success: bool,
    pub id: Option<i64>,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl Cin7ItemResult {
    fn failure_reason(&self) -> String {
        if self.errors.is_empty() {
            return "rejected by platform".to_string();
        }
        self.errors
            .iter()
            .map(|e| match e {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Cin7 Omni sales order client
pub struct Cin7Client {
    client: Client,
    base_url: String,
    auth_header: String,
    page_size: u32,
    max_pages: u32,
    update_batch_size: usize,
    retry: RetryPolicy,
}

impl Cin7Client {
    pub fn new(config: &Cin7Config, retry: RetryPolicy) -> AppResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: encode_basic_auth(&config.username, &config.password),
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
            update_batch_size: config.update_batch_size.max(1),
            retry,
        })
    }

    fn fetch_query(&self, range: &DateRange, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("fields", ORDER_FIELDS.to_string()),
            (
                "where",
                format!(
                    "CreatedDate>='{}' AND CreatedDate<='{}'",
                    range.start_param(),
                    range.end_param()
                ),
            ),
            ("order", "CreatedDate ASC".to_string()),
            ("page", page.to_string()),
            ("rows", self.page_size.to_string()),
        ]
    }

    async fn fetch_page(&self, range: &DateRange, page: u32) -> Result<Vec<RemoteOrder>, UpstreamError> {
        let endpoint = format!("GET {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .header(AUTHORIZATION, &self.auth_header)
            .query(&self.fetch_query(range, page))
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| UpstreamError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            error!(endpoint = %endpoint, page, status = %status, body = %body, "Order fetch rejected");
            return Err(UpstreamError::Status { endpoint, status, body });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(endpoint = %endpoint, page, body = %body, "Unparseable order page: {}", e);
            UpstreamError::Malformed {
                endpoint,
                message: e.to_string(),
            }
        })
    }

    /// `Ok(None)` means the write was accepted but the per-item body could not be read
    async fn put_chunk(&self, chunk: &[UpdateRequest]) -> Result<Option<Vec<Cin7ItemResult>>, UpstreamError> {
        let endpoint = format!("PUT {}", self.base_url);

        let response = self
            .client
            .put(&self.base_url)
            .header(AUTHORIZATION, &self.auth_header)
            .json(chunk)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| UpstreamError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            error!(endpoint = %endpoint, status = %status, body = %body, "Order update rejected");
            return Err(UpstreamError::Status { endpoint, status, body });
        }

        match serde_json::from_str::<Vec<Cin7ItemResult>>(&body) {
            Ok(results) => Ok(Some(results)),
            Err(e) => {
                warn!(
                    endpoint = %endpoint,
                    status = %status,
                    body = %body,
                    "Update accepted but per-item results unreadable ({}), counting chunk as updated",
                    e
                );
                Ok(None)
            }
        }
    }
}

/// Pair each submitted update with the platform's verdict on it
pub fn report_for_chunk(chunk: &[UpdateRequest], results: Option<&[Cin7ItemResult]>) -> UpdateReport {
    let mut report = UpdateReport::default();

    let Some(results) = results else {
        report.updated = chunk.iter().map(|u| u.id).collect();
        return report;
    };

    for (index, update) in chunk.iter().enumerate() {
        let result = results
            .iter()
            .find(|r| r.index == Some(index))
            .or_else(|| results.iter().find(|r| r.index.is_none() && r.id == Some(update.id.0)));

        match result {
            Some(r) if r.success => report.updated.push(update.id),
            Some(r) => report.failed.push(FailedUpdate {
                id: update.id,
                reason: r.failure_reason(),
            }),
            None => report.failed.push(FailedUpdate {
                id: update.id,
                reason: "no result returned by platform".to_string(),
            }),
        }
    }

    report
}

#[async_trait]
impl FulfillmentPlatform for Cin7Client {
    fn name(&self) -> &'static str {
        "Cin7"
    }

    async fn fetch_orders(&self, range: &DateRange) -> Result<Vec<RemoteOrder>, UpstreamError> {
        let mut orders = Vec::new();

        for page in 1..=self.max_pages {
            let batch = self
                .retry
                .run("cin7.fetch_orders", |_attempt| self.fetch_page(range, page))
                .await?;

            let count = batch.len();
            debug!(page, count, "Fetched order page");
            orders.extend(batch);

            if count < self.page_size as usize {
                info!("✓ Fetched {} orders from Cin7 in {} page(s)", orders.len(), page);
                return Ok(orders);
            }
        }

        warn!(
            max_pages = self.max_pages,
            fetched = orders.len(),
            "Page limit reached while fetching orders, results may be incomplete"
        );
        Ok(orders)
    }

    async fn update_orders(&self, updates: &[UpdateRequest]) -> UpdateReport {
        let mut report = UpdateReport::default();

        for chunk in updates.chunks(self.update_batch_size) {
            let outcome = self
                .retry
                .run("cin7.update_orders", |_attempt| self.put_chunk(chunk))
                .await;

            match outcome {
                Ok(results) => report.merge(report_for_chunk(chunk, results.as_deref())),
                Err(e) => {
                    error!(endpoint = %e.endpoint(), items = chunk.len(), "Update chunk failed: {}", e);
                    report.failed.extend(chunk.iter().map(|u| FailedUpdate {
                        id: u.id,
                        reason: e.to_string(),
                    }));
                }
            }
        }

        info!(
            "✓ Cin7 update finished: {} updated, {} failed",
            report.updated.len(),
            report.failed.len()
        );
        report
    }
}
