use async_trait::async_trait;

use crate::cin7::UpstreamError;
use crate::orders::{RemoteOrder, UpdateReport, UpdateRequest};
use crate::sync::DateRange;

/// Read/write access to the fulfillment platform's sales orders
#[async_trait]
pub trait FulfillmentPlatform: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every order created inside `range`, across all pages
    async fn fetch_orders(&self, range: &DateRange) -> Result<Vec<RemoteOrder>, UpstreamError>;

    /// Submit dispatch updates. Failures are reported per item, never as `Err`.
    async fn update_orders(&self, updates: &[UpdateRequest]) -> UpdateReport;
}
