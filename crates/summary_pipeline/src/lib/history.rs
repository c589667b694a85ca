use std::future::Future;

use crate::types::{SummarizeRequest, SummaryResult};

/// One durable record of a completed summarize request.
#[derive(Debug, Clone, Copy)]
pub struct HistoryEntry<'a> {
    pub identity: &'a str,
    pub request: &'a SummarizeRequest,
    pub result: &'a SummaryResult,
}

/// Accepts result records for durable logging.
///
/// Fire-and-forget from the pipeline's perspective: a sink failure is
/// logged and never fails the summarize call.
pub trait HistorySink {
    fn record(&self, entry: HistoryEntry<'_>) -> impl Future<Output = anyhow::Result<()>> + Send;
}
