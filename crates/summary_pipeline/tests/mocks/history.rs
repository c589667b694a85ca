use std::sync::{Arc, Mutex};

use summary_pipeline::{HistoryEntry, HistorySink, SummaryResult};

#[derive(Debug, Clone)]
pub struct RecordedHistory {
    pub identity: String,
    pub url: String,
    pub result: SummaryResult,
}

#[derive(Clone, Default)]
pub struct MockHistory {
    pub recorded: Arc<Mutex<Vec<RecordedHistory>>>,
    pub fail_with: Option<String>,
}

impl MockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            recorded: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl HistorySink for MockHistory {
    async fn record(&self, entry: HistoryEntry<'_>) -> anyhow::Result<()> {
        if let Some(ref msg) = self.fail_with {
            anyhow::bail!("{}", msg);
        }
        self.recorded.lock().unwrap().push(RecordedHistory {
            identity: entry.identity.to_string(),
            url: entry.request.url.clone(),
            result: entry.result.clone(),
        });
        Ok(())
    }
}
