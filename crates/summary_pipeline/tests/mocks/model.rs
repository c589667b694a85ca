use std::sync::{Arc, Mutex};

use summary_pipeline::{Error, ModelSelection, SummaryModel};

#[derive(Debug, Clone)]
pub struct RecordedModelCall {
    pub selection: ModelSelection,
    pub api_key: Option<String>,
    pub max_words: usize,
}

#[derive(Clone)]
pub struct MockModel {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<RecordedModelCall>>>,
    pub fail_with: Option<String>,
}

impl MockModel {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl SummaryModel for MockModel {
    async fn summarize(
        &self,
        selection: &ModelSelection,
        api_key: Option<&str>,
        _transcript: &str,
        max_words: usize,
    ) -> Result<String, Error> {
        self.calls.lock().unwrap().push(RecordedModelCall {
            selection: selection.clone(),
            api_key: api_key.map(str::to_string),
            max_words,
        });
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Upstream {
                provider: "mock".into(),
                status: Some(500),
                message: msg.clone(),
            });
        }
        Ok(self.summary.clone())
    }
}
