use std::sync::{Arc, Mutex};

use summary_pipeline::{provider::TranscriptProvider, Error, SourceType, Transcript};

#[derive(Clone)]
pub struct MockProvider {
    pub transcript_text: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockProvider {
    pub fn new(transcript_text: &str) -> Self {
        Self {
            transcript_text: transcript_text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            transcript_text: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TranscriptProvider for MockProvider {
    async fn fetch_transcript(&self, _source: SourceType, url: &str) -> Result<Transcript, Error> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::TranscriptUnavailable {
                video_id: "mock-video-id".into(),
                reason: msg.clone(),
            });
        }
        Ok(Transcript {
            text: self.transcript_text.clone(),
            segment_count: 1,
            language: Some("en".into()),
        })
    }
}
