pub mod youtube;

use std::future::Future;

use crate::error::Error;
use crate::types::{SourceType, Transcript};

/// Maps a source URL to a [`Transcript`].
///
/// Fails with [`Error::InvalidUrl`] when the URL cannot be normalized to
/// the provider's identifier shape and [`Error::TranscriptUnavailable`]
/// when the content's captions cannot be retrieved.
pub trait TranscriptProvider {
    fn fetch_transcript(
        &self,
        source: SourceType,
        url: &str,
    ) -> impl Future<Output = Result<Transcript, Error>> + Send;
}

/// Closed dispatch from a [`SourceType`] to its provider implementation.
#[derive(Debug, Clone)]
pub struct SourceRouter {
    youtube: youtube::YouTubeProvider,
}

impl SourceRouter {
    pub fn new(youtube: youtube::YouTubeProvider) -> Self {
        SourceRouter { youtube }
    }
}

impl TranscriptProvider for SourceRouter {
    async fn fetch_transcript(&self, source: SourceType, url: &str) -> Result<Transcript, Error> {
        match source {
            SourceType::Youtube => self.youtube.fetch_transcript(url).await,
        }
    }
}
