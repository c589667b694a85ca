use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use serde::Deserialize;

use crate::error::Error;
use crate::types::Transcript;

static WATCH_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/watch\?(?:[^#\s]*&)?v=([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .unwrap()
});
static SHORT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").unwrap());
static EMBED_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/embed/([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").unwrap()
});

static PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\})\s*;\s*(?:var\s|</script>)")
        .unwrap()
});

/// Extracts the 11-character video id from the URL shapes YouTube serves:
/// `watch?v=`, `youtu.be/` and `/embed/`. Anything else is rejected.
pub fn extract_video_id(url: &str) -> Result<String, Error> {
    for pattern in [&*WATCH_URL_RE, &*SHORT_URL_RE, &*EMBED_URL_RE] {
        if let Some(captures) = pattern.captures(url) {
            return Ok(captures[1].to_string());
        }
    }
    Err(Error::InvalidUrl {
        url: url.to_string(),
    })
}

/// Fetches a video's caption track and joins it into a [`Transcript`].
///
/// Works off the watch page's embedded player response, preferring a
/// manually authored track in the configured language and falling back to
/// auto-generated captions. Timing metadata is discarded.
#[derive(Debug, Clone)]
pub struct YouTubeProvider {
    client: reqwest::Client,
    language: String,
    timeout: Duration,
}

impl YouTubeProvider {
    const WATCH_BASE_URL: &str = "https://www.youtube.com/watch";

    pub fn new(language: impl Into<String>, timeout: Duration) -> Self {
        YouTubeProvider {
            client: reqwest::Client::new(),
            language: language.into(),
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_transcript(&self, url: &str) -> Result<Transcript, Error> {
        let video_id = extract_video_id(url)?;

        let watch_url = format!("{}?v={}", Self::WATCH_BASE_URL, video_id);
        let html = self
            .get_text(&watch_url)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %video_id, "Failed to load watch page"))
            .map_err(|e| unavailable(&video_id, format!("failed to load watch page: {e}")))?;

        let player_response = extract_player_response(&html)
            .ok_or_else(|| unavailable(&video_id, "no player response in watch page".into()))?;

        if let Some(status) = player_response.playability_status {
            if status.status.as_deref() != Some("OK") {
                let reason = status
                    .reason
                    .unwrap_or_else(|| "video is not playable".into());
                return Err(unavailable(&video_id, reason));
            }
        }

        let tracks = player_response
            .captions
            .map(|c| c.renderer.caption_tracks)
            .unwrap_or_default();
        let track = select_track(&tracks, &self.language)
            .ok_or_else(|| unavailable(&video_id, "no caption track available".into()))?;

        tracing::debug!(
            %video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let timed_text_url = format!("{}&fmt=json3", track.base_url);
        let raw = self
            .get_text(&timed_text_url)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %video_id, "Failed to fetch captions"))
            .map_err(|e| unavailable(&video_id, format!("failed to fetch caption track: {e}")))?;

        let timed_text: TimedText = serde_json::from_str(&raw)
            .map_err(|e| unavailable(&video_id, format!("malformed caption payload: {e}")))?;

        Ok(join_transcript(
            timed_text,
            Some(track.language_code.clone()),
        ))
    }

    async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

fn unavailable(video_id: &str, reason: String) -> Error {
    Error::TranscriptUnavailable {
        video_id: video_id.to_string(),
        reason,
    }
}

fn extract_player_response(html: &str) -> Option<PlayerResponse> {
    PLAYER_RESPONSE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .and_then(|m| serde_json::from_str(m.as_str()).ok())
}

fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code.starts_with(language) && !t.is_generated())
        .or_else(|| tracks.iter().find(|t| !t.is_generated()))
        .or_else(|| tracks.iter().find(|t| t.language_code.starts_with(language)))
        .or_else(|| tracks.first())
}

fn join_transcript(timed_text: TimedText, language: Option<String>) -> Transcript {
    let mut segments = Vec::new();
    for event in timed_text.events {
        let text = event
            .segs
            .iter()
            .filter_map(|seg| seg.utf8.as_deref())
            .collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            segments.push(text);
        }
    }

    Transcript {
        segment_count: segments.len(),
        text: segments.join(" "),
        language,
    }
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    renderer: CaptionsRenderer,
}

#[derive(Debug, Deserialize, Default)]
struct CaptionsRenderer {
    #[serde(rename = "captionTracks", default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    utf8: Option<String>,
}
