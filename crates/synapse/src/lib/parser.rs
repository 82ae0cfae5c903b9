//! # Yt Parser
//!
//! Extracts caption track listings from YouTube watch pages and turns
//! `timedtext` caption documents into transcript segments.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::{error::FetchError, yt::TranscriptSegment};

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?|shorts|live)/|.*[?&]v=)|youtu\.be/)([^&?/\s]{11})",
    )
    .unwrap()
});

static BARE_VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

static CAPTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"captions":\s*(\{.*?\}),\s*"videoDetails""#).unwrap()
});

static TEXT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("text").unwrap());

/// Pulls the 11 character video id out of a YouTube URL, or accepts a bare id.
pub fn parse_video_id(reference: &str) -> Result<String, FetchError> {
    let reference = reference.trim();

    if BARE_VIDEO_ID_RE.is_match(reference) {
        return Ok(reference.to_string());
    }

    VIDEO_ID_RE
        .captures(reference)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FetchError::InvalidVideoReference(reference.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// Raw html of a `youtube.com/watch` page.
pub struct WatchPage(String);

impl Deref for WatchPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for WatchPage {
    fn from(value: String) -> Self {
        WatchPage(value)
    }
}

impl WatchPage {
    pub fn new(doc: String) -> Self {
        WatchPage(doc)
    }

    /// Lists the caption tracks embedded in the page's player response.
    ///
    /// # Returns
    /// * `Ok(Vec<CaptionTrack>)` with at least one track.
    /// * `Err(FetchError)` describing why no captions are available.
    pub fn caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, FetchError> {
        let Some(raw) = CAPTIONS_RE.captures(self).and_then(|cap| cap.get(1)) else {
            if self.contains(r#"class="g-recaptcha""#) {
                return Err(FetchError::TooManyRequests);
            }
            if !self.contains(r#""playabilityStatus":"#) {
                return Err(FetchError::VideoUnavailable(video_id.to_string()));
            }
            return Err(FetchError::TranscriptsDisabled(video_id.to_string()));
        };

        let captions = serde_json::from_str::<Captions>(raw.as_str())
            .map_err(|_| FetchError::Parse("Failed to decode the captions object of the watch page"))?;

        let tracks = captions
            .player_captions_tracklist_renderer
            .map(|r| r.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(FetchError::TranscriptsDisabled(video_id.to_string()));
        }

        Ok(tracks)
    }

    /// Picks the caption track matching `language` exactly.
    pub fn caption_track(&self, video_id: &str, language: &str) -> Result<CaptionTrack, FetchError> {
        let tracks = self.caption_tracks(video_id)?;

        let available = tracks.iter().map(|t| t.language_code.clone()).collect::<Vec<_>>();

        tracks
            .into_iter()
            .find(|t| t.language_code == language)
            .ok_or_else(|| FetchError::LanguageUnavailable {
                language: language.to_string(),
                video_id: video_id.to_string(),
                available,
            })
    }
}

/// Parses a `timedtext` caption document into segments.
///
/// Segment text has its html entities decoded. Captions commonly arrive
/// double escaped (`&amp;#39;`) so decoding runs until the text is stable.
pub fn parse_timed_text(xml: &str) -> Vec<TranscriptSegment> {
    let document = Html::parse_fragment(xml);

    document
        .select(&TEXT_SELECTOR)
        .filter_map(|node| {
            let offset = node.value().attr("start")?.parse::<f64>().ok()?;
            let duration = node
                .value()
                .attr("dur")
                .and_then(|d| d.parse::<f64>().ok())
                .unwrap_or_default();
            let text = decode_entities(&node.text().collect::<String>());
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

            Some(TranscriptSegment {
                text,
                offset,
                duration,
            })
        })
        .collect()
}

/// Decodes one level of entities per pass until the text stops changing.
/// Decoded `<` and `&` are plain text from then on, never markup.
fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    while decoded.contains('&') {
        let next = html_escape::decode_html_entities(&decoded);
        if next == decoded {
            break;
        }
        decoded = next.into_owned();
    }
    decoded
}
