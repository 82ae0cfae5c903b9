use std::ops::Deref;

use crate::{
    error::FetchError,
    parser::{parse_timed_text, parse_video_id, WatchPage},
    yt::{TranscriptFetcher, TranscriptSegment},
};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.83 Safari/537.36,gzip(gfe)";

pub const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Transcript source backed by YouTube's watch page and `timedtext` API.
#[derive(Debug, Clone)]
pub struct YoutubeTranscripts {
    client: reqwest::Client,
    watch_url: String,
}

impl Default for YoutubeTranscripts {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl Deref for YoutubeTranscripts {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl YoutubeTranscripts {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            watch_url: WATCH_URL.into(),
        }
    }

    /// Points watch page requests somewhere other than youtube.com.
    pub fn with_watch_url(mut self, url: impl Into<String>) -> Self {
        self.watch_url = url.into();
        self
    }

    async fn get_text(&self, url: &str, language: &str) -> Result<String, FetchError> {
        let resp = self
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT_LANGUAGE, language)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, url, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.text().await?)
    }
}

impl TranscriptFetcher for YoutubeTranscripts {
    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(
        &self,
        video: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        let video_id = parse_video_id(video)?;

        let watch_url = format!("{}?v={}", self.watch_url, video_id);
        let page = WatchPage::from(self.get_text(&watch_url, language).await?);
        let track = page.caption_track(&video_id, language)?;

        let xml = self.get_text(&track.base_url, language).await?;
        let segments = parse_timed_text(&xml);

        if segments.is_empty() {
            return Err(FetchError::EmptyTranscript(video_id));
        }

        Ok(segments)
    }
}
