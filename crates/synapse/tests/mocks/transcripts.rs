use std::sync::{Arc, Mutex};

use synapse::{
    yt::{TranscriptFetcher, TranscriptSegment},
    FetchError,
};

/// Serves `segments` for a single language and reports every other one as
/// missing.
#[derive(Clone)]
pub struct MockTranscripts {
    pub language: Option<String>,
    pub segments: Vec<String>,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockTranscripts {
    pub fn new(language: &str, segments: &[&str]) -> Self {
        Self {
            language: Some(language.to_string()),
            segments: segments.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn without_captions() -> Self {
        Self {
            language: None,
            segments: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl TranscriptFetcher for MockTranscripts {
    async fn fetch_transcript(
        &self,
        video: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((video.to_string(), language.to_string()));

        if self.language.as_deref() != Some(language) {
            return Err(FetchError::LanguageUnavailable {
                language: language.to_string(),
                video_id: video.to_string(),
                available: self.language.iter().cloned().collect(),
            });
        }

        Ok(self
            .segments
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment {
                text: text.clone(),
                offset: i as f64,
                duration: 1.0,
            })
            .collect())
    }
}
