pub mod transcript;

use std::future::Future;

use itertools::Itertools;

use crate::error::{FetchError, LanguageAttempt};

/// Language codes tried, in order, when fetching a transcript.
pub const DEFAULT_TRANSCRIPT_LANGUAGES: &[&str] = &[
    "en", "en-US", "en-GB", "vi", "ja", "ko", "zh-Hans", "zh-Hant", "zh-CN", "zh-TW",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    /// Seconds from the start of the video
    pub offset: f64,
    pub duration: f64,
}

pub trait TranscriptFetcher {
    /// Fetches the transcript of `video` in exactly `language`.
    fn fetch_transcript(
        &self,
        video: &str,
        language: &str,
    ) -> impl Future<Output = Result<Vec<TranscriptSegment>, FetchError>> + Send;
}

impl<T: TranscriptFetcher + Send + Sync> TranscriptFetcher for &T {
    async fn fetch_transcript(
        &self,
        video: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        (**self).fetch_transcript(video, language).await
    }
}

/// Trims each language code and drops blank ones.
pub fn normalize_languages<I, S>(languages: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    languages
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Tries each language in `languages` until one yields a transcript and
/// returns its segments joined by single spaces.
///
/// Fails with [`FetchError::Exhausted`] carrying every attempt when none
/// succeed. A [language independent](FetchError::is_language_independent)
/// failure is returned as is without trying the remaining languages.
#[tracing::instrument(skip(fetcher, languages))]
pub async fn fetch_first_available<T, L>(
    fetcher: &T,
    video: &str,
    languages: &[L],
) -> Result<String, FetchError>
where
    T: TranscriptFetcher + Sync,
    L: AsRef<str> + Sync,
{
    let mut attempts = Vec::with_capacity(languages.len());

    for language in languages.iter().map(AsRef::as_ref) {
        match fetcher.fetch_transcript(video, language).await {
            Ok(segments) if !segments.is_empty() => {
                tracing::info!(language, segments = segments.len(), "Fetched transcript");
                return Ok(segments.iter().map(|s| s.text.as_str()).join(" "));
            }
            Ok(_) => {
                tracing::debug!(language, "Transcript was empty");
                attempts.push(LanguageAttempt {
                    language: language.to_string(),
                    reason: FetchError::EmptyTranscript(video.to_string()).to_string(),
                });
            }
            Err(e) if e.is_language_independent() => {
                tracing::error!(language, error = %e, "Transcript unavailable for the video");
                return Err(e);
            }
            Err(e) => {
                tracing::debug!(language, error = %e, "Transcript attempt failed");
                attempts.push(LanguageAttempt {
                    language: language.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::error!(attempts = attempts.len(), "No transcript available in any language");
    Err(FetchError::Exhausted(attempts))
}
