use crate::{
    article::ArticleLoader,
    error::Error,
    types::InputKind,
    yt::{
        fetch_first_available, normalize_languages, TranscriptFetcher, DEFAULT_TRANSCRIPT_LANGUAGES,
    },
};

/// Turns a `(kind, value)` pair into the plain text that gets summarized.
#[derive(Debug)]
pub struct InputAcquirer<T, A> {
    transcripts: T,
    articles: A,
    languages: Vec<String>,
}

impl<T, A> InputAcquirer<T, A>
where
    T: TranscriptFetcher + Send + Sync,
    A: ArticleLoader + Send + Sync,
{
    pub fn new(transcripts: T, articles: A) -> Self {
        Self {
            transcripts,
            articles,
            languages: DEFAULT_TRANSCRIPT_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }

    /// Replaces the transcript language priority list. Codes are trimmed
    /// and blank entries dropped.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.languages = normalize_languages(languages);
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    #[tracing::instrument(skip(self, value), fields(chars = value.len()))]
    pub async fn acquire_text(&self, kind: InputKind, value: &str) -> Result<String, Error> {
        match kind {
            InputKind::Youtube => fetch_first_available(&self.transcripts, value, &self.languages)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch YouTube transcript"))
                .map_err(|e| Error::fetch(kind, e)),
            InputKind::Article => self
                .articles
                .load(value.trim())
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Failed to load article content"))
                .map_err(|e| Error::fetch(kind, e)),
            InputKind::Text => Ok(value.to_string()),
        }
    }
}
