use itertools::Itertools;

use crate::types::InputKind;

/// Failures while turning a user supplied reference into plain text.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Invalid YouTube video reference: {0}")]
    InvalidVideoReference(String),
    #[error("YouTube is receiving too many requests from this IP and now requires solving a captcha")]
    TooManyRequests,
    #[error("The video is no longer available ({0})")]
    VideoUnavailable(String),
    #[error("Transcript is disabled on this video ({0})")]
    TranscriptsDisabled(String),
    #[error("No transcripts are available in {language} for this video ({video_id}), available languages: {}", join_languages(.available))]
    LanguageUnavailable {
        language: String,
        video_id: String,
        available: Vec<String>,
    },
    #[error("Transcript for {0} contained no text")]
    EmptyTranscript(String),
    #[error("No transcript could be fetched in any of the attempted languages ({})", join_attempts(.0))]
    Exhausted(Vec<LanguageAttempt>),
    #[error("No readable text found at {0}")]
    EmptyDocument(String),
    #[error("Parse error: {0}")]
    Parse(&'static str),
}

impl FetchError {
    /// Whether the failure is about the video itself, so trying another
    /// caption language cannot help.
    pub fn is_language_independent(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidVideoReference(_)
                | FetchError::TooManyRequests
                | FetchError::VideoUnavailable(_)
        )
    }
}

fn join_languages(languages: &[String]) -> String {
    languages.join(", ")
}

fn join_attempts(attempts: &[LanguageAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.language, a.reason))
        .join("; ")
}

/// A failed transcript attempt for one language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageAttempt {
    pub language: String,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", .kind.fetch_failure_message())]
    Fetch {
        kind: InputKind,
        #[source]
        source: FetchError,
    },
    #[error("Google GenerativeAI API key is not set")]
    MissingCredential,
    #[error("Unknown model: {0}")]
    UnknownModel(String),
    #[error("{message}")]
    Model {
        message: String,
        details: Option<String>,
    },
    #[error("Template error: {0}")]
    Template(#[from] mustache::Error),
}

/// Coarse grouping of [`Error`] used when reporting failures to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Configuration,
    Model,
    Internal,
}

impl Error {
    pub fn fetch(kind: InputKind, source: FetchError) -> Self {
        Error::Fetch { kind, source }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Fetch { .. } => ErrorCategory::Fetch,
            Error::MissingCredential | Error::UnknownModel(_) => ErrorCategory::Configuration,
            Error::Model { .. } => ErrorCategory::Model,
            Error::Template(_) => ErrorCategory::Internal,
        }
    }

    /// Short message suitable for the `error` field of a JSON response.
    pub fn public_message(&self) -> String {
        match self {
            Error::Fetch { kind, .. } => kind.fetch_failure_message().to_string(),
            Error::Model { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Underlying cause, when there is one worth showing.
    pub fn details(&self) -> Option<String> {
        match self {
            Error::Fetch { source, .. } => Some(source.to_string()),
            Error::Model { details, .. } => details.clone(),
            _ => None,
        }
    }
}
