//! # Presentation layer
//!
//! A single page form driving one summarize / translate flow at a time.
//! [`FlowState`] is the whole page state; the server renders it into html and
//! the browser posts it back through hidden fields, so nothing is kept
//! between requests.

pub mod markdown;
pub mod page;

use serde::Serialize;

use crate::types::{InputKind, SummarizeRequest, TranslateRequest};

pub const OUTPUT_LANGUAGES: &[&str] = &["English", "Vietnamese", "Japanese", "Chinese"];
pub const DEFAULT_OUTPUT_LANGUAGE: &str = "English";
pub const DEFAULT_TRANSLATE_LANGUAGE: &str = "Vietnamese";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Summarizing,
    Summarized,
    Translating,
    Translated,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Summarizing | Phase::Translating)
    }
}

/// User editable form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub input_kind: InputKind,
    pub input_value: String,
    pub language: String,
    pub model: String,
    pub target_language: String,
}

impl FormFields {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            input_kind: InputKind::default(),
            input_value: String::new(),
            language: DEFAULT_OUTPUT_LANGUAGE.to_string(),
            model: default_model.into(),
            target_language: DEFAULT_TRANSLATE_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Another request is already in progress")]
    Busy,
    #[error("There is no summary to translate yet")]
    NothingToTranslate,
    #[error("No request is in progress")]
    NotInProgress,
}

/// State of one browser session's flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    pub phase: Phase,
    pub form: FormFields,
    pub summary: Option<String>,
    pub translation: Option<String>,
    pub error: Option<String>,
}

impl FlowState {
    pub fn new(form: FormFields) -> Self {
        Self {
            phase: Phase::Idle,
            form,
            summary: None,
            translation: None,
            error: None,
        }
    }

    /// Rebuilds a settled state from values posted back by the page.
    pub fn restore(form: FormFields, summary: Option<String>, translation: Option<String>) -> Self {
        let summary = summary.filter(|s| !s.is_empty());
        let translation = translation.filter(|t| !t.is_empty() && summary.is_some());

        let phase = match (&summary, &translation) {
            (Some(_), Some(_)) => Phase::Translated,
            (Some(_), None) => Phase::Summarized,
            _ => Phase::Idle,
        };

        Self {
            phase,
            form,
            summary,
            translation,
            error: None,
        }
    }

    pub fn can_summarize(&self) -> bool {
        !self.phase.is_busy()
    }

    pub fn can_translate(&self) -> bool {
        !self.phase.is_busy() && self.summary.is_some()
    }

    /// Idle/Summarized/Translated -> Summarizing
    pub fn begin_summarize(&mut self) -> Result<SummarizeRequest, TransitionError> {
        if !self.can_summarize() {
            return Err(TransitionError::Busy);
        }

        self.phase = Phase::Summarizing;
        self.error = None;

        Ok(SummarizeRequest {
            input_type: self.form.input_kind,
            input_value: self.form.input_value.clone(),
            language: self.form.language.clone(),
            model: Some(self.form.model.clone()),
        })
    }

    /// Summarizing -> Summarized, or Idle with an error.
    ///
    /// A new summary invalidates any earlier translation. On failure the
    /// previous summary and translation stay on the page.
    pub fn finish_summarize(&mut self, outcome: Result<String, String>) -> Result<(), TransitionError> {
        if self.phase != Phase::Summarizing {
            return Err(TransitionError::NotInProgress);
        }

        match outcome {
            Ok(summary) => {
                self.summary = Some(summary);
                self.translation = None;
                self.phase = Phase::Summarized;
            }
            Err(message) => self.fail(message),
        }
        Ok(())
    }

    /// Summarized/Translated -> Translating
    pub fn begin_translate(&mut self) -> Result<TranslateRequest, TransitionError> {
        if self.phase.is_busy() {
            return Err(TransitionError::Busy);
        }
        let Some(summary) = self.summary.clone() else {
            return Err(TransitionError::NothingToTranslate);
        };

        self.phase = Phase::Translating;
        self.error = None;

        Ok(TranslateRequest {
            text: summary,
            target_translate_language: self.form.target_language.clone(),
        })
    }

    /// Translating -> Translated, or Idle with an error.
    pub fn finish_translate(&mut self, outcome: Result<String, String>) -> Result<(), TransitionError> {
        if self.phase != Phase::Translating {
            return Err(TransitionError::NotInProgress);
        }

        match outcome {
            Ok(translation) => {
                self.translation = Some(translation);
                self.phase = Phase::Translated;
            }
            Err(message) => self.fail(message),
        }
        Ok(())
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(phase = ?self.phase, %message, "Flow failed");
        self.phase = Phase::Idle;
        self.error = Some(message);
    }
}
