use serde::{Deserialize, Serialize};

/// The kind of reference a user submitted for summarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// A YouTube URL or video id
    #[default]
    #[serde(alias = "video")]
    Youtube,
    /// A web page URL
    Article,
    /// Raw text pasted by the user. Unrecognized kinds fall back here.
    #[serde(other)]
    Text,
}

impl InputKind {
    pub const ALL: [InputKind; 3] = [InputKind::Youtube, InputKind::Article, InputKind::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Youtube => "youtube",
            InputKind::Article => "article",
            InputKind::Text => "text",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Youtube => "YouTube",
            InputKind::Article => "Article",
            InputKind::Text => "Text",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            InputKind::Youtube => "Enter YouTube URL",
            InputKind::Article => "Enter article URL",
            InputKind::Text => "Paste your text here",
        }
    }

    pub fn fetch_failure_message(&self) -> &'static str {
        match self {
            InputKind::Youtube => "Failed to fetch YouTube transcript",
            InputKind::Article => "Failed to load article content",
            InputKind::Text => "Failed to read text input",
        }
    }

    /// Lenient parse used for form fields; anything unknown is text.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "youtube" | "video" => InputKind::Youtube,
            "article" => InputKind::Article,
            _ => InputKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub input_type: InputKind,
    pub input_value: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub target_translate_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub translated_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
