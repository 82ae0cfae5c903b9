//! Fixed instruction templates wrapped around the acquired text.

use serde::Serialize;

use crate::error::Error;

const SUMMARIZE_TEMPLATE: &str = include_str!("./prompts/summarize.mustache");
const TRANSLATE_TEMPLATE: &str = include_str!("./prompts/translate.mustache");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task<'a> {
    /// Structured markdown summary written in `language`
    Summarize { language: &'a str },
    /// Literal translation into `language`
    Translate { language: &'a str },
}

impl Task<'_> {
    fn template(&self) -> &'static str {
        match self {
            Task::Summarize { .. } => SUMMARIZE_TEMPLATE,
            Task::Translate { .. } => TRANSLATE_TEMPLATE,
        }
    }

    fn language(&self) -> &str {
        match self {
            Task::Summarize { language } | Task::Translate { language } => language,
        }
    }
}

#[derive(Serialize)]
struct PromptContext<'a> {
    language: &'a str,
    text: &'a str,
}

/// Renders the prompt for `task` with `text` appended.
///
/// Values are substituted verbatim, without any escaping.
pub fn build_prompt(task: Task<'_>, text: &str) -> Result<String, Error> {
    let rendered = mustache::compile_str(task.template())?.render_to_string(&PromptContext {
        language: task.language(),
        text,
    })?;

    Ok(rendered)
}
