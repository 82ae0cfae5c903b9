//! # Article loader
//!
//! Fetches a web page and reduces its `<body>` to readable text.

use std::{future::Future, ops::Deref, sync::LazyLock};

use scraper::{Html, Node, Selector};

use crate::error::FetchError;

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

pub trait ArticleLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

impl<T: ArticleLoader + Send + Sync> ArticleLoader for &T {
    async fn load(&self, url: &str) -> Result<String, FetchError> {
        (**self).load(url).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpArticleLoader(pub reqwest::Client);

impl Deref for HttpArticleLoader {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HttpArticleLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self(client)
    }
}

impl ArticleLoader for HttpArticleLoader {
    #[tracing::instrument(skip(self))]
    async fn load(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let html = resp.text().await?;
        let text = extract_text(&html);

        if text.is_empty() {
            return Err(FetchError::EmptyDocument(url.to_string()));
        }

        tracing::debug!(chars = text.len(), "Extracted article text");
        Ok(text)
    }
}

/// Collects the visible text of the document body, one line per text run.
///
/// Falls back to the whole document when there is no `<body>`.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    root.descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };

            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
            });
            if hidden {
                return None;
            }

            let run = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!run.is_empty()).then_some(run)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
