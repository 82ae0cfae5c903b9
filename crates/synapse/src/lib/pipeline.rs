pub mod builder;

use crate::{
    article::ArticleLoader,
    catalog::ModelCatalog,
    error::Error,
    prompt::{build_prompt, Task},
    types::{SummarizeRequest, SummaryResponse, TranslateRequest, TranslationResponse},
    yt::TranscriptFetcher,
    InputAcquirer, ModelInvoker,
};

/// The summarize / translate request pipeline:
/// acquire text, build the prompt, invoke the model.
#[derive(Debug)]
pub struct Synapse<T, A, M>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    acquirer: InputAcquirer<T, A>,
    invoker: M,
    catalog: ModelCatalog,
}

impl<T, A, M> Synapse<T, A, M>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    pub fn new(acquirer: InputAcquirer<T, A>, invoker: M, catalog: ModelCatalog) -> Self {
        Synapse {
            acquirer,
            invoker,
            catalog,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    #[tracing::instrument(
        skip(self, req),
        fields(input_type = req.input_type.as_str(), language = %req.language, model = ?req.model)
    )]
    pub async fn summarize(&self, req: &SummarizeRequest) -> Result<SummaryResponse, Error> {
        let text = self
            .acquirer
            .acquire_text(req.input_type, &req.input_value)
            .await?;

        let prompt = build_prompt(
            Task::Summarize {
                language: &req.language,
            },
            &text,
        )?;

        let model = self.catalog.resolve(req.model.as_deref());
        let summary = self
            .invoker
            .invoke(&prompt, model)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        tracing::info!(model = model.identifier, chars = summary.len(), "Summarized content");
        Ok(SummaryResponse { summary })
    }

    #[tracing::instrument(skip(self, req), fields(language = %req.target_translate_language))]
    pub async fn translate(&self, req: &TranslateRequest) -> Result<TranslationResponse, Error> {
        let prompt = build_prompt(
            Task::Translate {
                language: &req.target_translate_language,
            },
            &req.text,
        )?;

        let model = self.catalog.default_model();
        let translated_text = self
            .invoker
            .invoke(&prompt, model)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to translate content"))?;

        tracing::info!(model = model.identifier, chars = translated_text.len(), "Translated content");
        Ok(TranslationResponse { translated_text })
    }
}
