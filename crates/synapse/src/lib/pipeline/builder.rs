use crate::{
    article::ArticleLoader,
    catalog::ModelCatalog,
    yt::{normalize_languages, TranscriptFetcher, DEFAULT_TRANSCRIPT_LANGUAGES},
    InputAcquirer, ModelInvoker, Synapse,
};

pub struct SynapseBuilder<T = (), A = (), M = ()> {
    transcripts: T,
    articles: A,
    invoker: M,
    catalog: ModelCatalog,
    languages: Vec<String>,
}

impl SynapseBuilder {
    pub fn new() -> Self {
        Self {
            transcripts: (),
            articles: (),
            invoker: (),
            catalog: ModelCatalog::default(),
            languages: DEFAULT_TRANSCRIPT_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

impl Default for SynapseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A, M> SynapseBuilder<T, A, M> {
    pub fn transcripts<T2: TranscriptFetcher + Send + Sync + 'static>(
        self,
        transcripts: T2,
    ) -> SynapseBuilder<T2, A, M> {
        SynapseBuilder {
            transcripts,
            articles: self.articles,
            invoker: self.invoker,
            catalog: self.catalog,
            languages: self.languages,
        }
    }

    pub fn articles<A2: ArticleLoader + Send + Sync + 'static>(
        self,
        articles: A2,
    ) -> SynapseBuilder<T, A2, M> {
        SynapseBuilder {
            transcripts: self.transcripts,
            articles,
            invoker: self.invoker,
            catalog: self.catalog,
            languages: self.languages,
        }
    }

    pub fn invoker<M2: ModelInvoker + Send + Sync + 'static>(
        self,
        invoker: M2,
    ) -> SynapseBuilder<T, A, M2> {
        SynapseBuilder {
            transcripts: self.transcripts,
            articles: self.articles,
            invoker,
            catalog: self.catalog,
            languages: self.languages,
        }
    }

    pub fn catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn transcript_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.languages = normalize_languages(languages);
        self
    }
}

impl<T, A, M> SynapseBuilder<T, A, M>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    pub fn build(self) -> Synapse<T, A, M> {
        let acquirer =
            InputAcquirer::new(self.transcripts, self.articles).with_languages(self.languages);

        Synapse::new(acquirer, self.invoker, self.catalog)
    }
}
