use std::sync::{Arc, Mutex};

use synapse::{article::ArticleLoader, FetchError};

#[derive(Clone)]
pub struct MockArticleLoader {
    pub text: String,
    pub fail_with: Option<u16>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockArticleLoader {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every load with the given http status.
    pub fn failing(status: u16) -> Self {
        Self {
            text: String::new(),
            fail_with: Some(status),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for MockArticleLoader {
    fn default() -> Self {
        Self::new("")
    }
}

impl ArticleLoader for MockArticleLoader {
    async fn load(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(status) = self.fail_with {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(self.text.clone())
    }
}
