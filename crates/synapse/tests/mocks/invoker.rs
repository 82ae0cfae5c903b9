use std::sync::{Arc, Mutex};

use synapse::{catalog::ModelDescriptor, Error, ModelInvoker};

#[derive(Clone)]
pub struct MockInvoker {
    pub reply: String,
    pub fail_with: Option<String>,
    pub has_credential: bool,
    /// (prompt, model id) per call
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockInvoker {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail_with: None,
            has_credential: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }

    pub fn without_credential() -> Self {
        Self {
            has_credential: false,
            ..Self::new("")
        }
    }
}

impl ModelInvoker for MockInvoker {
    async fn invoke(&self, prompt: &str, model: &ModelDescriptor) -> Result<String, Error> {
        if !self.has_credential {
            return Err(Error::MissingCredential);
        }

        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.identifier.to_string()));

        if let Some(ref msg) = self.fail_with {
            return Err(Error::Model {
                message: msg.clone(),
                details: Some("HTTP status 503".into()),
            });
        }
        Ok(self.reply.clone())
    }
}
