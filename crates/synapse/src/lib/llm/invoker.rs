use std::future::Future;

use crate::{catalog::ModelDescriptor, error::Error};

/// A hosted text generation endpoint: prompt in, generated text out.
pub trait ModelInvoker {
    fn invoke(
        &self,
        prompt: &str,
        model: &ModelDescriptor,
    ) -> impl Future<Output = Result<String, Error>> + Send;
}

impl<T: ModelInvoker + Send + Sync> ModelInvoker for &T {
    async fn invoke(&self, prompt: &str, model: &ModelDescriptor) -> Result<String, Error> {
        (**self).invoke(prompt, model).await
    }
}
