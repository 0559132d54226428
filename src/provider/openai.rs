//! OpenAI Chat Completions adapter.

use async_trait::async_trait;

use crate::error::ForgeError;
use crate::models::Vendor;

use super::chat_completions::ChatCompletionsClient;
use super::ProviderAdapter;

pub struct OpenAiAdapter {
    inner: ChatCompletionsClient,
}

impl OpenAiAdapter {
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            inner: ChatCompletionsClient::new(Vendor::OpenAi, model, base_url),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::OpenAi
    }

    fn model_id(&self) -> &str {
        self.inner.model()
    }

    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, ForgeError> {
        self.inner.complete(prompt, api_key).await
    }
}
