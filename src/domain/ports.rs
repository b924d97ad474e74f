use crate::domain::model::CompletionParams;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A chat-completion backend.
///
/// Implementations send one system turn and one user turn and return the raw
/// generated text. Empty-reply handling and trimming belong to the caller.
/// Failures must already be classified into the provider variants of
/// `RelayError`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Display name used in error messages ("OpenAI", "Gemini", ...).
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        params: &CompletionParams,
    ) -> Result<String>;
}
