use crate::core::prompt::SYSTEM_PROMPT;
use crate::domain::model::CompletionParams;
use crate::domain::ports::CompletionProvider;
use crate::utils::error::{RelayError, Result};
use std::sync::Arc;
use std::time::Instant;

/// Turns a problem description into an excuse through the configured provider.
///
/// Holds no mutable state; one instance is shared by every request.
#[derive(Clone)]
pub struct ExcuseEngine {
    provider: Arc<dyn CompletionProvider>,
    params: CompletionParams,
}

impl ExcuseEngine {
    pub fn new(provider: Arc<dyn CompletionProvider>, params: CompletionParams) -> Self {
        Self { provider, params }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    pub async fn generate(&self, problem: Option<&str>) -> Result<String> {
        let problem = problem
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(RelayError::MissingProblem)?;

        tracing::debug!(
            provider = self.provider.name(),
            problem_chars = problem.chars().count(),
            "Generating excuse"
        );
        let started = Instant::now();

        let raw = self
            .provider
            .complete(SYSTEM_PROMPT, problem, &self.params)
            .await?;

        let excuse = raw.trim();
        if excuse.is_empty() {
            return Err(RelayError::EmptyCompletionError {
                provider: self.provider.name().to_string(),
            });
        }

        tracing::info!(
            provider = self.provider.name(),
            latency_ms = started.elapsed().as_millis() as u64,
            excuse_chars = excuse.chars().count(),
            "✅ Generated excuse"
        );
        Ok(excuse.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the calls it receives and answers with a canned result.
    struct FakeProvider {
        reply: std::result::Result<String, fn() -> RelayError>,
        calls: Mutex<Vec<(String, String, CompletionParams)>>,
    }

    impl FakeProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> RelayError) -> Self {
            Self {
                reply: Err(make),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        fn name(&self) -> &str {
            "Fake"
        }

        fn model(&self) -> &str {
            "fake-1"
        }

        async fn complete(
            &self,
            system_prompt: &str,
            user_text: &str,
            params: &CompletionParams,
        ) -> Result<String> {
            self.calls.lock().unwrap().push((
                system_prompt.to_string(),
                user_text.to_string(),
                *params,
            ));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[tokio::test]
    async fn test_generate_trims_provider_text() {
        let provider = Arc::new(FakeProvider::replying("\n  The dog ate my calendar.  \n"));
        let engine = ExcuseEngine::new(provider.clone(), CompletionParams::default());

        let excuse = engine.generate(Some("  I was late  ")).await.unwrap();

        assert_eq!(excuse, "The dog ate my calendar.");
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, SYSTEM_PROMPT);
        assert_eq!(calls[0].1, "I was late");
        assert_eq!(calls[0].2.max_tokens, 150);
    }

    #[tokio::test]
    async fn test_blank_problem_never_reaches_provider() {
        let provider = Arc::new(FakeProvider::replying("unused"));
        let engine = ExcuseEngine::new(provider.clone(), CompletionParams::default());

        for problem in [None, Some(""), Some("   \t\n")] {
            let err = engine.generate(problem).await.unwrap_err();
            assert!(matches!(err, RelayError::MissingProblem));
        }
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_empty_completion() {
        let engine = ExcuseEngine::new(
            Arc::new(FakeProvider::replying("   ")),
            CompletionParams::default(),
        );

        let err = engine.generate(Some("I lost the keys")).await.unwrap_err();

        assert!(matches!(err, RelayError::EmptyCompletionError { .. }));
        assert_eq!(
            err.to_string(),
            "Fake returned an empty response. Please try again."
        );
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let engine = ExcuseEngine::new(
            Arc::new(FakeProvider::failing(|| RelayError::ProviderRateLimitError {
                provider: "Fake".to_string(),
            })),
            CompletionParams::default(),
        );

        let err = engine.generate(Some("I lost the keys")).await.unwrap_err();
        assert!(matches!(err, RelayError::ProviderRateLimitError { .. }));
    }

    #[tokio::test]
    async fn test_custom_params_are_forwarded() {
        let provider = Arc::new(FakeProvider::replying("ok"));
        let params = CompletionParams {
            max_tokens: 200,
            temperature: 0.3,
        };
        let engine = ExcuseEngine::new(provider.clone(), params);

        tokio_test::assert_ok!(engine.generate(Some("problem")).await);
        assert_eq!(provider.calls.lock().unwrap()[0].2, params);
    }

    #[test]
    fn test_engine_reports_provider_and_params() {
        let params = CompletionParams {
            max_tokens: 64,
            temperature: 1.1,
        };
        let engine = ExcuseEngine::new(Arc::new(FakeProvider::replying("ok")), params);

        assert_eq!(engine.provider_name(), "Fake");
        assert_eq!(engine.model(), "fake-1");
        assert_eq!(engine.params(), &params);
    }
}
