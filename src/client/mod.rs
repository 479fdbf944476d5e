//! Client layer: the inbound text-generation boundary.

mod llm_client;
mod retry;

pub use llm_client::{CompletionResponse, HealthCheckResult, HealthStatus, LlmClient, Message};
pub use retry::RetryingGenerator;

use crate::models::Result;

/// The inbound text-generation capability.
///
/// B_i: A generation may succeed or fail; the caller sees a Result.
/// Production uses [`LlmClient`]; tests substitute scripted fakes. Retry is
/// not this trait's concern — implementations perform exactly one attempt.
pub trait TextGenerator {
    /// Generate text for a prompt, in a single attempt.
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TextGenerator;
    use crate::models::{DidactError, Result};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Test double replaying a queue of canned outcomes.
    pub(crate) struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn new(script: Vec<Result<String>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Succeeds immediately with the given text.
        pub(crate) fn ok(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        /// Fails `failures` times with timeouts, then succeeds.
        pub(crate) fn fail_then_ok(failures: usize, text: &str) -> Self {
            let mut script: Vec<Result<String>> =
                (0..failures).map(|_| Err(Self::transport_error())).collect();
            script.push(Ok(text.to_string()));
            Self::new(script)
        }

        /// Fails `failures` times with timeouts.
        pub(crate) fn fail(failures: usize) -> Self {
            Self::new((0..failures).map(|_| Err(Self::transport_error())).collect())
        }

        pub(crate) fn transport_error() -> DidactError {
            DidactError::Timeout(Duration::from_secs(60))
        }

        /// Prompts seen so far, in call order.
        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(DidactError::Internal("script exhausted".to_string())))
        }
    }
}
