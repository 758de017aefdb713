//! Service-specific tests
//!
//! Each service has its own test file; shared fakes live in `common`.

#[cfg(test)]
mod gemini_client;
#[cfg(test)]
mod probe_runner;
#[cfg(test)]
mod result_store;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use shared::{FinishReason, ProbeFailure, TokenUsage};

    use crate::traits::GenerationClient;
    use crate::types::{Generation, ProbeProfile};

    /// What the fake answers for one model
    #[derive(Debug, Clone)]
    pub enum Reply {
        Text(&'static str),
        Fail(ProbeFailure),
        Panic,
    }

    /// Client with a per-model script and delay, counting calls in flight
    #[derive(Default)]
    pub struct ScriptedClient {
        replies: HashMap<String, (Reply, Duration)>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, model: &str, reply: Reply, delay: Duration) -> Self {
            self.replies.insert(model.to_string(), (reply, delay));
            self
        }

        /// Highest number of simultaneous calls seen
        pub fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(
            &self,
            model: &str,
            _credential: &str,
            profile: &ProbeProfile,
        ) -> Result<Generation, ProbeFailure> {
            self.calls.lock().unwrap().push(model.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let (reply, delay) = self
                .replies
                .get(model)
                .cloned()
                .unwrap_or((Reply::Text("ok"), Duration::ZERO));

            let outcome = if delay > profile.timeout {
                tokio::time::sleep(profile.timeout).await;
                Err(ProbeFailure::Connection(format!(
                    "request timed out after {}s",
                    profile.timeout.as_secs_f64()
                )))
            } else {
                tokio::time::sleep(delay).await;
                match reply {
                    Reply::Text(text) => Ok(generation(text)),
                    Reply::Fail(failure) => Err(failure),
                    Reply::Panic => {
                        self.in_flight.fetch_sub(1, Ordering::SeqCst);
                        panic!("scripted panic for {model}");
                    }
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            outcome
        }
    }

    pub fn generation(text: &str) -> Generation {
        Generation {
            text: Some(text.to_string()),
            finish_reason: FinishReason::Stop,
            usage: Some(TokenUsage {
                input_tokens: 12,
                output_tokens: 3,
                total_tokens: 15,
            }),
        }
    }

    /// Profile with a short deadline for timeout scenarios
    pub fn quick_profile(timeout: Duration) -> ProbeProfile {
        ProbeProfile::key_check().with_timeout(timeout)
    }
}
