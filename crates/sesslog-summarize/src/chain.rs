use crate::command::CommandProvider;
use crate::local::basic_summary;
use crate::prompt::summarization_prompt;
use crate::provider::SummaryProvider;
use crate::remote::RemoteProvider;
use sesslog_core::GeneratorConfig;

/// Which tier produced a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tier {
    Provider(&'static str),
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSummary {
    pub text: String,
    pub tier: Tier,
}

/// Ordered list of providers with a local fallback that cannot fail.
pub struct SummaryGenerator {
    providers: Vec<Box<dyn SummaryProvider>>,
}

impl SummaryGenerator {
    /// Remote API first, then the external CLI tool.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::with_providers(vec![
            Box::new(RemoteProvider::from_config(config)),
            Box::new(CommandProvider::from_config(config)),
        ])
    }

    pub fn with_providers(providers: Vec<Box<dyn SummaryProvider>>) -> Self {
        Self { providers }
    }

    /// Summarize a rendered conversation. First provider success wins;
    /// every provider error is logged and swallowed.
    pub fn summarize(&self, conversation: &str) -> GeneratedSummary {
        let prompt = summarization_prompt(conversation);
        for provider in &self.providers {
            match provider.generate(&prompt) {
                Ok(text) => {
                    tracing::debug!(tier = provider.name(), "summary generated");
                    return GeneratedSummary {
                        text,
                        tier: Tier::Provider(provider.name()),
                    };
                }
                Err(e) => {
                    tracing::debug!(tier = provider.name(), error = %e, "tier failed, falling through");
                }
            }
        }
        GeneratedSummary {
            text: basic_summary(conversation),
            tier: Tier::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GenerateError;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct Scripted {
        name: &'static str,
        result: Option<&'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl SummaryProvider for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            self.calls.set(self.calls.get() + 1);
            assert!(prompt.contains("Session transcript:"));
            match self.result {
                Some(text) => Ok(text.to_string()),
                None => Err(GenerateError::Request("scripted failure".into())),
            }
        }
    }

    fn scripted(
        name: &'static str,
        result: Option<&'static str>,
    ) -> (Box<dyn SummaryProvider>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let provider = Scripted {
            name,
            result,
            calls: calls.clone(),
        };
        (Box::new(provider), calls)
    }

    const CONVERSATION: &str =
        "Project: webapp\n\n=== Conversation ===\n\nUSER: fix login bug\n\nCLAUDE: done";

    #[test]
    fn first_success_wins() {
        let (a, a_calls) = scripted("a", Some("from a"));
        let (b, b_calls) = scripted("b", Some("from b"));
        let out = SummaryGenerator::with_providers(vec![a, b]).summarize(CONVERSATION);
        assert_eq!(out.text, "from a");
        assert_eq!(out.tier, Tier::Provider("a"));
        assert_eq!(a_calls.get(), 1);
        assert_eq!(b_calls.get(), 0);
    }

    #[test]
    fn failure_falls_through_to_next() {
        let (a, _) = scripted("a", None);
        let (b, _) = scripted("b", Some("from b"));
        let out = SummaryGenerator::with_providers(vec![a, b]).summarize(CONVERSATION);
        assert_eq!(out.tier, Tier::Provider("b"));
    }

    #[test]
    fn all_failures_use_local_summary() {
        let (a, _) = scripted("a", None);
        let (b, _) = scripted("b", None);
        let out = SummaryGenerator::with_providers(vec![a, b]).summarize(CONVERSATION);
        assert_eq!(out.tier, Tier::Local);
        assert!(out.text.contains("fix login bug"));
    }

    #[test]
    fn configured_chain_without_key_or_tool_falls_back() {
        let config = GeneratorConfig {
            api_key: None,
            cli_bin: "/nonexistent/sesslog-test-bin".into(),
            cli_timeout: Duration::from_secs(1),
            ..GeneratorConfig::default()
        };
        let out = SummaryGenerator::from_config(&config).summarize(CONVERSATION);
        assert_eq!(out.tier, Tier::Local);
        assert!(!out.text.is_empty());
        assert!(out.text.contains("fix login bug"));
    }

    #[test]
    fn empty_chain_still_returns_text() {
        let out = SummaryGenerator::with_providers(vec![]).summarize("Project: p");
        assert!(!out.text.is_empty());
        assert_eq!(out.tier, Tier::Local);
    }
}
