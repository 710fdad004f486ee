// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn orchestration.
//!
//! [`OrchestrationRouter`] runs the turn pipeline: classify the query,
//! decide which tools to advertise to the model, translate the classifier's
//! forcing directive into a provider `tool_choice`, and later drive any
//! model-requested tool calls through the execution coordinator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use tiller_cache::{CacheStats, ToolCache};
use tiller_config::TillerConfig;
use tiller_core::{Query, ToolCall, ToolDescriptor, ToolExecutor};
use tiller_dispatch::{ExecutionReport, ToolExecutionCoordinator};
use tiller_intent::{ClassificationResult, ForcingDirective, IntentClassifier};
use tiller_registry::{AdmissionReport, ToolRegistry};

/// Provider-format tool selection constraint sent with the model request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides whether and which tool to call.
    Auto,
    /// The model must call some tool from the advertised set.
    Any,
    /// The model must call this tool.
    Tool { name: String },
}

/// Everything the model-invocation layer needs to issue one turn.
#[derive(Debug, Clone)]
pub struct TurnPlan {
    pub classification: ClassificationResult,
    /// `None` on the chat path: no tools are advertised at all.
    pub tool_choice: Option<ToolChoice>,
    /// Provider-format definitions of the advertised tools, sorted by name.
    pub tools: Vec<Value>,
}

/// The decision-and-dispatch layer in front of the model provider.
///
/// Owns the classifier and registry; shares the tool cache with its
/// coordinator so cache statistics span the whole session.
pub struct OrchestrationRouter {
    classifier: IntentClassifier,
    registry: ToolRegistry,
    coordinator: ToolExecutionCoordinator,
}

impl OrchestrationRouter {
    /// Build a router (and a fresh cache) from configuration.
    pub fn new(config: &TillerConfig) -> Self {
        let cache = Arc::new(Mutex::new(ToolCache::new(config.cache.clone())));
        Self::with_cache(config, cache)
    }

    /// Build a router around an existing shared cache.
    pub fn with_cache(config: &TillerConfig, cache: Arc<Mutex<ToolCache>>) -> Self {
        Self {
            classifier: IntentClassifier::new(config.classifier.clone()),
            registry: ToolRegistry::new(config.registry.clone()),
            coordinator: ToolExecutionCoordinator::new(cache),
        }
    }

    /// Admit one provider's tool batch into the registry.
    pub fn admit_tools(
        &mut self,
        provider: &str,
        descriptors: Vec<ToolDescriptor>,
    ) -> AdmissionReport {
        self.registry.admit_batch(provider, descriptors)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Plan one turn: classify the query, then decide tool advertisement
    /// and forcing.
    ///
    /// On the chat path no tools are advertised. On the tool path the full
    /// admitted set is advertised; the forcing directive maps to the
    /// provider constraint, except that a `Specific` directive naming a
    /// tool the registry never admitted degrades to `Auto` rather than
    /// forcing a call the executor cannot honor.
    pub fn plan_turn(&self, query: &Query) -> TurnPlan {
        let classification = self.classifier.classify(&query.text, &query.history);

        if !classification.use_tool_path {
            debug!(reasoning = classification.reasoning.as_str(), "chat path");
            return TurnPlan {
                classification,
                tool_choice: None,
                tools: Vec::new(),
            };
        }

        let tools = self.registry.tool_definitions();
        let tool_choice = match &classification.directive {
            ForcingDirective::None => ToolChoice::Auto,
            ForcingDirective::AnyRequired if tools.is_empty() => {
                warn!("any-required directive with empty registry, degrading to auto");
                ToolChoice::Auto
            }
            ForcingDirective::AnyRequired => ToolChoice::Any,
            ForcingDirective::Specific(name) => {
                if self.registry.contains(name) {
                    ToolChoice::Tool { name: name.clone() }
                } else {
                    warn!(
                        tool = name.as_str(),
                        "specific directive for unadmitted tool, degrading to auto"
                    );
                    ToolChoice::Auto
                }
            }
        };

        debug!(
            directive = %classification.directive,
            ?tool_choice,
            advertised = tools.len(),
            "tool path planned"
        );

        TurnPlan {
            classification,
            tool_choice: Some(tool_choice),
            tools,
        }
    }

    /// Execute the model's requested tool calls through the coordinator.
    pub async fn dispatch_tool_calls(
        &self,
        calls: &[ToolCall],
        executor: &dyn ToolExecutor,
    ) -> ExecutionReport {
        self.coordinator.execute(calls, executor).await
    }

    /// Cumulative cache statistics for the session.
    pub async fn cache_stats(&self) -> CacheStats {
        self.coordinator.cache_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_choice_serializes_to_provider_format() {
        assert_eq!(
            serde_json::to_value(ToolChoice::Auto).unwrap(),
            json!({"type": "auto"})
        );
        assert_eq!(
            serde_json::to_value(ToolChoice::Any).unwrap(),
            json!({"type": "any"})
        );
        assert_eq!(
            serde_json::to_value(ToolChoice::Tool {
                name: "listDocuments".to_string()
            })
            .unwrap(),
            json!({"type": "tool", "name": "listDocuments"})
        );
    }

    #[test]
    fn chat_path_advertises_nothing() {
        let router = OrchestrationRouter::new(&TillerConfig::default());
        let plan = router.plan_turn(&Query::new("thanks!", Vec::new()));
        assert!(!plan.classification.use_tool_path);
        assert!(plan.tool_choice.is_none());
        assert!(plan.tools.is_empty());
    }

    #[test]
    fn specific_directive_for_unadmitted_tool_degrades_to_auto() {
        // Empty registry: "list the documents" classifies to a specific
        // directive, but there is no such admitted tool.
        let router = OrchestrationRouter::new(&TillerConfig::default());
        let plan = router.plan_turn(&Query::new("list all the available documents", Vec::new()));
        assert_eq!(plan.tool_choice, Some(ToolChoice::Auto));
    }
}
