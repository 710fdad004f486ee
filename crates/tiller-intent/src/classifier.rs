// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic intent classification for the dispatch layer.
//!
//! Scores query complexity, matches the pattern tables, and produces a
//! route plus a tool-forcing directive. Zero-cost: no LLM pre-call, no
//! network, no latency. Classification never fails a turn -- any internal
//! failure degrades to the tool-capable path.

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tiller_config::ClassifierConfig;
use tiller_core::{ChatTurn, TillerError};
use tracing::{debug, warn};

use crate::patterns::{
    IntentScore, PatternCategory, PatternLibrary, INTERROGATIVES, TECHNICAL_TERMS,
};

/// Instruction to the model-invocation layer about whether a tool call is
/// mandatory this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForcingDirective {
    /// The model decides freely.
    None,
    /// Exactly one tool intent cleared the forcing floor; require that tool.
    Specific(String),
    /// Two or more intents cleared the floor: require *a* tool call but let
    /// the model choose among the admissible set. Forcing a single wrong
    /// tool when two are plausible is worse than letting the model
    /// disambiguate, so the classifier deliberately does not pick.
    AnyRequired,
}

impl std::fmt::Display for ForcingDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForcingDirective::None => write!(f, "none"),
            ForcingDirective::Specific(tool) => write!(f, "specific({tool})"),
            ForcingDirective::AnyRequired => write!(f, "any_required"),
        }
    }
}

/// Result of classifying one query. Produced once per turn, read-only after.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Whether the turn should run on the tool-capable path.
    pub use_tool_path: bool,
    /// Confidence in the decision (0.0-1.0).
    pub confidence: f64,
    /// Additive complexity score (0.0-1.0).
    pub complexity: f64,
    /// Category tags that matched, one per category.
    pub matched_patterns: BTreeSet<String>,
    /// Tool-forcing directive for the model invocation.
    pub directive: ForcingDirective,
    /// Human-readable reason for the decision.
    pub reasoning: String,
}

impl ClassificationResult {
    /// The conservative default: classification failure fails *open* toward
    /// the more-capable path rather than silently under-serving the user.
    fn fail_open() -> Self {
        Self {
            use_tool_path: true,
            confidence: 0.5,
            complexity: 0.0,
            matched_patterns: BTreeSet::new(),
            directive: ForcingDirective::None,
            reasoning: "classification failed, defaulting to tool-capable path".to_string(),
        }
    }
}

/// Heuristic query classifier over the static pattern library.
pub struct IntentClassifier {
    library: PatternLibrary,
    config: ClassifierConfig,
}

impl IntentClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            library: PatternLibrary::new(),
            config,
        }
    }

    /// Classify a query against its conversation history.
    ///
    /// Never panics and never returns an error: any failure inside scoring
    /// or matching is caught at this boundary and converted to the safe
    /// default (tool-capable path, no forcing).
    pub fn classify(&self, text: &str, history: &[ChatTurn]) -> ClassificationResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.classify_inner(text, history)));
        match outcome {
            Ok(Ok(result)) => {
                debug!(
                    use_tool_path = result.use_tool_path,
                    directive = %result.directive,
                    complexity = result.complexity,
                    reasoning = result.reasoning.as_str(),
                    "classified query"
                );
                result
            }
            Ok(Err(e)) => {
                warn!(error = %e, "classification error, failing open");
                ClassificationResult::fail_open()
            }
            Err(_) => {
                warn!("classifier panicked, failing open");
                ClassificationResult::fail_open()
            }
        }
    }

    fn classify_inner(
        &self,
        text: &str,
        history: &[ChatTurn],
    ) -> Result<ClassificationResult, TillerError> {
        let complexity = self.complexity_score(text, history);
        let context = self.context_complexity(history);

        let categories = self.library.matched_categories(text);
        let matched_patterns: BTreeSet<String> =
            categories.iter().map(|c| c.to_string()).collect();

        let intents = self.library.score_intents(text);
        let present: Vec<&IntentScore> = intents
            .iter()
            .filter(|i| i.confidence > self.config.intent_floor)
            .collect();

        // Route decision, override order per contract:
        // 1. a strong structural (tool-operation) match forces the tool path;
        // 2. a conversational match with no complex match and quiet context
        //    forces the chat path;
        // 3. otherwise the averaged score decides.
        let has_tool_op = categories.contains(&PatternCategory::ToolOperation);
        let has_complex = categories.contains(&PatternCategory::MultiStep)
            || categories.contains(&PatternCategory::Reasoning);
        let has_conversational = categories.contains(&PatternCategory::Conversational);
        let averaged = (complexity + context) / 2.0;

        let (mut use_tool_path, mut confidence, mut reasoning) = if has_tool_op {
            (
                true,
                0.9,
                "tool-operation pattern matched".to_string(),
            )
        } else if has_conversational
            && !has_complex
            && context < self.config.simple_context_ceiling
        {
            (false, 0.85, "conversational query".to_string())
        } else if averaged >= self.config.route_threshold {
            (
                true,
                0.5 + (averaged - self.config.route_threshold).min(0.5),
                format!("averaged complexity {averaged:.2} above threshold"),
            )
        } else {
            (
                false,
                0.5 + (self.config.route_threshold - averaged).min(0.5),
                format!("averaged complexity {averaged:.2} below threshold"),
            )
        };

        // Tool intents always win over a "simple" classification.
        if !present.is_empty() && !use_tool_path {
            use_tool_path = true;
            reasoning = format!(
                "tool intent present ({}), overriding simple classification",
                present
                    .iter()
                    .map(|i| i.tool.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        // Forcing resolution: collect intents above the forcing floor.
        let mut confident: Vec<&IntentScore> = intents
            .iter()
            .filter(|i| i.confidence > self.config.forcing_floor)
            .collect();
        // Descending sort is for diagnostics only, never directive selection.
        confident.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if !confident.is_empty() {
            debug!(
                intents = ?confident
                    .iter()
                    .map(|i| (i.tool.as_str(), i.confidence))
                    .collect::<Vec<_>>(),
                "confident tool intents"
            );
        }

        let directive = match confident.as_slice() {
            [] => ForcingDirective::None,
            [only] => {
                confidence = confidence.max(only.confidence);
                ForcingDirective::Specific(only.tool.clone())
            }
            _ => {
                confidence = confidence.max(confident[0].confidence);
                ForcingDirective::AnyRequired
            }
        };

        Ok(ClassificationResult {
            use_tool_path,
            confidence: confidence.min(1.0),
            complexity,
            matched_patterns,
            directive,
            reasoning,
        })
    }

    /// Additive complexity score, each factor capped, the sum clamped to 1.0.
    fn complexity_score(&self, text: &str, history: &[ChatTurn]) -> f64 {
        let words = text.split_whitespace().count();
        let sentences = count_sentences(text);
        let lower = text.to_lowercase();

        let interrogatives = lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| INTERROGATIVES.contains(w))
            .count();
        let technical = TECHNICAL_TERMS
            .iter()
            .filter(|t| lower.contains(*t))
            .count();

        let mut score = (words as f64 / 50.0).min(0.3)
            + (sentences as f64 / 5.0).min(0.2)
            + (interrogatives as f64 / 3.0).min(0.2)
            + (technical as f64 / 2.0).min(0.3);

        if history.len() > self.config.long_history_turns {
            score += self.config.long_history_weight;
        }

        score.min(1.0)
    }

    /// Conversation-side complexity: history depth plus recent momentum.
    ///
    /// Momentum counts tool/reasoning cues in the last three turns; two or
    /// more cues bias a short follow-up toward the tool path.
    fn context_complexity(&self, history: &[ChatTurn]) -> f64 {
        if history.is_empty() {
            return 0.0;
        }

        let depth = (history.len() as f64 / 10.0).min(0.6);

        let recent_cues = history
            .iter()
            .rev()
            .take(3)
            .filter(|turn| {
                self.library
                    .matches_category(&turn.content, PatternCategory::ToolOperation)
                    || self
                        .library
                        .matches_category(&turn.content, PatternCategory::Reasoning)
            })
            .count();
        let momentum = if recent_cues >= 2 { 0.2 } else { 0.0 };

        (depth + momentum).min(1.0)
    }
}

/// Sentence counting: split on sentence-ending punctuation, at least 1.
fn count_sentences(text: &str) -> usize {
    let count = text
        .chars()
        .filter(|c| *c == '.' || *c == '?' || *c == '!')
        .count();
    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiller_core::Role;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(ClassifierConfig::default())
    }

    fn turns(contents: &[&str]) -> Vec<ChatTurn> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                ChatTurn::new(role, *c)
            })
            .collect()
    }

    #[test]
    fn tool_operation_pattern_forces_tool_path() {
        let c = classifier();
        // Trivially short query, complexity near zero, still routes to tools.
        let result = c.classify("list my tasks", &[]);
        assert!(result.use_tool_path);
        assert!(result.matched_patterns.contains("tool_operation"));
    }

    #[test]
    fn greeting_skips_tool_path() {
        let c = classifier();
        let result = c.classify("thanks!", &[]);
        assert!(!result.use_tool_path);
        assert_eq!(result.directive, ForcingDirective::None);
    }

    #[test]
    fn list_documents_scenario_forces_specific_tool() {
        let c = classifier();
        let result = c.classify("list all the available documents", &[]);
        assert!(result.use_tool_path);
        assert_eq!(
            result.directive,
            ForcingDirective::Specific("listDocuments".to_string())
        );
    }

    #[test]
    fn two_confident_intents_yield_any_required() {
        let c = classifier();
        let result = c.classify(
            "search the web for recent news about Acme Corp and also check our knowledge base for client research",
            &[],
        );
        assert!(result.use_tool_path);
        assert_eq!(result.directive, ForcingDirective::AnyRequired);
    }

    #[test]
    fn directive_never_specific_with_multiple_confident_intents() {
        let c = classifier();
        let result = c.classify(
            "search the web for the latest news and list all available documents",
            &[],
        );
        assert!(!matches!(result.directive, ForcingDirective::Specific(_)));
    }

    #[test]
    fn tool_intent_overrides_simple_classification() {
        let c = classifier();
        // Short and conversational in shape, but names the knowledge base.
        let result = c.classify("ok, check the knowledge base", &[]);
        assert!(result.use_tool_path);
    }

    #[test]
    fn no_intent_no_directive() {
        let c = classifier();
        let result = c.classify("explain why the sky is blue", &[]);
        assert_eq!(result.directive, ForcingDirective::None);
    }

    #[test]
    fn complexity_score_is_clamped() {
        let c = classifier();
        let long_query = "how why what when where which who ".repeat(30)
            + "api database algorithm schema pipeline. ! ? . !";
        let result = c.classify(&long_query, &turns(&["a", "b", "c", "d", "e"]));
        assert!(result.complexity <= 1.0);
        assert!(result.complexity > 0.9);
    }

    #[test]
    fn long_history_boosts_complexity() {
        let c = classifier();
        let text = "summarize our discussion";
        let short = c.classify(text, &turns(&["a", "b"]));
        let long = c.classify(text, &turns(&["a", "b", "c", "d", "e"]));
        assert!(long.complexity > short.complexity);
        assert!((long.complexity - short.complexity - 0.2).abs() < 1e-9);
    }

    #[test]
    fn momentum_biases_followup_toward_tools() {
        let c = classifier();
        let recent = turns(&[
            "let's look at the dashboard",
            "sure",
            "analyze the quarterly numbers",
            "search the web for competitor pricing",
            "now compare the two",
        ]);
        let followup =
            "and the same for last year, broken out by region, including the churn numbers we discussed";
        // The same follow-up routes to tools only inside a tool-heavy conversation.
        let with_momentum = c.classify(followup, &recent);
        let without = c.classify(followup, &[]);
        assert!(with_momentum.use_tool_path);
        assert!(!without.use_tool_path);
    }

    #[test]
    fn matched_patterns_one_tag_per_category() {
        let c = classifier();
        let result = c.classify("first search the web, then list my documents", &[]);
        assert!(result.matched_patterns.contains("tool_operation"));
        assert!(result.matched_patterns.contains("multi_step"));
        // BTreeSet semantics: no duplicates possible, tags are category names.
        for tag in &result.matched_patterns {
            assert!(!tag.is_empty());
        }
    }

    #[test]
    fn classification_never_panics_on_odd_input() {
        let c = classifier();
        for text in ["", "   ", "\u{0}\u{1}", "🦀🦀🦀", &"x".repeat(100_000)] {
            let _ = c.classify(text, &[]);
        }
    }

    #[test]
    fn fail_open_default_values() {
        let result = ClassificationResult::fail_open();
        assert!(result.use_tool_path);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.directive, ForcingDirective::None);
        assert_eq!(
            result.reasoning,
            "classification failed, defaulting to tool-capable path"
        );
    }

    #[test]
    fn directive_display() {
        assert_eq!(ForcingDirective::None.to_string(), "none");
        assert_eq!(
            ForcingDirective::Specific("tavilySearch".to_string()).to_string(),
            "specific(tavilySearch)"
        );
        assert_eq!(ForcingDirective::AnyRequired.to_string(), "any_required");
    }
}
