// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static pattern tables behind the intent classifier.
//!
//! Rules are declared as `{category, pattern}` pairs and evaluated uniformly
//! by a single matcher, keeping the decision logic data-driven and testable
//! per rule. Tables are compiled once at library construction; a pattern
//! that fails to compile is skipped with a warning, never a panic.

use regex::Regex;
use tracing::warn;

/// Structural query categories matched against the user text.
///
/// A category contributes at most one tag regardless of how many of its
/// rules match (first match wins per category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    /// Explicit tool operations ("search the web...", "list my tasks").
    ToolOperation,
    /// Multi-step instructions ("first..., then...").
    MultiStep,
    /// Analytical/reasoning requests ("explain", "compare").
    Reasoning,
    /// Factual lookups ("what is...", "tell me about...").
    KnowledgeRetrieval,
    /// Greetings and small talk.
    Conversational,
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternCategory::ToolOperation => write!(f, "tool_operation"),
            PatternCategory::MultiStep => write!(f, "multi_step"),
            PatternCategory::Reasoning => write!(f, "reasoning"),
            PatternCategory::KnowledgeRetrieval => write!(f, "knowledge_retrieval"),
            PatternCategory::Conversational => write!(f, "conversational"),
        }
    }
}

/// A compiled rule: one regex tagged with its category.
#[derive(Debug)]
pub struct PatternRule {
    pub category: PatternCategory,
    pub regex: Regex,
}

const TOOL_OPERATION_PATTERNS: &[&str] = &[
    r"(?i)\b(search|look up|find)\b.*\b(web|online|internet)\b",
    r"(?i)\b(list|show)\b.*\b(documents?|tasks?|events?|files?)\b",
    r"(?i)\b(create|add|update|delete|schedule)\b.*\b(task|event|meeting|document|reminder)\b",
    r"(?i)\bknowledge ?base\b",
    r"(?i)\b(open|read|fetch|retrieve)\b.*\b(document|doc|file|profile)\b",
];

const MULTI_STEP_PATTERNS: &[&str] = &[
    r"(?i)\bfirst\b.*\bthen\b",
    r"(?i)\bstep by step\b",
    r"(?i)\band (also|then)\b",
    r"(?i)\bafter that\b",
];

const REASONING_PATTERNS: &[&str] = &[
    r"(?i)\b(why|explain|analyze|evaluate|compare)\b",
    r"(?i)\bpros and cons\b",
    r"(?i)\btrade-?offs?\b",
];

const KNOWLEDGE_RETRIEVAL_PATTERNS: &[&str] = &[
    r"(?i)\bwhat (is|are)\b",
    r"(?i)\btell me about\b",
    r"(?i)\b(define|definition of)\b",
    r"(?i)\bhistory of\b",
];

const CONVERSATIONAL_PATTERNS: &[&str] = &[
    r"(?i)^\s*(hi|hello|hey|thanks|thank you|bye|ok|okay|yes|no|sure)\b[\s!.?]*$",
    r"(?i)\bhow are you\b",
    r"(?i)\bgood (morning|afternoon|evening)\b",
    r"(?i)^\s*(what'?s up|who are you)\b",
];

/// Technical vocabulary that nudges complexity upward (substring match on
/// the lowercased query).
pub const TECHNICAL_TERMS: &[&str] = &[
    "api",
    "database",
    "algorithm",
    "architecture",
    "authentication",
    "deployment",
    "integration",
    "schema",
    "pipeline",
    "latency",
    "encryption",
    "refactor",
    "regression",
    "microservice",
    "throughput",
    "kubernetes",
];

/// Interrogative words counted by the complexity scorer.
pub const INTERROGATIVES: &[&str] = &["how", "why", "what", "when", "where", "which", "who"];

/// Confidence bonus when a profile's explicit keyword matches.
const EXPLICIT_KEYWORD_BONUS: f64 = 0.4;

/// Confidence bonus when a profile's secondary cue matches.
const SECONDARY_CUE_BONUS: f64 = 0.3;

/// Per-tool intent profile: a rule set scored by match ratio plus fixed
/// additive bonuses for explicit and secondary cues.
#[derive(Debug)]
pub struct ToolIntentProfile {
    /// The tool this profile argues for.
    pub tool: &'static str,
    rules: Vec<Regex>,
    /// Declared rule count, kept stable even if a pattern failed to compile
    /// so confidence ratios do not drift.
    declared_rules: usize,
    explicit: Option<Regex>,
    secondary: Option<Regex>,
}

impl ToolIntentProfile {
    fn new(
        tool: &'static str,
        rule_patterns: &[&str],
        explicit: Option<&str>,
        secondary: Option<&str>,
    ) -> Self {
        Self {
            tool,
            rules: compile_all(rule_patterns),
            declared_rules: rule_patterns.len(),
            explicit: explicit.and_then(compile_one),
            secondary: secondary.and_then(compile_one),
        }
    }

    /// Score this profile against the query text.
    ///
    /// `confidence = matched/declared`, plus the explicit (+0.4) and
    /// secondary (+0.3) bonuses, clamped to 1.0.
    pub fn score(&self, text: &str) -> f64 {
        if self.declared_rules == 0 {
            return 0.0;
        }
        let matched = self.rules.iter().filter(|r| r.is_match(text)).count();
        let mut confidence = matched as f64 / self.declared_rules as f64;
        if self.explicit.as_ref().is_some_and(|r| r.is_match(text)) {
            confidence += EXPLICIT_KEYWORD_BONUS;
        }
        if self.secondary.as_ref().is_some_and(|r| r.is_match(text)) {
            confidence += SECONDARY_CUE_BONUS;
        }
        confidence.min(1.0)
    }
}

/// A scored tool-specific intent.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentScore {
    pub tool: String,
    pub confidence: f64,
}

/// Static tables of category rules and per-tool intent profiles.
pub struct PatternLibrary {
    rules: Vec<PatternRule>,
    intents: Vec<ToolIntentProfile>,
}

impl PatternLibrary {
    /// Compile the built-in rule tables.
    pub fn new() -> Self {
        let mut rules = Vec::new();
        for (category, patterns) in [
            (PatternCategory::ToolOperation, TOOL_OPERATION_PATTERNS),
            (PatternCategory::MultiStep, MULTI_STEP_PATTERNS),
            (PatternCategory::Reasoning, REASONING_PATTERNS),
            (
                PatternCategory::KnowledgeRetrieval,
                KNOWLEDGE_RETRIEVAL_PATTERNS,
            ),
            (PatternCategory::Conversational, CONVERSATIONAL_PATTERNS),
        ] {
            for pattern in patterns {
                match Regex::new(pattern) {
                    Ok(regex) => rules.push(PatternRule { category, regex }),
                    Err(e) => warn!(pattern, error = %e, "skipping unparseable pattern"),
                }
            }
        }

        let intents = vec![
            ToolIntentProfile::new(
                "tavilySearch",
                &[
                    r"(?i)\bsearch\b",
                    r"(?i)\b(web|online|internet)\b",
                    r"(?i)\b(news|latest|recent|current)\b",
                    r"(?i)\blook up\b",
                ],
                Some(r"(?i)\bsearch the web\b|\bweb search\b"),
                Some(r"(?i)\b(news|latest|recent)\b"),
            ),
            ToolIntentProfile::new(
                "queryKnowledgeBase",
                &[
                    r"(?i)\bknowledge ?base\b",
                    r"(?i)\b(client|account) research\b",
                    r"(?i)\b(internal|our) (notes|research|data)\b",
                    r"(?i)\bcrm\b",
                ],
                Some(r"(?i)\bknowledge ?base\b"),
                Some(r"(?i)\bresearch\b"),
            ),
            ToolIntentProfile::new(
                "listDocuments",
                &[
                    r"(?i)\blist\b.*\bdocuments?\b",
                    r"(?i)\b(available|all)\b.*\bdocuments?\b",
                    r"(?i)\bwhat documents?\b.*\b(have|exist|available)\b",
                ],
                Some(r"(?i)\blist\b.*\bdocuments?\b"),
                Some(r"(?i)\bavailable\b"),
            ),
            ToolIntentProfile::new(
                "getDocument",
                &[
                    r"(?i)\b(open|read|fetch|retrieve|pull up)\b.*\b(document|doc|profile|statement|overview)\b",
                    r"(?i)\bcontents? of\b",
                    r"(?i)\b(ideal client|mission statement|services overview)\b",
                ],
                Some(r"(?i)\b(open|read|fetch|retrieve)\b.*\bdocument\b"),
                None,
            ),
            ToolIntentProfile::new(
                "listTasks",
                &[
                    r"(?i)\btasks?\b",
                    r"(?i)\bto-?dos?\b",
                    r"(?i)\btask tracker\b",
                ],
                Some(r"(?i)\b(my|open|pending) tasks?\b"),
                None,
            ),
            ToolIntentProfile::new(
                "listEvents",
                &[
                    r"(?i)\bcalendar\b",
                    r"(?i)\b(meeting|appointment)s?\b",
                    r"(?i)\bschedule\b",
                ],
                Some(r"(?i)\b(on|check) (my )?calendar\b"),
                None,
            ),
        ];

        Self { rules, intents }
    }

    /// Categories whose rule list matches the text, one tag per category.
    pub fn matched_categories(&self, text: &str) -> Vec<PatternCategory> {
        let mut matched = Vec::new();
        for rule in &self.rules {
            if matched.contains(&rule.category) {
                continue; // first match wins per category
            }
            if rule.regex.is_match(text) {
                matched.push(rule.category);
            }
        }
        matched
    }

    /// Whether any rule of `category` matches the text.
    pub fn matches_category(&self, text: &str, category: PatternCategory) -> bool {
        self.rules
            .iter()
            .filter(|r| r.category == category)
            .any(|r| r.regex.is_match(text))
    }

    /// Score every tool intent profile, returning only nonzero scores.
    pub fn score_intents(&self, text: &str) -> Vec<IntentScore> {
        self.intents
            .iter()
            .filter_map(|profile| {
                let confidence = profile.score(text);
                (confidence > 0.0).then(|| IntentScore {
                    tool: profile.tool.to_string(),
                    confidence,
                })
            })
            .collect()
    }

    /// Number of compiled category rules (diagnostics only).
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| compile_one(p))
        .collect()
}

fn compile_one(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!(pattern, error = %e, "skipping unparseable pattern");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtin_patterns_compile() {
        let library = PatternLibrary::new();
        let declared = TOOL_OPERATION_PATTERNS.len()
            + MULTI_STEP_PATTERNS.len()
            + REASONING_PATTERNS.len()
            + KNOWLEDGE_RETRIEVAL_PATTERNS.len()
            + CONVERSATIONAL_PATTERNS.len();
        assert_eq!(library.rule_count(), declared);
    }

    #[test]
    fn category_contributes_one_tag() {
        let library = PatternLibrary::new();
        // Matches two tool-operation rules, should still yield a single tag.
        let matched =
            library.matched_categories("search the web and list my documents please");
        let tool_ops = matched
            .iter()
            .filter(|c| **c == PatternCategory::ToolOperation)
            .count();
        assert_eq!(tool_ops, 1);
    }

    #[test]
    fn conversational_matches_greeting_only() {
        let library = PatternLibrary::new();
        assert!(library.matches_category("hello!", PatternCategory::Conversational));
        assert!(!library.matches_category(
            "hello, can you search the web for rust news",
            PatternCategory::Conversational
        ));
    }

    #[test]
    fn web_search_intent_gets_bonuses() {
        let library = PatternLibrary::new();
        let scores = library.score_intents("search the web for recent news");
        let web = scores
            .iter()
            .find(|s| s.tool == "tavilySearch")
            .expect("web search intent should score");
        // 3/4 rules + explicit 0.4 + secondary 0.3, clamped
        assert_eq!(web.confidence, 1.0);
    }

    #[test]
    fn intent_confidence_is_match_ratio_without_bonuses() {
        let library = PatternLibrary::new();
        let scores = library.score_intents("anything online today?");
        let web = scores
            .iter()
            .find(|s| s.tool == "tavilySearch")
            .expect("web search intent should score");
        // Only the web/online/internet rule matches: 1/4.
        assert!((web.confidence - 0.25).abs() < 1e-9);
    }

    #[test]
    fn listing_query_does_not_score_content_retrieval() {
        let library = PatternLibrary::new();
        let scores = library.score_intents("list all the available documents");
        assert!(scores.iter().all(|s| s.tool != "getDocument"));
        let listing = scores
            .iter()
            .find(|s| s.tool == "listDocuments")
            .expect("listing intent should score");
        assert!(listing.confidence > 0.3);
    }
}
