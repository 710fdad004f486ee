// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-aware cache key generation.
//!
//! Fingerprinting is not a blind serialization of arguments: many tool
//! calls that differ syntactically are semantically identical for caching
//! purposes. Each covered tool has a normalization rule; everything else
//! falls back to exact-match keying over canonicalized JSON. Fingerprinting
//! never fails -- a malformed call shape falls back to the generic key.

use serde_json::Value;
use tiller_core::ToolCall;

/// Recognized search aspects, matched by keyword against the query text.
const ASPECTS: &[&str] = &[
    "profile",
    "mission",
    "values",
    "leadership",
    "news",
    "services",
    "industry",
];

/// Tokens ignored when extracting the search subject.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "about", "for", "of", "on", "the", "their", "its", "recent", "latest",
    "what", "is", "are", "tell", "me",
];

/// Document families for the content-lookup tool: lexical variants of an
/// identifier ("ideal client" vs "ideal_client_profile") map to one key.
const DOCUMENT_FAMILIES: &[(&str, &[&str])] = &[
    ("ideal_client_profile", &["ideal client", "ideal_client", "icp"]),
    ("mission_statement", &["mission"]),
    ("services_overview", &["services", "offerings"]),
    ("pricing_guide", &["pricing", "price"]),
    ("case_studies", &["case study", "case studies", "case_studies"]),
];

/// Derive the deterministic cache key for a tool call.
///
/// `comprehensive_aspect_threshold` is the aspect count at which a search
/// query collapses to the per-subject comprehensive key (see CacheConfig).
pub fn fingerprint(call: &ToolCall, comprehensive_aspect_threshold: usize) -> String {
    match call.name.as_str() {
        // No meaningful parameterization: every call maps to one key.
        "listDocuments" => "listDocuments:all".to_string(),
        "tavilySearch" => search_key(call, comprehensive_aspect_threshold)
            .unwrap_or_else(|| generic_key(call)),
        "companyResearch" => company_key(call).unwrap_or_else(|| generic_key(call)),
        "getDocument" => document_key(call).unwrap_or_else(|| generic_key(call)),
        _ => generic_key(call),
    }
}

/// Free-text search normalization.
///
/// Extracts recognized aspects from the query; at or above the threshold
/// the call maps to the single "comprehensive" key for its subject,
/// otherwise to a key built from the sorted aspect list. Two
/// differently-worded but thematically-overlapping searches for the same
/// subject collapse to one entry.
fn search_key(call: &ToolCall, comprehensive_aspect_threshold: usize) -> Option<String> {
    let query = call.args.get("query")?.as_str()?;
    let lower = query.to_lowercase();

    let mut aspects: Vec<&str> = ASPECTS.iter().copied().filter(|a| lower.contains(a)).collect();
    if aspects.is_empty() {
        return None; // nothing recognized: exact-match caching
    }
    aspects.sort_unstable();

    let subject = subject_of(&lower);

    if aspects.len() >= comprehensive_aspect_threshold {
        Some(format!("{}:{subject}_comprehensive_search", call.name))
    } else {
        Some(format!(
            "{}:{subject}_{}_search",
            call.name,
            aspects.join("_")
        ))
    }
}

/// Company-name research normalization: one comprehensive key per company.
fn company_key(call: &ToolCall) -> Option<String> {
    let company = call.args.get("company")?.as_str()?;
    let token = sanitize(company);
    if token.is_empty() {
        return None;
    }
    Some(format!("{}:{token}_comprehensive", call.name))
}

/// Content-lookup normalization: match the identifier against the known
/// document families.
fn document_key(call: &ToolCall) -> Option<String> {
    let identifier = ["id", "name", "document", "title"]
        .iter()
        .find_map(|field| call.args.get(*field).and_then(Value::as_str))?;
    let lower = identifier.to_lowercase();

    for (family, keywords) in DOCUMENT_FAMILIES {
        if keywords.iter().any(|k| lower.contains(k)) || lower.contains(family) {
            return Some(format!("{}:{family}", call.name));
        }
    }
    None
}

/// Exact-match fallback: tool name plus canonical JSON (keys sorted).
fn generic_key(call: &ToolCall) -> String {
    format!("{}:{}", call.name, canonical_json(&call.args))
}

/// The subject of a search query: non-aspect, non-stopword tokens joined
/// with underscores. Empty queries fall back to "general".
fn subject_of(lower_query: &str) -> String {
    let tokens: Vec<String> = lower_query
        .split_whitespace()
        .map(sanitize)
        .filter(|t| {
            !t.is_empty() && !ASPECTS.contains(&t.as_str()) && !STOPWORDS.contains(&t.as_str())
        })
        .collect();
    if tokens.is_empty() {
        "general".to_string()
    } else {
        tokens.join("_")
    }
}

fn sanitize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Render JSON with object keys in sorted order at every level, so argument
/// ordering never affects the key.
pub fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| {
                    format!(
                        "{}:{}",
                        serde_json::to_string(k).unwrap_or_default(),
                        canonical_json(&map[k])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const THRESHOLD: usize = 3;

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall::new("call-1", name, args)
    }

    #[test]
    fn list_documents_is_constant_regardless_of_args() {
        let a = call("listDocuments", json!({}));
        let b = call("listDocuments", json!({"filter": "recent", "limit": 10}));
        assert_eq!(fingerprint(&a, THRESHOLD), "listDocuments:all");
        assert_eq!(fingerprint(&a, THRESHOLD), fingerprint(&b, THRESHOLD));
    }

    #[test]
    fn single_aspect_searches_keep_distinct_keys() {
        let mission = call("tavilySearch", json!({"query": "LWCC mission"}));
        let leadership_news = call("tavilySearch", json!({"query": "LWCC leadership news"}));
        assert_eq!(
            fingerprint(&mission, THRESHOLD),
            "tavilySearch:lwcc_mission_search"
        );
        assert_eq!(
            fingerprint(&leadership_news, THRESHOLD),
            "tavilySearch:lwcc_leadership_news_search"
        );
    }

    #[test]
    fn three_aspects_collapse_to_comprehensive_key() {
        let c = call(
            "tavilySearch",
            json!({"query": "LWCC mission values and leadership"}),
        );
        assert_eq!(
            fingerprint(&c, THRESHOLD),
            "tavilySearch:lwcc_comprehensive_search"
        );
    }

    #[test]
    fn overlapping_wordings_collapse_to_one_key() {
        let a = call("tavilySearch", json!({"query": "Acme Corp news and leadership"}));
        let b = call(
            "tavilySearch",
            json!({"query": "leadership news about Acme Corp"}),
        );
        assert_eq!(fingerprint(&a, THRESHOLD), fingerprint(&b, THRESHOLD));
    }

    #[test]
    fn aspect_free_search_uses_exact_match_key() {
        let a = call("tavilySearch", json!({"query": "rust 1.85 release notes"}));
        let b = call("tavilySearch", json!({"query": "rust 1.85 release notes"}));
        let c = call("tavilySearch", json!({"query": "zig release notes"}));
        assert_eq!(fingerprint(&a, THRESHOLD), fingerprint(&b, THRESHOLD));
        assert_ne!(fingerprint(&a, THRESHOLD), fingerprint(&c, THRESHOLD));
    }

    #[test]
    fn company_research_maps_to_comprehensive() {
        let c = call("companyResearch", json!({"company": "Acme Corp"}));
        assert_eq!(
            fingerprint(&c, THRESHOLD),
            "companyResearch:acmecorp_comprehensive"
        );
    }

    #[test]
    fn document_lexical_variants_share_a_family_key() {
        let a = call("getDocument", json!({"name": "ideal client"}));
        let b = call("getDocument", json!({"name": "ideal_client_profile"}));
        let c = call("getDocument", json!({"id": "ICP"}));
        assert_eq!(fingerprint(&a, THRESHOLD), "getDocument:ideal_client_profile");
        assert_eq!(fingerprint(&a, THRESHOLD), fingerprint(&b, THRESHOLD));
        assert_eq!(fingerprint(&a, THRESHOLD), fingerprint(&c, THRESHOLD));
    }

    #[test]
    fn unknown_document_falls_back_to_generic() {
        let c = call("getDocument", json!({"name": "q3 board minutes"}));
        assert!(fingerprint(&c, THRESHOLD).starts_with("getDocument:{"));
    }

    #[test]
    fn generic_key_ignores_argument_order() {
        let a = call("createTask", json!({"title": "follow up", "due": "2026-09-01"}));
        let b = call("createTask", json!({"due": "2026-09-01", "title": "follow up"}));
        assert_eq!(fingerprint(&a, THRESHOLD), fingerprint(&b, THRESHOLD));
    }

    #[test]
    fn malformed_args_never_panic() {
        // Query is a number, not a string: falls back to the generic key.
        let c = call("tavilySearch", json!({"query": 42}));
        let key = fingerprint(&c, THRESHOLD);
        assert!(key.starts_with("tavilySearch:"));

        let c = call("tavilySearch", json!(null));
        assert_eq!(fingerprint(&c, THRESHOLD), "tavilySearch:null");
    }

    #[test]
    fn canonical_json_sorts_nested_objects() {
        let v = json!({"b": {"y": 2, "x": 1}, "a": [3, {"k": true}]});
        assert_eq!(
            canonical_json(&v),
            r#"{"a":[3,{"k":true}],"b":{"x":1,"y":2}}"#
        );
    }
}
