// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the orchestration pipeline: admit tools, plan a
//! turn, dispatch the model's tool calls, and observe cache behavior
//! across turns.

use serde_json::json;
use tiller_config::TillerConfig;
use tiller_core::{Query, ToolCall, ToolDescriptor, ToolSource};
use tiller_router::{OrchestrationRouter, ToolChoice};
use tiller_test_utils::MockExecutor;

fn search_tool(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor::new(
        name,
        description,
        Some(json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        })),
        ToolSource::Dynamic,
    )
}

fn router_with_tools() -> OrchestrationRouter {
    let mut router = OrchestrationRouter::new(&TillerConfig::default());
    let report = router.admit_tools(
        "sales-assistant",
        vec![
            search_tool("tavilySearch", "Search the public web"),
            search_tool("queryKnowledgeBase", "Query the internal knowledge base"),
            ToolDescriptor::new("listDocuments", "List available documents", None, ToolSource::Fixed),
            ToolDescriptor::new(
                "getDocument",
                "Fetch a document by name",
                Some(json!({
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                })),
                ToolSource::Fixed,
            ),
        ],
    );
    assert!(!report.breaker_tripped);
    assert_eq!(report.admitted.len(), 4);
    router
}

#[test]
fn explicit_listing_request_forces_the_listing_tool() {
    let router = router_with_tools();
    let plan = router.plan_turn(&Query::new("list all the available documents", Vec::new()));

    assert!(plan.classification.use_tool_path);
    assert_eq!(
        plan.tool_choice,
        Some(ToolChoice::Tool {
            name: "listDocuments".to_string()
        })
    );
    // The full admitted set is advertised even when one tool is forced.
    assert_eq!(plan.tools.len(), 4);
    assert_eq!(plan.tools[0]["name"], "getDocument");
}

#[test]
fn competing_intents_require_a_tool_without_naming_one() {
    let router = router_with_tools();
    let plan = router.plan_turn(&Query::new(
        "search the web for recent news about Acme Corp and check our knowledge base for client research",
        Vec::new(),
    ));

    assert!(plan.classification.use_tool_path);
    assert_eq!(plan.tool_choice, Some(ToolChoice::Any));
}

#[test]
fn greeting_takes_the_chat_path() {
    let router = router_with_tools();
    let plan = router.plan_turn(&Query::new("thanks, that was helpful!", Vec::new()));

    assert!(!plan.classification.use_tool_path);
    assert!(plan.tool_choice.is_none());
    assert!(plan.tools.is_empty());
}

#[test]
fn breaker_tripped_batch_leaves_registry_empty() {
    let mut router = OrchestrationRouter::new(&TillerConfig::default());
    let broken = ToolDescriptor::new(
        "badTool",
        "array with no item type",
        Some(json!({
            "type": "object",
            "properties": { "tags": { "type": "array" } }
        })),
        ToolSource::Dynamic,
    );
    let report = router.admit_tools("flaky-provider", vec![broken.clone(), broken]);

    assert!(report.breaker_tripped);
    assert!(router.registry().is_empty());

    // A forced-tool classification degrades to auto against the empty registry.
    let plan = router.plan_turn(&Query::new("list all the available documents", Vec::new()));
    assert_eq!(plan.tool_choice, Some(ToolChoice::Auto));
}

#[tokio::test]
async fn dispatched_calls_hit_cache_on_the_next_turn() {
    let router = router_with_tools();
    let executor = MockExecutor::new().with_response("tavilySearch", "search payload");

    let first = router
        .dispatch_tool_calls(
            &[ToolCall::new(
                "c1",
                "tavilySearch",
                json!({"query": "LWCC mission"}),
            )],
            &executor,
        )
        .await;
    assert_eq!(first.summary.executed, 1);

    // Reworded but semantically identical on the next turn.
    let second = router
        .dispatch_tool_calls(
            &[ToolCall::new(
                "c2",
                "tavilySearch",
                json!({"query": "the mission of LWCC"}),
            )],
            &executor,
        )
        .await;
    assert_eq!(second.summary.cached, 1);
    assert_eq!(second.results[0].content, "search payload");
    assert_eq!(executor.call_count().await, 1);

    let stats = router.cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.total_calls, 2);
}

#[tokio::test]
async fn mixed_batch_isolates_failures_and_preserves_order() {
    let router = router_with_tools();
    let executor = MockExecutor::new()
        .with_response("listDocuments", "doc index")
        .with_failure("queryKnowledgeBase");

    let calls = vec![
        ToolCall::new("c1", "listDocuments", json!({})),
        ToolCall::new("c2", "queryKnowledgeBase", json!({"query": "acme"})),
        ToolCall::new("c3", "getDocument", json!({"name": "mission statement"})),
    ];
    let report = router.dispatch_tool_calls(&calls, &executor).await;

    let ids: Vec<&str> = report.results.iter().map(|r| r.call_id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    assert!(!report.results[0].is_error);
    assert!(report.results[1].is_error);
    assert!(!report.results[2].is_error);
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn duplicate_calls_in_one_batch_execute_once() {
    let router = router_with_tools();
    let executor = MockExecutor::new();

    let calls = vec![
        ToolCall::new("c1", "listDocuments", json!({})),
        ToolCall::new("c2", "listDocuments", json!({"filter": "all"})),
    ];
    let report = router.dispatch_tool_calls(&calls, &executor).await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].call_id, "c1");
    assert_eq!(executor.call_count().await, 1);
}
