// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool descriptor admission with a per-provider circuit breaker.
//!
//! The registry validates each declared schema before the tool reaches the
//! calling model's function-calling interface, and generates the
//! provider-format tool definition array for admitted tools.

use std::collections::HashMap;

use serde_json::{json, Value};
use tiller_config::RegistryConfig;
use tiller_core::ToolDescriptor;
use tracing::{debug, info, warn};

use crate::schema::SchemaNode;

/// A descriptor that failed validation, with the reasons.
#[derive(Debug, Clone)]
pub struct RejectedTool {
    pub descriptor: ToolDescriptor,
    pub reasons: Vec<String>,
}

/// Outcome of admitting one provider's batch of descriptors.
#[derive(Debug, Clone, Default)]
pub struct AdmissionReport {
    pub admitted: Vec<ToolDescriptor>,
    pub rejected: Vec<RejectedTool>,
    /// True when the whole batch was rejected because the admission ratio
    /// fell below the configured minimum.
    pub breaker_tripped: bool,
    /// Operator-facing reason when the breaker trips.
    pub breaker_reason: Option<String>,
}

/// Registry of admitted tools, indexed by name.
///
/// Descriptors are immutable once admitted. Admission happens once per
/// provider-connect event; the admissible set then feeds the layer that
/// advertises available tools to the model.
pub struct ToolRegistry {
    config: RegistryConfig,
    tools: HashMap<String, AdmittedTool>,
}

struct AdmittedTool {
    descriptor: ToolDescriptor,
    schema: SchemaNode,
}

impl ToolRegistry {
    /// Creates an empty registry with the given admission settings.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            tools: HashMap::new(),
        }
    }

    /// Validate and admit one provider's batch of descriptors.
    ///
    /// Each descriptor with a declared schema undergoes structural
    /// validation (see [`SchemaNode`]); schemaless descriptors are admitted
    /// with a permissive accept-any-object schema. When the admission ratio
    /// (admitted/declared) falls below the configured minimum, the entire
    /// batch is rejected: a provider emitting mostly-broken schemas is more
    /// likely to destabilize the function-calling layer than to provide
    /// marginal value from its few valid tools.
    pub fn admit_batch(
        &mut self,
        provider: &str,
        descriptors: Vec<ToolDescriptor>,
    ) -> AdmissionReport {
        let declared = descriptors.len();
        let mut candidates: Vec<(ToolDescriptor, SchemaNode)> = Vec::new();
        let mut rejected: Vec<RejectedTool> = Vec::new();

        for descriptor in descriptors {
            match validate_descriptor(&descriptor) {
                Ok(schema) => candidates.push((descriptor, schema)),
                Err(reasons) => {
                    debug!(
                        provider,
                        tool = descriptor.name.as_str(),
                        ?reasons,
                        "tool rejected by schema validation"
                    );
                    rejected.push(RejectedTool {
                        descriptor,
                        reasons,
                    });
                }
            }
        }

        if declared > 0 {
            let ratio = candidates.len() as f64 / declared as f64;
            if ratio < self.config.min_admission_ratio {
                let reason = format!(
                    "provider `{provider}` admission ratio {:.2} below minimum {:.2} \
                     ({}/{declared} tools valid); rejecting entire batch",
                    ratio,
                    self.config.min_admission_ratio,
                    candidates.len(),
                );
                warn!(provider, ratio, "circuit breaker tripped: {reason}");
                rejected.extend(candidates.into_iter().map(|(descriptor, _)| RejectedTool {
                    descriptor,
                    reasons: vec!["provider circuit breaker tripped".to_string()],
                }));
                return AdmissionReport {
                    admitted: Vec::new(),
                    rejected,
                    breaker_tripped: true,
                    breaker_reason: Some(reason),
                };
            }
        }

        let mut admitted = Vec::with_capacity(candidates.len());
        for (descriptor, schema) in candidates {
            admitted.push(descriptor.clone());
            self.tools.insert(
                descriptor.name.clone(),
                AdmittedTool { descriptor, schema },
            );
        }

        info!(
            provider,
            admitted = admitted.len(),
            rejected = rejected.len(),
            "tool batch admitted"
        );

        AdmissionReport {
            admitted,
            rejected,
            breaker_tripped: false,
            breaker_reason: None,
        }
    }

    /// Looks up an admitted descriptor by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name).map(|t| &t.descriptor)
    }

    /// Whether a tool with this name has been admitted.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns (name, description) pairs for all admitted tools, sorted.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|t| (t.descriptor.name.as_str(), t.descriptor.description.as_str()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Returns provider-format tool definitions for all admitted tools.
    ///
    /// Each definition has the shape:
    /// ```json
    /// {
    ///   "name": "tool_name",
    ///   "description": "What the tool does",
    ///   "input_schema": { ... }
    /// }
    /// ```
    pub fn tool_definitions(&self) -> Vec<Value> {
        let mut defs: Vec<Value> = self
            .tools
            .values()
            .map(|t| {
                json!({
                    "name": t.descriptor.name,
                    "description": t.descriptor.description,
                    "input_schema": t.schema.to_provider_schema(),
                })
            })
            .collect();
        defs.sort_by(|a, b| {
            a["name"]
                .as_str()
                .unwrap_or("")
                .cmp(b["name"].as_str().unwrap_or(""))
        });
        defs
    }

    /// Returns the number of admitted tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are admitted.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

/// Validate one descriptor, producing its typed schema on success.
///
/// A missing schema is not a defect: the tool falls back to the permissive
/// accept-any-object schema at call time.
fn validate_descriptor(descriptor: &ToolDescriptor) -> Result<SchemaNode, Vec<String>> {
    let mut reasons = Vec::new();

    if descriptor.name.trim().is_empty() {
        reasons.push("tool name must not be empty".to_string());
    }

    let schema = match &descriptor.schema {
        None => SchemaNode::permissive(),
        Some(value) => match SchemaNode::from_value(value) {
            Ok(node) => {
                for violation in node.validate() {
                    reasons.push(violation.to_string());
                }
                node
            }
            Err(violation) => {
                reasons.push(format!("schema not convertible: {violation}"));
                SchemaNode::permissive()
            }
        },
    };

    if reasons.is_empty() {
        Ok(schema)
    } else {
        Err(reasons)
    }
}
