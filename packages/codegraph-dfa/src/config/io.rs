//! Configuration file schema (YAML v1)

use serde::{Deserialize, Serialize};

use super::dfa_config::{BugKind, DfaConfig};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<DfaConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DfaConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug_kind: Option<BugKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_depth: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_traces_per_entry: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_sensitive: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_all_callees: Option<bool>,
}

impl From<&DfaConfig> for DfaConfigOverrides {
    fn from(config: &DfaConfig) -> Self {
        Self {
            bug_kind: Some(config.bug_kind),
            max_search_depth: Some(config.max_search_depth),
            max_traces_per_entry: Some(config.max_traces_per_entry),
            path_sensitive: Some(config.path_sensitive),
            analyze_all_callees: Some(config.analyze_all_callees),
        }
    }
}
