//! Analysis configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, DfaConfigOverrides};
use super::preset::Preset;
use super::validation::Validatable;

/// Bug class the rule-based classifier looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BugKind {
    /// Divide-by-zero
    #[default]
    Dbz,
    /// Cross-site scripting
    Xss,
}

impl BugKind {
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "dbz" => Ok(Self::Dbz),
            "xss" => Ok(Self::Xss),
            _ => Err(ConfigError::UnknownBugKind(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dbz => "dbz",
            Self::Xss => "xss",
        }
    }
}

impl std::fmt::Display for BugKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data-flow analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfaConfig {
    /// Bug class to detect
    pub bug_kind: BugKind,

    /// Interprocedural hops allowed on one search branch (1..=4096)
    pub max_search_depth: usize,

    /// Candidate traces kept per source function (1..=1000000)
    pub max_traces_per_entry: usize,

    /// Consult the trace validator before confirming a candidate
    pub path_sensitive: bool,

    /// Analyze every resolved callee of a call site, not just the first
    #[serde(default = "default_true")]
    pub analyze_all_callees: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DfaConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl DfaConfig {
    /// Complete configuration for a preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                bug_kind: BugKind::Dbz,
                max_search_depth: 16,
                max_traces_per_entry: 100,
                path_sensitive: false,
                analyze_all_callees: true,
            },
            Preset::Balanced => Self {
                bug_kind: BugKind::Dbz,
                max_search_depth: 64,
                max_traces_per_entry: 1000,
                path_sensitive: true,
                analyze_all_callees: true,
            },
            Preset::Thorough => Self {
                bug_kind: BugKind::Dbz,
                max_search_depth: 256,
                max_traces_per_entry: 10_000,
                path_sensitive: true,
                analyze_all_callees: true,
            },
        }
    }

    /// Builder: Set bug_kind
    pub fn bug_kind(mut self, v: BugKind) -> Self {
        self.bug_kind = v;
        self
    }

    /// Builder: Set max_search_depth
    pub fn max_search_depth(mut self, v: usize) -> Self {
        self.max_search_depth = v;
        self
    }

    /// Builder: Set max_traces_per_entry
    pub fn max_traces_per_entry(mut self, v: usize) -> Self {
        self.max_traces_per_entry = v;
        self
    }

    /// Builder: Set path_sensitive
    pub fn path_sensitive(mut self, v: bool) -> Self {
        self.path_sensitive = v;
        self
    }

    /// Builder: Set analyze_all_callees
    pub fn analyze_all_callees(mut self, v: bool) -> Self {
        self.analyze_all_callees = v;
        self
    }

    /// Apply the fields present in `overrides`
    pub fn apply_overrides(mut self, overrides: &DfaConfigOverrides) -> Self {
        if let Some(v) = overrides.bug_kind {
            self.bug_kind = v;
        }
        if let Some(v) = overrides.max_search_depth {
            self.max_search_depth = v;
        }
        if let Some(v) = overrides.max_traces_per_entry {
            self.max_traces_per_entry = v;
        }
        if let Some(v) = overrides.path_sensitive {
            self.path_sensitive = v;
        }
        if let Some(v) = overrides.analyze_all_callees {
            self.analyze_all_callees = v;
        }
        self
    }

    /// Load and validate a YAML v1 configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = match file.preset.as_deref() {
            Some(name) => {
                Preset::from_str(name).map_err(|_| ConfigError::UnknownPreset(name.to_string()))?
            }
            None => Preset::default(),
        };

        let mut config = Self::from_preset(preset);
        if let Some(overrides) = &file.overrides {
            config = config.apply_overrides(overrides);
        }
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML v1 (preset `balanced` plus every field as an override)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: Some(Preset::Balanced.as_str().to_string()),
            overrides: Some(DfaConfigOverrides::from(self)),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Validatable for DfaConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_search_depth == 0 || self.max_search_depth > 4096 {
            return Err(ConfigError::range_with_hint(
                "max_search_depth",
                self.max_search_depth,
                1,
                4096,
                "Search depth must be at least 1 and bounded",
            ));
        }

        if self.max_traces_per_entry == 0 || self.max_traces_per_entry > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "max_traces_per_entry",
                self.max_traces_per_entry,
                1,
                1_000_000,
                "Number of candidate traces must be reasonable",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "DfaConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            assert!(DfaConfig::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_fast_preset_skips_validation() {
        let config = DfaConfig::from_preset(Preset::Fast);
        assert!(!config.path_sensitive);
        assert_eq!(config.max_search_depth, 16);
    }

    #[test]
    fn test_range_checks() {
        let config = DfaConfig::default().max_search_depth(0);
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));

        let config = DfaConfig::default().max_traces_per_entry(2_000_000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bug_kind_parsing() {
        assert_eq!(BugKind::from_str("XSS").unwrap(), BugKind::Xss);
        assert!(matches!(
            BugKind::from_str("sqli"),
            Err(ConfigError::UnknownBugKind(_))
        ));
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
version: 1
preset: fast
overrides:
  bug_kind: xss
  max_search_depth: 32
"#;
        let config = DfaConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.bug_kind, BugKind::Xss);
        assert_eq!(config.max_search_depth, 32);
        // Untouched fields keep the preset value
        assert_eq!(config.max_traces_per_entry, 100);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = DfaConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = DfaConfig::from_yaml_str("version: 2\npreset: fast\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_invalid_override_rejected() {
        let yaml = "version: 1\noverrides:\n  max_search_depth: 0\n";
        assert!(DfaConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = DfaConfig::from_preset(Preset::Thorough).bug_kind(BugKind::Xss);
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert_eq!(DfaConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
