use serde::{Deserialize, Serialize};

use crate::{error::DResult, models::MergePolicy};

pub const DEFAULT_PICKUP_TIME: &str = "8:00am";
pub const DEFAULT_REMARK_MARKERS: [&str; 6] = ["e.g.", "eg:", "example", "remark", "note", "#"];

/// Settings for one dispatch session. Every field is optional when loaded
/// from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    default_time: String,
    merge_policy: MergePolicy,
    remark_markers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_time: DEFAULT_PICKUP_TIME.to_string(),
            merge_policy: MergePolicy::default(),
            remark_markers: DEFAULT_REMARK_MARKERS.map(String::from).to_vec(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> DResult<Self> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn with_default_time(mut self, default_time: &str) -> Self {
        self.default_time = default_time.trim().to_string();
        self
    }

    pub fn with_merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = merge_policy;
        self
    }

    pub fn with_remark_markers(mut self, remark_markers: Vec<String>) -> Self {
        self.remark_markers = remark_markers;
        self
    }

    // Getters/Setters

    pub fn default_time(&self) -> &str {
        &self.default_time
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    pub fn remark_markers(&self) -> &[String] {
        &self.remark_markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_time(), "8:00am");
        assert_eq!(config.merge_policy(), MergePolicy::FullGroup);
        assert!(config.remark_markers().contains(&"e.g.".to_string()));
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"merge_policy": "capacity-constrained"}"#).unwrap();
        assert_eq!(config.merge_policy(), MergePolicy::CapacityConstrained);
        assert_eq!(config.default_time(), "8:00am");
    }

    #[test]
    fn test_from_json_full() {
        let config = Config::from_json(
            r#"{"default_time": "7:30am", "merge_policy": "full-group", "remark_markers": ["//"]}"#,
        )
        .unwrap();
        assert_eq!(config.default_time(), "7:30am");
        assert_eq!(config.remark_markers(), &["//".to_string()]);
    }

    #[test]
    fn test_from_json_rejects_unknown_policy() {
        let result = Config::from_json(r#"{"merge_policy": "greedy"}"#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid configuration"));
    }
}
