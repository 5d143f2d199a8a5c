//! Typed model of the plan JSON format

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed plan document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerraformPlan {
    /// Plan JSON format version (e.g., "1.2")
    #[serde(default)]
    pub format_version: String,

    /// Version of the tool that produced the plan
    #[serde(default)]
    pub terraform_version: String,

    /// Plan creation timestamp, when present
    #[serde(default)]
    pub timestamp: Option<String>,

    /// All resource changes in plan order
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

/// One changed resource within a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Full resource address (e.g., "module.vpc.aws_subnet.main")
    pub address: String,

    /// Module address; None or empty for the root module
    #[serde(default)]
    pub module_address: Option<String>,

    /// Resource type (e.g., "aws_instance")
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource name within its type
    pub name: String,

    /// Provider that manages the resource
    #[serde(default)]
    pub provider_name: String,

    /// The before/after change details
    pub change: Change,
}

/// Change details for a single resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    /// Primitive actions applied to the resource ("create", "delete", ...)
    #[serde(default)]
    pub actions: Vec<String>,

    /// State before the change (null for create)
    #[serde(default)]
    pub before: Option<Value>,

    /// State after the change (null for delete)
    #[serde(default)]
    pub after: Option<Value>,

    /// Sensitivity markers for the before state
    #[serde(default)]
    pub before_sensitive: Option<Value>,

    /// Sensitivity markers for the after state
    #[serde(default)]
    pub after_sensitive: Option<Value>,

    /// Attribute paths forcing replacement; each path is a list of
    /// member-name / array-index steps
    #[serde(default)]
    pub replace_paths: Option<Vec<Vec<Value>>>,
}

impl Change {
    /// Flatten the replace paths into dotted/bracketed path strings
    /// matching the attribute differ's key format.
    pub fn replace_path_strings(&self) -> Vec<String> {
        self.replace_paths
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|steps| flatten_path_steps(steps))
            .collect()
    }
}

fn flatten_path_steps(steps: &[Value]) -> String {
    let mut path = String::new();

    for step in steps {
        match step {
            Value::String(name) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(name);
            }
            Value::Number(index) => {
                path.push('[');
                path.push_str(&index.to_string());
                path.push(']');
            }
            _ => {}
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replace_path_strings() {
        let change = Change {
            replace_paths: Some(vec![
                vec![json!("network"), json!("subnets"), json!(0), json!("cidr")],
                vec![json!("name")],
            ]),
            ..Default::default()
        };

        assert_eq!(
            change.replace_path_strings(),
            vec!["network.subnets[0].cidr".to_string(), "name".to_string()]
        );
    }

    #[test]
    fn test_replace_path_strings_empty_when_absent() {
        let change = Change::default();

        assert!(change.replace_path_strings().is_empty());
    }
}
