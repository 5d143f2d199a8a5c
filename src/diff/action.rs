//! Resource change classification

use serde::{Deserialize, Serialize};

/// The classified nature of a change to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Resource will be created
    Create,
    /// Resource will be updated in-place
    Update,
    /// Resource will be destroyed
    Delete,
    /// Resource will be destroyed and recreated
    Replace,
    /// No changes
    NoOp,
}

impl Action {
    /// Classify the primitive action set reported by the plan.
    ///
    /// Both `create` and `delete` present means the resource is replaced.
    /// An unrecognized combination maps to `NoOp` rather than failing.
    pub fn from_actions<S: AsRef<str>>(actions: &[S]) -> Self {
        let has = |wanted: &str| actions.iter().any(|a| a.as_ref() == wanted);

        if has("create") && has("delete") {
            Action::Replace
        } else if has("create") {
            Action::Create
        } else if has("delete") {
            Action::Delete
        } else if has("update") {
            Action::Update
        } else {
            Action::NoOp
        }
    }

    /// Get the symbol used to represent this action
    pub fn symbol(&self) -> &'static str {
        match self {
            Action::Create => "+",
            Action::Update => "~",
            Action::Delete => "-",
            Action::Replace => "±",
            Action::NoOp => " ",
        }
    }

    /// Get the label for this action
    pub fn label(&self) -> &'static str {
        match self {
            Action::Create => "will be created",
            Action::Update => "will be updated",
            Action::Delete => "will be destroyed",
            Action::Replace => "must be replaced",
            Action::NoOp => "no changes",
        }
    }

    /// Get the plan-level name for this action (e.g., "no-op")
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Replace => "replace",
            Action::NoOp => "no-op",
        }
    }
}
