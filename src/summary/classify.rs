//! Action classification.
//!
//! Every resource change is folded into exactly one of three action
//! classes. Replacements carry both `delete` and `create` and count as
//! creates.

use serde::Serialize;

use crate::plan::{PlanAction, ResourceChange};

/// The class a resource change is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionClass {
    /// Resource will be created (or replaced).
    Create,
    /// Resource will be updated in place.
    Update,
    /// Resource will be destroyed.
    Delete,
}

/// A resource change whose actions match no class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedActionWarning {
    /// Address of the resource.
    pub address: String,
    /// The action tokens that could not be classified.
    pub actions: Vec<PlanAction>,
}

impl ActionClass {
    /// All classes in display order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Returns the row label used in summary tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "ADD",
            Self::Update => "CHANGE",
            Self::Delete => "DESTROY",
        }
    }
}

impl std::fmt::Display for ActionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// Classifies an action list.
///
/// `create` wins over `update`, which wins over `delete`. Returns `None` when
/// none of the three appear.
#[must_use]
pub fn classify(actions: &[PlanAction]) -> Option<ActionClass> {
    if actions.contains(&PlanAction::Create) {
        Some(ActionClass::Create)
    } else if actions.contains(&PlanAction::Update) {
        Some(ActionClass::Update)
    } else if actions.contains(&PlanAction::Delete) {
        Some(ActionClass::Delete)
    } else {
        None
    }
}

/// Classifies a resource change, producing a warning for unknown actions.
///
/// # Errors
///
/// Returns an [`UnrecognizedActionWarning`] when no class matches.
pub fn classify_change(change: &ResourceChange) -> Result<ActionClass, UnrecognizedActionWarning> {
    classify(&change.actions).ok_or_else(|| UnrecognizedActionWarning {
        address: change.address.clone(),
        actions: change.actions.clone(),
    })
}

impl std::fmt::Display for UnrecognizedActionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let actions = self
            .actions
            .iter()
            .map(PlanAction::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Unknown resource change action for {}: [{actions}]", self.address)
    }
}
