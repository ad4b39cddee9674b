//! Relationship (edge) in the snapshot view model.

use serde::{Deserialize, Serialize};
use super::ElementId;

/// A directed, typed edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: ElementId,
    pub from: ElementId,
    pub to: ElementId,
    #[serde(rename = "type")]
    pub rel_type: String,
}

impl Relationship {
    pub fn new(
        id: impl Into<ElementId>,
        from: impl Into<ElementId>,
        to: impl Into<ElementId>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            rel_type: rel_type.into(),
        }
    }

    /// The "other" end of the relationship from the given entity.
    pub fn other_end(&self, from: &ElementId) -> Option<&ElementId> {
        if *from == self.from { Some(&self.to) }
        else if *from == self.to { Some(&self.from) }
        else { None }
    }
}
