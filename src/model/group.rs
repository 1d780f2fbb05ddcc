//! Group model.
//!
//! Groups are the top level of the catalog. Every site belongs to exactly
//! one group, and deleting a group deletes its sites.

use serde::{Deserialize, Serialize};

/// A group of sites.
///
/// `id` is optional so that envelopes produced elsewhere (where the id is
/// meaningless to us) still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Storage-assigned identifier
    #[serde(default)]
    pub id: Option<i64>,

    /// Display name, unique within a catalog
    pub name: String,

    /// Display order among groups
    #[serde(default)]
    pub order_num: i64,

    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,

    /// Last update timestamp (RFC 3339)
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for creating a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub order_num: i64,
}

impl NewGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, order_num: i64) -> Self {
        Self {
            name: name.into(),
            order_num,
        }
    }
}

/// Partial update for a group. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_num: Option<i64>,
}

impl GroupPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.order_num.is_none()
    }
}
