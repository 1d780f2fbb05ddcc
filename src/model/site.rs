//! Site model.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// A bookmarked site inside a group.
///
/// Within one group, `url` identifies the site; the same URL may appear in
/// different groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Storage-assigned identifier
    #[serde(default)]
    pub id: Option<i64>,

    /// Owning group
    pub group_id: i64,

    pub name: String,

    pub url: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub icon: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,

    /// Display order within the group
    #[serde(default)]
    pub order_num: i64,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for creating a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSite {
    pub group_id: i64,
    pub name: String,
    pub url: String,
    pub icon: String,
    pub description: String,
    pub notes: String,
    pub order_num: i64,
}

impl NewSite {
    /// Build a creation payload from a snapshot site, targeting `group_id`.
    ///
    /// The snapshot's own id and timestamps are dropped.
    #[must_use]
    pub fn from_snapshot(site: &Site, group_id: i64) -> Self {
        Self {
            group_id,
            name: site.name.clone(),
            url: site.url.clone(),
            icon: site.icon.clone(),
            description: site.description.clone(),
            notes: site.notes.clone(),
            order_num: site.order_num,
        }
    }
}

/// Partial update for a site. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_num: Option<i64>,
}

impl SitePatch {
    /// The descriptive fields an import refreshes on an existing site.
    ///
    /// `order_num` stays out so the destination's ordering is kept.
    #[must_use]
    pub fn descriptive_from(site: &NewSite) -> Self {
        Self {
            name: Some(site.name.clone()),
            icon: Some(site.icon.clone()),
            description: Some(site.description.clone()),
            notes: Some(site.notes.clone()),
            ..Self::default()
        }
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group_id.is_none()
            && self.name.is_none()
            && self.url.is_none()
            && self.icon.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.order_num.is_none()
    }
}
