//! Record structs mapped onto the Diesel schema.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    actor::Role,
    status::{BountyStatus, CommunityStatus, DemoStatus, Layer, MembershipStatus},
};

/// A registered user.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    /// Record id.
    pub id: String,
    /// Unique display/login name.
    pub username: String,
    /// Platform role.
    pub role: Role,
    /// Registration time (UTC).
    pub created_at: NaiveDateTime,
}

/// Insertable user record.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    /// Record id.
    pub id: &'a str,
    /// Unique display/login name.
    pub username: &'a str,
    /// Platform role.
    pub role: Role,
    /// Registration time (UTC).
    pub created_at: NaiveDateTime,
}

/// A user-created community.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::communities)]
pub struct Community {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// The creating user; permanently the community's sole administrator.
    pub creator_id: String,
    /// 12-digit join code, regenerable by the creator.
    pub code: String,
    /// Review state.
    pub status: CommunityStatus,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

/// Insertable community record.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::communities)]
pub struct NewCommunity<'a> {
    /// Record id.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Optional free-text description.
    pub description: Option<&'a str>,
    /// The creating user.
    pub creator_id: &'a str,
    /// 12-digit join code.
    pub code: &'a str,
    /// Review state.
    pub status: CommunityStatus,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

/// A `(community, user)` membership row.
///
/// Absence of a row means the user has no relationship with the community;
/// kick and reject delete the row rather than tombstoning it.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::community_members)]
pub struct CommunityMember {
    /// Owning community.
    pub community_id: String,
    /// Member or applicant.
    pub user_id: String,
    /// Pending request or full membership.
    pub status: MembershipStatus,
    /// When the row was created (UTC).
    pub joined_at: NaiveDateTime,
}

/// Insertable membership row.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::community_members)]
pub struct NewCommunityMember<'a> {
    /// Owning community.
    pub community_id: &'a str,
    /// Member or applicant.
    pub user_id: &'a str,
    /// Pending request or full membership.
    pub status: MembershipStatus,
    /// When the row was created (UTC).
    pub joined_at: NaiveDateTime,
}

/// A node in a community's category tree.
///
/// The general layer uses the fixed subject list in [`crate::subjects`],
/// not category rows.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Parent category; `None` marks a root.
    pub parent_id: Option<String>,
    /// Owning community.
    pub community_id: String,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

/// Insertable category record.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    /// Record id.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Parent category; `None` marks a root.
    pub parent_id: Option<&'a str>,
    /// Owning community.
    pub community_id: &'a str,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

/// A submitted interactive demo.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::demos)]
pub struct Demo {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Subject name (general layer) or category id (community layer).
    /// `None` after a detaching category deletion.
    pub category_id: Option<String>,
    /// Owning layer.
    pub layer: Layer,
    /// Owning community; required iff `layer` is community.
    pub community_id: Option<String>,
    /// HTML/JS source text.
    pub code: String,
    /// Submitting user's id.
    pub author_id: String,
    /// Optional thumbnail URL or data URI.
    pub thumbnail_url: Option<String>,
    /// Moderation state.
    pub status: DemoStatus,
    /// Moderator-supplied reason when rejected.
    pub rejection_reason: Option<String>,
    /// Optional provenance link to a bounty.
    pub bounty_id: Option<String>,
    /// Submission time (UTC).
    pub created_at: NaiveDateTime,
}

/// Insertable demo record.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::demos)]
pub struct NewDemo<'a> {
    /// Record id.
    pub id: &'a str,
    /// Title.
    pub title: &'a str,
    /// Optional free-text description.
    pub description: Option<&'a str>,
    /// Subject name or category id.
    pub category_id: Option<&'a str>,
    /// Owning layer.
    pub layer: Layer,
    /// Owning community; required iff `layer` is community.
    pub community_id: Option<&'a str>,
    /// HTML/JS source text.
    pub code: &'a str,
    /// Submitting user's id.
    pub author_id: &'a str,
    /// Optional thumbnail URL or data URI.
    pub thumbnail_url: Option<&'a str>,
    /// Moderation state.
    pub status: DemoStatus,
    /// Optional provenance link to a bounty.
    pub bounty_id: Option<&'a str>,
    /// Submission time (UTC).
    pub created_at: NaiveDateTime,
}

/// A posted bounty inviting demo submissions.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::bounties)]
pub struct Bounty {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Free-text reward.
    pub reward: String,
    /// Owning layer.
    pub layer: Layer,
    /// Owning community; required iff `layer` is community.
    pub community_id: Option<String>,
    /// Lifecycle state.
    pub status: BountyStatus,
    /// Posting user's id.
    pub creator_id: String,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

/// Insertable bounty record.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::bounties)]
pub struct NewBounty<'a> {
    /// Record id.
    pub id: &'a str,
    /// Title.
    pub title: &'a str,
    /// Optional free-text description.
    pub description: Option<&'a str>,
    /// Free-text reward.
    pub reward: &'a str,
    /// Owning layer.
    pub layer: Layer,
    /// Owning community; required iff `layer` is community.
    pub community_id: Option<&'a str>,
    /// Lifecycle state.
    pub status: BountyStatus,
    /// Posting user's id.
    pub creator_id: &'a str,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

/// A like flag on a demo; the demo's like count is the row count.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::demo_likes)]
pub struct DemoLike {
    /// Liked demo.
    pub demo_id: String,
    /// Liking user.
    pub user_id: String,
    /// When the like was recorded (UTC).
    pub created_at: NaiveDateTime,
}

/// Insertable like row.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::demo_likes)]
pub struct NewDemoLike<'a> {
    /// Liked demo.
    pub demo_id: &'a str,
    /// Liking user.
    pub user_id: &'a str,
    /// When the like was recorded (UTC).
    pub created_at: NaiveDateTime,
}
