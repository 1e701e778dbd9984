//! Bounty posting and lifecycle.

use chrono::Utc;
use tracing::info;

use crate::{
    actor::ActorContext,
    db::{self, DbConnection},
    error::HubError,
    models::{Bounty, Community, NewBounty},
    status::{BountyStatus, Layer},
    visibility,
};

/// A bounty posting.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BountyDraft {
    /// Title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Free-text reward.
    pub reward: String,
    /// Target layer.
    pub layer: Layer,
    /// Owning community; required iff `layer` is community.
    pub community_id: Option<String>,
}

/// Post a bounty.
///
/// Community bounties are restricted to the community's members.
///
/// # Errors
///
/// Returns [`HubError::Validation`] when the layer and community
/// reference disagree or required text is missing, and
/// [`HubError::Permission`] when posting into a community the actor is
/// not a member of.
pub async fn create_bounty(
    conn: &mut DbConnection,
    actor: &ActorContext,
    draft: &BountyDraft,
) -> Result<Bounty, HubError> {
    if draft.title.trim().is_empty() {
        return Err(HubError::validation("bounty title must not be empty"));
    }
    if draft.reward.trim().is_empty() {
        return Err(HubError::validation("bounty reward must not be empty"));
    }
    match draft.layer {
        Layer::General => {
            if draft.community_id.is_some() {
                return Err(HubError::validation(
                    "general-layer content cannot reference a community",
                ));
            }
        }
        Layer::Community => {
            let community_id = draft.community_id.as_deref().ok_or_else(|| {
                HubError::validation("community-layer content requires a community id")
            })?;
            super::require_community(conn, community_id).await?;
            let state = super::membership_state(conn, community_id, actor).await?;
            if !visibility::can_view_layer(actor, Layer::Community, state) {
                return Err(HubError::permission(
                    "you must be a member to post in this community",
                ));
            }
        }
    }
    let id = super::new_id("bounty");
    let row = NewBounty {
        id: &id,
        title: draft.title.trim(),
        description: draft.description.as_deref(),
        reward: draft.reward.trim(),
        layer: draft.layer,
        community_id: draft.community_id.as_deref(),
        status: BountyStatus::Open,
        creator_id: &actor.id,
        created_at: Utc::now().naive_utc(),
    };
    db::create_bounty(conn, &row).await?;
    let created = db::get_bounty(conn, &id)
        .await?
        .ok_or(HubError::NotFound("bounty"))?;
    info!(bounty_id = %created.id, layer = %created.layer, "bounty posted");
    Ok(created)
}

/// List bounties in a layer, optionally filtered by status.
///
/// Community bounties are visible to members and general admins only.
///
/// # Errors
///
/// Returns [`HubError::Validation`] when a community listing lacks a
/// community id and [`HubError::Permission`] for non-members.
pub async fn list_bounties(
    conn: &mut DbConnection,
    actor: &ActorContext,
    layer: Layer,
    community_id: Option<&str>,
    status: Option<BountyStatus>,
) -> Result<Vec<Bounty>, HubError> {
    match layer {
        Layer::General => {}
        Layer::Community => {
            let id = community_id.ok_or_else(|| {
                HubError::validation("community listing requires a community id")
            })?;
            super::require_community(conn, id).await?;
            let state = super::membership_state(conn, id, actor).await?;
            if !visibility::can_view_layer(actor, Layer::Community, state) {
                return Err(HubError::permission(
                    "this community's bounties are visible to members only",
                ));
            }
        }
    }
    Ok(db::list_bounties(conn, Some(layer), community_id, status).await?)
}

async fn bounty_community(
    conn: &mut DbConnection,
    bounty: &Bounty,
) -> Result<Option<Community>, HubError> {
    match bounty.community_id.as_deref() {
        Some(id) => Ok(Some(super::require_community(conn, id).await?)),
        None => Ok(None),
    }
}

/// Close an open bounty.
///
/// Closing is the only modelled transition; a closed bounty stays
/// closed.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown bounty,
/// [`HubError::Permission`] unless the actor manages it, and
/// [`HubError::Conflict`] when the bounty is already closed.
pub async fn update_bounty_status(
    conn: &mut DbConnection,
    actor: &ActorContext,
    bounty_id: &str,
    new_status: BountyStatus,
) -> Result<Bounty, HubError> {
    let bounty = db::get_bounty(conn, bounty_id)
        .await?
        .ok_or(HubError::NotFound("bounty"))?;
    let community = bounty_community(conn, &bounty).await?;
    if !visibility::can_manage_bounty(actor, &bounty, community.as_ref()) {
        return Err(HubError::permission("you cannot manage this bounty"));
    }
    if !(bounty.status == BountyStatus::Open && new_status == BountyStatus::Closed) {
        return Err(HubError::conflict("only an open bounty can be closed"));
    }
    db::set_bounty_status(conn, bounty_id, new_status).await?;
    let updated = db::get_bounty(conn, bounty_id)
        .await?
        .ok_or(HubError::NotFound("bounty"))?;
    info!(bounty_id, status = %updated.status, "bounty closed");
    Ok(updated)
}

/// Delete a bounty.
///
/// Demos that referenced the bounty keep their provenance link as a
/// dangling id; provenance is historical, not relational.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown bounty and
/// [`HubError::Permission`] unless the actor manages it.
pub async fn delete_bounty(
    conn: &mut DbConnection,
    actor: &ActorContext,
    bounty_id: &str,
) -> Result<(), HubError> {
    let bounty = db::get_bounty(conn, bounty_id)
        .await?
        .ok_or(HubError::NotFound("bounty"))?;
    let community = bounty_community(conn, &bounty).await?;
    if !visibility::can_manage_bounty(actor, &bounty, community.as_ref()) {
        return Err(HubError::permission("you cannot manage this bounty"));
    }
    db::delete_bounty(conn, bounty_id).await?;
    info!(bounty_id, actor_id = %actor.id, "bounty deleted");
    Ok(())
}
