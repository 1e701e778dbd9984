//! Community lifecycle, membership, and roster operations.

use chrono::Utc;
use diesel_async::{AsyncConnection, scoped_futures::ScopedFutureExt};
use tracing::info;

use crate::{
    actor::ActorContext,
    db::{self, DbConnection},
    error::HubError,
    membership::{
        self, JoinOutcome, MembershipState, RosterAction, RosterEffect,
    },
    models::{Community, CommunityMember, NewCommunity, NewCommunityMember},
    status::{CommunityStatus, MembershipStatus},
};

/// A general admin's verdict on a pending community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Open the community for joining; this decision is final.
    Approve,
    /// Remove the community and everything under it.
    Reject,
}

/// Create a community in the pending state.
///
/// The creator is recorded as a full member immediately, so an eventual
/// approval needs no further roster work.
///
/// # Errors
///
/// Returns [`HubError::Validation`] for an empty name, otherwise any
/// database error.
pub async fn create_community(
    conn: &mut DbConnection,
    actor: &ActorContext,
    name: &str,
    description: Option<&str>,
) -> Result<Community, HubError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HubError::validation("community name must not be empty"));
    }
    let id = super::new_id("comm");
    let code = super::new_join_code();
    let now = Utc::now().naive_utc();
    let created = conn
        .transaction::<_, HubError, _>(|tx| {
            let community_id = id.as_str();
            let join_code = code.as_str();
            async move {
                let row = NewCommunity {
                    id: community_id,
                    name: trimmed,
                    description,
                    creator_id: &actor.id,
                    code: join_code,
                    status: CommunityStatus::Pending,
                    created_at: now,
                };
                db::create_community(tx, &row).await?;
                let creator = NewCommunityMember {
                    community_id,
                    user_id: &actor.id,
                    status: MembershipStatus::Member,
                    joined_at: now,
                };
                db::insert_membership(tx, &creator).await?;
                db::get_community(tx, community_id)
                    .await?
                    .ok_or(HubError::NotFound("community"))
            }
            .scope_boxed()
        })
        .await?;
    info!(community_id = %created.id, creator_id = %actor.id, "community submitted for review");
    Ok(created)
}

/// Decide a pending community's fate.
///
/// Approval opens the community and is final. Rejection removes the
/// community along with its memberships, categories, demos, likes, and
/// bounties; `None` is returned in that case.
///
/// # Errors
///
/// Returns [`HubError::Permission`] for non-admin actors,
/// [`HubError::NotFound`] for an unknown community, and
/// [`HubError::Conflict`] when the community has already been decided.
pub async fn review_community(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
    decision: ReviewDecision,
) -> Result<Option<Community>, HubError> {
    let reviewed = conn
        .transaction::<_, HubError, _>(|tx| {
            async move {
                let community = super::require_community(tx, community_id).await?;
                membership::authorize_community_review(actor, &community)?;
                match decision {
                    ReviewDecision::Approve => {
                        db::set_community_status(tx, community_id, CommunityStatus::Approved)
                            .await?;
                        Ok(db::get_community(tx, community_id).await?)
                    }
                    ReviewDecision::Reject => {
                        remove_community_records(tx, community_id).await?;
                        Ok(None)
                    }
                }
            }
            .scope_boxed()
        })
        .await?;
    info!(community_id, decision = ?decision, "community reviewed");
    Ok(reviewed)
}

/// Replace the community's join code, invalidating the old one.
///
/// # Errors
///
/// Returns [`HubError::Permission`] unless the actor is the creator, and
/// [`HubError::NotFound`] for an unknown community.
pub async fn regenerate_code(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
) -> Result<String, HubError> {
    let community = super::require_community(conn, community_id).await?;
    if community.creator_id != actor.id {
        return Err(HubError::permission(
            "only the community creator can regenerate the join code",
        ));
    }
    let code = super::new_join_code();
    db::set_community_code(conn, community_id, &code).await?;
    info!(community_id, "join code regenerated");
    Ok(code)
}

/// Update a community's name and/or description.
///
/// # Errors
///
/// Returns [`HubError::Permission`] unless the actor is the creator,
/// [`HubError::NotFound`] for an unknown community, and
/// [`HubError::Validation`] for an empty replacement name.
pub async fn update_community(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Community, HubError> {
    let community = super::require_community(conn, community_id).await?;
    if community.creator_id != actor.id {
        return Err(HubError::permission(
            "only the community creator can edit the community",
        ));
    }
    let trimmed_name = name.map(str::trim);
    if trimmed_name.is_some_and(str::is_empty) {
        return Err(HubError::validation("community name must not be empty"));
    }
    db::update_community_info(conn, community_id, trimmed_name, description).await?;
    super::require_community(conn, community_id).await
}

/// Delete a community and everything under it.
///
/// # Errors
///
/// Returns [`HubError::Permission`] unless the actor is the creator or a
/// general admin, and [`HubError::NotFound`] for an unknown community.
pub async fn delete_community(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
) -> Result<(), HubError> {
    conn.transaction::<_, HubError, _>(|tx| {
        async move {
            let community = super::require_community(tx, community_id).await?;
            if community.creator_id != actor.id && !actor.is_general_admin() {
                return Err(HubError::permission(
                    "only the community creator or a general admin can delete a community",
                ));
            }
            remove_community_records(tx, community_id).await
        }
        .scope_boxed()
    })
    .await?;
    info!(community_id, actor_id = %actor.id, "community deleted");
    Ok(())
}

/// Delete a community row and its dependent rows, in dependency order.
async fn remove_community_records(
    conn: &mut DbConnection,
    community_id: &str,
) -> Result<(), HubError> {
    let demo_ids = db::community_demo_ids(conn, community_id).await?;
    db::delete_likes_for(conn, demo_ids.clone()).await?;
    db::delete_demos(conn, demo_ids).await?;
    db::delete_community_bounties(conn, community_id).await?;
    db::delete_community_categories(conn, community_id).await?;
    db::delete_community_memberships(conn, community_id).await?;
    db::delete_community(conn, community_id).await?;
    Ok(())
}

/// List communities, optionally filtered by status or by the actor's own
/// full memberships.
///
/// # Errors
///
/// Returns any error produced by the underlying queries.
pub async fn list_communities(
    conn: &mut DbConnection,
    actor: &ActorContext,
    status: Option<CommunityStatus>,
    mine_only: bool,
) -> Result<Vec<Community>, HubError> {
    let member_ids = if mine_only {
        Some(db::member_community_ids(conn, &actor.id).await?)
    } else {
        None
    };
    Ok(db::list_communities(conn, status, member_ids.as_deref()).await?)
}

/// List a community's roster, pending applicants included.
///
/// The roster is restricted to people who can see the community's
/// content: members, the creator, and general admins.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown community and
/// [`HubError::Permission`] for actors outside the community.
pub async fn list_members(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
) -> Result<Vec<CommunityMember>, HubError> {
    let community = super::require_community(conn, community_id).await?;
    let state = super::membership_state(conn, community_id, actor).await?;
    let allowed = actor.is_general_admin()
        || community.creator_id == actor.id
        || state == MembershipState::Member;
    if !allowed {
        return Err(HubError::permission("the roster is visible to members only"));
    }
    Ok(db::list_memberships(conn, community_id).await?)
}

/// Ask to join an approved community.
///
/// Idempotent: repeat requests report [`JoinOutcome::AlreadyRequested`]
/// or [`JoinOutcome::AlreadyMember`] instead of failing.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown community and
/// [`HubError::Conflict`] when the community is not approved.
pub async fn request_join(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
) -> Result<JoinOutcome, HubError> {
    let outcome = conn
        .transaction::<_, HubError, _>(|tx| {
            async move {
                let community = super::require_community(tx, community_id).await?;
                let state = super::membership_state(tx, community_id, actor).await?;
                let outcome = membership::request_join_outcome(&community, state)?;
                if outcome == JoinOutcome::Requested {
                    let row = NewCommunityMember {
                        community_id,
                        user_id: &actor.id,
                        status: MembershipStatus::Pending,
                        joined_at: Utc::now().naive_utc(),
                    };
                    if let Err(db_err) = db::insert_membership(tx, &row).await {
                        let err = HubError::from(db_err);
                        if err.is_unique_violation() {
                            return Ok(JoinOutcome::AlreadyRequested);
                        }
                        return Err(err);
                    }
                }
                Ok(outcome)
            }
            .scope_boxed()
        })
        .await?;
    info!(community_id, user_id = %actor.id, outcome = ?outcome, "join requested");
    Ok(outcome)
}

/// Redeem a join code, becoming a member immediately.
///
/// Redemption bypasses the pending step: an outstanding request is
/// upgraded, and an absent user joins directly.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] when no approved community carries the
/// code.
pub async fn join_by_code(
    conn: &mut DbConnection,
    actor: &ActorContext,
    code: &str,
) -> Result<(JoinOutcome, Community), HubError> {
    let (outcome, community) = conn
        .transaction::<_, HubError, _>(|tx| {
            async move {
                let community = db::get_approved_community_by_code(tx, code)
                    .await?
                    .ok_or(HubError::NotFound("community"))?;
                let state = super::membership_state(tx, &community.id, actor).await?;
                let outcome = membership::redeem_code_outcome(&community, state)?;
                if outcome == JoinOutcome::Joined {
                    match state {
                        MembershipState::Pending => {
                            db::promote_membership(tx, &community.id, &actor.id).await?;
                        }
                        MembershipState::Absent => {
                            let row = NewCommunityMember {
                                community_id: &community.id,
                                user_id: &actor.id,
                                status: MembershipStatus::Member,
                                joined_at: Utc::now().naive_utc(),
                            };
                            if let Err(db_err) = db::insert_membership(tx, &row).await {
                                let err = HubError::from(db_err);
                                if err.is_unique_violation() {
                                    return Ok((JoinOutcome::AlreadyMember, community));
                                }
                                return Err(err);
                            }
                        }
                        MembershipState::Member => {}
                    }
                }
                Ok((outcome, community))
            }
            .scope_boxed()
        })
        .await?;
    info!(community_id = %community.id, user_id = %actor.id, outcome = ?outcome, "join code redeemed");
    Ok((outcome, community))
}

/// Accept or reject a pending applicant, or kick a member.
///
/// Accept and reject are open to the creator and to general admins; kick
/// is creator-only, and the creator themselves can never be removed.
///
/// # Errors
///
/// Returns [`HubError::Permission`], [`HubError::NotFound`], or
/// [`HubError::Conflict`] per the roster rules.
pub async fn manage_membership(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
    target_user_id: &str,
    action: RosterAction,
) -> Result<(), HubError> {
    conn.transaction::<_, HubError, _>(|tx| {
        async move {
            let community = super::require_community(tx, community_id).await?;
            membership::authorize_roster_action(actor, &community, action)?;
            let row = db::get_membership(tx, community_id, target_user_id).await?;
            let state = MembershipState::from_row(row.as_ref());
            match membership::roster_transition(action, &community, target_user_id, state)? {
                RosterEffect::Promote => {
                    db::promote_membership(tx, community_id, target_user_id).await?;
                }
                RosterEffect::Remove => {
                    db::delete_membership(tx, community_id, target_user_id).await?;
                }
            }
            Ok(())
        }
        .scope_boxed()
    })
    .await?;
    info!(community_id, target_user_id, action = ?action, "roster updated");
    Ok(())
}
