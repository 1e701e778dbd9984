//! The hub's logical operations.
//!
//! Each operation takes a connection and a resolved [`ActorContext`],
//! loads the entities it needs, applies the pure decisions from
//! [`crate::visibility`] and [`crate::membership`], and mutates the store.
//! Multi-row mutations run inside a single transaction so that
//! check-then-act flows re-read the row under the same transaction that
//! applies the decision.

mod bounties;
mod categories;
mod communities;
mod demos;
mod users;

pub use self::{
    bounties::{BountyDraft, create_bounty, delete_bounty, list_bounties, update_bounty_status},
    categories::{create_category, delete_category, list_categories},
    communities::{
        ReviewDecision, create_community, delete_community, join_by_code, list_communities,
        list_members, manage_membership, regenerate_code, request_join, review_community,
        update_community,
    },
    demos::{
        DEFAULT_REJECTION_REASON, DemoDraft, DemoQuery, LikeSummary, ModerationAction,
        delete_demo, demo_like_status, get_demo, like_demo, liked_demos, list_demos,
        moderate_demo, set_thumbnail, submit_demo, unlike_demo,
    },
    users::{register_user, resolve_actor},
};

use rand::Rng;

use crate::{actor::ActorContext, db::DbConnection, error::HubError, models::Community};

/// Generate a fresh record id with the conventional entity prefix.
pub(crate) fn new_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    format!("{prefix}-{:012x}", rng.gen_range(0..0x1000_0000_0000_u64))
}

/// Generate a 12-digit community join code.
pub(crate) fn new_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..12).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}

/// Load a community or report it missing.
pub(crate) async fn require_community(
    conn: &mut DbConnection,
    community_id: &str,
) -> Result<Community, HubError> {
    crate::db::get_community(conn, community_id)
        .await?
        .ok_or(HubError::NotFound("community"))
}

/// The actor's membership state in a community.
pub(crate) async fn membership_state(
    conn: &mut DbConnection,
    community_id: &str,
    actor: &ActorContext,
) -> Result<crate::membership::MembershipState, HubError> {
    let row = crate::db::get_membership(conn, community_id, &actor.id).await?;
    Ok(crate::membership::MembershipState::from_row(row.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_the_prefix_and_are_distinct() {
        let a = new_id("demo");
        let b = new_id("demo");
        assert!(a.starts_with("demo-"));
        assert_eq!(a.len(), "demo-".len() + 12);
        assert_ne!(a, b);
    }

    #[test]
    fn join_codes_are_twelve_digits() {
        let code = new_join_code();
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
