//! Integration tests for join requests, code redemption, and roster
//! management.

use demohub::{
    HubError, Role,
    db,
    membership::{JoinOutcome, MembershipState, RosterAction},
    ops,
    status::MembershipStatus,
};

mod common;
use common::{approved_community, seed_user, test_conn};

#[tokio::test]
async fn request_accept_and_kick_round_trip() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    let outcome = ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    assert_eq!(outcome, JoinOutcome::Requested);
    let row = db::get_membership(&mut conn, &community.id, &visitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, MembershipStatus::Pending);

    ops::manage_membership(
        &mut conn,
        &creator,
        &community.id,
        &visitor.id,
        RosterAction::Accept,
    )
    .await
    .unwrap();
    let row = db::get_membership(&mut conn, &community.id, &visitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, MembershipStatus::Member);

    ops::manage_membership(
        &mut conn,
        &creator,
        &community.id,
        &visitor.id,
        RosterAction::Kick,
    )
    .await
    .unwrap();
    let row = db::get_membership(&mut conn, &community.id, &visitor.id)
        .await
        .unwrap();
    assert!(row.is_none(), "kick deletes the row outright");
}

#[tokio::test]
async fn repeat_requests_are_idempotent() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    let first = ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    let second = ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    assert_eq!(first, JoinOutcome::Requested);
    assert_eq!(second, JoinOutcome::AlreadyRequested);
}

#[tokio::test]
async fn join_code_skips_the_pending_step() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    let (outcome, joined) = ops::join_by_code(&mut conn, &visitor, &community.code)
        .await
        .unwrap();
    assert_eq!(outcome, JoinOutcome::Joined);
    assert_eq!(joined.id, community.id);
    let row = db::get_membership(&mut conn, &community.id, &visitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, MembershipStatus::Member);

    let (again, _) = ops::join_by_code(&mut conn, &visitor, &community.code)
        .await
        .unwrap();
    assert_eq!(again, JoinOutcome::AlreadyMember);
}

#[tokio::test]
async fn join_code_upgrades_an_existing_request() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    let (outcome, _) = ops::join_by_code(&mut conn, &visitor, &community.code)
        .await
        .unwrap();
    assert_eq!(outcome, JoinOutcome::Joined);
    let row = db::get_membership(&mut conn, &community.id, &visitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, MembershipStatus::Member);
}

#[tokio::test]
async fn regenerated_code_invalidates_the_old_one() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    let fresh = ops::regenerate_code(&mut conn, &creator, &community.id)
        .await
        .unwrap();
    assert_ne!(fresh, community.code);

    let stale = ops::join_by_code(&mut conn, &visitor, &community.code).await;
    assert!(matches!(stale, Err(HubError::NotFound(_))));
    let (outcome, _) = ops::join_by_code(&mut conn, &visitor, &fresh)
        .await
        .unwrap();
    assert_eq!(outcome, JoinOutcome::Joined);
}

#[tokio::test]
async fn admin_may_accept_but_not_kick() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let admin = seed_user(&mut conn, "admin-001", "root", Role::GeneralAdmin).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    ops::manage_membership(
        &mut conn,
        &admin,
        &community.id,
        &visitor.id,
        RosterAction::Accept,
    )
    .await
    .unwrap();

    let kick = ops::manage_membership(
        &mut conn,
        &admin,
        &community.id,
        &visitor.id,
        RosterAction::Kick,
    )
    .await;
    assert!(matches!(kick, Err(HubError::Permission(_))));
}

#[tokio::test]
async fn creator_cannot_be_kicked_even_by_themselves() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    let result = ops::manage_membership(
        &mut conn,
        &creator,
        &community.id,
        &creator.id,
        RosterAction::Kick,
    )
    .await;
    assert!(matches!(result, Err(HubError::Conflict(_))));
    let row = db::get_membership(&mut conn, &community.id, &creator.id)
        .await
        .unwrap();
    assert!(row.is_some(), "the creator's membership row survives");
}

#[tokio::test]
async fn rejecting_an_applicant_leaves_no_row() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let visitor = seed_user(&mut conn, "user-visitor", "bob", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    ops::manage_membership(
        &mut conn,
        &creator,
        &community.id,
        &visitor.id,
        RosterAction::Reject,
    )
    .await
    .unwrap();
    let state = MembershipState::from_row(
        db::get_membership(&mut conn, &community.id, &visitor.id)
            .await
            .unwrap()
            .as_ref(),
    );
    assert_eq!(state, MembershipState::Absent);

    // A rejected applicant may simply ask again.
    let retry = ops::request_join(&mut conn, &visitor, &community.id)
        .await
        .unwrap();
    assert_eq!(retry, JoinOutcome::Requested);
}

#[tokio::test]
async fn roster_is_hidden_from_outsiders() {
    let mut conn = test_conn().await;
    let creator = seed_user(&mut conn, "user-creator", "alice", Role::User).await;
    let outsider = seed_user(&mut conn, "user-outsider", "mallory", Role::User).await;
    let community = approved_community(&mut conn, &creator, "Quantum Lab").await;

    let denied = ops::list_members(&mut conn, &outsider, &community.id).await;
    assert!(matches!(denied, Err(HubError::Permission(_))));
    let roster = ops::list_members(&mut conn, &creator, &community.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].user_id, creator.id);
}
