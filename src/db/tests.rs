//! Smoke tests for the query helpers against an in-memory database.

use chrono::Utc;
use diesel_async::AsyncConnection;

use super::*;
use crate::{
    actor::Role,
    models::{NewCommunity, NewCommunityMember, NewDemo, NewDemoLike, NewUser},
    status::{CommunityStatus, DemoStatus, Layer, MembershipStatus},
};

async fn test_conn() -> DbConnection {
    let mut conn = DbConnection::establish(":memory:")
        .await
        .expect("in-memory database");
    run_migrations(&mut conn).await.expect("migrations");
    conn
}

async fn seed_user(conn: &mut DbConnection, id: &str, role: Role) {
    let user = NewUser {
        id,
        username: id,
        role,
        created_at: Utc::now().naive_utc(),
    };
    create_user(conn, &user).await.expect("insert user");
}

#[tokio::test]
async fn create_and_fetch_user() {
    let mut conn = test_conn().await;
    seed_user(&mut conn, "user-alice", Role::User).await;
    let fetched = get_user(&mut conn, "user-alice")
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(fetched.username, "user-alice");
    assert_eq!(fetched.role, Role::User);
    let by_name = get_user_by_name(&mut conn, "user-alice")
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(by_name.id, fetched.id);
    assert!(get_user(&mut conn, "user-bob").await.expect("query").is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_unique_violation() {
    let mut conn = test_conn().await;
    seed_user(&mut conn, "user-alice", Role::User).await;
    let dup = NewUser {
        id: "user-alice-2",
        username: "user-alice",
        role: Role::User,
        created_at: Utc::now().naive_utc(),
    };
    let err = create_user(&mut conn, &dup).await.expect_err("must fail");
    assert!(matches!(
        err,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    ));
}

#[tokio::test]
async fn membership_round_trip() {
    let mut conn = test_conn().await;
    seed_user(&mut conn, "user-creator", Role::User).await;
    seed_user(&mut conn, "user-w", Role::User).await;
    let community = NewCommunity {
        id: "comm-1",
        name: "Quantum Lab",
        description: None,
        creator_id: "user-creator",
        code: "123456789012",
        status: CommunityStatus::Approved,
        created_at: Utc::now().naive_utc(),
    };
    create_community(&mut conn, &community).await.expect("insert community");

    let row = NewCommunityMember {
        community_id: "comm-1",
        user_id: "user-w",
        status: MembershipStatus::Pending,
        joined_at: Utc::now().naive_utc(),
    };
    insert_membership(&mut conn, &row).await.expect("insert membership");

    let fetched = get_membership(&mut conn, "comm-1", "user-w")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(fetched.status, MembershipStatus::Pending);

    promote_membership(&mut conn, "comm-1", "user-w")
        .await
        .expect("promote");
    let promoted = get_membership(&mut conn, "comm-1", "user-w")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(promoted.status, MembershipStatus::Member);

    let duplicate = insert_membership(&mut conn, &row).await;
    assert!(duplicate.is_err(), "composite key must reject a second row");

    delete_membership(&mut conn, "comm-1", "user-w")
        .await
        .expect("delete");
    assert!(
        get_membership(&mut conn, "comm-1", "user-w")
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn like_counts_are_grouped_per_demo() {
    let mut conn = test_conn().await;
    seed_user(&mut conn, "user-a", Role::User).await;
    seed_user(&mut conn, "user-b", Role::User).await;
    for demo_id in ["demo-1", "demo-2"] {
        let demo = NewDemo {
            id: demo_id,
            title: "Pendulum",
            description: None,
            category_id: Some("Physics"),
            layer: Layer::General,
            community_id: None,
            code: "<html></html>",
            author_id: "user-a",
            thumbnail_url: None,
            status: DemoStatus::Published,
            bounty_id: None,
            created_at: Utc::now().naive_utc(),
        };
        create_demo(&mut conn, &demo).await.expect("insert demo");
    }
    for (demo, user) in [("demo-1", "user-a"), ("demo-1", "user-b"), ("demo-2", "user-a")] {
        let like = NewDemoLike {
            demo_id: demo,
            user_id: user,
            created_at: Utc::now().naive_utc(),
        };
        insert_like(&mut conn, &like).await.expect("insert like");
    }

    let mut counts = count_likes_for(
        &mut conn,
        vec!["demo-1".to_owned(), "demo-2".to_owned(), "demo-3".to_owned()],
    )
    .await
    .expect("count");
    counts.sort();
    assert_eq!(
        counts,
        vec![("demo-1".to_owned(), 2), ("demo-2".to_owned(), 1)]
    );
    assert!(user_liked(&mut conn, "demo-1", "user-b").await.expect("query"));
    assert!(!user_liked(&mut conn, "demo-2", "user-b").await.expect("query"));
}

#[tokio::test]
async fn demo_row_filter_combines_conditions() {
    let mut conn = test_conn().await;
    seed_user(&mut conn, "user-a", Role::User).await;
    let entries = [
        ("demo-1", Layer::General, DemoStatus::Published, Some("Physics")),
        ("demo-2", Layer::General, DemoStatus::Pending, Some("Physics")),
        ("demo-3", Layer::General, DemoStatus::Published, Some("Biology")),
    ];
    for (id, layer, status, category) in entries {
        let demo = NewDemo {
            id,
            title: id,
            description: None,
            category_id: category,
            layer,
            community_id: None,
            code: "<html></html>",
            author_id: "user-a",
            thumbnail_url: None,
            status,
            bounty_id: None,
            created_at: Utc::now().naive_utc(),
        };
        create_demo(&mut conn, &demo).await.expect("insert demo");
    }

    let filter = DemoRowFilter {
        layer: Some(Layer::General),
        category_ids: Some(vec!["Physics".to_owned()]),
        status: Some(DemoStatus::Published),
        ..DemoRowFilter::default()
    };
    let rows = list_demos(&mut conn, &filter).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "demo-1");
}
