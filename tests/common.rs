//! Shared helpers for integration tests.

use chrono::Utc;
use demohub::{
    ActorContext, Role,
    db::{self, DbConnection},
    models::{Community, NewUser},
    ops,
    status::CommunityStatus,
};
use diesel_async::AsyncConnection;

/// Fresh in-memory database with migrations applied.
pub async fn test_conn() -> DbConnection {
    let mut conn = DbConnection::establish(":memory:")
        .await
        .expect("in-memory sqlite connects");
    db::run_migrations(&mut conn).await.expect("migrations run");
    conn
}

/// Seed a user row and return the matching actor.
pub async fn seed_user(conn: &mut DbConnection, id: &str, name: &str, role: Role) -> ActorContext {
    let row = NewUser {
        id,
        username: name,
        role,
        created_at: Utc::now().naive_utc(),
    };
    db::create_user(conn, &row).await.expect("user inserts");
    ActorContext::new(id, role)
}

/// Create a community and approve it directly in the store.
pub async fn approved_community(
    conn: &mut DbConnection,
    creator: &ActorContext,
    name: &str,
) -> Community {
    let created = ops::create_community(conn, creator, name, None)
        .await
        .expect("community creates");
    db::set_community_status(conn, &created.id, CommunityStatus::Approved)
        .await
        .expect("status updates");
    db::get_community(conn, &created.id)
        .await
        .expect("community loads")
        .expect("community exists")
}
