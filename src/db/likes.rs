//! Like-row helpers. A demo's like count is derived by counting rows.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::NewDemoLike;

/// Insert a like row.
///
/// The composite primary key on `(demo_id, user_id)` makes a duplicate
/// like a unique-constraint violation for the caller to interpret.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn insert_like(conn: &mut DbConnection, like: &NewDemoLike<'_>) -> QueryResult<usize> {
    use crate::schema::demo_likes::dsl::demo_likes;
    diesel::insert_into(demo_likes)
        .values(like)
        .execute(conn)
        .await
}

/// Delete a like row; removing an absent like is a no-op.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_like(conn: &mut DbConnection, demo: &str, user: &str) -> QueryResult<usize> {
    use crate::schema::demo_likes::dsl::{demo_id, demo_likes, user_id};
    diesel::delete(
        demo_likes
            .filter(demo_id.eq(demo))
            .filter(user_id.eq(user)),
    )
    .execute(conn)
    .await
}

/// Like count for a single demo.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn count_likes(conn: &mut DbConnection, demo: &str) -> QueryResult<i64> {
    use crate::schema::demo_likes::dsl::{demo_id, demo_likes};
    demo_likes
        .filter(demo_id.eq(demo))
        .count()
        .get_result(conn)
        .await
}

/// Like counts for a set of demos, as `(demo_id, count)` pairs. Demos
/// with no likes are absent from the result.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn count_likes_for(
    conn: &mut DbConnection,
    ids: Vec<String>,
) -> QueryResult<Vec<(String, i64)>> {
    use crate::schema::demo_likes::dsl::{demo_id, demo_likes};
    demo_likes
        .filter(demo_id.eq_any(ids))
        .group_by(demo_id)
        .select((demo_id, diesel::dsl::count_star()))
        .load::<(String, i64)>(conn)
        .await
}

/// Whether a user has liked a demo.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn user_liked(conn: &mut DbConnection, demo: &str, user: &str) -> QueryResult<bool> {
    use crate::schema::demo_likes::dsl::{demo_id, demo_likes, user_id};
    let found: Option<String> = demo_likes
        .filter(demo_id.eq(demo))
        .filter(user_id.eq(user))
        .select(demo_id)
        .first::<String>(conn)
        .await
        .optional()?;
    Ok(found.is_some())
}

/// Ids of demos a user has liked, most recent like first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn liked_demo_ids(conn: &mut DbConnection, user: &str) -> QueryResult<Vec<String>> {
    use crate::schema::demo_likes::dsl::{created_at, demo_id, demo_likes, user_id};
    demo_likes
        .filter(user_id.eq(user))
        .order(created_at.desc())
        .select(demo_id)
        .load::<String>(conn)
        .await
}

/// Delete every like row referencing the given demos.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_likes_for(conn: &mut DbConnection, ids: Vec<String>) -> QueryResult<usize> {
    use crate::schema::demo_likes::dsl::{demo_id, demo_likes};
    diesel::delete(demo_likes.filter(demo_id.eq_any(ids)))
        .execute(conn)
        .await
}
