//! Demo record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    models::{Demo, NewDemo},
    status::{DemoStatus, Layer},
};

/// Row-level filters applied in SQL when listing demos.
///
/// Search text and per-demo visibility are applied by the caller after
/// loading, since they depend on the actor.
#[derive(Debug, Default, Clone)]
pub struct DemoRowFilter {
    /// Restrict to one layer.
    pub layer: Option<Layer>,
    /// Restrict to one community.
    pub community_id: Option<String>,
    /// Restrict to a category id set (a category and its descendants, or
    /// a single general-layer subject).
    pub category_ids: Option<Vec<String>>,
    /// Restrict to one moderation status.
    pub status: Option<DemoStatus>,
    /// Restrict to one author.
    pub author_id: Option<String>,
}

/// Look up a demo by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_demo(conn: &mut DbConnection, demo_id: &str) -> QueryResult<Option<Demo>> {
    use crate::schema::demos::dsl::{demos, id};
    demos
        .filter(id.eq(demo_id))
        .first::<Demo>(conn)
        .await
        .optional()
}

/// List demos matching the row filter, newest first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_demos(
    conn: &mut DbConnection,
    filter: &DemoRowFilter,
) -> QueryResult<Vec<Demo>> {
    use crate::schema::demos::dsl as d;
    let mut query = d::demos.into_boxed();
    if let Some(layer) = filter.layer {
        query = query.filter(d::layer.eq(layer));
    }
    if let Some(community) = filter.community_id.clone() {
        query = query.filter(d::community_id.eq(community));
    }
    if let Some(categories) = filter.category_ids.clone() {
        query = query.filter(d::category_id.eq_any(categories));
    }
    if let Some(wanted) = filter.status {
        query = query.filter(d::status.eq(wanted));
    }
    if let Some(author) = filter.author_id.clone() {
        query = query.filter(d::author_id.eq(author));
    }
    query.order(d::created_at.desc()).load::<Demo>(conn).await
}

/// Demos referencing any category in the given id set.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn demos_in_categories(
    conn: &mut DbConnection,
    ids: Vec<String>,
) -> QueryResult<Vec<Demo>> {
    use crate::schema::demos::dsl as d;
    d::demos
        .filter(d::category_id.eq_any(ids))
        .load::<Demo>(conn)
        .await
}

/// Insert a new demo record.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_demo(conn: &mut DbConnection, demo: &NewDemo<'_>) -> QueryResult<usize> {
    use crate::schema::demos::dsl::demos;
    diesel::insert_into(demos).values(demo).execute(conn).await
}

/// Set a demo's moderation status and rejection reason together.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_demo_status(
    conn: &mut DbConnection,
    demo_id: &str,
    new_status: DemoStatus,
    reason: Option<&str>,
) -> QueryResult<usize> {
    use crate::schema::demos::dsl::{demos, id, rejection_reason, status};
    diesel::update(demos.filter(id.eq(demo_id)))
        .set((status.eq(new_status), rejection_reason.eq(reason)))
        .execute(conn)
        .await
}

/// Set a demo's thumbnail.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_demo_thumbnail(
    conn: &mut DbConnection,
    demo_id: &str,
    url: Option<&str>,
) -> QueryResult<usize> {
    use crate::schema::demos::dsl::{demos, id, thumbnail_url};
    diesel::update(demos.filter(id.eq(demo_id)))
        .set(thumbnail_url.eq(url))
        .execute(conn)
        .await
}

/// Clear the category reference of every demo in the given id set.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn detach_demos_from_categories(
    conn: &mut DbConnection,
    ids: Vec<String>,
) -> QueryResult<usize> {
    use crate::schema::demos::dsl::{category_id, demos};
    diesel::update(demos.filter(category_id.eq_any(ids)))
        .set(category_id.eq(None::<String>))
        .execute(conn)
        .await
}

/// Delete a demo row.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_demo(conn: &mut DbConnection, demo_id: &str) -> QueryResult<usize> {
    use crate::schema::demos::dsl::{demos, id};
    diesel::delete(demos.filter(id.eq(demo_id)))
        .execute(conn)
        .await
}

/// Delete every demo in the given id set.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_demos(conn: &mut DbConnection, ids: Vec<String>) -> QueryResult<usize> {
    use crate::schema::demos::dsl::{demos, id};
    diesel::delete(demos.filter(id.eq_any(ids)))
        .execute(conn)
        .await
}

/// Ids of every demo belonging to a community.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn community_demo_ids(
    conn: &mut DbConnection,
    community: &str,
) -> QueryResult<Vec<String>> {
    use crate::schema::demos::dsl::{community_id, demos, id};
    demos
        .filter(community_id.eq(community))
        .select(id)
        .load::<String>(conn)
        .await
}
