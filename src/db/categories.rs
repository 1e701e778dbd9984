//! Category record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Category, NewCategory};

/// Look up a category by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_category(
    conn: &mut DbConnection,
    category_id: &str,
) -> QueryResult<Option<Category>> {
    use crate::schema::categories::dsl::{categories, id};
    categories
        .filter(id.eq(category_id))
        .first::<Category>(conn)
        .await
        .optional()
}

/// List a community's full category forest.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_categories(
    conn: &mut DbConnection,
    community: &str,
) -> QueryResult<Vec<Category>> {
    use crate::schema::categories::dsl::{categories, community_id, created_at};
    categories
        .filter(community_id.eq(community))
        .order(created_at.asc())
        .load::<Category>(conn)
        .await
}

/// Insert a new category record.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_category(
    conn: &mut DbConnection,
    category: &NewCategory<'_>,
) -> QueryResult<usize> {
    use crate::schema::categories::dsl::categories;
    diesel::insert_into(categories)
        .values(category)
        .execute(conn)
        .await
}

/// Delete every category in the given id set.
///
/// Callers compute the set with [`crate::tree::descendant_ids`] and run
/// this inside the same transaction as the matching demo cleanup, so a
/// reader sees either the whole subtree or none of it.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_categories(conn: &mut DbConnection, ids: Vec<String>) -> QueryResult<usize> {
    use crate::schema::categories::dsl::{categories, id};
    diesel::delete(categories.filter(id.eq_any(ids)))
        .execute(conn)
        .await
}

/// Delete every category of a community.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_community_categories(
    conn: &mut DbConnection,
    community: &str,
) -> QueryResult<usize> {
    use crate::schema::categories::dsl::{categories, community_id};
    diesel::delete(categories.filter(community_id.eq(community)))
        .execute(conn)
        .await
}
