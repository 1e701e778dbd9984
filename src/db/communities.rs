//! Community record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    models::{Community, NewCommunity},
    status::CommunityStatus,
};

/// Look up a community by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_community(
    conn: &mut DbConnection,
    community_id: &str,
) -> QueryResult<Option<Community>> {
    use crate::schema::communities::dsl::{communities, id};
    communities
        .filter(id.eq(community_id))
        .first::<Community>(conn)
        .await
        .optional()
}

/// Look up an approved community by its join code.
///
/// Unapproved communities are deliberately invisible to code redemption.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_approved_community_by_code(
    conn: &mut DbConnection,
    join_code: &str,
) -> QueryResult<Option<Community>> {
    use crate::schema::communities::dsl::{code, communities, status};
    communities
        .filter(code.eq(join_code))
        .filter(status.eq(CommunityStatus::Approved))
        .first::<Community>(conn)
        .await
        .optional()
}

/// List communities, optionally filtered by status and by a user who must
/// be a full member.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_communities(
    conn: &mut DbConnection,
    status_filter: Option<CommunityStatus>,
    member_ids: Option<&[String]>,
) -> QueryResult<Vec<Community>> {
    use crate::schema::communities::dsl as c;
    let mut query = c::communities.into_boxed();
    if let Some(wanted) = status_filter {
        query = query.filter(c::status.eq(wanted));
    }
    if let Some(ids) = member_ids {
        query = query.filter(c::id.eq_any(ids.to_vec()));
    }
    query
        .order(c::created_at.desc())
        .load::<Community>(conn)
        .await
}

/// Insert a new community record.
///
/// # Errors
/// Returns any error produced by the insertion query, including the
/// unique-constraint violation on duplicate join codes.
#[must_use = "handle the result"]
pub async fn create_community(
    conn: &mut DbConnection,
    community: &NewCommunity<'_>,
) -> QueryResult<usize> {
    use crate::schema::communities::dsl::communities;
    diesel::insert_into(communities)
        .values(community)
        .execute(conn)
        .await
}

/// Update a community's review status.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_community_status(
    conn: &mut DbConnection,
    community_id: &str,
    new_status: CommunityStatus,
) -> QueryResult<usize> {
    use crate::schema::communities::dsl::{communities, id, status};
    diesel::update(communities.filter(id.eq(community_id)))
        .set(status.eq(new_status))
        .execute(conn)
        .await
}

/// Replace a community's join code.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_community_code(
    conn: &mut DbConnection,
    community_id: &str,
    new_code: &str,
) -> QueryResult<usize> {
    use crate::schema::communities::dsl::{code, communities, id};
    diesel::update(communities.filter(id.eq(community_id)))
        .set(code.eq(new_code))
        .execute(conn)
        .await
}

/// Update a community's name and/or description.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn update_community_info(
    conn: &mut DbConnection,
    community_id: &str,
    new_name: Option<&str>,
    new_description: Option<&str>,
) -> QueryResult<usize> {
    use crate::schema::communities::dsl::{communities, description, id, name};
    match (new_name, new_description) {
        (Some(n), Some(d)) => {
            diesel::update(communities.filter(id.eq(community_id)))
                .set((name.eq(n), description.eq(d)))
                .execute(conn)
                .await
        }
        (Some(n), None) => {
            diesel::update(communities.filter(id.eq(community_id)))
                .set(name.eq(n))
                .execute(conn)
                .await
        }
        (None, Some(d)) => {
            diesel::update(communities.filter(id.eq(community_id)))
                .set(description.eq(d))
                .execute(conn)
                .await
        }
        (None, None) => Ok(0),
    }
}

/// Delete a community row.
///
/// Dependent rows are removed explicitly by the calling operation inside
/// the same transaction; this helper touches only the community itself.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_community(conn: &mut DbConnection, community_id: &str) -> QueryResult<usize> {
    use crate::schema::communities::dsl::{communities, id};
    diesel::delete(communities.filter(id.eq(community_id)))
        .execute(conn)
        .await
}
