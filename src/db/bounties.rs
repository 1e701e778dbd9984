//! Bounty record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    models::{Bounty, NewBounty},
    status::{BountyStatus, Layer},
};

/// Look up a bounty by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_bounty(conn: &mut DbConnection, bounty_id: &str) -> QueryResult<Option<Bounty>> {
    use crate::schema::bounties::dsl::{bounties, id};
    bounties
        .filter(id.eq(bounty_id))
        .first::<Bounty>(conn)
        .await
        .optional()
}

/// List bounties, newest first, with optional layer/community/status
/// filters.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_bounties(
    conn: &mut DbConnection,
    layer: Option<Layer>,
    community: Option<&str>,
    status_filter: Option<BountyStatus>,
) -> QueryResult<Vec<Bounty>> {
    use crate::schema::bounties::dsl as b;
    let mut query = b::bounties.into_boxed();
    if let Some(wanted) = layer {
        query = query.filter(b::layer.eq(wanted));
    }
    if let Some(community_id) = community {
        query = query.filter(b::community_id.eq(community_id.to_owned()));
    }
    if let Some(wanted) = status_filter {
        query = query.filter(b::status.eq(wanted));
    }
    query.order(b::created_at.desc()).load::<Bounty>(conn).await
}

/// Insert a new bounty record.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_bounty(conn: &mut DbConnection, bounty: &NewBounty<'_>) -> QueryResult<usize> {
    use crate::schema::bounties::dsl::bounties;
    diesel::insert_into(bounties)
        .values(bounty)
        .execute(conn)
        .await
}

/// Update a bounty's lifecycle status.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_bounty_status(
    conn: &mut DbConnection,
    bounty_id: &str,
    new_status: BountyStatus,
) -> QueryResult<usize> {
    use crate::schema::bounties::dsl::{bounties, id, status};
    diesel::update(bounties.filter(id.eq(bounty_id)))
        .set(status.eq(new_status))
        .execute(conn)
        .await
}

/// Delete a bounty row.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_bounty(conn: &mut DbConnection, bounty_id: &str) -> QueryResult<usize> {
    use crate::schema::bounties::dsl::{bounties, id};
    diesel::delete(bounties.filter(id.eq(bounty_id)))
        .execute(conn)
        .await
}

/// Delete every bounty of a community.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_community_bounties(
    conn: &mut DbConnection,
    community: &str,
) -> QueryResult<usize> {
    use crate::schema::bounties::dsl::{bounties, community_id};
    diesel::delete(bounties.filter(community_id.eq(community)))
        .execute(conn)
        .await
}
