//! Membership row helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    models::{CommunityMember, NewCommunityMember},
    status::MembershipStatus,
};

/// Fetch the membership row for a `(community, user)` pair.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_membership(
    conn: &mut DbConnection,
    community: &str,
    user: &str,
) -> QueryResult<Option<CommunityMember>> {
    use crate::schema::community_members::dsl::{community_id, community_members, user_id};
    community_members
        .filter(community_id.eq(community))
        .filter(user_id.eq(user))
        .first::<CommunityMember>(conn)
        .await
        .optional()
}

/// List every membership row of a community.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_memberships(
    conn: &mut DbConnection,
    community: &str,
) -> QueryResult<Vec<CommunityMember>> {
    use crate::schema::community_members::dsl::{community_id, community_members, joined_at};
    community_members
        .filter(community_id.eq(community))
        .order(joined_at.asc())
        .load::<CommunityMember>(conn)
        .await
}

/// Ids of communities where the user holds full membership.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn member_community_ids(
    conn: &mut DbConnection,
    user: &str,
) -> QueryResult<Vec<String>> {
    use crate::schema::community_members::dsl::{
        community_id, community_members, status, user_id,
    };
    community_members
        .filter(user_id.eq(user))
        .filter(status.eq(MembershipStatus::Member))
        .select(community_id)
        .load::<String>(conn)
        .await
}

/// Insert a membership row.
///
/// The composite primary key on `(community_id, user_id)` turns a racy
/// double insert into a unique-constraint violation for the caller to
/// interpret.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn insert_membership(
    conn: &mut DbConnection,
    membership: &NewCommunityMember<'_>,
) -> QueryResult<usize> {
    use crate::schema::community_members::dsl::community_members;
    diesel::insert_into(community_members)
        .values(membership)
        .execute(conn)
        .await
}

/// Promote a membership row to full member.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn promote_membership(
    conn: &mut DbConnection,
    community: &str,
    user: &str,
) -> QueryResult<usize> {
    use crate::schema::community_members::dsl::{
        community_id, community_members, status, user_id,
    };
    diesel::update(
        community_members
            .filter(community_id.eq(community))
            .filter(user_id.eq(user)),
    )
    .set(status.eq(MembershipStatus::Member))
    .execute(conn)
    .await
}

/// Delete a membership row.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_membership(
    conn: &mut DbConnection,
    community: &str,
    user: &str,
) -> QueryResult<usize> {
    use crate::schema::community_members::dsl::{community_id, community_members, user_id};
    diesel::delete(
        community_members
            .filter(community_id.eq(community))
            .filter(user_id.eq(user)),
    )
    .execute(conn)
    .await
}

/// Delete every membership row of a community.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_community_memberships(
    conn: &mut DbConnection,
    community: &str,
) -> QueryResult<usize> {
    use crate::schema::community_members::dsl::{community_id, community_members};
    diesel::delete(community_members.filter(community_id.eq(community)))
        .execute(conn)
        .await
}
