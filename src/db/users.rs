//! User record helpers.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{NewUser, User};

/// Look up a user record by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_user(conn: &mut DbConnection, user_id: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::{id, users};
    users
        .filter(id.eq(user_id))
        .first::<User>(conn)
        .await
        .optional()
}

/// Look up a user record by username.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_user_by_name(conn: &mut DbConnection, name: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::{username, users};
    users
        .filter(username.eq(name))
        .first::<User>(conn)
        .await
        .optional()
}

/// Insert a new user record.
///
/// # Errors
/// Returns any error produced by the insertion query, including the
/// unique-constraint violation on duplicate usernames.
#[must_use = "handle the result"]
pub async fn create_user(conn: &mut DbConnection, user: &NewUser<'_>) -> QueryResult<usize> {
    use crate::schema::users::dsl::users;
    diesel::insert_into(users).values(user).execute(conn).await
}
