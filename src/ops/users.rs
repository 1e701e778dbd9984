//! User registration and actor resolution.

use chrono::Utc;
use tracing::info;

use crate::{
    actor::{ActorContext, Role},
    db::{self, DbConnection},
    error::HubError,
    models::{NewUser, User},
};

/// Register a new user account with the baseline `user` role.
///
/// Administrative accounts are provisioned out of band, never through
/// registration.
///
/// # Errors
///
/// Returns [`HubError::Validation`] for an empty username and
/// [`HubError::Conflict`] when the username is already taken.
pub async fn register_user(conn: &mut DbConnection, username: &str) -> Result<User, HubError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(HubError::validation("username must not be empty"));
    }
    let id = super::new_id("user");
    let row = NewUser {
        id: &id,
        username: trimmed,
        role: Role::User,
        created_at: Utc::now().naive_utc(),
    };
    if let Err(db_err) = db::create_user(conn, &row).await {
        let err = HubError::from(db_err);
        if err.is_unique_violation() {
            return Err(HubError::conflict(format!("username {trimmed:?} is taken")));
        }
        return Err(err);
    }
    let created = db::get_user(conn, &id)
        .await?
        .ok_or(HubError::NotFound("user"))?;
    info!(user_id = %created.id, "registered user");
    Ok(created)
}

/// Resolve the acting user from the store.
///
/// The caller supplies only an id; the role always comes from the stored
/// row so a request cannot claim privileges it does not hold.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] when no such user exists.
pub async fn resolve_actor(
    conn: &mut DbConnection,
    user_id: &str,
) -> Result<ActorContext, HubError> {
    let user = db::get_user(conn, user_id)
        .await?
        .ok_or(HubError::NotFound("user"))?;
    Ok(ActorContext::new(user.id, user.role))
}
