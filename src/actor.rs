//! Resolved request identity.
//!
//! The API layer authenticates a request by whatever transport scheme it
//! uses and resolves the caller into an [`ActorContext`] from the user
//! store. The core never trusts role claims supplied by a client; see
//! [`crate::ops::resolve_actor`].

use diesel::{
    deserialize::{self, FromSql},
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

use crate::status::text_enum;

/// Platform-wide role of a user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    diesel::AsExpression,
    diesel::FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary user; may additionally be the creator of communities.
    User,
    /// Platform-wide administrator with moderation rights over every layer.
    GeneralAdmin,
}

text_enum!(Role {
    User => "user",
    GeneralAdmin => "general_admin",
});

/// The authenticated actor for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    /// The actor's user id.
    pub id: String,
    /// The actor's role as recorded in the user store.
    pub role: Role,
}

impl ActorContext {
    /// Build a context from a stored user record.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Whether the actor holds the platform-wide admin role.
    #[must_use]
    pub fn is_general_admin(&self) -> bool {
        self.role == Role::GeneralAdmin
    }
}
