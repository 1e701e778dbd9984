//! Lifecycle state enums for the hub's entities.
//!
//! Every state column is stored as `Text` in the database; the enums here
//! carry the canonical storage strings and the Diesel conversions so that
//! queries and models work with typed values rather than raw strings.

use diesel::{
    deserialize::{self, FromSql},
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};

/// Generate the storage-string mapping and Diesel conversions for a state
/// enum backed by a `Text` column.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Canonical storage string for this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Parse a storage string back into its typed value.
            #[must_use]
            pub fn parse(text: &str) -> Option<Self> {
                match text {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql<Text, Sqlite> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
                out.set_value(self.as_str());
                Ok(IsNull::No)
            }
        }

        impl FromSql<Text, Sqlite> for $name {
            fn from_sql(
                value: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
            ) -> deserialize::Result<Self> {
                let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
                Self::parse(&text)
                    .ok_or_else(|| format!("unrecognised {} value: {text}", stringify!($name)).into())
            }
        }
    };
}

pub(crate) use text_enum;

/// Top-level content partition: the fixed general subject taxonomy or a
/// single community's scope.
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
pub enum Layer {
    /// The global layer with its fixed subject list.
    General,
    /// Content scoped to one community.
    Community,
}

text_enum!(Layer {
    General => "general",
    Community => "community",
});

/// Review state of a community as driven by a general admin.
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
pub enum CommunityStatus {
    /// Awaiting review; not yet accepting members.
    Pending,
    /// Approved and open for join requests and code redemption.
    Approved,
    /// Rejected by a general admin.
    Rejected,
}

text_enum!(CommunityStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// State of a `(community, user)` membership row.
///
/// Absence of a row is the third state; see
/// [`MembershipState`](crate::membership::MembershipState).
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
pub enum MembershipStatus {
    /// Join request awaiting the creator's (or a general admin's) decision.
    Pending,
    /// Full member of the community.
    Member,
}

text_enum!(MembershipStatus {
    Pending => "pending",
    Member => "member",
});

/// Moderation state of a submitted demo.
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
pub enum DemoStatus {
    /// Submitted and awaiting moderation.
    Pending,
    /// Approved and publicly browsable within its layer.
    Published,
    /// Rejected, visible only to the author and moderators.
    Rejected,
}

text_enum!(DemoStatus {
    Pending => "pending",
    Published => "published",
    Rejected => "rejected",
});

/// Lifecycle state of a bounty.
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
pub enum BountyStatus {
    /// Accepting demo submissions.
    Open,
    /// Closed to further submissions.
    Closed,
}

text_enum!(BountyStatus {
    Open => "open",
    Closed => "closed",
});
