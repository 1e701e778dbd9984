//! Configuration loading.
//!
//! Settings are read from an optional `demohub.toml` alongside the process
//! and overridden by `DEMOHUB_`-prefixed environment variables.

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

/// What happens to demos whose category subtree is deleted.
///
/// The reference store relied on an implicit foreign-key cascade that
/// silently deleted dependent demos; here the policy is explicit and
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Delete the demos (and their likes) along with the categories.
    Cascade,
    /// Keep the demos, clearing their category reference.
    Detach,
    /// Refuse the deletion while any demo still references the subtree.
    #[default]
    Block,
}

/// Runtime configuration for the hub core.
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Database URL passed to the connection pool.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Policy applied when deleting a category subtree that demos still
    /// reference.
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,
}

fn default_database_url() -> String {
    "demohub.db".to_owned()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

impl HubConfig {
    /// Load configuration from `demohub.toml` and the environment.
    ///
    /// # Errors
    /// Returns any extraction error reported by figment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("demohub.toml"))
            .merge(Env::prefixed("DEMOHUB_"))
    }
}
