//! Core library for the demo hub.
//!
//! The hub manages a two-layer gallery of interactive demos: a public
//! general layer organised by a fixed subject list, and member-only
//! communities with their own category trees, rosters, and bounties.
//! This crate exposes the store helpers, the pure authorization and
//! membership engines, and the operations that tie them together.
cfg_if::cfg_if! {
    if #[cfg(feature = "sqlite")] {
        pub use diesel::sqlite::Sqlite as DbBackend;
    } else {
        compile_error!("The 'sqlite' feature must be enabled");
    }
}

pub mod actor;
pub mod config;
pub mod db;
pub mod error;
pub mod membership;
pub mod models;
pub mod ops;
pub mod schema;
pub mod status;
pub mod subjects;
pub mod tree;
pub mod visibility;

pub use actor::{ActorContext, Role};
pub use config::{HubConfig, OrphanPolicy};
pub use error::HubError;
