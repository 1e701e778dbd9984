//! Manage database connections and domain queries.
//!
//! This module tree exposes helpers for creating pooled Diesel
//! connections, running embedded migrations, and executing application
//! queries grouped by domain concerns. Query helpers touch exactly one
//! table each; multi-table flows are composed by [`crate::ops`] inside
//! transactions.

mod bounties;
mod categories;
mod communities;
mod connection;
mod demos;
mod likes;
mod memberships;
mod migrations;
mod users;

#[cfg(test)]
mod tests;

pub use self::{
    bounties::{
        create_bounty, delete_bounty, delete_community_bounties, get_bounty, list_bounties,
        set_bounty_status,
    },
    categories::{
        create_category, delete_categories, delete_community_categories, get_category,
        list_categories,
    },
    communities::{
        create_community, delete_community, get_approved_community_by_code, get_community,
        list_communities, set_community_code, set_community_status, update_community_info,
    },
    connection::{Backend, DbConnection, DbPool, MIGRATIONS, establish_pool},
    demos::{
        DemoRowFilter, community_demo_ids, create_demo, delete_demo, delete_demos,
        demos_in_categories, detach_demos_from_categories, get_demo, list_demos,
        set_demo_status, set_demo_thumbnail,
    },
    likes::{
        count_likes, count_likes_for, delete_like, delete_likes_for, insert_like,
        liked_demo_ids, user_liked,
    },
    memberships::{
        delete_community_memberships, delete_membership, get_membership, insert_membership,
        list_memberships, member_community_ids, promote_membership,
    },
    migrations::run_migrations,
    users::{create_user, get_user, get_user_by_name},
};
