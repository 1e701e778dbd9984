//! Community category tree management.
//!
//! Only the community layer has category rows; the general layer's
//! subjects are the fixed list in [`crate::subjects`].

use chrono::Utc;
use diesel_async::{AsyncConnection, scoped_futures::ScopedFutureExt};
use tracing::info;

use crate::{
    actor::ActorContext,
    config::OrphanPolicy,
    db::{self, DbConnection},
    error::HubError,
    models::{Category, NewCategory},
    status::Layer,
    tree, visibility,
};

/// List a community's category forest.
///
/// Restricted to people who can see the community's content.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown community and
/// [`HubError::Permission`] for actors outside it.
pub async fn list_categories(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
) -> Result<Vec<Category>, HubError> {
    let community = super::require_community(conn, community_id).await?;
    let state = super::membership_state(conn, community_id, actor).await?;
    let allowed = community.creator_id == actor.id
        || visibility::can_view_layer(actor, Layer::Community, state);
    if !allowed {
        return Err(HubError::permission(
            "this community's categories are visible to members only",
        ));
    }
    Ok(db::list_categories(conn, community_id).await?)
}

/// Create a category in a community's tree.
///
/// # Errors
///
/// Returns [`HubError::Permission`] unless the actor manages the
/// community, [`HubError::Validation`] for an empty name or a parent
/// from a different community, and [`HubError::NotFound`] for unknown
/// references.
pub async fn create_category(
    conn: &mut DbConnection,
    actor: &ActorContext,
    community_id: &str,
    name: &str,
    parent_id: Option<&str>,
) -> Result<Category, HubError> {
    let community = super::require_community(conn, community_id).await?;
    if !visibility::can_manage_categories(actor, Layer::Community, Some(&community)) {
        return Err(HubError::permission(
            "only the community creator or a general admin can manage categories",
        ));
    }
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HubError::validation("category name must not be empty"));
    }
    if let Some(parent) = parent_id {
        let row = db::get_category(conn, parent)
            .await?
            .ok_or(HubError::NotFound("category"))?;
        if row.community_id != community_id {
            return Err(HubError::validation(
                "parent category belongs to a different community",
            ));
        }
    }
    let id = super::new_id("cat");
    let row = NewCategory {
        id: &id,
        name: trimmed,
        parent_id,
        community_id,
        created_at: Utc::now().naive_utc(),
    };
    db::create_category(conn, &row).await?;
    let created = db::get_category(conn, &id)
        .await?
        .ok_or(HubError::NotFound("category"))?;
    info!(category_id = %created.id, community_id, "category created");
    Ok(created)
}

/// Delete a category subtree, handling the demos underneath it per the
/// configured orphan policy.
///
/// The subtree is computed up front and the whole removal runs in one
/// transaction. Returns the number of categories removed.
///
/// # Errors
///
/// Returns [`HubError::Permission`] unless the actor manages the
/// community, [`HubError::NotFound`] for an unknown category, and
/// [`HubError::Conflict`] under [`OrphanPolicy::Block`] when demos still
/// reference the subtree.
pub async fn delete_category(
    conn: &mut DbConnection,
    actor: &ActorContext,
    category_id: &str,
    policy: OrphanPolicy,
) -> Result<usize, HubError> {
    let removed = conn
        .transaction::<_, HubError, _>(|tx| {
            async move {
                let category = db::get_category(tx, category_id)
                    .await?
                    .ok_or(HubError::NotFound("category"))?;
                let community = super::require_community(tx, &category.community_id).await?;
                if !visibility::can_manage_categories(actor, Layer::Community, Some(&community)) {
                    return Err(HubError::permission(
                        "only the community creator or a general admin can manage categories",
                    ));
                }
                let forest = db::list_categories(tx, &category.community_id).await?;
                let subtree: Vec<String> =
                    tree::descendant_ids(category_id, &forest).into_iter().collect();
                let referencing = db::demos_in_categories(tx, subtree.clone()).await?;
                match policy {
                    OrphanPolicy::Block => {
                        if !referencing.is_empty() {
                            return Err(HubError::conflict(format!(
                                "{} demos still reference this category subtree",
                                referencing.len()
                            )));
                        }
                    }
                    OrphanPolicy::Detach => {
                        db::detach_demos_from_categories(tx, subtree.clone()).await?;
                    }
                    OrphanPolicy::Cascade => {
                        let demo_ids: Vec<String> =
                            referencing.into_iter().map(|d| d.id).collect();
                        db::delete_likes_for(tx, demo_ids.clone()).await?;
                        db::delete_demos(tx, demo_ids).await?;
                    }
                }
                Ok(db::delete_categories(tx, subtree).await?)
            }
            .scope_boxed()
        })
        .await?;
    info!(category_id, removed, policy = ?policy, "category subtree deleted");
    Ok(removed)
}
