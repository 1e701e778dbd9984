//! Demo submission, listing, moderation, and likes.

use chrono::Utc;
use diesel_async::{AsyncConnection, scoped_futures::ScopedFutureExt};
use tracing::info;

use crate::{
    actor::ActorContext,
    db::{self, DbConnection, DemoRowFilter},
    error::HubError,
    membership::MembershipState,
    models::{Community, Demo, NewDemo, NewDemoLike},
    status::{DemoStatus, Layer},
    subjects, tree,
    visibility::{self, DemoListView, DemoListing, DemoOrder},
};

/// Reason recorded when a moderator rejects without providing one.
pub const DEFAULT_REJECTION_REASON: &str = "Does not meet community guidelines";

/// A demo submission.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DemoDraft {
    /// Title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Subject name (general layer) or category id (community layer).
    pub category_id: Option<String>,
    /// Target layer.
    pub layer: Layer,
    /// Owning community; required iff `layer` is community.
    pub community_id: Option<String>,
    /// HTML/JS source text.
    pub code: String,
    /// Optional thumbnail URL or data URI.
    pub thumbnail_url: Option<String>,
    /// Optional provenance link to a bounty.
    pub bounty_id: Option<String>,
}

/// Listing parameters for [`list_demos`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DemoQuery {
    /// Layer to browse.
    pub layer: Layer,
    /// Community to browse; required iff `layer` is community.
    pub community_id: Option<String>,
    /// Restrict to a subject (general) or to a category subtree
    /// (community).
    pub category_id: Option<String>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
    /// Restrict to one author.
    pub author_id: Option<String>,
    /// Restrict to one moderation status.
    pub status: Option<DemoStatus>,
    /// Gallery or moderation queue.
    pub view: DemoListView,
    /// Requested ordering.
    #[serde(default)]
    pub order: DemoOrder,
}

/// A moderator's verdict on a pending demo.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "reason")]
pub enum ModerationAction {
    /// Publish the demo and clear any rejection reason.
    Approve,
    /// Reject with an optional reason; a default reason is recorded when
    /// none is given.
    Reject(Option<String>),
}

/// Like count and whether the current actor liked the demo.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct LikeSummary {
    /// Number of like rows on the demo.
    pub like_count: i64,
    /// Whether the actor's own like row exists.
    pub user_liked: bool,
}

/// Check that a draft's layer and community reference agree, returning
/// the owning community for the community layer.
async fn resolve_target(
    conn: &mut DbConnection,
    actor: &ActorContext,
    layer: Layer,
    community_id: Option<&str>,
) -> Result<Option<Community>, HubError> {
    match layer {
        Layer::General => {
            if community_id.is_some() {
                return Err(HubError::validation(
                    "general-layer content cannot reference a community",
                ));
            }
            Ok(None)
        }
        Layer::Community => {
            let id = community_id.ok_or_else(|| {
                HubError::validation("community-layer content requires a community id")
            })?;
            let community = super::require_community(conn, id).await?;
            let state = super::membership_state(conn, id, actor).await?;
            if !visibility::can_view_layer(actor, Layer::Community, state) {
                return Err(HubError::permission(
                    "you must be a member to post in this community",
                ));
            }
            Ok(Some(community))
        }
    }
}

/// Submit a demo for review.
///
/// The demo enters the pending state; only moderation publishes it.
///
/// # Errors
///
/// Returns [`HubError::Validation`] when the layer and category/community
/// references disagree, [`HubError::Permission`] when posting into a
/// community the actor is not a member of, and [`HubError::NotFound`] for
/// unknown references.
pub async fn submit_demo(
    conn: &mut DbConnection,
    actor: &ActorContext,
    draft: &DemoDraft,
) -> Result<Demo, HubError> {
    if draft.title.trim().is_empty() {
        return Err(HubError::validation("demo title must not be empty"));
    }
    let community = resolve_target(conn, actor, draft.layer, draft.community_id.as_deref()).await?;
    if let Some(category) = draft.category_id.as_deref() {
        match draft.layer {
            Layer::General => {
                if !subjects::is_general_subject(category) {
                    return Err(HubError::validation(format!(
                        "unknown general subject {category:?}"
                    )));
                }
            }
            Layer::Community => {
                let owner = community.as_ref().map(|c| c.id.as_str());
                let row = db::get_category(conn, category)
                    .await?
                    .ok_or(HubError::NotFound("category"))?;
                if Some(row.community_id.as_str()) != owner {
                    return Err(HubError::validation(
                        "category belongs to a different community",
                    ));
                }
            }
        }
    }
    let id = super::new_id("demo");
    let row = NewDemo {
        id: &id,
        title: draft.title.trim(),
        description: draft.description.as_deref(),
        category_id: draft.category_id.as_deref(),
        layer: draft.layer,
        community_id: draft.community_id.as_deref(),
        code: &draft.code,
        author_id: &actor.id,
        thumbnail_url: draft.thumbnail_url.as_deref(),
        status: DemoStatus::Pending,
        bounty_id: draft.bounty_id.as_deref(),
        created_at: Utc::now().naive_utc(),
    };
    db::create_demo(conn, &row).await?;
    let created = db::get_demo(conn, &id)
        .await?
        .ok_or(HubError::NotFound("demo"))?;
    info!(demo_id = %created.id, author_id = %actor.id, layer = %created.layer, "demo submitted");
    Ok(created)
}

/// Load the owning community and the actor's membership state for a demo.
async fn demo_context(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo: &Demo,
) -> Result<(Option<Community>, MembershipState), HubError> {
    match demo.community_id.as_deref() {
        Some(community_id) => {
            let community = super::require_community(conn, community_id).await?;
            let state = super::membership_state(conn, community_id, actor).await?;
            Ok((Some(community), state))
        }
        None => Ok((None, MembershipState::Absent)),
    }
}

/// Fetch a demo the actor is allowed to see, with its like count.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown id and
/// [`HubError::Permission`] when the demo is hidden from the actor.
pub async fn get_demo(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
) -> Result<DemoListing, HubError> {
    let demo = db::get_demo(conn, demo_id)
        .await?
        .ok_or(HubError::NotFound("demo"))?;
    let (community, state) = demo_context(conn, actor, &demo).await?;
    if !visibility::can_view_demo(actor, &demo, community.as_ref(), state) {
        return Err(HubError::permission("this demo is not visible to you"));
    }
    let like_count = db::count_likes(conn, demo_id).await?;
    Ok(DemoListing { demo, like_count })
}

fn matches_search(demo: &Demo, needle: &str) -> bool {
    let lowered = needle.to_lowercase();
    demo.title.to_lowercase().contains(&lowered)
        || demo
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&lowered))
}

/// Resolve the category filter into a concrete id set.
async fn category_filter(
    conn: &mut DbConnection,
    query: &DemoQuery,
) -> Result<Option<Vec<String>>, HubError> {
    let Some(category) = query.category_id.as_deref() else {
        return Ok(None);
    };
    match query.layer {
        // General subjects are flat; the filter is the subject itself.
        Layer::General => Ok(Some(vec![category.to_owned()])),
        Layer::Community => {
            let community_id = query
                .community_id
                .as_deref()
                .ok_or_else(|| HubError::validation("community listing requires a community id"))?;
            let forest = db::list_categories(conn, community_id).await?;
            let ids = tree::descendant_ids(category, &forest);
            Ok(Some(ids.into_iter().collect()))
        }
    }
}

/// List demos the actor may see, filtered, searched, and ordered.
///
/// Row-level filters run in SQL; search text and per-demo visibility are
/// applied here because they depend on the actor.
///
/// # Errors
///
/// Returns [`HubError::Validation`] when a community listing lacks a
/// community id, [`HubError::NotFound`] for an unknown community, and
/// [`HubError::Permission`] when the actor cannot browse the community.
pub async fn list_demos(
    conn: &mut DbConnection,
    actor: &ActorContext,
    query: &DemoQuery,
) -> Result<Vec<DemoListing>, HubError> {
    let (community, state) = match query.layer {
        Layer::General => (None, MembershipState::Absent),
        Layer::Community => {
            let community_id = query
                .community_id
                .as_deref()
                .ok_or_else(|| HubError::validation("community listing requires a community id"))?;
            let found = super::require_community(conn, community_id).await?;
            let state = super::membership_state(conn, community_id, actor).await?;
            if !visibility::can_view_layer(actor, Layer::Community, state) {
                return Err(HubError::permission(
                    "this community's demos are visible to members only",
                ));
            }
            (Some(found), state)
        }
    };
    let filter = DemoRowFilter {
        layer: Some(query.layer),
        community_id: query.community_id.clone(),
        category_ids: category_filter(conn, query).await?,
        status: query.status,
        author_id: query.author_id.clone(),
    };
    let rows = db::list_demos(conn, &filter).await?;
    let visible: Vec<Demo> = rows
        .into_iter()
        .filter(|demo| {
            query
                .search
                .as_deref()
                .is_none_or(|needle| matches_search(demo, needle))
        })
        .filter(|demo| {
            visibility::include_in_listing(actor, query.view, demo, community.as_ref(), state)
        })
        .collect();
    let ids: Vec<String> = visible.iter().map(|d| d.id.clone()).collect();
    let counts = db::count_likes_for(conn, ids).await?;
    let mut listings: Vec<DemoListing> = visible
        .into_iter()
        .map(|demo| {
            let like_count = counts
                .iter()
                .find(|(id, _)| *id == demo.id)
                .map_or(0, |(_, n)| *n);
            DemoListing { demo, like_count }
        })
        .collect();
    visibility::sort_listings(&mut listings, query.order);
    Ok(listings)
}

/// Approve or reject a pending demo.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown demo,
/// [`HubError::Permission`] for non-moderators, and
/// [`HubError::Conflict`] when the demo is not pending.
pub async fn moderate_demo(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
    action: &ModerationAction,
) -> Result<Demo, HubError> {
    let updated = conn
        .transaction::<_, HubError, _>(|tx| {
            async move {
                let demo = db::get_demo(tx, demo_id)
                    .await?
                    .ok_or(HubError::NotFound("demo"))?;
                let (community, _) = demo_context(tx, actor, &demo).await?;
                if !visibility::can_moderate_demo(actor, &demo, community.as_ref()) {
                    return Err(HubError::permission("you cannot moderate this demo"));
                }
                if demo.status != DemoStatus::Pending {
                    return Err(HubError::conflict("demo has already been moderated"));
                }
                match action {
                    ModerationAction::Approve => {
                        db::set_demo_status(tx, demo_id, DemoStatus::Published, None).await?;
                    }
                    ModerationAction::Reject(reason) => {
                        let recorded = reason.as_deref().unwrap_or(DEFAULT_REJECTION_REASON);
                        db::set_demo_status(tx, demo_id, DemoStatus::Rejected, Some(recorded))
                            .await?;
                    }
                }
                db::get_demo(tx, demo_id)
                    .await?
                    .ok_or(HubError::NotFound("demo"))
            }
            .scope_boxed()
        })
        .await?;
    info!(demo_id, status = %updated.status, "demo moderated");
    Ok(updated)
}

/// Delete a demo and its likes.
///
/// Moderators may delete any demo; the author may delete their own while
/// it is not yet published.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown demo and
/// [`HubError::Permission`] when the actor may not delete it.
pub async fn delete_demo(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
) -> Result<(), HubError> {
    conn.transaction::<_, HubError, _>(|tx| {
        async move {
            let demo = db::get_demo(tx, demo_id)
                .await?
                .ok_or(HubError::NotFound("demo"))?;
            let (community, _) = demo_context(tx, actor, &demo).await?;
            if !visibility::can_delete_demo(actor, &demo, community.as_ref()) {
                return Err(HubError::permission("you cannot delete this demo"));
            }
            db::delete_likes_for(tx, vec![demo_id.to_owned()]).await?;
            db::delete_demo(tx, demo_id).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;
    info!(demo_id, actor_id = %actor.id, "demo deleted");
    Ok(())
}

/// Replace a demo's thumbnail.
///
/// Open to the author and to moderators.
///
/// # Errors
///
/// Returns [`HubError::NotFound`] for an unknown demo and
/// [`HubError::Permission`] otherwise.
pub async fn set_thumbnail(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
    url: Option<&str>,
) -> Result<(), HubError> {
    let demo = db::get_demo(conn, demo_id)
        .await?
        .ok_or(HubError::NotFound("demo"))?;
    let (community, _) = demo_context(conn, actor, &demo).await?;
    let allowed =
        demo.author_id == actor.id || visibility::can_moderate_demo(actor, &demo, community.as_ref());
    if !allowed {
        return Err(HubError::permission("you cannot edit this demo"));
    }
    db::set_demo_thumbnail(conn, demo_id, url).await?;
    Ok(())
}

/// Like a demo the actor can see.
///
/// # Errors
///
/// Returns [`HubError::Conflict`] when the actor already liked the demo,
/// plus the visibility errors of [`get_demo`].
pub async fn like_demo(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
) -> Result<i64, HubError> {
    let listing = get_demo(conn, actor, demo_id).await?;
    let row = NewDemoLike {
        demo_id: &listing.demo.id,
        user_id: &actor.id,
        created_at: Utc::now().naive_utc(),
    };
    if let Err(db_err) = db::insert_like(conn, &row).await {
        let err = HubError::from(db_err);
        if err.is_unique_violation() {
            return Err(HubError::conflict("you already liked this demo"));
        }
        return Err(err);
    }
    Ok(db::count_likes(conn, demo_id).await?)
}

/// Remove the actor's like from a demo. Idempotent.
///
/// # Errors
///
/// Returns any error produced by the underlying queries.
pub async fn unlike_demo(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
) -> Result<i64, HubError> {
    db::delete_like(conn, demo_id, &actor.id).await?;
    Ok(db::count_likes(conn, demo_id).await?)
}

/// Like count and whether the actor liked the demo.
///
/// # Errors
///
/// Returns the visibility errors of [`get_demo`].
pub async fn demo_like_status(
    conn: &mut DbConnection,
    actor: &ActorContext,
    demo_id: &str,
) -> Result<LikeSummary, HubError> {
    let listing = get_demo(conn, actor, demo_id).await?;
    let user_liked = db::user_liked(conn, demo_id, &actor.id).await?;
    Ok(LikeSummary {
        like_count: listing.like_count,
        user_liked,
    })
}

/// The actor's liked demos, published ones only.
///
/// Demos that were unpublished after being liked stay hidden even from
/// the liker.
///
/// # Errors
///
/// Returns any error produced by the underlying queries.
pub async fn liked_demos(
    conn: &mut DbConnection,
    actor: &ActorContext,
) -> Result<Vec<Demo>, HubError> {
    let ids = db::liked_demo_ids(conn, &actor.id).await?;
    let mut demos = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(demo) = db::get_demo(conn, &id).await?
            && demo.status == DemoStatus::Published
        {
            demos.push(demo);
        }
    }
    Ok(demos)
}
