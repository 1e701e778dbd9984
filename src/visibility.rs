//! The authorization / visibility engine.
//!
//! Pure decision logic: given the resolved actor, the target entities, and
//! the actor's membership state, decide what is visible or permitted.
//! Nothing here touches the store; the operations in [`crate::ops`] load
//! the entities and apply these decisions.

use crate::{
    actor::ActorContext,
    membership::MembershipState,
    models::{Bounty, Community, Demo},
    status::{DemoStatus, Layer},
};

/// Which gallery a demo listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoListView {
    /// The public gallery: published demos plus the actor's own
    /// submissions in any state.
    Explore,
    /// The moderation queue: additionally includes pending and rejected
    /// demos the actor may moderate.
    Moderation,
}

/// Requested ordering for demo listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoOrder {
    /// Newest first (`created_at` descending).
    #[default]
    Newest,
    /// Most liked first; ties broken by `created_at` descending.
    Popular,
}

/// A demo together with its derived like count.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DemoListing {
    /// The demo record.
    pub demo: Demo,
    /// Number of like rows referencing the demo.
    pub like_count: i64,
}

fn is_creator_of(actor: &ActorContext, community: Option<&Community>) -> bool {
    community.is_some_and(|c| c.creator_id == actor.id)
}

fn community_matches(demo_community: Option<&str>, community: Option<&Community>) -> bool {
    match (demo_community, community) {
        (Some(id), Some(c)) => c.id == id,
        _ => false,
    }
}

/// Whether the actor can browse a layer at all.
///
/// The general layer is public. A community's content is restricted to
/// its members and to general admins; `membership` is the actor's state
/// in that community.
#[must_use]
pub fn can_view_layer(actor: &ActorContext, layer: Layer, membership: MembershipState) -> bool {
    match layer {
        Layer::General => true,
        Layer::Community => actor.is_general_admin() || membership == MembershipState::Member,
    }
}

/// Whether the actor may approve, reject, or delete a demo as a moderator.
///
/// General admins moderate everywhere; a community creator moderates the
/// demos of their own community. `community` must be the demo's owning
/// community when the demo is community-layer.
#[must_use]
pub fn can_moderate_demo(
    actor: &ActorContext,
    demo: &Demo,
    community: Option<&Community>,
) -> bool {
    if actor.is_general_admin() {
        return true;
    }
    demo.layer == Layer::Community
        && community_matches(demo.community_id.as_deref(), community)
        && is_creator_of(actor, community)
}

/// Whether the actor can see a demo.
///
/// Published demos are visible to anyone who can see their layer. Pending
/// and rejected demos never leak to the public gallery: the author keeps
/// access for feedback and moderators keep access for the review queue.
#[must_use]
pub fn can_view_demo(
    actor: &ActorContext,
    demo: &Demo,
    community: Option<&Community>,
    membership: MembershipState,
) -> bool {
    match demo.status {
        DemoStatus::Published => can_view_layer(actor, demo.layer, membership),
        DemoStatus::Pending | DemoStatus::Rejected => {
            demo.author_id == actor.id || can_moderate_demo(actor, demo, community)
        }
    }
}

/// Whether the actor may delete a demo.
///
/// Moderators may always delete. The author may delete their own demo
/// while it is not published; deleting published content is reserved for
/// moderators.
#[must_use]
pub fn can_delete_demo(
    actor: &ActorContext,
    demo: &Demo,
    community: Option<&Community>,
) -> bool {
    if can_moderate_demo(actor, demo, community) {
        return true;
    }
    demo.author_id == actor.id && demo.status != DemoStatus::Published
}

/// Whether the actor may create or delete categories in a layer.
///
/// The general layer's subjects are fixed, so category management there
/// is never permitted. Community trees are managed by the community's
/// creator and by general admins.
#[must_use]
pub fn can_manage_categories(
    actor: &ActorContext,
    layer: Layer,
    community: Option<&Community>,
) -> bool {
    match layer {
        Layer::General => false,
        Layer::Community => actor.is_general_admin() || is_creator_of(actor, community),
    }
}

/// Whether the actor may close or delete a bounty.
///
/// Open to the bounty's creator, to general admins, and (for community
/// bounties) to the owning community's creator.
#[must_use]
pub fn can_manage_bounty(
    actor: &ActorContext,
    bounty: &Bounty,
    community: Option<&Community>,
) -> bool {
    if actor.is_general_admin() || bounty.creator_id == actor.id {
        return true;
    }
    bounty.layer == Layer::Community
        && community_matches(bounty.community_id.as_deref(), community)
        && is_creator_of(actor, community)
}

/// Whether a demo belongs in a listing for the given view.
#[must_use]
pub fn include_in_listing(
    actor: &ActorContext,
    view: DemoListView,
    demo: &Demo,
    community: Option<&Community>,
    membership: MembershipState,
) -> bool {
    match view {
        DemoListView::Explore => match demo.status {
            DemoStatus::Published => can_view_layer(actor, demo.layer, membership),
            DemoStatus::Pending | DemoStatus::Rejected => demo.author_id == actor.id,
        },
        DemoListView::Moderation => can_view_demo(actor, demo, community, membership),
    }
}

/// Sort listings in place per the requested order.
pub fn sort_listings(listings: &mut [DemoListing], order: DemoOrder) {
    match order {
        DemoOrder::Newest => {
            listings.sort_by(|a, b| b.demo.created_at.cmp(&a.demo.created_at));
        }
        DemoOrder::Popular => {
            listings.sort_by(|a, b| {
                b.like_count
                    .cmp(&a.like_count)
                    .then_with(|| b.demo.created_at.cmp(&a.demo.created_at))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rstest::rstest;

    use super::*;
    use crate::{
        actor::Role,
        status::{BountyStatus, CommunityStatus},
    };

    fn community() -> Community {
        Community {
            id: "comm-1".to_owned(),
            name: "Quantum Lab".to_owned(),
            description: None,
            creator_id: "user-creator".to_owned(),
            code: "123456789012".to_owned(),
            status: CommunityStatus::Approved,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn demo(layer: Layer, status: DemoStatus, author: &str) -> Demo {
        Demo {
            id: "demo-1".to_owned(),
            title: "Pendulum".to_owned(),
            description: None,
            category_id: Some("Physics".to_owned()),
            layer,
            community_id: (layer == Layer::Community).then(|| "comm-1".to_owned()),
            code: "<html></html>".to_owned(),
            author_id: author.to_owned(),
            thumbnail_url: None,
            status,
            rejection_reason: None,
            bounty_id: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn actor(id: &str, role: Role) -> ActorContext {
        ActorContext::new(id, role)
    }

    #[test]
    fn published_general_demo_is_visible_to_everyone() {
        let d = demo(Layer::General, DemoStatus::Published, "user-author");
        let stranger = actor("user-x", Role::User);
        assert!(can_view_demo(&stranger, &d, None, MembershipState::Absent));
    }

    #[rstest]
    #[case("user-author", Role::User, MembershipState::Member, true)] // author
    #[case("user-creator", Role::User, MembershipState::Member, true)] // community creator
    #[case("admin-001", Role::GeneralAdmin, MembershipState::Absent, true)] // general admin
    #[case("user-member", Role::User, MembershipState::Member, false)] // plain member
    #[case("user-x", Role::User, MembershipState::Absent, false)] // non-member
    fn pending_community_demo_visibility_matrix(
        #[case] id: &str,
        #[case] role: Role,
        #[case] membership: MembershipState,
        #[case] expected: bool,
    ) {
        let comm = community();
        let d = demo(Layer::Community, DemoStatus::Pending, "user-author");
        let who = actor(id, role);
        assert_eq!(can_view_demo(&who, &d, Some(&comm), membership), expected);
    }

    #[test]
    fn published_community_demo_requires_membership() {
        let comm = community();
        let d = demo(Layer::Community, DemoStatus::Published, "user-author");
        let member = actor("user-member", Role::User);
        let stranger = actor("user-x", Role::User);
        assert!(can_view_demo(&member, &d, Some(&comm), MembershipState::Member));
        assert!(!can_view_demo(&stranger, &d, Some(&comm), MembershipState::Absent));
    }

    #[test]
    fn creator_moderates_only_their_own_community() {
        let comm = community();
        let own = demo(Layer::Community, DemoStatus::Pending, "user-author");
        let creator = actor("user-creator", Role::User);
        assert!(can_moderate_demo(&creator, &own, Some(&comm)));

        let mut foreign = demo(Layer::Community, DemoStatus::Pending, "user-author");
        foreign.community_id = Some("comm-2".to_owned());
        assert!(!can_moderate_demo(&creator, &foreign, Some(&comm)));
    }

    #[test]
    fn community_creator_does_not_moderate_general_layer() {
        let comm = community();
        let d = demo(Layer::General, DemoStatus::Pending, "user-author");
        let creator = actor("user-creator", Role::User);
        assert!(!can_moderate_demo(&creator, &d, Some(&comm)));
    }

    #[rstest]
    #[case(DemoStatus::Pending, true)]
    #[case(DemoStatus::Rejected, true)]
    #[case(DemoStatus::Published, false)]
    fn author_may_delete_own_unpublished_demo(
        #[case] status: DemoStatus,
        #[case] expected: bool,
    ) {
        let d = demo(Layer::General, status, "user-author");
        let author = actor("user-author", Role::User);
        assert_eq!(can_delete_demo(&author, &d, None), expected);
    }

    #[test]
    fn admin_may_delete_published_demo() {
        let d = demo(Layer::General, DemoStatus::Published, "user-author");
        let admin = actor("admin-001", Role::GeneralAdmin);
        assert!(can_delete_demo(&admin, &d, None));
    }

    #[test]
    fn general_layer_categories_are_never_managed() {
        let admin = actor("admin-001", Role::GeneralAdmin);
        assert!(!can_manage_categories(&admin, Layer::General, None));
    }

    #[test]
    fn community_categories_managed_by_creator_and_admin() {
        let comm = community();
        let creator = actor("user-creator", Role::User);
        let admin = actor("admin-001", Role::GeneralAdmin);
        let member = actor("user-member", Role::User);
        assert!(can_manage_categories(&creator, Layer::Community, Some(&comm)));
        assert!(can_manage_categories(&admin, Layer::Community, Some(&comm)));
        assert!(!can_manage_categories(&member, Layer::Community, Some(&comm)));
    }

    #[test]
    fn bounty_management_rules() {
        let comm = community();
        let bounty = Bounty {
            id: "bounty-1".to_owned(),
            title: "Visualise entanglement".to_owned(),
            description: None,
            reward: "Eternal glory".to_owned(),
            layer: Layer::Community,
            community_id: Some("comm-1".to_owned()),
            status: BountyStatus::Open,
            creator_id: "user-poster".to_owned(),
            created_at: Utc::now().naive_utc(),
        };
        assert!(can_manage_bounty(&actor("user-poster", Role::User), &bounty, Some(&comm)));
        assert!(can_manage_bounty(&actor("user-creator", Role::User), &bounty, Some(&comm)));
        assert!(can_manage_bounty(&actor("admin-001", Role::GeneralAdmin), &bounty, None));
        assert!(!can_manage_bounty(&actor("user-member", Role::User), &bounty, Some(&comm)));
    }

    #[test]
    fn explore_view_hides_others_pending_but_keeps_own() {
        let d = demo(Layer::General, DemoStatus::Pending, "user-author");
        let author = actor("user-author", Role::User);
        let admin = actor("admin-001", Role::GeneralAdmin);
        assert!(include_in_listing(
            &author,
            DemoListView::Explore,
            &d,
            None,
            MembershipState::Absent
        ));
        // Even an admin's explore view is the public gallery.
        assert!(!include_in_listing(
            &admin,
            DemoListView::Explore,
            &d,
            None,
            MembershipState::Absent
        ));
        assert!(include_in_listing(
            &admin,
            DemoListView::Moderation,
            &d,
            None,
            MembershipState::Absent
        ));
    }

    #[test]
    fn popular_order_breaks_ties_by_recency() {
        let base = Utc::now().naive_utc();
        let mk = |id: &str, likes: i64, age_minutes: i64| {
            let mut d = demo(Layer::General, DemoStatus::Published, "user-author");
            d.id = id.to_owned();
            d.created_at = base - Duration::minutes(age_minutes);
            DemoListing {
                demo: d,
                like_count: likes,
            }
        };
        let mut listings = vec![mk("old-popular", 5, 60), mk("new-quiet", 1, 0), mk("new-popular", 5, 1)];
        sort_listings(&mut listings, DemoOrder::Popular);
        let ids: Vec<&str> = listings.iter().map(|l| l.demo.id.as_str()).collect();
        assert_eq!(ids, vec!["new-popular", "old-popular", "new-quiet"]);

        sort_listings(&mut listings, DemoOrder::Newest);
        let by_date: Vec<&str> = listings.iter().map(|l| l.demo.id.as_str()).collect();
        assert_eq!(by_date, vec!["new-quiet", "new-popular", "old-popular"]);
    }
}
