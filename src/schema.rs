//! Diesel table definitions for the hub's persisted entities.

diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        role -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    communities (id) {
        id -> Text,
        name -> Text,
        description -> Nullable<Text>,
        creator_id -> Text,
        code -> Text,
        status -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    community_members (community_id, user_id) {
        community_id -> Text,
        user_id -> Text,
        status -> Text,
        joined_at -> Timestamp,
    }
}

diesel::table! {
    categories (id) {
        id -> Text,
        name -> Text,
        parent_id -> Nullable<Text>,
        community_id -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    demos (id) {
        id -> Text,
        title -> Text,
        description -> Nullable<Text>,
        category_id -> Nullable<Text>,
        layer -> Text,
        community_id -> Nullable<Text>,
        code -> Text,
        author_id -> Text,
        thumbnail_url -> Nullable<Text>,
        status -> Text,
        rejection_reason -> Nullable<Text>,
        bounty_id -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    bounties (id) {
        id -> Text,
        title -> Text,
        description -> Nullable<Text>,
        reward -> Text,
        layer -> Text,
        community_id -> Nullable<Text>,
        status -> Text,
        creator_id -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    demo_likes (demo_id, user_id) {
        demo_id -> Text,
        user_id -> Text,
        created_at -> Timestamp,
    }
}
