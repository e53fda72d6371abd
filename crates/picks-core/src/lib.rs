//! Core data model and deterministic catalog generation for the picks
//! storefront.
//!
//! Everything in this crate is pure: seed tables plus a weekly configuration
//! go in, the full product catalog comes out. No I/O, no clock reads — all
//! timestamps derive from the configured week label so repeated runs over the
//! same input produce byte-identical output.

pub mod generate;
pub mod model;
pub mod seed;

pub use generate::{generate_catalog, image_url, outbound_url, slugify};
pub use model::{
    dedupe_preserving, validate_featured_ids, CreatorProfile, ModelError, Product, ProductStatus,
    SocialLink, Sponsor, WeeklyConfig, MAX_CREATOR_PICKS, MAX_VISIBLE_CREATORS, UNSCHEDULED_WEEK,
    WEEKLY_PICK_COUNT,
};
pub use seed::{
    audience_for_category, brand_pool, categories, collections, creator_roster, guides,
    image_query, packs, price_band, CategoryAudience, CategoryDef, Collection, Guide, Pack,
};
