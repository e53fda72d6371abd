//! The persisted override envelope and typed patches.
//!
//! Overrides are a closed schema: each entity type has a fixed field
//! allow-list, and anything outside it is dropped at the boundary rather
//! than merged. Parsing is shape-tolerant — a malformed sub-document falls
//! back to its default (and is reported) instead of invalidating the whole
//! envelope, so a corrupt override can never take the storefront down.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use picks_core::{CreatorProfile, Product, Sponsor, WeeklyConfig};

/// The single override document persisted in the override store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideState {
    pub weekly_config_override: Option<WeeklyConfigPatch>,
    /// Product id → field patch.
    pub product_overrides: BTreeMap<String, ProductPatch>,
    /// Creator patches keyed by the embedded `id`.
    pub creator_picks_override: Vec<CreatorPatch>,
    /// Stamped by the store on every write; `None` until first saved.
    pub updated_at: Option<DateTime<Utc>>,
}

impl OverrideState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weekly_config_override.is_none()
            && self.product_overrides.is_empty()
            && self.creator_picks_override.is_empty()
    }

    /// Shape-tolerant extraction from raw JSON.
    ///
    /// Each of the three sub-documents is validated independently; a
    /// mismatched shape falls back to its default and its wire name is
    /// returned in the discard list so callers can report it.
    #[must_use]
    pub fn from_value_lossy(value: &serde_json::Value) -> (Self, Vec<String>) {
        let mut discarded = Vec::new();
        let mut state = OverrideState::default();

        match value.get("weeklyConfigOverride") {
            None | Some(serde_json::Value::Null) => {}
            Some(raw) => match serde_json::from_value(raw.clone()) {
                Ok(patch) => state.weekly_config_override = Some(patch),
                Err(_) => discarded.push("weeklyConfigOverride".to_string()),
            },
        }

        match value.get("productOverrides") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Object(entries)) => {
                for (id, raw) in entries {
                    match serde_json::from_value::<ProductPatch>(raw.clone()) {
                        Ok(patch) if !patch.is_empty() => {
                            state.product_overrides.insert(id.clone(), patch);
                        }
                        Ok(_) => {}
                        Err(_) => discarded.push(format!("productOverrides.{id}")),
                    }
                }
            }
            Some(_) => discarded.push("productOverrides".to_string()),
        }

        match value.get("creatorPicksOverride") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Array(items)) => {
                for (index, raw) in items.iter().enumerate() {
                    match serde_json::from_value::<CreatorPatch>(raw.clone()) {
                        Ok(patch) if !patch.id.is_empty() => {
                            state.creator_picks_override.push(patch);
                        }
                        _ => discarded.push(format!("creatorPicksOverride[{index}]")),
                    }
                }
            }
            Some(_) => discarded.push("creatorPicksOverride".to_string()),
        }

        state.updated_at = value
            .get("updatedAt")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse::<DateTime<Utc>>().ok());

        (state, discarded)
    }
}

/// Partial [`WeeklyConfig`]: present fields fully replace the base field,
/// absent fields leave it alone. `sponsor` is tri-state — absent leaves the
/// base sponsor, `null` clears it, an object replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_week_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_product_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_by_week: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_archived_product_ids: Option<Vec<String>>,
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sponsor: Option<Option<Sponsor>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Sponsor>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Sponsor>::deserialize(deserializer).map(Some)
}

impl WeeklyConfigPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_week_label.is_none()
            && self.featured_product_ids.is_none()
            && self.archive_by_week.is_none()
            && self.hard_archived_product_ids.is_none()
            && self.sponsor.is_none()
    }

    /// Shallow merge over `base`: each present field wins wholesale. The
    /// result is normalized.
    #[must_use]
    pub fn apply(&self, base: &WeeklyConfig) -> WeeklyConfig {
        let mut merged = base.clone();
        if let Some(label) = &self.current_week_label {
            merged.current_week_label.clone_from(label);
        }
        if let Some(featured) = &self.featured_product_ids {
            merged.featured_product_ids.clone_from(featured);
        }
        if let Some(archive) = &self.archive_by_week {
            merged.archive_by_week.clone_from(archive);
        }
        if let Some(hard) = &self.hard_archived_product_ids {
            merged.hard_archived_product_ids.clone_from(hard);
        }
        if let Some(sponsor) = &self.sponsor {
            merged.sponsor.clone_from(sponsor);
        }
        merged.normalize();
        merged
    }

    /// Minimal patch carrying only the fields where `next` differs from
    /// `base`; returns `None` when nothing differs.
    #[must_use]
    pub fn diff(base: &WeeklyConfig, next: &WeeklyConfig) -> Option<Self> {
        let patch = Self {
            current_week_label: (next.current_week_label != base.current_week_label)
                .then(|| next.current_week_label.clone()),
            featured_product_ids: (next.featured_product_ids != base.featured_product_ids)
                .then(|| next.featured_product_ids.clone()),
            archive_by_week: (next.archive_by_week != base.archive_by_week)
                .then(|| next.archive_by_week.clone()),
            hard_archived_product_ids: (next.hard_archived_product_ids
                != base.hard_archived_product_ids)
                .then(|| next.hard_archived_product_ids.clone()),
            sponsor: (next.sponsor != base.sponsor).then(|| next.sponsor.clone()),
        };
        (!patch.is_empty()).then_some(patch)
    }
}

/// Allow-listed product field patch. Only defined fields are applied;
/// unknown fields are rejected by serde at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the defined fields onto `product`. `updated_at` stamping is
    /// the caller's concern.
    pub fn apply(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title.clone_from(title);
        }
        if let Some(brand) = &self.brand {
            product.brand.clone_from(brand);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image_url) = &self.image_url {
            product.image_url.clone_from(image_url);
        }
        if let Some(short_description) = &self.short_description {
            product.short_description.clone_from(short_description);
        }
        if let Some(affiliate_url) = &self.affiliate_url {
            product.affiliate_url.clone_from(affiliate_url);
        }
        if let Some(source_platform) = &self.source_platform {
            product.source_platform.clone_from(source_platform);
        }
        if let Some(tags) = &self.tags {
            product.tags.clone_from(tags);
        }
    }

    /// Minimal patch over the allow-list where `desired` differs from
    /// `base`. An unchanged product yields an empty patch, which callers
    /// must drop rather than store.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn diff(base: &Product, desired: &Product) -> Self {
        Self {
            title: (desired.title != base.title).then(|| desired.title.clone()),
            brand: (desired.brand != base.brand).then(|| desired.brand.clone()),
            price: (desired.price != base.price).then_some(desired.price),
            image_url: (desired.image_url != base.image_url).then(|| desired.image_url.clone()),
            short_description: (desired.short_description != base.short_description)
                .then(|| desired.short_description.clone()),
            affiliate_url: (desired.affiliate_url != base.affiliate_url)
                .then(|| desired.affiliate_url.clone()),
            source_platform: (desired.source_platform != base.source_platform)
                .then(|| desired.source_platform.clone()),
            tags: (desired.tags != base.tags).then(|| desired.tags.clone()),
        }
    }
}

/// Applies product patches in place, stamping `updated_at` on every patched
/// record.
pub fn apply_product_overrides(
    products: &mut [Product],
    overrides: &BTreeMap<String, ProductPatch>,
    now: DateTime<Utc>,
) {
    for product in products {
        if let Some(patch) = overrides.get(&product.id) {
            patch.apply(product);
            product.updated_at = now;
        }
    }
}

/// Allow-listed creator profile patch, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl CreatorPatch {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: None,
            bio: None,
            avatar: None,
            picks: None,
            is_visible: None,
        }
    }

    /// `true` when no field beyond the id key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.bio.is_none()
            && self.avatar.is_none()
            && self.picks.is_none()
            && self.is_visible.is_none()
    }

    /// Applies the defined fields onto `profile`, then re-normalizes it so
    /// patched picks are deduped and capped.
    pub fn apply(&self, profile: &mut CreatorProfile) {
        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(role) = &self.role {
            profile.role.clone_from(role);
        }
        if let Some(bio) = &self.bio {
            profile.bio.clone_from(bio);
        }
        if let Some(avatar) = &self.avatar {
            profile.avatar.clone_from(avatar);
        }
        if let Some(picks) = &self.picks {
            profile.picks.clone_from(picks);
        }
        if let Some(is_visible) = self.is_visible {
            profile.is_visible = is_visible;
        }
        profile.normalize();
    }

    /// Minimal patch where `desired` differs from `base`. Callers drop
    /// empty patches rather than storing them.
    #[must_use]
    pub fn diff(base: &CreatorProfile, desired: &CreatorProfile) -> Self {
        Self {
            id: base.id.clone(),
            name: (desired.name != base.name).then(|| desired.name.clone()),
            role: (desired.role != base.role).then(|| desired.role.clone()),
            bio: (desired.bio != base.bio).then(|| desired.bio.clone()),
            avatar: (desired.avatar != base.avatar).then(|| desired.avatar.clone()),
            picks: (desired.picks != base.picks).then(|| desired.picks.clone()),
            is_visible: (desired.is_visible != base.is_visible).then_some(desired.is_visible),
        }
    }
}

/// Applies creator patches by id onto the (already normalized) base roster.
pub fn apply_creator_patches(profiles: &mut [CreatorProfile], patches: &[CreatorPatch]) {
    for profile in profiles {
        if let Some(patch) = patches.iter().find(|p| p.id == profile.id) {
            patch.apply(profile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picks_core::generate_catalog;

    fn sample_product() -> Product {
        generate_catalog(&WeeklyConfig::default())
            .into_iter()
            .find(|p| p.id == "tech-04")
            .expect("tech-04 exists")
    }

    #[test]
    fn empty_weekly_patch_applies_as_identity() {
        let mut base = WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            featured_product_ids: vec!["tech-01".to_string()],
            ..WeeklyConfig::default()
        };
        base.normalize();
        assert_eq!(WeeklyConfigPatch::default().apply(&base), base);
    }

    #[test]
    fn weekly_patch_fields_fully_replace_base_fields() {
        let base = WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            featured_product_ids: vec!["tech-01".to_string(), "tech-02".to_string()],
            ..WeeklyConfig::default()
        };
        let patch = WeeklyConfigPatch {
            featured_product_ids: Some(vec!["fitness-01".to_string()]),
            ..WeeklyConfigPatch::default()
        };
        let merged = patch.apply(&base);
        // Replace, not append.
        assert_eq!(merged.featured_product_ids, vec!["fitness-01".to_string()]);
        assert_eq!(merged.current_week_label, "2026-01-05");
    }

    #[test]
    fn weekly_patch_sponsor_null_clears_base_sponsor() {
        let base = WeeklyConfig {
            sponsor: Some(Sponsor {
                label: "Sponsored".to_string(),
                title: "T".to_string(),
                copy: "C".to_string(),
                url: "https://example.com".to_string(),
                product_id: "tech-01".to_string(),
            }),
            ..WeeklyConfig::default()
        };
        let patch: WeeklyConfigPatch =
            serde_json::from_str(r#"{"sponsor":null}"#).expect("parse");
        assert_eq!(patch.sponsor, Some(None));
        assert!(patch.apply(&base).sponsor.is_none());

        // Absent sponsor leaves the base sponsor alone.
        let noop: WeeklyConfigPatch = serde_json::from_str("{}").expect("parse");
        assert!(noop.sponsor.is_none());
        assert!(noop.apply(&base).sponsor.is_some());
    }

    #[test]
    fn weekly_diff_returns_none_for_identical_configs() {
        let base = WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            ..WeeklyConfig::default()
        };
        assert!(WeeklyConfigPatch::diff(&base, &base.clone()).is_none());
    }

    #[test]
    fn product_patch_applies_only_defined_fields() {
        let mut product = sample_product();
        let original_title = product.title.clone();
        let patch = ProductPatch {
            price: Some(129.0),
            ..ProductPatch::default()
        };
        patch.apply(&mut product);
        assert!((product.price - 129.0).abs() < f64::EPSILON);
        assert_eq!(product.title, original_title);
    }

    #[test]
    fn product_diff_contains_only_changed_fields() {
        let base = sample_product();
        let mut desired = base.clone();
        desired.price = 99.0;
        let patch = ProductPatch::diff(&base, &desired);
        assert_eq!(patch.price, Some(99.0));
        assert!(patch.title.is_none());
        assert!(patch.tags.is_none());

        // Reverting to base values yields an empty patch.
        assert!(ProductPatch::diff(&base, &base.clone()).is_empty());
    }

    #[test]
    fn product_patch_rejects_unknown_fields_via_lossy_parse() {
        let raw = serde_json::json!({
            "productOverrides": {
                "tech-04": { "price": 55, "status": "ARCHIVED" }
            }
        });
        // `status` is outside the allow-list; serde drops it rather than
        // letting an override flip lifecycle state.
        let (state, discarded) = OverrideState::from_value_lossy(&raw);
        assert!(discarded.is_empty());
        let patch = state.product_overrides.get("tech-04").expect("patch kept");
        assert_eq!(patch.price, Some(55.0));
    }

    #[test]
    fn from_value_lossy_discards_malformed_subdocuments_independently() {
        let raw = serde_json::json!({
            "weeklyConfigOverride": { "featuredProductIds": "not-an-array" },
            "productOverrides": { "tech-01": { "price": 10 }, "tech-02": { "price": "x" } },
            "creatorPicksOverride": [ { "id": "sel-marco", "isVisible": false }, 42 ],
            "updatedAt": "2026-01-05T00:00:00Z"
        });
        let (state, discarded) = OverrideState::from_value_lossy(&raw);

        assert!(state.weekly_config_override.is_none());
        assert_eq!(state.product_overrides.len(), 1);
        assert_eq!(state.creator_picks_override.len(), 1);
        assert!(state.updated_at.is_some());
        assert_eq!(
            discarded,
            vec![
                "weeklyConfigOverride".to_string(),
                "productOverrides.tech-02".to_string(),
                "creatorPicksOverride[1]".to_string(),
            ]
        );
    }

    #[test]
    fn from_value_lossy_of_empty_object_is_default() {
        let (state, discarded) = OverrideState::from_value_lossy(&serde_json::json!({}));
        assert_eq!(state, OverrideState::default());
        assert!(discarded.is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn creator_patch_apply_renormalizes_picks() {
        let mut profile = picks_core::creator_roster().remove(0);
        let patch = CreatorPatch {
            picks: Some(
                (0..15)
                    .map(|i| format!("tech-{:02}", (i % 13) + 1))
                    .collect(),
            ),
            ..CreatorPatch::new(profile.id.clone())
        };
        patch.apply(&mut profile);
        assert!(profile.picks.len() <= picks_core::MAX_CREATOR_PICKS);
    }

    #[test]
    fn creator_diff_tracks_visibility_changes() {
        let base = picks_core::creator_roster().remove(0);
        let mut desired = base.clone();
        desired.is_visible = false;
        let patch = CreatorPatch::diff(&base, &desired);
        assert_eq!(patch.is_visible, Some(false));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(CreatorPatch::diff(&base, &base.clone()).is_empty());
    }

    #[test]
    fn override_state_wire_names_are_camel_case() {
        let state = OverrideState::default();
        let json = serde_json::to_string(&state).expect("serialize");
        assert!(json.contains("\"weeklyConfigOverride\":null"));
        assert!(json.contains("\"productOverrides\":{}"));
        assert!(json.contains("\"creatorPicksOverride\":[]"));
        assert!(json.contains("\"updatedAt\":null"));
    }
}
