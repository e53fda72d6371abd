use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of products featured each week — weekly saves and rotations must
/// supply exactly this many unique ids.
pub const WEEKLY_PICK_COUNT: usize = 12;

/// Upper bound on a creator's picks list; longer lists are truncated during
/// normalization.
pub const MAX_CREATOR_PICKS: usize = 12;

/// At most this many creators may be visible on the storefront at once.
pub const MAX_VISIBLE_CREATORS: usize = 3;

/// Sentinel week label for products that were never featured nor archived.
pub const UNSCHEDULED_WEEK: &str = "UNSCHEDULED";

/// Errors from model-level validation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("weekly selection must contain exactly {expected} unique product ids, got {actual}")]
    WeeklyPickCount { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    /// Browsable on the storefront, either featured or archived-by-week.
    Live,
    /// Hard-archived: permanently hidden from all storefront views.
    Archived,
}

/// A single catalog listing. Generated records are fully deterministic;
/// admin overrides may later patch the allow-listed presentation fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable id derived from category + 1-based ordinal, e.g. `"tech-04"`.
    pub id: String,
    pub title: String,
    /// Globally unique, derived from title + id, e.g.
    /// `"foldable-usb-c-hub-tech-01"`.
    pub slug: String,
    pub brand: String,
    pub category: String,
    /// Always within the category's configured price band for generated
    /// records; whole values below 20, multiples of 5 otherwise.
    pub price: f64,
    pub image_url: String,
    pub short_description: String,
    pub affiliate_url: String,
    /// Retail platform label, e.g. `"Amazon"` or `"App Store"`.
    pub source_platform: String,
    pub tags: Vec<String>,
    /// The week this product is (or was) featured, or [`UNSCHEDULED_WEEK`].
    pub week_label: String,
    pub is_featured_this_week: bool,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set only when `status` is [`ProductStatus::Archived`].
    pub archived_at: Option<DateTime<Utc>>,
}

/// Weekly sponsor slot. Absent (`None` on [`WeeklyConfig`]) means the slot
/// is not rendered at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub label: String,
    pub title: String,
    pub copy: String,
    pub url: String,
    pub product_id: String,
}

/// The weekly rotation state: which products are featured now, which were
/// featured in past weeks, and which are permanently hidden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyConfig {
    /// ISO date of the week start, e.g. `"2026-01-05"`.
    pub current_week_label: String,
    /// Exactly [`WEEKLY_PICK_COUNT`] ids once validated; order is the
    /// storefront display order.
    pub featured_product_ids: Vec<String>,
    /// Past week label → product ids featured that week. Entries are deduped
    /// and empty weeks are pruned, never stored as empty lists.
    pub archive_by_week: BTreeMap<String, Vec<String>>,
    pub hard_archived_product_ids: Vec<String>,
    pub sponsor: Option<Sponsor>,
}

impl WeeklyConfig {
    /// Dedupes all id lists (order-preserving) and prunes empty archive
    /// weeks. Idempotent.
    pub fn normalize(&mut self) {
        self.featured_product_ids = dedupe_preserving(std::mem::take(&mut self.featured_product_ids));
        self.hard_archived_product_ids =
            dedupe_preserving(std::mem::take(&mut self.hard_archived_product_ids));
        let archive = std::mem::take(&mut self.archive_by_week);
        self.archive_by_week = archive
            .into_iter()
            .map(|(week, ids)| (week, dedupe_preserving(ids)))
            .filter(|(_, ids)| !ids.is_empty())
            .collect();
    }

    /// First archive week containing `product_id`, scanning weeks in
    /// ascending label order.
    #[must_use]
    pub fn archive_week_for(&self, product_id: &str) -> Option<&str> {
        self.archive_by_week
            .iter()
            .find(|(_, ids)| ids.iter().any(|id| id == product_id))
            .map(|(week, _)| week.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// A creator spotlight profile with an ordered picks list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub avatar: String,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    /// Up to [`MAX_CREATOR_PICKS`] product ids, deduped, order-preserving.
    #[serde(default)]
    pub picks: Vec<String>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

const fn default_visible() -> bool {
    true
}

impl CreatorProfile {
    /// Dedupes picks (order-preserving on first occurrence) and caps the
    /// list at [`MAX_CREATOR_PICKS`]. Idempotent.
    pub fn normalize(&mut self) {
        let mut picks = dedupe_preserving(std::mem::take(&mut self.picks));
        picks.truncate(MAX_CREATOR_PICKS);
        self.picks = picks;
    }
}

/// Order-preserving dedupe keeping the first occurrence of each value.
#[must_use]
pub fn dedupe_preserving(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Validates a weekly featured selection: exactly [`WEEKLY_PICK_COUNT`]
/// unique ids.
///
/// # Errors
///
/// Returns [`ModelError::WeeklyPickCount`] when the deduped selection is not
/// exactly twelve ids.
pub fn validate_featured_ids(ids: &[String]) -> Result<Vec<String>, ModelError> {
    let unique = dedupe_preserving(ids.to_vec());
    if unique.len() != WEEKLY_PICK_COUNT {
        return Err(ModelError::WeeklyPickCount {
            expected: WEEKLY_PICK_COUNT,
            actual: unique.len(),
        });
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn dedupe_preserving_keeps_first_occurrence_order() {
        let out = dedupe_preserving(ids(&["b", "a", "b", "c", "a"]));
        assert_eq!(out, ids(&["b", "a", "c"]));
    }

    #[test]
    fn weekly_config_normalize_prunes_empty_archive_weeks() {
        let mut config = WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            featured_product_ids: ids(&["tech-01", "tech-01", "tech-02"]),
            archive_by_week: [
                ("2025-12-29".to_string(), ids(&["fitness-01", "fitness-01"])),
                ("2025-12-22".to_string(), vec![]),
            ]
            .into_iter()
            .collect(),
            hard_archived_product_ids: vec![],
            sponsor: None,
        };
        config.normalize();

        assert_eq!(config.featured_product_ids, ids(&["tech-01", "tech-02"]));
        assert_eq!(config.archive_by_week.len(), 1);
        assert_eq!(
            config.archive_by_week["2025-12-29"],
            ids(&["fitness-01"])
        );
    }

    #[test]
    fn archive_week_for_scans_weeks_in_ascending_order() {
        let config = WeeklyConfig {
            archive_by_week: [
                ("2025-12-01".to_string(), ids(&["tech-03"])),
                ("2025-11-03".to_string(), ids(&["tech-03", "tech-04"])),
            ]
            .into_iter()
            .collect(),
            ..WeeklyConfig::default()
        };
        assert_eq!(config.archive_week_for("tech-03"), Some("2025-11-03"));
        assert_eq!(config.archive_week_for("tech-04"), Some("2025-11-03"));
        assert_eq!(config.archive_week_for("tech-99"), None);
    }

    #[test]
    fn creator_normalize_dedupes_and_caps_picks() {
        let mut creator = CreatorProfile {
            id: "c1".to_string(),
            name: "Creator".to_string(),
            role: "Designer".to_string(),
            bio: String::new(),
            avatar: String::new(),
            socials: vec![],
            picks: (0..20).map(|i| format!("tech-{:02}", i % 14)).collect(),
            is_visible: true,
        };
        creator.normalize();
        assert_eq!(creator.picks.len(), MAX_CREATOR_PICKS);
        let unique: std::collections::HashSet<_> = creator.picks.iter().collect();
        assert_eq!(unique.len(), creator.picks.len());
    }

    #[test]
    fn creator_is_visible_defaults_true_when_missing_in_json() {
        let creator: CreatorProfile = serde_json::from_str(
            r#"{"id":"c1","name":"N","role":"R","bio":"","avatar":""}"#,
        )
        .expect("deserialize");
        assert!(creator.is_visible);
        assert!(creator.picks.is_empty());
    }

    #[test]
    fn validate_featured_ids_rejects_wrong_count() {
        let eleven: Vec<String> = (1..=11).map(|i| format!("tech-{i:02}")).collect();
        let result = validate_featured_ids(&eleven);
        assert!(matches!(
            result,
            Err(ModelError::WeeklyPickCount { expected: 12, actual: 11 })
        ));
    }

    #[test]
    fn validate_featured_ids_rejects_duplicates_via_count() {
        let mut twelve: Vec<String> = (1..=11).map(|i| format!("tech-{i:02}")).collect();
        twelve.push("tech-01".to_string());
        assert!(validate_featured_ids(&twelve).is_err());
    }

    #[test]
    fn validate_featured_ids_accepts_exactly_twelve() {
        let twelve: Vec<String> = (1..=12).map(|i| format!("tech-{i:02}")).collect();
        let out = validate_featured_ids(&twelve).expect("valid");
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn weekly_config_serde_uses_camel_case_wire_names() {
        let config = WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            featured_product_ids: ids(&["tech-01"]),
            ..WeeklyConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains("\"currentWeekLabel\":\"2026-01-05\""));
        assert!(json.contains("\"featuredProductIds\""));
        assert!(json.contains("\"archiveByWeek\""));
        assert!(json.contains("\"hardArchivedProductIds\""));
    }

    #[test]
    fn product_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Live).expect("serialize"),
            "\"LIVE\""
        );
        assert_eq!(
            serde_json::to_string(&ProductStatus::Archived).expect("serialize"),
            "\"ARCHIVED\""
        );
    }
}
