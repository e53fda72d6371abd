//! Deterministic catalog generation.
//!
//! `generate_catalog` expands the seed tables into the full product list for
//! a given weekly configuration. Every derived value — ids, slugs, prices,
//! image seeds, timestamps — is a pure function of the seed tables and the
//! config, so two runs over the same input are bit-for-bit identical.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::model::{Product, ProductStatus, WeeklyConfig, UNSCHEDULED_WEEK};
use crate::seed;

/// Matches `encodeURIComponent`: everything except alphanumerics and
/// `- _ . ! ~ * ' ( )` is percent-encoded.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Catalog epoch: `created_at` is this date plus the product's 1-based
/// catalog ordinal in days.
const CATALOG_EPOCH: (i32, u32, u32) = (2025, 1, 1);

/// Lowercases and collapses every non-alphanumeric run into a single `-`,
/// trimming leading/trailing dashes.
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Linear interpolation across the twelve seed indices, rounded to a whole
/// number below 20 and to the nearest multiple of 5 otherwise.
fn banded_price(min: f64, max: f64, index: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ratio = index as f64 / 11.0;
    let raw = min + (max - min) * ratio;
    if raw < 20.0 {
        raw.round()
    } else {
        (raw / 5.0).round() * 5.0
    }
}

/// Order-sensitive character-weighted hash folded into `1..=997`.
///
/// Downstream consumers key cached images off the resulting URL, so this
/// must stay stable across releases.
fn image_seed(value: &str) -> u64 {
    let sum: u64 = value
        .chars()
        .enumerate()
        .map(|(i, c)| u64::from(c as u32) * (i as u64 + 1))
        .sum();
    sum % 997 + 1
}

/// Builds the stable image reference for a product id and image query.
#[must_use]
pub fn image_url(id: &str, query: &str) -> String {
    let keyed = format!("{id}-{query}");
    let seed_raw = format!("{keyed}-{}", image_seed(&keyed));
    format!("https://picsum.photos/seed/{}/900/620", slugify(&seed_raw))
}

/// Storefront outbound-redirect path for a product slug.
#[must_use]
pub fn outbound_url(slug: &str) -> String {
    format!("/out/?slug={}", utf8_percent_encode(slug, URI_COMPONENT))
}

/// Destination URL and platform label by category rule.
fn affiliate_meta(category: &str, title: &str) -> (String, String) {
    let encoded = utf8_percent_encode(title, URI_COMPONENT);
    match category {
        "phone-apps" => (
            "App Store".to_string(),
            "https://apps.apple.com/us/genre/ios/id36".to_string(),
        ),
        "watches" => (
            "Jomashop".to_string(),
            format!("https://www.jomashop.com/search?q={encoded}"),
        ),
        "clothes" => (
            "Mr Porter".to_string(),
            format!("https://www.mrporter.com/en-us/shop/search/{encoded}"),
        ),
        _ => (
            "Amazon".to_string(),
            format!("https://www.amazon.com/s?k={encoded}"),
        ),
    }
}

fn epoch() -> DateTime<Utc> {
    let (y, m, d) = CATALOG_EPOCH;
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().unwrap_or_default()
}

/// Midnight UTC of the week label; falls back to the catalog epoch when the
/// label does not parse as an ISO date.
fn week_timestamp(week_label: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(week_label, "%Y-%m-%d")
        .map_or_else(|_| epoch(), |d| {
            Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
}

/// Expands the seed tables into the full catalog for `config`.
///
/// Exactly twelve products per category; ids and slugs are globally unique;
/// prices stay within the category band. The featured flag, week label, and
/// status come from `config`, which callers should normalize first.
#[must_use]
pub fn generate_catalog(config: &WeeklyConfig) -> Vec<Product> {
    let updated_at = week_timestamp(&config.current_week_label);
    let mut products = Vec::with_capacity(seed::categories().len() * 12);
    let mut ordinal: i64 = 0;

    for category in seed::categories() {
        let titles = seed::seed_titles(category.id);
        let pool = seed::brand_pool(category.id);
        let (min, max) = seed::price_band(category.id);
        let query = seed::image_query(category.id);

        for (index, title) in titles.iter().enumerate() {
            ordinal += 1;
            let id = format!("{}-{:02}", category.id, index + 1);
            let brand = pool[index % pool.len()];
            let (source_platform, affiliate_url) = affiliate_meta(category.id, title);
            let is_featured = config.featured_product_ids.iter().any(|f| f == &id);
            let week_label = if is_featured {
                config.current_week_label.clone()
            } else {
                config
                    .archive_week_for(&id)
                    .map_or_else(|| UNSCHEDULED_WEEK.to_string(), ToString::to_string)
            };
            let status = if config.hard_archived_product_ids.iter().any(|h| h == &id) {
                ProductStatus::Archived
            } else {
                ProductStatus::Live
            };

            products.push(Product {
                slug: format!("{}-{id}", slugify(title)),
                image_url: image_url(&id, &format!("{query},{title}")),
                short_description: format!(
                    "{title} is selected for the {} shortlist based on utility, build quality, and repeat-use value.",
                    category.label.to_lowercase()
                ),
                tags: vec![
                    category.id.to_string(),
                    brand.to_lowercase(),
                    "picks".to_string(),
                    "curated".to_string(),
                ],
                id,
                title: (*title).to_string(),
                brand: brand.to_string(),
                category: category.id.to_string(),
                price: banded_price(min, max, index),
                affiliate_url,
                source_platform,
                week_label,
                is_featured_this_week: is_featured,
                archived_at: (status == ProductStatus::Archived).then_some(updated_at),
                status,
                created_at: epoch() + Duration::days(ordinal),
                updated_at,
            });
        }
    }

    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashSet};

    fn config_with(featured: &[&str]) -> WeeklyConfig {
        WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            featured_product_ids: featured.iter().map(ToString::to_string).collect(),
            ..WeeklyConfig::default()
        }
    }

    #[test]
    fn slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("Foldable USB-C Hub"), "foldable-usb-c-hub");
        assert_eq!(slugify("  --Mechanical 75 Keyboard-- "), "mechanical-75-keyboard");
        assert_eq!(slugify("4K Streaming Stick"), "4k-streaming-stick");
    }

    #[test]
    fn generates_twelve_products_per_category() {
        let products = generate_catalog(&WeeklyConfig::default());
        for category in crate::seed::categories() {
            let count = products.iter().filter(|p| p.category == category.id).count();
            assert_eq!(count, 12, "category {}", category.id);
        }
        assert_eq!(products.len(), crate::seed::categories().len() * 12);
    }

    #[test]
    fn ids_and_slugs_are_globally_unique() {
        let products = generate_catalog(&WeeklyConfig::default());
        let ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        let slugs: HashSet<&str> = products.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(ids.len(), products.len());
        assert_eq!(slugs.len(), products.len());
    }

    #[test]
    fn ids_are_zero_padded_and_one_based() {
        let products = generate_catalog(&WeeklyConfig::default());
        assert!(products.iter().any(|p| p.id == "tech-01"));
        assert!(products.iter().any(|p| p.id == "tech-12"));
        assert!(!products.iter().any(|p| p.id == "tech-00" || p.id == "tech-13"));
    }

    #[test]
    fn prices_stay_within_band_and_follow_rounding_rule() {
        let products = generate_catalog(&WeeklyConfig::default());
        for product in &products {
            let (min, max) = crate::seed::price_band(&product.category);
            assert!(
                product.price >= min.round() - 2.5 && product.price <= max + 2.5,
                "{} price {} outside band [{min}, {max}]",
                product.id,
                product.price
            );
            if product.price >= 20.0 {
                assert!(
                    (product.price % 5.0).abs() < f64::EPSILON,
                    "{} price {} not a multiple of 5",
                    product.id,
                    product.price
                );
            } else {
                assert!((product.price - product.price.round()).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn band_endpoints_interpolate_min_to_max() {
        let products = generate_catalog(&WeeklyConfig::default());
        let first = products.iter().find(|p| p.id == "watches-01").expect("watches-01");
        let last = products.iter().find(|p| p.id == "watches-12").expect("watches-12");
        assert!((first.price - 90.0).abs() < f64::EPSILON);
        assert!((last.price - 950.0).abs() < f64::EPSILON);
    }

    #[test]
    fn image_url_is_deterministic_across_invocations() {
        let a = image_url("tech-04", "technology,desk,workspace,product,Mechanical 75 Keyboard");
        let b = image_url("tech-04", "technology,desk,workspace,product,Mechanical 75 Keyboard");
        assert_eq!(a, b);
        assert!(a.starts_with("https://picsum.photos/seed/"));
        assert!(a.ends_with("/900/620"));
    }

    #[test]
    fn image_seed_is_order_sensitive() {
        assert_ne!(image_url("tech-04", "ab"), image_url("tech-04", "ba"));
    }

    #[test]
    fn whole_catalog_is_reproducible() {
        let config = config_with(&["tech-01", "fitness-02"]);
        assert_eq!(generate_catalog(&config), generate_catalog(&config));
    }

    #[test]
    fn featured_flag_and_week_label_follow_config() {
        let config = config_with(&["tech-03"]);
        let products = generate_catalog(&config);
        let featured = products.iter().find(|p| p.id == "tech-03").expect("tech-03");
        assert!(featured.is_featured_this_week);
        assert_eq!(featured.week_label, "2026-01-05");

        let other = products.iter().find(|p| p.id == "tech-04").expect("tech-04");
        assert!(!other.is_featured_this_week);
        assert_eq!(other.week_label, UNSCHEDULED_WEEK);
    }

    #[test]
    fn archived_week_label_comes_from_archive_mapping() {
        let mut config = config_with(&[]);
        config.archive_by_week = BTreeMap::from([(
            "2025-12-29".to_string(),
            vec!["grooming-05".to_string()],
        )]);
        let products = generate_catalog(&config);
        let archived = products.iter().find(|p| p.id == "grooming-05").expect("grooming-05");
        assert_eq!(archived.week_label, "2025-12-29");
        assert_eq!(archived.status, ProductStatus::Live);
    }

    #[test]
    fn hard_archived_products_get_status_and_timestamp() {
        let mut config = config_with(&[]);
        config.hard_archived_product_ids = vec!["food-02".to_string()];
        let products = generate_catalog(&config);
        let archived = products.iter().find(|p| p.id == "food-02").expect("food-02");
        assert_eq!(archived.status, ProductStatus::Archived);
        assert_eq!(archived.archived_at, Some(archived.updated_at));

        let live = products.iter().find(|p| p.id == "food-03").expect("food-03");
        assert_eq!(live.status, ProductStatus::Live);
        assert!(live.archived_at.is_none());
    }

    #[test]
    fn affiliate_rules_vary_by_category() {
        let products = generate_catalog(&WeeklyConfig::default());
        let app = products.iter().find(|p| p.category == "phone-apps").expect("app");
        assert_eq!(app.source_platform, "App Store");
        assert_eq!(app.affiliate_url, "https://apps.apple.com/us/genre/ios/id36");

        let watch = products.iter().find(|p| p.category == "watches").expect("watch");
        assert_eq!(watch.source_platform, "Jomashop");
        assert!(watch.affiliate_url.starts_with("https://www.jomashop.com/search?q="));

        let clothes = products.iter().find(|p| p.category == "clothes").expect("clothes");
        assert_eq!(clothes.source_platform, "Mr Porter");

        let tech = products.iter().find(|p| p.category == "tech").expect("tech");
        assert_eq!(tech.source_platform, "Amazon");
        // Spaces in titles are percent-encoded, not '+'-encoded.
        assert!(tech.affiliate_url.contains("%20") || !tech.title.contains(' '));
    }

    #[test]
    fn timestamps_derive_from_week_label_and_ordinal() {
        let config = config_with(&[]);
        let products = generate_catalog(&config);
        let first = &products[0];
        assert_eq!(first.created_at.to_rfc3339(), "2025-01-02T00:00:00+00:00");
        assert_eq!(first.updated_at.to_rfc3339(), "2026-01-05T00:00:00+00:00");
        // Ordinal is catalog-wide, so created_at strictly increases.
        for pair in products.windows(2) {
            assert!(pair[0].created_at < pair[1].created_at);
        }
    }

    #[test]
    fn outbound_url_encodes_slug() {
        assert_eq!(outbound_url("field-watch-38-watches-01"), "/out/?slug=field-watch-38-watches-01");
        assert_eq!(outbound_url("a b"), "/out/?slug=a%20b");
    }
}
