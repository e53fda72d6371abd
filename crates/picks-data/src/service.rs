//! The storefront data layer.
//!
//! [`CatalogService`] loads once: it fetches the override document and the
//! weekly configuration, merges them, generates the catalog, and applies
//! product and creator patches. The loaded snapshot is immutable; every
//! accessor hands out owned copies so callers can never alias or mutate the
//! shared state. Concurrent first calls to [`CatalogService::load`] await
//! the same in-flight load.

use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{Datelike, NaiveDate, Utc};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::client::StateClient;
use crate::error::DataError;
use crate::overrides::{apply_creator_patches, apply_product_overrides, OverrideState};
use picks_core::{
    creator_roster, generate_catalog, seed, CreatorProfile, Product, ProductStatus, Sponsor,
    WeeklyConfig, UNSCHEDULED_WEEK,
};

/// Load lifecycle, observable without awaiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

const PHASE_UNLOADED: u8 = 0;
const PHASE_LOADING: u8 = 1;
const PHASE_LOADED: u8 = 2;

/// One archive shelf: a past week and the products that were featured then.
#[derive(Debug, Clone)]
pub struct WeekGroup {
    /// ISO week label, or [`UNSCHEDULED_WEEK`].
    pub week_label: String,
    /// Display form, e.g. `"JAN 5-11"`.
    pub week_display: String,
    pub products: Vec<Product>,
}

/// Header metadata for the current weekly shelf.
#[derive(Debug, Clone)]
pub struct WeeklyMeta {
    pub week_label: String,
    /// e.g. `"WEEKLY · JAN 5-11"`.
    pub display_label: String,
    pub sponsor: Option<Sponsor>,
}

struct LoadedCatalog {
    weekly_config: WeeklyConfig,
    base_weekly_config: WeeklyConfig,
    products: Vec<Product>,
    creators: Vec<CreatorProfile>,
    base_creators: Vec<CreatorProfile>,
    override_state: OverrideState,
}

/// Load-once snapshot service over the generated catalog plus overrides.
pub struct CatalogService {
    client: StateClient,
    weekly_config_url: String,
    loaded: OnceCell<LoadedCatalog>,
    phase: AtomicU8,
}

impl CatalogService {
    #[must_use]
    pub fn new(client: StateClient, weekly_config_url: impl Into<String>) -> Self {
        Self {
            client,
            weekly_config_url: weekly_config_url.into(),
            loaded: OnceCell::new(),
            phase: AtomicU8::new(PHASE_UNLOADED),
        }
    }

    /// Current lifecycle phase. Mainly useful for health reporting.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        match self.phase.load(Ordering::Acquire) {
            PHASE_LOADING => LoadState::Loading,
            PHASE_LOADED => LoadState::Loaded,
            _ => LoadState::Unloaded,
        }
    }

    /// Loads the catalog. Idempotent: the first caller performs the fetch
    /// and merge, concurrent callers await that same load, later callers
    /// return immediately.
    ///
    /// An unreachable or malformed override store degrades to base data
    /// with a warning. An unreachable weekly config is fatal.
    ///
    /// # Errors
    ///
    /// - [`DataError::WeeklyConfigStatus`] / [`DataError::Http`] /
    ///   [`DataError::Deserialize`] when the weekly configuration cannot be
    ///   fetched and parsed. A failed load leaves the service unloaded, so
    ///   a later call retries.
    pub async fn load(&self) -> Result<(), DataError> {
        self.loaded
            .get_or_try_init(|| async {
                self.phase.store(PHASE_LOADING, Ordering::Release);
                match self.load_inner().await {
                    Ok(catalog) => {
                        self.phase.store(PHASE_LOADED, Ordering::Release);
                        Ok(catalog)
                    }
                    Err(err) => {
                        self.phase.store(PHASE_UNLOADED, Ordering::Release);
                        Err(err)
                    }
                }
            })
            .await?;
        Ok(())
    }

    async fn load_inner(&self) -> Result<LoadedCatalog, DataError> {
        let override_state = match self.client.fetch_state().await {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "override store unavailable; using base data");
                OverrideState::default()
            }
        };

        let base_weekly_config = self
            .client
            .fetch_weekly_config(&self.weekly_config_url)
            .await?;

        let weekly_config = match &override_state.weekly_config_override {
            Some(patch) => patch.apply(&base_weekly_config),
            None => base_weekly_config.clone(),
        };

        let mut products = generate_catalog(&weekly_config);
        apply_product_overrides(&mut products, &override_state.product_overrides, Utc::now());

        let mut base_creators = creator_roster();
        for creator in &mut base_creators {
            creator.normalize();
        }
        let mut creators = base_creators.clone();
        apply_creator_patches(&mut creators, &override_state.creator_picks_override);

        info!(
            week = %weekly_config.current_week_label,
            products = products.len(),
            product_overrides = override_state.product_overrides.len(),
            "catalog loaded"
        );

        Ok(LoadedCatalog {
            weekly_config,
            base_weekly_config,
            products,
            creators,
            base_creators,
            override_state,
        })
    }

    fn snapshot(&self) -> Result<&LoadedCatalog, DataError> {
        self.loaded.get().ok_or(DataError::NotLoaded)
    }

    /// The effective weekly configuration (base merged with overrides).
    ///
    /// # Errors
    ///
    /// [`DataError::NotLoaded`] before [`CatalogService::load`] resolves;
    /// the same holds for every accessor below.
    pub fn weekly_config(&self) -> Result<WeeklyConfig, DataError> {
        Ok(self.snapshot()?.weekly_config.clone())
    }

    /// The weekly configuration as fetched, before overrides.
    pub fn base_weekly_config(&self) -> Result<WeeklyConfig, DataError> {
        Ok(self.snapshot()?.base_weekly_config.clone())
    }

    /// The full generated catalog with product overrides applied, in
    /// generation order.
    pub fn generated_products(&self) -> Result<Vec<Product>, DataError> {
        Ok(self.snapshot()?.products.clone())
    }

    /// Creator roster with creator patches applied.
    pub fn creators(&self) -> Result<Vec<CreatorProfile>, DataError> {
        Ok(self.snapshot()?.creators.clone())
    }

    /// Creator roster before patches.
    pub fn base_creators(&self) -> Result<Vec<CreatorProfile>, DataError> {
        Ok(self.snapshot()?.base_creators.clone())
    }

    /// The override document the load observed.
    pub fn override_state(&self) -> Result<OverrideState, DataError> {
        Ok(self.snapshot()?.override_state.clone())
    }

    /// All products, including hard-archived ones.
    pub fn all_products(&self) -> Result<Vec<Product>, DataError> {
        self.generated_products()
    }

    /// Products browsable on the storefront (hard-archived excluded).
    pub fn live_products(&self) -> Result<Vec<Product>, DataError> {
        Ok(self
            .snapshot()?
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Live)
            .cloned()
            .collect())
    }

    /// This week's featured shelf, ordered by the featured list. Ids that
    /// are featured but missing from the catalog are skipped; a featured
    /// product missing a rank sorts last.
    pub fn weekly_products(&self) -> Result<Vec<Product>, DataError> {
        let snapshot = self.snapshot()?;
        let rank = |id: &str| {
            snapshot
                .weekly_config
                .featured_product_ids
                .iter()
                .position(|f| f == id)
        };
        let mut featured: Vec<Product> = snapshot
            .products
            .iter()
            .filter(|p| p.is_featured_this_week && p.status == ProductStatus::Live)
            .cloned()
            .collect();
        featured.sort_by_key(|p| rank(&p.id).unwrap_or(usize::MAX));
        Ok(featured)
    }

    /// Live products outside this week's shelf, newest first.
    pub fn archived_products(&self) -> Result<Vec<Product>, DataError> {
        let mut archived: Vec<Product> = self
            .snapshot()?
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Live && !p.is_featured_this_week)
            .cloned()
            .collect();
        archived.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(archived)
    }

    /// Archived products grouped by week: labeled weeks newest first, the
    /// unscheduled bucket last, products within a group newest first.
    pub fn archived_by_week(&self) -> Result<Vec<WeekGroup>, DataError> {
        let archived = self.archived_products()?;
        let mut labels: Vec<String> = archived.iter().map(|p| p.week_label.clone()).collect();
        labels.sort();
        labels.dedup();
        labels.reverse();
        if let Some(pos) = labels.iter().position(|l| l == UNSCHEDULED_WEEK) {
            let unscheduled = labels.remove(pos);
            labels.push(unscheduled);
        }

        Ok(labels
            .into_iter()
            .map(|label| WeekGroup {
                week_display: if label == UNSCHEDULED_WEEK {
                    UNSCHEDULED_WEEK.to_string()
                } else {
                    format_week_range(&label)
                },
                products: archived
                    .iter()
                    .filter(|p| p.week_label == label)
                    .cloned()
                    .collect(),
                week_label: label,
            })
            .collect())
    }

    pub fn product_by_id(&self, id: &str) -> Result<Option<Product>, DataError> {
        Ok(self
            .snapshot()?
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    pub fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, DataError> {
        Ok(self
            .snapshot()?
            .products
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    /// Products for `ids` in the given order; unknown ids are skipped.
    pub fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, DataError> {
        let snapshot = self.snapshot()?;
        Ok(ids
            .iter()
            .filter_map(|id| snapshot.products.iter().find(|p| &p.id == id).cloned())
            .collect())
    }

    pub fn products_by_category(&self, category: &str) -> Result<Vec<Product>, DataError> {
        Ok(self
            .snapshot()?
            .products
            .iter()
            .filter(|p| p.category == category && p.status == ProductStatus::Live)
            .cloned()
            .collect())
    }

    /// Unique brand names across the live catalog, sorted.
    pub fn brands(&self) -> Result<Vec<String>, DataError> {
        let mut brands: Vec<String> = self
            .snapshot()?
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Live)
            .map(|p| p.brand.clone())
            .collect();
        brands.sort();
        brands.dedup();
        Ok(brands)
    }

    /// Header metadata for the weekly shelf.
    pub fn weekly_meta(&self) -> Result<WeeklyMeta, DataError> {
        let config = &self.snapshot()?.weekly_config;
        Ok(WeeklyMeta {
            week_label: config.current_week_label.clone(),
            display_label: format!(
                "WEEKLY · {}",
                format_week_range(&config.current_week_label)
            ),
            sponsor: config.sponsor.clone(),
        })
    }

    /// Static merchandising bundles. Gated on load like the product
    /// accessors so pages never render half-initialized.
    pub fn packs(&self) -> Result<&'static [seed::Pack], DataError> {
        self.snapshot()?;
        Ok(seed::packs())
    }

    pub fn guides(&self) -> Result<&'static [seed::Guide], DataError> {
        self.snapshot()?;
        Ok(seed::guides())
    }

    pub fn collections(&self) -> Result<&'static [seed::Collection], DataError> {
        self.snapshot()?;
        Ok(seed::collections())
    }

    pub fn audience_for_category(
        &self,
        category: &str,
    ) -> Result<seed::CategoryAudience, DataError> {
        self.snapshot()?;
        Ok(seed::audience_for_category(category))
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("weekly_config_url", &self.weekly_config_url)
            .field("load_state", &self.load_state())
            .finish_non_exhaustive()
    }
}

/// `"JAN 5-11"` for a week starting on the labeled ISO date; spans that
/// cross a month boundary name both months. Unparseable labels are shown
/// verbatim.
#[must_use]
pub fn format_week_range(week_label: &str) -> String {
    let Ok(start) = NaiveDate::parse_from_str(week_label, "%Y-%m-%d") else {
        return week_label.to_string();
    };
    let end = start + chrono::Duration::days(6);
    let start_month = start.format("%b").to_string().to_uppercase();
    if start.month() == end.month() {
        format!("{start_month} {}-{}", start.day(), end.day())
    } else {
        let end_month = end.format("%b").to_string().to_uppercase();
        format!("{start_month} {}-{end_month} {}", start.day(), end.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_range_within_one_month() {
        assert_eq!(format_week_range("2026-01-05"), "JAN 5-11");
    }

    #[test]
    fn week_range_across_month_boundary() {
        assert_eq!(format_week_range("2026-01-29"), "JAN 29-FEB 4");
    }

    #[test]
    fn week_range_passes_bad_labels_through() {
        assert_eq!(format_week_range("UNSCHEDULED"), "UNSCHEDULED");
    }
}
