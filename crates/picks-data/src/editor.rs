//! Admin editing flows: load, edit, validate, diff, push.
//!
//! [`EditorSession`] works on clones of the loaded snapshots. Every save
//! validates first and then re-diffs the working copy against base data, so
//! the session always holds a minimal override document; reverting a field
//! to its base value removes the override entirely. Nothing leaves the
//! session until [`EditorSession::push`] replaces the stored document
//! wholesale.

use std::collections::BTreeMap;

use crate::client::{PutStateResponse, StateClient};
use crate::error::DataError;
use crate::overrides::{CreatorPatch, OverrideState, ProductPatch, WeeklyConfigPatch};
use crate::service::CatalogService;
use picks_core::{
    creator_roster, generate_catalog, validate_featured_ids, CreatorProfile, Product, Sponsor,
    WeeklyConfig, MAX_CREATOR_PICKS, MAX_VISIBLE_CREATORS,
};

/// Sponsor form input. Empty strings fall back to values derived from the
/// selected product.
#[derive(Debug, Clone, Default)]
pub struct SponsorForm {
    pub label: String,
    pub title: String,
    pub copy: String,
    pub url: String,
    pub product_id: Option<String>,
}

/// Product form input. String fields are the full desired values; `tags` is
/// the comma-separated form field.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub title: String,
    pub brand: String,
    pub price: Option<f64>,
    pub image_url: String,
    pub short_description: String,
    pub affiliate_url: String,
    pub source_platform: String,
    pub tags: String,
}

/// Creator form input.
#[derive(Debug, Clone)]
pub struct CreatorForm {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub avatar: String,
    pub picks: Vec<String>,
}

/// One admin editing session over working copies of the loaded data.
pub struct EditorSession {
    base_products: Vec<Product>,
    base_index: BTreeMap<String, usize>,
    base_weekly_config: WeeklyConfig,
    weekly_config: WeeklyConfig,
    product_overrides: BTreeMap<String, ProductPatch>,
    base_creators: Vec<CreatorProfile>,
    creator_overrides: Vec<CreatorPatch>,
}

impl EditorSession {
    /// Builds a session from a loaded [`CatalogService`].
    ///
    /// # Errors
    ///
    /// [`DataError::NotLoaded`] when the service has not loaded yet.
    pub fn from_service(service: &CatalogService) -> Result<Self, DataError> {
        Ok(Self::from_parts(
            service.base_weekly_config()?,
            &service.override_state()?,
        ))
    }

    /// Builds a session directly from a base weekly configuration and the
    /// current override document, against the shipped creator roster.
    #[must_use]
    pub fn from_parts(base_weekly_config: WeeklyConfig, state: &OverrideState) -> Self {
        Self::from_parts_with_roster(base_weekly_config, state, creator_roster())
    }

    /// Builds a session against an explicit creator roster.
    #[must_use]
    pub fn from_parts_with_roster(
        mut base_weekly_config: WeeklyConfig,
        state: &OverrideState,
        mut base_creators: Vec<CreatorProfile>,
    ) -> Self {
        base_weekly_config.normalize();
        let weekly_config = match &state.weekly_config_override {
            Some(patch) => patch.apply(&base_weekly_config),
            None => base_weekly_config.clone(),
        };

        // Base products never carry overrides; patches always diff against
        // the generated record.
        let base_products = generate_catalog(&base_weekly_config);
        let base_index = base_products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        for creator in &mut base_creators {
            creator.normalize();
        }

        let mut product_overrides = state.product_overrides.clone();
        product_overrides.retain(|_, patch| !patch.is_empty());
        let creator_overrides = state
            .creator_picks_override
            .iter()
            .filter(|patch| !patch.is_empty())
            .cloned()
            .collect();

        Self {
            base_products,
            base_index,
            base_weekly_config,
            weekly_config,
            product_overrides,
            base_creators,
            creator_overrides,
        }
    }

    /// The session's working weekly configuration.
    #[must_use]
    pub fn weekly_config(&self) -> &WeeklyConfig {
        &self.weekly_config
    }

    fn base_product(&self, id: &str) -> Option<&Product> {
        self.base_index.get(id).map(|&i| &self.base_products[i])
    }

    /// A product as it would render with the session's pending overrides.
    #[must_use]
    pub fn effective_product(&self, id: &str) -> Option<Product> {
        let mut product = self.base_product(id)?.clone();
        if let Some(patch) = self.product_overrides.get(id) {
            patch.apply(&mut product);
        }
        Some(product)
    }

    fn base_creator(&self, id: &str) -> Option<&CreatorProfile> {
        self.base_creators.iter().find(|c| c.id == id)
    }

    /// A creator profile as it would render with pending overrides.
    #[must_use]
    pub fn effective_creator(&self, id: &str) -> Option<CreatorProfile> {
        let mut creator = self.base_creator(id)?.clone();
        if let Some(patch) = self.creator_overrides.iter().find(|p| p.id == id) {
            patch.apply(&mut creator);
        }
        Some(creator)
    }

    /// How many creators are visible under pending overrides.
    #[must_use]
    pub fn visible_creator_count(&self) -> usize {
        self.base_creators
            .iter()
            .filter_map(|c| self.effective_creator(&c.id))
            .filter(|c| c.is_visible)
            .count()
    }

    /// Orders `ids` by base catalog position, dropping unknown ids.
    fn order_by_catalog(&self, ids: Vec<String>) -> Vec<String> {
        let mut known: Vec<String> = ids
            .into_iter()
            .filter(|id| self.base_index.contains_key(id))
            .collect();
        known.sort_by_key(|id| self.base_index[id]);
        known
    }

    /// Saves a new weekly selection, optionally moving to a new week label.
    ///
    /// Previously featured products that are not reselected are archived
    /// under the week label they were featured for; the new selection is
    /// stripped from every archive week.
    ///
    /// # Errors
    ///
    /// [`DataError::Validation`] unless `selection` holds exactly twelve
    /// unique known product ids.
    pub fn save_weekly(
        &mut self,
        week_label: Option<String>,
        selection: &[String],
    ) -> Result<(), DataError> {
        let validated = validate_featured_ids(selection)?;
        let ordered = self.order_by_catalog(validated);
        if ordered.len() != picks_core::WEEKLY_PICK_COUNT {
            return Err(DataError::Validation(
                "Weekly selection contains unknown product ids.".to_string(),
            ));
        }

        let previous_week = self.weekly_config.current_week_label.clone();
        let previous_featured = self.weekly_config.featured_product_ids.clone();

        if let Some(label) = week_label {
            self.weekly_config.current_week_label = label;
        }

        let leftovers: Vec<String> = previous_featured
            .into_iter()
            .filter(|id| !ordered.contains(id))
            .collect();
        if !leftovers.is_empty() && !previous_week.is_empty() {
            self.weekly_config
                .archive_by_week
                .entry(previous_week)
                .or_default()
                .extend(leftovers);
        }

        for ids in self.weekly_config.archive_by_week.values_mut() {
            ids.retain(|id| !ordered.contains(id));
        }

        self.weekly_config.featured_product_ids = ordered;
        self.weekly_config.normalize();
        Ok(())
    }

    /// Enables or disables the sponsor slot.
    ///
    /// # Errors
    ///
    /// [`DataError::Validation`] when enabling without exactly one selected
    /// known product.
    pub fn save_sponsor(&mut self, enabled: bool, form: &SponsorForm) -> Result<(), DataError> {
        if !enabled {
            self.weekly_config.sponsor = None;
            return Ok(());
        }

        let product_id = form
            .product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                DataError::Validation("Pick exactly one product for sponsor placement.".to_string())
            })?;
        let product = self.effective_product(product_id).ok_or_else(|| {
            DataError::Validation(format!("Unknown sponsor product id '{product_id}'."))
        })?;

        let or_default = |value: &str, fallback: String| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                fallback
            } else {
                trimmed.to_string()
            }
        };

        self.weekly_config.sponsor = Some(Sponsor {
            label: or_default(&form.label, "Sponsored".to_string()),
            title: or_default(&form.title, product.title.clone()),
            copy: or_default(
                &form.copy,
                format!("Featured partner placement for {}.", product.brand),
            ),
            url: or_default(&form.url, product.affiliate_url.clone()),
            product_id: product_id.to_string(),
        });
        Ok(())
    }

    /// Saves product edits as a minimal patch; a form matching the base
    /// record removes the override entirely.
    ///
    /// # Errors
    ///
    /// [`DataError::Validation`] for an unknown product id.
    pub fn save_product(&mut self, id: &str, form: &ProductForm) -> Result<(), DataError> {
        let base = self
            .base_product(id)
            .ok_or_else(|| DataError::Validation(format!("Unknown product id '{id}'.")))?
            .clone();

        let mut desired = base.clone();
        desired.title = form.title.trim().to_string();
        desired.brand = form.brand.trim().to_string();
        desired.price = form.price.unwrap_or(base.price);
        desired.image_url = form.image_url.trim().to_string();
        desired.short_description = form.short_description.trim().to_string();
        desired.affiliate_url = form.affiliate_url.trim().to_string();
        desired.source_platform = form.source_platform.trim().to_string();
        desired.tags = form
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect();

        let patch = ProductPatch::diff(&base, &desired);
        if patch.is_empty() {
            self.product_overrides.remove(id);
        } else {
            self.product_overrides.insert(id.to_string(), patch);
        }
        Ok(())
    }

    /// Drops any pending override for `id`, reverting it to the generated
    /// record.
    pub fn reset_product(&mut self, id: &str) {
        self.product_overrides.remove(id);
    }

    fn upsert_creator_patch(&mut self, id: &str, patch: CreatorPatch) {
        self.creator_overrides.retain(|p| p.id != id);
        if !patch.is_empty() {
            self.creator_overrides.push(patch);
        }
    }

    /// Toggles a creator's storefront visibility.
    ///
    /// # Errors
    ///
    /// [`DataError::Validation`] for an unknown creator, or when enabling
    /// would exceed the visible-creator cap.
    pub fn set_creator_visibility(&mut self, id: &str, visible: bool) -> Result<(), DataError> {
        let base = self
            .base_creator(id)
            .ok_or_else(|| DataError::Validation(format!("Unknown creator id '{id}'.")))?
            .clone();

        if visible {
            let other_visible = self
                .base_creators
                .iter()
                .filter(|c| c.id != id)
                .filter_map(|c| self.effective_creator(&c.id))
                .filter(|c| c.is_visible)
                .count();
            if other_visible >= MAX_VISIBLE_CREATORS {
                return Err(DataError::Validation(format!(
                    "You can show up to {MAX_VISIBLE_CREATORS} creators."
                )));
            }
        }

        let mut desired = self
            .effective_creator(id)
            .unwrap_or_else(|| base.clone());
        desired.is_visible = visible;
        self.upsert_creator_patch(id, CreatorPatch::diff(&base, &desired));
        Ok(())
    }

    /// Saves creator profile edits as a minimal patch.
    ///
    /// # Errors
    ///
    /// [`DataError::Validation`] for an unknown creator id or a picks list
    /// outside 1..=12 unique known ids.
    pub fn save_creator(&mut self, id: &str, form: &CreatorForm) -> Result<(), DataError> {
        let base = self
            .base_creator(id)
            .ok_or_else(|| DataError::Validation(format!("Unknown creator id '{id}'.")))?
            .clone();

        let picks = self.order_by_catalog(picks_core::dedupe_preserving(form.picks.clone()));
        if picks.is_empty() || picks.len() > MAX_CREATOR_PICKS {
            return Err(DataError::Validation(format!(
                "Creators need between 1 and {MAX_CREATOR_PICKS} picks."
            )));
        }

        let current = self
            .effective_creator(id)
            .unwrap_or_else(|| base.clone());
        let mut desired = base.clone();
        desired.name = form.name.trim().to_string();
        desired.role = form.role.trim().to_string();
        desired.bio = form.bio.trim().to_string();
        desired.avatar = form.avatar.trim().to_string();
        desired.picks = picks;
        // Visibility is managed by its own toggle; profile saves keep it.
        desired.is_visible = current.is_visible;

        self.upsert_creator_patch(id, CreatorPatch::diff(&base, &desired));
        Ok(())
    }

    /// Reverts a creator to the base roster entry.
    pub fn clear_creator(&mut self, id: &str) {
        self.creator_overrides.retain(|p| p.id != id);
    }

    /// Reverts the weekly configuration to the fetched base.
    pub fn clear_weekly(&mut self) {
        self.weekly_config = self.base_weekly_config.clone();
    }

    /// Reverts the sponsor slot to the fetched base.
    pub fn clear_sponsor(&mut self) {
        self.weekly_config.sponsor = self.base_weekly_config.sponsor.clone();
    }

    /// Drops every pending override.
    pub fn clear_all(&mut self) {
        self.weekly_config = self.base_weekly_config.clone();
        self.product_overrides.clear();
        self.creator_overrides.clear();
    }

    /// The minimal override document for the session's pending edits.
    /// Creator patches follow roster order; the store stamps `updatedAt`.
    #[must_use]
    pub fn override_document(&self) -> OverrideState {
        let mut creator_picks_override: Vec<CreatorPatch> = self
            .base_creators
            .iter()
            .filter_map(|c| {
                self.creator_overrides
                    .iter()
                    .find(|p| p.id == c.id)
                    .cloned()
            })
            .collect();
        creator_picks_override.retain(|p| !p.is_empty());

        OverrideState {
            weekly_config_override: WeeklyConfigPatch::diff(
                &self.base_weekly_config,
                &self.weekly_config,
            ),
            product_overrides: self
                .product_overrides
                .iter()
                .filter(|(_, patch)| !patch.is_empty())
                .map(|(id, patch)| (id.clone(), patch.clone()))
                .collect(),
            creator_picks_override,
            updated_at: None,
        }
    }

    /// Pushes the session's override document to the store, replacing the
    /// stored document wholesale. Local state is untouched on failure so
    /// the operator can fix credentials and retry.
    ///
    /// # Errors
    ///
    /// [`DataError::StoreRejected`] when the store refuses the write;
    /// [`DataError::Http`] on network failure.
    pub async fn push(&self, client: &StateClient) -> Result<PutStateResponse, DataError> {
        client.put_state(&self.override_document()).await
    }
}
