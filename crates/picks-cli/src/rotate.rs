//! Weekly rotation over a `WeeklyConfig`.
//!
//! Rotation always archives the outgoing featured set under the outgoing
//! week label, even ids that are reselected; the generator resolves a
//! featured id to the current week first, so a reselected id never shows as
//! archived.

use anyhow::{bail, Context};
use chrono::NaiveDate;

use picks_core::{validate_featured_ids, WeeklyConfig, WEEKLY_PICK_COUNT};

/// What a rotation did, for operator output.
#[derive(Debug)]
pub struct RotationSummary {
    pub previous_week: String,
    pub next_week: String,
    pub featured: Vec<String>,
    pub hard_archived: usize,
}

/// Rotates `config` to `next_week` with the given featured selection.
///
/// The previous featured set is merged into the archive under the previous
/// week label; with `hard_archive_prev` it is also appended to the
/// hard-archived list.
///
/// # Errors
///
/// Fails when `next_week` is not an ISO date or the selection is not
/// exactly twelve unique ids.
pub fn rotate_config(
    config: &mut WeeklyConfig,
    next_week: &str,
    featured: &[String],
    hard_archive_prev: bool,
) -> anyhow::Result<RotationSummary> {
    NaiveDate::parse_from_str(next_week, "%Y-%m-%d")
        .with_context(|| format!("--week must be an ISO date (YYYY-MM-DD), got '{next_week}'"))?;
    let featured = validate_featured_ids(featured)
        .with_context(|| format!("weekly rotation requires exactly {WEEKLY_PICK_COUNT} featured ids"))?;

    let previous_week = config.current_week_label.clone();
    let previous_featured = config.featured_product_ids.clone();
    if previous_week.is_empty() && !previous_featured.is_empty() {
        bail!("config has featured ids but no currentWeekLabel to archive them under");
    }

    if !previous_week.is_empty() {
        config
            .archive_by_week
            .entry(previous_week.clone())
            .or_default()
            .extend(previous_featured.iter().cloned());
    }
    let hard_archived = if hard_archive_prev {
        config
            .hard_archived_product_ids
            .extend(previous_featured.iter().cloned());
        previous_featured.len()
    } else {
        0
    };

    config.current_week_label = next_week.to_string();
    config.featured_product_ids.clone_from(&featured);
    config.normalize();

    Ok(RotationSummary {
        previous_week,
        next_week: next_week.to_string(),
        featured,
        hard_archived,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twelve(prefix: &str) -> Vec<String> {
        (1..=12).map(|i| format!("{prefix}-{i:02}")).collect()
    }

    fn config() -> WeeklyConfig {
        WeeklyConfig {
            current_week_label: "2026-01-05".to_string(),
            featured_product_ids: twelve("tech"),
            ..WeeklyConfig::default()
        }
    }

    #[test]
    fn rotation_archives_the_previous_featured_set() {
        let mut config = config();
        let summary = rotate_config(&mut config, "2026-01-12", &twelve("grooming"), false)
            .expect("valid rotation");

        assert_eq!(summary.previous_week, "2026-01-05");
        assert_eq!(config.current_week_label, "2026-01-12");
        assert_eq!(config.featured_product_ids, twelve("grooming"));
        assert_eq!(config.archive_by_week["2026-01-05"], twelve("tech"));
        assert!(config.hard_archived_product_ids.is_empty());
        assert_eq!(summary.hard_archived, 0);
    }

    #[test]
    fn rotation_merges_into_an_existing_archive_week() {
        let mut config = config();
        config
            .archive_by_week
            .insert("2026-01-05".to_string(), vec!["tech-01".to_string()]);

        rotate_config(&mut config, "2026-01-12", &twelve("grooming"), false)
            .expect("valid rotation");

        // tech-01 appears once despite being present before the merge.
        assert_eq!(config.archive_by_week["2026-01-05"], twelve("tech"));
    }

    #[test]
    fn hard_archive_prev_also_fills_the_hard_list() {
        let mut config = config();
        let summary = rotate_config(&mut config, "2026-01-12", &twelve("grooming"), true)
            .expect("valid rotation");

        assert_eq!(config.hard_archived_product_ids, twelve("tech"));
        assert_eq!(summary.hard_archived, 12);
    }

    #[test]
    fn rotation_rejects_wrong_counts_and_bad_dates() {
        let mut config = config();
        let eleven: Vec<String> = twelve("grooming").into_iter().take(11).collect();
        assert!(rotate_config(&mut config, "2026-01-12", &eleven, false).is_err());
        assert!(rotate_config(&mut config, "next monday", &twelve("grooming"), false).is_err());
        // A failed rotation leaves the config untouched.
        assert_eq!(config.current_week_label, "2026-01-05");
    }

    #[test]
    fn back_to_back_rotations_accumulate_archive_weeks() {
        let mut config = config();
        rotate_config(&mut config, "2026-01-12", &twelve("grooming"), false).expect("first");
        rotate_config(&mut config, "2026-01-19", &twelve("fitness"), false).expect("second");

        assert_eq!(config.archive_by_week.len(), 2);
        assert_eq!(config.archive_by_week["2026-01-12"], twelve("grooming"));
        assert_eq!(config.current_week_label, "2026-01-19");
    }
}
