//! Data layer for the picks storefront.
//!
//! Reconciles the generated base catalog with admin overrides persisted in
//! the override store, and exposes consistent read views to both the
//! storefront and the admin editor:
//!
//! - [`overrides`] — the persisted override envelope and typed,
//!   allow-listed patches.
//! - [`client`] — HTTP client for the override store and the weekly
//!   configuration source.
//! - [`service`] — [`CatalogService`], the one-shot-loading snapshot
//!   service consumers read from.
//! - [`editor`] — [`EditorSession`], the admin load→edit→validate→diff→push
//!   flows.

pub mod client;
pub mod editor;
mod error;
pub mod overrides;
pub mod service;

pub use client::{AdminCredentials, PutStateResponse, StateClient};
pub use editor::{CreatorForm, EditorSession, ProductForm, SponsorForm};
pub use error::DataError;
pub use overrides::{CreatorPatch, OverrideState, ProductPatch, WeeklyConfigPatch};
pub use service::{CatalogService, LoadState, WeekGroup, WeeklyMeta};
