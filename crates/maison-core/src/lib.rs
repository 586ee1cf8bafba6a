//! Maison Core - Shared types and catalog logic for the Maison dashboard
//!
//! This crate provides the foundational types for the Maison system:
//! - Model catalog descriptors, categorization, and display naming
//! - Auth wire types and the two-phase (OTP) login flow state machine
//! - Profile payloads with the canonical field-naming contract
//! - The curated model library index (TOML-backed, filterable, searchable)

pub mod auth;
pub mod catalog;
pub mod library;
pub mod profile;

pub use auth::{AuthPhase, Identity, LoginRequest, LoginResponse};
pub use catalog::{CatalogError, CatalogResponse, ModelDescriptor};
pub use library::{LibraryEntry, LibraryError, LibraryIndex};
pub use profile::{Profile, ProfileUpdate};
