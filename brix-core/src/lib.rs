// brix-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- LAYERS ---

// 1. Domain: profile document model, output variants, dbt project model.
// Depends on nothing else in the crate.
pub mod domain;

// 2. Infrastructure: persistence, settings, templates, dbt launcher, update notice.
pub mod infrastructure;

// 3. Application: profile editor and scaffolding use cases.
pub mod application;

pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::BrixError;
