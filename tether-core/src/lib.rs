//! Tether core library — domain types, configuration registry, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`RegistryError`]
//! - [`registry`] — define / load / save / list / select

pub mod error;
pub mod registry;
pub mod types;

pub use error::RegistryError;
pub use types::{Configuration, ConfigurationName, ItemPath, RootHandle};
