//! acctsync core library — domain types, validation, region ordering, record store.
//!
//! - [`types`] — newtypes, declared config, managed record
//! - [`validate`] — uniqueness checks for set-valued fields
//! - [`normalize`] — region order reconstruction
//! - [`links`] — `_links` flattening and identifier extraction
//! - [`store`] — load / save / remove local records
//! - [`error`] — [`ValidationError`], [`NormalizeError`], [`StoreError`]

pub mod error;
pub mod links;
pub mod normalize;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{NormalizeError, StoreError, ValidationError};
pub use links::{Href, Link, RemoteLinks};
pub use types::{AccountName, CloudAccountConfig, CloudAccountId, CloudAccountRecord, Password, Tag};
