//! svg-icon-loader: Lazy SVG icon injection for marker elements
//!
//! This crate scans a document for marker elements such as
//! `<i class="icon-star">`, fetches the matching `star.svg`, caches it, and
//! injects the markup into every marker that asks for it.
//!
//! The document and the network are both traits, so the same loader runs
//! against a browser DOM (`web` feature), an in-memory [`MemoryDocument`],
//! a directory of files ([`FsFetcher`]) or an HTTP origin ([`HttpFetcher`]).
//!
//! # Example
//!
//! ```no_run
//! use svg_icon_loader::{ConfigPatch, FsFetcher, IconLoader, MemoryDocument};
//!
//! # async fn run() {
//! let loader = IconLoader::new(
//!     MemoryDocument::new(),
//!     FsFetcher::new("public"),
//!     ConfigPatch::new().with_icon_path("assets/icons/"),
//! );
//! loader.document().append("i", &["icon-star"]);
//!
//! // Reads public/config.json, then fills every marker.
//! loader.initialize().await;
//! println!("loaded: {:?}", loader.loaded_icons());
//! # }
//! ```
//!
//! # Configuration
//!
//! Settings come from three layers, each overriding only the keys it sets:
//! the defaults, the options passed to [`IconLoader::new`], and the
//! `svgIcon` section of `config.json`. [`IconLoader::update_config`] applies
//! further changes at runtime.

mod cache;
mod config;
mod document;
mod error;
mod fetch;
mod loader;
mod markup;

#[cfg(feature = "web")]
mod web;

pub use cache::IconCache;
pub use config::{
    CONFIG_RESOURCE, ConfigPatch, ExternalConfig, ICON_EXTENSION, LoaderConfig, SVG_ROOT_CLASS,
};
pub use document::{Document, ElementId, MemoryDocument, Selector};
pub use error::{FetchError, LoadError, SelectorError};
#[cfg(not(target_family = "wasm"))]
pub use fetch::FsFetcher;
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
#[cfg(any(test, feature = "test-support"))]
pub use fetch::StaticFetcher;
pub use fetch::{FetchResponse, Fetcher};
pub use loader::{IconLoader, LoadOutcome, Target};
pub use markup::{add_class_to_tag, tag_classes};

#[cfg(feature = "web")]
pub use web::{WebFetcher, init_icons};
