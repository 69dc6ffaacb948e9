//! Browser bindings for WASM environments.
//!
//! Implements [`Document`] for `web_sys::Document` and provides
//! [`WebFetcher`], which goes through `window.fetch`. The exported
//! `initIcons` function is the one-call entry point for pages that only want
//! their markers filled once.
//!
//! # Feature Flag
//!
//! ```toml
//! [dependencies]
//! svg-icon-loader = { version = "0.1", default-features = false, features = ["web"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { initIcons } from 'svg-icon-loader';
//!
//! await init();
//! await initIcons();
//! ```

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Response};

use crate::config::ConfigPatch;
use crate::document::{Document, Selector};
use crate::error::FetchError;
use crate::fetch::{FetchResponse, Fetcher};
use crate::loader::IconLoader;

// ============================================================================
// Document
// ============================================================================

impl Document for web_sys::Document {
    type Element = Element;

    fn query_selector_all(&self, selector: &Selector) -> Vec<Element> {
        let css = selector.to_string();
        let list = match web_sys::Document::query_selector_all(self, &css) {
            Ok(list) => list,
            Err(err) => {
                log::error!("querySelectorAll({css}) failed: {err:?}");
                return Vec::new();
            }
        };

        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_selector(&self, selector: &Selector) -> Option<Element> {
        web_sys::Document::query_selector(self, &selector.to_string())
            .ok()
            .flatten()
    }

    fn query_selector_str(&self, css: &str) -> Option<Element> {
        match web_sys::Document::query_selector(self, css) {
            Ok(found) => found,
            Err(err) => {
                log::error!("querySelector({css}) failed: {err:?}");
                None
            }
        }
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name()
    }

    fn class_list(&self, element: &Element) -> Vec<String> {
        let list = element.class_list();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn add_class(&self, element: &Element, class: &str) {
        if let Err(err) = element.class_list().add_1(class) {
            log::warn!("failed to add class {class}: {err:?}");
        }
    }

    fn set_inner_html(&self, element: &Element, html: &str) {
        element.set_inner_html(html);
    }

    fn set_text_content(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn add_nested_class(&self, element: &Element, nested_tag: &str, class: &str) -> bool {
        match element.query_selector(nested_tag) {
            Ok(Some(nested)) => nested.class_list().add_1(class).is_ok(),
            _ => false,
        }
    }
}

// ============================================================================
// WebFetcher
// ============================================================================

/// Fetches resources with the page's `window.fetch`, relative to the page URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFetcher;

#[async_trait(?Send)]
impl Fetcher for WebFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Js("no global window".into()))?;

        let promise: js_sys::Promise = window.fetch_with_str(path);
        let response: Response = JsFuture::from(promise)
            .await
            .and_then(|value| value.dyn_into())
            .map_err(js_error)?;

        let status = response.status();
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;

        Ok(FetchResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn js_error(value: JsValue) -> FetchError {
    FetchError::Js(format!("{value:?}"))
}

// ============================================================================
// Entry Point
// ============================================================================

/// Loads `config.json` and fills every marker on the current page.
///
/// `options` is an optional JSON string in the `svgIcon` format, applied
/// before the configuration file. Resolves to the number of markers that
/// received their icon.
#[wasm_bindgen(js_name = "initIcons")]
pub async fn init_icons(options: Option<String>) -> Result<u32, JsError> {
    let options = match options {
        Some(json) => ConfigPatch::from_json(&json)
            .map_err(|e| JsError::new(&format!("invalid options: {e}")))?,
        None => ConfigPatch::new(),
    };
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsError::new("no document"))?;

    let loader = IconLoader::new(document, WebFetcher, options);
    let outcomes = loader.initialize().await;

    Ok(outcomes.iter().filter(|o| o.is_injected()).count() as u32)
}
