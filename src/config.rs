//! Loader configuration and its JSON representation.
//!
//! A [`LoaderConfig`] is the full, resolved configuration. A [`ConfigPatch`]
//! carries only the fields a caller wants to change and is merged over the
//! current configuration field by field. [`ExternalConfig`] is the schema of
//! the `config.json` resource the loader consults on initialization.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "svgIcon": {
//!     "iconPath": "static/icons/",
//!     "cacheEnabled": false
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use svg_icon_loader::{ConfigPatch, LoaderConfig};
//!
//! let mut config = LoaderConfig::default();
//! config.merge(&ConfigPatch::new().with_icon_class("foo"));
//!
//! assert_eq!(config.icon_class, "foo");
//! assert_eq!(config.icon_prefix, "icon-");
//! ```

use serde::{Deserialize, Serialize};

/// Name of the configuration resource fetched by
/// [`IconLoader::load_external_config`](crate::IconLoader::load_external_config).
pub const CONFIG_RESOURCE: &str = "config.json";

/// Class added to the root `<svg>` element of every injected icon.
pub const SVG_ROOT_CLASS: &str = "icon-svg";

/// File extension appended to an icon name to form its resource path.
pub const ICON_EXTENSION: &str = ".svg";

// ============================================================================
// LoaderConfig
// ============================================================================

/// The resolved loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Path or URL prefix under which icon files live.
    pub icon_path: String,

    /// Class prefix marking an element as an icon request, e.g. `icon-`.
    pub icon_prefix: String,

    /// Class added to a marker once its icon has been injected.
    pub icon_class: String,

    /// Scan the document during [`initialize`](crate::IconLoader::initialize).
    pub auto_init: bool,

    /// Keep fetched markup for reuse by later loads of the same name.
    pub cache_enabled: bool,

    /// The only element tag eligible for icon loading.
    pub target_tag: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            icon_path: "assets/icons/".into(),
            icon_prefix: "icon-".into(),
            icon_class: "svg-icon".into(),
            auto_init: true,
            cache_enabled: true,
            target_tag: "i".into(),
        }
    }
}

impl LoaderConfig {
    /// Returns the defaults with `patch` merged over them.
    pub fn with_patch(patch: &ConfigPatch) -> Self {
        let mut config = Self::default();
        config.merge(patch);
        config
    }

    /// Overrides every field that `patch` sets, leaving the rest untouched.
    pub fn merge(&mut self, patch: &ConfigPatch) {
        if let Some(icon_path) = &patch.icon_path {
            self.icon_path.clone_from(icon_path);
        }
        if let Some(icon_prefix) = &patch.icon_prefix {
            self.icon_prefix.clone_from(icon_prefix);
        }
        if let Some(icon_class) = &patch.icon_class {
            self.icon_class.clone_from(icon_class);
        }
        if let Some(auto_init) = patch.auto_init {
            self.auto_init = auto_init;
        }
        if let Some(cache_enabled) = patch.cache_enabled {
            self.cache_enabled = cache_enabled;
        }
        if let Some(target_tag) = &patch.target_tag {
            self.target_tag.clone_from(target_tag);
        }
    }

    /// Resource path for the icon called `name`.
    pub fn icon_url(&self, name: &str) -> String {
        format!("{}{}{}", self.icon_path, name, ICON_EXTENSION)
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the configuration to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a complete configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// ConfigPatch
// ============================================================================

/// A partial configuration. `None` fields keep their current value on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tag: Option<String>,
}

impl ConfigPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon_path(mut self, icon_path: impl Into<String>) -> Self {
        self.icon_path = Some(icon_path.into());
        self
    }

    pub fn with_icon_prefix(mut self, icon_prefix: impl Into<String>) -> Self {
        self.icon_prefix = Some(icon_prefix.into());
        self
    }

    pub fn with_icon_class(mut self, icon_class: impl Into<String>) -> Self {
        self.icon_class = Some(icon_class.into());
        self
    }

    pub fn with_auto_init(mut self, auto_init: bool) -> Self {
        self.auto_init = Some(auto_init);
        self
    }

    pub fn with_cache_enabled(mut self, cache_enabled: bool) -> Self {
        self.cache_enabled = Some(cache_enabled);
        self
    }

    pub fn with_target_tag(mut self, target_tag: impl Into<String>) -> Self {
        self.target_tag = Some(target_tag.into());
        self
    }

    /// Returns true if the patch sets no field.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Deserializes a patch from a JSON string. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// ExternalConfig
// ============================================================================

/// Schema of the configuration resource.
///
/// Only the `svgIcon` section is read; any other top-level key is ignored so
/// the same file can carry settings for other parts of the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_icon: Option<ConfigPatch>,
}

impl ExternalConfig {
    /// Deserializes the configuration resource body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
