//! The icon loader.

use std::cell::{Cell, RefCell};

use futures::future::join_all;

use crate::cache::IconCache;
use crate::config::{CONFIG_RESOURCE, ConfigPatch, ExternalConfig, LoaderConfig, SVG_ROOT_CLASS};
use crate::document::{Document, Selector};
use crate::error::LoadError;
use crate::fetch::Fetcher;

// ============================================================================
// Outcomes and Targets
// ============================================================================

/// How a single marker ended up after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Markup came from the cache; no request was made.
    Cached,
    /// Markup was fetched and injected.
    Fetched,
    /// The icon could not be obtained; the marker shows the icon name as text.
    Fallback,
}

impl LoadOutcome {
    /// Returns true if markup was injected.
    pub fn is_injected(&self) -> bool {
        !matches!(self, Self::Fallback)
    }
}

/// Where [`IconLoader::load_icon_to`] should put an icon.
#[derive(Debug, Clone)]
pub enum Target<'a, E> {
    /// A selector string resolved to the first matching element.
    Selector(&'a str),
    /// An element handle used as is.
    Element(E),
}

// ============================================================================
// IconLoader
// ============================================================================

/// Finds icon markers in a document and fills them with SVG markup.
///
/// A marker is an element of the configured tag carrying a class that starts
/// with the configured prefix; the rest of that class is the icon name. The
/// loader fetches `icon_path + name + ".svg"`, keeps the markup in its cache,
/// and injects it into the marker. Failures never propagate: a marker whose
/// icon cannot be fetched shows the icon name as text instead.
///
/// All methods take `&self`. State sits behind `RefCell`s that are never
/// borrowed across an await point, so loads can run concurrently on one
/// thread. Concurrent misses for the same name are not merged; each issues
/// its own request and the first response to complete becomes the cached
/// markup.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use svg_icon_loader::{
///     ConfigPatch, Document, FetchError, FetchResponse, Fetcher, IconLoader, MemoryDocument,
/// };
///
/// struct Icons;
///
/// #[async_trait(?Send)]
/// impl Fetcher for Icons {
///     async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
///         Ok(match path {
///             "assets/icons/star.svg" => FetchResponse::ok("<svg></svg>"),
///             _ => FetchResponse::not_found(),
///         })
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let loader = IconLoader::new(MemoryDocument::new(), Icons, ConfigPatch::new());
/// let star = loader.document().append("i", &["icon-star"]);
/// let missing = loader.document().append("i", &["icon-missing"]);
///
/// loader.initialize().await;
///
/// let doc = loader.document();
/// assert_eq!(doc.class_list(&star), ["icon-star", "svg-icon"]);
/// assert_eq!(doc.inner_html(star), r#"<svg class="icon-svg"></svg>"#);
/// assert_eq!(doc.text_content(missing), "missing");
/// # });
/// ```
pub struct IconLoader<D: Document, F: Fetcher> {
    document: D,
    fetcher: F,
    config: RefCell<LoaderConfig>,
    cache: RefCell<IconCache>,
    config_loaded: Cell<bool>,
}

impl<D: Document, F: Fetcher> IconLoader<D, F> {
    /// Creates a loader with `options` merged over the default configuration.
    ///
    /// Nothing is fetched or scanned until [`initialize`](Self::initialize).
    pub fn new(document: D, fetcher: F, options: ConfigPatch) -> Self {
        Self {
            document,
            fetcher,
            config: RefCell::new(LoaderConfig::with_patch(&options)),
            cache: RefCell::new(IconCache::new()),
            config_loaded: Cell::new(false),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Loads external configuration, then scans the document if `auto_init`
    /// is set.
    ///
    /// Returns the outcome for every marker found, or nothing if the scan
    /// was skipped.
    pub async fn initialize(&self) -> Vec<LoadOutcome> {
        self.load_external_config().await;

        if self.config.borrow().auto_init {
            self.scan_and_load().await
        } else {
            log::debug!("auto init disabled, waiting for manual loads");
            Vec::new()
        }
    }

    /// Fetches `config.json` and merges its `svgIcon` section.
    ///
    /// Any failure leaves the configuration as it was. The attempt is recorded
    /// in [`config_loaded`](Self::config_loaded) either way.
    pub async fn load_external_config(&self) {
        match self.fetch_external_config().await {
            Ok(Some(patch)) => {
                self.config.borrow_mut().merge(&patch);
                log::info!("SVG icon configuration loaded: {:?}", self.config.borrow());
            }
            Ok(None) => {
                log::debug!("{CONFIG_RESOURCE} has no svgIcon section");
            }
            Err(LoadError::Status { status, .. }) => {
                log::warn!("config file not found (status {status}), using current configuration");
            }
            Err(err) => {
                log::warn!("failed to load configuration, using current configuration: {err}");
            }
        }

        self.config_loaded.set(true);
    }

    async fn fetch_external_config(&self) -> Result<Option<ConfigPatch>, LoadError> {
        let response = self.fetcher.fetch(CONFIG_RESOURCE).await?;
        if !response.is_success() {
            return Err(LoadError::Status {
                path: CONFIG_RESOURCE.to_string(),
                status: response.status,
            });
        }

        let external = ExternalConfig::from_json(&response.body)?;
        Ok(external.svg_icon)
    }

    /// Whether external configuration has been consulted.
    pub fn config_loaded(&self) -> bool {
        self.config_loaded.get()
    }

    /// Loads an icon into every marker currently in the document.
    ///
    /// Each marker is loaded by the first of its classes that starts with
    /// the prefix. Loads run concurrently and independently.
    pub async fn scan_and_load(&self) -> Vec<LoadOutcome> {
        let (tag, prefix) = {
            let config = self.config.borrow();
            (config.target_tag.clone(), config.icon_prefix.clone())
        };
        let selector = Selector::new().tag(tag).class_contains(prefix.as_str());

        let loads = self
            .document
            .query_selector_all(&selector)
            .into_iter()
            .filter_map(|element| {
                let name = self
                    .document
                    .class_list(&element)
                    .into_iter()
                    .find_map(|class| class.strip_prefix(prefix.as_str()).map(str::to_string))?;
                Some(async move { self.load_icon(&element, &name).await })
            });

        join_all(loads).await
    }

    /// Loads the icon `name` into `element`.
    pub async fn load_icon(&self, element: &D::Element, name: &str) -> LoadOutcome {
        let (cache_enabled, path) = {
            let config = self.config.borrow();
            (config.cache_enabled, config.icon_url(name))
        };

        if cache_enabled {
            let cached = self.cache.borrow().get(name).map(str::to_string);
            if let Some(markup) = cached {
                log::debug!("icon \"{name}\" served from cache");
                self.inject(element, &markup);
                return LoadOutcome::Cached;
            }
        }

        match self.fetch_icon(&path).await {
            Ok(markup) => {
                let markup = if cache_enabled {
                    self.cache.borrow_mut().insert(name, markup).to_string()
                } else {
                    markup
                };
                self.inject(element, &markup);
                LoadOutcome::Fetched
            }
            Err(err) => {
                log::error!("error loading SVG icon \"{name}\": {err}");
                self.document.set_text_content(element, name);
                LoadOutcome::Fallback
            }
        }
    }

    async fn fetch_icon(&self, path: &str) -> Result<String, LoadError> {
        log::debug!("fetching {path}");
        let response = self.fetcher.fetch(path).await?;
        if !response.is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }

    fn inject(&self, element: &D::Element, markup: &str) {
        let icon_class = self.config.borrow().icon_class.clone();

        self.document.set_inner_html(element, markup);
        self.document.add_class(element, &icon_class);
        self.document.add_nested_class(element, "svg", SVG_ROOT_CLASS);
    }

    /// Loads `name` into a single element given by selector or handle.
    ///
    /// Returns `None` without loading if a selector matches nothing. An
    /// element whose tag differs from the target tag is loaded anyway.
    pub async fn load_icon_to(&self, name: &str, target: Target<'_, D::Element>) -> Option<LoadOutcome> {
        let element = match target {
            Target::Element(element) => element,
            Target::Selector(css) => match self.document.query_selector_str(css) {
                Some(element) => element,
                None => {
                    log::error!("target element not found: {css}");
                    return None;
                }
            },
        };

        let target_tag = self.config.borrow().target_tag.clone();
        let tag = self.document.tag_name(&element);
        if !tag.eq_ignore_ascii_case(&target_tag) {
            log::warn!("target element is a <{tag}>, not a <{target_tag}> tag");
        }

        Some(self.load_icon(&element, name).await)
    }

    /// Loads each named icon into every marker carrying exactly
    /// `prefix + name` as a class.
    ///
    /// All loads run concurrently; the call completes once every marker has
    /// either its icon or its fallback. Outcomes are grouped by name in the
    /// order given.
    pub async fn load_icons<S: AsRef<str>>(&self, names: &[S]) -> Vec<LoadOutcome> {
        let (tag, prefix) = {
            let config = self.config.borrow();
            (config.target_tag.clone(), config.icon_prefix.clone())
        };

        let batches = names.iter().map(|name| {
            let name = name.as_ref();
            let selector = Selector::new()
                .tag(tag.as_str())
                .class(format!("{prefix}{name}"));
            let elements = self.document.query_selector_all(&selector);

            async move {
                join_all(elements.iter().map(|element| self.load_icon(element, name))).await
            }
        });

        join_all(batches).await.into_iter().flatten().collect()
    }

    /// Scans again, picking up markers added since the last scan.
    pub async fn rescan(&self) -> Vec<LoadOutcome> {
        log::info!("rescanning for <{}> icon markers", self.config.borrow().target_tag);
        self.scan_and_load().await
    }

    /// Merges `patch` over the current configuration.
    pub fn update_config(&self, patch: &ConfigPatch) {
        self.config.borrow_mut().merge(patch);
        log::info!("SVG icon configuration updated: {:?}", self.config.borrow());
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> LoaderConfig {
        self.config.borrow().clone()
    }

    /// Names of cached icons, in the order they were first loaded.
    pub fn loaded_icons(&self) -> Vec<String> {
        self.cache.borrow().names().to_vec()
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.borrow().contains(name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementId, MemoryDocument};
    use crate::fetch::{FetchResponse, StaticFetcher};

    const STAR: &str = r#"<svg viewBox="0 0 24 24"><path d="M12 2l3 7h7l-6 5 2 7-6-4-6 4 2-7-6-5h7z"/></svg>"#;

    fn loader(fetcher: StaticFetcher) -> IconLoader<MemoryDocument, StaticFetcher> {
        IconLoader::new(MemoryDocument::new(), fetcher, ConfigPatch::new())
    }

    #[tokio::test]
    async fn injects_fetched_icon() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));
        let star = loader.document().append("i", &["icon-star"]);

        let outcomes = loader.scan_and_load().await;
        assert_eq!(outcomes, [LoadOutcome::Fetched]);

        let doc = loader.document();
        assert!(doc.inner_html(star).contains("<path d="));
        assert_eq!(doc.class_list(&star), ["icon-star", "svg-icon"]);
        assert_eq!(doc.nested_class_list(star, "svg").unwrap(), ["icon-svg"]);
        assert_eq!(loader.loaded_icons(), ["star"]);
    }

    #[tokio::test]
    async fn missing_icon_falls_back_to_name() {
        let loader = loader(StaticFetcher::new());
        let missing = loader.document().append("i", &["icon-missing"]);

        assert_eq!(loader.scan_and_load().await, [LoadOutcome::Fallback]);

        let doc = loader.document();
        assert_eq!(doc.text_content(missing), "missing");
        assert_eq!(doc.class_list(&missing), ["icon-missing"]);
        assert!(loader.loaded_icons().is_empty());
    }

    #[tokio::test]
    async fn network_failure_falls_back_to_name() {
        let fetcher = StaticFetcher::new().with_failure("assets/icons/wifi.svg", "offline");
        let loader = loader(fetcher);
        let wifi = loader.document().append("i", &["icon-wifi"]);

        assert_eq!(loader.load_icon(&wifi, "wifi").await, LoadOutcome::Fallback);
        assert_eq!(loader.document().text_content(wifi), "wifi");
    }

    #[tokio::test]
    async fn failures_do_not_block_other_markers() {
        let fetcher = StaticFetcher::new()
            .with_resource("assets/icons/star.svg", STAR)
            .with_status("assets/icons/broken.svg", 500);
        let loader = loader(fetcher);
        let doc = loader.document();
        let broken = doc.append("i", &["icon-broken"]);
        let star = doc.append("i", &["icon-star"]);

        let outcomes = loader.scan_and_load().await;
        assert_eq!(outcomes, [LoadOutcome::Fallback, LoadOutcome::Fetched]);
        assert_eq!(outcomes.iter().filter(|o| o.is_injected()).count(), 1);
        assert_eq!(doc.text_content(broken), "broken");
        assert!(doc.class_list(&star).contains(&"svg-icon".to_string()));
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));
        let doc = loader.document();
        let first = doc.append("i", &["icon-star"]);
        let second = doc.append("i", &["icon-star"]);

        assert_eq!(loader.load_icon(&first, "star").await, LoadOutcome::Fetched);
        assert_eq!(loader.load_icon(&first, "star").await, LoadOutcome::Cached);
        assert_eq!(loader.load_icon(&second, "star").await, LoadOutcome::Cached);

        assert_eq!(loader.fetcher().request_count("assets/icons/star.svg"), 1);
        assert_eq!(doc.inner_html(first), doc.inner_html(second));
    }

    #[tokio::test]
    async fn disabled_cache_fetches_every_time() {
        let fetcher = StaticFetcher::new().with_resource("assets/icons/star.svg", STAR);
        let loader = IconLoader::new(
            MemoryDocument::new(),
            fetcher,
            ConfigPatch::new().with_cache_enabled(false),
        );
        let star = loader.document().append("i", &["icon-star"]);

        assert_eq!(loader.load_icon(&star, "star").await, LoadOutcome::Fetched);
        assert_eq!(loader.load_icon(&star, "star").await, LoadOutcome::Fetched);

        assert_eq!(loader.fetcher().request_count("assets/icons/star.svg"), 2);
        assert!(loader.loaded_icons().is_empty());
        assert_eq!(loader.document().nested_class_list(star, "svg").unwrap(), ["icon-svg"]);
    }

    #[tokio::test]
    async fn failed_loads_are_retried() {
        let loader = loader(StaticFetcher::new());
        let star = loader.document().append("i", &["icon-star"]);

        assert_eq!(loader.load_icon(&star, "star").await, LoadOutcome::Fallback);

        loader
            .fetcher()
            .set_response("assets/icons/star.svg", FetchResponse::ok(STAR));
        assert_eq!(loader.load_icon(&star, "star").await, LoadOutcome::Fetched);
        assert_eq!(loader.fetcher().request_count("assets/icons/star.svg"), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_each_fetch() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));
        let doc = loader.document();
        let a = doc.append("i", &["icon-star"]);
        let b = doc.append("i", &["icon-star"]);

        let outcomes = loader.load_icons(&["star"]).await;
        assert_eq!(outcomes, [LoadOutcome::Fetched, LoadOutcome::Fetched]);
        assert_eq!(loader.fetcher().request_count("assets/icons/star.svg"), 2);
        assert_eq!(loader.loaded_icons(), ["star"]);
        assert_eq!(doc.inner_html(a), doc.inner_html(b));
    }

    #[tokio::test]
    async fn load_icons_waits_for_every_marker() {
        let fetcher = StaticFetcher::new()
            .with_resource("assets/icons/a.svg", "<svg>a</svg>")
            .with_status("assets/icons/b.svg", 404);
        let loader = loader(fetcher);
        let doc = loader.document();
        let a1 = doc.append("i", &["icon-a"]);
        let b = doc.append("i", &["icon-b"]);
        let a2 = doc.append("i", &["big", "icon-a"]);
        let ignored = doc.append("span", &["icon-a"]);

        let outcomes = loader.load_icons(&["a", "b"]).await;
        assert_eq!(
            outcomes,
            [LoadOutcome::Fetched, LoadOutcome::Fetched, LoadOutcome::Fallback]
        );

        assert!(doc.class_list(&a1).contains(&"svg-icon".to_string()));
        assert!(doc.class_list(&a2).contains(&"svg-icon".to_string()));
        assert_eq!(doc.text_content(b), "b");
        assert_eq!(doc.inner_html(ignored), "");
    }

    #[tokio::test]
    async fn load_icons_matches_exact_class_only() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));
        let doc = loader.document();
        let outline = doc.append("i", &["icon-star-outline"]);

        assert!(loader.load_icons(&["star"]).await.is_empty());
        assert_eq!(doc.inner_html(outline), "");
        assert!(loader.fetcher().requests().is_empty());
    }

    #[tokio::test]
    async fn scan_uses_first_prefixed_class() {
        let fetcher = StaticFetcher::new()
            .with_resource("assets/icons/home.svg", "<svg>home</svg>");
        let loader = loader(fetcher);
        let el = loader
            .document()
            .append("i", &["nav", "icon-home", "icon-other"]);
        loader.document().append("i", &["plain"]);

        assert_eq!(loader.scan_and_load().await, [LoadOutcome::Fetched]);
        assert_eq!(loader.fetcher().requests(), ["assets/icons/home.svg"]);
        assert!(loader.document().inner_html(el).contains("home"));
    }

    #[tokio::test]
    async fn load_icon_to_selector_and_element() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));
        let doc = loader.document();
        let by_id = doc.append_with_id("i", "hero", &[]);
        let direct = doc.append("i", &[]);

        let outcome = loader.load_icon_to("star", Target::Selector("#hero")).await;
        assert_eq!(outcome, Some(LoadOutcome::Fetched));
        assert!(doc.class_list(&by_id).contains(&"svg-icon".to_string()));

        let outcome = loader.load_icon_to("star", Target::Element(direct)).await;
        assert_eq!(outcome, Some(LoadOutcome::Cached));
    }

    #[tokio::test]
    async fn load_icon_to_missing_target_is_a_no_op() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));

        assert_eq!(loader.load_icon_to("star", Target::Selector("#nowhere")).await, None);
        assert_eq!(loader.load_icon_to("star", Target::Selector("div >")).await, None);
        assert!(loader.fetcher().requests().is_empty());
    }

    #[tokio::test]
    async fn load_icon_to_other_tag_still_loads() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/star.svg", STAR));
        let span = loader.document().append("span", &["slot"]);

        let outcome = loader.load_icon_to("star", Target::Selector("span.slot")).await;
        assert_eq!(outcome, Some(LoadOutcome::Fetched));
        assert_eq!(loader.document().class_list(&span), ["slot", "svg-icon"]);
    }

    /// A document with its own selector engine: known strings resolve
    /// verbatim, everything else delegates to the in-memory arena.
    struct NativeSelectors {
        inner: MemoryDocument,
        known: Vec<(&'static str, ElementId)>,
        queries: std::cell::RefCell<Vec<String>>,
    }

    impl Document for NativeSelectors {
        type Element = ElementId;

        fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
            self.inner.query_selector_all(selector)
        }

        fn query_selector_str(&self, css: &str) -> Option<ElementId> {
            self.queries.borrow_mut().push(css.to_string());
            self.known.iter().find(|(known, _)| *known == css).map(|(_, id)| *id)
        }

        fn tag_name(&self, element: &ElementId) -> String {
            self.inner.tag_name(element)
        }

        fn class_list(&self, element: &ElementId) -> Vec<String> {
            self.inner.class_list(element)
        }

        fn add_class(&self, element: &ElementId, class: &str) {
            self.inner.add_class(element, class)
        }

        fn set_inner_html(&self, element: &ElementId, html: &str) {
            self.inner.set_inner_html(element, html)
        }

        fn set_text_content(&self, element: &ElementId, text: &str) {
            self.inner.set_text_content(element, text)
        }

        fn add_nested_class(&self, element: &ElementId, nested_tag: &str, class: &str) -> bool {
            self.inner.add_nested_class(element, nested_tag, class)
        }
    }

    #[tokio::test]
    async fn load_icon_to_passes_selector_text_through() {
        let inner = MemoryDocument::new();
        let first = inner.append("i", &[]);
        let slotted = inner.append("i", &[]);
        let doc = NativeSelectors {
            inner,
            known: vec![("nav > i:first-child", first), ("i[data-slot], span", slotted)],
            queries: Default::default(),
        };
        let loader = IconLoader::new(
            &doc,
            StaticFetcher::new().with_resource("assets/icons/star.svg", STAR),
            ConfigPatch::new(),
        );

        let outcome = loader.load_icon_to("star", Target::Selector("nav > i:first-child")).await;
        assert_eq!(outcome, Some(LoadOutcome::Fetched));
        let outcome = loader.load_icon_to("star", Target::Selector("i[data-slot], span")).await;
        assert_eq!(outcome, Some(LoadOutcome::Cached));

        assert_eq!(*doc.queries.borrow(), ["nav > i:first-child", "i[data-slot], span"]);
        assert!(doc.inner.inner_html(first).contains("<path d="));
        assert!(doc.inner.inner_html(slotted).contains("<path d="));
    }

    #[tokio::test]
    async fn initialize_merges_external_config() {
        let fetcher = StaticFetcher::new()
            .with_resource(
                "config.json",
                r#"{ "title": "demo", "svgIcon": { "iconPath": "static/", "iconClass": "glyph" } }"#,
            )
            .with_resource("static/star.svg", STAR);
        let loader = loader(fetcher);
        let star = loader.document().append("i", &["icon-star"]);

        assert!(!loader.config_loaded());
        assert_eq!(loader.initialize().await, [LoadOutcome::Fetched]);
        assert!(loader.config_loaded());

        let config = loader.config();
        assert_eq!(config.icon_path, "static/");
        assert_eq!(config.icon_class, "glyph");
        assert_eq!(config.icon_prefix, "icon-");
        assert_eq!(loader.document().class_list(&star), ["icon-star", "glyph"]);
    }

    #[tokio::test]
    async fn initialize_without_auto_init_stays_idle() {
        let fetcher = StaticFetcher::new()
            .with_resource("config.json", r#"{ "svgIcon": { "autoInit": false } }"#)
            .with_resource("assets/icons/star.svg", STAR);
        let loader = loader(fetcher);
        let star = loader.document().append("i", &["icon-star"]);

        assert!(loader.initialize().await.is_empty());
        assert_eq!(loader.fetcher().requests(), ["config.json"]);
        assert_eq!(loader.document().inner_html(star), "");
    }

    #[tokio::test]
    async fn bad_config_keeps_current_values() {
        for fetcher in [
            StaticFetcher::new(),
            StaticFetcher::new().with_resource("config.json", "{ not json"),
            StaticFetcher::new().with_resource("config.json", r#"{ "svgIcon": { "autoInit": 1 } }"#),
            StaticFetcher::new().with_failure("config.json", "offline"),
        ] {
            let loader = IconLoader::new(
                MemoryDocument::new(),
                fetcher,
                ConfigPatch::new().with_icon_path("custom/"),
            );
            loader.load_external_config().await;

            assert!(loader.config_loaded());
            assert_eq!(
                loader.config(),
                LoaderConfig {
                    icon_path: "custom/".into(),
                    ..LoaderConfig::default()
                }
            );
        }
    }

    #[tokio::test]
    async fn rescan_picks_up_new_markers() {
        let fetcher = StaticFetcher::new()
            .with_resource("assets/icons/star.svg", STAR)
            .with_resource("assets/icons/moon.svg", "<svg>moon</svg>");
        let loader = loader(fetcher);
        loader.document().append("i", &["icon-star"]);
        assert_eq!(loader.scan_and_load().await, [LoadOutcome::Fetched]);

        let moon = loader.document().append("i", &["icon-moon"]);
        let outcomes = loader.rescan().await;

        assert_eq!(outcomes, [LoadOutcome::Cached, LoadOutcome::Fetched]);
        assert!(loader.document().inner_html(moon).contains("moon"));
        assert_eq!(loader.loaded_icons(), ["star", "moon"]);
    }

    #[tokio::test]
    async fn custom_prefix_and_tag() {
        let fetcher = StaticFetcher::new().with_resource("icons/bell.svg", "<svg/>");
        let loader = IconLoader::new(
            MemoryDocument::new(),
            fetcher,
            ConfigPatch::new()
                .with_icon_path("icons/")
                .with_icon_prefix("ico_")
                .with_target_tag("span"),
        );
        let bell = loader.document().append("span", &["ico_bell"]);
        loader.document().append("i", &["ico_bell"]);

        assert_eq!(loader.scan_and_load().await, [LoadOutcome::Fetched]);
        assert_eq!(loader.document().inner_html(bell), r#"<svg class="icon-svg"/>"#);
    }

    #[tokio::test]
    async fn markup_without_svg_root_is_still_injected() {
        let loader = loader(StaticFetcher::new().with_resource("assets/icons/dot.svg", "<b>•</b>"));
        let dot = loader.document().append("i", &["icon-dot"]);

        assert_eq!(loader.scan_and_load().await, [LoadOutcome::Fetched]);
        assert_eq!(loader.document().inner_html(dot), "<b>•</b>");
        assert!(loader.document().class_list(&dot).contains(&"svg-icon".to_string()));
    }

    #[test]
    fn update_config_and_defensive_copy() {
        let loader = loader(StaticFetcher::new());
        let before = loader.config();

        loader.update_config(&ConfigPatch::new().with_icon_class("foo"));
        let mut after = loader.config();
        assert_eq!(after.icon_class, "foo");
        assert_eq!(
            after,
            LoaderConfig {
                icon_class: "foo".into(),
                ..before
            }
        );

        after.icon_class = "mutated".into();
        assert_eq!(loader.config().icon_class, "foo");
    }

    #[tokio::test]
    async fn borrowed_document_and_fetcher() {
        let doc = MemoryDocument::new();
        let fetcher = StaticFetcher::new().with_resource("assets/icons/star.svg", STAR);
        let star = doc.append("i", &["icon-star"]);

        {
            let loader = IconLoader::new(&doc, &fetcher, ConfigPatch::new());
            loader.scan_and_load().await;
        }

        assert_eq!(fetcher.request_count("assets/icons/star.svg"), 1);
        assert!(doc.class_list(&star).contains(&"svg-icon".to_string()));
    }
}
