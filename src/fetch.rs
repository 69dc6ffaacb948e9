//! Resource fetching.
//!
//! The loader fetches two kinds of resources: the configuration file and the
//! icon files. Both go through a [`Fetcher`], which maps a relative path to a
//! status and a text body. A non-success status is a normal response, not an
//! error; errors are reserved for failing to get a response at all.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::FetchError;

/// A response status and its body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A `200` response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// A `404` response with an empty body.
    pub fn not_found() -> Self {
        Self::new(404, String::new())
    }

    /// Returns true for statuses in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of configuration and icon resources.
///
/// Futures returned by fetchers need not be `Send`; the loader runs on a
/// single cooperative thread.
#[async_trait(?Send)]
pub trait Fetcher {
    /// Fetches the resource at `path`.
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError>;
}

#[async_trait(?Send)]
impl<F: Fetcher + ?Sized> Fetcher for &F {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        (**self).fetch(path).await
    }
}

// ============================================================================
// HttpFetcher
// ============================================================================

/// Fetches resources over HTTP relative to a base URL.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Creates a fetcher resolving paths against `base_url`.
    ///
    /// A base without a trailing slash resolves paths against its parent,
    /// as a browser does for a page URL.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: url::Url::parse(base_url)?,
        })
    }

    /// Uses an existing client, sharing its connection pool.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            base_url: url::Url::parse(base_url)?,
        })
    }

    /// The URL a relative path resolves to.
    pub fn resolve(&self, path: &str) -> Result<url::Url, FetchError> {
        Ok(self.base_url.join(path)?)
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let url = self.resolve(path)?;
        log::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchResponse { status, body })
    }
}

// ============================================================================
// FsFetcher
// ============================================================================

/// Serves resources from a directory, mapping filesystem outcomes to HTTP
/// statuses: a missing file is `404`, a path leaving the root is `403`.
#[cfg(not(target_family = "wasm"))]
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

#[cfg(not(target_family = "wasm"))]
impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `path` onto the root, or `None` if it would escape the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();

        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        Some(resolved)
    }
}

#[cfg(not(target_family = "wasm"))]
#[async_trait(?Send)]
impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let Some(file) = self.resolve(path) else {
            return Ok(FetchResponse::new(403, String::new()));
        };
        log::debug!("reading {}", file.display());

        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// StaticFetcher
// ============================================================================

#[cfg(any(test, feature = "test-support"))]
pub use self::test_support::StaticFetcher;

#[cfg(any(test, feature = "test-support"))]
mod test_support {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use async_trait::async_trait;

    use super::{FetchResponse, Fetcher};
    use crate::error::FetchError;

    #[derive(Debug, Clone)]
    enum Entry {
        Response(FetchResponse),
        Failure(String),
    }

    /// An in-memory fetcher with a request log.
    ///
    /// Paths without a registered entry answer `404`. Every fetch yields to
    /// the executor once before answering, so concurrent requests interleave
    /// the way real network requests do.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        entries: RefCell<HashMap<String, Entry>>,
        requests: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serves `body` with status `200` at `path`.
        pub fn with_resource(self, path: &str, body: &str) -> Self {
            self.set_response(path, FetchResponse::ok(body));
            self
        }

        /// Serves an empty body with `status` at `path`.
        pub fn with_status(self, path: &str, status: u16) -> Self {
            self.set_response(path, FetchResponse::new(status, String::new()));
            self
        }

        /// Fails requests for `path` with a network error.
        pub fn with_failure(self, path: &str, message: &str) -> Self {
            self.entries
                .borrow_mut()
                .insert(path.to_string(), Entry::Failure(message.to_string()));
            self
        }

        /// Replaces the response served at `path`.
        pub fn set_response(&self, path: &str, response: FetchResponse) {
            self.entries
                .borrow_mut()
                .insert(path.to_string(), Entry::Response(response));
        }

        /// Every requested path, in request order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }

        /// How many times `path` has been requested.
        pub fn request_count(&self, path: &str) -> usize {
            self.requests.borrow().iter().filter(|p| *p == path).count()
        }
    }

    #[async_trait(?Send)]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
            self.requests.borrow_mut().push(path.to_string());
            YieldNow(false).await;

            let entry = self.entries.borrow().get(path).cloned();
            match entry {
                Some(Entry::Response(response)) => Ok(response),
                Some(Entry::Failure(message)) => Err(FetchError::Network(message)),
                None => Ok(FetchResponse::not_found()),
            }
        }
    }

    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(FetchResponse::ok("").is_success());
        assert!(FetchResponse::new(204, "").is_success());
        assert!(!FetchResponse::new(304, "").is_success());
        assert!(!FetchResponse::not_found().is_success());
    }

    #[tokio::test]
    async fn fs_fetcher_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("assets/icons")).unwrap();
        std::fs::write(dir.path().join("assets/icons/star.svg"), "<svg/>").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        let response = fetcher.fetch("assets/icons/star.svg").await.unwrap();
        assert_eq!(response, FetchResponse::ok("<svg/>"));

        let missing = fetcher.fetch("assets/icons/missing.svg").await.unwrap();
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn fs_fetcher_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path().join("public"));

        assert_eq!(fetcher.fetch("../secret.svg").await.unwrap().status, 403);
        assert_eq!(fetcher.fetch("/etc/hosts").await.unwrap().status, 403);
    }

    #[tokio::test]
    async fn static_fetcher_logs_requests() {
        let fetcher = StaticFetcher::new()
            .with_resource("a.svg", "<svg/>")
            .with_status("b.svg", 500)
            .with_failure("c.svg", "offline");

        assert!(fetcher.fetch("a.svg").await.unwrap().is_success());
        assert_eq!(fetcher.fetch("b.svg").await.unwrap().status, 500);
        assert!(matches!(
            fetcher.fetch("c.svg").await,
            Err(FetchError::Network(message)) if message == "offline"
        ));
        assert_eq!(fetcher.fetch("d.svg").await.unwrap().status, 404);

        assert_eq!(fetcher.requests(), ["a.svg", "b.svg", "c.svg", "d.svg"]);
        assert_eq!(fetcher.request_count("a.svg"), 1);
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_fetcher_resolves_relative_paths() {
        let fetcher = HttpFetcher::new("https://example.com/app/index.html").unwrap();
        assert_eq!(
            fetcher.resolve("assets/icons/star.svg").unwrap().as_str(),
            "https://example.com/app/assets/icons/star.svg"
        );
        assert!(HttpFetcher::new("not a url").is_err());
    }
}
