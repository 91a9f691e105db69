//! Scene bundles: resolution scopes for scene documents.
//!
//! A [`Bundle`] represents one scene document: where it is fetched from, the
//! base path its relative references are joined against, and the bundle
//! that caused it to be loaded. Bundles form a parent chain rooted at the
//! top-level scene.
//!
//! When some ancestor is an archive (a [`BundleKind::Archive`] bundle), a
//! relative reference inside a descendant cannot be joined locally: the
//! document's nominal path only means something inside the archive. The
//! reference is instead grown by each bundle's `path_for_parent` while
//! walking up the chain, until a bundle with no enclosing container performs
//! the final join. Archives do that join by looking the reconstructed path
//! up in their [`ArchiveIndex`].
//!
//! # Example
//!
//! ```rust
//! use scenery_bundle::{Bundle, Locator};
//!
//! let root = Bundle::new(Locator::from("http://host/a/root.yaml"), None, None);
//! assert_eq!(root.base_path(), "http://host/a/");
//! assert_eq!(root.url_for("b.yaml").unwrap(), "http://host/a/b.yaml");
//! assert_eq!(root.url_for("global.sources.osm").unwrap(), "global.sources.osm");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use scenery_core::util::urls::{
    add_base_url, extension_for_url, flatten_relative_url, is_global_reference, is_relative_url,
    is_scheme_relative_url, path_for_url,
};
use scenery_core::{Error, Result};

use crate::document::{Document, parse_document};
use crate::fetch::Fetcher;

/// Maximum number of parent hops a single resolution may take.
///
/// Parent chains are built from `Arc`s and cannot loop, so this is a limit
/// on legitimate nesting: a relative reference in a bundle more than this
/// many levels below its outermost container fails with
/// [`Error::AncestorDepthExceeded`].
pub const MAX_ANCESTOR_DEPTH: usize = 64;

// ============================================================================
// Locator
// ============================================================================

/// Where a bundle's document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// Fetched from a URL or path.
    Url(String),
    /// Supplied in memory by the caller.
    Inline(Document),
}

impl Locator {
    /// The URL, if this locator is fetched.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Locator::Url(url) => Some(url),
            Locator::Inline(_) => None,
        }
    }

    /// Whether this is a relative URL. Inline documents count as relative
    /// since they have no location of their own.
    fn is_relative(&self) -> bool {
        match self {
            Locator::Url(url) => is_relative_url(url),
            Locator::Inline(_) => true,
        }
    }
}

impl From<&str> for Locator {
    fn from(url: &str) -> Self {
        Locator::Url(url.to_string())
    }
}

impl From<String> for Locator {
    fn from(url: String) -> Self {
        Locator::Url(url)
    }
}

impl From<Document> for Locator {
    fn from(document: Document) -> Self {
        Locator::Inline(document)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Url(url) => f.write_str(url),
            Locator::Inline(_) => f.write_str("<inline>"),
        }
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Kind of resource a reference points at, from its file extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A scene document (`yaml`, `yml`, `json`).
    Scene,
    /// A scene archive (`zip`).
    Archive,
    /// Any other extension, as written.
    Other(String),
    /// No extension.
    Unknown,
}

impl ResourceType {
    /// Classify a reference by its trailing extension.
    ///
    /// ```rust
    /// use scenery_bundle::ResourceType;
    ///
    /// assert_eq!(ResourceType::for_url("styles/roads.yaml"), ResourceType::Scene);
    /// assert_eq!(ResourceType::for_url("http://host/pack.ZIP"), ResourceType::Archive);
    /// assert_eq!(ResourceType::for_url("img/icons.png"), ResourceType::Other("png".into()));
    /// assert_eq!(ResourceType::for_url("tiles/latest"), ResourceType::Unknown);
    /// ```
    pub fn for_url(url: &str) -> Self {
        match extension_for_url(url) {
            None => ResourceType::Unknown,
            Some(ext) if ext.eq_ignore_ascii_case("zip") => ResourceType::Archive,
            Some(ext)
                if ["yaml", "yml", "json"]
                    .iter()
                    .any(|scene| ext.eq_ignore_ascii_case(scene)) =>
            {
                ResourceType::Scene
            }
            Some(ext) => ResourceType::Other(ext.to_string()),
        }
    }

    /// Whether the resource should be opened as an archive bundle.
    pub fn is_archive(&self) -> bool {
        matches!(self, ResourceType::Archive)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Scene => write!(f, "scene"),
            ResourceType::Archive => write!(f, "archive"),
            ResourceType::Other(ext) => write!(f, "{ext}"),
            ResourceType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A reference resolved against a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Fully qualified locator for fetching the resource.
    pub url: String,
    /// Directory of the reference as written, for chaining further bundles.
    pub path: String,
    /// Resource type from the reference's extension.
    pub kind: ResourceType,
}

// ============================================================================
// Archives
// ============================================================================

/// Lookup of archive members, supplied by whatever unpacked the archive.
///
/// Paths are relative to the archive root and have `.`/`..` segments
/// collapsed. The returned locator is what should be fetched for that
/// member (an extracted file, an in-memory blob, ...).
pub trait ArchiveIndex: Send + Sync {
    /// Locator for the member at `path`, if the archive contains it.
    fn entry_locator(&self, path: &str) -> Option<String>;
}

impl ArchiveIndex for HashMap<String, String> {
    fn entry_locator(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

impl ArchiveIndex for BTreeMap<String, String> {
    fn entry_locator(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

/// Whether a bundle is a plain scene or an archive other bundles live in.
#[derive(Clone)]
pub enum BundleKind {
    /// A plain scene document.
    Scene,
    /// An archive; descendants resolve relative references through it.
    Archive(Arc<dyn ArchiveIndex>),
}

impl fmt::Debug for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleKind::Scene => f.write_str("Scene"),
            BundleKind::Archive(_) => f.write_str("Archive"),
        }
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Resolution scope for one scene document.
///
/// Bundles are immutable and shared through `Arc`; a child holds its parent
/// alive but never modifies it.
#[derive(Debug)]
pub struct Bundle {
    locator: Locator,
    base_path: String,
    path_for_parent: String,
    parent: Option<Arc<Bundle>>,
    container: Option<Arc<Bundle>>,
    kind: BundleKind,
    depth: usize,
}

impl Bundle {
    /// Create a plain scene bundle.
    ///
    /// `base_path` overrides the path relative references are joined against,
    /// but only when it is absolute or the locator itself is relative;
    /// otherwise the base is derived from the locator. An empty `base_path`
    /// is the same as none.
    pub fn new(locator: Locator, base_path: Option<&str>, parent: Option<Arc<Bundle>>) -> Arc<Self> {
        Self::with_kind(locator, base_path, parent, BundleKind::Scene)
    }

    /// Create an archive bundle whose members are found through `index`.
    pub fn archive(
        locator: Locator,
        base_path: Option<&str>,
        parent: Option<Arc<Bundle>>,
        index: Arc<dyn ArchiveIndex>,
    ) -> Arc<Self> {
        Self::with_kind(locator, base_path, parent, BundleKind::Archive(index))
    }

    /// Create a scene bundle for a resource resolved by `parent`.
    ///
    /// Archive resources need an [`ArchiveIndex`] from whatever unpacks them
    /// and go through [`Bundle::archive`] instead.
    pub fn dependency(parent: &Arc<Bundle>, resource: &Resource) -> Arc<Self> {
        Self::new(
            Locator::Url(resource.url.clone()),
            Some(&resource.path),
            Some(Arc::clone(parent)),
        )
    }

    /// Create a bundle of the given kind.
    pub fn with_kind(
        locator: Locator,
        base_path: Option<&str>,
        parent: Option<Arc<Bundle>>,
        kind: BundleKind,
    ) -> Arc<Self> {
        let supplied = base_path.filter(|path| !path.is_empty());

        let resolved_base = match supplied {
            Some(path) if !is_relative_url(path) || locator.is_relative() => path.to_string(),
            _ => locator
                .as_url()
                .map(path_for_url)
                .unwrap_or_default()
                .to_string(),
        };
        let path_for_parent = supplied.map_or_else(|| resolved_base.clone(), str::to_string);

        let container = parent.as_ref().and_then(|parent| {
            parent
                .container
                .clone()
                .or_else(|| parent.is_container().then(|| Arc::clone(parent)))
        });
        let depth = parent.as_ref().map_or(0, |parent| parent.depth + 1);

        log::debug!(
            "New {kind:?} bundle {locator} (base '{resolved_base}', depth {depth}, container: {})",
            container
                .as_ref()
                .map_or_else(|| "none".to_string(), |c| c.locator.to_string())
        );

        Arc::new(Self {
            locator,
            base_path: resolved_base,
            path_for_parent,
            parent,
            container,
            kind,
            depth,
        })
    }

    /// Where this bundle's document comes from.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Base path for this document's relative references.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Prefix an ancestor uses when resolving this bundle's references.
    pub fn path_for_parent(&self) -> &str {
        &self.path_for_parent
    }

    /// The bundle that caused this one to be loaded.
    pub fn parent(&self) -> Option<&Arc<Bundle>> {
        self.parent.as_ref()
    }

    /// Nearest ancestor that is an archive.
    pub fn container(&self) -> Option<&Arc<Bundle>> {
        self.container.as_ref()
    }

    /// Plain scene or archive.
    pub fn kind(&self) -> &BundleKind {
        &self.kind
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether other bundles may be loaded from inside this one.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, BundleKind::Archive(_))
    }

    /// Resolve a reference found in this bundle's document.
    pub fn resolve(&self, reference: &str) -> Result<Resource> {
        Ok(Resource {
            url: self.url_for(reference)?,
            path: self.path_for(reference).to_string(),
            kind: self.type_for(reference),
        })
    }

    /// Fully qualified locator for `reference`.
    ///
    /// Global references are returned unchanged. A relative reference in a
    /// bundle that lives inside an archive is prefixed with
    /// `path_for_parent` and handed to the parent, repeatedly, until a bundle
    /// with no container joins it. Scheme-relative references (`//host/x`)
    /// are never handed up; they take the scheme of this bundle's base.
    ///
    /// Fails only if the walk exceeds [`MAX_ANCESTOR_DEPTH`] hops.
    pub fn url_for(&self, reference: &str) -> Result<String> {
        if is_global_reference(reference) {
            return Ok(reference.to_string());
        }

        let mut bundle = self;
        let mut reference = reference.to_string();
        let mut hops = 0;

        while bundle.container.is_some()
            && is_relative_url(&reference)
            && !is_scheme_relative_url(&reference)
        {
            let Some(parent) = bundle.parent.as_deref() else {
                break;
            };
            hops += 1;
            if hops > MAX_ANCESTOR_DEPTH {
                return Err(Error::AncestorDepthExceeded {
                    limit: MAX_ANCESTOR_DEPTH,
                });
            }
            reference.insert_str(0, &bundle.path_for_parent);
            log::trace!("Delegating '{reference}' from {} to {}", bundle.locator, parent.locator);
            bundle = parent;
        }

        Ok(bundle.join(&reference))
    }

    /// Directory of `reference` as written, independent of this bundle.
    pub fn path_for<'a>(&self, reference: &'a str) -> &'a str {
        path_for_url(reference)
    }

    /// Resource type of `reference` from its extension.
    pub fn type_for(&self, reference: &str) -> ResourceType {
        ResourceType::for_url(reference)
    }

    /// Terminal join performed by the bundle with no enclosing container.
    fn join(&self, reference: &str) -> String {
        if let BundleKind::Archive(index) = &self.kind {
            if is_relative_url(reference) && !is_scheme_relative_url(reference) {
                let member = flatten_relative_url(reference);
                if let Some(locator) = index.entry_locator(&member) {
                    log::trace!("Archive {} maps '{member}' to {locator}", self.locator);
                    return locator;
                }
            }
        }
        add_base_url(reference, &self.base_path)
    }

    /// Fetch and parse this bundle's document.
    ///
    /// Inline documents are not fetched. Each call returns a deep copy of
    /// the inline document, nested values included, so one caller's edits
    /// never show up in another load or in the source.
    ///
    /// Fetch failures come back as [`Error::Transport`] and malformed text as
    /// [`Error::Parse`].
    pub async fn load(&self, fetcher: &dyn Fetcher) -> Result<Document> {
        match &self.locator {
            Locator::Inline(document) => Ok(document.clone()),
            Locator::Url(url) => {
                log::debug!("Loading scene document {url}");
                let response = fetcher.fetch(url).await?;
                parse_document(&response.body).map_err(|e| Error::parse(url.clone(), e))
            }
        }
    }
}
