//! Locator classification and joining.
//!
//! Scene documents reference other resources with plain strings. These
//! helpers decide whether a reference is absolute, extract the directory a
//! locator lives in, and join relative references onto a base path.
//!
//! Joining is literal: a relative path is concatenated onto the base rather
//! than normalised through a URL parser, so template placeholders such as
//! `{z}/{x}/{y}` survive untouched.
//!
//! # Example
//!
//! ```
//! use scenery_core::util::urls::{add_base_url, is_relative_url, path_for_url};
//!
//! assert!(is_relative_url("tiles/{z}/{x}/{y}.mvt"));
//! assert!(!is_relative_url("https://tiles.example.com/a.mvt"));
//!
//! let base = path_for_url("https://host/scenes/main.yaml?api_key=1");
//! assert_eq!(base, "https://host/scenes/");
//! assert_eq!(
//!     add_base_url("tiles/{z}/{x}/{y}.mvt", base),
//!     "https://host/scenes/tiles/{z}/{x}/{y}.mvt"
//! );
//! ```

use url::Url;

/// Prefix that marks a reference into the process-wide global namespace.
pub const GLOBAL_PREFIX: &str = "global.";

/// Schemes of locators that are already fully qualified, matched up to the `:`.
const ABSOLUTE_PREFIXES: &[&str] = &["http:", "https:", "file:", "data:", "blob:"];

/// Prefixes of locators that have no meaningful directory component.
const OPAQUE_PREFIXES: &[&str] = &["data:", "blob:"];

fn has_prefix_ignore_case(url: &str, prefix: &str) -> bool {
    url.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Returns `true` if `reference` names a value in the global namespace.
///
/// ```
/// use scenery_core::util::urls::is_global_reference;
///
/// assert!(is_global_reference("global.sources.osm"));
/// assert!(!is_global_reference("globals.yaml"));
/// ```
pub fn is_global_reference(reference: &str) -> bool {
    reference.starts_with(GLOBAL_PREFIX)
}

/// Returns `true` unless `url` starts with a fully-qualifying scheme
/// (`http:`, `https:`, `file:`, `data:`, `blob:`).
///
/// Root-relative (`/a.yaml`) and scheme-relative (`//host/a.yaml`)
/// references count as relative here; see [`is_scheme_relative_url`].
pub fn is_relative_url(url: &str) -> bool {
    !ABSOLUTE_PREFIXES
        .iter()
        .any(|prefix| has_prefix_ignore_case(url, prefix))
}

/// Returns `true` if `url` names a host but borrows its scheme (`//host/a`).
///
/// Such references only need a scheme from the base; they never describe a
/// path inside a document tree.
///
/// ```
/// use scenery_core::util::urls::is_scheme_relative_url;
///
/// assert!(is_scheme_relative_url("//cdn.example.com/a.yaml"));
/// assert!(!is_scheme_relative_url("/a.yaml"));
/// ```
pub fn is_scheme_relative_url(url: &str) -> bool {
    url.starts_with("//")
}

/// Strip any query string and fragment from `url`.
pub fn strip_query_and_fragment(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(end) => &url[..end],
        None => url,
    }
}

/// Directory part of `url`, up to and including the last `/`.
///
/// Query strings and fragments are ignored. Returns an empty string when
/// there is no `/`, and for `data:`/`blob:` locators.
///
/// ```
/// use scenery_core::util::urls::path_for_url;
///
/// assert_eq!(path_for_url("http://host/a/root.yaml"), "http://host/a/");
/// assert_eq!(path_for_url("folder/child.yaml#frag"), "folder/");
/// assert_eq!(path_for_url("root.yaml"), "");
/// ```
pub fn path_for_url(url: &str) -> &str {
    if OPAQUE_PREFIXES
        .iter()
        .any(|prefix| has_prefix_ignore_case(url, prefix))
    {
        return "";
    }
    let url = strip_query_and_fragment(url);
    match url.rfind('/') {
        Some(slash) => &url[..=slash],
        None => "",
    }
}

/// Trailing file extension of `url`, without the dot.
///
/// ```
/// use scenery_core::util::urls::extension_for_url;
///
/// assert_eq!(extension_for_url("http://host/bundle.zip?v=2"), Some("zip"));
/// assert_eq!(extension_for_url("styles/base.yaml"), Some("yaml"));
/// assert_eq!(extension_for_url("v1.2/README"), None);
/// ```
pub fn extension_for_url(url: &str) -> Option<&str> {
    if OPAQUE_PREFIXES
        .iter()
        .any(|prefix| has_prefix_ignore_case(url, prefix))
    {
        return None;
    }
    let url = strip_query_and_fragment(url);
    let file = url.rsplit('/').next().unwrap_or(url);
    let dot = file.rfind('.')?;
    let ext = &file[dot + 1..];
    (!ext.is_empty()).then_some(ext)
}

/// Scheme and authority of `base`, for prefixing root-relative references.
fn origin_for_url(base: &str) -> Option<String> {
    let parsed = Url::parse(base).ok()?;
    if parsed.cannot_be_a_base() {
        return None;
    }
    if parsed.scheme() == "file" {
        return Some("file://".to_string());
    }
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Join `url` onto `base`.
///
/// - Absolute and empty references are returned unchanged.
/// - Root-relative references (`/x`) take the origin of `base`.
/// - Scheme-relative references (`//host/x`) take the scheme of `base`.
/// - Anything else is concatenated onto `base` with its query and fragment
///   removed.
///
/// When `base` has no origin or scheme to lend, the reference is returned
/// as-is.
///
/// ```
/// use scenery_core::util::urls::add_base_url;
///
/// assert_eq!(add_base_url("b.yaml", "http://host/a/"), "http://host/a/b.yaml");
/// assert_eq!(add_base_url("/b.yaml", "http://host:8080/a/"), "http://host:8080/b.yaml");
/// assert_eq!(add_base_url("//cdn/b.yaml", "https://host/a/"), "https://cdn/b.yaml");
/// assert_eq!(add_base_url("http://other/b.yaml", "http://host/a/"), "http://other/b.yaml");
/// assert_eq!(add_base_url("b.yaml", "folder/"), "folder/b.yaml");
/// ```
pub fn add_base_url(url: &str, base: &str) -> String {
    if url.is_empty() || base.is_empty() || !is_relative_url(url) {
        return url.to_string();
    }

    if let Some(rest) = url.strip_prefix("//") {
        return match Url::parse(base) {
            Ok(parsed) => format!("{}://{rest}", parsed.scheme()),
            Err(_) => url.to_string(),
        };
    }

    if url.starts_with('/') {
        return match origin_for_url(base) {
            Some(origin) => format!("{origin}{url}"),
            None => url.to_string(),
        };
    }

    format!("{}{url}", strip_query_and_fragment(base))
}

/// Collapse `.` and `..` segments of a relative path.
///
/// Leading `..` segments that cannot be collapsed are kept, as is a leading
/// `/`.
///
/// ```
/// use scenery_core::util::urls::flatten_relative_url;
///
/// assert_eq!(flatten_relative_url("folder/../styles/./a.yaml"), "styles/a.yaml");
/// assert_eq!(flatten_relative_url("./a.yaml"), "a.yaml");
/// assert_eq!(flatten_relative_url("../a.yaml"), "../a.yaml");
/// ```
pub fn flatten_relative_url(url: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in url.split('/') {
        match segment {
            "." => {}
            ".." => match segments.last() {
                Some(&"..") | None => segments.push(".."),
                // never pop the empty segment that marks a leading `/`
                Some(&"") if segments.len() == 1 => {}
                Some(_) => {
                    segments.pop();
                }
            },
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}
