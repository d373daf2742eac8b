//! # Route Prefix Matching
//!
//! Both the public-route bypass and the role policy ask the same question:
//! does a request path fall under a prefix? Matching is segment-aware, so
//! `/cases` covers `/cases` and `/cases/42` but not `/cases-archive`. The
//! root prefix `/` covers only the root path; otherwise it would swallow
//! every route.
//!
//! Paths are matched only after [`normalize_path`] has resolved dot
//! segments, so `/cases/../admin` is judged as `/admin`.

/// Check whether `path` falls under `prefix` at a segment boundary.
///
/// A trailing slash on a non-root prefix is ignored (`/cases/` behaves
/// like `/cases`).
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Resolve `.` and `..` segments and collapse repeated slashes.
///
/// Dot segments are recognised in percent-encoded form as well (`%2e`,
/// `%2E%2e`, `.%2e`). A `..` at the root is dropped. The result always
/// starts with `/` and never ends with one unless it is the root.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match dot_segment(segment) {
            Some(DotSegment::Current) => {}
            Some(DotSegment::Parent) => {
                segments.pop();
            }
            None if segment.is_empty() => {}
            None => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

enum DotSegment {
    Current,
    Parent,
}

fn dot_segment(segment: &str) -> Option<DotSegment> {
    let mut dots = 0;
    let mut rest = segment;
    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix('.') {
            rest = r;
        } else if rest.get(..3).is_some_and(|h| h.eq_ignore_ascii_case("%2e")) {
            rest = &rest[3..];
        } else {
            return None;
        }
        dots += 1;
    }
    match dots {
        1 => Some(DotSegment::Current),
        2 => Some(DotSegment::Parent),
        _ => None,
    }
}

/// Routes that are reachable without an identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRoutes {
    prefixes: Vec<String>,
}

impl PublicRoutes {
    /// Root landing page.
    pub const ROOT: &'static str = "/";
    /// Sign-in area.
    pub const SIGN_IN: &'static str = "/auth";
    /// Programmatic API area.
    pub const API: &'static str = "/api";

    /// The portal's public set: root, sign-in area, and API area.
    pub fn standard() -> Self {
        Self::new([Self::ROOT, Self::SIGN_IN, Self::API])
    }

    /// Build a custom public set.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `path` is public.
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path_has_prefix(path, p))
    }

    /// The configured prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for PublicRoutes {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(path_has_prefix("/cases", "/cases"));
    }

    #[test]
    fn nested_match() {
        assert!(path_has_prefix("/screening/alerts", "/screening"));
        assert!(path_has_prefix("/cases/", "/cases"));
    }

    #[test]
    fn partial_segment_does_not_match() {
        assert!(!path_has_prefix("/cases-archive", "/cases"));
        assert!(!path_has_prefix("/authority", "/auth"));
    }

    #[test]
    fn trailing_slash_on_prefix_is_ignored() {
        assert!(path_has_prefix("/cases/9", "/cases/"));
        assert!(path_has_prefix("/cases", "/cases/"));
    }

    #[test]
    fn root_prefix_covers_only_root() {
        assert!(path_has_prefix("/", "/"));
        assert!(!path_has_prefix("/dashboard/analyst", "/"));
    }

    #[test]
    fn normalize_resolves_parent_segments() {
        assert_eq!(normalize_path("/cases/../admin/tenants"), "/admin/tenants");
        assert_eq!(normalize_path("/cases/./42"), "/cases/42");
        assert_eq!(normalize_path("/../../admin"), "/admin");
        assert_eq!(normalize_path("/auth/.."), "/");
    }

    #[test]
    fn normalize_resolves_encoded_dot_segments() {
        assert_eq!(normalize_path("/cases/%2e%2e/admin/tenants"), "/admin/tenants");
        assert_eq!(normalize_path("/cases/%2E%2e/admin"), "/admin");
        assert_eq!(normalize_path("/cases/.%2e/admin"), "/admin");
        assert_eq!(normalize_path("/cases/%2e./admin"), "/admin");
        assert_eq!(normalize_path("/cases/%2e/42"), "/cases/42");
    }

    #[test]
    fn normalize_keeps_ordinary_segments() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//cases///42/"), "/cases/42");
        assert_eq!(normalize_path("/cases/.../x"), "/cases/.../x");
        assert_eq!(normalize_path("/cases/..hidden"), "/cases/..hidden");
        assert_eq!(normalize_path("/cases/%2e%2f"), "/cases/%2e%2f");
        assert_eq!(normalize_path("/cases/%2é"), "/cases/%2é");
    }

    #[test]
    fn traversal_out_of_public_area_is_not_public() {
        let public = PublicRoutes::standard();
        assert!(!public.matches(&normalize_path("/auth/../cases")));
        assert!(!public.matches(&normalize_path("/api/%2e%2e/admin")));
        assert!(public.matches(&normalize_path("/cases/../auth")));
    }

    #[test]
    fn standard_public_routes() {
        let public = PublicRoutes::standard();
        assert!(public.matches("/"));
        assert!(public.matches("/auth"));
        assert!(public.matches("/auth/callback"));
        assert!(public.matches("/api/health/liveness"));
        assert!(!public.matches("/review/pending"));
        assert!(!public.matches("/apis"));
        assert_eq!(public.prefixes().len(), 3);
    }
}
