//! # Route Table
//!
//! Static mapping from URL paths to pages.
//!
//! Patterns are `/`-separated segments; a segment starting with `:` captures
//! a parameter, and the pattern `*` matches any path. A route either names a
//! [`Page`] or redirects to another path. There are no guards and no dynamic
//! routes.

use crate::ModelerError;
use crate::primitives::MAX_ROUTE_REDIRECTS;
use serde::Serialize;
use std::collections::BTreeMap;

/// Pages reachable through the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Page {
    /// Landing page.
    Home,
    /// The object list.
    Objects,
    /// One object with its fields and records. Takes the `id` parameter.
    ObjectDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Page { name: &'static str, page: Page },
    Redirect(&'static str),
}

#[derive(Debug, Clone)]
struct RouteDef {
    pattern: &'static str,
    target: Target,
}

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Route name.
    pub name: &'static str,
    /// The page to render.
    pub page: Page,
    /// The final path after redirects.
    pub path: String,
    /// Captured path parameters.
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    /// A captured parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Ordered route table. The first matching pattern wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

/// Drop query string, fragment and trailing slash; ensure a leading slash.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    if pattern == "*" {
        return Some(BTreeMap::new());
    }
    let mut params = BTreeMap::new();
    let mut pattern_segs = segments(pattern);
    let mut path_segs = segments(path);
    loop {
        match (pattern_segs.next(), path_segs.next()) {
            (None, None) => return Some(params),
            (Some(p), Some(s)) => {
                if let Some(key) = p.strip_prefix(':') {
                    params.insert(key.to_string(), s.to_string());
                } else if p != s {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's route table.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .page("/home", "Home", Page::Home)
            .page("/objects", "Objects", Page::Objects)
            .page("/objects/:id", "ObjectDetail", Page::ObjectDetail)
            .redirect("/", "/home")
            .redirect("*", "/home")
    }

    /// Append a page route.
    #[must_use]
    pub fn page(mut self, pattern: &'static str, name: &'static str, page: Page) -> Self {
        self.routes.push(RouteDef {
            pattern,
            target: Target::Page { name, page },
        });
        self
    }

    /// Append a redirect.
    #[must_use]
    pub fn redirect(mut self, pattern: &'static str, to: &'static str) -> Self {
        self.routes.push(RouteDef {
            pattern,
            target: Target::Redirect(to),
        });
        self
    }

    /// Resolve a path to a page, following redirects.
    ///
    /// Paths matching no route resolve to [`Page::Home`] through the
    /// catch-all redirect of the standard table. A table without a
    /// catch-all reports [`ModelerError::UnknownRoute`] for such paths.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, ModelerError> {
        let mut current = normalize(path);
        for _ in 0..=MAX_ROUTE_REDIRECTS {
            let found = self
                .routes
                .iter()
                .find_map(|def| match_pattern(def.pattern, &current).map(|p| (def, p)));
            match found {
                Some((def, params)) => match &def.target {
                    Target::Page { name, page } => {
                        return Ok(RouteMatch {
                            name: *name,
                            page: *page,
                            path: current,
                            params,
                        });
                    }
                    Target::Redirect(to) => current = normalize(to),
                },
                None => return Err(ModelerError::UnknownRoute { name: current }),
            }
        }
        Err(ModelerError::RedirectLoop {
            path: path.to_string(),
        })
    }

    /// Build the path of a named route.
    pub fn path_for(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<String, ModelerError> {
        let def = self
            .routes
            .iter()
            .find(|def| matches!(def.target, Target::Page { name: n, .. } if n == name))
            .ok_or_else(|| ModelerError::UnknownRoute {
                name: name.to_string(),
            })?;

        let mut path = String::new();
        for seg in segments(def.pattern) {
            path.push('/');
            match seg.strip_prefix(':') {
                Some(key) => {
                    let value = params.get(key).ok_or_else(|| ModelerError::MissingRouteParam {
                        route: name.to_string(),
                        param: key.to_string(),
                    })?;
                    path.push_str(value);
                }
                None => path.push_str(seg),
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_page() {
        let m = RouteTable::standard().resolve("/objects").expect("resolve");
        assert_eq!(m.page, Page::Objects);
        assert_eq!(m.name, "Objects");
        assert!(m.params.is_empty());
    }

    #[test]
    fn object_detail_captures_id() {
        let m = RouteTable::standard()
            .resolve("/objects/abc-123/?tab=fields")
            .expect("resolve");
        assert_eq!(m.page, Page::ObjectDetail);
        assert_eq!(m.param("id"), Some("abc-123"));
        assert_eq!(m.path, "/objects/abc-123");
    }

    #[test]
    fn root_redirects_home() {
        let m = RouteTable::standard().resolve("/").expect("resolve");
        assert_eq!(m.page, Page::Home);
        assert_eq!(m.path, "/home");
    }

    #[test]
    fn unmatched_redirects_home() {
        for path in ["/nope", "/objects/a/b/c", "objects/x/fields"] {
            let m = RouteTable::standard().resolve(path).expect("resolve");
            assert_eq!(m.page, Page::Home, "{path}");
        }
    }

    #[test]
    fn redirect_loop_is_detected() {
        let table = RouteTable::new().redirect("/a", "/b").redirect("/b", "/a");
        assert!(matches!(
            table.resolve("/a"),
            Err(ModelerError::RedirectLoop { .. })
        ));
    }

    #[test]
    fn table_without_catch_all_rejects() {
        let table = RouteTable::new().page("/x", "X", Page::Home);
        assert!(matches!(
            table.resolve("/y"),
            Err(ModelerError::UnknownRoute { .. })
        ));
    }

    #[test]
    fn path_for_fills_params() {
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "o1".to_string());
        let table = RouteTable::standard();
        assert_eq!(table.path_for("ObjectDetail", &params).expect("path"), "/objects/o1");
        assert_eq!(table.path_for("Objects", &params).expect("path"), "/objects");
    }

    #[test]
    fn path_for_reports_missing_param() {
        let err = RouteTable::standard()
            .path_for("ObjectDetail", &BTreeMap::new())
            .expect_err("missing");
        assert_eq!(
            err,
            ModelerError::MissingRouteParam {
                route: "ObjectDetail".to_string(),
                param: "id".to_string()
            }
        );
    }

    #[test]
    fn path_for_unknown_name() {
        assert!(RouteTable::standard().path_for("Nope", &BTreeMap::new()).is_err());
    }
}
