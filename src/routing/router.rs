//! Route lookup.
//!
//! # Responsibilities
//! - Store the finalized route map
//! - Resolve an incoming request to its route
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Resolution order: `d` query parameter, then path segments, then
//!   the default (empty-named) route, then explicit no-match
//! - O(1) name lookup via HashMap; O(segments) path scan

use crate::config::{RouteConfig, RouteMap};

/// Immutable mapping from route name to route config.
pub struct RouteTable {
    routes: RouteMap,
}

impl RouteTable {
    /// Build a table from a validated route map.
    pub fn new(routes: RouteMap) -> Self {
        Self { routes }
    }

    /// Look up a route by exact name.
    pub fn get(&self, name: &str) -> Option<&RouteConfig> {
        self.routes.get(name)
    }

    /// Number of configured routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no routes are configured.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a request to a route. First match wins:
    ///
    /// 1. the `d` query parameter, when it names a known route;
    /// 2. the first `/`-delimited path segment naming a known route;
    /// 3. the default route, when one is configured.
    pub fn resolve(&self, path: &str, query: &str) -> Option<(&str, &RouteConfig)> {
        if let Some(selector) = query_value(query, "d") {
            if let Some((name, cfg)) = self.routes.get_key_value(selector.as_str()) {
                return Some((name.as_str(), cfg));
            }
        }

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if let Some((name, cfg)) = self.routes.get_key_value(segment) {
                return Some((name.as_str(), cfg));
            }
        }

        self.routes
            .get_key_value("")
            .map(|(name, cfg)| (name.as_str(), cfg))
    }
}

/// Extract the first value of `key` from a raw query string.
fn query_value(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> RouteTable {
        let mut routes = RouteMap::new();
        for name in names {
            routes.insert(
                name.to_string(),
                RouteConfig {
                    out_template: "/tmp/%T.bin".into(),
                    ..RouteConfig::default()
                },
            );
        }
        RouteTable::new(routes)
    }

    #[test]
    fn query_parameter_selects_route() {
        let t = table(&["myroute", "other"]);
        let (name, _) = t.resolve("/whatever", "d=other").unwrap();
        assert_eq!(name, "other");
    }

    #[test]
    fn path_segment_selects_route() {
        let t = table(&["myroute"]);
        let (name, _) = t.resolve("/abc/myroute/xyz", "").unwrap();
        assert_eq!(name, "myroute");
    }

    #[test]
    fn query_parameter_wins_over_path_segment() {
        let t = table(&["a", "b"]);
        let (name, _) = t.resolve("/a/payload", "d=b").unwrap();
        assert_eq!(name, "b");
    }

    #[test]
    fn unknown_selector_falls_back_to_path_scan() {
        let t = table(&["myroute"]);
        let (name, _) = t.resolve("/myroute", "d=bogus").unwrap();
        assert_eq!(name, "myroute");
    }

    #[test]
    fn default_route_catches_everything() {
        let t = table(&["", "named"]);
        let (name, _) = t.resolve("/no/match/here", "").unwrap();
        assert_eq!(name, "");
    }

    #[test]
    fn no_match_without_default() {
        let t = table(&["named"]);
        assert!(t.resolve("/no/match/here", "").is_none());
    }

    #[test]
    fn url_encoded_selector_is_decoded() {
        let t = table(&["my route"]);
        let (name, _) = t.resolve("/", "d=my%20route").unwrap();
        assert_eq!(name, "my route");
    }
}
