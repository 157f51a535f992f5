// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! The static route table
//!
//! Encodes the provider's hierarchical path grammar as an ordered list of
//! structural patterns. The table is built once at startup and immutable
//! afterwards; lookup applies the first pattern that matches the full
//! path, so registration order is precedence order.
//!
//! Routes that appear in the `meta-data/` listing declare their leaf label
//! statically on the entry itself. The listing handler reads those labels
//! back in registration order, which makes the published listing a designed
//! property of the table rather than something recovered from pattern text.
//! Reordering the metadata routes reorders the listing.

/// Name under which the placement sub-segment is captured.
pub const PARAM_PLACEMENT_SUB: &str = "sub";

/// Name under which the public-key ordinal index is captured.
pub const PARAM_KEY_INDEX: &str = "index";

/// Name under which the public-key format is captured.
pub const PARAM_KEY_FORMAT: &str = "format";

/// One path-segment matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seg {
    /// Exact literal segment
    Lit(&'static str),
    /// Any single non-empty token; not captured. Used for the API-version
    /// position, which deliberately accepts unknown version strings.
    Any,
    /// A run of ASCII digits, captured under the given name
    Digits(&'static str),
    /// Any single non-empty token, captured under the given name
    Token(&'static str),
    /// The given literal, captured under the given name
    LitToken(&'static str, &'static str),
}

impl Seg {
    fn matches(&self, part: &str, params: &mut Params) -> bool {
        match self {
            Seg::Lit(lit) => part == *lit,
            Seg::Any => !part.is_empty(),
            Seg::Digits(name) => {
                if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                    params.push(name, part);
                    true
                } else {
                    false
                }
            }
            Seg::Token(name) => {
                if part.is_empty() {
                    false
                } else {
                    params.push(name, part);
                    true
                }
            }
            Seg::LitToken(name, lit) => {
                if part == *lit {
                    params.push(name, part);
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Whether a pattern requires, forbids, or tolerates a trailing slash.
///
/// The grammar distinguishes `/latest/meta-data` (presence probe) from
/// `/latest/meta-data/` (listing), so this is part of the pattern, not
/// something the transport normalizes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trailing {
    None,
    Required,
    Optional,
}

/// A full-path pattern: a fixed sequence of segment matchers plus the
/// trailing-slash mode.
#[derive(Debug, Clone)]
struct Pattern {
    segs: Vec<Seg>,
    trailing: Trailing,
}

impl Pattern {
    fn new(segs: Vec<Seg>, trailing: Trailing) -> Self {
        Self { segs, trailing }
    }

    /// Match the entire path, capturing named parameters. Partial-prefix
    /// matches never succeed.
    fn matches(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/')?;
        let (body, has_trailing) = match rest.strip_suffix('/') {
            Some(body) => (body, true),
            None => (rest, false),
        };

        match (self.trailing, has_trailing) {
            (Trailing::None, true) | (Trailing::Required, false) => return None,
            _ => {}
        }

        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };
        if parts.len() != self.segs.len() {
            return None;
        }

        let mut params = Params::default();
        for (seg, part) in self.segs.iter().zip(&parts) {
            if !seg.matches(part, &mut params) {
                return None;
            }
        }
        Some(params)
    }
}

/// Parameters captured from a matched path, in capture order.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn push(&mut self, name: &'static str, value: &str) {
        self.0.push((name, value.to_string()));
    }
}

/// Handler capability bound to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List the supported API version strings
    ApiVersions,
    /// Empty-body success, so a path prefix does not read as not-found
    Probe,
    /// List the API categories available under a version
    CategoryList,
    /// List the metadata leaves from the table's leaf registry
    MetadataList,
    InstanceId,
    InstanceType,
    Hostname,
    LocalHostname,
    LocalIpv4,
    PublicIpv4,
    /// Placement sub-tree: bare listing hint, or the availability-zone leaf
    /// when the sub-segment was captured
    Placement,
    /// Three-level public-keys protocol (list / describe / fetch)
    PublicKeys,
    /// Opaque user-data blob
    UserData,
}

/// One (pattern, capability) binding, plus the route's entry in the
/// metadata-leaf registry when it has one.
#[derive(Debug, Clone)]
struct Route {
    pattern: Pattern,
    action: Action,
    leaf_label: Option<&'static str>,
}

/// The ordered route table. Immutable once built; iteration order equals
/// registration order and is load-bearing for both match precedence and
/// the metadata listing.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The fixed provider grammar, in its canonical registration order.
    pub fn standard() -> Self {
        use Seg::{Any, Digits, Lit, LitToken, Token};

        // Routes under the metadata category share the /<version>/meta-data/<seg>
        // shape; the listed ones also declare their entry in the leaf registry.
        let meta = |seg: &'static str,
                    trailing: Trailing,
                    action: Action,
                    leaf_label: Option<&'static str>| Route {
            pattern: Pattern::new(vec![Any, Lit("meta-data"), Lit(seg)], trailing),
            action,
            leaf_label,
        };

        let routes = vec![
            Route {
                pattern: Pattern::new(vec![], Trailing::None),
                action: Action::ApiVersions,
                leaf_label: None,
            },
            Route {
                pattern: Pattern::new(vec![Any], Trailing::None),
                action: Action::Probe,
                leaf_label: None,
            },
            Route {
                pattern: Pattern::new(vec![Any], Trailing::Required),
                action: Action::CategoryList,
                leaf_label: None,
            },
            Route {
                pattern: Pattern::new(vec![Any, Lit("meta-data")], Trailing::None),
                action: Action::Probe,
                leaf_label: None,
            },
            Route {
                pattern: Pattern::new(vec![Any, Lit("meta-data")], Trailing::Required),
                action: Action::MetadataList,
                leaf_label: None,
            },
            meta(
                "instance-id",
                Trailing::None,
                Action::InstanceId,
                Some("instance-id"),
            ),
            meta(
                "instance-type",
                Trailing::None,
                Action::InstanceType,
                Some("instance-type"),
            ),
            meta("hostname", Trailing::None, Action::Hostname, Some("hostname")),
            meta(
                "local-hostname",
                Trailing::None,
                Action::LocalHostname,
                Some("local-hostname"),
            ),
            meta(
                "local-ipv4",
                Trailing::None,
                Action::LocalIpv4,
                Some("local-ipv4"),
            ),
            meta(
                "public-ipv4",
                Trailing::None,
                Action::PublicIpv4,
                Some("public-ipv4"),
            ),
            meta(
                "placement",
                Trailing::Optional,
                Action::Placement,
                Some("placement/"),
            ),
            Route {
                pattern: Pattern::new(
                    vec![
                        Any,
                        Lit("meta-data"),
                        Lit("placement"),
                        LitToken(PARAM_PLACEMENT_SUB, "availability-zone"),
                    ],
                    Trailing::None,
                ),
                action: Action::Placement,
                leaf_label: None,
            },
            meta(
                "public-keys",
                Trailing::Optional,
                Action::PublicKeys,
                Some("public-keys/"),
            ),
            Route {
                pattern: Pattern::new(
                    vec![
                        Any,
                        Lit("meta-data"),
                        Lit("public-keys"),
                        Digits(PARAM_KEY_INDEX),
                    ],
                    Trailing::Optional,
                ),
                action: Action::PublicKeys,
                leaf_label: None,
            },
            Route {
                pattern: Pattern::new(
                    vec![
                        Any,
                        Lit("meta-data"),
                        Lit("public-keys"),
                        Digits(PARAM_KEY_INDEX),
                        Token(PARAM_KEY_FORMAT),
                    ],
                    Trailing::None,
                ),
                action: Action::PublicKeys,
                leaf_label: None,
            },
            Route {
                pattern: Pattern::new(vec![Any, Lit("user-data")], Trailing::Optional),
                action: Action::UserData,
                leaf_label: None,
            },
        ];

        Self { routes }
    }

    /// First-match lookup in registration order.
    pub fn lookup(&self, path: &str) -> Option<(Action, Params)> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.matches(path).map(|p| (route.action, p)))
    }

    /// The metadata leaves declared by the table, in registration order.
    /// This is the body of the `meta-data/` listing.
    pub fn metadata_leaves(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().filter_map(|route| route.leaf_label)
    }
}

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn action_for(table: &RouteTable, path: &str) -> Option<Action> {
        table.lookup(path).map(|(action, _)| action)
    }

    #[test]
    fn root_lists_versions() {
        let table = RouteTable::standard();
        assert_eq!(action_for(&table, "/"), Some(Action::ApiVersions));
    }

    #[test]
    fn version_segment_accepts_any_token() {
        let table = RouteTable::standard();
        for version in ["latest", "2012-01-12", "9999-99-99", "anything"] {
            let path = format!("/{}", version);
            assert_eq!(action_for(&table, &path), Some(Action::Probe), "{}", path);
            assert_eq!(
                action_for(&table, &format!("{}/meta-data", path)),
                Some(Action::Probe)
            );
        }
    }

    #[test]
    fn trailing_slash_selects_distinct_routes() {
        let table = RouteTable::standard();
        assert_eq!(action_for(&table, "/latest"), Some(Action::Probe));
        assert_eq!(action_for(&table, "/latest/"), Some(Action::CategoryList));
        assert_eq!(
            action_for(&table, "/latest/meta-data"),
            Some(Action::Probe)
        );
        assert_eq!(
            action_for(&table, "/latest/meta-data/"),
            Some(Action::MetadataList)
        );
    }

    #[test]
    fn leaf_routes_match_without_trailing_slash_only() {
        let table = RouteTable::standard();
        assert_eq!(
            action_for(&table, "/latest/meta-data/instance-id"),
            Some(Action::InstanceId)
        );
        assert_eq!(action_for(&table, "/latest/meta-data/instance-id/"), None);
        assert_eq!(
            action_for(&table, "/latest/meta-data/hostname"),
            Some(Action::Hostname)
        );
    }

    #[test]
    fn placement_accepts_only_the_availability_zone_sub_segment() {
        let table = RouteTable::standard();

        let (action, params) = table
            .lookup("/latest/meta-data/placement")
            .expect("bare placement should match");
        assert_eq!(action, Action::Placement);
        assert_eq!(params.get(PARAM_PLACEMENT_SUB), None);

        let (action, params) = table
            .lookup("/latest/meta-data/placement/availability-zone")
            .expect("availability-zone leaf should match");
        assert_eq!(action, Action::Placement);
        assert_eq!(params.get(PARAM_PLACEMENT_SUB), Some("availability-zone"));

        assert_eq!(action_for(&table, "/latest/meta-data/placement/region"), None);
    }

    #[test]
    fn public_key_index_must_be_digits() {
        let table = RouteTable::standard();

        let (action, params) = table
            .lookup("/latest/meta-data/public-keys/0/")
            .expect("numeric index should match");
        assert_eq!(action, Action::PublicKeys);
        assert_eq!(params.get(PARAM_KEY_INDEX), Some("0"));

        assert_eq!(
            action_for(&table, "/latest/meta-data/public-keys/id_rsa/"),
            None
        );
        assert_eq!(action_for(&table, "/latest/meta-data/public-keys/1x/"), None);
    }

    #[test]
    fn public_key_fetch_captures_index_and_format() {
        let table = RouteTable::standard();
        let (action, params) = table
            .lookup("/latest/meta-data/public-keys/2/openssh-key")
            .expect("fetch route should match");
        assert_eq!(action, Action::PublicKeys);
        assert_eq!(params.get(PARAM_KEY_INDEX), Some("2"));
        assert_eq!(params.get(PARAM_KEY_FORMAT), Some("openssh-key"));
    }

    #[test]
    fn user_data_tolerates_trailing_slash() {
        let table = RouteTable::standard();
        assert_eq!(action_for(&table, "/latest/user-data"), Some(Action::UserData));
        assert_eq!(
            action_for(&table, "/latest/user-data/"),
            Some(Action::UserData)
        );
    }

    #[test]
    fn unknown_sub_paths_do_not_match() {
        let table = RouteTable::standard();
        for path in [
            "",
            "//",
            "/latest/meta-data/no-such-leaf",
            "/latest/meta-data/instance-id/extra",
            "/latest/user-data/extra",
            "/latest//meta-data",
        ] {
            assert_eq!(action_for(&table, path), None, "{:?}", path);
        }
    }

    #[test]
    fn metadata_leaves_follow_registration_order() {
        let table = RouteTable::standard();
        let leaves: Vec<&str> = table.metadata_leaves().collect();
        assert_eq!(
            leaves,
            vec![
                "instance-id",
                "instance-type",
                "hostname",
                "local-hostname",
                "local-ipv4",
                "public-ipv4",
                "placement/",
                "public-keys/",
            ]
        );
    }

    #[test]
    fn listing_tracks_metadata_route_order() {
        let mut table = RouteTable::standard();
        let hostname = table
            .routes
            .iter()
            .position(|r| r.leaf_label == Some("hostname"))
            .unwrap();
        let instance_id = table
            .routes
            .iter()
            .position(|r| r.leaf_label == Some("instance-id"))
            .unwrap();
        table.routes.swap(hostname, instance_id);

        let leaves: Vec<&str> = table.metadata_leaves().collect();
        assert_eq!(leaves[0], "hostname");
        assert_eq!(leaves[2], "instance-id");
    }

    #[test]
    fn listing_ignores_non_metadata_route_order() {
        let mut table = RouteTable::standard();
        let before: Vec<&str> = table.metadata_leaves().collect();

        // Move the user-data route (no leaf label) to the end of the table.
        let user_data = table
            .routes
            .iter()
            .position(|r| r.action == Action::UserData)
            .unwrap();
        let route = table.routes.remove(user_data);
        table.routes.push(route);

        let after: Vec<&str> = table.metadata_leaves().collect();
        assert_eq!(before, after);
    }
}
