//! Condition lookup and target resolution.
//!
//! # Responsibilities
//! - Normalize the routing key (case-insensitive matching)
//! - Map the key to the configured origin URL
//! - Fall back to the default origin for anything unrecognized
//!
//! # Design Decisions
//! - Pure decision logic, no I/O: unit-testable in isolation
//! - Key comparison is case-insensitive; "a" and "A" are the same variant
//! - An unconfigured (empty) URL propagates as-is; the forwarder rejects it

use crate::config::OriginConfig;

/// A routing condition recognized by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    A,
    B,
    Default,
}

impl Condition {
    /// Parse a routing key, case-insensitively.
    ///
    /// Exact match only: anything that is not "A" or "B" after uppercasing
    /// (including the empty key) is the default condition.
    pub fn from_key(key: &str) -> Self {
        match key.to_ascii_uppercase().as_str() {
            "A" => Condition::A,
            "B" => Condition::B,
            _ => Condition::Default,
        }
    }
}

/// Maps routing conditions to configured origin URLs.
///
/// Built once at startup from [`OriginConfig`] and shared read-only across
/// all request tasks.
#[derive(Debug, Clone)]
pub struct ConditionRouter {
    a_url: String,
    b_url: String,
    default_url: String,
}

impl ConditionRouter {
    /// Build a router from the configured origins.
    pub fn from_config(origins: &OriginConfig) -> Self {
        Self {
            a_url: origins.a_url.clone(),
            b_url: origins.b_url.clone(),
            default_url: origins.default_url.clone(),
        }
    }

    /// Resolve a routing key to the configured origin URL.
    ///
    /// Never fails: keys that match no condition resolve to the default
    /// origin. The returned URL may be empty if the operator left that
    /// condition unconfigured.
    pub fn resolve(&self, key: &str) -> &str {
        self.url_for(Condition::from_key(key))
    }

    /// The origin URL configured for a condition.
    pub fn url_for(&self, condition: Condition) -> &str {
        match condition {
            Condition::A => &self.a_url,
            Condition::B => &self.b_url,
            Condition::Default => &self.default_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_router() -> ConditionRouter {
        ConditionRouter::from_config(&OriginConfig {
            a_url: "http://upstream-a".to_string(),
            b_url: "http://upstream-b".to_string(),
            default_url: "http://upstream-default".to_string(),
        })
    }

    #[test]
    fn resolves_known_keys_case_insensitively() {
        let router = test_router();
        assert_eq!(router.resolve("a"), "http://upstream-a");
        assert_eq!(router.resolve("A"), "http://upstream-a");
        assert_eq!(router.resolve("b"), "http://upstream-b");
        assert_eq!(router.resolve("B"), "http://upstream-b");
    }

    #[test]
    fn unknown_keys_resolve_to_default() {
        let router = test_router();
        assert_eq!(router.resolve(""), "http://upstream-default");
        assert_eq!(router.resolve("c"), "http://upstream-default");
        assert_eq!(router.resolve("unknown"), "http://upstream-default");
        // No partial matching
        assert_eq!(router.resolve("ab"), "http://upstream-default");
        assert_eq!(router.resolve(" a"), "http://upstream-default");
    }

    #[test]
    fn empty_default_propagates_as_is() {
        let router = ConditionRouter::from_config(&OriginConfig::default());
        assert_eq!(router.resolve("anything"), "");
    }

    #[test]
    fn condition_parsing() {
        assert_eq!(Condition::from_key("a"), Condition::A);
        assert_eq!(Condition::from_key("B"), Condition::B);
        assert_eq!(Condition::from_key("ä"), Condition::Default);
        assert_eq!(Condition::from_key(""), Condition::Default);
    }
}
