//! Hyperlink references returned by the remote API.
//!
//! The API answers with `_links: { <rel>: { href, hrefs } }`. [`flatten`]
//! turns that into a list of [`Link`] values, one per target, preserving the
//! remote order within each relation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Relation carrying one link per enabled region.
pub const REL_REGIONS: &str = "regions";
/// Relation carrying one link per associated cloud account.
pub const REL_ASSOCIATED_CLOUD_ACCOUNTS: &str = "associated-cloud-accounts";

/// Remote wire shape of a single `_links` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Href {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hrefs: Vec<String>,
}

/// `_links` keyed by relation type.
pub type RemoteLinks = BTreeMap<String, Href>;

/// A single relation-typed link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }

    /// Identifier embedded as the last path segment of the target.
    ///
    /// `/iaas/api/regions/r1` yields `r1`. Empty targets, trailing slashes and
    /// targets without a path separator are rejected.
    pub fn target_id(&self) -> Result<&str, NormalizeError> {
        let malformed = || NormalizeError::MalformedLink {
            rel: self.rel.clone(),
            href: self.href.clone(),
        };
        let path = self.href.split(['?', '#']).next().unwrap_or_default();
        let (_, last) = path.rsplit_once('/').ok_or_else(malformed)?;
        if last.trim().is_empty() {
            return Err(malformed());
        }
        Ok(last)
    }
}

/// Flatten the remote `_links` map. Relations come out in key order; within a
/// relation `href` precedes `hrefs`, which keep their remote order.
pub fn flatten(links: &RemoteLinks) -> Vec<Link> {
    let mut out = Vec::new();
    for (rel, targets) in links {
        if let Some(href) = &targets.href {
            out.push(Link::new(rel.as_str(), href.as_str()));
        }
        for href in &targets.hrefs {
            out.push(Link::new(rel.as_str(), href.as_str()));
        }
    }
    out
}

/// Links of a given relation type, in their original order.
pub fn with_rel<'a>(links: &'a [Link], rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
    links.iter().filter(move |link| link.rel == rel)
}

/// Associated cloud account ids derived from the relational link collection.
pub fn associated_account_ids(links: &[Link]) -> Result<Vec<String>, NormalizeError> {
    with_rel(links, REL_ASSOCIATED_CLOUD_ACCOUNTS)
        .map(|link| link.target_id().map(str::to_owned))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/iaas/api/regions/r1", "r1")]
    #[case("https://vra.example.com/iaas/api/regions/abc-123", "abc-123")]
    #[case("/iaas/api/regions/r1?apiVersion=2021-07-15", "r1")]
    #[case("regions/Datacenter:datacenter-2", "Datacenter:datacenter-2")]
    fn extracts_last_segment(#[case] href: &str, #[case] expected: &str) {
        let link = Link::new(REL_REGIONS, href);
        assert_eq!(link.target_id().expect("id"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("r1")]
    #[case("/iaas/api/regions/")]
    #[case("/iaas/api/regions/ ")]
    fn rejects_malformed_targets(#[case] href: &str) {
        let err = Link::new(REL_REGIONS, href).target_id().unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedLink { .. }));
    }

    #[test]
    fn flatten_preserves_order_within_relation() {
        let mut links = RemoteLinks::new();
        links.insert(
            REL_REGIONS.to_string(),
            Href {
                href: None,
                hrefs: vec!["/regions/b".to_string(), "/regions/a".to_string()],
            },
        );
        links.insert(
            "self".to_string(),
            Href {
                href: Some("/iaas/api/cloud-accounts/acct-1".to_string()),
                hrefs: vec![],
            },
        );
        let flat = flatten(&links);
        assert_eq!(
            flat,
            vec![
                Link::new(REL_REGIONS, "/regions/b"),
                Link::new(REL_REGIONS, "/regions/a"),
                Link::new("self", "/iaas/api/cloud-accounts/acct-1"),
            ]
        );
    }

    #[test]
    fn associated_ids_filter_by_relation() {
        let links = vec![
            Link::new(REL_REGIONS, "/iaas/api/regions/r1"),
            Link::new(REL_ASSOCIATED_CLOUD_ACCOUNTS, "/iaas/api/cloud-accounts/nsx-1"),
            Link::new(REL_ASSOCIATED_CLOUD_ACCOUNTS, "/iaas/api/cloud-accounts/nsx-2"),
        ];
        assert_eq!(associated_account_ids(&links).expect("ids"), vec!["nsx-1", "nsx-2"]);
    }

    #[test]
    fn associated_ids_empty_without_relation() {
        let links = vec![Link::new("self", "/iaas/api/cloud-accounts/acct-1")];
        assert!(associated_account_ids(&links).expect("ids").is_empty());
    }
}
