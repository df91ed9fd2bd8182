//! Genesis-hash agreement between the selected network, the wallet and the node.

use crate::view::{AlertVariant, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConsistency<'a> {
    pub expected: &'a str,
    pub wallet_reported: Option<&'a str>,
    pub rpc_fetched: Option<&'a str>,
    pub mismatch_wallet: bool,
    pub mismatch_rpc: bool,
}

/// Absent sources never count as a mismatch.
#[must_use]
pub fn check<'a>(
    expected: &'a str,
    wallet_reported: Option<&'a str>,
    rpc_fetched: Option<&'a str>,
) -> NetworkConsistency<'a> {
    NetworkConsistency {
        expected,
        wallet_reported,
        rpc_fetched,
        mismatch_wallet: wallet_reported.is_some_and(|hash| hash != expected),
        mismatch_rpc: rpc_fetched.is_some_and(|hash| hash != expected),
    }
}

impl NetworkConsistency<'_> {
    #[must_use]
    pub const fn has_mismatch(&self) -> bool {
        self.mismatch_wallet || self.mismatch_rpc
    }

    #[must_use]
    pub fn render(&self) -> Option<Element> {
        if !self.has_mismatch() {
            return None;
        }
        Some(Element::Alert {
            variant: AlertVariant::Danger,
            title: "Inconsistent network parameters detected!".to_string(),
            items: vec![
                format!("Reported by wallet: {}.", self.wallet_reported.unwrap_or("N/A")),
                format!("Fetched via RPC: {}", self.rpc_fetched.unwrap_or("N/A")),
                format!("Expected for selected network: {}", self.expected),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "aaaa";

    #[test]
    fn test_all_sources_agree() {
        let result = check(EXPECTED, Some("aaaa"), Some("aaaa"));
        assert!(!result.has_mismatch());
        assert!(result.render().is_none());
    }

    #[test]
    fn test_absent_sources_are_not_mismatches() {
        for (wallet, rpc) in [(None, None), (Some(EXPECTED), None), (None, Some(EXPECTED))] {
            assert!(!check(EXPECTED, wallet, rpc).has_mismatch());
        }
    }

    #[test]
    fn test_each_source_flags_independently() {
        let wallet_only = check(EXPECTED, Some("bbbb"), None);
        assert!(wallet_only.mismatch_wallet);
        assert!(!wallet_only.mismatch_rpc);

        let rpc_only = check(EXPECTED, Some(EXPECTED), Some("cccc"));
        assert!(!rpc_only.mismatch_wallet);
        assert!(rpc_only.mismatch_rpc);

        let both = check(EXPECTED, Some("bbbb"), Some("cccc"));
        assert!(both.mismatch_wallet && both.mismatch_rpc);
    }

    #[test]
    fn test_warning_lists_every_source() {
        let alert = check(EXPECTED, None, Some("cccc")).render().unwrap();
        match alert {
            Element::Alert { variant, items, .. } => {
                assert_eq!(variant, AlertVariant::Danger);
                assert_eq!(items[0], "Reported by wallet: N/A.");
                assert_eq!(items[1], "Fetched via RPC: cccc");
                assert_eq!(items[2], "Expected for selected network: aaaa");
            }
            other => panic!("unexpected element {other:?}"),
        }
    }
}
