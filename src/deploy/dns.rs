//! Domain resolution check
//!
//! Compares the domain's A records against the configured server address.
//! A mismatch or a failed lookup is informative only; deployment proceeds
//! either way since DNS often lags the server setup.

use std::collections::HashSet;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsCheck {
    /// The domain resolves to the configured server
    Match { address: IpAddr },
    /// The domain resolves, but not to the configured server
    Mismatch {
        resolved: Vec<IpAddr>,
        expected: Vec<IpAddr>,
    },
    /// The domain does not resolve at all
    Unresolved { reason: String },
}

/// Resolve `domain` and compare against `server_host`
///
/// `server_host` may be a literal IP or a hostname; hostnames are resolved
/// too and the comparison is on the address sets.
pub async fn check_domain(domain: &str, server_host: &str) -> DnsCheck {
    let resolved = match resolve_v4(domain).await {
        Ok(addresses) if !addresses.is_empty() => addresses,
        Ok(_) => {
            return DnsCheck::Unresolved {
                reason: format!("{} has no A records", domain),
            }
        }
        Err(e) => {
            return DnsCheck::Unresolved {
                reason: e.to_string(),
            }
        }
    };

    let expected: HashSet<IpAddr> = match server_host.parse::<IpAddr>() {
        Ok(ip) => HashSet::from([ip]),
        Err(_) => resolve_v4(server_host).await.unwrap_or_default(),
    };

    debug!(?resolved, ?expected, "dns comparison");

    match resolved.iter().copied().find(|ip| expected.contains(ip)) {
        Some(address) => DnsCheck::Match { address },
        None => DnsCheck::Mismatch {
            resolved: resolved.into_iter().collect(),
            expected: expected.into_iter().collect(),
        },
    }
}

async fn resolve_v4(host: &str) -> std::io::Result<HashSet<IpAddr>> {
    let addresses = lookup_host((host, 80)).await?;
    Ok(addresses
        .map(|socket| socket.ip())
        .filter(IpAddr::is_ipv4)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_localhost_matches_itself() {
        let check = check_domain("localhost", "127.0.0.1").await;
        assert_eq!(
            check,
            DnsCheck::Match {
                address: "127.0.0.1".parse().unwrap()
            }
        );
    }

    #[tokio::test]
    async fn test_localhost_does_not_match_other_address() {
        let check = check_domain("localhost", "203.0.113.10").await;
        assert!(matches!(check, DnsCheck::Mismatch { .. }));
    }

    #[tokio::test]
    async fn test_invalid_domain_is_unresolved() {
        let check = check_domain("definitely-not-a-real-host.invalid", "127.0.0.1").await;
        assert!(matches!(check, DnsCheck::Unresolved { .. }));
    }
}
