//! Forward and reverse name resolution.
//!
//! Wraps `trust-dns-resolver` behind the three lookups the utilities need:
//! forward (hostname to addresses), reverse (address to PTR hostname), and
//! the single-address resolution the probing utilities perform before any
//! network attempt. Literal IP inputs short-circuit the resolver.

use crate::error::{DiagError, DiagResult};
use std::net::IpAddr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Result of a forward or reverse lookup, for display.
#[derive(Debug, Clone)]
pub enum ResolutionResult {
    /// Forward lookup: the queried name and every address it resolved to.
    Addresses { query: String, addrs: Vec<IpAddr> },
    /// Reverse lookup: the queried address and its PTR hostname.
    Hostname { query: String, hostname: String },
}

fn system_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
}

/// Resolve a hostname to all of its addresses.
///
/// A literal IP address input resolves to itself, matching the behavior of
/// the host resolver.
async fn forward_addrs(host: &str) -> DiagResult<Vec<IpAddr>> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    if !is_valid_hostname(host) {
        return Err(DiagError::resolution(host, "not a valid hostname"));
    }

    let resolver = system_resolver();
    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| DiagError::resolution(host, e))?;

    let addrs: Vec<IpAddr> = response.iter().collect();
    if addrs.is_empty() {
        return Err(DiagError::resolution(host, "no addresses found"));
    }

    debug!(host, count = addrs.len(), "forward lookup complete");
    Ok(addrs)
}

/// Forward lookup for display: the queried name and every address found.
pub async fn lookup_host(host: &str) -> DiagResult<ResolutionResult> {
    let addrs = forward_addrs(host).await?;
    Ok(ResolutionResult::Addresses {
        query: host.to_string(),
        addrs,
    })
}

/// Resolve a numeric address to its PTR hostname.
pub async fn lookup_ptr(query: &str) -> DiagResult<ResolutionResult> {
    let ip: IpAddr = query
        .parse()
        .map_err(|_| DiagError::resolution(query, "reverse lookup requires a numeric address"))?;

    let resolver = system_resolver();
    let response = resolver
        .reverse_lookup(ip)
        .await
        .map_err(|e| DiagError::resolution(query, e))?;

    let hostname = response
        .iter()
        .next()
        .map(|ptr| {
            let name = ptr.to_string();
            name.strip_suffix('.').map(str::to_string).unwrap_or(name)
        })
        .ok_or_else(|| DiagError::resolution(query, "no PTR record found"))?;

    debug!(query, %hostname, "reverse lookup complete");
    Ok(ResolutionResult::Hostname {
        query: query.to_string(),
        hostname,
    })
}

/// Resolve a host argument to the single address the probing utilities
/// target. Prefers the first IPv4 address, falling back to the first
/// address of any family.
pub async fn resolve_host(host: &str) -> DiagResult<IpAddr> {
    let addrs = forward_addrs(host).await?;
    Ok(addrs
        .iter()
        .copied()
        .find(IpAddr::is_ipv4)
        .unwrap_or(addrs[0]))
}

/// Check if a string is a plausible hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each dot-separated label must be 1-63 chars, alphanumeric plus
    // hyphens, starting and ending alphanumeric.
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().last().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hostnames() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("sub.example.com"));
        assert!(is_valid_hostname("my-server"));
    }

    #[test]
    fn test_invalid_hostnames() {
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-invalid.com"));
        assert!(!is_valid_hostname("bad..label"));
        assert!(!is_valid_hostname("trailing-.com"));
    }

    #[tokio::test]
    async fn test_literal_ip_short_circuits() {
        let result = lookup_host("127.0.0.1").await.unwrap();
        match result {
            ResolutionResult::Addresses { addrs, .. } => {
                assert_eq!(addrs, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
            }
            ResolutionResult::Hostname { .. } => panic!("expected addresses"),
        }
    }

    #[tokio::test]
    async fn test_reverse_requires_numeric_input() {
        let err = lookup_ptr("example.com").await.unwrap_err();
        assert!(matches!(err, DiagError::Resolution { .. }));
    }

    #[tokio::test]
    async fn test_garbage_hostname_rejected() {
        let err = lookup_host("not a hostname!").await.unwrap_err();
        assert!(matches!(err, DiagError::Resolution { .. }));
    }
}
