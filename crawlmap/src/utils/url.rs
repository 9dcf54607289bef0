//! # Address
//!
//! A minimal and safe parser for crawlable web addresses.
//!
//! **Features:**
//! - Supports `http` and `https` schemes, defaulting to `http` when the
//!   scheme is omitted
//! - Host validation (`DNS`, `IPv4`, `IPv6`)
//! - Normalization into a canonical absolute form: default ports are
//!   dropped and an empty path becomes `/`
//! - Custom error enum for precise error handling
//!
//! Two addresses are the same address exactly when their normalized strings
//! are equal; [`PartialEq`] and [`Hash`] are implemented over that form so
//! an [`Address`] can be used directly as a dedup key.
//!
//! ## Example
//!
//! ```rust
//! use crawlmap::utils::Address;
//!
//! let a = Address::parse("http://example.com:80").unwrap();
//! let b = "http://example.com/".parse::<Address>().unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "http://example.com/");
//! ```
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

/// The scheme of an [`Address`] (`http` or `https`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// The port used when the address does not carry an explicit one.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// The kind of host an [`Address`] points at.
///
/// Can be:
/// - `Dns`
/// - `IPv4`
/// - `IPv6`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Dns,
    IPv4,
    IPv6,
}

impl HostKind {
    /// Classifies `host`, validating it against one of the supported kinds.
    ///
    /// DNS rules:
    /// - Maximum length: 253 characters
    /// - Each label ≤ 63 characters
    /// - Labels cannot start or end with `-`
    /// - Only ASCII alphanumeric characters and `-` allowed
    pub fn detect(host: &str) -> Result<HostKind, AddressError> {
        if Ipv4Addr::from_str(host).is_ok() {
            return Ok(HostKind::IPv4);
        }

        if host.starts_with('[') && host.ends_with(']') {
            let inner = host.trim_matches(['[', ']'].as_ref());
            return match Ipv6Addr::from_str(inner) {
                Ok(_) => Ok(HostKind::IPv6),
                Err(_) => Err(AddressError::InvalidHost),
            };
        }

        if host.is_empty() || host.len() > 253 {
            return Err(AddressError::InvalidHost);
        }

        let valid = host.split('.').all(|label| {
            if label.is_empty() || label.len() > 63 {
                return false;
            }

            if label.starts_with('-') || label.ends_with('-') {
                return false;
            }

            label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

        if valid {
            Ok(HostKind::Dns)
        } else {
            Err(AddressError::InvalidHost)
        }
    }
}

/// Represents possible errors when parsing an address.
///
/// An input failing here is malformed and is dropped before it ever reaches
/// the visited-set gate or the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("the address is empty")]
    Empty,
    #[error("unrecognized scheme, expected http or https")]
    InvalidScheme,
    #[error("invalid host, expected a DNS name, IPv4 or IPv6 address")]
    InvalidHost,
    #[error("invalid port, expected a number between 1 and 65535")]
    InvalidPort,
}

/// A normalized absolute web address.
///
/// Contains:
/// - [`Scheme`] (`http` or `https`, defaulted to `http` when omitted)
/// - host and its [`HostKind`]
/// - effective port (scheme default when not spelled out)
/// - path (always non-empty, `/` at minimum)
/// - the full normalized string, the canonical identity of the address
#[derive(Debug, Clone)]
pub struct Address {
    scheme: Scheme,
    host: String,
    host_kind: HostKind,
    port: u16,
    path: String,
    normalized: String,
}

impl Address {
    /// Parses and normalizes `input` into an [`Address`].
    ///
    /// # Errors
    /// Returns [`AddressError`] if:
    /// - The input is empty
    /// - The scheme is spelled out but is not `http`/`https`
    /// - The host is not a valid DNS name, IPv4 or IPv6 address
    /// - The port is not a number in `1..=65535`
    ///
    /// # Example
    /// ```rust
    /// use crawlmap::utils::Address;
    ///
    /// let addr = Address::parse("example.com/about").unwrap();
    /// assert_eq!(addr.as_str(), "http://example.com/about");
    /// ```
    pub fn parse(input: &str) -> Result<Address, AddressError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(AddressError::Empty);
        }

        let (scheme, rest) = if let Some(rest) = input.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else if let Some(rest) = input.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if input.contains("://") || has_foreign_scheme(input) {
            return Err(AddressError::InvalidScheme);
        } else {
            (Scheme::Http, input)
        };

        let host: String = if rest.starts_with('[') {
            rest.chars()
                .take_while(|c| *c != ']')
                .chain(std::iter::once(']'))
                .collect()
        } else {
            rest.chars()
                .take_while(|c| *c != ':' && *c != '/')
                .collect()
        };

        let host_kind = HostKind::detect(&host)?;

        let after_host = rest.get(host.len()..).ok_or(AddressError::InvalidHost)?;
        // A bracketed host must run straight into the port or the path.
        if !after_host.is_empty() && !after_host.starts_with(':') && !after_host.starts_with('/') {
            return Err(AddressError::InvalidHost);
        }

        let (port, path_part) = if let Some(port_part) = after_host.strip_prefix(':') {
            let digits: String = port_part
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            let port = match digits.parse::<u16>() {
                Ok(0) | Err(_) => return Err(AddressError::InvalidPort),
                Ok(port) => port,
            };

            let remainder = &port_part[digits.len()..];
            if !remainder.is_empty() && !remainder.starts_with('/') {
                return Err(AddressError::InvalidPort);
            }
            (port, remainder)
        } else {
            (scheme.default_port(), after_host)
        };

        let path = if path_part.is_empty() {
            "/".to_string()
        } else {
            path_part.to_string()
        };

        let normalized = format!(
            "{}://{}{}{}",
            scheme,
            host,
            match port == scheme.default_port() {
                true => String::new(),
                false => format!(":{}", port),
            },
            path
        );

        Ok(Address {
            scheme,
            host,
            host_kind,
            port,
            path,
            normalized,
        })
    }

    /// The scheme of the address.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The host portion (IPv6 hosts keep their brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The kind of host.
    pub fn host_kind(&self) -> HostKind {
        self.host_kind
    }

    /// The effective port: the explicit one, or the scheme default.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The path, `/` at minimum.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The authority of the address: the host, plus the port when it is
    /// not the scheme default. Relative references resolve against this.
    pub fn authority(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// The full normalized address string.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }
}

/// Detects inputs that carry a non-web scheme without `//`, such as
/// `mailto:user@host` or `javascript:void(0)`. A `host:port` pair is not a
/// scheme: the part after the colon starts with a digit.
fn has_foreign_scheme(input: &str) -> bool {
    let Some(colon) = input.find(':') else {
        return false;
    };

    let candidate = &input[..colon];
    if candidate.is_empty()
        || !candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return false;
    }

    !input[colon + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl FromStr for Address {
    type Err = AddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Address::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_address_valid_http_dns() {
        let addr = Address::parse("http://example.com").unwrap();
        assert_eq!(addr.scheme(), Scheme::Http);
        assert_eq!(addr.host(), "example.com");
        assert_eq!(addr.host_kind(), HostKind::Dns);
        assert_eq!(addr.port(), 80);
        assert_eq!(addr.path(), "/");
        assert_eq!(addr.as_str(), "http://example.com/");
    }

    #[test]
    fn test_url_address_scheme_defaulted() {
        let addr = Address::parse("example.com/about").unwrap();
        assert_eq!(addr.scheme(), Scheme::Http);
        assert_eq!(addr.as_str(), "http://example.com/about");
    }

    #[test]
    fn test_url_address_default_port_dropped() {
        let explicit = Address::parse("http://example.com:80/a").unwrap();
        let implied = Address::parse("http://example.com/a").unwrap();
        assert_eq!(explicit, implied);
        assert_eq!(explicit.as_str(), "http://example.com/a");
    }

    #[test]
    fn test_url_address_custom_port_kept() {
        let addr = Address::parse("http://localhost:8080/x").unwrap();
        assert_eq!(addr.port(), 8080);
        assert_eq!(addr.as_str(), "http://localhost:8080/x");
    }

    #[test]
    fn test_url_address_authority_includes_non_default_port() {
        assert_eq!(
            Address::parse("http://localhost:8080/x").unwrap().authority(),
            "localhost:8080"
        );
        assert_eq!(
            Address::parse("http://example.com/").unwrap().authority(),
            "example.com"
        );
    }

    #[test]
    fn test_url_address_https_with_path() {
        let addr = Address::parse("https://example.com/test/path").unwrap();
        assert_eq!(addr.scheme(), Scheme::Https);
        assert_eq!(addr.port(), 443);
        assert_eq!(addr.path(), "/test/path");
        assert_eq!(addr.as_str(), "https://example.com/test/path");
    }

    #[test]
    fn test_url_address_valid_ipv4() {
        let addr = Address::parse("http://127.0.0.1:4221").unwrap();
        assert_eq!(addr.host(), "127.0.0.1");
        assert_eq!(addr.host_kind(), HostKind::IPv4);
        assert_eq!(addr.port(), 4221);
    }

    #[test]
    fn test_url_address_valid_ipv6() {
        let addr = Address::parse("http://[::1]:8000").unwrap();
        assert_eq!(addr.host(), "[::1]");
        assert_eq!(addr.host_kind(), HostKind::IPv6);
        assert_eq!(addr.as_str(), "http://[::1]:8000/");
    }

    #[test]
    fn test_url_address_bare_ipv6_without_scheme() {
        let addr = Address::parse("[::1]:9000/x").unwrap();
        assert_eq!(addr.host_kind(), HostKind::IPv6);
        assert_eq!(addr.as_str(), "http://[::1]:9000/x");
    }

    #[test]
    fn test_url_address_equality_is_exact_normalized_string() {
        let a = Address::parse("http://a/").unwrap();
        let b = Address::parse("http://a").unwrap();
        let c = Address::parse("http://a/b").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_url_address_direct_parse_and_try_from() {
        let addr = "http://example.com:33".parse::<Address>().unwrap();
        assert_eq!(addr.port(), 33);
        let addr2 = Address::try_from("http://example.com").unwrap();
        assert_eq!(addr2.as_str(), "http://example.com/");
    }

    #[test]
    fn test_url_address_invalid_empty() {
        assert_eq!(Address::parse("  "), Err(AddressError::Empty));
    }

    #[test]
    fn test_url_address_invalid_scheme() {
        assert_eq!(
            Address::parse("ftp://example.com"),
            Err(AddressError::InvalidScheme)
        );
        assert_eq!(
            Address::parse("mailto:someone@example.com"),
            Err(AddressError::InvalidScheme)
        );
        assert_eq!(
            Address::parse("javascript:void(0)"),
            Err(AddressError::InvalidScheme)
        );
    }

    #[test]
    fn test_url_address_invalid_host() {
        assert_eq!(
            Address::parse("http://exa$mple.com"),
            Err(AddressError::InvalidHost)
        );
        assert_eq!(
            Address::parse("http:///nohost"),
            Err(AddressError::InvalidHost)
        );
    }

    #[test]
    fn test_url_address_bracketed_host_with_trailing_junk() {
        assert_eq!(
            Address::parse("http://[::1]x:80"),
            Err(AddressError::InvalidHost)
        );
        assert_eq!(
            Address::parse("[::1]junk/path"),
            Err(AddressError::InvalidHost)
        );
        assert_eq!(
            Address::parse("http://[::1"),
            Err(AddressError::InvalidHost)
        );
    }

    #[test]
    fn test_url_address_invalid_port() {
        assert_eq!(
            Address::parse("http://example.com:abcd"),
            Err(AddressError::InvalidPort)
        );
        assert_eq!(
            Address::parse("http://example.com:70000"),
            Err(AddressError::InvalidPort)
        );
        assert_eq!(
            Address::parse("http://example.com:0"),
            Err(AddressError::InvalidPort)
        );
    }
}
