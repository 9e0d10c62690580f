//! URL values and relative resolution.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! The pipeline never fetches anything itself, but hit testing must turn a
//! clicked `href` into an absolute navigation target, and form submission
//! must produce an absolute action URL plus an encoded body. This module
//! provides the value type those operations share.

use std::fmt;

use thiserror::Error;

/// Error produced when a URL string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlParseError {
    /// The scheme is not one we know how to represent.
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    /// The string has no `scheme://` separator.
    #[error("missing scheme separator in '{0}'")]
    MissingScheme(String),
    /// The port component is not a valid number.
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

/// [URL Standard § 4.1](https://url.spec.whatwg.org/#url-representation)
///
/// "A URL's scheme is an ASCII string that identifies the type of URL."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `http://`, default port 80.
    Http,
    /// `https://`, default port 443.
    Https,
    /// `file://`, no host or port.
    File,
}

impl Scheme {
    /// [URL Standard § 4.2](https://url.spec.whatwg.org/#special-scheme)
    ///
    /// "A special scheme is an ASCII string listed in the first column of
    /// the following table" — with its associated default port.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
            Scheme::File => 0,
        }
    }

    /// The scheme's canonical ASCII form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::File => "file",
        }
    }
}

/// A parsed absolute URL.
///
/// [URL Standard § 4.1](https://url.spec.whatwg.org/#url-representation)
///
/// "A URL is a struct that represents a universal identifier. ... A URL's
/// host is null or a host. A URL's port is null or a 16-bit unsigned
/// integer. A URL has an associated URL path."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// The URL scheme.
    pub scheme: Scheme,
    /// The host name (empty for `file` URLs).
    pub host: String,
    /// The port, defaulted from the scheme when not written out.
    pub port: u16,
    /// The path, always starting with `/`, including any query string.
    pub path: String,
}

impl Url {
    /// Parse an absolute URL string.
    ///
    /// [URL Standard § 4.4](https://url.spec.whatwg.org/#url-parsing)
    ///
    /// A missing path component is normalized to `/`, and an explicit
    /// `host:port` overrides the scheme's default port.
    ///
    /// # Errors
    ///
    /// Returns [`UrlParseError`] when the scheme is missing or unsupported,
    /// or the port is not numeric.
    pub fn parse(input: &str) -> Result<Self, UrlParseError> {
        let (scheme_str, rest) = input
            .split_once("://")
            .ok_or_else(|| UrlParseError::MissingScheme(input.to_string()))?;

        let scheme = match scheme_str {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            "file" => Scheme::File,
            other => return Err(UrlParseError::UnsupportedScheme(other.to_string())),
        };

        if scheme == Scheme::File {
            // file URLs carry no authority worth modeling; the whole
            // remainder is the path.
            let path = if rest.starts_with('/') {
                rest.to_string()
            } else {
                format!("/{rest}")
            };
            return Ok(Url {
                scheme,
                host: String::new(),
                port: 0,
                path,
            });
        }

        // "If url includes credentials or a host, and the remaining input
        // contains a '/', everything before it is the host."
        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], rest[idx..].to_string()),
            None => (rest, "/".to_string()),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port_str)) => {
                let port: u16 = port_str
                    .parse()
                    .map_err(|_| UrlParseError::InvalidPort(port_str.to_string()))?;
                (host.to_string(), port)
            }
            None => (authority.to_string(), scheme.default_port()),
        };

        Ok(Url {
            scheme,
            host,
            port,
            path,
        })
    }

    /// Resolve a potentially relative `href` against this URL.
    ///
    /// [URL Standard § 4.4](https://url.spec.whatwg.org/#url-parsing)
    /// [HTML § 2.5.3 Resolving URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
    ///
    /// Handles the cases a click can produce:
    /// - absolute URLs pass through unchanged
    /// - `//host/path` keeps this URL's scheme
    /// - `/path` keeps this URL's origin
    /// - everything else is joined onto this URL's directory, with `.` and
    ///   `..` segments collapsed
    ///
    /// # Errors
    ///
    /// Returns [`UrlParseError`] only for absolute or protocol-relative
    /// inputs that themselves fail to parse.
    pub fn resolve(&self, href: &str) -> Result<Self, UrlParseError> {
        if href.contains("://") {
            return Self::parse(href);
        }
        if let Some(rest) = href.strip_prefix("//") {
            return Self::parse(&format!("{}://{rest}", self.scheme.as_str()));
        }

        let mut resolved = self.clone();
        if href.starts_with('/') {
            resolved.path = normalize_path(href);
        } else if let Some(fragment) = href.strip_prefix('#') {
            // Same-document reference: keep the path, swap the fragment.
            let base = self.path.split('#').next().unwrap_or("/");
            resolved.path = format!("{base}#{fragment}");
        } else {
            // Join onto the base directory.
            let dir = match self.path.rsplit_once('/') {
                Some((dir, _)) => dir,
                None => "",
            };
            resolved.path = normalize_path(&format!("{dir}/{href}"));
        }
        Ok(resolved)
    }

    /// The origin portion, `scheme://host[:port]`, with default ports
    /// omitted.
    #[must_use]
    pub fn origin(&self) -> String {
        if self.port == self.scheme.default_port() {
            format!("{}://{}", self.scheme.as_str(), self.host)
        } else {
            format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.path)
    }
}

/// Collapse `.` and `..` segments in an absolute path.
///
/// [URL Standard § 4.4.9 Path state](https://url.spec.whatwg.org/#path-state)
///
/// "If buffer is a double-dot URL path segment, shorten url's path. ...
/// If buffer is a single-dot URL path segment, do nothing."
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                let _ = segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut out = String::from("/");
    out.push_str(&segments.join("/"));
    // Preserve a trailing slash (a directory reference).
    if path.ends_with('/') && out.len() > 1 {
        out.push('/');
    }
    out
}

/// Percent-encode a string for use in a form body.
///
/// [URL Standard § 1.3 Percent-encoded bytes](https://url.spec.whatwg.org/#percent-encoded-bytes)
///
/// "To percent-encode a byte, return a string consisting of U+0025 (%),
/// followed by two ASCII upper hex digits representing byte."
///
/// Unreserved characters pass through and space becomes `+`, matching
/// `application/x-www-form-urlencoded` serialization.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            other => {
                out.push_str(&format!("%{other:02X}"));
            }
        }
    }
    out
}

/// Serialize `name=value` pairs as an `application/x-www-form-urlencoded`
/// body.
///
/// [URL Standard § 5.2](https://url.spec.whatwg.org/#urlencoded-serializing)
///
/// "For each tuple of query: ... append name, followed by U+003D (=),
/// followed by value, to output, separated by U+0026 (&)."
#[must_use]
pub fn form_urlencode(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let url = Url::parse("http://example.org/index.html").unwrap();
        assert_eq!(url.scheme, Scheme::Http);
        assert_eq!(url.host, "example.org");
        assert_eq!(url.port, 80);
        assert_eq!(url.path, "/index.html");
    }

    #[test]
    fn test_parse_defaults_path_and_port() {
        let url = Url::parse("https://example.org").unwrap();
        assert_eq!(url.port, 443);
        assert_eq!(url.path, "/");
    }

    #[test]
    fn test_parse_explicit_port() {
        let url = Url::parse("http://localhost:8000/form").unwrap();
        assert_eq!(url.port, 8000);
        assert_eq!(url.to_string(), "http://localhost:8000/form");
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        assert_eq!(
            Url::parse("gopher://example.org/"),
            Err(UrlParseError::UnsupportedScheme("gopher".to_string()))
        );
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let base = Url::parse("http://example.org/a/b.html").unwrap();
        let resolved = base.resolve("https://other.net/x").unwrap();
        assert_eq!(resolved.to_string(), "https://other.net/x");
    }

    #[test]
    fn test_resolve_host_relative() {
        let base = Url::parse("http://example.org/a/b.html").unwrap();
        let resolved = base.resolve("/top.html").unwrap();
        assert_eq!(resolved.to_string(), "http://example.org/top.html");
    }

    #[test]
    fn test_resolve_path_relative() {
        let base = Url::parse("http://example.org/a/b.html").unwrap();
        let resolved = base.resolve("c.html").unwrap();
        assert_eq!(resolved.to_string(), "http://example.org/a/c.html");
    }

    #[test]
    fn test_resolve_dot_dot() {
        let base = Url::parse("http://example.org/a/b/c.html").unwrap();
        let resolved = base.resolve("../d.html").unwrap();
        assert_eq!(resolved.to_string(), "http://example.org/a/d.html");
    }

    #[test]
    fn test_resolve_scheme_relative() {
        let base = Url::parse("https://example.org/a.html").unwrap();
        let resolved = base.resolve("//cdn.example.org/lib.css").unwrap();
        assert_eq!(resolved.to_string(), "https://cdn.example.org/lib.css");
    }

    #[test]
    fn test_percent_encode_reserved() {
        assert_eq!(percent_encode("a b&c=d"), "a+b%26c%3Dd");
    }

    #[test]
    fn test_form_urlencode_pairs() {
        let body = form_urlencode(&[
            ("name".to_string(), "Ada Lovelace".to_string()),
            ("q".to_string(), "x&y".to_string()),
        ]);
        assert_eq!(body, "name=Ada+Lovelace&q=x%26y");
    }
}
