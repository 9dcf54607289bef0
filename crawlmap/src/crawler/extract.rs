//! Link extractor: a lightweight scan for anchor-style references.
//!
//! This is not an HTML parser. The body is scanned for `href="` attributes
//! and each captured reference is turned into an absolute [`Address`]:
//! absolute `http`/`https` references parse as-is, anything else is treated
//! as a path on the source host. In-page script triggers (`javascript:`)
//! and mail composition links (`mailto:`) are discarded, as are references
//! that fail to parse.
//!
//! Output preserves discovery order and keeps duplicates; deduplication is
//! the visited set's job, not the extractor's.

use crate::utils::Address;

const HREF_MARKER: &str = "href=\"";

/// Scans `body` for references and resolves them against `source_host`.
pub fn extract_links(body: &[u8], source_host: &str) -> Vec<Address> {
    let content = String::from_utf8_lossy(body);
    let mut links = Vec::new();
    let mut index = 0;

    while let Some(found) = content[index..].find(HREF_MARKER) {
        let start = index + found + HREF_MARKER.len();
        let Some(len) = content[start..].find('"') else {
            // Unterminated attribute, nothing more to scan.
            break;
        };
        index = start + len + 1;

        let reference = &content[start..start + len];
        if reference.starts_with("javascript:") || reference.starts_with("mailto:") {
            continue;
        }

        let absolute = if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else if reference.starts_with('/') {
            format!("http://{}{}", source_host, reference)
        } else {
            format!("http://{}/{}", source_host, reference)
        };

        if let Ok(address) = Address::parse(&absolute) {
            links.push(address);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(body: &str, host: &str) -> Vec<String> {
        extract_links(body.as_bytes(), host)
            .into_iter()
            .map(|a| a.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_extract_empty_body_yields_nothing() {
        assert!(extract("", "example.com").is_empty());
        assert!(extract("<p>no links here</p>", "example.com").is_empty());
    }

    #[test]
    fn test_extract_absolute_and_relative_references() {
        let body = r#"<a href="http://other.com/page">x</a> <a href="/about">y</a>"#;
        assert_eq!(
            extract(body, "example.com"),
            vec!["http://other.com/page", "http://example.com/about"]
        );
    }

    #[test]
    fn test_extract_relative_without_leading_slash() {
        let body = r#"<a href="docs/index.html">x</a>"#;
        assert_eq!(
            extract(body, "example.com"),
            vec!["http://example.com/docs/index.html"]
        );
    }

    #[test]
    fn test_extract_discards_script_and_mail_references() {
        let body = r#"
            <a href="javascript:void(0)">j</a>
            <a href="mailto:someone@example.com">m</a>
            <a href="/about">a</a>
        "#;
        assert_eq!(extract(body, "example.com"), vec!["http://example.com/about"]);
    }

    #[test]
    fn test_extract_keeps_https_references_for_the_fetcher_to_reject() {
        let body = r#"<a href="https://secure.example.com/">s</a>"#;
        assert_eq!(
            extract(body, "example.com"),
            vec!["https://secure.example.com/"]
        );
    }

    #[test]
    fn test_extract_keeps_duplicates_within_one_body() {
        let body = r#"<a href="/b">1</a><a href="/b">2</a><a href="/">self</a>"#;
        assert_eq!(
            extract(body, "a"),
            vec!["http://a/b", "http://a/b", "http://a/"]
        );
    }

    #[test]
    fn test_extract_is_idempotent() {
        let body = r#"<a href="/one">1</a><a href="two">2</a>"#.as_bytes();
        let first = extract_links(body, "example.com");
        let second = extract_links(body, "example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_unterminated_href_stops_scan() {
        let body = r#"<a href="/ok">x</a><a href="/broken"#;
        assert_eq!(extract(body, "example.com"), vec!["http://example.com/ok"]);
    }

    #[test]
    fn test_extract_drops_malformed_references() {
        let body = r#"<a href="http://bad host/">x</a><a href="/fine">y</a>"#;
        assert_eq!(extract(body, "example.com"), vec!["http://example.com/fine"]);
    }
}
