use url::Url;

/// Folder prefix of a page URL, e.g. `https://example.com/blog/post` -> `/blog/`.
///
/// Returns `None` when the URL has nothing after the host.
pub fn trail_of(url: &str) -> Option<String> {
    let parts: Vec<&str> = url.splitn(4, '/').collect();
    if parts.len() < 4 {
        return None;
    }

    let segment = parts[3].split('/').next().unwrap_or_default();
    Some(format!("/{}/", segment))
}

/// `site:` search operator for a page, with a leading `www.` dropped from the host.
pub fn site_query(page: &str) -> String {
    match Url::parse(page) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            let host = host.strip_prefix("www.").unwrap_or(host);
            let path = if url.path() == "/" { "" } else { url.path() };
            format!("site:{}{}", host, path)
        }
        // Not an absolute URL; strip what looks like a scheme and use the rest
        Err(_) => {
            let rest = page.split_once("://").map_or(page, |(_, rest)| rest);
            let rest = rest.strip_prefix("www.").unwrap_or(rest);
            format!("site:{}", rest.trim_end_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trail_of_first_segment() {
        assert_eq!(
            trail_of("https://example.com/blog/post1"),
            Some("/blog/".to_string())
        );
        assert_eq!(
            trail_of("https://example.com/shop/item/42"),
            Some("/shop/".to_string())
        );
    }

    #[test]
    fn test_trail_of_root_page() {
        // "https:", "", "example.com", "" -> empty segment, still counted
        assert_eq!(trail_of("https://example.com/"), Some("//".to_string()));
    }

    #[test]
    fn test_trail_of_without_path() {
        assert_eq!(trail_of("https://example.com"), None);
        assert_eq!(trail_of("not a url"), None);
    }

    #[test]
    fn test_site_query_strips_www() {
        assert_eq!(
            site_query("https://www.example.com/blog/post1"),
            "site:example.com/blog/post1"
        );
    }

    #[test]
    fn test_site_query_keeps_other_subdomains() {
        assert_eq!(
            site_query("https://shop.example.com/item"),
            "site:shop.example.com/item"
        );
        assert_eq!(
            site_query("https://www2.example.com/"),
            "site:www2.example.com"
        );
    }

    #[test]
    fn test_site_query_root() {
        assert_eq!(site_query("https://www.example.com/"), "site:example.com");
    }
}
