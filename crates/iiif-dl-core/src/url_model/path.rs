//! Last path segment of a URL.

/// Returns the last non-empty path segment of `url`, query and fragment excluded.
///
/// Falls back to plain string splitting when `url` does not parse, so relative
/// or malformed entries still get a name.
pub fn last_path_segment(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or("");
            path.split('/').rfind(|s| !s.is_empty()).map(str::to_string)
        }
    }?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            last_path_segment("https://example.com/a/b/file.jpg").as_deref(),
            Some("file.jpg")
        );
        assert_eq!(
            last_path_segment("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn trailing_slash_uses_previous_segment() {
        assert_eq!(
            last_path_segment("https://example.com/a/b/").as_deref(),
            Some("b")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(last_path_segment("https://example.com/"), None);
        assert_eq!(last_path_segment("https://example.com"), None);
    }

    #[test]
    fn with_query() {
        assert_eq!(
            last_path_segment("https://example.com/file.png?token=abc").as_deref(),
            Some("file.png")
        );
    }

    #[test]
    fn unparsable_input() {
        assert_eq!(
            last_path_segment("scans/p1.png?x=1").as_deref(),
            Some("p1.png")
        );
    }
}
