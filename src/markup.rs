//! Tiny helpers for building HTML strings.

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Scheme of `url`, if it has one: a `:` before any `/`, `?` or `#`.
fn scheme(url: &str) -> Option<&str> {
    let end = url.find(['/', '?', '#']).unwrap_or(url.len());
    url[..end].find(':').map(|i| &url[..i])
}

/// Only `http(s)` and scheme-less (absolute or relative) URLs make it into
/// an `href`/`src`.
pub fn safe_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let allowed = match scheme(trimmed) {
        None => true,
        Some(s) => s.eq_ignore_ascii_case("https") || s.eq_ignore_ascii_case("http"),
    };
    allowed.then(|| escape(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn rejects_script_urls() {
        assert_eq!(safe_url("javascript:alert(1)"), None);
        assert_eq!(safe_url(" https://example.com/?a=1&b=2 ").as_deref(), Some("https://example.com/?a=1&amp;b=2"));
        assert_eq!(safe_url("/pages/about.html").as_deref(), Some("/pages/about.html"));
        assert_eq!(safe_url("data:text/html,x"), None);
        assert_eq!(safe_url(" JavaScript:void(0)"), None);
        assert_eq!(safe_url(""), None);
    }

    #[test]
    fn keeps_relative_urls() {
        assert_eq!(safe_url("../pages/about.html").as_deref(), Some("../pages/about.html"));
        assert_eq!(safe_url("./x.html").as_deref(), Some("./x.html"));
        assert_eq!(safe_url("about.html?tab=a:b").as_deref(), Some("about.html?tab=a:b"));
        assert_eq!(safe_url("#contact").as_deref(), Some("#contact"));
    }
}
