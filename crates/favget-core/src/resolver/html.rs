//! `<link rel="icon">` extraction from raw HTML.
//!
//! Pages are scanned with patterns, not parsed. Attribute order,
//! quoting style and case do not matter.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("static regex"));

static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\b([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("static regex")
});

/// Returns the raw `href` of every `<link>` whose `rel` contains the `icon`
/// token (`icon`, `shortcut icon`), in document order.
pub fn extract_icon_links(html: &str) -> Vec<String> {
    let mut out = Vec::new();
    for tag in LINK_TAG.find_iter(html) {
        let mut rel = None;
        let mut href = None;
        for cap in ATTR.captures_iter(tag.as_str()) {
            let name = cap[1].to_ascii_lowercase();
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|m| m.as_str())
                .unwrap_or("");
            match name.as_str() {
                "rel" if rel.is_none() => rel = Some(value.to_ascii_lowercase()),
                "href" if href.is_none() => href = Some(value.trim().to_string()),
                _ => {}
            }
        }
        let is_icon = rel
            .as_deref()
            .map(|r| r.split_ascii_whitespace().any(|t| t == "icon"))
            .unwrap_or(false);
        match href {
            Some(h) if is_icon && !h.is_empty() => out.push(decode_entities(&h)),
            _ => {}
        }
    }
    out
}

/// Decodes the few entities that show up in `href` values.
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&#38;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_and_shortcut_icon_in_document_order() {
        let html = r#"<html><head>
            <link rel="icon" href="/a.png">
            <link rel="stylesheet" href="/style.css">
            <link rel="shortcut icon" href="/b.png">
        </head></html>"#;
        assert_eq!(extract_icon_links(html), vec!["/a.png", "/b.png"]);
    }

    #[test]
    fn attribute_order_quotes_and_case() {
        let html = r#"
            <LINK HREF='/c.ico' REL='Shortcut Icon'>
            <link type="image/png" href=/d.png rel=icon />
            <link
                sizes="32x32"
                rel="icon"
                href="https://cdn.example.com/e.png?v=1&amp;w=32">
        "#;
        assert_eq!(
            extract_icon_links(html),
            vec![
                "/c.ico",
                "/d.png",
                "https://cdn.example.com/e.png?v=1&w=32"
            ]
        );
    }

    #[test]
    fn apple_touch_icon_and_empty_href_skipped() {
        let html = r#"
            <link rel="apple-touch-icon" href="/apple.png">
            <link rel="icon" href="">
            <link rel="icon">
            <link rel="mask-icon" href="/mask.svg">
        "#;
        assert!(extract_icon_links(html).is_empty());
    }

    #[test]
    fn data_attributes_do_not_shadow_href() {
        let html = r#"<link data-href="/wrong.png" rel="icon" href="/right.png">"#;
        assert_eq!(extract_icon_links(html), vec!["/right.png"]);
    }
}
