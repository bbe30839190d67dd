// src/core/html.rs
// Case-insensitive scanning helpers. Tag and attribute names are ASCII, so
// lowercasing never shifts byte offsets and indices found in the lowered copy
// are valid in the original.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Visible text of the first `<a …>` whose opening tag contains `href_needle`
/// (case-insensitive), e.g. `demo=males`. Nested markup is stripped and
/// entities are decoded.
pub fn anchor_text_by_href(doc: &str, href_needle: &str) -> Option<String> {
    let lc = to_lower(doc);
    let needle = to_lower(href_needle);
    let bytes = lc.as_bytes();
    let mut from = 0usize;

    while let Some(rel) = lc.get(from..)?.find("<a") {
        let start = from + rel;
        from = start + 2;

        // `<a>` or `<a href…>`, not `<abbr>` / `<article>`
        match bytes.get(start + 2) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' => {}
            _ => continue,
        }

        let open_end = start + lc[start..].find('>')?;
        let opener = &lc[start..open_end];
        if !(opener.contains("href") && opener.contains(&needle)) {
            continue;
        }

        let inner_start = open_end + 1;
        let inner_end = inner_start + lc[inner_start..].find("</a")?;
        let inner = super::sanitize::normalize_entities(&doc[inner_start..inner_end]);
        return Some(strip_tags(inner));
    }
    None
}
