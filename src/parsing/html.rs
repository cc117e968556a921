use crate::models::RawBlock;

/// Class carried by every record element on a caller page.
pub const CALL_BOX_CLASS: &str = "call-box";

const BLOCK_TAGS: &[&str] = &[
    "br", "div", "p", "li", "tr", "td", "th", "ul", "ol", "table", "section", "article",
    "header", "footer", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Every call-box element on the page as a text block, in page order.
pub fn call_blocks(html: &str) -> Vec<RawBlock> {
    elements_with_class(html, CALL_BOX_CLASS)
        .into_iter()
        .map(|inner| RawBlock::new(text_lines(inner)))
        .collect()
}

/// Inner markup of each element whose class list contains `class`.
/// Matches nested elements are not reported separately.
pub fn elements_with_class<'a>(html: &'a str, class: &str) -> Vec<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lc = html.to_ascii_lowercase();
    let class = class.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut from = 0;

    while let Some(rel) = lc[from..].find('<') {
        let start = from + rel;
        let Some(end) = tag_end(&lc, start) else {
            break;
        };
        let open_end = end + 1;
        let tag = &lc[start..open_end];
        from = open_end;

        if tag.starts_with("</") || tag.starts_with("<!") || tag.ends_with("/>") {
            continue;
        }
        if !has_class(tag, &class) {
            continue;
        }

        let name = tag_name(tag);
        if let Some(close) = matching_close(&lc, name, open_end) {
            out.push(&html[open_end..close]);
            from = close;
        }
    }
    out
}

/// Visible text of a fragment, one entry per rendered line.
pub fn text_lines(fragment: &str) -> Vec<String> {
    let mut text = String::with_capacity(fragment.len());
    let mut tag = String::new();
    let mut in_tag = false;
    let mut quote: Option<char> = None;

    for ch in fragment.chars() {
        match ch {
            _ if quote.is_some() => {
                if quote == Some(ch) {
                    quote = None;
                }
                tag.push(ch);
            }
            '"' | '\'' if in_tag => {
                quote = Some(ch);
                tag.push(ch);
            }
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if is_block_tag(&tag) {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => text.push(ch),
        }
    }

    decode_entities(&text)
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect()
}

/// Offset of the `>` closing the tag that opens at `start`. A `>` inside a
/// quoted attribute value does not close it.
fn tag_end(s: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in s[start..].char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(start + i),
            _ => {}
        }
    }
    None
}

fn tag_name(tag: &str) -> &str {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or("")
}

fn is_block_tag(inner: &str) -> bool {
    let name = inner
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

fn has_class(tag: &str, class: &str) -> bool {
    let mut search = 0;
    while let Some(rel) = tag[search..].find("class=") {
        let pos = search + rel;
        search = pos + 6;
        let preceded_by_space = tag[..pos]
            .chars()
            .last()
            .map(char::is_whitespace)
            .unwrap_or(false);
        if !preceded_by_space {
            continue;
        }

        let rest = &tag[pos + 6..];
        let value = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => rest[1..].split(q).next().unwrap_or(""),
            _ => rest
                .split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or(""),
        };
        return value.split_whitespace().any(|c| c == class);
    }
    false
}

/// Start offset of the close tag balancing an element opened before `from`.
fn matching_close(lc: &str, name: &str, from: usize) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    let open_pat = format!("<{}", name);
    let close_pat = format!("</{}", name);
    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let next_close = find_tag(lc, &close_pat, pos)?;
        match find_tag(lc, &open_pat, pos) {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + open_pat.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                pos = next_close + close_pat.len();
            }
        }
    }
}

/// Next `pat` at or after `from` that is a whole tag name (`<div` but not `<divider`).
fn find_tag(lc: &str, pat: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let at = pos + lc.get(pos..)?.find(pat)?;
        let after = lc[at + pat.len()..].chars().next();
        match after {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(at),
            None => return None,
            _ => pos = at + pat.len(),
        }
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
