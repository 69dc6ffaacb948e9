//! Text-level helpers for icon markup.
//!
//! Icon files are injected verbatim, so the only structural edit the loader
//! makes is adding a class to the root `<svg>` element. That is done with a
//! small quote-aware scan of the open tag rather than a full XML parse,
//! leaving the rest of the markup byte-for-byte intact.

/// Location of an open tag within a markup string.
struct OpenTag {
    /// Index just past the tag name, where attributes begin.
    attrs_start: usize,
    /// Index of the closing `>`.
    end: usize,
}

/// Location of a `class` attribute value within an attribute list.
struct ClassAttr {
    /// Start of the raw value, including any opening quote.
    raw_start: usize,
    /// End of the raw value, including any closing quote.
    raw_end: usize,
    /// Start and end of the unquoted value.
    value: (usize, usize),
}

/// Adds `class` to the first open tag named `tag`.
///
/// The class is appended to an existing `class` attribute, or a new attribute
/// is inserted before the end of the tag. A class already present is not
/// repeated. Returns `None` if the markup contains no such tag.
///
/// ```
/// use svg_icon_loader::add_class_to_tag;
///
/// let out = add_class_to_tag(r#"<svg viewBox="0 0 24 24"><path/></svg>"#, "svg", "icon-svg");
/// assert_eq!(out.as_deref(), Some(r#"<svg viewBox="0 0 24 24" class="icon-svg"><path/></svg>"#));
/// ```
pub fn add_class_to_tag(markup: &str, tag: &str, class: &str) -> Option<String> {
    let open = find_open_tag(markup, tag)?;
    let attrs = &markup[open.attrs_start..open.end];
    let mut out = String::with_capacity(markup.len() + class.len() + 10);

    match find_class_attr(attrs) {
        Some(attr) => {
            let value = &attrs[attr.value.0..attr.value.1];
            if value.split_ascii_whitespace().any(|token| token == class) {
                return Some(markup.to_string());
            }
            let mut tokens: Vec<&str> = value.split_ascii_whitespace().collect();
            tokens.push(class);

            out.push_str(&markup[..open.attrs_start + attr.raw_start]);
            out.push('"');
            out.push_str(&tokens.join(" "));
            out.push('"');
            out.push_str(&markup[open.attrs_start + attr.raw_end..]);
        }
        None => {
            let trimmed = attrs.trim_end();
            let insert_at = if trimmed.ends_with('/') {
                open.attrs_start + trimmed.len() - 1
            } else {
                open.end
            };
            let needs_space = !markup[..insert_at].ends_with(char::is_whitespace);

            out.push_str(&markup[..insert_at]);
            if needs_space {
                out.push(' ');
            }
            out.push_str("class=\"");
            out.push_str(class);
            out.push('"');
            out.push_str(&markup[insert_at..]);
        }
    }

    Some(out)
}

/// Returns the class tokens of the first open tag named `tag`.
///
/// A tag without a `class` attribute yields an empty list; a missing tag
/// yields `None`.
pub fn tag_classes(markup: &str, tag: &str) -> Option<Vec<String>> {
    let open = find_open_tag(markup, tag)?;
    let attrs = &markup[open.attrs_start..open.end];

    Some(match find_class_attr(attrs) {
        Some(attr) => attrs[attr.value.0..attr.value.1]
            .split_ascii_whitespace()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    })
}

/// Escapes text so it can be stored as markup content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns the character data of `markup` with tags removed and the basic
/// entities decoded.
pub fn text_of(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        match find_tag_end(rest, lt + 1) {
            Some(gt) => rest = &rest[gt + 1..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

// ============================================================================
// Scanning
// ============================================================================

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn find_open_tag(markup: &str, tag: &str) -> Option<OpenTag> {
    let mut search = 0;

    while let Some(rel) = markup[search..].find('<') {
        let name_start = search + rel + 1;
        let name_len = markup[name_start..]
            .find(|c: char| !is_name_char(c))
            .unwrap_or(markup.len() - name_start);

        if markup[name_start..].starts_with("!--") {
            let close = markup[name_start..].find("-->")?;
            search = name_start + close + 3;
            continue;
        }

        // Closing tags and declarations have no leading name.
        if name_len == 0 {
            search = name_start;
            continue;
        }

        let attrs_start = name_start + name_len;
        let end = find_tag_end(markup, attrs_start)?;
        if markup[name_start..attrs_start].eq_ignore_ascii_case(tag) {
            return Some(OpenTag { attrs_start, end });
        }
        search = end + 1;
    }

    None
}

/// Index of the first `>` at or after `from` that is not inside quotes.
fn find_tag_end(markup: &str, from: usize) -> Option<usize> {
    let mut quote = None;

    for (offset, c) in markup[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(from + offset),
            (None, _) => {}
        }
    }

    None
}

fn find_class_attr(attrs: &str) -> Option<ClassAttr> {
    let bytes = attrs.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'/' | b'>')
        {
            i += 1;
        }
        let name = &attrs[name_start..i];
        if name.is_empty() {
            break;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            // Boolean attribute.
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let raw_start = i;
        let (value, raw_end) = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let close = attrs[i + 1..].find(q as char).map(|p| i + 1 + p)?;
                ((i + 1, close), close + 1)
            }
            _ => {
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                ((raw_start, i), i)
            }
        };
        i = raw_end;

        if name.eq_ignore_ascii_case("class") {
            return Some(ClassAttr {
                raw_start,
                raw_end,
                value,
            });
        }
    }

    None
}

// ============================================================================
// Tests
// ============================================================================
