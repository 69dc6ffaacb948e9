//! The document surface the loader reads and mutates.
//!
//! The loader never owns markers; it queries them through [`Document`] and
//! only touches their class list and content. [`MemoryDocument`] is a small
//! arena-backed implementation used for tests and for rendering icons into
//! markup outside a browser. With the `web` feature, `web_sys::Document`
//! implements the trait as well.

use std::cell::RefCell;
use std::fmt;

use crate::error::SelectorError;
use crate::markup;

// ============================================================================
// Selector
// ============================================================================

/// A compound selector: optional tag, optional id, exact class tokens, and
/// class-attribute substring filters.
///
/// This is the subset of CSS the loader needs. It renders back to valid CSS
/// through [`Display`](fmt::Display), so DOM-backed documents can hand it to
/// `querySelectorAll` unchanged.
///
/// ```
/// use svg_icon_loader::Selector;
///
/// let selector = Selector::parse(r#"i[class*="icon-"]"#).unwrap();
/// assert_eq!(selector, Selector::new().tag("i").class_contains("icon-"));
/// assert_eq!(selector.to_string(), r#"i[class*="icon-"]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    class_contains: Vec<String>,
}

impl Selector {
    /// Creates a selector that matches every element.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Requires an exact class token.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Requires the class attribute to contain `fragment` anywhere.
    pub fn class_contains(mut self, fragment: impl Into<String>) -> Self {
        self.class_contains.push(fragment.into());
        self
    }

    /// Parses `tag#id.class[class*="fragment"]` in any combination.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selector = Self::new();
        let mut chars = input.char_indices().peekable();

        let tag = take_ident(&mut chars);
        if !tag.is_empty() {
            selector.tag = Some(tag);
        } else if let Some(&(_, '*')) = chars.peek() {
            chars.next();
        }

        while let Some((position, c)) = chars.next() {
            match c {
                '#' => {
                    let id = take_ident(&mut chars);
                    if id.is_empty() {
                        return Err(unexpected(&mut chars, input.len()));
                    }
                    selector.id = Some(id);
                }
                '.' => {
                    let class = take_ident(&mut chars);
                    if class.is_empty() {
                        return Err(unexpected(&mut chars, input.len()));
                    }
                    selector.classes.push(class);
                }
                '[' => {
                    let fragment = parse_class_contains(&input[position + 1..], position + 1)?;
                    // Skip the consumed attribute text.
                    for _ in 0..fragment.consumed {
                        chars.next();
                    }
                    selector.class_contains.push(fragment.value);
                }
                found => return Err(SelectorError::Unexpected { position, found }),
            }
        }

        Ok(selector)
    }

    /// Returns true if an element with the given properties matches.
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(want) = &self.tag {
            if !want.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if id != Some(want.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|want| classes.iter().any(|c| c == want)) {
            return false;
        }
        if !self.class_contains.is_empty() {
            let attr = classes.join(" ");
            if !self.class_contains.iter().all(|f| attr.contains(f.as_str())) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut empty = true;
        if let Some(tag) = &self.tag {
            f.write_str(&css_escape(tag))?;
            empty = false;
        }
        if let Some(id) = &self.id {
            write!(f, "#{}", css_escape(id))?;
            empty = false;
        }
        for class in &self.classes {
            write!(f, ".{}", css_escape(class))?;
            empty = false;
        }
        for fragment in &self.class_contains {
            let quoted = fragment.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, "[class*=\"{quoted}\"]")?;
            empty = false;
        }
        if empty {
            f.write_str("*")?;
        }
        Ok(())
    }
}

type CharStream<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut CharStream<'_>) -> String {
    let mut ident = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn unexpected(chars: &mut CharStream<'_>, len: usize) -> SelectorError {
    match chars.peek() {
        Some(&(position, found)) => SelectorError::Unexpected { position, found },
        None => SelectorError::Unexpected {
            position: len,
            found: '\0',
        },
    }
}

struct AttributeFragment {
    value: String,
    /// Characters consumed after the opening `[`, including the closing `]`.
    consumed: usize,
}

/// Parses `class*="value"]` (quotes optional) following an opening `[`.
fn parse_class_contains(rest: &str, offset: usize) -> Result<AttributeFragment, SelectorError> {
    let close = rest.find(']').ok_or(SelectorError::Unterminated)?;
    let body = &rest[..close];

    let (name, value) = body.split_once("*=").ok_or_else(|| {
        let position = body.find('=').unwrap_or(body.len());
        SelectorError::Unexpected {
            position: offset + position,
            found: body[position..].chars().next().unwrap_or(']'),
        }
    })?;
    if name.trim() != "class" {
        return Err(SelectorError::Unexpected {
            position: offset,
            found: name.chars().next().unwrap_or(']'),
        });
    }

    let value = value.trim();
    let value = match value.chars().next() {
        Some(q @ ('"' | '\'')) if value.len() >= 2 && value.ends_with(q) => &value[1..value.len() - 1],
        Some('"' | '\'') => return Err(SelectorError::Unterminated),
        _ => value,
    };

    Ok(AttributeFragment {
        value: value.replace("\\\"", "\"").replace("\\\\", "\\"),
        consumed: rest[..=close].chars().count(),
    })
}

fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for (i, c) in ident.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            // A bare `\2` would start a hex escape; spell the code point out.
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if is_ident_char(c) {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Document Trait
// ============================================================================

/// Query and mutation operations the loader needs from a host document.
///
/// Methods take `&self`; implementations that keep their own state use
/// interior mutability, matching how a browser DOM handle behaves.
pub trait Document {
    /// A reference to an element owned by the document.
    type Element: Clone;

    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &Selector) -> Vec<Self::Element>;

    /// The first element matching `selector`.
    fn query_selector(&self, selector: &Selector) -> Option<Self::Element> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// The first element matching a selector string supplied by a caller.
    ///
    /// Documents with a native selector engine should pass `css` through
    /// untouched. The default parses it as a [`Selector`] and returns `None`
    /// for anything outside that subset.
    fn query_selector_str(&self, css: &str) -> Option<Self::Element> {
        match Selector::parse(css) {
            Ok(selector) => self.query_selector(&selector),
            Err(err) => {
                log::debug!("unsupported selector {css:?}: {err}");
                None
            }
        }
    }

    /// The element's tag name, in whatever case the document reports it.
    fn tag_name(&self, element: &Self::Element) -> String;

    /// The element's class tokens.
    fn class_list(&self, element: &Self::Element) -> Vec<String>;

    /// Adds a class token unless already present.
    fn add_class(&self, element: &Self::Element, class: &str);

    /// Replaces the element's content with `html`.
    fn set_inner_html(&self, element: &Self::Element, html: &str);

    /// Replaces the element's content with plain text.
    fn set_text_content(&self, element: &Self::Element, text: &str);

    /// Adds `class` to the first descendant named `nested_tag`.
    ///
    /// Returns false if the element has no such descendant.
    fn add_nested_class(&self, element: &Self::Element, nested_tag: &str, class: &str) -> bool;
}

impl<D: Document + ?Sized> Document for &D {
    type Element = D::Element;

    fn query_selector_all(&self, selector: &Selector) -> Vec<Self::Element> {
        (**self).query_selector_all(selector)
    }

    fn query_selector(&self, selector: &Selector) -> Option<Self::Element> {
        (**self).query_selector(selector)
    }

    fn query_selector_str(&self, css: &str) -> Option<Self::Element> {
        (**self).query_selector_str(css)
    }

    fn tag_name(&self, element: &Self::Element) -> String {
        (**self).tag_name(element)
    }

    fn class_list(&self, element: &Self::Element) -> Vec<String> {
        (**self).class_list(element)
    }

    fn add_class(&self, element: &Self::Element, class: &str) {
        (**self).add_class(element, class)
    }

    fn set_inner_html(&self, element: &Self::Element, html: &str) {
        (**self).set_inner_html(element, html)
    }

    fn set_text_content(&self, element: &Self::Element, text: &str) {
        (**self).set_text_content(element, text)
    }

    fn add_nested_class(&self, element: &Self::Element, nested_tag: &str, class: &str) -> bool {
        (**self).add_nested_class(element, nested_tag, class)
    }
}

// ============================================================================
// MemoryDocument
// ============================================================================

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    /// Inner content as markup.
    content: String,
}

/// A flat, in-memory document.
///
/// Elements are kept in insertion order, which is also document order for
/// queries. Content is stored as a markup string.
///
/// ```
/// use svg_icon_loader::{Document, MemoryDocument, Selector};
///
/// let doc = MemoryDocument::new();
/// let star = doc.append("i", &["icon-star"]);
///
/// let found = doc.query_selector(&Selector::new().tag("i").class("icon-star"));
/// assert_eq!(found, Some(star));
/// ```
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<Node>>,
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element and returns its handle.
    pub fn append(&self, tag: &str, classes: &[&str]) -> ElementId {
        self.push(tag, None, classes)
    }

    /// Appends an element carrying an `id` attribute.
    pub fn append_with_id(&self, tag: &str, id: &str, classes: &[&str]) -> ElementId {
        self.push(tag, Some(id.to_string()), classes)
    }

    fn push(&self, tag: &str, id: Option<String>, classes: &[&str]) -> ElementId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: tag.to_string(),
            id,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            content: String::new(),
        });
        ElementId(nodes.len() - 1)
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// The element's content as markup.
    pub fn inner_html(&self, element: ElementId) -> String {
        self.with_node(element, |node| node.content.clone())
            .unwrap_or_default()
    }

    /// The element's content with tags removed.
    pub fn text_content(&self, element: ElementId) -> String {
        self.with_node(element, |node| markup::text_of(&node.content))
            .unwrap_or_default()
    }

    /// Class tokens of the first descendant named `tag`, if there is one.
    pub fn nested_class_list(&self, element: ElementId, tag: &str) -> Option<Vec<String>> {
        self.with_node(element, |node| markup::tag_classes(&node.content, tag))
            .flatten()
    }

    fn with_node<R>(&self, element: ElementId, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.nodes.borrow().get(element.0).map(f)
    }

    fn with_node_mut<R>(&self, element: ElementId, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        self.nodes.borrow_mut().get_mut(element.0).map(f)
    }
}

impl Document for MemoryDocument {
    type Element = ElementId;

    fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, node)| selector.matches(&node.tag, node.id.as_deref(), &node.classes))
            .map(|(index, _)| ElementId(index))
            .collect()
    }

    fn tag_name(&self, element: &ElementId) -> String {
        self.with_node(*element, |node| node.tag.clone())
            .unwrap_or_default()
    }

    fn class_list(&self, element: &ElementId) -> Vec<String> {
        self.with_node(*element, |node| node.classes.clone())
            .unwrap_or_default()
    }

    fn add_class(&self, element: &ElementId, class: &str) {
        self.with_node_mut(*element, |node| {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        });
    }

    fn set_inner_html(&self, element: &ElementId, html: &str) {
        self.with_node_mut(*element, |node| node.content = html.to_string());
    }

    fn set_text_content(&self, element: &ElementId, text: &str) {
        self.with_node_mut(*element, |node| node.content = markup::escape_text(text));
    }

    fn add_nested_class(&self, element: &ElementId, nested_tag: &str, class: &str) -> bool {
        self.with_node_mut(*element, |node| {
            match markup::add_class_to_tag(&node.content, nested_tag, class) {
                Some(updated) => {
                    node.content = updated;
                    true
                }
                None => false,
            }
        })
        .unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================
