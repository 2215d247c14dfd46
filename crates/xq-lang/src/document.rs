use std::borrow::Cow;
use std::io::Read;

use sxd_document::{Package, dom, parser};

use crate::{Error, html};

/// The parser that produced a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Xml,
    Html,
}

/// A parsed input document.
///
/// Strict XML parsing is attempted first. Input that is not well-formed XML is
/// parsed again with the permissive HTML5 parser, which accepts anything.
/// Whitespace-only text nodes are dropped in both cases.
pub struct Document {
    package: Package,
    syntax: Syntax,
}

impl Document {
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        match parser::parse(&skip_doctype(input)) {
            Ok(package) => {
                tracing::debug!("parsed input as XML");
                if let Some(element) = document_element(&package.as_document()) {
                    remove_blank_text(element);
                }
                Self {
                    package,
                    syntax: Syntax::Xml,
                }
            }
            Err(err) => {
                tracing::debug!(error = ?err, "input is not well-formed XML, falling back to HTML");
                Self {
                    package: html::parse(input),
                    syntax: Syntax::Html,
                }
            }
        }
    }

    /// Reads the whole stream before parsing so the HTML fallback sees the same input.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, Error> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Ok(Self::parse(&input))
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn as_dom(&self) -> dom::Document<'_> {
        self.package.as_document()
    }
}

pub(crate) fn document_element<'d>(document: &dom::Document<'d>) -> Option<dom::Element<'d>> {
    document.root().children().into_iter().find_map(|child| match child {
        dom::ChildOfRoot::Element(element) => Some(element),
        _ => None,
    })
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Removes the `<!DOCTYPE ...>` declaration, including any internal subset.
///
/// Only a declaration in the prolog is removed; the rest of the input is returned unchanged.
fn skip_doctype(input: &str) -> Cow<'_, str> {
    let Some(start) = input.find("<!DOCTYPE") else {
        return Cow::Borrowed(input);
    };
    if has_element_start(&input[..start]) {
        return Cow::Borrowed(input);
    }

    let mut depth = 0usize;
    let mut quote = None;
    for (i, c) in input[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 => {
                let end = start + i + 1;
                return Cow::Owned(format!("{}{}", &input[..start], &input[end..]));
            }
            _ => {}
        }
    }

    Cow::Borrowed(input)
}

fn has_element_start(prolog: &str) -> bool {
    prolog
        .split('<')
        .skip(1)
        .any(|s| s.starts_with(|c: char| c.is_alphabetic() || c == '_'))
}

/// Blank text is only dropped from element-only content; mixed content keeps its spacing.
fn remove_blank_text(element: dom::Element<'_>) {
    let children = element.children();
    let mixed = children
        .iter()
        .any(|child| matches!(child, dom::ChildOfElement::Text(text) if !is_blank(text.text())));

    for child in children {
        match child {
            dom::ChildOfElement::Element(child) => remove_blank_text(child),
            dom::ChildOfElement::Text(text) if !mixed && is_blank(text.text()) => text.remove_from_parent(),
            _ => {}
        }
    }
}
