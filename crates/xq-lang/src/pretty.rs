//! Indented XML serialization.
//!
//! Element-only content is laid out one child per line with two-space
//! indentation. Elements that contain text are written inline, including
//! their whole subtree, so mixed content is never altered.

use sxd_document::{QName, dom};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
const INDENT: &str = "  ";

/// Serializes every top-level node of the document, one per line.
pub fn document_to_string(document: &dom::Document<'_>) -> String {
    let mut printer = PrettyPrinter::default();

    for child in document.root().children() {
        match child {
            dom::ChildOfRoot::Element(element) => printer.element(element, 0, true),
            dom::ChildOfRoot::Comment(comment) => printer.comment(comment),
            dom::ChildOfRoot::ProcessingInstruction(pi) => printer.processing_instruction(pi),
        }
        printer.out.push('\n');
    }

    printer.out
}

/// Serializes a single element and its subtree, followed by a newline.
pub fn element_to_string(element: dom::Element<'_>) -> String {
    let mut printer = PrettyPrinter::default();
    printer.element(element, 0, true);
    printer.out.push('\n');
    printer.out
}

#[derive(Default)]
struct PrettyPrinter {
    out: String,
    /// In-scope namespace declarations as `(prefix, uri)`; the empty prefix is the default namespace.
    scope: Vec<(String, String)>,
}

impl PrettyPrinter {
    fn element(&mut self, element: dom::Element<'_>, depth: usize, format: bool) {
        let scope_len = self.scope.len();
        let mut declarations = Vec::new();

        let name = self.qualify(element.name(), element.preferred_prefix(), false, &mut declarations);
        let attributes = element
            .attributes()
            .into_iter()
            .map(|attribute| {
                let name = self.qualify(attribute.name(), attribute.preferred_prefix(), true, &mut declarations);
                (name, attribute.value())
            })
            .collect::<Vec<_>>();

        self.out.push('<');
        self.out.push_str(&name);
        for (prefix, uri) in &declarations {
            if prefix.is_empty() {
                self.out.push_str(" xmlns=\"");
            } else {
                self.out.push_str(" xmlns:");
                self.out.push_str(prefix);
                self.out.push_str("=\"");
            }
            escape_attribute(&mut self.out, uri);
            self.out.push('"');
        }
        for (name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(&name);
            self.out.push_str("=\"");
            escape_attribute(&mut self.out, value);
            self.out.push('"');
        }

        let children = element.children();
        if children.is_empty() {
            self.out.push_str("/>");
            self.scope.truncate(scope_len);
            return;
        }
        self.out.push('>');

        let format = format && !children.iter().any(|child| matches!(child, dom::ChildOfElement::Text(_)));

        for child in children {
            if format {
                self.newline(depth + 1);
            }
            match child {
                dom::ChildOfElement::Element(child) => self.element(child, depth + 1, format),
                dom::ChildOfElement::Text(text) => escape_text(&mut self.out, text.text()),
                dom::ChildOfElement::Comment(comment) => self.comment(comment),
                dom::ChildOfElement::ProcessingInstruction(pi) => self.processing_instruction(pi),
            }
        }

        if format {
            self.newline(depth);
        }
        self.out.push_str("</");
        self.out.push_str(&name);
        self.out.push('>');
        self.scope.truncate(scope_len);
    }

    fn comment(&mut self, comment: dom::Comment<'_>) {
        self.out.push_str("<!--");
        self.out.push_str(comment.text());
        self.out.push_str("-->");
    }

    fn processing_instruction(&mut self, pi: dom::ProcessingInstruction<'_>) {
        self.out.push_str("<?");
        self.out.push_str(pi.target());
        if let Some(value) = pi.value() {
            self.out.push(' ');
            self.out.push_str(value);
        }
        self.out.push_str("?>");
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.scope
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn declare(&mut self, prefix: &str, uri: &str, declarations: &mut Vec<(String, String)>) {
        self.scope.push((prefix.to_string(), uri.to_string()));
        declarations.push((prefix.to_string(), uri.to_string()));
    }

    /// Returns the serialized name, recording any namespace declaration it needs.
    fn qualify(
        &mut self,
        name: QName<'_>,
        preferred_prefix: Option<&str>,
        is_attribute: bool,
        declarations: &mut Vec<(String, String)>,
    ) -> String {
        let local = name.local_part();

        let Some(uri) = name.namespace_uri() else {
            if !is_attribute && self.lookup("").is_some_and(|uri| !uri.is_empty()) {
                self.declare("", "", declarations);
            }
            return local.to_string();
        };

        if uri == XML_NAMESPACE {
            return format!("xml:{local}");
        }

        let prefix = match preferred_prefix {
            Some(prefix) => prefix.to_string(),
            None if !is_attribute => String::new(),
            // Unprefixed attributes are never in a namespace, so reuse or invent a prefix.
            None => self
                .scope
                .iter()
                .rev()
                .find(|(p, u)| !p.is_empty() && u == uri)
                .map(|(p, _)| p.clone())
                .unwrap_or_else(|| format!("ns{}", self.scope.len())),
        };

        if self.lookup(&prefix) != Some(uri) {
            self.declare(&prefix, uri, declarations);
        }

        if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{prefix}:{local}")
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::Document;

    fn pretty(input: &str) -> String {
        let document = Document::parse(input);
        document_to_string(&document.as_dom())
    }

    #[rstest]
    #[case::empty_element("<r/>", "<r/>\n")]
    #[case::nested(
        "<r><a><b/></a><c/></r>",
        "<r>\n  <a>\n    <b/>\n  </a>\n  <c/>\n</r>\n"
    )]
    #[case::reindents(
        "<r>\n\n        <a/>\n   <b/></r>",
        "<r>\n  <a/>\n  <b/>\n</r>\n"
    )]
    #[case::text_inline("<r><a>hello</a></r>", "<r>\n  <a>hello</a>\n</r>\n")]
    #[case::mixed_content(
        "<r><p>one <b>two</b> three</p></r>",
        "<r>\n  <p>one <b>two</b> three</p>\n</r>\n"
    )]
    #[case::mixed_content_subtree_not_indented(
        "<r>text<a><b/></a></r>",
        "<r>text<a><b/></a></r>\n"
    )]
    #[case::attributes(
        "<r a=\"1\" b='x &quot;y&quot;'/>",
        "<r a=\"1\" b=\"x &quot;y&quot;\"/>\n"
    )]
    #[case::escaped_text("<r>a &lt; b &amp;&amp; c</r>", "<r>a &lt; b &amp;&amp; c</r>\n")]
    #[case::comment(
        "<r><!-- note --><a/></r>",
        "<r>\n  <!-- note -->\n  <a/>\n</r>\n"
    )]
    #[case::prefixed_namespace(
        "<x:r xmlns:x=\"urn:x\"><x:a/></x:r>",
        "<x:r xmlns:x=\"urn:x\">\n  <x:a/>\n</x:r>\n"
    )]
    #[case::default_namespace(
        "<r xmlns=\"urn:d\"><a/></r>",
        "<r xmlns=\"urn:d\">\n  <a/>\n</r>\n"
    )]
    fn test_document_to_string(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pretty(input), expected);
    }

    #[test]
    fn test_html_document_to_string() {
        assert_eq!(
            pretty("<p>hi"),
            "<html>\n  <head/>\n  <body>\n    <p>hi</p>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn test_element_to_string() {
        let document = Document::parse("<r><a><b>x</b></a></r>");
        let dom = document.as_dom();
        let a = dom.create_element("a");
        a.append_child(dom.create_element("b"));

        assert_eq!(element_to_string(a), "<a>\n  <b/>\n</a>\n");
    }
}
