use scraper::{ElementRef, Html, Node};
use sxd_document::{Package, dom};

use crate::document::is_blank;

/// Parses `input` with the HTML5 tree builder and copies the result into an XML package.
///
/// Doctypes and processing instructions are dropped. Blank text is kept only
/// in mixed content.
pub(crate) fn parse(input: &str) -> Package {
    let html = Html::parse_document(input);
    let package = Package::new();

    {
        let document = package.as_document();
        let element = map_element(&document, html.root_element());
        document.root().append_child(element);
    }

    package
}

fn map_element<'d>(document: &dom::Document<'d>, source: ElementRef<'_>) -> dom::Element<'d> {
    let element = document.create_element(source.value().name());

    for (name, value) in source.value().attrs() {
        element.set_attribute_value(name, value);
    }

    let mixed = source
        .children()
        .any(|child| matches!(child.value(), Node::Text(text) if !is_blank(text)));

    for child in source.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    element.append_child(map_element(document, child));
                }
            }
            Node::Text(text) if mixed || !is_blank(text) => {
                element.append_child(document.create_text(text));
            }
            Node::Comment(comment) => {
                element.append_child(document.create_comment(comment));
            }
            _ => {}
        }
    }

    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document_element;

    fn elements<'d>(element: dom::Element<'d>) -> Vec<dom::Element<'d>> {
        element
            .children()
            .into_iter()
            .filter_map(|child| match child {
                dom::ChildOfElement::Element(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    fn body<'d>(document: &dom::Document<'d>) -> dom::Element<'d> {
        let html = document_element(document).unwrap();
        elements(html)
            .into_iter()
            .find(|e| e.name().local_part() == "body")
            .unwrap()
    }

    #[test]
    fn test_parse_recovers_unclosed_paragraph() {
        let package = parse("<p>hi");
        let document = package.as_document();
        let p = elements(body(&document))[0];

        assert_eq!(p.name().local_part(), "p");
        match p.children().as_slice() {
            [dom::ChildOfElement::Text(text)] => assert_eq!(text.text(), "hi"),
            other => panic!("unexpected children: {other:?}"),
        }
    }

    #[test]
    fn test_parse_keeps_spacing_in_mixed_content() {
        let package = parse("<div>\n  <p>one <b>two</b> <i>three</i></p>\n</div>");
        let document = package.as_document();
        let div = elements(body(&document))[0];
        let p = elements(div)[0];

        assert_eq!(elements(div).len(), 1);
        assert_eq!(p.children().len(), 4);
        match p.children()[2] {
            dom::ChildOfElement::Text(text) => assert_eq!(text.text(), " "),
            other => panic!("unexpected child: {other:?}"),
        }
    }

    #[test]
    fn test_parse_keeps_attributes_and_comments() {
        let package = parse("<div class=\"box\"><!-- note -->  <span>x</span></div>");
        let document = package.as_document();
        let div = elements(body(&document))[0];

        assert_eq!(div.attribute_value("class"), Some("box"));
        match div.children().as_slice() {
            [dom::ChildOfElement::Comment(comment), dom::ChildOfElement::Element(span)] => {
                assert_eq!(comment.text(), " note ");
                assert_eq!(span.name().local_part(), "span");
            }
            other => panic!("unexpected children: {other:?}"),
        }
    }
}
