use itertools::Itertools;
use sxd_document::dom;

use crate::{Match, pretty};

/// Wraps every match in a `<result>` element under a single `<results>` root
/// and pretty-prints the result.
///
/// Element matches are moved out of their parent into the result tree, so a
/// match nested inside an earlier match ends up only under its own `<result>`.
pub fn render_wrapped<'d>(document: &dom::Document<'d>, matches: Vec<Match<'d>>) -> String {
    let results = document.create_element("results");

    for m in matches {
        let result = document.create_element("result");
        match m {
            Match::Element(element) => {
                element.remove_from_parent();
                result.append_child(element);
            }
            Match::Scalar(value) => {
                result.append_child(document.create_text(&value));
            }
        }
        results.append_child(result);
    }

    pretty::element_to_string(results)
}

/// Renders one line per match: scalars verbatim, elements as `[Element <tag>]`.
/// Lines are joined without a trailing newline.
pub fn render_raw(matches: &[Match<'_>]) -> String {
    matches
        .iter()
        .map(|m| match m {
            Match::Scalar(value) => value.clone(),
            Match::Element(element) => format!("[Element <{}>]", tag_name(*element)),
        })
        .join("\n")
}

pub fn render_document(document: &dom::Document<'_>) -> String {
    pretty::document_to_string(document)
}

/// Namespaced tags use Clark notation, `{uri}local`.
fn tag_name(element: dom::Element<'_>) -> String {
    let name = element.name();
    match name.namespace_uri() {
        Some(uri) => format!("{{{uri}}}{}", name.local_part()),
        None => name.local_part().to_string(),
    }
}
