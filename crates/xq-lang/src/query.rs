use sxd_document::dom;
use sxd_xpath::{Value, nodeset::Node};

use crate::Error;

/// A single query result.
#[derive(Debug, Clone)]
pub enum Match<'d> {
    /// An element of the queried document.
    Element(dom::Element<'d>),
    /// Text, an attribute value, or any other value converted to a string.
    Scalar(String),
}

impl<'d> From<Node<'d>> for Match<'d> {
    fn from(node: Node<'d>) -> Self {
        match node {
            Node::Element(element) => Match::Element(element),
            Node::Attribute(attribute) => Match::Scalar(attribute.value().to_string()),
            Node::Text(text) => Match::Scalar(text.text().to_string()),
            Node::Root(root) => root
                .children()
                .into_iter()
                .find_map(|child| match child {
                    dom::ChildOfRoot::Element(element) => Some(Match::Element(element)),
                    _ => None,
                })
                .unwrap_or_else(|| Match::Scalar(String::new())),
            other => Match::Scalar(other.string_value()),
        }
    }
}

/// Evaluates an XPath 1.0 expression against the whole document.
///
/// Node-sets are returned in document order. Strings, numbers and booleans
/// produce a single [`Match::Scalar`].
pub fn evaluate<'d>(document: &'d dom::Document<'d>, query: &str) -> Result<Vec<Match<'d>>, Error> {
    let value = sxd_xpath::evaluate_xpath(document, query).map_err(|e| Error::xpath(query, e))?;

    let matches: Vec<Match<'d>> = match value {
        Value::Nodeset(nodes) => nodes.document_order().into_iter().map(Match::from).collect(),
        Value::String(s) => vec![Match::Scalar(s)],
        Value::Number(n) => vec![Match::Scalar(number_to_string(n))],
        Value::Boolean(b) => vec![Match::Scalar(b.to_string())],
    };

    tracing::debug!(query, matches = matches.len(), "evaluated query");
    Ok(matches)
}

fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::Document;

    fn scalars(input: &str, query: &str) -> Vec<String> {
        let document = Document::parse(input);
        let dom = document.as_dom();
        evaluate(&dom, query)
            .unwrap()
            .into_iter()
            .map(|m| match m {
                Match::Scalar(s) => s,
                Match::Element(e) => format!("<{}>", e.name().local_part()),
            })
            .collect()
    }

    #[rstest]
    #[case::elements("<r><a/><b/><a/></r>", "//a", vec!["<a>", "<a>"])]
    #[case::attributes("<r><a id=\"x\"/><a id=\"y\"/></r>", "//@id", vec!["x", "y"])]
    #[case::text("<r><a>one</a><a>two</a></r>", "//a/text()", vec!["one", "two"])]
    #[case::predicate("<r><a n=\"1\">one</a><a n=\"2\">two</a></r>", "//a[@n='2']", vec!["<a>"])]
    #[case::comment("<r><!--c--></r>", "//comment()", vec!["c"])]
    #[case::root("<r><a/></r>", "/", vec!["<r>"])]
    #[case::no_match("<r><a/></r>", "//missing", vec![])]
    #[case::string_function("<r><a>one</a></r>", "string(//a)", vec!["one"])]
    #[case::count("<r><a/><a/><a/></r>", "count(//a)", vec!["3"])]
    #[case::fraction("<r/>", "5 div 2", vec!["2.5"])]
    #[case::nan("<r/>", "number('x')", vec!["NaN"])]
    #[case::infinity("<r/>", "1 div 0", vec!["Infinity"])]
    #[case::boolean("<r><a/></r>", "boolean(//a)", vec!["true"])]
    fn test_evaluate(#[case] input: &str, #[case] query: &str, #[case] expected: Vec<&str>) {
        assert_eq!(scalars(input, query), expected);
    }

    #[test]
    fn test_evaluate_html_fallback() {
        assert_eq!(scalars("<a id=\"x\"/><a id=\"y\"/>", "//@id"), vec!["x", "y"]);
    }

    #[rstest]
    #[case::unbalanced("//a[")]
    #[case::unknown_function("nope()")]
    fn test_evaluate_invalid_query(#[case] query: &str) {
        let document = Document::parse("<r/>");
        let dom = document.as_dom();
        match evaluate(&dom, query) {
            Err(Error::XPath { query: q, .. }) => assert_eq!(q, query),
            other => panic!("expected XPath error, got {other:?}"),
        }
    }

    #[rstest]
    #[case::integer(3.0, "3")]
    #[case::negative(-1.5, "-1.5")]
    #[case::negative_zero(-0.0, "0")]
    #[case::negative_infinity(f64::NEG_INFINITY, "-Infinity")]
    fn test_number_to_string(#[case] n: f64, #[case] expected: &str) {
        assert_eq!(number_to_string(n), expected);
    }
}
