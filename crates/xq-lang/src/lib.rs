//! # xq-lang: XPath queries over XML and HTML documents
//!
//! This crate implements the pipeline behind the `xq` command: read a
//! document, optionally select parts of it with an XPath 1.0 expression, and
//! print the result as indented XML or as plain text lines.
//!
//! Input is parsed as XML first. Anything that is not well-formed XML is
//! parsed again as HTML, so tag soup and fragments still produce a tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use xq_lang::Invocation;
//!
//! let output = Invocation::new("<r><a id=\"x\"/><a id=\"y\"/></r>".as_bytes())
//!     .query("//@id")
//!     .raw(true)
//!     .apply()
//!     .unwrap();
//! assert_eq!(output, "x\ny");
//! ```
//!
//! Without `raw`, every match is wrapped in a `<result>` element:
//!
//! ```rust
//! let output = xq_lang::apply_xpath("<r><a/></r>", Some("//a"), false, false).unwrap();
//! assert_eq!(output, "<results>\n  <result>\n    <a/>\n  </result>\n</results>\n");
//! ```
mod document;
mod error;
mod highlight;
mod html;
mod pretty;
mod query;
mod render;

use std::io::{Read, Write};

pub use document::{Document, Syntax};
pub use error::Error;
pub use highlight::Highlighter;
pub use query::{Match, evaluate};
pub use render::{render_document, render_raw, render_wrapped};

/// A single run of the query pipeline.
///
/// The input stream and the colour decision are supplied by the caller, so
/// the pipeline never touches process-global state.
pub struct Invocation {
    source: Box<dyn Read>,
    query: Option<String>,
    raw: bool,
    colorize: bool,
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("query", &self.query)
            .field("raw", &self.raw)
            .field("colorize", &self.colorize)
            .finish_non_exhaustive()
    }
}

impl Invocation {
    pub fn new(source: impl Read + 'static) -> Self {
        Self {
            source: Box::new(source),
            query: None,
            raw: false,
            colorize: false,
        }
    }

    /// Sets the XPath query. An empty query is the same as no query.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into()).filter(|q| !q.is_empty());
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Runs the pipeline and returns the (possibly highlighted) output text.
    pub fn apply(self) -> Result<String, Error> {
        let highlighter = Highlighter::new(self.colorize);
        highlighter.highlight(&self.render()?)
    }

    /// Runs the pipeline and writes the output in one write, ending it with a
    /// newline when it is not empty.
    pub fn run<W: Write>(self, writer: &mut W) -> Result<(), Error> {
        let highlighter = Highlighter::new(self.colorize);
        let mut output = self.render()?;
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }

        writer.write_all(highlighter.highlight(&output)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn render(self) -> Result<String, Error> {
        let document = Document::from_reader(self.source)?;
        tracing::debug!(syntax = ?document.syntax(), "loaded document");
        let dom = document.as_dom();

        let output = match self.query.as_deref() {
            Some(query) => {
                let matches = evaluate(&dom, query)?;
                if self.raw {
                    render_raw(&matches)
                } else {
                    render_wrapped(&dom, matches)
                }
            }
            None => {
                if self.raw {
                    tracing::warn!("--raw has no effect without a query, printing the whole document");
                }
                render_document(&dom)
            }
        };

        Ok(output)
    }
}

/// Applies `query` to an in-memory document.
pub fn apply_xpath(input: &str, query: Option<&str>, colorize: bool, raw: bool) -> Result<String, Error> {
    let invocation = Invocation::new(std::io::Cursor::new(input.to_string()))
        .raw(raw)
        .colorize(colorize);

    let invocation = match query {
        Some(query) => invocation.query(query),
        None => invocation,
    };
    invocation.apply()
}
