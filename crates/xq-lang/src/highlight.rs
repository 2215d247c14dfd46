use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

use crate::Error;

const THEME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

/// Adds ANSI colours to XML text, or passes it through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlighter {
    colorize: bool,
}

impl Highlighter {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    pub fn highlight(&self, text: &str) -> Result<String, Error> {
        if !self.colorize || text.is_empty() {
            return Ok(text.to_string());
        }

        static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
        static XML_THEME: OnceLock<Theme> = OnceLock::new();

        let syntax_set = SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines);
        let theme = XML_THEME.get_or_init(|| {
            let themes = ThemeSet::load_defaults();
            themes
                .themes
                .get(THEME)
                .cloned()
                .or_else(|| themes.themes.values().next().cloned())
                .unwrap_or_default()
        });
        let syntax = syntax_set
            .find_syntax_by_extension("xml")
            .unwrap_or_else(|| syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::with_capacity(text.len() * 2);
        for line in LinesWithEndings::from(text) {
            let ranges: Vec<(Style, &str)> = highlighter.highlight_line(line, syntax_set)?;
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);

        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const XML: &str = "<results>\n  <result a=\"1\">x</result>\n</results>\n";

    pub(crate) fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_highlight_passthrough() {
        let output = Highlighter::new(false).highlight(XML).unwrap();
        assert_eq!(output, XML);
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_highlight_colorize() {
        let output = Highlighter::new(true).highlight(XML).unwrap();
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(RESET));
        assert_eq!(strip_ansi(&output), XML);
    }

    #[test]
    fn test_highlight_empty() {
        assert_eq!(Highlighter::new(true).highlight("").unwrap(), "");
    }
}
