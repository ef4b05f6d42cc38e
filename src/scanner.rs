//! Cursor over MDSF source text.
//!
//! The scanner owns the read position and the low-level primitives the parser
//! is written in terms of: single-character lookahead, advancing with
//! end-of-data detection, stepping back, and skipping clutter (whitespace and
//! comments). Positions are byte offsets into the source.

use crate::error::SyntaxError;

pub(crate) struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

/// Line terminators: `\n`, `\r`, U+2028 and U+2029.
pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace as ECMAScript defines it: the ASCII blanks, line terminators,
/// NBSP, BOM and the Unicode space separators.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{0B}'
            | '\u{0C}'
            | ' '
            | '\u{A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    ) || is_line_terminator(c)
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner { source, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Text not consumed yet.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Text consumed since `start`.
    #[inline]
    pub fn since(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }

    #[inline]
    pub fn lookahead(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the lookahead.
    #[inline]
    pub fn lookahead2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consumes and returns the lookahead character.
    pub fn advance(&mut self) -> Result<char, SyntaxError> {
        match self.lookahead() {
            Some(c) => {
                self.pos += c.len_utf8();
                Ok(c)
            }
            None => Err(self.error("unexpected end of data")),
        }
    }

    /// Consumes the lookahead character, if any.
    #[inline]
    pub fn eat_any(&mut self) {
        self.pos += self.lookahead().map_or(0, char::len_utf8);
    }

    /// Steps back over the previously consumed character.
    pub fn retreat(&mut self) {
        if let Some(c) = self.source[..self.pos].chars().next_back() {
            self.pos -= c.len_utf8();
        }
    }

    /// Consumes `token` or fails with "`token` expected".
    pub fn expect(&mut self, token: char) -> Result<(), SyntaxError> {
        if self.lookahead() == Some(token) {
            self.pos += token.len_utf8();
            Ok(())
        } else if self.is_at_end() {
            Err(self.error("unexpected end of data"))
        } else {
            Err(self.error(format!("`{}` expected", token)))
        }
    }

    /// Consumes `token` if it is the lookahead.
    pub fn eat(&mut self, token: char) -> bool {
        if self.lookahead() == Some(token) {
            self.pos += token.len_utf8();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn mark(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    /// Skips whitespace, line comments and block comments until none is left.
    pub fn skip_clutter(&mut self) -> Result<(), SyntaxError> {
        loop {
            let start = self.pos;
            while self.lookahead().map_or(false, is_whitespace) {
                self.eat_any();
            }

            let rest = self.rest();
            if rest.starts_with("//") {
                let end = rest.find(is_line_terminator).unwrap_or(rest.len());
                self.pos += end;
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => {
                        self.pos = self.source.len();
                        return Err(self.error("unexpected end of data"));
                    }
                }
            }

            if self.pos == start {
                return Ok(());
            }
        }
    }

    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.pos)
    }

    /// "unexpected `c`" for the lookahead, or "unexpected end of data".
    pub fn unexpected(&self) -> SyntaxError {
        match self.lookahead() {
            Some(c) => self.error(format!("unexpected `{}`", c)),
            None => self.error("unexpected end of data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_retreat() {
        let mut scanner = Scanner::new("aé");
        assert_eq!(scanner.advance(), Ok('a'));
        assert_eq!(scanner.advance(), Ok('é'));
        assert_eq!(scanner.pos(), 3);
        let err = scanner.advance().unwrap_err();
        assert_eq!(err.message(), "unexpected end of data");
        assert_eq!(err.offset(), 3);
        scanner.retreat();
        assert_eq!(scanner.lookahead(), Some('é'));
    }

    #[test]
    fn test_expect() {
        let mut scanner = Scanner::new("{}");
        assert!(scanner.expect('{').is_ok());
        let err = scanner.expect(':').unwrap_err();
        assert_eq!(err.to_string(), "`:` expected at position 1");
    }

    #[test]
    fn test_skip_clutter_reaches_fixed_point() {
        let mut scanner = Scanner::new(" // one\n /* two */\u{2028}\u{FEFF}/*three*/ x");
        scanner.skip_clutter().unwrap();
        assert_eq!(scanner.lookahead(), Some('x'));
    }

    #[test]
    fn test_line_comment_at_end() {
        let mut scanner = Scanner::new("// trailing");
        scanner.skip_clutter().unwrap();
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_unclosed_block_comment() {
        let mut scanner = Scanner::new("/* open");
        let err = scanner.skip_clutter().unwrap_err();
        assert_eq!(err.message(), "unexpected end of data");
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn test_lone_slash_is_not_clutter() {
        let mut scanner = Scanner::new(" /x");
        scanner.skip_clutter().unwrap();
        assert_eq!(scanner.lookahead(), Some('/'));
    }

    #[test]
    fn test_whitespace_set() {
        for c in ['\t', '\u{0B}', '\u{0C}', ' ', '\u{A0}', '\u{2005}', '\u{3000}', '\r'] {
            assert!(is_whitespace(c), "{:?}", c);
        }
        assert!(!is_whitespace('\u{200B}'));
        assert!(!is_whitespace('a'));
    }
}
