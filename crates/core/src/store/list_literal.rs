//! Parser for list literals stored inside CSV cells.
//!
//! The doctor directory stores multi-valued columns as Python-style list literals, for example
//! `['Neurology', "Sleep Medicine"]`. Only lists of string literals are accepted: single or
//! double quotes, the common backslash escapes, and an optional trailing comma.

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ListLiteralError {
    #[error("expected '[' at offset {0}")]
    ExpectedOpenBracket(usize),
    #[error("expected a quoted string at offset {0}")]
    ExpectedString(usize),
    #[error("expected ',' or ']' at offset {0}")]
    ExpectedSeparator(usize),
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("unexpected trailing characters at offset {0}")]
    TrailingCharacters(usize),
}

/// Parses a list literal of strings into its elements.
pub fn parse_string_list(input: &str) -> Result<Vec<String>, ListLiteralError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        pos: 0,
        len: input.len(),
    };
    parser.list()
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
}

impl Parser {
    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|(o, _)| *o).unwrap_or(self.len)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn list(&mut self) -> Result<Vec<String>, ListLiteralError> {
        self.skip_whitespace();
        if self.peek() != Some('[') {
            return Err(ListLiteralError::ExpectedOpenBracket(self.offset()));
        }
        self.pos += 1;

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some('\'') | Some('"') => items.push(self.string()?),
                _ => return Err(ListLiteralError::ExpectedString(self.offset())),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(ListLiteralError::ExpectedSeparator(self.offset())),
            }
        }

        self.skip_whitespace();
        if self.pos < self.chars.len() {
            return Err(ListLiteralError::TrailingCharacters(self.offset()));
        }

        Ok(items)
    }

    fn string(&mut self) -> Result<String, ListLiteralError> {
        let start = self.offset();
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(ListLiteralError::ExpectedString(start)),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ListLiteralError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(ListLiteralError::UnterminatedString(start)),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    // Unknown escapes keep the backslash.
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }
}
