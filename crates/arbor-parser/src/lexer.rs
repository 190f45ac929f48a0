//! Tokenizer for the tree text format

use crate::error::{ParseError, ParseResult};
use std::iter::Peekable;
use std::str::Chars;

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Arrow,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Equals,
    Eof,
}

impl TokenKind {
    /// Human-readable description for error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Int(v) => format!("number {v}"),
            Self::Float(v) => format!("number {v}"),
            Self::Str(s) => format!("string {s:?}"),
            Self::Arrow => "'->'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Equals => "'='".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }
}

/// Token with 1-based source position
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Token {
    #[inline]
    pub(crate) fn pos(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

struct Lexer<'a> {
    reference: &'a str,
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

/// Split text into tokens, always terminated by [`TokenKind::Eof`]
pub(crate) fn tokenize(reference: &str, text: &str) -> ParseResult<Vec<Token>> {
    let mut lexer = Lexer {
        reference,
        chars: text.chars().peekable(),
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '#' {
                while self.chars.peek().is_some_and(|&c| c != '\n') {
                    self.bump();
                }
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn error(&self, pos: (usize, usize), message: impl Into<String>) -> ParseError {
        ParseError::syntax(self.reference, pos, message)
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_trivia();
        let pos = (self.line, self.column);
        let token = |kind| Token {
            kind,
            line: pos.0,
            column: pos.1,
        };

        let Some(c) = self.bump() else {
            return Ok(token(TokenKind::Eof));
        };

        let kind = match c {
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equals,
            '"' => TokenKind::Str(self.string(pos)?),
            '-' if self.chars.peek() == Some(&'>') => {
                self.bump();
                TokenKind::Arrow
            }
            '-' if self.chars.peek().is_some_and(char::is_ascii_digit) => self.number('-', pos)?,
            c if c.is_ascii_digit() => self.number(c, pos)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                while let Some(&c) = self.chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        name.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                TokenKind::Ident(name)
            }
            other => return Err(self.error(pos, format!("unexpected character '{other}'"))),
        };
        Ok(token(kind))
    }

    fn string(&mut self, start: (usize, usize)) -> ParseResult<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error(start, "unterminated string")),
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c @ ('"' | '\\')) => value.push(c),
                    _ => return Err(self.error(start, "invalid escape in string")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn number(&mut self, first: char, start: (usize, usize)) -> ParseResult<TokenKind> {
        let mut literal = String::from(first);
        let mut is_float = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                literal.push(c);
            } else if c == '.' && !is_float {
                is_float = true;
                literal.push(c);
            } else {
                break;
            }
            self.bump();
        }
        if is_float {
            literal
                .parse()
                .map(TokenKind::Float)
                .map_err(|_| self.error(start, format!("invalid number '{literal}'")))
        } else {
            literal
                .parse()
                .map(TokenKind::Int)
                .map_err(|_| self.error(start, format!("invalid number '{literal}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize("test", text)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_arrow_and_brackets() {
        assert_eq!(
            kinds("ROOT->SEQUENCE[wait, moveTo]"),
            vec![
                TokenKind::Ident("ROOT".into()),
                TokenKind::Arrow,
                TokenKind::Ident("SEQUENCE".into()),
                TokenKind::LBracket,
                TokenKind::Ident("wait".into()),
                TokenKind::Comma,
                TokenKind::Ident("moveTo".into()),
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_literals() {
        assert_eq!(
            kinds(r#"(a=-3, b=1.5, c="x\"y")"#),
            vec![
                TokenKind::LParen,
                TokenKind::Ident("a".into()),
                TokenKind::Equals,
                TokenKind::Int(-3),
                TokenKind::Comma,
                TokenKind::Ident("b".into()),
                TokenKind::Equals,
                TokenKind::Float(1.5),
                TokenKind::Comma,
                TokenKind::Ident("c".into()),
                TokenKind::Equals,
                TokenKind::Str("x\"y".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments_and_tracks_positions() {
        let tokens = tokenize("test", "# header\n  wait").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident("wait".into()));
        assert_eq!(tokens[0].pos(), (2, 3));
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = tokenize("test", "wait(msg=\"oops").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, column: 10, .. }));
    }

    #[test]
    fn rejects_stray_character() {
        let err = tokenize("test", "wait;").unwrap_err();
        assert!(err.to_string().contains("unexpected character ';'"));
    }
}
