//! Bracket-notation tree parser
//!
//! ```text
//! root -> sequence [ wait(seconds=2), moveTo(target="gate"), wait ]
//! ```
//!
//! `root` is the archetype wrapper and may only appear at the top; a top
//! node that is not `root` is wrapped implicitly. `sequence`, `selector`
//! and `parallel` are composites; every other identifier is an action leaf.

use crate::content::TreeContent;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::level::DebugLevel;
use crate::ArchetypeParser;
use arbor_tree::{Action, Archetype, Composite, CompositeKind, Param, Task};

/// Maximum nesting depth accepted by [`TextParser`]
pub const MAX_DEPTH: usize = 256;

/// Parser for the bracket tree notation
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser {
    debug_level: DebugLevel,
}

impl TextParser {
    /// Create silent parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with diagnostic verbosity
    #[inline]
    #[must_use]
    pub fn with_debug_level(debug_level: DebugLevel) -> Self {
        Self { debug_level }
    }
}

impl ArchetypeParser for TextParser {
    fn parse(&self, content: &TreeContent) -> ParseResult<Archetype> {
        let reference = content.reference();
        let tokens = tokenize(reference, content.text())?;
        if tokens.len() == 1 {
            return Err(ParseError::Empty {
                reference: reference.to_string(),
            });
        }

        let mut state = State {
            reference,
            tokens,
            cursor: 0,
            debug_level: self.debug_level,
        };
        let children = state.tree()?;
        let archetype = Archetype::new(reference, children);

        if !self.debug_level.is_silent() {
            tracing::debug!(
                reference,
                tasks = archetype.node_count(),
                "parsed behavior tree"
            );
        }
        Ok(archetype)
    }

    fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }
}

struct State<'a> {
    reference: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
    debug_level: DebugLevel,
}

impl State<'_> {
    fn peek(&self) -> &Token {
        // tokenize always ends with Eof and the cursor never passes it
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.syntax(
                &token,
                format!("expected {}, found {}", kind.describe(), token.kind.describe()),
            ))
        }
    }

    fn syntax(&self, at: &Token, message: impl Into<String>) -> ParseError {
        ParseError::syntax(self.reference, at.pos(), message)
    }

    fn invalid(&self, at: &Token, message: impl Into<String>) -> ParseError {
        ParseError::invalid_task(self.reference, at.pos(), message)
    }

    fn ident(&mut self) -> ParseResult<(Token, String)> {
        let token = self.advance();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.syntax(&token, format!("expected task name, found {}", other.describe())))
            }
        };
        Ok((token, name))
    }

    /// Top level: optional `root` wrapper around the declared tasks
    fn tree(&mut self) -> ParseResult<Vec<Box<dyn Task>>> {
        let is_root = matches!(&self.peek().kind, TokenKind::Ident(name) if name.eq_ignore_ascii_case("root"));
        let children = if is_root {
            let (token, _) = self.ident()?;
            if self.peek().kind == TokenKind::LParen {
                return Err(self.invalid(&token, "root does not take parameters"));
            }
            let children = self.children(1)?;
            if children.is_empty() {
                return Err(self.invalid(&token, "root must declare at least one task"));
            }
            children
        } else {
            vec![self.node(1)?]
        };

        let trailing = self.advance();
        if trailing.kind != TokenKind::Eof {
            return Err(self.syntax(
                &trailing,
                format!("expected end of input, found {}", trailing.kind.describe()),
            ));
        }
        Ok(children)
    }

    /// Optional `-> node` or `[node, ...]` suffix
    fn children(&mut self, depth: usize) -> ParseResult<Vec<Box<dyn Task>>> {
        if self.eat(&TokenKind::Arrow) {
            return Ok(vec![self.node(depth)?]);
        }
        let mut children = Vec::new();
        if self.eat(&TokenKind::LBracket) {
            loop {
                children.push(self.node(depth)?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
        }
        Ok(children)
    }

    fn node(&mut self, depth: usize) -> ParseResult<Box<dyn Task>> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                reference: self.reference.to_string(),
                limit: MAX_DEPTH,
            });
        }

        let (token, name) = self.ident()?;
        if name.eq_ignore_ascii_case("root") {
            return Err(self.invalid(&token, "root is only allowed as the top-level task"));
        }

        let params = self.params()?;
        let children = self.children(depth + 1)?;

        let task: Box<dyn Task> = match name.parse::<CompositeKind>() {
            Ok(kind) => {
                if !params.is_empty() {
                    return Err(self.invalid(&token, format!("{kind} does not take parameters")));
                }
                if children.is_empty() {
                    return Err(self.invalid(&token, format!("{kind} must have at least one child")));
                }
                Box::new(Composite::new(kind, children))
            }
            Err(()) => {
                if !children.is_empty() {
                    return Err(self.invalid(&token, format!("action '{name}' cannot have children")));
                }
                let mut action = Action::new(name);
                for (key, value) in params {
                    action.set_param(key, value);
                }
                Box::new(action)
            }
        };

        if self.debug_level >= DebugLevel::HIGH {
            tracing::trace!(
                reference = self.reference,
                depth,
                line = token.line,
                task = task.name(),
                children = task.child_count(),
                "parsed task"
            );
        }
        Ok(task)
    }

    fn params(&mut self) -> ParseResult<Vec<(String, Param)>> {
        let mut params: Vec<(String, Param)> = Vec::new();
        if !self.eat(&TokenKind::LParen) {
            return Ok(params);
        }
        if self.eat(&TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let (token, key) = self.ident()?;
            if params.iter().any(|(k, _)| *k == key) {
                return Err(self.invalid(&token, format!("duplicate parameter '{key}'")));
            }
            self.expect(TokenKind::Equals)?;
            let value = self.value()?;
            params.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn value(&mut self) -> ParseResult<Param> {
        let token = self.advance();
        let value = match &token.kind {
            TokenKind::Int(v) => Param::Int(*v),
            TokenKind::Float(v) => Param::Float(*v),
            TokenKind::Str(s) => Param::Text(s.clone()),
            TokenKind::Ident(word) if word == "true" => Param::Bool(true),
            TokenKind::Ident(word) if word == "false" => Param::Bool(false),
            TokenKind::Ident(word) => Param::Text(word.clone()),
            other => {
                return Err(self.syntax(&token, format!("expected value, found {}", other.describe())))
            }
        };
        Ok(value)
    }
}
