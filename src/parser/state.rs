use std::fmt;

use lachs::Span;

use crate::ast::NodeId;
use crate::lexer::Token;

/// Deepest block/expression nesting the parser accepts.
pub const MAX_EXPRESSION_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub expected: Vec<String>,
    pub found: Option<String>,
    pub position: Option<Span>,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            expected: Vec::new(),
            found: None,
            position: None,
        }
    }

    pub fn expected(mut self, what: impl Into<String>) -> Self {
        self.expected.push(what.into());
        self
    }

    pub fn found(mut self, what: impl Into<String>) -> Self {
        self.found = Some(what.into());
        self
    }

    pub fn at(mut self, position: Span) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut msg = self.message.clone();
        if !self.expected.is_empty() {
            msg.push_str(&format!(", expected {}", self.expected.join(" or ")));
        }
        if let Some(found) = &self.found {
            msg.push_str(&format!(", found {found}"));
        }

        match &self.position {
            Some(span) if !span.source.is_empty() => write!(f, "{}", span.to_string(&msg)),
            _ => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
    /// Error that got furthest into the input, with the token index it failed at.
    furthest: Option<(usize, ParseError)>,
    errors: Vec<ParseError>,
    next_node: u32,
    depth: usize,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            furthest: None,
            errors: Vec::new(),
            next_node: 0,
            depth: 0,
        }
    }

    pub fn advance(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.index + n)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    /// Hand out the next statement id.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn node_count(&self) -> u32 {
        self.next_node
    }

    /// Enter one level of block/expression nesting.
    pub fn enter_nested(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            let err = self.error_here(format!(
                "maximum expression depth of {MAX_EXPRESSION_DEPTH} reached"
            ));
            self.depth -= 1;
            // sticky: no later token error may replace a depth failure
            self.furthest = Some((usize::MAX, err.clone()));
            return Err(err);
        }
        Ok(())
    }

    pub fn leave_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Remember `err` if it happened at least as far into the input as any
    /// error seen so far.
    pub fn record_error(&mut self, err: ParseError) {
        match &self.furthest {
            Some((index, _)) if *index > self.index => {}
            _ => self.furthest = Some((self.index, err)),
        }
    }

    pub fn get_furthest_error(&self) -> Option<&ParseError> {
        self.furthest.as_ref().map(|(_, err)| err)
    }

    /// Move the furthest error into the collected list and reset tracking.
    pub fn commit_furthest_error(&mut self) {
        if let Some((_, err)) = self.furthest.take() {
            self.errors.push(err);
        }
    }

    pub fn collect_error(&mut self, err: ParseError) {
        self.errors.push(err);
    }

    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub fn error_here(&self, msg: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(msg).found(tok.describe()).at(tok.pos()),
            None => ParseError::new(msg).found("end of input"),
        }
    }
}

pub trait Parser<T>: Sized {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
