//! XML Tokenizer - State machine for XML token extraction
//!
//! Pull-parser style tokenizer producing:
//! - Element start/end/empty tags
//! - Text content (entities decoded)
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (skipped by the DOM builder)
//!
//! Unterminated constructs are reported as [`ParseError`] with the byte
//! offset where the construct started.

use super::scanner::Scanner;
use std::borrow::Cow;
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StartTag,
    EndTag,
    EmptyTag,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
    XmlDeclaration,
    DocType,
    Eof,
}

/// A parsed XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags and PIs: the name or target
    pub name: Option<&'a [u8]>,
    /// For text/cdata/comment/PI: the content
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// Malformed input, located by byte offset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut scanner = Scanner::new(input);
        if scanner.starts_with(UTF8_BOM) {
            scanner.advance(UTF8_BOM.len());
        }
        // Leading whitespace before the prolog carries no content
        scanner.skip_whitespace();
        Tokenizer {
            scanner,
            done: false,
        }
    }

    /// Get the next token; `Eof` is returned once, then `None`
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if self.done {
            return Ok(None);
        }
        if self.scanner.is_eof() {
            self.done = true;
            let pos = self.scanner.position();
            return Ok(Some(Token::new(TokenKind::Eof, (pos, pos))));
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup().map(Some),
            _ => Ok(Some(self.parse_text())),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1);

        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => Err(ParseError::new("Unexpected end of input after '<'", start)),
        }
    }

    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("Invalid element name", start))?;
        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| ParseError::new("Unterminated start tag", start))?;

        let is_empty = self.scanner.slice(end - 1, end) == b"/";
        self.scanner.set_position(end + 1);

        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        Ok(Token::new(kind, (start, end + 1)).with_name(name))
    }

    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("Invalid element name in end tag", start))?;
        let end = self
            .scanner
            .find_tag_end()
            .ok_or_else(|| ParseError::new("Unterminated end tag", start))?;
        self.scanner.set_position(end + 1);
        Ok(Token::new(TokenKind::EndTag, (start, end + 1)).with_name(name))
    }

    /// Parse markup starting with '!' (comment, CDATA, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1);

        if self.scanner.starts_with(b"--") {
            self.scanner.advance(2);
            self.delimited(start, b"-->", TokenKind::Comment, "Unterminated comment")
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.scanner.advance(7);
            self.delimited(start, b"]]>", TokenKind::CData, "Unterminated CDATA section")
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.parse_doctype(start)
        } else {
            Err(ParseError::new(
                "Invalid declaration - expected comment, CDATA, or DOCTYPE",
                start,
            ))
        }
    }

    /// Content up to a fixed terminator, which is consumed
    fn delimited(
        &mut self,
        start: usize,
        terminator: &[u8],
        kind: TokenKind,
        message: &'static str,
    ) -> Result<Token<'a>, ParseError> {
        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find_sequence(terminator)
            .ok_or_else(|| ParseError::new(message, start))?;
        let content = self.scanner.slice(content_start, end);
        self.scanner.set_position(end + terminator.len());
        Ok(Token::new(kind, (start, self.scanner.position())).with_content(Cow::Borrowed(content)))
    }

    /// DOCTYPE with an optional bracketed internal subset
    fn parse_doctype(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        while let Some(b) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, b) {
                (Some(q), _) if q == b => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => {
                    return Ok(Token::new(TokenKind::DocType, (start, self.scanner.position())));
                }
                _ => {}
            }
        }
        Err(ParseError::new("Unterminated DOCTYPE", start))
    }

    fn parse_pi(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("Invalid processing instruction target", start))?;
        let kind = if name == b"xml" {
            TokenKind::XmlDeclaration
        } else {
            TokenKind::ProcessingInstruction
        };
        let token = self.delimited(start, b"?>", kind, "Unterminated processing instruction")?;
        Ok(token.with_name(name))
    }

    fn parse_text(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(start + self.scanner.remaining().len());
        let content = self.scanner.slice(start, end);
        self.scanner.set_position(end);
        Token::new(TokenKind::Text, (start, end)).with_content(super::entities::decode_text(content))
    }
}
