//! Slice Reader
//!
//! Pull reader over a byte slice. Tag names and entity-free content are
//! borrowed straight from the input.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::{parse_attributes, Attribute};
use crate::core::tokenizer::{ParseError, Token, TokenKind, Tokenizer};

/// XML reader from a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
    event_start: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
            event_start: 0,
        }
    }

    /// Byte offset where the last returned event starts
    pub fn event_start(&self) -> usize {
        self.event_start
    }

    /// Get the next XML event, `None` at end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        loop {
            let Some(token) = self.tokenizer.next_token()? else {
                return Ok(None);
            };
            self.event_start = token.span.0;

            let event = match token.kind {
                TokenKind::Eof => return Ok(None),
                TokenKind::StartTag | TokenKind::EmptyTag => {
                    let attrs = self.tag_attributes(&token)?;
                    let start = StartElement::new(token.name.unwrap_or_default(), attrs);
                    if token.kind == TokenKind::EmptyTag {
                        XmlEvent::EmptyElement(start)
                    } else {
                        XmlEvent::StartElement(start)
                    }
                }
                TokenKind::EndTag => XmlEvent::EndElement(EndElement {
                    name: token.name.unwrap_or_default(),
                }),
                TokenKind::Text => match token.content {
                    Some(content) if !content.is_empty() => XmlEvent::Text(content),
                    _ => continue,
                },
                TokenKind::CData => XmlEvent::CData(token.content.unwrap_or_default()),
                TokenKind::Comment => XmlEvent::Comment(token.content.unwrap_or_default()),
                TokenKind::ProcessingInstruction => XmlEvent::ProcessingInstruction {
                    target: token.name.unwrap_or_default(),
                    data: token.content,
                },
                TokenKind::XmlDeclaration | TokenKind::DocType => XmlEvent::Prolog,
            };
            return Ok(Some(event));
        }
    }

    /// Parse attributes from a tag token
    fn tag_attributes(&self, token: &Token<'a>) -> Result<Vec<Attribute<'a>>, ParseError> {
        let (start, end) = token.span;
        let tag = &self.input[start..end];

        // Skip '<' and the element name
        let name_len = token.name.map_or(0, <[u8]>::len);
        let attr_start = 1 + name_len;
        let attr_end = if tag.ends_with(b"/>") { tag.len() - 2 } else { tag.len() - 1 };
        if attr_start >= attr_end {
            return Ok(Vec::new());
        }

        parse_attributes(&tag[attr_start..attr_end])
            .map_err(|msg| ParseError::new(msg, start + attr_start))
    }
}
