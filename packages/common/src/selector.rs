//! # CSS Selectors
//!
//! A deliberately small selector language, enough to re-locate elements
//! saved by the editor and to express region heuristics:
//!
//! - type (`h1`), universal (`*`), id (`#hero`), class (`.card`)
//! - attribute presence and equality (`[data-qe-id]`, `[role="banner"]`)
//! - `:nth-of-type(n)` (1-based)
//! - descendant (whitespace) and child (`>`) combinators
//! - selector groups (`header, .site-header`)
//!
//! Selectors evaluate against any [`Dom`] in document order.

use crate::dom::{Dom, NodeId};
use crate::error::DomError;
use crate::result::DomResult;
use crate::selector_lexer::{tokenize, Token};
use crate::walk::descendants;
use std::ops::Range;

/// Comma-separated group of selectors; matches if any member matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Compounds joined by combinators, e.g. `main > p.lead`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub head: CompoundSelector,
    /// Each entry relates a compound to the one before it
    pub tail: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Simple selectors applying to a single element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
    pub nth_of_type: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub value: Option<String>,
}

impl SelectorList {
    pub fn parse(source: &str) -> DomResult<Self> {
        SelectorParser::new(source)?.parse_list()
    }

    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(dom, node))
    }

    /// First attached match in document order
    pub fn first<D: Dom + ?Sized>(&self, dom: &D) -> Option<NodeId> {
        descendants(dom, dom.root())
            .into_iter()
            .find(|node| self.matches(dom, *node))
    }

    /// Every attached match in document order
    pub fn all<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        descendants(dom, dom.root())
            .into_iter()
            .filter(|node| self.matches(dom, *node))
            .collect()
    }
}

impl ComplexSelector {
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        self.matches_at(dom, node, self.tail.len())
    }

    /// Match compound `index` (0 = head) against `node`, then walk leftwards
    fn matches_at<D: Dom + ?Sized>(&self, dom: &D, node: NodeId, index: usize) -> bool {
        let (combinator, compound) = if index == 0 {
            (None, &self.head)
        } else {
            let (combinator, compound) = &self.tail[index - 1];
            (Some(*combinator), compound)
        };

        if !compound.matches(dom, node) {
            return false;
        }

        match combinator {
            None => true,
            Some(Combinator::Child) => dom
                .parent(node)
                .map(|parent| self.matches_at(dom, parent, index - 1))
                .unwrap_or(false),
            Some(Combinator::Descendant) => {
                let mut ancestor = dom.parent(node);
                while let Some(candidate) = ancestor {
                    if self.matches_at(dom, candidate, index - 1) {
                        return true;
                    }
                    ancestor = dom.parent(candidate);
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if dom.tag_name(node) != *tag {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if dom.dom_id(node).as_deref() != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let classes = dom.class_list(node);
            if !self.classes.iter().all(|c| classes.contains(c)) {
                return false;
            }
        }

        for attribute in &self.attributes {
            match (dom.attribute(node, &attribute.name), &attribute.value) {
                (None, _) => return false,
                (Some(actual), Some(expected)) if actual != *expected => return false,
                _ => {}
            }
        }

        if let Some(n) = self.nth_of_type {
            if nth_of_type(dom, node) != Some(n) {
                return false;
            }
        }

        true
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.nth_of_type.is_none()
    }
}

/// 1-based position among siblings sharing the node's tag
fn nth_of_type<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Option<usize> {
    let parent = dom.parent(node)?;
    let tag = dom.tag_name(node);
    dom.children(parent)
        .into_iter()
        .filter(|sibling| dom.tag_name(*sibling) == tag)
        .position(|sibling| sibling == node)
        .map(|i| i + 1)
}

/// Parse and evaluate `selector`, returning the first match
pub fn query_selector<D: Dom + ?Sized>(dom: &D, selector: &str) -> DomResult<Option<NodeId>> {
    Ok(SelectorList::parse(selector)?.first(dom))
}

/// Parse and evaluate `selector`, returning every match
pub fn query_selector_all<D: Dom + ?Sized>(dom: &D, selector: &str) -> DomResult<Vec<NodeId>> {
    Ok(SelectorList::parse(selector)?.all(dom))
}

/// Structural selector for `node` from the document root,
/// e.g. `body > main:nth-of-type(1) > h1:nth-of-type(2)`
pub fn selector_path<D: Dom + ?Sized>(dom: &D, node: NodeId) -> String {
    let mut segments = Vec::new();
    let mut current = node;

    while let Some(parent) = dom.parent(current) {
        let position = nth_of_type(dom, current).unwrap_or(1);
        segments.push(format!("{}:nth-of-type({})", dom.tag_name(current), position));
        current = parent;
    }
    segments.push(dom.tag_name(current));
    segments.reverse();

    segments.join(" > ")
}

/// Recursive-descent parser over the lexed token stream
struct SelectorParser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    source_len: usize,
}

impl<'src> SelectorParser<'src> {
    fn new(source: &'src str) -> DomResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            source_len: source.len(),
        })
    }

    fn parse_list(&mut self) -> DomResult<SelectorList> {
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();

            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                None => break,
                Some(other) => {
                    return Err(DomError::invalid_selector(
                        self.peek_pos(),
                        format!("unexpected {:?}", other),
                    ))
                }
            }
        }

        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> DomResult<ComplexSelector> {
        let head = self.parse_compound()?;
        let mut tail = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                Some(Token::Child) => {
                    self.advance();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(Token::Comma) | None => break,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(other) => {
                    return Err(DomError::invalid_selector(
                        self.peek_pos(),
                        format!("unexpected {:?}", other),
                    ))
                }
            };
            tail.push((combinator, self.parse_compound()?));
        }

        Ok(ComplexSelector { head, tail })
    }

    fn parse_compound(&mut self) -> DomResult<CompoundSelector> {
        let start = self.peek_pos();
        let mut compound = CompoundSelector::default();

        match self.peek() {
            Some(Token::Ident(name)) => {
                compound.tag = Some(name.to_ascii_lowercase());
                self.advance();
            }
            Some(Token::Universal) => {
                self.advance();
                // `*` alone is a valid compound
                return self.parse_compound_rest(compound);
            }
            _ => {}
        }

        let compound = self.parse_compound_rest(compound)?;
        if compound.is_empty() {
            return match self.peek() {
                None => Err(DomError::unexpected_end(self.source_len)),
                Some(other) => Err(DomError::invalid_selector(
                    start,
                    format!("expected a selector, found {:?}", other),
                )),
            };
        }
        Ok(compound)
    }

    fn parse_compound_rest(&mut self, mut compound: CompoundSelector) -> DomResult<CompoundSelector> {
        loop {
            match self.peek() {
                Some(Token::Hash(id)) => {
                    compound.id = Some(id.to_string());
                    self.advance();
                }
                Some(Token::Class(class)) => {
                    compound.classes.push(class.to_string());
                    self.advance();
                }
                Some(Token::NthOfType(n)) => {
                    compound.nth_of_type = Some(*n);
                    self.advance();
                }
                Some(Token::LBracket) => {
                    self.advance();
                    compound.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> DomResult<AttributeSelector> {
        self.skip_whitespace();
        let name = match self.advance() {
            Some((Token::Ident(name), _)) => name.to_string(),
            Some((other, span)) => {
                return Err(DomError::invalid_selector(
                    span.start,
                    format!("expected attribute name, found {:?}", other),
                ))
            }
            None => return Err(DomError::unexpected_end(self.source_len)),
        };
        self.skip_whitespace();

        let value = if matches!(self.peek(), Some(Token::Equals)) {
            self.advance();
            self.skip_whitespace();
            let value = match self.advance() {
                Some((Token::Ident(v), _))
                | Some((Token::Number(v), _))
                | Some((Token::String(v), _))
                | Some((Token::SingleQuoteString(v), _)) => v.to_string(),
                Some((other, span)) => {
                    return Err(DomError::invalid_selector(
                        span.start,
                        format!("expected attribute value, found {:?}", other),
                    ))
                }
                None => return Err(DomError::unexpected_end(self.source_len)),
            };
            self.skip_whitespace();
            Some(value)
        } else {
            None
        };

        match self.advance() {
            Some((Token::RBracket, _)) => Ok(AttributeSelector { name, value }),
            Some((other, span)) => Err(DomError::invalid_selector(
                span.start,
                format!("expected ']', found {:?}", other),
            )),
            None => Err(DomError::unexpected_end(self.source_len)),
        }
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source_len)
    }

    fn advance(&mut self) -> Option<(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// Returns true if any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.peek(), Some(Token::Whitespace)) {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }
}
