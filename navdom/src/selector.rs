//! A small subset of CSS selectors: compound selectors made of a tag or `*`,
//! `#id`, `.class`, `:not(.class)` and `[attr]` / `[attr=value]`, joined by the
//! descendant (whitespace) or child (`>`) combinators. A leading `>` anchors the
//! first compound to the children of the scope element.

use std::str::FromStr;

use crate::document::Document;
use crate::element::{Element, NodeId};
use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    not_classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.not_classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(&element.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        if self.not_classes.iter().any(|c| element.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|(name, value)| {
            match (element.attribute(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    // Each step carries its relation to the step before it (or to the scope).
    steps: Vec<(Combinator, Compound)>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        Parser::new(source).parse()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches. With a `scope`, the selector is evaluated
    /// relative to it and only strict descendants of the scope can match.
    pub fn matches(&self, doc: &Document, node: NodeId, scope: Option<NodeId>) -> bool {
        match self.steps.len() {
            0 => false,
            n => self.matches_step(doc, node, n - 1, scope),
        }
    }

    fn matches_step(&self, doc: &Document, node: NodeId, index: usize, scope: Option<NodeId>) -> bool {
        let (combinator, compound) = &self.steps[index];
        let Some(element) = doc.get(node) else {
            return false;
        };
        if !compound.matches(element) {
            return false;
        }

        if index == 0 {
            return match (combinator, scope) {
                (Combinator::Child, Some(scope)) => element.parent == Some(scope),
                (Combinator::Child, None) => element.parent == Some(doc.body()),
                (Combinator::Descendant, Some(scope)) => doc.ancestors(node).contains(&scope),
                (Combinator::Descendant, None) => true,
            };
        }

        match combinator {
            Combinator::Child => element
                .parent
                .is_some_and(|parent| self.matches_step(doc, parent, index - 1, scope)),
            Combinator::Descendant => doc
                .ancestors(node)
                .into_iter()
                .any(|ancestor| self.matches_step(doc, ancestor, index - 1, scope)),
        }
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn expect(&mut self, c: char) -> Result<(), DomError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}' at {}", self.pos)))
        }
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error(format!("expected identifier at {start}")));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute_value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.expect(quote)?;
                Ok(value)
            }
            _ => self.ident(),
        }
    }

    fn parse(mut self) -> Result<Selector, DomError> {
        let mut steps = Vec::new();
        self.skip_whitespace();

        let mut combinator = Combinator::Descendant;
        if self.peek() == Some('>') {
            self.pos += 1;
            self.skip_whitespace();
            combinator = Combinator::Child;
        }

        loop {
            let compound = self.compound()?;
            steps.push((combinator, compound));

            let had_space = self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    combinator = Combinator::Child;
                }
                Some(_) if had_space => combinator = Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected '{c}' at {}", self.pos))),
            }
        }

        Ok(Selector {
            source: self.source.to_string(),
            steps,
        })
    }

    fn compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(char::is_alphabetic) {
            compound.tag = Some(self.ident()?);
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some(':') => {
                    self.pos += 1;
                    let pseudo = self.ident()?;
                    if pseudo != "not" {
                        return Err(self.error(format!("unsupported pseudo-class ':{pseudo}'")));
                    }
                    self.expect('(')?;
                    self.expect('.')?;
                    compound.not_classes.push(self.ident()?);
                    self.expect(')')?;
                }
                Some('[') => {
                    self.pos += 1;
                    let name = self.ident()?;
                    let value = if self.peek() == Some('=') {
                        self.pos += 1;
                        Some(self.attribute_value()?)
                    } else {
                        None
                    };
                    self.expect(']')?;
                    compound.attributes.push((name, value));
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(self.error(format!("empty compound selector at {}", self.pos)));
        }
        Ok(compound)
    }
}
