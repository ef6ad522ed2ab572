use crate::document::Document;
use crate::element::NodeId;
use crate::error::DomError;
use crate::selector::Selector;

/// One stylesheet rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector: Selector,
    pub declarations: Vec<(String, String)>,
}

impl Rule {
    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }
}

/// Page stylesheet. Only source order is used to resolve conflicts: the last
/// matching rule that declares a property wins.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(&mut self, selector: &str, declarations: &[(&str, &str)]) -> Result<(), DomError> {
        let selector = Selector::parse(selector)?;
        self.rules.push(Rule {
            selector,
            declarations: declarations
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
        });
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Value declared for `property` by the last rule matching `node`.
    pub fn resolve(&self, doc: &Document, node: NodeId, property: &str) -> Option<String> {
        self.rules
            .iter()
            .rev()
            .filter(|rule| rule.selector.matches(doc, node, None))
            .find_map(|rule| rule.declaration(property).map(str::to_string))
    }
}
