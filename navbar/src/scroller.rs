//! Inner scroll region collaborator.

use std::fmt::Debug;

use log::{debug, warn};
use navdom::{Document, DomError, NodeId};

use crate::options::ScrollerOptions;

/// Manages the scrollable content inside a sidebar element.
pub trait Scroller: Debug {
    fn init(&mut self, doc: &mut Document, element: NodeId, options: &ScrollerOptions) -> Result<(), DomError>;

    /// Recompute the scrollbar after the sidebar was shown or hidden.
    fn resize_scrollbar(&mut self, doc: &mut Document, element: NodeId) -> Result<(), DomError>;

    fn destroy(&mut self, doc: &mut Document, element: NodeId) -> Result<(), DomError>;
}

/// Creates a scroller for each new sidebar. Registering one with
/// [`crate::Sidebars::with_scroller`] is what makes scrolling available.
pub type ScrollerFactory = fn() -> Box<dyn Scroller>;

pub const CLASS_SCROLLER: &str = "sidebar-scroller";
pub const CLASS_SCROLLER_INVERSE: &str = "sidebar-scroller-inverse";
pub const CLASS_SCROLLER_CONTENT: &str = "sidebar-scroller-content";
pub const CLASS_SCROLLER_ACTIVE: &str = "sidebar-scroller-active";

/// Scroller that exposes its state through classes and a `margin-top` offset
/// on the content element.
#[derive(Debug, Default)]
pub struct ClassScroller {
    content: Option<NodeId>,
    offset: f64,
}

impl ClassScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn Scroller> {
        Box::new(Self::new())
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn max_offset(&self, doc: &Document, element: NodeId) -> f64 {
        let Some(content) = self.content else {
            return 0.0;
        };
        let viewport = doc.get(element).map(|e| e.height).unwrap_or(0.0);
        let content = doc.get(content).map(|e| e.height).unwrap_or(0.0);
        (content - viewport).max(0.0)
    }

    /// Scroll the content by `dy` pixels, clamped to the scrollable range.
    /// Returns true if the offset changed.
    pub fn scroll_by(&mut self, doc: &mut Document, element: NodeId, dy: f64) -> Result<bool, DomError> {
        let max = self.max_offset(doc, element);
        let next = (self.offset + dy).clamp(0.0, max);
        if next == self.offset {
            return Ok(false);
        }
        self.offset = next;
        self.apply_offset(doc)?;
        Ok(true)
    }

    fn apply_offset(&self, doc: &mut Document) -> Result<(), DomError> {
        if let Some(content) = self.content {
            let value = if self.offset == 0.0 {
                String::new()
            } else {
                format!("-{}px", self.offset)
            };
            doc.set_style(content, "margin-top", &value)?;
        }
        Ok(())
    }
}

impl Scroller for ClassScroller {
    fn init(&mut self, doc: &mut Document, element: NodeId, options: &ScrollerOptions) -> Result<(), DomError> {
        // Resolve the content first so a bad selector leaves the element untouched
        self.content = doc.query_selector_within(element, &options.content_selector)?;

        doc.add_class(element, CLASS_SCROLLER)?;
        if options.scrollbar_inverse {
            doc.add_class(element, CLASS_SCROLLER_INVERSE)?;
        }
        match self.content {
            Some(content) => doc.add_class(content, CLASS_SCROLLER_CONTENT)?,
            None => warn!("no scroll content matching '{}'", options.content_selector),
        }
        self.resize_scrollbar(doc, element)
    }

    fn resize_scrollbar(&mut self, doc: &mut Document, element: NodeId) -> Result<(), DomError> {
        let max = self.max_offset(doc, element);
        if max > 0.0 {
            doc.add_class(element, CLASS_SCROLLER_ACTIVE)?;
        } else {
            doc.remove_class(element, CLASS_SCROLLER_ACTIVE)?;
        }
        if self.offset > max {
            self.offset = max;
            self.apply_offset(doc)?;
        }
        debug!("scrollbar resized on {element}: max offset {max}");
        Ok(())
    }

    fn destroy(&mut self, doc: &mut Document, element: NodeId) -> Result<(), DomError> {
        for class in [CLASS_SCROLLER, CLASS_SCROLLER_INVERSE, CLASS_SCROLLER_ACTIVE] {
            doc.remove_class(element, class)?;
        }
        if let Some(content) = self.content.take() {
            if doc.exists(content) {
                doc.remove_class(content, CLASS_SCROLLER_CONTENT)?;
                doc.set_style(content, "margin-top", "")?;
            }
        }
        self.offset = 0.0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use navdom::Element;

    use super::*;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let sidebar = doc.append(body, Element::div().class("sidebar").size(280.0, 600.0)).unwrap();
        let menu = doc
            .append(sidebar, Element::div().class("sidebar-menu").size(280.0, 900.0))
            .unwrap();
        (doc, sidebar, menu)
    }

    #[test]
    fn overflowing_content_activates_scrollbar() {
        let (mut doc, sidebar, menu) = page();
        let mut scroller = ClassScroller::new();
        scroller.init(&mut doc, sidebar, &ScrollerOptions::default()).unwrap();

        assert!(doc.has_class(sidebar, CLASS_SCROLLER));
        assert!(doc.has_class(sidebar, CLASS_SCROLLER_ACTIVE));
        assert!(doc.has_class(menu, CLASS_SCROLLER_CONTENT));

        doc.set_size(menu, 280.0, 100.0).unwrap();
        scroller.resize_scrollbar(&mut doc, sidebar).unwrap();
        assert!(!doc.has_class(sidebar, CLASS_SCROLLER_ACTIVE));
    }

    #[test]
    fn scroll_offset_is_clamped() {
        let (mut doc, sidebar, menu) = page();
        let mut scroller = ClassScroller::new();
        scroller.init(&mut doc, sidebar, &ScrollerOptions::default()).unwrap();

        assert!(scroller.scroll_by(&mut doc, sidebar, 1000.0).unwrap());
        assert_eq!(scroller.offset(), 300.0);
        assert_eq!(doc.style(menu, "margin-top"), Some("-300px"));
        assert!(!scroller.scroll_by(&mut doc, sidebar, 50.0).unwrap());

        scroller.scroll_by(&mut doc, sidebar, -1000.0).unwrap();
        assert_eq!(doc.style(menu, "margin-top"), None);
    }

    #[test]
    fn destroy_removes_hooks() {
        let (mut doc, sidebar, menu) = page();
        let mut scroller = ClassScroller::new();
        let options = ScrollerOptions {
            scrollbar_inverse: true,
            ..Default::default()
        };
        scroller.init(&mut doc, sidebar, &options).unwrap();
        assert!(doc.has_class(sidebar, CLASS_SCROLLER_INVERSE));

        scroller.destroy(&mut doc, sidebar).unwrap();
        assert_eq!(doc.classes(sidebar), vec!["sidebar".to_string()]);
        assert!(!doc.has_class(menu, CLASS_SCROLLER_CONTENT));
    }
}
