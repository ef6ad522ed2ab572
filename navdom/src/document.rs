use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, trace};

use crate::element::{Element, NodeId};
use crate::error::DomError;
use crate::event::{Event, EventKind, EventTarget};
use crate::listener::{HandlerId, Listener, Listeners};
use crate::selector::Selector;
use crate::style::Stylesheet;
use crate::timer::{FiredTimer, TimerId, Timers};
use crate::transform::Matrix;

/// Inner size of the window, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Scrollbar width reported by desktop browsers.
pub const DEFAULT_SCROLLBAR_WIDTH: f64 = 15.0;

/// Headless document: an element arena rooted at `body`, plus the window
/// state, stylesheet, listener table and virtual clock a page would provide.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    body: NodeId,
    viewport: Viewport,
    native_scroll_width: f64,
    active: Option<NodeId>,
    stylesheet: Stylesheet,
    listeners: Listeners,
    timers: Timers,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        let body = Element::new("body").size(viewport.width, viewport.height);
        Self {
            nodes: vec![Some(body)],
            body: NodeId(0),
            viewport,
            native_scroll_width: DEFAULT_SCROLLBAR_WIDTH,
            active: None,
            stylesheet: Stylesheet::new(),
            listeners: Listeners::new(),
            timers: Timers::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // -------------------------------------------------------------------------
    // Element access
    // -------------------------------------------------------------------------

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        match self.nodes.get_mut(node.0) {
            Some(Some(element)) => Ok(element),
            Some(None) => Err(DomError::Removed(node)),
            None => Err(DomError::UnknownNode(node)),
        }
    }

    fn require(&self, node: NodeId) -> Result<&Element, DomError> {
        match self.nodes.get(node.0) {
            Some(Some(element)) => Ok(element),
            Some(None) => Err(DomError::Removed(node)),
            None => Err(DomError::UnknownNode(node)),
        }
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Whether the node is attached to the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.body || (self.exists(node) && self.ancestors(node).contains(&self.body))
    }

    // -------------------------------------------------------------------------
    // Tree manipulation
    // -------------------------------------------------------------------------

    /// Store a detached element.
    pub fn create(&mut self, mut element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        element.parent = None;
        element.children.clear();
        self.nodes.push(Some(element));
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId, DomError> {
        self.require(parent)?;
        let id = self.create(element);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_move(child, parent)?;
        self.detach(child)?;
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Move `node` right before `reference` among its siblings.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        self.insert_relative(reference, node, 0)
    }

    /// Move `node` right after `reference` among its siblings.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        self.insert_relative(reference, node, 1)
    }

    fn insert_relative(&mut self, reference: NodeId, node: NodeId, offset: usize) -> Result<(), DomError> {
        if reference == node {
            return Ok(());
        }
        let parent = self
            .require(reference)?
            .parent
            .ok_or(DomError::Detached(reference))?;
        self.check_move(node, parent)?;
        self.detach(node)?;

        let siblings = &mut self.get_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|&n| n == reference)
            .ok_or(DomError::Detached(reference))?;
        siblings.insert(index + offset, node);
        self.get_mut(node)?.parent = Some(parent);
        Ok(())
    }

    fn check_move(&self, node: NodeId, parent: NodeId) -> Result<(), DomError> {
        self.require(node)?;
        self.require(parent)?;
        if node == parent || self.ancestors(parent).contains(&node) {
            return Err(DomError::Cycle { node, parent });
        }
        Ok(())
    }

    /// Unlink `node` from its parent. The node stays allocated.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.require(node)?.parent else {
            return Ok(());
        };
        self.get_mut(parent)?.children.retain(|&c| c != node);
        self.get_mut(node)?.parent = None;
        Ok(())
    }

    /// Remove `node` and its subtree, dropping every listener registered on
    /// the removed elements.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.body {
            return Err(DomError::Detached(node));
        }
        self.detach(node)?;

        let mut subtree = vec![node];
        subtree.extend(self.descendants(node));
        for id in subtree {
            self.listeners.off_target(EventTarget::Node(id));
            if self.active == Some(id) {
                self.active = None;
            }
            self.nodes[id.0] = None;
        }
        debug!("removed {node}");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Traversal and queries
    // -------------------------------------------------------------------------

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(Element::children).unwrap_or(&[])
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(node);
        while let Some(id) = current {
            result.push(id);
            current = self.parent(id);
        }
        result
    }

    /// Descendants in document (pre-)order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        result
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&n| self.get(n).is_some_and(|e| e.id.as_deref() == Some(id)))
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.body)
            .into_iter()
            .filter(|&n| selector.matches(self, n, None))
            .collect())
    }

    /// First descendant of `scope` matching `selector`, evaluated relative to `scope`.
    pub fn query_selector_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n, Some(scope))))
    }

    /// Direct child of `parent` carrying `class`.
    pub fn child_with_class(&self, parent: NodeId, class: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.has_class(c, class))
    }

    /// Whether `node` or one of its ancestors carries `class`.
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| self.has_class(n, class))
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        if self.get_mut(node)?.add_class(class) {
            trace!("{node} +.{class}");
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        if self.get_mut(node)?.remove_class(class) {
            trace!("{node} -.{class}");
        }
        Ok(())
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.get(node).map(|e| e.classes.clone()).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.attribute(name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        let element = self.get_mut(node)?;
        let value = value.into();
        if name == "id" {
            element.id = Some(value);
        } else {
            element.attributes.insert(name.to_string(), value);
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let element = self.get_mut(node)?;
        if name == "id" {
            element.id = None;
        } else {
            element.attributes.remove(name);
        }
        Ok(())
    }

    /// `data-*` attributes with the prefix stripped (`data-min-lock-width`
    /// becomes `min-lock-width`).
    pub fn dataset(&self, node: NodeId) -> BTreeMap<String, String> {
        self.get(node)
            .map(|e| {
                e.attributes
                    .iter()
                    .filter_map(|(k, v)| k.strip_prefix("data-").map(|k| (k.to_string(), v.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Styles
    // -------------------------------------------------------------------------

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.get(node)?.inline_style(property)
    }

    /// Set an inline style. An empty value removes the property, so the
    /// stylesheet value applies again.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let element = self.get_mut(node)?;
        if value.is_empty() {
            element.style.remove(property);
        } else {
            element.style.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Inline value, falling back to the stylesheet.
    pub fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        if let Some(value) = self.style(node, property) {
            return Some(value.to_string());
        }
        self.stylesheet.resolve(self, node, property)
    }

    /// Computed `transform` of `node` as a matrix. Unparsable transforms
    /// resolve to the identity.
    pub fn transform_matrix(&self, node: NodeId) -> Matrix {
        let Some(value) = self.computed_style(node, "transform") else {
            return Matrix::IDENTITY;
        };
        let reference = self.get(node).map(|e| (e.width, e.height)).unwrap_or_default();
        Matrix::parse(&value, reference).unwrap_or_else(|| {
            debug!("unsupported transform '{value}' on {node}");
            Matrix::IDENTITY
        })
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn stylesheet_mut(&mut self) -> &mut Stylesheet {
        &mut self.stylesheet
    }

    // -------------------------------------------------------------------------
    // Geometry and window
    // -------------------------------------------------------------------------

    pub fn set_size(&mut self, node: NodeId, width: f64, height: f64) -> Result<(), DomError> {
        let element = self.get_mut(node)?;
        element.width = width;
        element.height = height;
        Ok(())
    }

    pub fn inner_width(&self, node: NodeId) -> f64 {
        self.get(node).map(|e| e.width).unwrap_or(0.0)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the window size. The host is expected to dispatch
    /// [`Event::resize`] afterwards.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn body_height(&self) -> f64 {
        self.get(self.body).map(|e| e.height).unwrap_or(0.0)
    }

    pub fn set_body_height(&mut self, height: f64) {
        if let Some(Some(body)) = self.nodes.get_mut(self.body.0) {
            body.height = height;
        }
    }

    /// Width taken by a native vertical scrollbar; 0 on overlay-scrollbar
    /// (touch) platforms.
    pub fn native_scroll_width(&self) -> f64 {
        self.native_scroll_width
    }

    pub fn set_native_scroll_width(&mut self, width: f64) {
        self.native_scroll_width = width;
    }

    pub fn is_touch(&self) -> bool {
        self.native_scroll_width == 0.0
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    pub fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        self.require(node)?;
        self.active = Some(node);
        Ok(())
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    pub fn on(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        namespace: &str,
        owner: u64,
        handler: impl Into<HandlerId>,
    ) -> Result<u64, DomError> {
        if let EventTarget::Node(node) = target {
            self.require(node)?;
        }
        Ok(self.listeners.on(target, kind, namespace, owner, handler))
    }

    pub fn off(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        namespace: &str,
        handler: Option<&HandlerId>,
    ) -> usize {
        self.listeners.off(target, kind, namespace, handler)
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Targets an event visits: the target node and its ancestors, then the
    /// document and the window. Window events only visit the window.
    pub fn propagation_path(&self, event: &Event) -> Vec<EventTarget> {
        match event.target {
            EventTarget::Window => vec![EventTarget::Window],
            EventTarget::Document => vec![EventTarget::Document],
            EventTarget::Node(node) if !event.kind.bubbles() => vec![EventTarget::Node(node)],
            EventTarget::Node(node) => {
                let mut path = vec![EventTarget::Node(node)];
                path.extend(self.ancestors(node).into_iter().map(EventTarget::Node));
                if self.is_connected(node) {
                    path.push(EventTarget::Document);
                    path.push(EventTarget::Window);
                }
                path
            }
        }
    }

    /// Listeners on `target` for `kind`, in registration order.
    pub fn listeners_at(&self, target: EventTarget, kind: EventKind) -> Vec<Listener> {
        self.listeners.at(target, kind)
    }

    pub fn is_listening(&self, listener: &Listener) -> bool {
        self.listeners.is_registered(listener.seq())
    }

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn set_timeout(&mut self, delay: Duration, owner: u64, tag: &str) -> TimerId {
        self.timers.set_timeout(delay, owner, tag)
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.clear_timeout(id)
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Advance the virtual clock and return fired timers.
    pub fn advance(&mut self, by: Duration) -> Vec<FiredTimer> {
        self.timers.advance(by)
    }
}
