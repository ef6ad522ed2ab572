//! The sidebar controller.

mod drag;
mod events;

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use navdom::{Document, Element, EventKind, EventTarget, NodeId, TimerId};

use crate::error::SidebarError;
use crate::gesture::{Direction, PanRecognizer};
use crate::options::{ForceToggle, Position, SidebarOptions};
use crate::scroller::Scroller;
use crate::state::{SidebarState, Transition, toggle_transition};

pub use events::{Handler, RESIZE_DEBOUNCE};

static NEXT_GUID: AtomicU64 = AtomicU64::new(1);

/// Class added to a right-hand sidebar.
pub const CLASS_RIGHT: &str = "sidebar-right";
/// Class added once the sidebar is initialised.
pub const CLASS_READY: &str = "sidebar-ready";
/// Class of the swipe area inserted next to a draggable sidebar.
pub const CLASS_SWIPE: &str = "sidebar-swipe";
/// Attribute marking sidebar elements.
pub const DATA_SIDEBAR: &str = "data-sidebar";

/// A collapsible sidebar bound to one element.
///
/// The state lives in the element's classes: `is_open` and friends read the
/// document every time. Operations that can open the sidebar take its peers,
/// the other sidebars of the page, which get force-closed first.
#[derive(Debug)]
pub struct Sidebar {
    guid: u64,
    namespace: String,
    options: SidebarOptions,
    event_kind: EventKind,
    native_scroll_width: f64,

    element: NodeId,
    toggle: Option<NodeId>,
    wrapper: NodeId,
    container: Option<NodeId>,
    swipe: Option<NodeId>,

    pan: Option<PanRecognizer>,
    scroller: Option<Box<dyn Scroller>>,

    // Interaction state
    drag_start_position: Option<f64>,
    drag_direction: Option<Direction>,
    mouse_drag_end: bool,
    resize_delay: Option<TimerId>,
}

impl Sidebar {
    /// Wrap `element` and register the listeners the options ask for.
    pub fn new(
        doc: &mut Document,
        element: NodeId,
        mut options: SidebarOptions,
        scroller: Option<Box<dyn Scroller>>,
    ) -> Result<Self, SidebarError> {
        if !doc.exists(element) {
            return Err(SidebarError::NotInitialized(element));
        }

        let guid = NEXT_GUID.fetch_add(1, Ordering::Relaxed);
        let touch = doc.is_touch();

        let toggle = match options.toggle_id.as_deref() {
            Some(id) => {
                let found = doc.get_element_by_id(id);
                if found.is_none() {
                    warn!("sidebar toggle '#{id}' not found");
                }
                found
            }
            None => None,
        };
        let container = doc
            .parent(element)
            .and_then(|parent| doc.child_with_class(parent, &options.classes.container));

        let wrapper = doc.create(Element::div().class(&options.classes.wrapper));
        doc.insert_before(element, wrapper)?;
        doc.append_child(wrapper, element)?;
        doc.set_attr(element, DATA_SIDEBAR, "true")?;

        if options.position != Position::Right {
            options.position = Position::Left;
        } else {
            doc.add_class(element, CLASS_RIGHT)?;
        }
        if doc.has_class(element, CLASS_RIGHT) {
            options.position = Position::Right;
        }
        if options.position == Position::Right {
            options.keyboard.shift = true;
        }

        let mut sidebar = Self {
            guid,
            namespace: format!("st.sidebar{guid}"),
            options,
            event_kind: if touch { EventKind::TouchStart } else { EventKind::Click },
            native_scroll_width: doc.native_scroll_width(),
            element,
            toggle,
            wrapper,
            container,
            swipe: None,
            pan: None,
            scroller: None,
            drag_start_position: None,
            drag_direction: None,
            mouse_drag_end: false,
            resize_delay: None,
        };

        if sidebar.options.locked {
            sidebar.options.force_toggle = ForceToggle::Always;
            sidebar.set_transition(doc, "none")?;
            let classes = &sidebar.options.classes;
            doc.add_class(element, &classes.locked)?;
            doc.add_class(element, &classes.force_open)?;
            doc.add_class(element, &classes.open_init())?;
            if let Some(toggle) = toggle {
                doc.add_class(toggle, &classes.locked_toggle())?;
                doc.add_class(toggle, &classes.force_open_toggle())?;
            }
        }

        if let Some(toggle) = toggle {
            sidebar.listen(doc, EventTarget::Node(toggle), sidebar.event_kind, Handler::Toggle)?;
            if !touch && sidebar.options.toggle_open_on_hover {
                sidebar.listen(doc, EventTarget::Node(toggle), EventKind::MouseOver, Handler::HoverOpen)?;
            }
        }
        sidebar.listen(doc, EventTarget::Window, EventKind::KeyUp, Handler::Keyboard)?;
        sidebar.listen(doc, EventTarget::Window, EventKind::Resize, Handler::Resize)?;

        let open_init = sidebar.options.classes.open_init();
        if doc.has_class(element, &open_init) {
            if sidebar.is_over_min_width(doc) {
                doc.add_class(element, &sidebar.options.classes.open)?;
            } else {
                doc.remove_class(element, &sidebar.options.classes.open)?;
            }
            doc.remove_class(element, &open_init)?;
        }

        if sidebar.is_open(doc) {
            sidebar.listen(doc, EventTarget::Document, sidebar.event_kind, Handler::CloseExternal)?;
        }

        sidebar.init_scroller(doc, scroller)?;
        sidebar.init_gesture(doc)?;
        sidebar.set_transition(doc, "")?;
        doc.add_class(element, CLASS_READY)?;

        debug!(
            "sidebar {guid} ready on {element} ({}, locked: {})",
            sidebar.options.position, sidebar.options.locked
        );
        Ok(sidebar)
    }

    fn init_scroller(&mut self, doc: &mut Document, scroller: Option<Box<dyn Scroller>>) -> Result<(), SidebarError> {
        let Some(mut scroller) = scroller.filter(|_| self.options.use_scroller) else {
            return Ok(());
        };
        let mut options = self.options.scroller.clone();
        options.scrollbar_inverse = self.options.position == Position::Right;
        match scroller.init(doc, self.element, &options) {
            Ok(()) => self.scroller = Some(scroller),
            Err(e) => {
                warn!("sidebar {} continues without a scroller: {e}", self.guid);
                scroller.destroy(doc, self.element)?;
            }
        }
        Ok(())
    }

    fn init_gesture(&mut self, doc: &mut Document) -> Result<(), SidebarError> {
        if !self.options.draggable {
            return Ok(());
        }

        let swipe = doc.create(
            Element::div()
                .id(format!("{CLASS_SWIPE}{}", self.guid))
                .class(CLASS_SWIPE),
        );
        doc.insert_after(self.element, swipe)?;
        self.swipe = Some(swipe);

        let wrapper = EventTarget::Node(self.wrapper);
        self.listen(doc, wrapper, EventKind::PointerDown, Handler::Pan)?;
        for kind in [EventKind::PointerMove, EventKind::PointerUp, EventKind::PointerCancel] {
            self.listen(doc, EventTarget::Window, kind, Handler::Pan)?;
        }
        self.pan = Some(PanRecognizer::new(self.options.gesture));
        Ok(())
    }

    fn destroy_gesture(&mut self, doc: &mut Document) -> Result<(), SidebarError> {
        if self.pan.take().is_none() {
            return Ok(());
        }
        for kind in [EventKind::PointerMove, EventKind::PointerUp, EventKind::PointerCancel] {
            self.unlisten(doc, EventTarget::Window, kind, Handler::Pan);
        }
        self.unlisten(doc, EventTarget::Node(self.wrapper), EventKind::PointerDown, Handler::Pan);
        if let Some(swipe) = self.swipe.take() {
            doc.remove(swipe)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn guid(&self) -> u64 {
        self.guid
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn wrapper(&self) -> NodeId {
        self.wrapper
    }

    pub fn toggle_element(&self) -> Option<NodeId> {
        self.toggle
    }

    /// The `.container-main` sibling found when the sidebar was created.
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn swipe_element(&self) -> Option<NodeId> {
        self.swipe
    }

    pub fn options(&self) -> &SidebarOptions {
        &self.options
    }

    pub fn position(&self) -> Position {
        self.options.position
    }

    /// Locked sidebars stay open above the breakpoint.
    pub fn is_locked(&self) -> bool {
        self.options.locked
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.element, &self.options.classes.open)
    }

    pub fn is_fully_opened(&self, doc: &Document) -> bool {
        doc.has_class(self.element, &self.options.classes.force_open)
    }

    pub fn state(&self, doc: &Document) -> SidebarState {
        SidebarState::from_flags(self.is_open(doc), self.is_fully_opened(doc))
    }

    /// Whether the window is at least as wide as the breakpoint. A visible
    /// page scrollbar counts towards the width.
    pub fn is_over_min_width(&self, doc: &Document) -> bool {
        let viewport = doc.viewport();
        let mut width = viewport.width;
        if doc.body_height() > viewport.height {
            width += self.native_scroll_width;
        }
        width >= f64::from(self.options.min_lock_width)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    pub fn force_open(&mut self, doc: &mut Document, peers: &mut [&mut Sidebar]) -> Result<(), SidebarError> {
        if self.state(doc) == SidebarState::ForceOpen {
            return Ok(());
        }

        doc.add_class(self.element, &self.options.classes.force_open)?;
        self.open(doc, peers)?;
        if let Some(toggle) = self.toggle {
            doc.add_class(toggle, &self.options.classes.force_open_toggle())?;
        }
        debug!("sidebar {} force-opened", self.guid);
        Ok(())
    }

    pub fn force_close(&mut self, doc: &mut Document) -> Result<(), SidebarError> {
        if !self.is_open(doc) || (self.is_locked() && self.is_over_min_width(doc)) {
            return Ok(());
        }

        if let Some(toggle) = self.toggle {
            doc.remove_class(toggle, &self.options.classes.force_open_toggle())?;
        }
        doc.remove_class(self.element, &self.options.classes.force_open)?;
        self.close(doc)?;
        debug!("sidebar {} force-closed", self.guid);
        Ok(())
    }

    /// Open the sidebar, force-closing every peer first.
    pub fn open(&mut self, doc: &mut Document, peers: &mut [&mut Sidebar]) -> Result<(), SidebarError> {
        if self.is_open(doc) {
            return Ok(());
        }

        for peer in peers.iter_mut() {
            if doc.attr(peer.element, DATA_SIDEBAR) == Some("true") {
                peer.force_close(doc)?;
            }
        }

        if let Some(toggle) = self.toggle {
            doc.add_class(toggle, &self.options.classes.open)?;
        }
        doc.add_class(self.element, &self.options.classes.open)?;
        self.listen(doc, EventTarget::Document, self.event_kind, Handler::CloseExternal)?;

        if let Some(scroller) = self.scroller.as_mut() {
            scroller.resize_scrollbar(doc, self.element)?;
        }
        debug!("sidebar {} opened", self.guid);
        Ok(())
    }

    /// Close the sidebar. A force-opened sidebar stays open above the breakpoint.
    pub fn close(&mut self, doc: &mut Document) -> Result<(), SidebarError> {
        if !self.is_open(doc) || (self.is_fully_opened(doc) && self.is_over_min_width(doc)) {
            return Ok(());
        }

        if let Some(toggle) = self.toggle {
            doc.remove_class(toggle, &self.options.classes.open)?;
        }
        doc.remove_class(self.element, &self.options.classes.open)?;
        self.unlisten(doc, EventTarget::Document, self.event_kind, Handler::CloseExternal);

        if let Some(scroller) = self.scroller.as_mut() {
            scroller.resize_scrollbar(doc, self.element)?;
        }
        debug!("sidebar {} closed", self.guid);
        Ok(())
    }

    pub fn toggle(&mut self, doc: &mut Document, peers: &mut [&mut Sidebar]) -> Result<(), SidebarError> {
        let transition = toggle_transition(
            self.state(doc),
            self.is_over_min_width(doc),
            self.options.force_toggle,
        );
        self.apply(doc, peers, transition)
    }

    pub fn apply(
        &mut self,
        doc: &mut Document,
        peers: &mut [&mut Sidebar],
        transition: Transition,
    ) -> Result<(), SidebarError> {
        match transition {
            Transition::Open => self.open(doc, peers),
            Transition::Close => self.close(doc),
            Transition::ForceOpen => self.force_open(doc, peers),
            Transition::ForceClose => self.force_close(doc),
        }
    }

    /// Unregister every listener, unwrap the element and drop the helpers
    /// created at construction.
    pub fn destroy(mut self, doc: &mut Document) -> Result<(), SidebarError> {
        if let Some(toggle) = self.toggle {
            self.unlisten(doc, EventTarget::Node(toggle), EventKind::MouseOver, Handler::HoverOpen);
            self.unlisten(doc, EventTarget::Node(toggle), self.event_kind, Handler::Toggle);
        }

        self.force_close(doc)?;
        self.unlisten(doc, EventTarget::Window, EventKind::KeyUp, Handler::Keyboard);
        self.unlisten(doc, EventTarget::Window, EventKind::Resize, Handler::Resize);
        self.unlisten(doc, EventTarget::Document, self.event_kind, Handler::CloseExternal);
        if let Some(timer) = self.resize_delay.take() {
            doc.clear_timeout(timer);
            self.set_transition(doc, "")?;
        }

        self.destroy_gesture(doc)?;
        if let Some(mut scroller) = self.scroller.take() {
            scroller.destroy(doc, self.element)?;
        }

        doc.insert_before(self.wrapper, self.element)?;
        doc.remove(self.wrapper)?;

        doc.set_attr(self.element, DATA_SIDEBAR, "")?;
        doc.remove_class(self.element, CLASS_READY)?;
        debug!("sidebar {} destroyed", self.guid);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn listen(
        &self,
        doc: &mut Document,
        target: EventTarget,
        kind: EventKind,
        handler: Handler,
    ) -> Result<(), SidebarError> {
        doc.on(target, kind, &self.namespace, self.guid, handler)?;
        Ok(())
    }

    fn unlisten(&self, doc: &mut Document, target: EventTarget, kind: EventKind, handler: Handler) {
        doc.off(target, kind, &self.namespace, Some(&handler.into()));
    }

    fn set_transition(&self, doc: &mut Document, value: &str) -> Result<(), SidebarError> {
        doc.set_style(self.element, "transition", value)?;
        Ok(())
    }

    fn set_transform(&self, doc: &mut Document, value: &str) -> Result<(), SidebarError> {
        doc.set_style(self.element, "transform", value)?;
        Ok(())
    }
}
