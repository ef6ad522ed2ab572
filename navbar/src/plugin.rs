//! Page-level registry of sidebars.

use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, trace};
use navdom::{Document, Event, NodeId};

use crate::error::SidebarError;
use crate::options::{Position, SidebarOptions};
use crate::scroller::ScrollerFactory;
use crate::sidebar::{DATA_SIDEBAR, Handler, Sidebar};

/// Operation addressed to a sidebar by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Open,
    Close,
    ForceOpen,
    ForceClose,
    Toggle,
    Destroy,
    IsOpen,
    IsLocked,
    IsFullyOpened,
    GetPosition,
}

impl FromStr for Command {
    type Err = SidebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Command::Open),
            "close" => Ok(Command::Close),
            "forceOpen" => Ok(Command::ForceOpen),
            "forceClose" => Ok(Command::ForceClose),
            "toggle" => Ok(Command::Toggle),
            "destroy" => Ok(Command::Destroy),
            "isOpen" => Ok(Command::IsOpen),
            "isLocked" => Ok(Command::IsLocked),
            "isFullyOpened" => Ok(Command::IsFullyOpened),
            "getPosition" => Ok(Command::GetPosition),
            other => Err(SidebarError::UnknownCommand(other.to_string())),
        }
    }
}

/// Result of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutput {
    None,
    Bool(bool),
    Position(Position),
}

/// Owns the document and every sidebar on it.
///
/// Sidebars are keyed by their element. Events dispatched through
/// [`Sidebars::dispatch`] reach the sidebar that registered the matching
/// listener, and opening any sidebar force-closes the others.
#[derive(Debug)]
pub struct Sidebars {
    doc: Document,
    instances: Vec<Sidebar>,
    scroller: Option<ScrollerFactory>,
}

impl Sidebars {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            instances: Vec::new(),
            scroller: None,
        }
    }

    /// Make a scroller available to sidebars created from now on.
    pub fn with_scroller(mut self, factory: ScrollerFactory) -> Self {
        self.scroller = Some(factory);
        self
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, element: NodeId) -> Option<&Sidebar> {
        self.instances.iter().find(|s| s.element() == element)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sidebar> {
        self.instances.iter()
    }

    fn index_of(&self, element: NodeId) -> Result<usize, SidebarError> {
        self.instances
            .iter()
            .position(|s| s.element() == element)
            .ok_or(SidebarError::NotInitialized(element))
    }

    /// Run `f` on one sidebar with every other sidebar as its peers.
    fn with_instance<T>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Sidebar, &mut Document, &mut [&mut Sidebar]) -> Result<T, SidebarError>,
    ) -> Result<T, SidebarError> {
        let (before, rest) = self.instances.split_at_mut(index);
        let Some((sidebar, after)) = rest.split_first_mut() else {
            return Err(SidebarError::NotInitialized(self.doc.body()));
        };
        let mut peers: Vec<&mut Sidebar> = before.iter_mut().chain(after.iter_mut()).collect();
        f(sidebar, &mut self.doc, &mut peers)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Attach a sidebar to `element`. An element that already has one keeps
    /// it and the new options are ignored.
    pub fn attach(&mut self, element: NodeId, options: SidebarOptions) -> Result<&Sidebar, SidebarError> {
        let index = match self.index_of(element) {
            Ok(index) => index,
            Err(_) => {
                let scroller = self.scroller.map(|factory| factory());
                let sidebar = Sidebar::new(&mut self.doc, element, options, scroller)?;
                self.instances.push(sidebar);
                self.instances.len() - 1
            }
        };
        Ok(&self.instances[index])
    }

    /// Attach to the element with the given `id` attribute.
    pub fn attach_by_id(&mut self, id: &str, options: SidebarOptions) -> Result<&Sidebar, SidebarError> {
        let element = self
            .doc
            .get_element_by_id(id)
            .ok_or_else(|| SidebarError::ElementNotFound(id.to_string()))?;
        self.attach(element, options)
    }

    /// Attach to every `[data-sidebar="true"]` element not handled yet,
    /// configured from its `data-*` attributes.
    pub fn init_all(&mut self) -> Result<Vec<NodeId>, SidebarError> {
        let selector = format!("[{DATA_SIDEBAR}=\"true\"]");
        let mut attached = Vec::new();
        for element in self.doc.query_selector_all(&selector)? {
            if self.get(element).is_some() {
                continue;
            }
            let options = SidebarOptions::from_dataset(&self.doc.dataset(element));
            self.attach(element, options)?;
            attached.push(element);
        }
        info!("data-api initialised {} sidebar(s)", attached.len());
        Ok(attached)
    }

    pub fn destroy(&mut self, element: NodeId) -> Result<(), SidebarError> {
        let index = self.index_of(element)?;
        let sidebar = self.instances.remove(index);
        sidebar.destroy(&mut self.doc)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    pub fn open(&mut self, element: NodeId) -> Result<(), SidebarError> {
        let index = self.index_of(element)?;
        self.with_instance(index, |s, doc, peers| s.open(doc, peers))
    }

    pub fn close(&mut self, element: NodeId) -> Result<(), SidebarError> {
        let index = self.index_of(element)?;
        self.with_instance(index, |s, doc, _| s.close(doc))
    }

    pub fn force_open(&mut self, element: NodeId) -> Result<(), SidebarError> {
        let index = self.index_of(element)?;
        self.with_instance(index, |s, doc, peers| s.force_open(doc, peers))
    }

    pub fn force_close(&mut self, element: NodeId) -> Result<(), SidebarError> {
        let index = self.index_of(element)?;
        self.with_instance(index, |s, doc, _| s.force_close(doc))
    }

    pub fn toggle(&mut self, element: NodeId) -> Result<(), SidebarError> {
        let index = self.index_of(element)?;
        self.with_instance(index, |s, doc, peers| s.toggle(doc, peers))
    }

    pub fn is_open(&self, element: NodeId) -> Result<bool, SidebarError> {
        let sidebar = self.get(element).ok_or(SidebarError::NotInitialized(element))?;
        Ok(sidebar.is_open(&self.doc))
    }

    pub fn is_fully_opened(&self, element: NodeId) -> Result<bool, SidebarError> {
        let sidebar = self.get(element).ok_or(SidebarError::NotInitialized(element))?;
        Ok(sidebar.is_fully_opened(&self.doc))
    }

    pub fn is_locked(&self, element: NodeId) -> Result<bool, SidebarError> {
        let sidebar = self.get(element).ok_or(SidebarError::NotInitialized(element))?;
        Ok(sidebar.is_locked())
    }

    pub fn position(&self, element: NodeId) -> Result<Position, SidebarError> {
        let sidebar = self.get(element).ok_or(SidebarError::NotInitialized(element))?;
        Ok(sidebar.position())
    }

    /// Run a named command. An element without a sidebar gets one with the
    /// default options first, except for `destroy`, which then does nothing.
    pub fn call(&mut self, element: NodeId, command: Command) -> Result<CommandOutput, SidebarError> {
        if self.get(element).is_none() {
            if command == Command::Destroy {
                return Ok(CommandOutput::None);
            }
            self.attach(element, SidebarOptions::default())?;
        }

        let output = match command {
            Command::Open => self.open(element).map(|_| CommandOutput::None)?,
            Command::Close => self.close(element).map(|_| CommandOutput::None)?,
            Command::ForceOpen => self.force_open(element).map(|_| CommandOutput::None)?,
            Command::ForceClose => self.force_close(element).map(|_| CommandOutput::None)?,
            Command::Toggle => self.toggle(element).map(|_| CommandOutput::None)?,
            Command::Destroy => self.destroy(element).map(|_| CommandOutput::None)?,
            Command::IsOpen => CommandOutput::Bool(self.is_open(element)?),
            Command::IsLocked => CommandOutput::Bool(self.is_locked(element)?),
            Command::IsFullyOpened => CommandOutput::Bool(self.is_fully_opened(element)?),
            Command::GetPosition => CommandOutput::Position(self.position(element)?),
        };
        Ok(output)
    }

    // -------------------------------------------------------------------------
    // Event loop
    // -------------------------------------------------------------------------

    /// Dispatch `event` along its propagation path and return it with the
    /// handlers' default / propagation flags.
    pub fn dispatch(&mut self, mut event: Event) -> Result<Event, SidebarError> {
        trace!("dispatch {} to {:?}", event.kind, event.target);

        for target in self.doc.propagation_path(&event) {
            event.current_target = target;
            for listener in self.doc.listeners_at(target, event.kind) {
                // An earlier handler may have unregistered it.
                if !self.doc.is_listening(&listener) {
                    continue;
                }
                let Ok(handler) = listener.handler.as_str().parse::<Handler>() else {
                    continue;
                };
                let Some(index) = self.instances.iter().position(|s| s.guid() == listener.owner) else {
                    continue;
                };
                self.with_instance(index, |s, doc, peers| s.handle(doc, peers, handler, &mut event))?;
            }
            if event.propagation_stopped() {
                break;
            }
        }

        event.current_target = event.target;
        Ok(event)
    }

    /// Advance the document clock and run the timers that fired.
    pub fn advance(&mut self, by: Duration) -> Result<(), SidebarError> {
        for timer in self.doc.advance(by) {
            let Some(index) = self.instances.iter().position(|s| s.guid() == timer.owner) else {
                debug!("timer {:?} has no owner left", timer.id);
                continue;
            };
            self.instances[index].on_timer(&mut self.doc, &timer)?;
        }
        Ok(())
    }
}
