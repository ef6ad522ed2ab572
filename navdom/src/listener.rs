use log::trace;

use crate::event::{EventKind, EventTarget};

/// Name of the routine a listener invokes. The document never calls handlers
/// itself; the host looks the name up when it walks the dispatch path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(pub String);

impl HandlerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HandlerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One registered listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub(crate) seq: u64,
    pub target: EventTarget,
    pub kind: EventKind,
    /// jQuery style namespace, e.g. `st.sidebar3`.
    pub namespace: String,
    /// Opaque id of whoever registered the listener.
    pub owner: u64,
    pub handler: HandlerId,
}

impl Listener {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Listener table of a document, kept in registration order.
#[derive(Debug, Default)]
pub struct Listeners {
    entries: Vec<Listener>,
    next_seq: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its sequence number.
    pub fn on(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        namespace: impl Into<String>,
        owner: u64,
        handler: impl Into<HandlerId>,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let listener = Listener {
            seq,
            target,
            kind,
            namespace: namespace.into(),
            owner,
            handler: handler.into(),
        };
        trace!("on {}.{} {:?} -> {:?}", kind, listener.namespace, target, listener.handler);
        self.entries.push(listener);
        seq
    }

    /// Remove listeners matching target, kind and namespace. When `handler` is
    /// given only that handler is removed. Returns how many were removed.
    pub fn off(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        namespace: &str,
        handler: Option<&HandlerId>,
    ) -> usize {
        let before = self.entries.len();
        self.entries.retain(|l| {
            !(l.target == target
                && l.kind == kind
                && l.namespace == namespace
                && handler.is_none_or(|h| *h == l.handler))
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            trace!("off {kind}.{namespace} {target:?}: {removed} removed");
        }
        removed
    }

    /// Remove every listener attached to `target`.
    pub fn off_target(&mut self, target: EventTarget) -> usize {
        let before = self.entries.len();
        self.entries.retain(|l| l.target != target);
        before - self.entries.len()
    }

    /// Listeners for `kind` on `target`, in registration order.
    pub fn at(&self, target: EventTarget, kind: EventKind) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .cloned()
            .collect()
    }

    pub fn is_registered(&self, seq: u64) -> bool {
        self.entries.iter().any(|l| l.seq == seq)
    }

    pub fn count_for_owner(&self, owner: u64) -> usize {
        self.entries.iter().filter(|l| l.owner == owner).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_matches_namespace_and_handler() {
        let mut listeners = Listeners::new();
        listeners.on(EventTarget::Window, EventKind::KeyUp, "st.sidebar1", 1, "keyboard");
        listeners.on(EventTarget::Window, EventKind::KeyUp, "st.sidebar2", 2, "keyboard");
        listeners.on(EventTarget::Window, EventKind::KeyUp, "st.sidebar1", 1, "other");

        let removed = listeners.off(
            EventTarget::Window,
            EventKind::KeyUp,
            "st.sidebar1",
            Some(&HandlerId::from("keyboard")),
        );
        assert_eq!(removed, 1);
        assert_eq!(listeners.len(), 2);

        assert_eq!(listeners.off(EventTarget::Window, EventKind::KeyUp, "st.sidebar1", None), 1);
        assert_eq!(listeners.count_for_owner(2), 1);
    }
}
