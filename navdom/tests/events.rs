use std::time::Duration;

use navdom::{
    Document, Element, Event, EventKind, EventTarget, HandlerId, Key, Modifiers, NodeId,
    PointerType,
};

fn nested() -> (Document, NodeId, NodeId) {
    let mut doc = Document::default();
    let body = doc.body();
    let wrapper = doc.append(body, Element::div().class("sidebar-wrapper")).unwrap();
    let nav = doc.append(wrapper, Element::new("nav")).unwrap();
    (doc, wrapper, nav)
}

// ============================================================================
// Propagation path
// ============================================================================

#[test]
fn test_click_bubbles_to_document_and_window() {
    let (doc, wrapper, nav) = nested();
    let body = doc.body();

    let path = doc.propagation_path(&Event::click(nav));
    assert_eq!(
        path,
        vec![
            EventTarget::Node(nav),
            EventTarget::Node(wrapper),
            EventTarget::Node(body),
            EventTarget::Document,
            EventTarget::Window,
        ]
    );
}

#[test]
fn test_detached_node_does_not_reach_document() {
    let (mut doc, _, nav) = nested();
    doc.detach(nav).unwrap();
    assert_eq!(doc.propagation_path(&Event::click(nav)), vec![EventTarget::Node(nav)]);
}

#[test]
fn test_window_events_stay_on_window() {
    let (doc, _, _) = nested();
    assert_eq!(doc.propagation_path(&Event::resize()), vec![EventTarget::Window]);
    assert_eq!(
        doc.propagation_path(&Event::key_up(Key::Char('s'), Modifiers::ctrl())),
        vec![EventTarget::Window]
    );
}

#[test]
fn test_event_flags() {
    let (_, _, nav) = nested();
    let mut event = Event::pointer(EventKind::PointerDown, nav, 4.0, 8.0, PointerType::Pen);
    assert_eq!(event.pointer_position(), Some((4.0, 8.0, PointerType::Pen)));
    assert!(event.key().is_none());

    event.prevent_default();
    assert!(event.default_prevented());
    assert!(!event.propagation_stopped());
    event.stop_propagation();
    assert!(event.propagation_stopped());
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_listeners_in_registration_order() {
    let (mut doc, _, nav) = nested();
    let target = EventTarget::Node(nav);

    doc.on(target, EventKind::Click, "st.sidebar1", 1, "toggle").unwrap();
    doc.on(EventTarget::Document, EventKind::Click, "st.sidebar1", 1, "closeExternal")
        .unwrap();
    doc.on(target, EventKind::Click, "st.sidebar2", 2, "toggle").unwrap();

    let at = doc.listeners_at(target, EventKind::Click);
    assert_eq!(at.len(), 2);
    assert_eq!(at[0].owner, 1);
    assert_eq!(at[1].owner, 2);
    assert!(doc.listeners_at(target, EventKind::MouseOver).is_empty());
    assert_eq!(doc.listener_count(), 3);
}

#[test]
fn test_off_matches_namespace_and_handler() {
    let (mut doc, _, nav) = nested();
    let target = EventTarget::Node(nav);

    doc.on(target, EventKind::Click, "st.sidebar1", 1, "toggle").unwrap();
    doc.on(target, EventKind::Click, "st.sidebar1", 1, "other").unwrap();
    doc.on(target, EventKind::Click, "st.sidebar2", 2, "toggle").unwrap();

    let toggle = HandlerId::from("toggle");
    assert_eq!(doc.off(target, EventKind::Click, "st.sidebar1", Some(&toggle)), 1);
    assert_eq!(doc.off(target, EventKind::Click, "st.sidebar1", Some(&toggle)), 0);
    assert_eq!(doc.off(target, EventKind::Click, "st.sidebar1", None), 1);

    let left = doc.listeners_at(target, EventKind::Click);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].namespace, "st.sidebar2");
    assert_eq!(doc.listeners().count_for_owner(2), 1);
}

#[test]
fn test_removed_listener_is_no_longer_listening() {
    let (mut doc, _, nav) = nested();
    let target = EventTarget::Node(nav);
    doc.on(target, EventKind::Click, "st.sidebar1", 1, "toggle").unwrap();

    let snapshot = doc.listeners_at(target, EventKind::Click);
    assert!(doc.is_listening(&snapshot[0]));

    doc.off(target, EventKind::Click, "st.sidebar1", None);
    assert!(!doc.is_listening(&snapshot[0]));
}

#[test]
fn test_remove_drops_node_listeners() {
    let (mut doc, wrapper, nav) = nested();
    doc.on(EventTarget::Node(nav), EventKind::Click, "ns", 1, "toggle").unwrap();
    doc.on(EventTarget::Node(wrapper), EventKind::PointerDown, "ns", 1, "pan")
        .unwrap();
    doc.on(EventTarget::Window, EventKind::Resize, "ns", 1, "resizeWindow").unwrap();

    doc.remove(wrapper).unwrap();
    assert_eq!(doc.listener_count(), 1);
    assert!(doc.on(EventTarget::Node(nav), EventKind::Click, "ns", 1, "toggle").is_err());
}

// ============================================================================
// Timers
// ============================================================================

#[test]
fn test_timers_fire_in_deadline_order() {
    let mut doc = Document::default();
    let late = doc.set_timeout(Duration::from_millis(500), 1, "resize");
    let early = doc.set_timeout(Duration::from_millis(100), 2, "other");

    assert!(doc.advance(Duration::from_millis(99)).is_empty());

    let fired = doc.advance(Duration::from_millis(500));
    let ids: Vec<_> = fired.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![early, late]);
    assert_eq!(fired[1].owner, 1);
    assert_eq!(fired[1].tag, "resize");
    assert_eq!(doc.now(), Duration::from_millis(599));
    assert!(doc.timers().is_empty());
}

#[test]
fn test_cleared_timer_never_fires() {
    let mut doc = Document::default();
    let id = doc.set_timeout(Duration::from_millis(500), 1, "resize");
    assert!(doc.timers().is_pending(id));
    assert!(doc.clear_timeout(id));
    assert!(!doc.timers().is_pending(id));
    assert!(!doc.clear_timeout(id));
    assert!(doc.advance(Duration::from_secs(1)).is_empty());
}
