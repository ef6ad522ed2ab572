use std::time::Duration;

use navbar::sidebar::RESIZE_DEBOUNCE;
use navbar::{Position, SidebarOptions, Sidebars};
use navdom::{
    Document, Element, Event, EventKind, EventTarget, Key, Modifiers, NodeId, PointerType,
    Viewport,
};

struct Page {
    sidebars: Sidebars,
    toggle: NodeId,
    nav: NodeId,
    menu: NodeId,
    main: NodeId,
}

fn page(width: f64) -> Page {
    let mut doc = Document::new(Viewport::new(width, 800.0));
    let body = doc.body();
    let toggle = doc.append(body, Element::new("button").id("toggle")).unwrap();
    let nav = doc
        .append(body, Element::new("nav").class("sidebar").size(280.0, 800.0))
        .unwrap();
    let menu = doc.append(nav, Element::div().class("sidebar-menu")).unwrap();
    let main = doc.append(body, Element::div().class("container-main")).unwrap();

    let sheet = doc.stylesheet_mut();
    sheet.rule(".sidebar", &[("transform", "translateX(-100%)")]).unwrap();
    sheet.rule(".sidebar.sidebar-right", &[("transform", "translateX(100%)")]).unwrap();
    sheet.rule(".sidebar.sidebar-open", &[("transform", "none")]).unwrap();

    Page {
        sidebars: Sidebars::new(doc),
        toggle,
        nav,
        menu,
        main,
    }
}

fn attach(page: &mut Page, options: SidebarOptions) {
    page.sidebars
        .attach(page.nav, options.toggle_id("toggle"))
        .unwrap();
}

fn is_open(page: &Page) -> bool {
    page.sidebars.is_open(page.nav).unwrap()
}

fn pointer(
    sidebars: &mut Sidebars,
    kind: EventKind,
    target: NodeId,
    x: f64,
    pointer_type: PointerType,
) -> Event {
    sidebars
        .dispatch(Event::pointer(kind, target, x, 300.0, pointer_type))
        .unwrap()
}

// ============================================================================
// Toggle element
// ============================================================================

#[test]
fn test_click_on_toggle() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());

    let event = page.sidebars.dispatch(Event::click(page.toggle)).unwrap();
    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
    assert!(is_open(&page));

    page.sidebars.dispatch(Event::click(page.toggle)).unwrap();
    assert!(!is_open(&page));
}

#[test]
fn test_tap_on_toggle_on_touch_platform() {
    let mut page = page(1280.0);
    page.sidebars.doc_mut().set_native_scroll_width(0.0);
    attach(&mut page, SidebarOptions::new());

    page.sidebars.dispatch(Event::click(page.toggle)).unwrap();
    assert!(!is_open(&page));
    page.sidebars.dispatch(Event::touch_start(page.toggle)).unwrap();
    assert!(is_open(&page));
}

#[test]
fn test_hover_opens() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().toggle_open_on_hover(true));

    page.sidebars.dispatch(Event::mouse_over(page.toggle)).unwrap();
    assert!(is_open(&page));
    // Hovering again keeps it open
    page.sidebars.dispatch(Event::mouse_over(page.toggle)).unwrap();
    assert!(is_open(&page));
}

#[test]
fn test_hover_disabled_by_default() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.dispatch(Event::mouse_over(page.toggle)).unwrap();
    assert!(!is_open(&page));
}

// ============================================================================
// Outside clicks
// ============================================================================

#[test]
fn test_click_outside_closes() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.open(page.nav).unwrap();

    let event = page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(!is_open(&page));
    assert!(event.default_prevented());
    assert_eq!(event.current_target, EventTarget::Node(page.main));
}

#[test]
fn test_click_inside_keeps_open() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.open(page.nav).unwrap();

    let event = page.sidebars.dispatch(Event::click(page.menu)).unwrap();
    assert!(is_open(&page));
    assert!(!event.default_prevented());

    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    page.sidebars.dispatch(Event::click(swipe)).unwrap();
    assert!(is_open(&page));
}

#[test]
fn test_focus_inside_keeps_open() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.open(page.nav).unwrap();
    page.sidebars.doc_mut().focus(page.menu).unwrap();

    page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(is_open(&page));

    page.sidebars.doc_mut().blur();
    page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(!is_open(&page));
}

#[test]
fn test_click_outside_keeps_force_open_over_breakpoint() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.force_open(page.nav).unwrap();

    page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(is_open(&page));
    assert!(page.sidebars.is_fully_opened(page.nav).unwrap());
}

#[test]
fn test_click_outside_force_closes_under_breakpoint() {
    let mut page = page(800.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.force_open(page.nav).unwrap();

    page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(!is_open(&page));
    assert!(!page.sidebars.is_fully_opened(page.nav).unwrap());
}

#[test]
fn test_click_outside_locked_over_breakpoint() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().locked(true));

    let event = page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(is_open(&page));
    assert!(!event.default_prevented());
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_keyboard_shortcut_toggles() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());

    let shortcut = Event::key_up(Key::Char('s'), Modifiers::ctrl().with_alt());
    page.sidebars.dispatch(shortcut.clone()).unwrap();
    assert!(is_open(&page));

    page.sidebars
        .dispatch(Event::key_up(Key::Char('s'), Modifiers::ctrl()))
        .unwrap();
    assert!(is_open(&page));

    page.sidebars.dispatch(shortcut).unwrap();
    assert!(!is_open(&page));
}

#[test]
fn test_keyboard_shortcut_of_right_sidebar_needs_shift() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().position(Position::Right));

    page.sidebars
        .dispatch(Event::key_up(Key::Char('s'), Modifiers::ctrl().with_alt()))
        .unwrap();
    assert!(!is_open(&page));

    page.sidebars
        .dispatch(Event::key_up(Key::Char('S'), Modifiers::ctrl().with_alt().with_shift()))
        .unwrap();
    assert!(is_open(&page));
}

#[test]
fn test_keyboard_disabled() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().disabled_keyboard(true));

    page.sidebars
        .dispatch(Event::key_up(Key::Char('s'), Modifiers::ctrl().with_alt()))
        .unwrap();
    assert!(!is_open(&page));
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_disables_transition_until_delay() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());

    page.sidebars.dispatch(Event::resize()).unwrap();
    assert_eq!(page.sidebars.doc().style(page.nav, "transition"), Some("none"));

    page.sidebars.advance(Duration::from_millis(300)).unwrap();
    page.sidebars.dispatch(Event::resize()).unwrap();
    page.sidebars.advance(Duration::from_millis(199)).unwrap();
    assert_eq!(page.sidebars.doc().style(page.nav, "transition"), Some("none"));

    page.sidebars.advance(Duration::from_millis(1)).unwrap();
    assert_eq!(page.sidebars.doc().style(page.nav, "transition"), None);
    assert_eq!(page.sidebars.doc().now(), RESIZE_DEBOUNCE);
    assert!(page.sidebars.doc().timers().is_empty());
}

#[test]
fn test_resize_closes_open_sidebar() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.open(page.nav).unwrap();

    page.sidebars.dispatch(Event::resize()).unwrap();
    assert!(!is_open(&page));
}

#[test]
fn test_resize_across_breakpoint_with_locked_sidebar() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().locked(true));
    assert!(is_open(&page));

    page.sidebars.doc_mut().set_viewport(Viewport::new(800.0, 800.0));
    page.sidebars.dispatch(Event::resize()).unwrap();
    assert!(!is_open(&page));
    assert!(!page.sidebars.is_fully_opened(page.nav).unwrap());

    page.sidebars.doc_mut().set_viewport(Viewport::new(1280.0, 800.0));
    page.sidebars.dispatch(Event::resize()).unwrap();
    assert!(is_open(&page));
    assert!(page.sidebars.is_fully_opened(page.nav).unwrap());

    page.sidebars.advance(RESIZE_DEBOUNCE).unwrap();
    assert_eq!(page.sidebars.doc().style(page.nav, "transition"), None);
}

#[test]
fn test_destroy_cancels_resize_timer() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.dispatch(Event::resize()).unwrap();

    page.sidebars.destroy(page.nav).unwrap();
    assert!(page.sidebars.doc().timers().is_empty());
    assert_eq!(page.sidebars.doc().style(page.nav, "transition"), None);
    page.sidebars.advance(RESIZE_DEBOUNCE).unwrap();
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn test_drag_opens_left_sidebar() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 0.0, PointerType::Touch);
    let event = pointer(&mut page.sidebars, EventKind::PointerMove, body, 120.0, PointerType::Touch);
    assert!(event.default_prevented());

    let doc = page.sidebars.doc();
    assert_eq!(doc.style(page.nav, "transform"), Some("translate3d(-160px, 0px, 0px)"));
    assert_eq!(doc.style(page.nav, "transition"), Some("none"));
    assert_eq!(doc.style(page.nav, "user-select"), Some("none"));
    assert!(doc.has_class(page.nav, "sidebar-dragging"));

    // Clamped at the resting position
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 400.0, PointerType::Touch);
    assert_eq!(
        page.sidebars.doc().style(page.nav, "transform"),
        Some("translate3d(0px, 0px, 0px)")
    );

    pointer(&mut page.sidebars, EventKind::PointerUp, body, 200.0, PointerType::Touch);
    let doc = page.sidebars.doc();
    assert!(is_open(&page));
    assert_eq!(doc.style(page.nav, "transform"), None);
    assert_eq!(doc.style(page.nav, "transition"), None);
    assert_eq!(doc.style(page.nav, "user-select"), None);
    assert!(!doc.has_class(page.nav, "sidebar-dragging"));
}

#[test]
fn test_short_drag_snaps_back() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 0.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 50.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerUp, body, 70.0, PointerType::Touch);

    assert!(!is_open(&page));
    assert_eq!(page.sidebars.doc().style(page.nav, "transform"), None);
}

#[test]
fn test_drag_offset_rounds_halves_up() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 0.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 20.5, PointerType::Touch);
    assert_eq!(
        page.sidebars.doc().style(page.nav, "transform"),
        Some("translate3d(-259px, 0px, 0px)")
    );

    pointer(&mut page.sidebars, EventKind::PointerMove, body, 19.5, PointerType::Touch);
    assert_eq!(
        page.sidebars.doc().style(page.nav, "transform"),
        Some("translate3d(-260px, 0px, 0px)")
    );
}

#[test]
fn test_drag_closes_open_sidebar() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    page.sidebars.force_open(page.nav).unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, page.menu, 250.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 100.0, PointerType::Touch);
    assert_eq!(
        page.sidebars.doc().style(page.nav, "transform"),
        Some("translate3d(-150px, 0px, 0px)")
    );
    pointer(&mut page.sidebars, EventKind::PointerUp, body, 100.0, PointerType::Touch);

    assert!(!is_open(&page));
    assert!(!page.sidebars.is_fully_opened(page.nav).unwrap());
}

#[test]
fn test_drag_right_sidebar_opens_to_the_left() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().position(Position::Right));
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 1270.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 1170.0, PointerType::Touch);
    assert_eq!(
        page.sidebars.doc().style(page.nav, "transform"),
        Some("translate3d(180px, 0px, 0px)")
    );
    pointer(&mut page.sidebars, EventKind::PointerUp, body, 1100.0, PointerType::Touch);
    assert!(is_open(&page));
}

#[test]
fn test_swipe_with_always_force_toggle_pins() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().force_toggle(navbar::ForceToggle::Always));
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 0.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 150.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerUp, body, 150.0, PointerType::Touch);
    assert!(page.sidebars.is_fully_opened(page.nav).unwrap());
}

#[test]
fn test_vertical_drag_is_ignored() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    page.sidebars
        .dispatch(Event::pointer(EventKind::PointerDown, swipe, 0.0, 100.0, PointerType::Touch))
        .unwrap();
    page.sidebars
        .dispatch(Event::pointer(EventKind::PointerMove, body, 5.0, 400.0, PointerType::Touch))
        .unwrap();
    assert_eq!(page.sidebars.doc().style(page.nav, "transform"), None);
    page.sidebars
        .dispatch(Event::pointer(EventKind::PointerUp, body, 100.0, 400.0, PointerType::Touch))
        .unwrap();
    assert!(!is_open(&page));
}

#[test]
fn test_cancelled_drag_reverts() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 0.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 200.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerCancel, body, 200.0, PointerType::Touch);

    assert!(!is_open(&page));
    assert_eq!(page.sidebars.doc().style(page.nav, "transform"), None);
    assert!(!page.sidebars.doc().has_class(page.nav, "sidebar-dragging"));
}

#[test]
fn test_locked_sidebar_does_not_follow_drag() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new().locked(true));
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, page.menu, 250.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 50.0, PointerType::Touch);
    assert_eq!(page.sidebars.doc().style(page.nav, "transform"), None);
    pointer(&mut page.sidebars, EventKind::PointerUp, body, 50.0, PointerType::Touch);
    assert!(is_open(&page));
}

#[test]
fn test_mouse_drag_swallows_next_outside_click() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let swipe = page.sidebars.get(page.nav).unwrap().swipe_element().unwrap();
    let body = page.sidebars.doc().body();

    pointer(&mut page.sidebars, EventKind::PointerDown, swipe, 0.0, PointerType::Mouse);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 150.0, PointerType::Mouse);
    pointer(&mut page.sidebars, EventKind::PointerUp, page.main, 150.0, PointerType::Mouse);
    assert!(is_open(&page));

    // The click that ends the mouse drag lands outside the sidebar
    page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(is_open(&page));

    page.sidebars.dispatch(Event::click(page.main)).unwrap();
    assert!(!is_open(&page));
}

#[test]
fn test_pointer_events_after_destroy_are_ignored() {
    let mut page = page(1280.0);
    attach(&mut page, SidebarOptions::new());
    let body = page.sidebars.doc().body();
    page.sidebars.destroy(page.nav).unwrap();

    pointer(&mut page.sidebars, EventKind::PointerDown, page.nav, 0.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerMove, body, 200.0, PointerType::Touch);
    pointer(&mut page.sidebars, EventKind::PointerUp, body, 200.0, PointerType::Touch);
    assert_eq!(page.sidebars.doc().style(page.nav, "transform"), None);
    assert!(!page.sidebars.doc().has_class(page.nav, "sidebar-open"));
}
