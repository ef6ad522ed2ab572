//! Terminal input to document events.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use log::{debug, info};
use navbar::{Command, SidebarError};
use navdom::{Event, EventKind, Key, Modifiers, NodeId, PointerType};

use crate::page::{Demo, to_px};

/// Whether the event loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Mouse state needed to synthesize clicks and hovers.
#[derive(Debug, Default)]
pub struct Pointer {
    pressed: Option<NodeId>,
    hovered: Option<NodeId>,
}

pub fn handle(
    demo: &mut Demo,
    pointer: &mut Pointer,
    event: CrosstermEvent,
) -> Result<Flow, SidebarError> {
    match event {
        CrosstermEvent::Key(key) => handle_key(demo, key),
        CrosstermEvent::Mouse(mouse) => {
            handle_mouse(demo, pointer, mouse)?;
            Ok(Flow::Continue)
        }
        CrosstermEvent::Resize(cols, rows) => {
            demo.resize(cols, rows)?;
            demo.sidebars.dispatch(Event::resize())?;
            Ok(Flow::Continue)
        }
        _ => Ok(Flow::Continue),
    }
}

fn command_for(code: KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::Char('o') => Some("open"),
        KeyCode::Char('c') => Some("close"),
        KeyCode::Char('f') => Some("forceOpen"),
        KeyCode::Char('x') => Some("forceClose"),
        KeyCode::Char('t') => Some("toggle"),
        _ => None,
    }
}

fn handle_key(demo: &mut Demo, key: KeyEvent) -> Result<Flow, SidebarError> {
    if key.kind != KeyEventKind::Press {
        return Ok(Flow::Continue);
    }

    let plain = key.modifiers.is_empty();
    match key.code {
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => return Ok(Flow::Quit),
        KeyCode::Char('q') | KeyCode::Esc if plain => return Ok(Flow::Quit),
        KeyCode::Char('d') if plain => {
            if demo.sidebars.get(demo.nav).is_some() {
                demo.sidebars.call(demo.nav, Command::Destroy)?;
                info!("sidebar destroyed");
            } else {
                demo.attach()?;
                info!("sidebar attached");
            }
            return Ok(Flow::Continue);
        }
        code if plain => {
            if let Some(name) = command_for(code) {
                let command: Command = name.parse()?;
                let output = demo.sidebars.call(demo.nav, command)?;
                debug!("{name} -> {output:?}");
                return Ok(Flow::Continue);
            }
        }
        _ => {}
    }

    let event = Event::key_up(Key::from(key.code), Modifiers::from(key.modifiers));
    demo.sidebars.dispatch(event)?;
    Ok(Flow::Continue)
}

fn handle_mouse(demo: &mut Demo, pointer: &mut Pointer, mouse: MouseEvent) -> Result<(), SidebarError> {
    let target = demo.hit(mouse.column, mouse.row);
    let (x, y) = to_px(mouse.column, mouse.row);
    let event = |kind| Event::pointer(kind, target, x, y, PointerType::Mouse);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            pointer.pressed = Some(target);
            demo.sidebars.dispatch(event(EventKind::PointerDown))?;
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            demo.sidebars.dispatch(event(EventKind::PointerMove))?;
        }
        MouseEventKind::Up(MouseButton::Left) => {
            demo.sidebars.dispatch(event(EventKind::PointerUp))?;
            if let Some(pressed) = pointer.pressed.take() {
                let clicked = common_ancestor(demo, pressed, target);
                demo.sidebars.dispatch(Event::click(clicked))?;
            }
        }
        MouseEventKind::Moved => {
            if pointer.hovered != Some(target) {
                pointer.hovered = Some(target);
                demo.sidebars.dispatch(Event::mouse_over(target))?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Where a click lands when press and release hit different elements.
fn common_ancestor(demo: &Demo, a: NodeId, b: NodeId) -> NodeId {
    let doc = demo.sidebars.doc();
    let b_chain: Vec<NodeId> = std::iter::once(b).chain(doc.ancestors(b)).collect();
    std::iter::once(a)
        .chain(doc.ancestors(a))
        .find(|node| b_chain.contains(node))
        .unwrap_or_else(|| doc.body())
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, MouseEvent};
    use navbar::SidebarOptions;

    use super::*;

    fn demo() -> Demo {
        Demo::new(160, 40, SidebarOptions::new().toggle_id("toggle")).unwrap()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermEvent {
        CrosstermEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn clicking_the_menu_button_toggles() {
        let mut demo = demo();
        let mut pointer = Pointer::default();

        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Down(MouseButton::Left), 2, 0)).unwrap();
        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Up(MouseButton::Left), 2, 0)).unwrap();
        assert!(demo.sidebars.is_open(demo.nav).unwrap());
    }

    #[test]
    fn dragging_from_the_edge_opens() {
        let mut demo = demo();
        let mut pointer = Pointer::default();

        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Down(MouseButton::Left), 0, 10)).unwrap();
        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Drag(MouseButton::Left), 10, 10)).unwrap();
        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Drag(MouseButton::Left), 20, 10)).unwrap();
        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Up(MouseButton::Left), 20, 10)).unwrap();
        assert!(demo.sidebars.is_open(demo.nav).unwrap());

        // The click ending the drag does not dismiss it, the next one does
        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Down(MouseButton::Left), 60, 10)).unwrap();
        handle(&mut demo, &mut pointer, mouse(MouseEventKind::Up(MouseButton::Left), 60, 10)).unwrap();
        assert!(!demo.sidebars.is_open(demo.nav).unwrap());
    }

    #[test]
    fn keys_map_to_commands_and_shortcuts() {
        let mut demo = demo();
        let mut pointer = Pointer::default();

        handle(&mut demo, &mut pointer, key(KeyCode::Char('f'), KeyModifiers::NONE)).unwrap();
        assert!(demo.sidebars.is_fully_opened(demo.nav).unwrap());

        handle(&mut demo, &mut pointer, key(KeyCode::Char('x'), KeyModifiers::NONE)).unwrap();
        assert!(!demo.sidebars.is_open(demo.nav).unwrap());

        let shortcut = KeyModifiers::CONTROL | KeyModifiers::ALT;
        handle(&mut demo, &mut pointer, key(KeyCode::Char('s'), shortcut)).unwrap();
        assert!(demo.sidebars.is_open(demo.nav).unwrap());

        assert_eq!(
            handle(&mut demo, &mut pointer, key(KeyCode::Char('q'), KeyModifiers::NONE)).unwrap(),
            Flow::Quit
        );
    }

    #[test]
    fn destroy_key_detaches_and_reattaches() {
        let mut demo = demo();
        let mut pointer = Pointer::default();

        handle(&mut demo, &mut pointer, key(KeyCode::Char('d'), KeyModifiers::NONE)).unwrap();
        assert!(demo.sidebars.get(demo.nav).is_none());
        assert_eq!(demo.sidebars.doc().listener_count(), 0);

        handle(&mut demo, &mut pointer, key(KeyCode::Char('d'), KeyModifiers::NONE)).unwrap();
        assert!(demo.sidebars.get(demo.nav).is_some());
    }

    #[test]
    fn resize_below_breakpoint() {
        let mut demo = demo();
        let mut pointer = Pointer::default();
        demo.sidebars.open(demo.nav).unwrap();

        handle(&mut demo, &mut pointer, CrosstermEvent::Resize(100, 40)).unwrap();
        assert_eq!(demo.sidebars.doc().viewport().width, 800.0);
        assert!(!demo.sidebars.is_open(demo.nav).unwrap());
    }
}
