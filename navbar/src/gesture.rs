//! Pan gesture recognition from pointer events.
//!
//! A pan begins once the pointer has travelled further than the threshold
//! from where it went down, in a definite direction. Recognized pans report
//! the cumulative delta from the down position.

use navdom::{Event, EventKind, PointerType};

use crate::options::GestureOptions;

/// Dominant direction of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Identical deltas (including no movement) have no direction. Otherwise
    /// the larger axis wins, horizontal on equal magnitude.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dx == dy {
            return Direction::None;
        }
        if dx.abs() >= dy.abs() {
            if dx < 0.0 { Direction::Left } else { Direction::Right }
        } else if dy < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A recognized pan step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    pub phase: PanPhase,
    pub delta_x: f64,
    pub delta_y: f64,
    pub direction: Direction,
    pub pointer_type: PointerType,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    start_x: f64,
    start_y: f64,
    pointer_type: PointerType,
    started: bool,
}

/// Single-pointer pan recognizer.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    options: GestureOptions,
    session: Option<Session>,
}

impl PanRecognizer {
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Feed a pointer event. A move that crosses the threshold yields both a
    /// `Start` and a `Move`.
    pub fn handle(&mut self, event: &Event) -> Vec<PanEvent> {
        if !self.options.enable {
            return Vec::new();
        }
        let Some((x, y, pointer_type)) = event.pointer_position() else {
            return Vec::new();
        };

        match event.kind {
            EventKind::PointerDown => {
                self.session = Some(Session {
                    start_x: x,
                    start_y: y,
                    pointer_type,
                    started: false,
                });
                Vec::new()
            }
            EventKind::PointerMove => {
                let Some(session) = self.session.as_mut() else {
                    return Vec::new();
                };
                let (dx, dy) = (x - session.start_x, y - session.start_y);
                let direction = Direction::from_delta(dx, dy);
                let pointer_type = session.pointer_type;
                let pan = |phase| PanEvent {
                    phase,
                    delta_x: dx,
                    delta_y: dy,
                    direction,
                    pointer_type,
                };

                if session.started {
                    return vec![pan(PanPhase::Move)];
                }
                let distance = dx.hypot(dy);
                if distance > self.options.threshold && direction != Direction::None {
                    session.started = true;
                    return vec![pan(PanPhase::Start), pan(PanPhase::Move)];
                }
                Vec::new()
            }
            EventKind::PointerUp | EventKind::PointerCancel => {
                let Some(session) = self.session.take() else {
                    return Vec::new();
                };
                if !session.started {
                    return Vec::new();
                }
                let (dx, dy) = (x - session.start_x, y - session.start_y);
                let phase = if event.kind == EventKind::PointerUp {
                    PanPhase::End
                } else {
                    PanPhase::Cancel
                };
                vec![PanEvent {
                    phase,
                    delta_x: dx,
                    delta_y: dy,
                    direction: Direction::from_delta(dx, dy),
                    pointer_type: session.pointer_type,
                }]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use navdom::{Document, Element, Event, EventKind, PointerType};

    use super::*;

    fn pointer(doc: &mut Document, kind: EventKind, x: f64, y: f64) -> Event {
        let body = doc.body();
        let node = doc.append(body, Element::div()).unwrap();
        Event::pointer(kind, node, x, y, PointerType::Touch)
    }

    #[test]
    fn direction_tie_breaking() {
        assert_eq!(Direction::from_delta(0.0, 0.0), Direction::None);
        assert_eq!(Direction::from_delta(5.0, 5.0), Direction::None);
        // equal magnitude, different sign: horizontal wins
        assert_eq!(Direction::from_delta(-5.0, 5.0), Direction::Left);
        assert_eq!(Direction::from_delta(5.0, -5.0), Direction::Right);
        assert_eq!(Direction::from_delta(2.0, -9.0), Direction::Up);
        assert_eq!(Direction::from_delta(2.0, 9.0), Direction::Down);
    }

    #[test]
    fn pan_starts_after_threshold() {
        let mut doc = Document::default();
        let mut pan = PanRecognizer::new(GestureOptions::default());

        assert!(pan.handle(&pointer(&mut doc, EventKind::PointerDown, 100.0, 100.0)).is_empty());
        assert!(pan.handle(&pointer(&mut doc, EventKind::PointerMove, 95.0, 100.0)).is_empty());

        let events = pan.handle(&pointer(&mut doc, EventKind::PointerMove, 80.0, 102.0));
        let phases: Vec<PanPhase> = events.iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![PanPhase::Start, PanPhase::Move]);
        assert_eq!(events[0].direction, Direction::Left);
        assert_eq!(events[1].delta_x, -20.0);

        let end = pan.handle(&pointer(&mut doc, EventKind::PointerUp, 40.0, 100.0));
        assert_eq!(end.len(), 1);
        assert_eq!(end[0].phase, PanPhase::End);
        assert_eq!(end[0].delta_x, -60.0);
        assert!(!pan.is_tracking());
    }

    #[test]
    fn release_without_pan_is_silent() {
        let mut doc = Document::default();
        let mut pan = PanRecognizer::new(GestureOptions::default());

        pan.handle(&pointer(&mut doc, EventKind::PointerDown, 10.0, 10.0));
        assert!(pan.handle(&pointer(&mut doc, EventKind::PointerUp, 12.0, 10.0)).is_empty());
        assert!(pan.handle(&pointer(&mut doc, EventKind::PointerMove, 90.0, 10.0)).is_empty());
    }

    #[test]
    fn disabled_recognizer_ignores_input() {
        let mut doc = Document::default();
        let mut pan = PanRecognizer::new(GestureOptions {
            enable: false,
            ..Default::default()
        });

        pan.handle(&pointer(&mut doc, EventKind::PointerDown, 0.0, 0.0));
        assert!(pan.handle(&pointer(&mut doc, EventKind::PointerMove, 50.0, 0.0)).is_empty());
    }
}
