//! Drag-to-swipe handling.

use navdom::{Document, Event, PointerType};

use super::Sidebar;
use crate::error::SidebarError;
use crate::gesture::{Direction, PanEvent, PanPhase};
use crate::options::Position;
use crate::state::swipe_transition;

/// Inline transform translating the element horizontally.
pub fn translate_x(delta: f64) -> String {
    format!("translate3d({delta}px, 0px, 0px)")
}

impl Sidebar {
    pub(super) fn pointer_input(
        &mut self,
        doc: &mut Document,
        peers: &mut [&mut Sidebar],
        event: &mut Event,
    ) -> Result<(), SidebarError> {
        let Some(pan) = self.pan.as_mut() else {
            return Ok(());
        };
        for step in pan.handle(event) {
            match step.phase {
                PanPhase::Start => self.drag_start(doc, &step)?,
                PanPhase::Move => self.drag(doc, event, &step)?,
                PanPhase::End => self.drag_end(doc, peers, event, &step)?,
                PanPhase::Cancel => {
                    let reverted = PanEvent {
                        delta_x: 0.0,
                        ..step
                    };
                    self.drag_end(doc, peers, event, &reverted)?;
                }
            }
        }
        Ok(())
    }

    fn drag_start(&mut self, doc: &mut Document, pan: &PanEvent) -> Result<(), SidebarError> {
        self.drag_direction = Some(pan.direction);
        doc.set_style(self.element, "user-select", "none")?;
        Ok(())
    }

    /// Horizontal offset of the element from its computed transform.
    fn target_position(&self, doc: &Document) -> f64 {
        doc.transform_matrix(self.element).e
    }

    fn drag(&mut self, doc: &mut Document, event: &mut Event, pan: &PanEvent) -> Result<(), SidebarError> {
        let horizontal = self.drag_direction.is_some_and(Direction::is_horizontal);
        if !horizontal || (self.options.locked && self.is_over_min_width(doc)) {
            return Ok(());
        }

        event.prevent_default();

        let start = match self.drag_start_position {
            Some(start) => start,
            None => {
                let start = self.target_position(doc);
                self.drag_start_position = Some(start);
                start
            }
        };

        // halves round towards +inf
        let mut delta = (start + pan.delta_x + 0.5).floor();
        let past_edge = match self.position() {
            Position::Left => delta > 0.0,
            Position::Right => delta < 0.0,
        };
        // also folds -0 into 0
        if past_edge || delta == 0.0 {
            delta = 0.0;
        }

        doc.add_class(self.element, &self.options.classes.on_dragging)?;
        self.set_transition(doc, "none")?;
        self.set_transform(doc, &translate_x(delta))?;
        Ok(())
    }

    fn drag_end(
        &mut self,
        doc: &mut Document,
        peers: &mut [&mut Sidebar],
        event: &mut Event,
        pan: &PanEvent,
    ) -> Result<(), SidebarError> {
        self.drag_start_position = None;
        event.prevent_default();

        if pan.pointer_type == PointerType::Mouse {
            self.mouse_drag_end = true;
        }

        doc.remove_class(self.element, &self.options.classes.on_dragging)?;
        doc.set_style(self.element, "user-select", "")?;
        self.set_transition(doc, "")?;
        self.set_transform(doc, "")?;

        let direction = self.drag_direction.take().unwrap_or(Direction::None);
        if pan.delta_x.abs() <= doc.inner_width(self.element) / 4.0 {
            return Ok(());
        }

        let transition = swipe_transition(
            self.is_open(doc),
            direction,
            self.position(),
            self.is_over_min_width(doc),
            self.options.force_toggle,
        );
        match transition {
            Some(transition) => self.apply(doc, peers, transition),
            None => Ok(()),
        }
    }
}
