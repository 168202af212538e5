use glam::Vec2;

/// Squared pixel distance after which a press counts as a drag.
const DRAG_THRESHOLD_SQ: f32 = 9.0;

/// Tracks pointer position and whether the current press became a drag.
#[derive(Debug, Default)]
pub(crate) struct PointerState {
    position: Option<Vec2>,
    press_origin: Option<Vec2>,
    dragging: bool,
}

impl PointerState {
    /// Record a new cursor position and return the delta from the last one.
    pub fn move_to(&mut self, position: Vec2) -> Vec2 {
        let delta = self.position.map_or(Vec2::ZERO, |last| position - last);
        self.position = Some(position);
        if let Some(origin) = self.press_origin {
            if (position - origin).length_squared() > DRAG_THRESHOLD_SQ {
                self.dragging = true;
            }
        }
        delta
    }

    /// Start a press at the current position.
    pub fn press(&mut self) {
        self.press_origin = Some(self.position.unwrap_or(Vec2::ZERO));
        self.dragging = false;
    }

    /// End the press. Returns `true` when it was a click, not a drag.
    pub fn release(&mut self) -> bool {
        let was_pressed = self.press_origin.take().is_some();
        let click = was_pressed && !self.dragging;
        self.dragging = false;
        click
    }

    /// Last known cursor position.
    pub fn position(&self) -> Vec2 {
        self.position.unwrap_or(Vec2::ZERO)
    }
}
