/// Polled input snapshots. Event listeners only write into these; the
/// fixed-rate key tick and the frame loop read them, so between ticks only
/// the most recent state matters.

/// Sustained key state for free-fly movement.
#[derive(Default, Clone, Copy, Debug)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub rise: bool,
    pub sink: bool,
}

impl KeyState {
    /// Apply a keydown/keyup for a `KeyboardEvent.code`. Returns false for
    /// codes outside the movement map so callers can let them propagate.
    pub fn set_code(&mut self, code: &str, down: bool) -> bool {
        match code {
            "KeyW" => self.forward = down,
            "KeyS" => self.back = down,
            "KeyA" => self.left = down,
            "KeyD" => self.right = down,
            "KeyQ" => self.roll_left = down,
            "KeyR" => self.roll_right = down,
            "ShiftLeft" => self.rise = down,
            "Space" => self.sink = down,
            _ => return false,
        }
        true
    }

    #[inline]
    pub fn any_down(&self) -> bool {
        self.forward
            || self.back
            || self.left
            || self.right
            || self.roll_left
            || self.roll_right
            || self.rise
            || self.sink
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Pointer drag state: distinguishes a drag-rotate gesture from a click
/// (mouseup after a drag must not count as a calibration pick).
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerState {
    pub dragging: bool,
}

/// Last touch position, for deriving per-move deltas from touch events
/// (touch events carry absolute coordinates only).
#[derive(Default, Clone, Copy, Debug)]
pub struct TouchState {
    pub last_x: f32,
    pub last_y: f32,
}
