// Movement intent and key-state handling
use glam::Vec2;

/// Per-tick movement intent. Each axis is -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputIntent {
    pub move_x: i8,
    pub move_y: i8,
    pub boost: bool,
}

impl InputIntent {
    pub fn new(move_x: i8, move_y: i8, boost: bool) -> Self {
        Self {
            move_x: move_x.signum(),
            move_y: move_y.signum(),
            boost,
        }
    }

    /// Normalized movement direction, or zero when no axis is held.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.move_x.signum() as f32, self.move_y.signum() as f32).normalize_or_zero()
    }

    pub fn is_idle(&self) -> bool {
        self.move_x == 0 && self.move_y == 0
    }
}

/// Everything the simulation reads from the outside for one tick.
/// `split` and `eject` are one-shot requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub intent: InputIntent,
    pub split: bool,
    pub eject: bool,
}

/// Held-key state with previous-frame tracking for one-shot actions.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub split: bool,
    pub eject: bool,
    // Previous frame states for edge detection
    pub prev_split: bool,
    pub prev_eject: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opposite keys cancel out.
    pub fn intent(&self) -> InputIntent {
        let axis = |neg: bool, pos: bool| pos as i8 - neg as i8;
        InputIntent::new(axis(self.left, self.right), axis(self.up, self.down), self.boost)
    }

    pub fn split_just_pressed(&self) -> bool {
        self.split && !self.prev_split
    }

    pub fn eject_just_pressed(&self) -> bool {
        self.eject && !self.prev_eject
    }

    /// Update previous frame state - call this once per frame
    pub fn update_previous_state(&mut self) {
        self.prev_split = self.split;
        self.prev_eject = self.eject;
    }

    /// Build this frame's input and advance the edge-detection state.
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            intent: self.intent(),
            split: self.split_just_pressed(),
            eject: self.eject_just_pressed(),
        };
        self.update_previous_state();
        input
    }

    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
        self.boost = false;
        self.split = false;
        self.eject = false;
    }
}
