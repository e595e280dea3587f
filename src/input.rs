//! Input aggregation
//!
//! Keyboard, touch and pointer handlers only overwrite fields here; the frame
//! callback reads the whole struct once per frame and turns it into a single
//! movement intent.

use glam::Vec2;

/// Direction keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (arrows and WASD)
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            _ => None,
        }
    }
}

/// Keys that request a new session from the title or game-over screen
pub fn is_start_key(key: &str) -> bool {
    matches!(key, " " | "Enter")
}

/// Held direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Shared intent state written by event handlers
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keys: HeldKeys,
    /// Last horizontal key pressed: -1 left, 1 right, 0 none yet
    pub last_horizontal: i8,
    /// Touch or pointer position the player should chase
    pub follow: Option<Vec2>,
    /// One-shot request to start a session (Space, Enter, click, tap)
    pub start: bool,
    /// Let the autopilot fly (attract/demo mode)
    pub demo: bool,
}

/// Movement intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Per-axis movement in [-1, 1]
    pub dir: Vec2,
    /// Visual facing in radians (0 = nose up)
    pub facing: f32,
}

impl InputState {
    pub fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.keys.up = down,
            Key::Down => self.keys.down = down,
            Key::Left => self.keys.left = down,
            Key::Right => self.keys.right = down,
        }
        if down {
            match key {
                Key::Left => self.last_horizontal = -1,
                Key::Right => self.last_horizontal = 1,
                _ => {}
            }
        }
    }

    /// Release everything (focus loss, view close)
    pub fn clear(&mut self) {
        self.keys = HeldKeys::default();
        self.follow = None;
        self.start = false;
    }

    /// Take the pending start request
    pub fn take_start(&mut self) -> bool {
        std::mem::take(&mut self.start)
    }

    /// Unit steps per axis from held keys (opposites cancel)
    fn key_steps(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.keys.left, self.keys.right),
            axis(self.keys.up, self.keys.down),
        )
    }

    /// Combine every active source into one intent for a player at `player`
    pub fn intent(&self, player: Vec2, dead_zone: f32, tilt: f32) -> Intent {
        let keys = self.key_steps();

        let follow = self.follow.and_then(|target| {
            let delta = target - player;
            let dist = delta.length();
            (dist > dead_zone).then(|| delta / dist)
        });

        let dir = (keys + follow.unwrap_or(Vec2::ZERO)).clamp(Vec2::NEG_ONE, Vec2::ONE);

        let facing = if let Some(v) = follow {
            v.x.atan2(-v.y)
        } else if self.keys.left || self.keys.right {
            let side = match (self.keys.left, self.keys.right) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                // Both held: lean toward the most recent press
                _ => self.last_horizontal as f32,
            };
            tilt * side
        } else {
            0.0
        };

        Intent { dir, facing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEAD_ZONE: f32 = 4.0;
    const TILT: f32 = 0.25;

    #[test]
    fn test_no_input_is_stationary() {
        let input = InputState::default();
        let intent = input.intent(Vec2::new(100.0, 100.0), DEAD_ZONE, TILT);
        assert_eq!(intent.dir, Vec2::ZERO);
        assert_eq!(intent.facing, 0.0);
    }

    #[test]
    fn test_keys_give_unit_steps() {
        let mut input = InputState::default();
        input.set_key(Key::Right, true);
        input.set_key(Key::Up, true);
        let intent = input.intent(Vec2::ZERO, DEAD_ZONE, TILT);
        assert_eq!(intent.dir, Vec2::new(1.0, -1.0));
        assert_eq!(intent.facing, TILT);

        input.set_key(Key::Right, false);
        input.set_key(Key::Left, true);
        let intent = input.intent(Vec2::ZERO, DEAD_ZONE, TILT);
        assert_eq!(intent.dir, Vec2::new(-1.0, -1.0));
        assert_eq!(intent.facing, -TILT);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::default();
        input.set_key(Key::Left, true);
        input.set_key(Key::Right, true);
        let intent = input.intent(Vec2::ZERO, DEAD_ZONE, TILT);
        assert_eq!(intent.dir.x, 0.0);
        // Still leans toward the last pressed side
        assert_eq!(intent.facing, TILT);
    }

    #[test]
    fn test_follow_normalizes_direction() {
        let input = InputState {
            follow: Some(Vec2::new(130.0, 140.0)),
            ..Default::default()
        };
        let intent = input.intent(Vec2::new(100.0, 100.0), DEAD_ZONE, TILT);
        assert!((intent.dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
        // Pointing down-right
        assert!(intent.facing > std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_follow_dead_zone() {
        let input = InputState {
            follow: Some(Vec2::new(102.0, 101.0)),
            ..Default::default()
        };
        let intent = input.intent(Vec2::new(100.0, 100.0), DEAD_ZONE, TILT);
        assert_eq!(intent.dir, Vec2::ZERO);
        assert_eq!(intent.facing, 0.0);
    }

    #[test]
    fn test_follow_and_keys_combine_within_unit_box() {
        let mut input = InputState {
            follow: Some(Vec2::new(200.0, 100.0)),
            ..Default::default()
        };
        input.set_key(Key::Right, true);
        let intent = input.intent(Vec2::new(100.0, 100.0), DEAD_ZONE, TILT);
        assert_eq!(intent.dir, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut input = InputState {
            start: true,
            ..Default::default()
        };
        assert!(input.take_start());
        assert!(!input.take_start());
    }

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom("d"), Some(Key::Right));
        assert_eq!(Key::from_dom("q"), None);
        assert!(is_start_key(" "));
        assert!(!is_start_key("Escape"));
    }
}
