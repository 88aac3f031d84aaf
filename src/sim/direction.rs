//! Movement keys to a single (possibly diagonal) direction
//!
//! The first key pressed sets the primary direction. The first later key on
//! the other axis turns it into a diagonal. Opposite keys never cancel: the
//! earliest one on an axis wins.

use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;

use super::math::normalize;

/// Direction bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Direction(u8);

impl Direction {
    pub const NONE: Direction = Direction(0);
    pub const UP: Direction = Direction(1);
    pub const DOWN: Direction = Direction(2);
    pub const LEFT: Direction = Direction(4);
    pub const RIGHT: Direction = Direction(8);

    #[inline]
    pub fn contains(self, other: Direction) -> bool {
        (self.0 & other.0) != 0
    }

    /// The two directions that can combine with `self` into a diagonal
    fn perpendicular(self) -> Direction {
        match self {
            Direction::UP | Direction::DOWN => Direction::LEFT | Direction::RIGHT,
            Direction::LEFT | Direction::RIGHT => Direction::UP | Direction::DOWN,
            _ => Direction::NONE,
        }
    }

    /// Unit vector in screen space (up is -y)
    pub fn to_vector(self) -> Vec2 {
        let mut v = Vec2::ZERO;

        if self.contains(Direction::UP) {
            v.y = -1.0;
        } else if self.contains(Direction::DOWN) {
            v.y = 1.0;
        }

        if self.contains(Direction::LEFT) {
            v.x = -1.0;
        } else if self.contains(Direction::RIGHT) {
            v.x = 1.0;
        }

        normalize(v)
    }
}

impl BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        Direction(self.0 | rhs.0)
    }
}

impl BitOrAssign for Direction {
    fn bitor_assign(&mut self, rhs: Direction) {
        self.0 |= rhs.0;
    }
}

/// W/A/S/D to a direction; anything else is not a movement key
pub fn direction_for_key(key: char) -> Option<Direction> {
    match key {
        'w' => Some(Direction::UP),
        's' => Some(Direction::DOWN),
        'a' => Some(Direction::LEFT),
        'd' => Some(Direction::RIGHT),
        _ => None,
    }
}

/// Currently held movement keys, in press order
#[derive(Debug, Clone, Default)]
pub struct DirectionKeys {
    pressed: Vec<char>,
}

impl DirectionKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Record a key press; repeats and non-movement keys are ignored
    pub fn add_key(&mut self, key: char) {
        if direction_for_key(key).is_some() && !self.pressed.contains(&key) {
            self.pressed.push(key);
        }
    }

    pub fn remove_key(&mut self, key: char) {
        self.pressed.retain(|k| *k != key);
    }

    pub fn has_pressed_keys(&self) -> bool {
        !self.pressed.is_empty()
    }

    pub fn pressed(&self) -> &[char] {
        &self.pressed
    }

    /// Resolve the held keys to a direction bit set
    pub fn direction(&self) -> Direction {
        let mut keys = self.pressed.iter().filter_map(|k| direction_for_key(*k));

        let Some(primary) = keys.next() else {
            return Direction::NONE;
        };

        let compatible = primary.perpendicular();
        match keys.find(|d| compatible.contains(*d)) {
            Some(secondary) => primary | secondary,
            None => primary,
        }
    }

    /// Resolved direction as a unit vector (zero when nothing is held)
    pub fn direction_vector(&self) -> Vec2 {
        self.direction().to_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pressed: &str) -> DirectionKeys {
        let mut keys = DirectionKeys::new();
        pressed.chars().for_each(|k| keys.add_key(k));
        keys
    }

    #[test]
    fn test_add_and_remove_keys() {
        let mut k = DirectionKeys::new();
        k.add_key('a');
        assert_eq!(k.pressed(), &['a']);
        k.add_key('l');
        assert_eq!(k.pressed(), &['a']);
        k.add_key('w');
        assert_eq!(k.pressed(), &['a', 'w']);
        k.remove_key('a');
        assert_eq!(k.pressed(), &['w']);
        k.remove_key('x');
        assert_eq!(k.pressed(), &['w']);
    }

    #[test]
    fn test_no_duplicate_keys() {
        let k = keys("aa");
        assert_eq!(k.pressed(), &['a']);
    }

    #[test]
    fn test_clear() {
        let mut k = keys("aw");
        k.clear();
        assert!(!k.has_pressed_keys());
        assert_eq!(k.direction(), Direction::NONE);
    }

    #[test]
    fn test_direction_resolution() {
        assert_eq!(keys("wd").direction(), Direction::UP | Direction::RIGHT);
        assert_eq!(keys("adw").direction(), Direction::UP | Direction::LEFT);
        assert_eq!(keys("sa").direction(), Direction::DOWN | Direction::LEFT);
        assert_eq!(keys("swd").direction(), Direction::DOWN | Direction::RIGHT);
        assert_eq!(keys("a").direction(), Direction::LEFT);
        assert_eq!(keys("w").direction(), Direction::UP);
        assert_eq!(keys("d").direction(), Direction::RIGHT);
        assert_eq!(keys("s").direction(), Direction::DOWN);
    }

    #[test]
    fn test_opposite_keys_do_not_cancel() {
        assert_eq!(keys("ws").direction(), Direction::UP);
        assert_eq!(keys("ad").direction(), Direction::LEFT);
        assert_eq!(keys("da").direction(), Direction::RIGHT);
    }

    #[test]
    fn test_direction_vectors() {
        assert_eq!(keys("w").direction_vector(), Vec2::new(0.0, -1.0));
        assert_eq!(keys("d").direction_vector(), Vec2::new(1.0, 0.0));
        assert_eq!(DirectionKeys::new().direction_vector(), Vec2::ZERO);

        let diag = keys("sa").direction_vector();
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert!((diag.x + h).abs() < 1e-6);
        assert!((diag.y - h).abs() < 1e-6);
    }

    #[test]
    fn test_released_primary_promotes_next_key() {
        let mut k = keys("wd");
        k.remove_key('w');
        assert_eq!(k.direction(), Direction::RIGHT);
    }
}
