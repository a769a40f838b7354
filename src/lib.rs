use std::ops::Add;

pub mod app;
pub mod entities;
pub mod events;
pub mod game;
pub mod render;
pub mod snake;

pub use app::{Controller, Event, Flow, Surface};
pub use entities::{Drawable, Food, Score, Textual, Wall, place_food};
pub use events::{Command, Input, InputPump, Ticker, command_for_key};
pub use game::{GameConfig, GameState, GameStatus, TickResult};
pub use snake::Snake;

/// Integer coordinate type for grid cells (not terminal characters)
pub type Coord = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Moves this point by `v` in place.
    #[inline]
    pub fn transform(&mut self, v: Vector) {
        self.x += v.dx;
        self.y += v.dy;
    }

    #[inline]
    pub fn translated(mut self, v: Vector) -> Self {
        self.transform(v);
        self
    }
}

/// Single-step displacement. The game only ever produces the four unit
/// directions below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub dx: Coord,
    pub dy: Coord,
}

impl Vector {
    pub const ZERO: Self = Self::new(0, 0);
    pub const UP: Self = Self::new(0, -1);
    pub const DOWN: Self = Self::new(0, 1);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);

    #[inline]
    pub const fn new(dx: Coord, dy: Coord) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

/// True if `p` is a member of `points`.
#[inline]
pub fn intersects(p: Point, points: &[Point]) -> bool {
    points.contains(&p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_moves_by_vector() {
        let mut p = Point::new(3, 7);
        p.transform(Vector::UP);
        assert_eq!(p, Point::new(3, 6));
        assert_eq!(p.translated(Vector::RIGHT), Point::new(4, 6));
        // translated works on a copy
        assert_eq!(p, Point::new(3, 6));
    }

    #[test]
    fn opposite_directions_sum_to_zero() {
        assert!((Vector::UP + Vector::DOWN).is_zero());
        assert!((Vector::LEFT + Vector::RIGHT).is_zero());
        assert!(!(Vector::UP + Vector::LEFT).is_zero());
        assert!(Vector::ZERO.is_zero());
        assert!(!Vector::RIGHT.is_zero());
    }

    #[test]
    fn vector_equality_compares_both_components() {
        // Same dy, different dx must not compare equal.
        assert_ne!(Vector::LEFT, Vector::RIGHT);
        assert_ne!(Vector::new(1, 1), Vector::new(-1, 1));
        assert_eq!(Vector::new(0, -1), Vector::UP);
    }

    #[test]
    fn intersects_checks_membership() {
        let pts = [Point::new(1, 1), Point::new(2, 1)];
        assert!(intersects(Point::new(2, 1), &pts));
        assert!(!intersects(Point::new(1, 2), &pts));
        assert!(!intersects(Point::new(0, 0), &[]));
    }
}
