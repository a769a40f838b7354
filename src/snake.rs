use ratatui::style::Color;

use crate::entities::Drawable;
use crate::{Coord, Point, Vector, intersects};

pub const SNAKE_COLOR: Color = Color::White;

#[derive(Debug, Clone)]
pub struct Snake {
    /// Head first, tail last. Never empty.
    body: Vec<Point>,
    vector: Vector,
    color: Color,
}

impl Snake {
    /// A single segment at (`x`, `y`) heading right.
    pub fn new(x: Coord, y: Coord) -> Self {
        Self {
            body: vec![Point::new(x, y)],
            vector: Vector::RIGHT,
            color: SNAKE_COLOR,
        }
    }

    /// Builds a snake from explicit segments, head first.
    #[cfg(test)]
    pub(crate) fn from_body(body: Vec<Point>, vector: Vector) -> Self {
        assert!(!body.is_empty(), "snake needs at least one segment");
        assert!(!vector.is_zero(), "snake needs a heading");
        Self {
            body,
            vector,
            color: SNAKE_COLOR,
        }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn vector(&self) -> Vector {
        self.vector
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false, a snake keeps at least its head.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Where the head lands on the next move.
    pub fn next_head(&self) -> Point {
        self.head().translated(self.vector)
    }

    /// Changes heading unless `v` is zero or points straight back. Rejected
    /// vectors are ignored.
    pub fn set_vector(&mut self, v: Vector) {
        if !v.is_zero() && !(self.vector + v).is_zero() {
            self.vector = v;
        }
    }

    /// Advances one cell, dropping the old tail position.
    pub fn step(&mut self) {
        let head = self.next_head();
        self.body.rotate_right(1);
        self.body[0] = head;
    }

    /// Advances one cell and keeps the tail, growing by one segment.
    pub fn eat(&mut self) {
        let head = self.next_head();
        self.body.insert(0, head);
    }

    /// True if the head overlaps any other segment.
    pub fn bites_itself(&self) -> bool {
        intersects(self.head(), &self.body[1..])
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Drawable for Snake {
    fn color(&self) -> Color {
        self.color
    }

    fn points(&self) -> &[Point] {
        &self.body
    }
}
