use std::collections::HashSet;
use std::slice;

use log::debug;
use rand::Rng;
use rand::seq::IteratorRandom;
use ratatui::style::Color;

use crate::{Coord, Point};

pub const WALL_COLOR: Color = Color::Blue;
pub const FOOD_COLOR: Color = Color::Yellow;
pub const SCORE_COLOR: Color = Color::White;

/// Something painted as a set of grid cells in a single color.
pub trait Drawable {
    fn color(&self) -> Color;
    fn points(&self) -> &[Point];
}

/// Something printed as a line of text at a fixed terminal position.
pub trait Textual {
    fn anchor(&self) -> Point;
    fn color(&self) -> Color;
    fn text(&self) -> String;
}

/// Rectangular boundary of the board. Only the perimeter is occupied.
#[derive(Debug, Clone)]
pub struct Wall {
    p1: Point,
    p2: Point,
    points: Vec<Point>,
}

impl Wall {
    /// `p1` is the top-left corner and `p2` the bottom-right one.
    pub fn new(p1: Point, p2: Point) -> Self {
        let capacity = (2 * ((p2.x - p1.x + 1) + (p2.y - p1.y + 1))).max(0) as usize;
        let mut points = Vec::with_capacity(capacity);
        for x in p1.x..=p2.x {
            for y in p1.y..=p2.y {
                if x == p1.x || x == p2.x || y == p1.y || y == p2.y {
                    points.push(Point::new(x, y));
                }
            }
        }
        Self { p1, p2, points }
    }

    pub fn top_left(&self) -> Point {
        self.p1
    }

    pub fn bottom_right(&self) -> Point {
        self.p2
    }

    /// Number of cells strictly inside the wall.
    pub fn interior_area(&self) -> usize {
        interior_area(self.p1, self.p2)
    }
}

impl Drawable for Wall {
    fn color(&self) -> Color {
        WALL_COLOR
    }

    fn points(&self) -> &[Point] {
        &self.points
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    point: Point,
}

impl Food {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self {
            point: Point::new(x, y),
        }
    }

    pub fn position(&self) -> Point {
        self.point
    }
}

impl Drawable for Food {
    fn color(&self) -> Color {
        FOOD_COLOR
    }

    fn points(&self) -> &[Point] {
        slice::from_ref(&self.point)
    }
}

/// Count of food eaten so far.
#[derive(Debug, Clone)]
pub struct Score {
    count: u32,
    anchor: Point,
}

impl Score {
    pub fn new(anchor: Point) -> Self {
        Self { count: 0, anchor }
    }

    pub fn inc(&mut self) {
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Textual for Score {
    fn anchor(&self) -> Point {
        self.anchor
    }

    fn color(&self) -> Color {
        SCORE_COLOR
    }

    fn text(&self) -> String {
        format!("NUM: {}", self.count)
    }
}

fn interior_area(p1: Point, p2: Point) -> usize {
    let w = (p2.x - p1.x - 1).max(0) as usize;
    let h = (p2.y - p1.y - 1).max(0) as usize;
    w * h
}

/// Picks a random cell strictly inside the rectangle `p1`..`p2` that is not in
/// `excludes`.
///
/// Candidates are drawn uniformly for a bounded number of attempts; if all of
/// them land on excluded cells the free interior cells are enumerated and one
/// is chosen directly. Returns `None` only when the interior is full.
pub fn place_food<R: Rng>(
    rng: &mut R,
    p1: Point,
    p2: Point,
    excludes: &[Point],
) -> Option<Food> {
    let area = interior_area(p1, p2);
    if area == 0 {
        return None;
    }
    let taken: HashSet<Point> = excludes.iter().copied().collect();

    let max_attempts = area.saturating_mul(2).max(8);
    for _ in 0..max_attempts {
        let x = rng.random_range(p1.x + 1..p2.x);
        let y = rng.random_range(p1.y + 1..p2.y);
        if !taken.contains(&Point::new(x, y)) {
            return Some(Food::new(x, y));
        }
    }

    debug!("rejection sampling exhausted after {max_attempts} draws, scanning free cells");
    ((p1.x + 1)..p2.x)
        .flat_map(|x| ((p1.y + 1)..p2.y).map(move |y| Point::new(x, y)))
        .filter(|p| !taken.contains(p))
        .choose(rng)
        .map(|p| Food::new(p.x, p.y))
}
