use std::time::Duration;

use anyhow::{Result, ensure};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::style::Color;

use crate::entities::{Drawable, Food, Score, Textual, Wall, place_food};
use crate::snake::Snake;
use crate::{Coord, Point, Vector, intersects};

/// Time between movements of the snake
pub const TICK_PERIOD: Duration = Duration::from_millis(200);

pub const DEAD_SNAKE_COLOR: Color = Color::Red;
pub const WINNING_SNAKE_COLOR: Color = Color::Green;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// The head hit the wall or the body.
    Dead,
    /// No free cell is left for food.
    Won,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != Self::Running
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Top-left wall corner
    pub p1: Point,
    /// Bottom-right wall corner
    pub p2: Point,
    /// Terminal cell where the score label starts
    pub score_anchor: Point,
    pub tick: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            p1: Point::new(2, 2),
            p2: Point::new(20, 20),
            score_anchor: Point::new(4, 1),
            tick: TICK_PERIOD,
        }
    }
}

impl GameConfig {
    /// Fits the board to a terminal of `cols` x `rows` characters. The board
    /// spans a quarter of the columns (each grid cell is two characters wide)
    /// and leaves a margin for the score line.
    pub fn for_terminal(cols: u16, rows: u16) -> Result<Self> {
        let width = Coord::from(cols) / 2 / 2;
        let height = Coord::from(rows);
        let cfg = Self {
            p2: Point::new(width - 3, height - 3),
            ..Self::default()
        };
        let spawn = cfg.spawn_point();
        ensure!(
            cfg.p1.x < spawn.x && cfg.p1.y < spawn.y,
            "terminal of {cols}x{rows} is too small for a playable board"
        );
        Ok(cfg)
    }

    /// Where the snake's head starts.
    pub fn spawn_point(&self) -> Point {
        Point::new(self.p2.x / 2, self.p2.y / 2)
    }
}

/// UI-agnostic result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub ate_food: bool,
    pub status: GameStatus,
    pub score: u32,
}

#[derive(Debug)]
pub struct GameState {
    cfg: GameConfig,
    wall: Wall,
    snake: Snake,
    /// `None` only once the board is full.
    food: Option<Food>,
    score: Score,
    rng: ChaCha8Rng,
    status: GameStatus,
}

impl GameState {
    /// Create a new game with non-deterministic seed
    pub fn new(cfg: GameConfig) -> Self {
        Self::with_rng(cfg, ChaCha8Rng::from_os_rng())
    }

    pub fn with_seed(cfg: GameConfig, seed: u64) -> Self {
        Self::with_rng(cfg, ChaCha8Rng::seed_from_u64(seed))
    }

    /// The one generator used for every food placement of this game.
    pub fn with_rng(cfg: GameConfig, mut rng: ChaCha8Rng) -> Self {
        let wall = Wall::new(cfg.p1, cfg.p2);
        let spawn = cfg.spawn_point();
        let snake = Snake::new(spawn.x, spawn.y);
        let food = place_food(&mut rng, cfg.p1, cfg.p2, snake.points());
        let score = Score::new(cfg.score_anchor);
        info!(
            "new board ({}, {})-({}, {}), snake at {:?}",
            cfg.p1.x,
            cfg.p1.y,
            cfg.p2.x,
            cfg.p2.y,
            snake.head()
        );
        let mut game = Self {
            cfg,
            wall,
            snake,
            food,
            score,
            rng,
            status: GameStatus::Running,
        };
        if game.food.is_none() {
            game.finish(GameStatus::Won);
        }
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score.count()
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<&Food> {
        self.food.as_ref()
    }

    /// Turn the snake. Takes effect immediately; ignored once the game is over.
    pub fn steer(&mut self, v: Vector) {
        if self.status.is_over() {
            return;
        }
        self.snake.set_vector(v);
    }

    /// True if the next move puts the head on the food.
    pub fn can_eat(&self) -> bool {
        self.food
            .is_some_and(|food| food.position() == self.snake.next_head())
    }

    /// Advance the game by one tick.
    pub fn tick(&mut self) -> TickResult {
        if self.status.is_over() {
            return self.result(false);
        }

        let ate_food = self.can_eat();
        if ate_food {
            self.snake.eat();
            self.score.inc();
            debug!(
                "ate food at {:?}, length {}, score {}",
                self.snake.head(),
                self.snake.len(),
                self.score.count()
            );
            self.food = place_food(&mut self.rng, self.cfg.p1, self.cfg.p2, self.snake.points());
            match self.food {
                Some(food) => debug!("food placed at {:?}", food.position()),
                None => self.finish(GameStatus::Won),
            }
        } else {
            self.snake.step();
        }

        if self.snake.bites_itself() || intersects(self.snake.head(), self.wall.points()) {
            self.finish(GameStatus::Dead);
        }

        self.result(ate_food)
    }

    /// Entities painted as cells, back to front.
    pub fn drawables(&self) -> Vec<&dyn Drawable> {
        let mut items: Vec<&dyn Drawable> = Vec::with_capacity(3);
        items.push(&self.wall);
        items.push(&self.snake);
        if let Some(food) = &self.food {
            items.push(food);
        }
        items
    }

    /// Entities printed as text.
    pub fn texts(&self) -> Vec<&dyn Textual> {
        vec![&self.score as &dyn Textual]
    }

    #[cfg(test)]
    pub(crate) fn put_food(&mut self, x: Coord, y: Coord) {
        self.food = Some(Food::new(x, y));
    }

    fn finish(&mut self, status: GameStatus) {
        match status {
            GameStatus::Dead => {
                warn!(
                    "snake crashed at {:?} with score {}",
                    self.snake.head(),
                    self.score.count()
                );
                self.snake.set_color(DEAD_SNAKE_COLOR);
            }
            GameStatus::Won => {
                info!("board is full, final score {}", self.score.count());
                self.snake.set_color(WINNING_SNAKE_COLOR);
            }
            GameStatus::Running => {}
        }
        self.status = status;
    }

    fn result(&self, ate_food: bool) -> TickResult {
        TickResult {
            ate_food,
            status: self.status,
            score: self.score.count(),
        }
    }
}
