use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::events::{Command, Input, Ticker};
use crate::game::GameState;
use crate::render::Scene;

/// Where the scene ends up. Implemented for every ratatui terminal.
pub trait Surface {
    fn present(&mut self, game: &GameState) -> io::Result<()>;
}

impl<B: Backend> Surface for Terminal<B> {
    fn present(&mut self, game: &GameState) -> io::Result<()> {
        self.draw(|frame| frame.render_widget(Scene::new(game), frame.area()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Input(Input),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the game and is the only thing that mutates it. Events are handled
/// one at a time, each to completion.
pub struct Controller<S> {
    game: GameState,
    surface: S,
    ticker: Ticker,
}

impl<S: Surface> Controller<S> {
    pub fn new(game: GameState, surface: S) -> Self {
        let ticker = Ticker::start(game.config().tick);
        Self {
            game,
            surface,
            ticker,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Draws once, then services `inputs` and the tick until a quit command
    /// arrives or the input channel closes.
    pub fn run(&mut self, inputs: &Receiver<Input>) -> Result<()> {
        self.present()?;
        while let Some(event) = self.next_event(inputs) {
            if self.handle(event)? == Flow::Quit {
                return Ok(());
            }
        }
        info!("input source closed");
        Ok(())
    }

    pub fn handle(&mut self, event: Event) -> Result<Flow> {
        match event {
            Event::Input(Input::Command(Command::Quit)) => {
                info!("quit with score {}", self.game.score());
                return Ok(Flow::Quit);
            }
            Event::Input(Input::Command(Command::Steer(v))) => self.game.steer(v),
            Event::Input(Input::Resize(cols, rows)) => {
                debug!("terminal resized to {cols}x{rows}");
                self.present()?;
            }
            Event::Tick => {
                let res = self.game.tick();
                if res.status.is_over() && self.ticker.is_running() {
                    info!("game over ({:?}), stopping the clock", res.status);
                    self.ticker.stop();
                }
                self.present()?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Blocks until the next input or tick. `None` once input is gone.
    fn next_event(&mut self, inputs: &Receiver<Input>) -> Option<Event> {
        let now = Instant::now();
        if self.ticker.is_due(now) {
            self.ticker.fired(now);
            return Some(Event::Tick);
        }
        match self.ticker.time_left(now) {
            Some(left) => match inputs.recv_timeout(left) {
                Ok(input) => Some(Event::Input(input)),
                Err(RecvTimeoutError::Timeout) => {
                    self.ticker.fired(Instant::now());
                    Some(Event::Tick)
                }
                Err(RecvTimeoutError::Disconnected) => None,
            },
            None => inputs.recv().ok().map(Event::Input),
        }
    }

    fn present(&mut self) -> Result<()> {
        self.surface
            .present(&self.game)
            .context("failed to draw the board")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Drawable;
    use crate::game::{DEAD_SNAKE_COLOR, GameConfig, GameStatus};
    use crate::{Point, Vector};
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;

    type TestController = Controller<Terminal<TestBackend>>;

    fn controller() -> TestController {
        let cfg = GameConfig {
            p1: Point::new(0, 1),
            p2: Point::new(12, 10),
            ..GameConfig::default()
        };
        let game = GameState::with_seed(cfg, 17);
        let terminal = Terminal::new(TestBackend::new(30, 12)).expect("test terminal");
        Controller::new(game, terminal)
    }

    fn steer(v: Vector) -> Event {
        Event::Input(Input::Command(Command::Steer(v)))
    }

    fn head_cell_bg(c: &TestController) -> ratatui::style::Color {
        let head = c.game().snake().head();
        c.surface().backend().buffer()[((2 * head.x) as u16, head.y as u16)].bg
    }

    #[test]
    fn tick_moves_and_redraws() {
        let mut c = controller();
        let start = c.game().snake().head();
        assert_eq!(c.handle(Event::Tick).unwrap(), Flow::Continue);
        assert_ne!(c.game().snake().head(), start);
        assert_eq!(head_cell_bg(&c), c.game().snake().color());
    }

    #[test]
    fn steering_applies_before_the_next_tick() {
        let mut c = controller();
        c.game.put_food(1, 2);
        let start = c.game().snake().head();

        c.handle(steer(Vector::DOWN)).unwrap();
        // Reversal of the new heading is rejected.
        c.handle(steer(Vector::UP)).unwrap();
        c.handle(Event::Tick).unwrap();
        assert_eq!(c.game().snake().head(), start.translated(Vector::DOWN));
    }

    #[test]
    fn crash_stops_the_clock_but_keeps_serving_input() {
        let mut c = controller();
        c.game.put_food(1, 2);
        // Head starts at (6, 5) heading right; the wall is at x = 12.
        for _ in 0..5 {
            c.handle(Event::Tick).unwrap();
            assert!(c.ticker().is_running());
        }
        c.handle(Event::Tick).unwrap();
        assert_eq!(c.game().status(), GameStatus::Dead);
        assert!(!c.ticker().is_running());
        assert_eq!(head_cell_bg(&c), DEAD_SNAKE_COLOR);

        let body = c.game().snake().points().to_vec();
        assert_eq!(c.handle(steer(Vector::UP)).unwrap(), Flow::Continue);
        assert_eq!(c.game().snake().vector(), Vector::RIGHT);
        assert_eq!(c.game().snake().points(), body.as_slice());
    }

    #[test]
    fn escape_quits() {
        let mut c = controller();
        assert_eq!(
            c.handle(Event::Input(Input::Command(Command::Quit))).unwrap(),
            Flow::Quit
        );
    }

    #[test]
    fn run_draws_first_and_stops_on_quit() {
        let mut c = controller();
        let (tx, rx) = mpsc::channel();
        tx.send(Input::Command(Command::Steer(Vector::UP))).unwrap();
        tx.send(Input::Resize(30, 12)).unwrap();
        tx.send(Input::Command(Command::Quit)).unwrap();

        c.run(&rx).unwrap();
        assert_eq!(c.game().snake().vector(), Vector::UP);
        let wall_corner = c.surface().backend().buffer()[(0, 1)].bg;
        assert_eq!(wall_corner, c.game().wall().color());
    }

    #[test]
    fn run_ends_when_input_closes() {
        let mut c = controller();
        let (tx, rx) = mpsc::channel::<Input>();
        drop(tx);
        c.run(&rx).unwrap();
        assert_eq!(c.game().status(), GameStatus::Running);
    }
}
