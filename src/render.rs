use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Clear, Widget};

use crate::entities::{Drawable, Textual};
use crate::game::GameState;
use crate::{Coord, Point};

pub struct Scene<'a> {
    game: &'a GameState,
}

impl<'a> Scene<'a> {
    pub fn new(game: &'a GameState) -> Self {
        Self { game }
    }
}

impl Widget for Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        for d in self.game.drawables() {
            draw_points(d, area, buf);
        }
        for t in self.game.texts() {
            draw_text(t, area, buf);
        }
    }
}

/// Terminal position of `(col, row)` relative to `area`, if it falls inside.
fn cell_in(area: Rect, col: Coord, row: Coord) -> Option<Position> {
    let x = u16::try_from(col).ok()?.checked_add(area.x)?;
    let y = u16::try_from(row).ok()?.checked_add(area.y)?;
    let pos = Position::new(x, y);
    area.contains(pos).then_some(pos)
}

// Grid point (x, y) covers columns 2x and 2x + 1 of row y.
fn draw_points(d: &dyn Drawable, area: Rect, buf: &mut Buffer) {
    let color = d.color();
    for &Point { x, y } in d.points() {
        for col in [2 * x, 2 * x + 1] {
            if let Some(pos) = cell_in(area, col, y)
                && let Some(cell) = buf.cell_mut(pos)
            {
                cell.set_symbol(" ").set_fg(Color::Reset).set_bg(color);
            }
        }
    }
}

fn draw_text(t: &dyn Textual, area: Rect, buf: &mut Buffer) {
    let anchor = t.anchor();
    let Some(pos) = cell_in(area, anchor.x, anchor.y) else {
        return;
    };
    let max_width = (area.right() - pos.x) as usize;
    buf.set_stringn(
        pos.x,
        pos.y,
        t.text(),
        max_width,
        Style::default().fg(t.color()).bg(Color::Reset),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FOOD_COLOR, WALL_COLOR};
    use crate::game::GameConfig;
    use crate::snake::SNAKE_COLOR;

    fn small_game() -> GameState {
        let cfg = GameConfig {
            p1: Point::new(1, 2),
            p2: Point::new(8, 8),
            score_anchor: Point::new(2, 0),
            ..GameConfig::default()
        };
        GameState::with_seed(cfg, 9)
    }

    fn render(game: &GameState, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        Scene::new(game).render(area, &mut buf);
        buf
    }

    #[test]
    fn grid_cells_are_two_columns_wide() {
        let game = small_game();
        let area = Rect::new(0, 0, 20, 10);
        let buf = render(&game, area);

        // Wall corner (1, 2) covers columns 2 and 3 of row 2.
        assert_eq!(buf[(2, 2)].bg, WALL_COLOR);
        assert_eq!(buf[(3, 2)].bg, WALL_COLOR);
        assert_eq!(buf[(1, 2)].bg, Color::Reset);

        let head = game.snake().head();
        let (hx, hy) = ((2 * head.x) as u16, head.y as u16);
        assert_eq!(buf[(hx, hy)].bg, SNAKE_COLOR);
        assert_eq!(buf[(hx + 1, hy)].bg, SNAKE_COLOR);

        let food = game.food().expect("food").position();
        assert_eq!(buf[((2 * food.x) as u16, food.y as u16)].bg, FOOD_COLOR);
    }

    #[test]
    fn score_label_is_printed_at_its_anchor() {
        let game = small_game();
        let buf = render(&game, Rect::new(0, 0, 20, 10));
        let row: String = (2u16..8).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "NUM: 0");
    }

    #[test]
    fn drawing_is_clipped_and_offset_by_area() {
        let game = small_game();
        // The board reaches column 17 and row 8; this area is smaller.
        let area = Rect::new(3, 1, 10, 5);
        let buf = render(&game, area);

        // Wall corner (1, 2) lands at column 3 + 2, row 1 + 2.
        assert_eq!(buf[(5, 3)].bg, WALL_COLOR);
        // Score at (2, 0) shifts to (5, 1).
        let row: String = (5u16..13).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row, "NUM: 0  ");
    }

    #[test]
    fn negative_coordinates_are_skipped() {
        assert_eq!(cell_in(Rect::new(0, 0, 4, 4), -1, 0), None);
        assert_eq!(cell_in(Rect::new(0, 0, 4, 4), 3, 3), Some(Position::new(3, 3)));
        assert_eq!(cell_in(Rect::new(0, 0, 4, 4), 4, 0), None);
    }
}
