//! SceneView: maps the composed arena surface into terminal cells.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Each terminal row shows two arena pixel rows with the upper half block
//! `▀`: the foreground is the upper pixel, the background the lower one.
//! A status line sits under the arena.

use crate::core::Surface;
use crate::engine::FrameStatus;
use crate::fb::{Cell, CellBuffer, CellStyle};
use crate::types::{Rgb, BACKGROUND, HUD_ROWS, PIXELS_PER_ROW};

const UPPER_HALF: char = '▀';
const KEY_HINT: &str = "any key: wound  f: fire  m: melee  r: respawn  q: quit";

pub struct SceneView {
    hud: CellStyle,
    down: CellStyle,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            hud: CellStyle {
                fg: Rgb::new(200, 200, 200),
                bg: Rgb::new(30, 30, 40),
                bold: false,
                dim: false,
            },
            down: CellStyle {
                fg: Rgb::new(255, 220, 120),
                bg: BACKGROUND,
                bold: true,
                dim: false,
            },
        }
    }
}

impl SceneView {
    /// Terminal size (cols, rows) needed to show `pixels` plus the status line.
    pub fn cells_for(pixels: &Surface) -> (u16, u16) {
        let cols = pixels.width().min(u16::MAX as u32) as u16;
        let arena_rows = pixels.height().div_ceil(PIXELS_PER_ROW);
        let rows = (arena_rows + HUD_ROWS as u32).min(u16::MAX as u32) as u16;
        (cols, rows)
    }

    /// Render `pixels` and `status` into an existing cell buffer.
    ///
    /// The buffer is resized to fit; callers reuse it across frames.
    pub fn render_into(&self, pixels: &Surface, status: &FrameStatus, cells: &mut CellBuffer) {
        let (cols, rows) = Self::cells_for(pixels);
        cells.resize(cols, rows);
        cells.clear(CellStyle::default().into_cell(' '));

        let arena_rows = rows.saturating_sub(HUD_ROWS);
        for row in 0..arena_rows {
            let upper_y = row as u32 * PIXELS_PER_ROW;
            for x in 0..cols {
                let upper = pixels.get_pixel(x as u32, upper_y).unwrap_or(BACKGROUND);
                let lower = pixels.get_pixel(x as u32, upper_y + 1).unwrap_or(BACKGROUND);
                cells.set(x, row, half_block(upper, lower));
            }
        }

        if status.player.is_none() {
            self.draw_down_banner(cells, arena_rows);
        }
        self.draw_status_line(cells, arena_rows, status);
    }

    /// Allocating convenience wrapper around [`SceneView::render_into`].
    pub fn render(&self, pixels: &Surface, status: &FrameStatus) -> CellBuffer {
        let mut cells = CellBuffer::new(0, 0);
        self.render_into(pixels, status, &mut cells);
        cells
    }

    fn draw_down_banner(&self, cells: &mut CellBuffer, arena_rows: u16) {
        if arena_rows == 0 {
            return;
        }
        let text = "DOWN - press r";
        let len = text.chars().count() as u16;
        let x = cells.width().saturating_sub(len) / 2;
        cells.put_str(x, arena_rows / 2, text, self.down);
    }

    fn draw_status_line(&self, cells: &mut CellBuffer, y: u16, status: &FrameStatus) {
        cells.fill_rect(0, y, cells.width(), HUD_ROWS, ' ', self.hud);

        let mut line = match &status.player {
            Some(p) => format!(
                " {} HP {}/{}  size {}  {}",
                p.name,
                p.current_hp,
                p.max_hp,
                p.size,
                if p.melee { "melee" } else { "ranged" }
            ),
            None => " no player".to_string(),
        };
        line.push_str(&format!(
            "  | entities {}  frame {}",
            status.entities, status.frame
        ));
        let used = line.chars().count();
        cells.put_str(0, y, &line, self.hud);

        let hint_len = KEY_HINT.chars().count();
        let width = cells.width() as usize;
        if used + hint_len + 3 <= width {
            let hint = CellStyle {
                dim: true,
                ..self.hud
            };
            cells.put_str((width - hint_len - 1) as u16, y, KEY_HINT, hint);
        }
    }
}

fn half_block(upper: Rgb, lower: Rgb) -> Cell {
    let style = CellStyle {
        fg: upper,
        bg: lower,
        bold: false,
        dim: false,
    };
    let ch = if upper == lower { ' ' } else { UPPER_HALF };
    style.into_cell(ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlayerStatus;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn status(player: bool) -> FrameStatus {
        FrameStatus {
            frame: 7,
            entities: 3,
            player: player.then(|| PlayerStatus {
                name: "Jeremy".to_string(),
                current_hp: 80,
                max_hp: 100,
                size: 10,
                melee: true,
            }),
        }
    }

    #[test]
    fn two_pixel_rows_per_cell_row() {
        let mut pixels = Surface::new(4, 4, BACKGROUND);
        pixels.set_pixel(0, 0, RED);
        pixels.set_pixel(1, 1, RED);
        pixels.fill_rect(2, 2, 1, 2, RED);

        let cells = SceneView::default().render(&pixels, &status(true));
        assert_eq!((cells.width(), cells.height()), (4, 3));

        let upper_only = cells.get(0, 0).unwrap();
        assert_eq!(upper_only.ch, UPPER_HALF);
        assert_eq!((upper_only.style.fg, upper_only.style.bg), (RED, BACKGROUND));

        let lower_only = cells.get(1, 0).unwrap();
        assert_eq!(lower_only.ch, UPPER_HALF);
        assert_eq!((lower_only.style.fg, lower_only.style.bg), (BACKGROUND, RED));

        let both = cells.get(2, 1).unwrap();
        assert_eq!(both.ch, ' ');
        assert_eq!(both.style.bg, RED);
    }

    #[test]
    fn odd_height_pads_last_row_with_background() {
        let pixels = Surface::new(2, 3, RED);
        let cells = SceneView::default().render(&pixels, &status(true));
        assert_eq!(cells.height(), 3);
        let last = cells.get(0, 1).unwrap();
        assert_eq!((last.style.fg, last.style.bg), (RED, BACKGROUND));
    }

    #[test]
    fn status_line_shows_player_and_counts() {
        let pixels = Surface::new(60, 4, BACKGROUND);
        let cells = SceneView::default().render(&pixels, &status(true));
        let hud = cells.row_text(2);
        assert!(hud.contains("Jeremy HP 80/100"), "{}", hud);
        assert!(hud.contains("melee"));
        assert!(hud.contains("entities 3"));
        assert!(hud.contains("frame 7"));
    }

    #[test]
    fn key_hint_only_when_it_fits() {
        let narrow = SceneView::default().render(&Surface::new(40, 2, BACKGROUND), &status(true));
        assert!(!narrow.row_text(1).contains("q: quit"));

        let wide = SceneView::default().render(&Surface::new(160, 2, BACKGROUND), &status(true));
        assert!(wide.row_text(1).contains("q: quit"));
    }

    #[test]
    fn down_banner_when_player_is_gone() {
        let pixels = Surface::new(40, 10, BACKGROUND);
        let cells = SceneView::default().render(&pixels, &status(false));
        assert!(cells.row_text(2).contains("DOWN - press r"));
        assert!(cells.row_text(5).contains("no player"));

        let cells = SceneView::default().render(&pixels, &status(true));
        assert!((0..5).all(|y| !cells.row_text(y).contains("DOWN")));
    }
}
