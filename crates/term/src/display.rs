//! TerminalDisplay: the [`Display`] the binary runs against.
//!
//! Sprites are blitted into an arena [`Surface`]; `present` converts it to
//! cells through [`SceneView`] and hands them to the diffing renderer.

use anyhow::Result;

use crate::core::{Canvas, Surface};
use crate::engine::{Display, FrameStatus};
use crate::fb::CellBuffer;
use crate::renderer::TerminalRenderer;
use crate::scene_view::SceneView;
use crate::types::{arena_for_terminal, Rgb, BACKGROUND};

pub struct TerminalDisplay {
    arena: Surface,
    cells: CellBuffer,
    view: SceneView,
    renderer: TerminalRenderer,
}

impl TerminalDisplay {
    /// Display sized for a terminal of `cols`x`rows` cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        let (width, height) = arena_for_terminal(cols, rows);
        Self {
            arena: Surface::new(width, height, BACKGROUND),
            cells: CellBuffer::new(cols, rows),
            view: SceneView::default(),
            renderer: TerminalRenderer::new(),
        }
    }

    /// Display sized for the current terminal, 80x24 if it cannot be queried.
    pub fn from_terminal() -> Self {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        Self::new(cols, rows)
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    /// Resize the arena to `width`x`height` pixels and redraw everything.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.arena.width(), self.arena.height()) {
            return;
        }
        self.arena.reset(width, height, BACKGROUND);
        self.renderer.invalidate();
    }

    /// The composed arena of the frame in progress.
    pub fn arena(&self) -> &Surface {
        &self.arena
    }
}

impl Canvas for TerminalDisplay {
    fn clear(&mut self, colour: Rgb) {
        self.arena.clear(colour);
    }

    fn blit(&mut self, surface: &Surface, x: i32, y: i32) {
        self.arena.blit(surface, x, y);
    }
}

impl Display for TerminalDisplay {
    fn size(&self) -> (u32, u32) {
        (self.arena.width(), self.arena.height())
    }

    fn present(&mut self, status: &FrameStatus) -> Result<()> {
        self.view.render_into(&self.arena, status, &mut self.cells);
        self.renderer.draw_swap(&mut self.cells)
    }
}
