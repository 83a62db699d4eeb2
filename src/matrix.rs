//! The digital-rain background effect.
//!
//! One drop per terminal column, advancing one row per animation tick.
//! Every tick also decays each cell's brightness one step — the terminal
//! stand-in for the translucent black rectangle a canvas renderer would
//! paint over the previous frame — so each drop leaves a fading trail.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::constants::constants;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
  ch: char,
  /// 0 is empty; the drop head is written at `u8::MAX` and fades from there.
  brightness: u8,
}

pub struct MatrixRain {
  width: u16,
  height: u16,
  /// Current drop row per column. Rows below the grid keep advancing until
  /// the reset chance fires, which staggers the columns.
  drops: Vec<u32>,
  /// Row-major glyph grid.
  cells: Vec<Cell>,
  rng: StdRng,
}

impl MatrixRain {
  pub fn new(width: u16, height: u16) -> Self {
    Self::with_rng(width, height, StdRng::from_os_rng())
  }

  fn with_rng(width: u16, height: u16, rng: StdRng) -> Self {
    Self {
      width,
      height,
      drops: vec![1; width as usize],
      cells: vec![Cell::default(); width as usize * height as usize],
      rng,
    }
  }

  /// Advance the animation one frame.
  pub fn tick(&mut self) {
    let fade = constants().rain_fade_step;
    for cell in &mut self.cells {
      cell.brightness = cell.brightness.saturating_sub(fade);
    }

    for col in 0..self.width as usize {
      let row = self.drops[col];
      if row < self.height as u32 {
        let ch = if self.rng.random_range(0..2) == 0 { '0' } else { '1' };
        self.cells[row as usize * self.width as usize + col] = Cell { ch, brightness: u8::MAX };
      }
      if row > self.height as u32 && self.rng.random_bool(constants().rain_reset_chance) {
        self.drops[col] = 0;
      }
      self.drops[col] = self.drops[col].saturating_add(1);
    }
  }

  fn cell(&self, col: u16, row: u16) -> Cell {
    self.cells[row as usize * self.width as usize + col as usize]
  }
}

/// Renders the rain state behind the rest of the UI. The grid is sized once
/// at startup; a larger render area is left blank past the grid edge and a
/// smaller one clips it.
pub struct RainWidget<'a> {
  pub rain: &'a MatrixRain,
  pub theme: &'static Theme,
}

impl Widget for RainWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    for y in area.top()..area.bottom() {
      for x in area.left()..area.right() {
        buf[(x, y)].set_char(' ').set_bg(self.theme.bg);
      }
    }

    let cols = self.rain.width.min(area.width);
    let rows = self.rain.height.min(area.height);
    for col in 0..cols {
      for row in 0..rows {
        let cell = self.rain.cell(col, row);
        if cell.brightness == 0 {
          continue;
        }
        // MAX maps to the head color, fading through the trail shades.
        let shade = 3 - (cell.brightness / 64).min(3) as usize;
        buf[(area.x + col, area.y + row)].set_char(cell.ch).set_fg(self.theme.rain[shade]).set_bg(self.theme.bg);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seeded(width: u16, height: u16) -> MatrixRain {
    MatrixRain::with_rng(width, height, StdRng::seed_from_u64(7))
  }

  #[test]
  fn drops_start_at_row_one() {
    let rain = seeded(8, 10);
    assert!(rain.drops.iter().all(|&d| d == 1));
    assert!(rain.cells.iter().all(|c| c.brightness == 0));
  }

  #[test]
  fn tick_writes_head_and_advances() {
    let mut rain = seeded(4, 10);
    rain.tick();
    for col in 0..4 {
      let cell = rain.cell(col, 1);
      assert_eq!(cell.brightness, u8::MAX);
      assert!(cell.ch == '0' || cell.ch == '1');
      assert_eq!(rain.drops[col as usize], 2);
    }
  }

  #[test]
  fn trail_fades_each_tick() {
    let mut rain = seeded(2, 10);
    rain.tick();
    rain.tick();
    let step = constants().rain_fade_step;
    assert_eq!(rain.cell(0, 1).brightness, u8::MAX - step);
    assert_eq!(rain.cell(0, 2).brightness, u8::MAX);
  }

  #[test]
  fn drops_eventually_reset_past_the_bottom() {
    let mut rain = seeded(6, 3);
    for _ in 0..2000 {
      rain.tick();
    }
    // With a 2.5% per-tick reset chance every column restarts well within
    // 2000 ticks; a reset drop sits far below where free fall would be.
    assert!(rain.drops.iter().all(|&d| d < 2000));
  }

  #[test]
  fn zero_sized_grid_is_inert() {
    let mut rain = seeded(0, 0);
    rain.tick();
    assert!(rain.drops.is_empty());
  }
}
