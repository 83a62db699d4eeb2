use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub info: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  /// Rain glyph colors, brightest (drop head) to faintest (trail tail).
  pub rain: [Color; 4],
}

pub static THEMES: [Theme; 3] = [
  // Green-on-black, the classic look.
  Theme {
    name: "matrix",
    bg: Color::Rgb(6, 12, 6),
    fg: Color::Rgb(190, 220, 190),
    muted: Color::Rgb(105, 140, 105),
    accent: Color::Rgb(0, 255, 65),
    border: Color::Rgb(38, 82, 38),
    status: Color::Rgb(140, 205, 140),
    error: Color::Rgb(255, 92, 92),
    info: Color::Rgb(120, 200, 225),
    highlight_fg: Color::Rgb(6, 12, 6),
    highlight_bg: Color::Rgb(0, 210, 60),
    stripe_bg: Color::Rgb(11, 22, 11),
    key_fg: Color::Rgb(6, 12, 6),
    key_bg: Color::Rgb(0, 170, 55),
    rain: [Color::Rgb(205, 255, 205), Color::Rgb(0, 255, 65), Color::Rgb(0, 155, 40), Color::Rgb(0, 75, 22)],
  },
  Theme {
    name: "midnight",
    bg: Color::Rgb(10, 12, 24),
    fg: Color::Rgb(200, 210, 235),
    muted: Color::Rgb(110, 120, 155),
    accent: Color::Rgb(120, 170, 255),
    border: Color::Rgb(45, 55, 95),
    status: Color::Rgb(150, 180, 230),
    error: Color::Rgb(255, 105, 120),
    info: Color::Rgb(130, 215, 200),
    highlight_fg: Color::Rgb(10, 12, 24),
    highlight_bg: Color::Rgb(120, 170, 255),
    stripe_bg: Color::Rgb(16, 19, 36),
    key_fg: Color::Rgb(10, 12, 24),
    key_bg: Color::Rgb(95, 140, 220),
    rain: [Color::Rgb(225, 235, 255), Color::Rgb(120, 170, 255), Color::Rgb(70, 105, 180), Color::Rgb(35, 50, 95)],
  },
  Theme {
    name: "ember",
    bg: Color::Rgb(18, 10, 8),
    fg: Color::Rgb(235, 210, 195),
    muted: Color::Rgb(155, 120, 105),
    accent: Color::Rgb(255, 150, 70),
    border: Color::Rgb(95, 55, 40),
    status: Color::Rgb(230, 175, 130),
    error: Color::Rgb(255, 95, 85),
    info: Color::Rgb(230, 200, 120),
    highlight_fg: Color::Rgb(18, 10, 8),
    highlight_bg: Color::Rgb(255, 150, 70),
    stripe_bg: Color::Rgb(27, 15, 12),
    key_fg: Color::Rgb(18, 10, 8),
    key_bg: Color::Rgb(215, 120, 55),
    rain: [Color::Rgb(255, 230, 205), Color::Rgb(255, 150, 70), Color::Rgb(185, 95, 45), Color::Rgb(95, 45, 22)],
  },
];
