use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, Clear, List, ListItem, Padding, Paragraph},
};

use crate::app::{App, AppMode};
use crate::constants::constants;
use crate::format;
use crate::matrix::{MatrixRain, RainWidget};
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App, rain: &MatrixRain) {
  let theme = app.theme();

  // The rain fills the whole frame; everything else is drawn over it.
  frame.render_widget(RainWidget { rain, theme }, frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_search_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▼ vget ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  // A slim side margin keeps the rain visible next to the content boxes.
  let [_, area, _] =
    Layout::horizontal([Constraint::Length(2), Constraint::Min(10), Constraint::Length(2)]).areas(area);

  if app.panel_visible {
    let [results_area, panel_area] = Layout::vertical([Constraint::Min(5), Constraint::Length(4)]).areas(area);
    render_results(frame, app, results_area);
    render_download_panel(frame, app, panel_area);
  } else {
    render_results(frame, app, area);
  }
}

fn render_welcome(frame: &mut Frame, theme: &'static Theme, area: Rect) {
  let text = vec![
    Line::from(Span::styled("▼  vget", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Search videos. Download mp3 or mp4.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Type a query below and press Enter.", Style::default().fg(theme.muted))),
  ];

  // Center a small box so the rain keeps falling around it.
  let height = (text.len() as u16).min(area.height);
  let width = area.width.min(44);
  let centered = Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  };
  frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), centered);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  if app.search_results.is_empty() && app.banners.is_empty() && app.info_message.is_none() {
    render_welcome(frame, theme, area);
    return;
  }

  let block = Block::bordered()
    .title(" Results ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .style(Style::default().bg(theme.bg));
  let inner = block.inner(area);
  frame.render_widget(Clear, area);
  frame.render_widget(block, area);

  // Banners sit above the list, newest first, then the info line if any.
  let banner_rows = (app.banners.len() as u16).min(inner.height);
  let info_rows = if app.info_message.is_some() { 1u16 } else { 0 };
  let [banner_area, info_area, list_area] = Layout::vertical([
    Constraint::Length(banner_rows),
    Constraint::Length(info_rows),
    Constraint::Min(0),
  ])
  .areas(inner);

  if banner_rows > 0 {
    let lines: Vec<Line> = app
      .banners
      .iter()
      .map(|message| {
        Line::from(vec![
          Span::styled("⚠ ", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
          Span::styled(truncate_str(message, inner.width.saturating_sub(2) as usize), Style::default().fg(theme.error)),
        ])
      })
      .collect();
    frame.render_widget(Paragraph::new(lines), banner_area);
  }

  if let Some(message) = &app.info_message {
    let line = Line::from(vec![
      Span::styled("ℹ ", Style::default().fg(theme.info)),
      Span::styled(message.clone(), Style::default().fg(theme.info)),
    ]);
    frame.render_widget(Paragraph::new(line), info_area);
  }

  if app.search_results.is_empty() {
    return;
  }

  // Inner width minus 2 chars for the highlight symbol ("▶ ").
  let inner_w = list_area.width.saturating_sub(2) as usize;

  let items: Vec<ListItem> = app
    .search_results
    .iter()
    .enumerate()
    .map(|(i, result)| {
      let is_selected = Some(i) == app.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };
      let muted = if is_selected { theme.highlight_fg } else { theme.muted };

      let description = result.description.as_deref().filter(|s| !s.is_empty()).unwrap_or("No description available");
      let meta = format!(
        "{} · {} · {} views · {} · ~{}",
        result.uploader,
        result.duration,
        format::views(result.view_count.unwrap_or(0)),
        format::date(result.upload_date.as_deref().unwrap_or("")),
        format::file_size(result.filesize_approx.unwrap_or(0)),
      );

      let lines = vec![
        Line::from(Span::styled(
          truncate_str(&result.title, inner_w),
          Style::default().fg(fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(truncate_str(description, inner_w), Style::default().fg(muted))),
        Line::from(Span::styled(truncate_str(&meta, inner_w), Style::default().fg(muted))),
      ];
      ListItem::new(lines).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg));

  frame.render_stateful_widget(list, list_area, &mut app.list_state);
}

fn render_download_panel(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let focused = app.mode == AppMode::Download;
  let border_color = if focused { theme.accent } else { theme.border };

  let block = Block::bordered()
    .title(" Download ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1))
    .style(Style::default().bg(theme.bg));
  let inner = block.inner(area);
  frame.render_widget(Clear, area);
  frame.render_widget(block, area);

  let [url_area, format_area] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

  render_text_field(frame, url_area, &app.download_url, app.url_cursor, &mut app.url_scroll, focused, theme);

  let radio = |format: crate::download::DownloadFormat| -> Vec<Span<'static>> {
    let selected = app.format == format;
    let mark = if selected { "(•) " } else { "( ) " };
    let style =
      if selected { Style::default().fg(theme.accent).add_modifier(Modifier::BOLD) } else { Style::default().fg(theme.muted) };
    vec![Span::styled(mark, style), Span::styled(format.label(), style)]
  };

  let mut spans = Vec::new();
  for (i, format) in crate::download::DownloadFormat::ALL.into_iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    spans.extend(radio(format));
  }
  frame.render_widget(Line::from(spans), format_area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(message) = &app.status_message {
    let frames = &constants().spinner_frames;
    let spinner = &frames[app.spinner_tick % frames.len()];
    (format!(" {} {}", spinner, message), Style::default().fg(theme.status))
  } else {
    (format!(" Ready · {}", app.server), Style::default().fg(theme.muted))
  };
  frame.render_widget(Line::from(Span::styled(text, style)), area);
}

fn render_search_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let focused = app.mode == AppMode::Input;
  let border_color = if focused { theme.accent } else { theme.border };
  let block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1))
    .style(Style::default().bg(theme.bg));
  let inner = block.inner(area);
  frame.render_widget(Clear, area);
  frame.render_widget(block, area);

  render_text_field(frame, inner, &app.input, app.cursor_position, &mut app.input_scroll, focused, theme);
}

/// Single-line text field with horizontal scrolling; places the terminal
/// cursor when focused.
fn render_text_field(
  frame: &mut Frame,
  area: Rect,
  text: &str,
  cursor: usize,
  scroll: &mut usize,
  focused: bool,
  theme: &'static Theme,
) {
  let inner_w = area.width as usize;
  let cursor_col = display_width(text, cursor);

  if cursor_col < *scroll {
    *scroll = cursor_col;
  } else if inner_w > 0 && cursor_col >= *scroll + inner_w {
    *scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = text
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= *scroll)
    .take_while(|(start, _, _)| *start < *scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  frame.render_widget(Paragraph::new(visible).style(Style::default().fg(theme.fg)), area);

  if focused {
    let cursor_x = area.x + (cursor_col - *scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let has_results = !app.search_results.is_empty();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Input => {
      let mut k = vec![("Enter", "Search"), ("^t", "Theme")];
      if has_results {
        k.push(("↓", "Results"));
        k.push(("Esc", "Results"));
      } else {
        k.push(("Esc", "Quit"));
      }
      k
    }
    AppMode::Results => {
      let mut k = vec![("Enter", "Select"), ("j/k", "Navigate")];
      if !app.banners.is_empty() {
        k.push(("x", "Dismiss"));
      }
      if app.panel_visible {
        k.push(("Tab", "Download"));
      }
      k.push(("Esc", "Search"));
      k
    }
    AppMode::Download => {
      vec![("Enter", "Download"), ("Tab", "Format"), ("Esc", "Back")]
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
