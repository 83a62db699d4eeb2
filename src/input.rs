use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

fn insert_at(text: &mut String, cursor: &mut usize, c: char) {
  let byte_idx = char_to_byte_index(text, *cursor);
  text.insert(byte_idx, c);
  *cursor += 1;
}

fn backspace_at(text: &mut String, cursor: &mut usize) {
  if *cursor > 0 {
    *cursor -= 1;
    let byte_idx = char_to_byte_index(text, *cursor);
    text.remove(byte_idx);
  }
}

fn delete_at(text: &mut String, cursor: &mut usize) {
  if *cursor < text.chars().count() {
    let byte_idx = char_to_byte_index(text, *cursor);
    text.remove(byte_idx);
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('x') {
    app.dismiss_banner();
    return;
  }

  match app.mode {
    AppMode::Input => handle_input_key(app, key),
    AppMode::Results => handle_results_key(app, key),
    AppMode::Download => handle_download_key(app, key),
  }
}

fn handle_input_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.trigger_search();
    }
    KeyCode::Char(c) => {
      insert_at(&mut app.input, &mut app.cursor_position, c);
    }
    KeyCode::Backspace => {
      backspace_at(&mut app.input, &mut app.cursor_position);
    }
    KeyCode::Delete => {
      delete_at(&mut app.input, &mut app.cursor_position);
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      if !app.input.is_empty() {
        app.input.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
      } else if !app.search_results.is_empty() {
        app.mode = AppMode::Results;
      } else {
        app.should_quit = true;
      }
    }
    KeyCode::Down => {
      if !app.search_results.is_empty() {
        app.mode = AppMode::Results;
      }
    }
    _ => {}
  }
}

fn handle_results_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.select_result();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      let count = app.search_results.len();
      if count > 0 {
        let i = app.list_state.selected().map_or(0, |i| (i + 1) % count);
        app.list_state.select(Some(i));
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      let count = app.search_results.len();
      if count > 0 {
        let i = app.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
        app.list_state.select(Some(i));
      }
    }
    KeyCode::Char('x') => {
      app.dismiss_banner();
    }
    KeyCode::Tab => {
      if app.panel_visible {
        app.mode = AppMode::Download;
      }
    }
    KeyCode::Esc => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}

fn handle_download_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.trigger_download();
    }
    // The format radios: two entries, so cycling is a toggle.
    KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
      app.next_format();
    }
    KeyCode::Char(c) => {
      insert_at(&mut app.download_url, &mut app.url_cursor, c);
    }
    KeyCode::Backspace => {
      backspace_at(&mut app.download_url, &mut app.url_cursor);
    }
    KeyCode::Delete => {
      delete_at(&mut app.download_url, &mut app.url_cursor);
    }
    KeyCode::Left => {
      app.url_cursor = app.url_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.url_cursor < app.download_url.chars().count() {
        app.url_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.url_cursor = 0;
    }
    KeyCode::End => {
      app.url_cursor = app.download_url.chars().count();
    }
    KeyCode::Esc => {
      if !app.search_results.is_empty() {
        app.mode = AppMode::Results;
      } else {
        app.mode = AppMode::Input;
      }
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn char_to_byte_index_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5);
  }

  #[test]
  fn char_to_byte_index_multibyte() {
    // 'é' is two bytes in UTF-8.
    assert_eq!(char_to_byte_index("café latte", 4), 5);
  }

  #[test]
  fn char_to_byte_index_past_end_clamps() {
    assert_eq!(char_to_byte_index("abc", 10), 3);
  }

  #[test]
  fn edit_ops_round_trip() {
    let mut text = String::from("héllo");
    let mut cursor = 1;
    insert_at(&mut text, &mut cursor, 'x');
    assert_eq!(text, "hxéllo");
    assert_eq!(cursor, 2);
    backspace_at(&mut text, &mut cursor);
    assert_eq!(text, "héllo");
    assert_eq!(cursor, 1);
    delete_at(&mut text, &mut cursor);
    assert_eq!(text, "hllo");
  }
}
