use anyhow::Result;
use ratatui::widgets::ListState;
use reqwest::Client;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::{self, SearchResult};
use crate::config::Config;
use crate::constants::constants;
use crate::download::{self, DownloadFormat, SavedFile};
use crate::theme::{THEMES, Theme};

// --- Types ---

pub type SearchOutcome = Result<Vec<SearchResult>>;
pub type DownloadOutcome = Result<SavedFile>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Input,
  Results,
  Download,
}

/// Stacked error banners shown above the results list, newest first.
/// Nothing expires on its own: banners go away when dismissed, or when a new
/// search clears the results area they sit on.
#[derive(Default)]
pub struct Banners(Vec<String>);

impl Banners {
  pub fn push(&mut self, message: String) {
    self.0.insert(0, message);
  }

  /// Dismiss the newest banner.
  pub fn dismiss(&mut self) {
    if !self.0.is_empty() {
      self.0.remove(0);
    }
  }

  pub fn clear(&mut self) {
    self.0.clear();
  }

  pub fn iter(&self) -> std::slice::Iter<'_, String> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// In-flight async flow receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) search_rx: Option<oneshot::Receiver<SearchOutcome>>,
  pub(crate) download_rx: Option<oneshot::Receiver<DownloadOutcome>>,
}

// --- App State ---

pub struct App {
  // Search input
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,

  pub mode: AppMode,
  pub theme_index: usize,
  pub search_results: Vec<SearchResult>,
  pub list_state: ListState,
  pub banners: Banners,
  /// Loading indicator text; `Some` while a flow is in flight.
  pub status_message: Option<String>,
  /// Informational message — "No results found", "Saved <name>".
  pub info_message: Option<String>,
  pub should_quit: bool,

  // Download panel
  pub panel_visible: bool,
  pub download_url: String,
  pub url_cursor: usize,
  pub url_scroll: usize,
  pub format: DownloadFormat,

  pub server: String,
  pub download_dir: PathBuf,
  pub http_client: Client,
  pub spinner_tick: usize,
  pub(crate) tasks: AsyncTasks,
}

impl App {
  pub fn new(server: Option<String>, download_dir: Option<PathBuf>, theme: Option<&str>) -> Self {
    let config = Config::load();
    let theme_index = theme
      .or(config.theme_name.as_deref())
      .and_then(|name| THEMES.iter().position(|t| t.name == name))
      .unwrap_or(0);
    let format = config.format.as_deref().map(DownloadFormat::from_config).unwrap_or(DownloadFormat::Mp3);
    let server = server
      .or_else(|| config.server_url.clone())
      .unwrap_or_else(|| constants().default_server.clone())
      .trim_end_matches('/')
      .to_string();
    let download_dir = download_dir
      .or_else(|| config.download_dir.clone())
      .or_else(|| directories::UserDirs::new().and_then(|dirs| dirs.download_dir().map(|p| p.to_path_buf())))
      .unwrap_or_else(|| PathBuf::from("."));

    Self {
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      mode: AppMode::Input,
      theme_index,
      search_results: Vec::new(),
      list_state: ListState::default(),
      banners: Banners::default(),
      status_message: None,
      info_message: None,
      should_quit: false,
      panel_visible: false,
      download_url: String::new(),
      url_cursor: 0,
      url_scroll: 0,
      format,
      server,
      download_dir,
      http_client: Client::new(),
      spinner_tick: 0,
      tasks: AsyncTasks::default(),
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // Safety: theme_index is always bounded by modular arithmetic in next_theme()
    // and clamped on initialization.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  /// Toggle the format radio selection.
  pub fn next_format(&mut self) {
    self.format = self.format.next();
    self.save_config();
  }

  /// Advance the spinner animation one frame.
  pub fn advance_spinner(&mut self) {
    self.spinner_tick = self.spinner_tick.wrapping_add(1);
  }

  pub fn dismiss_banner(&mut self) {
    self.banners.dismiss();
  }

  fn save_config(&self) {
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    config.format = Some(self.format.label().to_string());
    config.save();
  }

  // --- Flows ---

  /// Poll the in-flight flow receivers. Whichever flow finishes clears the
  /// shared loading indicator; overlapping flows are not coordinated beyond
  /// that (a superseded flow's receiver has already been dropped).
  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.search_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(results) if results.is_empty() => {
              self.banners.clear();
              self.info_message = Some("No results found".to_string());
            }
            Ok(results) => {
              info!(count = results.len(), "search results rendered");
              self.banners.clear();
              self.search_results = results;
              self.list_state.select(Some(0));
              self.mode = AppMode::Results;
            }
            Err(e) => {
              warn!(err = %e, "search flow failed");
              self.banners.push(format!("Search failed: {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.search_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.banners.push("Search failed: task exited unexpectedly".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.download_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(saved) => {
              self.info_message = Some(format!("Saved {}", saved.file_name));
            }
            Err(e) => {
              warn!(err = %e, "download flow failed");
              self.banners.push(format!("Download failed: {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.download_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.banners.push("Download failed: task exited unexpectedly".to_string());
        }
      }
    }
  }

  pub fn trigger_search(&mut self) {
    let query = self.input.trim().to_string();
    if query.is_empty() {
      self.banners.push("Search failed: No search query provided".to_string());
      return;
    }
    info!(query = %query, "search triggered");

    // Supersede any in-flight search: dropping the receiver leaves a stale
    // response nowhere to land.
    self.tasks.search_rx = None;
    self.banners.clear();
    self.info_message = None;
    self.search_results.clear();
    self.list_state.select(None);
    self.panel_visible = false;
    self.status_message = Some(format!("Searching '{}'…", query));

    let client = self.http_client.clone();
    let server = self.server.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api::search(&client, &server, &query).await);
    });
    self.tasks.search_rx = Some(rx);
  }

  /// Copy the highlighted result's URL into the download panel and focus it.
  pub fn select_result(&mut self) {
    let Some(selected) = self.list_state.selected() else { return };
    let Some(result) = self.search_results.get(selected) else { return };

    self.download_url = result.url.clone();
    self.url_cursor = self.download_url.chars().count();
    self.url_scroll = 0;
    self.panel_visible = true;
    self.mode = AppMode::Download;
  }

  pub fn trigger_download(&mut self) {
    let url = self.download_url.trim().to_string();
    if url.is_empty() {
      self.banners.push("Download failed: No URL provided".to_string());
      return;
    }
    info!(url = %url, format = self.format.label(), "download triggered");

    // Supersede any in-flight download, same as for searches.
    self.tasks.download_rx = None;
    self.info_message = None;
    self.status_message = Some(format!("Downloading {}…", self.format.label()));

    let client = self.http_client.clone();
    let server = self.server.clone();
    let dir = self.download_dir.clone();
    let format = self.format;
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(download::fetch_and_save(&client, &server, &url, format, &dir).await);
    });
    self.tasks.download_rx = Some(rx);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn banners_stack_newest_first() {
    let mut banners = Banners::default();
    banners.push("first".to_string());
    banners.push("second".to_string());
    let order: Vec<&str> = banners.iter().map(String::as_str).collect();
    assert_eq!(order, ["second", "first"]);
  }

  #[test]
  fn banners_dismiss_removes_newest() {
    let mut banners = Banners::default();
    banners.push("first".to_string());
    banners.push("second".to_string());
    banners.dismiss();
    let order: Vec<&str> = banners.iter().map(String::as_str).collect();
    assert_eq!(order, ["first"]);
  }

  #[test]
  fn banners_dismiss_on_empty_is_noop() {
    let mut banners = Banners::default();
    banners.dismiss();
    assert!(banners.is_empty());
  }

  #[test]
  fn banners_repeated_failures_stack() {
    let mut banners = Banners::default();
    banners.push("Download failed: not found".to_string());
    banners.push("Download failed: not found".to_string());
    assert_eq!(banners.len(), 2);
  }

  fn make_result(url: &str) -> SearchResult {
    SearchResult {
      title: "A Video".to_string(),
      description: None,
      uploader: "someone".to_string(),
      duration: "3:21".to_string(),
      view_count: None,
      upload_date: None,
      filesize_approx: None,
      url: url.to_string(),
    }
  }

  #[test]
  fn select_result_prefills_url_and_reveals_panel() {
    let mut app = App::new(None, None, None);
    app.search_results = vec![make_result("https://example.com/watch?v=abc")];
    app.list_state.select(Some(0));
    app.select_result();
    assert!(app.panel_visible);
    assert_eq!(app.mode, AppMode::Download);
    assert_eq!(app.download_url, "https://example.com/watch?v=abc");
  }

  #[test]
  fn select_result_without_selection_is_noop() {
    let mut app = App::new(None, None, None);
    app.select_result();
    assert!(!app.panel_visible);
    assert_eq!(app.mode, AppMode::Input);
  }

  #[test]
  fn empty_query_banners_without_a_request() {
    let mut app = App::new(None, None, None);
    app.input = "   ".to_string();
    app.trigger_search();
    assert_eq!(app.banners.len(), 1);
    assert!(app.status_message.is_none());
    assert!(app.tasks.search_rx.is_none());
  }
}
