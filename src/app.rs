use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::config::BrowseConfig;
use crate::event::Event;
use crate::favorites::Favorites;
use crate::session::BrowseSession;
use crate::types::{Movie, MovieDetail, Video};

/// Rows around the selection whose runtimes are prefetched
const VISIBLE_ROWS: usize = 20;
const PAGE_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse, // Popular or search results
    Detail, // Single movie
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Detail screen state; loads independently of the browse session
#[derive(Debug)]
pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub detail: Option<MovieDetail>,
    pub trailer: Option<Video>,
    pub loading: bool,
    pub error: Option<String>,
    pub scroll_offset: usize,
}

pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub session: BrowseSession,
    pub favorites: Favorites,
    pub search_input: String,
    pub selected: usize,
    pub detail: Option<DetailView>,
    /// Transient feedback for local actions (clipboard, browser, favorites)
    pub notice: Option<String>,
    pub should_quit: bool,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        action_tx: mpsc::UnboundedSender<Action>,
        browse: &BrowseConfig,
        favorites: Favorites,
    ) -> Self {
        Self {
            screen: Screen::Browse,
            input_mode: InputMode::default(),
            session: BrowseSession::new(catalog, action_tx.clone(), browse),
            favorites,
            search_input: String::new(),
            selected: 0,
            detail: None,
            notice: None,
            should_quit: false,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Refresh,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.input_mode == InputMode::Search {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => Action::ExitSearchMode,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Down => Action::ScrollDown,
                KeyCode::Up => Action::ScrollUp,
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::ClearSearch
                }
                KeyCode::Char(c) => Action::SearchInput(c),
                _ => Action::None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => match self.screen {
                Screen::Browse => Action::Quit,
                Screen::Detail => Action::Back,
            },
            KeyCode::Esc => match self.screen {
                Screen::Detail => Action::Back,
                Screen::Browse if self.session.search_state().is_active() => Action::ClearSearch,
                Screen::Browse => Action::Quit,
            },
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('/') if self.screen == Screen::Browse => Action::EnterSearchMode,
            KeyCode::Char('r') if self.screen == Screen::Browse => Action::Refresh,
            KeyCode::Char('f') => Action::ToggleFavorite,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('t') if self.screen == Screen::Detail => Action::OpenTrailer,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    /// Start a search as if `query` had been typed
    pub fn search_for(&mut self, query: &str) {
        self.search_input = query.to_string();
        self.session.search(&self.search_input);
        self.selected = 0;
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.session.active_list().get(self.selected)
    }

    /// Movie the current screen is about
    fn current_movie_id(&self) -> Option<u64> {
        match self.screen {
            Screen::Browse => self.selected_movie().map(|m| m.id),
            Screen::Detail => self.detail.as_ref().map(|d| d.id),
        }
    }

    pub fn update(&mut self, action: Action) {
        if !action.is_completion() && !matches!(action, Action::None) {
            self.notice = None;
            if !matches!(action, Action::Quit | Action::Back) {
                self.session.dismiss_error();
            }
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::Browse => {
                    self.should_quit = true;
                }
                Screen::Detail => {
                    self.screen = Screen::Browse;
                    self.detail = None;
                }
            },
            Action::ScrollUp => match self.screen {
                Screen::Browse => self.select(self.selected.saturating_sub(1)),
                Screen::Detail => self.scroll_detail(-1),
            },
            Action::ScrollDown => match self.screen {
                Screen::Browse => self.select(self.selected + 1),
                Screen::Detail => self.scroll_detail(1),
            },
            Action::PageUp => match self.screen {
                Screen::Browse => self.select(self.selected.saturating_sub(PAGE_STEP)),
                Screen::Detail => self.scroll_detail(-(PAGE_STEP as isize)),
            },
            Action::PageDown => match self.screen {
                Screen::Browse => self.select(self.selected + PAGE_STEP),
                Screen::Detail => self.scroll_detail(PAGE_STEP as isize),
            },
            Action::GoToTop => match self.screen {
                Screen::Browse => self.select(0),
                Screen::Detail => {
                    if let Some(detail) = &mut self.detail {
                        detail.scroll_offset = 0;
                    }
                }
            },
            Action::GoToBottom => {
                if self.screen == Screen::Browse {
                    self.select(usize::MAX);
                }
            }
            Action::Select => {
                if self.screen == Screen::Browse {
                    if let Some(movie) = self.selected_movie().cloned() {
                        self.open_detail(movie);
                    }
                }
            }

            // Search
            Action::EnterSearchMode => {
                self.input_mode = InputMode::Search;
                self.search_input = self.session.search_state().query().to_string();
            }
            Action::ExitSearchMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::SearchInput(c) => {
                self.search_input.push(c);
                self.session.search(&self.search_input);
                self.selected = 0;
            }
            Action::SearchBackspace => {
                if self.search_input.pop().is_some() {
                    self.session.search(&self.search_input);
                    self.selected = 0;
                }
            }
            Action::ClearSearch => {
                self.search_input.clear();
                self.session.clear_search();
                self.input_mode = InputMode::Normal;
                self.selected = 0;
                self.after_list_change();
            }

            // Polish
            Action::Refresh => {
                self.session.refresh();
                if !self.session.is_searching() {
                    self.selected = 0;
                }
            }
            Action::ToggleFavorite => {
                if let Some(id) = self.current_movie_id() {
                    let added = self.favorites.toggle(id);
                    self.notice = Some(if added {
                        "Added to favorites".to_string()
                    } else {
                        "Removed from favorites".to_string()
                    });
                }
            }
            Action::OpenInBrowser => {
                if let Some(id) = self.current_movie_id() {
                    let url = self.session.catalog().web_url(id);
                    self.open_url(&url);
                }
            }
            Action::OpenTrailer => {
                let url = self
                    .detail
                    .as_ref()
                    .and_then(|d| d.trailer.as_ref())
                    .and_then(Video::watch_url);
                match url {
                    Some(url) => self.open_url(&url),
                    None => self.notice = Some("No trailer available".to_string()),
                }
            }
            Action::YankUrl => {
                if let Some(id) = self.current_movie_id() {
                    let url = self.session.catalog().web_url(id);
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone())) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.notice = Some(format!("Clipboard: {}", e)),
                    }
                }
            }

            // Browse session completions
            action @ (Action::PopularLoaded(_)
            | Action::SearchDebounced(_)
            | Action::SearchLoaded { .. }) => {
                self.session.apply(action);
                self.after_list_change();
            }
            action @ Action::RuntimeLoaded { .. } => {
                self.session.apply(action);
            }

            // Detail completions
            Action::DetailLoaded { id, result } => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) {
                    detail.loading = false;
                    match result {
                        Ok(d) => detail.detail = Some(*d),
                        Err(e) => detail.error = Some(e.to_string()),
                    }
                }
            }
            Action::TrailerLoaded { id, result } => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) {
                    match result {
                        Ok(trailer) => detail.trailer = trailer,
                        Err(e) => tracing::debug!(id, error = %e, "trailer lookup failed"),
                    }
                }
            }

            Action::None => {}
        }
    }

    fn select(&mut self, index: usize) {
        let len = self.session.active_list().len();
        self.selected = index.min(len.saturating_sub(1));
        self.after_list_change();
    }

    /// Keep the selection in range, prefetch runtimes for rows around it,
    /// and load the next page when it nears the tail.
    fn after_list_change(&mut self) {
        let list = self.session.active_list();
        self.selected = self.selected.min(list.len().saturating_sub(1));
        if list.is_empty() {
            return;
        }

        let start = self.selected.saturating_sub(VISIBLE_ROWS / 2);
        let ids: Vec<u64> = list.iter().skip(start).take(VISIBLE_ROWS).map(|m| m.id).collect();
        let selected_id = list[self.selected].id;

        for id in ids {
            self.session.prefetch_runtime(id);
        }
        let is_searching = self.session.is_searching();
        self.session.load_more_if_needed(selected_id, is_searching);
    }

    fn scroll_detail(&mut self, delta: isize) {
        if let Some(detail) = &mut self.detail {
            detail.scroll_offset = detail.scroll_offset.saturating_add_signed(delta);
        }
    }

    fn open_detail(&mut self, movie: Movie) {
        self.detail = Some(DetailView {
            id: movie.id,
            title: movie.title,
            detail: None,
            trailer: None,
            loading: true,
            error: None,
            scroll_offset: 0,
        });
        self.screen = Screen::Detail;
        self.spawn_load_detail(movie.id);
        self.spawn_load_trailer(movie.id);
    }

    fn open_url(&mut self, url: &str) {
        match open::that(url) {
            Ok(()) => self.notice = Some(format!("Opened {}", url)),
            Err(e) => self.notice = Some(format!("Could not open browser: {}", e)),
        }
    }

    fn spawn_load_detail(&self, id: u64) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(self.session.catalog());
        tokio::spawn(async move {
            let result = catalog.movie_detail(id).await.map(Box::new);
            tx.send(Action::DetailLoaded { id, result }).ok();
        });
    }

    fn spawn_load_trailer(&self, id: u64) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(self.session.catalog());
        tokio::spawn(async move {
            let result = catalog.trailer(id).await;
            tx.send(Action::TrailerLoaded { id, result }).ok();
        });
    }
}
