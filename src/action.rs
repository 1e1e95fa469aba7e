use crate::error::Result;
use crate::types::{Movie, MovieDetail, Page, Video};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,

    // Polish
    Refresh,
    ToggleFavorite,
    OpenInBrowser,
    OpenTrailer,
    YankUrl,

    // Browse session completions
    PopularLoaded(Result<Page<Movie>>),
    SearchDebounced(u64),
    SearchLoaded {
        generation: u64,
        result: Result<Page<Movie>>,
    },
    RuntimeLoaded {
        id: u64,
        result: Result<Option<u32>>,
    },

    // Detail screen completions
    DetailLoaded {
        id: u64,
        result: Result<Box<MovieDetail>>,
    },
    TrailerLoaded {
        id: u64,
        result: Result<Option<Video>>,
    },

    None,
}

impl Action {
    /// True for results of background work, as opposed to user input
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Action::PopularLoaded(_)
                | Action::SearchDebounced(_)
                | Action::SearchLoaded { .. }
                | Action::RuntimeLoaded { .. }
                | Action::DetailLoaded { .. }
                | Action::TrailerLoaded { .. }
        )
    }
}
