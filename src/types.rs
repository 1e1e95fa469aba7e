use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which paginated list a cursor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feed {
    #[default]
    Popular,
    Search,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Popular => write!(f, "Popular"),
            Feed::Search => write!(f, "Search"),
        }
    }
}

/// Movie as returned by list and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub rating: f32,
    pub release_date: Option<String>,
}

impl Movie {
    pub fn release_year(&self) -> Option<String> {
        release_year(self.release_date.as_deref())
    }
}

// Server-assigned ids are unique, so two copies of a movie from overlapping
// pages compare equal.
impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movie {}

/// One page of a paginated endpoint
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
}

/// Full movie detail, shown on the detail screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub runtime: Option<u32>,
    pub rating: f32,
    pub release_date: Option<String>,
    pub cast: Vec<CastMember>,
}

impl MovieDetail {
    pub fn release_year(&self) -> Option<String> {
        release_year(self.release_date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    pub kind: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind.to_lowercase().contains("trailer")
    }

    pub fn watch_url(&self) -> Option<String> {
        (self.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

/// Formats a runtime in minutes as "1h 52m"; zero renders as a dash
pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, 0) => "-".to_string(),
        (0, m) => format!("{}m", m),
        (h, m) => format!("{}h {:02}m", h, m),
    }
}

fn release_year(date: Option<&str>) -> Option<String> {
    let date = date?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year().to_string())
}
