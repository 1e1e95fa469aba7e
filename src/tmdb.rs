use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::types::{CastMember, Movie, MovieDetail, Page, Video};

/// Static credential attached to every request
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// v3 key, sent as the `api_key` query parameter
    ApiKey(String),
    /// v4 read access token, sent as a bearer token
    Bearer(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::ApiKey(_) => write!(f, "ApiKey(..)"),
            Credential::Bearer(_) => write!(f, "Bearer(..)"),
        }
    }
}

pub struct Tmdb {
    client: Client,
    base_url: String,
    web_url: String,
    credential: Credential,
    language: Option<String>,
}

impl std::fmt::Debug for Tmdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tmdb")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Tmdb {
    #[cfg(test)]
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            web_url: crate::config::DEFAULT_WEB_URL.to_string(),
            credential,
            language: None,
        }
    }

    pub fn from_config(config: &CatalogConfig, credential: Credential) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            web_url: config.web_url.clone(),
            credential,
            language: config.language.clone(),
        })
    }

    fn api_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        if let Some(lang) = &self.language {
            query.push(format!("language={}", urlencoding::encode(lang)));
        }
        if let Credential::ApiKey(key) = &self.credential {
            query.push(format!("api_key={}", urlencoding::encode(key)));
        }

        let mut url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        // Report the path only; the full URL may contain the key.
        Url::parse(&url).map_err(|e| CatalogError::BadRequest(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(path = url.path(), "catalog GET");

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Credential::Bearer(token) = &self.credential {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "catalog request rejected");
            return Err(CatalogError::Http(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

// TMDB API response types

#[derive(Deserialize)]
struct TmPage {
    page: u32,
    results: Vec<TmMovie>,
    total_pages: Option<u32>,
}

#[derive(Deserialize)]
struct TmMovie {
    id: u64,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: f32,
    release_date: Option<String>,
}

#[derive(Deserialize)]
struct TmDetail {
    id: u64,
    #[serde(default)]
    title: String,
    overview: Option<String>,
    genres: Option<Vec<TmGenre>>,
    runtime: Option<u32>,
    #[serde(default)]
    vote_average: f32,
    release_date: Option<String>,
    credits: Option<TmCredits>,
}

#[derive(Deserialize)]
struct TmGenre {
    name: String,
}

#[derive(Deserialize)]
struct TmCredits {
    #[serde(default)]
    cast: Vec<TmCast>,
}

#[derive(Deserialize)]
struct TmCast {
    id: u64,
    name: String,
    character: Option<String>,
}

#[derive(Deserialize)]
struct TmVideos {
    #[serde(default)]
    results: Vec<TmVideo>,
}

#[derive(Deserialize)]
struct TmVideo {
    key: String,
    #[serde(default)]
    name: String,
    site: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<TmMovie> for Movie {
    fn from(m: TmMovie) -> Self {
        Movie {
            id: m.id,
            title: m.title,
            poster_path: m.poster_path.filter(|p| !p.is_empty()),
            rating: m.vote_average,
            release_date: m.release_date.filter(|d| !d.is_empty()),
        }
    }
}

impl From<TmPage> for Page<Movie> {
    fn from(p: TmPage) -> Self {
        Page {
            items: p.results.into_iter().map(Movie::from).collect(),
            page: p.page,
            total_pages: p.total_pages,
        }
    }
}

#[async_trait]
impl Catalog for Tmdb {
    fn name(&self) -> &str {
        "TMDB"
    }

    fn web_url(&self, id: u64) -> String {
        format!("{}/movie/{}", self.web_url.trim_end_matches('/'), id)
    }

    async fn popular(&self, page: u32) -> Result<Page<Movie>> {
        let url = self.api_url("/movie/popular", &[("page", page.to_string())])?;
        let page: TmPage = self.get_json(url).await?;
        Ok(page.into())
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page<Movie>> {
        if query.trim().is_empty() {
            return Err(CatalogError::BadRequest("search query is empty".into()));
        }
        let url = self.api_url(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )?;
        let page: TmPage = self.get_json(url).await?;
        Ok(page.into())
    }

    async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let url = self.api_url(
            &format!("/movie/{}", id),
            &[("append_to_response", "credits".to_string())],
        )?;
        let d: TmDetail = self.get_json(url).await?;

        Ok(MovieDetail {
            id: d.id,
            title: d.title,
            overview: d.overview.unwrap_or_default(),
            genres: d
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            runtime: d.runtime,
            rating: d.vote_average,
            release_date: d.release_date.filter(|r| !r.is_empty()),
            cast: d
                .credits
                .map(|c| c.cast)
                .unwrap_or_default()
                .into_iter()
                .map(|c| CastMember {
                    id: c.id,
                    name: c.name,
                    character: c.character.filter(|ch| !ch.is_empty()),
                })
                .collect(),
        })
    }

    async fn trailer(&self, id: u64) -> Result<Option<Video>> {
        let url = self.api_url(&format!("/movie/{}/videos", id), &[])?;
        let videos: TmVideos = self.get_json(url).await?;

        Ok(videos
            .results
            .into_iter()
            .map(|v| Video {
                key: v.key,
                name: v.name,
                site: v.site,
                kind: v.kind,
            })
            .find(Video::is_youtube_trailer))
    }
}
