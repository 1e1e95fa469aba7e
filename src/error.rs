use thiserror::Error;

/// Failure of a single catalog request. No variant is retried by the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Catalog returned HTTP {0}")]
    Http(u16),

    #[error("Unexpected response from catalog: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Transport(String),
}

// The request URL can carry the API key, so it is stripped before the error
// reaches the status bar.
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if let Some(status) = err.status() {
            CatalogError::Http(status.as_u16())
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if err.is_builder() {
            CatalogError::BadRequest(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ReelError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Authentication error: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_names_status() {
        assert_eq!(CatalogError::Http(404).to_string(), "Catalog returned HTTP 404");
    }

    #[test]
    fn catalog_error_is_transparent_in_reel_error() {
        let err: ReelError = CatalogError::Transport("connection refused".into()).into();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
