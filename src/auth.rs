use crate::config::CatalogConfig;
use crate::error::ReelError;
use crate::tmdb::Credential;

/// Stored key path: ~/.config/reel/api_key
fn stored_key_path() -> Option<std::path::PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("reel").join("api_key"))
}

fn load_stored_key() -> Option<String> {
    let path = stored_key_path()?;
    let key = std::fs::read_to_string(path).ok()?;
    non_empty(&key)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn env_value(var: Option<&str>) -> Option<String> {
    let value = std::env::var(var?).ok()?;
    non_empty(&value)
}

/// Resolve the catalog credential, trying in order:
/// 1. Read access token env var (bearer)
/// 2. API key env var
/// 3. Stored key from ~/.config/reel/api_key
pub fn load_credential(config: &CatalogConfig) -> Result<Credential, ReelError> {
    resolve(
        env_value(config.read_token_env.as_deref()),
        env_value(config.api_key_env.as_deref()),
        load_stored_key,
    )
    .ok_or_else(|| {
        ReelError::Auth(format!(
            "No catalog credential found. Set {} or {}, or write a key to ~/.config/reel/api_key",
            config.api_key_env.as_deref().unwrap_or("an API key env var"),
            config
                .read_token_env
                .as_deref()
                .unwrap_or("a read token env var"),
        ))
    })
}

fn resolve(
    read_token: Option<String>,
    api_key: Option<String>,
    stored: impl FnOnce() -> Option<String>,
) -> Option<Credential> {
    read_token
        .map(Credential::Bearer)
        .or_else(|| api_key.map(Credential::ApiKey))
        .or_else(|| stored().map(Credential::ApiKey))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_token_wins() {
        let credential = resolve(Some("tok".into()), Some("key".into()), || None);
        assert_eq!(credential, Some(Credential::Bearer("tok".into())));
    }

    #[test]
    fn api_key_before_stored_key() {
        let credential = resolve(None, Some("key".into()), || Some("disk".into()));
        assert_eq!(credential, Some(Credential::ApiKey("key".into())));
    }

    #[test]
    fn stored_key_is_last_resort() {
        let credential = resolve(None, None, || Some("disk".into()));
        assert_eq!(credential, Some(Credential::ApiKey("disk".into())));
        assert_eq!(resolve(None, None, || None), None);
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(non_empty("  \n"), None);
        assert_eq!(non_empty(" abc \n").as_deref(), Some("abc"));
    }

    #[test]
    fn unset_env_var_is_none() {
        assert_eq!(env_value(None), None);
        assert_eq!(env_value(Some("REEL_TEST_SURELY_UNSET_VAR")), None);
    }
}
