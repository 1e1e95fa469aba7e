use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// XDG-compatible data path: ~/.local/share/reel/favorites.json (Linux)
pub fn default_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("reel").join("favorites.json"))
}

/// Favorite movie ids, persisted as a flat JSON list
#[derive(Debug, Default)]
pub struct Favorites {
    ids: BTreeSet<u64>,
    path: Option<PathBuf>,
}

impl Favorites {
    /// Load from `path`. A missing or corrupt file starts an empty set.
    pub fn load(path: Option<PathBuf>) -> Self {
        let ids = path.as_deref().and_then(read_ids).unwrap_or_default();
        Self { ids, path }
    }

    /// Flip membership and persist. Returns true when `id` is now a favorite.
    pub fn toggle(&mut self, id: u64) -> bool {
        let added = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id)
        };
        self.save();
        added
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Write the set. Failures are logged, not returned.
    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_ids(path, &self.ids) {
            tracing::warn!(path = %path.display(), error = %e, "could not save favorites");
        }
    }
}

fn read_ids(path: &Path) -> Option<BTreeSet<u64>> {
    let data = std::fs::read_to_string(path).ok()?;
    let ids: Vec<u64> = serde_json::from_str(&data).ok()?;
    Some(ids.into_iter().collect())
}

fn write_ids(path: &Path, ids: &BTreeSet<u64>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let list: Vec<u64> = ids.iter().copied().collect();
    let data = serde_json::to_string(&list)?;
    std::fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut favorites = Favorites::load(None);
        assert!(favorites.toggle(603));
        assert!(favorites.contains(603));
        assert!(!favorites.toggle(603));
        assert!(!favorites.contains(603));
        assert!(favorites.is_empty());
    }

    #[test]
    fn survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.json");

        let mut favorites = Favorites::load(Some(path.clone()));
        favorites.toggle(603);
        favorites.toggle(27205);
        favorites.toggle(11);
        favorites.toggle(11);

        let reloaded = Favorites::load(Some(path.clone()));
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(603));
        assert!(reloaded.contains(27205));
        assert!(!reloaded.contains(11));

        let raw = std::fs::read_to_string(path).unwrap();
        assert_eq!(raw, "[603,27205]");
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "{not json").unwrap();

        let favorites = Favorites::load(Some(path));
        assert!(favorites.is_empty());
    }
}
