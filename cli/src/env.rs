use std::path::PathBuf;

pub const STORE_VAR: &str = "SNIPGEN_STORE";
pub const DEFAULT_STORE: &str = "user_keywords.db";

pub struct SystemEnvironment;

impl SystemEnvironment {
    pub fn get_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    /// Explicit path, else `$SNIPGEN_STORE`, else the default file in the working directory.
    pub fn store_path(&self, explicit: Option<&str>) -> PathBuf {
        resolve_store_path(explicit, |name| self.get_env(name))
    }
}

fn resolve_store_path<F>(explicit: Option<&str>, get_env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |path: &str| {
        let path = path.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    };

    explicit
        .and_then(non_empty)
        .or_else(|| get_env(STORE_VAR).as_deref().and_then(non_empty))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))
}
