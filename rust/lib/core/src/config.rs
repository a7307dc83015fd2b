use std::path::PathBuf;

/// Storage and listener settings shared by the server binary and tests.
///
/// The binary fills these from its TOML file and command line, then passes
/// them to store initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the persistent sheet database.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb sheet database.
    /// Defaults to `{data_dir}/sheets.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/sheets.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("sheets.redb"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
