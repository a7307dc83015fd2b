//! Bootstrap: startup checks and store construction.
//!
//! When mdpd starts:
//! 1. Verify the config names a storage directory.
//! 2. Build and validate the table schema registry.
//! 3. Open the configured sheet store and list the sheets it already holds.

use std::sync::Arc;

use tracing::info;

use mdp_core::ServiceConfig;
use mdp_gateway::schema::TableSchemas;
use mdp_sheet::{MemorySheetStore, RedbSheetStore, SheetStore};

use crate::config::{Backend, ServerConfig};

/// Verify server configuration is usable.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.trim().is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Defaults merged with the `[tables]` section, validated.
pub fn build_schemas(config: &ServerConfig) -> anyhow::Result<TableSchemas> {
    let schemas = TableSchemas::with_overrides(config.tables.clone())
        .map_err(|e| anyhow::anyhow!("invalid table schema: {}", e))?;
    for table in schemas.tables() {
        info!("Table {} [{}]", table.name, table.columns.join(", "));
    }
    Ok(schemas)
}

/// Open the sheet store named by `backend`.
pub fn open_store(
    backend: Backend,
    service: &ServiceConfig,
) -> anyhow::Result<Arc<dyn SheetStore>> {
    let store: Arc<dyn SheetStore> = match backend {
        Backend::Redb => {
            let path = service.resolve_db_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let store = RedbSheetStore::open(&path)
                .map_err(|e| anyhow::anyhow!("failed to open sheet store: {}", e))?;
            info!("Sheet store opened at {}", path.display());
            Arc::new(store)
        }
        Backend::Memory => {
            info!("Using in-memory sheet store; data will not persist");
            Arc::new(MemorySheetStore::new())
        }
    };

    let sheets = store
        .sheet_names()
        .map_err(|e| anyhow::anyhow!("failed to list sheets: {}", e))?;
    if sheets.is_empty() {
        info!("Sheet store is empty");
    } else {
        info!("Existing sheets: {}", sheets.join(", "));
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn config(data_dir: &str) -> ServerConfig {
        ServerConfig {
            storage: StorageConfig {
                data_dir: data_dir.to_string(),
                backend: Backend::Redb,
                db_path: None,
            },
            tables: Default::default(),
        }
    }

    #[test]
    fn test_verify_config_empty_data_dir() {
        assert!(verify_config(&config("")).is_err());
        assert!(verify_config(&config("  ")).is_err());
        assert!(verify_config(&config("/tmp")).is_ok());
    }

    #[test]
    fn test_build_schemas_rejects_bad_table() {
        let mut cfg = config("/tmp");
        cfg.tables.insert("Bad".into(), vec!["name".into()]);
        let err = build_schemas(&cfg).unwrap_err();
        assert!(err.to_string().contains("invalid table schema"));
    }

    #[test]
    fn test_open_redb_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested/data");
        let cfg = config(data_dir.to_str().unwrap());
        let store = open_store(Backend::Redb, &cfg.service_config("x")).unwrap();
        assert!(store.get_rows("Plans").unwrap().is_none());
        assert!(data_dir.join("sheets.redb").exists());
    }

    #[test]
    fn test_open_redb_keeps_existing_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path().to_str().unwrap());
        {
            let store = RedbSheetStore::open(&dir.path().join("sheets.redb")).unwrap();
            store.create_sheet("Plans").unwrap();
            store.create_sheet("SKUs").unwrap();
        }

        let store = open_store(Backend::Redb, &cfg.service_config("x")).unwrap();
        assert_eq!(store.sheet_names().unwrap(), vec!["Plans", "SKUs"]);
    }

    #[test]
    fn test_open_memory() {
        let store = open_store(Backend::Memory, &config("/unused").service_config("x")).unwrap();
        assert!(store.sheet_names().unwrap().is_empty());
    }
}
