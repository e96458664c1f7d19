//! Per-account YAML record store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.acctsync/
//!   accounts/
//!     <account_name>.yaml   (one record per managed account — mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::types::{AccountName, CloudAccountRecord};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.acctsync/`
pub fn root_dir_at(home: &Path) -> PathBuf {
    home.join(".acctsync")
}

/// `<home>/.acctsync/accounts/`
///
/// Creates the directory (mode `0700`) if it does not yet exist.
pub fn accounts_dir_at(home: &Path) -> Result<PathBuf, StoreError> {
    let dir = root_dir_at(home).join("accounts");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.acctsync/accounts/<name>.yaml` — pure, no I/O.
pub fn record_path_at(home: &Path, name: &AccountName) -> PathBuf {
    root_dir_at(home)
        .join("accounts")
        .join(format!("{}.yaml", name.0))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load the record for `name`.
///
/// Returns `StoreError::RecordNotFound` if absent,
/// `StoreError::Parse` (with path) if malformed YAML.
pub fn load_record_at(home: &Path, name: &AccountName) -> Result<CloudAccountRecord, StoreError> {
    let path = record_path_at(home, name);
    if !path.exists() {
        return Err(StoreError::RecordNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })
}

/// `load_record_at` convenience wrapper.
pub fn load_record(name: &AccountName) -> Result<CloudAccountRecord, StoreError> {
    load_record_at(&home()?, name)
}

/// All stored records, sorted by account name.
pub fn list_records_at(home: &Path) -> Result<Vec<CloudAccountRecord>, StoreError> {
    let dir = root_dir_at(home).join("accounts");
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut entries: Vec<_> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".yaml"))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = entry.path();
        let contents = std::fs::read_to_string(&path)?;
        let record: CloudAccountRecord =
            serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })?;
        records.push(record);
    }
    Ok(records)
}

/// `list_records_at` convenience wrapper.
pub fn list_records() -> Result<Vec<CloudAccountRecord>, StoreError> {
    list_records_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic) / remove
// ---------------------------------------------------------------------------

/// Atomically save `record` under its name.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_record_at(home: &Path, record: &CloudAccountRecord) -> Result<PathBuf, StoreError> {
    accounts_dir_at(home)?;
    let path = record_path_at(home, &record.name);
    let tmp_path = path.with_file_name(format!("{}.yaml.tmp", record.name.0));

    let yaml = serde_yaml::to_string(record)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    tracing::debug!("saved record: {}", path.display());
    Ok(path)
}

/// `save_record_at` convenience wrapper.
pub fn save_record(record: &CloudAccountRecord) -> Result<PathBuf, StoreError> {
    save_record_at(&home()?, record)
}

/// Remove the record file for `name`. Missing files are not an error.
pub fn remove_record_at(home: &Path, name: &AccountName) -> Result<(), StoreError> {
    let path = record_path_at(home, name);
    match std::fs::remove_file(&path) {
        Ok(()) => {
            tracing::debug!("removed record: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// `remove_record_at` convenience wrapper.
pub fn remove_record(name: &AccountName) -> Result<(), StoreError> {
    remove_record_at(&home()?, name)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

pub(crate) fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CloudAccountId;
    use tempfile::TempDir;

    fn make_home() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    fn record(name: &str) -> CloudAccountRecord {
        CloudAccountRecord {
            id: Some(CloudAccountId::from("acct-1")),
            name: AccountName::from(name),
            hostname: "vc.lab.local".to_string(),
            regions: vec!["r2".to_string(), "r1".to_string()],
            region_ids: vec!["r2".to_string(), "r1".to_string()],
            ..CloudAccountRecord::default()
        }
    }

    #[test]
    fn record_path_is_correct() {
        let home = make_home();
        let path = record_path_at(home.path(), &AccountName::from("lab-vc"));
        assert!(path.ends_with(".acctsync/accounts/lab-vc.yaml"));
    }

    #[test]
    fn accounts_dir_created_with_perms() {
        let home = make_home();
        let dir = accounts_dir_at(home.path()).expect("accounts_dir_at");
        assert!(dir.exists());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o700);
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = make_home();
        let rec = record("lab-vc");
        save_record_at(home.path(), &rec).expect("save");
        let loaded = load_record_at(home.path(), &rec.name).expect("load");
        assert_eq!(loaded, rec);
    }

    #[test]
    fn atomic_write_cleans_up_tmp() {
        let home = make_home();
        let rec = record("lab-vc");
        let path = save_record_at(home.path(), &rec).expect("save");
        assert!(!path.with_file_name("lab-vc.yaml.tmp").exists());
    }

    #[test]
    fn load_missing_returns_not_found() {
        let home = make_home();
        let err = load_record_at(home.path(), &AccountName::from("nope")).unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { .. }));
    }

    #[test]
    fn remove_is_idempotent() {
        let home = make_home();
        let rec = record("lab-vc");
        save_record_at(home.path(), &rec).expect("save");
        remove_record_at(home.path(), &rec.name).expect("first remove");
        remove_record_at(home.path(), &rec.name).expect("second remove");
        assert!(!record_path_at(home.path(), &rec.name).exists());
    }

    #[test]
    fn list_empty_when_no_dir() {
        let home = make_home();
        assert!(list_records_at(home.path()).expect("list").is_empty());
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(StoreError::HomeNotFound.to_string().contains("home directory"));
    }
}
