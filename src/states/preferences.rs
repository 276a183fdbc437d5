//! Preference Persistence
//!
//! Stores exactly the session and UI fields that survive a restart: persona,
//! auth status, auth user, sidebar state, and table density. Reads that fail
//! (missing file, corrupt TOML) fall back to defaults; write failures are logged
//! and otherwise ignored.

use crate::auth::{AuthStatus, AuthUser, Persona, SessionState};
use crate::constants::PREFERENCES_FILE;
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;
use crate::states::ui::{TableDensity, UiState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Persisted preference record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub persona: Persona,
    pub status: AuthStatus,
    pub sidebar_collapsed: bool,
    pub table_density: TableDensity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

impl Preferences {
    pub fn capture(session: &SessionState, ui: &UiState) -> Self {
        Self {
            persona: session.persona(),
            status: session.status(),
            sidebar_collapsed: ui.sidebar_collapsed,
            table_density: ui.table_density,
            user: session.user().cloned(),
        }
    }

    /// Session rebuilt with capabilities derived from the stored persona
    pub fn session(&self) -> SessionState {
        SessionState::restore(self.persona, self.status, self.user.clone())
    }

    pub fn ui(&self) -> UiState {
        UiState {
            sidebar_collapsed: self.sidebar_collapsed,
            table_density: self.table_density,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }
}

/// Key-value persistence boundary for preferences
pub trait PreferenceStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Preferences>>;

    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// Load preferences, swallowing any storage failure
pub fn load_or_default(store: &dyn PreferenceStore) -> Preferences {
    match store.load() {
        Ok(Some(prefs)) => prefs,
        Ok(None) => Preferences::default(),
        Err(e) => {
            warn!(error = %e, "Failed to load preferences, using defaults");
            Preferences::default()
        }
    }
}

/// Save preferences, swallowing any storage failure
pub fn save_quietly(store: &dyn PreferenceStore, prefs: &Preferences, action: &'static str) {
    if let Err(e) = store.save(prefs) {
        warn!(error = %e, action, "Failed to save preferences");
    }
}

// ==================== File Store ====================

/// TOML file in the platform config directory
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// `<config dir>/fleet-console.toml`
    pub fn in_config_dir() -> Result<Self> {
        let path = get_or_create_config_dir()?.join(PREFERENCES_FILE);
        info!(path = ?path, "Using preference file");
        Ok(Self { path })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Option<Preferences>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&self.path)?;
        if value.trim().is_empty() {
            return Ok(None);
        }
        Preferences::from_toml(&value).map(Some)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, prefs.to_toml()?)?;
        Ok(())
    }
}

// ==================== Memory Store ====================

/// In-process store holding the serialized form, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    raw: Mutex<Option<String>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw stored text, corrupt or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// A store whose reads and writes always fail
    pub fn broken() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|raw| raw.clone())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<Preferences>> {
        if self.fail_reads {
            return Err(Error::Invalid {
                message: "preference storage unavailable".to_string(),
            });
        }
        let raw = self.raw.lock().map_err(|e| Error::Invalid {
            message: format!("preference lock poisoned: {e}"),
        })?;
        raw.as_deref().map(Preferences::from_toml).transpose()
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Invalid {
                message: "preference storage unavailable".to_string(),
            });
        }
        let value = prefs.to_toml()?;
        let mut raw = self.raw.lock().map_err(|e| Error::Invalid {
            message: format!("preference lock poisoned: {e}"),
        })?;
        *raw = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Capability;

    fn engineer_prefs() -> Preferences {
        Preferences {
            persona: Persona::Engineer,
            status: AuthStatus::Authenticated,
            sidebar_collapsed: true,
            table_density: TableDensity::Compact,
            user: Some(AuthUser {
                email: "eng@example.com".into(),
                name: Some("eng".into()),
            }),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FilePreferenceStore::at(dir.path().join("nested").join(PREFERENCES_FILE));
        assert_eq!(store.load().expect("load empty"), None);

        store.save(&engineer_prefs()).expect("save");
        let loaded = store.load().expect("load").expect("present");
        assert_eq!(loaded, engineer_prefs());
        assert!(loaded.session().has(Capability::CanViewEng));
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "persona = [[[ not toml").expect("write");
        let store = FilePreferenceStore::at(&path);
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), Preferences::default());
    }

    #[test]
    fn test_partial_record_uses_field_defaults() {
        let store = MemoryPreferenceStore::with_raw("persona = \"internalOps\"\n");
        let prefs = load_or_default(&store);
        assert_eq!(prefs.persona, Persona::InternalOps);
        assert_eq!(prefs.status, AuthStatus::Anonymous);
        assert_eq!(prefs.table_density, TableDensity::Comfortable);
    }

    #[test]
    fn test_unknown_persona_falls_back() {
        let store = MemoryPreferenceStore::with_raw("persona = \"root\"\n");
        assert_eq!(load_or_default(&store), Preferences::default());
    }

    #[test]
    fn test_anonymous_record_drops_user() {
        let mut prefs = engineer_prefs();
        prefs.status = AuthStatus::Anonymous;
        assert!(prefs.session().user().is_none());
    }

    #[test]
    fn test_broken_store_is_silent() {
        let store = MemoryPreferenceStore::broken();
        assert_eq!(load_or_default(&store), Preferences::default());
        save_quietly(&store, &engineer_prefs(), "test");
        assert_eq!(store.raw(), None);
    }
}
