//! Local persistence of the session in a JSON key/value file.
//!
//! Every field is stored under `{namespace}{field}` as a string value, so one
//! file can hold several namespaces side by side.

use crate::models::Session;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Namespace prefix used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "subnets:";

const FIELDS: [&str; 6] = ["input", "maxMask", "expanded", "locked", "split", "names"];

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    namespace: String,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>, namespace: &str) -> Self {
        StateStore {
            path: path.into(),
            namespace: namespace.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key(&self, field: &str) -> String {
        format!("{}{}", self.namespace, field)
    }

    fn read_entries(&self) -> Result<Entries, Box<dyn Error>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                format!("Error parsing state file {}: {e}", self.path.display()).into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(format!("Error reading state file {}: {e}", self.path.display()).into()),
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), Box<dyn Error>> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Error serializing state: {e}"))?;
        std::fs::write(&self.path, json)
            .map_err(|e| format!("Error writing state file {}: {e}", self.path.display()))?;
        Ok(())
    }

    /// Load the stored session. Missing or malformed entries fall back to defaults.
    pub fn load(&self) -> Session {
        let mut session = Session::default();
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to load persisted subnet state: {e}");
                return session;
            }
        };

        if let Some(input) = entries.get(&self.key("input")).filter(|i| !i.is_empty()) {
            session.input = input.clone();
        }
        if let Some(mask) = entries.get(&self.key("maxMask")) {
            match mask.trim().parse::<u8>() {
                Ok(mask) => session.view.max_depth = mask,
                Err(e) => log::warn!("Ignoring stored maxMask {mask:?}: {e}"),
            }
        }
        if let Some(set) = self.decode::<Vec<String>>(&entries, "expanded") {
            session.view.expanded = set.into_iter().collect();
        }
        if let Some(set) = self.decode::<Vec<String>>(&entries, "locked") {
            session.view.locked = set.into_iter().collect();
        }
        if let Some(set) = self.decode::<BTreeSet<String>>(&entries, "split") {
            session.view.split = set;
        }
        if let Some(names) = self.decode::<BTreeMap<String, String>>(&entries, "names") {
            session.view.names = names;
        }
        log::debug!("Loaded session for {} from {}", session.input, self.path.display());
        session
    }

    fn decode<T: DeserializeOwned>(&self, entries: &Entries, field: &str) -> Option<T> {
        let raw = entries.get(&self.key(field))?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring malformed stored {field}: {e}");
                None
            }
        }
    }

    /// Persist all session fields, keeping entries of other namespaces.
    ///
    /// An unreadable state file is an error and is left untouched.
    pub fn save(&self, session: &Session) -> Result<(), Box<dyn Error>> {
        let mut entries = self.read_entries()?;
        let view = &session.view;
        entries.insert(self.key("input"), session.input.clone());
        entries.insert(self.key("maxMask"), view.max_depth.to_string());
        entries.insert(self.key("expanded"), serde_json::to_string(&view.expanded)?);
        entries.insert(self.key("locked"), serde_json::to_string(&view.locked)?);
        entries.insert(self.key("split"), serde_json::to_string(&view.split)?);
        entries.insert(self.key("names"), serde_json::to_string(&view.names)?);
        self.write_entries(&entries)
    }

    /// Remove every field of this namespace.
    pub fn clear(&self) -> Result<(), Box<dyn Error>> {
        let mut entries = self.read_entries()?;
        for field in FIELDS {
            entries.remove(&self.key(field));
        }
        self.write_entries(&entries)
    }
}
