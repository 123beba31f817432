//! Split-view splitter position and its on-disk store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CoreResult;

/// Positions the splitter snaps to when dragged close enough
pub const SNAP_POINTS: [f64; 3] = [25.0, 50.0, 75.0];

/// Snap when strictly closer than this many percentage points
pub const SNAP_THRESHOLD: f64 = 2.0;

/// Splitter position as a percentage of the container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitterState {
    pub position: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SplitterState {
    fn default() -> Self {
        Self {
            position: 50.0,
            min: 30.0,
            max: 70.0,
        }
    }
}

impl SplitterState {
    pub fn new(initial: f64, min: f64, max: f64) -> Self {
        Self {
            position: initial.clamp(min, max),
            min,
            max,
        }
    }

    pub fn from_config(layout: &finflow_config::LayoutConfig) -> Self {
        Self::new(layout.splitter_initial, layout.splitter_min, layout.splitter_max)
    }

    /// Adopt a stored position if it parses and lies within bounds
    pub fn restore(self, stored: Option<&str>) -> Self {
        let restored = stored
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite() && *p >= self.min && *p <= self.max);
        match restored {
            Some(position) => Self { position, ..self },
            None => self,
        }
    }

    /// Snap, then clamp to bounds
    pub fn drag_to(self, raw: f64) -> Self {
        if !raw.is_finite() {
            return self;
        }
        let snapped = SNAP_POINTS
            .iter()
            .copied()
            .find(|snap| (raw - snap).abs() < SNAP_THRESHOLD)
            .unwrap_or(raw);
        Self {
            position: snapped.clamp(self.min, self.max),
            ..self
        }
    }

    /// Stored form, a plain decimal string
    pub fn to_stored(&self) -> String {
        self.position.to_string()
    }
}

/// Key/value file of stored positions; last writer wins
#[derive(Debug, Clone)]
pub struct PositionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PositionStore {
    /// Read the store; a missing file is an empty store
    pub async fn load(path: &Path) -> CoreResult<Self> {
        let values = match tokio::fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Loaded {} stored layout value(s) from {}", values.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value and write the whole store back
    pub async fn set(&mut self, key: &str, value: String) -> CoreResult<()> {
        self.values.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SplitterState::default();
        assert_eq!((state.position, state.min, state.max), (50.0, 30.0, 70.0));
    }

    #[test]
    fn test_restore_validates_bounds() {
        let state = SplitterState::default();
        assert_eq!(state.restore(Some("62.5")).position, 62.5);
        assert_eq!(state.restore(Some("30")).position, 30.0);
        assert_eq!(state.restore(Some("80")).position, 50.0);
        assert_eq!(state.restore(Some("wide")).position, 50.0);
        assert_eq!(state.restore(Some("NaN")).position, 50.0);
        assert_eq!(state.restore(None).position, 50.0);
    }

    #[test]
    fn test_drag_snaps_then_clamps() {
        let state = SplitterState::default();
        assert_eq!(state.drag_to(48.5).position, 50.0);
        assert_eq!(state.drag_to(47.9).position, 47.9);
        // 75 snap lands outside max, so it clamps
        assert_eq!(state.drag_to(76.0).position, 70.0);
        assert_eq!(state.drag_to(10.0).position, 30.0);
        assert_eq!(state.drag_to(f64::NAN).position, 50.0);
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("layout.json");

        let mut store = PositionStore::load(&path).await.unwrap();
        assert_eq!(store.get("finance-flow-splitter"), None);
        store.set("finance-flow-splitter", "65".to_string()).await.unwrap();
        store.set("finance-flow-splitter", "40".to_string()).await.unwrap();

        let reloaded = PositionStore::load(&path).await.unwrap();
        assert_eq!(reloaded.get("finance-flow-splitter"), Some("40"));
        let state = SplitterState::default().restore(reloaded.get("finance-flow-splitter"));
        assert_eq!(state.position, 40.0);
    }

    #[tokio::test]
    async fn test_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(PositionStore::load(&path).await.is_err());
    }
}
