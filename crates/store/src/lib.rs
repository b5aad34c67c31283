//! Durable keyed mission storage with a single "current mission" pointer.
//!
//! All state sits behind one `RwLock`. Mutations hold the write lock across
//! persistence and only touch memory once the disk write has succeeded, so
//! readers never see a mission that is not fully committed.

pub mod mission;
mod persist;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rover_core::TrajectoryPoint;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use mission::{Mission, MissionStatus};

use persist::Layout;

/// Errors surfaced by [`MissionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mission '{0}' not found")]
    NotFound(String),
    #[error("no mission is currently deployed")]
    NoneDeployed,
    #[error("invalid mission id '{0}'")]
    InvalidId(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("corrupt record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default)]
struct StoreState {
    missions: BTreeMap<String, Mission>,
    current: Option<String>,
}

impl StoreState {
    fn mission(&self, id: &str) -> Result<&Mission, StoreError> {
        self.missions
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn status_for(&self, id: &str) -> MissionStatus {
        if self.current.as_deref() == Some(id) {
            MissionStatus::Deployed
        } else {
            MissionStatus::Draft
        }
    }
}

/// Mission store, durable when opened on a directory.
#[derive(Debug)]
pub struct MissionStore {
    layout: Option<Layout>,
    state: RwLock<StoreState>,
}

impl MissionStore {
    /// Open (or create) a store rooted at `dir`.
    ///
    /// Mission statuses are rebuilt from the current pointer; a pointer naming a
    /// missing mission is dropped.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let layout = Layout::create(dir.as_ref())?;
        let (mut missions, mut current) = layout.load()?;

        if let Some(id) = current.as_deref() {
            if !missions.contains_key(id) {
                warn!(id, "current mission pointer names a missing record, ignoring it");
                current = None;
            }
        }
        for (id, mission) in missions.iter_mut() {
            mission.status = if current.as_deref() == Some(id.as_str()) {
                MissionStatus::Deployed
            } else {
                MissionStatus::Draft
            };
        }

        info!(
            root = %layout.root().display(),
            missions = missions.len(),
            current = current.as_deref().unwrap_or("<none>"),
            "mission store opened"
        );
        Ok(Self {
            layout: Some(layout),
            state: RwLock::new(StoreState { missions, current }),
        })
    }

    /// A store that lives only in memory. Same semantics, no durability.
    pub fn in_memory() -> Self {
        Self {
            layout: None,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Directory backing the store, if any.
    pub fn root(&self) -> Option<&Path> {
        self.layout.as_ref().map(Layout::root)
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or overwrite a mission by id. The stored status follows the current pointer.
    pub fn save(&self, mut mission: Mission) -> Result<String, StoreError> {
        check_id(&mission.id)?;
        let mut state = self.write();
        mission.status = state.status_for(&mission.id);
        if let Some(layout) = &self.layout {
            layout.write_mission(&mission)?;
        }
        let id = mission.id.clone();
        debug!(id = %id, "mission saved");
        state.missions.insert(id.clone(), mission);
        Ok(id)
    }

    /// Insert a mission and make it current in one step.
    pub fn insert_current(&self, mut mission: Mission) -> Result<Mission, StoreError> {
        check_id(&mission.id)?;
        let mut state = self.write();
        mission.status = MissionStatus::Deployed;
        let previous = state.current.clone();

        if let Some(layout) = &self.layout {
            layout.write_mission(&mission)?;
            if let Err(err) = layout.write_current(Some(&mission.id)) {
                // roll the record back so disk matches memory
                let restored = match state.missions.get(&mission.id) {
                    Some(existing) => layout.write_mission(existing),
                    None => layout.remove_mission(&mission.id),
                };
                if let Err(rollback) = restored {
                    warn!(id = %mission.id, error = %rollback, "rollback of mission record failed");
                }
                return Err(err);
            }
        }

        self.demote(&mut state, previous.as_deref(), &mission.id);
        state.current = Some(mission.id.clone());
        state.missions.insert(mission.id.clone(), mission.clone());
        info!(id = %mission.id, points = mission.trajectory.len(), "mission deployed");
        Ok(mission)
    }

    pub fn get(&self, id: &str) -> Result<Mission, StoreError> {
        self.read().mission(id).cloned()
    }

    /// Snapshot of every stored mission, ordered by id.
    pub fn list(&self) -> Vec<Mission> {
        self.read().missions.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().missions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().missions.contains_key(id)
    }

    pub fn current_id(&self) -> Option<String> {
        self.read().current.clone()
    }

    /// The mission currently designated for execution.
    pub fn get_current(&self) -> Result<Mission, StoreError> {
        let state = self.read();
        let id = state.current.as_deref().ok_or(StoreError::NoneDeployed)?;
        state.mission(id).cloned()
    }

    /// Point the current-mission pointer at an existing mission.
    pub fn set_current(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.write();
        state.mission(id)?;
        let previous = state.current.clone();
        if previous.as_deref() == Some(id) {
            return Ok(());
        }
        if let Some(layout) = &self.layout {
            layout.write_current(Some(id))?;
        }
        self.demote(&mut state, previous.as_deref(), id);
        state.current = Some(id.to_string());
        if let Some(mission) = state.missions.get_mut(id) {
            mission.status = MissionStatus::Deployed;
            self.refresh_record(mission);
        }
        info!(id, "current mission changed");
        Ok(())
    }

    /// Clear the current pointer. Returns the id that was current, if any.
    pub fn clear_current(&self) -> Result<Option<String>, StoreError> {
        let mut state = self.write();
        let Some(previous) = state.current.clone() else {
            return Ok(None);
        };
        if let Some(layout) = &self.layout {
            layout.write_current(None)?;
        }
        state.current = None;
        self.demote(&mut state, Some(previous.as_str()), "");
        info!(id = %previous, "mission undeployed");
        Ok(Some(previous))
    }

    /// Replace a stored mission's trajectory, keeping everything else.
    pub fn replace_trajectory(
        &self,
        id: &str,
        trajectory: Vec<TrajectoryPoint>,
    ) -> Result<Mission, StoreError> {
        let mut state = self.write();
        let mut updated = state.mission(id)?.clone();
        updated.trajectory = trajectory;
        if let Some(layout) = &self.layout {
            layout.write_mission(&updated)?;
        }
        state.missions.insert(id.to_string(), updated.clone());
        debug!(id, points = updated.trajectory.len(), "trajectory replaced");
        Ok(updated)
    }

    /// Remove a mission. Deleting the current mission also clears the pointer.
    pub fn delete(&self, id: &str) -> Result<Mission, StoreError> {
        let mut state = self.write();
        state.mission(id)?;
        let was_current = state.current.as_deref() == Some(id);

        if let Some(layout) = &self.layout {
            if was_current {
                layout.write_current(None)?;
            }
            if let Err(err) = layout.remove_mission(id) {
                if was_current {
                    if let Err(rollback) = layout.write_current(Some(id)) {
                        warn!(id, error = %rollback, "failed to restore current pointer");
                    }
                }
                return Err(err);
            }
        }

        if was_current {
            state.current = None;
        }
        let removed = state
            .missions
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        info!(id, "mission deleted");
        Ok(removed)
    }

    /// Mark `previous` as a draft unless it is `keep`.
    fn demote(&self, state: &mut StoreState, previous: Option<&str>, keep: &str) {
        let Some(previous) = previous.filter(|p| *p != keep) else {
            return;
        };
        if let Some(mission) = state.missions.get_mut(previous) {
            mission.status = MissionStatus::Draft;
            self.refresh_record(mission);
        }
    }

    /// Rewrite a record whose status changed. The pointer is authoritative, so failures only warn.
    fn refresh_record(&self, mission: &Mission) {
        if let Some(layout) = &self.layout {
            if let Err(err) = layout.write_mission(mission) {
                warn!(id = %mission.id, error = %err, "failed to refresh mission status on disk");
            }
        }
    }
}

/// Ids become file names, so keep them to a safe alphabet.
pub(crate) fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}
