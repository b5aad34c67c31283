//! On-disk layout and crash-safe file replacement.
//!
//! ```text
//! <root>/current.json          {"currentId": "..."}
//! <root>/missions/<id>.json    one self-contained Mission record
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::mission::Mission;
use crate::{StoreError, check_id};

const MISSIONS_DIR: &str = "missions";
const CURRENT_FILE: &str = "current.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentPointer {
    current_id: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Layout {
    root: PathBuf,
}

impl Layout {
    pub(crate) fn create(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root.join(MISSIONS_DIR))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn mission_path(&self, id: &str) -> PathBuf {
        self.root.join(MISSIONS_DIR).join(format!("{id}.json"))
    }

    fn current_path(&self) -> PathBuf {
        self.root.join(CURRENT_FILE)
    }

    pub(crate) fn write_mission(&self, mission: &Mission) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(mission)?;
        write_atomic(&self.mission_path(&mission.id), &bytes)?;
        Ok(())
    }

    pub(crate) fn remove_mission(&self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.mission_path(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn write_current(&self, current: Option<&str>) -> Result<(), StoreError> {
        let pointer = CurrentPointer {
            current_id: current.map(str::to_owned),
        };
        let bytes = serde_json::to_vec_pretty(&pointer)?;
        write_atomic(&self.current_path(), &bytes)?;
        Ok(())
    }

    /// Read every mission record and the current pointer.
    pub(crate) fn load(&self) -> Result<(BTreeMap<String, Mission>, Option<String>), StoreError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(self.root.join(MISSIONS_DIR))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        paths.sort();

        let mut missions = BTreeMap::new();
        for path in paths {
            let contents = fs::read(&path)?;
            let mission: Mission =
                serde_json::from_slice(&contents).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?;
            let stem = path.file_stem().and_then(|s| s.to_str());
            if stem != Some(mission.id.as_str()) || check_id(&mission.id).is_err() {
                warn!(
                    path = %path.display(),
                    id = %mission.id,
                    "skipping record whose id does not match its file name"
                );
                continue;
            }
            missions.insert(mission.id.clone(), mission);
        }

        let current_path = self.current_path();
        let current = match fs::read(&current_path) {
            Ok(contents) => {
                let pointer: CurrentPointer =
                    serde_json::from_slice(&contents).map_err(|source| StoreError::Corrupt {
                        path: current_path.clone(),
                        source,
                    })?;
                pointer.current_id
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };

        Ok((missions, current))
    }
}

/// Write `bytes` to a temporary sibling, sync it, then rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
