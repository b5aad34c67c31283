use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use rover_config::{ConfigRegistry, RobotConfig, Settings};
use rover_store::{Mission, MissionStatus, MissionStore};
use rover_trajectory::TrajectoryGenerator;
use tracing::{debug, info};

use crate::{DeployRequest, MissionError, MissionSummary};

/// Orchestrates validation, generation, and storage of missions.
///
/// Share it behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct MissionService {
    store: MissionStore,
    registry: Arc<ConfigRegistry>,
    generator: TrajectoryGenerator,
    sequence: AtomicU32,
}

impl MissionService {
    pub fn new(store: MissionStore, registry: Arc<ConfigRegistry>) -> Self {
        Self {
            store,
            registry,
            generator: TrajectoryGenerator::default(),
            sequence: AtomicU32::new(0),
        }
    }

    pub fn with_generator(mut self, generator: TrajectoryGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Open the store, seed the registry, and configure sampling from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, MissionError> {
        let store = MissionStore::open(&settings.store_dir)?;
        let registry = Arc::new(ConfigRegistry::new(settings.robot.clone())?);
        let generator = TrajectoryGenerator::new(settings.sample_period_s)?;
        Ok(Self::new(store, registry).with_generator(generator))
    }

    pub fn store(&self) -> &MissionStore {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ConfigRegistry> {
        &self.registry
    }

    pub fn generator(&self) -> &TrajectoryGenerator {
        &self.generator
    }

    /// Snapshot of the active robot configuration.
    pub fn active_config(&self) -> RobotConfig {
        self.registry.active()
    }

    /// Replace the active robot configuration. Stored missions keep the config they were built with.
    pub fn set_config(&self, config: RobotConfig) -> Result<(), MissionError> {
        self.registry.set_config(config)?;
        Ok(())
    }

    /// Validate, generate, store, and make current, as one step visible to readers.
    ///
    /// Nothing is stored when validation or generation fails.
    pub fn deploy(&self, request: DeployRequest) -> Result<Mission, MissionError> {
        let DeployRequest {
            waypoints,
            robot_config,
        } = request;
        let config = robot_config.unwrap_or_else(|| self.registry.active());
        let trajectory = self.generator.generate(&waypoints, &config)?;

        let created_at = Utc::now();
        let id = self.next_id(created_at);
        debug!(id = %id, waypoints = waypoints.len(), points = trajectory.len(), "trajectory generated");

        let mission = Mission {
            id,
            waypoints,
            trajectory,
            robot_config: config,
            created_at,
            status: MissionStatus::Draft,
        };
        Ok(self.store.insert_current(mission)?)
    }

    /// Recompute a stored mission's trajectory from its own waypoints and config.
    pub fn regenerate(&self, id: &str) -> Result<Mission, MissionError> {
        let mission = self.store.get(id)?;
        let trajectory = self
            .generator
            .generate(&mission.waypoints, &mission.robot_config)?;
        let updated = self.store.replace_trajectory(id, trajectory)?;
        info!(id, points = updated.trajectory.len(), "trajectory regenerated");
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Result<Mission, MissionError> {
        Ok(self.store.get(id)?)
    }

    pub fn list(&self) -> Vec<Mission> {
        self.store.list()
    }

    /// The mission the robot should execute.
    pub fn current(&self) -> Result<Mission, MissionError> {
        Ok(self.store.get_current()?)
    }

    /// Make an already stored mission current.
    pub fn activate(&self, id: &str) -> Result<Mission, MissionError> {
        self.store.set_current(id)?;
        Ok(self.store.get(id)?)
    }

    /// Stop serving any mission. Returns the id that was current.
    pub fn undeploy(&self) -> Result<Option<String>, MissionError> {
        Ok(self.store.clear_current()?)
    }

    pub fn delete(&self, id: &str) -> Result<Mission, MissionError> {
        Ok(self.store.delete(id)?)
    }

    /// Readiness summary of the current mission.
    pub fn summary(&self) -> MissionSummary {
        match self.store.get_current() {
            Ok(mission) => MissionSummary::of(&mission),
            Err(_) => MissionSummary::none(),
        }
    }

    fn next_id(&self, created_at: DateTime<Utc>) -> String {
        let stamp = created_at.format("%Y%m%d-%H%M%S");
        loop {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed) % 10_000;
            let id = format!("mission-{stamp}-{seq:04}");
            if !self.store.contains(&id) {
                return id;
            }
        }
    }
}
