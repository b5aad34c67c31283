//! Shared holder for the active robot configuration.

use std::sync::RwLock;

use crate::{ParameterError, RobotConfig};

/// Read-mostly store of the active [`RobotConfig`].
///
/// Consumers take a snapshot with [`ConfigRegistry::active`] and pass it on explicitly.
/// The only way to change it is [`ConfigRegistry::set_config`].
#[derive(Debug)]
pub struct ConfigRegistry {
    active: RwLock<RobotConfig>,
}

impl ConfigRegistry {
    pub fn new(config: RobotConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        Ok(Self {
            active: RwLock::new(config),
        })
    }

    /// Snapshot of the active configuration.
    pub fn active(&self) -> RobotConfig {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the active configuration after validating it. The old value stays on error.
    pub fn set_config(&self, config: RobotConfig) -> Result<(), ParameterError> {
        config.validate()?;
        let mut guard = self.active.write().unwrap_or_else(|e| e.into_inner());
        tracing::info!(
            max_speed = config.max_speed,
            max_accel = config.max_accel,
            "robot configuration updated"
        );
        *guard = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_update_keeps_previous_config() {
        let registry = ConfigRegistry::new(RobotConfig::default()).unwrap();
        let bad = RobotConfig {
            max_speed: 0.0,
            ..RobotConfig::default()
        };
        assert!(registry.set_config(bad).is_err());
        assert_eq!(registry.active(), RobotConfig::default());
    }

    #[test]
    fn valid_update_is_visible() {
        let registry = ConfigRegistry::new(RobotConfig::default()).unwrap();
        let faster = RobotConfig {
            max_speed: 6.0,
            ..RobotConfig::default()
        };
        registry.set_config(faster.clone()).unwrap();
        assert_eq!(registry.active(), faster);
    }

    #[test]
    fn rejects_invalid_initial_config() {
        let bad = RobotConfig {
            length: -2.0,
            ..RobotConfig::default()
        };
        assert!(ConfigRegistry::new(bad).is_err());
    }
}
