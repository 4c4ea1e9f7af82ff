use core::fmt;

use crate::domain::entity::LightConfig;

/// Error type for the persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    /// Storage is processing another write
    Busy,
    /// Underlying storage driver failed
    DriverError,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Busy => write!(f, "storage busy"),
            PersistenceError::DriverError => write!(f, "storage driver error"),
        }
    }
}

impl core::error::Error for PersistenceError {}

/// Writer interface for persisting the light record to power-loss-safe storage
pub trait PersistentConfigWriter {
    /// Write the whole light record
    fn save(&mut self, config: &LightConfig) -> Result<(), PersistenceError>;
}
