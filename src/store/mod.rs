//! Persistence collaborator for filtered readings.
//!
//! Saving is a placeholder for a future network/database call, so the trait
//! is the seam: the app talks to `ReadingStore`, and today's only
//! implementation does nothing. The save runs on a background thread so it
//! never blocks report rendering, but its result is captured and handed back
//! to the caller instead of being dropped.

use std::thread::{self, JoinHandle};

use crate::domain::FlowReading;
use crate::error::AppError;

/// Destination for filtered readings.
pub trait ReadingStore: Send + 'static {
    /// Persist the readings. Must not mutate them.
    fn save(&self, readings: &[FlowReading]) -> Result<(), AppError>;

    /// Short label for log/report messages.
    fn name(&self) -> &'static str;
}

/// Stand-in store until a real backend exists. Always succeeds.
pub struct NoopStore;

impl ReadingStore for NoopStore {
    fn save(&self, _readings: &[FlowReading]) -> Result<(), AppError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Handle to an in-flight background save.
pub struct SaveHandle {
    store_name: &'static str,
    handle: JoinHandle<Result<(), AppError>>,
}

impl SaveHandle {
    /// Block until the save finishes and return its outcome.
    pub fn wait(self) -> Result<(), AppError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(AppError::new(
                2,
                format!("Background save ('{}') panicked.", self.store_name),
            )),
        }
    }
}

/// Kick off a save on a background thread.
///
/// The readings are cloned into the task so the caller can keep rendering
/// the report while the save runs.
pub fn spawn_save<S: ReadingStore>(store: S, readings: Vec<FlowReading>) -> SaveHandle {
    let store_name = store.name();
    let handle = thread::spawn(move || store.save(&readings));
    SaveHandle { store_name, handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl ReadingStore for FailingStore {
        fn save(&self, _readings: &[FlowReading]) -> Result<(), AppError> {
            Err(AppError::new(2, "backend unreachable"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn sample_readings() -> Vec<FlowReading> {
        vec![FlowReading {
            timestamp: "02/01/2024 02:15".to_string(),
            flow: 10.0,
        }]
    }

    #[test]
    fn noop_store_accepts_readings() {
        assert!(NoopStore.save(&sample_readings()).is_ok());
    }

    #[test]
    fn background_save_reports_success() {
        let handle = spawn_save(NoopStore, sample_readings());
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn background_save_failure_is_captured_not_dropped() {
        let handle = spawn_save(FailingStore, sample_readings());
        let err = handle.wait().unwrap_err();
        assert!(err.to_string().contains("backend unreachable"));
    }
}
