use std::panic::Location;

use crate::config::{EngineConfig, LocationStrategy};
use crate::diagnostics::{Locator, SourceLocation};
use crate::step::{StepDescriptor, StepReporter, Wrapped};

pub(crate) const SOURCE_FILE: &str = file!();

/// Shared settings for wrapping operations.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    locator: Locator,
    location: LocationStrategy,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut locator = Locator::new().with_own_frame_depth(config.own_frame_depth);
        for pattern in &config.ignore {
            locator = locator.with_ignored(pattern.clone());
        }
        Self {
            locator,
            location: config.location,
        }
    }

    /// Engine configured from `STEPMARK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_config(&EngineConfig::from_env())
    }

    pub fn with_location(mut self, strategy: LocationStrategy) -> Self {
        self.location = strategy;
        self
    }

    pub fn with_ignored(mut self, pattern: impl Into<String>) -> Self {
        self.locator = self.locator.with_ignored(pattern);
        self
    }

    pub fn with_own_frame_depth(mut self, depth: usize) -> Self {
        self.locator = self.locator.with_own_frame_depth(depth);
        self
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn location_strategy(&self) -> LocationStrategy {
        self.location
    }

    /// Wrap `op` so that each call is reported through `reporter`.
    pub fn wrap<R, F>(&self, reporter: R, descriptor: StepDescriptor, op: F) -> Wrapped<R, F>
    where
        R: StepReporter,
    {
        Wrapped::new(self.clone(), reporter, descriptor, op)
    }

    pub(crate) fn locate_call(&self, caller: &'static Location<'static>) -> Option<SourceLocation> {
        let location = match self.location {
            LocationStrategy::Backtrace => self.locator.capture(),
            LocationStrategy::Caller => Some(SourceLocation::from(caller)),
            LocationStrategy::Disabled => return None,
        };
        if location.is_none() {
            tracing::debug!(strategy = ?self.location, "no call site found");
        }
        location
    }
}
