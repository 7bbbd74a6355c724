use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::Host;
use crate::state::FunctionArea;
use crate::units::UnitSystem;

/// In-memory host used when no endpoint is configured, and by tests that
/// script what the host reports between ticks.
#[derive(Default)]
pub struct FixtureHost {
    inner: Mutex<FixtureData>,
}

struct FixtureData {
    areas: Vec<FunctionArea>,
    unit_system: UnitSystem,
    fail_area_fetch: bool,
    area_fetches: u64,
}

impl Default for FixtureData {
    fn default() -> Self {
        Self {
            areas: Vec::new(),
            unit_system: UnitSystem::Metric,
            fail_area_fetch: false,
            area_fetches: 0,
        }
    }
}

impl FixtureHost {
    pub fn set_areas(&self, areas: Vec<FunctionArea>) {
        if let Ok(mut data) = self.inner.lock() {
            data.areas = areas;
        }
    }

    pub fn set_unit_system(&self, unit_system: UnitSystem) {
        if let Ok(mut data) = self.inner.lock() {
            data.unit_system = unit_system;
        }
    }

    /// While set, area fetches fail the way an unreachable host would.
    pub fn set_fail_area_fetch(&self, fail: bool) {
        if let Ok(mut data) = self.inner.lock() {
            data.fail_area_fetch = fail;
        }
    }

    /// How many area queries have been made, successful or not.
    pub fn area_fetch_count(&self) -> u64 {
        self.inner.lock().map(|data| data.area_fetches).unwrap_or(0)
    }
}

#[async_trait]
impl Host for FixtureHost {
    async fn fetch_area_breakdown(&self) -> Result<Vec<FunctionArea>> {
        let mut data = self.inner.lock().map_err(|_| anyhow!("fixture poisoned"))?;
        data.area_fetches += 1;
        if data.fail_area_fetch {
            return Err(anyhow!("fixture host unavailable"));
        }
        Ok(data.areas.clone())
    }

    async fn fetch_unit_system(&self) -> Result<UnitSystem> {
        let data = self.inner.lock().map_err(|_| anyhow!("fixture poisoned"))?;
        Ok(data.unit_system)
    }
}
