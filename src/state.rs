use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::units::UnitSystem;

/// Functions the host reports without an assigned use. Dropped from the
/// breakdown before it enters panel state.
pub const UNSPECIFIED_FUNCTION: &str = "unspecified";

#[derive(Clone)]
pub struct Config {
    /// Base URL of the host's metrics endpoints. Unset means the in-memory
    /// fixture host is used instead.
    pub host_base: Option<String>,
    pub db_path: String,
    pub poll_interval_ms: u64,
    /// Re-fetch the unit preference on every tick instead of once at startup.
    pub repoll_units: bool,
    pub revenue_enabled: bool,
    pub site_costs_enabled: bool,
    /// Alternate display mode: placeholder view only, no polling.
    pub floating: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host_base: std::env::var("HOST_BASE").ok(),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "./panel.sqlite".to_string()),
            poll_interval_ms: std::env::var("POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(500),
            repoll_units: env_flag("REPOLL_UNITS", false),
            revenue_enabled: env_flag("REVENUE", true),
            site_costs_enabled: env_flag("SITE_COSTS", true),
            floating: env_flag("FLOATING", false),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

/// Area reported by the host for one function: square meters, or a sentinel
/// string when the host cannot measure it. Sentinels count as zero area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaValue {
    Sqm(f64),
    Unmeasurable(String),
}

impl AreaValue {
    pub fn sqm(&self) -> f64 {
        match self {
            AreaValue::Sqm(v) => *v,
            AreaValue::Unmeasurable(_) => 0.0,
        }
    }
}

/// One row of the gross-floor-area breakdown. Replaced wholesale each poll
/// tick; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionArea {
    pub function_id: String,
    pub function_name: String,
    pub function_color: String,
    pub value: AreaValue,
}

/// In-memory panel state. Mutated only on the panel task: by poll ticks
/// (area list, rate default-fill) and by user edit commands.
pub struct PanelState {
    pub unit_system: UnitSystem,
    pub areas: Vec<FunctionArea>,
    pub settings: Settings,
}

impl PanelState {
    pub fn new(settings: Settings) -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            areas: Vec::new(),
            settings,
        }
    }
}
