//! Panel lifecycle: settings load, the startup unit query, the poll loop,
//! and user edit handling. Everything that mutates state runs on the panel
//! task, so ticks and edits never interleave mid-computation.

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::format;
use crate::host::Host;
use crate::logging::{log, obj, v_bool, v_num, v_str, Domain, Level};
use crate::proforma::{self, Features, ProForma};
use crate::reconcile;
use crate::settings::{Settings, SettingsStore};
use crate::state::{Config, FunctionArea, PanelState, UNSPECIFIED_FUNCTION};
use crate::units::{self, UnitSystem};

/// User edits arriving from the input widgets. Rate edits carry the raw
/// input text in display units; parsing and unit conversion happen here so
/// a non-numeric edit can be dropped without touching state.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    SetCostRate { function_id: String, input: String },
    SetRevenueRate { function_id: String, input: String },
    SetSoftCostPercent(f64),
    SetContingencyPercent(f64),
    SetCurrencySymbol(String),
    SetLandCost(f64),
    SetEarthworkCost(f64),
    Shutdown,
}

/// One row of the function list as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRow {
    pub function_id: String,
    pub name: String,
    pub color: String,
    /// Area in the display unit, grouped, with suffix: "1,000 m²".
    pub area_label: String,
    /// Rate input values in the display unit (imperial display rounds;
    /// the stored canonical rate never does).
    pub cost_rate_input: f64,
    pub revenue_rate_input: f64,
}

/// The formatted summary block.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub hard_cost: String,
    pub soft_costs: String,
    pub contingency: String,
    pub total_development_cost: String,
    pub total_revenue: String,
    pub net_profit: String,
    pub roi: String,
    pub soft_cost_percent: f64,
    pub contingency_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub unit_system: UnitSystem,
    pub rows: Vec<FunctionRow>,
    pub summary: SummaryView,
}

pub struct Panel {
    cfg: Config,
    features: Features,
    host: Box<dyn Host>,
    store: SettingsStore,
    state: PanelState,
    last_summary: Option<ProForma>,
}

impl Panel {
    pub fn new(cfg: Config, host: Box<dyn Host>, store: SettingsStore) -> Self {
        let mut settings = Settings::default();
        settings.apply(store.load());
        let features = Features {
            revenue: cfg.revenue_enabled,
            site_costs: cfg.site_costs_enabled,
        };
        Self {
            cfg,
            features,
            host,
            store,
            state: PanelState::new(settings),
            last_summary: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn areas(&self) -> &[FunctionArea] {
        &self.state.areas
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.state.unit_system
    }

    /// One-shot unit-preference query. On failure the metric default stands.
    pub async fn startup(&mut self) {
        match self.host.fetch_unit_system().await {
            Ok(unit_system) => self.state.unit_system = unit_system,
            Err(err) => log(
                Level::Warn,
                Domain::Host,
                "unit_system_fetch_failed",
                obj(&[("error", v_str(&err.to_string()))]),
            ),
        }
    }

    /// A single poll tick. A failed host call leaves prior state untouched;
    /// the next tick retries on schedule.
    pub async fn poll_tick(&mut self) {
        if self.cfg.repoll_units {
            if let Ok(unit_system) = self.host.fetch_unit_system().await {
                self.state.unit_system = unit_system;
            }
        }

        let breakdown = match self.host.fetch_area_breakdown().await {
            Ok(breakdown) => breakdown,
            Err(err) => {
                log(
                    Level::Warn,
                    Domain::Host,
                    "area_fetch_failed",
                    obj(&[("error", v_str(&err.to_string()))]),
                );
                return;
            }
        };

        self.state.areas = breakdown
            .into_iter()
            .filter(|metric| metric.function_id != UNSPECIFIED_FUNCTION)
            .collect();

        // The new list must be installed before the maps are reconciled, and
        // both maps reconciled before the summary is authoritative.
        let ids: Vec<String> = self
            .state
            .areas
            .iter()
            .map(|metric| metric.function_id.clone())
            .collect();

        let mut filled = false;
        let costs = reconcile::reconcile(&self.state.settings.cost_per_sqm_per_function, &ids);
        filled |= costs.len() != self.state.settings.cost_per_sqm_per_function.len();
        self.state.settings.cost_per_sqm_per_function = costs;

        if self.features.revenue {
            let revenues =
                reconcile::reconcile(&self.state.settings.revenue_per_sqm_per_function, &ids);
            filled |= revenues.len() != self.state.settings.revenue_per_sqm_per_function.len();
            self.state.settings.revenue_per_sqm_per_function = revenues;
        }

        if filled {
            self.persist();
        }
        self.log_summary_if_changed();
    }

    /// Applies a user edit. Rate inputs that do not parse as a non-negative
    /// finite number are dropped without touching state.
    pub fn apply(&mut self, cmd: PanelCommand) {
        let unit_system = self.state.unit_system;
        let settings = &mut self.state.settings;
        match cmd {
            PanelCommand::SetCostRate { function_id, input } => {
                let Some(rate) = parse_rate(&input) else {
                    log(
                        Level::Debug,
                        Domain::Panel,
                        "rate_input_ignored",
                        obj(&[("function_id", v_str(&function_id)), ("input", v_str(&input))]),
                    );
                    return;
                };
                let canonical = units::from_display(rate, unit_system);
                settings.cost_per_sqm_per_function.insert(function_id, canonical);
            }
            PanelCommand::SetRevenueRate { function_id, input } => {
                let Some(rate) = parse_rate(&input) else {
                    log(
                        Level::Debug,
                        Domain::Panel,
                        "rate_input_ignored",
                        obj(&[("function_id", v_str(&function_id)), ("input", v_str(&input))]),
                    );
                    return;
                };
                let canonical = units::from_display(rate, unit_system);
                settings.revenue_per_sqm_per_function.insert(function_id, canonical);
            }
            PanelCommand::SetSoftCostPercent(value) => settings.soft_cost_percent = value,
            PanelCommand::SetContingencyPercent(value) => settings.contingency_percent = value,
            PanelCommand::SetCurrencySymbol(symbol) => settings.currency_symbol = symbol,
            PanelCommand::SetLandCost(value) => settings.land_cost = value,
            PanelCommand::SetEarthworkCost(value) => settings.earthwork_cost = value,
            // Handled by the run loop; a stray one changes nothing.
            PanelCommand::Shutdown => return,
        }
        self.persist();
        self.log_summary_if_changed();
    }

    pub fn summary(&self) -> ProForma {
        proforma::derive(&self.state.areas, &self.state.settings, self.features)
    }

    pub fn view(&self) -> PanelView {
        let unit_system = self.state.unit_system;
        let settings = &self.state.settings;
        let rows = self
            .state
            .areas
            .iter()
            .map(|metric| {
                let area_display = units::to_display(metric.value.sqm(), unit_system);
                FunctionRow {
                    function_id: metric.function_id.clone(),
                    name: metric.function_name.clone(),
                    color: metric.function_color.clone(),
                    area_label: format!(
                        "{} {}",
                        format::money(area_display, ""),
                        unit_system.area_suffix()
                    ),
                    cost_rate_input: rate_input(
                        &settings.cost_per_sqm_per_function,
                        &metric.function_id,
                        unit_system,
                    ),
                    revenue_rate_input: rate_input(
                        &settings.revenue_per_sqm_per_function,
                        &metric.function_id,
                        unit_system,
                    ),
                }
            })
            .collect();

        let summary = self.summary();
        let symbol = settings.currency_symbol.as_str();
        PanelView {
            unit_system,
            rows,
            summary: SummaryView {
                hard_cost: format::money(summary.hard_cost, symbol),
                soft_costs: format::money(summary.soft_costs, symbol),
                contingency: format::money(summary.contingency, symbol),
                total_development_cost: format::money(summary.total_development_cost, symbol),
                total_revenue: format::money(summary.total_revenue, symbol),
                net_profit: format::money(summary.net_profit, symbol),
                roi: format::percent(summary.roi_percent),
                soft_cost_percent: settings.soft_cost_percent,
                contingency_percent: settings.contingency_percent,
            },
        }
    }

    /// Runs until a Shutdown command arrives or the command channel closes.
    /// The interval lives inside this loop, so no tick can fire after it
    /// returns.
    pub async fn run(mut self, mut commands: mpsc::Receiver<PanelCommand>) {
        self.startup().await;
        log(
            Level::Info,
            Domain::System,
            "panel_started",
            obj(&[
                ("imperial", v_bool(self.state.unit_system.is_imperial())),
                ("poll_interval_ms", v_num(self.cfg.poll_interval_ms as f64)),
                ("revenue", v_bool(self.features.revenue)),
                ("site_costs", v_bool(self.features.site_costs)),
            ]),
        );
        let mut ticker = interval(Duration::from_millis(self.cfg.poll_interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_tick().await,
                cmd = commands.recv() => match cmd {
                    Some(PanelCommand::Shutdown) | None => break,
                    Some(cmd) => self.apply(cmd),
                },
            }
        }
        log(Level::Info, Domain::System, "panel_stopped", obj(&[]));
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.state.settings) {
            log(
                Level::Warn,
                Domain::Settings,
                "save_failed",
                obj(&[("error", v_str(&err.to_string()))]),
            );
        }
    }

    fn log_summary_if_changed(&mut self) {
        let summary = self.summary();
        if self.last_summary.as_ref() == Some(&summary) {
            return;
        }
        log(
            Level::Info,
            Domain::Calc,
            "summary",
            obj(&[
                ("hard_cost", v_num(summary.hard_cost)),
                ("soft_costs", v_num(summary.soft_costs)),
                ("contingency", v_num(summary.contingency)),
                ("total_development_cost", v_num(summary.total_development_cost)),
                ("total_revenue", v_num(summary.total_revenue)),
                ("net_profit", v_num(summary.net_profit)),
                ("roi_percent", v_num(summary.roi_percent)),
            ]),
        );
        self.last_summary = Some(summary);
    }
}

fn rate_input(map: &std::collections::HashMap<String, f64>, id: &str, unit_system: UnitSystem) -> f64 {
    let display = units::to_display(map.get(id).copied().unwrap_or(0.0), unit_system);
    if unit_system.is_imperial() {
        display.round()
    } else {
        display
    }
}

fn parse_rate(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}
