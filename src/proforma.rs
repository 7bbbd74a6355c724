//! Pro-forma derivation: a pure recomputation from the area breakdown and
//! the current settings. All math is in canonical units (currency × m²);
//! display conversion never happens here.

use crate::settings::Settings;
use crate::state::FunctionArea;

/// Optional engine features. The cost-only panel variant disables both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub revenue: bool,
    pub site_costs: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self { revenue: true, site_costs: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLine {
    pub function_id: String,
    pub cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProForma {
    pub lines: Vec<FunctionLine>,
    pub hard_cost: f64,
    pub soft_costs: f64,
    pub contingency: f64,
    pub total_development_cost: f64,
    pub total_revenue: f64,
    pub net_profit: f64,
    pub roi_percent: f64,
}

pub fn derive(areas: &[FunctionArea], settings: &Settings, features: Features) -> ProForma {
    let mut lines = Vec::with_capacity(areas.len());
    let mut function_costs = 0.0;
    let mut total_revenue = 0.0;

    for metric in areas {
        let sqm = metric.value.sqm();
        let cost_rate = settings
            .cost_per_sqm_per_function
            .get(&metric.function_id)
            .copied()
            .unwrap_or(0.0);
        let cost = sqm * cost_rate;
        let revenue = if features.revenue {
            let rate = settings
                .revenue_per_sqm_per_function
                .get(&metric.function_id)
                .copied()
                .unwrap_or(0.0);
            sqm * rate
        } else {
            0.0
        };
        function_costs += cost;
        total_revenue += revenue;
        lines.push(FunctionLine {
            function_id: metric.function_id.clone(),
            cost,
            revenue,
        });
    }

    let site_costs = if features.site_costs {
        settings.land_cost + settings.earthwork_cost
    } else {
        0.0
    };
    let hard_cost = function_costs + site_costs;
    let soft_costs = hard_cost * (settings.soft_cost_percent / 100.0);
    let contingency = hard_cost * (settings.contingency_percent / 100.0);
    let total_development_cost = hard_cost + soft_costs + contingency;
    let net_profit = total_revenue - total_development_cost;
    // Guard: an empty design must read as 0% ROI, not NaN.
    let roi_percent = if total_development_cost == 0.0 {
        0.0
    } else {
        net_profit / total_development_cost * 100.0
    };

    ProForma {
        lines,
        hard_cost,
        soft_costs,
        contingency,
        total_development_cost,
        total_revenue,
        net_profit,
        roi_percent,
    }
}
