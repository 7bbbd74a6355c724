//! Development pro-forma side panel for a building-design host: polls the
//! floor-area breakdown by function, applies user-set cost and revenue rates,
//! and derives hard/soft costs, contingency, total development cost, revenue,
//! net profit, and ROI.

pub mod format;
pub mod host;
pub mod logging;
pub mod panel;
pub mod proforma;
pub mod reconcile;
pub mod settings;
pub mod state;
pub mod units;
