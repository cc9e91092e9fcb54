//! # lcep-algo: least-cost electrification engine
//!
//! Every settlement flows once through four stages:
//!
//! | Stage | Entry point | Output |
//! |-------|-------------|--------|
//! | Tier Classifier | [`classify`] | urban flag, MTF tier |
//! | Demand Estimator | [`project`] | [`lcep_core::DemandProfile`] |
//! | Technology Costing | [`cost_grid`], [`cost_minigrid`], [`cost_shs`] | one [`lcep_core::TechnologyCostResult`] each |
//! | Least-Cost Selector | [`select`] | [`lcep_core::SettlementResult`] |
//!
//! [`plan_settlement`] chains them; [`plan_all`] maps the chain over a
//! dataset, in parallel with the default `parallel` feature.
//!
//! ## Levelized cost
//!
//! All three technologies annualize capital with the capital recovery factor
//!
//! ```text
//! CRF(r, n) = r (1 + r)^n / ((1 + r)^n - 1)
//! LCOE      = annualized cost / energy delivered per year
//! ```
//!
//! and LCOE exists only when energy is delivered; otherwise the candidate
//! is ineligible.

pub mod costing;
pub mod demand;
pub mod finance;
pub mod pipeline;
pub mod select;
pub mod summary;
pub mod tier;

pub use costing::{cost_all, cost_grid, cost_minigrid, cost_shs, Candidates, ShsGate};
pub use demand::{project, project_to};
pub use finance::{annualize, capital_recovery_factor};
pub use pipeline::{plan_all, plan_settlement, PlanOutcome, Rejection};
pub use select::select;
pub use summary::{PlanSummary, TechnologyTotals};
pub use tier::classify;
