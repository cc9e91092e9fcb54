//! # lcep-core: data model for least-cost electrification planning
//!
//! Holds everything the planning stages share but none of the planning
//! logic itself:
//!
//! - [`SettlementInput`] - one settlement as read from a dataset
//! - [`DemandProfile`], [`TechnologyCostResult`], [`SettlementResult`] - the
//!   records each stage hands to the next
//! - [`PlanningConfig`] - the immutable parameter bundle threaded through
//!   every stage, with Benin defaults and validation
//! - [`units`] - kWh / kW / kVA / USD newtypes
//! - [`LcepError`] - the error taxonomy
//! - [`diagnostics`] - row-level warnings for dataset readers
//!
//! The algorithms live in `lcep-algo`; file formats in `lcep-io` and
//! `lcep-scenarios`.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod settlement;
pub mod units;

pub use config::{
    AnchorParams, AnchorRule, AnchorScaling, AnchorTrigger, ClassificationParams, GridParams,
    MiniGridParams, PlanningConfig, PlanningParams, Rounding, ScalingBasis, ShsKit, ShsParams,
    TierTable, UrbanRule,
};
pub use diagnostics::{Diagnostics, ImportIssue, IssueKind, Severity};
pub use error::{LcepError, LcepResult};
pub use model::{
    AnchorCategory, AnchorContribution, AnchorKind, Classification, ConnectionPoint, CostDetail,
    DemandProfile, SettlementPlan, SettlementResult, Technology, TechnologyCostResult, Tier,
};
pub use settlement::SettlementInput;
pub use units::{KilovoltAmperes, KilowattHours, Kilowatts, Usd, UsdPerKwh};
