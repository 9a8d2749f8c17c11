mod engine;
mod error;
mod interest;
mod milestones;
mod month;
mod strategy;
mod summary;
mod types;
mod validate;

pub use engine::{MAX_SIMULATION_MONTHS, simulate, simulate_with};
pub use error::PlanError;
pub use interest::{monthly_interest, round_currency};
pub use milestones::extract_steps;
pub use month::{MonthKey, ParseMonthKeyError};
pub use strategy::{PriorityKey, compare, priority_order};
pub use summary::{
    DebtPayoff, PlanSummary, PortfolioSummary, StrategyComparison, balance_series,
    compare_strategies,
};
pub use types::{
    AppliedFunding, Debt, DebtPayment, Milestone, MonthEntry, OneTimeFunding, PayoffPlan,
    PayoffStep, PlanStatus, RecurringFunding, SimulationOptions, Strategy, StrategySettings,
};
pub use validate::{MAX_AMOUNT, validate_inputs};
