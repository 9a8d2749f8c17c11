use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::month::MonthKey;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Avalanche,
    Snowball,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub balance: Decimal,
    pub apr: Decimal,
    pub minimum_payment: Decimal,
    #[serde(default)]
    pub due_day: Option<u32>,
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringFunding {
    pub amount: Decimal,
    #[serde(default)]
    pub day_of_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeFunding {
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySettings {
    #[serde(default)]
    pub strategy: Strategy,
    pub recurring_funding: RecurringFunding,
    #[serde(default)]
    pub one_time_fundings: Vec<OneTimeFunding>,
}

/// Start month and iteration bound for one simulation pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SimulationOptions {
    pub start: MonthKey,
    pub max_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayment {
    pub debt_id: String,
    pub debt_name: String,
    pub starting_balance: Decimal,
    pub interest: Decimal,
    pub minimum: Decimal,
    pub extra: Decimal,
    pub total: Decimal,
    pub principal: Decimal,
    pub interest_paid: Decimal,
    pub ending_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEntry {
    pub month: MonthKey,
    pub payments: Vec<DebtPayment>,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
    pub one_time_funding: Decimal,
    pub unallocated: Decimal,
    pub shortfall: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub debt_id: String,
    pub debt_name: String,
    pub month: MonthKey,
    pub total_paid: Decimal,
    pub interest_paid: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffStep {
    pub month: MonthKey,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFunding {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub is_applied: bool,
    pub applied_month: Option<MonthKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlanStatus {
    NoDebts,
    DebtFree,
    /// Hit the iteration bound after at least one month whose funds fell
    /// short of the minimums; `month` and `shortfall` describe the first.
    #[serde(rename_all = "camelCase")]
    Underfunded {
        month: MonthKey,
        shortfall: Decimal,
    },
    IterationLimit,
    /// A balance grew past the largest tracked amount in `month`.
    Diverged { month: MonthKey },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffPlan {
    pub strategy: Strategy,
    pub start_month: MonthKey,
    pub status: PlanStatus,
    pub monthly_breakdown: Vec<MonthEntry>,
    pub steps: Vec<PayoffStep>,
    pub debt_free_date: Option<MonthKey>,
    pub total_interest: Decimal,
    pub total_paid: Decimal,
    pub months_underfunded: u32,
    pub one_time_fundings: Vec<AppliedFunding>,
}

impl PayoffPlan {
    pub fn converged(&self) -> bool {
        self.debt_free_date.is_some()
    }

    pub fn month_count(&self) -> usize {
        self.monthly_breakdown.len()
    }

    pub fn milestones(&self) -> impl Iterator<Item = &Milestone> {
        self.steps.iter().flat_map(|step| step.milestones.iter())
    }

    pub fn milestone_for(&self, debt_id: &str) -> Option<&Milestone> {
        self.milestones().find(|m| m.debt_id == debt_id)
    }
}
