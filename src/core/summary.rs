use rust_decimal::Decimal;
use serde::Serialize;

use super::engine::simulate_with;
use super::error::PlanError;
use super::interest::round_currency;
use super::month::MonthKey;
use super::types::{Debt, PayoffPlan, PlanStatus, SimulationOptions, Strategy, StrategySettings};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub debt_count: usize,
    pub total_balance: Decimal,
    pub total_minimum_payment: Decimal,
    /// Balance-weighted APR across debts with a positive balance.
    pub weighted_apr: Decimal,
    pub total_credit_limit: Option<Decimal>,
    /// Percent of combined credit limit in use, over debts that carry a limit.
    pub utilization: Option<Decimal>,
}

impl PortfolioSummary {
    pub fn from_debts(debts: &[Debt]) -> Self {
        let open = debts
            .iter()
            .filter(|d| d.balance > Decimal::ZERO)
            .collect::<Vec<_>>();
        let total_balance = open.iter().map(|d| d.balance).sum::<Decimal>();
        let total_minimum_payment = open.iter().map(|d| d.minimum_payment).sum::<Decimal>();
        let weighted_apr = if total_balance.is_zero() {
            Decimal::ZERO
        } else {
            let weighted = open.iter().map(|d| d.balance * d.apr).sum::<Decimal>();
            round_currency(weighted / total_balance)
        };

        let limited = debts
            .iter()
            .filter_map(|d| d.credit_limit.map(|limit| (d.balance, limit)))
            .collect::<Vec<_>>();
        let total_credit_limit =
            (!limited.is_empty()).then(|| limited.iter().map(|(_, limit)| *limit).sum::<Decimal>());
        let utilization = total_credit_limit
            .filter(|limit| *limit > Decimal::ZERO)
            .map(|limit| {
                let used = limited.iter().map(|(balance, _)| *balance).sum::<Decimal>();
                round_currency(used * Decimal::ONE_HUNDRED / limit)
            });

        Self {
            debt_count: open.len(),
            total_balance,
            total_minimum_payment,
            weighted_apr,
            total_credit_limit,
            utilization,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoff {
    pub debt_id: String,
    pub debt_name: String,
    pub month: MonthKey,
    pub months_from_start: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub strategy: Strategy,
    pub status: PlanStatus,
    pub debt_free_date: Option<MonthKey>,
    pub months_to_debt_free: Option<u32>,
    pub months_underfunded: u32,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
    pub payoff_order: Vec<DebtPayoff>,
}

impl PlanSummary {
    pub fn from_plan(plan: &PayoffPlan) -> Self {
        let months_from_start =
            |month: MonthKey| plan.start_month.months_until(month).max(0) as u32 + 1;
        Self {
            strategy: plan.strategy,
            status: plan.status.clone(),
            debt_free_date: plan.debt_free_date,
            months_to_debt_free: plan.debt_free_date.map(months_from_start),
            months_underfunded: plan.months_underfunded,
            total_paid: plan.total_paid,
            total_interest: plan.total_interest,
            payoff_order: plan
                .milestones()
                .map(|m| DebtPayoff {
                    debt_id: m.debt_id.clone(),
                    debt_name: m.debt_name.clone(),
                    month: m.month,
                    months_from_start: months_from_start(m.month),
                })
                .collect(),
        }
    }
}

/// Month-end balance of one debt, for timeline charts. Ends at the payoff
/// month; empty for unknown or already-cleared debts.
pub fn balance_series(plan: &PayoffPlan, debt_id: &str) -> Vec<(MonthKey, Decimal)> {
    plan.monthly_breakdown
        .iter()
        .filter_map(|entry| {
            entry
                .payments
                .iter()
                .find(|p| p.debt_id == debt_id)
                .map(|p| (entry.month, p.ending_balance))
        })
        .collect()
}

/// Both strategies over the same inputs, side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    pub portfolio: PortfolioSummary,
    pub avalanche: PlanSummary,
    pub snowball: PlanSummary,
    /// Snowball interest minus avalanche interest.
    pub interest_difference: Decimal,
    /// Snowball duration minus avalanche duration, when both converge.
    pub months_difference: Option<i64>,
}

pub fn compare_strategies(
    debts: &[Debt],
    settings: &StrategySettings,
    options: SimulationOptions,
) -> Result<StrategyComparison, PlanError> {
    let run = |strategy: Strategy| {
        let settings = StrategySettings {
            strategy,
            ..settings.clone()
        };
        simulate_with(debts, &settings, options).map(|plan| PlanSummary::from_plan(&plan))
    };
    let avalanche = run(Strategy::Avalanche)?;
    let snowball = run(Strategy::Snowball)?;

    let months_difference = avalanche
        .months_to_debt_free
        .zip(snowball.months_to_debt_free)
        .map(|(a, s)| s as i64 - a as i64);

    Ok(StrategyComparison {
        portfolio: PortfolioSummary::from_debts(debts),
        interest_difference: snowball.total_interest - avalanche.total_interest,
        months_difference,
        avalanche,
        snowball,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RecurringFunding;
    use rust_decimal_macros::dec;

    fn debt(id: &str, balance: Decimal, apr: Decimal, minimum: Decimal) -> Debt {
        Debt {
            id: id.to_string(),
            name: id.to_string(),
            balance,
            apr,
            minimum_payment: minimum,
            due_day: None,
            credit_limit: None,
        }
    }

    fn options() -> SimulationOptions {
        SimulationOptions::starting(MonthKey::new(2026, 10).expect("valid month"))
    }

    fn funded(amount: Decimal) -> StrategySettings {
        StrategySettings {
            strategy: Strategy::Avalanche,
            recurring_funding: RecurringFunding {
                amount,
                day_of_month: None,
            },
            one_time_fundings: Vec::new(),
        }
    }

    #[test]
    fn portfolio_summary_weights_apr_by_balance() {
        let debts = vec![
            debt("a", dec!(1000), dec!(20), dec!(50)),
            debt("b", dec!(3000), dec!(10), dec!(75)),
            debt("closed", dec!(0), dec!(99), dec!(40)),
        ];
        let summary = PortfolioSummary::from_debts(&debts);
        assert_eq!(summary.debt_count, 2);
        assert_eq!(summary.total_balance, dec!(4000));
        assert_eq!(summary.total_minimum_payment, dec!(125));
        assert_eq!(summary.weighted_apr, dec!(12.5));
        assert_eq!(summary.total_credit_limit, None);
        assert_eq!(summary.utilization, None);
    }

    #[test]
    fn utilization_only_counts_debts_with_limits() {
        let mut card = debt("card", dec!(1500), dec!(24), dec!(40));
        card.credit_limit = Some(dec!(5000));
        let mut store = debt("store", dec!(500), dec!(26), dec!(25));
        store.credit_limit = Some(dec!(1000));
        let loan = debt("loan", dec!(9000), dec!(7), dec!(200));

        let summary = PortfolioSummary::from_debts(&[card, store, loan]);
        assert_eq!(summary.total_credit_limit, Some(dec!(6000)));
        assert_eq!(summary.utilization, Some(dec!(33.33)));
    }

    #[test]
    fn empty_portfolio_is_all_zero() {
        let summary = PortfolioSummary::from_debts(&[]);
        assert_eq!(summary.debt_count, 0);
        assert_eq!(summary.weighted_apr, dec!(0));
    }

    #[test]
    fn plan_summary_counts_months_inclusively() {
        let debts = vec![
            debt("a", dec!(300), dec!(0), dec!(100)),
            debt("b", dec!(600), dec!(0), dec!(100)),
        ];
        let settings = StrategySettings {
            strategy: Strategy::Snowball,
            ..funded(dec!(300))
        };
        let plan = simulate_with(&debts, &settings, options()).expect("valid");
        let summary = PlanSummary::from_plan(&plan);

        assert_eq!(summary.months_to_debt_free, Some(3));
        assert_eq!(summary.months_underfunded, 0);
        assert_eq!(summary.payoff_order[0].debt_id, "a");
        assert_eq!(summary.payoff_order[0].months_from_start, 2);
        assert_eq!(summary.payoff_order[1].debt_id, "b");
        assert_eq!(summary.total_paid, dec!(900));
    }

    #[test]
    fn balance_series_tracks_one_debt_to_zero() {
        let debts = vec![debt("a", dec!(250), dec!(0), dec!(100))];
        let plan = simulate_with(&debts, &funded(dec!(100)), options()).expect("valid");
        let series = balance_series(&plan, "a")
            .into_iter()
            .map(|(_, balance)| balance)
            .collect::<Vec<_>>();
        assert_eq!(series, vec![dec!(150), dec!(50), dec!(0)]);
        assert!(balance_series(&plan, "missing").is_empty());
    }

    #[test]
    fn comparison_reports_both_strategies() {
        let debts = vec![
            debt("x", dec!(1000), dec!(20), dec!(50)),
            debt("y", dec!(500), dec!(5), dec!(25)),
        ];
        let comparison = compare_strategies(&debts, &funded(dec!(100)), options()).expect("valid");
        assert_eq!(comparison.avalanche.strategy, Strategy::Avalanche);
        assert_eq!(comparison.snowball.strategy, Strategy::Snowball);
        assert!(comparison.interest_difference >= Decimal::ZERO);
        assert!(comparison.months_difference.is_some());
        assert_eq!(comparison.portfolio.total_balance, dec!(1500));
    }

    #[test]
    fn comparison_propagates_validation_errors() {
        let debts = vec![debt("x", dec!(100), dec!(150), dec!(50))];
        assert!(matches!(
            compare_strategies(&debts, &funded(dec!(100)), options()),
            Err(PlanError::AprOutOfRange { .. })
        ));
    }
}
