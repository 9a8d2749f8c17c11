use rust_decimal::Decimal;
use tracing::debug;

use super::error::PlanError;
use super::interest::monthly_interest;
use super::milestones::extract_steps;
use super::month::MonthKey;
use super::strategy::{PriorityKey, priority_order};
use super::types::{
    AppliedFunding, Debt, DebtPayment, MonthEntry, OneTimeFunding, PayoffPlan, PlanStatus,
    SimulationOptions, StrategySettings,
};
use super::validate::{MAX_AMOUNT, validate_inputs};

/// Fifty years of monthly steps.
pub const MAX_SIMULATION_MONTHS: u32 = 600;

#[derive(Debug)]
struct ActiveDebt<'a> {
    debt: &'a Debt,
    balance: Decimal,
}

#[derive(Debug, Clone, Copy)]
struct MonthDue {
    interest: Decimal,
    owed: Decimal,
    minimum: Decimal,
}

#[derive(Debug)]
struct FundingUse<'a> {
    funding: &'a OneTimeFunding,
    month: MonthKey,
    applied_month: Option<MonthKey>,
}

impl FundingUse<'_> {
    fn report(&self) -> AppliedFunding {
        AppliedFunding {
            amount: self.funding.amount,
            date: self.funding.date,
            is_applied: self.applied_month.is_some(),
            applied_month: self.applied_month,
        }
    }
}

impl SimulationOptions {
    pub fn starting(start: MonthKey) -> Self {
        Self {
            start,
            max_months: MAX_SIMULATION_MONTHS,
        }
    }
}

pub fn simulate(debts: &[Debt], settings: &StrategySettings) -> Result<PayoffPlan, PlanError> {
    simulate_with(
        debts,
        settings,
        SimulationOptions::starting(MonthKey::current()),
    )
}

pub fn simulate_with(
    debts: &[Debt],
    settings: &StrategySettings,
    options: SimulationOptions,
) -> Result<PayoffPlan, PlanError> {
    if options.max_months == 0 {
        return Err(PlanError::ZeroIterationBound);
    }
    validate_inputs(debts, settings)?;

    let mut active = debts
        .iter()
        .filter(|debt| debt.balance > Decimal::ZERO)
        .map(|debt| ActiveDebt {
            debt,
            balance: debt.balance,
        })
        .collect::<Vec<_>>();
    let mut fundings = settings
        .one_time_fundings
        .iter()
        .map(|funding| FundingUse {
            funding,
            month: MonthKey::from_date(funding.date),
            applied_month: None,
        })
        .collect::<Vec<_>>();

    let mut ledger = Vec::new();
    let mut month = options.start;
    let mut first_shortfall = None;
    let mut months_underfunded = 0u32;
    let mut status = if active.is_empty() {
        PlanStatus::NoDebts
    } else {
        PlanStatus::IterationLimit
    };

    while !active.is_empty() && ledger.len() < options.max_months as usize {
        let entry = simulate_month(month, &mut active, settings, &mut fundings);
        active.retain(|debt| debt.balance > Decimal::ZERO);
        if entry.shortfall > Decimal::ZERO {
            months_underfunded += 1;
            first_shortfall.get_or_insert((month, entry.shortfall));
        }
        ledger.push(entry);

        if active.is_empty() {
            status = PlanStatus::DebtFree;
            break;
        }
        // Inputs are capped at MAX_AMOUNT, so every month starts below it.
        if active.iter().any(|debt| debt.balance > MAX_AMOUNT) {
            status = PlanStatus::Diverged { month };
            break;
        }
        month = month.next();
    }

    // A plan that runs out of months after any short month reports the first one.
    if let Some((month, shortfall)) =
        first_shortfall.filter(|_| status == PlanStatus::IterationLimit)
    {
        status = PlanStatus::Underfunded { month, shortfall };
    }

    let debt_free_date = match status {
        PlanStatus::DebtFree => ledger.last().map(|entry| entry.month),
        _ => None,
    };
    let total_interest = ledger.iter().map(|entry| entry.total_interest).sum();
    let total_paid = ledger.iter().map(|entry| entry.total_paid).sum();

    debug!(
        debts = debts.len(),
        strategy = ?settings.strategy,
        status = ?status,
        months = ledger.len(),
        months_underfunded,
        "payoff simulation finished"
    );

    Ok(PayoffPlan {
        strategy: settings.strategy,
        start_month: options.start,
        status,
        steps: extract_steps(&ledger),
        monthly_breakdown: ledger,
        debt_free_date,
        total_interest,
        total_paid,
        months_underfunded,
        one_time_fundings: fundings.iter().map(FundingUse::report).collect(),
    })
}

fn simulate_month(
    month: MonthKey,
    active: &mut [ActiveDebt<'_>],
    settings: &StrategySettings,
    fundings: &mut [FundingUse<'_>],
) -> MonthEntry {
    let mut one_time_funding = Decimal::ZERO;
    for funding in fundings.iter_mut().filter(|f| f.month == month) {
        funding.applied_month = Some(month);
        one_time_funding += funding.funding.amount;
    }

    let order = {
        let keys = active
            .iter()
            .map(|debt| PriorityKey {
                id: debt.debt.id.as_str(),
                balance: debt.balance,
                apr: debt.debt.apr,
            })
            .collect::<Vec<_>>();
        priority_order(settings.strategy, &keys)
    };

    let dues = active
        .iter()
        .map(|debt| {
            let interest = monthly_interest(debt.balance, debt.debt.apr);
            let owed = debt.balance + interest;
            MonthDue {
                interest,
                owed,
                minimum: debt.debt.minimum_payment.min(owed),
            }
        })
        .collect::<Vec<_>>();

    let available = settings.recurring_funding.amount + one_time_funding;
    let required = dues.iter().map(|due| due.minimum).sum::<Decimal>();

    let mut minimum_paid = vec![Decimal::ZERO; active.len()];
    let mut extra_paid = vec![Decimal::ZERO; active.len()];
    let mut shortfall = Decimal::ZERO;
    let mut pool = Decimal::ZERO;

    if available >= required {
        for (paid, due) in minimum_paid.iter_mut().zip(&dues) {
            *paid = due.minimum;
        }
        pool = available - required;
    } else {
        // Minimums are honoured in strategy order until the money runs out.
        let mut remaining = available;
        for &idx in &order {
            let pay = dues[idx].minimum.min(remaining);
            minimum_paid[idx] = pay;
            remaining -= pay;
        }
        shortfall = required - available;
    }

    for &idx in &order {
        if pool <= Decimal::ZERO {
            break;
        }
        let extra = (dues[idx].owed - minimum_paid[idx]).min(pool);
        extra_paid[idx] = extra;
        pool -= extra;
    }

    let mut payments = Vec::with_capacity(active.len());
    for (idx, debt) in active.iter_mut().enumerate() {
        let due = dues[idx];
        let total = minimum_paid[idx] + extra_paid[idx];
        let interest_paid = total.min(due.interest);
        let starting_balance = debt.balance;
        debt.balance = due.owed - total;

        payments.push(DebtPayment {
            debt_id: debt.debt.id.clone(),
            debt_name: debt.debt.name.clone(),
            starting_balance,
            interest: due.interest,
            minimum: minimum_paid[idx],
            extra: extra_paid[idx],
            total,
            principal: total - interest_paid,
            interest_paid,
            ending_balance: debt.balance,
        });
    }

    MonthEntry {
        month,
        total_paid: payments.iter().map(|p| p.total).sum(),
        total_interest: payments.iter().map(|p| p.interest).sum(),
        payments,
        one_time_funding,
        unallocated: pool,
        shortfall,
    }
}
