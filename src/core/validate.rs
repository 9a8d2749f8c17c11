use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::PlanError;
use super::types::{Debt, StrategySettings};

const MAX_APR: Decimal = Decimal::ONE_HUNDRED;

/// Largest balance or funding amount the engine tracks (one quadrillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Fail-fast check run before simulation; the first offending record wins.
pub fn validate_inputs(debts: &[Debt], settings: &StrategySettings) -> Result<(), PlanError> {
    let mut seen = HashSet::with_capacity(debts.len());
    for debt in debts {
        if debt.id.trim().is_empty() {
            return Err(PlanError::EmptyDebtId);
        }
        if !seen.insert(debt.id.as_str()) {
            return Err(PlanError::DuplicateDebtId(debt.id.clone()));
        }
        if debt.balance < Decimal::ZERO {
            return Err(PlanError::NegativeBalance {
                id: debt.id.clone(),
                balance: debt.balance,
            });
        }
        if debt.apr < Decimal::ZERO || debt.apr > MAX_APR {
            return Err(PlanError::AprOutOfRange {
                id: debt.id.clone(),
                apr: debt.apr,
            });
        }
        if debt.minimum_payment < Decimal::ZERO {
            return Err(PlanError::NegativeMinimumPayment {
                id: debt.id.clone(),
                minimum: debt.minimum_payment,
            });
        }
        check_ceiling(|| format!("debt {:?} balance", debt.id), debt.balance)?;
        check_ceiling(
            || format!("debt {:?} minimum payment", debt.id),
            debt.minimum_payment,
        )?;
    }

    if settings.recurring_funding.amount < Decimal::ZERO {
        return Err(PlanError::NegativeRecurringFunding(
            settings.recurring_funding.amount,
        ));
    }
    check_ceiling(
        || "recurring funding".to_string(),
        settings.recurring_funding.amount,
    )?;
    for funding in &settings.one_time_fundings {
        if funding.amount < Decimal::ZERO {
            return Err(PlanError::NegativeOneTimeFunding {
                date: funding.date,
                amount: funding.amount,
            });
        }
        check_ceiling(
            || format!("one-time funding dated {}", funding.date),
            funding.amount,
        )?;
    }

    Ok(())
}

fn check_ceiling(field: impl FnOnce() -> String, amount: Decimal) -> Result<(), PlanError> {
    if amount > MAX_AMOUNT {
        return Err(PlanError::AmountTooLarge {
            field: field(),
            amount,
        });
    }
    Ok(())
}
