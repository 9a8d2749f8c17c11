use std::collections::HashMap;

use rust_decimal::Decimal;

use super::types::{Milestone, MonthEntry, PayoffStep};

#[derive(Debug, Default, Clone, Copy)]
struct PaidToDate {
    total: Decimal,
    interest: Decimal,
}

/// Folds the monthly ledger into payoff steps, one per month in which at
/// least one debt reached zero.
pub fn extract_steps(ledger: &[MonthEntry]) -> Vec<PayoffStep> {
    let mut paid = HashMap::<&str, PaidToDate>::new();
    let mut steps = Vec::new();

    for entry in ledger {
        let mut milestones = Vec::new();
        for payment in &entry.payments {
            let to_date = paid.entry(payment.debt_id.as_str()).or_default();
            to_date.total += payment.total;
            to_date.interest += payment.interest_paid;

            if payment.ending_balance.is_zero() {
                milestones.push(Milestone {
                    debt_id: payment.debt_id.clone(),
                    debt_name: payment.debt_name.clone(),
                    month: entry.month,
                    total_paid: to_date.total,
                    interest_paid: to_date.interest,
                });
            }
        }
        if !milestones.is_empty() {
            steps.push(PayoffStep {
                month: entry.month,
                milestones,
            });
        }
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::month::MonthKey;
    use crate::core::types::DebtPayment;
    use rust_decimal_macros::dec;

    fn paid(id: &str, total: Decimal, interest: Decimal, ending: Decimal) -> DebtPayment {
        DebtPayment {
            debt_id: id.to_string(),
            debt_name: id.to_uppercase(),
            starting_balance: ending + total - interest,
            interest,
            minimum: total,
            extra: Decimal::ZERO,
            total,
            principal: total - interest,
            interest_paid: interest,
            ending_balance: ending,
        }
    }

    fn entry(month: u32, payments: Vec<DebtPayment>) -> MonthEntry {
        MonthEntry {
            month: MonthKey::new(2027, month).expect("valid month"),
            total_paid: payments.iter().map(|p| p.total).sum(),
            total_interest: payments.iter().map(|p| p.interest).sum(),
            payments,
            one_time_funding: Decimal::ZERO,
            unallocated: Decimal::ZERO,
            shortfall: Decimal::ZERO,
        }
    }

    #[test]
    fn empty_ledger_has_no_steps() {
        assert!(extract_steps(&[]).is_empty());
    }

    #[test]
    fn milestone_carries_cumulative_totals() {
        let ledger = vec![
            entry(1, vec![paid("a", dec!(100), dec!(4), dec!(104))]),
            entry(2, vec![paid("a", dec!(100), dec!(2), dec!(6))]),
            entry(3, vec![paid("a", dec!(6.05), dec!(0.05), dec!(0))]),
        ];
        let steps = extract_steps(&ledger);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].month, MonthKey::new(2027, 3).expect("valid month"));

        let m = &steps[0].milestones[0];
        assert_eq!(m.debt_id, "a");
        assert_eq!(m.debt_name, "A");
        assert_eq!(m.total_paid, dec!(206.05));
        assert_eq!(m.interest_paid, dec!(6.05));
    }

    #[test]
    fn debts_clearing_together_share_one_step() {
        let ledger = vec![
            entry(
                1,
                vec![
                    paid("a", dec!(50), dec!(0), dec!(0)),
                    paid("b", dec!(50), dec!(0), dec!(10)),
                    paid("c", dec!(20), dec!(0), dec!(0)),
                ],
            ),
            entry(2, vec![paid("b", dec!(10), dec!(0), dec!(0))]),
        ];
        let steps = extract_steps(&ledger);
        assert_eq!(steps.len(), 2);
        let first_ids = steps[0]
            .milestones
            .iter()
            .map(|m| m.debt_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(first_ids, vec!["a", "c"]);
        assert_eq!(steps[1].milestones[0].debt_id, "b");
        assert_eq!(steps[1].milestones[0].total_paid, dec!(60));
    }
}
