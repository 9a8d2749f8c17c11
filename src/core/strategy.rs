use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::types::Strategy;

/// The fields a strategy ranks on.
#[derive(Copy, Clone, Debug)]
pub struct PriorityKey<'a> {
    pub id: &'a str,
    pub balance: Decimal,
    pub apr: Decimal,
}

/// `Less` means `a` receives extra funds before `b`.
pub fn compare(strategy: Strategy, a: &PriorityKey<'_>, b: &PriorityKey<'_>) -> Ordering {
    let primary = match strategy {
        Strategy::Avalanche => b.apr.cmp(&a.apr).then_with(|| b.balance.cmp(&a.balance)),
        Strategy::Snowball => a.balance.cmp(&b.balance).then_with(|| b.apr.cmp(&a.apr)),
    };
    primary.then_with(|| a.id.cmp(b.id))
}

/// Indices into `keys`, highest priority first.
pub fn priority_order(strategy: Strategy, keys: &[PriorityKey<'_>]) -> Vec<usize> {
    let mut order = (0..keys.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| compare(strategy, &keys[a], &keys[b]));
    order
}
