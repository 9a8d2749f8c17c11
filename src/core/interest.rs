use rust_decimal::{Decimal, RoundingStrategy};

const CENT_PLACES: u32 = 2;
const MONTHS_PER_YEAR: u32 = 12;

/// Rounds to the cent, halves away from zero (half-up for the non-negative
/// amounts the engine works with).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// One month of simple interest at `apr` percent, rounded to the cent.
pub fn monthly_interest(balance: Decimal, apr: Decimal) -> Decimal {
    if balance <= Decimal::ZERO || apr.is_zero() {
        return Decimal::ZERO;
    }
    round_currency(balance * apr / rate_divisor())
}

fn rate_divisor() -> Decimal {
    Decimal::ONE_HUNDRED * Decimal::from(MONTHS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_apr_accrues_nothing() {
        assert_eq!(monthly_interest(dec!(1200), dec!(0)), dec!(0));
    }

    #[test]
    fn zero_balance_accrues_nothing() {
        assert_eq!(monthly_interest(dec!(0), dec!(24.99)), dec!(0));
    }

    #[test]
    fn rounds_to_the_cent() {
        // 1000 * 20 / 1200 = 16.666...
        assert_eq!(monthly_interest(dec!(1000), dec!(20)), dec!(16.67));
        // 500 * 5 / 1200 = 2.0833...
        assert_eq!(monthly_interest(dec!(500), dec!(5)), dec!(2.08));
    }

    #[test]
    fn exact_half_cent_rounds_up() {
        // 3 * 2 / 1200 = 0.005
        assert_eq!(monthly_interest(dec!(3), dec!(2)), dec!(0.01));
        assert_eq!(round_currency(dec!(10.125)), dec!(10.13));
        assert_eq!(round_currency(dec!(10.124)), dec!(10.12));
    }
}
