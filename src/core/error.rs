use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected before any month is simulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("debt id must not be empty")]
    EmptyDebtId,
    #[error("duplicate debt id {0:?}")]
    DuplicateDebtId(String),
    #[error("debt {id:?} has negative balance {balance}")]
    NegativeBalance { id: String, balance: Decimal },
    #[error("debt {id:?} has APR {apr} outside 0-100")]
    AprOutOfRange { id: String, apr: Decimal },
    #[error("debt {id:?} has negative minimum payment {minimum}")]
    NegativeMinimumPayment { id: String, minimum: Decimal },
    #[error("recurring funding amount {0} must be >= 0")]
    NegativeRecurringFunding(Decimal),
    #[error("one-time funding dated {date} has negative amount {amount}")]
    NegativeOneTimeFunding {
        date: chrono::NaiveDate,
        amount: Decimal,
    },
    #[error("{field} amount {amount} exceeds the supported maximum")]
    AmountTooLarge { field: String, amount: Decimal },
    #[error("iteration bound must be > 0")]
    ZeroIterationBound,
}
