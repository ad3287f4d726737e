pub mod aggregate;
pub mod summary;

pub use aggregate::{aggregate, ExpectedAmount, PeriodStats};
pub use summary::{
    contributions, group_summary, last_payers, payer_of, Contribution, GroupSummary, LastPayer,
};
