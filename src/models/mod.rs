pub mod goal;
pub mod insight;
pub mod record;
pub mod summary;
pub mod transaction;

pub use goal::{FinancialGoal, FINANCIAL_GOALS};
pub use insight::{Insight, InsightKind, Provider, MAX_INSIGHTS, MAX_MESSAGE_CHARS};
pub use record::{Document, Draft, QueryResult, Record};
pub use summary::{CategoryTotal, FinancialSummary, RecentTransaction};
pub use transaction::{Transaction, TransactionKind, TRANSACTIONS};
