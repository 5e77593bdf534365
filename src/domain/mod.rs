pub mod notification;
pub mod transaction;

pub use notification::NotificationRecord;
pub use transaction::{Transaction, TransactionPatch, TransactionStatus};
