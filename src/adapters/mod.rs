pub mod postgres_settings_store;
pub mod postgres_transaction_repository;
pub mod telegram_notifier;

pub use postgres_settings_store::PostgresSettingsStore;
pub use postgres_transaction_repository::PostgresTransactionRepository;
pub use telegram_notifier::{NoopNotifier, TelegramNotifier};
