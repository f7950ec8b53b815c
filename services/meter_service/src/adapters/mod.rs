pub mod device;
pub mod formatting_llm;
pub mod kv_store;
pub mod notify;
pub mod sheets;

pub use device::DeviceReport;
pub use formatting_llm::ChatFormattingAdapter;
pub use kv_store::SqliteKeyValueStore;
pub use notify::LogNotificationAdapter;
pub use sheets::LogSpreadsheetAdapter;
