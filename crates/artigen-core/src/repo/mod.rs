pub mod record;
pub mod store;
pub use record::{Criteria, Record};
pub use store::{apply_replace, ensure_criteria, generate_record_id, InMemoryRecordStore, RecordStore};
