pub mod backend;
pub mod files;

pub use backend::{JsonFileStore, MemoryStore, RecordStore};
pub use files::{activities_file, atomic_write, ensure_data_dir, get_data_dir, log_dir, read_file};
