pub mod kv;
pub mod progress;
pub mod schema;
