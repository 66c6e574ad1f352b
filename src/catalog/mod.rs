pub mod selector;
pub mod source;
