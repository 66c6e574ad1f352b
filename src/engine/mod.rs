pub mod filter;
pub mod pagination;
