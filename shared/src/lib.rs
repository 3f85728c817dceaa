pub mod constants;
pub mod dto;
pub mod types;

pub use dto::*;
pub use types::*;
