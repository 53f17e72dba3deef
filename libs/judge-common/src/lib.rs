pub mod codec;
pub mod plan;
pub mod types;
