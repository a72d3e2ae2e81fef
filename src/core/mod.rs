pub mod input;
pub mod money;
pub mod policy;
