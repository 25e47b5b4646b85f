pub mod check;
pub mod filter;
pub mod probe;
pub mod render;
pub mod sweep_args;
