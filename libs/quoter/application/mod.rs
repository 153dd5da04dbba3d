//! Application layer: strategy contract and the quoting controller.

pub mod strategy;
pub mod top_of_book;

pub use strategy::{Strategy, StrategyContext, StrategyError, StrategyResult};
pub use top_of_book::{PassOutcome, TopOfBookStrategy};
