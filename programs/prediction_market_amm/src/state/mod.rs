//! State structures for the prediction market

pub mod market;

pub use market::*;
