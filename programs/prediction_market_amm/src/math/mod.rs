//! Integer math shared by the pricing curve and the engines

pub mod fixed_point;

pub use fixed_point::*;
