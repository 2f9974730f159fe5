//! # Automated Market Maker (AMM) Module
//!
//! This module implements the **LMSR cost function** for pricing YES/NO
//! tokens against a market's pool.
//!
//! ## Why LMSR?
//!
//! ```text
//!   price_yes + price_no = 1            (always)
//!
//!   ┌────────────────────────────────────────┐
//!   │  price_yes                             │
//!   │  1 ┤                    ╭────────      │
//!   │    │                 ╭──╯              │
//!   │ .5 ┤ ─ ─ ─ ─ ─ ─ ─ ─╳─ ─ ─ ─ ─ ─ ─     │
//!   │    │            ╭──╯                   │
//!   │  0 ┤ ───────────╯                      │
//!   │    └──────────────────────────▶ (N-Y)/b │
//!   └────────────────────────────────────────┘
//! ```
//!
//! Prices are probabilities, and the depth `b` bounds the pool's worst-case
//! loss at `b · ln 2`.

pub mod lmsr;

pub use lmsr::*;
