//! Stateless metric calculators. Each function consumes aligned value pairs
//! or raw value sequences and reports `None`-valued statistics when no valid
//! samples exist, never an error.

pub mod coordinate;
pub mod information;
pub mod numerical;
pub mod signal;
pub mod structural;
pub mod temporal;
