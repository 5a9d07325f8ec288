//! Game rules
//!
//! Rock-paper-scissors selections and round outcomes, independent of any
//! connection or session bookkeeping.

pub mod outcome;
pub mod selection;

pub use outcome::{Outcome, resolve};
pub use selection::{InvalidSelection, Selection};
