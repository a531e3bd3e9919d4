//! Keying of unkeyed struct literals.
//!
//! The [`driver`] walks a file once, asks the [`classify`] rules about every
//! composite literal and collects insertions for the eligible ones into an
//! [`EditScript`], which is finally spliced into the original text.

mod classify;
mod driver;
mod patch;

pub use classify::{Eligibility, SkipReason, classify};
pub use driver::{KeyingResult, Skipped, key_file};
pub use patch::{Edit, EditScript};
