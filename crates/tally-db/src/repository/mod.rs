//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`shift`] - Shift sessions (implements `tally_shift::ShiftStore`)
//! - [`order`] - Order/refund facts (implements `tally_shift::SalesFeed`)
//! - [`staff`] - Cashiers and branches (implements `tally_shift::StaffDirectory`)
//!
//! Repositories are cheap to create; they hold a clone of the pool.

pub mod order;
pub mod shift;
pub mod staff;
