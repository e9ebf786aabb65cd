//! Curtain sizing calculator
//!
//! Turns a customer's measured window size into the production fabric size
//! and the number of panels to order, for a given window type and pleat style.

pub mod cli;
pub mod core;
