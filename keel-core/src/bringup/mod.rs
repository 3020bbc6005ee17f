//! Board bring-up
//!
//! Configuration-gated, fixed-order creation of every on-chip peripheral
//! the board uses. [`plan`] decides what runs, [`execute`] runs it.

pub mod executor;
pub mod plan;

pub use executor::{execute, initialize_board, BringupError, StepError};
pub use plan::{plan, BringupPlan, Step, StepKind, MAX_STEPS};
