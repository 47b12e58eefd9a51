//! Core state types and the error taxonomy.
//!
//! This module contains the data model shared by every machine variant:
//! - `State` nodes with their transition tables and hooks
//! - `StateId` identity handles issued by machines
//! - `FsmError` and the hook error types

mod error;
mod state;

pub use error::{FsmError, HookError, HookKind, HookResult};
pub use state::{State, StateId};
