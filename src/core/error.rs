//! Error taxonomy for machine construction and traversal.

use thiserror::Error;

/// Failure raised by a fallible hook.
///
/// Hooks registered through the `try_*` builder methods on
/// [`State`](super::State) return this to abort the transition in progress.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type returned by hooks.
pub type HookResult = Result<(), HookError>;

/// Which of the four lifecycle hooks failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Input,
    Exit,
    Transition,
    Entry,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Input => "on_input",
            Self::Exit => "on_exit",
            Self::Transition => "on_transition",
            Self::Entry => "on_entry",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by machines and states.
///
/// Nothing is retried or recovered internally: every error reaches the
/// caller of the operation that detected it.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("invalid machine configuration: {reason}")]
    Configuration { reason: String },

    #[error("the '{machine}' {kind} does not support accepting states")]
    StateCapability { machine: String, kind: String },

    #[error("current state of machine '{machine}' not set; call reset() first")]
    TransitionNotSet { machine: String },

    #[error("cannot transition from state '{state}' on input {input}")]
    TransitionUndefined { state: String, input: String },

    #[error("state '{state}' has no transition registered for input {input}")]
    NoTransition { state: String, input: String },

    #[error("{hook} hook of state '{state}' failed: {source}")]
    Hook {
        state: String,
        hook: HookKind,
        #[source]
        source: HookError,
    },
}

impl FsmError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Errors caused by how states were built or attached.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::StateCapability { .. }
        )
    }

    /// Errors raised while moving between states.
    pub fn is_transition_error(&self) -> bool {
        !self.is_state_error()
    }
}
