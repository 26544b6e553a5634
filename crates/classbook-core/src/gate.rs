//! Confirmation gate
//!
//! A single slot that holds at most one validated command waiting for a
//! yes/no reply. The slot is emptied before a confirmed command is handed
//! back, so a command whose execution then fails is never retried.

use tracing::debug;

use crate::commands::ValidatedCommand;
use crate::errors::{ClassbookError, Result};

/// Feedback shown when a pending command is declined
pub const CANCELLED_MESSAGE: &str = "Action cancelled.";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConfirmationGate {
    #[default]
    Idle,
    Pending(ValidatedCommand),
}

/// What a valid reply resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum GateReply {
    /// Apply this command now; the gate is already idle
    Confirmed(ValidatedCommand),
    Cancelled,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `command` and return its prompt
    ///
    /// # Errors
    ///
    /// Returns `AwaitingConfirmation` if another command is already pending;
    /// the pending command is kept.
    pub fn request(&mut self, command: ValidatedCommand) -> Result<String> {
        if self.has_pending_command() {
            return Err(ClassbookError::AwaitingConfirmation);
        }
        let prompt = command.prompt().to_string();
        *self = ConfirmationGate::Pending(command);
        debug!("confirmation requested");
        Ok(prompt)
    }

    /// Interpret a reply; only `y` and `n` are accepted, ignoring case and
    /// surrounding whitespace
    ///
    /// # Errors
    ///
    /// * `NoPendingCommand` - nothing is pending; no state change
    /// * `InvalidConfirmationResponse` - any other reply; the command stays
    ///   pending
    pub fn respond(&mut self, input: &str) -> Result<GateReply> {
        let command = match std::mem::take(self) {
            ConfirmationGate::Idle => return Err(ClassbookError::NoPendingCommand),
            ConfirmationGate::Pending(command) => command,
        };

        let reply = input.trim();
        if reply.eq_ignore_ascii_case("y") {
            debug!("pending command confirmed");
            Ok(GateReply::Confirmed(command))
        } else if reply.eq_ignore_ascii_case("n") {
            debug!("pending command cancelled");
            Ok(GateReply::Cancelled)
        } else {
            *self = ConfirmationGate::Pending(command);
            Err(ClassbookError::InvalidConfirmationResponse {
                response: reply.to_string(),
            })
        }
    }

    pub fn has_pending_command(&self) -> bool {
        matches!(self, ConfirmationGate::Pending(_))
    }

    /// Drop whatever is pending without applying it
    pub fn clear_pending_command(&mut self) {
        *self = ConfirmationGate::Idle;
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        match self {
            ConfirmationGate::Idle => None,
            ConfirmationGate::Pending(command) => Some(command.prompt()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ConfirmableAction, ConfirmableCommand, PersonFilter, Selection};
    use crate::ops::Store;

    fn clear_command() -> ValidatedCommand {
        let store = Store::new();
        let filter = PersonFilter::all();
        ConfirmableCommand::new(ConfirmableAction::Clear)
            .validate(&Selection::new(&store, &filter))
            .unwrap()
    }

    #[test]
    fn test_request_returns_prompt() {
        let mut gate = ConfirmationGate::new();
        let prompt = gate.request(clear_command()).unwrap();
        assert!(prompt.ends_with("(y/n)"));
        assert!(gate.has_pending_command());
        assert_eq!(gate.pending_prompt(), Some(prompt.as_str()));
    }

    #[test]
    fn test_second_request_keeps_first() {
        let mut gate = ConfirmationGate::new();
        gate.request(clear_command()).unwrap();
        assert_eq!(
            gate.request(clear_command()),
            Err(ClassbookError::AwaitingConfirmation)
        );
        assert!(gate.has_pending_command());
    }

    #[test]
    fn test_uppercase_yes_with_whitespace_confirms() {
        let mut gate = ConfirmationGate::new();
        gate.request(clear_command()).unwrap();

        let reply = gate.respond("  Y \n").unwrap();
        assert_eq!(reply, GateReply::Confirmed(clear_command()));
        assert_eq!(gate, ConfirmationGate::Idle);
    }

    #[test]
    fn test_no_cancels() {
        let mut gate = ConfirmationGate::new();
        gate.request(clear_command()).unwrap();
        assert_eq!(gate.respond("N").unwrap(), GateReply::Cancelled);
        assert!(!gate.has_pending_command());
    }

    #[test]
    fn test_invalid_reply_keeps_pending() {
        let mut gate = ConfirmationGate::new();
        gate.request(clear_command()).unwrap();

        for reply in ["yes", "", "delete 1"] {
            let result = gate.respond(reply);
            assert!(matches!(
                result,
                Err(ClassbookError::InvalidConfirmationResponse { .. })
            ));
            assert!(gate.has_pending_command());
        }
        assert!(matches!(gate.respond("y"), Ok(GateReply::Confirmed(_))));
    }

    #[test]
    fn test_reply_while_idle() {
        let mut gate = ConfirmationGate::new();
        assert_eq!(gate.respond("y"), Err(ClassbookError::NoPendingCommand));
        assert_eq!(gate, ConfirmationGate::Idle);
    }

    #[test]
    fn test_clear_pending_command() {
        let mut gate = ConfirmationGate::new();
        gate.request(clear_command()).unwrap();
        gate.clear_pending_command();
        assert!(gate.pending_prompt().is_none());
    }
}
