//! Command-processing session
//!
//! Owns the live store together with the person filter, the confirmation
//! gate, the snapshot log and the persistence collaborator, and runs each
//! command through validate, gate, apply, commit and persist in that order.
//! One command finishes before the next is accepted. If this ever serves more
//! than one caller, the whole `Session` is the unit to put behind a lock.
//!
//! ## Logging Ownership
//!
//! The session owns lifecycle logging for every command and reply:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (ops, cascade, history, gate) use only `tracing::debug!()`.

use std::time::Instant;

use classbook_core_types::RequestContext;

use crate::apply::apply;
use crate::commands::{Command, DirectCommand, Mutation, PersonFilter, Selection};
use crate::errors::{ClassbookError, ExError, Result};
use crate::gate::{ConfirmationGate, GateReply, CANCELLED_MESSAGE};
use crate::history::{History, ViewHint};
use crate::model::Person;
use crate::ops::Store;
use crate::persistence::{NoopPersistence, Persistence};
use crate::{log_op_end, log_op_error, log_op_start};

/// What the user sees after a command or reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub feedback: String,
    /// List to bring into view, if the command changed or selected one
    pub hint: Option<ViewHint>,
}

impl CommandResult {
    fn message(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            hint: None,
        }
    }

    fn with_hint(feedback: impl Into<String>, hint: ViewHint) -> Self {
        Self {
            feedback: feedback.into(),
            hint: Some(hint),
        }
    }
}

pub struct Session {
    store: Store,
    filter: PersonFilter,
    gate: ConfirmationGate,
    history: History,
    persistence: Box<dyn Persistence>,
}

impl Session {
    /// Start a session on `store`; the snapshot log begins at that state
    pub fn new(store: Store, persistence: Box<dyn Persistence>) -> Self {
        let history = History::new(&store);
        Self {
            store,
            filter: PersonFilter::all(),
            gate: ConfirmationGate::new(),
            history,
            persistence,
        }
    }

    /// Session that persists nothing
    pub fn in_memory(store: Store) -> Self {
        Self::new(store, Box::new(NoopPersistence))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn filter(&self) -> &PersonFilter {
        &self.filter
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Persons currently shown, which is what 1-based indices refer to
    pub fn visible_persons(&self) -> Vec<&Person> {
        Selection::new(&self.store, &self.filter).visible_persons()
    }

    pub fn has_pending_command(&self) -> bool {
        self.gate.has_pending_command()
    }

    /// Drop the pending command, if any, without applying it
    pub fn clear_pending_command(&mut self) {
        self.gate.clear_pending_command();
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        self.gate.pending_prompt()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Process one command
    ///
    /// A confirmable command that is not forced comes back as a prompt and
    /// waits in the gate; answer it with [`Session::respond`].
    ///
    /// # Errors
    ///
    /// * `AwaitingConfirmation` - a command is pending and this one is not
    ///   forced; the pending command is kept
    /// * `ValidationFailed`, `DuplicateEntity`, `EntityNotFound`,
    ///   `InvariantViolation` - nothing changed and nothing was committed
    /// * `NoPreviousState`/`NoNextState` - undo/redo at a boundary
    /// * `PersistenceFailed` - the change was applied and committed but could
    ///   not be saved
    pub fn execute(&mut self, command: Command) -> Result<CommandResult> {
        let ctx = RequestContext::new(command.name());
        log_op_start!(ctx.op, request_id = %ctx.request_id);
        let start = Instant::now();

        let result = self.execute_impl(command).map_err(|e| {
            log_op_error!(
                ctx.op,
                ExError::from(e.clone()).with_op(ctx.op),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            e
        })?;

        log_op_end!(
            ctx.op,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %ctx.request_id,
            cursor = self.history.cursor() as u64
        );
        Ok(result)
    }

    /// Answer the pending confirmation prompt
    ///
    /// # Errors
    ///
    /// * `NoPendingCommand` - nothing was waiting
    /// * `InvalidConfirmationResponse` - reply was not `y` or `n`; the command
    ///   stays pending
    /// * any error of the confirmed command itself; the gate is idle
    ///   regardless
    pub fn respond(&mut self, input: &str) -> Result<CommandResult> {
        let ctx = RequestContext::new("respond");
        log_op_start!(ctx.op, request_id = %ctx.request_id);
        let start = Instant::now();

        let result = self.respond_impl(input).map_err(|e| {
            log_op_error!(
                ctx.op,
                ExError::from(e.clone()).with_op(ctx.op),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            e
        })?;

        log_op_end!(
            ctx.op,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %ctx.request_id,
            cursor = self.history.cursor() as u64
        );
        Ok(result)
    }

    /// Shorthand for executing `DirectCommand::Undo`
    ///
    /// # Errors
    ///
    /// See [`Session::execute`].
    pub fn undo(&mut self) -> Result<CommandResult> {
        self.execute(Command::Direct(DirectCommand::Undo))
    }

    /// Shorthand for executing `DirectCommand::Redo`
    ///
    /// # Errors
    ///
    /// See [`Session::execute`].
    pub fn redo(&mut self) -> Result<CommandResult> {
        self.execute(Command::Direct(DirectCommand::Redo))
    }

    fn execute_impl(&mut self, command: Command) -> Result<CommandResult> {
        if self.gate.has_pending_command() && !command.is_forced() {
            return Err(ClassbookError::AwaitingConfirmation);
        }

        match command {
            Command::Direct(DirectCommand::Undo) => {
                let reverted = self.history.undo(&mut self.store)?;
                self.persist()?;
                Ok(CommandResult::with_hint(
                    format!("Undid: {}", reverted.description),
                    reverted.hint,
                ))
            }
            Command::Direct(DirectCommand::Redo) => {
                let replayed = self.history.redo(&mut self.store)?;
                self.persist()?;
                Ok(CommandResult::with_hint(
                    format!("Redid: {}", replayed.description),
                    replayed.hint,
                ))
            }
            Command::Direct(DirectCommand::Find(filter)) => {
                self.filter = filter;
                let shown = self.visible_persons().len();
                Ok(CommandResult::with_hint(
                    format!("{} persons listed!", shown),
                    ViewHint::Persons,
                ))
            }
            Command::Direct(DirectCommand::List) => {
                self.filter = PersonFilter::all();
                Ok(CommandResult::with_hint(
                    "Listed all persons",
                    ViewHint::Persons,
                ))
            }
            Command::Direct(direct) => {
                let mutation = direct.resolve(&Selection::new(&self.store, &self.filter))?;
                self.run(mutation)
            }
            Command::Confirmable(confirmable) => {
                let validated =
                    confirmable.validate(&Selection::new(&self.store, &self.filter))?;
                if confirmable.forced {
                    self.run(validated.into_mutation())
                } else {
                    let prompt = self.gate.request(validated)?;
                    Ok(CommandResult::message(prompt))
                }
            }
        }
    }

    fn respond_impl(&mut self, input: &str) -> Result<CommandResult> {
        match self.gate.respond(input)? {
            GateReply::Confirmed(validated) => self.run(validated.into_mutation()),
            GateReply::Cancelled => Ok(CommandResult::message(CANCELLED_MESSAGE)),
        }
    }

    /// Apply on a working copy, then swap it in, commit and persist
    fn run(&mut self, mutation: Mutation) -> Result<CommandResult> {
        let (next, outcome) = apply(self.store.clone(), &mutation)?;
        self.store = next;
        self.history
            .commit(&self.store, outcome.description, outcome.hint);
        self.persist()?;
        Ok(CommandResult::with_hint(outcome.feedback, outcome.hint))
    }

    fn persist(&mut self) -> Result<()> {
        self.persistence.save(&self.store)?;
        Ok(())
    }
}
