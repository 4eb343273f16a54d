//! Script session: applies commands to the open bank and writes the transcript.

use std::io::{self, Write};
use std::ops::ControlFlow;

use thiserror::Error;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::bank::{Account, Bank};
use crate::model::Transaction;
use crate::script::{Command, TransactionRequest};
use crate::selfcheck;

/// Errors while executing a single command
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no bank is open")]
    NoBank,

    #[error("account index {index} out of range, the bank has {count} accounts")]
    AccountIndex { index: usize, count: usize },

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// A session over at most one bank at a time.
pub struct Session<W> {
    bank: Option<Bank>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self { bank: None, out }
    }

    pub fn bank(&self) -> Option<&Bank> {
        self.bank.as_ref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run the session over the given command stream, until `stop` or the end
    /// of the stream. Only output failures end it early.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) -> io::Result<()> {
        while let Some(command) = stream.next().await {
            match self.execute(command) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(SessionError::Io(e)) => return Err(e),
                Err(e) => warn!("{e}"),
            }
        }
        self.out.flush()
    }

    /// Execute one command; `Break` once the session is over
    pub fn execute(&mut self, command: Command) -> Result<ControlFlow<()>, SessionError> {
        match command {
            Command::OpenBank(bank) => {
                info!(bank = bank.name(), accounts = bank.accounts().len(), "bank opened");
                self.bank = Some(bank);
            }
            Command::CheckEquality => match selfcheck::check_equality() {
                Ok(()) => writeln!(self.out, "{}", selfcheck::ALL_PASSED)?,
                Err(violation) => writeln!(self.out, "{violation}")?,
            },
            Command::Transaction(request) => self.transaction(request)?,
            Command::Print => self.print()?,
            Command::Stop => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn transaction(&mut self, request: TransactionRequest) -> Result<(), SessionError> {
        let bank = self.bank.as_mut().ok_or(SessionError::NoBank)?;

        let accounts = bank.accounts();
        let id_at = |index: usize| {
            accounts
                .get(index)
                .map(Account::id)
                .ok_or(SessionError::AccountIndex {
                    index,
                    count: accounts.len(),
                })
        };
        let transaction = Transaction::new(
            id_at(request.from)?,
            id_at(request.to)?,
            request.amount,
            request.provision,
        );

        writeln!(self.out, "Transaction amount: {}", transaction.amount())?;
        writeln!(self.out, "Transaction description: {}", transaction.description())?;
        let successful = bank.make_transaction(&transaction).is_ok();
        writeln!(self.out, "Transaction successful? {successful}")?;
        Ok(())
    }

    fn print(&mut self) -> Result<(), SessionError> {
        let bank = self.bank.as_ref().ok_or(SessionError::NoBank)?;
        writeln!(self.out, "{bank}")?;
        writeln!(self.out, "Total provisions: {}", bank.total_provision())?;
        writeln!(self.out, "Total transfers: {}", bank.total_transfers())?;
        writeln!(self.out)?;
        Ok(())
    }
}
