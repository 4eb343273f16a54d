//! Line-oriented session scripts.
//!
//! The first line picks the mode. `equals` runs the equality self-check.
//! `typical_usage` is followed by the bank name, the number of accounts, a
//! name line and a balance line per account, and then commands
//! (`transaction`, `print`, `stop`) until `stop` or end of input.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::bank::{Account, Bank};
use crate::model::Provision;
use crate::{Amount, AmountError};

/// Errors that can occur when reading a script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: failed to read input: {source}")]
    Io { line: usize, source: io::Error },

    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("line {line}: unrecognized test type '{mode}'")]
    UnrecognizedMode { line: usize, mode: String },

    #[error("line {line}: unrecognized command '{command}'")]
    UnrecognizedCommand { line: usize, command: String },

    #[error("line {line}: unrecognized provision type '{description}'")]
    UnrecognizedProvision { line: usize, description: String },

    #[error("line {line}: {source}")]
    Amount { line: usize, source: AmountError },

    #[error("line {line}: negative opening balance {balance}")]
    NegativeBalance { line: usize, balance: Amount },

    #[error("line {line}: invalid {what} '{value}'")]
    InvalidNumber {
        line: usize,
        what: &'static str,
        value: String,
    },
}

impl ScriptError {
    /// Whether the reader can go on after this error
    fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScriptError::Io { .. } | ScriptError::UnexpectedEof { .. }
        )
    }
}

/// A transfer as written in a script, accounts given by position in the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub amount: Amount,
    pub provision: Provision,
    pub from: usize,
    pub to: usize,
}

/// One step of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a `typical_usage` session over this bank
    OpenBank(Bank),
    /// Run the equality self-check
    CheckEquality,
    Transaction(TransactionRequest),
    Print,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Commands,
    Done,
}

/// Iterator over the commands of a script.
///
/// Errors in a single command are yielded and reading goes on with the next
/// one. A broken header, an I/O error or a truncated command ends the script.
/// Nothing is read past `stop`.
pub struct ScriptReader<R> {
    lines: io::Lines<R>,
    line: usize,
    state: State,
}

impl ScriptReader<BufReader<File>> {
    /// Read a script from a file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            state: State::Header,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ScriptError> {
        match self.lines.next() {
            None => Ok(None),
            Some(Ok(text)) => {
                self.line += 1;
                Ok(Some(text))
            }
            Some(Err(source)) => Err(ScriptError::Io {
                line: self.line + 1,
                source,
            }),
        }
    }

    fn expect_line(&mut self, expected: &'static str) -> Result<String, ScriptError> {
        self.next_line()?.ok_or(ScriptError::UnexpectedEof {
            line: self.line + 1,
            expected,
        })
    }

    fn parse_line<T: FromStr>(&mut self, what: &'static str) -> Result<T, ScriptError> {
        let value = self.expect_line(what)?;
        value.trim().parse().map_err(|_| ScriptError::InvalidNumber {
            line: self.line,
            what,
            value,
        })
    }

    fn amount_line(&mut self, what: &'static str) -> Result<Amount, ScriptError> {
        let value = self.expect_line(what)?;
        value.parse().map_err(|source| ScriptError::Amount {
            line: self.line,
            source,
        })
    }

    fn read_header(&mut self) -> Result<Command, ScriptError> {
        let mode = self.expect_line("test type")?;
        match mode.trim() {
            "equals" => Ok(Command::CheckEquality),
            "typical_usage" => self.read_bank().map(Command::OpenBank),
            other => Err(ScriptError::UnrecognizedMode {
                line: self.line,
                mode: other.to_string(),
            }),
        }
    }

    fn read_bank(&mut self) -> Result<Bank, ScriptError> {
        let name = self.expect_line("bank name")?;
        let count: usize = self.parse_line("account count")?;

        let mut accounts = Vec::new();
        for _ in 0..count {
            let holder = self.expect_line("account name")?;
            let balance = self.amount_line("account balance")?;
            if balance.is_negative() {
                return Err(ScriptError::NegativeBalance {
                    line: self.line,
                    balance,
                });
            }
            accounts.push(Account::new(holder, balance));
        }

        Ok(Bank::new(name, accounts))
    }

    /// Next command, `None` at end of input. Blank lines are skipped.
    fn read_command(&mut self) -> Result<Option<Command>, ScriptError> {
        loop {
            let Some(text) = self.next_line()? else {
                return Ok(None);
            };
            let command = match text.trim() {
                "" => continue,
                "stop" => Command::Stop,
                "print" => Command::Print,
                "transaction" => Command::Transaction(self.read_transaction()?),
                other => {
                    return Err(ScriptError::UnrecognizedCommand {
                        line: self.line,
                        command: other.to_string(),
                    });
                }
            };
            return Ok(Some(command));
        }
    }

    /// All fields are consumed before any is validated, so a bad field never
    /// desynchronizes the following commands.
    fn read_transaction(&mut self) -> Result<TransactionRequest, ScriptError> {
        let description = self.expect_line("provision type")?;
        let description_line = self.line;
        let amount = self.expect_line("amount")?;
        let amount_line = self.line;
        let parameter = self.expect_line("provision parameter")?;
        let parameter_line = self.line;
        let [from, to] = self.read_indexes()?;

        let amount: Amount = amount.parse().map_err(|source| ScriptError::Amount {
            line: amount_line,
            source,
        })?;

        let provision = match description.trim() {
            Provision::FLAT_AMOUNT => {
                let fee: Amount = parameter.parse().map_err(|source| ScriptError::Amount {
                    line: parameter_line,
                    source,
                })?;
                Provision::FlatAmount(fee)
            }
            Provision::FLAT_PERCENT => {
                let percent: u32 = parameter.trim().parse().map_err(|_| ScriptError::InvalidNumber {
                    line: parameter_line,
                    what: "percent",
                    value: parameter.clone(),
                })?;
                Provision::FlatPercent(percent)
            }
            other => {
                return Err(ScriptError::UnrecognizedProvision {
                    line: description_line,
                    description: other.to_string(),
                });
            }
        };

        Ok(TransactionRequest {
            amount,
            provision,
            from,
            to,
        })
    }

    /// Two whitespace separated indexes, possibly spread over several lines.
    /// Anything after the second one on its line is ignored.
    fn read_indexes(&mut self) -> Result<[usize; 2], ScriptError> {
        let mut tokens: Vec<String> = Vec::new();
        while tokens.len() < 2 {
            let text = self.expect_line("account indexes")?;
            tokens.extend(text.split_whitespace().map(str::to_string));
        }

        let line = self.line;
        let parse = |token: &str| {
            token.parse::<usize>().map_err(|_| ScriptError::InvalidNumber {
                line,
                what: "account index",
                value: token.to_string(),
            })
        };
        Ok([parse(&tokens[0])?, parse(&tokens[1])?])
    }
}

impl<R: BufRead> Iterator for ScriptReader<R> {
    type Item = Result<Command, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            State::Done => return None,
            State::Header => {
                let result = self.read_header();
                self.state = match result {
                    Ok(Command::OpenBank(_)) => State::Commands,
                    _ => State::Done,
                };
                result
            }
            State::Commands => match self.read_command() {
                Ok(None) => {
                    self.state = State::Done;
                    return None;
                }
                Ok(Some(command)) => {
                    if command == Command::Stop {
                        self.state = State::Done;
                    }
                    Ok(command)
                }
                Err(e) => {
                    if e.is_fatal() {
                        self.state = State::Done;
                    }
                    Err(e)
                }
            },
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_script(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn read(content: &str) -> Vec<Result<Command, ScriptError>> {
        ScriptReader::new(content.as_bytes()).collect()
    }

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    const HEADER: &str = "typical_usage\nKomercijalna\n2\nAndrej\n20.00$\nGajduk\n0.00$\n";

    #[test]
    fn read_equals_mode() {
        let file = write_script("equals\n");
        let results: Vec<_> = ScriptReader::open(file.path()).unwrap().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap(), &Command::CheckEquality);
    }

    #[test]
    fn read_bank_setup() {
        let file = write_script(HEADER);
        let mut results = ScriptReader::open(file.path()).unwrap();

        let Some(Ok(Command::OpenBank(bank))) = results.next() else {
            panic!("expected bank");
        };
        assert_eq!(bank.name(), "Komercijalna");
        assert_eq!(bank.accounts().len(), 2);
        assert_eq!(bank.accounts()[0].name(), "Andrej");
        assert_eq!(bank.accounts()[0].balance(), amount("20.00"));
        assert_eq!(bank.accounts()[1].name(), "Gajduk");
        assert_eq!(bank.accounts()[1].balance(), Amount::ZERO);
        assert!(results.next().is_none());
    }

    #[test]
    fn read_transactions_and_commands() {
        let script = format!(
            "{HEADER}transaction\nFlatAmount\n10.00$\n1.00$\n0 1\nprint\n\
             transaction\nFlatPercent\n5.00$\n10\n1\n0\nstop\nprint\n"
        );
        let results = read(&script);
        let commands: Vec<_> = results.into_iter().map(Result::unwrap).collect();

        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[1],
            Command::Transaction(TransactionRequest {
                amount: amount("10.00"),
                provision: Provision::FlatAmount(amount("1.00")),
                from: 0,
                to: 1,
            })
        );
        assert_eq!(commands[2], Command::Print);
        assert_eq!(
            commands[3],
            Command::Transaction(TransactionRequest {
                amount: amount("5.00"),
                provision: Provision::FlatPercent(10),
                from: 1,
                to: 0,
            })
        );
        // nothing is read past stop
        assert_eq!(commands[4], Command::Stop);
    }

    #[test]
    fn blank_lines_between_commands_are_skipped() {
        let results = read(&format!("{HEADER}\n\nprint\n\nstop\n"));
        assert_eq!(results.len(), 3);
        assert!(matches!(results[1], Ok(Command::Print)));
    }

    #[test]
    fn bad_command_does_not_stop_reading() {
        let script = format!(
            "{HEADER}withdraw\ntransaction\nFlatFee\n10.00$\n1.00$\n0 1\n\
             transaction\nFlatPercent\n10.00$\nten\n0 1\nprint\n"
        );
        let results = read(&script);
        assert_eq!(results.len(), 5);
        assert!(matches!(
            results[1],
            Err(ScriptError::UnrecognizedCommand { line: 8, .. })
        ));
        assert!(matches!(
            results[2],
            Err(ScriptError::UnrecognizedProvision { line: 10, .. })
        ));
        assert!(matches!(
            results[3],
            Err(ScriptError::InvalidNumber {
                line: 17,
                what: "percent",
                ..
            })
        ));
        assert!(matches!(results[4], Ok(Command::Print)));
    }

    #[test]
    fn bad_amount_reports_its_line() {
        let script = format!("{HEADER}transaction\nFlatAmount\nlots\n1.00$\n0 1\n");
        let results = read(&script);
        assert!(matches!(
            results[1],
            Err(ScriptError::Amount { line: 10, .. })
        ));
    }

    #[test]
    fn unknown_mode_ends_script() {
        let results = read("unusual_usage\nprint\n");
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(ScriptError::UnrecognizedMode { line: 1, .. })
        ));
    }

    #[test]
    fn bad_balance_ends_script() {
        let results = read("typical_usage\nTest\n1\nAndrej\ntwenty\nprint\n");
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(ScriptError::Amount { line: 5, .. })
        ));
    }

    #[test]
    fn negative_balance_ends_script() {
        let results = read("typical_usage\nTest\n2\nAndrej\n10.00$\nGajduk\n-0.01$\nprint\n");
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(ScriptError::NegativeBalance { line: 7, balance }) if balance == amount("-0.01")
        ));
    }

    #[test]
    fn negative_transfer_values_are_left_to_the_bank() {
        let script = format!("{HEADER}transaction\nFlatAmount\n-50.00$\n-5.00$\n0 1\n");
        let results = read(&script);
        assert!(matches!(
            &results[1],
            Ok(Command::Transaction(request)) if request.amount == amount("-50.00")
        ));
    }

    #[test]
    fn truncated_transaction_ends_script() {
        let results = read(&format!("{HEADER}transaction\nFlatAmount\n10.00$\n"));
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(ScriptError::UnexpectedEof {
                expected: "provision parameter",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_fails_to_open() {
        assert!(ScriptReader::open("/nonexistent/script.txt").is_err());
    }
}
