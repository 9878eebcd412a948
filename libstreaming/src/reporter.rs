//! Line formats of the Hadoop Streaming reporter protocol.
//!
//! A streaming task talks to the framework by writing these lines to standard error. They have to
//! be reproduced exactly or the framework treats them as ordinary log output.

use std::fmt;

pub const COUNTER_PREFIX: &str = "reporter:counter:";
pub const STATUS_PREFIX: &str = "reporter:status:";

/// `CounterReport` renders as `reporter:counter:<group>,<name>,<amount>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterReport<'a> {
    pub group: &'a str,
    pub name: &'a str,
    pub amount: i64,
}

impl<'a> CounterReport<'a> {
    pub fn new(group: &'a str, name: &'a str, amount: i64) -> Self {
        CounterReport {
            group,
            name,
            amount,
        }
    }
}

impl<'a> fmt::Display for CounterReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{},{},{}",
            COUNTER_PREFIX,
            self.group,
            self.name,
            self.amount
        )
    }
}

/// `StatusReport` renders as `reporter:status:<message>`.
///
/// Line breaks inside the message are replaced with spaces, since the framework reads one
/// report per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusReport<'a> {
    pub message: &'a str,
}

impl<'a> StatusReport<'a> {
    pub fn new(message: &'a str) -> Self {
        StatusReport { message }
    }
}

impl<'a> fmt::Display for StatusReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(STATUS_PREFIX)?;
        for c in self.message.chars() {
            match c {
                '\n' | '\r' => f.write_str(" ")?,
                c => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}
