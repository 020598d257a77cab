// This file is part of ratstack, a concatenative language kernel.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// ratstack is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// ratstack is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ratstack.  If not, see <http://www.gnu.org/licenses/>.

//! Error kinds shared by every core subsystem.

use thiserror::Error;

/// Every way a core operation can fail.
///
/// `Display` renders the single-line, `Error: `-free message; the host
/// API (see [`crate::host`]) prepends the `Error: ` prefix exactly once
/// when it reports `status` to a caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatError {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("register is empty")]
    RegisterEmpty,

    #[error("register already holds a value")]
    RegisterOccupied,

    #[error("type error")]
    TypeError,

    #[error("length mismatch")]
    LengthMismatch,

    #[error("vector is empty")]
    EmptyVector,

    #[error("index {index} out of range for vector of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow")]
    NumericOverflow,

    #[error("unknown word: {0}")]
    UnknownWord(String),

    #[error("{0} is a builtin word")]
    IsBuiltin(String),

    #[error("{0} is protected")]
    Protected(String),

    #[error("parse error: {0}")]
    ParseError(String),
}

/// Convenience alias used throughout the crate.
pub type RatResult<T> = Result<T, RatError>;

impl RatError {
    /// Renders the message the host API surfaces as `status`.
    pub fn to_status_message(&self) -> String {
        format!("Error: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_has_prefix_exactly_once() {
        let err = RatError::StackUnderflow;
        assert_eq!(err.to_status_message(), "Error: stack underflow");
    }

    #[test]
    fn unknown_word_carries_name() {
        let err = RatError::UnknownWord("FROB".into());
        assert_eq!(err.to_status_message(), "Error: unknown word: FROB");
    }
}
