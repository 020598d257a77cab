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

//! The handle a host binding actually talks to (§6). Wires the
//! evaluator up behind nine operations and nothing else — no parsing,
//! terminal, or transport concerns leak in here; those belong to the
//! CLI binary or to whatever embeds this crate.

use serde::Serialize;

use crate::eval::Evaluator;
use crate::value::Value;

/// Outcome of [`Interpreter::execute`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExecuteOutcome {
    /// `"OK"` on success, or the `Error: ...` message on failure.
    pub status: String,
    /// Text accumulated in the output buffer during this session.
    pub output: String,
}

/// Outcome of [`Interpreter::init_step`] or [`Interpreter::step`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepOutcome {
    pub output: String,
    pub position: usize,
    pub total: usize,
    pub has_more: bool,
    /// Present only when this step failed.
    pub status: Option<String>,
}

/// `(name, description, protected)` for a user word, as returned by
/// [`Interpreter::get_custom_words_info`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomWordInfo {
    pub name: String,
    pub description: Option<String>,
    pub protected: bool,
}

/// A single interpreter instance: its own Stack, Register, OutputBuffer,
/// Dictionary, and optional step continuation, none of which are
/// addressable from outside this handle.
pub struct Interpreter {
    evaluator: Evaluator,
}

impl Interpreter {
    /// Starts with an empty Stack, empty Register, empty OutputBuffer,
    /// and a Dictionary containing every Builtin.
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::new(),
        }
    }

    /// Tokenizes and runs `source` to completion in one call.
    pub fn execute(&mut self, source: &str) -> ExecuteOutcome {
        let result = self.evaluator.execute(source);
        let output = self.evaluator.take_output();
        let status = match result {
            Ok(()) => "OK".to_string(),
            Err(err) => err.to_status_message(),
        };
        ExecuteOutcome { status, output }
    }

    /// Prepares a step continuation for `source`. Returns `"OK"` or the
    /// `Error: ...` message for a lexical failure (e.g. an unterminated
    /// string) detected up front.
    pub fn init_step(&mut self, source: &str) -> String {
        match self.evaluator.init_step(source) {
            Ok(()) => "OK".to_string(),
            Err(err) => err.to_status_message(),
        }
    }

    /// Advances the current step continuation by one action.
    pub fn step(&mut self) -> StepOutcome {
        match self.evaluator.step() {
            Ok(report) => StepOutcome {
                output: report.output,
                position: report.position,
                total: report.total,
                has_more: report.has_more,
                status: None,
            },
            Err(err) => StepOutcome {
                output: self.evaluator.take_output(),
                position: 0,
                total: 0,
                has_more: false,
                status: Some(err.to_status_message()),
            },
        }
    }

    /// The data stack, bottom to top.
    pub fn get_stack(&self) -> Vec<Value> {
        self.evaluator.stack().to_vec()
    }

    pub fn get_register(&self) -> Option<Value> {
        self.evaluator.register().cloned()
    }

    /// Names of every user-defined word, sorted case-insensitively.
    pub fn get_custom_words(&self) -> Vec<String> {
        self.evaluator
            .dict()
            .list_user()
            .into_iter()
            .map(|(name, _, _)| name)
            .collect()
    }

    pub fn get_custom_words_info(&self) -> Vec<CustomWordInfo> {
        self.evaluator
            .dict()
            .list_user()
            .into_iter()
            .map(|(name, description, protected)| CustomWordInfo {
                name,
                description,
                protected,
            })
            .collect()
    }

    /// Whether the dictionary has changed (a `DEF`/`DEL` succeeded)
    /// since the last call to [`Interpreter::custom_words_dirty`]. The
    /// flag is not cleared by reading it; call
    /// [`Interpreter::clear_custom_words_dirty`] once the host has
    /// re-read the dictionary.
    pub fn custom_words_dirty(&self) -> bool {
        self.evaluator.custom_words_dirty()
    }

    pub fn clear_custom_words_dirty(&mut self) {
        self.evaluator.clear_custom_words_dirty();
    }

    /// Atomically clears Stack, Register, OutputBuffer, any step
    /// continuation, and every User word. Builtins survive.
    pub fn reset(&mut self) {
        self.evaluator.reset();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
