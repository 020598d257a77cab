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

//! The evaluator: a data stack, a single register, the word dictionary,
//! and the token-splicing machinery that runs `DEF`/`IF`/word bodies.
//!
//! Execution never recurses on the host call stack. A single `Vec<Frame>`
//! holds the token stream currently being consumed: frame 0 is always the
//! text passed to [`Evaluator::init_step`]; splicing a user word's body or
//! a chosen `IF` branch pushes a new frame on top rather than calling back
//! into this module. Frame 0 is never popped, which is what lets `step`
//! report `position`/`total` against "the token level of the user's
//! original input" even while deeper frames are draining (see
//! `DESIGN.md` for the full reasoning).

mod builtins;
mod iterate;


use std::rc::Rc;

use log::{trace, warn};

use crate::dict::{Dictionary, Word};
use crate::error::{RatError, RatResult};
use crate::lang::{normalize_name, Lexer, Token};
use crate::num::Rational;
use crate::value::Value;

/// One token stream frame. A fresh frame is pushed whenever a `User`
/// word's body, or the chosen branch of an `IF`, is spliced into
/// execution; it is dropped once fully consumed.
struct Frame {
    tokens: Rc<[Token]>,
    pos: usize,
}

impl Frame {
    fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// The result of a single [`Evaluator::step`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Text written to the output buffer during this action only.
    pub output: String,
    /// Index of the next token to process in the original top-level
    /// input (frame 0).
    pub position: usize,
    /// Total token count of the original top-level input.
    pub total: usize,
    /// Whether any unconsumed work remains.
    pub has_more: bool,
}

/// Whether a single dispatched action finished outright or entered a
/// user word's body. `dispatch_one` uses this to tell a `User` word
/// invocation — atomic from the step observer's point of view — apart
/// from an `IF` branch splice, which yields after choosing the branch
/// and is then stepped through token by token (§4.5.7).
enum Step {
    Complete,
    EnteredUserWord,
}

/// Owns the data stack, register, dictionary, output buffer, and any
/// in-progress step continuation for a single interactive session.
pub struct Evaluator {
    stack: Vec<Value>,
    register: Option<Value>,
    dict: Dictionary,
    output: String,
    custom_words_dirty: bool,
    frames: Vec<Frame>,
    /// Frame stacks suspended by in-progress user word calls, innermost
    /// last. Always empty between `step()` calls; only grows and shrinks
    /// within a single `dispatch_one`, which is what lets a whole call —
    /// however deep, however many words it in turn invokes — drain
    /// without recursing on the host call stack.
    pending_callers: Vec<Vec<Frame>>,
}

impl Evaluator {
    pub fn new() -> Self {
        let mut dict = Dictionary::new();
        builtins::register_builtins(&mut dict);
        Self {
            stack: Vec::new(),
            register: None,
            dict,
            output: String::new(),
            custom_words_dirty: false,
            frames: Vec::new(),
            pending_callers: Vec::new(),
        }
    }

    // -- host-facing state access -------------------------------------

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn register(&self) -> Option<&Value> {
        self.register.as_ref()
    }

    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    /// Drains and returns everything written to the output buffer since
    /// the last call.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn custom_words_dirty(&self) -> bool {
        self.custom_words_dirty
    }

    pub fn clear_custom_words_dirty(&mut self) {
        self.custom_words_dirty = false;
    }

    /// Clears Stack, Register, OutputBuffer, any step continuation, and
    /// every User word. Builtins survive.
    pub fn reset(&mut self) {
        if !self.frames.is_empty() {
            warn!("reset() discarded an in-progress step continuation");
        }
        self.stack.clear();
        self.register = None;
        self.output.clear();
        self.frames.clear();
        self.pending_callers.clear();
        self.dict.reset_user_words();
        self.custom_words_dirty = true;
    }

    // -- execution entry points ----------------------------------------

    /// Tokenizes `source` and runs it to completion, equivalent to
    /// `init_step` followed by `step` until `has_more` is false.
    pub fn execute(&mut self, source: &str) -> RatResult<()> {
        self.init_step(source)?;
        loop {
            let report = self.step()?;
            if !report.has_more {
                return Ok(());
            }
        }
    }

    /// Tokenizes `source` and prepares a step continuation, discarding
    /// any previous one. Clears the output buffer.
    pub fn init_step(&mut self, source: &str) -> RatResult<()> {
        let tokens = Lexer::tokenize(source)?;
        self.output.clear();
        self.pending_callers.clear();
        self.frames = vec![Frame {
            tokens: Rc::from(tokens),
            pos: 0,
        }];
        Ok(())
    }

    /// Advances the current step continuation by exactly one
    /// user-visible action (see §4.5.7).
    pub fn step(&mut self) -> RatResult<StepReport> {
        let output_start = self.output.len();

        self.drop_exhausted_frames();
        if self.frames.is_empty() {
            return Ok(StepReport {
                output: String::new(),
                position: 0,
                total: 0,
                has_more: false,
            });
        }

        let result = self.dispatch_one();
        let delta = self.output[output_start..].to_string();

        match result {
            Ok(()) => {
                self.drop_exhausted_frames();
                Ok(StepReport {
                    output: delta,
                    position: self.frames[0].pos,
                    total: self.frames[0].tokens.len(),
                    has_more: self.has_pending_work(),
                })
            }
            Err(err) => {
                // §7: abort the session; no further step is possible.
                self.frames.clear();
                self.pending_callers.clear();
                Err(err)
            }
        }
    }

    fn has_pending_work(&self) -> bool {
        self.frames.len() > 1 || !self.frames[0].is_exhausted()
    }

    /// Pops frames above frame 0 once they are fully consumed. Frame 0
    /// itself is kept around (even exhausted) so `position`/`total` stay
    /// reportable after the session completes.
    fn drop_exhausted_frames(&mut self) {
        while self.frames.len() > 1 && self.frames.last().is_some_and(Frame::is_exhausted) {
            self.frames.pop();
        }
    }

    // -- single-action dispatch ------------------------------------------

    /// Performs exactly one user-visible action. A literal push, a
    /// builtin call, `DEF`/`DEL`, or choosing an `IF` branch all complete
    /// in one pass through the loop below. Invoking a User word is
    /// different: its body is drained here, token by token and
    /// recursively through whatever else it in turn invokes, until
    /// control returns to the frame stack that made the call — all
    /// within this single `dispatch_one`, so the call is one action from
    /// the step observer's point of view (§4.5.7) without this module
    /// ever recursing on the host call stack. `depth` counts how many
    /// such calls are currently open; an `IF` branch chosen at `depth >
    /// 0` keeps draining too, since it's part of the enclosing call, but
    /// one chosen at `depth == 0` correctly yields after this one step.
    /// Comments are transparent and are skipped without counting as an
    /// action.
    fn dispatch_one(&mut self) -> RatResult<()> {
        let mut depth: usize = 0;

        loop {
            self.drop_exhausted_frames();

            if self.frames.is_empty() || (self.frames.len() == 1 && self.frames[0].is_exhausted())
            {
                match self.pending_callers.pop() {
                    Some(caller_frames) => {
                        self.frames = caller_frames;
                        depth -= 1;
                        if depth == 0 {
                            return Ok(());
                        }
                        continue;
                    }
                    None => return Ok(()),
                }
            }

            let idx = self.frames.len() - 1;
            let token = self.frames[idx].tokens[self.frames[idx].pos].clone();

            if let Token::Comment(_, _) = token {
                self.frames[idx].pos += 1;
                continue;
            }

            match self.dispatch_token(idx, token)? {
                Step::Complete if depth == 0 => return Ok(()),
                Step::Complete => {}
                Step::EnteredUserWord => depth += 1,
            }
        }
    }

    fn dispatch_token(&mut self, idx: usize, token: Token) -> RatResult<Step> {
        match token {
            Token::Number(text) => {
                self.frames[idx].pos += 1;
                trace!("push number {text}");
                self.stack.push(Value::Number(Rational::parse(&text)?));
                Ok(Step::Complete)
            }
            Token::Str(text) => {
                self.frames[idx].pos += 1;
                self.stack.push(Value::String(text));
                Ok(Step::Complete)
            }
            Token::Symbol(name) => {
                self.frames[idx].pos += 1;
                self.stack.push(Value::Symbol(name));
                Ok(Step::Complete)
            }
            Token::LBracket => {
                let tokens = Rc::clone(&self.frames[idx].tokens);
                let (value, next_pos) = parse_vector_literal(&tokens, self.frames[idx].pos)?;
                self.frames[idx].pos = next_pos;
                self.stack.push(value);
                Ok(Step::Complete)
            }
            Token::RBracket => Err(RatError::ParseError("unmatched ']'".to_string())),
            Token::Comment(_, _) => unreachable!("comments are skipped before dispatch"),
            Token::Ident(name) => {
                self.frames[idx].pos += 1;
                self.dispatch_ident(idx, &name)
            }
        }
    }

    fn dispatch_ident(&mut self, idx: usize, name: &str) -> RatResult<Step> {
        let normalized = normalize_name(name);
        trace!("dispatch {normalized}");

        match normalized.as_str() {
            "DEF" => self.do_def(idx),
            "DEL" => self.do_del(idx),
            "IF" => self.do_if(),
            _ => self.dispatch_word(&normalized),
        }
    }

    fn dispatch_word(&mut self, normalized: &str) -> RatResult<Step> {
        enum Dispatch {
            Unknown,
            Builtin(crate::dict::BuiltinFn),
            Splice(Rc<[Token]>),
        }

        let dispatch = match self.dict.lookup(normalized) {
            None => Dispatch::Unknown,
            Some(Word::Builtin(f)) => Dispatch::Builtin(*f),
            Some(Word::User(word)) => Dispatch::Splice(Rc::clone(&word.body)),
        };

        match dispatch {
            Dispatch::Unknown => Err(RatError::UnknownWord(normalized.to_string())),
            Dispatch::Builtin(f) => {
                f(self)?;
                Ok(Step::Complete)
            }
            Dispatch::Splice(tokens) => {
                let caller_frames =
                    std::mem::replace(&mut self.frames, vec![Frame { tokens, pos: 0 }]);
                self.pending_callers.push(caller_frames);
                Ok(Step::EnteredUserWord)
            }
        }
    }

    // -- `DEF` / `DEL` / `IF` -------------------------------------------

    fn do_def(&mut self, idx: usize) -> RatResult<Step> {
        let body = self.pop()?;
        let result = self.try_def(idx, &body);
        if result.is_err() {
            self.stack.push(body);
        }
        result.map(|()| Step::Complete)
    }

    fn try_def(&mut self, idx: usize, body: &Value) -> RatResult<()> {
        let items = match body {
            Value::Vector(items) => items,
            _ => return Err(RatError::TypeError),
        };
        let body_tokens = vector_items_to_tokens(items)?;
        let name = self.read_name_token(idx, "DEF")?;
        let description = self.read_optional_description(idx);
        self.dict.define(&name, body_tokens, description)?;
        self.custom_words_dirty = true;
        Ok(())
    }

    fn do_del(&mut self, idx: usize) -> RatResult<Step> {
        let name = self.read_name_token(idx, "DEL")?;
        self.dict.remove(&name)?;
        self.custom_words_dirty = true;
        Ok(Step::Complete)
    }

    fn do_if(&mut self) -> RatResult<Step> {
        if self.stack.len() < 3 {
            return Err(RatError::StackUnderflow);
        }
        let else_v = self.stack.pop().unwrap();
        let then_v = self.stack.pop().unwrap();
        let cond_v = self.stack.pop().unwrap();

        match self.try_if(&cond_v, &then_v, &else_v) {
            Ok(()) => Ok(Step::Complete),
            Err(err) => {
                self.stack.push(cond_v);
                self.stack.push(then_v);
                self.stack.push(else_v);
                Err(err)
            }
        }
    }

    fn try_if(&mut self, cond: &Value, then_v: &Value, else_v: &Value) -> RatResult<()> {
        let (Value::Vector(then_items), Value::Vector(else_items)) = (then_v, else_v) else {
            return Err(RatError::TypeError);
        };
        let chosen = if cond.is_truthy() {
            then_items
        } else {
            else_items
        };
        let tokens = vector_items_to_tokens(chosen)?;
        self.frames.push(Frame {
            tokens: Rc::from(tokens),
            pos: 0,
        });
        Ok(())
    }

    fn read_name_token(&mut self, idx: usize, who: &str) -> RatResult<String> {
        match self.frames[idx].tokens.get(self.frames[idx].pos).cloned() {
            Some(Token::Ident(name)) => {
                self.frames[idx].pos += 1;
                Ok(name)
            }
            _ => Err(RatError::ParseError(format!("missing name after {who}"))),
        }
    }

    /// Only a comment on the same logical line as the new word's name
    /// becomes its description (§4.5.2 item 2); one separated from it by
    /// a newline is left in the stream, to be skipped later as an
    /// ordinary transparent comment.
    fn read_optional_description(&mut self, idx: usize) -> Option<String> {
        match self.frames[idx].tokens.get(self.frames[idx].pos).cloned() {
            Some(Token::Comment(text, true)) => {
                self.frames[idx].pos += 1;
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
            _ => None,
        }
    }

    // -- stack helpers used by builtins ----------------------------------

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> RatResult<Value> {
        self.stack.pop().ok_or(RatError::StackUnderflow)
    }

    /// Pops the top `n` values, bottom-most first, atomically: if there
    /// are fewer than `n` on the stack, nothing is removed.
    fn pop_n(&mut self, n: usize) -> RatResult<Vec<Value>> {
        if self.stack.len() < n {
            return Err(RatError::StackUnderflow);
        }
        Ok(self.stack.split_off(self.stack.len() - n))
    }

    fn write_output(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans `tokens` starting at the `LBracket` found at `open_pos`,
/// tracking bracket depth (no recursion over the token stream itself —
/// only the resulting `Value` tree recurses with nesting depth), and
/// builds the Vector value described by the matching `[ ... ]` span.
/// Returns the constructed value and the index just past the matching
/// `RBracket`.
fn parse_vector_literal(tokens: &[Token], open_pos: usize) -> RatResult<(Value, usize)> {
    let mut depth = 0usize;
    let mut i = open_pos;
    loop {
        match tokens.get(i) {
            Some(Token::LBracket) => {
                depth += 1;
                i += 1;
            }
            Some(Token::RBracket) => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    break;
                }
            }
            Some(_) => i += 1,
            None => return Err(RatError::ParseError("unmatched '['".to_string())),
        }
    }
    let inner = &tokens[open_pos + 1..i - 1];
    Ok((build_vector_value(inner)?, i))
}

/// Builds a Vector value from a flat, bracket-balanced token slice:
/// bare identifiers become `Symbol` values captured for later dispatch
/// (§4.5.2), never looked up while merely constructing a literal.
fn build_vector_value(tokens: &[Token]) -> RatResult<Value> {
    let mut items = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Comment(_, _) => i += 1,
            Token::LBracket => {
                let (value, next) = parse_vector_literal(tokens, i)?;
                items.push(value);
                i = next;
            }
            Token::RBracket => return Err(RatError::ParseError("unmatched ']'".to_string())),
            Token::Number(text) => {
                items.push(Value::Number(Rational::parse(text)?));
                i += 1;
            }
            Token::Str(text) => {
                items.push(Value::String(text.clone()));
                i += 1;
            }
            Token::Symbol(name) | Token::Ident(name) => {
                items.push(Value::Symbol(name.clone()));
                i += 1;
            }
        }
    }
    Ok(Value::Vector(items))
}

/// The inverse of vector-literal construction: turns a captured
/// quotation's elements back into a flat token stream suitable for
/// splicing into execution (as a `DEF` body or an `IF` branch).
///
/// `Symbol` elements become `Ident` tokens so that a bare identifier
/// written inside the quotation is re-resolved against the dictionary
/// when the quotation runs, per §4.5.2. This also means a `sym:`-quoted
/// name that happens to collide with an existing word's name, if
/// captured inside a `DEF`/`IF` body, dispatches rather than staying a
/// literal symbol when that body runs — a deliberate, narrow deviation
/// from a strict "kept as literal Symbols" reading, recorded in
/// `DESIGN.md`. `Boolean`/`Nil` cannot appear in a literal
/// parsed from source, so a quotation built purely from `[ ... ]`
/// source text never hits this; a vector assembled at runtime (e.g. via
/// `CONS`) that does contain one is rejected with `TypeError`.
fn vector_items_to_tokens(items: &[Value]) -> RatResult<Vec<Token>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.extend(value_to_tokens(item)?);
    }
    Ok(out)
}

fn value_to_tokens(value: &Value) -> RatResult<Vec<Token>> {
    match value {
        Value::Number(n) => Ok(vec![Token::Number(n.to_string())]),
        Value::String(s) => Ok(vec![Token::Str(s.clone())]),
        Value::Symbol(s) => Ok(vec![Token::Ident(s.clone())]),
        Value::Vector(items) => {
            let mut out = vec![Token::LBracket];
            out.extend(vector_items_to_tokens(items)?);
            out.push(Token::RBracket);
            Ok(out)
        }
        Value::Boolean(_) | Value::Nil => Err(RatError::TypeError),
    }
}
