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

//! The lexer: a single left-to-right pass over a source buffer with a
//! three-state machine (default / in-string / in-comment). Nesting of
//! `[ ... ]` is left to callers; this module only ever emits flat
//! `LBracket`/`RBracket` tokens in source order.

mod ident;
mod number;
mod reader;
#[cfg(test)]
mod tests;

use reader::Reader;

use crate::error::{RatError, RatResult};

use super::token::Token;

/// Tokenizes `source` into a flat stream. Never recurses; bracket depth
/// counting is the evaluator's job.
pub struct Lexer;

impl Lexer {
    pub fn tokenize(source: &str) -> RatResult<Vec<Token>> {
        let chars: Vec<char> = source.chars().collect();
        let mut reader = Reader::new(&chars);
        let mut tokens = Vec::new();

        loop {
            let saw_newline = skip_whitespace(&mut reader);

            match reader.peek() {
                None => break,
                Some('#') => tokens.push(scan_comment(&mut reader, !saw_newline)),
                Some('[') => {
                    reader.advance();
                    tokens.push(Token::LBracket);
                }
                Some(']') => {
                    reader.advance();
                    tokens.push(Token::RBracket);
                }
                Some('"') => tokens.push(scan_string(&mut reader)?),
                Some(_) => tokens.push(scan_word(&mut reader)),
            }
        }

        Ok(tokens)
    }
}

/// Skips whitespace, returning whether a newline was among it — the only
/// bit of line-structure this lexer tracks, needed to tell whether a
/// comment shares its logical line with the token before it (§4.5.2).
fn skip_whitespace(r: &mut Reader) -> bool {
    let mut saw_newline = false;
    while matches!(r.peek(), Some(c) if c.is_whitespace()) {
        if r.peek() == Some('\n') {
            saw_newline = true;
        }
        r.advance();
    }
    saw_newline
}

/// Consumes `#` and everything up to (not including) the next newline or
/// end of input, returning the text as a `Comment` token. Discarding
/// comments outright is not an option: `DEF` promotes one into a word's
/// description when it immediately follows the new name on the same line
/// (§4.5.2).
fn scan_comment(r: &mut Reader, same_line: bool) -> Token {
    r.advance(); // '#'
    let mut text = String::new();
    while let Some(c) = r.peek() {
        if c == '\n' {
            break;
        }
        text.push(c);
        r.advance();
    }
    Token::Comment(text.trim().to_string(), same_line)
}

fn scan_string(r: &mut Reader) -> RatResult<Token> {
    let start = r.position();
    r.advance(); // opening quote
    let mut text = String::new();

    loop {
        match r.advance() {
            Some('"') => return Ok(Token::Str(text)),
            Some(c) => text.push(c),
            None => {
                return Err(RatError::ParseError(format!(
                    "unterminated string starting at character {start}"
                )))
            }
        }
    }
}

/// Scans a run of non-whitespace, non-bracket, non-quote, non-comment
/// characters and classifies it as Number, Symbol, or Ident.
fn scan_word(r: &mut Reader) -> Token {
    let mut word = String::new();
    while let Some(c) = r.peek() {
        if c.is_whitespace() || c == '[' || c == ']' || c == '"' || c == '#' {
            break;
        }
        word.push(c);
        r.advance();
    }

    if number::looks_like_number(&word) {
        Token::Number(word)
    } else if let Some(name) = ident::strip_symbol_prefix(&word) {
        Token::Symbol(name.to_string())
    } else {
        Token::Ident(word)
    }
}

/// Normalizes a word name the way the dictionary keys its entries.
pub fn normalize_name(name: &str) -> String {
    ident::normalize(name)
}
