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

//! Lexical tokens produced by [`super::lexer::Lexer`].

use std::fmt::{self, Display, Formatter};

/// A single lexical token. Carries the raw lexeme text where semantic
/// construction (parsing a `Rational`, normalizing an identifier) is
/// deferred to the evaluator, which is the only layer that knows
/// whether a name resolves against the dictionary.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Raw numeric lexeme, e.g. `"3"` or `"-1/2"`.
    Number(String),

    /// The text between a pair of `"` delimiters, quotes stripped.
    Str(String),

    /// The identifier following a `sym:` prefix, case preserved.
    Symbol(String),

    /// `[`
    LBracket,

    /// `]`
    RBracket,

    /// Any other non-whitespace, non-bracket run of characters.
    Ident(String),

    /// Text after `#` to end-of-line, `#` and the newline not included.
    /// Transparent everywhere except immediately after a `DEF` name,
    /// where it becomes that word's description if it shares the name
    /// token's logical line. The `bool` is `true` when no newline
    /// separates this comment from whatever token preceded it.
    Comment(String, bool),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(s) => write!(f, "{s}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Symbol(s) => write!(f, "sym:{s}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Comment(s, _) => write!(f, "#{s}"),
        }
    }
}
