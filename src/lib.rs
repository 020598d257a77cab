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

//! A small concatenative, stack-oriented language kernel.
//!
//! The crate is organized around the four subsystems a host embeds:
//! an exact rational numeric model ([`num`]), a tagged value union
//! ([`value`]), a lexical analyzer ([`lang`]), a word dictionary
//! ([`dict`]), and a stack evaluator ([`eval`]). [`host`] wires the
//! four into the handle a host binding actually talks to.

pub mod error;
pub mod num;
pub mod value;
pub mod lang;
pub mod dict;
pub mod eval;
pub mod host;

pub use error::{RatError, RatResult};
pub use host::Interpreter;
pub use value::Value;
