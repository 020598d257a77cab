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

use std::path::PathBuf;

use clap::Parser;

/// ratstack: a concatenative, exact-rational stack language.
#[derive(Parser, Debug)]
#[command(name = "ratstack-cli", author, version, about)]
pub struct Cli {
    /// Source files to run in order. With none given, starts an
    /// interactive REPL instead.
    pub files: Vec<PathBuf>,

    /// Run a file before the REPL starts, or before the first file in
    /// batch mode. Shares the session's Dictionary and Stack.
    #[arg(long)]
    pub prelude: Option<PathBuf>,

    /// Trace execution one action at a time instead of running each
    /// source to completion.
    #[arg(long)]
    pub step: bool,

    /// Clear Stack, Register, and user words between files in batch
    /// mode (builtins are never affected).
    #[arg(long)]
    pub reset_between_files: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
