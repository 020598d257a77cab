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

//! `ratstack-cli`: the reference host binding. A REPL/batch front end
//! that exercises [`ratstack::Interpreter`] purely through its public
//! API — it is a *consumer* of the core, not part of it (see
//! `SPEC_FULL.md` §10.1/§1).

mod cli;
mod repl;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use log::{error, info, Level};

use ratstack::Interpreter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    simple_logger::init_with_level(verbosity_to_level(cli.verbosity)).ok();

    let mut interp = Interpreter::new();

    if let Some(prelude) = &cli.prelude {
        match fs::read_to_string(prelude) {
            Ok(source) => run_source(&mut interp, &source, cli.step),
            Err(e) => {
                error!("could not read prelude {}: {e}", prelude.display());
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.files.is_empty() {
        repl::run(&mut interp, cli.step);
        return ExitCode::SUCCESS;
    }

    for path in &cli.files {
        info!("running {}", path.display());
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                error!("could not read {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        };

        run_source(&mut interp, &source, cli.step);

        if cli.reset_between_files {
            interp.reset();
        }
    }

    ExitCode::SUCCESS
}

fn run_source(interp: &mut Interpreter, source: &str, step: bool) {
    if step {
        repl::trace_steps(interp, source);
        return;
    }
    let outcome = interp.execute(source);
    if !outcome.output.is_empty() {
        print!("{}", outcome.output);
    }
    if outcome.status != "OK" {
        eprintln!("{}", outcome.status.red());
    }
}

fn verbosity_to_level(count: u8) -> Level {
    match count {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    }
}
