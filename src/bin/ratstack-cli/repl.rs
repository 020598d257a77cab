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

//! The interactive front end: a line-at-a-time REPL plus the
//! colon-prefixed introspection commands described in `SPEC_FULL.md`
//! §11 (`:words`, `:stack`, `:reg`, `:reset`). None of this reaches
//! into `ratstack`'s internals; it is built entirely out of the C6
//! `Interpreter` API.

use std::io::{self, Write};

use colored::Colorize;

use ratstack::Interpreter;

/// Runs the interactive loop against stdin/stdout until EOF.
pub fn run(interp: &mut Interpreter, step: bool) {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("{} ", "ratstack>".cyan());
        io::stdout().flush().ok();

        line.clear();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            println!();
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(meta) = input.strip_prefix(':') {
            if !run_meta(interp, meta) {
                break;
            }
            continue;
        }

        if step {
            trace_steps(interp, input);
        } else {
            let outcome = interp.execute(input);
            if !outcome.output.is_empty() {
                print!("{}", outcome.output);
            }
            if outcome.status == "OK" {
                print_stack(interp);
            } else {
                eprintln!("{}", outcome.status.red());
            }
        }
    }
}

/// Handles a `:`-prefixed meta-command. Returns `false` to end the
/// session (`:quit`).
fn run_meta(interp: &mut Interpreter, command: &str) -> bool {
    match command.trim() {
        "words" => {
            for word in interp.get_custom_words_info() {
                let suffix = if word.protected { " (protected)" } else { "" };
                match word.description {
                    Some(desc) => println!("{}{suffix} # {desc}", word.name),
                    None => println!("{}{suffix}", word.name),
                }
            }
        }
        "stack" => print_stack(interp),
        "reg" => match interp.get_register() {
            Some(value) => println!("{}", value.to_inspect_string()),
            None => println!("(empty)"),
        },
        "reset" => {
            interp.reset();
            println!("reset.");
        }
        "quit" | "exit" => return false,
        other => eprintln!("{}", format!("unknown meta-command :{other}").yellow()),
    }
    true
}

fn print_stack(interp: &Interpreter) {
    let rendered: Vec<String> = interp
        .get_stack()
        .iter()
        .map(|v| v.to_inspect_string())
        .collect();
    println!("[{}]", rendered.join(" "));
}

/// Runs `source` one `step()` at a time, printing position/total, the
/// output delta, and a one-line stack snapshot after each action.
pub fn trace_steps(interp: &mut Interpreter, source: &str) {
    let status = interp.init_step(source);
    if status != "OK" {
        eprintln!("{}", status.red());
        return;
    }

    loop {
        let report = interp.step();
        if !report.output.is_empty() {
            print!("{}", report.output);
        }
        if let Some(status) = &report.status {
            eprintln!("{}", status.red());
            break;
        }

        eprint!("{}", format!("[{}/{}] ", report.position, report.total).dimmed());
        print_stack(interp);

        if !report.has_more {
            break;
        }
    }
}
