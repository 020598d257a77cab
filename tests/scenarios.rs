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

//! Black-box end-to-end scenarios, driven entirely through the public
//! [`ratstack::Interpreter`] handle.

use ratstack::{Interpreter, Value};

fn num(n: i64) -> Value {
    Value::Number(ratstack::num::Rational::from_int(n))
}

#[test]
fn scenario_1_simple_addition() {
    let mut interp = Interpreter::new();
    let outcome = interp.execute("2 3 +");
    assert_eq!(outcome.status, "OK");
    assert_eq!(interp.get_stack(), vec![num(5)]);
    assert!(interp.get_register().is_none());
}

#[test]
fn scenario_2_vector_length() {
    let mut interp = Interpreter::new();
    interp.execute("[ 1 2 3 ] LENGTH");
    assert_eq!(interp.get_stack(), vec![num(3)]);
}

#[test]
fn scenario_3_vector_plus_vector() {
    let mut interp = Interpreter::new();
    interp.execute("[ 1 2 3 ] [ 10 20 30 ] +");
    assert_eq!(
        interp.get_stack(),
        vec![Value::Vector(vec![num(11), num(22), num(33)])]
    );
}

#[test]
fn scenario_4_scalar_broadcast_multiply() {
    let mut interp = Interpreter::new();
    interp.execute("5 [ 1 2 3 ] *");
    assert_eq!(
        interp.get_stack(),
        vec![Value::Vector(vec![num(5), num(10), num(15)])]
    );
}

#[test]
fn scenario_5_def_and_call_reports_custom_word() {
    let mut interp = Interpreter::new();
    let outcome = interp.execute("[ DUP + ] DEF DOUBLE  4 DOUBLE");
    assert_eq!(outcome.status, "OK");
    assert_eq!(interp.get_stack(), vec![num(8)]);

    let info = interp.get_custom_words_info();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].name, "DOUBLE");
    assert_eq!(info[0].description, None);
    assert!(!info[0].protected);
}

#[test]
fn scenario_6_if_selects_branch_on_truthiness() {
    let mut truthy = Interpreter::new();
    truthy.execute("1 [ 42 ] [ 99 ] IF");
    assert_eq!(truthy.get_stack(), vec![num(42)]);

    let mut falsy = Interpreter::new();
    falsy.execute("0 [ 42 ] [ 99 ] IF");
    assert_eq!(falsy.get_stack(), vec![num(99)]);
}

#[test]
fn scenario_7_del_on_referenced_word_is_protected_and_atomic() {
    let mut interp = Interpreter::new();
    interp.execute("[ DUP + ] DEF DOUBLE  [ DOUBLE DOUBLE ] DEF QUAD");
    let stack_before = interp.get_stack();
    let words_before = interp.get_custom_words();

    let outcome = interp.execute("DEL DOUBLE");
    assert_eq!(outcome.status, "Error: DOUBLE is protected");
    assert_eq!(interp.get_stack(), stack_before);
    assert_eq!(interp.get_custom_words(), words_before);
}

#[test]
fn scenario_8_register_roundtrip() {
    let mut interp = Interpreter::new();
    interp.execute("3 >R  R@ R>");
    assert_eq!(interp.get_stack(), vec![num(3), num(3)]);
    assert!(interp.get_register().is_none());
}

#[test]
fn scenario_9_reverse_returns_fresh_vector() {
    let mut interp = Interpreter::new();
    interp.execute("[ 1 2 3 ] REVERSE");
    assert_eq!(
        interp.get_stack(),
        vec![Value::Vector(vec![num(3), num(2), num(1)])]
    );
}

#[test]
fn scenario_10_exact_rational_preserved() {
    let mut interp = Interpreter::new();
    interp.execute("1 2 / 3 *");
    assert_eq!(
        interp.get_stack(),
        vec![Value::Number(ratstack::num::Rational::new(3, 2).unwrap())]
    );
}

#[test]
fn property_step_execute_equivalence() {
    let source = "[ DUP + ] DEF DOUBLE  3 DOUBLE  1 [ 1 ] [ 2 ] IF +";

    let mut executed = Interpreter::new();
    executed.execute(source);

    let mut stepped = Interpreter::new();
    stepped.init_step(source);
    loop {
        let report = stepped.step();
        if !report.has_more {
            break;
        }
    }

    assert_eq!(executed.get_stack(), stepped.get_stack());
    assert_eq!(executed.get_register(), stepped.get_register());
}

#[test]
fn property_reset_idempotence() {
    let mut interp = Interpreter::new();
    interp.execute("[ DUP ] DEF DOUBLE  1 >R");

    interp.reset();
    let stack_once = interp.get_stack();
    let register_once = interp.get_register();
    let words_once = interp.get_custom_words();

    interp.reset();
    assert_eq!(interp.get_stack(), stack_once);
    assert_eq!(interp.get_register(), register_once);
    assert_eq!(interp.get_custom_words(), words_once);
}

#[test]
fn property_iteration_commutativity() {
    let mut vectorized = Interpreter::new();
    vectorized.execute("[ 2 4 6 ] [ 10 20 30 ] +");

    let mut scalarwise = Interpreter::new();
    scalarwise.execute("[ ]  2 10 + APPEND  4 20 + APPEND  6 30 + APPEND");

    assert_eq!(vectorized.get_stack(), scalarwise.get_stack());
}

#[test]
fn protected_word_cannot_be_redefined_either() {
    let mut interp = Interpreter::new();
    let outcome = interp.execute("[ 1 ] DEF +");
    assert_eq!(outcome.status, "Error: + is a builtin word");
    assert!(interp.get_custom_words().is_empty());
}

#[test]
fn failed_primitive_leaves_stack_untouched() {
    let mut interp = Interpreter::new();
    interp.execute("7");
    let before = interp.get_stack();

    let outcome = interp.execute("1 0 /");
    assert_eq!(outcome.status, "Error: division by zero");
    assert_eq!(interp.get_stack(), before);
}

#[test]
fn stepping_a_user_word_call_is_a_single_action() {
    let mut interp = Interpreter::new();
    interp.execute("[ DUP + ] DEF DOUBLE");

    interp.init_step("4 DOUBLE");

    let r1 = interp.step();
    assert_eq!((r1.position, r1.total), (1, 2));
    assert!(r1.has_more);

    let r2 = interp.step();
    assert_eq!((r2.position, r2.total), (2, 2));
    assert!(!r2.has_more);
    assert_eq!(interp.get_stack(), vec![num(8)]);
}
