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

//! The built-in primitive table of §4.5.3.
//!
//! Every primitive here is atomic on failure: a function either pushes
//! its result(s) and returns `Ok`, or restores whatever it popped and
//! returns `Err`, so a failing primitive never leaves the stack in a
//! half-mutated state (§8, "Stack atomicity"). `DEF`/`DEL`/`IF` are
//! registered here too (so their names are protected and appear as
//! builtins to the dictionary) but are never actually invoked through
//! this table — [`super::Evaluator::dispatch_ident`] intercepts them
//! before a lookup happens, since they need to peek further tokens from
//! the active frame rather than just the stack.

use crate::dict::Dictionary;
use crate::error::{RatError, RatResult};
use crate::num::Rational;
use crate::value::Value;

use super::iterate::{broadcast_binary, broadcast_unary};
use super::Evaluator;

pub fn register_builtins(dict: &mut Dictionary) {
    dict.register_builtin("+", op_add);
    dict.register_builtin("-", op_sub);
    dict.register_builtin("*", op_mul);
    dict.register_builtin("/", op_div);
    dict.register_builtin("=", op_eq);
    dict.register_builtin("<", op_lt);
    dict.register_builtin("<=", op_le);
    dict.register_builtin(">", op_gt);
    dict.register_builtin(">=", op_ge);
    dict.register_builtin("NOT", op_not);
    dict.register_builtin("DUP", op_dup);
    dict.register_builtin("DROP", op_drop);
    dict.register_builtin("SWAP", op_swap);
    dict.register_builtin("OVER", op_over);
    dict.register_builtin("ROT", op_rot);
    dict.register_builtin("NIP", op_nip);
    dict.register_builtin(">R", op_to_register);
    dict.register_builtin("R>", op_from_register);
    dict.register_builtin("R@", op_fetch_register);
    dict.register_builtin("LENGTH", op_length);
    dict.register_builtin("HEAD", op_head);
    dict.register_builtin("TAIL", op_tail);
    dict.register_builtin("CONS", op_cons);
    dict.register_builtin("APPEND", op_append);
    dict.register_builtin("REVERSE", op_reverse);
    dict.register_builtin("NTH", op_nth);
    dict.register_builtin("UNCONS", op_uncons);
    dict.register_builtin("EMPTY?", op_empty);
    dict.register_builtin(".", op_dot);
    dict.register_builtin("PRINT", op_print);
    dict.register_builtin("CR", op_cr);
    dict.register_builtin("SPACE", op_space);
    dict.register_builtin("SPACES", op_spaces);
    dict.register_builtin("EMIT", op_emit);
    dict.register_builtin("DEF", special_form);
    dict.register_builtin("DEL", special_form);
    dict.register_builtin("IF", special_form);
}

fn special_form(_ev: &mut Evaluator) -> RatResult<()> {
    unreachable!("DEF/DEL/IF are intercepted before builtin dispatch")
}

// -- arithmetic & comparison, with implicit iteration --------------------

fn binary_numeric(
    ev: &mut Evaluator,
    op: impl Fn(&Rational, &Rational) -> RatResult<Rational>,
) -> RatResult<()> {
    let b = ev.pop()?;
    let a = match ev.pop() {
        Ok(v) => v,
        Err(e) => {
            ev.push(b);
            return Err(e);
        }
    };
    let result = broadcast_binary(&a, &b, &|x, y| match (x, y) {
        (Value::Number(nx), Value::Number(ny)) => Ok(Value::Number(op(nx, ny)?)),
        _ => Err(RatError::TypeError),
    });
    match result {
        Ok(v) => {
            ev.push(v);
            Ok(())
        }
        Err(e) => {
            ev.push(a);
            ev.push(b);
            Err(e)
        }
    }
}

fn binary_compare(ev: &mut Evaluator, cmp: impl Fn(&Rational, &Rational) -> bool) -> RatResult<()> {
    let b = ev.pop()?;
    let a = match ev.pop() {
        Ok(v) => v,
        Err(e) => {
            ev.push(b);
            return Err(e);
        }
    };
    let result = broadcast_binary(&a, &b, &|x, y| match (x, y) {
        (Value::Number(nx), Value::Number(ny)) => Ok(Value::Boolean(cmp(nx, ny))),
        _ => Err(RatError::TypeError),
    });
    match result {
        Ok(v) => {
            ev.push(v);
            Ok(())
        }
        Err(e) => {
            ev.push(a);
            ev.push(b);
            Err(e)
        }
    }
}

fn op_add(ev: &mut Evaluator) -> RatResult<()> {
    binary_numeric(ev, Rational::add)
}

fn op_sub(ev: &mut Evaluator) -> RatResult<()> {
    binary_numeric(ev, Rational::sub)
}

fn op_mul(ev: &mut Evaluator) -> RatResult<()> {
    binary_numeric(ev, Rational::mul)
}

fn op_div(ev: &mut Evaluator) -> RatResult<()> {
    binary_numeric(ev, Rational::div)
}

/// Structural equality. Unlike the arithmetic/comparison primitives,
/// `=` is not in the implicit-iteration list of §4.5.5: two Vectors
/// compare as a single Boolean via ordinary structural equality, not
/// element-wise.
fn op_eq(ev: &mut Evaluator) -> RatResult<()> {
    let b = ev.pop()?;
    let a = match ev.pop() {
        Ok(v) => v,
        Err(e) => {
            ev.push(b);
            return Err(e);
        }
    };
    let eq = a == b;
    ev.push(Value::Boolean(eq));
    Ok(())
}

fn op_lt(ev: &mut Evaluator) -> RatResult<()> {
    binary_compare(ev, |a, b| a < b)
}

fn op_le(ev: &mut Evaluator) -> RatResult<()> {
    binary_compare(ev, |a, b| a <= b)
}

fn op_gt(ev: &mut Evaluator) -> RatResult<()> {
    binary_compare(ev, |a, b| a > b)
}

fn op_ge(ev: &mut Evaluator) -> RatResult<()> {
    binary_compare(ev, |a, b| a >= b)
}

fn op_not(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    let result = broadcast_unary(&a, &|x| match x {
        Value::Boolean(b) => Ok(Value::Boolean(!b)),
        _ => Err(RatError::TypeError),
    });
    match result {
        Ok(v) => {
            ev.push(v);
            Ok(())
        }
        Err(e) => {
            ev.push(a);
            Err(e)
        }
    }
}

// -- stack shuffling -------------------------------------------------------

fn op_dup(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    ev.push(a.clone());
    ev.push(a);
    Ok(())
}

fn op_drop(ev: &mut Evaluator) -> RatResult<()> {
    ev.pop()?;
    Ok(())
}

fn op_swap(ev: &mut Evaluator) -> RatResult<()> {
    let mut v = ev.pop_n(2)?;
    let b = v.pop().unwrap();
    let a = v.pop().unwrap();
    ev.push(b);
    ev.push(a);
    Ok(())
}

fn op_over(ev: &mut Evaluator) -> RatResult<()> {
    let v = ev.pop_n(2)?;
    let a = v[0].clone();
    let b = v[1].clone();
    ev.push(a.clone());
    ev.push(b);
    ev.push(a);
    Ok(())
}

fn op_rot(ev: &mut Evaluator) -> RatResult<()> {
    let mut v = ev.pop_n(3)?;
    let c = v.pop().unwrap();
    let b = v.pop().unwrap();
    let a = v.pop().unwrap();
    ev.push(b);
    ev.push(c);
    ev.push(a);
    Ok(())
}

fn op_nip(ev: &mut Evaluator) -> RatResult<()> {
    let mut v = ev.pop_n(2)?;
    let b = v.pop().unwrap();
    ev.push(b);
    Ok(())
}

// -- register -------------------------------------------------------------

fn op_to_register(ev: &mut Evaluator) -> RatResult<()> {
    if ev.register.is_some() {
        return Err(RatError::RegisterOccupied);
    }
    let a = ev.pop()?;
    ev.register = Some(a);
    Ok(())
}

fn op_from_register(ev: &mut Evaluator) -> RatResult<()> {
    let value = ev.register.take().ok_or(RatError::RegisterEmpty)?;
    ev.push(value);
    Ok(())
}

fn op_fetch_register(ev: &mut Evaluator) -> RatResult<()> {
    let value = ev.register.clone().ok_or(RatError::RegisterEmpty)?;
    ev.push(value);
    Ok(())
}

// -- vectors ----------------------------------------------------------------

fn op_length(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Vector(v) => {
            let n = v.len() as i64;
            ev.push(Value::Number(Rational::from_int(n)));
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

fn op_head(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Vector(v) if v.is_empty() => {
            ev.push(a);
            Err(RatError::EmptyVector)
        }
        Value::Vector(v) => {
            let head = v[0].clone();
            ev.push(head);
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

fn op_tail(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Vector(v) if v.is_empty() => {
            ev.push(a);
            Err(RatError::EmptyVector)
        }
        Value::Vector(v) => {
            let rest = v[1..].to_vec();
            ev.push(Value::Vector(rest));
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

fn op_cons(ev: &mut Evaluator) -> RatResult<()> {
    let pair = ev.pop_n(2)?;
    let (elem, vec_val) = (pair[0].clone(), pair[1].clone());
    match &vec_val {
        Value::Vector(v) => {
            let mut items = Vec::with_capacity(v.len() + 1);
            items.push(elem);
            items.extend(v.iter().cloned());
            ev.push(Value::Vector(items));
            Ok(())
        }
        _ => {
            ev.push(elem);
            ev.push(vec_val);
            Err(RatError::TypeError)
        }
    }
}

fn op_append(ev: &mut Evaluator) -> RatResult<()> {
    let pair = ev.pop_n(2)?;
    let (vec_val, elem) = (pair[0].clone(), pair[1].clone());
    match &vec_val {
        Value::Vector(v) => {
            let mut items = v.clone();
            items.push(elem);
            ev.push(Value::Vector(items));
            Ok(())
        }
        _ => {
            ev.push(vec_val);
            ev.push(elem);
            Err(RatError::TypeError)
        }
    }
}

fn op_reverse(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Vector(v) => {
            let mut items = v.clone();
            items.reverse();
            ev.push(Value::Vector(items));
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

fn op_nth(ev: &mut Evaluator) -> RatResult<()> {
    let pair = ev.pop_n(2)?;
    let (n_val, vec_val) = (pair[0].clone(), pair[1].clone());

    let result = (|| {
        let Value::Number(n) = &n_val else {
            return Err(RatError::TypeError);
        };
        if !n.is_integer() {
            return Err(RatError::TypeError);
        }
        let Value::Vector(v) = &vec_val else {
            return Err(RatError::TypeError);
        };
        let len = v.len() as i64;
        let index = n.numerator();
        let resolved = if index < 0 { len + index } else { index };
        if resolved < 0 || resolved >= len {
            return Err(RatError::IndexOutOfRange {
                index,
                len: v.len(),
            });
        }
        Ok(v[resolved as usize].clone())
    })();

    match result {
        Ok(value) => {
            ev.push(value);
            Ok(())
        }
        Err(e) => {
            ev.push(n_val);
            ev.push(vec_val);
            Err(e)
        }
    }
}

fn op_uncons(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Vector(v) if v.is_empty() => {
            ev.push(a);
            Err(RatError::EmptyVector)
        }
        Value::Vector(v) => {
            let head = v[0].clone();
            let tail = v[1..].to_vec();
            ev.push(head);
            ev.push(Value::Vector(tail));
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

fn op_empty(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Vector(v) => {
            let is_empty = v.is_empty();
            ev.push(Value::Boolean(is_empty));
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

// -- output -----------------------------------------------------------------

fn op_dot(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    ev.write_output(&a.to_display_string());
    Ok(())
}

fn op_print(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    ev.write_output(&a.to_display_string());
    ev.push(a);
    Ok(())
}

fn op_cr(ev: &mut Evaluator) -> RatResult<()> {
    ev.write_output("\n");
    Ok(())
}

fn op_space(ev: &mut Evaluator) -> RatResult<()> {
    ev.write_output(" ");
    Ok(())
}

fn op_spaces(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    match &a {
        Value::Number(n) if n.is_integer() => {
            let count = n.numerator().max(0);
            ev.write_output(&" ".repeat(count as usize));
            Ok(())
        }
        _ => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}

fn op_emit(ev: &mut Evaluator) -> RatResult<()> {
    let a = ev.pop()?;
    let emitted = match &a {
        Value::Number(n) if n.is_integer() => {
            u32::try_from(n.numerator()).ok().and_then(char::from_u32)
        }
        _ => None,
    };
    match emitted {
        Some(c) => {
            ev.write_output(&c.to_string());
            Ok(())
        }
        None => {
            ev.push(a);
            Err(RatError::TypeError)
        }
    }
}
