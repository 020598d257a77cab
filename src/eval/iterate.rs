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

//! Implicit iteration (§4.5.5): scalar operators broadcast over
//! Vectors, recursively, with equal-length Vectors required when both
//! operands are Vectors.

use crate::error::{RatError, RatResult};
use crate::value::Value;

/// Applies a binary scalar `op` to `a` and `b`, broadcasting across
/// Vectors per the implicit iteration rule.
pub fn broadcast_binary(
    a: &Value,
    b: &Value,
    op: &dyn Fn(&Value, &Value) -> RatResult<Value>,
) -> RatResult<Value> {
    match (a, b) {
        (Value::Vector(va), Value::Vector(vb)) => {
            if va.len() != vb.len() {
                return Err(RatError::LengthMismatch);
            }
            let items = va
                .iter()
                .zip(vb.iter())
                .map(|(x, y)| broadcast_binary(x, y, op))
                .collect::<RatResult<Vec<_>>>()?;
            Ok(Value::Vector(items))
        }
        (Value::Vector(va), scalar) => {
            let items = va
                .iter()
                .map(|x| broadcast_binary(x, scalar, op))
                .collect::<RatResult<Vec<_>>>()?;
            Ok(Value::Vector(items))
        }
        (scalar, Value::Vector(vb)) => {
            let items = vb
                .iter()
                .map(|y| broadcast_binary(scalar, y, op))
                .collect::<RatResult<Vec<_>>>()?;
            Ok(Value::Vector(items))
        }
        (x, y) => op(x, y),
    }
}

/// Applies a unary scalar `op` to `a`, broadcasting recursively across
/// nested Vectors (used by `NOT`).
pub fn broadcast_unary(a: &Value, op: &dyn Fn(&Value) -> RatResult<Value>) -> RatResult<Value> {
    match a {
        Value::Vector(v) => {
            let items = v
                .iter()
                .map(|x| broadcast_unary(x, op))
                .collect::<RatResult<Vec<_>>>()?;
            Ok(Value::Vector(items))
        }
        other => op(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Rational;

    fn add(a: &Value, b: &Value) -> RatResult<Value> {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => Ok(Value::Number(x.add(y)?)),
            _ => Err(RatError::TypeError),
        }
    }

    #[test]
    fn scalar_scalar() {
        let a = Value::Number(Rational::from_int(2));
        let b = Value::Number(Rational::from_int(3));
        assert_eq!(
            broadcast_binary(&a, &b, &add).unwrap(),
            Value::Number(Rational::from_int(5))
        );
    }

    #[test]
    fn scalar_broadcasts_over_vector() {
        let scalar = Value::Number(Rational::from_int(5));
        let vector = Value::Vector(vec![
            Value::Number(Rational::from_int(1)),
            Value::Number(Rational::from_int(2)),
            Value::Number(Rational::from_int(3)),
        ]);
        let result = broadcast_binary(&scalar, &vector, &add).unwrap();
        assert_eq!(
            result,
            Value::Vector(vec![
                Value::Number(Rational::from_int(6)),
                Value::Number(Rational::from_int(7)),
                Value::Number(Rational::from_int(8)),
            ])
        );
    }

    #[test]
    fn equal_length_vectors_zip() {
        let a = Value::Vector(vec![
            Value::Number(Rational::from_int(1)),
            Value::Number(Rational::from_int(2)),
        ]);
        let b = Value::Vector(vec![
            Value::Number(Rational::from_int(10)),
            Value::Number(Rational::from_int(20)),
        ]);
        let result = broadcast_binary(&a, &b, &add).unwrap();
        assert_eq!(
            result,
            Value::Vector(vec![
                Value::Number(Rational::from_int(11)),
                Value::Number(Rational::from_int(22)),
            ])
        );
    }

    #[test]
    fn differing_length_vectors_fail() {
        let a = Value::Vector(vec![Value::Number(Rational::from_int(1))]);
        let b = Value::Vector(vec![
            Value::Number(Rational::from_int(1)),
            Value::Number(Rational::from_int(2)),
        ]);
        assert_eq!(broadcast_binary(&a, &b, &add), Err(RatError::LengthMismatch));
    }

    #[test]
    fn nested_vectors_broadcast_recursively() {
        let scalar = Value::Number(Rational::from_int(1));
        let nested = Value::Vector(vec![Value::Vector(vec![Value::Number(Rational::from_int(
            1,
        ))])]);
        let result = broadcast_binary(&scalar, &nested, &add).unwrap();
        assert_eq!(
            result,
            Value::Vector(vec![Value::Vector(vec![Value::Number(Rational::from_int(
                2
            ))])])
        );
    }

    #[test]
    fn unary_broadcasts_over_nested_booleans() {
        fn not(a: &Value) -> RatResult<Value> {
            match a {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                _ => Err(RatError::TypeError),
            }
        }
        let nested = Value::Vector(vec![
            Value::Boolean(true),
            Value::Vector(vec![Value::Boolean(false)]),
        ]);
        let result = broadcast_unary(&nested, &not).unwrap();
        assert_eq!(
            result,
            Value::Vector(vec![
                Value::Boolean(false),
                Value::Vector(vec![Value::Boolean(true)]),
            ])
        );
    }
}
