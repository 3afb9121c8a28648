//! Constant evaluation of binary operators on literal operands.

use bumpalo::collections::String as BumpString;
use bumpalo::Bump;
use rath_ast::grammar::Operator;
use rath_ast::node::ConstantValue;

/// Why a pair of constants could not be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The operator is not defined for these operand types.
    InvalidOperator,
    /// Integer `/` or `%` by zero.
    DivisionByZero,
}

/// Combine two literal constants.
///
/// | left         | right        | operators                        | result |
/// |--------------|--------------|----------------------------------|--------|
/// | Int          | Int          | `+ - * / % & ^ \| << >>`         | Int    |
/// | Int or Float | Int or Float | `+ - * /`                        | Float  |
/// | String       | String       | `+`                              | String |
///
/// Integer arithmetic wraps at 64 bits and shifts by 64 or more yield 0.
pub fn evaluate_binary<'a>(
    arena: &'a Bump,
    op: Operator,
    left: &ConstantValue<'a>,
    right: &ConstantValue<'a>,
) -> Result<ConstantValue<'a>, EvalError> {
    match (left, right) {
        (ConstantValue::Int(l), ConstantValue::Int(r)) => evaluate_int(op, *l, *r).map(ConstantValue::Int),
        (ConstantValue::Int(_) | ConstantValue::Float(_), ConstantValue::Int(_) | ConstantValue::Float(_)) => {
            let (l, r) = (as_float(left), as_float(right));
            evaluate_float(op, l, r).map(ConstantValue::Float)
        }
        (ConstantValue::String(l), ConstantValue::String(r)) if op == Operator::Add => {
            let mut joined = BumpString::with_capacity_in(l.len() + r.len(), arena);
            joined.push_str(l);
            joined.push_str(r);
            Ok(ConstantValue::String(joined.into_bump_str()))
        }
        _ => Err(EvalError::InvalidOperator),
    }
}

fn evaluate_int(op: Operator, l: u64, r: u64) -> Result<u64, EvalError> {
    Ok(match op {
        Operator::Add => l.wrapping_add(r),
        Operator::Sub => l.wrapping_sub(r),
        Operator::Mul => l.wrapping_mul(r),
        Operator::Div => l.checked_div(r).ok_or(EvalError::DivisionByZero)?,
        Operator::Rem => l.checked_rem(r).ok_or(EvalError::DivisionByZero)?,
        Operator::BitAnd => l & r,
        Operator::BitXor => l ^ r,
        Operator::BitOr => l | r,
        Operator::Shl => u32::try_from(r).ok().and_then(|r| l.checked_shl(r)).unwrap_or(0),
        Operator::Shr => u32::try_from(r).ok().and_then(|r| l.checked_shr(r)).unwrap_or(0),
        _ => return Err(EvalError::InvalidOperator),
    })
}

fn evaluate_float(op: Operator, l: f64, r: f64) -> Result<f64, EvalError> {
    match op {
        Operator::Add => Ok(l + r),
        Operator::Sub => Ok(l - r),
        Operator::Mul => Ok(l * r),
        Operator::Div => Ok(l / r),
        _ => Err(EvalError::InvalidOperator),
    }
}

fn as_float(value: &ConstantValue<'_>) -> f64 {
    match value {
        ConstantValue::Int(v) => *v as f64,
        ConstantValue::Float(v) => *v,
        _ => f64::NAN,
    }
}

/// The zero of the same numeric type as `value`, used as the left operand
/// when folding a prefix operator.
pub fn numeric_zero<'a>(value: &ConstantValue<'a>) -> Option<ConstantValue<'a>> {
    match value {
        ConstantValue::Int(_) => Some(ConstantValue::Int(0)),
        ConstantValue::Float(_) => Some(ConstantValue::Float(0.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: Operator, l: ConstantValue<'static>, r: ConstantValue<'static>) -> Result<ConstantValue<'static>, EvalError> {
        // Leaked so string results can outlive the test body.
        let arena: &'static Bump = Box::leak(Box::new(Bump::new()));
        evaluate_binary(arena, op, &l, &r)
    }

    use ConstantValue::{Float, Int};

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(eval(Operator::Add, Int(2), Int(3)), Ok(Int(5)));
        assert_eq!(eval(Operator::Sub, Int(2), Int(3)), Ok(Int(u64::MAX)));
        assert_eq!(eval(Operator::Mul, Int(u64::MAX), Int(2)), Ok(Int(u64::MAX - 1)));
        assert_eq!(eval(Operator::Div, Int(7), Int(2)), Ok(Int(3)));
        assert_eq!(eval(Operator::Rem, Int(7), Int(2)), Ok(Int(1)));
    }

    #[test]
    fn test_int_bitwise() {
        assert_eq!(eval(Operator::BitAnd, Int(0b1100), Int(0b1010)), Ok(Int(0b1000)));
        assert_eq!(eval(Operator::BitXor, Int(0b1100), Int(0b1010)), Ok(Int(0b0110)));
        assert_eq!(eval(Operator::BitOr, Int(0b1100), Int(0b1010)), Ok(Int(0b1110)));
        assert_eq!(eval(Operator::Shl, Int(1), Int(4)), Ok(Int(16)));
        assert_eq!(eval(Operator::Shr, Int(256), Int(4)), Ok(Int(16)));
        assert_eq!(eval(Operator::Shl, Int(1), Int(64)), Ok(Int(0)));
        assert_eq!(eval(Operator::Shr, Int(1), Int(u64::MAX)), Ok(Int(0)));
    }

    #[test]
    fn test_int_division_by_zero() {
        assert_eq!(eval(Operator::Div, Int(1), Int(0)), Err(EvalError::DivisionByZero));
        assert_eq!(eval(Operator::Rem, Int(1), Int(0)), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_mixed_numeric_is_float() {
        assert_eq!(eval(Operator::Add, Int(1), Float(0.5)), Ok(Float(1.5)));
        assert_eq!(eval(Operator::Mul, Float(1.5), Int(2)), Ok(Float(3.0)));
        assert_eq!(eval(Operator::Div, Float(1.0), Float(4.0)), Ok(Float(0.25)));
        assert_eq!(eval(Operator::Rem, Float(1.0), Float(4.0)), Err(EvalError::InvalidOperator));
        assert_eq!(eval(Operator::Shl, Int(1), Float(1.0)), Err(EvalError::InvalidOperator));
    }

    #[test]
    fn test_string_concatenation() {
        let result = eval(Operator::Add, ConstantValue::String("a"), ConstantValue::String("b"));
        assert_eq!(result, Ok(ConstantValue::String("ab")));
        assert_eq!(
            eval(Operator::Sub, ConstantValue::String("a"), ConstantValue::String("b")),
            Err(EvalError::InvalidOperator)
        );
    }

    #[test]
    fn test_comparisons_and_mixed_types_are_rejected() {
        assert_eq!(eval(Operator::Eq, Int(1), Int(1)), Err(EvalError::InvalidOperator));
        assert_eq!(eval(Operator::And, Int(1), Int(1)), Err(EvalError::InvalidOperator));
        assert_eq!(eval(Operator::Add, Int(1), ConstantValue::String("a")), Err(EvalError::InvalidOperator));
        assert_eq!(eval(Operator::Add, ConstantValue::Null, ConstantValue::Null), Err(EvalError::InvalidOperator));
    }

    #[test]
    fn test_numeric_zero() {
        assert_eq!(numeric_zero(&Int(5)), Some(Int(0)));
        assert_eq!(numeric_zero(&Float(2.5)), Some(Float(0.0)));
        assert_eq!(numeric_zero(&ConstantValue::This), None);
    }
}
