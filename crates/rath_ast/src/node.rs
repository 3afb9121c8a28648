//! AST node definitions.
//!
//! Every node lives in the compile's bump arena and refers to its children
//! through shared `&'a` references. Nothing here implements `Drop`; the arena
//! releases the whole tree at once.
//!
//! A `Switch` stores its scrutinee once. Each direct case test is a
//! synthesized `Binop(==)` whose `left` is that same reference, so
//! `std::ptr::eq(test.left, switch.scrutinee)` holds for every direct case.

use crate::grammar::Operator;
use crate::types::VarFlags;
use rath_core::text::SourceLoc;

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Expression
// ============================================================================

/// The closed set of expression nodes.
#[derive(Debug, Clone, Copy)]
pub enum Expr<'a> {
    Unop(Unop<'a>),
    Binop(Binop<'a>),
    Constant(Constant<'a>),
    Call(Call<'a>),
    Function(Function<'a>),
    Return(Return<'a>),
    Block(Block<'a>),
    If(If<'a>),
    Switch(Switch<'a>),
    Assign(Assign<'a>),
}

impl<'a> Expr<'a> {
    /// Location of the token that introduced this node.
    pub fn loc(&self) -> SourceLoc {
        match self {
            Expr::Unop(n) => n.loc,
            Expr::Binop(n) => n.loc,
            Expr::Constant(n) => n.loc,
            Expr::Call(n) => n.loc,
            Expr::Function(n) => n.loc,
            Expr::Return(n) => n.loc,
            Expr::Block(n) => n.loc,
            Expr::If(n) => n.loc,
            Expr::Switch(n) => n.loc,
            Expr::Assign(n) => n.loc,
        }
    }

    /// Short node name used by the printer and in test failures.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Unop(_) => "Unop",
            Expr::Binop(_) => "Binop",
            Expr::Constant(_) => "Constant",
            Expr::Call(_) => "Call",
            Expr::Function(_) => "Function",
            Expr::Return(_) => "Return",
            Expr::Block(_) => "Block",
            Expr::If(_) => "If",
            Expr::Switch(_) => "Switch",
            Expr::Assign(_) => "Assign",
        }
    }

    #[inline]
    pub fn as_constant(&self) -> Option<&Constant<'a>> {
        match self {
            Expr::Constant(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_binop(&self) -> Option<&Binop<'a>> {
        match self {
            Expr::Binop(b) => Some(b),
            _ => None,
        }
    }

    /// The constant behind this node unless it is a variable reference; only
    /// these take part in folding.
    pub fn as_literal(&self) -> Option<&Constant<'a>> {
        self.as_constant()
            .filter(|c| !matches!(c.value, ConstantValue::Variable(_)))
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Prefix operator application: `-x`, `&x`.
#[derive(Debug, Clone, Copy)]
pub struct Unop<'a> {
    pub loc: SourceLoc,
    pub op: Operator,
    pub operand: &'a Expr<'a>,
}

/// Binary operator application. `loc` is the operator token.
#[derive(Debug, Clone, Copy)]
pub struct Binop<'a> {
    pub loc: SourceLoc,
    pub op: Operator,
    pub left: &'a Expr<'a>,
    pub right: &'a Expr<'a>,
}

// ============================================================================
// Constants
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Constant<'a> {
    pub loc: SourceLoc,
    pub value: ConstantValue<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue<'a> {
    Int(u64),
    Float(f64),
    String(&'a str),
    Variable(Variable<'a>),
    Null,
    This,
}

impl<'a> ConstantValue<'a> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstantValue::Int(_) => "Int",
            ConstantValue::Float(_) => "Float",
            ConstantValue::String(_) => "String",
            ConstantValue::Variable(_) => "Variable",
            ConstantValue::Null => "Null",
            ConstantValue::This => "This",
        }
    }
}

/// A named binding with its flags. Also used for parameters and `let` targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable<'a> {
    pub loc: SourceLoc,
    pub name: &'a str,
    pub flags: VarFlags,
}

impl<'a> Variable<'a> {
    #[inline]
    pub fn is_packed(&self) -> bool {
        self.flags.contains(VarFlags::PACKED)
    }
}

// ============================================================================
// Calls and Functions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    pub loc: SourceLoc,
    pub name: &'a str,
    pub args: NodeList<'a, &'a Expr<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Function<'a> {
    pub loc: SourceLoc,
    /// `None` for anonymous functions.
    pub name: Option<&'a str>,
    pub params: NodeList<'a, Variable<'a>>,
    pub body: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct Return<'a> {
    pub loc: SourceLoc,
    pub value: Option<&'a Expr<'a>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub loc: SourceLoc,
    pub statements: NodeList<'a, &'a Expr<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct If<'a> {
    pub loc: SourceLoc,
    pub condition: &'a Expr<'a>,
    pub body: &'a Expr<'a>,
    pub else_body: Option<&'a Expr<'a>>,
}

/// `let a, ref b = value`
#[derive(Debug, Clone, Copy)]
pub struct Assign<'a> {
    pub loc: SourceLoc,
    pub vars: NodeList<'a, Variable<'a>>,
    pub value: &'a Expr<'a>,
}

// ============================================================================
// Switch
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Switch<'a> {
    pub loc: SourceLoc,
    pub scrutinee: &'a Expr<'a>,
    pub cases: NodeList<'a, Case<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Case<'a> {
    pub loc: SourceLoc,
    pub condition: CaseCondition<'a>,
    pub body: &'a Expr<'a>,
}

/// The test of one `case` clause.
///
/// For a direct condition `test` is `scrutinee == bound_value`; for a guarded
/// one (`case v when g`) `test` is the guard. Chained groups are OR-merged
/// into a single `test`, keeping the last group's `bound_value`.
#[derive(Debug, Clone, Copy)]
pub struct CaseCondition<'a> {
    pub loc: SourceLoc,
    pub bound_value: &'a Expr<'a>,
    pub test: &'a Expr<'a>,
    pub is_direct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn int<'a>(arena: &'a Bump, value: u64) -> &'a Expr<'a> {
        arena.alloc(Expr::Constant(Constant {
            loc: SourceLoc::default(),
            value: ConstantValue::Int(value),
        }))
    }

    #[test]
    fn test_loc_and_kind_name() {
        let arena = Bump::new();
        let left = int(&arena, 1);
        let right = int(&arena, 2);
        let loc = SourceLoc::new(2, 1, 1);
        let add = Expr::Binop(Binop {
            loc,
            op: Operator::Add,
            left,
            right,
        });
        assert_eq!(add.loc(), loc);
        assert_eq!(add.kind_name(), "Binop");
        assert!(add.as_binop().is_some());
        assert!(add.as_constant().is_none());
    }

    #[test]
    fn test_as_literal_excludes_variables() {
        let arena = Bump::new();
        assert!(matches!(int(&arena, 3).as_literal().map(|c| c.value), Some(ConstantValue::Int(3))));
        let var = Expr::Constant(Constant {
            loc: SourceLoc::default(),
            value: ConstantValue::Variable(Variable {
                loc: SourceLoc::default(),
                name: "x",
                flags: VarFlags::NONE,
            }),
        });
        assert!(var.as_constant().is_some());
        assert!(var.as_literal().is_none());
    }

    #[test]
    fn test_shared_scrutinee_reference() {
        let arena = Bump::new();
        let scrutinee = int(&arena, 9);
        let value = int(&arena, 5);
        let test: &Expr = arena.alloc(Expr::Binop(Binop {
            loc: SourceLoc::default(),
            op: Operator::Eq,
            left: scrutinee,
            right: value,
        }));
        let case = Case {
            loc: SourceLoc::default(),
            condition: CaseCondition {
                loc: SourceLoc::default(),
                bound_value: value,
                test,
                is_direct: true,
            },
            body: int(&arena, 10),
        };
        let cases = arena.alloc_slice_copy(&[case]);
        let switch = Switch {
            loc: SourceLoc::default(),
            scrutinee,
            cases,
        };
        let test = switch.cases[0].condition.test.as_binop().unwrap();
        assert!(std::ptr::eq(test.left, switch.scrutinee));
    }
}
