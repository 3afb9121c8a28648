//! The constant folder.
//!
//! A post-order rewrite of the tree: children are folded first, then any
//! operator whose operands are all literals is replaced by a new `Constant`.
//! Nodes whose children come back unchanged are returned as-is, so folding
//! an already folded tree returns the very same tree.

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use rath_ast::node::*;
use rath_core::text::SourceLoc;
use rath_diagnostics::{messages, Diagnostic, DiagnosticResult, SourceText};

use crate::eval::{evaluate_binary, numeric_zero, EvalError};

/// Folds constant sub-expressions of a parsed tree.
pub struct Folder<'a> {
    arena: &'a Bump,
    source: SourceText<'a>,
    /// Enclosing switch scrutinees paired with their folded form, innermost last.
    scrutinees: Vec<(&'a Expr<'a>, &'a Expr<'a>)>,
}

impl<'a> Folder<'a> {
    pub fn new(arena: &'a Bump, file_name: &'a str, source_text: &'a str) -> Self {
        Self {
            arena,
            source: SourceText::new(file_name, source_text),
            scrutinees: Vec::new(),
        }
    }

    /// Fold `expr` and everything below it.
    pub fn fold(&mut self, expr: &'a Expr<'a>) -> DiagnosticResult<&'a Expr<'a>> {
        if let Some(folded) = self.folded_scrutinee(expr) {
            return Ok(folded);
        }
        match expr {
            Expr::Constant(_) => Ok(expr),
            Expr::Unop(n) => self.fold_unop(expr, n),
            Expr::Binop(_) => self.fold_binop_chain(expr),
            Expr::Call(n) => {
                let args = self.fold_list(n.args)?;
                if same_slice(args, n.args) {
                    return Ok(expr);
                }
                Ok(self.alloc(Expr::Call(Call { args, ..*n })))
            }
            Expr::Function(n) => {
                let body = self.fold(n.body)?;
                if same(body, n.body) {
                    return Ok(expr);
                }
                Ok(self.alloc(Expr::Function(Function { body, ..*n })))
            }
            Expr::Return(n) => {
                let Some(value) = n.value else {
                    return Ok(expr);
                };
                let folded = self.fold(value)?;
                if same(folded, value) {
                    return Ok(expr);
                }
                Ok(self.alloc(Expr::Return(Return {
                    value: Some(folded),
                    ..*n
                })))
            }
            Expr::Block(n) => {
                let statements = self.fold_list(n.statements)?;
                if same_slice(statements, n.statements) {
                    return Ok(expr);
                }
                Ok(self.alloc(Expr::Block(Block { statements, ..*n })))
            }
            Expr::If(n) => self.fold_if(expr, n),
            Expr::Switch(n) => self.fold_switch(expr, n),
            Expr::Assign(n) => {
                let value = self.fold(n.value)?;
                if same(value, n.value) {
                    return Ok(expr);
                }
                Ok(self.alloc(Expr::Assign(Assign { value, ..*n })))
            }
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn fold_unop(&mut self, expr: &'a Expr<'a>, n: &Unop<'a>) -> DiagnosticResult<&'a Expr<'a>> {
        let operand = self.fold(n.operand)?;

        if let Some(constant) = operand.as_constant() {
            match constant.value {
                ConstantValue::Int(_) | ConstantValue::Float(_) => {
                    let zero = numeric_zero(&constant.value).unwrap_or(ConstantValue::Int(0));
                    let value = evaluate_binary(self.arena, n.op, &zero, &constant.value)
                        .map_err(|e| self.eval_error(e, n.loc, n.op.text()))?;
                    return Ok(self.alloc(Expr::Constant(Constant { loc: n.loc, value })));
                }
                ConstantValue::String(_) | ConstantValue::Null | ConstantValue::This => {
                    return Err(self
                        .source
                        .error(n.loc, &messages::INVALID_UNARY_OPERATOR_0_ON_CONSTANT, &[n.op.text()]));
                }
                ConstantValue::Variable(_) => {}
            }
        }

        if same(operand, n.operand) {
            return Ok(expr);
        }
        Ok(self.alloc(Expr::Unop(Unop { operand, ..*n })))
    }

    /// Parsed operator chains such as `1 + 2 + ... + n` nest down their left
    /// operand, so the left spine is walked with an explicit stack and the
    /// chain is rebuilt bottom-up.
    fn fold_binop_chain(&mut self, expr: &'a Expr<'a>) -> DiagnosticResult<&'a Expr<'a>> {
        let mut spine = Vec::new();
        let mut cursor = expr;
        while let Expr::Binop(n) = cursor {
            if self.folded_scrutinee(cursor).is_some() {
                break;
            }
            spine.push((cursor, n));
            cursor = n.left;
        }

        let mut left = self.fold(cursor)?;
        while let Some((node, n)) = spine.pop() {
            left = self.fold_binop(node, n, left)?;
        }
        Ok(left)
    }

    /// Fold one `Binop` whose left operand has already been folded.
    fn fold_binop(&mut self, expr: &'a Expr<'a>, n: &Binop<'a>, left: &'a Expr<'a>) -> DiagnosticResult<&'a Expr<'a>> {
        // A direct case test compares against the shared scrutinee; only its
        // value side is folded and the comparison itself is kept.
        let case_test = self.folded_scrutinee(n.left).is_some();
        let right = self.fold(n.right)?;

        if !case_test {
            if let (Some(l), Some(r)) = (left.as_literal(), right.as_literal()) {
                let value = evaluate_binary(self.arena, n.op, &l.value, &r.value)
                    .map_err(|e| self.eval_error(e, n.loc, n.op.text()))?;
                return Ok(self.alloc(Expr::Constant(Constant { loc: l.loc, value })));
            }
        }

        if same(left, n.left) && same(right, n.right) {
            return Ok(expr);
        }
        Ok(self.alloc(Expr::Binop(Binop { left, right, ..*n })))
    }

    fn eval_error(&self, error: EvalError, loc: SourceLoc, op: &str) -> Diagnostic {
        match error {
            EvalError::InvalidOperator => self
                .source
                .error(loc, &messages::INVALID_OPERATOR_0_ON_CONSTANTS, &[op]),
            EvalError::DivisionByZero => self.source.error(loc, &messages::DIVISION_BY_ZERO, &[]),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn fold_if(&mut self, expr: &'a Expr<'a>, n: &If<'a>) -> DiagnosticResult<&'a Expr<'a>> {
        let condition = self.fold(n.condition)?;
        let body = self.fold(n.body)?;
        let else_body = match n.else_body {
            Some(e) => Some(self.fold(e)?),
            None => None,
        };

        let else_same = match (else_body, n.else_body) {
            (Some(a), Some(b)) => same(a, b),
            _ => true,
        };
        if same(condition, n.condition) && same(body, n.body) && else_same {
            return Ok(expr);
        }
        Ok(self.alloc(Expr::If(If {
            condition,
            body,
            else_body,
            ..*n
        })))
    }

    /// The scrutinee is folded once; every direct case test then picks up
    /// that folded node in place of the original reference.
    fn fold_switch(&mut self, expr: &'a Expr<'a>, n: &Switch<'a>) -> DiagnosticResult<&'a Expr<'a>> {
        let scrutinee = self.fold(n.scrutinee)?;
        self.scrutinees.push((n.scrutinee, scrutinee));
        let cases = self.fold_cases(n.cases);
        self.scrutinees.pop();
        let cases = cases?;

        if same(scrutinee, n.scrutinee) && std::ptr::eq(cases, n.cases) {
            return Ok(expr);
        }
        Ok(self.alloc(Expr::Switch(Switch {
            scrutinee,
            cases,
            ..*n
        })))
    }

    fn fold_cases(&mut self, cases: &'a [Case<'a>]) -> DiagnosticResult<&'a [Case<'a>]> {
        let mut folded = BumpVec::with_capacity_in(cases.len(), self.arena);
        let mut changed = false;
        for case in cases {
            let condition = &case.condition;
            let bound_value = self.fold(condition.bound_value)?;
            let test = self.fold(condition.test)?;
            let body = self.fold(case.body)?;
            changed |= !(same(bound_value, condition.bound_value) && same(test, condition.test) && same(body, case.body));
            folded.push(Case {
                condition: CaseCondition {
                    bound_value,
                    test,
                    ..*condition
                },
                body,
                ..*case
            });
        }
        if !changed {
            return Ok(cases);
        }
        Ok(folded.into_bump_slice())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn alloc(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc(expr)
    }

    fn folded_scrutinee(&self, expr: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        self.scrutinees
            .iter()
            .rev()
            .find(|(original, _)| std::ptr::eq(*original, expr))
            .map(|(_, folded)| *folded)
    }

    fn fold_list(&mut self, list: &'a [&'a Expr<'a>]) -> DiagnosticResult<&'a [&'a Expr<'a>]> {
        let mut folded = BumpVec::with_capacity_in(list.len(), self.arena);
        for item in list {
            folded.push(self.fold(item)?);
        }
        if same_slice(&folded, list) {
            return Ok(list);
        }
        Ok(folded.into_bump_slice())
    }
}

#[inline]
fn same(a: &Expr<'_>, b: &Expr<'_>) -> bool {
    std::ptr::eq(a, b)
}

fn same_slice(a: &[&Expr<'_>], b: &[&Expr<'_>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y))
}
