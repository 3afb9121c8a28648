//! The rath parser implementation.
//!
//! A recursive descent parser with precedence climbing for binary operators.
//! It pulls tokens from the lexer on demand and builds an arena-allocated
//! tree. The first diagnostic aborts the parse.

use std::collections::VecDeque;

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use rath_ast::grammar::{Grammar, Keyword, Operator, OperatorPrecedence};
use rath_ast::node::*;
use rath_ast::syntax_kind::TokenKind;
use rath_ast::types::VarFlags;
use rath_core::text::SourceLoc;
use rath_diagnostics::{messages, Diagnostic, DiagnosticMessage, DiagnosticResult, SourceText};
use rath_lexer::{Lexer, Token};

use crate::precedence::{operator_info, prefix_operand_threshold, right_operand_threshold};
use crate::utilities::{ends_return_value, expects_end, is_list_end};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
pub const MAX_RECURSION_DEPTH: u32 = 256;

/// The parser produces an expression tree from rath source text.
pub struct Parser<'a> {
    arena: &'a Bump,
    grammar: &'a Grammar,
    lexer: Lexer<'a>,
    source: SourceText<'a>,
    /// The token under the cursor.
    current: Token<'a>,
    /// Tokens lexed ahead by `peek`, replayed in order by `advance`.
    pushback: VecDeque<Token<'a>>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, grammar: &'a Grammar, file_name: &'a str, source_text: &'a str) -> Self {
        let mut lexer = Lexer::new(grammar);
        lexer.feed(file_name, source_text);
        Self {
            arena,
            grammar,
            lexer,
            source: SourceText::new(file_name, source_text),
            current: Token::new(TokenKind::EndOfFile, "", SourceLoc::default()),
            pushback: VecDeque::new(),
            recursion_depth: 0,
        }
    }

    /// Parse the whole source. A program with a single statement is returned
    /// as that statement; several statements are wrapped in a `Block`; an
    /// empty program yields `None`.
    pub fn parse(mut self) -> DiagnosticResult<Option<&'a Expr<'a>>> {
        self.advance()?;
        let statements = self.parse_statement_list(TokenKind::EndOfFile)?;
        Ok(match statements {
            [] => None,
            [single] => Some(*single),
            [first, ..] => Some(self.alloc(Expr::Block(Block {
                loc: first.loc(),
                statements,
            }))),
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Move to the next token, replaying pushed-back tokens first.
    fn advance(&mut self) -> DiagnosticResult<Token<'a>> {
        let previous = self.current;
        self.current = match self.pushback.pop_front() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(previous)
    }

    /// Look `n` tokens past the current one without consuming anything.
    fn peek_nth(&mut self, n: usize) -> DiagnosticResult<Token<'a>> {
        while self.pushback.len() <= n {
            let token = self.lexer.next_token()?;
            self.pushback.push_back(token);
        }
        Ok(self.pushback[n])
    }

    #[inline]
    fn peek(&mut self) -> DiagnosticResult<Token<'a>> {
        self.peek_nth(0)
    }

    /// The first token at or after the cursor that is not a newline.
    fn peek_past_newlines(&mut self) -> DiagnosticResult<Token<'a>> {
        if self.current.kind != TokenKind::Newline {
            return Ok(self.current);
        }
        let mut n = 0;
        loop {
            let token = self.peek_nth(n)?;
            if token.kind != TokenKind::Newline {
                return Ok(token);
            }
            n += 1;
        }
    }

    fn skip_newlines(&mut self) -> DiagnosticResult<()> {
        while self.current.kind == TokenKind::Newline {
            self.advance()?;
        }
        Ok(())
    }

    fn skip_terminators(&mut self) -> DiagnosticResult<()> {
        while self.current.kind.is_terminator() {
            self.advance()?;
        }
        Ok(())
    }

    /// Advance past the current token if it has `kind` (and `text`, when
    /// given). On a mismatch, fails unless `optional` is set, in which case
    /// nothing is consumed and `None` is returned.
    fn consume(&mut self, kind: TokenKind, text: Option<&str>, optional: bool) -> DiagnosticResult<Option<Token<'a>>> {
        let matches = self.current.kind == kind && text.map_or(true, |t| self.current.text == t);
        if matches {
            return self.advance().map(Some);
        }
        if optional {
            return Ok(None);
        }
        let expected = match text {
            Some(t) => format!("'{}'", t),
            None => kind.name().to_string(),
        };
        Err(self.unexpected(&expected))
    }

    #[inline]
    fn expect_token(&mut self, kind: TokenKind) -> DiagnosticResult<Token<'a>> {
        match self.consume(kind, None, false)? {
            Some(token) => Ok(token),
            None => Err(self.unexpected(kind.name())),
        }
    }

    #[inline]
    fn optional_token(&mut self, kind: TokenKind) -> DiagnosticResult<Option<Token<'a>>> {
        self.consume(kind, None, true)
    }

    #[inline]
    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword && self.grammar.keyword(self.current.text) == Some(keyword)
    }

    #[inline]
    fn at_operator(&self, operator: Operator) -> bool {
        operator_info(self.grammar, &self.current).is_some_and(|info| info.operator == operator)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> DiagnosticResult<Token<'a>> {
        if self.at_keyword(keyword) {
            return self.advance();
        }
        let expected = format!("'{}'", self.grammar.keyword_text(keyword));
        Err(self.unexpected(&expected))
    }

    fn optional_keyword(&mut self, keyword: Keyword) -> DiagnosticResult<Option<Token<'a>>> {
        if self.at_keyword(keyword) {
            return self.advance().map(Some);
        }
        Ok(None)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn alloc(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc(expr)
    }

    fn error(&self, loc: SourceLoc, message: &DiagnosticMessage, args: &[&str]) -> Diagnostic {
        self.source.error(loc, message, args)
    }

    /// "Expected X, got Y" at the current token.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        let got = self.current.describe();
        self.error(self.current.loc, &messages::EXPECTED_0_GOT_1, &[expected, &got])
    }

    fn with_recursion_guard<T>(&mut self, f: impl FnOnce(&mut Self) -> DiagnosticResult<T>) -> DiagnosticResult<T> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            let limit = MAX_RECURSION_DEPTH.to_string();
            return Err(self.error(self.current.loc, &messages::NESTING_EXCEEDS_0_LEVELS, &[&limit]));
        }
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Statements up to (not including) `end`. Each statement must be
    /// followed by a newline or `;` unless its shape already closes it, or
    /// the list ends right after it.
    fn parse_statement_list(&mut self, end: TokenKind) -> DiagnosticResult<&'a [&'a Expr<'a>]> {
        let mut statements = BumpVec::new_in(self.arena);
        loop {
            self.skip_terminators()?;
            if self.current.kind == end {
                break;
            }
            if is_list_end(self.current.kind) {
                return Err(self.unexpected(end.name()));
            }

            let statement = self.parse_statement()?;
            statements.push(statement);

            if is_list_end(self.current.kind) {
                continue;
            }
            if expects_end(statement) {
                if !self.current.kind.is_terminator() {
                    return Err(self.unexpected("Newline"));
                }
                self.advance()?;
            } else {
                self.optional_token(TokenKind::Semicolon)?;
            }
        }
        Ok(statements.into_bump_slice())
    }

    /// A statement: block, `let`, `return`, named `func`, or any expression.
    fn parse_statement(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        self.with_recursion_guard(|p| {
            if p.current.kind == TokenKind::OpenBrace {
                return p.parse_block();
            }
            if p.at_keyword(Keyword::Let) {
                return p.parse_let();
            }
            if p.at_keyword(Keyword::Return) {
                return p.parse_return();
            }
            if p.at_keyword(Keyword::Func) {
                return p.parse_function(true);
            }
            p.parse_expression(OperatorPrecedence::Assignment.level())
        })
    }

    fn parse_block(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let open = self.expect_token(TokenKind::OpenBrace)?;
        let statements = self.parse_statement_list(TokenKind::CloseBrace)?;
        self.expect_token(TokenKind::CloseBrace)?;
        Ok(self.alloc(Expr::Block(Block {
            loc: open.loc,
            statements,
        })))
    }

    /// `let a, ref b, ...rest = value`
    fn parse_let(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let let_token = self.expect_keyword(Keyword::Let)?;

        let mut vars = BumpVec::new_in(self.arena);
        if !self.at_operator(Operator::Assign) {
            loop {
                vars.push(self.parse_variable_binding()?);
                if self.optional_token(TokenKind::Comma)?.is_none() {
                    break;
                }
            }
        }

        match vars.as_slice() {
            [] => return Err(self.error(self.current.loc, &messages::NO_VARIABLE_NAME_PROVIDED, &[])),
            [single] if single.is_packed() => {
                return Err(self.error(
                    single.loc,
                    &messages::SINGLE_VARIABLE_DECLARATION_CANNOT_BE_PACKED,
                    &[],
                ));
            }
            _ => {}
        }

        let grammar = self.grammar;
        let assign = grammar.operator_text(Operator::Assign);
        self.consume(TokenKind::Operator, Some(assign), false)?;
        self.skip_newlines()?;
        let value = if self.at_keyword(Keyword::Func) {
            self.parse_function(false)?
        } else {
            self.parse_statement()?
        };

        Ok(self.alloc(Expr::Assign(Assign {
            loc: let_token.loc,
            vars: vars.into_bump_slice(),
            value,
        })))
    }

    /// A binding name with its `ref`/`const` prefixes and optional `...`.
    fn parse_variable_binding(&mut self) -> DiagnosticResult<Variable<'a>> {
        let mut flags = VarFlags::NONE;
        loop {
            if self.optional_keyword(Keyword::Ref)?.is_some() {
                flags |= VarFlags::REF;
            } else if self.optional_keyword(Keyword::Const)?.is_some() {
                flags |= VarFlags::CONST;
            } else if self.at_operator(Operator::Ellipsis) {
                self.advance()?;
                flags |= VarFlags::PACKED;
            } else {
                break;
            }
        }
        let name = self.expect_token(TokenKind::Identifier)?;
        Ok(Variable {
            loc: name.loc,
            name: name.text,
            flags,
        })
    }

    fn parse_return(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let return_token = self.expect_keyword(Keyword::Return)?;
        let value = if ends_return_value(self.current.kind) {
            None
        } else {
            Some(self.parse_expression(OperatorPrecedence::Assignment.level())?)
        };
        Ok(self.alloc(Expr::Return(Return {
            loc: return_token.loc,
            value,
        })))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// `func name(a, b) -> body`, `func name a, b -> body`, `func(x) body`.
    ///
    /// In statement position the name is required unless the parameter list
    /// starts right away; in expression position there is never a name.
    fn parse_function(&mut self, statement: bool) -> DiagnosticResult<&'a Expr<'a>> {
        let func_token = self.expect_keyword(Keyword::Func)?;

        let starts_params = matches!(self.current.kind, TokenKind::OpenParen | TokenKind::Arrow);
        let name = if statement && !starts_params {
            Some(self.expect_token(TokenKind::Identifier)?.text)
        } else {
            None
        };

        let mut params = BumpVec::new_in(self.arena);
        if self.optional_token(TokenKind::OpenParen)?.is_some() {
            self.skip_newlines()?;
            if self.current.kind != TokenKind::CloseParen {
                loop {
                    params.push(self.parse_variable_binding()?);
                    self.skip_newlines()?;
                    if self.optional_token(TokenKind::Comma)?.is_none() {
                        break;
                    }
                    self.skip_newlines()?;
                }
            }
            self.expect_token(TokenKind::CloseParen)?;
            self.optional_token(TokenKind::Arrow)?;
        } else {
            while self.current.kind != TokenKind::Arrow {
                params.push(self.parse_variable_binding()?);
                if self.optional_token(TokenKind::Comma)?.is_none() {
                    break;
                }
            }
            self.expect_token(TokenKind::Arrow)?;
        }

        self.skip_newlines()?;
        let body = self.parse_statement()?;

        Ok(self.alloc(Expr::Function(Function {
            loc: func_token.loc,
            name,
            params: params.into_bump_slice(),
            body,
        })))
    }

    // ========================================================================
    // Conditionals
    // ========================================================================

    /// `if (cond) then body else other`; the parentheses, the `then`/`->`
    /// separator and the `else` branch are all optional.
    fn parse_if(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let if_token = self.expect_keyword(Keyword::If)?;

        let parenthesized = self.optional_token(TokenKind::OpenParen)?.is_some();
        if parenthesized {
            self.skip_newlines()?;
        }
        let condition = self.parse_expression(OperatorPrecedence::Assignment.level())?;
        if parenthesized {
            self.skip_newlines()?;
            self.expect_token(TokenKind::CloseParen)?;
        }

        if self.optional_keyword(Keyword::Then)?.is_none() {
            self.optional_token(TokenKind::Arrow)?;
        }
        self.skip_newlines()?;
        let body = self.parse_statement()?;

        let next = self.peek_past_newlines()?;
        let else_body = if next.kind == TokenKind::Keyword && self.grammar.keyword(next.text) == Some(Keyword::Else) {
            self.skip_newlines()?;
            self.expect_keyword(Keyword::Else)?;
            self.skip_newlines()?;
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(self.alloc(Expr::If(If {
            loc: if_token.loc,
            condition,
            body,
            else_body,
        })))
    }

    /// `switch scrutinee -> { case 1 case 2 -> a; case v when v > 2 -> b }`
    fn parse_switch(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let switch_token = self.expect_keyword(Keyword::Switch)?;
        let scrutinee = self.parse_expression(OperatorPrecedence::Assignment.level())?;
        self.optional_token(TokenKind::Arrow)?;
        self.skip_newlines()?;
        self.expect_token(TokenKind::OpenBrace)?;

        let mut cases = BumpVec::new_in(self.arena);
        loop {
            self.skip_terminators()?;
            if self.current.kind == TokenKind::CloseBrace {
                break;
            }
            cases.push(self.parse_case(scrutinee)?);
        }
        self.expect_token(TokenKind::CloseBrace)?;

        Ok(self.alloc(Expr::Switch(Switch {
            loc: switch_token.loc,
            scrutinee,
            cases: cases.into_bump_slice(),
        })))
    }

    /// One clause: one or more `case` groups, `->`, then the shared body.
    /// Groups are OR-merged left to right into a single test.
    fn parse_case(&mut self, scrutinee: &'a Expr<'a>) -> DiagnosticResult<Case<'a>> {
        let first_case = self.expect_keyword(Keyword::Case)?;
        let mut condition = self.parse_case_group(scrutinee)?;

        loop {
            self.skip_newlines()?;
            let Some(case_token) = self.optional_keyword(Keyword::Case)? else {
                break;
            };
            let next = self.parse_case_group(scrutinee)?;
            let test = self.alloc(Expr::Binop(Binop {
                loc: case_token.loc,
                op: Operator::Or,
                left: condition.test,
                right: next.test,
            }));
            condition = CaseCondition {
                loc: condition.loc,
                bound_value: next.bound_value,
                test,
                is_direct: condition.is_direct && next.is_direct,
            };
        }

        self.expect_token(TokenKind::Arrow)?;
        self.skip_newlines()?;
        let body = self.parse_statement()?;

        Ok(Case {
            loc: first_case.loc,
            condition,
            body,
        })
    }

    /// `value` (compared against the scrutinee) or `value when guard`.
    fn parse_case_group(&mut self, scrutinee: &'a Expr<'a>) -> DiagnosticResult<CaseCondition<'a>> {
        let bound_value = self.parse_expression(OperatorPrecedence::Assignment.level())?;
        let loc = bound_value.loc();

        if self.optional_keyword(Keyword::When)?.is_some() {
            let guard = self.parse_expression(OperatorPrecedence::Assignment.level())?;
            return Ok(CaseCondition {
                loc,
                bound_value,
                test: guard,
                is_direct: false,
            });
        }

        let test = self.alloc(Expr::Binop(Binop {
            loc,
            op: Operator::Eq,
            left: scrutinee,
            right: bound_value,
        }));
        Ok(CaseCondition {
            loc,
            bound_value,
            test,
            is_direct: true,
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Precedence climbing over the grammar's operator table.
    fn parse_expression(&mut self, min_precedence: u8) -> DiagnosticResult<&'a Expr<'a>> {
        self.with_recursion_guard(|p| p.parse_binary_expression(min_precedence))
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> DiagnosticResult<&'a Expr<'a>> {
        let mut left = self.parse_primary_expression()?;

        loop {
            let Some(info) = operator_info(self.grammar, &self.current).copied() else {
                break;
            };
            match info.operator {
                Operator::Assign => {
                    return Err(self.error(self.current.loc, &messages::ASSIGNMENT_ONLY_ALLOWED_IN_DECLARATION, &[]));
                }
                Operator::Ellipsis => {
                    return Err(self.error(self.current.loc, &messages::ILLEGAL_VARARGS_OPERATOR, &[]));
                }
                _ => {}
            }
            let Some(precedence) = info.precedence else {
                break;
            };
            if precedence.level() < min_precedence {
                break;
            }

            let op_token = self.advance()?;
            self.skip_newlines()?;
            let right = self.parse_expression(right_operand_threshold(&info, precedence.level()))?;
            left = self.alloc(Expr::Binop(Binop {
                loc: op_token.loc,
                op: info.operator,
                left,
                right,
            }));
        }

        Ok(left)
    }

    fn parse_primary_expression(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let token = self.current;
        match token.kind {
            TokenKind::Identifier => {
                if self.peek()?.kind == TokenKind::OpenParen {
                    return self.parse_call();
                }
                self.advance()?;
                Ok(self.constant(
                    token.loc,
                    ConstantValue::Variable(Variable {
                        loc: token.loc,
                        name: token.text,
                        flags: VarFlags::NONE,
                    }),
                ))
            }
            TokenKind::StringLiteral => {
                self.advance()?;
                Ok(self.constant(token.loc, ConstantValue::String(token.text)))
            }
            TokenKind::NumberLiteral => {
                self.advance()?;
                let value = self.parse_number(&token)?;
                Ok(self.constant(token.loc, value))
            }
            TokenKind::OpenParen => {
                self.advance()?;
                self.skip_newlines()?;
                let inner = self.parse_expression(OperatorPrecedence::Assignment.level())?;
                self.skip_newlines()?;
                self.expect_token(TokenKind::CloseParen)?;
                Ok(inner)
            }
            TokenKind::Keyword => match self.grammar.keyword(token.text) {
                Some(Keyword::Null) => {
                    self.advance()?;
                    Ok(self.constant(token.loc, ConstantValue::Null))
                }
                Some(Keyword::This) => {
                    self.advance()?;
                    Ok(self.constant(token.loc, ConstantValue::This))
                }
                Some(Keyword::Func) => self.parse_function(false),
                Some(Keyword::Switch) => self.parse_switch(),
                Some(Keyword::If) => self.parse_if(),
                _ => Err(self.error(token.loc, &messages::UNEXPECTED_KEYWORD_0, &[token.text])),
            },
            TokenKind::Operator => match operator_info(self.grammar, &token).copied() {
                Some(info) if info.prefix => {
                    self.advance()?;
                    let operand = self.parse_expression(prefix_operand_threshold(&info))?;
                    Ok(self.alloc(Expr::Unop(Unop {
                        loc: token.loc,
                        op: info.operator,
                        operand,
                    })))
                }
                Some(info) if info.operator == Operator::Ellipsis => {
                    Err(self.error(token.loc, &messages::ILLEGAL_VARARGS_OPERATOR, &[]))
                }
                _ => Err(self.unexpected("expression")),
            },
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `name(arg, ...)`; newlines are allowed around arguments.
    fn parse_call(&mut self) -> DiagnosticResult<&'a Expr<'a>> {
        let name = self.expect_token(TokenKind::Identifier)?;
        self.expect_token(TokenKind::OpenParen)?;
        self.skip_newlines()?;

        let mut args = BumpVec::new_in(self.arena);
        if self.current.kind != TokenKind::CloseParen {
            loop {
                args.push(self.parse_expression(OperatorPrecedence::Assignment.level())?);
                self.skip_newlines()?;
                if self.optional_token(TokenKind::Comma)?.is_none() {
                    break;
                }
                self.skip_newlines()?;
            }
        }
        self.expect_token(TokenKind::CloseParen)?;

        Ok(self.alloc(Expr::Call(Call {
            loc: name.loc,
            name: name.text,
            args: args.into_bump_slice(),
        })))
    }

    fn parse_number(&self, token: &Token<'a>) -> DiagnosticResult<ConstantValue<'a>> {
        if token.text.contains('.') {
            return token
                .text
                .parse::<f64>()
                .map(ConstantValue::Float)
                .map_err(|_| self.error(token.loc, &messages::INVALID_FLOAT_LITERAL_0, &[token.text]));
        }
        token
            .text
            .parse::<u64>()
            .map(ConstantValue::Int)
            .map_err(|_| self.error(token.loc, &messages::INTEGER_LITERAL_0_TOO_LARGE, &[token.text]))
    }

    #[inline]
    fn constant(&self, loc: SourceLoc, value: ConstantValue<'a>) -> &'a Expr<'a> {
        self.alloc(Expr::Constant(Constant { loc, value }))
    }
}
