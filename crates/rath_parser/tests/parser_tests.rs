//! Parser integration tests.
//!
//! Verifies that the parser builds the expected trees from rath source and
//! rejects malformed input with the right diagnostic.

use bumpalo::Bump;
use rath_ast::grammar::{Grammar, Keyword, Operator};
use rath_ast::node::*;
use rath_ast::types::VarFlags;
use rath_diagnostics::{Diagnostic, ErrorKind};
use rath_parser::Parser;

/// Helper: parse source text and return the tree (None for an empty program).
fn parse<'a>(arena: &'a Bump, source: &'a str) -> Option<&'a Expr<'a>> {
    Parser::new(arena, Grammar::standard_ref(), "test.rath", source)
        .parse()
        .unwrap_or_else(|e| panic!("parse failed for {:?}:\n{}", source, e))
}

/// Helper: parse and render the tree as an s-expression.
fn sexpr_of(source: &str) -> String {
    let arena = Bump::new();
    parse(&arena, source).map_or_else(|| "<empty>".to_string(), sexpr)
}

/// Helper: parse and expect a diagnostic.
fn parse_err(source: &str) -> Diagnostic {
    let arena = Bump::new();
    match Parser::new(&arena, Grammar::standard_ref(), "test.rath", source).parse() {
        Ok(tree) => panic!("expected an error for {:?}, got {:?}", source, tree.map(sexpr)),
        Err(e) => e,
    }
}

fn sexpr(expr: &Expr<'_>) -> String {
    match expr {
        Expr::Constant(c) => match c.value {
            ConstantValue::Int(v) => v.to_string(),
            ConstantValue::Float(v) => format!("{:?}", v),
            ConstantValue::String(s) => format!("{:?}", s),
            ConstantValue::Variable(v) => v.name.to_string(),
            ConstantValue::Null => "null".to_string(),
            ConstantValue::This => "this".to_string(),
        },
        Expr::Unop(u) => format!("({} {})", u.op.text(), sexpr(u.operand)),
        Expr::Binop(b) => format!("({} {} {})", b.op.text(), sexpr(b.left), sexpr(b.right)),
        Expr::Call(c) => {
            let args: String = c.args.iter().map(|a| format!(" {}", sexpr(a))).collect();
            format!("(call {}{})", c.name, args)
        }
        Expr::Function(f) => {
            let params: Vec<&str> = f.params.iter().map(|p| p.name).collect();
            format!("(func {} [{}] {})", f.name.unwrap_or("_"), params.join(" "), sexpr(f.body))
        }
        Expr::Return(r) => match r.value {
            Some(v) => format!("(return {})", sexpr(v)),
            None => "(return)".to_string(),
        },
        Expr::Block(b) => {
            let statements: Vec<String> = b.statements.iter().map(|s| sexpr(s)).collect();
            format!("{{{}}}", statements.join("; "))
        }
        Expr::If(i) => match i.else_body {
            Some(e) => format!("(if {} {} {})", sexpr(i.condition), sexpr(i.body), sexpr(e)),
            None => format!("(if {} {})", sexpr(i.condition), sexpr(i.body)),
        },
        Expr::Switch(s) => {
            let cases: String = s
                .cases
                .iter()
                .map(|c| format!(" [{} => {}]", sexpr(c.condition.test), sexpr(c.body)))
                .collect();
            format!("(switch {}{})", sexpr(s.scrutinee), cases)
        }
        Expr::Assign(a) => {
            let vars: Vec<&str> = a.vars.iter().map(|v| v.name).collect();
            format!("(let [{}] {})", vars.join(" "), sexpr(a.value))
        }
    }
}

// ============================================================================
// Programs
// ============================================================================

#[test]
fn test_empty_program() {
    assert_eq!(sexpr_of(""), "<empty>");
    assert_eq!(sexpr_of("\n\n;\n"), "<empty>");
}

#[test]
fn test_single_statement_is_unwrapped() {
    assert_eq!(sexpr_of("\nfoo\n"), "foo");
}

#[test]
fn test_multiple_statements_form_block() {
    assert_eq!(sexpr_of("a\nb; c"), "{a; b; c}");
}

#[test]
fn test_statements_need_terminators() {
    let err = parse_err("1 2");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.message_text, "Expected Newline, got Number '2'");
}

// ============================================================================
// Binary expressions
// ============================================================================

#[test]
fn test_precedence() {
    assert_eq!(sexpr_of("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(sexpr_of("a || b && c"), "(|| a (&& b c))");
    assert_eq!(sexpr_of("a | b ^ c & d"), "(| a (^ b (& c d)))");
    assert_eq!(sexpr_of("a == b < c"), "(== a (< b c))");
    assert_eq!(sexpr_of("a < b << 1 + 2"), "(< a (<< b (+ 1 2)))");
    assert_eq!(sexpr_of("a * b.c"), "(* a (. b c))");
}

#[test]
fn test_left_associativity() {
    assert_eq!(sexpr_of("a - b - c"), "(- (- a b) c)");
    assert_eq!(sexpr_of("a / b % c"), "(% (/ a b) c)");
}

#[test]
fn test_define_is_right_associative() {
    assert_eq!(sexpr_of("a := b := c"), "(:= a (:= b c))");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(sexpr_of("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    assert_eq!(sexpr_of("(\n1 + 2\n)"), "(+ 1 2)");
}

#[test]
fn test_newline_after_operator() {
    assert_eq!(sexpr_of("1 +\n  2"), "(+ 1 2)");
}

#[test]
fn test_binop_location_is_operator() {
    let arena = Bump::new();
    let tree = parse(&arena, "ab + c").unwrap();
    assert_eq!(tree.loc().offset(), 3);
}

#[test]
fn test_bare_assignment_is_rejected() {
    let err = parse_err("x = 5");
    assert_eq!(err.kind, ErrorKind::IllegalAssignmentOperator);
    assert_eq!(err.offset(), 2);
}

#[test]
fn test_varargs_outside_declaration_is_rejected() {
    assert_eq!(parse_err("a ...b").kind, ErrorKind::IllegalVarargsOperator);
    assert_eq!(parse_err("f(...x)").kind, ErrorKind::IllegalVarargsOperator);
}

#[test]
fn test_missing_operand() {
    let err = parse_err("1 +");
    assert_eq!(err.message_text, "Expected expression, got Eof");
}

// ============================================================================
// Primaries
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(sexpr_of("42"), "42");
    assert_eq!(sexpr_of("1.5"), "1.5");
    assert_eq!(sexpr_of("\"hi\""), "\"hi\"");
    assert_eq!(sexpr_of("null"), "null");
    assert_eq!(sexpr_of("this"), "this");
}

#[test]
fn test_integer_literal_overflow() {
    let err = parse_err("99999999999999999999");
    assert_eq!(err.kind, ErrorKind::InvalidIntLiteral);
    assert_eq!(sexpr_of("18446744073709551615"), "18446744073709551615");
}

#[test]
fn test_unary_operators() {
    assert_eq!(sexpr_of("-a"), "(- a)");
    assert_eq!(sexpr_of("&a"), "(& a)");
    assert_eq!(sexpr_of("-a - b"), "(- (- a b))");
    assert_eq!(sexpr_of("-a + b * c"), "(- (+ a (* b c)))");
    assert_eq!(sexpr_of("-a == b"), "(== (- a) b)");
    assert_eq!(sexpr_of("-a * b"), "(- (* a b))");
    assert_eq!(sexpr_of("- -a"), "(- (- a))");
}

#[test]
fn test_calls() {
    assert_eq!(sexpr_of("hi(5, 6)"), "(call hi 5 6)");
    assert_eq!(sexpr_of("f()"), "(call f)");
    assert_eq!(sexpr_of("f(\n  1,\n  g(2)\n)"), "(call f 1 (call g 2))");
    assert_eq!(sexpr_of("f (1)"), "(call f 1)");
}

#[test]
fn test_unexpected_keyword() {
    let err = parse_err("else");
    assert_eq!(err.kind, ErrorKind::UnexpectedKeyword);
    assert_eq!(err.message_text, "Unexpected keyword 'else'");
}

#[test]
fn test_unexpected_token() {
    let err = parse_err(")");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.message_text, "Expected expression, got RParen");
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_let_with_folded_candidate() {
    assert_eq!(sexpr_of("let x = 1 + 2 * 3"), "(let [x] (+ 1 (* 2 3)))");
}

#[test]
fn test_let_flags() {
    let arena = Bump::new();
    let tree = parse(&arena, "let ref const a, b, ...rest = f()").unwrap();
    let Expr::Assign(assign) = tree else {
        panic!("expected Assign, got {}", tree.kind_name());
    };
    assert_eq!(assign.vars.len(), 3);
    assert_eq!(assign.vars[0].flags, VarFlags::REF | VarFlags::CONST);
    assert_eq!(assign.vars[1].flags, VarFlags::NONE);
    assert_eq!(assign.vars[2].flags, VarFlags::PACKED);
    assert_eq!(assign.vars[2].name, "rest");
}

#[test]
fn test_let_value_on_next_line() {
    assert_eq!(sexpr_of("let x =\n  5"), "(let [x] 5)");
}

#[test]
fn test_packed_single_declaration() {
    let err = parse_err("let ...x = 1");
    assert_eq!(err.kind, ErrorKind::InvalidPackedSingle);
    assert_eq!(err.offset(), 7);
}

#[test]
fn test_empty_declaration() {
    let err = parse_err("let = 1");
    assert_eq!(err.kind, ErrorKind::EmptyDeclaration);
    assert_eq!(err.message_text, "No variable name provided");
}

#[test]
fn test_let_requires_equals() {
    let err = parse_err("let x 5");
    assert_eq!(err.message_text, "Expected '=', got Number '5'");
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_named_function() {
    assert_eq!(sexpr_of("func add(a, b) -> a + b"), "(func add [a b] (+ a b))");
}

#[test]
fn test_bare_parameter_list() {
    assert_eq!(sexpr_of("func add a, b -> a + b"), "(func add [a b] (+ a b))");
}

#[test]
fn test_anonymous_functions() {
    assert_eq!(sexpr_of("let f = func(x) -> x"), "(let [f] (func _ [x] x))");
    assert_eq!(sexpr_of("let f = func x -> x"), "(let [f] (func _ [x] x))");
    assert_eq!(sexpr_of("func (x) x"), "(func _ [x] x)");
    assert_eq!(sexpr_of("func -> 1"), "(func _ [] 1)");
}

#[test]
fn test_function_with_block_body() {
    assert_eq!(
        sexpr_of("func f(x) -> {\n  let y = x\n  return y\n}"),
        "(func f [x] {(let [y] x); (return y)})"
    );
}

#[test]
fn test_function_parameter_flags() {
    let arena = Bump::new();
    let tree = parse(&arena, "func f(ref a, const ...rest) -> a").unwrap();
    let Expr::Function(function) = tree else {
        panic!("expected Function, got {}", tree.kind_name());
    };
    assert_eq!(function.params[0].flags, VarFlags::REF);
    assert_eq!(function.params[1].flags, VarFlags::CONST | VarFlags::PACKED);
}

#[test]
fn test_return_without_value() {
    assert_eq!(sexpr_of("func f() -> { return }"), "(func f [] {(return)})");
    assert_eq!(sexpr_of("return\n"), "(return)");
    assert_eq!(sexpr_of("return; 1"), "{(return); 1}");
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_if_forms() {
    assert_eq!(sexpr_of("if x then 1 else 2"), "(if x 1 2)");
    assert_eq!(sexpr_of("if (x) -> 1"), "(if x 1)");
    assert_eq!(sexpr_of("if x 1"), "(if x 1)");
    assert_eq!(sexpr_of("if (a > b) { a } else { b }"), "(if (> a b) {a} {b})");
}

#[test]
fn test_else_on_later_line() {
    assert_eq!(sexpr_of("if x then\n  1\nelse\n  2"), "(if x 1 2)");
    assert_eq!(sexpr_of("if x then 1\n\ny"), "{(if x 1); y}");
}

#[test]
fn test_else_if_chain() {
    assert_eq!(sexpr_of("if a then 1 else if b then 2 else 3"), "(if a 1 (if b 2 3))");
}

#[test]
fn test_if_missing_close_paren() {
    let err = parse_err("if (x then 1");
    assert_eq!(err.message_text, "Expected RParen, got Keyword 'then'");
}

// ============================================================================
// Switch
// ============================================================================

#[test]
fn test_switch_merges_case_groups() {
    let arena = Bump::new();
    let tree = parse(&arena, "switch x { case 5 case 6 -> 10 case _ -> 20 }").unwrap();
    let Expr::Switch(switch) = tree else {
        panic!("expected Switch, got {}", tree.kind_name());
    };
    assert_eq!(switch.cases.len(), 2);

    let first = &switch.cases[0];
    assert_eq!(sexpr(first.condition.test), "(|| (== x 5) (== x 6))");
    assert!(first.condition.is_direct);
    assert_eq!(sexpr(first.condition.bound_value), "6");
    assert_eq!(sexpr(first.body), "10");
    assert_eq!(sexpr(switch.cases[1].condition.test), "(== x _)");
}

#[test]
fn test_direct_tests_share_the_scrutinee() {
    let arena = Bump::new();
    let tree = parse(&arena, "switch f(y) -> {\n  case 1 case 2 -> a\n  case 3 -> b\n}").unwrap();
    let Expr::Switch(switch) = tree else {
        panic!("expected Switch, got {}", tree.kind_name());
    };
    let merged = switch.cases[0].condition.test.as_binop().unwrap();
    for test in [merged.left, merged.right, switch.cases[1].condition.test] {
        let eq = test.as_binop().unwrap();
        assert_eq!(eq.op, Operator::Eq);
        assert!(std::ptr::eq(eq.left, switch.scrutinee));
    }
}

#[test]
fn test_three_groups_merge_left_to_right() {
    assert_eq!(
        sexpr_of("switch s { case 1 case 2 case 3 -> body }"),
        "(switch s [(|| (|| (== s 1) (== s 2)) (== s 3)) => body])"
    );
}

#[test]
fn test_guarded_case() {
    let arena = Bump::new();
    let tree = parse(&arena, "switch n { case v when v > 10 -> big; case 0 case w when w < 0 -> small }").unwrap();
    let Expr::Switch(switch) = tree else {
        panic!("expected Switch, got {}", tree.kind_name());
    };
    let guarded = &switch.cases[0].condition;
    assert!(!guarded.is_direct);
    assert_eq!(sexpr(guarded.test), "(> v 10)");
    assert_eq!(sexpr(guarded.bound_value), "v");

    let mixed = &switch.cases[1].condition;
    assert!(!mixed.is_direct);
    assert_eq!(sexpr(mixed.test), "(|| (== n 0) (< w 0))");
}

#[test]
fn test_switch_needs_no_terminator() {
    assert_eq!(sexpr_of("switch x { case 1 -> 2 } y"), "{(switch x [(== x 1) => 2]); y}");
}

#[test]
fn test_empty_switch() {
    let arena = Bump::new();
    for source in ["switch x {}", "switch x -> {\n\n}"] {
        let Some(Expr::Switch(switch)) = parse(&arena, source) else {
            panic!("expected a switch for {:?}", source);
        };
        assert!(switch.cases.is_empty());
        assert_eq!(sexpr(switch.scrutinee), "x");
    }
}

#[test]
fn test_switch_clause_must_start_with_case() {
    let err = parse_err("switch x { 1 -> 2 }");
    assert_eq!(err.message_text, "Expected 'case', got Number '1'");
}

#[test]
fn test_case_requires_arrow() {
    let err = parse_err("switch x { case 1 2 }");
    assert_eq!(err.message_text, "Expected Arrow, got Number '2'");
}

// ============================================================================
// Blocks and terminators
// ============================================================================

#[test]
fn test_block() {
    assert_eq!(sexpr_of("{ a\n b }"), "{a; b}");
    assert_eq!(sexpr_of("{}"), "{}");
    assert_eq!(sexpr_of("{ a } b"), "{{a}; b}");
}

#[test]
fn test_trailing_block_closes_statement() {
    assert_eq!(sexpr_of("if a then { b } c"), "{(if a {b}); c}");
    assert_eq!(sexpr_of("let f = func() -> { 1 } g"), "{(let [f] (func _ [] {1})); g}");
}

#[test]
fn test_trailing_expression_needs_terminator() {
    assert_eq!(parse_err("if a then b c").kind, ErrorKind::UnexpectedToken);
}

#[test]
fn test_unclosed_block() {
    let err = parse_err("{ a");
    assert_eq!(err.message_text, "Expected RCurly, got Eof");
}

#[test]
fn test_stray_close_brace() {
    assert_eq!(parse_err("a }").message_text, "Expected Eof, got RCurly");
}

// ============================================================================
// Diagnostics and grammar substitution
// ============================================================================

#[test]
fn test_diagnostic_rendering() {
    let err = parse_err("let a = 1\n  let = 2");
    assert_eq!(err.line(), 2);
    assert_eq!(
        err.to_string(),
        "Error in test.rath on line 2: let = 2\n  No variable name provided"
    );
}

#[test]
fn test_lexer_errors_surface_through_parse() {
    assert_eq!(parse_err("let x = 1.2.3").kind, ErrorKind::InvalidFloatLiteral);
}

#[test]
fn test_custom_keyword_spelling() {
    let mut grammar = Grammar::standard();
    grammar.keywords.remove("func");
    grammar.keywords.insert("fn".to_string(), Keyword::Func);

    let arena = Bump::new();
    let tree = Parser::new(&arena, &grammar, "t.rath", "fn id(x) -> x")
        .parse()
        .unwrap()
        .unwrap();
    assert_eq!(sexpr(tree), "(func id [x] x)");
}
