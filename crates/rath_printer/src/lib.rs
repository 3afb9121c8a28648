//! rath_printer: debug dump of expression trees.
//!
//! Every node is written as a bracketed form such as
//! `[Binop(+) left=[Int 1] right=[Ident x]]`. Lists are written as
//! `{a, b}` on one line, or one element per line when `pretty` is set.

use rath_ast::node::*;

/// Options for the printer.
pub struct PrinterOptions {
    /// Put every list element on its own indented line.
    pub pretty: bool,
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent_str: "  ".to_string(),
            new_line: "\n".to_string(),
        }
    }
}

/// The printer converts trees to their debug text.
pub struct Printer {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl Printer {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(1024),
            indent_level: 0,
            options,
        }
    }

    /// Print a whole tree to a string.
    pub fn print(&mut self, expr: &Expr<'_>) -> String {
        self.output.clear();
        self.indent_level = 0;
        self.print_expr(expr);
        std::mem::take(&mut self.output)
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    fn print_expr(&mut self, expr: &Expr<'_>) {
        match expr {
            Expr::Constant(n) => self.print_constant(&n.value),
            Expr::Unop(n) => {
                self.write("[Unop(");
                self.write(n.op.text());
                self.write(") ");
                self.print_expr(n.operand);
                self.write("]");
            }
            Expr::Binop(_) => self.print_binop_chain(expr),
            Expr::Call(n) => {
                self.write("[Call ");
                self.write(n.name);
                self.write(" args=");
                self.print_list(n.args, |p, arg| p.print_expr(arg));
                self.write("]");
            }
            Expr::Function(n) => {
                self.write("[Func ");
                if let Some(name) = n.name {
                    self.write(name);
                    self.write(" ");
                }
                self.write("args=");
                self.print_list(n.params, |p, param| p.print_variable(param));
                self.write(" body=");
                self.print_expr(n.body);
                self.write("]");
            }
            Expr::Return(n) => match n.value {
                Some(value) => {
                    self.write("[Return ");
                    self.print_expr(value);
                    self.write("]");
                }
                None => self.write("[Return]"),
            },
            Expr::Block(n) => {
                self.write("[Block body=");
                self.print_list(n.statements, |p, stmt| p.print_expr(stmt));
                self.write("]");
            }
            Expr::If(n) => {
                self.write("[If ");
                self.print_expr(n.condition);
                self.write(" ");
                self.print_expr(n.body);
                self.write(" Else ");
                match n.else_body {
                    Some(else_body) => self.print_expr(else_body),
                    None => self.write("null"),
                }
                self.write("]");
            }
            Expr::Switch(n) => {
                self.write("[Switch ");
                self.print_expr(n.scrutinee);
                self.write(" cases=");
                self.print_list(n.cases, |p, case| p.print_case(case));
                self.write("]");
            }
            Expr::Assign(n) => {
                self.write("[Assign vars=");
                self.print_list(n.vars, |p, var| p.print_variable(var));
                self.write(" value=");
                self.print_expr(n.value);
                self.write("]");
            }
        }
    }

    /// Operator chains nest down their left operand; open every `Binop` on
    /// the left spine first, then close them bottom-up with their right side.
    fn print_binop_chain<'e>(&mut self, expr: &'e Expr<'e>) {
        let mut spine = Vec::new();
        let mut cursor = expr;
        while let Expr::Binop(n) = cursor {
            self.write("[Binop(");
            self.write(n.op.text());
            self.write(") left=");
            spine.push(n);
            cursor = n.left;
        }
        self.print_expr(cursor);
        while let Some(n) = spine.pop() {
            self.write(" right=");
            self.print_expr(n.right);
            self.write("]");
        }
    }

    fn print_constant(&mut self, value: &ConstantValue<'_>) {
        match value {
            ConstantValue::Int(v) => self.write_owned(format!("[Int {}]", v)),
            ConstantValue::Float(v) => self.write_owned(format!("[Float {}]", v)),
            ConstantValue::String(s) => {
                self.write("[String ");
                self.write(s);
                self.write("]");
            }
            ConstantValue::Variable(var) => self.print_variable(var),
            ConstantValue::Null => self.write("[Null]"),
            ConstantValue::This => self.write("[This]"),
        }
    }

    fn print_variable(&mut self, var: &Variable<'_>) {
        self.write("[Ident ");
        if !var.flags.is_empty() {
            self.write_owned(var.flags.to_string());
            self.write(" ");
        }
        self.write(var.name);
        self.write("]");
    }

    fn print_case(&mut self, case: &Case<'_>) {
        let condition = &case.condition;
        self.write("[Case [Cond ");
        if !condition.is_direct {
            self.print_expr(condition.bound_value);
            self.write(" when ");
        }
        self.print_expr(condition.test);
        self.write("] body=");
        self.print_expr(case.body);
        self.write("]");
    }

    fn print_list<T>(&mut self, items: &[T], mut print_item: impl FnMut(&mut Self, &T)) {
        self.write("{");
        if self.options.pretty && !items.is_empty() {
            self.increase_indent();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.write(",");
                }
                self.write_newline();
                self.write_indent();
                print_item(self, item);
            }
            self.decrease_indent();
            self.write_newline();
            self.write_indent();
        } else {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                print_item(self, item);
            }
        }
        self.write("}");
    }

    // ========================================================================
    // Output helpers
    // ========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_owned(&mut self, s: String) {
        self.output.push_str(&s);
    }

    fn write_newline(&mut self) {
        self.output.push_str(&self.options.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent_str);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Print `expr` with default options.
pub fn print_expr(expr: &Expr<'_>) -> String {
    Printer::new().print(expr)
}
