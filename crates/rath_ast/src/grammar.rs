//! The grammar tables: keyword spellings, the operator table and the
//! operator precedence used by the parser.
//!
//! A [`Grammar`] is a plain value handed to the lexer and the parser, so a
//! test fixture or a `rath.json` config can substitute its own tables without
//! recompiling. [`Grammar::standard_ref`] returns the shared built-in one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Language keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Switch,
    Case,
    When,
    If,
    Else,
    Then,
    Let,
    Open,
    Return,
    Func,
    Null,
    This,
    Ref,
    Const,
}

impl Keyword {
    pub const ALL: [Keyword; 14] = [
        Keyword::Switch,
        Keyword::Case,
        Keyword::When,
        Keyword::If,
        Keyword::Else,
        Keyword::Then,
        Keyword::Let,
        Keyword::Open,
        Keyword::Return,
        Keyword::Func,
        Keyword::Null,
        Keyword::This,
        Keyword::Ref,
        Keyword::Const,
    ];

    /// Spelling in the standard grammar.
    pub fn text(self) -> &'static str {
        match self {
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::When => "when",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Then => "then",
            Keyword::Let => "let",
            Keyword::Open => "open",
            Keyword::Return => "return",
            Keyword::Func => "func",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Ref => "ref",
            Keyword::Const => "const",
        }
    }
}

/// Every operator lexeme the language knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitXor,
    BitOr,
    Member,
    Assign,
    Define,
    Arrow,
    Ellipsis,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
}

impl Operator {
    /// Spelling in the standard grammar.
    pub fn text(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::BitAnd => "&",
            Operator::BitXor => "^",
            Operator::BitOr => "|",
            Operator::Member => ".",
            Operator::Assign => "=",
            Operator::Define => ":=",
            Operator::Arrow => "->",
            Operator::Ellipsis => "...",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::And => "&&",
            Operator::Or => "||",
        }
    }
}

/// Binary operator precedence levels, lowest binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Assignment = 0,
    LogicalOr = 1,
    LogicalAnd = 2,
    BitwiseOr = 3,
    BitwiseXor = 4,
    BitwiseAnd = 5,
    Equality = 6,
    Relational = 7,
    Shift = 8,
    Additive = 9,
    Multiplicative = 10,
    Member = 11,
}

impl OperatorPrecedence {
    #[inline]
    pub fn level(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Associativity {
    Left,
    Right,
}

/// One row of the operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    pub operator: Operator,
    /// `None` for operators that never appear in binary position (`->`, `...`).
    pub precedence: Option<OperatorPrecedence>,
    pub associativity: Associativity,
    /// Whether the operator may also appear as a unary prefix.
    #[serde(default)]
    pub prefix: bool,
}

impl OperatorInfo {
    fn binary(operator: Operator, precedence: OperatorPrecedence) -> Self {
        Self {
            operator,
            precedence: Some(precedence),
            associativity: Associativity::Left,
            prefix: false,
        }
    }
}

/// Keyword, operator and precedence tables for one language dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    /// Keyword spelling to keyword.
    pub keywords: FxHashMap<String, Keyword>,
    /// Operator lexeme to its table row.
    pub operators: FxHashMap<String, OperatorInfo>,
    /// Characters that start (and continue) an operator run.
    pub operator_chars: String,
}

lazy_static::lazy_static! {
    static ref STANDARD_GRAMMAR: Grammar = Grammar::standard();
}

impl Grammar {
    /// The built-in grammar.
    pub fn standard() -> Self {
        use OperatorPrecedence as P;

        let keywords = Keyword::ALL
            .iter()
            .map(|kw| (kw.text().to_string(), *kw))
            .collect();

        let mut rows = vec![
            OperatorInfo::binary(Operator::Or, P::LogicalOr),
            OperatorInfo::binary(Operator::And, P::LogicalAnd),
            OperatorInfo::binary(Operator::BitOr, P::BitwiseOr),
            OperatorInfo::binary(Operator::BitXor, P::BitwiseXor),
            OperatorInfo::binary(Operator::Eq, P::Equality),
            OperatorInfo::binary(Operator::Ne, P::Equality),
            OperatorInfo::binary(Operator::Lt, P::Relational),
            OperatorInfo::binary(Operator::Gt, P::Relational),
            OperatorInfo::binary(Operator::Le, P::Relational),
            OperatorInfo::binary(Operator::Ge, P::Relational),
            OperatorInfo::binary(Operator::Shl, P::Shift),
            OperatorInfo::binary(Operator::Shr, P::Shift),
            OperatorInfo::binary(Operator::Add, P::Additive),
            OperatorInfo::binary(Operator::Mul, P::Multiplicative),
            OperatorInfo::binary(Operator::Div, P::Multiplicative),
            OperatorInfo::binary(Operator::Rem, P::Multiplicative),
            OperatorInfo::binary(Operator::Member, P::Member),
            OperatorInfo {
                prefix: true,
                ..OperatorInfo::binary(Operator::Sub, P::Additive)
            },
            OperatorInfo {
                prefix: true,
                ..OperatorInfo::binary(Operator::BitAnd, P::BitwiseAnd)
            },
        ];
        for op in [Operator::Assign, Operator::Define] {
            rows.push(OperatorInfo {
                operator: op,
                precedence: Some(P::Assignment),
                associativity: Associativity::Right,
                prefix: false,
            });
        }
        for op in [Operator::Arrow, Operator::Ellipsis] {
            rows.push(OperatorInfo {
                operator: op,
                precedence: None,
                associativity: Associativity::Left,
                prefix: false,
            });
        }

        let operators = rows
            .into_iter()
            .map(|row| (row.operator.text().to_string(), row))
            .collect();

        Self {
            keywords,
            operators,
            operator_chars: "+-*/%.:=<>|&^!".to_string(),
        }
    }

    /// The shared built-in grammar.
    pub fn standard_ref() -> &'static Grammar {
        &STANDARD_GRAMMAR
    }

    #[inline]
    pub fn keyword(&self, text: &str) -> Option<Keyword> {
        self.keywords.get(text).copied()
    }

    #[inline]
    pub fn operator(&self, text: &str) -> Option<&OperatorInfo> {
        self.operators.get(text)
    }

    #[inline]
    pub fn is_operator_char(&self, byte: u8) -> bool {
        byte.is_ascii() && self.operator_chars.as_bytes().contains(&byte)
    }

    /// How this grammar spells `keyword`, for diagnostics.
    pub fn keyword_text(&self, keyword: Keyword) -> &str {
        self.keywords
            .iter()
            .find(|(_, kw)| **kw == keyword)
            .map(|(text, _)| text.as_str())
            .unwrap_or_else(|| keyword.text())
    }

    /// How this grammar spells `operator`, for diagnostics.
    pub fn operator_text(&self, operator: Operator) -> &str {
        self.operators
            .iter()
            .find(|(_, info)| info.operator == operator)
            .map(|(text, _)| text.as_str())
            .unwrap_or_else(|| operator.text())
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}
