use std::fmt::Display;

use crate::lexer::tokens::{Token, TokenKind};

use super::types::ValueKind;

/// Binary operators, in the order of the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOperator {
    Multiply,
    Divide,
    Plus,
    Minus,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

impl InfixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<InfixOperator> {
        match kind {
            TokenKind::Star => Some(InfixOperator::Multiply),
            TokenKind::Slash => Some(InfixOperator::Divide),
            TokenKind::Plus => Some(InfixOperator::Plus),
            TokenKind::Dash => Some(InfixOperator::Minus),
            TokenKind::Equals => Some(InfixOperator::Equals),
            TokenKind::NotEquals => Some(InfixOperator::NotEquals),
            TokenKind::Less => Some(InfixOperator::Less),
            TokenKind::LessEquals => Some(InfixOperator::LessEquals),
            TokenKind::Greater => Some(InfixOperator::Greater),
            TokenKind::GreaterEquals => Some(InfixOperator::GreaterEquals),
            _ => None,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            InfixOperator::Multiply | InfixOperator::Divide => 3,
            InfixOperator::Plus | InfixOperator::Minus => 2,
            _ => 1,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.precedence() == 1
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Equals => "==",
            InfixOperator::NotEquals => "!=",
            InfixOperator::Less => "<",
            InfixOperator::LessEquals => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEquals => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOperator {
    Not,
    Negate,
}

impl PrefixOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            PrefixOperator::Not => "!",
            PrefixOperator::Negate => "-",
        }
    }
}

/// Expression node; `token` is the token the node was built from (the
/// operator for prefix/infix nodes, the `(` for groups).
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    BoolLit(bool),
    Identifier(String),
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    Prefix {
        operator: PrefixOperator,
        operand: Box<Expr>,
    },
    Infix {
        operator: InfixOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Grouped(Box<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Expr { kind, token }
    }

    /// Literal kind of the expression, `None` unless it is a literal
    /// (possibly wrapped in parentheses).
    pub fn literal_kind(&self) -> Option<ValueKind> {
        match &self.kind {
            ExprKind::IntLit(_)
            | ExprKind::FloatLit(_)
            | ExprKind::StrLit(_)
            | ExprKind::BoolLit(_) => ValueKind::from_token_kind(self.token.kind),
            ExprKind::Grouped(inner) => inner.literal_kind(),
            _ => None,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::IntLit(value) => write!(f, "{}", value),
            // Keep the source spelling, `2.0` should not print as `2`
            ExprKind::FloatLit(_) => write!(f, "{}", self.token.value),
            ExprKind::StrLit(value) => write!(f, "{:?}", value),
            ExprKind::BoolLit(value) => write!(f, "{}", value),
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::Prefix { operator, operand } => {
                write!(f, "({} {})", operator.symbol(), operand)
            }
            ExprKind::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", operator.symbol(), left, right),
            ExprKind::Grouped(inner) => write!(f, "(group {})", inner),
        }
    }
}
