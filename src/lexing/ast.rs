use std::fmt;

use crate::scan::token::Token;

/// Root of the tree: the ordered statement list of one source file.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Program { statements }
    }
}

/// Statements execute for effect and return nothing.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl {
        name: Token,
        value: Expr,
    },
    Assign {
        name: Token,
        value: Expr,
    },
    Move {
        direction: Token,
        steps: Expr,
    },
    Rotate {
        direction: Token,
    },
    PickUp,
    Drop,
    Print {
        value: Expr,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    Repeat {
        times: Expr,
        body: Vec<Stmt>,
    },
}

/// Expressions evaluate to a value. Each variant keeps the token that best
/// locates it in the source, for runtime diagnostics.
#[derive(Debug, Clone)]
pub enum Expr {
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Int {
        value: i64,
        token: Token,
    },
    Str {
        value: String,
        token: Token,
    },
    Ident {
        name: String,
        token: Token,
    },
}

impl Expr {
    /// The token used when reporting an error against this expression.
    /// Compound expressions are located by their operator.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Binary { operator, .. } | Expr::Unary { operator, .. } => operator,
            Expr::Int { token, .. } | Expr::Str { token, .. } | Expr::Ident { token, .. } => token,
        }
    }
}

// DISPLAY IMPLEMENTATION
//
// Re-serializes the tree to parseable source text. Compound expressions are
// parenthesized, so re-parsing the output reproduces the same structure.

fn write_block(f: &mut fmt::Formatter, statements: &[Stmt]) -> fmt::Result {
    write!(f, "{{")?;
    for statement in statements {
        write!(f, " {}", statement)?;
    }
    write!(f, " }}")
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::VarDecl { name, value } => write!(f, "VAR {} = {};", name.value, value),
            Stmt::Assign { name, value } => write!(f, "SET {} = {};", name.value, value),
            Stmt::Move { direction, steps } => {
                write!(f, "MOVER {} {};", direction.value, steps)
            }
            Stmt::Rotate { direction } => write!(f, "GIRAR {};", direction.value),
            Stmt::PickUp => write!(f, "PEGAR;"),
            Stmt::Drop => write!(f, "SOLTAR;"),
            Stmt::Print { value } => write!(f, "IMPRIMIR {};", value),
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                write!(f, "SE ({}) ENTAO ", condition)?;
                write_block(f, then_block)?;
                if let Some(else_block) = else_block {
                    write!(f, " SENAO ")?;
                    write_block(f, else_block)?;
                }
                Ok(())
            }
            Stmt::Repeat { times, body } => {
                write!(f, "REPETIR {} VEZES ", times)?;
                write_block(f, body)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Binary {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator.value, right),
            Expr::Unary { operator, right } => write!(f, "({}{})", operator.value, right),
            Expr::Int { value, .. } => write!(f, "{}", value),
            Expr::Str { value, .. } => write!(f, "\"{}\"", value),
            Expr::Ident { name, .. } => write!(f, "{}", name),
        }
    }
}
