//! Error types for the three pipeline stages.
//!
//! Each stage fails with its own enum; the first error aborts the stage and
//! propagates to the driver, which labels it and maps it to exit code 1.
//! Messages carry the source line/column where a token was available.

use thiserror::Error;

use crate::scan::token::TokenType;

/// Raised by the scanner. Terminal for the whole tokenize call.
#[derive(Debug, Error, PartialEq)]
pub enum LexicalError {
    #[error("Linha {line}, coluna {column}: Caractere inesperado: '{character}'")]
    UnexpectedChar {
        character: char,
        line: usize,
        column: usize,
    },
    /// Position is the opening quote, not where the input ran out.
    #[error("Linha {line}, coluna {column}: String não terminada. Esperava-se '\"'.")]
    UnterminatedString { line: usize, column: usize },
}

/// Raised by the parser. No recovery: the first mismatch aborts parsing.
#[derive(Debug, Error, PartialEq)]
pub enum SyntaxError {
    #[error(
        "Esperava-se '{expected:?}', mas encontrou '{found:?}' ('{text}') \
         na linha {line}, coluna {column}."
    )]
    ExpectedToken {
        expected: TokenType,
        found: TokenType,
        text: String,
        line: usize,
        column: usize,
    },
    #[error("Declaração inesperada: '{found:?}' na linha {line}, coluna {column}.")]
    UnexpectedStatement {
        found: TokenType,
        line: usize,
        column: usize,
    },
    #[error("Expressão primária inesperada: '{text}' na linha {line}, coluna {column}.")]
    UnexpectedPrimary {
        text: String,
        line: usize,
        column: usize,
    },
    #[error("Direção inválida para {command}: '{text}' na linha {line}.")]
    InvalidDirection {
        command: &'static str,
        text: String,
        line: usize,
    },
    #[error("Número inteiro fora do intervalo suportado: '{text}' na linha {line}, coluna {column}.")]
    NumberOutOfRange {
        text: String,
        line: usize,
        column: usize,
    },
}

/// Raised by the environment; carries no position. The interpreter wraps
/// these in [`ExecutionError`] with the token that triggered the operation.
#[derive(Debug, Error, PartialEq)]
pub enum EnvError {
    #[error("Variável '{0}' já declarada neste escopo.")]
    AlreadyDeclared(String),
    #[error("Variável '{0}' não definida.")]
    Undefined(String),
}

/// Raised by the interpreter. Leaves state as of the last completed
/// statement; no rollback.
#[derive(Debug, Error, PartialEq)]
pub enum ExecutionError {
    #[error("Linha {line}, coluna {column}: Variável '{name}' não definida.")]
    UndefinedVariable {
        name: String,
        line: usize,
        column: usize,
    },
    #[error(
        "Linha {line}, coluna {column}: Variável '{name}' não declarada \
         antes de ser atribuída."
    )]
    AssignBeforeDeclaration {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("Linha {line}, coluna {column}: Variável '{name}' já declarada neste escopo.")]
    AlreadyDeclared {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("Linha {line}, coluna {column}: Divisão por zero.")]
    DivisionByZero { line: usize, column: usize },
    #[error("Linha {line}, coluna {column}: Estouro aritmético no operador '{operator}'.")]
    ArithmeticOverflow {
        operator: String,
        line: usize,
        column: usize,
    },
    #[error(
        "Linha {line}, coluna {column}: Número de passos inválido: {value}. \
         Deve ser um inteiro positivo."
    )]
    InvalidSteps {
        value: String,
        line: usize,
        column: usize,
    },
    #[error(
        "Linha {line}, coluna {column}: Número de repetições inválido: {value}. \
         Deve ser um inteiro não negativo."
    )]
    InvalidRepeatCount {
        value: String,
        line: usize,
        column: usize,
    },
    #[error(
        "Linha {line}, coluna {column}: Condição do 'SE' deve ser avaliada \
         como booleano ou inteiro (0 para falso): {value}"
    )]
    InvalidCondition {
        value: String,
        line: usize,
        column: usize,
    },
    #[error("Linha {line}, coluna {column}: Operandos inválidos para o operador '{operator}'.")]
    InvalidOperands {
        operator: String,
        line: usize,
        column: usize,
    },
    // Unreachable while the parser only emits the operator kinds above it.
    #[error("Linha {line}, coluna {column}: Operador desconhecido: '{operator}'.")]
    UnknownOperator {
        operator: String,
        line: usize,
        column: usize,
    },
}
