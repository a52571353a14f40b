use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub t_type: TokenType,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(t_type: TokenType, value: String, line: usize, column: usize) -> Self {
        Token {
            t_type,
            value,
            line,
            column,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenType {
    // Single-character tokens.
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    // One or two character tokens. `=` and `==` share Equal.
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    // Literals.
    Ident,
    RawStr,
    IntNum,
    // Keywords.
    Var,
    Set,
    Mover,
    Frente,
    Tras,
    Girar,
    Esquerda,
    Direita,
    Pegar,
    Soltar,
    Imprimir,
    Se,
    Entao,
    Senao,
    Repetir,
    Vezes,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Token: {:?} Value: '{}' Line: {} Col: {}",
            self.t_type, self.value, self.line, self.column
        )
    }
}
