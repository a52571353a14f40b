use crate::error::LexicalError;
use crate::scan::token::{Token, TokenType, TokenType::*};

/// Single-pass lexer. Positions are 1-based; columns count characters and
/// reset after each newline.
pub struct Scanner {
    source: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexicalError> {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.skip_whitespace();
                continue;
            }
            if c == '/' && self.peek() == Some('/') {
                self.skip_comment();
                continue;
            }
            self.scan_token(c)?;
        }

        self.tokens
            .push(Token::new(Eof, String::new(), self.line, self.column));
        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self, c: char) -> Result<(), LexicalError> {
        match c {
            '(' => self.add_single(LParen, c),
            ')' => self.add_single(RParen, c),
            '{' => self.add_single(LBrace, c),
            '}' => self.add_single(RBrace, c),
            ';' => self.add_single(Semicolon, c),
            ',' => self.add_single(Comma, c),
            '+' => self.add_single(Plus, c),
            '-' => self.add_single(Minus, c),
            '*' => self.add_single(Star, c),
            '/' => self.add_single(Slash, c),
            // `=` and `==` share a kind.
            '=' => self.add_maybe_double(c, Equal, Equal),
            '<' => self.add_maybe_double(c, Less, LessEqual),
            '>' => self.add_maybe_double(c, Greater, GreaterEqual),
            '!' => {
                if self.peek() == Some('=') {
                    self.add_maybe_double(c, NotEqual, NotEqual);
                } else {
                    return Err(LexicalError::UnexpectedChar {
                        character: c,
                        line: self.line,
                        column: self.column,
                    });
                }
            }
            '"' => self.found_string()?,
            _ if c.is_ascii_digit() => self.found_number(),
            _ if c.is_alphabetic() || c == '_' => self.found_identifier(),
            _ => {
                return Err(LexicalError::UnexpectedChar {
                    character: c,
                    line: self.line,
                    column: self.column,
                })
            }
        }
        Ok(())
    }

    fn add_single(&mut self, t_type: TokenType, c: char) {
        self.tokens
            .push(Token::new(t_type, c.to_string(), self.line, self.column));
        self.advance();
    }

    fn add_maybe_double(&mut self, c: char, single: TokenType, double: TokenType) {
        let column = self.column;
        if self.peek() == Some('=') {
            self.tokens
                .push(Token::new(double, format!("{c}="), self.line, column));
            self.advance();
            self.advance();
        } else {
            self.tokens
                .push(Token::new(single, c.to_string(), self.line, column));
            self.advance();
        }
    }

    fn found_number(&mut self) {
        let start_column = self.column;
        let mut value = String::new();
        while let Some(c) = self.current() {
            if !c.is_ascii_digit() {
                break;
            }
            value.push(c);
            self.advance();
        }
        self.tokens
            .push(Token::new(IntNum, value, self.line, start_column));
    }

    fn found_string(&mut self) -> Result<(), LexicalError> {
        let start_line = self.line;
        let start_column = self.column;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.current() {
                Some('"') => break,
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return Err(LexicalError::UnterminatedString {
                        line: start_line,
                        column: start_column,
                    })
                }
            }
        }
        self.advance(); // closing quote

        self.tokens
            .push(Token::new(RawStr, value, start_line, start_column));
        Ok(())
    }

    fn found_identifier(&mut self) {
        let start_column = self.column;
        let mut text = String::new();
        while let Some(c) = self.current() {
            if !c.is_alphanumeric() && c != '_' {
                break;
            }
            text.push(c);
            self.advance();
        }

        // Keywords match case-insensitively; identifiers keep source case.
        let t_type = match text.to_uppercase().as_str() {
            "VAR" => Var,
            "SET" => Set,
            "MOVER" => Mover,
            "FRENTE" => Frente,
            "TRAS" => Tras,
            "GIRAR" => Girar,
            "ESQUERDA" => Esquerda,
            "DIREITA" => Direita,
            "PEGAR" => Pegar,
            "SOLTAR" => Soltar,
            "IMPRIMIR" => Imprimir,
            "SE" => Se,
            "ENTAO" => Entao,
            "SENAO" => Senao,
            "REPETIR" => Repetir,
            "VEZES" => Vezes,
            _ => Ident,
        };
        self.tokens
            .push(Token::new(t_type, text, self.line, start_column));
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            }
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.column += 1;
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.position + 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn tokenize(code: &str) -> Vec<Token> {
        Scanner::new(code).tokenize().unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.t_type).collect()
    }

    #[test]
    fn basic_commands_and_literals() {
        let tokens = tokenize("IMPRIMIR \"Olá Mundo\"; MOVER FRENTE 10;");

        let expected = [
            (Imprimir, "IMPRIMIR", 1),
            (RawStr, "Olá Mundo", 10),
            (Semicolon, ";", 21),
            (Mover, "MOVER", 23),
            (Frente, "FRENTE", 29),
            (IntNum, "10", 36),
            (Semicolon, ";", 38),
            (Eof, "", 39),
        ];
        let actual: Vec<(TokenType, &str, usize)> = tokens
            .iter()
            .map(|t| (t.t_type, t.value.as_str(), t.column))
            .collect();
        assert_eq!(actual, expected);
        assert!(tokens.iter().all(|t| t.line == 1));
    }

    #[test]
    fn variables_and_assignment() {
        let tokens = tokenize("VAR x = 5; SET y = x + 2;");
        assert_eq!(
            kinds(&tokens),
            vec![
                Var, Ident, Equal, IntNum, Semicolon, Set, Ident, Equal, Ident, Plus, IntNum,
                Semicolon, Eof,
            ]
        );
    }

    #[test]
    fn equal_and_double_equal_share_a_kind() {
        let tokens = tokenize("a = b == c;");
        assert_eq!(tokens[1].t_type, Equal);
        assert_eq!(tokens[1].value, "=");
        assert_eq!(tokens[3].t_type, Equal);
        assert_eq!(tokens[3].value, "==");
    }

    #[test]
    fn two_character_operators() {
        let tokens = tokenize("<= >= != < >");
        assert_eq!(
            kinds(&tokens),
            vec![LessEqual, GreaterEqual, NotEqual, Less, Greater, Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = tokenize(indoc! {r#"
            // Este é um comentário
            VAR a = 1; // Outro comentário
            IMPRIMIR "Fim";
        "#});
        assert_eq!(
            kinds(&tokens),
            vec![
                Var, Ident, Equal, IntNum, Semicolon, Imprimir, RawStr, Semicolon, Eof,
            ]
        );
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[5].line, 3);
    }

    #[test]
    fn identifier_keeps_case_keyword_is_case_insensitive() {
        let tokens = tokenize("var Contador = 1;");
        assert_eq!(tokens[0].t_type, Var);
        assert_eq!(tokens[1].t_type, Ident);
        assert_eq!(tokens[1].value, "Contador");
    }

    #[test]
    fn unexpected_character() {
        let err = Scanner::new("VAR x = #erro;").tokenize().unwrap_err();
        assert_eq!(
            err,
            LexicalError::UnexpectedChar {
                character: '#',
                line: 1,
                column: 9,
            }
        );
    }

    #[test]
    fn bare_bang_is_an_error() {
        let err = Scanner::new("VAR x = 1 ! 2;").tokenize().unwrap_err();
        assert_eq!(
            err,
            LexicalError::UnexpectedChar {
                character: '!',
                line: 1,
                column: 11,
            }
        );
    }

    #[test]
    fn unterminated_string_cites_opening_quote() {
        let err = Scanner::new("IMPRIMIR \"string sem fim;")
            .tokenize()
            .unwrap_err();
        assert_eq!(
            err,
            LexicalError::UnterminatedString {
                line: 1,
                column: 10,
            }
        );
    }
}
