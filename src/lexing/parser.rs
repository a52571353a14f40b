use crate::error::SyntaxError;
use crate::lexing::ast::{Expr, Program, Stmt};
use crate::scan::token::{Token, TokenType, TokenType::*};

/// Recursive-descent parser with single-token lookahead. The first error
/// aborts parsing; there is no recovery.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    c_token: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let c_token = tokens
            .first()
            .cloned()
            .unwrap_or_else(|| Token::new(Eof, String::new(), 1, 1));
        Parser {
            tokens,
            index: 0,
            c_token,
        }
    }

    // The scanner always terminates the stream with Eof, so advancing
    // saturates on the last token.
    fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
            self.c_token = self.tokens[self.index].clone();
        }
    }

    fn eat(&mut self, expected: TokenType) -> Result<Token, SyntaxError> {
        if self.c_token.t_type == expected {
            let token = self.c_token.clone();
            self.advance();
            Ok(token)
        } else {
            Err(SyntaxError::ExpectedToken {
                expected,
                found: self.c_token.t_type,
                text: self.c_token.value.clone(),
                line: self.c_token.line,
                column: self.c_token.column,
            })
        }
    }

    pub fn parse(&mut self) -> Result<Program, SyntaxError> {
        let mut statements = Vec::new();
        while self.c_token.t_type != Eof {
            statements.push(self.statement()?);
        }
        Ok(Program::new(statements))
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.c_token.t_type {
            Var => self.var_declaration(),
            Set => self.assignment_statement(),
            Mover => self.move_statement(),
            Girar => self.rotate_statement(),
            Pegar => self.pickup_statement(),
            Soltar => self.drop_statement(),
            Imprimir => self.print_statement(),
            Se => self.if_statement(),
            Repetir => self.repeat_statement(),
            _ => Err(SyntaxError::UnexpectedStatement {
                found: self.c_token.t_type,
                line: self.c_token.line,
                column: self.c_token.column,
            }),
        }
    }

    /// VAR <id> = <expr>;
    fn var_declaration(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Var)?;
        let name = self.eat(Ident)?;
        self.eat(Equal)?;
        let value = self.expression()?;
        self.eat(Semicolon)?;
        Ok(Stmt::VarDecl { name, value })
    }

    /// SET <id> = <expr>;
    fn assignment_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Set)?;
        let name = self.eat(Ident)?;
        self.eat(Equal)?;
        let value = self.expression()?;
        self.eat(Semicolon)?;
        Ok(Stmt::Assign { name, value })
    }

    /// MOVER (FRENTE | TRAS) <expr>;
    fn move_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Mover)?;
        let direction = self.c_token.clone();
        if direction.t_type != Frente && direction.t_type != Tras {
            return Err(SyntaxError::InvalidDirection {
                command: "MOVER",
                text: direction.value,
                line: direction.line,
            });
        }
        self.advance();
        let steps = self.expression()?;
        self.eat(Semicolon)?;
        Ok(Stmt::Move { direction, steps })
    }

    /// GIRAR (ESQUERDA | DIREITA);
    fn rotate_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Girar)?;
        let direction = self.c_token.clone();
        if direction.t_type != Esquerda && direction.t_type != Direita {
            return Err(SyntaxError::InvalidDirection {
                command: "GIRAR",
                text: direction.value,
                line: direction.line,
            });
        }
        self.advance();
        self.eat(Semicolon)?;
        Ok(Stmt::Rotate { direction })
    }

    /// PEGAR;
    fn pickup_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Pegar)?;
        self.eat(Semicolon)?;
        Ok(Stmt::PickUp)
    }

    /// SOLTAR;
    fn drop_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Soltar)?;
        self.eat(Semicolon)?;
        Ok(Stmt::Drop)
    }

    /// IMPRIMIR <expr>;
    fn print_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Imprimir)?;
        let value = self.expression()?;
        self.eat(Semicolon)?;
        Ok(Stmt::Print { value })
    }

    /// SE (<expr>) ENTAO <block> [SENAO <block>]
    fn if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Se)?;
        self.eat(LParen)?;
        let condition = self.expression()?;
        self.eat(RParen)?;
        self.eat(Entao)?;
        let then_block = self.block()?;

        let else_block = if self.c_token.t_type == Senao {
            self.advance();
            Some(self.block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
        })
    }

    /// REPETIR <expr> VEZES <block>
    fn repeat_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.eat(Repetir)?;
        let times = self.expression()?;
        self.eat(Vezes)?;
        let body = self.block()?;
        Ok(Stmt::Repeat { times, body })
    }

    /// { <statement>* }
    fn block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.eat(LBrace)?;
        let mut statements = Vec::new();
        while self.c_token.t_type != RBrace && self.c_token.t_type != Eof {
            statements.push(self.statement()?);
        }
        self.eat(RBrace)?;
        Ok(statements)
    }

    // Expression grammar, lowest precedence first.

    /// expression : comparison
    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.comparison()
    }

    /// comparison : additive ((== | != | < | > | <= | >=) additive)*
    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.additive()?;
        while matches!(
            self.c_token.t_type,
            Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual
        ) {
            let operator = self.c_token.clone();
            self.advance();
            node = Expr::Binary {
                left: Box::new(node),
                operator,
                right: Box::new(self.additive()?),
            };
        }
        Ok(node)
    }

    /// additive : multiplicative ((+ | -) multiplicative)*
    fn additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.multiplicative()?;
        while matches!(self.c_token.t_type, Plus | Minus) {
            let operator = self.c_token.clone();
            self.advance();
            node = Expr::Binary {
                left: Box::new(node),
                operator,
                right: Box::new(self.multiplicative()?),
            };
        }
        Ok(node)
    }

    /// multiplicative : unary ((* | /) unary)*
    fn multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.unary()?;
        while matches!(self.c_token.t_type, Star | Slash) {
            let operator = self.c_token.clone();
            self.advance();
            node = Expr::Binary {
                left: Box::new(node),
                operator,
                right: Box::new(self.unary()?),
            };
        }
        Ok(node)
    }

    /// unary : (+ | -) unary | primary
    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        if matches!(self.c_token.t_type, Plus | Minus) {
            let operator = self.c_token.clone();
            self.advance();
            return Ok(Expr::Unary {
                operator,
                right: Box::new(self.unary()?),
            });
        }
        self.primary()
    }

    /// primary : INTEGER | STRING | IDENT | (expression)
    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.c_token.clone();
        match token.t_type {
            IntNum => {
                self.advance();
                let value =
                    token
                        .value
                        .parse::<i64>()
                        .map_err(|_| SyntaxError::NumberOutOfRange {
                            text: token.value.clone(),
                            line: token.line,
                            column: token.column,
                        })?;
                Ok(Expr::Int { value, token })
            }
            RawStr => {
                self.advance();
                Ok(Expr::Str {
                    value: token.value.clone(),
                    token,
                })
            }
            Ident => {
                self.advance();
                Ok(Expr::Ident {
                    name: token.value.clone(),
                    token,
                })
            }
            LParen => {
                self.advance();
                let expr = self.expression()?;
                self.eat(RParen)?;
                Ok(expr)
            }
            _ => Err(SyntaxError::UnexpectedPrimary {
                text: token.value,
                line: token.line,
                column: token.column,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scanner::Scanner;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn parse(code: &str) -> Program {
        let tokens = Scanner::new(code).tokenize().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn parse_err(code: &str) -> SyntaxError {
        let tokens = Scanner::new(code).tokenize().unwrap();
        Parser::new(tokens).parse().unwrap_err()
    }

    #[test]
    fn var_declaration_shape() {
        let program = parse("VAR idade = 30;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::VarDecl { name, value } => {
                assert_eq!(name.value, "idade");
                assert!(matches!(value, Expr::Int { value: 30, .. }));
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let program = parse("IMPRIMIR 1 + 2 * 3;");
        assert_eq!(program.to_string(), "IMPRIMIR (1 + (2 * 3));");
    }

    #[test]
    fn additive_is_left_associative() {
        let program = parse("IMPRIMIR 1 - 2 - 3;");
        assert_eq!(program.to_string(), "IMPRIMIR ((1 - 2) - 3);");
    }

    #[test]
    fn parentheses_override_precedence() {
        let program = parse("IMPRIMIR (1 + 2) * 3;");
        assert_eq!(program.to_string(), "IMPRIMIR ((1 + 2) * 3);");
    }

    #[test]
    fn unary_is_right_associative() {
        let program = parse("IMPRIMIR - - 2;");
        assert_eq!(program.to_string(), "IMPRIMIR (-(-2));");
    }

    #[test]
    fn if_with_else_block() {
        let program = parse("SE (x > 0) ENTAO { PEGAR; } SENAO { SOLTAR; SOLTAR; }");
        match &program.statements[0] {
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                assert_eq!(condition.to_string(), "(x > 0)");
                assert_eq!(then_block.len(), 1);
                assert_eq!(else_block.as_ref().unwrap().len(), 2);
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn repeat_with_expression_count() {
        let program = parse("REPETIR n + 1 VEZES { MOVER FRENTE 1; }");
        match &program.statements[0] {
            Stmt::Repeat { times, body } => {
                assert_eq!(times.to_string(), "(n + 1)");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected Repeat, got {other:?}"),
        }
    }

    #[test]
    fn move_direction_must_be_frente_or_tras() {
        let err = parse_err("MOVER ESQUERDA 2;");
        assert_eq!(
            err,
            SyntaxError::InvalidDirection {
                command: "MOVER",
                text: "ESQUERDA".to_string(),
                line: 1,
            }
        );
    }

    #[test]
    fn unexpected_statement_start() {
        let err = parse_err("ENTAO PEGAR;");
        assert_eq!(
            err,
            SyntaxError::UnexpectedStatement {
                found: TokenType::Entao,
                line: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn missing_semicolon() {
        let err = parse_err("VAR x = 1");
        assert_eq!(
            err,
            SyntaxError::ExpectedToken {
                expected: TokenType::Semicolon,
                found: TokenType::Eof,
                text: String::new(),
                line: 1,
                column: 10,
            }
        );
    }

    #[test]
    fn premature_end_of_stream() {
        let err = parse_err("VAR x = ");
        assert!(matches!(err, SyntaxError::UnexpectedPrimary { .. }));
    }

    #[test]
    fn integer_literal_out_of_range() {
        let err = parse_err("IMPRIMIR 99999999999999999999;");
        assert!(matches!(err, SyntaxError::NumberOutOfRange { .. }));
    }

    #[test]
    fn reserialized_source_reparses_to_the_same_tree() {
        let program = parse(indoc! {r#"
            VAR i = 0;
            REPETIR 3 VEZES {
                SE (i < 2) ENTAO {
                    MOVER FRENTE i * 2 + 1;
                } SENAO {
                    GIRAR DIREITA;
                    IMPRIMIR "alto: " + i;
                }
                SET i = i + 1;
            }
            PEGAR;
            SOLTAR;
        "#});
        let first = program.to_string();
        let second = parse(&first).to_string();
        assert_eq!(first, second);
    }
}
