use std::fmt;
use std::io::{self, Write};

use crate::engine::environment::Environment;
use crate::error::ExecutionError;
use crate::lexing::ast::{Expr, Program, Stmt};
use crate::scan::token::{Token, TokenType};

/// Runtime value domain: signed integers, strings and booleans.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Cardinal facing of the robot. The display names are the observable values
/// of the `robot_direction` reserved identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Norte,
    Leste,
    Sul,
    Oeste,
}

impl Direction {
    pub fn right(self) -> Self {
        match self {
            Direction::Norte => Direction::Leste,
            Direction::Leste => Direction::Sul,
            Direction::Sul => Direction::Oeste,
            Direction::Oeste => Direction::Norte,
        }
    }

    pub fn left(self) -> Self {
        match self {
            Direction::Norte => Direction::Oeste,
            Direction::Oeste => Direction::Sul,
            Direction::Sul => Direction::Leste,
            Direction::Leste => Direction::Norte,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Direction::Norte => "NORTE",
            Direction::Leste => "LESTE",
            Direction::Sul => "SUL",
            Direction::Oeste => "OESTE",
        };
        write!(f, "{}", name)
    }
}

/// Tree-walking evaluator. One instance per program run; all mutable state
/// (variable environment plus robot position/facing/held-object flag) lives
/// behind this handle. Trace lines and `IMPRIMIR` output go to `out`; write
/// and flush failures on `out` are discarded, never surfaced as execution
/// errors, so the output channel cannot alter language semantics.
pub struct Interpreter<W: Write> {
    environment: Environment,
    robot_x: i64,
    robot_y: i64,
    robot_direction: Direction,
    has_object: bool,
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Interpreter {
            environment: Environment::new(None),
            robot_x: 0,
            robot_y: 0,
            robot_direction: Direction::Norte,
            has_object: false,
            out,
        }
    }

    pub fn interpret(&mut self, program: &Program) -> Result<(), ExecutionError> {
        for statement in &program.statements {
            self.execute(statement)?;
        }
        let _ = self.out.flush();
        Ok(())
    }

    pub fn robot_x(&self) -> i64 {
        self.robot_x
    }

    pub fn robot_y(&self) -> i64 {
        self.robot_y
    }

    pub fn robot_direction(&self) -> Direction {
        self.robot_direction
    }

    pub fn has_object(&self) -> bool {
        self.has_object
    }

    pub fn get_var(&self, name: &str) -> Option<Value> {
        self.environment.get(name).ok()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn trace(&mut self, line: String) {
        let _ = writeln!(self.out, "{}", line);
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), ExecutionError> {
        match statement {
            Stmt::VarDecl { name, value } => {
                let value = self.evaluate(value)?;
                self.environment
                    .define(&name.value, value.clone())
                    .map_err(|_| ExecutionError::AlreadyDeclared {
                        name: name.value.clone(),
                        line: name.line,
                        column: name.column,
                    })?;
                self.trace(format!("[Simulação] VAR '{}' = {}", name.value, value));
                Ok(())
            }
            Stmt::Assign { name, value } => {
                if !self.environment.exists(&name.value) {
                    return Err(ExecutionError::AssignBeforeDeclaration {
                        name: name.value.clone(),
                        line: name.line,
                        column: name.column,
                    });
                }
                let value = self.evaluate(value)?;
                self.environment
                    .assign(&name.value, value.clone())
                    .map_err(|_| ExecutionError::UndefinedVariable {
                        name: name.value.clone(),
                        line: name.line,
                        column: name.column,
                    })?;
                self.trace(format!("[Simulação] SET '{}' = {}", name.value, value));
                Ok(())
            }
            Stmt::Move { direction, steps } => self.execute_move(direction, steps),
            Stmt::Rotate { direction } => {
                let old = self.robot_direction;
                let (new, label) = if direction.t_type == TokenType::Direita {
                    (old.right(), "DIREITA")
                } else {
                    (old.left(), "ESQUERDA")
                };
                self.robot_direction = new;
                self.trace(format!(
                    "[Simulação] Robo girou {}. Direção: {} -> {}",
                    label, old, new
                ));
                Ok(())
            }
            Stmt::PickUp => {
                if self.has_object {
                    self.trace("[Simulação] Robo já está segurando um objeto.".to_string());
                } else {
                    self.has_object = true;
                    self.trace(format!(
                        "[Simulação] Robo PEGOU um objeto na posicao ({},{}).",
                        self.robot_x, self.robot_y
                    ));
                }
                Ok(())
            }
            Stmt::Drop => {
                if !self.has_object {
                    self.trace(
                        "[Simulação] Robo não está segurando nenhum objeto para SOLTAR."
                            .to_string(),
                    );
                } else {
                    self.has_object = false;
                    self.trace(format!(
                        "[Simulação] Robo SOLTOU um objeto na posicao ({},{}).",
                        self.robot_x, self.robot_y
                    ));
                }
                Ok(())
            }
            Stmt::Print { value } => {
                let value = self.evaluate(value)?;
                self.trace(format!("[IMPRIMIR] {}", value));
                Ok(())
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                let truthy = match self.evaluate(condition)? {
                    Value::Bool(b) => b,
                    Value::Int(n) => n != 0,
                    other => {
                        return Err(ExecutionError::InvalidCondition {
                            value: other.to_string(),
                            line: condition.token().line,
                            column: condition.token().column,
                        })
                    }
                };
                // Blocks run flat against the enclosing environment.
                if truthy {
                    self.execute_block(then_block)
                } else if let Some(else_block) = else_block {
                    self.execute_block(else_block)
                } else {
                    Ok(())
                }
            }
            Stmt::Repeat { times, body } => {
                // The count is evaluated once, before the first iteration.
                let count = match self.evaluate(times)? {
                    Value::Int(n) if n >= 0 => n,
                    other => {
                        return Err(ExecutionError::InvalidRepeatCount {
                            value: other.to_string(),
                            line: times.token().line,
                            column: times.token().column,
                        })
                    }
                };
                for _ in 0..count {
                    self.execute_block(body)?;
                }
                Ok(())
            }
        }
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), ExecutionError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute_move(&mut self, direction: &Token, steps: &Expr) -> Result<(), ExecutionError> {
        let count = match self.evaluate(steps)? {
            Value::Int(n) if n >= 0 => n,
            other => {
                return Err(ExecutionError::InvalidSteps {
                    value: other.to_string(),
                    line: steps.token().line,
                    column: steps.token().column,
                })
            }
        };

        let (old_x, old_y) = (self.robot_x, self.robot_y);
        let forward = direction.t_type == TokenType::Frente;
        match (forward, self.robot_direction) {
            (true, Direction::Norte) => self.robot_y += count,
            (true, Direction::Leste) => self.robot_x += count,
            (true, Direction::Sul) => self.robot_y -= count,
            (true, Direction::Oeste) => self.robot_x -= count,
            (false, Direction::Norte) => self.robot_y -= count,
            (false, Direction::Leste) => self.robot_x -= count,
            (false, Direction::Sul) => self.robot_y += count,
            // TRAS while facing OESTE also moves towards -X, same as FRENTE.
            // Kept as-is: existing scripts depend on this behavior.
            (false, Direction::Oeste) => self.robot_x -= count,
        }

        let label = if forward { "FRENTE" } else { "TRAS" };
        self.trace(format!(
            "[Simulação] Robo moveu {} {} passos. Posicao: ({},{}) -> ({},{})",
            label, count, old_x, old_y, self.robot_x, self.robot_y
        ));
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        match expr {
            Expr::Int { value, .. } => Ok(Value::Int(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Ident { name, token } => self.resolve_identifier(name, token),
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                eval_binary(lhs, rhs, operator)
            }
            Expr::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match (operator.t_type, value) {
                    (TokenType::Minus, Value::Int(n)) => n
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| overflow(operator)),
                    (TokenType::Plus, Value::Int(n)) => Ok(Value::Int(n)),
                    (TokenType::Minus | TokenType::Plus, _) => Err(invalid_operands(operator)),
                    _ => Err(ExecutionError::UnknownOperator {
                        operator: operator.value.clone(),
                        line: operator.line,
                        column: operator.column,
                    }),
                }
            }
        }
    }

    /// Reserved robot-state names resolve before the variable environment.
    fn resolve_identifier(&self, name: &str, token: &Token) -> Result<Value, ExecutionError> {
        match name {
            "robot_x" => Ok(Value::Int(self.robot_x)),
            "robot_y" => Ok(Value::Int(self.robot_y)),
            "robot_direction" => Ok(Value::Str(self.robot_direction.to_string())),
            "has_object" => Ok(Value::Int(i64::from(self.has_object))),
            _ => self
                .environment
                .get(name)
                .map_err(|_| ExecutionError::UndefinedVariable {
                    name: name.to_string(),
                    line: token.line,
                    column: token.column,
                }),
        }
    }
}

fn eval_binary(lhs: Value, rhs: Value, operator: &Token) -> Result<Value, ExecutionError> {
    use TokenType::*;

    match operator.t_type {
        Plus => match (lhs, rhs) {
            // `+` concatenates whenever either side is a string.
            (Value::Str(l), r) => Ok(Value::Str(format!("{}{}", l, r))),
            (l, Value::Str(r)) => Ok(Value::Str(format!("{}{}", l, r))),
            (Value::Int(l), Value::Int(r)) => l
                .checked_add(r)
                .map(Value::Int)
                .ok_or_else(|| overflow(operator)),
            _ => Err(invalid_operands(operator)),
        },
        Minus => match (lhs, rhs) {
            (Value::Int(l), Value::Int(r)) => l
                .checked_sub(r)
                .map(Value::Int)
                .ok_or_else(|| overflow(operator)),
            _ => Err(invalid_operands(operator)),
        },
        Star => match (lhs, rhs) {
            (Value::Int(l), Value::Int(r)) => l
                .checked_mul(r)
                .map(Value::Int)
                .ok_or_else(|| overflow(operator)),
            _ => Err(invalid_operands(operator)),
        },
        Slash => match (lhs, rhs) {
            (Value::Int(_), Value::Int(0)) => Err(ExecutionError::DivisionByZero {
                line: operator.line,
                column: operator.column,
            }),
            (Value::Int(l), Value::Int(r)) => floor_div(l, r)
                .map(Value::Int)
                .ok_or_else(|| overflow(operator)),
            _ => Err(invalid_operands(operator)),
        },
        // Values of different kinds compare unequal.
        Equal => Ok(Value::Bool(lhs == rhs)),
        NotEqual => Ok(Value::Bool(lhs != rhs)),
        Less | Greater | LessEqual | GreaterEqual => {
            let ordering = match (&lhs, &rhs) {
                (Value::Int(l), Value::Int(r)) => l.cmp(r),
                (Value::Str(l), Value::Str(r)) => l.cmp(r),
                _ => return Err(invalid_operands(operator)),
            };
            let result = match operator.t_type {
                Less => ordering.is_lt(),
                Greater => ordering.is_gt(),
                LessEqual => ordering.is_le(),
                _ => ordering.is_ge(),
            };
            Ok(Value::Bool(result))
        }
        _ => Err(ExecutionError::UnknownOperator {
            operator: operator.value.clone(),
            line: operator.line,
            column: operator.column,
        }),
    }
}

fn invalid_operands(operator: &Token) -> ExecutionError {
    ExecutionError::InvalidOperands {
        operator: operator.value.clone(),
        line: operator.line,
        column: operator.column,
    }
}

fn overflow(operator: &Token) -> ExecutionError {
    ExecutionError::ArithmeticOverflow {
        operator: operator.value.clone(),
        line: operator.line,
        column: operator.column,
    }
}

/// Floor division: `-7 / 2` is `-4`, not the truncated `-3`. `None` on the
/// one overflowing pair, `i64::MIN / -1`.
fn floor_div(lhs: i64, rhs: i64) -> Option<i64> {
    let quotient = lhs.checked_div(rhs)?;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn op(t_type: TokenType, value: &str) -> Token {
        Token::new(t_type, value.to_string(), 1, 1)
    }

    #[test]
    fn floor_division_matches_mathematical_floor() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(-7, -2), Some(3));
        assert_eq!(floor_div(6, 3), Some(2));
        assert_eq!(floor_div(-6, 3), Some(-2));
    }

    #[test]
    fn floor_division_rejects_the_overflowing_pair() {
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(floor_div(i64::MIN, 1), Some(i64::MIN));
        assert_eq!(floor_div(i64::MIN + 1, -1), Some(i64::MAX));
    }

    #[test]
    fn overflowing_arithmetic_is_an_execution_error() {
        let err = eval_binary(
            Value::Int(i64::MAX),
            Value::Int(1),
            &op(TokenType::Plus, "+"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::ArithmeticOverflow {
                operator: "+".to_string(),
                line: 1,
                column: 1,
            }
        );

        let err = eval_binary(
            Value::Int(i64::MIN),
            Value::Int(1),
            &op(TokenType::Minus, "-"),
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::ArithmeticOverflow { .. }));

        let err = eval_binary(
            Value::Int(i64::MIN),
            Value::Int(-1),
            &op(TokenType::Slash, "/"),
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn rotation_cycle() {
        let mut d = Direction::Norte;
        let expected = [
            Direction::Leste,
            Direction::Sul,
            Direction::Oeste,
            Direction::Norte,
        ];
        for e in expected {
            d = d.right();
            assert_eq!(d, e);
        }
        assert_eq!(Direction::Norte.left(), Direction::Oeste);
        assert_eq!(Direction::Norte.left().left(), Direction::Sul);
    }

    #[test]
    fn direction_display_names() {
        assert_eq!(Direction::Norte.to_string(), "NORTE");
        assert_eq!(Direction::Leste.to_string(), "LESTE");
        assert_eq!(Direction::Sul.to_string(), "SUL");
        assert_eq!(Direction::Oeste.to_string(), "OESTE");
    }

    #[test]
    fn plus_concatenates_when_either_side_is_a_string() {
        let result = eval_binary(
            Value::Str("Loop: ".to_string()),
            Value::Int(2),
            &op(TokenType::Plus, "+"),
        )
        .unwrap();
        assert_eq!(result, Value::Str("Loop: 2".to_string()));

        let result = eval_binary(
            Value::Int(1),
            Value::Str("x".to_string()),
            &op(TokenType::Plus, "+"),
        )
        .unwrap();
        assert_eq!(result, Value::Str("1x".to_string()));
    }

    #[test]
    fn arithmetic_on_non_integers_is_a_type_error() {
        let err = eval_binary(
            Value::Str("a".to_string()),
            Value::Int(2),
            &op(TokenType::Star, "*"),
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidOperands { .. }));

        let err = eval_binary(
            Value::Bool(true),
            Value::Int(2),
            &op(TokenType::Minus, "-"),
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidOperands { .. }));
    }

    #[test]
    fn division_by_zero() {
        let err = eval_binary(Value::Int(10), Value::Int(0), &op(TokenType::Slash, "/"))
            .unwrap_err();
        assert_eq!(err, ExecutionError::DivisionByZero { line: 1, column: 1 });
    }

    #[test]
    fn values_of_different_kinds_compare_unequal() {
        let result = eval_binary(
            Value::Int(1),
            Value::Str("1".to_string()),
            &op(TokenType::Equal, "=="),
        )
        .unwrap();
        assert_eq!(result, Value::Bool(false));
    }

    #[test]
    fn ordering_works_on_integers_and_strings_only() {
        let result =
            eval_binary(Value::Int(3), Value::Int(5), &op(TokenType::Less, "<")).unwrap();
        assert_eq!(result, Value::Bool(true));

        let result = eval_binary(
            Value::Str("abc".to_string()),
            Value::Str("abd".to_string()),
            &op(TokenType::LessEqual, "<="),
        )
        .unwrap();
        assert_eq!(result, Value::Bool(true));

        let err = eval_binary(
            Value::Int(1),
            Value::Str("1".to_string()),
            &op(TokenType::Greater, ">"),
        )
        .unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidOperands { .. }));
    }
}
