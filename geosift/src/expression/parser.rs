use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};
use crate::Value;

use super::ast::{CompareOp, Expr, LikePattern};
use super::lexer::{Keyword, Token};

fn syntax_error(message: &str) -> GeosiftError {
    log::error!("Predicate parser error: {}", message);
    GeosiftError::new(message, ErrorKind::SyntaxError)
}

/// Parses a token sequence into an expression tree.
///
/// Grammar, loosest binding first:
///
/// ```text
/// or_expr    := and_expr (OR and_expr)*
/// and_expr   := not_expr (AND not_expr)*
/// not_expr   := NOT not_expr | comparison
/// comparison := operand ( cmp_op operand
///                       | LIKE string
///                       | IN '(' literal (',' literal)* ')'
///                       | IS [NOT] NULL )?
/// operand    := literal | field | '(' or_expr ')'
/// ```
///
/// A complete expression must consume every token; trailing tokens are a
/// `SyntaxError`.
pub(crate) fn parse(tokens: Vec<Token>) -> GeosiftResult<Expr> {
    let mut parser = Parser { tokens, pos: 0 };
    if parser.at_end() {
        return Err(syntax_error("empty predicate"));
    }
    let expr = parser.or_expr()?;
    if !parser.at_end() {
        return Err(syntax_error("trailing tokens after complete expression"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn or_expr(&mut self) -> GeosiftResult<Expr> {
        let mut left = self.and_expr()?;
        while self.peek() == Some(&Token::Keyword(Keyword::Or)) {
            self.advance();
            let right = self.and_expr()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> GeosiftResult<Expr> {
        let mut left = self.not_expr()?;
        while self.peek() == Some(&Token::Keyword(Keyword::And)) {
            self.advance();
            let right = self.not_expr()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> GeosiftResult<Expr> {
        if self.peek() == Some(&Token::Keyword(Keyword::Not)) {
            self.advance();
            let inner = self.not_expr()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> GeosiftResult<Expr> {
        let left = self.operand()?;

        let op = match self.peek() {
            Some(Token::Eq) => Some(CompareOp::Eq),
            Some(Token::Ne) => Some(CompareOp::Ne),
            Some(Token::Lt) => Some(CompareOp::Lt),
            Some(Token::Le) => Some(CompareOp::Le),
            Some(Token::Gt) => Some(CompareOp::Gt),
            Some(Token::Ge) => Some(CompareOp::Ge),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let right = self.operand()?;
            return Ok(Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        match self.peek() {
            Some(Token::Keyword(Keyword::Like)) => {
                self.advance();
                match self.advance() {
                    Some(Token::Str(pattern)) => Ok(Expr::Like {
                        expr: Box::new(left),
                        pattern: LikePattern::new(&pattern)?,
                    }),
                    _ => Err(syntax_error("LIKE pattern must be a string literal")),
                }
            }
            Some(Token::Keyword(Keyword::In)) => {
                self.advance();
                if self.advance() != Some(Token::LParen) {
                    return Err(syntax_error("expected '(' after IN"));
                }
                let mut list = Vec::new();
                loop {
                    list.push(self.literal()?);
                    match self.advance() {
                        Some(Token::Comma) => continue,
                        Some(Token::RParen) => break,
                        _ => return Err(syntax_error("expected ',' or ')' in IN list")),
                    }
                }
                Ok(Expr::In {
                    expr: Box::new(left),
                    list,
                })
            }
            Some(Token::Keyword(Keyword::Is)) => {
                self.advance();
                let negated = if self.peek() == Some(&Token::Keyword(Keyword::Not)) {
                    self.advance();
                    true
                } else {
                    false
                };
                if self.advance() != Some(Token::Keyword(Keyword::Null)) {
                    return Err(syntax_error("expected NULL after IS"));
                }
                Ok(Expr::IsNull {
                    expr: Box::new(left),
                    negated,
                })
            }
            _ => Ok(left),
        }
    }

    fn operand(&mut self) -> GeosiftResult<Expr> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Literal(Value::F64(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Keyword(Keyword::Null)) => Ok(Expr::Literal(Value::Null)),
            Some(Token::Ident(name)) => Ok(Expr::Field(name)),
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                if self.advance() != Some(Token::RParen) {
                    return Err(syntax_error("unbalanced parentheses"));
                }
                Ok(inner)
            }
            Some(token) => Err(syntax_error(&format!("unexpected token {:?}", token))),
            None => Err(syntax_error("unexpected end of predicate")),
        }
    }

    fn literal(&mut self) -> GeosiftResult<Value> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Value::F64(n)),
            Some(Token::Str(s)) => Ok(Value::String(s)),
            Some(Token::Keyword(Keyword::Null)) => Ok(Value::Null),
            Some(token) => Err(syntax_error(&format!(
                "IN list expects literals, found {:?}",
                token
            ))),
            None => Err(syntax_error("unexpected end of IN list")),
        }
    }
}
