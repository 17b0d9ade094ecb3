use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};

/// Reserved words of the predicate language.
///
/// Keywords are matched case-insensitively; `age`, `AGE` and `Age` are three
/// different field names, but `and`, `AND` and `And` are all the conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    And,
    Or,
    Not,
    Like,
    In,
    Is,
    Null,
}

impl Keyword {
    fn from_ident(ident: &str) -> Option<Keyword> {
        match ident.to_ascii_uppercase().as_str() {
            "AND" => Some(Keyword::And),
            "OR" => Some(Keyword::Or),
            "NOT" => Some(Keyword::Not),
            "LIKE" => Some(Keyword::Like),
            "IN" => Some(Keyword::In),
            "IS" => Some(Keyword::Is),
            "NULL" => Some(Keyword::Null),
            _ => None,
        }
    }
}

/// A single lexical token of a predicate string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Keyword(Keyword),
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
    Comma,
}

fn syntax_error(message: &str) -> GeosiftError {
    log::error!("Predicate lexer error: {}", message);
    GeosiftError::new(message, ErrorKind::SyntaxError)
}

/// Splits a predicate string into tokens.
///
/// # Arguments
///
/// * `input` - The raw predicate string
///
/// # Returns
///
/// The token sequence, or a `SyntaxError` for an unterminated string or
/// bracket literal, or any character outside the language.
pub(crate) fn tokenize(input: &str) -> GeosiftResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '<' => {
                chars.next();
                match chars.peek() {
                    Some('=') => {
                        chars.next();
                        tokens.push(Token::Le);
                    }
                    Some('>') => {
                        chars.next();
                        tokens.push(Token::Ne);
                    }
                    _ => tokens.push(Token::Lt),
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ne);
                } else {
                    return Err(syntax_error("unrecognized operator '!'"));
                }
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                let mut terminated = false;
                while let Some(c) = chars.next() {
                    if c == '\'' {
                        // two consecutive quotes escape an embedded quote
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            text.push('\'');
                        } else {
                            terminated = true;
                            break;
                        }
                    } else {
                        text.push(c);
                    }
                }
                if !terminated {
                    return Err(syntax_error("unterminated string literal"));
                }
                tokens.push(Token::Str(text));
            }
            '[' => {
                chars.next();
                let mut name = String::new();
                let mut terminated = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        terminated = true;
                        break;
                    }
                    name.push(c);
                }
                if !terminated {
                    return Err(syntax_error("unterminated bracket identifier"));
                }
                tokens.push(Token::Ident(name));
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(c) if c.is_ascii_digit() || *c == '.' => {
                        let number = lex_number(&mut chars)?;
                        tokens.push(Token::Number(-number));
                    }
                    _ => return Err(syntax_error("unexpected character '-'")),
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                let number = lex_number(&mut chars)?;
                tokens.push(Token::Number(number));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match Keyword::from_ident(&ident) {
                    Some(keyword) => tokens.push(Token::Keyword(keyword)),
                    None => tokens.push(Token::Ident(ident)),
                }
            }
            c => {
                return Err(syntax_error(&format!("unexpected character '{}'", c)));
            }
        }
    }

    Ok(tokens)
}

fn lex_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> GeosiftResult<f64> {
    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }
    text.parse::<f64>()
        .map_err(|_| syntax_error(&format!("malformed number literal '{}'", text)))
}
