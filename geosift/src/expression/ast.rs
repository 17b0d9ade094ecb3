use regex::Regex;
use std::fmt::{Debug, Display, Formatter};

use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};
use crate::Value;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Ne => write!(f, "<>"),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Le => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Ge => write!(f, ">="),
        }
    }
}

/// A `LIKE` pattern compiled to an anchored regular expression.
///
/// The SQL wildcards `%` (zero or more characters) and `_` (exactly one
/// character) are translated once at compile time; every other character is
/// matched literally and case-sensitively.
#[derive(Clone)]
pub struct LikePattern {
    raw: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles a SQL `LIKE` pattern.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The raw pattern, e.g. `"MAG%"` or `"_AK"`
    pub fn new(pattern: &str) -> GeosiftResult<Self> {
        let mut translated = String::with_capacity(pattern.len() + 2);
        translated.push('^');
        for c in pattern.chars() {
            match c {
                '%' => translated.push_str(".*"),
                '_' => translated.push('.'),
                c => translated.push_str(&regex::escape(&c.to_string())),
            }
        }
        translated.push('$');

        let regex = Regex::new(&translated).map_err(|e| {
            log::error!("Invalid LIKE pattern '{}': {}", pattern, e);
            GeosiftError::new(
                &format!("invalid LIKE pattern '{}'", pattern),
                ErrorKind::SyntaxError,
            )
        })?;

        Ok(LikePattern {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// The raw SQL pattern as written in the predicate.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Matches a candidate string against the pattern.
    #[inline]
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Debug for LikePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LikePattern({:?})", self.raw)
    }
}

/// A compiled predicate expression.
///
/// The tree is acyclic and fully resolved at compile time: literals are
/// already [Value]s, `LIKE` patterns are already compiled, and `IN` lists are
/// literal vectors. The evaluator walks this closed set of variants
/// exhaustively; there is no open-ended dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Value),
    /// A reference to a feature attribute by name.
    Field(String),
    /// A binary comparison between two operands.
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// SQL `LIKE` pattern match.
    Like {
        expr: Box<Expr>,
        pattern: LikePattern,
    },
    /// Set membership over a literal list.
    In { expr: Box<Expr>, list: Vec<Value> },
    /// `IS NULL` / `IS NOT NULL`.
    IsNull { expr: Box<Expr>, negated: bool },
    /// Logical conjunction.
    And(Box<Expr>, Box<Expr>),
    /// Logical disjunction.
    Or(Box<Expr>, Box<Expr>),
    /// Logical negation.
    Not(Box<Expr>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(Value::String(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Field(name) => write!(f, "{}", name),
            Expr::Compare { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Like { expr, pattern } => write!(f, "({} LIKE '{}')", expr, pattern.raw()),
            Expr::In { expr, list } => {
                write!(f, "({} IN (", expr)?;
                for (i, value) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match value {
                        Value::String(s) => write!(f, "'{}'", s.replace('\'', "''"))?,
                        v => write!(f, "{}", v)?,
                    }
                }
                write!(f, "))")
            }
            Expr::IsNull { expr, negated } => {
                if *negated {
                    write!(f, "({} IS NOT NULL)", expr)
                } else {
                    write!(f, "({} IS NULL)", expr)
                }
            }
            Expr::And(left, right) => write!(f, "({} AND {})", left, right),
            Expr::Or(left, right) => write!(f, "({} OR {})", left, right),
            Expr::Not(expr) => write!(f, "(NOT {})", expr),
        }
    }
}
