use std::cmp::Ordering;

use crate::{Feature, Value};

use super::ast::{CompareOp, Expr};

/// Evaluates a compiled expression against one feature.
///
/// Evaluation is a pure function of `(expr, feature)`: it never errors and
/// has no side effects, so a batch filter cannot abort because one record
/// lacks a field or carries an unexpected type. Missing attributes resolve
/// to null, and any comparison against null (other than `IS [NOT] NULL`)
/// is simply false — two-valued logic, not SQL's three-valued null logic.
///
/// # Arguments
///
/// * `expr` - The compiled expression tree
/// * `feature` - The feature whose attributes are consulted
///
/// # Returns
///
/// `true` when the feature satisfies the predicate.
pub fn evaluate(expr: &Expr, feature: &Feature) -> bool {
    match expr {
        Expr::Literal(value) => matches!(value, Value::Bool(true)),
        Expr::Field(name) => matches!(feature.get(name), Value::Bool(true)),
        Expr::Compare { op, left, right } => {
            let left = resolve(left, feature);
            let right = resolve(right, feature);
            compare(*op, &left, &right)
        }
        Expr::Like { expr, pattern } => {
            let value = resolve(expr, feature);
            if value.is_null() {
                return false;
            }
            pattern.matches(&value.as_text())
        }
        Expr::In { expr, list } => {
            let value = resolve(expr, feature);
            if value.is_null() {
                return false;
            }
            list.iter().any(|item| values_equal(&value, item))
        }
        Expr::IsNull { expr, negated } => {
            let is_null = resolve(expr, feature).is_null();
            is_null != *negated
        }
        Expr::And(left, right) => evaluate(left, feature) && evaluate(right, feature),
        Expr::Or(left, right) => evaluate(left, feature) || evaluate(right, feature),
        Expr::Not(inner) => !evaluate(inner, feature),
    }
}

/// Resolves a comparison operand to a value.
///
/// Field references read the feature (absent attributes are null); nested
/// logical expressions in operand position collapse to their boolean result.
fn resolve(expr: &Expr, feature: &Feature) -> Value {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Field(name) => feature.get(name),
        other => Value::Bool(evaluate(other, feature)),
    }
}

/// Pairs two values numerically when possible.
///
/// Both native numbers compare directly; a string is coerced to a number
/// only when the other side is already numeric. Two strings stay strings.
fn numeric_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    match (left.raw_number(), right.raw_number()) {
        (Some(a), Some(b)) => Some((a, b)),
        (Some(a), None) => right.as_number().map(|b| (a, b)),
        (None, Some(b)) => left.as_number().map(|a| (a, b)),
        (None, None) => None,
    }
}

/// Equality used by `=`, `<>`, and `IN`: numeric when coercible, otherwise
/// ordinal string equality.
fn values_equal(left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }
    if let Some((a, b)) = numeric_pair(left, right) {
        return a == b;
    }
    left.as_text() == right.as_text()
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }

    match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => !values_equal(left, right),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
            let ordering = match numeric_pair(left, right) {
                Some((a, b)) => a.partial_cmp(&b),
                None => Some(left.as_text().cmp(&right.as_text())),
            };
            match ordering {
                Some(Ordering::Less) => matches!(op, CompareOp::Lt | CompareOp::Le),
                Some(Ordering::Equal) => matches!(op, CompareOp::Le | CompareOp::Ge),
                Some(Ordering::Greater) => matches!(op, CompareOp::Gt | CompareOp::Ge),
                // NaN on either side never satisfies an ordering
                None => false,
            }
        }
    }
}
