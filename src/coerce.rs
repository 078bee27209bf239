//! Operand coercion: turning raw operands into expression nodes.
//!
//! The resolver never inspects raw values directly; every operand passes
//! through a [`CoercionEngine`] under a role describing how the operand
//! will be used. [`DefaultCoercion`] covers plain values, clauses, and
//! value sequences; alternative engines (bind-parameter producers,
//! subquery linters) implement the same trait.

use crate::clause::{ClauseList, Expr, LiteralValue};
use crate::error::{ClauseError, ClauseResult};
use crate::operator::Operator;
use crate::value::Value;

/// How an operand is about to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionRole {
    /// Right-hand side of a binary operation
    BinaryElement,
    /// Candidate set of an IN/NOT IN membership test
    InElement,
    /// Literal constant (NULL, TRUE, FALSE)
    ConstExpr,
}

/// Raw operand handed to the engine by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A plain runtime value
    Value(Value),
    /// An already-built expression node
    Clause(Expr),
    /// An ordered sequence, for set-membership candidates
    Sequence(Vec<Operand>),
}

/// Literal classification used by the boolean comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Null,
    Bool(bool),
}

impl Operand {
    pub fn null() -> Self {
        Operand::Value(Value::Null)
    }

    /// Classify this operand if it is a NULL or boolean literal.
    pub fn as_const(&self) -> Option<ConstKind> {
        match self {
            Operand::Value(Value::Null) | Operand::Clause(Expr::Null) => Some(ConstKind::Null),
            Operand::Value(Value::Boolean(b)) => Some(ConstKind::Bool(*b)),
            Operand::Clause(Expr::True) => Some(ConstKind::Bool(true)),
            Operand::Clause(Expr::False) => Some(ConstKind::Bool(false)),
            _ => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self {
        Operand::Clause(e)
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Value(Value::Boolean(v))
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Value(Value::Int32(v))
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Value(Value::Float64(v))
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Value(Value::String(v.to_string()))
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Value(Value::String(v))
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Operand::Sequence(values.into_iter().map(Operand::Value).collect())
    }
}

impl From<Vec<Operand>> for Operand {
    fn from(operands: Vec<Operand>) -> Self {
        Operand::Sequence(operands)
    }
}

/// Turns raw operands into expression nodes for a given role.
///
/// Implementations must be pure: same inputs, same node, no side effects.
pub trait CoercionEngine {
    fn coerce(
        &self,
        role: CoercionRole,
        raw: Operand,
        anchor: &Expr,
        op: &Operator,
    ) -> ClauseResult<Expr>;
}

/// Default coercion over plain values and clauses.
pub struct DefaultCoercion;

impl CoercionEngine for DefaultCoercion {
    fn coerce(
        &self,
        role: CoercionRole,
        raw: Operand,
        anchor: &Expr,
        op: &Operator,
    ) -> ClauseResult<Expr> {
        match role {
            CoercionRole::BinaryElement => match raw {
                Operand::Clause(e) => Ok(e),
                Operand::Value(Value::Null) => Ok(Expr::Null),
                Operand::Value(v) => Ok(Expr::Literal(LiteralValue::new(v))),
                Operand::Sequence(_) => Err(ClauseError::Coercion {
                    role,
                    op: op.clone(),
                    reason: "a sequence is not a scalar operand".to_string(),
                }),
            },

            CoercionRole::ConstExpr => match raw.as_const() {
                Some(ConstKind::Null) => Ok(Expr::Null),
                Some(ConstKind::Bool(true)) => Ok(Expr::True),
                Some(ConstKind::Bool(false)) => Ok(Expr::False),
                None => Err(ClauseError::Coercion {
                    role,
                    op: op.clone(),
                    reason: "only NULL, TRUE or FALSE can be coerced as constants".to_string(),
                }),
            },

            CoercionRole::InElement => match raw {
                Operand::Sequence(items) => {
                    let clauses = items
                        .into_iter()
                        .map(|item| self.coerce(CoercionRole::BinaryElement, item, anchor, op))
                        .collect::<ClauseResult<Vec<_>>>()?;
                    Ok(Expr::List(ClauseList::new(Operator::Comma, clauses)))
                }
                Operand::Clause(e @ Expr::List(_)) | Operand::Clause(e @ Expr::External(_)) => {
                    Ok(e)
                }
                Operand::Clause(e) if e.is_quantified() => Ok(e),
                _ => Err(ClauseError::Coercion {
                    role,
                    op: op.clone(),
                    reason: "IN expects a sequence of values or a set-returning clause"
                        .to_string(),
                }),
            },
        }
    }
}
