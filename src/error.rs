//! Error types for clause construction.

use crate::coerce::CoercionRole;
use crate::operator::Operator;
use crate::value::DataType;
use thiserror::Error;

/// Errors raised at tree-construction time.
///
/// All of these are deterministic caller or input errors: construction is
/// fail-fast and no partial nodes are ever returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClauseError {
    /// NULL/TRUE/FALSE combined with an operator outside the legal subset
    #[error(
        "Only '=', '!=', 'IS', 'IS NOT', 'IS DISTINCT FROM', 'IS NOT DISTINCT FROM' \
         operators can be used with NULL, TRUE or FALSE (got '{op}')"
    )]
    InvalidConstOperator { op: Operator },

    /// Wrong number of operands for the operator's arity
    #[error("Operator '{op}' expects {expected} operand(s), got {actual}")]
    OperandCount {
        op: Operator,
        expected: usize,
        actual: usize,
    },

    /// Operand that cannot be used with the operator
    #[error("Invalid operand for operator '{op}': {reason}")]
    InvalidOperand { op: Operator, reason: String },

    /// Operator with no tree-construction semantics on this expression
    #[error("Operator '{op}' is not supported on this expression (anchor type: {anchor_type:?})")]
    UnsupportedOperator {
        op: Operator,
        anchor_type: Option<DataType>,
    },

    /// Raw operand not representable under the requested coercion role
    #[error("Cannot coerce operand under {role:?} role for operator '{op}': {reason}")]
    Coercion {
        role: CoercionRole,
        op: Operator,
        reason: String,
    },
}

/// Result type for clause construction.
pub type ClauseResult<T> = Result<T, ClauseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClauseError::InvalidConstOperator { op: Operator::Lt };
        assert!(err.to_string().contains("'<'"));
        assert!(err.to_string().contains("NULL, TRUE or FALSE"));

        let err = ClauseError::UnsupportedOperator {
            op: Operator::Lshift,
            anchor_type: Some(DataType::Int32),
        };
        assert_eq!(
            err.to_string(),
            "Operator '<<' is not supported on this expression (anchor type: Some(Int32))"
        );

        let err = ClauseError::OperandCount {
            op: Operator::Between,
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Operator 'BETWEEN' expects 2 operand(s), got 1");

        let err = ClauseError::Coercion {
            role: CoercionRole::InElement,
            op: Operator::In,
            reason: "a scalar is not a set".to_string(),
        };
        assert!(err.to_string().contains("InElement"));
        assert!(err.to_string().contains("'IN'"));
    }
}
