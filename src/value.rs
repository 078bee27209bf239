//! Data types and runtime values for expression operands.
//!
//! This module provides:
//! - The static type vocabulary (`DataType`) carried by expression nodes
//! - Runtime values (`Value`) fed to the coercion engine
//! - The per-type operator adaptation hook used by binary operations

use crate::operator::Operator;

/// Static types carried by expression nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int32,
    Float64,
    Varchar,
    Date,
    Interval,
    Json,
    /// Result of a MATCH predicate. Dialects render it as a boolean or a
    /// relevance score, so it is kept distinct from `Boolean`.
    Match,
}

impl DataType {
    /// Whether values of this type support indexed access (`expr[key]`).
    pub fn is_indexable(self) -> bool {
        matches!(self, DataType::Json)
    }

    /// Per-type operator adaptation, consulted by binary operations when
    /// the caller supplies no explicit result type. May rewrite the
    /// operator (string `+` becomes `||`) and infers the result type from
    /// the pairing of left and right operand types.
    pub fn adapt_expression(
        self,
        op: &Operator,
        right: Option<DataType>,
    ) -> (Operator, Option<DataType>) {
        if op.is_comparison() {
            return (op.clone(), Some(DataType::Boolean));
        }

        match (self, op, right) {
            // String concatenation: + is spelled || in SQL
            (DataType::Varchar, Operator::Add, _) => (Operator::Concat, Some(DataType::Varchar)),
            (DataType::Varchar, Operator::Concat, _) => (op.clone(), Some(DataType::Varchar)),

            // Numeric promotion
            (DataType::Int32, arith, Some(DataType::Float64)) if arith.is_arithmetic() => {
                (op.clone(), Some(DataType::Float64))
            }
            (DataType::Float64, arith, Some(DataType::Int32) | Some(DataType::Float64) | None)
                if arith.is_arithmetic() =>
            {
                (op.clone(), Some(DataType::Float64))
            }
            (DataType::Int32, arith, Some(DataType::Int32) | None) if arith.is_arithmetic() => {
                (op.clone(), Some(DataType::Int32))
            }

            // Date/interval arithmetic
            (DataType::Date, Operator::Add | Operator::Sub, Some(DataType::Interval)) => {
                (op.clone(), Some(DataType::Date))
            }
            (DataType::Date, Operator::Sub, Some(DataType::Date)) => {
                (op.clone(), Some(DataType::Interval))
            }
            (DataType::Interval, Operator::Add | Operator::Sub, Some(DataType::Interval)) => {
                (op.clone(), Some(DataType::Interval))
            }

            // Default: the left operand's type carries through
            _ => (op.clone(), Some(self)),
        }
    }
}

/// Runtime values handed to the coercion engine as raw operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Float64(f64),
    String(String),
}

impl Value {
    /// Get the data type of this value. NULL has no type of its own.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::Varchar),
        }
    }

    /// Check if this value is compatible with the given data type
    pub fn is_compatible_with(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Value::Null, _) => true, // NULL is compatible with any type
            (Value::Boolean(_), DataType::Boolean) => true,
            (Value::Int32(_), DataType::Int32) => true,
            (Value::Float64(_), DataType::Float64) => true,
            (Value::String(_), DataType::Varchar) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_data_types() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Boolean(true).data_type(), Some(DataType::Boolean));
        assert_eq!(Value::Int32(42).data_type(), Some(DataType::Int32));
        assert_eq!(Value::Float64(1.5).data_type(), Some(DataType::Float64));
        assert_eq!(
            Value::String("hello".to_string()).data_type(),
            Some(DataType::Varchar)
        );
    }

    #[test]
    fn test_value_compatibility() {
        assert!(Value::Null.is_compatible_with(DataType::Int32));
        assert!(Value::Null.is_compatible_with(DataType::Varchar));
        assert!(Value::Int32(1).is_compatible_with(DataType::Int32));
        assert!(!Value::Int32(1).is_compatible_with(DataType::Varchar));
        assert!(!Value::Boolean(true).is_compatible_with(DataType::Int32));
    }

    #[test]
    fn test_comparison_adapts_to_boolean() {
        let (op, ty) = DataType::Int32.adapt_expression(&Operator::Eq, Some(DataType::Int32));
        assert_eq!(op, Operator::Eq);
        assert_eq!(ty, Some(DataType::Boolean));

        let (op, ty) = DataType::Varchar.adapt_expression(&Operator::Like, Some(DataType::Varchar));
        assert_eq!(op, Operator::Like);
        assert_eq!(ty, Some(DataType::Boolean));
    }

    #[test]
    fn test_string_add_rewrites_to_concat() {
        let (op, ty) = DataType::Varchar.adapt_expression(&Operator::Add, Some(DataType::Varchar));
        assert_eq!(op, Operator::Concat);
        assert_eq!(ty, Some(DataType::Varchar));
    }

    #[test]
    fn test_numeric_promotion() {
        let (op, ty) = DataType::Int32.adapt_expression(&Operator::Add, Some(DataType::Int32));
        assert_eq!(op, Operator::Add);
        assert_eq!(ty, Some(DataType::Int32));

        let (_, ty) = DataType::Int32.adapt_expression(&Operator::Mul, Some(DataType::Float64));
        assert_eq!(ty, Some(DataType::Float64));

        let (_, ty) = DataType::Float64.adapt_expression(&Operator::Div, Some(DataType::Int32));
        assert_eq!(ty, Some(DataType::Float64));
    }

    #[test]
    fn test_date_interval_arithmetic() {
        let (op, ty) = DataType::Date.adapt_expression(&Operator::Add, Some(DataType::Interval));
        assert_eq!(op, Operator::Add);
        assert_eq!(ty, Some(DataType::Date));

        let (_, ty) = DataType::Date.adapt_expression(&Operator::Sub, Some(DataType::Date));
        assert_eq!(ty, Some(DataType::Interval));

        let (_, ty) = DataType::Interval.adapt_expression(&Operator::Add, Some(DataType::Interval));
        assert_eq!(ty, Some(DataType::Interval));
    }

    #[test]
    fn test_adaptation_default_keeps_left_type() {
        let (op, ty) = DataType::Json.adapt_expression(&Operator::GetItem, Some(DataType::Varchar));
        assert_eq!(op, Operator::GetItem);
        assert_eq!(ty, Some(DataType::Json));
    }

    #[test]
    fn test_indexable_types() {
        assert!(DataType::Json.is_indexable());
        assert!(!DataType::Int32.is_indexable());
        assert!(!DataType::Varchar.is_indexable());
    }
}
