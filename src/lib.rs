//! VibeQL - immutable SQL expression trees built by operator resolution.
//!
//! This crate provides:
//! - An immutable expression-tree node model (`clause`)
//! - A closed operator set with negation pairing (`operator`, `catalog`)
//! - Operand coercion behind a swappable engine trait (`coerce`)
//! - The operator-resolution engine itself (`resolver`)
//!
//! The engine is stateless and side-effect-free: resolving an operator
//! application allocates new immutable nodes and nothing else, so any
//! number of callers can build unrelated trees concurrently. Rendering
//! trees into a concrete SQL dialect is a downstream concern.

pub mod catalog;
pub mod clause;
pub mod coerce;
pub mod error;
pub mod operator;
pub mod resolver;
pub mod value;

pub use clause::{
    BinaryClause, ClauseList, CollateClause, ColumnRef, ConjunctionClause, Expr, ExternalClause,
    LiteralValue, Modifiers, UnaryClause,
};
pub use coerce::{CoercionEngine, CoercionRole, ConstKind, DefaultCoercion, Operand};
pub use error::{ClauseError, ClauseResult};
pub use operator::{CustomOperator, Operator};
pub use resolver::{OperateOptions, Resolver};
pub use value::{DataType, Value};
