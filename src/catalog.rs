//! Operator catalog: maps each operator to its construction strategy.
//!
//! The catalog is the routing table of the engine. It is total over the
//! closed operator set (the compiler enforces exhaustiveness), carries the
//! static negation partner for comparison operators, and binds the
//! construction function for unary wrap operators. It holds no state and
//! is shared freely across threads.

use crate::clause::{Expr, UnaryClause};
use crate::operator::Operator;

/// Construction function bound to a unary wrap operator.
pub type ScalarFn = fn(Expr) -> Expr;

/// Construction strategy for an operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handler {
    /// Equality/ordering/distinctness comparison with literal special cases
    BooleanCompare,
    /// Arithmetic, concatenation and other plain binary operations
    BinaryOperate,
    /// Runtime-declared operator
    CustomOperate,
    /// AND/OR
    Conjunction,
    /// Apply the bound construction function to the anchor
    Scalar(ScalarFn),
    /// IN/NOT IN set membership
    InMembership,
    /// BETWEEN/NOT BETWEEN range
    Between,
    /// MATCH/NOT MATCH
    MatchPredicate,
    /// Regular-expression match with optional flags
    RegexpMatch,
    /// Regular-expression substitution
    RegexpReplace,
    /// Indexed access, legal only on indexable anchor types
    GetItem,
    /// COLLATE
    Collate,
    /// Logical inversion
    Inverse,
    /// Arithmetic negation
    Negative,
    /// No construction semantics
    Unsupported,
}

/// Catalog entry: the handler plus its fixed parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OpEntry {
    pub handler: Handler,
    /// Static negation partner, merged under any caller-supplied override
    pub negate: Option<Operator>,
}

impl OpEntry {
    fn new(handler: Handler) -> Self {
        Self {
            handler,
            negate: None,
        }
    }

    fn with_negate(handler: Handler, negate: Operator) -> Self {
        Self {
            handler,
            negate: Some(negate),
        }
    }
}

/// Look up the construction strategy for an operator.
///
/// Total over the operator set; operators with no construction semantics
/// route to [`Handler::Unsupported`] rather than being absent.
pub fn lookup(op: &Operator) -> OpEntry {
    use Operator::*;

    match op {
        And | Or => OpEntry::new(Handler::Conjunction),
        Not => OpEntry::new(Handler::Inverse),
        Neg => OpEntry::new(Handler::Negative),

        Add | Sub | Mul | Div | Mod | Concat => OpEntry::new(Handler::BinaryOperate),
        Custom(_) => OpEntry::new(Handler::CustomOperate),

        Lt => OpEntry::with_negate(Handler::BooleanCompare, Ge),
        Le => OpEntry::with_negate(Handler::BooleanCompare, Gt),
        Gt => OpEntry::with_negate(Handler::BooleanCompare, Le),
        Ge => OpEntry::with_negate(Handler::BooleanCompare, Lt),
        Eq => OpEntry::with_negate(Handler::BooleanCompare, Ne),
        Ne => OpEntry::with_negate(Handler::BooleanCompare, Eq),
        Is => OpEntry::with_negate(Handler::BooleanCompare, IsNot),
        IsNot => OpEntry::with_negate(Handler::BooleanCompare, Is),
        IsDistinctFrom => OpEntry::with_negate(Handler::BooleanCompare, IsNotDistinctFrom),
        IsNotDistinctFrom => OpEntry::with_negate(Handler::BooleanCompare, IsDistinctFrom),

        Like => OpEntry::with_negate(Handler::BooleanCompare, NotLike),
        NotLike => OpEntry::with_negate(Handler::BooleanCompare, Like),
        ILike => OpEntry::with_negate(Handler::BooleanCompare, NotILike),
        NotILike => OpEntry::with_negate(Handler::BooleanCompare, ILike),
        Contains => OpEntry::with_negate(Handler::BooleanCompare, NotContains),
        NotContains => OpEntry::with_negate(Handler::BooleanCompare, Contains),
        StartsWith => OpEntry::with_negate(Handler::BooleanCompare, NotStartsWith),
        NotStartsWith => OpEntry::with_negate(Handler::BooleanCompare, StartsWith),
        EndsWith => OpEntry::with_negate(Handler::BooleanCompare, NotEndsWith),
        NotEndsWith => OpEntry::with_negate(Handler::BooleanCompare, EndsWith),

        In => OpEntry::with_negate(Handler::InMembership, NotIn),
        NotIn => OpEntry::with_negate(Handler::InMembership, In),

        Between | NotBetween => OpEntry::new(Handler::Between),
        Match | NotMatch => OpEntry::new(Handler::MatchPredicate),
        RegexpMatch | NotRegexpMatch => OpEntry::new(Handler::RegexpMatch),
        RegexpReplace => OpEntry::new(Handler::RegexpReplace),

        Desc => OpEntry::new(Handler::Scalar(UnaryClause::desc)),
        Asc => OpEntry::new(Handler::Scalar(UnaryClause::asc)),
        NullsFirst => OpEntry::new(Handler::Scalar(UnaryClause::nulls_first)),
        NullsLast => OpEntry::new(Handler::Scalar(UnaryClause::nulls_last)),
        Distinct => OpEntry::new(Handler::Scalar(UnaryClause::distinct)),
        Any => OpEntry::new(Handler::Scalar(UnaryClause::any_)),
        All => OpEntry::new(Handler::Scalar(UnaryClause::all_)),

        GetItem => OpEntry::new(Handler::GetItem),
        Collate => OpEntry::new(Handler::Collate),

        Comma | Lshift | Rshift | ElementOf => OpEntry::new(Handler::Unsupported),
    }
}
