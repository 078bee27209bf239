//! Immutable expression-tree nodes.
//!
//! This module provides:
//! - The `Expr` node enum and its per-variant payloads
//! - Structural negation (binary pair swap, De Morgan over conjunctions)
//! - Conjunction flattening
//! - The closed modifier bag carried by binary nodes
//!
//! Nodes are never mutated after construction; every transformation builds
//! a new node referencing existing ones.

use crate::operator::Operator;
use crate::value::{DataType, Value};

/// Column reference anchoring an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub name: String,
    /// Declared static type, if known
    pub ty: Option<DataType>,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>, ty: DataType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }
}

/// Literal value in an expression, produced by coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralValue {
    pub value: Value,
    pub ty: Option<DataType>,
}

impl LiteralValue {
    pub fn new(value: Value) -> Self {
        let ty = value.data_type();
        Self { value, ty }
    }
}

/// Modifier bag carried by binary nodes.
///
/// Only regex operations populate these; downstream rendering interprets
/// them, the engine passes them through opaquely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifiers {
    pub flags: Option<Box<Expr>>,
    pub replacement: Option<Box<Expr>>,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        self.flags.is_none() && self.replacement.is_none()
    }
}

/// Binary operation node.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryClause {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub op: Operator,
    pub result_type: Option<DataType>,
    /// Operator this node swaps to under logical negation
    pub negate: Option<Operator>,
    pub modifiers: Modifiers,
}

/// Unary operation node.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryClause {
    pub operand: Box<Expr>,
    pub op: Operator,
    pub result_type: Option<DataType>,
}

impl UnaryClause {
    fn wrap(operand: Expr, op: Operator, result_type: Option<DataType>) -> Expr {
        Expr::Unary(UnaryClause {
            operand: Box::new(operand),
            op,
            result_type,
        })
    }

    /// Descending order marker
    pub fn desc(operand: Expr) -> Expr {
        Self::wrap(operand, Operator::Desc, None)
    }

    /// Ascending order marker
    pub fn asc(operand: Expr) -> Expr {
        Self::wrap(operand, Operator::Asc, None)
    }

    /// NULLS FIRST ordering marker
    pub fn nulls_first(operand: Expr) -> Expr {
        Self::wrap(operand, Operator::NullsFirst, None)
    }

    /// NULLS LAST ordering marker
    pub fn nulls_last(operand: Expr) -> Expr {
        Self::wrap(operand, Operator::NullsLast, None)
    }

    /// DISTINCT wrap; keeps the operand's type
    pub fn distinct(operand: Expr) -> Expr {
        let ty = operand.ty();
        Self::wrap(operand, Operator::Distinct, ty)
    }

    /// ANY quantifier over a collection-valued operand
    pub fn any_(operand: Expr) -> Expr {
        Self::wrap(operand, Operator::Any, Some(DataType::Boolean))
    }

    /// ALL quantifier over a collection-valued operand
    pub fn all_(operand: Expr) -> Expr {
        Self::wrap(operand, Operator::All, Some(DataType::Boolean))
    }

    /// Arithmetic negation; keeps the operand's type
    pub fn negative(operand: Expr) -> Expr {
        let ty = operand.ty();
        Self::wrap(operand, Operator::Neg, ty)
    }
}

/// AND/OR node holding an ordered sequence of operands.
#[derive(Debug, Clone, PartialEq)]
pub struct ConjunctionClause {
    /// `And` or `Or`
    pub op: Operator,
    pub clauses: Vec<Expr>,
}

/// Ordered sequence of nodes with a joining operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseList {
    pub joiner: Operator,
    pub clauses: Vec<Expr>,
    /// Whether the list renders its own surrounding grouping
    pub group: bool,
    /// Whether individual members are grouped when rendered
    pub group_contents: bool,
}

impl ClauseList {
    pub fn new(joiner: Operator, clauses: Vec<Expr>) -> Self {
        Self {
            joiner,
            clauses,
            group: true,
            group_contents: true,
        }
    }

    /// A list that supplies no grouping of its own, for constructs whose
    /// surrounding syntax provides it (BETWEEN bounds).
    pub fn ungrouped(joiner: Operator, clauses: Vec<Expr>) -> Self {
        Self {
            joiner,
            clauses,
            group: false,
            group_contents: false,
        }
    }
}

/// COLLATE node.
#[derive(Debug, Clone, PartialEq)]
pub struct CollateClause {
    pub operand: Box<Expr>,
    pub collation: String,
}

impl CollateClause {
    /// Build a collation expression over `operand`. Construction lives
    /// here; the resolver only routes to it.
    pub fn build(operand: Expr, collation: impl Into<String>) -> Expr {
        Expr::Collate(CollateClause {
            operand: Box::new(operand),
            collation: collation.into(),
        })
    }
}

/// Predicate built by a higher layer, opaque to the resolver.
///
/// Carries the two capabilities the resolver probes for: a precomputed
/// inverse used by logical negation, and an operator-pair override applied
/// by set-membership construction (a pre-negated subquery supplies its own
/// `(op, negate_op)` pair).
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalClause {
    pub label: String,
    pub negation: Option<Box<Expr>>,
    pub in_ops: Option<(Operator, Operator)>,
}

impl ExternalClause {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            negation: None,
            in_ops: None,
        }
    }

    pub fn with_negation(mut self, negation: Expr) -> Self {
        self.negation = Some(Box::new(negation));
        self
    }

    pub fn with_in_ops(mut self, op: Operator, negate_op: Operator) -> Self {
        self.in_ops = Some((op, negate_op));
        self
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(ColumnRef),

    /// Literal constant value
    Literal(LiteralValue),

    /// NULL sentinel
    Null,

    /// TRUE sentinel
    True,

    /// FALSE sentinel
    False,

    /// Binary operation
    Binary(BinaryClause),

    /// Unary operation or wrap
    Unary(UnaryClause),

    /// AND/OR over two or more operands
    Conjunction(ConjunctionClause),

    /// Joined sequence of nodes
    List(ClauseList),

    /// COLLATE
    Collate(CollateClause),

    /// Opaque higher-layer predicate
    External(ExternalClause),
}

impl Expr {
    /// Create a typed column reference expression
    pub fn column(name: impl Into<String>, ty: DataType) -> Self {
        Expr::Column(ColumnRef::new(name, ty))
    }

    /// Create a column reference with no declared type
    pub fn column_untyped(name: impl Into<String>) -> Self {
        Expr::Column(ColumnRef::untyped(name))
    }

    /// Create a literal expression typed by its value
    pub fn literal(value: Value) -> Self {
        Expr::Literal(LiteralValue::new(value))
    }

    /// The node's static result type, if determined.
    pub fn ty(&self) -> Option<DataType> {
        match self {
            Expr::Column(col) => col.ty,
            Expr::Literal(lit) => lit.ty,
            Expr::Null => None,
            Expr::True | Expr::False => Some(DataType::Boolean),
            Expr::Binary(b) => b.result_type,
            Expr::Unary(u) => u.result_type,
            Expr::Conjunction(_) => Some(DataType::Boolean),
            Expr::List(_) => None,
            Expr::Collate(c) => c.operand.ty(),
            Expr::External(_) => Some(DataType::Boolean),
        }
    }

    /// Whether this node is an ANY/ALL quantifier wrap.
    pub fn is_quantified(&self) -> bool {
        matches!(
            self,
            Expr::Unary(UnaryClause {
                op: Operator::Any | Operator::All,
                ..
            })
        )
    }

    /// Precomputed inverse attached by a higher layer, if any.
    pub fn precomputed_negation(&self) -> Option<&Expr> {
        match self {
            Expr::External(e) => e.negation.as_deref(),
            _ => None,
        }
    }

    /// Operator-pair override applied during set-membership construction.
    pub fn in_operator_override(&self) -> Option<(Operator, Operator)> {
        match self {
            Expr::External(e) => e.in_ops.clone(),
            _ => None,
        }
    }

    /// Join two clauses under `op` (`And` or `Or`), flattening adjacent
    /// conjunctions of the same kind so a chain of N applications holds
    /// N + 1 operands instead of nesting N deep.
    pub fn conjoin(op: Operator, left: Expr, right: Expr) -> Expr {
        let mut clauses = Vec::new();
        for side in [left, right] {
            match side {
                Expr::Conjunction(c) if c.op == op => clauses.extend(c.clauses),
                other => clauses.push(other),
            }
        }
        Expr::Conjunction(ConjunctionClause { op, clauses })
    }

    /// Structural negation.
    ///
    /// A binary node with a negation partner swaps operator and partner;
    /// conjunctions negate by De Morgan; a NOT unwraps; TRUE and FALSE
    /// exchange; anything else is wrapped in NOT.
    pub fn negate(&self) -> Expr {
        if let Some(negation) = self.precomputed_negation() {
            return negation.clone();
        }

        match self {
            Expr::Binary(b) => match &b.negate {
                Some(negate_op) => {
                    let mut negated = b.clone();
                    negated.op = negate_op.clone();
                    negated.negate = Some(b.op.clone());
                    Expr::Binary(negated)
                }
                None => Self::not_wrap(self.clone()),
            },
            Expr::Conjunction(c) => {
                let op = if c.op == Operator::And {
                    Operator::Or
                } else {
                    Operator::And
                };
                Expr::Conjunction(ConjunctionClause {
                    op,
                    clauses: c.clauses.iter().map(Expr::negate).collect(),
                })
            }
            Expr::Unary(u) if u.op == Operator::Not => (*u.operand).clone(),
            Expr::True => Expr::False,
            Expr::False => Expr::True,
            other => Self::not_wrap(other.clone()),
        }
    }

    fn not_wrap(operand: Expr) -> Expr {
        Expr::Unary(UnaryClause {
            operand: Box::new(operand),
            op: Operator::Not,
            result_type: Some(DataType::Boolean),
        })
    }
}
