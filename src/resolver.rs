//! Operator resolution: routes operator applications to construction rules.
//!
//! This module provides:
//! - The `Resolver` entry point dispatching through the operator catalog
//! - One construction rule per operator family (comparison, binary,
//!   conjunction, membership, range, pattern matching, indexed access)
//! - The operator-method surface on `Expr` (`eq`, `add`, `between`, ...)
//!
//! Resolution is a pure transformation: no state is held beyond the
//! coercion engine reference, and every call either returns a complete
//! immutable node or an error.

use crate::catalog::{self, Handler};
use crate::clause::{
    BinaryClause, ClauseList, CollateClause, Expr, Modifiers, UnaryClause,
};
use crate::coerce::{CoercionEngine, CoercionRole, ConstKind, DefaultCoercion, Operand};
use crate::error::{ClauseError, ClauseResult};
use crate::operator::{CustomOperator, Operator};
use crate::value::{DataType, Value};

/// Caller-supplied modifiers, merged over the catalog's static parameters.
#[derive(Debug, Clone, Default)]
pub struct OperateOptions {
    /// Swap left/right before construction (reflected operators)
    pub reverse: bool,
    /// Explicit result type; suppresses type adaptation
    pub result_type: Option<DataType>,
    /// Negation partner override
    pub negate: Option<Operator>,
    /// Regex flags operand, coerced and carried as a modifier
    pub flags: Option<Operand>,
}

/// The operator-resolution engine.
///
/// Holds only a reference to the coercion engine; [`Resolver::new`] uses
/// [`DefaultCoercion`]. Construction rules live in private methods, one
/// per handler family.
pub struct Resolver<'a> {
    coercions: &'a dyn CoercionEngine,
}

impl Resolver<'static> {
    pub fn new() -> Self {
        Self {
            coercions: &DefaultCoercion,
        }
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a caller-supplied coercion engine
    pub fn with_engine(coercions: &'a dyn CoercionEngine) -> Self {
        Self { coercions }
    }

    /// Apply `op` to `anchor` with the given operands.
    pub fn operate(
        &self,
        anchor: &Expr,
        op: Operator,
        operands: Vec<Operand>,
    ) -> ClauseResult<Expr> {
        self.operate_with(anchor, op, operands, OperateOptions::default())
    }

    /// Apply `op` to `anchor` with operands and caller modifiers.
    ///
    /// Looks the operator up in the catalog, merges `opts` over the
    /// entry's static parameters, and invokes the bound construction
    /// rule.
    pub fn operate_with(
        &self,
        anchor: &Expr,
        op: Operator,
        operands: Vec<Operand>,
        opts: OperateOptions,
    ) -> ClauseResult<Expr> {
        let entry = catalog::lookup(&op);
        let negate = opts.negate.clone().or(entry.negate);
        let modifiers = self.flag_modifiers(anchor, &op, opts.flags)?;

        match entry.handler {
            Handler::BooleanCompare => {
                let obj = take_one(&op, operands)?;
                self.boolean_compare(
                    anchor,
                    op,
                    obj,
                    negate,
                    opts.reverse,
                    opts.result_type,
                    modifiers,
                )
            }
            Handler::BinaryOperate => {
                let obj = take_one(&op, operands)?;
                self.binary_operate(anchor, op, obj, opts.reverse, opts.result_type, modifiers)
            }
            Handler::CustomOperate => {
                let obj = take_one(&op, operands)?;
                match op {
                    Operator::Custom(custom) => self.custom_op_operate(
                        anchor,
                        custom,
                        obj,
                        opts.reverse,
                        opts.result_type,
                        modifiers,
                    ),
                    // the catalog routes only Custom here
                    op => Err(ClauseError::UnsupportedOperator {
                        op,
                        anchor_type: anchor.ty(),
                    }),
                }
            }
            Handler::Conjunction => {
                let obj = take_one(&op, operands)?;
                self.conjunction_operate(anchor, op, obj)
            }
            Handler::Scalar(build) => {
                take_none(&op, &operands)?;
                Ok(build(anchor.clone()))
            }
            Handler::InMembership => {
                let obj = take_one(&op, operands)?;
                self.in_impl(
                    anchor,
                    op,
                    obj,
                    negate,
                    opts.reverse,
                    opts.result_type,
                    modifiers,
                )
            }
            Handler::Between => {
                let (lower, upper) = take_two(&op, operands)?;
                self.between_impl(anchor, op, lower, upper, modifiers)
            }
            Handler::MatchPredicate => {
                let obj = take_one(&op, operands)?;
                self.match_impl(anchor, op, obj, opts.reverse, opts.result_type, modifiers)
            }
            Handler::RegexpMatch => {
                let obj = take_one(&op, operands)?;
                self.regexp_match_impl(anchor, op, obj, opts.reverse, opts.result_type, modifiers)
            }
            Handler::RegexpReplace => {
                let (pattern, replacement) = take_two(&op, operands)?;
                self.regexp_replace_impl(
                    anchor,
                    pattern,
                    replacement,
                    opts.reverse,
                    opts.result_type,
                    modifiers,
                )
            }
            Handler::GetItem => {
                let obj = take_one(&op, operands)?;
                self.getitem_impl(anchor, op, obj, opts.reverse, opts.result_type, modifiers)
            }
            Handler::Collate => {
                let obj = take_one(&op, operands)?;
                self.collate_impl(anchor, obj)
            }
            Handler::Inverse => {
                take_none(&op, &operands)?;
                self.inv_impl(anchor)
            }
            Handler::Negative => {
                take_none(&op, &operands)?;
                Ok(UnaryClause::negative(anchor.clone()))
            }
            Handler::Unsupported => Err(ClauseError::UnsupportedOperator {
                op,
                anchor_type: anchor.ty(),
            }),
        }
    }

    /// Equality/ordering/distinctness comparison.
    ///
    /// NULL and boolean literals are special-cased in a fixed order:
    /// boolean literals under `=`/`!=` compare directly, the
    /// distinct-from pair compares directly (it is defined for NULL), a
    /// quantified anchor coerces the constant instead of rewriting, and
    /// any remaining NULL use rewrites `=`/`!=` to IS/IS NOT or fails.
    #[allow(clippy::too_many_arguments)]
    fn boolean_compare(
        &self,
        anchor: &Expr,
        op: Operator,
        obj: Operand,
        negate: Option<Operator>,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let result_type = result_type.or(Some(DataType::Boolean));

        let rhs = if let Some(konst) = obj.as_const() {
            let is_bool = matches!(konst, ConstKind::Bool(_));

            if matches!(op, Operator::Eq | Operator::Ne) && is_bool {
                // x = TRUE / x != FALSE compare against the literal itself
                self.coercions
                    .coerce(CoercionRole::ConstExpr, obj, anchor, &op)?
            } else if matches!(op, Operator::IsDistinctFrom | Operator::IsNotDistinctFrom) {
                // the distinct-from pair is defined for NULL, no rewrite
                self.coercions
                    .coerce(CoercionRole::ConstExpr, obj, anchor, &op)?
            } else if anchor.is_quantified() {
                // quantified comparisons must not collapse to IS/IS NOT
                self.coercions
                    .coerce(CoercionRole::ConstExpr, obj, anchor, &op)?
            } else if matches!(op, Operator::Eq | Operator::Is) {
                let rhs = self
                    .coercions
                    .coerce(CoercionRole::ConstExpr, obj, anchor, &op)?;
                return Ok(build_binary(
                    anchor.clone(),
                    rhs,
                    Operator::Is,
                    result_type,
                    Some(Operator::IsNot),
                    Modifiers::default(),
                    reverse,
                ));
            } else if matches!(op, Operator::Ne | Operator::IsNot) {
                let rhs = self
                    .coercions
                    .coerce(CoercionRole::ConstExpr, obj, anchor, &op)?;
                return Ok(build_binary(
                    anchor.clone(),
                    rhs,
                    Operator::IsNot,
                    result_type,
                    Some(Operator::Is),
                    Modifiers::default(),
                    reverse,
                ));
            } else {
                return Err(ClauseError::InvalidConstOperator { op });
            }
        } else {
            self.coercions
                .coerce(CoercionRole::BinaryElement, obj, anchor, &op)?
        };

        Ok(build_binary(
            anchor.clone(),
            rhs,
            op,
            result_type,
            negate,
            modifiers,
            reverse,
        ))
    }

    /// Arithmetic, concatenation and custom binary operations.
    ///
    /// When the caller supplies no result type, the left operand's type
    /// adapts the expression: it may rewrite the operator and infers the
    /// result type from the operand pairing.
    fn binary_operate(
        &self,
        anchor: &Expr,
        op: Operator,
        obj: Operand,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let coerced = self
            .coercions
            .coerce(CoercionRole::BinaryElement, obj, anchor, &op)?;

        let (left, right) = if reverse {
            (coerced, anchor.clone())
        } else {
            (anchor.clone(), coerced)
        };

        let (op, result_type) = match result_type {
            Some(ty) => (op, Some(ty)),
            None => match left.ty() {
                Some(left_ty) => left_ty.adapt_expression(&op, right.ty()),
                None => (op, None),
            },
        };

        Ok(Expr::Binary(BinaryClause {
            left: Box::new(left),
            right: Box::new(right),
            op,
            result_type,
            negate: None,
            modifiers,
        }))
    }

    fn custom_op_operate(
        &self,
        anchor: &Expr,
        custom: CustomOperator,
        obj: Operand,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let result_type = result_type
            .or(custom.return_type)
            .or_else(|| custom.is_comparison.then_some(DataType::Boolean));

        self.binary_operate(
            anchor,
            Operator::Custom(custom),
            obj,
            reverse,
            result_type,
            modifiers,
        )
    }

    /// AND/OR. Anything else reaching here is a routing defect.
    fn conjunction_operate(
        &self,
        anchor: &Expr,
        op: Operator,
        obj: Operand,
    ) -> ClauseResult<Expr> {
        if !matches!(op, Operator::And | Operator::Or) {
            return Err(ClauseError::UnsupportedOperator {
                op,
                anchor_type: anchor.ty(),
            });
        }

        let other = self
            .coercions
            .coerce(CoercionRole::BinaryElement, obj, anchor, &op)?;
        Ok(Expr::conjoin(op, anchor.clone(), other))
    }

    /// IN/NOT IN membership, modeled as a comparison whose right side is a
    /// set-like construct. A coerced operand carrying its own operator
    /// pair overrides the catalog pairing.
    #[allow(clippy::too_many_arguments)]
    fn in_impl(
        &self,
        anchor: &Expr,
        mut op: Operator,
        obj: Operand,
        mut negate: Option<Operator>,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let coerced = self
            .coercions
            .coerce(CoercionRole::InElement, obj, anchor, &op)?;

        if let Some((in_op, in_negate)) = coerced.in_operator_override() {
            op = in_op;
            negate = Some(in_negate);
        }

        self.boolean_compare(
            anchor,
            op,
            Operand::Clause(coerced),
            negate,
            reverse,
            result_type,
            modifiers,
        )
    }

    /// BETWEEN/NOT BETWEEN. The bounds form a two-element AND list that
    /// supplies no grouping of its own; the BETWEEN syntax provides it.
    fn between_impl(
        &self,
        anchor: &Expr,
        op: Operator,
        lower: Operand,
        upper: Operand,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let lower = self
            .coercions
            .coerce(CoercionRole::BinaryElement, lower, anchor, &Operator::And)?;
        let upper = self
            .coercions
            .coerce(CoercionRole::BinaryElement, upper, anchor, &Operator::And)?;

        let negate = if op == Operator::Between {
            Operator::NotBetween
        } else {
            Operator::Between
        };

        Ok(Expr::Binary(BinaryClause {
            left: Box::new(anchor.clone()),
            right: Box::new(Expr::List(ClauseList::ungrouped(
                Operator::And,
                vec![lower, upper],
            ))),
            op,
            result_type: None,
            negate: Some(negate),
            modifiers,
        }))
    }

    /// MATCH/NOT MATCH. Always constructs with the MATCH operator; the
    /// invoked token only decides which side of the pair negates.
    fn match_impl(
        &self,
        anchor: &Expr,
        op: Operator,
        obj: Operand,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let pattern =
            self.coercions
                .coerce(CoercionRole::BinaryElement, obj, anchor, &Operator::Match)?;

        let negate = if op == Operator::Match {
            Operator::NotMatch
        } else {
            Operator::Match
        };

        self.boolean_compare(
            anchor,
            Operator::Match,
            Operand::Clause(pattern),
            Some(negate),
            reverse,
            result_type.or(Some(DataType::Match)),
            modifiers,
        )
    }

    /// Regex match; flags arrive already coerced in `modifiers`.
    fn regexp_match_impl(
        &self,
        anchor: &Expr,
        op: Operator,
        obj: Operand,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let negate = if op == Operator::RegexpMatch {
            Operator::NotRegexpMatch
        } else {
            Operator::RegexpMatch
        };

        self.boolean_compare(
            anchor,
            op,
            obj,
            Some(negate),
            reverse,
            result_type,
            modifiers,
        )
    }

    /// Regex substitution. Not a comparison: the pattern is the primary
    /// operand, the replacement is coerced independently and carried as a
    /// modifier.
    fn regexp_replace_impl(
        &self,
        anchor: &Expr,
        pattern: Operand,
        replacement: Operand,
        reverse: bool,
        result_type: Option<DataType>,
        mut modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        let replacement = self.coercions.coerce(
            CoercionRole::BinaryElement,
            replacement,
            anchor,
            &Operator::RegexpReplace,
        )?;
        modifiers.replacement = Some(Box::new(replacement));

        self.binary_operate(
            anchor,
            Operator::RegexpReplace,
            pattern,
            reverse,
            result_type,
            modifiers,
        )
    }

    /// Indexed access, legal only on indexable anchor types.
    fn getitem_impl(
        &self,
        anchor: &Expr,
        op: Operator,
        obj: Operand,
        reverse: bool,
        result_type: Option<DataType>,
        modifiers: Modifiers,
    ) -> ClauseResult<Expr> {
        match anchor.ty() {
            Some(ty) if ty.is_indexable() => {
                self.binary_operate(anchor, op, obj, reverse, result_type, modifiers)
            }
            anchor_type => Err(ClauseError::UnsupportedOperator { op, anchor_type }),
        }
    }

    /// Logical inversion. A precomputed inverse on the anchor is returned
    /// as-is; otherwise the anchor negates structurally.
    fn inv_impl(&self, anchor: &Expr) -> ClauseResult<Expr> {
        if let Some(negation) = anchor.precomputed_negation() {
            return Ok(negation.clone());
        }
        Ok(anchor.negate())
    }

    /// COLLATE routes entirely to the collation node's own constructor.
    fn collate_impl(&self, anchor: &Expr, obj: Operand) -> ClauseResult<Expr> {
        match obj {
            Operand::Value(Value::String(name)) => Ok(CollateClause::build(anchor.clone(), name)),
            _ => Err(ClauseError::InvalidOperand {
                op: Operator::Collate,
                reason: "COLLATE requires a collation name".to_string(),
            }),
        }
    }

    /// Coerce a caller-supplied flags operand into the modifier bag.
    fn flag_modifiers(
        &self,
        anchor: &Expr,
        op: &Operator,
        flags: Option<Operand>,
    ) -> ClauseResult<Modifiers> {
        let flags = match flags {
            Some(raw) => Some(Box::new(self.coercions.coerce(
                CoercionRole::BinaryElement,
                raw,
                anchor,
                op,
            )?)),
            None => None,
        };
        Ok(Modifiers {
            flags,
            replacement: None,
        })
    }
}

fn build_binary(
    anchor: Expr,
    rhs: Expr,
    op: Operator,
    result_type: Option<DataType>,
    negate: Option<Operator>,
    modifiers: Modifiers,
    reverse: bool,
) -> Expr {
    let (left, right) = if reverse { (rhs, anchor) } else { (anchor, rhs) };
    Expr::Binary(BinaryClause {
        left: Box::new(left),
        right: Box::new(right),
        op,
        result_type,
        negate,
        modifiers,
    })
}

fn take_none(op: &Operator, operands: &[Operand]) -> ClauseResult<()> {
    if operands.is_empty() {
        Ok(())
    } else {
        Err(ClauseError::OperandCount {
            op: op.clone(),
            expected: 0,
            actual: operands.len(),
        })
    }
}

fn take_one(op: &Operator, operands: Vec<Operand>) -> ClauseResult<Operand> {
    let [obj]: [Operand; 1] = operands.try_into().map_err(|rest: Vec<Operand>| {
        ClauseError::OperandCount {
            op: op.clone(),
            expected: 1,
            actual: rest.len(),
        }
    })?;
    Ok(obj)
}

fn take_two(op: &Operator, operands: Vec<Operand>) -> ClauseResult<(Operand, Operand)> {
    let [first, second]: [Operand; 2] =
        operands
            .try_into()
            .map_err(|rest: Vec<Operand>| ClauseError::OperandCount {
                op: op.clone(),
                expected: 2,
                actual: rest.len(),
            })?;
    Ok((first, second))
}

/// Operator methods over expression nodes.
///
/// Every method routes through the resolver with the default coercion
/// engine; callers needing a custom engine or modifiers use
/// [`Resolver::operate_with`] directly.
#[allow(clippy::should_implement_trait)]
impl Expr {
    pub fn eq(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Eq, vec![other.into()])
    }

    pub fn ne(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Ne, vec![other.into()])
    }

    pub fn lt(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Lt, vec![other.into()])
    }

    pub fn le(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Le, vec![other.into()])
    }

    pub fn gt(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Gt, vec![other.into()])
    }

    pub fn ge(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Ge, vec![other.into()])
    }

    pub fn is_(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Is, vec![other.into()])
    }

    pub fn is_not(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::IsNot, vec![other.into()])
    }

    pub fn is_distinct_from(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::IsDistinctFrom, vec![other.into()])
    }

    pub fn is_not_distinct_from(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::IsNotDistinctFrom, vec![other.into()])
    }

    pub fn add(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Add, vec![other.into()])
    }

    pub fn sub(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Sub, vec![other.into()])
    }

    pub fn mul(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Mul, vec![other.into()])
    }

    pub fn div(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Div, vec![other.into()])
    }

    pub fn modulo(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Mod, vec![other.into()])
    }

    pub fn concat(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Concat, vec![other.into()])
    }

    pub fn like(&self, pattern: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Like, vec![pattern.into()])
    }

    pub fn not_like(&self, pattern: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::NotLike, vec![pattern.into()])
    }

    pub fn ilike(&self, pattern: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::ILike, vec![pattern.into()])
    }

    pub fn not_ilike(&self, pattern: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::NotILike, vec![pattern.into()])
    }

    pub fn contains(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Contains, vec![other.into()])
    }

    pub fn startswith(&self, prefix: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::StartsWith, vec![prefix.into()])
    }

    pub fn endswith(&self, suffix: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::EndsWith, vec![suffix.into()])
    }

    pub fn and_(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::And, vec![other.into()])
    }

    pub fn or_(&self, other: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Or, vec![other.into()])
    }

    /// Logical inversion
    pub fn not_(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Not, vec![])
    }

    pub fn in_(&self, candidates: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::In, vec![candidates.into()])
    }

    pub fn not_in(&self, candidates: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::NotIn, vec![candidates.into()])
    }

    pub fn between(
        &self,
        lower: impl Into<Operand>,
        upper: impl Into<Operand>,
    ) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Between, vec![lower.into(), upper.into()])
    }

    pub fn not_between(
        &self,
        lower: impl Into<Operand>,
        upper: impl Into<Operand>,
    ) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::NotBetween, vec![lower.into(), upper.into()])
    }

    pub fn match_(&self, pattern: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Match, vec![pattern.into()])
    }

    pub fn regexp_match(&self, pattern: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::RegexpMatch, vec![pattern.into()])
    }

    pub fn regexp_match_with_flags(
        &self,
        pattern: impl Into<Operand>,
        flags: impl Into<Operand>,
    ) -> ClauseResult<Expr> {
        Resolver::new().operate_with(
            self,
            Operator::RegexpMatch,
            vec![pattern.into()],
            OperateOptions {
                flags: Some(flags.into()),
                ..Default::default()
            },
        )
    }

    pub fn regexp_replace(
        &self,
        pattern: impl Into<Operand>,
        replacement: impl Into<Operand>,
    ) -> ClauseResult<Expr> {
        Resolver::new().operate(
            self,
            Operator::RegexpReplace,
            vec![pattern.into(), replacement.into()],
        )
    }

    pub fn regexp_replace_with_flags(
        &self,
        pattern: impl Into<Operand>,
        replacement: impl Into<Operand>,
        flags: impl Into<Operand>,
    ) -> ClauseResult<Expr> {
        Resolver::new().operate_with(
            self,
            Operator::RegexpReplace,
            vec![pattern.into(), replacement.into()],
            OperateOptions {
                flags: Some(flags.into()),
                ..Default::default()
            },
        )
    }

    pub fn getitem(&self, index: impl Into<Operand>) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::GetItem, vec![index.into()])
    }

    pub fn collate(&self, collation: impl Into<String>) -> ClauseResult<Expr> {
        Resolver::new().operate(
            self,
            Operator::Collate,
            vec![Operand::Value(Value::String(collation.into()))],
        )
    }

    pub fn desc(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Desc, vec![])
    }

    pub fn asc(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Asc, vec![])
    }

    pub fn nulls_first(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::NullsFirst, vec![])
    }

    pub fn nulls_last(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::NullsLast, vec![])
    }

    pub fn distinct(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Distinct, vec![])
    }

    pub fn any_(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Any, vec![])
    }

    pub fn all_(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::All, vec![])
    }

    /// Arithmetic negation
    pub fn neg(&self) -> ClauseResult<Expr> {
        Resolver::new().operate(self, Operator::Neg, vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ExternalClause;

    fn int_col(name: &str) -> Expr {
        Expr::column(name, DataType::Int32)
    }

    fn str_col(name: &str) -> Expr {
        Expr::column(name, DataType::Varchar)
    }

    fn as_binary(expr: &Expr) -> &BinaryClause {
        match expr {
            Expr::Binary(b) => b,
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_eq_null_rewrites_to_is() {
        let clause = int_col("x").eq(Value::Null).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Is);
        assert_eq!(b.negate, Some(Operator::IsNot));
        assert_eq!(*b.right, Expr::Null);
        assert_eq!(b.result_type, Some(DataType::Boolean));
    }

    #[test]
    fn test_ne_null_rewrites_to_is_not() {
        let clause = int_col("x").ne(Value::Null).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::IsNot);
        assert_eq!(b.negate, Some(Operator::Is));
        assert_eq!(*b.right, Expr::Null);
    }

    #[test]
    fn test_is_methods_against_null() {
        let clause = int_col("x").is_(Value::Null).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Is);
        assert_eq!(b.negate, Some(Operator::IsNot));

        let clause = int_col("x").is_not(Value::Null).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::IsNot);
        assert_eq!(b.negate, Some(Operator::Is));
    }

    #[test]
    fn test_eq_boolean_literal_compares_directly() {
        let col = Expr::column("active", DataType::Boolean);

        let clause = col.eq(true).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Eq);
        assert_eq!(b.negate, Some(Operator::Ne));
        assert_eq!(*b.right, Expr::True);

        let clause = col.ne(false).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Ne);
        assert_eq!(*b.right, Expr::False);
    }

    #[test]
    fn test_distinct_from_null_compares_directly() {
        let clause = int_col("x").is_distinct_from(Value::Null).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::IsDistinctFrom);
        assert_eq!(b.negate, Some(Operator::IsNotDistinctFrom));
        assert_eq!(*b.right, Expr::Null);

        let clause = int_col("x").is_not_distinct_from(Value::Null).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::IsNotDistinctFrom);
        assert_eq!(b.negate, Some(Operator::IsDistinctFrom));
    }

    #[test]
    fn test_ordering_against_null_is_an_argument_error() {
        let err = int_col("x").lt(Value::Null).unwrap_err();
        assert_eq!(
            err,
            ClauseError::InvalidConstOperator { op: Operator::Lt }
        );

        // an argument error, not a coercion error
        assert!(!matches!(err, ClauseError::Coercion { .. }));

        let err = int_col("x").gt(true).unwrap_err();
        assert_eq!(err, ClauseError::InvalidConstOperator { op: Operator::Gt });
    }

    #[test]
    fn test_eq_coerces_plain_values() {
        let clause = int_col("x").eq(5).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Eq);
        assert_eq!(b.negate, Some(Operator::Ne));
        assert_eq!(*b.right, Expr::literal(Value::Int32(5)));
        assert_eq!(b.result_type, Some(DataType::Boolean));
    }

    #[test]
    fn test_reverse_swaps_operands() {
        // 5 > x arrives as x.operate(Gt, 5, reverse) and must keep the
        // user's operand order
        let clause = Resolver::new()
            .operate_with(
                &int_col("x"),
                Operator::Gt,
                vec![Operand::from(5)],
                OperateOptions {
                    reverse: true,
                    ..Default::default()
                },
            )
            .unwrap();
        let b = as_binary(&clause);
        assert_eq!(*b.left, Expr::literal(Value::Int32(5)));
        assert_eq!(*b.right, int_col("x"));
        assert_eq!(b.op, Operator::Gt);
    }

    #[test]
    fn test_quantified_anchor_keeps_null_comparison() {
        let quantified = int_col("scores").any_().unwrap();
        let clause = quantified.eq(Value::Null).unwrap();
        let b = as_binary(&clause);
        // not rewritten to IS
        assert_eq!(b.op, Operator::Eq);
        assert_eq!(b.negate, Some(Operator::Ne));
        assert_eq!(*b.right, Expr::Null);
    }

    #[test]
    fn test_binary_operate_adapts_types() {
        let clause = int_col("x").add(2).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Add);
        assert_eq!(b.result_type, Some(DataType::Int32));
        assert_eq!(b.negate, None);

        let clause = int_col("x").mul(2.5).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.result_type, Some(DataType::Float64));
    }

    #[test]
    fn test_string_add_rewrites_to_concat() {
        let clause = str_col("name").add("!").unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Concat);
        assert_eq!(b.result_type, Some(DataType::Varchar));
    }

    #[test]
    fn test_explicit_result_type_suppresses_adaptation() {
        let clause = Resolver::new()
            .operate_with(
                &str_col("name"),
                Operator::Add,
                vec![Operand::from("!")],
                OperateOptions {
                    result_type: Some(DataType::Varchar),
                    ..Default::default()
                },
            )
            .unwrap();
        let b = as_binary(&clause);
        // no rewrite to || when the caller fixed the type
        assert_eq!(b.op, Operator::Add);
        assert_eq!(b.result_type, Some(DataType::Varchar));
    }

    #[test]
    fn test_custom_op_result_types() {
        let arrow = Operator::Custom(CustomOperator::new("->").returns(DataType::Json));
        let clause = Resolver::new()
            .operate(&Expr::column("doc", DataType::Json), arrow, vec![
                Operand::from("key"),
            ])
            .unwrap();
        assert_eq!(as_binary(&clause).result_type, Some(DataType::Json));

        let containment = Operator::Custom(CustomOperator::new("@>").comparison());
        let clause = Resolver::new()
            .operate(&Expr::column("doc", DataType::Json), containment, vec![
                Operand::from("{}"),
            ])
            .unwrap();
        assert_eq!(as_binary(&clause).result_type, Some(DataType::Boolean));
    }

    #[test]
    fn test_conjunction_chains_flatten() {
        let a = int_col("a").eq(1).unwrap();
        let b = int_col("b").eq(2).unwrap();
        let c = int_col("c").eq(3).unwrap();
        let d = int_col("d").eq(4).unwrap();

        let chained = a.and_(b).unwrap().and_(c).unwrap().and_(d).unwrap();
        match chained {
            Expr::Conjunction(conj) => {
                assert_eq!(conj.op, Operator::And);
                assert_eq!(conj.clauses.len(), 4);
            }
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_conjunction_rejects_other_operators() {
        let err = Resolver::new()
            .conjunction_operate(&int_col("a"), Operator::Add, Operand::from(1))
            .unwrap_err();
        assert!(matches!(
            err,
            ClauseError::UnsupportedOperator {
                op: Operator::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_in_list() {
        let clause = int_col("x")
            .in_(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
            .unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::In);
        assert_eq!(b.negate, Some(Operator::NotIn));
        match b.right.as_ref() {
            Expr::List(list) => {
                assert_eq!(list.joiner, Operator::Comma);
                assert_eq!(list.clauses.len(), 3);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_not_in_pairs_back() {
        let clause = int_col("x").not_in(vec![Value::Int32(1)]).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::NotIn);
        assert_eq!(b.negate, Some(Operator::In));
    }

    #[test]
    fn test_in_operator_pair_override() {
        let subquery = Expr::External(
            ExternalClause::new("negated_subquery")
                .with_in_ops(Operator::NotIn, Operator::In),
        );
        let clause = int_col("x").in_(subquery).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::NotIn);
        assert_eq!(b.negate, Some(Operator::In));
    }

    #[test]
    fn test_between_shape() {
        let clause = int_col("x").between(1, 10).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Between);
        assert_eq!(b.negate, Some(Operator::NotBetween));
        assert_eq!(b.result_type, None);

        match b.right.as_ref() {
            Expr::List(list) => {
                assert_eq!(list.joiner, Operator::And);
                assert_eq!(list.clauses.len(), 2);
                assert!(!list.group);
                assert!(!list.group_contents);
                assert_eq!(list.clauses[0], Expr::literal(Value::Int32(1)));
                assert_eq!(list.clauses[1], Expr::literal(Value::Int32(10)));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_not_between_negates_reciprocally() {
        let clause = int_col("x").not_between(1, 10).unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::NotBetween);
        assert_eq!(b.negate, Some(Operator::Between));
    }

    #[test]
    fn test_match_uses_dedicated_type_and_pairing() {
        let clause = str_col("body").match_("needle").unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Match);
        assert_eq!(b.negate, Some(Operator::NotMatch));
        assert_eq!(b.result_type, Some(DataType::Match));

        // invoking the negative token still constructs MATCH
        let clause = Resolver::new()
            .operate(&str_col("body"), Operator::NotMatch, vec![
                Operand::from("needle"),
            ])
            .unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::Match);
        assert_eq!(b.negate, Some(Operator::Match));
    }

    #[test]
    fn test_regexp_match() {
        let clause = str_col("body").regexp_match("^a.*z$").unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::RegexpMatch);
        assert_eq!(b.negate, Some(Operator::NotRegexpMatch));
        assert_eq!(b.result_type, Some(DataType::Boolean));
        assert!(b.modifiers.is_empty());
    }

    #[test]
    fn test_regexp_match_with_flags_modifier() {
        let clause = str_col("body")
            .regexp_match_with_flags("^a.*z$", "i")
            .unwrap();
        let b = as_binary(&clause);
        assert_eq!(
            b.modifiers.flags.as_deref(),
            Some(&Expr::literal(Value::from("i")))
        );
        assert!(b.modifiers.replacement.is_none());
    }

    #[test]
    fn test_regexp_replace_is_not_a_comparison() {
        let clause = str_col("body")
            .regexp_replace_with_flags("a+", "b", "g")
            .unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::RegexpReplace);
        assert_eq!(b.negate, None);
        // left type carries through: still a string
        assert_eq!(b.result_type, Some(DataType::Varchar));
        assert_eq!(*b.left, str_col("body"));
        assert_eq!(*b.right, Expr::literal(Value::from("a+")));
        assert_eq!(
            b.modifiers.replacement.as_deref(),
            Some(&Expr::literal(Value::from("b")))
        );
        assert_eq!(
            b.modifiers.flags.as_deref(),
            Some(&Expr::literal(Value::from("g")))
        );
    }

    #[test]
    fn test_getitem_requires_indexable_anchor() {
        let doc = Expr::column("doc", DataType::Json);
        let clause = doc.getitem("key").unwrap();
        let b = as_binary(&clause);
        assert_eq!(b.op, Operator::GetItem);
        assert_eq!(b.result_type, Some(DataType::Json));

        let err = int_col("x").getitem(0).unwrap_err();
        assert_eq!(
            err,
            ClauseError::UnsupportedOperator {
                op: Operator::GetItem,
                anchor_type: Some(DataType::Int32),
            }
        );
    }

    #[test]
    fn test_unsupported_operator_names_the_token() {
        let err = Resolver::new()
            .operate(&int_col("x"), Operator::Lshift, vec![Operand::from(1)])
            .unwrap_err();
        match err {
            ClauseError::UnsupportedOperator { op, .. } => assert_eq!(op, Operator::Lshift),
            other => panic!("expected unsupported-operator error, got {:?}", other),
        }
        let err = Resolver::new()
            .operate(&int_col("x"), Operator::Rshift, vec![Operand::from(1)])
            .unwrap_err();
        assert!(err.to_string().contains(">>"));
    }

    #[test]
    fn test_logical_inversion() {
        let clause = int_col("x").eq(5).unwrap();
        let inverted = clause.not_().unwrap();
        let b = as_binary(&inverted);
        assert_eq!(b.op, Operator::Ne);

        // double inversion restores the original
        assert_eq!(inverted.not_().unwrap(), clause);
    }

    #[test]
    fn test_inversion_uses_precomputed_negation() {
        let inverse = int_col("a").eq(1).unwrap();
        let external = Expr::External(
            ExternalClause::new("related_exists").with_negation(inverse.clone()),
        );
        assert_eq!(external.not_().unwrap(), inverse);
    }

    #[test]
    fn test_arithmetic_negation() {
        let clause = int_col("x").neg().unwrap();
        match clause {
            Expr::Unary(u) => {
                assert_eq!(u.op, Operator::Neg);
                assert_eq!(u.result_type, Some(DataType::Int32));
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_collate() {
        let clause = str_col("name").collate("de_DE").unwrap();
        match clause {
            Expr::Collate(c) => assert_eq!(c.collation, "de_DE"),
            other => panic!("expected collate, got {:?}", other),
        }

        let err = Resolver::new()
            .operate(&str_col("name"), Operator::Collate, vec![Operand::from(5)])
            .unwrap_err();
        assert!(matches!(err, ClauseError::InvalidOperand { .. }));
    }

    #[test]
    fn test_operand_arity_errors() {
        let err = Resolver::new()
            .operate(&int_col("x"), Operator::Between, vec![Operand::from(1)])
            .unwrap_err();
        assert_eq!(
            err,
            ClauseError::OperandCount {
                op: Operator::Between,
                expected: 2,
                actual: 1,
            }
        );

        let err = Resolver::new()
            .operate(&int_col("x"), Operator::Eq, vec![])
            .unwrap_err();
        assert!(matches!(err, ClauseError::OperandCount { expected: 1, .. }));

        let err = Resolver::new()
            .operate(&int_col("x"), Operator::Desc, vec![Operand::from(1)])
            .unwrap_err();
        assert!(matches!(err, ClauseError::OperandCount { expected: 0, .. }));
    }

    #[test]
    fn test_scalar_wrap_operators() {
        let col = int_col("score");
        match col.desc().unwrap() {
            Expr::Unary(u) => assert_eq!(u.op, Operator::Desc),
            other => panic!("expected unary, got {:?}", other),
        }
        match col.nulls_last().unwrap() {
            Expr::Unary(u) => assert_eq!(u.op, Operator::NullsLast),
            other => panic!("expected unary, got {:?}", other),
        }
        assert!(col.any_().unwrap().is_quantified());
        assert!(col.all_().unwrap().is_quantified());
    }
}
