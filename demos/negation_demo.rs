//! Example demonstrating negation symmetry across the operator set

use vibeql::{DataType, Expr, ExternalClause, Value};

fn main() -> anyhow::Result<()> {
    println!("Negation Demo");
    println!("=============");

    let age = Expr::column("age", DataType::Int32);
    let name = Expr::column("name", DataType::Varchar);

    // Example 1: Binary pair swaps
    println!("\n1. Binary Pair Swaps");
    println!("--------------------");

    let adult = age.ge(18)?;
    println!("age >= 18: {:?}", adult);
    println!("negated:   {:?}", adult.not_()?);

    let pattern = name.like("A%")?;
    println!("name LIKE 'A%' negated: {:?}", pattern.not_()?);

    // Example 2: De Morgan over conjunctions
    println!("\n2. De Morgan");
    println!("------------");

    let both = age.ge(18)?.and_(name.like("A%")?)?;
    let neither = both.not_()?;
    println!("NOT (a AND b): {:?}", neither);

    // Double negation restores the original
    assert_eq!(neither.not_()?, both);
    println!("double negation round-trips");

    // Example 3: IS / IS NOT
    println!("\n3. IS / IS NOT");
    println!("--------------");

    let missing = age.eq(Value::Null)?;
    println!("age IS NULL: {:?}", missing);
    println!("negated:     {:?}", missing.not_()?);

    // Example 4: Precomputed negations
    println!("\n4. Precomputed Negations");
    println!("------------------------");

    let has_orders = Expr::External(
        ExternalClause::new("has_orders").with_negation(age.lt(0)?),
    );
    println!("external predicate negates to: {:?}", has_orders.not_()?);

    Ok(())
}
