//! Example demonstrating clause construction through operator resolution

use vibeql::{CustomOperator, DataType, Expr, Operand, Operator, Resolver, Value};

fn main() -> anyhow::Result<()> {
    println!("Clause Builder Demo");
    println!("===================");

    let age = Expr::column("age", DataType::Int32);
    let name = Expr::column("name", DataType::Varchar);
    let active = Expr::column("active", DataType::Boolean);

    // Example 1: Plain comparisons
    println!("\n1. Plain Comparisons");
    println!("--------------------");

    // age > 18
    let adult = age.gt(18)?;
    println!("age > 18: {:?}", adult);

    // name = 'Alice'
    let alice = name.eq("Alice")?;
    println!("name = 'Alice': {:?}", alice);

    // Example 2: NULL handling
    println!("\n2. NULL Handling");
    println!("----------------");

    // age = NULL rewrites to age IS NULL
    let missing = age.eq(Value::Null)?;
    println!("age = NULL becomes: {:?}", missing);

    // active = TRUE stays a direct comparison
    let enabled = active.eq(true)?;
    println!("active = TRUE stays: {:?}", enabled);

    // age < NULL is rejected outright
    let err = age.lt(Value::Null).unwrap_err();
    println!("age < NULL fails: {}", err);

    // Example 3: Ranges and membership
    println!("\n3. Ranges and Membership");
    println!("------------------------");

    let working_age = age.between(18, 65)?;
    println!("age BETWEEN 18 AND 65: {:?}", working_age);

    let chosen = age.in_(vec![Value::Int32(18), Value::Int32(21)])?;
    println!("age IN (18, 21): {:?}", chosen);

    // Example 4: Type adaptation
    println!("\n4. Type Adaptation");
    println!("------------------");

    // string + string becomes ||
    let greeting = name.add("!")?;
    println!("name + '!' becomes: {:?}", greeting);

    // int * float promotes to float
    let scaled = age.mul(1.5)?;
    println!("age * 1.5 types as: {:?}", scaled.ty());

    // Example 5: Custom operators
    println!("\n5. Custom Operators");
    println!("-------------------");

    let payload = Expr::column("payload", DataType::Json);
    let arrow = Operator::Custom(CustomOperator::new("->").returns(DataType::Json));
    let city = Resolver::new().operate(&payload, arrow, vec![Operand::from("city")])?;
    println!("payload -> 'city': {:?}", city);
    println!("payload -> 'city' types as: {:?}", city.ty());

    Ok(())
}
