//! Basic usage of `HetVec`, with its growth events logged.
//!
//! Run with `cargo run --example basic` to see every metadata and buffer growth
//! as it happens.

use hetvec::{AccessError, HetVec};

#[derive(Clone, Debug)]
struct BigType {
    bytes: [u8; 5000],
}

fn describe(values: &HetVec<(i32, f64, String, BigType)>) {
    for (index, element) in values.iter().enumerate() {
        if let Some(v) = element.downcast_ref::<i32, _>() {
            println!("  [{index}] i32 = {v}");
        } else if let Some(v) = element.downcast_ref::<f64, _>() {
            println!("  [{index}] f64 = {v}");
        } else if let Some(v) = element.downcast_ref::<String, _>() {
            println!("  [{index}] String = {v:?}");
        } else if let Some(v) = element.downcast_ref::<BigType, _>() {
            println!("  [{index}] BigType starting with {}", v.bytes[0]);
        }
    }
}

fn main() -> Result<(), AccessError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut values: HetVec<(i32, f64, String, BigType)> = HetVec::new();
    values.push(42);
    values.push(3.14);
    values.push(String::from("hello"));
    values.push(BigType { bytes: [7; 5000] });

    println!("{} elements in {} bytes:", values.len(), values.byte_len());
    describe(&values);

    println!();
    println!("Reading element 0 as f64:");
    match values.get::<f64, _>(0) {
        Ok(v) => println!("  unexpectedly got {v}"),
        Err(error) => println!("  {error}"),
    }

    let copy = values.clone();
    println!();
    println!("The clone holds {:?}", copy);

    let greeting = values.get::<String, _>(2)?;
    println!("The greeting is still {greeting:?}");
    Ok(())
}
