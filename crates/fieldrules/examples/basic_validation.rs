//! Basic validation example
//!
//! Demonstrates annotated records, nested records and sequences.
//!
//! Run with: cargo run --example basic_validation -p fieldrules

use fieldrules::{record, validate, ValidateError};

record! {
    #[derive(Debug, Clone)]
    pub struct Address {
        #[validate("len:5")]
        pub zip: String,
        #[validate("in:US,CA,MX")]
        pub country: String,
    }
}

record! {
    #[derive(Debug, Clone)]
    pub struct User {
        #[validate("min:2;max:20")]
        pub name: String,
        #[validate("min:0;max:150")]
        pub age: i64,
        #[validate("in:1,2,3")]
        pub tier: i32,
        #[validate("max:8")]
        pub tags: Vec<String>,
        #[validate("")]
        pub address: Address,
        pub nickname: String,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Basic Validation Examples ===\n");

    validate_valid_user();
    validate_invalid_user();
    validate_non_record();
}

fn sample_user() -> User {
    User {
        name: "Alice".to_string(),
        age: 30,
        tier: 2,
        tags: vec!["admin".to_string(), "ops".to_string()],
        address: Address {
            zip: "94107".to_string(),
            country: "US".to_string(),
        },
        nickname: String::new(),
    }
}

fn validate_valid_user() {
    println!("1. Valid User");
    println!("-------------");

    let user = sample_user();
    match validate(&user) {
        Ok(()) => println!("  ✓ {:?} is valid", user.name),
        Err(err) => println!("  ✗ Unexpected error:\n{}", err),
    }
    println!();
}

fn validate_invalid_user() {
    println!("2. Invalid User");
    println!("---------------");

    let mut user = sample_user();
    user.name = "A".to_string();
    user.age = 200;
    user.tier = 7;
    user.tags.push("superuser".to_string());
    user.address.zip = "941".to_string();

    match validate(&user) {
        Ok(()) => println!("  ✗ Should have failed"),
        Err(ValidateError::Invalid(errors)) => {
            println!("  ✓ Caught {} violations:", errors.len());
            for err in &errors {
                println!("    - {}", err);
            }
        }
        Err(err) => println!("  ✗ Unexpected error: {}", err),
    }
    println!();
}

fn validate_non_record() {
    println!("3. Non-record Input");
    println!("-------------------");

    match validate(&42i64) {
        Err(err @ ValidateError::NotARecord(_)) => println!("  ✓ Rejected: {}", err),
        other => println!("  ✗ Unexpected result: {:?}", other),
    }
    println!();
}
