//! Error handling example
//!
//! Demonstrates how violations are reported:
//! - Error kinds
//! - Error accumulation
//! - Nested error paths
//! - Walker configuration
//!
//! Run with: cargo run --example error_handling -p fieldrules

use fieldrules::{
    record, validate, ErrorKind, FieldCause, SequencePaths, ValidateError, ValidationConfig,
    Validator,
};

record! {
    #[derive(Debug, Clone, Default)]
    pub struct Credentials {
        #[validate("min:8")]
        pub password: String,
        #[validate("len:6")]
        pub otp: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct Account {
        #[validate("min:3;max:16")]
        pub login: String,
        #[validate("min:oops")]
        pub quota: i64,
        #[validate("len:2")]
        pub level: i64,
        #[validate("")]
        pub credentials: Credentials,
        #[validate("in:read,write")]
        pub scopes: Vec<String>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct Session {
        #[validate("max:4")]
        pub device: String,
        pub account: Account,
    }
}

fn main() {
    println!("=== Error Handling Examples ===\n");

    demonstrate_error_kinds();
    demonstrate_error_accumulation();
    demonstrate_error_paths();
    demonstrate_configuration();
}

fn broken_account() -> Account {
    Account {
        login: "al".to_string(),
        quota: 10,
        level: 3,
        credentials: Credentials {
            password: "short".to_string(),
            otp: "12345".to_string(),
        },
        scopes: vec!["read".to_string(), "admin".to_string()],
    }
}

fn demonstrate_error_kinds() {
    println!("1. Error Kinds");
    println!("--------------");

    match validate(&broken_account()) {
        Ok(()) => println!("  Unexpected success"),
        Err(err) => {
            for kind in err.kinds() {
                println!("    {}", kind);
            }
        }
    }

    match validate("not a record") {
        Err(err) => println!("  Plain string: [{}] {}", ErrorKind::NotARecord, err),
        Ok(()) => println!("  Unexpected success"),
    }
    println!();
}

fn demonstrate_error_accumulation() {
    println!("2. Error Accumulation");
    println!("---------------------");

    match validate(&broken_account()) {
        Ok(()) => println!("  Unexpected success"),
        Err(ValidateError::Invalid(errors)) => {
            println!("  Total errors: {}", errors.len());
            for (i, err) in errors.iter().enumerate() {
                println!("    {}. [{}] {}", i + 1, err.kind(), err);
            }
        }
        Err(err) => println!("  Unexpected error: {}", err),
    }
    println!();
}

fn demonstrate_error_paths() {
    println!("3. Error Paths");
    println!("--------------");

    let Err(ValidateError::Invalid(errors)) = validate(&broken_account()) else {
        println!("  Unexpected result");
        return;
    };

    for err in errors.iter().filter(|err| err.depth() > 0) {
        println!("    Path: {}", err.path().join("."));
        if let fieldrules::ValidationError::Field {
            cause: FieldCause::Nested(inner),
            ..
        } = err
        {
            println!("    Inner: {}", inner);
        }
    }
    println!();
}

fn demonstrate_configuration() {
    println!("4. Configuration");
    println!("----------------");

    let session = Session {
        device: "tablet".to_string(),
        account: broken_account(),
    };

    let default_errors = validate(&session).map_err(|err| err.kinds().len());
    println!("  Default walker: {:?} violations", default_errors.err());

    let validator = Validator::with_config(
        ValidationConfig::new()
            .walk_unannotated_records()
            .sequence_paths(SequencePaths::Indexed),
    );
    match validator.validate(&session) {
        Ok(()) => println!("  Unexpected success"),
        Err(err) => {
            println!("  Walking unannotated records:");
            println!("{}", err);
        }
    }
    println!();
}
