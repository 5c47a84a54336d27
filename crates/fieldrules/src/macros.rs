//! Declarative record definitions
//!
//! [`record!`](crate::record) declares a plain struct and generates its
//! descriptor table, so annotated domain types validate without any
//! hand-written field plumbing.

/// Declare a struct whose fields carry rule specifications.
///
/// Annotate a field with `#[validate("...")]`. Other field attributes, doc
/// comments included, are kept on the generated struct. The descriptor table
/// is built on first use and shared by every instance. Field visibility comes
/// from the declaration: only `pub` fields may be annotated.
///
/// Every field type must implement [`ToValue`](crate::ToValue); nested
/// records declared with this macro do.
///
/// # Example
///
/// ```
/// use fieldrules::{record, validate};
///
/// record! {
///     #[derive(Debug, Clone)]
///     pub struct Address {
///         #[validate("len:5")]
///         pub zip: String,
///     }
/// }
///
/// record! {
///     #[derive(Debug, Clone)]
///     pub struct User {
///         #[validate("min:18;max:130")]
///         pub age: i64,
///         #[validate("in:admin,staff")]
///         pub role: String,
///         #[validate("")]
///         pub address: Address,
///         pub nickname: String,
///     }
/// }
///
/// let user = User {
///     age: 16,
///     role: "admin".to_string(),
///     address: Address { zip: "123".to_string() },
///     nickname: String::new(),
/// };
///
/// let err = validate(&user).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "field: age, value: 16, error: shouldn't be less than 18\n\
///      field: address, value: {123}, error: field: zip, value: 123, error: should have fixed length 5"
/// );
/// ```
#[macro_export]
macro_rules! record {
    // Struct body: drop `validate` attributes, keep every other one.
    (@struct [$($head:tt)*] [$($done:tt)*]) => {
        $($head)* { $($done)* }
    };
    (@struct [$($head:tt)*] [$($done:tt)*]
        { [] [$($kept:tt)*] $($field:tt)* } $($rest:tt)*
    ) => {
        $crate::record!(@struct [$($head)*] [$($done)* $($kept)* $($field)*,] $($rest)*);
    };
    (@struct [$($head:tt)*] [$($done:tt)*]
        { [#[validate($rules:literal)] $($attrs:tt)*] [$($kept:tt)*] $($field:tt)* } $($rest:tt)*
    ) => {
        $crate::record!(@struct [$($head)*] [$($done)*]
            { [$($attrs)*] [$($kept)*] $($field)* } $($rest)*);
    };
    (@struct [$($head:tt)*] [$($done:tt)*]
        { [#[$($attr:tt)*] $($attrs:tt)*] [$($kept:tt)*] $($field:tt)* } $($rest:tt)*
    ) => {
        $crate::record!(@struct [$($head)*] [$($done)*]
            { [$($attrs)*] [$($kept)* #[$($attr)*]] $($field)* } $($rest)*);
    };

    // Field descriptor: pick up the `validate` attribute, ignore the others.
    (@descriptor ($($descriptor:tt)*)) => {
        $($descriptor)*
    };
    (@descriptor ($($descriptor:tt)*) #[validate($rules:literal)] $($rest:tt)*) => {
        $crate::record!(@descriptor ($($descriptor)*.rules($rules)) $($rest)*)
    };
    (@descriptor ($($descriptor:tt)*) #[$($attr:tt)*] $($rest:tt)*) => {
        $crate::record!(@descriptor ($($descriptor)*) $($rest)*)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($field_attr:tt)*])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::record!(@struct
            [$(#[$meta])* $vis struct $name]
            []
            $( { [$(#[$($field_attr)*])*] [] $field_vis $field : $ty } )*
        );

        impl $crate::Record for $name {
            fn schema() -> ::std::sync::Arc<$crate::RecordSchema> {
                static SCHEMA: $crate::__private::Lazy<::std::sync::Arc<$crate::RecordSchema>> =
                    $crate::__private::Lazy::new(|| {
                        $crate::RecordSchema::new(stringify!($name))
                            $(
                                .field($crate::record!(@descriptor
                                    (
                                        $crate::FieldDescriptor::new(stringify!($field))
                                            .visibility($crate::Visibility::from_qualifier(
                                                stringify!($field_vis),
                                            ))
                                    )
                                    $(#[$($field_attr)*])*
                                ))
                            )*
                            .build()
                    });
                ::std::sync::Arc::clone(&SCHEMA)
            }

            fn field_values(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![ $( $crate::ToValue::to_value(&self.$field), )* ]
            }
        }

        impl $crate::ToValue for $name {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record($crate::Record::to_record(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{validate, ErrorKind, Record, ToValue, ValidateError, Value, Visibility};

    record! {
        #[derive(Debug, Clone, Default)]
        pub struct Token {
            #[validate("len:3")]
            pub code: String,
            #[validate("in:1,2")]
            pub(crate) scope: i32,
            secret: String,
        }
    }

    record! {
        /// A person on file
        #[derive(Debug)]
        pub struct Person {
            /// The person's age
            #[validate("min:1")]
            pub age: i64,
            #[validate("len:2")]
            /// Two-letter country code
            #[allow(dead_code)]
            pub country: String,
            /// Free-form notes
            pub notes: String,
        }
    }

    #[test]
    fn test_schema_is_built_once() {
        let first = Token::schema();
        let second = Token::schema();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(first.name, "Token");
    }

    #[test]
    fn test_schema_fields() {
        let schema = Token::schema();
        let fields: Vec<(&str, Visibility, Option<&str>)> = schema
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.visibility, f.rules.as_deref()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("code", Visibility::Public, Some("len:3")),
                ("scope", Visibility::Private, Some("in:1,2")),
                ("secret", Visibility::Private, None),
            ]
        );
    }

    #[test]
    fn test_generated_to_value() {
        let token = Token {
            code: "abc".to_string(),
            scope: 1,
            secret: "s".to_string(),
        };
        let Value::Record(record) = token.to_value() else {
            panic!("expected a record");
        };
        assert_eq!(record.to_string(), "{abc 1 s}");
    }

    #[test]
    fn test_crate_visible_field_cannot_be_annotated() {
        let err = validate(&Token::default()).unwrap_err();
        let ValidateError::Invalid(errors) = err else {
            panic!("expected violations");
        };
        assert_eq!(
            errors.kinds(),
            vec![ErrorKind::RuleFailed, ErrorKind::NotValidatable]
        );
    }

    #[test]
    fn test_documented_fields_keep_their_rules() {
        let schema = Person::schema();
        let rules: Vec<(&str, Option<&str>)> = schema
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.rules.as_deref()))
            .collect();
        assert_eq!(
            rules,
            vec![("age", Some("min:1")), ("country", Some("len:2")), ("notes", None)]
        );

        let person = Person {
            age: 0,
            country: "USA".to_string(),
            notes: String::new(),
        };
        let err = validate(&person).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field: age, value: 0, error: shouldn't be less than 1\n\
             field: country, value: USA, error: should have fixed length 2"
        );
    }
}
