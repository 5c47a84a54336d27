//! Core value model for validation
//!
//! This module defines the runtime values handed to the walker, the
//! per-type field descriptor table, and the conversions from plain Rust
//! values into [`Value`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Value Enum - Runtime values to be validated
// ============================================================================

/// Runtime value that can be validated
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Integer outside the i64 range, in decimal form
    BigInt(String),
    /// Float value (f64)
    Float(f64),
    /// String value
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Homogeneous sequence of values
    List(Vec<Value>),
    /// Keyed collection. Not a record: it has no descriptor table.
    Map(Vec<(String, Value)>),
    /// Structural record with a descriptor table
    Record(RecordValue),
}

impl Value {
    /// Get the semantic kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) | Self::BigInt(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Record(_) => ValueKind::Record,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "<nil>"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::BigInt(digits) => f.write_str(digits),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
            Self::Bytes(bytes) => {
                f.write_str("[")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", b)?;
                }
                f.write_str("]")
            }
            Self::List(items) => {
                f.write_str("[")?;
                write_spaced(f, items.iter())?;
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
            Self::Record(record) => write!(f, "{}", record),
        }
    }
}

fn write_spaced<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, value) in values.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

// ============================================================================
// Value Kind
// ============================================================================

/// Semantic category of a value, used to select applicable rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Bytes,
    List,
    Map,
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Map => "map",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Field Descriptor Table
// ============================================================================

/// Whether a field is part of the public contract of its record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Classify the visibility qualifier of a declared field.
    ///
    /// Only a bare `pub` is public; `pub(crate)`, `pub(super)` and the
    /// empty qualifier are not part of the external contract.
    pub fn from_qualifier(qualifier: &str) -> Self {
        if qualifier.trim() == "pub" {
            Self::Public
        } else {
            Self::Private
        }
    }

    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

/// Descriptor of one record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, as reported in violations
    pub name: String,
    /// Field visibility
    pub visibility: Visibility,
    /// Raw rule specification (`None` when the field is not annotated)
    pub rules: Option<String>,
}

impl FieldDescriptor {
    /// Create a public, unannotated field descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            rules: None,
        }
    }

    /// Attach a rule specification, e.g. `"min:2;max:6"`
    pub fn rules(mut self, spec: impl Into<String>) -> Self {
        self.rules = Some(spec.into());
        self
    }

    /// Set field visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the field as not public
    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    /// Whether the field carries an annotation at all
    pub fn is_annotated(&self) -> bool {
        self.rules.is_some()
    }
}

/// Descriptor table of a record type, built once per type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    /// Record type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish building and share the table
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}

// ============================================================================
// Record Instances
// ============================================================================

/// A record instance: a shared descriptor table plus field values
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl RecordValue {
    /// Create a record instance. `values` follow the schema's field order.
    ///
    /// The lengths are not checked here; the walker reports fields left
    /// without a value and values left without a field.
    pub fn new(schema: Arc<RecordSchema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Iterate `(descriptor, value)` pairs in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.schema.fields.iter().zip(self.values.iter())
    }

    /// Trailing fields of the schema that have no value
    pub fn missing_fields(&self) -> &[FieldDescriptor] {
        self.schema.fields.get(self.values.len()..).unwrap_or_default()
    }

    /// Number of values beyond the last field of the schema
    pub fn surplus_values(&self) -> usize {
        self.values.len().saturating_sub(self.schema.fields.len())
    }

    /// Whether every field has exactly one value
    pub fn is_complete(&self) -> bool {
        self.schema.fields.len() == self.values.len()
    }

    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields()
            .find(|(field, _)| field.name == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_spaced(f, self.values.iter())?;
        f.write_str("}")
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Conversion of a Rust value into a validatable [`Value`]
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// A Rust type with a field descriptor table.
///
/// Usually implemented through [`record!`](crate::record), which also
/// implements [`ToValue`].
pub trait Record {
    /// The descriptor table of this type
    fn schema() -> Arc<RecordSchema>
    where
        Self: Sized;

    /// Field values in declaration order
    fn field_values(&self) -> Vec<Value>;

    /// Snapshot this instance as a [`RecordValue`]
    fn to_record(&self) -> RecordValue
    where
        Self: Sized,
    {
        RecordValue::new(Self::schema(), self.field_values())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for RecordValue {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

macro_rules! int_to_value {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_to_value!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_int_to_value {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(n) => Value::Int(n),
                        Err(_) => Value::BigInt(self.to_string()),
                    }
                }
            }
        )*
    };
}

wide_int_to_value!(isize, usize, u64, i128, u128);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        // Sorted so the rendered form is stable across runs
        let mut entries: Vec<(String, Value)> = self
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries)
    }
}
