//! Configuration options for validation behavior

// ============================================================================
// Unannotated Record Handling
// ============================================================================

/// What to do with a record-typed field that carries no annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnannotatedRecords {
    /// Skip the field and everything inside it (default)
    #[default]
    Skip,
    /// Walk the nested record anyway; only rule application is skipped
    Walk,
}

// ============================================================================
// Sequence Element Naming
// ============================================================================

/// How violations on sequence elements name their field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencePaths {
    /// Every element reports the bare field name (default)
    #[default]
    FieldName,
    /// Elements report `Field[i]`
    Indexed,
}

// ============================================================================
// Validation Config
// ============================================================================

/// Configuration options for validation behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Handling of record fields without an annotation
    pub unannotated_records: UnannotatedRecords,

    /// Naming of sequence element violations
    pub sequence_paths: SequencePaths,
}

impl ValidationConfig {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set unannotated record handling
    pub fn unannotated_records(mut self, mode: UnannotatedRecords) -> Self {
        self.unannotated_records = mode;
        self
    }

    /// Walk nested records even when their field is not annotated
    pub fn walk_unannotated_records(mut self) -> Self {
        self.unannotated_records = UnannotatedRecords::Walk;
        self
    }

    /// Set sequence element naming
    pub fn sequence_paths(mut self, mode: SequencePaths) -> Self {
        self.sequence_paths = mode;
        self
    }

    /// Name sequence element violations `Field[i]`
    pub fn index_sequence_elements(mut self) -> Self {
        self.sequence_paths = SequencePaths::Indexed;
        self
    }

    /// Field name to report for element `index` of sequence field `field`
    pub fn element_name(&self, field: &str, index: usize) -> String {
        match self.sequence_paths {
            SequencePaths::FieldName => field.to_string(),
            SequencePaths::Indexed => format!("{}[{}]", field, index),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
