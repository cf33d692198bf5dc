//! Extract form editing
//!
//! The form is a working copy of a document's extract. Edits stay in the
//! form until committed.
//!
//! Commit is conditional: a field is written back only when the form value
//! is non-empty and differs from the stored value. Leaving a field blank
//! therefore never erases previously committed text.

use doc_model::{Extract, ExtractField};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractForm {
    values: Extract,
    changed: bool,
}

impl ExtractForm {
    /// Copies every field, empty strings included.
    pub fn load(extract: &Extract) -> Self {
        Self { values: extract.clone(), changed: false }
    }

    pub fn values(&self) -> &Extract {
        &self.values
    }

    pub fn get(&self, field: ExtractField) -> &str {
        self.values.field(field)
    }

    /// Whether any field was edited since the last load, revert or commit.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn set(&mut self, field: ExtractField, value: impl Into<String>) {
        let value = value.into();
        let slot = self.values.field_mut(field);
        if *slot != value {
            *slot = value;
            self.changed = true;
        }
    }

    /// Appends dropped strings to `field`.
    ///
    /// The strings are concatenated without separators. Returns `false` and
    /// leaves the field untouched when the concatenation is empty.
    pub fn drop_strings<S: AsRef<str>>(&mut self, field: ExtractField, strings: &[S]) -> bool {
        let joined: String = strings.iter().map(AsRef::as_ref).collect();
        if joined.is_empty() {
            return false;
        }

        self.values.field_mut(field).push_str(&joined);
        self.changed = true;
        true
    }

    /// Discards edits and reloads the stored values.
    pub fn revert(&mut self, extract: &Extract) {
        *self = Self::load(extract);
    }

    /// Writes non-empty, changed fields into `extract`. Returns the fields written.
    pub fn commit(&mut self, extract: &mut Extract) -> Vec<ExtractField> {
        let mut written = Vec::new();

        for field in ExtractField::ALL {
            let value = self.values.field(field);
            if !value.is_empty() && value != extract.field(field) {
                *extract.field_mut(field) = value.to_owned();
                written.push(field);
            }
        }

        if !written.is_empty() {
            tracing::debug!(fields = ?written, "extract committed");
        }

        self.changed = false;
        written
    }
}
