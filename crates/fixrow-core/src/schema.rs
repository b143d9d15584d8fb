//! Column schema: ordered field names with their signature coordinates.
//!
//! Every component receives the schema as a parameter; there are no
//! global feature constants.

use crate::error::{FixrowError, Result};
use crate::fragment::{Axis, Coord};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Rent-stabilization building list layout (DHCR 2022 PDFs)
///
/// `(name, signature)`; LOT terminates a row, BOROUGH_ID is filled from the
/// document catalog rather than from page content.
const RENT_STABILIZATION_FIELDS: [(&str, f64); 15] = [
    ("ZIP", 25.0),
    ("BLDGNO1", 75.0),
    ("STREET1", 185.0),
    ("STSUFX1", 312.0),
    ("BLDGNO2", 372.0),
    ("STREET2", 451.0),
    ("STSUFX2", 567.0),
    ("CITY", 619.0),
    ("COUNTY", 702.0),
    ("STATUS1", 769.0),
    ("STATUS2", 879.0),
    ("STATUS3", 980.0),
    ("BLOCK", 1079.0),
    ("LOT", 1143.0),
    ("BOROUGH_ID", 2024.0),
];
const RENT_STABILIZATION_TERMINATOR: &str = "LOT";
const RENT_STABILIZATION_TAG: &str = "BOROUGH_ID";

/// One schema entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name, also the header label reprinted on each page
    pub name: String,
    /// Reference coordinate used as the column key
    pub signature: f64,
    /// This field's signature closes a row
    #[serde(default)]
    pub terminator: bool,
    /// This slot is filled from the per-document tag, not from page content
    #[serde(default)]
    pub tag: bool,
}

impl FieldSpec {
    /// Plain content field
    #[inline]
    #[must_use = "returns a new FieldSpec"]
    pub fn new(name: impl Into<String>, signature: f64) -> Self {
        Self {
            name: name.into(),
            signature,
            terminator: false,
            tag: false,
        }
    }

    /// Mark the field as the row terminator
    #[inline]
    #[must_use = "returns the field marked as terminator"]
    pub fn terminator(mut self) -> Self {
        self.terminator = true;
        self
    }

    /// Mark the field as the tag slot
    #[inline]
    #[must_use = "returns the field marked as tag slot"]
    pub fn tag(mut self) -> Self {
        self.tag = true;
        self
    }

    /// Signature as a hashable coordinate
    #[inline]
    #[must_use = "returns the signature coordinate"]
    pub fn signature_coord(&self) -> Coord {
        OrderedFloat(self.signature)
    }
}

/// Validated, signature-ordered column schema
///
/// Invariants (checked by [`ColumnSchema::new`]):
/// - at least one field
/// - names unique and non-empty
/// - signatures finite and unique
/// - exactly one terminator, which is not the tag slot
/// - at most one tag slot
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    fields: Vec<FieldSpec>,
    signature_axis: Axis,
    terminator: usize,
    tag: Option<usize>,
    by_signature: HashMap<Coord, usize>,
}

impl ColumnSchema {
    /// Build a schema from field specs, matched against `signature_axis`.
    ///
    /// Fields are reordered by ascending signature.
    ///
    /// # Errors
    /// Returns [`FixrowError::InvalidSchema`] when an invariant is violated.
    pub fn new(fields: Vec<FieldSpec>, signature_axis: Axis) -> Result<Self> {
        if fields.is_empty() {
            return Err(FixrowError::InvalidSchema("schema has no fields".to_string()));
        }

        let mut names = HashSet::new();
        let mut signatures = HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(FixrowError::InvalidSchema(
                    "field name must not be empty".to_string(),
                ));
            }
            if !field.signature.is_finite() {
                return Err(FixrowError::InvalidSchema(format!(
                    "field {} has a non-finite signature",
                    field.name
                )));
            }
            if !names.insert(field.name.as_str()) {
                return Err(FixrowError::InvalidSchema(format!(
                    "duplicate field name {}",
                    field.name
                )));
            }
            if !signatures.insert(field.signature_coord()) {
                return Err(FixrowError::InvalidSchema(format!(
                    "duplicate signature {} (field {})",
                    field.signature, field.name
                )));
            }
            if field.terminator && field.tag {
                return Err(FixrowError::InvalidSchema(format!(
                    "field {} cannot be both terminator and tag slot",
                    field.name
                )));
            }
        }

        match fields.iter().filter(|f| f.terminator).count() {
            1 => {}
            0 => {
                return Err(FixrowError::InvalidSchema(
                    "schema needs a terminator field".to_string(),
                ))
            }
            n => {
                return Err(FixrowError::InvalidSchema(format!(
                    "schema has {n} terminator fields, expected 1"
                )))
            }
        }
        if fields.iter().filter(|f| f.tag).count() > 1 {
            return Err(FixrowError::InvalidSchema(
                "schema has more than one tag slot".to_string(),
            ));
        }

        Ok(Self::index(fields, signature_axis))
    }

    /// The rent-stabilization building list layout, signatures on the x axis
    #[must_use = "returns the built-in schema"]
    pub fn rent_stabilization() -> Self {
        let fields = RENT_STABILIZATION_FIELDS
            .iter()
            .map(|&(name, signature)| {
                let field = FieldSpec::new(name, signature);
                if name == RENT_STABILIZATION_TERMINATOR {
                    field.terminator()
                } else if name == RENT_STABILIZATION_TAG {
                    field.tag()
                } else {
                    field
                }
            })
            .collect();
        Self::index(fields, Axis::X)
    }

    /// Sort and index already-validated fields
    fn index(mut fields: Vec<FieldSpec>, signature_axis: Axis) -> Self {
        fields.sort_by(|a, b| a.signature.total_cmp(&b.signature));
        let by_signature = fields
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.signature_coord(), idx))
            .collect();
        let terminator = fields.iter().position(|f| f.terminator).unwrap_or(0);
        let tag = fields.iter().position(|f| f.tag);

        Self {
            fields,
            signature_axis,
            terminator,
            tag,
            by_signature,
        }
    }

    /// Number of columns
    #[inline]
    #[must_use = "returns the column count"]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a validated schema
    #[inline]
    #[must_use = "returns whether the schema has no columns"]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in signature order
    #[inline]
    #[must_use = "returns the schema fields"]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Column names in signature order (the output header)
    #[must_use = "returns the column names"]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Axis whose coordinate is compared against signatures
    #[inline]
    #[must_use = "returns the signature axis"]
    pub const fn signature_axis(&self) -> Axis {
        self.signature_axis
    }

    /// Axis used to regroup quarantined fragments into rows
    #[inline]
    #[must_use = "returns the row axis"]
    pub const fn row_axis(&self) -> Axis {
        self.signature_axis.other()
    }

    /// The field that closes a row
    #[inline]
    #[must_use = "returns the terminator field"]
    pub fn terminator(&self) -> &FieldSpec {
        &self.fields[self.terminator]
    }

    /// The terminator's signature
    #[inline]
    #[must_use = "returns the terminator signature"]
    pub fn terminator_signature(&self) -> Coord {
        self.terminator().signature_coord()
    }

    /// Index of the tag slot, if the schema has one
    #[inline]
    #[must_use = "returns the tag slot index"]
    pub const fn tag_index(&self) -> Option<usize> {
        self.tag
    }

    /// The tag slot, if the schema has one
    #[inline]
    #[must_use = "returns the tag slot field"]
    pub fn tag_field(&self) -> Option<&FieldSpec> {
        self.tag.map(|idx| &self.fields[idx])
    }

    /// Column whose signature equals `signature` exactly
    #[inline]
    #[must_use = "returns the matching column index"]
    pub fn column_of(&self, signature: Coord) -> Option<usize> {
        self.by_signature.get(&signature).copied()
    }

    /// Column index for a field name
    #[must_use = "returns the column index for the name"]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Whether `text` is one of the field labels (a reprinted header)
    #[must_use = "returns whether the text is a column label"]
    pub fn is_label(&self, text: &str) -> bool {
        self.fields.iter().any(|f| f.name == text)
    }
}

impl Default for ColumnSchema {
    #[inline]
    fn default() -> Self {
        Self::rent_stabilization()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("B", 20.0).terminator(),
            FieldSpec::new("A", 10.0),
            FieldSpec::new("TAG", 99.0).tag(),
        ]
    }

    #[test]
    fn test_rent_stabilization_layout() {
        let schema = ColumnSchema::rent_stabilization();
        assert_eq!(schema.len(), 15);
        assert_eq!(schema.terminator().name, "LOT");
        assert_eq!(schema.terminator_signature(), OrderedFloat(1143.0));
        assert_eq!(schema.tag_field().unwrap().name, "BOROUGH_ID");
        assert_eq!(schema.tag_index(), Some(14));
        assert_eq!(schema.signature_axis(), Axis::X);
        assert_eq!(schema.row_axis(), Axis::Y);
        assert_eq!(schema.field_names()[0], "ZIP");
    }

    #[test]
    fn test_fields_sorted_by_signature() {
        let schema = ColumnSchema::new(small_fields(), Axis::X).unwrap();
        let names = schema.field_names();
        assert_eq!(names, vec!["A", "B", "TAG"]);
        assert!(schema
            .fields()
            .windows(2)
            .all(|w| w[0].signature < w[1].signature));
    }

    #[test]
    fn test_column_lookup_is_exact() {
        let schema = ColumnSchema::new(small_fields(), Axis::X).unwrap();
        assert_eq!(schema.column_of(OrderedFloat(10.0)), Some(0));
        assert_eq!(schema.column_of(OrderedFloat(20.0)), Some(1));
        assert_eq!(schema.column_of(OrderedFloat(10.5)), None);
        assert_eq!(schema.position_of("TAG"), Some(2));
        assert_eq!(schema.position_of("missing"), None);
    }

    #[test]
    fn test_is_label() {
        let schema = ColumnSchema::rent_stabilization();
        assert!(schema.is_label("ZIP"));
        assert!(schema.is_label("BOROUGH_ID"));
        assert!(!schema.is_label("zip"));
        assert!(!schema.is_label("10001"));
    }

    #[test]
    fn test_rejects_empty_schema() {
        let err = ColumnSchema::new(vec![], Axis::X).unwrap_err();
        assert!(matches!(err, FixrowError::InvalidSchema(_)));
    }

    #[test]
    fn test_rejects_missing_terminator() {
        let fields = vec![FieldSpec::new("A", 1.0), FieldSpec::new("B", 2.0)];
        let err = ColumnSchema::new(fields, Axis::X).unwrap_err();
        assert!(err.to_string().contains("terminator"));
    }

    #[test]
    fn test_rejects_two_terminators() {
        let fields = vec![
            FieldSpec::new("A", 1.0).terminator(),
            FieldSpec::new("B", 2.0).terminator(),
        ];
        let err = ColumnSchema::new(fields, Axis::X).unwrap_err();
        assert!(err.to_string().contains("2 terminator"));
    }

    #[test]
    fn test_rejects_duplicate_signature() {
        let fields = vec![
            FieldSpec::new("A", 1.0),
            FieldSpec::new("B", 1.0).terminator(),
        ];
        let err = ColumnSchema::new(fields, Axis::X).unwrap_err();
        assert!(err.to_string().contains("duplicate signature"));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let fields = vec![
            FieldSpec::new("A", 1.0),
            FieldSpec::new("A", 2.0).terminator(),
        ];
        let err = ColumnSchema::new(fields, Axis::X).unwrap_err();
        assert!(err.to_string().contains("duplicate field name"));
    }

    #[test]
    fn test_rejects_nan_signature() {
        let fields = vec![FieldSpec::new("A", f64::NAN).terminator()];
        assert!(ColumnSchema::new(fields, Axis::X).is_err());
    }

    #[test]
    fn test_rejects_terminator_tag() {
        let fields = vec![FieldSpec::new("A", 1.0).terminator().tag()];
        assert!(ColumnSchema::new(fields, Axis::X).is_err());
    }

    #[test]
    fn test_tag_is_optional() {
        let fields = vec![FieldSpec::new("A", 1.0), FieldSpec::new("B", 2.0).terminator()];
        let schema = ColumnSchema::new(fields, Axis::Y).unwrap();
        assert!(schema.tag_field().is_none());
        assert_eq!(schema.row_axis(), Axis::X);
    }

    #[test]
    fn test_field_spec_deserialize_defaults() {
        let field: FieldSpec = serde_json::from_str(r#"{"name":"ZIP","signature":25.0}"#).unwrap();
        assert!(!field.terminator);
        assert!(!field.tag);
    }
}
