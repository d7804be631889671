//! # Canonical Wire Attributes
//!
//! Every encoded batch document must carry exactly one copy of the
//! schema-location, XSI namespace, and vendor namespace declarations,
//! with byte-exact values — downstream consumers validate against the
//! literal strings. The injector is a pure function from the old
//! attribute set to the new one: it strips any slot occupants left over
//! from a previous decode, then appends the canonical triple in fixed
//! order, so encode → decode → encode is idempotent.

use serde::{Deserialize, Serialize};

/// Schema-location attribute name.
pub const SCHEMA_LOCATION_ATTR: &str = "xsi:schemaLocation";
/// Schema-location attribute value, byte-exact.
pub const SCHEMA_LOCATION_VALUE: &str =
    "www.server.gov/base https://www.fincen.gov/base https://www.fincen.gov/base/EFL_8300XBatchSchema.xsd";

/// XSI namespace attribute name.
pub const XSI_NAMESPACE_ATTR: &str = "xmlns:xsi";
/// XSI namespace URI, byte-exact.
pub const XSI_NAMESPACE_VALUE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Vendor namespace attribute name.
pub const VENDOR_NAMESPACE_ATTR: &str = "xsi:fc2";
/// Vendor namespace value, byte-exact.
pub const VENDOR_NAMESPACE_VALUE: &str = "www.server.gov/base";

/// A pass-through wire attribute the envelope does not otherwise model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAttr {
    /// Attribute name as it appears on the wire, prefix included.
    #[serde(rename = "Name")]
    pub name: String,
    /// Attribute value.
    #[serde(rename = "Value")]
    pub value: String,
}

impl WireAttr {
    /// Construct a wire attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The local part of a possibly-prefixed attribute name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Whether an attribute occupies one of the canonical slots.
fn is_canonical_slot(name: &str) -> bool {
    matches!(local_name(name), "schemaLocation" | "xsi" | "fc2")
}

/// Produce the attribute set for encoding: all pass-through attributes
/// except canonical-slot occupants, followed by the canonical triple.
pub fn inject_canonical_attrs(attrs: &[WireAttr]) -> Vec<WireAttr> {
    let mut out: Vec<WireAttr> = attrs
        .iter()
        .filter(|a| !is_canonical_slot(&a.name))
        .cloned()
        .collect();
    out.push(WireAttr::new(SCHEMA_LOCATION_ATTR, SCHEMA_LOCATION_VALUE));
    out.push(WireAttr::new(XSI_NAMESPACE_ATTR, XSI_NAMESPACE_VALUE));
    out.push(WireAttr::new(VENDOR_NAMESPACE_ATTR, VENDOR_NAMESPACE_VALUE));
    out
}
