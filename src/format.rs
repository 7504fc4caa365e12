//! Canonical text for scalar field values.

use crate::reflect::Scalar;

/// Formats a scalar the way it appears as node text.
///
/// Enumerations render as their numeric code and bytes as their raw text.
/// No XML escaping happens here.
pub fn format_scalar(scalar: &Scalar<'_>) -> String {
    match scalar {
        Scalar::Bool(v) => v.to_string(),
        Scalar::I32(v) | Scalar::Enum(v) => v.to_string(),
        Scalar::I64(v) => v.to_string(),
        Scalar::U32(v) => v.to_string(),
        Scalar::U64(v) => v.to_string(),
        Scalar::F32(v) => v.to_string(),
        Scalar::F64(v) => v.to_string(),
        Scalar::String(s) => s.to_string(),
        Scalar::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
