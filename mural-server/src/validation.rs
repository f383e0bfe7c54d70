//! Input validation for untrusted stroke payloads.
//!
//! Acceptance is strict even though downstream parsing is permissive: a
//! stroke only enters the log when every coordinate is a plain unsigned
//! decimal, so everything echoed to other clients is drawable as-is.

use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The polyline has no segments at all.
    #[error("polyline is empty")]
    Empty,
    /// A segment does not split into exactly four coordinates.
    #[error("segment needs exactly 4 coordinates, found {0}")]
    WrongCoordinateCount(usize),
    /// A coordinate token is empty or contains a non-digit.
    #[error("coordinate is not an unsigned decimal: {0:?}")]
    BadCoordinate(String),
}

/// Validate a polyline payload.
///
/// Segments are `;`-separated quadruples of `,`-separated unsigned
/// decimal coordinates. One trailing empty segment (from a trailing
/// `;`) is tolerated, matching what the parser later drops. Any other
/// malformed segment rejects the whole stroke.
///
/// # Errors
///
/// Returns the first violation found; the caller is expected to drop
/// the stroke and carry on.
pub fn validate_polyline(polyline: &str) -> Result<(), ValidationError> {
    let mut segments: Vec<&str> = polyline.split(';').collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }
    if segments.is_empty() {
        return Err(ValidationError::Empty);
    }

    for segment in segments {
        let coords: Vec<&str> = segment.split(',').collect();
        if coords.len() != 4 {
            return Err(ValidationError::WrongCoordinateCount(coords.len()));
        }
        for coord in coords {
            if coord.is_empty() || !coord.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ValidationError::BadCoordinate(coord.to_string()));
            }
        }
    }

    Ok(())
}
