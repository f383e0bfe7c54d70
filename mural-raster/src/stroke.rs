//! Polyline parsing for stroke updates.
//!
//! A polyline on the wire is a `;`-separated list of segments, each a
//! `,`-separated quadruple of unsigned decimal coordinates. The parser
//! here is permissive; strict validation of user payloads happens
//! before a stroke is accepted, and this scan only has to turn whatever
//! arrives into drawable segments without failing.

/// One line segment of a polyline, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Start x coordinate.
    pub x1: u32,
    /// Start y coordinate.
    pub y1: u32,
    /// End x coordinate.
    pub x2: u32,
    /// End y coordinate.
    pub y2: u32,
}

impl Segment {
    /// Create a segment from its four coordinates.
    #[must_use]
    pub const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Whether the segment starts and ends on the same pixel.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }
}

/// Split a polyline into drawable segments.
///
/// Coordinates are scanned permissively: the leading run of decimal
/// digits counts and anything that fails the scan (missing token,
/// non-digit prefix, overflow) degrades to 0. A trailing empty segment
/// from a trailing `;` is dropped.
#[must_use]
pub fn parse_polyline(polyline: &str) -> Vec<Segment> {
    let mut pieces: Vec<&str> = polyline.split(';').collect();
    if pieces.last() == Some(&"") {
        pieces.pop();
    }
    pieces.into_iter().map(parse_segment).collect()
}

/// Parse one `x1,y1,x2,y2` quadruple.
fn parse_segment(raw: &str) -> Segment {
    let mut coords = raw.split(',').map(scan_decimal);
    Segment {
        x1: coords.next().unwrap_or(0),
        y1: coords.next().unwrap_or(0),
        x2: coords.next().unwrap_or(0),
        y2: coords.next().unwrap_or(0),
    }
}

/// Scan the leading run of ASCII digits as a decimal number.
///
/// Anything that fails the scan (empty input, non-digit prefix,
/// overflow) yields the type's default, which is 0 for the unsigned
/// integers this is used with. Leading whitespace is skipped.
#[must_use]
pub fn scan_decimal<T>(token: &str) -> T
where
    T: std::str::FromStr + Default,
{
    let token = token.trim_start();
    let end = token.bytes().take_while(u8::is_ascii_digit).count();
    token[..end].parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        assert_eq!(
            parse_polyline("10,10,20,20"),
            vec![Segment::new(10, 10, 20, 20)]
        );
    }

    #[test]
    fn test_parse_multiple_segments() {
        assert_eq!(
            parse_polyline("10,10,20,20;30,30,40,40"),
            vec![Segment::new(10, 10, 20, 20), Segment::new(30, 30, 40, 40)]
        );
    }

    #[test]
    fn test_trailing_separator_is_dropped() {
        assert_eq!(
            parse_polyline("10,10,20,20;"),
            vec![Segment::new(10, 10, 20, 20)]
        );
    }

    #[test]
    fn test_empty_polyline_has_no_segments() {
        assert!(parse_polyline("").is_empty());
    }

    #[test]
    fn test_malformed_coordinates_degrade_to_zero() {
        assert_eq!(parse_polyline("a,b,c,d"), vec![Segment::new(0, 0, 0, 0)]);
        // A digit prefix scans up to the first non-digit.
        assert_eq!(
            parse_polyline("10,1a,20,20"),
            vec![Segment::new(10, 1, 20, 20)]
        );
    }

    #[test]
    fn test_missing_coordinates_degrade_to_zero() {
        assert_eq!(parse_polyline("10,10,20"), vec![Segment::new(10, 10, 20, 0)]);
        assert_eq!(parse_polyline("10"), vec![Segment::new(10, 0, 0, 0)]);
    }

    #[test]
    fn test_overflowing_coordinate_degrades_to_zero() {
        assert_eq!(
            parse_polyline("99999999999999,1,2,3"),
            vec![Segment::new(0, 1, 2, 3)]
        );
    }

    #[test]
    fn test_leading_whitespace_is_tolerated() {
        assert_eq!(
            parse_polyline(" 10, 10, 20, 20"),
            vec![Segment::new(10, 10, 20, 20)]
        );
    }

    #[test]
    fn test_degenerate_segment_detection() {
        assert!(Segment::new(5, 5, 5, 5).is_degenerate());
        assert!(!Segment::new(5, 5, 5, 6).is_degenerate());
    }

    #[test]
    fn test_scan_decimal_takes_the_digit_prefix() {
        assert_eq!(scan_decimal::<u64>("123abc"), 123);
        assert_eq!(scan_decimal::<u32>(""), 0);
        assert_eq!(scan_decimal::<u32>("-5"), 0);
        assert_eq!(scan_decimal::<u16>(" 42 "), 42);
    }
}
