//! Exact values for the standard angles of the unit circle.

/// Exact sine, cosine and tangent labels for one standard angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardAngle {
    /// Angle in degrees, in `[0, 360)`
    pub degrees: u16,
    /// Exact sine
    pub sin: &'static str,
    /// Exact cosine
    pub cos: &'static str,
    /// Exact tangent, `"undefined"` at 90° and 270°
    pub tan: &'static str,
}

const fn entry(
    degrees: u16,
    sin: &'static str,
    cos: &'static str,
    tan: &'static str,
) -> StandardAngle {
    StandardAngle {
        degrees,
        sin,
        cos,
        tan,
    }
}

/// The 16 multiples of 30° and 45° in `[0, 360)`, ordered by angle.
pub const STANDARD_ANGLES: [StandardAngle; 16] = [
    entry(0, "0", "1", "0"),
    entry(30, "1/2", "√3/2", "1/√3"),
    entry(45, "√2/2", "√2/2", "1"),
    entry(60, "√3/2", "1/2", "√3"),
    entry(90, "1", "0", "undefined"),
    entry(120, "√3/2", "-1/2", "-√3"),
    entry(135, "√2/2", "-√2/2", "-1"),
    entry(150, "1/2", "-√3/2", "-1/√3"),
    entry(180, "0", "-1", "0"),
    entry(210, "-1/2", "-√3/2", "1/√3"),
    entry(225, "-√2/2", "-√2/2", "1"),
    entry(240, "-√3/2", "-1/2", "√3"),
    entry(270, "-1", "0", "undefined"),
    entry(300, "-√3/2", "1/2", "-√3"),
    entry(315, "-√2/2", "√2/2", "-1"),
    entry(330, "-1/2", "√3/2", "-1/√3"),
];

/// Look up a standard angle by its integer degree value.
#[must_use]
pub fn lookup(degrees: i64) -> Option<&'static StandardAngle> {
    STANDARD_ANGLES
        .iter()
        .find(|entry| i64::from(entry.degrees) == degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_in_range() {
        assert!(STANDARD_ANGLES
            .windows(2)
            .all(|pair| pair[0].degrees < pair[1].degrees));
        assert!(STANDARD_ANGLES.iter().all(|entry| entry.degrees < 360));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(45).map(|e| e.sin), Some("√2/2"));
        assert_eq!(lookup(270).map(|e| e.tan), Some("undefined"));
        assert!(lookup(360).is_none());
        assert!(lookup(31).is_none());
        assert!(lookup(-30).is_none());
    }
}
