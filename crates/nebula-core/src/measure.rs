//! # Measure Module
//!
//! Resolves the size a host should give the drawing, following the usual
//! exact / at-most / unconstrained negotiation.

use kurbo::Size;

/// Constraint a host places on one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureSpec {
    /// The host decides; the preferred size is ignored.
    Exactly(f64),
    /// The preferred size, capped at the given value.
    AtMost(f64),
    /// The preferred size.
    Unspecified,
}

impl MeasureSpec {
    pub fn resolve(self, preferred: f64) -> f64 {
        match self {
            MeasureSpec::Exactly(size) => size,
            MeasureSpec::AtMost(limit) => limit.min(preferred),
            MeasureSpec::Unspecified => preferred,
        }
    }
}

/// Resolves both axes against a preferred size.
pub fn measure(preferred: Size, width: MeasureSpec, height: MeasureSpec) -> Size {
    Size::new(width.resolve(preferred.width), height.resolve(preferred.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_modes() {
        let preferred = Size::new(500.0, 520.0);
        assert_eq!(
            measure(preferred, MeasureSpec::Exactly(100.0), MeasureSpec::Unspecified),
            Size::new(100.0, 520.0)
        );
        assert_eq!(
            measure(preferred, MeasureSpec::AtMost(300.0), MeasureSpec::AtMost(900.0)),
            Size::new(300.0, 520.0)
        );
    }
}
