//! Ordered thermal phase set

use serde::{Deserialize, Serialize};

/// An ordered list of phase labels, fastest first.
///
/// The phase set is configuration, not a fixed enum: the classifier works on
/// ranks (indices into this list) and only the presentation layer cares about
/// labels. Rank 0 is the fastest phase, the last rank the slowest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseSet(Vec<String>);

impl PhaseSet {
    /// Build a phase set from labels ordered fastest to slowest
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Number of phases
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no phases are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label for a rank; out-of-range ranks report as "?"
    pub fn label(&self, rank: usize) -> &str {
        self.0.get(rank).map(String::as_str).unwrap_or("?")
    }

    /// Rank for a label, if present
    pub fn rank_of(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }

    /// Rank of the fastest phase
    pub fn fastest(&self) -> usize {
        0
    }

    /// Rank of the slowest phase
    pub fn slowest(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Rank of the neutral phase (middle of the ladder), the phase a fresh
    /// or reduced-motion session sits in
    pub fn neutral(&self) -> usize {
        self.0.len() / 2
    }

    /// Iterate labels fastest to slowest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// ANSI color for a phase rank, hottest red through coldest blue
pub fn phase_color(rank: usize, total: usize) -> &'static str {
    let bucket = if total <= 1 {
        2
    } else {
        (rank * 4) / (total - 1)
    };
    match bucket {
        0 => "\x1b[31m", // Red
        1 => "\x1b[33m", // Yellow
        2 => "\x1b[37m", // White
        3 => "\x1b[36m", // Cyan
        _ => "\x1b[34m", // Blue
    }
}

/// Reset ANSI color
pub fn color_reset() -> &'static str {
    "\x1b[0m"
}

/// Glyph for a phase rank
pub fn phase_glyph(rank: usize, total: usize) -> &'static str {
    let bucket = if total <= 1 {
        2
    } else {
        (rank * 4) / (total - 1)
    };
    match bucket {
        0 => "🔥",
        1 => "🌡",
        2 => "🌫",
        3 => "❄",
        _ => "🧊",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_lookup() {
        let phases = PhaseSet::new(["hot", "warm", "cold"]);
        assert_eq!(phases.len(), 3);
        assert_eq!(phases.label(0), "hot");
        assert_eq!(phases.label(2), "cold");
        assert_eq!(phases.label(9), "?");
        assert_eq!(phases.rank_of("warm"), Some(1));
        assert_eq!(phases.rank_of("plasma"), None);
    }

    #[test]
    fn test_neutral_is_middle() {
        assert_eq!(PhaseSet::new(["hot", "warm", "cold"]).neutral(), 1);
        assert_eq!(
            PhaseSet::new(["plasma", "gas", "liquid", "solid", "frozen"]).neutral(),
            2
        );
    }

    #[test]
    fn test_color_spread() {
        // Three phases hit red, white, blue
        assert_eq!(phase_color(0, 3), "\x1b[31m");
        assert_eq!(phase_color(1, 3), "\x1b[37m");
        assert_eq!(phase_color(2, 3), "\x1b[34m");
        // Five phases walk the full palette
        assert_eq!(phase_color(1, 5), "\x1b[33m");
        assert_eq!(phase_color(3, 5), "\x1b[36m");
    }
}
