/// Feedback banding
///
/// Converts a smoothed angle into a bar position and a feedback message.
/// Deviations inside the excellent range are correct form; deviations inside
/// the display range get the angle's corrective message; anything further
/// out is off-scale and not shown.

use crate::models::{AngleSpec, ColorTier, FeedbackBar};

pub const EXCELLENT_MESSAGE: &str = "Excellent!";

/// Which side of the ideal a value falls on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    Excellent { bar: FeedbackBar },
    Over { bar: FeedbackBar },
    Under { bar: FeedbackBar },
    OffScale,
}

impl Band {
    pub fn bar(&self) -> Option<FeedbackBar> {
        match self {
            Band::Excellent { bar } | Band::Over { bar } | Band::Under { bar } => Some(*bar),
            Band::OffScale => None,
        }
    }

    pub fn tier(&self) -> ColorTier {
        match self {
            Band::Excellent { .. } => ColorTier::Good,
            Band::Over { .. } | Band::Under { .. } => ColorTier::Caution,
            Band::OffScale => ColorTier::Hidden,
        }
    }
}

/// Result of classifying one angle
#[derive(Debug, Clone, PartialEq)]
pub struct Banding {
    pub feedback: String,
    pub bar: Option<FeedbackBar>,
    pub tier: ColorTier,
}

/// Place `current` relative to `ideal`
pub fn band(current: f32, ideal: f32, display_range: f32, excellent_range: f32) -> Band {
    let deviation = current - ideal;

    if !deviation.is_finite() || deviation.abs() > display_range {
        return Band::OffScale;
    }

    let position = if display_range > 0.0 {
        ((current - (ideal - display_range)) / (2.0 * display_range)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let bar = FeedbackBar {
        position,
        ideal_position: 0.5,
    };

    if deviation.abs() <= excellent_range {
        Band::Excellent { bar }
    } else if deviation > excellent_range {
        Band::Over { bar }
    } else {
        Band::Under { bar }
    }
}

/// Classify `current` against an angle's thresholds and pick its message
pub fn classify(current: f32, spec: &AngleSpec) -> Banding {
    let band = band(current, spec.ideal, spec.display_range, spec.excellent_range);
    let feedback = match band {
        Band::Excellent { .. } => EXCELLENT_MESSAGE,
        Band::Over { .. } => spec.over_message,
        Band::Under { .. } => spec.under_message,
        Band::OffScale => "",
    };

    Banding {
        feedback: feedback.to_string(),
        bar: band.bar(),
        tier: band.tier(),
    }
}
