use serde::{Deserialize, Serialize};

/// The three answer buttons shown after a card is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Not recalled
    Hard,
    /// Recalled with some effort
    Good,
    /// Recalled instantly
    Easy,
}

impl Rating {
    /// The quality rating fed to the scheduler.
    pub const fn quality(self) -> i32 {
        match self {
            Self::Hard => 1,
            Self::Good => 3,
            Self::Easy => 5,
        }
    }
}

/// Map an examiner score for a spoken answer (0 to 100) onto a quality rating.
///
/// * Above 90: 5
/// * Above 60: 3
/// * Otherwise: 1
pub const fn quality_from_voice_score(score: u8) -> i32 {
    match score {
        91.. => 5,
        61..=90 => 3,
        _ => 1,
    }
}

/// Map a bare correct/incorrect verdict onto a quality rating.
pub const fn quality_from_verdict(is_correct: bool) -> i32 {
    if is_correct { 5 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_quality() {
        assert_eq!(Rating::Hard.quality(), 1);
        assert_eq!(Rating::Good.quality(), 3);
        assert_eq!(Rating::Easy.quality(), 5);
    }

    #[test]
    fn test_voice_score_thresholds() {
        assert_eq!(quality_from_voice_score(100), 5);
        assert_eq!(quality_from_voice_score(91), 5);
        assert_eq!(quality_from_voice_score(90), 3);
        assert_eq!(quality_from_voice_score(61), 3);
        assert_eq!(quality_from_voice_score(60), 1);
        assert_eq!(quality_from_voice_score(0), 1);
    }

    #[test]
    fn test_verdict() {
        assert_eq!(quality_from_verdict(true), 5);
        assert_eq!(quality_from_verdict(false), 1);
    }

    #[test]
    fn test_rating_deserializes_lowercase() {
        let rating: Rating = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(rating, Rating::Easy);
    }
}
