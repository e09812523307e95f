use serde::Serialize;

use super::fields::has_at_most_decimals;
use super::{ConstraintViolation, MediaId, MediaKind, UserId};

const LIST_SCORE_MAX: f64 = 10.0;

/// The slice of a media row shown next to a list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSummary {
    pub id: MediaId,
    pub title: String,
    pub media_type: MediaKind,
    pub score: f64,
}

/// A user's tracking record for one media item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub id: i32,
    pub user_id: UserId,
    pub media: MediaSummary,
    /// `None` until the user scores the item.
    pub score: Option<f64>,
    pub progress: i32,
}

/// Personal scores run 0 to 10 with one decimal place.
pub fn validate_list_score(score: f64) -> Result<(), ConstraintViolation> {
    if !(0.0..=LIST_SCORE_MAX).contains(&score) {
        return Err(ConstraintViolation::invalid(
            "score",
            format!("must be between 0 and {LIST_SCORE_MAX}"),
        ));
    }
    if !has_at_most_decimals(score, 1) {
        return Err(ConstraintViolation::invalid("score", "at most 1 decimal place"));
    }
    Ok(())
}

pub fn validate_progress(progress: i32) -> Result<(), ConstraintViolation> {
    if progress < 0 {
        return Err(ConstraintViolation::invalid("progress", "must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_score_bounds() {
        assert!(validate_list_score(0.0).is_ok());
        assert!(validate_list_score(7.5).is_ok());
        assert!(validate_list_score(10.0).is_ok());
        assert!(validate_list_score(10.5).is_err());
        assert!(validate_list_score(7.25).is_err());
    }

    #[test]
    fn progress_must_not_be_negative() {
        assert!(validate_progress(0).is_ok());
        assert!(validate_progress(-1).is_err());
    }
}
