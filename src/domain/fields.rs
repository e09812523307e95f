//! Splits a flat field map into the base `media` columns and the columns of
//! the type-specific table, then validates both halves into a [`NewMedia`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::media::{MediaBase, MediaDetails, MediaKind, NewMedia};
use super::ConstraintViolation;

pub type FieldMap = serde_json::Map<String, Value>;

pub const BASE_FIELDS: &[&str] = &["title", "local_title", "description", "score", "members"];

const TITLE_MAX_LEN: usize = 250;
const MEDIA_SCORE_MAX: f64 = 99.99;

impl MediaKind {
    /// Columns declared by this kind's subtype table.
    #[must_use]
    pub const fn subtype_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Film => &["runtime", "rating", "release_status"],
            Self::Series => &["episodes", "rating", "airing_status"],
            Self::Book => &["chapters", "release_status"],
        }
    }
}

/// Partitions `fields` into `(base, subtype)` by the subtype's declared field
/// names. Keys belonging to neither table are rejected.
pub fn partition_fields(
    kind: MediaKind,
    fields: FieldMap,
) -> Result<(FieldMap, FieldMap), ConstraintViolation> {
    let subtype_fields = kind.subtype_fields();
    let mut base = FieldMap::new();
    let mut subtype = FieldMap::new();

    for (key, value) in fields {
        if subtype_fields.contains(&key.as_str()) {
            subtype.insert(key, value);
        } else if BASE_FIELDS.contains(&key.as_str()) {
            base.insert(key, value);
        } else {
            return Err(ConstraintViolation::invalid(
                key,
                format!("not a {kind} field"),
            ));
        }
    }

    Ok((base, subtype))
}

/// Validates a flat field map into a [`NewMedia`] of the given kind.
pub fn build_new_media(kind: MediaKind, fields: FieldMap) -> Result<NewMedia, ConstraintViolation> {
    let (mut base_fields, mut subtype_fields) = partition_fields(kind, fields)?;

    let base = build_base(&mut base_fields)?;
    let details = match kind {
        MediaKind::Film => MediaDetails::Film {
            runtime: non_negative(&mut subtype_fields, "runtime")?,
            rating: take(&mut subtype_fields, "rating")?,
            release_status: require(&mut subtype_fields, "release_status")?,
        },
        MediaKind::Series => MediaDetails::Series {
            episodes: non_negative(&mut subtype_fields, "episodes")?,
            rating: take(&mut subtype_fields, "rating")?,
            airing_status: require(&mut subtype_fields, "airing_status")?,
        },
        MediaKind::Book => MediaDetails::Book {
            chapters: non_negative(&mut subtype_fields, "chapters")?,
            release_status: require(&mut subtype_fields, "release_status")?,
        },
    };

    Ok(NewMedia { base, details })
}

fn build_base(fields: &mut FieldMap) -> Result<MediaBase, ConstraintViolation> {
    let title: String = require(fields, "title")?;
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ConstraintViolation::MissingField("title".to_string()));
    }
    check_length("title", &title)?;

    let local_title: Option<String> = take(fields, "local_title")?;
    if let Some(local) = &local_title {
        check_length("local_title", local)?;
    }

    let score = take::<f64>(fields, "score")?.unwrap_or(0.0);
    validate_media_score(score)?;

    let members = non_negative(fields, "members")?.unwrap_or(0);

    Ok(MediaBase {
        title,
        local_title,
        description: take(fields, "description")?,
        score,
        members,
    })
}

/// Media scores are stored with 4 digits, 2 of them decimal places.
pub fn validate_media_score(score: f64) -> Result<(), ConstraintViolation> {
    if !(0.0..=MEDIA_SCORE_MAX).contains(&score) {
        return Err(ConstraintViolation::invalid(
            "score",
            format!("must be between 0 and {MEDIA_SCORE_MAX}"),
        ));
    }
    if !has_at_most_decimals(score, 2) {
        return Err(ConstraintViolation::invalid(
            "score",
            "at most 2 decimal places",
        ));
    }
    Ok(())
}

pub(crate) fn has_at_most_decimals(value: f64, places: i32) -> bool {
    let scaled = value * 10f64.powi(places);
    (scaled - scaled.round()).abs() < 1e-6
}

fn check_length(field: &str, value: &str) -> Result<(), ConstraintViolation> {
    if value.chars().count() > TITLE_MAX_LEN {
        return Err(ConstraintViolation::invalid(
            field,
            format!("must be {TITLE_MAX_LEN} characters or less"),
        ));
    }
    Ok(())
}

fn take<T: DeserializeOwned>(
    fields: &mut FieldMap,
    field: &str,
) -> Result<Option<T>, ConstraintViolation> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ConstraintViolation::invalid(field, e.to_string())),
    }
}

fn require<T: DeserializeOwned>(fields: &mut FieldMap, field: &str) -> Result<T, ConstraintViolation> {
    take(fields, field)?.ok_or_else(|| ConstraintViolation::MissingField(field.to_string()))
}

fn non_negative(fields: &mut FieldMap, field: &str) -> Result<Option<i32>, ConstraintViolation> {
    let value: Option<i32> = take(fields, field)?;
    if value.is_some_and(|v| v < 0) {
        return Err(ConstraintViolation::invalid(field, "must not be negative"));
    }
    Ok(value)
}
