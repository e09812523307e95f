use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MediaId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[sea_orm(string_value = "film")]
    Film,
    #[sea_orm(string_value = "series")]
    Series,
    #[sea_orm(string_value = "book")]
    Book,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::Series => "series",
            Self::Book => "book",
        }
    }

    /// Heading used for a user's list of this kind.
    #[must_use]
    pub const fn list_name(&self) -> &'static str {
        match self {
            Self::Film => "Film List",
            Self::Series => "Series List",
            Self::Book => "Book List",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "film" | "films" | "f" => Ok(Self::Film),
            "series" | "s" => Ok(Self::Series),
            "book" | "books" | "b" => Ok(Self::Book),
            other => Err(format!("Unknown media type: {other}")),
        }
    }
}

/// BBFC age ratings, rounded down from the local rating when none exists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Rating {
    #[sea_orm(string_value = "U")]
    #[serde(rename = "U")]
    Universal,
    #[sea_orm(string_value = "PG")]
    #[serde(rename = "PG")]
    ParentalGuidance,
    #[sea_orm(string_value = "12A")]
    #[serde(rename = "12A")]
    Cinema12A,
    #[sea_orm(string_value = "12")]
    #[serde(rename = "12")]
    Video12,
    #[sea_orm(string_value = "15")]
    #[serde(rename = "15")]
    Fifteen,
    #[sea_orm(string_value = "18")]
    #[serde(rename = "18")]
    Eighteen,
    #[sea_orm(string_value = "R18")]
    #[serde(rename = "R18")]
    Restricted18,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum FilmReleaseStatus {
    #[sea_orm(string_value = "not_yet_released")]
    NotYetReleased,
    #[sea_orm(string_value = "currently_in_cinemas")]
    CurrentlyInCinemas,
    #[sea_orm(string_value = "released")]
    Released,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AiringStatus {
    #[sea_orm(string_value = "not_aired")]
    NotAired,
    #[sea_orm(string_value = "currently_airing")]
    CurrentlyAiring,
    #[sea_orm(string_value = "finished_airing")]
    FinishedAiring,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BookReleaseStatus {
    #[sea_orm(string_value = "not_published")]
    NotPublished,
    #[sea_orm(string_value = "published")]
    Published,
}

/// Type-specific payload of a media item. The variant is the media type, so a
/// film can never carry series data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaDetails {
    Film {
        /// Total runtime in minutes.
        runtime: Option<i32>,
        rating: Option<Rating>,
        release_status: FilmReleaseStatus,
    },
    Series {
        episodes: Option<i32>,
        rating: Option<Rating>,
        airing_status: AiringStatus,
    },
    Book {
        chapters: Option<i32>,
        release_status: BookReleaseStatus,
    },
}

impl MediaDetails {
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Film { .. } => MediaKind::Film,
            Self::Series { .. } => MediaKind::Series,
            Self::Book { .. } => MediaKind::Book,
        }
    }
}

/// Columns shared by every media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBase {
    pub title: String,
    /// Title in the original language, `None` if English.
    pub local_title: Option<String>,
    pub description: Option<String>,
    pub score: f64,
    pub members: i32,
}

impl MediaBase {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            local_title: None,
            description: None,
            score: 0.0,
            members: 0,
        }
    }
}

/// Validated input for the media factory.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub base: MediaBase,
    pub details: MediaDetails,
}

impl NewMedia {
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.details.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    pub id: MediaId,
    #[serde(flatten)]
    pub base: MediaBase,
    pub details: MediaDetails,
}

impl Media {
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.details.kind()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.base.title
    }
}
