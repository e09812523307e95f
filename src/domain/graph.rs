//! Sequel/prequel/related links between media.
//!
//! Edges are stored directed. An edge `(X -> Y, Sequel)` means X is a sequel
//! of Y, equivalently Y is a prequel of X. `Related` edges are symmetric and
//! their stored direction carries no meaning. At most one edge exists per
//! unordered pair of media.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::MediaId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    #[sea_orm(string_value = "sequel")]
    Sequel,
    #[sea_orm(string_value = "related")]
    Related,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub media1: MediaId,
    pub media2: MediaId,
    pub relationship: Relationship,
}

/// How `other` relates to a subject media, as requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// `other` is a sequel of the subject.
    Sequel,
    /// `other` is a prequel of the subject.
    Prequel,
    Related,
}

impl LinkKind {
    /// The edge stored for "`other` is a <self> of `subject`".
    #[must_use]
    pub const fn edge(self, subject: MediaId, other: MediaId) -> Edge {
        match self {
            Self::Sequel => Edge {
                media1: other,
                media2: subject,
                relationship: Relationship::Sequel,
            },
            Self::Prequel => Edge {
                media1: subject,
                media2: other,
                relationship: Relationship::Sequel,
            },
            Self::Related => Edge {
                media1: other,
                media2: subject,
                relationship: Relationship::Related,
            },
        }
    }
}

impl std::str::FromStr for LinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequel" => Ok(Self::Sequel),
            "prequel" => Ok(Self::Prequel),
            "related" => Ok(Self::Related),
            other => Err(format!("Unknown relationship: {other}")),
        }
    }
}

/// Every media id appearing on either end of `edges`, minus `subject`.
pub fn related_ids<I>(subject: MediaId, edges: I) -> BTreeSet<MediaId>
where
    I: IntoIterator<Item = (MediaId, MediaId)>,
{
    let (firsts, seconds): (BTreeSet<_>, BTreeSet<_>) = edges.into_iter().unzip();
    let mut ids: BTreeSet<MediaId> = firsts.union(&seconds).copied().collect();
    ids.remove(&subject);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i32) -> MediaId {
        MediaId::new(n)
    }

    #[test]
    fn sequel_is_stored_from_the_sequel() {
        let edge = LinkKind::Sequel.edge(id(1), id(2));
        assert_eq!(edge.media1, id(2));
        assert_eq!(edge.media2, id(1));
        assert_eq!(edge.relationship, Relationship::Sequel);
    }

    #[test]
    fn prequel_is_stored_from_the_subject() {
        let edge = LinkKind::Prequel.edge(id(1), id(2));
        assert_eq!(edge.media1, id(1));
        assert_eq!(edge.media2, id(2));
        assert_eq!(edge.relationship, Relationship::Sequel);
    }

    #[test]
    fn related_is_stored_from_the_other_media() {
        let edge = LinkKind::Related.edge(id(1), id(2));
        assert_eq!(edge.media1, id(2));
        assert_eq!(edge.media2, id(1));
        assert_eq!(edge.relationship, Relationship::Related);
    }

    #[test]
    fn related_ids_excludes_subject_and_deduplicates() {
        let edges = vec![(id(2), id(1)), (id(3), id(1)), (id(1), id(3))];
        let ids = related_ids(id(1), edges);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![id(2), id(3)]);
    }

    #[test]
    fn related_ids_of_no_edges_is_empty() {
        assert!(related_ids(id(1), Vec::new()).is_empty());
    }

    #[test]
    fn link_kind_parses() {
        assert_eq!("Prequel".parse::<LinkKind>().unwrap(), LinkKind::Prequel);
        assert!("spinoff".parse::<LinkKind>().is_err());
    }
}
