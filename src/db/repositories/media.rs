use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::info;

use super::{check_page, contains_literal};
use crate::db::error::{StoreError, StoreResult};
use crate::domain::{Media, MediaBase, MediaDetails, MediaId, MediaKind, NewMedia};
use crate::entities::{books, films, media, series};

/// Filters for [`MediaRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct MediaQuery {
    pub kind: Option<MediaKind>,
    /// Substring of the title or local title.
    pub title: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Clone)]
pub struct MediaPage {
    pub items: Vec<Media>,
    pub total: u64,
}

pub struct MediaRepository {
    conn: DatabaseConnection,
}

impl MediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the base row and the subtype row in one transaction. If either
    /// insert fails nothing is persisted.
    pub async fn create(&self, new_media: &NewMedia) -> StoreResult<Media> {
        let txn = self.conn.begin().await?;

        let row = media::ActiveModel {
            media_type: Set(new_media.kind()),
            title: Set(new_media.base.title.clone()),
            local_title: Set(new_media.base.local_title.clone()),
            description: Set(new_media.base.description.clone()),
            score: Set(new_media.base.score),
            members: Set(new_media.base.members),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_details(&txn, row.id, &new_media.details).await?;

        txn.commit().await?;

        info!(
            media_id = row.id,
            media_type = %row.media_type,
            "Created media '{}'",
            row.title
        );

        Ok(Media {
            id: MediaId::new(row.id),
            base: new_media.base.clone(),
            details: new_media.details.clone(),
        })
    }

    pub async fn get(&self, id: MediaId) -> StoreResult<Option<Media>> {
        let Some(row) = media::Entity::find_by_id(id.value()).one(&self.conn).await? else {
            return Ok(None);
        };

        Ok(self.attach_details(vec![row]).await?.pop())
    }

    /// Loads every id in `ids` that exists, ordered by title.
    pub async fn get_many(&self, ids: &[MediaId]) -> StoreResult<Vec<Media>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = media::Entity::find()
            .filter(media::Column::Id.is_in(ids.iter().map(MediaId::value)))
            .order_by_asc(media::Column::Title)
            .order_by_asc(media::Column::Id)
            .all(&self.conn)
            .await?;

        self.attach_details(rows).await
    }

    pub async fn exists(&self, id: MediaId) -> StoreResult<bool> {
        Ok(media::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await?
            .is_some())
    }

    /// Most popular first, then by title.
    pub async fn list(&self, query: &MediaQuery) -> StoreResult<MediaPage> {
        let page_size = query.page_size.max(1);
        check_page(query.page, page_size)?;

        let mut select = media::Entity::find();

        if let Some(kind) = query.kind {
            select = select.filter(media::Column::MediaType.eq(kind));
        }

        if let Some(title) = query.title.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_literal(media::Column::Title, title))
                    .add(contains_literal(media::Column::LocalTitle, title)),
            );
        }

        let paginator = select
            .order_by_desc(media::Column::Members)
            .order_by_asc(media::Column::Title)
            .order_by_asc(media::Column::Id)
            .paginate(&self.conn, page_size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(query.page).await?;

        Ok(MediaPage {
            items: self.attach_details(rows).await?,
            total,
        })
    }

    /// Deleting the base row cascades to the subtype row, list entries and
    /// relationship edges.
    pub async fn delete(&self, id: MediaId) -> StoreResult<()> {
        let result = media::Entity::delete_by_id(id.value())
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found("Media", id));
        }

        info!(media_id = id.value(), "Deleted media");
        Ok(())
    }

    pub async fn count_by_kind(&self) -> StoreResult<HashMap<MediaKind, u64>> {
        let mut counts = HashMap::new();
        for kind in [MediaKind::Film, MediaKind::Series, MediaKind::Book] {
            let count = media::Entity::find()
                .filter(media::Column::MediaType.eq(kind))
                .count(&self.conn)
                .await?;
            counts.insert(kind, count);
        }
        Ok(counts)
    }

    /// Joins each base row with its subtype row, keeping the input order.
    async fn attach_details(&self, rows: Vec<media::Model>) -> StoreResult<Vec<Media>> {
        let ids_of = |kind: MediaKind| -> Vec<i32> {
            rows.iter()
                .filter(|row| row.media_type == kind)
                .map(|row| row.id)
                .collect()
        };
        let film_ids = ids_of(MediaKind::Film);
        let series_ids = ids_of(MediaKind::Series);
        let book_ids = ids_of(MediaKind::Book);

        let mut films: HashMap<i32, films::Model> = if film_ids.is_empty() {
            HashMap::new()
        } else {
            films::Entity::find()
                .filter(films::Column::MediaId.is_in(film_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|row| (row.media_id, row))
                .collect()
        };

        let mut series: HashMap<i32, series::Model> = if series_ids.is_empty() {
            HashMap::new()
        } else {
            series::Entity::find()
                .filter(series::Column::MediaId.is_in(series_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|row| (row.media_id, row))
                .collect()
        };

        let mut books: HashMap<i32, books::Model> = if book_ids.is_empty() {
            HashMap::new()
        } else {
            books::Entity::find()
                .filter(books::Column::MediaId.is_in(book_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|row| (row.media_id, row))
                .collect()
        };

        rows.into_iter()
            .map(|row| {
                let details = match row.media_type {
                    MediaKind::Film => films.remove(&row.id).map(|f| MediaDetails::Film {
                        runtime: f.runtime,
                        rating: f.rating,
                        release_status: f.release_status,
                    }),
                    MediaKind::Series => series.remove(&row.id).map(|s| MediaDetails::Series {
                        episodes: s.episodes,
                        rating: s.rating,
                        airing_status: s.airing_status,
                    }),
                    MediaKind::Book => books.remove(&row.id).map(|b| MediaDetails::Book {
                        chapters: b.chapters,
                        release_status: b.release_status,
                    }),
                }
                .ok_or_else(|| {
                    StoreError::Internal(format!(
                        "media {} has no {} row",
                        row.id, row.media_type
                    ))
                })?;

                Ok(Media {
                    id: MediaId::new(row.id),
                    base: MediaBase {
                        title: row.title,
                        local_title: row.local_title,
                        description: row.description,
                        score: row.score,
                        members: row.members,
                    },
                    details,
                })
            })
            .collect()
    }
}

async fn insert_details<C: ConnectionTrait>(
    db: &C,
    media_id: i32,
    details: &MediaDetails,
) -> Result<(), DbErr> {
    match *details {
        MediaDetails::Film {
            runtime,
            rating,
            release_status,
        } => {
            films::ActiveModel {
                media_id: Set(media_id),
                runtime: Set(runtime),
                rating: Set(rating),
                release_status: Set(release_status),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        MediaDetails::Series {
            episodes,
            rating,
            airing_status,
        } => {
            series::ActiveModel {
                media_id: Set(media_id),
                episodes: Set(episodes),
                rating: Set(rating),
                airing_status: Set(airing_status),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        MediaDetails::Book {
            chapters,
            release_status,
        } => {
            books::ActiveModel {
                media_id: Set(media_id),
                chapters: Set(chapters),
                release_status: Set(release_status),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}
