use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, Postgres, Transaction};
use uuid::Uuid;

use super::{Store, UnitOfWork};
use crate::config::DatabaseConfig;
use crate::models::{Event, Speaker};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_deleted: bool,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let EventRow {
            id,
            title,
            description,
            start_date,
            end_date,
            is_deleted,
        } = row;
        Event {
            id,
            title,
            description,
            start_date,
            end_date,
            is_deleted,
            speakers: Vec::new(),
        }
    }
}

/// One row of the events/speakers left join. Speaker columns are `None` for
/// an event without speakers.
#[derive(Debug, Clone, FromRow)]
struct EventSpeakerRow {
    #[sqlx(flatten)]
    event: EventRow,
    speaker_id: Option<Uuid>,
    speaker_name: Option<String>,
    speaker_talk_title: Option<String>,
    speaker_linked_in_profile: Option<String>,
}

fn fold_event_rows(rows: Vec<EventSpeakerRow>) -> Option<Event> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;
    let mut event = Event::from(first.event.clone());
    for row in std::iter::once(first).chain(rows) {
        if let (Some(id), Some(name), Some(talk_title), Some(linked_in_profile)) = (
            row.speaker_id,
            row.speaker_name,
            row.speaker_talk_title,
            row.speaker_linked_in_profile,
        ) {
            event.speakers.push(Speaker {
                id,
                name,
                talk_title,
                linked_in_profile,
                event_id: event.id,
            });
        }
    }
    Some(event)
}

fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}

fn map_insert_error(err: sqlx::Error, what: &str, id: Uuid) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{} with id '{}' already exists", what, id))
        }
        _ => AppError::DatabaseError(err),
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(cfg: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await?;
        tracing::info!(
            max_connections = cfg.max_connections,
            "Successfully connected to database"
        );
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        tracing::info!("Migrations run successfully");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Unit of work backed by a database transaction. Dropping it rolls back and
/// hands the connection back to the pool.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_events(&mut self, show_deleted: bool) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, start_date, end_date, is_deleted
            FROM events
            WHERE $1 OR NOT is_deleted
            ORDER BY seq
            "#,
        )
        .bind(show_deleted)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn find_event(&mut self, id: Uuid, show_deleted: bool) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, start_date, end_date, is_deleted
            FROM events
            WHERE id = $1 AND ($2 OR NOT is_deleted)
            "#,
        )
        .bind(id)
        .bind(show_deleted)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Event::from))
    }

    async fn find_event_with_speakers(
        &mut self,
        id: Uuid,
        show_deleted: bool,
    ) -> AppResult<Option<Event>> {
        let rows = sqlx::query_as::<_, EventSpeakerRow>(
            r#"
            SELECT
                e.id,
                e.title,
                e.description,
                e.start_date,
                e.end_date,
                e.is_deleted,
                s.id AS speaker_id,
                s.name AS speaker_name,
                s.talk_title AS speaker_talk_title,
                s.linked_in_profile AS speaker_linked_in_profile
            FROM events AS e
            LEFT JOIN speakers AS s ON s.event_id = e.id
            WHERE e.id = $1 AND ($2 OR NOT e.is_deleted)
            ORDER BY s.seq
            "#,
        )
        .bind(id)
        .bind(show_deleted)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(fold_event_rows(rows))
    }

    async fn event_exists(&mut self, id: Uuid, show_deleted: bool) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM events WHERE id = $1 AND ($2 OR NOT is_deleted)
            )
            "#,
        )
        .bind(id)
        .bind(show_deleted)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn insert_event(&mut self, event: &Event) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, start_date, end_date, is_deleted)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.is_deleted)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, "Event", event.id))?;

        Ok(())
    }

    async fn update_event_fields(&mut self, event: &Event) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE events
            SET
                title = $2,
                description = $3,
                start_date = $4,
                end_date = $5
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .execute(&mut *self.tx)
        .await?;

        if res.rows_affected() < 1 {
            return Err(event_not_found(event.id));
        }

        Ok(())
    }

    async fn mark_event_deleted(&mut self, id: Uuid) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE events
            SET is_deleted = TRUE
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await?;

        if res.rows_affected() < 1 {
            return Err(event_not_found(id));
        }

        Ok(())
    }

    async fn find_speakers_by_event(&mut self, event_id: Uuid) -> AppResult<Vec<Speaker>> {
        let speakers = sqlx::query_as::<_, Speaker>(
            r#"
            SELECT id, name, talk_title, linked_in_profile, event_id
            FROM speakers
            WHERE event_id = $1
            ORDER BY seq
            "#,
        )
        .bind(event_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(speakers)
    }

    async fn find_all_speakers(&mut self) -> AppResult<Vec<Speaker>> {
        let speakers = sqlx::query_as::<_, Speaker>(
            r#"
            SELECT id, name, talk_title, linked_in_profile, event_id
            FROM speakers
            ORDER BY seq
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(speakers)
    }

    async fn insert_speaker(&mut self, speaker: &Speaker) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO speakers (id, name, talk_title, linked_in_profile, event_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(speaker.id)
        .bind(&speaker.name)
        .bind(&speaker.talk_title)
        .bind(&speaker.linked_in_profile)
        .bind(speaker.event_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, "Speaker", speaker.id))?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
