//! Mention table access.

use super::{PostgresStore, expect_affected, models::MentionRow, schema::mentions};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::ids::MentionId;
use crate::mention::{
    domain::{Mention, MentionTarget},
    ports::MentionRepository,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

#[async_trait]
impl MentionRepository for PostgresStore {
    async fn store_mentions(&self, mentions: &[Mention]) -> RepositoryResult<()> {
        let Some(first) = mentions.first() else {
            return Ok(());
        };
        let target = first.target();
        let rows: Vec<MentionRow> = mentions.iter().map(MentionRow::from).collect();
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                diesel::insert_into(mentions::table)
                    .values(&rows)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            match target {
                                MentionTarget::Task(id) => {
                                    RepositoryError::not_found(EntityKind::Task, id)
                                }
                                MentionTarget::Comment(id) => {
                                    RepositoryError::not_found(EntityKind::Comment, id)
                                }
                            }
                        }
                        other => RepositoryError::from(other),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn mark_mention_notified(&self, id: MentionId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::update(mentions::table.find(id.into_inner()))
                .set(mentions::notified.eq(true))
                .execute(connection)?;
            expect_affected(affected, EntityKind::Mention, id)
        })
        .await
    }

    async fn list_mentions(&self, target: MentionTarget) -> RepositoryResult<Vec<Mention>> {
        self.run(move |connection| {
            let query = mentions::table
                .filter(mentions::context.eq(target.context().as_str()))
                .into_boxed();
            let query = match target {
                MentionTarget::Task(id) => query.filter(mentions::task_id.eq(id.into_inner())),
                MentionTarget::Comment(id) => {
                    query.filter(mentions::comment_id.eq(id.into_inner()))
                }
            };
            let rows = query
                .order(mentions::created_at.asc())
                .select(MentionRow::as_select())
                .load(connection)?;
            rows.into_iter().map(MentionRow::into_domain).collect()
        })
        .await
    }
}
