//! Comment table access.

use super::{PostgresStore, expect_affected, missing_parent, models::CommentRow, schema::comments};
use crate::comment::{domain::Comment, ports::CommentRepository};
use crate::error::{EntityKind, RepositoryResult};
use crate::ids::{CommentId, TaskId};
use async_trait::async_trait;
use diesel::prelude::*;

#[async_trait]
impl CommentRepository for PostgresStore {
    async fn store_comment(&self, comment: &Comment) -> RepositoryResult<()> {
        let row = CommentRow::from(comment);
        self.run(move |connection| {
            diesel::insert_into(comments::table)
                .values(&row)
                .execute(connection)
                .map_err(missing_parent(EntityKind::Task, row.task_id))?;
            Ok(())
        })
        .await
    }

    async fn update_comment(&self, comment: &Comment) -> RepositoryResult<()> {
        let row = CommentRow::from(comment);
        self.run(move |connection| {
            let affected = diesel::update(comments::table.find(row.id))
                .set(&row)
                .execute(connection)?;
            expect_affected(affected, EntityKind::Comment, row.id)
        })
        .await
    }

    async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected =
                diesel::delete(comments::table.find(id.into_inner())).execute(connection)?;
            expect_affected(affected, EntityKind::Comment, id)
        })
        .await
    }

    async fn find_comment(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        self.run(move |connection| {
            comments::table
                .find(id.into_inner())
                .select(CommentRow::as_select())
                .first(connection)
                .optional()?
                .map(CommentRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_comments(&self, task_id: TaskId) -> RepositoryResult<Vec<Comment>> {
        self.run(move |connection| {
            let rows = comments::table
                .filter(comments::task_id.eq(task_id.into_inner()))
                .order(comments::created_at.asc())
                .select(CommentRow::as_select())
                .load(connection)?;
            rows.into_iter().map(CommentRow::into_domain).collect()
        })
        .await
    }
}
