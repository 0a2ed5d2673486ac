//! Diesel schema for tracker persistence.

diesel::table! {
    /// Authenticated users.
    users (id) {
        id -> Uuid,
        /// Telegram user identifier.
        external_id -> Int8,
        #[max_length = 32]
        handle -> Nullable<Varchar>,
        #[max_length = 255]
        first_name -> Varchar,
        #[max_length = 255]
        last_name -> Nullable<Varchar>,
        avatar_url -> Nullable<Text>,
        #[max_length = 16]
        language_code -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Workspace tenants with their settings.
    workspaces (id) {
        id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        owner_id -> Uuid,
        #[max_length = 16]
        invite_code -> Varchar,
        description -> Nullable<Text>,
        default_columns -> Array<Text>,
        working_days -> Array<Int2>,
        default_reminder_offset_minutes -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role-bearing (workspace, user) memberships.
    workspace_members (workspace_id, user_id) {
        workspace_id -> Uuid,
        user_id -> Uuid,
        #[max_length = 16]
        role -> Varchar,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    projects (id) {
        id -> Uuid,
        workspace_id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        description -> Nullable<Text>,
        #[max_length = 32]
        visibility -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    boards (id) {
        id -> Uuid,
        project_id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Board columns; `(board_id, position)` is unique.
    board_columns (id) {
        id -> Uuid,
        board_id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        position -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tasks (id) {
        id -> Uuid,
        project_id -> Uuid,
        column_id -> Nullable<Uuid>,
        #[max_length = 500]
        title -> Varchar,
        description -> Nullable<Text>,
        #[max_length = 16]
        status -> Varchar,
        #[max_length = 16]
        priority -> Varchar,
        #[max_length = 16]
        task_type -> Varchar,
        assignee_id -> Nullable<Uuid>,
        reporter_id -> Uuid,
        due_date -> Nullable<Timestamptz>,
        tags -> Array<Text>,
        position -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only task audit trail.
    activity_logs (id) {
        id -> Uuid,
        task_id -> Uuid,
        user_id -> Uuid,
        #[max_length = 32]
        action -> Varchar,
        details -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        task_id -> Uuid,
        author_id -> Uuid,
        parent_id -> Nullable<Uuid>,
        body -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Mentions; `context` selects which of `task_id`/`comment_id` is set.
    mentions (id) {
        id -> Uuid,
        #[max_length = 16]
        context -> Varchar,
        task_id -> Nullable<Uuid>,
        comment_id -> Nullable<Uuid>,
        mentioned_user_id -> Uuid,
        notified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        task_id -> Nullable<Uuid>,
        #[max_length = 32]
        notification_type -> Varchar,
        message -> Text,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reminders (id) {
        id -> Uuid,
        task_id -> Uuid,
        user_id -> Uuid,
        remind_at -> Timestamptz,
        #[max_length = 16]
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    workspaces,
    workspace_members,
    projects,
    boards,
    board_columns,
    tasks,
    activity_logs,
    comments,
    mentions,
    notifications,
    reminders,
);
