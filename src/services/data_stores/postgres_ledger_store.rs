use color_eyre::eyre::eyre;
use sqlx::{PgConnection, PgPool};

use crate::domain::{
    lifecycle, ApprovalReceipt, CompletionReceipt, Credits, LedgerStore,
    LedgerStoreError, Member, MemberId, MemberName, PledgeAmount,
    PledgeReceipt, Snapshot, Task, TaskId, TaskTitle,
};

/// Rows are always locked tasks first, then members, so that concurrent
/// lifecycle transactions cannot deadlock each other.
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[tracing::instrument(name = "Seeding members in PostgreSQL", skip_all)]
    async fn seed_members(
        &self,
        members: &[Member],
    ) -> Result<(), LedgerStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        for member in members {
            sqlx::query(
                r#"
                INSERT INTO members (id, name, credits) VALUES ($1, $2, $3)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(*member.id.as_ref())
            .bind(member.name.as_ref())
            .bind(member.credits.value_of())
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(name = "Getting snapshot from PostgreSQL", skip_all)]
    async fn get_snapshot(&self) -> Result<Snapshot, LedgerStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        let member_rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, credits
            FROM members
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        let task_rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, creator_id, pledged_credits, approved, completed, completed_by
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        tx.commit()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        Ok(Snapshot {
            members: member_rows
                .into_iter()
                .map(Member::try_from)
                .collect::<Result<_, _>>()?,
            tasks: task_rows
                .into_iter()
                .map(Task::try_from)
                .collect::<Result<_, _>>()?,
        })
    }

    #[tracing::instrument(name = "Creating task in PostgreSQL", skip_all)]
    async fn create_task(
        &self,
        title: &TaskTitle,
        creator_id: &MemberId,
    ) -> Result<Task, LedgerStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        let creator = fetch_member(&mut tx, creator_id, RowLock::Share).await?;
        lifecycle::check_creator(creator, creator_id)?;

        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (title, creator_id) VALUES ($1, $2)
            RETURNING id, title, creator_id, pledged_credits, approved, completed, completed_by
            "#,
        )
        .bind(title.as_ref())
        .bind(*creator_id.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        tx.commit()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        Task::try_from(row)
    }

    #[tracing::instrument(name = "Pledging credits in PostgreSQL", skip_all)]
    async fn pledge(
        &self,
        task_id: &TaskId,
        member_id: &MemberId,
        amount: PledgeAmount,
    ) -> Result<PledgeReceipt, LedgerStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        let task = fetch_task(&mut tx, task_id).await?;
        let member = fetch_member(&mut tx, member_id, RowLock::Update).await?;

        let pledged = lifecycle::pledge(member, task, amount)?;

        update_member_credits(&mut tx, &pledged.member).await?;
        update_task(&mut tx, &pledged.task).await?;

        tx.commit()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        Ok(pledged.receipt)
    }

    #[tracing::instrument(name = "Approving task in PostgreSQL", skip_all)]
    async fn approve(
        &self,
        task_id: &TaskId,
        approver_id: &MemberId,
    ) -> Result<ApprovalReceipt, LedgerStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        let task = fetch_task(&mut tx, task_id).await?;

        let approved = lifecycle::approve(task, approver_id)?;

        if approved.changed {
            update_task(&mut tx, &approved.task).await?;
        }

        tx.commit()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        Ok(approved.receipt)
    }

    #[tracing::instrument(name = "Completing task in PostgreSQL", skip_all)]
    async fn complete(
        &self,
        task_id: &TaskId,
        member_id: &MemberId,
    ) -> Result<CompletionReceipt, LedgerStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        let task = fetch_task(&mut tx, task_id).await?;
        let completer =
            fetch_member(&mut tx, member_id, RowLock::Update).await?;

        let completed = lifecycle::complete(task, member_id, completer)?;

        update_member_credits(&mut tx, &completed.completer).await?;
        update_task(&mut tx, &completed.task).await?;

        tx.commit()
            .await
            .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;

        Ok(completed.receipt)
    }
}

enum RowLock {
    Share,
    Update,
}

async fn fetch_member(
    conn: &mut PgConnection,
    member_id: &MemberId,
    lock: RowLock,
) -> Result<Option<Member>, LedgerStoreError> {
    let query = match lock {
        RowLock::Share => {
            "SELECT id, name, credits FROM members WHERE id = $1 FOR SHARE"
        }
        RowLock::Update => {
            "SELECT id, name, credits FROM members WHERE id = $1 FOR UPDATE"
        }
    };

    sqlx::query_as::<_, MemberRow>(query)
        .bind(*member_id.as_ref())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?
        .map(Member::try_from)
        .transpose()
}

async fn fetch_task(
    conn: &mut PgConnection,
    task_id: &TaskId,
) -> Result<Option<Task>, LedgerStoreError> {
    sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT id, title, creator_id, pledged_credits, approved, completed, completed_by
        FROM tasks
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(*task_id.as_ref())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?
    .map(Task::try_from)
    .transpose()
}

async fn update_member_credits(
    conn: &mut PgConnection,
    member: &Member,
) -> Result<(), LedgerStoreError> {
    sqlx::query("UPDATE members SET credits = $2 WHERE id = $1")
        .bind(*member.id.as_ref())
        .bind(member.credits.value_of())
        .execute(&mut *conn)
        .await
        .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;
    Ok(())
}

async fn update_task(
    conn: &mut PgConnection,
    task: &Task,
) -> Result<(), LedgerStoreError> {
    sqlx::query(
        r#"
        UPDATE tasks
        SET pledged_credits = $2, approved = $3, completed = $4, completed_by = $5
        WHERE id = $1
        "#,
    )
    .bind(*task.id.as_ref())
    .bind(task.pledged_credits.value_of())
    .bind(task.approved)
    .bind(task.completed)
    .bind(task.completed_by.map(|id| *id.as_ref()))
    .execute(&mut *conn)
    .await
    .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    name: String,
    credits: i64,
}

impl TryFrom<MemberRow> for Member {
    type Error = LedgerStoreError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: MemberId::parse(row.id)
                .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?,
            name: MemberName::parse(row.name)
                .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?,
            credits: Credits::parse(row.credits)
                .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    creator_id: i64,
    pledged_credits: i64,
    approved: bool,
    completed: bool,
    completed_by: Option<i64>,
}

impl TryFrom<TaskRow> for Task {
    type Error = LedgerStoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: TaskId::parse(row.id)
                .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?,
            title: TaskTitle::parse(&row.title)
                .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?,
            creator_id: MemberId::new(row.creator_id),
            pledged_credits: Credits::parse(row.pledged_credits)
                .map_err(|e| LedgerStoreError::UnexpectedError(eyre!(e)))?,
            approved: row.approved,
            completed: row.completed,
            completed_by: row.completed_by.map(MemberId::new),
        })
    }
}
