//! # SQLite adapter
//!
//! Maps the SQLite relational model to the `domains` aggregates. All writes
//! go through [`SqliteUnitOfWork`], which wraps one sqlx transaction:
//! nothing is visible to other readers until `commit`, and dropping the
//! unit of work rolls everything back.
//!
//! Ids and timestamps are stored as TEXT (UUID strings, RFC 3339), enum
//! variants as their canonical strings, so rows stay readable in the
//! sqlite shell.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Content, CreditRepository, CreditTransaction, Critique, CritiqueAbout, CritiqueId,
    CritiqueIdeas, CritiqueRepository, CritiqueStatus, CritiqueSuccesses, CritiqueWeaknesses,
    Member, MemberId, MemberRepository, MemberRole, MemberStatus, PasswordDigest, Rating,
    RatingComment, RatingId, RatingRepository, RatingScore, RatingStatus, Title, TransactionId,
    TransactionType, Work, WorkAgeRestriction, WorkGenre, WorkId, WorkRepository, WorkStatus,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

/// The transaction is shared so several repositories can run against the
/// same scope at once; handlers use them strictly sequentially.
type SharedTx = Arc<Mutex<Option<Transaction<'static, Sqlite>>>>;

// Yields the live transaction out of a locked guard.
macro_rules! tx {
    ($guard:ident) => {
        $guard
            .as_mut()
            .ok_or_else(|| anyhow!("unit of work already finished"))?
    };
}

/// Opens (creating if missing) the database at `url` and applies the schema.
///
/// The pool is capped at one connection so `sqlite::memory:` behaves as a
/// single shared database instead of a fresh one per checkout.
pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    debug!(url, "sqlite database ready");
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS members (
            id                TEXT PRIMARY KEY,
            username          TEXT NOT NULL,
            email             TEXT NOT NULL,
            password          TEXT NOT NULL,
            role              TEXT NOT NULL,
            status            TEXT NOT NULL,
            last_login        TEXT NOT NULL,
            last_updated_date TEXT NOT NULL,
            created_date      TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS works (
            id               TEXT PRIMARY KEY,
            title            TEXT NOT NULL,
            content          TEXT NOT NULL,
            age_restriction  TEXT NOT NULL,
            genre            TEXT NOT NULL,
            status           TEXT NOT NULL,
            submission_date  TEXT NOT NULL,
            last_update_date TEXT NOT NULL,
            archive_date     TEXT,
            member_id        TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS critiques (
            id                TEXT PRIMARY KEY,
            about             TEXT NOT NULL,
            successes         TEXT NOT NULL,
            weaknesses        TEXT NOT NULL,
            ideas             TEXT NOT NULL,
            status            TEXT NOT NULL,
            submission_date   TEXT NOT NULL,
            last_updated_date TEXT NOT NULL,
            archive_date      TEXT,
            member_id         TEXT NOT NULL,
            work_id           TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ratings (
            id                TEXT PRIMARY KEY,
            score             INTEGER NOT NULL,
            comment           TEXT,
            status            TEXT NOT NULL,
            submission_date   TEXT NOT NULL,
            last_updated_date TEXT NOT NULL,
            archive_date      TEXT,
            member_id         TEXT NOT NULL,
            critique_id       TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS credit_transactions (
            id                  TEXT PRIMARY KEY,
            member_id           TEXT NOT NULL,
            amount              REAL NOT NULL,
            transaction_type    TEXT NOT NULL,
            work_id             TEXT,
            critique_id         TEXT,
            date_of_transaction TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

// Timestamps round-trip through RFC 3339 so DateTime equality survives a
// write/read cycle.
fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

fn parse_ts(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn parse_opt_ts(value: Option<String>) -> anyhow::Result<Option<DateTime<Utc>>> {
    value.as_deref().map(parse_ts).transpose()
}

/// One transactional scope over the database. Repositories handed out by it
/// all execute on the same transaction; `commit` publishes the batch and
/// dropping the scope without committing rolls it back.
pub struct SqliteUnitOfWork {
    tx: SharedTx,
}

impl SqliteUnitOfWork {
    pub async fn begin(pool: &SqlitePool) -> anyhow::Result<Self> {
        let tx = pool.begin().await?;
        Ok(Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        })
    }

    pub fn members(&self) -> SqliteMemberRepository {
        SqliteMemberRepository {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn works(&self) -> SqliteWorkRepository {
        SqliteWorkRepository {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn critiques(&self) -> SqliteCritiqueRepository {
        SqliteCritiqueRepository {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn ratings(&self) -> SqliteRatingRepository {
        SqliteRatingRepository {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn credits(&self) -> SqliteCreditRepository {
        SqliteCreditRepository {
            tx: Arc::clone(&self.tx),
        }
    }

    pub async fn commit(self) -> anyhow::Result<()> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow!("unit of work already finished"))?;
        tx.commit().await?;
        Ok(())
    }

    /// Explicit rollback. Dropping the unit of work has the same effect.
    pub async fn rollback(self) -> anyhow::Result<()> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow!("unit of work already finished"))?;
        tx.rollback().await?;
        Ok(())
    }
}

// ---- row → aggregate mapping -------------------------------------------
//
// Nested collections (member → works → critiques → ratings) are loaded with
// follow-up queries on the same connection. Text fields whose limits come
// from configuration rehydrate through `from_stored`; fixed-constraint value
// objects re-validate on the way in.

fn load_rating(row: &SqliteRow) -> anyhow::Result<Rating> {
    let id = RatingId::parse_str(&row.get::<String, _>("id"))?;
    let score = RatingScore::new(row.get::<i64, _>("score") as u8)?;
    let comment = row
        .get::<Option<String>, _>("comment")
        .map(RatingComment::new);
    let status = RatingStatus::parse_str(&row.get::<String, _>("status"))?;
    Ok(Rating::rehydrate(
        id,
        score,
        comment,
        status,
        parse_ts(&row.get::<String, _>("submission_date"))?,
        parse_ts(&row.get::<String, _>("last_updated_date"))?,
        parse_opt_ts(row.get::<Option<String>, _>("archive_date"))?,
        MemberId::parse_str(&row.get::<String, _>("member_id"))?,
        CritiqueId::parse_str(&row.get::<String, _>("critique_id"))?,
    ))
}

async fn load_ratings_for_critique(
    conn: &mut SqliteConnection,
    critique_id: CritiqueId,
) -> anyhow::Result<Vec<Rating>> {
    let rows = sqlx::query("SELECT * FROM ratings WHERE critique_id = ? ORDER BY submission_date")
        .bind(critique_id.to_string())
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(load_rating).collect()
}

async fn load_critique(conn: &mut SqliteConnection, row: &SqliteRow) -> anyhow::Result<Critique> {
    let id = CritiqueId::parse_str(&row.get::<String, _>("id"))?;
    let ratings = load_ratings_for_critique(conn, id).await?;
    Ok(Critique::rehydrate(
        id,
        CritiqueAbout::from_stored(row.get("about")),
        CritiqueSuccesses::from_stored(row.get("successes")),
        CritiqueWeaknesses::from_stored(row.get("weaknesses")),
        CritiqueIdeas::from_stored(row.get("ideas")),
        CritiqueStatus::parse_str(&row.get::<String, _>("status"))?,
        parse_ts(&row.get::<String, _>("submission_date"))?,
        parse_ts(&row.get::<String, _>("last_updated_date"))?,
        parse_opt_ts(row.get::<Option<String>, _>("archive_date"))?,
        MemberId::parse_str(&row.get::<String, _>("member_id"))?,
        WorkId::parse_str(&row.get::<String, _>("work_id"))?,
        ratings,
    ))
}

async fn load_critiques_for_work(
    conn: &mut SqliteConnection,
    work_id: WorkId,
) -> anyhow::Result<Vec<Critique>> {
    let rows = sqlx::query("SELECT * FROM critiques WHERE work_id = ? ORDER BY submission_date")
        .bind(work_id.to_string())
        .fetch_all(&mut *conn)
        .await?;
    let mut critiques = Vec::with_capacity(rows.len());
    for row in &rows {
        critiques.push(load_critique(conn, row).await?);
    }
    Ok(critiques)
}

async fn load_critiques_for_member(
    conn: &mut SqliteConnection,
    member_id: MemberId,
) -> anyhow::Result<Vec<Critique>> {
    let rows = sqlx::query("SELECT * FROM critiques WHERE member_id = ? ORDER BY submission_date")
        .bind(member_id.to_string())
        .fetch_all(&mut *conn)
        .await?;
    let mut critiques = Vec::with_capacity(rows.len());
    for row in &rows {
        critiques.push(load_critique(conn, row).await?);
    }
    Ok(critiques)
}

async fn load_work(conn: &mut SqliteConnection, row: &SqliteRow) -> anyhow::Result<Work> {
    let id = WorkId::parse_str(&row.get::<String, _>("id"))?;
    let critiques = load_critiques_for_work(conn, id).await?;
    Ok(Work::rehydrate(
        id,
        Title::new(row.get::<String, _>("title"))?,
        Content::from_stored(row.get("content")),
        WorkAgeRestriction::parse_str(&row.get::<String, _>("age_restriction"))?,
        WorkGenre::parse_str(&row.get::<String, _>("genre"))?,
        WorkStatus::parse_str(&row.get::<String, _>("status"))?,
        parse_ts(&row.get::<String, _>("submission_date"))?,
        parse_ts(&row.get::<String, _>("last_update_date"))?,
        parse_opt_ts(row.get::<Option<String>, _>("archive_date"))?,
        MemberId::parse_str(&row.get::<String, _>("member_id"))?,
        critiques,
    ))
}

async fn load_works_for_member(
    conn: &mut SqliteConnection,
    member_id: MemberId,
) -> anyhow::Result<Vec<Work>> {
    let rows = sqlx::query("SELECT * FROM works WHERE member_id = ? ORDER BY submission_date")
        .bind(member_id.to_string())
        .fetch_all(&mut *conn)
        .await?;
    let mut works = Vec::with_capacity(rows.len());
    for row in &rows {
        works.push(load_work(conn, row).await?);
    }
    Ok(works)
}

async fn load_member(conn: &mut SqliteConnection, row: &SqliteRow) -> anyhow::Result<Member> {
    let id = MemberId::parse_str(&row.get::<String, _>("id"))?;
    let works = load_works_for_member(conn, id).await?;
    let critiques = load_critiques_for_member(conn, id).await?;
    Ok(Member::rehydrate(
        id,
        row.get("username"),
        row.get("email"),
        PasswordDigest::from_phc_string(row.get("password")),
        MemberRole::parse_str(&row.get::<String, _>("role"))?,
        MemberStatus::parse_str(&row.get::<String, _>("status"))?,
        works,
        critiques,
        parse_ts(&row.get::<String, _>("last_login"))?,
        parse_ts(&row.get::<String, _>("last_updated_date"))?,
        parse_ts(&row.get::<String, _>("created_date"))?,
    ))
}

fn load_transaction(row: &SqliteRow) -> anyhow::Result<CreditTransaction> {
    Ok(CreditTransaction::rehydrate(
        TransactionId::parse_str(&row.get::<String, _>("id"))?,
        MemberId::parse_str(&row.get::<String, _>("member_id"))?,
        row.get("amount"),
        TransactionType::parse_str(&row.get::<String, _>("transaction_type"))?,
        row.get::<Option<String>, _>("work_id")
            .as_deref()
            .map(WorkId::parse_str)
            .transpose()?,
        row.get::<Option<String>, _>("critique_id")
            .as_deref()
            .map(CritiqueId::parse_str)
            .transpose()?,
        parse_ts(&row.get::<String, _>("date_of_transaction"))?,
    ))
}

// ---- aggregate → row mapping --------------------------------------------
//
// `add` is an upsert keyed on id, and cascades to the aggregate's owned
// collections so the rows never drift from the in-memory state.

async fn upsert_rating(conn: &mut SqliteConnection, rating: &Rating) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO ratings
            (id, score, comment, status, submission_date, last_updated_date,
             archive_date, member_id, critique_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            score = excluded.score,
            comment = excluded.comment,
            status = excluded.status,
            last_updated_date = excluded.last_updated_date,
            archive_date = excluded.archive_date",
    )
    .bind(rating.id.to_string())
    .bind(rating.score.value() as i64)
    .bind(rating.comment.as_ref().map(|c| c.as_str().to_string()))
    .bind(rating.status.as_str())
    .bind(ts(rating.submission_date))
    .bind(ts(rating.last_updated_date))
    .bind(rating.archive_date.map(ts))
    .bind(rating.member_id().to_string())
    .bind(rating.critique_id().to_string())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn upsert_critique(conn: &mut SqliteConnection, critique: &Critique) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO critiques
            (id, about, successes, weaknesses, ideas, status, submission_date,
             last_updated_date, archive_date, member_id, work_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            about = excluded.about,
            successes = excluded.successes,
            weaknesses = excluded.weaknesses,
            ideas = excluded.ideas,
            status = excluded.status,
            last_updated_date = excluded.last_updated_date,
            archive_date = excluded.archive_date",
    )
    .bind(critique.id.to_string())
    .bind(critique.about.as_str())
    .bind(critique.successes.as_str())
    .bind(critique.weaknesses.as_str())
    .bind(critique.ideas.as_str())
    .bind(critique.status.as_str())
    .bind(ts(critique.submission_date))
    .bind(ts(critique.last_updated_date))
    .bind(critique.archive_date.map(ts))
    .bind(critique.member_id.to_string())
    .bind(critique.work_id.to_string())
    .execute(&mut *conn)
    .await?;

    for rating in &critique.ratings {
        upsert_rating(conn, rating).await?;
    }
    Ok(())
}

async fn upsert_work(conn: &mut SqliteConnection, work: &Work) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO works
            (id, title, content, age_restriction, genre, status,
             submission_date, last_update_date, archive_date, member_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            content = excluded.content,
            age_restriction = excluded.age_restriction,
            genre = excluded.genre,
            status = excluded.status,
            last_update_date = excluded.last_update_date,
            archive_date = excluded.archive_date",
    )
    .bind(work.id.to_string())
    .bind(work.title.as_str())
    .bind(work.content.as_str())
    .bind(work.age_restriction.as_str())
    .bind(work.genre.as_str())
    .bind(work.status.as_str())
    .bind(ts(work.submission_date))
    .bind(ts(work.last_update_date))
    .bind(work.archive_date.map(ts))
    .bind(work.member_id.to_string())
    .execute(&mut *conn)
    .await?;

    for critique in &work.critiques {
        upsert_critique(conn, critique).await?;
    }
    Ok(())
}

async fn upsert_member(conn: &mut SqliteConnection, member: &Member) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO members
            (id, username, email, password, role, status, last_login,
             last_updated_date, created_date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            username = excluded.username,
            email = excluded.email,
            password = excluded.password,
            role = excluded.role,
            status = excluded.status,
            last_login = excluded.last_login,
            last_updated_date = excluded.last_updated_date",
    )
    .bind(member.id.to_string())
    .bind(&member.username)
    .bind(&member.email)
    .bind(member.password_digest().as_str())
    .bind(member.role.as_str())
    .bind(member.status.as_str())
    .bind(ts(member.last_login))
    .bind(ts(member.last_updated_date))
    .bind(ts(member.created_date))
    .execute(&mut *conn)
    .await?;

    for work in &member.works {
        upsert_work(conn, work).await?;
    }
    for critique in &member.critiques {
        upsert_critique(conn, critique).await?;
    }
    Ok(())
}

// ---- transaction-bound repositories ---------------------------------------

pub struct SqliteMemberRepository {
    tx: SharedTx,
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn add(&mut self, member: &Member) -> anyhow::Result<()> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        upsert_member(&mut **tx, member).await
    }

    async fn get_by_id(&mut self, id: MemberId) -> anyhow::Result<Option<Member>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM members WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        match row {
            Some(row) => Ok(Some(load_member(&mut **tx, &row).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_email(&mut self, email: &str) -> anyhow::Result<Option<Member>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM members WHERE email = ?")
            .bind(email)
            .fetch_optional(&mut **tx)
            .await?;
        match row {
            Some(row) => Ok(Some(load_member(&mut **tx, &row).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_username(&mut self, username: &str) -> anyhow::Result<Option<Member>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM members WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut **tx)
            .await?;
        match row {
            Some(row) => Ok(Some(load_member(&mut **tx, &row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&mut self) -> anyhow::Result<Vec<Member>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let rows = sqlx::query("SELECT * FROM members ORDER BY created_date")
            .fetch_all(&mut **tx)
            .await?;
        let mut members = Vec::with_capacity(rows.len());
        for row in &rows {
            members.push(load_member(&mut **tx, row).await?);
        }
        Ok(members)
    }
}

pub struct SqliteWorkRepository {
    tx: SharedTx,
}

#[async_trait]
impl WorkRepository for SqliteWorkRepository {
    async fn add(&mut self, work: &Work) -> anyhow::Result<()> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        upsert_work(&mut **tx, work).await
    }

    async fn get_by_id(&mut self, id: WorkId) -> anyhow::Result<Option<Work>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM works WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        match row {
            Some(row) => Ok(Some(load_work(&mut **tx, &row).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_member_id(&mut self, member_id: MemberId) -> anyhow::Result<Vec<Work>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        load_works_for_member(&mut **tx, member_id).await
    }

    async fn list(&mut self) -> anyhow::Result<Vec<Work>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let rows = sqlx::query("SELECT * FROM works ORDER BY submission_date")
            .fetch_all(&mut **tx)
            .await?;
        let mut works = Vec::with_capacity(rows.len());
        for row in &rows {
            works.push(load_work(&mut **tx, row).await?);
        }
        Ok(works)
    }
}

pub struct SqliteCritiqueRepository {
    tx: SharedTx,
}

#[async_trait]
impl CritiqueRepository for SqliteCritiqueRepository {
    async fn add(&mut self, critique: &Critique) -> anyhow::Result<()> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        upsert_critique(&mut **tx, critique).await
    }

    async fn get_by_id(&mut self, id: CritiqueId) -> anyhow::Result<Option<Critique>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM critiques WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        match row {
            Some(row) => Ok(Some(load_critique(&mut **tx, &row).await?)),
            None => Ok(None),
        }
    }

    async fn list_for_work(&mut self, work_id: WorkId) -> anyhow::Result<Vec<Critique>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        load_critiques_for_work(&mut **tx, work_id).await
    }

    async fn list(&mut self) -> anyhow::Result<Vec<Critique>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let rows = sqlx::query("SELECT * FROM critiques ORDER BY submission_date")
            .fetch_all(&mut **tx)
            .await?;
        let mut critiques = Vec::with_capacity(rows.len());
        for row in &rows {
            critiques.push(load_critique(&mut **tx, row).await?);
        }
        Ok(critiques)
    }
}

pub struct SqliteRatingRepository {
    tx: SharedTx,
}

#[async_trait]
impl RatingRepository for SqliteRatingRepository {
    async fn add(&mut self, rating: &Rating) -> anyhow::Result<()> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        upsert_rating(&mut **tx, rating).await
    }

    async fn get_by_id(&mut self, id: RatingId) -> anyhow::Result<Option<Rating>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM ratings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        row.as_ref().map(load_rating).transpose()
    }

    async fn list_for_critique(&mut self, critique_id: CritiqueId) -> anyhow::Result<Vec<Rating>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        load_ratings_for_critique(&mut **tx, critique_id).await
    }
}

pub struct SqliteCreditRepository {
    tx: SharedTx,
}

#[async_trait]
impl CreditRepository for SqliteCreditRepository {
    async fn add(&mut self, transaction: &CreditTransaction) -> anyhow::Result<()> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        sqlx::query(
            "INSERT INTO credit_transactions
                (id, member_id, amount, transaction_type, work_id, critique_id,
                 date_of_transaction)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                amount = excluded.amount",
        )
        .bind(transaction.id.to_string())
        .bind(transaction.member_id.to_string())
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.work_id.map(|id| id.to_string()))
        .bind(transaction.critique_id.map(|id| id.to_string()))
        .bind(ts(transaction.date_of_transaction))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn get_by_id(&mut self, id: TransactionId) -> anyhow::Result<Option<CreditTransaction>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let row = sqlx::query("SELECT * FROM credit_transactions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await?;
        row.as_ref().map(load_transaction).transpose()
    }

    async fn list_for_member(
        &mut self,
        member_id: MemberId,
    ) -> anyhow::Result<Vec<CreditTransaction>> {
        let mut guard = self.tx.lock().await;
        let tx = tx!(guard);
        let rows = sqlx::query(
            "SELECT * FROM credit_transactions WHERE member_id = ?
             ORDER BY date_of_transaction",
        )
        .bind(member_id.to_string())
        .fetch_all(&mut **tx)
        .await?;
        rows.iter().map(load_transaction).collect()
    }
}
