//! Member repository implementation
//!
//! Four statements against the `member` table, executed through
//! [`SqlTemplate`]. How connections are obtained depends on the template's
//! provider; calls made through [`MemberRepository::session`] run on the
//! connection of a unit of work instead.

use std::sync::Arc;

use core_kernel::{Member, MemberId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{info, instrument};

use crate::connection::{DirectConnectionProvider, PooledConnectionProvider};
use crate::error::DatabaseError;
use crate::pool::{DatabaseConfig, DatabasePool};
use crate::template::{SqlTemplate, SqlValue};
use crate::transaction::UnitOfWork;

const INSERT_MEMBER: &str = "INSERT INTO MEMBER(MEMBER_ID, MONEY) VALUES(?, ?)";
const SELECT_MEMBER: &str = "SELECT * FROM MEMBER WHERE MEMBER_ID = ?";
const UPDATE_MONEY: &str = "UPDATE MEMBER SET MONEY = ? WHERE MEMBER_ID = ?";
const DELETE_MEMBER: &str = "DELETE FROM MEMBER WHERE MEMBER_ID = ?";

/// Repository for member rows
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::MemberRepository;
///
/// let repo = MemberRepository::pooled(pool);
/// let member = repo.find_by_id(&member_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MemberRepository {
    template: SqlTemplate,
}

impl MemberRepository {
    /// Creates a repository over an existing template
    pub fn new(template: SqlTemplate) -> Self {
        Self { template }
    }

    /// Creates a repository that draws connections from `pool`
    ///
    /// # Arguments
    ///
    /// * `pool` - The SQLite connection pool
    pub fn pooled(pool: DatabasePool) -> Self {
        Self::new(SqlTemplate::new(Arc::new(PooledConnectionProvider::new(pool))))
    }

    /// Creates a repository that opens a new connection for every call
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` if the URL cannot be parsed
    pub fn direct(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let provider = DirectConnectionProvider::from_config(config)?;
        Ok(Self::new(SqlTemplate::new(Arc::new(provider))))
    }

    /// Returns the template this repository executes through
    pub fn template(&self) -> &SqlTemplate {
        &self.template
    }

    /// Joins a unit of work
    ///
    /// Every call made through the returned session runs on the unit of
    /// work's connection and becomes part of its transaction.
    pub fn session<'a>(&'a self, uow: &'a mut UnitOfWork) -> MemberSession<'a> {
        MemberSession { repository: self, uow }
    }

    /// Inserts a new member
    ///
    /// # Returns
    ///
    /// The member as saved
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Persistence` with kind `DuplicateKey` if the id
    /// is taken
    pub async fn save(&self, member: &Member) -> Result<Member, DatabaseError> {
        self.save_in(None, member).await
    }

    /// Retrieves a member by id
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no row matches
    pub async fn find_by_id(&self, member_id: &MemberId) -> Result<Member, DatabaseError> {
        self.find_in(None, member_id).await
    }

    /// Sets a member's balance
    ///
    /// # Returns
    ///
    /// The number of rows affected, which is zero for an unknown id
    pub async fn update(&self, member_id: &MemberId, money: i32) -> Result<u64, DatabaseError> {
        self.update_in(None, member_id, money).await
    }

    /// Removes a member
    ///
    /// # Returns
    ///
    /// The number of rows affected, which is zero for an unknown id
    pub async fn delete(&self, member_id: &MemberId) -> Result<u64, DatabaseError> {
        self.delete_in(None, member_id).await
    }

    #[instrument(skip_all, fields(member_id = %member.member_id(), in_unit_of_work = uow.is_some()))]
    async fn save_in(&self, uow: Option<&mut UnitOfWork>, member: &Member) -> Result<Member, DatabaseError> {
        let params = [
            SqlValue::from(member.member_id().as_str()),
            SqlValue::from(member.money()),
        ];
        self.template.update(uow, INSERT_MEMBER, &params).await?;
        Ok(member.clone())
    }

    #[instrument(skip_all, fields(member_id = %member_id, in_unit_of_work = uow.is_some()))]
    async fn find_in(&self, uow: Option<&mut UnitOfWork>, member_id: &MemberId) -> Result<Member, DatabaseError> {
        self.template
            .query_for_optional(uow, SELECT_MEMBER, &[SqlValue::from(member_id.as_str())], row_to_member)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Member", member_id))
    }

    #[instrument(skip_all, fields(member_id = %member_id, in_unit_of_work = uow.is_some()))]
    async fn update_in(
        &self,
        uow: Option<&mut UnitOfWork>,
        member_id: &MemberId,
        money: i32,
    ) -> Result<u64, DatabaseError> {
        let params = [SqlValue::from(money), SqlValue::from(member_id.as_str())];
        let rows = self.template.update(uow, UPDATE_MONEY, &params).await?;
        info!(rows_affected = rows, "updated member balance");
        Ok(rows)
    }

    #[instrument(skip_all, fields(member_id = %member_id, in_unit_of_work = uow.is_some()))]
    async fn delete_in(&self, uow: Option<&mut UnitOfWork>, member_id: &MemberId) -> Result<u64, DatabaseError> {
        let rows = self
            .template
            .update(uow, DELETE_MEMBER, &[SqlValue::from(member_id.as_str())])
            .await?;
        info!(rows_affected = rows, "deleted member");
        Ok(rows)
    }
}

/// A member repository joined to one unit of work
#[derive(Debug)]
pub struct MemberSession<'a> {
    repository: &'a MemberRepository,
    uow: &'a mut UnitOfWork,
}

impl MemberSession<'_> {
    pub async fn save(&mut self, member: &Member) -> Result<Member, DatabaseError> {
        self.repository.save_in(Some(&mut *self.uow), member).await
    }

    pub async fn find_by_id(&mut self, member_id: &MemberId) -> Result<Member, DatabaseError> {
        self.repository.find_in(Some(&mut *self.uow), member_id).await
    }

    pub async fn update(&mut self, member_id: &MemberId, money: i32) -> Result<u64, DatabaseError> {
        self.repository.update_in(Some(&mut *self.uow), member_id, money).await
    }

    pub async fn delete(&mut self, member_id: &MemberId) -> Result<u64, DatabaseError> {
        self.repository.delete_in(Some(&mut *self.uow), member_id).await
    }
}

/// Maps a `member` row into a [`Member`]
///
/// # Errors
///
/// Returns `sqlx::Error::ColumnNotFound` or `sqlx::Error::ColumnDecode` for a
/// malformed row and `sqlx::Error::Decode` for an id that fails validation
pub fn row_to_member(row: &SqliteRow) -> Result<Member, sqlx::Error> {
    let member_id: String = row.try_get("member_id")?;
    let money: i32 = row.try_get("money")?;

    Member::new(member_id, money).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
