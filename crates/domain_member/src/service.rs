//! Member domain services

use std::sync::Arc;

use core_kernel::{Member, MemberId};
use infra_db::{
    ConnectionProvider, DatabasePool, MemberRepository, PooledConnectionProvider, SqlTemplate,
    TransactionManager, UnitOfWork,
};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::error::TransferError;

/// Balances of both members after a completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from: Member,
    pub to: Member,
    pub amount: i32,
}

/// Service for operations that touch several members at once
///
/// The repository and the transaction manager should share one provider so
/// that repository calls made outside a transfer see the same database.
#[derive(Debug, Clone)]
pub struct MemberService {
    repository: MemberRepository,
    transactions: TransactionManager,
}

impl MemberService {
    pub fn new(repository: MemberRepository, transactions: TransactionManager) -> Self {
        Self {
            repository,
            transactions,
        }
    }

    /// Creates a service whose repository and units of work draw from `pool`
    pub fn pooled(pool: DatabasePool) -> Self {
        let provider: Arc<dyn ConnectionProvider> = Arc::new(PooledConnectionProvider::new(pool));
        Self::new(
            MemberRepository::new(SqlTemplate::new(Arc::clone(&provider))),
            TransactionManager::new(provider),
        )
    }

    /// Returns the repository used outside of transfers
    pub fn repository(&self) -> &MemberRepository {
        &self.repository
    }

    /// Moves `amount` from one member's balance to another's
    ///
    /// Both balances change in one unit of work. If any step fails the unit
    /// of work is rolled back, so a debit is never visible without its
    /// matching credit.
    ///
    /// # Arguments
    ///
    /// * `from` - Member whose balance is debited
    /// * `to` - Member whose balance is credited
    /// * `amount` - Strictly positive amount to move
    ///
    /// # Errors
    ///
    /// - `TransferError::InvalidAmount` / `SameAccount` before touching the database
    /// - `TransferError::InsufficientFunds` if the sender cannot cover `amount`
    /// - `TransferError::BalanceOverflow` if the recipient's balance would overflow
    /// - `TransferError::Database` for unknown members and storage failures
    #[instrument(skip(self))]
    pub async fn account_transfer(
        &self,
        from: &MemberId,
        to: &MemberId,
        amount: i32,
    ) -> Result<TransferReceipt, TransferError> {
        if amount <= 0 {
            return Err(TransferError::InvalidAmount(amount));
        }
        if from == to {
            return Err(TransferError::SameAccount(from.clone()));
        }

        let mut uow = self.transactions.begin().await?;

        match self.transfer_in(&mut uow, from, to, amount).await {
            Ok(receipt) => {
                uow.commit().await?;
                info!(
                    from_balance = receipt.from.money(),
                    to_balance = receipt.to.money(),
                    "transfer committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                if let Err(rollback_error) = uow.rollback().await {
                    error!(error = %rollback_error, "failed to roll back transfer");
                }
                Err(e)
            }
        }
    }

    async fn transfer_in(
        &self,
        uow: &mut UnitOfWork,
        from: &MemberId,
        to: &MemberId,
        amount: i32,
    ) -> Result<TransferReceipt, TransferError> {
        let mut session = self.repository.session(uow);

        let sender = session.find_by_id(from).await?;
        let recipient = session.find_by_id(to).await?;

        if sender.money() < amount {
            return Err(TransferError::InsufficientFunds {
                member_id: from.clone(),
                balance: sender.money(),
                requested: amount,
            });
        }

        // cannot underflow: 0 < amount <= balance
        let debited = sender.money() - amount;
        session.update(from, debited).await?;

        let credited = recipient
            .money()
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow {
                member_id: to.clone(),
            })?;
        session.update(to, credited).await?;

        Ok(TransferReceipt {
            from: sender.with_money(debited),
            to: recipient.with_money(credited),
            amount,
        })
    }
}
