use async_trait::async_trait;
use log::{debug, error};
use std::sync::Arc;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionPage, TransactionQuery, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::summaries::SummaryServiceTrait;

/// Service for recording transactions.
///
/// The transaction write commits first; summary maintenance runs afterwards
/// and its failure is returned to the caller even though the write stands.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    summary_service: Arc<dyn SummaryServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        summary_service: Arc<dyn SummaryServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            summary_service,
            event_sink,
        }
    }

    async fn after_change(
        &self,
        old: Option<&Transaction>,
        new: Option<&Transaction>,
    ) -> Result<()> {
        let keys = self
            .summary_service
            .handle_transaction_change(old, new)
            .await
            .inspect_err(|e| {
                let id = new.or(old).map(|t| t.id.as_str()).unwrap_or_default();
                error!("Transaction {} committed but summaries are stale: {}", id, e);
            })?;

        if let Some(user_id) = new.or(old).map(|t| t.user_id.clone()) {
            let dates = keys.iter().map(|k| k.date).collect();
            self.event_sink
                .emit(DomainEvent::transactions_changed(user_id, dates));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, transaction_id: &str, user_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id, user_id)
    }

    fn search_transactions(
        &self,
        user_id: &str,
        query: &TransactionQuery,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<TransactionPage> {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(Error::invalid_input(format!("Page {} is out of range", page)));
        }
        self.repository.search(user_id, query, page, page_size)
    }

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;
        debug!(
            "Creating {} transaction for user {}",
            new_transaction.transaction_type, new_transaction.user_id
        );
        let created = self.repository.create(new_transaction).await?;
        self.after_change(None, Some(&created)).await?;
        Ok(created)
    }

    async fn update_transaction(
        &self,
        transaction_update: TransactionUpdate,
    ) -> Result<Transaction> {
        transaction_update.validate()?;
        let previous = self
            .repository
            .get_by_id(&transaction_update.id, &transaction_update.user_id)?;
        let updated = self.repository.update(transaction_update).await?;
        self.after_change(Some(&previous), Some(&updated)).await?;
        Ok(updated)
    }

    async fn delete_transaction(&self, transaction_id: &str, user_id: &str) -> Result<Transaction> {
        let deleted = self.repository.delete(transaction_id, user_id).await?;
        self.after_change(Some(&deleted), None).await?;
        Ok(deleted)
    }
}
