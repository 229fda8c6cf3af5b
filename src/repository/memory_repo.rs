// ==========================================
// Gestão de Obras - Repositório em memória
// ==========================================
// Mesmo contrato do repositório SQLite; usado em
// pré-visualizações e testes
// ==========================================

use crate::domain::budget::BudgetRecord;
use crate::repository::budget_repo::BudgetRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct InMemoryBudgetRepository {
    records: Mutex<HashMap<String, BudgetRecord>>,
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> RepositoryResult<MutexGuard<'_, HashMap<String, BudgetRecord>>> {
        self.records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

fn not_found(budget_id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Budget".to_string(),
        id: budget_id.to_string(),
    }
}

impl BudgetRepository for InMemoryBudgetRepository {
    fn insert(&self, record: &BudgetRecord) -> RepositoryResult<()> {
        let mut records = self.records()?;
        if records.contains_key(&record.budget_id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "budget_id={}",
                record.budget_id
            )));
        }
        records.insert(record.budget_id.clone(), record.clone());
        Ok(())
    }

    fn find_by_id(&self, budget_id: &str) -> RepositoryResult<Option<BudgetRecord>> {
        Ok(self.records()?.get(budget_id).cloned())
    }

    fn list_all(&self) -> RepositoryResult<Vec<BudgetRecord>> {
        let mut all: Vec<BudgetRecord> = self.records()?.values().cloned().collect();
        all.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.budget_id.cmp(&b.budget_id))
        });
        Ok(all)
    }

    fn update(&self, record: &BudgetRecord) -> RepositoryResult<()> {
        let mut records = self.records()?;
        match records.get_mut(&record.budget_id) {
            Some(existing) => {
                existing.title = record.title.clone();
                existing.budget = record.budget.clone();
                existing.updated_at = record.updated_at;
                Ok(())
            }
            None => Err(not_found(&record.budget_id)),
        }
    }

    fn delete(&self, budget_id: &str) -> RepositoryResult<()> {
        self.records()?
            .remove(budget_id)
            .map(|_| ())
            .ok_or_else(|| not_found(budget_id))
    }
}
