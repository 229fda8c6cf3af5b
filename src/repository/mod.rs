// ==========================================
// Gestão de Obras - Camada de repositório
// ==========================================
// Regra: repositório não contém regra de negócio
// ==========================================
// Responsabilidade: persistir snapshots de orçamento
// Restrição: consultas sempre parametrizadas
// ==========================================

pub mod budget_repo;
pub mod error;
pub mod memory_repo;

// Reexportações principais
pub use budget_repo::{BudgetRepository, SqliteBudgetRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use memory_repo::InMemoryBudgetRepository;
