// ==========================================
// Gestão de Obras - Camada de API
// ==========================================
// Responsabilidade: operações de orçamento para a interface
// ==========================================

pub mod budget_api;
pub mod error;

// Reexportações principais
pub use budget_api::{ApprovalCheck, BudgetApi};
pub use error::{ApiError, ApiResult};
