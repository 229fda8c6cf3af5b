// ==========================================
// Gestão de Obras - Camada de domínio
// ==========================================
// Responsabilidade: entidades, tipos e resultados derivados
// Regra: sem acesso a dados, sem lógica de motor
// ==========================================

pub mod budget;
pub mod composition;
pub mod line_item;
pub mod report;
pub mod types;

// Reexportações principais
pub use budget::{Budget, BudgetRecord, TaxConfig, DEFAULT_ISS_RATE, DEFAULT_SIMPLES_RATE};
pub use composition::{BdiProfile, Composition};
pub use line_item::LineItem;
pub use report::{
    round_presentation, BudgetReport, BudgetTotals, CompositionBreakdown, CompositionTotals,
    DegenerateInputWarning, Dre, DreCompositionRow, ItemTypeCost, LineItemCost,
};
pub use types::{BudgetType, CalculationBasis, CompositionType, ItemType, Viability};
