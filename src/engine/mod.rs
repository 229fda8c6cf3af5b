// ==========================================
// Gestão de Obras - Camada de motores
// ==========================================
// Responsabilidade: regras de custeio, BDI, tributos e DRE
// Regra: funções puras; sem E/S, sem repositório
// ==========================================
// Fluxo: item → composição → orçamento → DRE
// ==========================================

mod amount;
pub mod budget_aggregator;
pub mod calculator;
pub mod composition_aggregator;
pub mod dre;
pub mod line_item_costing;
pub mod validation;

// Reexportações principais
pub use budget_aggregator::BudgetAggregator;
pub use calculator::BudgetCalculator;
pub use composition_aggregator::CompositionAggregator;
pub use dre::{DreDeriver, GOOD_MARGIN_THRESHOLD, LOW_MARGIN_THRESHOLD};
pub use line_item_costing::{LineItemCostingEngine, SOCIAL_CHARGES_FACTOR, SOCIAL_CHARGES_RATE};
pub use validation::{
    BudgetValidator, DegenerateInputWarning, ValidationError, ValidationViolation,
};
