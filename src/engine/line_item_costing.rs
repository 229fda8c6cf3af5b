// ==========================================
// Gestão de Obras - Custeio de itens
// ==========================================
// Responsabilidade: subtotal do item, regra do peso,
// encargos sociais da mão de obra, participação percentual
// Entrada: LineItem
// Saída: LineItemCost
// ==========================================

use crate::domain::line_item::LineItem;
use crate::domain::report::LineItemCost;
use crate::domain::types::ItemType;
use crate::engine::amount::{self, AmountResult};
use crate::engine::validation::{join, out_of_range, BudgetValidator, ValidationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Encargos sociais sobre mão de obra (50,72%)
pub const SOCIAL_CHARGES_RATE: Decimal = dec!(50.72);

/// Fator aplicado ao custo base da mão de obra (1 + 50,72 / 100)
pub const SOCIAL_CHARGES_FACTOR: Decimal = dec!(1.5072);

// ==========================================
// LineItemCostingEngine - motor de custeio de itens
// ==========================================
// Sem estado: todos os métodos são funções puras
pub struct LineItemCostingEngine {
    validator: BudgetValidator,
}

impl LineItemCostingEngine {
    pub fn new() -> Self {
        Self {
            validator: BudgetValidator::new(),
        }
    }

    /// Custeia um item validado
    ///
    /// `percentual` sai zerado: só é conhecido depois que todos os
    /// itens da composição foram custeados (ver `apply_shares`).
    pub fn cost(&self, item: &LineItem) -> Result<LineItemCost, ValidationError> {
        self.validator.check_line_item(item)?;
        self.cost_unchecked(item, "")
    }

    /// Custeio sem validação (entrada já validada pelo chamador)
    ///
    /// `prefix` é o caminho do item, usado na violação de estouro.
    pub(crate) fn cost_unchecked(&self, item: &LineItem, prefix: &str) -> Result<LineItemCost, ValidationError> {
        let uses_multiplier = item.uses_multiplier();
        let subtotal = Self::subtotal(item, uses_multiplier, prefix)?;

        Ok(LineItemCost {
            item_type: item.item_type,
            description: item.description.clone(),
            subtotal,
            uses_multiplier,
            charged_cost: Self::charged(item.item_type, subtotal, prefix)?,
            percentual: Decimal::ZERO,
        })
    }

    /// Subtotal base
    ///
    /// - peso aplicável e informado: quantidade × peso × valor unitário
    /// - caso contrário: quantidade × valor unitário
    fn subtotal(item: &LineItem, uses_multiplier: bool, prefix: &str) -> AmountResult {
        let quantity = match item.multiplier_factor {
            Some(factor) if uses_multiplier => amount::mul(item.quantity, factor, prefix, "subtotal")?,
            _ => item.quantity,
        };
        amount::mul(quantity, item.unit_value, prefix, "subtotal")
    }

    /// Custo cobrado: só mão de obra recebe encargos sociais
    ///
    /// None se o valor com encargos estourar a faixa do Decimal.
    pub fn charged_cost(item_type: ItemType, subtotal: Decimal) -> Option<Decimal> {
        match item_type {
            ItemType::Labor => subtotal.checked_mul(SOCIAL_CHARGES_FACTOR),
            ItemType::Material
            | ItemType::Tool
            | ItemType::Consumable
            | ItemType::Mobilization
            | ItemType::ThirdParty
            | ItemType::Other => Some(subtotal),
        }
    }

    fn charged(item_type: ItemType, subtotal: Decimal, prefix: &str) -> AmountResult {
        Self::charged_cost(item_type, subtotal).ok_or_else(|| out_of_range(join(prefix, "chargedCost")))
    }

    /// Preenche a participação de cada item no custo direto da composição
    ///
    /// percentual = custo cobrado / custo direto × 100 (0 se custo direto = 0)
    pub fn apply_shares(&self, costs: &mut [LineItemCost], custo_directo: Decimal) -> Result<(), ValidationError> {
        for cost in costs.iter_mut() {
            cost.percentual = amount::share(cost.charged_cost, custo_directo, "", "percentual")?;
        }
        Ok(())
    }
}

impl Default for LineItemCostingEngine {
    fn default() -> Self {
        Self::new()
    }
}
