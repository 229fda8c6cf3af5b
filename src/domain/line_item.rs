// ==========================================
// Gestão de Obras - Item de composição
// ==========================================
// Um componente de custo dentro de uma composição.
// Pertence exclusivamente à sua composição.
// ==========================================

use crate::domain::types::{CalculationBasis, ItemType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// LineItem - item de custo
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_type: ItemType,                          // tipo do item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,                  // descrição livre (apenas registro)
    pub quantity: Decimal,                            // quantidade
    pub unit_value: Decimal,                          // valor unitário
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier_factor: Option<Decimal>,           // fator multiplicador ("peso")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_basis: Option<CalculationBasis>,  // base de cálculo
}

impl LineItem {
    pub fn new(item_type: ItemType, quantity: Decimal, unit_value: Decimal) -> Self {
        Self {
            item_type,
            description: None,
            quantity,
            unit_value,
            multiplier_factor: None,
            calculation_basis: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_multiplier(mut self, factor: Decimal) -> Self {
        self.multiplier_factor = Some(factor);
        self
    }

    pub fn with_basis(mut self, basis: CalculationBasis) -> Self {
        self.calculation_basis = Some(basis);
        self
    }

    /// Regra do peso: base horária (homem-hora / hora-máquina) ou mobilização
    pub fn uses_multiplier(&self) -> bool {
        self.calculation_basis.map_or(false, |b| b.is_hourly())
            || self.item_type == ItemType::Mobilization
    }
}
