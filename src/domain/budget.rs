// ==========================================
// Gestão de Obras - Orçamento (raiz de agregação)
// ==========================================
// Totais derivados são recalculados a cada alteração,
// nunca persistidos como estado independente
// ==========================================

use crate::domain::composition::Composition;
use crate::domain::types::BudgetType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Alíquota padrão de ISS (%)
pub const DEFAULT_ISS_RATE: Decimal = dec!(5);

/// Alíquota padrão do Simples Nacional (%)
pub const DEFAULT_SIMPLES_RATE: Decimal = dec!(6);

// ==========================================
// TaxConfig - configuração de tributos
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    #[serde(rename = "hasISS")]
    pub has_iss: bool,         // incide ISS
    pub iss_rate: Decimal,     // alíquota ISS (%)
    pub simples_rate: Decimal, // alíquota Simples (%)
}

impl TaxConfig {
    pub fn new(has_iss: bool, iss_rate: Decimal, simples_rate: Decimal) -> Self {
        Self {
            has_iss,
            iss_rate,
            simples_rate,
        }
    }

    /// Alíquota efetiva (%): ISS só conta quando incide
    ///
    /// None se a soma estourar a faixa do Decimal.
    pub fn effective_rate(&self) -> Option<Decimal> {
        let iss = if self.has_iss { self.iss_rate } else { Decimal::ZERO };
        iss.checked_add(self.simples_rate)
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            has_iss: true,
            iss_rate: DEFAULT_ISS_RATE,
            simples_rate: DEFAULT_SIMPLES_RATE,
        }
    }
}

// ==========================================
// Budget - orçamento
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub budget_type: BudgetType,        // serviço / produto
    #[serde(default)]
    pub compositions: Vec<Composition>, // composições (posse exclusiva)
    #[serde(default)]
    pub tax_config: TaxConfig,          // tributos
}

impl Budget {
    pub fn new(budget_type: BudgetType, tax_config: TaxConfig) -> Self {
        Self {
            budget_type,
            compositions: Vec::new(),
            tax_config,
        }
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.compositions.push(composition);
        self
    }

    pub fn item_count(&self) -> usize {
        self.compositions.iter().map(|c| c.items.len()).sum()
    }
}

// ==========================================
// BudgetRecord - orçamento armazenado
// ==========================================
// Envelope do repositório: identidade + metadados + snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub budget_id: String,         // UUID v4
    pub title: String,             // título do orçamento
    pub budget: Budget,            // snapshot das entradas
    pub created_at: DateTime<Utc>, // criado em
    pub updated_at: DateTime<Utc>, // atualizado em
}

impl BudgetRecord {
    /// Novo registro com id gerado
    pub fn new(title: &str, budget: Budget) -> Self {
        let now = Utc::now();
        Self {
            budget_id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            budget,
            created_at: now,
            updated_at: now,
        }
    }
}
