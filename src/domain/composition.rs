// ==========================================
// Gestão de Obras - Composição de custos
// ==========================================
// Grupo nomeado de itens que compartilham um perfil de BDI
// ==========================================

use crate::domain::line_item::LineItem;
use crate::domain::types::CompositionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// BdiProfile - Benefícios e Despesas Indiretas
// ==========================================
// Quatro percentuais (escala 0-100), somados sem composição
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BdiProfile {
    #[serde(alias = "admin", alias = "administrativo")]
    pub administrative: Decimal, // despesas administrativas
    #[serde(alias = "comercial")]
    pub commercial: Decimal,     // despesas comerciais
    #[serde(alias = "financeiro")]
    pub financial: Decimal,      // despesas financeiras
    #[serde(alias = "impostos")]
    pub indirect_taxes: Decimal, // impostos indiretos
}

impl BdiProfile {
    pub fn new(administrative: Decimal, commercial: Decimal, financial: Decimal, indirect_taxes: Decimal) -> Self {
        Self {
            administrative,
            commercial,
            financial,
            indirect_taxes,
        }
    }

    /// BDI total (%) = soma simples das quatro parcelas
    ///
    /// None se a soma estourar a faixa do Decimal.
    pub fn total_percent(&self) -> Option<Decimal> {
        self.administrative
            .checked_add(self.commercial)?
            .checked_add(self.financial)?
            .checked_add(self.indirect_taxes)
    }

    /// Parcelas nomeadas, para validação campo a campo
    pub fn parts(&self) -> [(&'static str, Decimal); 4] {
        [
            ("administrative", self.administrative),
            ("commercial", self.commercial),
            ("financial", self.financial),
            ("indirectTaxes", self.indirect_taxes),
        ]
    }
}

// ==========================================
// Composition - composição
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub name: String,                     // nome
    pub composition_type: CompositionType, // tipo da composição
    #[serde(default)]
    pub items: Vec<LineItem>,             // itens (posse exclusiva)
    #[serde(default)]
    pub bdi: BdiProfile,                  // perfil de BDI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<Decimal>,   // margem de lucro (apenas registro, não entra na DRE)
}

impl Composition {
    pub fn new(name: &str, composition_type: CompositionType, bdi: BdiProfile) -> Self {
        Self {
            name: name.to_string(),
            composition_type,
            items: Vec::new(),
            bdi,
            profit_margin: None,
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_profit_margin(mut self, margin: Decimal) -> Self {
        self.profit_margin = Some(margin);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
