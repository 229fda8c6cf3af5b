// ==========================================
// Gestão de Obras - Tipos do domínio de orçamentos
// ==========================================
// Categorias fechadas: tipo de item, base de cálculo,
// tipo de composição, tipo de orçamento, viabilidade
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Tipo de item (ItemType)
// ==========================================
// Regra de encargos sociais e regra de peso dependem deste tipo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Material,     // material
    Labor,        // mão de obra
    Tool,         // ferramenta
    Consumable,   // consumível
    Mobilization, // mobilização
    ThirdParty,   // terceiros
    Other,        // outros
}

impl ItemType {
    /// Todos os tipos, na ordem de apresentação
    pub const ALL: [ItemType; 7] = [
        ItemType::Material,
        ItemType::Labor,
        ItemType::Tool,
        ItemType::Consumable,
        ItemType::Mobilization,
        ItemType::ThirdParty,
        ItemType::Other,
    ];

    /// Código estável (igual ao formato serializado)
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Material => "material",
            ItemType::Labor => "labor",
            ItemType::Tool => "tool",
            ItemType::Consumable => "consumable",
            ItemType::Mobilization => "mobilization",
            ItemType::ThirdParty => "third_party",
            ItemType::Other => "other",
        }
    }

    /// Converte a partir do código
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Rótulo traduzido para exibição
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("item_type.{}", self.as_str()))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Base de cálculo (CalculationBasis)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculationBasis {
    Weight,       // peso
    LaborHours,   // homem-hora
    MachineHours, // hora-máquina
    Unit,         // unidade
    LinearMeter,  // metro linear
    SquareMeter,  // metro quadrado
}

impl CalculationBasis {
    pub const ALL: [CalculationBasis; 6] = [
        CalculationBasis::Weight,
        CalculationBasis::LaborHours,
        CalculationBasis::MachineHours,
        CalculationBasis::Unit,
        CalculationBasis::LinearMeter,
        CalculationBasis::SquareMeter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationBasis::Weight => "weight",
            CalculationBasis::LaborHours => "laborHours",
            CalculationBasis::MachineHours => "machineHours",
            CalculationBasis::Unit => "unit",
            CalculationBasis::LinearMeter => "linearMeter",
            CalculationBasis::SquareMeter => "squareMeter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == s)
    }

    /// Bases horárias usam o fator multiplicador (peso)
    pub fn is_hourly(&self) -> bool {
        matches!(self, CalculationBasis::LaborHours | CalculationBasis::MachineHours)
    }
}

impl fmt::Display for CalculationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Tipo de composição (CompositionType)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionType {
    Mobilization,     // mobilização
    Demobilization,   // desmobilização
    FabricationLabor, // mão de obra de fabricação
    AssemblyLabor,    // mão de obra de montagem
    BlastingPainting, // jateamento e pintura
    Tools,            // ferramentas
    Consumables,      // consumíveis
    Materials,        // materiais
}

impl CompositionType {
    pub const ALL: [CompositionType; 8] = [
        CompositionType::Mobilization,
        CompositionType::Demobilization,
        CompositionType::FabricationLabor,
        CompositionType::AssemblyLabor,
        CompositionType::BlastingPainting,
        CompositionType::Tools,
        CompositionType::Consumables,
        CompositionType::Materials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionType::Mobilization => "mobilization",
            CompositionType::Demobilization => "demobilization",
            CompositionType::FabricationLabor => "fabrication_labor",
            CompositionType::AssemblyLabor => "assembly_labor",
            CompositionType::BlastingPainting => "blasting_painting",
            CompositionType::Tools => "tools",
            CompositionType::Consumables => "consumables",
            CompositionType::Materials => "materials",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn label(&self) -> String {
        crate::i18n::t(&format!("composition_type.{}", self.as_str()))
    }
}

impl fmt::Display for CompositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Tipo de orçamento (BudgetType)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    Service, // serviço
    Product, // produto
}

impl BudgetType {
    pub const ALL: [BudgetType; 2] = [BudgetType::Service, BudgetType::Product];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetType::Service => "service",
            BudgetType::Product => "product",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Viabilidade (Viability)
// ==========================================
// Ordem: Prejuizo < MargemBaixa < Aceitavel < Bom
// Lida pelo fluxo de aprovação para sinalizar risco
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Viability {
    Prejuizo,    // lucro líquido negativo
    MargemBaixa, // 0 <= margem < 5
    Aceitavel,   // 5 <= margem < 15
    Bom,         // margem >= 15
}

impl Viability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Viability::Prejuizo => "PREJUIZO",
            Viability::MargemBaixa => "MARGEM_BAIXA",
            Viability::Aceitavel => "ACEITAVEL",
            Viability::Bom => "BOM",
        }
    }

    /// Rótulo traduzido ("Prejuízo", "Margem Baixa", ...)
    ///
    /// O relatório leva o código estável (`viability`) e este rótulo
    /// (`viabilityLabel`) lado a lado.
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("viability.{}", self.as_str().to_lowercase()))
    }

    /// Somente Aceitável e Bom seguem para aprovação sem ressalva
    pub fn is_approvable(&self) -> bool {
        matches!(self, Viability::Aceitavel | Viability::Bom)
    }
}

impl fmt::Display for Viability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_parse_back() {
        for t in ItemType::ALL {
            assert_eq!(ItemType::from_str(t.as_str()), Some(t));
        }
        for b in CalculationBasis::ALL {
            assert_eq!(CalculationBasis::from_str(b.as_str()), Some(b));
        }
        for t in CompositionType::ALL {
            assert_eq!(CompositionType::from_str(t.as_str()), Some(t));
        }
        for t in BudgetType::ALL {
            assert_eq!(BudgetType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(ItemType::from_str("unknown"), None);
        assert_eq!(CompositionType::from_str("Materials"), None);
        assert_eq!(BudgetType::from_str(""), None);
    }

    #[test]
    fn test_codes_match_serde_names() {
        for t in CompositionType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        for b in CalculationBasis::ALL {
            let json = serde_json::to_string(&b).unwrap();
            assert_eq!(json, format!("\"{}\"", b.as_str()));
        }
    }

    #[test]
    fn test_serde_names_match_wire_format() {
        let json = serde_json::to_string(&ItemType::ThirdParty).unwrap();
        assert_eq!(json, "\"third_party\"");

        let basis: CalculationBasis = serde_json::from_str("\"machineHours\"").unwrap();
        assert_eq!(basis, CalculationBasis::MachineHours);

        let ct: CompositionType = serde_json::from_str("\"blasting_painting\"").unwrap();
        assert_eq!(ct, CompositionType::BlastingPainting);
    }

    #[test]
    fn test_viability_order_and_approval() {
        assert!(Viability::Prejuizo < Viability::MargemBaixa);
        assert!(Viability::Aceitavel < Viability::Bom);
        assert!(!Viability::Prejuizo.is_approvable());
        assert!(!Viability::MargemBaixa.is_approvable());
        assert!(Viability::Aceitavel.is_approvable());
        assert!(Viability::Bom.is_approvable());
    }
}
