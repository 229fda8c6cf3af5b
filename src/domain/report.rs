// ==========================================
// Gestão de Obras - Resultados derivados do orçamento
// ==========================================
// Custos de item, totais de composição, totais do orçamento,
// DRE (Demonstrativo de Resultado) e relatório consolidado.
// ==========================================
// Regra: valores mantêm precisão total; arredondamento
// somente na fronteira de saída (BudgetReport::rounded)
// ==========================================

use crate::domain::types::{CompositionType, ItemType, Viability};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Casas decimais de apresentação (moeda e percentuais)
pub const PRESENTATION_DECIMALS: u32 = 2;

/// Arredonda para a apresentação (meio para longe do zero)
pub fn round_presentation(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRESENTATION_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

// ==========================================
// LineItemCost - custo de um item
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemCost {
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subtotal: Decimal,        // custo base
    pub uses_multiplier: bool, // regra do peso aplicada
    pub charged_cost: Decimal,    // custo com encargos (mão de obra) ou igual ao subtotal
    pub percentual: Decimal,      // participação no custo direto da composição (%)
}

// ==========================================
// CompositionTotals - totais de uma composição
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionTotals {
    pub custo_directo: Decimal,     // Σ custo cobrado dos itens
    pub bdi_percent_total: Decimal, // soma das quatro parcelas (%)
    pub bdi_valor: Decimal,         // custo direto × BDI / 100
    pub subtotal: Decimal,          // custo direto + BDI
}

// ==========================================
// CompositionBreakdown - abertura por composição
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionBreakdown {
    pub name: String,
    pub composition_type: CompositionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<Decimal>, // repassado sem uso no cálculo
    pub items: Vec<LineItemCost>,
    #[serde(flatten)]
    pub totals: CompositionTotals,
}

// ==========================================
// BudgetTotals - totais do orçamento
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    pub custo_directo_total: Decimal, // Σ custo direto das composições
    pub bdi_total: Decimal,           // Σ BDI das composições
    pub bdi_medio: Decimal,           // BDI médio ponderado pelo custo (%)
    pub subtotal: Decimal,            // preço antes dos tributos
    pub tributos_total: Decimal,      // tributos sobre o subtotal
    pub total_venda: Decimal,         // preço de venda
}

// ==========================================
// DreCompositionRow - linha de abertura da DRE
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreCompositionRow {
    pub name: String,
    pub composition_type: CompositionType,
    pub custo_directo: Decimal,
    pub bdi_valor: Decimal,
    pub subtotal: Decimal,
    pub percentual_custo: Decimal,
    #[serde(rename = "percentualBDI")]
    pub percentual_bdi: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<Decimal>,
}

// ==========================================
// Dre - Demonstrativo de Resultado
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dre {
    pub receita_bruta: Decimal,       // = subtotal
    pub tributos_total: Decimal,
    pub receita_liquida: Decimal,     // receita bruta - tributos
    pub custo_directo_total: Decimal,
    pub lucro_bruto: Decimal,         // receita líquida - custo direto
    pub margem_bruta: Decimal,        // sobre a receita líquida (%)
    pub bdi_total: Decimal,
    pub lucro_liquido: Decimal,       // lucro bruto - BDI
    pub margem_liquida: Decimal,      // sobre o subtotal (%)
    pub viability: Viability,     // código estável (PREJUIZO, MARGEM_BAIXA, ...)
    pub viability_label: String,  // rótulo traduzido no idioma ativo
    pub rows: Vec<DreCompositionRow>,
}

// ==========================================
// ItemTypeCost - custo agrupado por tipo de item
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeCost {
    pub item_type: ItemType,
    pub subtotal: Decimal,
    pub charged_cost: Decimal,
}

// ==========================================
// DegenerateInputWarning - aviso não fatal
// ==========================================
// Orçamento vazio é estado transitório legítimo durante a edição
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DegenerateInputWarning {
    NoCompositions,
    EmptyComposition { index: usize, name: String },
    ZeroCostBudget,
}

impl std::fmt::Display for DegenerateInputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateInputWarning::NoCompositions => write!(f, "orçamento sem composições"),
            DegenerateInputWarning::EmptyComposition { index, name } => {
                write!(f, "composição vazia: compositions[{}] ({})", index, name)
            }
            DegenerateInputWarning::ZeroCostBudget => write!(f, "orçamento com custo zero"),
        }
    }
}

// ==========================================
// BudgetReport - relatório consolidado
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub totals: BudgetTotals,
    pub compositions: Vec<CompositionBreakdown>,
    pub dre: Dre,
    pub cost_by_item_type: Vec<ItemTypeCost>,
    pub encargos_sociais: Decimal, // Σ (custo cobrado - subtotal) da mão de obra
    pub warnings: Vec<DegenerateInputWarning>,
}

impl BudgetReport {
    /// Cópia arredondada para a fronteira de saída
    pub fn rounded(&self) -> BudgetReport {
        let r = round_presentation;

        let compositions = self
            .compositions
            .iter()
            .map(|c| CompositionBreakdown {
                name: c.name.clone(),
                composition_type: c.composition_type,
                profit_margin: c.profit_margin.map(r),
                items: c
                    .items
                    .iter()
                    .map(|i| LineItemCost {
                        item_type: i.item_type,
                        description: i.description.clone(),
                        subtotal: r(i.subtotal),
                        uses_multiplier: i.uses_multiplier,
                        charged_cost: r(i.charged_cost),
                        percentual: r(i.percentual),
                    })
                    .collect(),
                totals: CompositionTotals {
                    custo_directo: r(c.totals.custo_directo),
                    bdi_percent_total: r(c.totals.bdi_percent_total),
                    bdi_valor: r(c.totals.bdi_valor),
                    subtotal: r(c.totals.subtotal),
                },
            })
            .collect();

        let dre = &self.dre;
        let rows = dre
            .rows
            .iter()
            .map(|row| DreCompositionRow {
                name: row.name.clone(),
                composition_type: row.composition_type,
                custo_directo: r(row.custo_directo),
                bdi_valor: r(row.bdi_valor),
                subtotal: r(row.subtotal),
                percentual_custo: r(row.percentual_custo),
                percentual_bdi: r(row.percentual_bdi),
                profit_margin: row.profit_margin.map(r),
            })
            .collect();

        BudgetReport {
            totals: BudgetTotals {
                custo_directo_total: r(self.totals.custo_directo_total),
                bdi_total: r(self.totals.bdi_total),
                bdi_medio: r(self.totals.bdi_medio),
                subtotal: r(self.totals.subtotal),
                tributos_total: r(self.totals.tributos_total),
                total_venda: r(self.totals.total_venda),
            },
            compositions,
            dre: Dre {
                receita_bruta: r(dre.receita_bruta),
                tributos_total: r(dre.tributos_total),
                receita_liquida: r(dre.receita_liquida),
                custo_directo_total: r(dre.custo_directo_total),
                lucro_bruto: r(dre.lucro_bruto),
                margem_bruta: r(dre.margem_bruta),
                bdi_total: r(dre.bdi_total),
                lucro_liquido: r(dre.lucro_liquido),
                margem_liquida: r(dre.margem_liquida),
                // classificação já feita com precisão total
                viability: dre.viability,
                viability_label: dre.viability_label.clone(),
                rows,
            },
            cost_by_item_type: self
                .cost_by_item_type
                .iter()
                .map(|c| ItemTypeCost {
                    item_type: c.item_type,
                    subtotal: r(c.subtotal),
                    charged_cost: r(c.charged_cost),
                })
                .collect(),
            encargos_sociais: r(self.encargos_sociais),
            warnings: self.warnings.clone(),
        }
    }
}
