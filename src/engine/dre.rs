// ==========================================
// Gestão de Obras - DRE (Demonstrativo de Resultado)
// ==========================================
// Entrada: BudgetTotals + composições agregadas
// Saída: Dre (receitas, lucros, margens, viabilidade, abertura)
// ==========================================
// Regra: lucro líquido é residual; a margem de lucro
// informada na composição NÃO entra neste cálculo
// Regra: margem líquida usa o subtotal como denominador
// (a margem bruta usa a receita líquida)
// ==========================================

use crate::domain::report::{BudgetTotals, CompositionBreakdown, Dre, DreCompositionRow};
use crate::domain::types::Viability;
use crate::engine::amount;
use crate::engine::validation::ValidationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Abaixo desta margem líquida (%) o orçamento tem margem baixa
pub const LOW_MARGIN_THRESHOLD: Decimal = dec!(5);

/// A partir desta margem líquida (%) o orçamento é classificado como bom
pub const GOOD_MARGIN_THRESHOLD: Decimal = dec!(15);

const PREFIX: &str = "dre";

pub struct DreDeriver;

impl DreDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Deriva a DRE a partir dos totais do orçamento
    pub fn derive(&self, totals: &BudgetTotals, compositions: &[CompositionBreakdown]) -> Result<Dre, ValidationError> {
        let receita_bruta = totals.subtotal;
        let receita_liquida = amount::sub(totals.subtotal, totals.tributos_total, PREFIX, "receitaLiquida")?;
        let lucro_bruto = amount::sub(receita_liquida, totals.custo_directo_total, PREFIX, "lucroBruto")?;
        let margem_bruta = amount::share(lucro_bruto, receita_liquida, PREFIX, "margemBruta")?;

        let lucro_liquido = amount::sub(lucro_bruto, totals.bdi_total, PREFIX, "lucroLiquido")?;
        let margem_liquida = amount::share(lucro_liquido, totals.subtotal, PREFIX, "margemLiquida")?;

        let viability = Self::classify(lucro_liquido, margem_liquida);

        Ok(Dre {
            receita_bruta,
            tributos_total: totals.tributos_total,
            receita_liquida,
            custo_directo_total: totals.custo_directo_total,
            lucro_bruto,
            margem_bruta,
            bdi_total: totals.bdi_total,
            lucro_liquido,
            margem_liquida,
            viability,
            viability_label: viability.label(),
            rows: self.rows(totals, compositions)?,
        })
    }

    /// Classificação de viabilidade
    ///
    /// 1) lucro líquido < 0        → Prejuízo
    /// 2) margem < 5               → Margem Baixa
    /// 3) 5 <= margem < 15         → Aceitável
    /// 4) margem >= 15             → Bom
    pub fn classify(lucro_liquido: Decimal, margem_liquida: Decimal) -> Viability {
        if lucro_liquido < Decimal::ZERO {
            Viability::Prejuizo
        } else if margem_liquida < LOW_MARGIN_THRESHOLD {
            Viability::MargemBaixa
        } else if margem_liquida < GOOD_MARGIN_THRESHOLD {
            Viability::Aceitavel
        } else {
            Viability::Bom
        }
    }

    /// Linhas de abertura por composição (participação no custo e no BDI)
    fn rows(
        &self,
        totals: &BudgetTotals,
        compositions: &[CompositionBreakdown],
    ) -> Result<Vec<DreCompositionRow>, ValidationError> {
        compositions
            .iter()
            .enumerate()
            .map(|(index, c)| {
                let prefix = format!("dre.rows[{}]", index);
                Ok(DreCompositionRow {
                    name: c.name.clone(),
                    composition_type: c.composition_type,
                    custo_directo: c.totals.custo_directo,
                    bdi_valor: c.totals.bdi_valor,
                    subtotal: c.totals.subtotal,
                    percentual_custo: amount::share(
                        c.totals.custo_directo,
                        totals.custo_directo_total,
                        &prefix,
                        "percentualCusto",
                    )?,
                    percentual_bdi: amount::share(c.totals.bdi_valor, totals.bdi_total, &prefix, "percentualBDI")?,
                    profit_margin: c.profit_margin,
                })
            })
            .collect()
    }
}

impl Default for DreDeriver {
    fn default() -> Self {
        Self::new()
    }
}
