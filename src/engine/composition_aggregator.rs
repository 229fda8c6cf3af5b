// ==========================================
// Gestão de Obras - Agregador de composições
// ==========================================
// Entrada: Composition
// Saída: CompositionBreakdown (itens custeados + totais)
// ==========================================
// custoDirecto = Σ custo cobrado
// bdiValor     = custoDirecto × BDI% / 100
// subtotal     = custoDirecto + bdiValor
// ==========================================

use crate::domain::composition::Composition;
use crate::domain::report::{CompositionBreakdown, CompositionTotals};
use crate::engine::amount;
use crate::engine::line_item_costing::LineItemCostingEngine;
use crate::engine::validation::{join, out_of_range, BudgetValidator, ValidationError};
use rust_decimal::Decimal;
use tracing::debug;

pub struct CompositionAggregator {
    costing: LineItemCostingEngine,
    validator: BudgetValidator,
}

impl CompositionAggregator {
    pub fn new() -> Self {
        Self {
            costing: LineItemCostingEngine::new(),
            validator: BudgetValidator::new(),
        }
    }

    /// Agrega uma composição (valida antes)
    pub fn aggregate(&self, composition: &Composition) -> Result<CompositionBreakdown, ValidationError> {
        self.validator.check_composition(composition)?;
        self.aggregate_unchecked(composition, "")
    }

    /// Agregação sem validação (entrada já validada pelo chamador)
    ///
    /// `prefix` é o caminho da composição (ex.: compositions[2]).
    pub(crate) fn aggregate_unchecked(
        &self,
        composition: &Composition,
        prefix: &str,
    ) -> Result<CompositionBreakdown, ValidationError> {
        let mut items = Vec::with_capacity(composition.items.len());
        for (index, item) in composition.items.iter().enumerate() {
            let item_prefix = join(prefix, &format!("items[{}]", index));
            items.push(self.costing.cost_unchecked(item, &item_prefix)?);
        }

        let custo_directo = items.iter().try_fold(Decimal::ZERO, |acc, c| {
            amount::add(acc, c.charged_cost, prefix, "custoDirecto")
        })?;
        self.costing.apply_shares(&mut items, custo_directo)?;

        let bdi_percent_total = composition
            .bdi
            .total_percent()
            .ok_or_else(|| out_of_range(join(prefix, "bdiPercentTotal")))?;
        let totals = Self::totals_at(prefix, custo_directo, bdi_percent_total)?;

        debug!(
            composition = %composition.name,
            items = items.len(),
            custo_directo = %custo_directo,
            bdi_percent = %totals.bdi_percent_total,
            "composição agregada"
        );

        Ok(CompositionBreakdown {
            name: composition.name.clone(),
            composition_type: composition.composition_type,
            profit_margin: composition.profit_margin,
            items,
            totals,
        })
    }

    /// Totais a partir do custo direto e do BDI total (%)
    pub fn totals(custo_directo: Decimal, bdi_percent_total: Decimal) -> Result<CompositionTotals, ValidationError> {
        Self::totals_at("", custo_directo, bdi_percent_total)
    }

    fn totals_at(
        prefix: &str,
        custo_directo: Decimal,
        bdi_percent_total: Decimal,
    ) -> Result<CompositionTotals, ValidationError> {
        let bdi_valor = amount::percent_of(custo_directo, bdi_percent_total, prefix, "bdiValor")?;
        Ok(CompositionTotals {
            custo_directo,
            bdi_percent_total,
            bdi_valor,
            subtotal: amount::add(custo_directo, bdi_valor, prefix, "subtotal")?,
        })
    }
}

impl Default for CompositionAggregator {
    fn default() -> Self {
        Self::new()
    }
}
