// ==========================================
// Gestão de Obras - Calculadora do orçamento
// ==========================================
// Encadeia: validação → itens → composições → orçamento → DRE
// Recalculada por inteiro a cada alteração confirmada;
// sem cache, sem estado compartilhado
// ==========================================

use crate::domain::budget::Budget;
use crate::domain::report::{
    BudgetReport, CompositionBreakdown, DegenerateInputWarning, ItemTypeCost,
};
use crate::domain::types::ItemType;
use crate::engine::amount;
use crate::engine::budget_aggregator::BudgetAggregator;
use crate::engine::composition_aggregator::CompositionAggregator;
use crate::engine::dre::DreDeriver;
use crate::engine::validation::{BudgetValidator, ValidationError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

// ==========================================
// BudgetCalculator - orquestrador do cálculo
// ==========================================
pub struct BudgetCalculator {
    validator: BudgetValidator,
    composition_aggregator: CompositionAggregator,
    budget_aggregator: BudgetAggregator,
    dre_deriver: DreDeriver,
}

impl BudgetCalculator {
    pub fn new() -> Self {
        Self {
            validator: BudgetValidator::new(),
            composition_aggregator: CompositionAggregator::new(),
            budget_aggregator: BudgetAggregator::new(),
            dre_deriver: DreDeriver::new(),
        }
    }

    /// Calcula o relatório completo (precisão total, sem arredondamento)
    ///
    /// Entrada inválida é rejeitada antes de qualquer agregação, e um
    /// valor derivado que estoure a faixa do Decimal também
    /// (AMOUNT_OUT_OF_RANGE): o chamador nunca recebe totais parciais.
    #[instrument(skip(self, budget), fields(compositions = budget.compositions.len(), items = budget.item_count()))]
    pub fn calculate(&self, budget: &Budget) -> Result<BudgetReport, ValidationError> {
        self.run(budget).map_err(|e| {
            warn!(violations = e.violations.len(), "orçamento rejeitado");
            e
        })
    }

    fn run(&self, budget: &Budget) -> Result<BudgetReport, ValidationError> {
        let mut warnings = self.validator.validate(budget)?;

        // 1. composições
        let compositions = budget
            .compositions
            .iter()
            .enumerate()
            .map(|(index, c)| {
                self.composition_aggregator
                    .aggregate_unchecked(c, &format!("compositions[{}]", index))
            })
            .collect::<Result<Vec<CompositionBreakdown>, _>>()?;

        // 2. orçamento
        let totals = self
            .budget_aggregator
            .aggregate(compositions.iter().map(|c| &c.totals), &budget.tax_config)?;

        if totals.custo_directo_total.is_zero() {
            warnings.push(DegenerateInputWarning::ZeroCostBudget);
        }

        // 3. DRE
        let dre = self.dre_deriver.derive(&totals, &compositions)?;

        // 4. aberturas por tipo de item
        let cost_by_item_type = Self::cost_by_item_type(&compositions)?;
        let encargos_sociais = cost_by_item_type
            .iter()
            .filter(|c| c.item_type == ItemType::Labor)
            .try_fold(Decimal::ZERO, |acc, c| {
                let charges = amount::sub(c.charged_cost, c.subtotal, "", "encargosSociais")?;
                amount::add(acc, charges, "", "encargosSociais")
            })?;

        for w in &warnings {
            warn!(warning = %w, "entrada degenerada");
        }
        info!(
            total_venda = %totals.total_venda,
            margem_liquida = %dre.margem_liquida,
            viability = %dre.viability,
            "orçamento calculado"
        );

        Ok(BudgetReport {
            totals,
            compositions,
            dre,
            cost_by_item_type,
            encargos_sociais,
            warnings,
        })
    }

    /// Custos agrupados por tipo de item (apenas tipos presentes)
    fn cost_by_item_type(compositions: &[CompositionBreakdown]) -> Result<Vec<ItemTypeCost>, ValidationError> {
        let mut grouped: BTreeMap<ItemType, (Decimal, Decimal)> = BTreeMap::new();
        for item in compositions.iter().flat_map(|c| c.items.iter()) {
            let entry = grouped.entry(item.item_type).or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 = amount::add(entry.0, item.subtotal, "costByItemType", item.item_type.as_str())?;
            entry.1 = amount::add(entry.1, item.charged_cost, "costByItemType", item.item_type.as_str())?;
        }

        Ok(grouped
            .into_iter()
            .map(|(item_type, (subtotal, charged_cost))| ItemTypeCost {
                item_type,
                subtotal,
                charged_cost,
            })
            .collect())
    }
}

impl Default for BudgetCalculator {
    fn default() -> Self {
        Self::new()
    }
}
