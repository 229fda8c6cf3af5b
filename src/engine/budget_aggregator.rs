// ==========================================
// Gestão de Obras - Agregador do orçamento
// ==========================================
// Entrada: composições agregadas + configuração de tributos
// Saída: BudgetTotals
// ==========================================
// Regra: precisão total; nada é arredondado aqui
// ==========================================

use crate::domain::budget::TaxConfig;
use crate::domain::report::{BudgetTotals, CompositionTotals};
use crate::engine::amount;
use crate::engine::validation::{out_of_range, ValidationError};
use rust_decimal::Decimal;

const PREFIX: &str = "totals";

pub struct BudgetAggregator;

impl BudgetAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Consolida os totais das composições e aplica os tributos
    ///
    /// - bdiMedio é ponderado pelo custo direto (não é média simples das taxas)
    /// - tributos = subtotal × (ISS se incide + Simples) / 100
    pub fn aggregate<'a, I>(&self, compositions: I, tax: &TaxConfig) -> Result<BudgetTotals, ValidationError>
    where
        I: IntoIterator<Item = &'a CompositionTotals>,
    {
        let (custo_directo_total, bdi_total) = compositions.into_iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(custo, bdi), c| {
                Ok::<_, ValidationError>((
                    amount::add(custo, c.custo_directo, PREFIX, "custoDirectoTotal")?,
                    amount::add(bdi, c.bdi_valor, PREFIX, "bdiTotal")?,
                ))
            },
        )?;

        let bdi_medio = amount::share(bdi_total, custo_directo_total, PREFIX, "bdiMedio")?;

        let subtotal = amount::add(custo_directo_total, bdi_total, PREFIX, "subtotal")?;
        let rate = tax
            .effective_rate()
            .ok_or_else(|| out_of_range("taxConfig".to_string()))?;
        let tributos_total = amount::percent_of(subtotal, rate, PREFIX, "tributosTotal")?;

        Ok(BudgetTotals {
            custo_directo_total,
            bdi_total,
            bdi_medio,
            subtotal,
            tributos_total,
            total_venda: amount::add(subtotal, tributos_total, PREFIX, "totalVenda")?,
        })
    }
}

impl Default for BudgetAggregator {
    fn default() -> Self {
        Self::new()
    }
}
