// ==========================================
// Gestão de Obras - API de orçamentos
// ==========================================
// Responsabilidade: ciclo de vida do orçamento (criar, editar,
// excluir) e cálculo do relatório na fronteira de saída
// Regra: toda edição é validada e calculada antes de ser gravada;
// edição rejeitada não altera o estado armazenado
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::budget::{Budget, BudgetRecord, TaxConfig};
use crate::domain::composition::Composition;
use crate::domain::report::{round_presentation, BudgetReport};
use crate::domain::types::{BudgetType, Viability};
use crate::engine::calculator::BudgetCalculator;
use crate::i18n::t_with_args;
use crate::repository::budget_repo::BudgetRepository;
use crate::repository::memory_repo::InMemoryBudgetRepository;

// ==========================================
// ApprovalCheck - resultado da checagem de aprovação
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalCheck {
    pub viability: Viability,
    pub approvable: bool,
    pub margem_liquida: Decimal, // já arredondada
    pub reason: String,          // mensagem traduzida
}

// ==========================================
// BudgetApi
// ==========================================
pub struct BudgetApi {
    repo: Arc<dyn BudgetRepository>,
    calculator: BudgetCalculator,
    config: Option<Arc<ConfigManager>>,
}

impl BudgetApi {
    /// # Parâmetros
    /// - repo: repositório de orçamentos
    /// - config: configuração (tributos padrão); None usa os valores embutidos
    pub fn new(repo: Arc<dyn BudgetRepository>, config: Option<Arc<ConfigManager>>) -> Self {
        Self {
            repo,
            calculator: BudgetCalculator::new(),
            config,
        }
    }

    /// API sobre repositório em memória, sem configuração
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBudgetRepository::new()), None)
    }

    // ==========================================
    // Ciclo de vida
    // ==========================================

    /// Orçamento vazio com os tributos padrão da configuração
    pub fn new_budget(&self, budget_type: BudgetType) -> ApiResult<Budget> {
        Ok(Budget::new(budget_type, self.default_tax_config()?))
    }

    /// Grava um orçamento novo
    ///
    /// # Retorno
    /// - Ok(BudgetRecord): registro com id gerado
    /// - Err(ApiError::ValidationFailed): entrada inválida ou valor
    ///   derivado fora da faixa numérica, nada gravado
    #[instrument(skip(self, budget), fields(compositions = budget.compositions.len()))]
    pub fn create_budget(&self, title: &str, budget: Budget) -> ApiResult<BudgetRecord> {
        let title = Self::check_title(title)?;
        self.calculator.calculate(&budget)?;

        let record = BudgetRecord::new(title, budget);
        self.repo.insert(&record)?;

        info!(budget_id = %record.budget_id, "orçamento criado");
        Ok(record)
    }

    pub fn get_budget(&self, budget_id: &str) -> ApiResult<BudgetRecord> {
        self.repo
            .find_by_id(budget_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Budget(id={}) não existe", budget_id)))
    }

    /// Lista todos os orçamentos (mais recentes primeiro)
    pub fn list_budgets(&self) -> ApiResult<Vec<BudgetRecord>> {
        Ok(self.repo.list_all()?)
    }

    /// Substitui título e entradas de um orçamento existente
    #[instrument(skip(self, budget))]
    pub fn update_budget(&self, budget_id: &str, title: &str, budget: Budget) -> ApiResult<BudgetRecord> {
        let title = Self::check_title(title)?;
        let mut record = self.get_budget(budget_id)?;
        record.title = title.to_string();
        self.commit(record, budget)
    }

    #[instrument(skip(self))]
    pub fn delete_budget(&self, budget_id: &str) -> ApiResult<()> {
        self.repo.delete(budget_id)?;
        info!(budget_id, "orçamento excluído");
        Ok(())
    }

    // ==========================================
    // Edição de composições
    // ==========================================

    pub fn add_composition(&self, budget_id: &str, composition: Composition) -> ApiResult<BudgetRecord> {
        let record = self.get_budget(budget_id)?;
        let mut budget = record.budget.clone();
        budget.compositions.push(composition);
        self.commit(record, budget)
    }

    pub fn replace_composition(
        &self,
        budget_id: &str,
        index: usize,
        composition: Composition,
    ) -> ApiResult<BudgetRecord> {
        let record = self.get_budget(budget_id)?;
        let mut budget = record.budget.clone();
        let slot = budget
            .compositions
            .get_mut(index)
            .ok_or_else(|| Self::composition_not_found(budget_id, index))?;
        *slot = composition;
        self.commit(record, budget)
    }

    pub fn remove_composition(&self, budget_id: &str, index: usize) -> ApiResult<BudgetRecord> {
        let record = self.get_budget(budget_id)?;
        if index >= record.budget.compositions.len() {
            return Err(Self::composition_not_found(budget_id, index));
        }
        let mut budget = record.budget.clone();
        budget.compositions.remove(index);
        self.commit(record, budget)
    }

    // ==========================================
    // Cálculo
    // ==========================================

    /// Relatório arredondado de um orçamento armazenado
    pub fn calculate(&self, budget_id: &str) -> ApiResult<BudgetReport> {
        let record = self.get_budget(budget_id)?;
        self.preview(&record.budget)
    }

    /// Relatório arredondado de um orçamento ainda não gravado
    pub fn preview(&self, budget: &Budget) -> ApiResult<BudgetReport> {
        let report = self.calculator.calculate(budget)?;
        Ok(report.rounded())
    }

    /// Checa se o orçamento pode seguir para aprovação
    ///
    /// Aprovável somente com viabilidade Aceitável ou Bom. Orçamento
    /// cujo cálculo estoura a faixa numérica volta como ValidationFailed,
    /// nunca como aprovável.
    pub fn check_approval(&self, budget_id: &str) -> ApiResult<ApprovalCheck> {
        let report = self.calculate(budget_id)?;
        let viability = report.dre.viability;
        let approvable = viability.is_approvable();
        let margem_liquida = round_presentation(report.dre.margem_liquida);

        let margin = format!("{:.2}", margem_liquida);
        let label = viability.label();
        let key = if approvable {
            "approval.approvable"
        } else {
            "approval.blocked"
        };
        let reason = t_with_args(key, &[("margin", margin.as_str()), ("viability", label.as_str())]);

        if !approvable {
            warn!(budget_id, viability = %viability, "orçamento não liberado para aprovação");
        }

        Ok(ApprovalCheck {
            viability,
            approvable,
            margem_liquida,
            reason,
        })
    }

    // ==========================================
    // Auxiliares
    // ==========================================

    /// Valida, calcula e grava; em caso de erro o registro armazenado fica intacto
    fn commit(&self, mut record: BudgetRecord, budget: Budget) -> ApiResult<BudgetRecord> {
        let warnings = self.calculator.calculate(&budget)?.warnings;
        if !warnings.is_empty() {
            debug!(budget_id = %record.budget_id, warnings = warnings.len(), "orçamento com entradas degeneradas");
        }

        record.budget = budget;
        record.updated_at = Utc::now();
        self.repo.update(&record)?;
        Ok(record)
    }

    fn default_tax_config(&self) -> ApiResult<TaxConfig> {
        match &self.config {
            Some(config) => config
                .get_default_tax_config()
                .map_err(|e| ApiError::ConfigError(e.to_string())),
            None => Ok(TaxConfig::default()),
        }
    }

    fn check_title(title: &str) -> ApiResult<&str> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidInput("o título do orçamento é obrigatório".to_string()));
        }
        Ok(trimmed)
    }

    fn composition_not_found(budget_id: &str, index: usize) -> ApiError {
        ApiError::NotFound(format!(
            "Composition(budget_id={}, index={}) não existe",
            budget_id, index
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::composition::BdiProfile;
    use crate::domain::line_item::LineItem;
    use crate::domain::types::{CompositionType, ItemType};
    use crate::engine::validation::codes;
    use rust_decimal_macros::dec;

    fn materials() -> Composition {
        Composition::new(
            "Materiais",
            CompositionType::Materials,
            BdiProfile::new(dec!(10), dec!(5), dec!(3), dec!(2)),
        )
        .with_item(LineItem::new(ItemType::Material, dec!(10), dec!(100)))
    }

    #[test]
    fn test_create_and_calculate() {
        let api = BudgetApi::in_memory();
        let budget = api.new_budget(BudgetType::Service).unwrap().with_composition(materials());
        let record = api.create_budget("Galpão", budget).unwrap();

        let report = api.calculate(&record.budget_id).unwrap();
        assert_eq!(report.totals.custo_directo_total, dec!(1000));
        assert_eq!(report.totals.bdi_total, dec!(200));
        assert_eq!(report.totals.tributos_total, dec!(132));
        assert_eq!(report.totals.total_venda, dec!(1332));
    }

    #[test]
    fn test_rejected_edit_keeps_stored_state() {
        let api = BudgetApi::in_memory();
        let budget = api.new_budget(BudgetType::Service).unwrap().with_composition(materials());
        let record = api.create_budget("Galpão", budget).unwrap();

        let bad = Composition::new("Ruim", CompositionType::Tools, BdiProfile::default())
            .with_item(LineItem::new(ItemType::Tool, dec!(0), dec!(10)));
        let err = api.add_composition(&record.budget_id, bad).unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.code == codes::QUANTITY_NOT_POSITIVE));

        let stored = api.get_budget(&record.budget_id).unwrap();
        assert_eq!(stored.budget.compositions.len(), 1);
    }

    #[test]
    fn test_composition_index_out_of_range() {
        let api = BudgetApi::in_memory();
        let record = api
            .create_budget("Vazio", Budget::new(BudgetType::Product, TaxConfig::default()))
            .unwrap();

        assert!(matches!(
            api.remove_composition(&record.budget_id, 0),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            api.replace_composition(&record.budget_id, 3, materials()),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_title_rejected() {
        let api = BudgetApi::in_memory();
        let result = api.create_budget("   ", Budget::new(BudgetType::Service, TaxConfig::default()));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_check_approval_with_taxes_is_blocked() {
        let api = BudgetApi::in_memory();
        let budget = api.new_budget(BudgetType::Service).unwrap().with_composition(materials());
        let record = api.create_budget("Galpão", budget).unwrap();

        let check = api.check_approval(&record.budget_id).unwrap();
        assert_eq!(check.viability, Viability::Prejuizo);
        assert!(!check.approvable);
        assert_eq!(check.margem_liquida, dec!(-11));
        assert!(!check.reason.is_empty());
    }

    #[test]
    fn test_overflowing_budget_is_never_approvable() {
        let huge = Decimal::from(1_000_000_000_000_000u64);
        let budget = Budget::new(BudgetType::Service, TaxConfig::default()).with_composition(
            Composition::new(
                "Estrutura",
                CompositionType::Materials,
                BdiProfile::new(dec!(10), dec!(0), dec!(0), dec!(0)),
            )
            .with_item(LineItem::new(ItemType::Material, huge, huge)),
        );

        let repo = Arc::new(InMemoryBudgetRepository::new());
        let api = BudgetApi::new(repo.clone(), None);

        // campos de entrada válidos; só o valor derivado estoura
        let err = api.create_budget("Estrutura", budget.clone()).unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.code == codes::AMOUNT_OUT_OF_RANGE && v.field == "compositions[0].items[0].subtotal"));
        assert!(api.list_budgets().unwrap().is_empty());
        assert!(matches!(api.preview(&budget), Err(ApiError::ValidationFailed { .. })));

        // gravado por fora da API: a checagem rejeita em vez de aprovar
        let record = BudgetRecord::new("Estrutura", budget);
        repo.insert(&record).unwrap();
        match api.check_approval(&record.budget_id) {
            Err(ApiError::ValidationFailed { violations, .. }) => {
                assert!(violations.iter().any(|v| v.code == codes::AMOUNT_OUT_OF_RANGE));
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }
}
