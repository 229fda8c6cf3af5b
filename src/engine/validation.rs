// ==========================================
// Gestão de Obras - Validação das entradas do orçamento
// ==========================================
// Responsabilidade: rejeitar entradas malformadas ANTES de
// qualquer agregação, com mensagem por campo
// Regra: nunca corrigir silenciosamente (sem clamp de negativos)
// ==========================================

use crate::domain::budget::{Budget, TaxConfig};
use crate::domain::composition::Composition;
use crate::domain::line_item::LineItem;
use crate::i18n::t_with_args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::domain::report::DegenerateInputWarning;

// ==========================================
// Códigos de violação (estáveis, usados pelos consumidores)
// ==========================================
pub mod codes {
    pub const QUANTITY_NOT_POSITIVE: &str = "QUANTITY_NOT_POSITIVE";
    pub const UNIT_VALUE_NOT_POSITIVE: &str = "UNIT_VALUE_NOT_POSITIVE";
    pub const MULTIPLIER_REQUIRED: &str = "MULTIPLIER_REQUIRED";
    pub const MULTIPLIER_NEGATIVE: &str = "MULTIPLIER_NEGATIVE";
    pub const BDI_NEGATIVE: &str = "BDI_NEGATIVE";
    pub const TAX_RATE_NEGATIVE: &str = "TAX_RATE_NEGATIVE";
    pub const NAME_REQUIRED: &str = "NAME_REQUIRED";
    /// Valor derivado fora da faixa representável (estouro)
    pub const AMOUNT_OUT_OF_RANGE: &str = "AMOUNT_OUT_OF_RANGE";
}

// ==========================================
// ValidationViolation - violação por campo
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub field: String,   // caminho do campo, ex.: compositions[0].items[2].quantity
    pub code: String,    // código estável
    pub message: String, // mensagem traduzida
}

// ==========================================
// ValidationError - entrada rejeitada
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
#[error("entrada inválida: {} violação(ões)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<ValidationViolation>,
}

impl ValidationError {
    /// Há violação com este código?
    pub fn has_code(&self, code: &str) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    /// Há violação neste campo?
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn into_result(violations: Vec<ValidationViolation>) -> Result<(), ValidationError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Rejeição de um valor derivado que estourou a faixa do Decimal
pub(crate) fn out_of_range(field: String) -> ValidationError {
    ValidationError {
        violations: vec![violation(field, codes::AMOUNT_OUT_OF_RANGE, &[])],
    }
}

/// Caminho do campo: `prefix.name`, ou só `name` sem prefixo
pub(crate) fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

pub(crate) fn violation(field: String, code: &str, args: &[(&str, &str)]) -> ValidationViolation {
    let mut all_args: Vec<(&str, &str)> = vec![("field", field.as_str())];
    all_args.extend_from_slice(args);
    let message = t_with_args(&format!("validation.{}", code.to_lowercase()), &all_args);
    ValidationViolation {
        field,
        code: code.to_string(),
        message,
    }
}

// ==========================================
// BudgetValidator - validador (sem estado)
// ==========================================
pub struct BudgetValidator;

impl BudgetValidator {
    pub fn new() -> Self {
        Self
    }

    /// Valida um item isolado (edição de um item)
    pub fn check_line_item(&self, item: &LineItem) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.collect_line_item(item, "", &mut violations);
        into_result(violations)
    }

    /// Valida uma composição isolada (itens + BDI + nome)
    pub fn check_composition(&self, composition: &Composition) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.collect_composition(composition, "", &mut violations);
        into_result(violations)
    }

    /// Valida a configuração de tributos
    pub fn check_tax_config(&self, tax: &TaxConfig) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        self.collect_tax_config(tax, "taxConfig", &mut violations);
        into_result(violations)
    }

    /// Valida o orçamento completo
    ///
    /// # Retorno
    /// - Ok(warnings): entrada válida; avisos não fatais (composições vazias etc.)
    /// - Err(ValidationError): todas as violações encontradas, por campo
    pub fn validate(&self, budget: &Budget) -> Result<Vec<DegenerateInputWarning>, ValidationError> {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if budget.compositions.is_empty() {
            warnings.push(DegenerateInputWarning::NoCompositions);
        }

        for (index, composition) in budget.compositions.iter().enumerate() {
            let prefix = format!("compositions[{}]", index);
            self.collect_composition(composition, &prefix, &mut violations);

            if composition.is_empty() {
                warnings.push(DegenerateInputWarning::EmptyComposition {
                    index,
                    name: composition.name.clone(),
                });
            }
        }

        self.collect_tax_config(&budget.tax_config, "taxConfig", &mut violations);

        into_result(violations)?;
        Ok(warnings)
    }

    // ==========================================
    // Coletores internos
    // ==========================================

    fn collect_line_item(
        &self,
        item: &LineItem,
        prefix: &str,
        violations: &mut Vec<ValidationViolation>,
    ) {
        // quantidade: obrigatória e > 0
        let field = join(prefix, "quantity");
        if item.quantity <= Decimal::ZERO {
            let value = item.quantity.to_string();
            violations.push(violation(field, codes::QUANTITY_NOT_POSITIVE, &[("value", value.as_str())]));
        }

        // valor unitário: obrigatório e > 0
        let field = join(prefix, "unitValue");
        if item.unit_value <= Decimal::ZERO {
            let value = item.unit_value.to_string();
            violations.push(violation(field, codes::UNIT_VALUE_NOT_POSITIVE, &[("value", value.as_str())]));
        }

        // peso: obrigatório e > 0 quando a regra do peso se aplica
        let field = join(prefix, "multiplierFactor");
        match item.multiplier_factor {
            Some(f) if f < Decimal::ZERO => {
                let value = f.to_string();
                violations.push(violation(field, codes::MULTIPLIER_NEGATIVE, &[("value", value.as_str())]));
            }
            Some(f) if f.is_zero() && item.uses_multiplier() => {
                violations.push(violation(field, codes::MULTIPLIER_REQUIRED, &[]));
            }
            None if item.uses_multiplier() => {
                violations.push(violation(field, codes::MULTIPLIER_REQUIRED, &[]));
            }
            _ => {}
        }
    }

    fn collect_composition(
        &self,
        composition: &Composition,
        prefix: &str,
        violations: &mut Vec<ValidationViolation>,
    ) {
        if composition.name.trim().is_empty() {
            violations.push(violation(join(prefix, "name"), codes::NAME_REQUIRED, &[]));
        }

        for (name, value) in composition.bdi.parts() {
            if value < Decimal::ZERO {
                let field = join(prefix, &format!("bdi.{}", name));
                let v = value.to_string();
                violations.push(violation(field, codes::BDI_NEGATIVE, &[("value", v.as_str())]));
            }
        }

        for (index, item) in composition.items.iter().enumerate() {
            let item_prefix = join(prefix, &format!("items[{}]", index));
            self.collect_line_item(item, &item_prefix, violations);
        }
    }

    fn collect_tax_config(
        &self,
        tax: &TaxConfig,
        prefix: &str,
        violations: &mut Vec<ValidationViolation>,
    ) {
        for (name, value) in [("issRate", tax.iss_rate), ("simplesRate", tax.simples_rate)] {
            if value < Decimal::ZERO {
                let field = join(prefix, name);
                let v = value.to_string();
                violations.push(violation(field, codes::TAX_RATE_NEGATIVE, &[("value", v.as_str())]));
            }
        }
    }
}

impl Default for BudgetValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::composition::BdiProfile;
    use crate::domain::types::{BudgetType, CalculationBasis, CompositionType, ItemType};
    use rust_decimal_macros::dec;

    fn composition_with(items: Vec<LineItem>) -> Composition {
        let mut c = Composition::new("Montagem", CompositionType::AssemblyLabor, BdiProfile::default());
        c.items = items;
        c
    }

    #[test]
    fn test_rejects_non_positive_quantity_and_value() {
        let validator = BudgetValidator::new();
        let err = validator
            .check_line_item(&LineItem::new(ItemType::Material, dec!(0), dec!(-1)))
            .unwrap_err();

        assert!(err.has_field("quantity"));
        assert!(err.has_code(codes::QUANTITY_NOT_POSITIVE));
        assert!(err.has_field("unitValue"));
        assert!(err.has_code(codes::UNIT_VALUE_NOT_POSITIVE));
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn test_multiplier_required_for_hourly_basis_and_mobilization() {
        let validator = BudgetValidator::new();

        let hourly = LineItem::new(ItemType::Tool, dec!(4), dec!(100)).with_basis(CalculationBasis::MachineHours);
        let err = validator.check_line_item(&hourly).unwrap_err();
        assert!(err.has_code(codes::MULTIPLIER_REQUIRED));

        let zero = LineItem::new(ItemType::Mobilization, dec!(1), dec!(100)).with_multiplier(dec!(0.00));
        let err = validator.check_line_item(&zero).unwrap_err();
        assert!(err.has_field("multiplierFactor"));

        // sem regra do peso, fator ausente é aceito
        let plain = LineItem::new(ItemType::Material, dec!(1), dec!(100)).with_basis(CalculationBasis::Weight);
        assert!(validator.check_line_item(&plain).is_ok());
    }

    #[test]
    fn test_budget_validation_reports_field_paths() {
        let validator = BudgetValidator::new();
        let budget = Budget::new(BudgetType::Service, TaxConfig::new(true, dec!(-1), dec!(6)))
            .with_composition(composition_with(vec![LineItem::new(ItemType::Material, dec!(1), dec!(10))]))
            .with_composition(composition_with(vec![
                LineItem::new(ItemType::Material, dec!(1), dec!(10)),
                LineItem::new(ItemType::Labor, dec!(-2), dec!(10)),
            ]));

        let err = validator.validate(&budget).unwrap_err();
        assert!(err.has_field("compositions[1].items[1].quantity"));
        assert!(err.has_field("taxConfig.issRate"));
        assert!(!err.has_field("compositions[0].items[0].quantity"));
    }

    #[test]
    fn test_tax_rates() {
        let validator = BudgetValidator::new();
        assert!(validator.check_tax_config(&TaxConfig::new(false, dec!(0), dec!(0))).is_ok());

        let err = validator
            .check_tax_config(&TaxConfig::new(true, dec!(5), dec!(-0.5)))
            .unwrap_err();
        assert!(err.has_field("taxConfig.simplesRate"));
        assert!(err.has_code(codes::TAX_RATE_NEGATIVE));
    }

    #[test]
    fn test_negative_bdi_and_blank_name_rejected() {
        let validator = BudgetValidator::new();
        let mut c = composition_with(vec![]);
        c.name = "  ".to_string();
        c.bdi = BdiProfile::new(dec!(10), dec!(-1), dec!(0), dec!(0));

        let err = validator.check_composition(&c).unwrap_err();
        assert!(err.has_field("name"));
        assert!(err.has_field("bdi.commercial"));
        assert!(err.has_code(codes::BDI_NEGATIVE));
    }

    #[test]
    fn test_out_of_range_carries_field_and_code() {
        let err = out_of_range(join("compositions[0]", "subtotal"));
        assert!(err.has_field("compositions[0].subtotal"));
        assert!(err.has_code(codes::AMOUNT_OUT_OF_RANGE));
        assert!(!err.violations[0].message.is_empty());
    }

    #[test]
    fn test_empty_budget_yields_warnings_not_errors() {
        let validator = BudgetValidator::new();
        let empty = Budget::new(BudgetType::Product, TaxConfig::default());
        assert_eq!(
            validator.validate(&empty).unwrap(),
            vec![DegenerateInputWarning::NoCompositions]
        );

        let with_empty = empty.with_composition(composition_with(vec![]));
        let warnings = validator.validate(&with_empty).unwrap();
        assert_eq!(
            warnings,
            vec![DegenerateInputWarning::EmptyComposition {
                index: 0,
                name: "Montagem".to_string()
            }]
        );
    }
}
