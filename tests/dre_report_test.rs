// ==========================================
// Testes da DRE e do relatório de saída
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use orcamento_obras::domain::budget::Budget;
use orcamento_obras::domain::types::{CompositionType, Viability};
use orcamento_obras::domain::report::round_presentation;
use orcamento_obras::engine::{BudgetCalculator, DreDeriver, GOOD_MARGIN_THRESHOLD, LOW_MARGIN_THRESHOLD};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ==========================================
// Classificação de viabilidade
// ==========================================

#[test]
fn test_viability_boundaries() {
    assert_eq!(DreDeriver::classify(dec!(1), LOW_MARGIN_THRESHOLD), Viability::Aceitavel);
    assert_eq!(DreDeriver::classify(dec!(1), GOOD_MARGIN_THRESHOLD), Viability::Bom);
    assert_eq!(DreDeriver::classify(dec!(1), dec!(4.999)), Viability::MargemBaixa);
    assert_eq!(DreDeriver::classify(dec!(1), dec!(14.999)), Viability::Aceitavel);
    assert_eq!(DreDeriver::classify(dec!(1), dec!(4.9999999999)), Viability::MargemBaixa);
}

#[test]
fn test_negative_profit_wins_over_margin() {
    assert_eq!(DreDeriver::classify(dec!(-0.01), dec!(50)), Viability::Prejuizo);
}

#[test]
fn test_zero_profit_is_low_margin() {
    assert_eq!(DreDeriver::classify(Decimal::ZERO, Decimal::ZERO), Viability::MargemBaixa);
}

// ==========================================
// Derivação a partir do orçamento
// ==========================================

#[test]
fn test_any_tax_makes_residual_negative() {
    let report = BudgetCalculator::new().calculate(&weighted_bdi_budget()).unwrap();

    assert_eq!(report.dre.lucro_liquido, -report.totals.tributos_total);
    assert_eq!(report.dre.viability, Viability::Prejuizo);
}

#[test]
fn test_zero_tax_budget_breaks_even() {
    let budget = BudgetBuilder::new()
        .no_taxes()
        .composition(CompositionBuilder::new("Materiais").bdi_total(dec!(20)).material(dec!(10), dec!(100)).build())
        .build();

    let dre = BudgetCalculator::new().calculate(&budget).unwrap().dre;
    assert_eq!(dre.receita_bruta, dec!(1200));
    assert_eq!(dre.receita_liquida, dec!(1200));
    assert_eq!(dre.lucro_bruto, dec!(200));
    assert!(dre.lucro_liquido.is_zero());
    assert_eq!(dre.viability, Viability::MargemBaixa);
}

#[test]
fn test_iss_toggle() {
    let with_iss = BudgetBuilder::new()
        .taxes(true, dec!(5), dec!(6))
        .composition(CompositionBuilder::new("M").material(dec!(1), dec!(1000)).build())
        .build();
    let mut without_iss = with_iss.clone();
    without_iss.tax_config.has_iss = false;

    let calculator = BudgetCalculator::new();
    let a = calculator.calculate(&with_iss).unwrap();
    let b = calculator.calculate(&without_iss).unwrap();

    assert_eq!(a.totals.tributos_total, dec!(110));
    assert_eq!(b.totals.tributos_total, dec!(60));
}

#[test]
fn test_composition_rows_shares() {
    let budget = BudgetBuilder::new()
        .composition(
            CompositionBuilder::new("A")
                .composition_type(CompositionType::Tools)
                .bdi_total(dec!(10))
                .material(dec!(1), dec!(100))
                .profit_margin(dec!(12))
                .build(),
        )
        .composition(CompositionBuilder::new("B").bdi_total(dec!(30)).material(dec!(1), dec!(900)).build())
        .build();

    let dre = BudgetCalculator::new().calculate(&budget).unwrap().dre;
    assert_eq!(dre.rows.len(), 2);

    let a = &dre.rows[0];
    assert_eq!(a.composition_type, CompositionType::Tools);
    assert_eq!(a.percentual_custo, dec!(10));
    assert_eq!(round_presentation(a.percentual_bdi), dec!(3.57));
    assert_eq!(a.profit_margin, Some(dec!(12)));

    let total_custo: Decimal = dre.rows.iter().map(|r| r.percentual_custo).sum();
    let total_bdi: Decimal = dre.rows.iter().map(|r| r.percentual_bdi).sum();
    assert_eq!(total_custo, dec!(100));
    assert_eq!(round_presentation(total_bdi), dec!(100));
}

#[test]
fn test_profit_margin_does_not_change_totals() {
    let plain = reference_budget();
    let mut with_margin = plain.clone();
    with_margin.compositions[0].profit_margin = Some(dec!(30));

    let calculator = BudgetCalculator::new();
    let a = calculator.calculate(&plain).unwrap();
    let b = calculator.calculate(&with_margin).unwrap();

    assert_eq!(a.totals, b.totals);
    assert_eq!(a.dre.lucro_liquido, b.dre.lucro_liquido);
}

// ==========================================
// Formato JSON
// ==========================================

#[test]
fn test_budget_from_json() {
    let raw = r#"{
        "budgetType": "service",
        "taxConfig": { "hasISS": true, "issRate": 5, "simplesRate": 6 },
        "compositions": [{
            "name": "Materiais",
            "compositionType": "materials",
            "bdi": { "administrativo": 12, "comercial": 5, "financeiro": 3, "impostos": 5 },
            "items": [{ "itemType": "material", "quantity": 10, "unitValue": 20 }]
        }]
    }"#;

    let budget: Budget = serde_json::from_str(raw).unwrap();
    assert_eq!(budget, reference_budget());
}

#[test]
fn test_report_json_shape() {
    let report = BudgetCalculator::new().calculate(&reference_budget()).unwrap().rounded();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["totals"]["custoDirectoTotal"], 200.0);
    assert_eq!(value["totals"]["totalVenda"], 277.5);
    assert_eq!(value["compositions"][0]["custoDirecto"], 200.0);
    assert_eq!(value["compositions"][0]["bdiValor"], 50.0);
    assert_eq!(value["dre"]["rows"][0]["percentualBDI"], 100.0);
    assert_eq!(value["dre"]["viability"], "PREJUIZO");
    assert_eq!(value["dre"]["viabilityLabel"], Viability::Prejuizo.label());
    assert_eq!(value["dre"]["margemBruta"], 10.11);
}

#[test]
fn test_json_amounts_are_read_exactly() {
    let raw = r#"{
        "budgetType": "product",
        "taxConfig": { "hasISS": false, "issRate": 0, "simplesRate": 0 },
        "compositions": [{
            "name": "Parafusos",
            "compositionType": "materials",
            "bdi": { "administrativo": 0, "comercial": 0, "financeiro": 0, "impostos": 0 },
            "items": [{ "itemType": "material", "quantity": 1, "unitValue": 1.005 }]
        }]
    }"#;

    let budget: Budget = serde_json::from_str(raw).unwrap();
    assert_eq!(budget.compositions[0].items[0].unit_value, dec!(1.005));

    let report = BudgetCalculator::new().calculate(&budget).unwrap().rounded();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["totals"]["totalVenda"], 1.01);
}

#[test]
fn test_json_amount_beyond_decimal_range_is_rejected() {
    let raw = r#"{
        "budgetType": "service",
        "taxConfig": { "hasISS": true, "issRate": 5, "simplesRate": 6 },
        "compositions": [{
            "name": "Estrutura",
            "compositionType": "materials",
            "bdi": { "administrativo": 10, "comercial": 0, "financeiro": 0, "impostos": 0 },
            "items": [{ "itemType": "material", "quantity": 1e200, "unitValue": 1e200 }]
        }]
    }"#;

    assert!(serde_json::from_str::<Budget>(raw).is_err());
}
