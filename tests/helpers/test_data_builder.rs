// ==========================================
// Construtores de dados de teste
// ==========================================

use orcamento_obras::domain::budget::{Budget, TaxConfig};
use orcamento_obras::domain::composition::{BdiProfile, Composition};
use orcamento_obras::domain::line_item::LineItem;
use orcamento_obras::domain::types::{BudgetType, CalculationBasis, CompositionType, ItemType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ==========================================
// Composition
// ==========================================

pub struct CompositionBuilder {
    name: String,
    composition_type: CompositionType,
    bdi: BdiProfile,
    items: Vec<LineItem>,
    profit_margin: Option<Decimal>,
}

impl CompositionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            composition_type: CompositionType::Materials,
            bdi: BdiProfile::default(),
            items: Vec::new(),
            profit_margin: None,
        }
    }

    pub fn composition_type(mut self, composition_type: CompositionType) -> Self {
        self.composition_type = composition_type;
        self
    }

    pub fn bdi(mut self, administrative: Decimal, commercial: Decimal, financial: Decimal, indirect_taxes: Decimal) -> Self {
        self.bdi = BdiProfile::new(administrative, commercial, financial, indirect_taxes);
        self
    }

    /// BDI inteiro na parcela administrativa
    pub fn bdi_total(self, percent: Decimal) -> Self {
        self.bdi(percent, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }

    pub fn item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn material(self, quantity: Decimal, unit_value: Decimal) -> Self {
        self.item(LineItem::new(ItemType::Material, quantity, unit_value))
    }

    pub fn labor(self, quantity: Decimal, unit_value: Decimal) -> Self {
        self.item(LineItem::new(ItemType::Labor, quantity, unit_value))
    }

    /// Mão de obra em homem-hora com peso
    pub fn labor_hours(self, hours: Decimal, weight: Decimal, rate: Decimal) -> Self {
        self.item(
            LineItem::new(ItemType::Labor, hours, rate)
                .with_basis(CalculationBasis::LaborHours)
                .with_multiplier(weight),
        )
    }

    pub fn profit_margin(mut self, margin: Decimal) -> Self {
        self.profit_margin = Some(margin);
        self
    }

    pub fn build(self) -> Composition {
        let mut composition = Composition::new(&self.name, self.composition_type, self.bdi);
        composition.items = self.items;
        composition.profit_margin = self.profit_margin;
        composition
    }
}

// ==========================================
// Budget
// ==========================================

pub struct BudgetBuilder {
    budget_type: BudgetType,
    tax_config: TaxConfig,
    compositions: Vec<Composition>,
}

impl BudgetBuilder {
    pub fn new() -> Self {
        Self {
            budget_type: BudgetType::Service,
            tax_config: TaxConfig::default(),
            compositions: Vec::new(),
        }
    }

    pub fn product(mut self) -> Self {
        self.budget_type = BudgetType::Product;
        self
    }

    pub fn taxes(mut self, has_iss: bool, iss_rate: Decimal, simples_rate: Decimal) -> Self {
        self.tax_config = TaxConfig::new(has_iss, iss_rate, simples_rate);
        self
    }

    pub fn no_taxes(self) -> Self {
        self.taxes(false, Decimal::ZERO, Decimal::ZERO)
    }

    pub fn composition(mut self, composition: Composition) -> Self {
        self.compositions.push(composition);
        self
    }

    pub fn build(self) -> Budget {
        let mut budget = Budget::new(self.budget_type, self.tax_config);
        budget.compositions = self.compositions;
        budget
    }
}

// ==========================================
// Cenários prontos
// ==========================================

/// Um material (10 × 20), BDI 12+5+3+5, ISS 5% + Simples 6%
pub fn reference_budget() -> Budget {
    BudgetBuilder::new()
        .taxes(true, dec!(5), dec!(6))
        .composition(
            CompositionBuilder::new("Materiais")
                .bdi(dec!(12), dec!(5), dec!(3), dec!(5))
                .material(dec!(10), dec!(20))
                .build(),
        )
        .build()
}

/// Duas composições com custo desigual: 100 @ 10% e 900 @ 30%
pub fn weighted_bdi_budget() -> Budget {
    BudgetBuilder::new()
        .composition(CompositionBuilder::new("A").bdi_total(dec!(10)).material(dec!(1), dec!(100)).build())
        .composition(CompositionBuilder::new("B").bdi_total(dec!(30)).material(dec!(1), dec!(900)).build())
        .build()
}
