// ==========================================
// Gestão de Obras - Biblioteca principal
// ==========================================
// Motor de custeio de orçamentos de obras:
// itens → composições (BDI) → orçamento (tributos) → DRE
// Persistência: SQLite (rusqlite)
// ==========================================

// Inicializa a internacionalização
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// Declaração de módulos
// ==========================================

// Domínio - entidades e tipos
pub mod domain;

// Motores - regras de custeio
pub mod engine;

// Repositório - acesso a dados
pub mod repository;

// Configuração
pub mod config;

// Infraestrutura de banco (conexão/PRAGMA/schema)
pub mod db;

// Logs
pub mod logging;

// Internacionalização
pub mod i18n;

// API - operações de orçamento
pub mod api;

// ==========================================
// Reexportação dos tipos principais
// ==========================================

// Tipos de domínio
pub use domain::types::{BudgetType, CalculationBasis, CompositionType, ItemType, Viability};

// Entidades
pub use domain::{
    BdiProfile, Budget, BudgetRecord, BudgetReport, BudgetTotals, Composition,
    CompositionBreakdown, Dre, LineItem, LineItemCost, TaxConfig,
};

// Motores
pub use engine::{
    BudgetAggregator, BudgetCalculator, BudgetValidator, CompositionAggregator, DreDeriver,
    LineItemCostingEngine, ValidationError,
};

// API
pub use api::{ApiError, ApiResult, ApprovalCheck, BudgetApi};

// ==========================================
// Constantes
// ==========================================

// Versão
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nome do sistema
pub const APP_NAME: &str = "Gestão de Obras - Orçamentos";
