// ==========================================
// Gestão de Obras - Camada de configuração
// ==========================================
// Responsabilidade: padrões de tributos e de exibição
// Armazenamento: tabela config_kv
// ==========================================

pub mod config_manager;

// Reexportações principais
pub use config_manager::{config_keys, ConfigManager, ConfigResult};
