// ==========================================
// Gestão de Obras - Gerenciador de configuração
// ==========================================
// Responsabilidade: leitura/escrita de configuração
// Armazenamento: tabela config_kv (key-value + scope)
// ==========================================
// Observação: constantes do cálculo (encargos sociais,
// faixas de viabilidade) NÃO são configuráveis
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::budget::{TaxConfig, DEFAULT_ISS_RATE, DEFAULT_SIMPLES_RATE};
use crate::i18n::DEFAULT_LOCALE;
use rust_decimal::Decimal;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Resultado das operações de configuração
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Escopo global (único escopo usado hoje)
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// Chaves de configuração
// ==========================================
pub mod config_keys {
    /// ISS incide por padrão em orçamentos novos ("true"/"false")
    pub const DEFAULT_HAS_ISS: &str = "tax.default_has_iss";
    /// Alíquota padrão de ISS (%)
    pub const DEFAULT_ISS_RATE: &str = "tax.default_iss_rate";
    /// Alíquota padrão do Simples (%)
    pub const DEFAULT_SIMPLES_RATE: &str = "tax.default_simples_rate";
    /// Idioma de exibição
    pub const LOCALE: &str = "ui.locale";
}

// ==========================================
// ConfigManager - gerenciador de configuração
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Cria o gerenciador a partir do caminho do banco
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Cria o gerenciador a partir de uma conexão existente
    ///
    /// Reaplica o PRAGMA padrão e o schema (ambos idempotentes).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| format!("falha ao obter lock: {}", e))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// Lê um valor da config_kv (escopo global)
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("falha ao obter lock: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Leitura pública (escopo global)
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// Grava (upsert) um valor no escopo global
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("falha ao obter lock: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        tracing::info!(key, value, "configuração atualizada");
        Ok(())
    }

    /// Snapshot de toda a configuração global (JSON)
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("falha ao obter lock: {}", e))?;

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== Tributos =====

    /// Tributos padrão para orçamentos novos
    ///
    /// Chave ausente → valor embutido (ISS 5%, Simples 6%).
    /// Valor inválido → erro (não é corrigido silenciosamente).
    pub fn get_default_tax_config(&self) -> ConfigResult<TaxConfig> {
        let has_iss = match self.get_config_value(config_keys::DEFAULT_HAS_ISS)? {
            Some(v) => parse_bool(config_keys::DEFAULT_HAS_ISS, &v)?,
            None => true,
        };
        let iss_rate = match self.get_config_value(config_keys::DEFAULT_ISS_RATE)? {
            Some(v) => parse_rate(config_keys::DEFAULT_ISS_RATE, &v)?,
            None => DEFAULT_ISS_RATE,
        };
        let simples_rate = match self.get_config_value(config_keys::DEFAULT_SIMPLES_RATE)? {
            Some(v) => parse_rate(config_keys::DEFAULT_SIMPLES_RATE, &v)?,
            None => DEFAULT_SIMPLES_RATE,
        };

        Ok(TaxConfig::new(has_iss, iss_rate, simples_rate))
    }

    // ===== Exibição =====

    /// Idioma configurado (padrão pt-BR)
    pub fn get_locale(&self) -> ConfigResult<String> {
        Ok(self
            .get_config_value(config_keys::LOCALE)?
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string()))
    }
}

fn parse_bool(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "sim" => Ok(true),
        "0" | "false" | "no" | "nao" | "não" => Ok(false),
        other => Err(format!("configuração {} inválida: '{}'", key, other).into()),
    }
}

fn parse_rate(key: &str, raw: &str) -> ConfigResult<Decimal> {
    let value: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| format!("configuração {} inválida: '{}'", key, raw))?;
    if value < Decimal::ZERO {
        return Err(format!("configuração {} fora do intervalo: {}", key, value).into());
    }
    Ok(value)
}
