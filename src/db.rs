// ==========================================
// Gestão de Obras - Inicialização da conexão SQLite
// ==========================================
// Objetivo:
// - PRAGMA uniforme para toda Connection::open (foreign_keys)
// - busy_timeout uniforme para escritas concorrentes
// - schema idempotente (orçamentos + configuração)
// - valores decimais gravados como TEXT (sem perda de precisão)
// ==========================================

use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use std::time::Duration;

/// busy_timeout padrão (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Versão de schema esperada por este código
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Variável de ambiente para forçar o caminho do banco
pub const DB_PATH_ENV: &str = "ORCAMENTO_OBRAS_DB_PATH";

/// Aplica o PRAGMA padrão numa conexão
///
/// foreign_keys e busy_timeout valem "por conexão"
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Abre a conexão SQLite e aplica a configuração padrão
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Cria as tabelas (idempotente)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS budget (
            budget_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            budget_type TEXT NOT NULL,
            has_iss INTEGER NOT NULL,
            iss_rate TEXT NOT NULL,
            simples_rate TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS budget_composition (
            budget_id TEXT NOT NULL REFERENCES budget(budget_id) ON DELETE CASCADE,
            seq_no INTEGER NOT NULL,
            name TEXT NOT NULL,
            composition_type TEXT NOT NULL,
            bdi_administrative TEXT NOT NULL,
            bdi_commercial TEXT NOT NULL,
            bdi_financial TEXT NOT NULL,
            bdi_indirect_taxes TEXT NOT NULL,
            profit_margin TEXT,
            PRIMARY KEY (budget_id, seq_no)
        );

        CREATE TABLE IF NOT EXISTS budget_line_item (
            budget_id TEXT NOT NULL,
            composition_seq INTEGER NOT NULL,
            seq_no INTEGER NOT NULL,
            item_type TEXT NOT NULL,
            description TEXT,
            quantity TEXT NOT NULL,
            unit_value TEXT NOT NULL,
            multiplier_factor TEXT,
            calculation_basis TEXT,
            PRIMARY KEY (budget_id, composition_seq, seq_no),
            FOREIGN KEY (budget_id, composition_seq)
                REFERENCES budget_composition(budget_id, seq_no) ON DELETE CASCADE
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Lê schema_version (None se a tabela não existir)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Caminho padrão do banco
///
/// Ordem: variável ORCAMENTO_OBRAS_DB_PATH → diretório de dados
/// do usuário → arquivo local
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./orcamento_obras.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("orcamento-obras");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("orcamento_obras.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), None);
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }
}
