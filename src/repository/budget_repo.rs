// ==========================================
// Gestão de Obras - Repositório de orçamentos
// ==========================================
// Regra: repositório não contém regra de negócio;
// o cálculo nunca lê nem altera o repositório
// ==========================================
// Tabelas: budget (1) → budget_composition (N, por seq_no)
//          → budget_line_item (N, por composition_seq + seq_no)
// Valores decimais em TEXT: o snapshot volta idêntico
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::budget::{Budget, BudgetRecord, TaxConfig};
use crate::domain::composition::{BdiProfile, Composition};
use crate::domain::line_item::LineItem;
use crate::domain::types::{BudgetType, CalculationBasis, CompositionType, ItemType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// BudgetRepository - interface CRUD
// ==========================================
pub trait BudgetRepository: Send + Sync {
    /// Insere um orçamento novo
    fn insert(&self, record: &BudgetRecord) -> RepositoryResult<()>;

    /// Busca por id
    fn find_by_id(&self, budget_id: &str) -> RepositoryResult<Option<BudgetRecord>>;

    /// Lista todos (mais recentes primeiro)
    fn list_all(&self) -> RepositoryResult<Vec<BudgetRecord>>;

    /// Substitui título e snapshot de um orçamento existente
    fn update(&self, record: &BudgetRecord) -> RepositoryResult<()>;

    /// Remove o orçamento e suas composições
    fn delete(&self, budget_id: &str) -> RepositoryResult<()>;
}

fn not_found(budget_id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Budget".to_string(),
        id: budget_id.to_string(),
    }
}

// ==========================================
// Linhas brutas (conversão fora do closure do rusqlite)
// ==========================================
struct BudgetRow {
    budget_id: String,
    title: String,
    budget_type: String,
    has_iss: bool,
    iss_rate: String,
    simples_rate: String,
    created_at: String,
    updated_at: String,
}

struct CompositionRow {
    name: String,
    composition_type: String,
    bdi: [String; 4],
    profit_margin: Option<String>,
}

struct LineItemRow {
    composition_seq: i64,
    item_type: String,
    description: Option<String>,
    quantity: String,
    unit_value: String,
    multiplier_factor: Option<String>,
    calculation_basis: Option<String>,
}

fn field_error(field: &str, message: String) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message,
    }
}

fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| field_error(field, format!("{} ({})", raw, e)))
}

fn parse_decimal(field: &str, raw: &str) -> RepositoryResult<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|e| field_error(field, format!("{} ({})", raw, e)))
}

fn parse_optional_decimal(field: &str, raw: Option<&str>) -> RepositoryResult<Option<Decimal>> {
    raw.map(|r| parse_decimal(field, r)).transpose()
}

impl LineItemRow {
    fn into_line_item(self) -> RepositoryResult<LineItem> {
        let item_type = ItemType::from_str(&self.item_type)
            .ok_or_else(|| field_error("item_type", self.item_type.clone()))?;
        let calculation_basis = match self.calculation_basis.as_deref() {
            Some(raw) => Some(
                CalculationBasis::from_str(raw).ok_or_else(|| field_error("calculation_basis", raw.to_string()))?,
            ),
            None => None,
        };

        Ok(LineItem {
            item_type,
            description: self.description,
            quantity: parse_decimal("quantity", &self.quantity)?,
            unit_value: parse_decimal("unit_value", &self.unit_value)?,
            multiplier_factor: parse_optional_decimal("multiplier_factor", self.multiplier_factor.as_deref())?,
            calculation_basis,
        })
    }
}

impl CompositionRow {
    fn into_composition(self, items: Vec<LineItem>) -> RepositoryResult<Composition> {
        let composition_type = CompositionType::from_str(&self.composition_type)
            .ok_or_else(|| field_error("composition_type", self.composition_type.clone()))?;
        let [administrative, commercial, financial, indirect_taxes] = &self.bdi;

        Ok(Composition {
            name: self.name,
            composition_type,
            items,
            bdi: BdiProfile::new(
                parse_decimal("bdi_administrative", administrative)?,
                parse_decimal("bdi_commercial", commercial)?,
                parse_decimal("bdi_financial", financial)?,
                parse_decimal("bdi_indirect_taxes", indirect_taxes)?,
            ),
            profit_margin: parse_optional_decimal("profit_margin", self.profit_margin.as_deref())?,
        })
    }
}

// ==========================================
// SqliteBudgetRepository - implementação SQLite
// ==========================================
pub struct SqliteBudgetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBudgetRepository {
    /// Abre o banco no caminho informado e garante o schema
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A partir de uma conexão já configurada (schema incluído)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Regrava composições e itens de um orçamento (dentro da transação do chamador)
    fn write_compositions(
        conn: &Connection,
        budget_id: &str,
        compositions: &[Composition],
    ) -> RepositoryResult<()> {
        // itens caem junto por ON DELETE CASCADE
        conn.execute("DELETE FROM budget_composition WHERE budget_id = ?1", params![budget_id])?;

        let mut composition_stmt = conn.prepare(
            r#"
            INSERT INTO budget_composition (
                budget_id, seq_no, name, composition_type,
                bdi_administrative, bdi_commercial, bdi_financial, bdi_indirect_taxes,
                profit_margin
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )?;
        let mut item_stmt = conn.prepare(
            r#"
            INSERT INTO budget_line_item (
                budget_id, composition_seq, seq_no, item_type, description,
                quantity, unit_value, multiplier_factor, calculation_basis
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )?;

        for (composition_seq, c) in compositions.iter().enumerate() {
            composition_stmt.execute(params![
                budget_id,
                composition_seq as i64,
                c.name,
                c.composition_type.as_str(),
                c.bdi.administrative.to_string(),
                c.bdi.commercial.to_string(),
                c.bdi.financial.to_string(),
                c.bdi.indirect_taxes.to_string(),
                c.profit_margin.map(|m| m.to_string()),
            ])?;

            for (seq_no, item) in c.items.iter().enumerate() {
                item_stmt.execute(params![
                    budget_id,
                    composition_seq as i64,
                    seq_no as i64,
                    item.item_type.as_str(),
                    item.description,
                    item.quantity.to_string(),
                    item.unit_value.to_string(),
                    item.multiplier_factor.map(|f| f.to_string()),
                    item.calculation_basis.map(|b| b.as_str()),
                ])?;
            }
        }
        Ok(())
    }

    fn load_compositions(conn: &Connection, budget_id: &str) -> RepositoryResult<Vec<Composition>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT name, composition_type,
                   bdi_administrative, bdi_commercial, bdi_financial, bdi_indirect_taxes,
                   profit_margin
            FROM budget_composition
            WHERE budget_id = ?1
            ORDER BY seq_no
            "#,
        )?;
        let composition_rows = stmt
            .query_map(params![budget_id], |row| {
                Ok(CompositionRow {
                    name: row.get(0)?,
                    composition_type: row.get(1)?,
                    bdi: [row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
                    profit_margin: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT composition_seq, item_type, description,
                   quantity, unit_value, multiplier_factor, calculation_basis
            FROM budget_line_item
            WHERE budget_id = ?1
            ORDER BY composition_seq, seq_no
            "#,
        )?;
        let item_rows = stmt
            .query_map(params![budget_id], |row| {
                Ok(LineItemRow {
                    composition_seq: row.get(0)?,
                    item_type: row.get(1)?,
                    description: row.get(2)?,
                    quantity: row.get(3)?,
                    unit_value: row.get(4)?,
                    multiplier_factor: row.get(5)?,
                    calculation_basis: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items_by_composition: Vec<Vec<LineItem>> = composition_rows.iter().map(|_| Vec::new()).collect();
        for row in item_rows {
            let slot = usize::try_from(row.composition_seq)
                .ok()
                .and_then(|seq| items_by_composition.get_mut(seq))
                .ok_or_else(|| field_error("composition_seq", row.composition_seq.to_string()))?;
            slot.push(row.into_line_item()?);
        }

        composition_rows
            .into_iter()
            .zip(items_by_composition)
            .map(|(row, items)| row.into_composition(items))
            .collect()
    }

    fn to_record(conn: &Connection, row: BudgetRow) -> RepositoryResult<BudgetRecord> {
        let budget_type = BudgetType::from_str(&row.budget_type)
            .ok_or_else(|| field_error("budget_type", row.budget_type.clone()))?;
        let compositions = Self::load_compositions(conn, &row.budget_id)?;
        let tax_config = TaxConfig::new(
            row.has_iss,
            parse_decimal("iss_rate", &row.iss_rate)?,
            parse_decimal("simples_rate", &row.simples_rate)?,
        );

        Ok(BudgetRecord {
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
            budget: Budget {
                budget_type,
                compositions,
                tax_config,
            },
            budget_id: row.budget_id,
            title: row.title,
        })
    }

    fn map_budget_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BudgetRow> {
        Ok(BudgetRow {
            budget_id: row.get(0)?,
            title: row.get(1)?,
            budget_type: row.get(2)?,
            has_iss: row.get(3)?,
            iss_rate: row.get(4)?,
            simples_rate: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

const SELECT_BUDGET: &str = r#"
    SELECT budget_id, title, budget_type, has_iss, iss_rate, simples_rate, created_at, updated_at
    FROM budget
"#;

impl BudgetRepository for SqliteBudgetRepository {
    fn insert(&self, record: &BudgetRecord) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        let tax = &record.budget.tax_config;
        tx.execute(
            r#"
            INSERT INTO budget (
                budget_id, title, budget_type, has_iss, iss_rate, simples_rate,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.budget_id,
                record.title,
                record.budget.budget_type.as_str(),
                tax.has_iss,
                tax.iss_rate.to_string(),
                tax.simples_rate.to_string(),
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Self::write_compositions(&tx, &record.budget_id, &record.budget.compositions)?;

        tx.commit().map_err(RepositoryError::transaction)?;
        tracing::debug!(budget_id = %record.budget_id, "orçamento inserido");
        Ok(())
    }

    fn find_by_id(&self, budget_id: &str) -> RepositoryResult<Option<BudgetRecord>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                &format!("{} WHERE budget_id = ?1", SELECT_BUDGET),
                params![budget_id],
                Self::map_budget_row,
            )
            .optional()?;

        row.map(|r| Self::to_record(&conn, r)).transpose()
    }

    fn list_all(&self) -> RepositoryResult<Vec<BudgetRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY updated_at DESC, budget_id", SELECT_BUDGET))?;
        let rows = stmt
            .query_map([], Self::map_budget_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|r| Self::to_record(&conn, r)).collect()
    }

    fn update(&self, record: &BudgetRecord) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        let tax = &record.budget.tax_config;
        let affected = tx.execute(
            r#"
            UPDATE budget
            SET title = ?2, budget_type = ?3, has_iss = ?4, iss_rate = ?5,
                simples_rate = ?6, updated_at = ?7
            WHERE budget_id = ?1
            "#,
            params![
                record.budget_id,
                record.title,
                record.budget.budget_type.as_str(),
                tax.has_iss,
                tax.iss_rate.to_string(),
                tax.simples_rate.to_string(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        if affected == 0 {
            return Err(not_found(&record.budget_id));
        }
        Self::write_compositions(&tx, &record.budget_id, &record.budget.compositions)?;

        tx.commit().map_err(RepositoryError::transaction)?;
        tracing::debug!(budget_id = %record.budget_id, "orçamento atualizado");
        Ok(())
    }

    fn delete(&self, budget_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM budget WHERE budget_id = ?1", params![budget_id])?;
        if affected == 0 {
            return Err(not_found(budget_id));
        }
        tracing::debug!(budget_id, "orçamento removido");
        Ok(())
    }
}
