// Utilitário de desenvolvimento: calcula um orçamento descrito em JSON
// e imprime o relatório arredondado.
//
// Uso:
//   orcamento-obras <orcamento.json> [--json-logs] [--save <título>]
//
// --save grava o orçamento no banco padrão (ORCAMENTO_OBRAS_DB_PATH ou
// diretório de dados do usuário) e imprime a checagem de aprovação.
// RUST_LOG controla o nível de log (padrão: info).

use anyhow::{anyhow, bail, Context};
use orcamento_obras::config::ConfigManager;
use orcamento_obras::db::get_default_db_path;
use orcamento_obras::repository::SqliteBudgetRepository;
use orcamento_obras::{i18n, logging, Budget, BudgetApi, BudgetCalculator};
use std::sync::Arc;

const USAGE: &str = "uso: orcamento-obras <orcamento.json> [--json-logs] [--save <título>]";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut save_title = None;
    let mut json_logs = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json-logs" => json_logs = true,
            "--save" => save_title = Some(args.next().context(USAGE)?),
            _ if path.is_none() => path = Some(arg),
            _ => bail!("argumento inesperado: {}\n{}", arg, USAGE),
        }
    }

    if json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    let Some(path) = path else {
        bail!(USAGE);
    };

    tracing::info!("{} v{}", orcamento_obras::APP_NAME, orcamento_obras::VERSION);

    let raw = std::fs::read_to_string(&path).with_context(|| format!("falha ao ler {}", path))?;
    let budget: Budget =
        serde_json::from_str(&raw).with_context(|| format!("JSON de orçamento inválido: {}", path))?;

    match save_title {
        None => {
            let report = BudgetCalculator::new().calculate(&budget)?;
            println!("{}", serde_json::to_string_pretty(&report.rounded())?);
        }
        Some(title) => {
            let db_path = get_default_db_path();
            tracing::info!("banco: {}", db_path);

            let config = Arc::new(ConfigManager::new(&db_path).map_err(|e| anyhow!(e.to_string()))?);
            i18n::set_locale(&config.get_locale().map_err(|e| anyhow!(e.to_string()))?);

            let repo = Arc::new(SqliteBudgetRepository::new(&db_path)?);
            let api = BudgetApi::new(repo, Some(config));

            let record = api.create_budget(&title, budget)?;
            let report = api.calculate(&record.budget_id)?;
            let approval = api.check_approval(&record.budget_id)?;

            println!("{}", serde_json::to_string_pretty(&report)?);
            println!("budget_id={}", record.budget_id);
            println!("{}", approval.reason);
        }
    }

    Ok(())
}
