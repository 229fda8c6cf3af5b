// ==========================================
// Gestão de Obras - Erros da camada de repositório
// ==========================================
// Ferramenta: macros derive do thiserror
// ==========================================

use thiserror::Error;

/// Erros do repositório
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Banco de dados =====
    #[error("registro não encontrado: {entity} com id={id}")]
    NotFound { entity: String, id: String },

    #[error("falha ao obter lock do banco: {0}")]
    LockError(String),

    #[error("falha de transação: {0}")]
    DatabaseTransactionError(String),

    #[error("falha de consulta: {0}")]
    DatabaseQueryError(String),

    #[error("violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("violação de chave estrangeira: {0}")]
    ForeignKeyViolation(String),

    // ===== Dados armazenados =====
    #[error("dado armazenado inválido (campo={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl RepositoryError {
    /// Falha ao abrir ou confirmar uma transação
    pub(crate) fn transaction(err: rusqlite::Error) -> Self {
        RepositoryError::DatabaseTransactionError(err.to_string())
    }
}

/// Alias de Result
pub type RepositoryResult<T> = Result<T, RepositoryError>;
