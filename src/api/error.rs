// ==========================================
// Gestão de Obras - Erros da camada de API
// ==========================================
// Responsabilidade: converter erros de repositório, validação
// e configuração em mensagens úteis ao usuário
// ==========================================

use crate::engine::validation::{ValidationError, ValidationViolation};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Erros da API
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Edição rejeitada
    // ==========================================
    /// Entrada inválida, com violações por campo
    #[error("edição rejeitada: {reason}")]
    ValidationFailed {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    #[error("recurso não encontrado: {0}")]
    NotFound(String),

    // ==========================================
    // Acesso a dados
    // ==========================================
    #[error("erro de banco de dados: {0}")]
    DatabaseError(String),

    #[error("falha de transação: {0}")]
    DatabaseTransactionError(String),

    #[error("erro de configuração: {0}")]
    ConfigError(String),

    // ==========================================
    // Genérico
    // ==========================================
    #[error("erro interno: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Violações por campo (vazio para erros que não são de validação)
    pub fn violations(&self) -> &[ValidationViolation] {
        match self {
            ApiError::ValidationFailed { violations, .. } => violations,
            _ => &[],
        }
    }
}

// ==========================================
// Conversão de ValidationError
// ==========================================
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let reason = match err.violations.first() {
            Some(first) if err.violations.len() == 1 => first.message.clone(),
            Some(first) => format!("{} (+{} violação(ões))", first.message, err.violations.len() - 1),
            None => err.to_string(),
        };
        ApiError::ValidationFailed {
            reason,
            violations: err.violations,
        }
    }
}

// ==========================================
// Conversão de RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={}) não existe", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("falha ao obter lock do banco: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseTransactionError(msg),
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("registro duplicado: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("referência inválida: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("dado armazenado inválido em {}: {}", field, message))
            }
        }
    }
}

/// Alias de Result
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Budget".to_string(),
            id: "B001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Budget"));
                assert!(msg.contains("B001"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_transaction_error_conversion() {
        let repo_err = RepositoryError::DatabaseTransactionError(
            "cannot start a transaction within a transaction".to_string(),
        );
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::DatabaseTransactionError(msg) => assert!(msg.contains("transaction")),
            _ => panic!("Expected DatabaseTransactionError"),
        }
    }

    #[test]
    fn test_validation_error_keeps_violations() {
        let err = ValidationError {
            violations: vec![
                ValidationViolation {
                    field: "quantity".to_string(),
                    code: "QUANTITY_NOT_POSITIVE".to_string(),
                    message: "quantity: inválida".to_string(),
                },
                ValidationViolation {
                    field: "unitValue".to_string(),
                    code: "UNIT_VALUE_NOT_POSITIVE".to_string(),
                    message: "unitValue: inválido".to_string(),
                },
            ],
        };
        let api_err: ApiError = err.into();
        assert_eq!(api_err.violations().len(), 2);
        match api_err {
            ApiError::ValidationFailed { reason, .. } => {
                assert!(reason.starts_with("quantity: inválida"));
                assert!(reason.contains("+1"));
            }
            _ => panic!("Expected ValidationFailed"),
        }
    }
}
