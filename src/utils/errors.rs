use thiserror::Error;

/// Main error type for the analysis pipeline
#[derive(Error, Debug)]
pub enum DreError {
    #[error("Reference context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("API credential is not configured")]
    CredentialMissing,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Model request timed out after {seconds}s")]
    GatewayTimeout { seconds: u64 },

    #[error("Upstream error{}: {excerpt}", status_suffix(.status))]
    UpstreamError { status: Option<u16>, excerpt: String },

    #[error("Model returned an empty completion")]
    EmptyCompletion,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl DreError {
    /// HTTP status code used when the error crosses the request boundary
    pub fn status_code(&self) -> u16 {
        match self {
            DreError::InvalidInput(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to show to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            DreError::ContextUnavailable(_) => {
                "Não foi possível carregar o material de referência. Tente novamente em instantes."
            }
            DreError::CredentialMissing | DreError::ConfigError(_) => {
                "O serviço de análise não está configurado corretamente."
            }
            DreError::GatewayTimeout { .. } => "O modelo demorou demais para responder. Tente novamente.",
            DreError::UpstreamError { .. } => "O serviço de IA retornou um erro.",
            DreError::EmptyCompletion => "O modelo não retornou conteúdo.",
            DreError::InvalidInput(_) => "Requisição inválida.",
        }
    }

    /// Short technical detail. Never includes credentials.
    pub fn details(&self) -> Option<String> {
        match self {
            DreError::ContextUnavailable(_) | DreError::CredentialMissing => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DreError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(DreError::EmptyCompletion.status_code(), 500);
        assert_eq!(DreError::GatewayTimeout { seconds: 30 }.status_code(), 500);
    }

    #[test]
    fn test_upstream_display_includes_status() {
        let err = DreError::UpstreamError {
            status: Some(404),
            excerpt: "model not found".into(),
        };
        assert_eq!(err.to_string(), "Upstream error (status 404): model not found");

        let err = DreError::UpstreamError {
            status: None,
            excerpt: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "Upstream error: connection refused");
    }

    #[test]
    fn test_context_details_hidden() {
        let err = DreError::ContextUnavailable("/srv/secret/path: denied".into());
        assert!(err.details().is_none());
    }
}
