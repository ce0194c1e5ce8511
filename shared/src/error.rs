//! Error type shared by the ingestion adapter, the API client and the year picker.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeaveAdminError {
    #[error("Errore di rete: {0}")]
    Network(String),

    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Risposta non valida: {0}")]
    Parse(String),

    #[error("Formato dati non valido: {0}")]
    InvalidDataset(String),

    #[error("Timeout della richiesta dopo {0} ms")]
    Timeout(u32),

    #[error("Intervallo anni non valido: {0}")]
    InvalidYearRange(String),
}

impl From<serde_json::Error> for LeaveAdminError {
    fn from(err: serde_json::Error) -> Self {
        LeaveAdminError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = LeaveAdminError::Http {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let err: LeaveAdminError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, LeaveAdminError::Parse(_)));
    }
}
