use serde::Serialize;

/// All application errors, categorized by domain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ── Data / Import ──
    #[error("Invalid CSV format: {0}")]
    InvalidCsvFormat(String),

    #[error("CSV parse error at row {row}: {message}")]
    CsvParseError { row: usize, message: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Failed to write file: {0}")]
    FileWrite(String),

    // ── Calendar ──
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid holiday table: {0}")]
    InvalidHolidays(String),

    // ── Configuration ──
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Serialization ──
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Serializable error response for front ends.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let code = match err {
            AppError::InvalidCsvFormat(_) => "INVALID_CSV_FORMAT",
            AppError::CsvParseError { .. } => "CSV_PARSE_ERROR",
            AppError::FileNotFound(_) => "FILE_NOT_FOUND",
            AppError::FileRead(_) => "FILE_READ",
            AppError::FileWrite(_) => "FILE_WRITE",
            AppError::InvalidDate(_) => "INVALID_DATE",
            AppError::InvalidHolidays(_) => "INVALID_HOLIDAYS",
            AppError::InvalidConfig(_) => "INVALID_CONFIG",
            AppError::Serialization(_) => "SERIALIZATION",
        };
        ErrorResponse {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

// Errors travel to front ends in the same shape as the JSON view.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let response = ErrorResponse::from(self);
        response.serialize(serializer)
    }
}

// ── Conversions from external errors ──

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => AppError::CsvParseError {
                row: pos.record() as usize,
                message: err.to_string(),
            },
            None => AppError::InvalidCsvFormat(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound(err.to_string()),
            _ => AppError::FileRead(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_code() {
        let err = AppError::CsvParseError {
            row: 4,
            message: "bad P/L".to_string(),
        };
        let resp = ErrorResponse::from(&err);
        assert_eq!(resp.code, "CSV_PARSE_ERROR");
        assert_eq!(resp.message, "CSV parse error at row 4: bad P/L");
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "output.csv");
        assert!(matches!(AppError::from(io), AppError::FileNotFound(_)));
    }

    #[test]
    fn test_error_serializes_as_response() {
        let json = serde_json::to_value(AppError::InvalidConfig("month 13".into())).unwrap();
        assert_eq!(json["code"], "INVALID_CONFIG");
        assert_eq!(json["message"], "Invalid configuration: month 13");
    }
}
