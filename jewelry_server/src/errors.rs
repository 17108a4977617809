use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use jewelry_engine::OrderFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The payment provider could not be used. {0}")]
    PaymentProviderError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::PaymentProviderError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("The access token is not valid. {0}")]
    ValidationError(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::Validation(_) | OrderFlowError::ProductsUnavailable(_) => {
                Self::InvalidRequestBody(e.to_string())
            },
            OrderFlowError::Persistence(e) => Self::BackendError(e),
            OrderFlowError::Gateway(e) => Self::PaymentProviderError(e),
            OrderFlowError::UnknownTransaction(_) | OrderFlowError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn workflow_errors_map_to_status_codes() {
        let cases = [
            (OrderFlowError::Validation("order item is invalid".into()), StatusCode::BAD_REQUEST),
            (OrderFlowError::ProductsUnavailable(vec![3]), StatusCode::BAD_REQUEST),
            (OrderFlowError::Persistence("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (OrderFlowError::Gateway("timeout".into()), StatusCode::BAD_GATEWAY),
            (OrderFlowError::OrderNotFound(4), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = ServerError::from(OrderFlowError::Validation("invalid input body".into()));
        assert_eq!(err.to_string(), "invalid input body");
    }
}
