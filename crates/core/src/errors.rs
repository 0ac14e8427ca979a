use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("text generation failed: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

/// Failure as presented at the HTTP boundary. Every uncaught failure maps to
/// a generic server error carrying the original message as its detail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn detail(&self) -> &str {
        match self {
            Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = match value {
            ApplicationError::Integration(message) | ApplicationError::Configuration(message) => {
                message
            }
        };
        Self::Internal { message, correlation_id: "unassigned".to_owned() }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, InterfaceError};

    #[test]
    fn integration_failure_keeps_its_message_as_detail() {
        let interface =
            ApplicationError::Integration("upstream returned 503".to_owned()).into_interface("req-1");

        assert_eq!(interface.detail(), "upstream returned 503");
        assert_eq!(interface.correlation_id(), "req-1");
    }

    #[test]
    fn configuration_failure_maps_to_internal() {
        let interface = ApplicationError::Configuration("llm.api_key is required".to_owned())
            .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.detail(), "llm.api_key is required");
    }

    #[test]
    fn unassigned_correlation_id_is_the_default() {
        let interface = InterfaceError::from(ApplicationError::Integration("boom".to_owned()));
        assert_eq!(interface.correlation_id(), "unassigned");
    }
}
