/// Shorthand for a result carrying an `error_stack` report.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConnectorError {
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Missing required fields: {field_names:?}")]
    MissingRequiredFields { field_names: Vec<&'static str> },
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Transport failure while reaching the gateway")]
    TransportFault,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Missing field in connector response: {field_name}")]
    MissingResponseField { field_name: &'static str },
    #[error("The gateway returned a SOAP fault: {message}")]
    SoapFault { message: String },
}
