//! Synchronous transport seam between the integration core and HTTP.
//!
//! The core never retries; a failed submission surfaces immediately and the
//! caller owns retry policy.

use error_stack::ResultExt;

use crate::errors::{ConnectorError, CustomResult};

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const SOAP_ACTION: &str = "SOAPAction";
}

const TEXT_XML_UTF8: &str = "text/xml; charset=utf-8";

/// Sends one request document and returns the raw response body. The body
/// must round-trip UTF-8 text byte-exactly.
pub trait Transport {
    fn submit(
        &self,
        url: &str,
        soap_action: &str,
        body: &str,
    ) -> CustomResult<String, ConnectorError>;
}

/// Blocking HTTP transport. SOAP endpoints report gateway-level failures as
/// XML bodies on non-2xx statuses, so a body that still looks like XML is
/// handed to the parser rather than swallowed here.
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn submit(
        &self,
        url: &str,
        soap_action: &str,
        body: &str,
    ) -> CustomResult<String, ConnectorError> {
        let response = self
            .client
            .post(url)
            .header(headers::CONTENT_TYPE, TEXT_XML_UTF8)
            .header(headers::SOAP_ACTION, soap_action)
            .body(body.to_owned())
            .send()
            .change_context(ConnectorError::TransportFault)?;
        let status = response.status();
        let body = response
            .text()
            .change_context(ConnectorError::TransportFault)?;
        if !status.is_success() && !body.trim_start().starts_with('<') {
            return Err(ConnectorError::TransportFault)
                .attach_printable(format!("gateway returned HTTP {status}"));
        }
        Ok(body)
    }
}
