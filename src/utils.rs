pub mod xml_utils;

use error_stack::ResultExt;
use serde::Serialize;

use crate::errors::{ConnectorError, CustomResult};

/// Serializes `data` under `root_name` without an XML declaration; the SOAP
/// envelope supplies the document frame.
pub fn serialize_to_xml_string_with_root<T: Serialize>(
    root_name: &str,
    data: &T,
) -> CustomResult<String, ConnectorError> {
    quick_xml::se::to_string_with_root(root_name, data)
        .change_context(ConnectorError::RequestEncodingFailed)
        .attach_printable("Failed to serialize XML with root")
}

/// Months render as exactly two digits on the wire.
pub fn two_digit_month(month: u8) -> String {
    format!("{month:02}")
}
