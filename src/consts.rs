//! Wire-level constants shared across request building and response parsing.

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace of the envelope-level recurring elements.
pub const RECURRING_NAMESPACE: &str = "http://recurring.services.adyen.com";

/// Namespace of the payment-method-level elements.
pub const PAYMENT_NAMESPACE: &str = "http://payment.services.adyen.com";

/// Contract type sent for card and token-storage actions.
pub const RECURRING_CONTRACT: &str = "RECURRING";

/// Result code for a single detail disabled.
pub const DETAIL_DISABLED: &str = "[detail-successfully-disabled]";

/// Result code for all of a shopper's details disabled.
pub const ALL_DETAILS_DISABLED: &str = "[all-details-successfully-disabled]";

/// Result code for a successfully stored token.
pub const STORE_TOKEN_SUCCESS: &str = "Success";
