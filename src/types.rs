//! Parameter model handed to the recurring actions, and the typed results
//! they produce.
//!
//! Everything here is a value object: constructed fresh per call, no identity
//! across calls, safe to move between threads.

use hyperswitch_masking::Secret;
use serde_json::{json, Map, Value};
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime};

use crate::consts;

/// Monetary value in minor units with its ISO-4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub currency: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Shopper {
    pub reference: Option<String>,
    pub email: Option<String>,
    pub ip: Option<String>,
    pub statement: Option<String>,
}

/// Card data used for token storage. PCI fields stay wrapped until the
/// request serializer peeks them.
#[derive(Debug, Clone)]
pub struct Card {
    pub holder_name: Secret<String>,
    pub number: Secret<String>,
    pub cvc: Secret<String>,
    pub expiry_month: u8,
    pub expiry_year: u16,
    // Maestro UK/Solo only
    pub issue_number: Option<String>,
    pub start_month: Option<u8>,
    pub start_year: Option<u16>,
}

/// German direct debit (Elektronisches Lastschriftverfahren) account data.
#[derive(Debug, Clone)]
pub struct Elv {
    pub holder_name: Secret<String>,
    pub number: Secret<String>,
    pub bank_location: String,
    pub bank_location_id: String,
    pub bank_name: String,
}

/// Input to every recurring action. Which fields must be present depends on
/// the action; the per-action specs in the connector own that policy, so all
/// fields are representable as absent here.
#[derive(Debug, Clone, Default)]
pub struct RecurringParams {
    pub merchant_account: Option<String>,
    pub reference: Option<String>,
    pub shopper: Option<Shopper>,
    pub amount: Option<Amount>,
    pub card: Option<Card>,
    pub elv: Option<Elv>,
    pub recurring_detail_reference: Option<String>,
}

impl RecurringParams {
    pub(crate) fn shopper_reference(&self) -> Option<&str> {
        self.shopper.as_ref().and_then(|s| s.reference.as_deref())
    }

    pub(crate) fn shopper_email(&self) -> Option<&str> {
        self.shopper.as_ref().and_then(|s| s.email.as_deref())
    }
}

/// Method-specific block of a stored detail. Exactly one populates per
/// detail; a detail whose method subtree is unrecognized carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodDetail {
    Card {
        expiry_date: Date,
        holder_name: String,
        number: String,
    },
    Bank {
        number: String,
        bank_location_id: String,
        bank_name: String,
        bic: String,
        country_code: String,
        iban: String,
        holder_name: String,
    },
    Elv {
        holder_name: String,
        number: String,
        bank_location: String,
        bank_location_id: String,
        bank_name: String,
    },
}

/// One stored payment method returned by `listRecurringDetails`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringDetail {
    pub recurring_detail_reference: String,
    pub variant: String,
    pub creation_date: OffsetDateTime,
    pub payment_method: Option<PaymentMethodDetail>,
}

/// Result of `listRecurringDetails`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResult {
    pub creation_date: Option<OffsetDateTime>,
    pub last_known_shopper_email: Option<String>,
    pub shopper_reference: Option<String>,
    pub details: Vec<RecurringDetail>,
}

impl ListResult {
    /// Detail references in response order; empty when no details exist.
    pub fn references(&self) -> Vec<&str> {
        self.details
            .iter()
            .map(|detail| detail.recurring_detail_reference.as_str())
            .collect()
    }

    /// Raw parameter view of the response. Empty when the response carried no
    /// top-level parameters.
    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        if let Some(date) = rfc3339(self.creation_date) {
            params.insert("creation_date".to_string(), Value::String(date));
        }
        if let Some(email) = &self.last_known_shopper_email {
            params.insert(
                "last_known_shopper_email".to_string(),
                Value::String(email.clone()),
            );
        }
        if let Some(reference) = &self.shopper_reference {
            params.insert(
                "shopper_reference".to_string(),
                Value::String(reference.clone()),
            );
        }
        if !self.details.is_empty() {
            let details = self
                .details
                .iter()
                .map(RecurringDetail::as_params)
                .collect::<Vec<_>>();
            params.insert("details".to_string(), Value::Array(details));
        }
        params
    }
}

impl RecurringDetail {
    fn as_params(&self) -> Value {
        let mut detail = Map::new();
        detail.insert(
            "recurring_detail_reference".to_string(),
            Value::String(self.recurring_detail_reference.clone()),
        );
        detail.insert("variant".to_string(), Value::String(self.variant.clone()));
        if let Some(date) = rfc3339(Some(self.creation_date)) {
            detail.insert("creation_date".to_string(), Value::String(date));
        }
        match &self.payment_method {
            Some(PaymentMethodDetail::Card {
                expiry_date,
                holder_name,
                number,
            }) => {
                detail.insert(
                    "card".to_string(),
                    json!({
                        "expiry_date": expiry_date.to_string(),
                        "holder_name": holder_name,
                        "number": number,
                    }),
                );
            }
            Some(PaymentMethodDetail::Bank {
                number,
                bank_location_id,
                bank_name,
                bic,
                country_code,
                iban,
                holder_name,
            }) => {
                detail.insert(
                    "bank".to_string(),
                    json!({
                        "number": number,
                        "bank_location_id": bank_location_id,
                        "bank_name": bank_name,
                        "bic": bic,
                        "country_code": country_code,
                        "iban": iban,
                        "holder_name": holder_name,
                    }),
                );
            }
            Some(PaymentMethodDetail::Elv {
                holder_name,
                number,
                bank_location,
                bank_location_id,
                bank_name,
            }) => {
                detail.insert(
                    "elv".to_string(),
                    json!({
                        "holder_name": holder_name,
                        "number": number,
                        "bank_location": bank_location,
                        "bank_location_id": bank_location_id,
                        "bank_name": bank_name,
                    }),
                );
            }
            None => {}
        }
        Value::Object(detail)
    }
}

/// Result of `disable`, for a single detail or for all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisableResult {
    pub response: String,
}

impl DisableResult {
    pub fn is_success(&self) -> bool {
        self.is_disabled()
    }

    pub fn is_disabled(&self) -> bool {
        self.response == consts::DETAIL_DISABLED || self.response == consts::ALL_DETAILS_DISABLED
    }

    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("response".to_string(), Value::String(self.response.clone()));
        params
    }
}

/// Result of `storeToken`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreTokenResult {
    pub psp_reference: Option<String>,
    pub result_code: Option<String>,
    pub recurring_detail_reference: Option<String>,
}

impl StoreTokenResult {
    pub fn is_success(&self) -> bool {
        self.result_code.as_deref() == Some(consts::STORE_TOKEN_SUCCESS)
    }

    /// Reference under which the stored detail can be charged later.
    pub fn token(&self) -> Option<&str> {
        self.recurring_detail_reference.as_deref()
    }

    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        if let Some(reference) = &self.psp_reference {
            params.insert("psp_reference".to_string(), Value::String(reference.clone()));
        }
        if let Some(code) = &self.result_code {
            params.insert("result".to_string(), Value::String(code.clone()));
        }
        if let Some(token) = &self.recurring_detail_reference {
            params.insert(
                "recurring_detail_reference".to_string(),
                Value::String(token.clone()),
            );
        }
        params
    }
}

/// Typed result of a dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum RecurringResponse {
    List(ListResult),
    Disable(DisableResult),
    StoreToken(StoreTokenResult),
}

fn rfc3339(date: Option<OffsetDateTime>) -> Option<String> {
    date.and_then(|value| value.format(&Rfc3339).ok())
}
