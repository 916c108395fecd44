use error_stack::ResultExt;
use hyperswitch_masking::PeekInterface;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, Date, Month, OffsetDateTime};

use super::Action;
use crate::{
    consts,
    errors::{ConnectorError, CustomResult},
    types::{
        Card, DisableResult, Elv, ListResult, PaymentMethodDetail, RecurringDetail,
        RecurringParams, StoreTokenResult,
    },
    utils::{self, xml_utils::XmlNode},
};

// ============================================================================
// XML SERIALIZATION STRUCTURES (for quick-xml)
// ============================================================================

// Declaration order is emission order: merchantAccount and shopperReference
// always serialize first.

#[derive(Debug, Serialize)]
struct ListRequestXml {
    #[serde(rename = "recurring:merchantAccount")]
    merchant_account: String,
    #[serde(rename = "recurring:shopperReference")]
    shopper_reference: String,
    #[serde(rename = "recurring:recurring")]
    recurring: RecurringContractXml,
}

#[derive(Debug, Serialize)]
struct DisableRequestXml {
    #[serde(rename = "recurring:merchantAccount")]
    merchant_account: String,
    #[serde(rename = "recurring:shopperReference")]
    shopper_reference: String,
    #[serde(
        rename = "recurring:recurringDetailReference",
        skip_serializing_if = "Option::is_none"
    )]
    recurring_detail_reference: Option<String>,
}

#[derive(Debug, Serialize)]
struct StoreTokenRequestXml {
    #[serde(rename = "recurring:merchantAccount")]
    merchant_account: String,
    #[serde(rename = "recurring:shopperReference")]
    shopper_reference: String,
    #[serde(rename = "recurring:shopperEmail")]
    shopper_email: String,
    #[serde(rename = "recurring:card", skip_serializing_if = "Option::is_none")]
    card: Option<CardXml>,
    #[serde(rename = "recurring:elv", skip_serializing_if = "Option::is_none")]
    elv: Option<ElvXml>,
    #[serde(rename = "recurring:recurring")]
    recurring: RecurringContractXml,
}

#[derive(Debug, Serialize)]
struct RecurringContractXml {
    #[serde(rename = "payment:contract")]
    contract: &'static str,
}

impl Default for RecurringContractXml {
    fn default() -> Self {
        Self {
            contract: consts::RECURRING_CONTRACT,
        }
    }
}

#[derive(Debug, Serialize)]
struct CardXml {
    #[serde(rename = "payment:holderName")]
    holder_name: String,
    #[serde(rename = "payment:number")]
    number: String,
    #[serde(rename = "payment:cvc")]
    cvc: String,
    #[serde(rename = "payment:expiryMonth")]
    expiry_month: String,
    #[serde(rename = "payment:expiryYear")]
    expiry_year: String,
    #[serde(rename = "payment:issueNumber", skip_serializing_if = "Option::is_none")]
    issue_number: Option<String>,
    #[serde(rename = "payment:startMonth", skip_serializing_if = "Option::is_none")]
    start_month: Option<String>,
    #[serde(rename = "payment:startYear", skip_serializing_if = "Option::is_none")]
    start_year: Option<String>,
}

impl From<&Card> for CardXml {
    fn from(card: &Card) -> Self {
        Self {
            holder_name: card.holder_name.peek().to_string(),
            number: card.number.peek().to_string(),
            cvc: card.cvc.peek().to_string(),
            expiry_month: utils::two_digit_month(card.expiry_month),
            expiry_year: card.expiry_year.to_string(),
            issue_number: card.issue_number.clone(),
            start_month: card.start_month.map(utils::two_digit_month),
            start_year: card.start_year.map(|year| year.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ElvXml {
    #[serde(rename = "payment:accountHolderName")]
    account_holder_name: String,
    #[serde(rename = "payment:bankAccountNumber")]
    bank_account_number: String,
    #[serde(rename = "payment:bankLocation")]
    bank_location: String,
    #[serde(rename = "payment:bankLocationId")]
    bank_location_id: String,
    #[serde(rename = "payment:bankName")]
    bank_name: String,
}

impl From<&Elv> for ElvXml {
    fn from(elv: &Elv) -> Self {
        Self {
            account_holder_name: elv.holder_name.peek().to_string(),
            bank_account_number: elv.number.peek().to_string(),
            bank_location: elv.bank_location.clone(),
            bank_location_id: elv.bank_location_id.clone(),
            bank_name: elv.bank_name.clone(),
        }
    }
}

// ============================================================================
// REQUEST TRANSFORMATION
// ============================================================================

impl TryFrom<&RecurringParams> for ListRequestXml {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(params: &RecurringParams) -> Result<Self, Self::Error> {
        Ok(Self {
            merchant_account: merchant_account(params)?,
            shopper_reference: shopper_reference(params)?,
            recurring: RecurringContractXml::default(),
        })
    }
}

impl TryFrom<&RecurringParams> for DisableRequestXml {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(params: &RecurringParams) -> Result<Self, Self::Error> {
        Ok(Self {
            merchant_account: merchant_account(params)?,
            shopper_reference: shopper_reference(params)?,
            recurring_detail_reference: params
                .recurring_detail_reference
                .as_deref()
                .filter(|reference| !reference.is_empty())
                .map(ToOwned::to_owned),
        })
    }
}

impl TryFrom<&RecurringParams> for StoreTokenRequestXml {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(params: &RecurringParams) -> Result<Self, Self::Error> {
        Ok(Self {
            merchant_account: merchant_account(params)?,
            shopper_reference: shopper_reference(params)?,
            shopper_email: params
                .shopper_email()
                .ok_or(ConnectorError::MissingRequiredField {
                    field_name: "shopper.email",
                })?
                .to_owned(),
            card: params.card.as_ref().map(CardXml::from),
            elv: params.elv.as_ref().map(ElvXml::from),
            recurring: RecurringContractXml::default(),
        })
    }
}

fn merchant_account(params: &RecurringParams) -> CustomResult<String, ConnectorError> {
    params
        .merchant_account
        .clone()
        .ok_or_else(|| {
            ConnectorError::MissingRequiredField {
                field_name: "merchant_account",
            }
            .into()
        })
}

fn shopper_reference(params: &RecurringParams) -> CustomResult<String, ConnectorError> {
    params
        .shopper_reference()
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ConnectorError::MissingRequiredField {
                field_name: "shopper.reference",
            }
            .into()
        })
}

/// Builds the complete SOAP document for an action. Callers validate the
/// parameter set against the action's spec before entering here.
pub fn build_action_request(
    action: Action,
    params: &RecurringParams,
) -> CustomResult<String, ConnectorError> {
    let request_xml = match action {
        Action::ListRecurringDetails => utils::serialize_to_xml_string_with_root(
            "recurring:request",
            &ListRequestXml::try_from(params)?,
        )?,
        Action::Disable => utils::serialize_to_xml_string_with_root(
            "recurring:request",
            &DisableRequestXml::try_from(params)?,
        )?,
        Action::StoreToken => utils::serialize_to_xml_string_with_root(
            "recurring:request",
            &StoreTokenRequestXml::try_from(params)?,
        )?,
    };
    Ok(to_soap_envelope(action, &request_xml))
}

// Only the envelope frame is hand-written; every value inside it went
// through the serializer's escaping.
fn to_soap_envelope(action: Action, request_xml: &str) -> String {
    format!(
        r#"<soap:Envelope xmlns:soap="{soap_ns}" xmlns:recurring="{recurring_ns}" xmlns:payment="{payment_ns}"><soap:Body><recurring:{action}>{request_xml}</recurring:{action}></soap:Body></soap:Envelope>"#,
        soap_ns = consts::SOAP_ENV_NAMESPACE,
        recurring_ns = consts::RECURRING_NAMESPACE,
        payment_ns = consts::PAYMENT_NAMESPACE,
    )
}

// ============================================================================
// RESPONSE TRANSFORMATION
// ============================================================================

pub fn parse_list_response(root: &XmlNode) -> CustomResult<ListResult, ConnectorError> {
    check_soap_fault(root)?;
    let response = root.descendant("listRecurringDetailsResponse").ok_or(
        ConnectorError::MissingResponseField {
            field_name: "listRecurringDetailsResponse",
        },
    )?;
    // An empty result section is a valid "no stored details" answer.
    let Some(result) = response.descendant("result") else {
        return Ok(ListResult::default());
    };
    let details = result
        .nodes_at("details/RecurringDetail")
        .into_iter()
        .map(parse_recurring_detail)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ListResult {
        creation_date: optional_datetime(result.text_at("creationDate"))?,
        last_known_shopper_email: result
            .text_at("lastKnownShopperEmail")
            .map(ToOwned::to_owned),
        shopper_reference: result.text_at("shopperReference").map(ToOwned::to_owned),
        details,
    })
}

fn parse_recurring_detail(node: &XmlNode) -> CustomResult<RecurringDetail, ConnectorError> {
    Ok(RecurringDetail {
        recurring_detail_reference: node
            .text_at("recurringDetailReference")
            .ok_or(ConnectorError::MissingResponseField {
                field_name: "recurringDetailReference",
            })?
            .to_owned(),
        variant: node.text_at("variant").unwrap_or_default().to_owned(),
        creation_date: parse_datetime(node.text_at("creationDate"), "creationDate")?,
        payment_method: parse_payment_method(node)?,
    })
}

// The method block is selected by whichever method subtree is populated.
fn parse_payment_method(
    node: &XmlNode,
) -> CustomResult<Option<PaymentMethodDetail>, ConnectorError> {
    if let Some(card) = populated_block(node, "card") {
        return Ok(Some(PaymentMethodDetail::Card {
            expiry_date: expiry_date(card.text_at("expiryMonth"), card.text_at("expiryYear"))?,
            holder_name: card.text_at("holderName").unwrap_or_default().to_owned(),
            number: card.text_at("number").unwrap_or_default().to_owned(),
        }));
    }
    if let Some(elv) = populated_block(node, "elv") {
        return Ok(Some(PaymentMethodDetail::Elv {
            holder_name: elv.text_at("holderName").unwrap_or_default().to_owned(),
            number: elv.text_at("number").unwrap_or_default().to_owned(),
            bank_location: elv.text_at("bankLocation").unwrap_or_default().to_owned(),
            bank_location_id: elv.text_at("bankLocationId").unwrap_or_default().to_owned(),
            bank_name: elv.text_at("bankName").unwrap_or_default().to_owned(),
        }));
    }
    if let Some(bank) = populated_block(node, "bank") {
        return Ok(Some(PaymentMethodDetail::Bank {
            number: bank.text_at("number").unwrap_or_default().to_owned(),
            bank_location_id: bank.text_at("bankLocationId").unwrap_or_default().to_owned(),
            bank_name: bank.text_at("bankName").unwrap_or_default().to_owned(),
            bic: bank.text_at("bic").unwrap_or_default().to_owned(),
            country_code: bank.text_at("countryCode").unwrap_or_default().to_owned(),
            iban: bank.text_at("iban").unwrap_or_default().to_owned(),
            holder_name: bank.text_at("holderName").unwrap_or_default().to_owned(),
        }));
    }
    Ok(None)
}

fn populated_block<'a>(node: &'a XmlNode, name: &str) -> Option<&'a XmlNode> {
    node.nodes_at(name)
        .into_iter()
        .find(|block| block.has_elements())
}

pub fn parse_disable_response(root: &XmlNode) -> CustomResult<DisableResult, ConnectorError> {
    check_soap_fault(root)?;
    let response =
        root.descendant("disableResponse")
            .ok_or(ConnectorError::MissingResponseField {
                field_name: "disableResponse",
            })?;
    let code = response
        .descendant("result")
        .and_then(|result| result.text_at("response"))
        .ok_or(ConnectorError::MissingResponseField {
            field_name: "result/response",
        })?;
    Ok(DisableResult {
        response: code.to_owned(),
    })
}

pub fn parse_store_token_response(
    root: &XmlNode,
) -> CustomResult<StoreTokenResult, ConnectorError> {
    check_soap_fault(root)?;
    let response =
        root.descendant("storeTokenResponse")
            .ok_or(ConnectorError::MissingResponseField {
                field_name: "storeTokenResponse",
            })?;
    let Some(result) = response.descendant("result") else {
        return Ok(StoreTokenResult::default());
    };
    Ok(StoreTokenResult {
        psp_reference: result.text_at("pspReference").map(ToOwned::to_owned),
        result_code: result.text_at("result").map(ToOwned::to_owned),
        recurring_detail_reference: result
            .text_at("recurringDetailReference")
            .map(ToOwned::to_owned),
    })
}

fn check_soap_fault(root: &XmlNode) -> CustomResult<(), ConnectorError> {
    if let Some(fault) = root.descendant("Fault") {
        let message = fault
            .text_at("faultstring")
            .unwrap_or("unknown SOAP fault")
            .to_owned();
        return Err(ConnectorError::SoapFault { message }.into());
    }
    Ok(())
}

fn parse_datetime(
    text: Option<&str>,
    field_name: &'static str,
) -> CustomResult<OffsetDateTime, ConnectorError> {
    let value = text.ok_or(ConnectorError::MissingResponseField { field_name })?;
    OffsetDateTime::parse(value, &Rfc3339)
        .change_context(ConnectorError::ResponseDeserializationFailed)
        .attach_printable_lazy(|| format!("invalid timestamp in {field_name}"))
}

fn optional_datetime(
    text: Option<&str>,
) -> CustomResult<Option<OffsetDateTime>, ConnectorError> {
    text.map(|value| {
        OffsetDateTime::parse(value, &Rfc3339)
            .change_context(ConnectorError::ResponseDeserializationFailed)
    })
    .transpose()
}

// A stored card reports only its expiry month and year; the detail is usable
// through the last day of that month.
fn expiry_date(
    month_text: Option<&str>,
    year_text: Option<&str>,
) -> CustomResult<Date, ConnectorError> {
    let month: u8 = month_text
        .ok_or(ConnectorError::MissingResponseField {
            field_name: "card/expiryMonth",
        })?
        .parse()
        .change_context(ConnectorError::ResponseDeserializationFailed)?;
    let year: i32 = year_text
        .ok_or(ConnectorError::MissingResponseField {
            field_name: "card/expiryYear",
        })?
        .parse()
        .change_context(ConnectorError::ResponseDeserializationFailed)?;
    let month =
        Month::try_from(month).change_context(ConnectorError::ResponseDeserializationFailed)?;
    Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .change_context(ConnectorError::ResponseDeserializationFailed)
}
