pub mod transformers;

use crate::{
    errors::{ConnectorError, CustomResult},
    transport::Transport,
    types::{DisableResult, ListResult, RecurringParams, RecurringResponse, StoreTokenResult},
    utils::xml_utils::{QuickXmlEngine, XmlEngine, XmlNode},
    validate::{self, string_field, RequiredField},
};

/// Gateway environments and their recurring SOAP endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Test,
    Live,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Test => "https://pal-test.adyen.com/pal/servlet/soap/Recurring",
            Self::Live => "https://pal-live.adyen.com/pal/servlet/soap/Recurring",
        }
    }
}

/// Connector parameters for the recurring service.
#[derive(Debug, Clone)]
pub struct AdyenConfig {
    pub base_url: String,
}

impl From<Environment> for AdyenConfig {
    fn from(environment: Environment) -> Self {
        Self {
            base_url: environment.base_url().to_string(),
        }
    }
}

/// Actions exposed by the recurring service; the display form is the wire
/// name used for the SOAP body element and the SOAPAction header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum Action {
    #[strum(serialize = "listRecurringDetails")]
    ListRecurringDetails,
    #[strum(serialize = "disable")]
    Disable,
    #[strum(serialize = "storeToken")]
    StoreToken,
}

impl Action {
    fn required_fields(&self) -> &'static [RequiredField<RecurringParams>] {
        match self {
            Self::ListRecurringDetails => LIST_REQUIRED_FIELDS,
            Self::Disable => DISABLE_REQUIRED_FIELDS,
            Self::StoreToken => STORE_TOKEN_REQUIRED_FIELDS,
        }
    }
}

const LIST_REQUIRED_FIELDS: &[RequiredField<RecurringParams>] = &[
    RequiredField {
        name: "merchant_account",
        probe: |params| string_field(params.merchant_account.as_deref()),
    },
    RequiredField {
        name: "shopper.reference",
        probe: |params| string_field(params.shopper_reference()),
    },
];

const DISABLE_REQUIRED_FIELDS: &[RequiredField<RecurringParams>] = &[
    RequiredField {
        name: "merchant_account",
        probe: |params| string_field(params.merchant_account.as_deref()),
    },
    RequiredField {
        name: "shopper.reference",
        probe: |params| string_field(params.shopper_reference()),
    },
];

const STORE_TOKEN_REQUIRED_FIELDS: &[RequiredField<RecurringParams>] = &[
    RequiredField {
        name: "merchant_account",
        probe: |params| string_field(params.merchant_account.as_deref()),
    },
    RequiredField {
        name: "shopper.reference",
        probe: |params| string_field(params.shopper_reference()),
    },
    RequiredField {
        name: "shopper.email",
        probe: |params| string_field(params.shopper_email()),
    },
];

/// Integration with the recurring-contract SOAP service.
///
/// Holds no per-call state; one instance can serve concurrent calls, each on
/// its own parameter set.
pub struct Adyen {
    config: AdyenConfig,
    xml_engine: Box<dyn XmlEngine + Send + Sync>,
}

impl Adyen {
    pub fn new(config: AdyenConfig) -> Self {
        Self {
            config,
            xml_engine: Box::new(QuickXmlEngine),
        }
    }

    /// Swaps the XML engine backing response parsing. Every engine produces
    /// identical results; which one is available depends on the host.
    pub fn with_xml_engine(mut self, engine: Box<dyn XmlEngine + Send + Sync>) -> Self {
        self.xml_engine = engine;
        self
    }

    pub fn id(&self) -> &'static str {
        "adyen"
    }

    fn endpoint(&self) -> &str {
        &self.config.base_url
    }

    /// Runs one action end to end: validate, build, submit, parse.
    pub fn perform(
        &self,
        action: Action,
        params: &RecurringParams,
        transport: &dyn Transport,
    ) -> CustomResult<RecurringResponse, ConnectorError> {
        match action {
            Action::ListRecurringDetails => {
                self.list(params, transport).map(RecurringResponse::List)
            }
            Action::Disable => self
                .disable(params, transport)
                .map(RecurringResponse::Disable),
            Action::StoreToken => self
                .store_token(params, transport)
                .map(RecurringResponse::StoreToken),
        }
    }

    /// Lists the shopper's stored payment details.
    pub fn list(
        &self,
        params: &RecurringParams,
        transport: &dyn Transport,
    ) -> CustomResult<ListResult, ConnectorError> {
        let tree = self.submit_action(Action::ListRecurringDetails, params, transport)?;
        transformers::parse_list_response(&tree)
    }

    /// Disables one stored detail when `recurring_detail_reference` is set,
    /// otherwise all of the shopper's details.
    pub fn disable(
        &self,
        params: &RecurringParams,
        transport: &dyn Transport,
    ) -> CustomResult<DisableResult, ConnectorError> {
        let tree = self.submit_action(Action::Disable, params, transport)?;
        transformers::parse_disable_response(&tree)
    }

    /// Stores the supplied card or ELV account as a reusable detail.
    pub fn store_token(
        &self,
        params: &RecurringParams,
        transport: &dyn Transport,
    ) -> CustomResult<StoreTokenResult, ConnectorError> {
        let tree = self.submit_action(Action::StoreToken, params, transport)?;
        transformers::parse_store_token_response(&tree)
    }

    // Validation and encoding run before the transport is touched, so no
    // request leaves with an invalid parameter set.
    fn submit_action(
        &self,
        action: Action,
        params: &RecurringParams,
        transport: &dyn Transport,
    ) -> CustomResult<XmlNode, ConnectorError> {
        validate::validate_params(action.required_fields(), params)?;
        let body = transformers::build_action_request(action, params)?;
        tracing::debug!(action = %action, url = self.endpoint(), "submitting recurring request");
        let response_body = match transport.submit(self.endpoint(), &action.to_string(), &body) {
            Ok(response_body) => response_body,
            Err(fault) => {
                tracing::error!(action = %action, "transport fault");
                return Err(fault);
            }
        };
        self.xml_engine.parse(&response_body)
    }
}
