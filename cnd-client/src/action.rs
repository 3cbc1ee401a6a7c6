use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use strum_macros::{Display, EnumString};

/// A Siren action as cnd renders it for a swap.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Action {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    /// Siren defaults to GET if an action does not name its method.
    #[serde(default)]
    pub method: Method,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Action {
    /// Lets callers inspect a field before choosing values for it.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Clone, Copy, Debug, Display, EnumString, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// GET and DELETE requests cannot carry a body.
    pub fn has_body(self) -> bool {
        !matches!(self, Method::Get | Method::Delete)
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Get
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("unsupported HTTP method {0}")]
pub struct UnsupportedMethod(pub String);

impl TryFrom<String> for Method {
    type Error = UnsupportedMethod;

    fn try_from(method: String) -> Result<Self, Self::Error> {
        method.parse().map_err(|_| UnsupportedMethod(method))
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.to_string()
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// An input of a Siren action.
///
/// A `value` sent by cnd is authoritative: the field is submitted as is and
/// never handed to a resolver.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Field {
    /// Derive what kind of value this field expects.
    ///
    /// The Siren `class` list is authoritative, the field name is only
    /// consulted if the classes do not name a known kind.
    pub fn hint(&self) -> FieldHint {
        let ledger = self.class.iter().find_map(|class| Chain::from_class(class));
        let kind = self
            .class
            .iter()
            .find_map(|class| FieldKind::from_class(class))
            .or_else(|| FieldKind::from_class(&self.name))
            .unwrap_or(FieldKind::Generic);

        FieldHint { ledger, kind }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldHint {
    pub ledger: Option<Chain>,
    pub kind: FieldKind,
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Lightning,
}

impl Chain {
    fn from_class(class: &str) -> Option<Self> {
        match class {
            "bitcoin" => Some(Chain::Bitcoin),
            "ethereum" => Some(Chain::Ethereum),
            "lightning" => Some(Chain::Lightning),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Address,
    Data,
    Value,
    GasLimit,
    FeePerWu,
    Generic,
}

impl FieldKind {
    fn from_class(class: &str) -> Option<Self> {
        match class {
            "address" => Some(FieldKind::Address),
            "data" => Some(FieldKind::Data),
            "value" | "amount" => Some(FieldKind::Value),
            "gas_limit" | "gasLimit" => Some(FieldKind::GasLimit),
            // feePerByte is what older cnd versions called the fee per WU
            "fee_per_wu" | "feePerWU" | "feePerByte" => Some(FieldKind::FeePerWu),
            _ => None,
        }
    }
}
