use crate::{
    action::{Action, Method},
    resolve::ResolveField,
};
use serde_json::Value;
use url::Url;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// A concrete HTTP request derived from a Siren action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub method: Method,
    pub url: Url,
    pub body: Body,
}

impl ActionRequest {
    pub fn content_type(&self) -> Option<&'static str> {
        self.body.content_type()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Form(String),
}

impl Body {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Empty => None,
            Body::Json(_) => Some(APPLICATION_JSON),
            Body::Form(_) => Some(APPLICATION_FORM),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("href {href} of action {action} is not a valid URL")]
    InvalidHref {
        action: String,
        href: String,
        #[source]
        source: url::ParseError,
    },
    #[error("resolver failed to produce field {field} of action {action}")]
    Resolver {
        action: String,
        field: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("no value for field {field} of action {action}")]
    NoValue { action: String, field: String },
    #[error("field {field} appears more than once in action {action}")]
    DuplicateField { action: String, field: String },
    #[error("media type {media_type} of action {action} is not supported")]
    UnsupportedMediaType { action: String, media_type: String },
    #[error("failed to form-encode fields of action {action}")]
    FormEncoding {
        action: String,
        #[source]
        source: serde_urlencoded::ser::Error,
    },
}

/// Turn a Siren action into the request that executes it.
///
/// Fields with a value from cnd are used verbatim. Every other field is
/// resolved exactly once, in order; the first resolver failure or missing
/// value aborts the conversion. A resolved `null` counts as missing.
pub async fn to_request<R>(
    base_url: &Url,
    action: &Action,
    resolver: &R,
) -> Result<ActionRequest, ConversionError>
where
    R: ResolveField + ?Sized,
{
    let url = base_url
        .join(&action.href)
        .map_err(|source| ConversionError::InvalidHref {
            action: action.name.clone(),
            href: action.href.clone(),
            source,
        })?;

    let values = resolve_fields(action, resolver).await?;

    let mut request = ActionRequest {
        method: action.method,
        url,
        body: Body::Empty,
    };

    if !action.method.has_body() {
        if !values.is_empty() {
            let mut query = request.url.query_pairs_mut();
            for (name, value) in values.iter() {
                query.append_pair(name, &plain_text(value));
            }
        }
        return Ok(request);
    }

    request.body = match media_type(action) {
        None | Some(APPLICATION_JSON) => Body::Json(Value::Object(values.into_iter().collect())),
        Some(APPLICATION_FORM) => {
            let pairs = values
                .iter()
                .map(|(name, value)| (name.as_str(), plain_text(value)))
                .collect::<Vec<_>>();
            let encoded = serde_urlencoded::to_string(pairs).map_err(|source| {
                ConversionError::FormEncoding {
                    action: action.name.clone(),
                    source,
                }
            })?;

            Body::Form(encoded)
        }
        Some(other) => {
            return Err(ConversionError::UnsupportedMediaType {
                action: action.name.clone(),
                media_type: other.to_owned(),
            })
        }
    };

    Ok(request)
}

/// Values in the order the action lists its fields.
async fn resolve_fields<R>(
    action: &Action,
    resolver: &R,
) -> Result<Vec<(String, Value)>, ConversionError>
where
    R: ResolveField + ?Sized,
{
    let mut values: Vec<(String, Value)> = Vec::with_capacity(action.fields.len());

    for field in action.fields.iter() {
        if values.iter().any(|(name, _)| name == &field.name) {
            return Err(ConversionError::DuplicateField {
                action: action.name.clone(),
                field: field.name.clone(),
            });
        }

        let value = match &field.value {
            Some(value) => value.clone(),
            None => resolver
                .resolve(&field.name, &field.hint())
                .await
                .map_err(|source| ConversionError::Resolver {
                    action: action.name.clone(),
                    field: field.name.clone(),
                    source,
                })?
                .filter(|value| !value.is_null())
                .ok_or_else(|| ConversionError::NoValue {
                    action: action.name.clone(),
                    field: field.name.clone(),
                })?,
        };
        tracing::trace!("field {} of action {} resolved to {}", field.name, action.name, value);

        values.push((field.name.clone(), value));
    }

    Ok(values)
}

/// The media type without parameters such as `charset`.
fn media_type(action: &Action) -> Option<&str> {
    action
        .media_type
        .as_deref()
        .map(|media_type| media_type.split(';').next().unwrap_or_default().trim())
}

/// Query strings and form bodies carry strings as is; everything else is
/// rendered as JSON.
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}
