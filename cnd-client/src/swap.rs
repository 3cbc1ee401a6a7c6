use crate::action::Action;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, convert::TryFrom};

/// A swap as cnd reports it.
///
/// cnd renders swaps either as a Siren entity (`properties`, `actions`,
/// `links`) or, in its older API, as a flat document with HAL `_links`.
/// Both are accepted.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "RawSwapResource")]
pub struct SwapResource {
    pub state: String,
    pub properties: Map<String, Value>,
    pub links: BTreeMap<String, Link>,
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

impl SwapResource {
    /// An action cnd rendered inline, by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.name == name)
    }

    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    /// Whether `name` is available either inline or as a link.
    pub fn has_action(&self, name: &str) -> bool {
        self.action(name).is_some() || self.link(name).is_some()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

#[derive(Deserialize)]
struct RawSwapResource {
    state: Option<String>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default, rename = "_links")]
    hal_links: BTreeMap<String, Link>,
    #[serde(default)]
    links: Vec<SirenLink>,
    #[serde(default)]
    actions: Vec<Action>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
struct SirenLink {
    rel: Vec<String>,
    href: String,
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("swap resource has no state")]
pub struct MissingState;

impl TryFrom<RawSwapResource> for SwapResource {
    type Error = MissingState;

    fn try_from(raw: RawSwapResource) -> Result<Self, Self::Error> {
        let RawSwapResource {
            state,
            properties,
            hal_links,
            links: siren_links,
            actions,
            rest,
        } = raw;

        let state = match state {
            Some(state) => state,
            None => properties
                .get("state")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
                .ok_or(MissingState)?,
        };

        let mut links = hal_links;
        for SirenLink { rel, href } in siren_links {
            for rel in rel {
                links
                    .entry(rel)
                    .or_insert_with(|| Link { href: href.clone() });
            }
        }

        let mut all_properties = rest;
        all_properties.extend(properties);

        Ok(SwapResource {
            state,
            properties: all_properties,
            links,
            actions,
        })
    }
}
