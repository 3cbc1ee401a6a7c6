use crate::action::FieldHint;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Produces values for action fields that cnd did not fill in.
///
/// Returning `Ok(None)` means the resolver does not know the field; the
/// conversion of the action fails in that case.
#[async_trait]
pub trait ResolveField: Send + Sync {
    async fn resolve(&self, name: &str, hint: &FieldHint) -> anyhow::Result<Option<Value>>;
}

/// Knows nothing. Suitable for actions cnd fills in completely.
#[async_trait]
impl ResolveField for () {
    async fn resolve(&self, _: &str, _: &FieldHint) -> anyhow::Result<Option<Value>> {
        Ok(None)
    }
}

/// Answers by field name.
#[async_trait]
impl ResolveField for HashMap<String, Value> {
    async fn resolve(&self, name: &str, _: &FieldHint) -> anyhow::Result<Option<Value>> {
        Ok(self.get(name).cloned())
    }
}

