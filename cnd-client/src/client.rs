use crate::{
    action::Action,
    payload::{BtcDaiOrder, Payload},
    problem::Problem,
    request::{to_request, ActionRequest, Body, APPLICATION_FORM},
    resolve::ResolveField,
    swap::SwapResource,
    Error, Result,
};
use reqwest::{
    header::{CONTENT_TYPE, LOCATION},
    StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// HTTP client for a single cnd instance.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
    base_url: Url,
}

/// What cnd answered to an executed action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionResponse {
    pub status: StatusCode,
    pub location: Option<Url>,
    pub body: Option<Value>,
}

impl ActionResponse {
    /// Decode the body, e.g. into a [`crate::LedgerAction`].
    pub fn body_as<T>(&self) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match &self.body {
            Some(body) => Ok(Some(serde_json::from_value(body.clone())?)),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PeerInfo {
    pub id: String,
    pub listen_addresses: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InfoFields {
    id: Option<String>,
    listen_addresses: Option<Vec<String>>,
}

/// cnd has served its info both as a plain document and as a Siren entity.
#[derive(Debug, Deserialize)]
struct InfoDocument {
    #[serde(flatten)]
    root: InfoFields,
    #[serde(default)]
    properties: InfoFields,
}

impl InfoDocument {
    fn id(&mut self) -> Result<String> {
        self.root
            .id
            .take()
            .or_else(|| self.properties.id.take())
            .ok_or(Error::MissingField { field: "id" })
    }

    fn listen_addresses(&mut self) -> Result<Vec<String>> {
        self.root
            .listen_addresses
            .take()
            .or_else(|| self.properties.listen_addresses.take())
            .ok_or(Error::MissingField {
                field: "listen_addresses",
            })
    }

    fn into_peer_info(mut self) -> Result<PeerInfo> {
        Ok(PeerInfo {
            id: self.id()?,
            listen_addresses: self.listen_addresses()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct DialBody<'a> {
    addresses: &'a [String],
}

impl Client {
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn info(&self) -> Result<PeerInfo> {
        let document = self.fetch::<InfoDocument>("").await?;

        document.into_peer_info()
    }

    /// Only requires cnd to report its id.
    pub async fn peer_id(&self) -> Result<String> {
        self.fetch::<InfoDocument>("").await?.id()
    }

    /// Only requires cnd to report its listen addresses.
    pub async fn listen_addresses(&self) -> Result<Vec<String>> {
        self.fetch::<InfoDocument>("").await?.listen_addresses()
    }

    /// Make this cnd connect to `other` on all of its listen addresses.
    pub async fn dial(&self, other: &Client) -> Result<()> {
        let addresses = other.listen_addresses().await?;
        let url = self.base_url.join("dial")?;

        self.send(self.inner.post(url).json(&DialBody {
            addresses: &addresses,
        }))
        .await?;

        Ok(())
    }

    /// GET `path` relative to the base URL; absolute URLs are taken as is.
    pub async fn fetch<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let response = self.send(self.inner.get(url)).await?;
        let bytes = response.bytes().await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn swap(&self, url: &Url) -> Result<SwapResource> {
        self.fetch(url.as_str()).await
    }

    /// Find action `name` of a swap.
    ///
    /// Actions rendered inline are returned directly; a link relation of the
    /// same name is followed to fetch the full descriptor.
    pub async fn action(&self, swap: &SwapResource, name: &str) -> Result<Action> {
        if let Some(action) = swap.action(name) {
            return Ok(action.clone());
        }

        match swap.link(name) {
            Some(link) => self.fetch(&link.href).await,
            None => Err(Error::ActionNotAvailable {
                action: name.to_owned(),
                state: swap.state.clone(),
            }),
        }
    }

    /// Resolve and perform `action`. Failed requests are not retried.
    pub async fn execute_action<R>(&self, action: &Action, resolver: &R) -> Result<ActionResponse>
    where
        R: ResolveField + ?Sized,
    {
        let ActionRequest { method, url, body } =
            to_request(&self.base_url, action, resolver).await?;

        let request = self.inner.request(method.into(), url);
        let request = match body {
            Body::Empty => request,
            Body::Json(json) => request.json(&json),
            Body::Form(form) => request.header(CONTENT_TYPE, APPLICATION_FORM).body(form),
        };

        let response = self.send(request).await?;
        let status = response.status();
        let location = self.location(&response);
        let bytes = response.bytes().await?;
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        };

        Ok(ActionResponse {
            status,
            location,
            body,
        })
    }

    /// POST a swap payload, returning the URL of the created swap.
    ///
    /// cnd must answer `201 Created`; any other success status is an error.
    pub async fn create_swap<P>(&self, payload: &P) -> Result<Url>
    where
        P: Payload,
    {
        self.create(payload).await
    }

    /// POST an order, returning the URL of the created order.
    pub async fn create_order(&self, order: &BtcDaiOrder) -> Result<Url> {
        self.create(order).await
    }

    async fn create<P>(&self, payload: &P) -> Result<Url>
    where
        P: Payload,
    {
        payload.ensure_complete()?;

        let url = self.base_url.join(&payload.path())?;
        let response = self.send(self.inner.post(url).json(payload)).await?;
        if response.status() != StatusCode::CREATED {
            return Err(Error::UnexpectedStatus {
                expected: StatusCode::CREATED.as_u16(),
                actual: response.status().as_u16(),
            });
        }

        self.location(&response).ok_or(Error::MissingLocation)
    }

    fn location(&self, response: &reqwest::Response) -> Option<Url> {
        let location = response.headers().get(LOCATION)?.to_str().ok()?;

        self.base_url.join(location).ok()
    }

    /// Every unsuccessful response is turned into a [`Problem`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = request.build()?;
        tracing::debug!("{} {}", request.method(), request.url());

        let response = self.inner.execute(request).await?;
        if !response.status().is_success() {
            let problem = Problem::from_response(response).await?;
            tracing::warn!("cnd responded with problem: {:?}", problem);

            return Err(Error::Problem(problem));
        }

        Ok(response)
    }
}
