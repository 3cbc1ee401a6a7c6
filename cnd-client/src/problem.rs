use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// An `application/problem+json` body returned by cnd.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, thiserror::Error)]
#[error("{title} ({status})")]
pub struct Problem {
    pub status: u16,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_url: Option<String>,
}

#[derive(Deserialize)]
struct RawProblem {
    status: Option<u16>,
    title: Option<String>,
    detail: Option<String>,
    #[serde(rename = "type")]
    type_url: Option<String>,
}

impl Problem {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            detail: None,
            type_url: None,
        }
    }

    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..self
        }
    }

    /// Interpret the body of an unsuccessful response.
    ///
    /// Bodies that are not problem documents still yield a problem, titled
    /// with the reason phrase of the status code.
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        if let Ok(RawProblem {
            status: problem_status,
            title: Some(title),
            detail,
            type_url,
        }) = serde_json::from_slice::<RawProblem>(body)
        {
            return Problem {
                status: problem_status.unwrap_or_else(|| status.as_u16()),
                title,
                detail,
                type_url,
            };
        }

        let detail = std::str::from_utf8(body)
            .ok()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned);

        Problem {
            status: status.as_u16(),
            title: status
                .canonical_reason()
                .unwrap_or("Unknown status code")
                .to_owned(),
            detail,
            type_url: None,
        }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> reqwest::Result<Self> {
        let status = response.status();
        let body = response.bytes().await?;

        Ok(Self::from_body(status, &body))
    }
}
