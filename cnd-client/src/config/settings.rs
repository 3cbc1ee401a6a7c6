use crate::{
    config::{file, File},
    poll::PollConfig,
};
use log::LevelFilter;
use std::{convert::TryFrom, time::Duration};
use url::Url;

/// The configuration with defaults filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub cnd: Cnd,
    pub poll: PollConfig,
    pub logging: Logging,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cnd {
    pub url: Url,
}

impl Default for Cnd {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8000/").expect("static string to be a valid url"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, derivative::Derivative)]
#[derivative(Default)]
pub struct Logging {
    #[derivative(Default(value = "LevelFilter::Info"))]
    pub level: LevelFilter,
}

impl From<Settings> for File {
    fn from(settings: Settings) -> Self {
        let Settings {
            cnd: Cnd { url },
            poll: PollConfig { interval, timeout },
            logging: Logging { level },
        } = settings;

        File {
            cnd: Some(file::Cnd { url: Some(url) }),
            poll: Some(file::Poll {
                interval_ms: Some(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)),
                timeout_ms: Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)),
            }),
            logging: Some(file::Logging {
                level: Some(level.into()),
            }),
        }
    }
}

impl Settings {
    /// `url` from the command line takes precedence over the file.
    pub fn from_config_file_and_defaults(config_file: File, url: Option<Url>) -> Self {
        let File { cnd, poll, logging } = config_file;

        let default_poll = PollConfig::default();

        Self {
            cnd: match (url, cnd) {
                (Some(url), _) => Cnd { url },
                (None, Some(file::Cnd { url: Some(url) })) => Cnd { url },
                (None, _) => Cnd::default(),
            },
            poll: match poll {
                None => default_poll,
                Some(file::Poll {
                    interval_ms,
                    timeout_ms,
                }) => PollConfig {
                    interval: interval_ms.map_or(default_poll.interval, Duration::from_millis),
                    timeout: timeout_ms.map_or(default_poll.timeout, Duration::from_millis),
                },
            },
            logging: match logging {
                None | Some(file::Logging { level: None }) => Logging::default(),
                Some(file::Logging { level: Some(level) }) => Logging {
                    level: level.into(),
                },
            },
        }
    }
}
