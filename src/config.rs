use {
    url::Url,
    wheel::fs,
    crate::prelude::*,
};
#[cfg(unix)] use xdg::BaseDirectories;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Wheel(#[from] wheel::Error),
    #[cfg(unix)]
    #[error("missing config file")]
    Missing,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Config {
    pub(crate) secret_key: String,
    /// Public address of the site, used to name the hosting domain in the privacy chapter.
    #[serde(default)]
    pub(crate) base_uri: Option<Url>,
    #[serde(default)]
    pub(crate) database: Option<ConfigDatabase>,
}

impl Config {
    pub(crate) async fn load() -> Result<Self, Error> {
        #[cfg(unix)] {
            if let Some(config_path) = BaseDirectories::new().find_config_file(if Environment::default().is_dev() { "legal-notice-dev.json" } else { "legal-notice.json" }) {
                Ok(fs::read_json(config_path).await?)
            } else {
                Err(Error::Missing)
            }
        }
        #[cfg(windows)] {
            Ok(fs::read_json("cfg/legal-notice.json").await?)
        }
    }

    /// The host name visitors reach the site under, without scheme, port or path.
    ///
    /// Taken from `baseUri` if configured, otherwise from the `Host` the visitor requested,
    /// otherwise from the address the service listens on.
    pub(crate) fn hosting_domain(&self, request_host: Option<&str>) -> String {
        self.base_uri.as_ref().and_then(host_name)
            .or_else(|| request_host.and_then(|host| Url::parse(&format!("http://{host}")).ok()).as_ref().and_then(host_name))
            .or_else(|| Url::parse(&Environment::default().base_uri().to_string()).ok().as_ref().and_then(host_name))
            .unwrap_or_default()
    }
}

fn host_name(url: &Url) -> Option<String> {
    url.host_str().map(str::to_owned)
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigDatabase {
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) database: Option<String>,
}
