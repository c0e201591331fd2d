use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,
    pub tdx: TdxConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TdxConfiguration {
    pub client_id: String,
    pub client_secret: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_url() -> String {
    "https://tdx.transportdata.tw/api/basic/v2/Air/FIDS/Airport".to_string()
}

fn default_token_url() -> String {
    "https://tdx.transportdata.tw/auth/realms/TDXConnect/protocol/openid-connect/token".to_string()
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(config::File::with_name("config"));
        }

        builder = builder.add_source(config::Environment::with_prefix("FIDS_PROXY").separator("__"));

        builder.build()?.try_deserialize()
    }
}
