use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Viewport;
use crate::error::{config_error, Error};

/// What to do with a selected place that carries no geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingGeometry {
    Reject,
    /// Pin the place at `{0, 0}`.
    ZeroCoordinates,
}

impl FromStr for MissingGeometry {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reject" => Ok(Self::Reject),
            "zero" => Ok(Self::ZeroCoordinates),
            other => Err(config_error(format!("unknown MISSING_GEOMETRY policy {other:?}"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub language: String,
    pub missing_geometry: MissingGeometry,
    pub viewport: Viewport,
    pub edge_padding: f64,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: "maps.googleapis.com".into(),
            language: "pt-BR".into(),
            missing_geometry: MissingGeometry::Reject,
            viewport: Viewport {
                width: 390.0,
                height: 844.0,
            },
            edge_padding: 100.0,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }

    /// Reads the configuration from the process environment, loading `.env`
    /// first when one is present.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new(dotenv::var("GOOGLE_MAPS_API_KEY")?);

        if let Some(api_base) = optional("GOOGLE_MAPS_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(language) = optional("PLACES_LANGUAGE") {
            config.language = language;
        }
        if let Some(policy) = optional("MISSING_GEOMETRY") {
            config.missing_geometry = policy.parse()?;
        }
        if let Some(width) = optional("VIEWPORT_WIDTH") {
            config.viewport.width = parse("VIEWPORT_WIDTH", &width)?;
        }
        if let Some(height) = optional("VIEWPORT_HEIGHT") {
            config.viewport.height = parse("VIEWPORT_HEIGHT", &height)?;
        }
        if let Some(padding) = optional("EDGE_PADDING") {
            config.edge_padding = parse("EDGE_PADDING", &padding)?;
        }
        if let Some(addr) = optional("LISTEN_ADDR") {
            config.listen_addr = parse("LISTEN_ADDR", &addr)?;
        }

        if config.viewport.width <= 0.0 || config.viewport.height <= 0.0 {
            return Err(config_error("viewport must have a positive size"));
        }

        tracing::debug!(
            api_base = %config.api_base,
            language = %config.language,
            "configuration loaded"
        );

        Ok(config)
    }
}

fn optional(name: &str) -> Option<String> {
    dotenv::var(name).ok().filter(|value| !value.is_empty())
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| config_error(format!("invalid value {value:?} for {name}")))
}

#[test]
fn missing_geometry_policy_parses() {
    assert_eq!("reject".parse::<MissingGeometry>(), Ok(MissingGeometry::Reject));
    assert_eq!("zero".parse::<MissingGeometry>(), Ok(MissingGeometry::ZeroCoordinates));
    assert_eq!("equator".parse::<MissingGeometry>().unwrap_err().code, 6);
}

#[test]
fn defaults_match_the_mobile_screen() {
    let config = Config::new("key");

    assert_eq!(config.language, "pt-BR");
    assert_eq!(config.edge_padding, 100.0);
    assert_eq!(config.missing_geometry, MissingGeometry::Reject);
}

#[test]
fn invalid_number_is_a_config_error() {
    let err = parse::<f64>("EDGE_PADDING", "wide").unwrap_err();
    assert_eq!(err.code, 6);
}
