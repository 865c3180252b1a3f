use crate::error::Result;
use clap::{value_parser, Parser};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_HTTP_PORT: u16 = 5133;
pub const DEFAULT_PG_PROXY_PORT: u16 = 65432;
pub const DEFAULT_PG_PROXY_USER: &str = "postgres";
pub const DEFAULT_PG_PROXY_PASSWORD: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "postgres";

#[derive(EnumString, Display, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Env,
    Yaml,
}

/// Resolved command settings that can be printed back to the user.
pub trait Settings: Serialize {
    /// Environment variables equivalent to these settings. Unset values are left out.
    fn to_env(&self) -> BTreeMap<&'static str, String>;

    fn output_format(&self) -> OutputFormat;

    fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn render_settings<S: Settings>(settings: &S) -> Result<String> {
    match settings.output_format() {
        OutputFormat::Env => Ok(settings
            .to_env()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<String>>()
            .join("\n")),
        OutputFormat::Yaml => settings.to_yaml(),
    }
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    #[arg(
        long,
        env = "ELECTRIC_HOST",
        default_value = DEFAULT_HOST,
        help = dedent!("
            Hostname that the ElectricSQL sync service is on.

            Alternatively, you can set the ELECTRIC_HOST environment variable.
        "),
    )]
    pub host: String,

    #[arg(
        long,
        env = "ELECTRIC_HTTP_PORT",
        default_value_t = DEFAULT_HTTP_PORT,
        value_parser = value_parser!(u16).range(1..),
        help = dedent!("
            Port that the ElectricSQL sync service is listening on.

            Alternatively, you can set the ELECTRIC_HTTP_PORT environment variable.

            Defaults to {DEFAULT_HTTP_PORT}.
        "),
    )]
    pub http_port: u16,

    #[arg(
        long,
        env = "ELECTRIC_PG_PROXY_PORT",
        default_value_t = DEFAULT_PG_PROXY_PORT,
        value_parser = value_parser!(u16).range(1..),
        help = dedent!("
            Port that the ElectricSQL sync service PostgreSQL proxy is listening on.

            Alternatively, you can set the ELECTRIC_PG_PROXY_PORT environment variable.

            Defaults to {DEFAULT_PG_PROXY_PORT}.
        "),
    )]
    pub pg_proxy_port: u16,

    #[arg(
        short,
        long,
        value_name = "TIMEOUT",
        value_parser = value_parser!(u64).range(1..),
        help = dedent!("
            Wait for the service to start, with an optional timeout in seconds.
        "),
    )]
    #[serde(
        default,
        serialize_with = "serialize_wait",
        deserialize_with = "deserialize_wait"
    )]
    pub wait: Option<Option<u64>>,

    #[arg(long, default_value_t = OutputFormat::Env, help = "Print settings as `env` or `yaml`")]
    #[serde(skip)]
    pub output: OutputFormat,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            host: DEFAULT_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            pg_proxy_port: DEFAULT_PG_PROXY_PORT,
            wait: None,
            output: OutputFormat::default(),
        }
    }
}

impl Settings for CheckConfig {
    fn to_env(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("ELECTRIC_HOST", self.host.clone()),
            ("ELECTRIC_HTTP_PORT", self.http_port.to_string()),
            ("ELECTRIC_PG_PROXY_PORT", self.pg_proxy_port.to_string()),
        ])
    }

    fn output_format(&self) -> OutputFormat {
        self.output
    }
}

// `wait` is `false` when absent, `true` for a bare flag and the number of
// seconds when a timeout was given.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WaitSetting {
    Enabled(bool),
    Timeout(u64),
}

fn serialize_wait<S: Serializer>(
    wait: &Option<Option<u64>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let setting = match wait {
        None => WaitSetting::Enabled(false),
        Some(None) => WaitSetting::Enabled(true),
        Some(Some(seconds)) => WaitSetting::Timeout(*seconds),
    };
    setting.serialize(serializer)
}

fn deserialize_wait<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Option<u64>>, D::Error> {
    Ok(match WaitSetting::deserialize(deserializer)? {
        WaitSetting::Enabled(false) => None,
        WaitSetting::Enabled(true) => Some(None),
        WaitSetting::Timeout(seconds) => Some(Some(seconds)),
    })
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PsqlConfig {
    #[arg(
        long,
        env = "ELECTRIC_PG_PROXY_USER",
        default_value = DEFAULT_PG_PROXY_USER,
        help = dedent!("
            Username to connect with.

            Alternatively, you can set the ELECTRIC_PG_PROXY_USER environment variable.
        "),
    )]
    pub user: String,

    #[arg(
        long,
        env = "ELECTRIC_PG_PROXY_PASSWORD",
        default_value = DEFAULT_PG_PROXY_PASSWORD,
        hide_env_values = true,
        help = dedent!("
            Password to connect with.

            Alternatively, you can set the ELECTRIC_PG_PROXY_PASSWORD environment variable.
        "),
    )]
    pub password: String,

    #[arg(
        long,
        env = "ELECTRIC_HOST",
        default_value = DEFAULT_HOST,
        help = dedent!("
            Hostname that the ElectricSQL sync service is on.

            Alternatively, you can set the ELECTRIC_HOST environment variable.
        "),
    )]
    pub host: String,

    #[arg(
        long,
        env = "ELECTRIC_PG_PROXY_PORT",
        default_value_t = DEFAULT_PG_PROXY_PORT,
        value_parser = value_parser!(u16).range(1..),
        help = dedent!("
            Port that the ElectricSQL sync service PostgreSQL proxy is listening on.

            Alternatively, you can set the ELECTRIC_PG_PROXY_PORT environment variable.

            Defaults to {DEFAULT_PG_PROXY_PORT}.
        "),
    )]
    pub pg_proxy_port: u16,

    #[arg(
        long,
        env = "ELECTRIC_DATABASE_NAME",
        help = dedent!("
            Name of the database to connect to.

            Alternatively, you can set the ELECTRIC_DATABASE_NAME environment variable.
            "),
    )]
    pub database_name: Option<String>,

    #[arg(long, default_value_t = OutputFormat::Env, help = "Print settings as `env` or `yaml`")]
    #[serde(skip)]
    pub output: OutputFormat,
}

impl Default for PsqlConfig {
    fn default() -> Self {
        PsqlConfig {
            user: DEFAULT_PG_PROXY_USER.to_string(),
            password: DEFAULT_PG_PROXY_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            pg_proxy_port: DEFAULT_PG_PROXY_PORT,
            database_name: None,
            output: OutputFormat::default(),
        }
    }
}

impl PsqlConfig {
    pub fn connection_url(&self) -> String {
        let database_name = self
            .database_name
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_NAME);

        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.pg_proxy_port, database_name
        )
    }
}

#[derive(Serialize)]
struct PsqlSummary<'a> {
    #[serde(flatten)]
    settings: &'a PsqlConfig,
    connection_url: String,
}

impl Settings for PsqlConfig {
    fn to_env(&self) -> BTreeMap<&'static str, String> {
        let mut env = BTreeMap::from([
            ("ELECTRIC_PG_PROXY_USER", self.user.clone()),
            ("ELECTRIC_PG_PROXY_PASSWORD", self.password.clone()),
            ("ELECTRIC_HOST", self.host.clone()),
            ("ELECTRIC_PG_PROXY_PORT", self.pg_proxy_port.to_string()),
            ("ELECTRIC_PG_PROXY_URL", self.connection_url()),
        ]);
        if let Some(database_name) = &self.database_name {
            env.insert("ELECTRIC_DATABASE_NAME", database_name.clone());
        }
        env
    }

    fn output_format(&self) -> OutputFormat {
        self.output
    }

    fn to_yaml(&self) -> Result<String> {
        let summary = PsqlSummary {
            settings: self,
            connection_url: self.connection_url(),
        };
        Ok(serde_yaml::to_string(&summary)?)
    }
}
