use {
    std::time::Duration,
    sqlx::{
        ConnectOptions as _,
        postgres::{
            PgConnectOptions,
            PgPoolOptions,
        },
    },
    crate::prelude::*,
};

mod admin;
mod auth;
mod catalog;
mod chapter;
mod config;
mod contacts;
mod directory;
mod gravatar;
mod http;
mod legal;
mod order;
mod prefs;
mod prelude;
mod settings;

#[allow(unused)] // variants only constructed under conditional compilation
#[derive(Default, Clone, Copy)]
enum Environment {
    #[cfg_attr(any(feature = "production", not(any(feature = "dev", feature = "local", debug_assertions))), default)]
    Production,
    #[cfg_attr(any(feature = "dev", all(debug_assertions, not(feature = "production"), not(feature = "local"))), default)]
    Dev,
    #[cfg_attr(feature = "local", default)]
    Local,
}

impl Environment {
    fn is_dev(&self) -> bool {
        match self {
            Self::Production => false,
            Self::Dev => true,
            Self::Local => true,
        }
    }

    /// Where the service itself listens. Deployments behind a proxy set `baseUri` in the config instead.
    fn base_uri(&self) -> rocket::http::uri::Absolute<'static> {
        match self {
            Self::Production => uri!("http://localhost:24816"),
            Self::Dev => uri!("http://localhost:24817"),
            Self::Local => uri!("http://localhost:24816"),
        }
    }

    fn default_port(&self) -> u16 {
        if self.is_dev() { 24817 } else { 24816 }
    }

    fn database(&self) -> &'static str {
        if self.is_dev() { "webtrees_dev" } else { "webtrees" }
    }
}

fn parse_port(arg: &str) -> Result<u16, std::num::ParseIntError> {
    match arg {
        "production" => Ok(24816),
        "dev" => Ok(24817),
        _ => arg.parse(),
    }
}

#[derive(clap::Parser)]
#[clap(version)]
struct Args {
    #[clap(long, value_parser = parse_port)]
    port: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)] Base64(#[from] base64::DecodeError),
    #[error(transparent)] Config(#[from] config::Error),
    #[error(transparent)] Migrate(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)] Rocket(#[from] rocket::Error),
    #[error(transparent)] Sql(#[from] sqlx::Error),
}

#[wheel::main(rocket)]
async fn main(Args { port }: Args) -> Result<(), Error> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let default_panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("Thread panic: {info}");
        default_panic_hook(info)
    }));
    let config = Config::load().await?;
    let mut db_options = PgConnectOptions::default()
        .username("webtrees")
        .database(Environment::default().database())
        .application_name("legal-notice")
        .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(10));
    if let Some(ref db_config) = config.database {
        if let Some(ref host) = db_config.host {
            db_options = db_options.host(host);
        }
        if let Some(port) = db_config.port {
            db_options = db_options.port(port);
        }
        if let Some(ref username) = db_config.username {
            db_options = db_options.username(username);
        }
        if let Some(ref password) = db_config.password {
            db_options = db_options.password(password);
        }
        if let Some(ref database) = db_config.database {
            db_options = db_options.database(database);
        }
    }
    let db_pool = PgPoolOptions::default()
        .max_connections(8)
        .connect_with(db_options)
        .await?;
    sqlx::migrate!().run(&db_pool).await?;
    let port = port.unwrap_or_else(|| Environment::default().default_port());
    log::info!("starting legal notice service on port {port}");
    let rocket = http::rocket(db_pool, config, port).await?;
    rocket.launch().await?;
    Ok(())
}
