//! # Botgate Service
//!
//! Binary entry point for the Botgate webhook gateway.
//!
//! This executable:
//! - Loads configuration from environment and files
//! - Initializes logging
//! - Wires the dispatch table, command registry, and webhook receiver
//! - Starts the HTTP server from botgate-api

mod commands;
mod explorer;
mod handlers;

use botgate_api::{start_server, ServiceConfig, ServiceError};
use commands::{CommandRegistry, NftCommand};
use explorer::ExplorerClient;
use handlers::{MessageHandler, SequenceHandler};
use std::sync::Arc;
use telegram_bot_sdk::client::BotApiClient;
use telegram_bot_sdk::update::dispatch::{BotContext, HandlerRegistry};
use telegram_bot_sdk::update::UpdateKind;
use telegram_bot_sdk::webhook::{SecretValidator, WebhookReceiver};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "botgate_service=info,botgate_api=info,telegram_bot_sdk=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Botgate Service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order, later sources override earlier ones):
    //  1. /etc/botgate/service.yaml        system-wide defaults
    //  2. ./config/service.yaml            deployment-local override
    //  3. Path given by BOTGATE_CONFIG_FILE env, operator-specified file
    //  4. Environment variables prefixed BOTGATE with double-underscore
    //     separator, e.g. BOTGATE__SERVER__PORT=9090 sets server.port = 9090
    //
    // All configuration fields carry serde defaults, so absent files or an
    // entirely unconfigured environment produces a valid structure with
    // built-in defaults. The two secrets have no usable default, which is
    // what validate() rejects before the server starts. A malformed file or
    // an environment variable that cannot be coerced to the correct type IS
    // a hard error because it indicates deliberate-but-broken operator
    // configuration.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/botgate/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    // Optional explicit path supplied by the operator.
    if let Ok(explicit_path) = std::env::var("BOTGATE_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "Loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(config::Environment::with_prefix("BOTGATE").separator("__"))
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let service_config: ServiceConfig = match config.try_deserialize() {
        Ok(sc) => sc,
        Err(e) => {
            error!(
                error = %e,
                "Could not deserialize service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Wire the dispatch table
    //
    // The registries are built once here and used read-only for the process
    // lifetime. The sequence marker gets an explicit no-op handler; content
    // messages go through command parsing backed by the explorer client.
    // -------------------------------------------------------------------------
    let api = BotApiClient::with_base_url(
        service_config.bot.api_base_url.as_str(),
        service_config.bot.token.as_str(),
    );
    let ctx = Arc::new(BotContext::new(api));

    let mut command_registry = CommandRegistry::new();
    command_registry.register("nft", Arc::new(NftCommand::new(ExplorerClient::default())));

    let mut handler_registry = HandlerRegistry::new();
    handler_registry.register(UpdateKind::SequenceId, Arc::new(SequenceHandler));
    handler_registry.register(
        UpdateKind::Message,
        Arc::new(MessageHandler::new(command_registry)),
    );

    let receiver = WebhookReceiver::new(
        SecretValidator::new(service_config.bot.secret_token.as_str()),
        Arc::new(handler_registry),
        ctx,
    );

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        path = %service_config.webhook.endpoint_path,
        "Starting HTTP server"
    );

    // Start the server
    if let Err(e) = start_server(service_config, Arc::new(receiver)).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}
