//! Service entry point: configuration, migrations, pool, HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backend::inbound::http::{self, HttpState};
use backend::outbound::persistence::{
    DbPool, DieselLikeLedger, DieselQuoteRepository, run_pending,
};
use backend::server::{self, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .init();

    let config = AppConfig::parse();

    run_pending(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(config.pool_config())
        .await
        .map_err(std::io::Error::other)?;

    let repository = Arc::new(DieselQuoteRepository::new(pool.clone()));
    let ledger = Arc::new(DieselLikeLedger::new(pool));
    let state = web::Data::new(HttpState::new(repository, ledger));

    let cors_origin = config.cors_origin.clone();
    info!(addr = %config.bind_addr, "starting quote service");

    HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .wrap(server::cors(&cors_origin))
            .configure(http::configure);

        #[cfg(debug_assertions)]
        let app = {
            use backend::doc::ApiDoc;
            use utoipa::OpenApi;
            use utoipa_swagger_ui::SwaggerUi;

            app.service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
        };

        app
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
