use std::sync::Arc;

use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpServer,
};
use log::info;

use invoicer::{auth, config::Settings, db, mailer::SmtpMailer, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| {
        log::error!("FATAL: {}", e);
        e
    })?;

    let db_pool = db::connect(&settings.database_url).await?;
    db::migrate(&db_pool).await?;

    let mailer = SmtpMailer::from_settings(&settings.smtp)?;
    let state = AppState::new(db_pool, Arc::new(mailer));

    let bind = (settings.host.clone(), settings.port);
    info!("Starting HTTP server on http://{}:{}/", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            .wrap(auth::identity_middleware(settings.session_ttl))
            .wrap(auth::session_middleware(
                settings.session_key.clone(),
                settings.cookie_secure,
            ))
            .wrap(routes::cors(settings.cors_origin.as_deref()))
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(Data::new(state.clone()))
            .configure(routes::configure)
            .default_service(web::to(routes::default_handler))
    })
    .bind(bind)?
    .run()
    .await
}
