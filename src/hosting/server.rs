use super::*;
use crate::engine::Engine;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;

pub struct Server;

impl Server {
    pub async fn run(config: Config) -> anyhow::Result<()> {
        let engine = web::Data::new(config.engine().await?);
        log::info!("starting match server on {}", config.bind);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(engine.clone())
                .configure(Self::routes)
        })
        .workers(config.workers)
        .bind(config.bind.as_str())?
        .run()
        .await?;
        Ok(())
    }

    /// Every route, plus JSON body errors rendered as `{"detail": ..}`.
    #[rustfmt::skip]
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(|e, _| {
                let detail = serde_json::json!({ "detail": e.to_string() });
                actix_web::error::InternalError::from_response(e, HttpResponse::BadRequest().json(detail)).into()
            }))
            .route("/health", web::get().to(handlers::health))
            .route("/dreams", web::get().to(handlers::dreams))
            .route("/decks", web::get().to(handlers::decks))
            .route("/cards/savings", web::get().to(handlers::savings_cards))
            .route("/cards/spending", web::get().to(handlers::spending_cards))
            .route("/matches", web::post().to(handlers::create))
            .service(
                web::scope("/matches/{id}")
                    .route("", web::delete().to(handlers::discard))
                    .route("/join", web::post().to(handlers::join))
                    .route("/start", web::post().to(handlers::start))
                    .route("/state", web::get().to(handlers::state))
                    .route("/stream", web::get().to(handlers::stream))
                    .route("/roll", web::post().to(handlers::roll))
                    .route("/move", web::post().to(handlers::step))
                    .route("/select-asset", web::post().to(handlers::select_asset))
                    .route("/cards/draw", web::post().to(handlers::draw))
                    .route("/cards/savings", web::post().to(handlers::savings))
                    .route("/cards/spending", web::post().to(handlers::spending))
                    .route("/dreams/purchase", web::post().to(handlers::purchase_dream)),
            );
    }
}
