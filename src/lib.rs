pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};

use handlers::storefront;

pub use config::AppConfig;
pub use state::AppState;

/// Register every storefront route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/menu", web::get().to(storefront::get_menu))
        .route("/pages/{page}", web::get().to(storefront::show_page))
        .service(
            web::scope("/cart")
                .route("", web::get().to(storefront::get_cart))
                .route("", web::delete().to(storefront::clear_cart))
                .route("/count", web::get().to(storefront::get_cart_count))
                .route("/items", web::post().to(storefront::add_item))
                .route("/items/{id}", web::delete().to(storefront::remove_item))
                .route("/items/{id}/quantity", web::put().to(storefront::set_quantity))
                .route(
                    "/items/{id}/quantity/adjust",
                    web::post().to(storefront::adjust_quantity),
                )
                .route("/items/{id}/selection", web::put().to(storefront::set_selection)),
        )
        .service(
            web::scope("/checkout")
                .route("", web::get().to(storefront::get_checkout))
                .route("", web::post().to(storefront::submit_checkout))
                .route("/new-order", web::post().to(storefront::start_new_order)),
        )
        .route("/api-docs/openapi.json", web::get().to(handlers::openapi_json));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
