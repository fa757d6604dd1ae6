use actix_web::web;
use dotenvy::dotenv;
use menu_cart::{build_server, AppConfig, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let state = AppState::from_config(&config).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    log::info!(
        "Starting storefront at http://{}:{} ({} dishes on the menu)",
        config.host,
        config.port,
        state.menu.items().len()
    );

    build_server(web::Data::new(state), &config.host, config.port)?.await
}
