use dotenvy::dotenv;
use env_logger::Env;
use log::error;
use std::process;
use xmpp_mock_server::{Config, Server};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("{error}");
            process::exit(1);
        }
    };

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(error) => {
            error!("{error}");
            process::exit(1);
        }
    };

    server.run().await;
}
