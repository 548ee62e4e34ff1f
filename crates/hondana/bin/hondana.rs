#[macro_use]
extern crate log;

use clap::Parser;
use hondana::{
    domain::services::{
        book::BookService, chapter::ChapterService, genre::GenreService, user::UserService,
    },
    infrastructure::{
        config::Config,
        database,
        domain::repositories::{
            book::BookRepositoryImpl, chapter::ChapterRepositoryImpl, genre::GenreRepositoryImpl,
            user::UserRepositoryImpl,
        },
    },
    presentation::ServerBuilder,
};

#[derive(Parser)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let mut log_builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(level) = std::env::var("HONDANA_LOG") {
            log_builder.parse_filters(&format!("hondana={level}"));
        }
    }
    log_builder.init();

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config)?;

    debug!("config: {:?}", config);

    let pool = database::establish_connection(&config.database_path, config.create_database).await?;

    let book_svc = BookService::new(BookRepositoryImpl::new(pool.clone()));
    let chapter_svc = ChapterService::new(ChapterRepositoryImpl::new(pool.clone()));
    let genre_svc = GenreService::new(GenreRepositoryImpl::new(pool.clone()));
    let user_svc = UserService::new(UserRepositoryImpl::new(pool.clone()));

    let server = ServerBuilder::new()
        .with_book_svc(book_svc)
        .with_chapter_svc(chapter_svc)
        .with_genre_svc(genre_svc)
        .with_user_svc(user_svc)
        .with_secret(config.secret.clone())
        .with_token_expiry_days(config.token_expiry_days)
        .with_allowed_origins(config.allowed_origins.clone())
        .build()?;

    let server_fut = server.serve(([0, 0, 0, 0], config.port));

    tokio::select! {
        _ = server_fut => {
            info!("server shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl+c signal");
        }
    }

    info!("closing database...");
    pool.close().await;

    Ok(())
}
