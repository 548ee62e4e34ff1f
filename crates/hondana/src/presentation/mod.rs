pub mod rest;
pub mod token;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    domain::services::{
        book::BookService, chapter::ChapterService, genre::GenreService, user::UserService,
    },
    infrastructure::domain::repositories::{
        book::BookRepositoryImpl, chapter::ChapterRepositoryImpl, genre::GenreRepositoryImpl,
        user::UserRepositoryImpl,
    },
};

use self::{
    rest::{auth, books, chapters, genres, health, users},
    token::AuthContext,
};

pub struct ServerBuilder {
    book_svc: Option<BookService<BookRepositoryImpl>>,
    chapter_svc: Option<ChapterService<ChapterRepositoryImpl>>,
    genre_svc: Option<GenreService<GenreRepositoryImpl>>,
    user_svc: Option<UserService<UserRepositoryImpl>>,
    secret: Option<String>,
    token_expiry_days: u64,
    allowed_origins: Vec<String>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            book_svc: None,
            chapter_svc: None,
            genre_svc: None,
            user_svc: None,
            secret: None,
            token_expiry_days: 7,
            allowed_origins: vec![],
        }
    }

    pub fn with_book_svc(self, book_svc: BookService<BookRepositoryImpl>) -> Self {
        Self {
            book_svc: Some(book_svc),
            ..self
        }
    }

    pub fn with_chapter_svc(self, chapter_svc: ChapterService<ChapterRepositoryImpl>) -> Self {
        Self {
            chapter_svc: Some(chapter_svc),
            ..self
        }
    }

    pub fn with_genre_svc(self, genre_svc: GenreService<GenreRepositoryImpl>) -> Self {
        Self {
            genre_svc: Some(genre_svc),
            ..self
        }
    }

    pub fn with_user_svc(self, user_svc: UserService<UserRepositoryImpl>) -> Self {
        Self {
            user_svc: Some(user_svc),
            ..self
        }
    }

    pub fn with_secret(self, secret: String) -> Self {
        Self {
            secret: Some(secret),
            ..self
        }
    }

    pub fn with_token_expiry_days(self, token_expiry_days: u64) -> Self {
        Self {
            token_expiry_days,
            ..self
        }
    }

    pub fn with_allowed_origins(self, allowed_origins: Vec<String>) -> Self {
        Self {
            allowed_origins,
            ..self
        }
    }

    pub fn build(self) -> Result<Server, anyhow::Error> {
        let book_svc = self.book_svc.ok_or_else(|| anyhow!("no book service"))?;
        let chapter_svc = self
            .chapter_svc
            .ok_or_else(|| anyhow!("no chapter service"))?;
        let genre_svc = self.genre_svc.ok_or_else(|| anyhow!("no genre service"))?;
        let user_svc = self.user_svc.ok_or_else(|| anyhow!("no user service"))?;
        let secret = self.secret.ok_or_else(|| anyhow!("no secret"))?;

        let auth_ctx = AuthContext {
            secret,
            token_expiry_days: self.token_expiry_days,
        };
        let cors = build_cors(&self.allowed_origins)?;

        Ok(Server::new(
            book_svc,
            chapter_svc,
            genre_svc,
            user_svc,
            auth_ctx,
            cors,
        ))
    }
}

fn build_cors(allowed_origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    if allowed_origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow!("invalid allowed origin {origin}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub struct Server {
    router: Router,
}

impl Server {
    pub fn new(
        book_svc: BookService<BookRepositoryImpl>,
        chapter_svc: ChapterService<ChapterRepositoryImpl>,
        genre_svc: GenreService<GenreRepositoryImpl>,
        user_svc: UserService<UserRepositoryImpl>,
        auth_ctx: AuthContext,
        cors: CorsLayer,
    ) -> Self {
        let router = Router::new()
            .route("/", get(health::index))
            .route("/health", get(health::health_check))
            .route("/api/auth/login", post(auth::login))
            .route("/api/auth/logout", post(auth::logout))
            .route(
                "/api/books",
                get(books::list_books).post(books::create_book),
            )
            .route("/api/books/search", get(books::search_books))
            .route(
                "/api/books/{id}",
                get(books::get_book)
                    .put(books::update_book)
                    .delete(books::delete_book),
            )
            .route(
                "/api/books/{id}/chapters",
                get(chapters::list_book_chapters),
            )
            .route(
                "/api/books/{id}/chapters/{chapter_id}",
                get(chapters::get_book_chapter),
            )
            .route(
                "/api/chapters",
                get(chapters::list_chapters).post(chapters::create_chapter),
            )
            .route(
                "/api/chapters/{id}",
                get(chapters::get_chapter)
                    .put(chapters::update_chapter)
                    .delete(chapters::delete_chapter),
            )
            .route(
                "/api/genres",
                get(genres::list_genres).post(genres::create_genre),
            )
            .route(
                "/api/genres/{id}",
                get(genres::get_genre)
                    .put(genres::update_genre)
                    .delete(genres::delete_genre),
            )
            .route("/api/users", post(users::register))
            .route(
                "/api/users/me",
                get(users::profile)
                    .put(users::update_profile)
                    .delete(users::delete_profile),
            )
            .fallback(rest::not_found)
            .layer(Extension(book_svc))
            .layer(Extension(chapter_svc))
            .layer(Extension(genre_svc))
            .layer(Extension(user_svc))
            .layer(Extension(auth_ctx))
            .layer(cors);

        Self { router }
    }

    pub async fn serve<A: Into<SocketAddr>>(self, addr: A) -> Result<(), anyhow::Error> {
        let addr = addr.into();
        info!("listening on http://{addr}");

        axum_server::bind(addr)
            .serve(self.router.into_make_service())
            .await?;

        Ok(())
    }
}
