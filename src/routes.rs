use crate::{api::dashboard, auth::handlers, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes: the password lifecycle the state machine reaches without
    // an authenticated session. All of them share the login limiter.
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/set-password")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::set_password)),
            )
            .service(
                web::resource("/forgot-password")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::forgot_password)),
            )
            .service(web::resource("/session").route(web::get().to(handlers::restore_session)))
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes: every handler resolves the session through the
    // AuthUser extractor.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)))
            .service(web::resource("/password").route(web::put().to(handlers::change_password))),
    );
}
