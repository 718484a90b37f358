use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, bookings, profile, rides, sos};
use crate::middleware::auth::auth_middleware;
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::user_rate_limit::create_user_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for public routes, user-id governor once authenticated
    let public_governor = create_public_governor();
    let user_governor = create_user_governor();

    // Public routes (with IP-based rate limiting)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public catalog routes (search, ride details, autocomplete)
    let catalog_routes = Router::new()
        .route("/search-rides", get(rides::search_rides))
        .route("/ride/{id}", get(rides::get_ride))
        .route("/city-suggestions", get(rides::city_suggestions))
        .layer(public_governor);

    // Authenticated routes (requires a valid JWT)
    let account_routes = Router::new()
        .route("/post-ride", post(rides::post_ride))
        .route("/book-ride", post(bookings::book_ride))
        .route("/my-rides", get(rides::my_rides))
        .route("/my-bookings", get(bookings::my_bookings))
        .route("/profile/stats", get(profile::stats))
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Emergency alerts sit outside the /api prefix
    let sos_routes = Router::new()
        .route("/sos", post(sos::raise_alert))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", catalog_routes.merge(account_routes))
        .merge(sos_routes)
        .with_state(state)
}
