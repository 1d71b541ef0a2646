pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

use std::sync::Arc;

use axum::{
    http::Uri,
    response::Html,
    routing::get,
    Router,
};
use diesel::{sqlite::SqliteConnection, Connection};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use crate::establish_connection;

#[derive(Clone)]
pub struct AppState {
    database_url: Arc<str>,
}

impl AppState {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: Arc::from(database_url.into()),
        }
    }

    /// Runs `f` inside a fresh connection's transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back on `Err`,
    /// so a handler never leaves a partial write behind.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError>,
    {
        let conn = &mut establish_connection(&self.database_url)?;
        conn.transaction(f)
            .inspect_err(|e| debug!(error = %e, "transaction rolled back"))
    }

    /// Like [`AppState::transaction`] but takes SQLite's write lock up front
    /// (`BEGIN IMMEDIATE`). Handlers that read before writing must use this:
    /// upgrading a deferred read lock fails with `SQLITE_BUSY` at once
    /// instead of waiting out the busy timeout.
    pub fn write_transaction<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError>,
    {
        let conn = &mut establish_connection(&self.database_url)?;
        conn.immediate_transaction(f)
            .inspect_err(|e| debug!(error = %e, "transaction rolled back"))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .merge(restaurant::router())
        .merge(pizza::router())
        .merge(restaurant_pizza::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn home() -> Html<&'static str> {
    Html("<h1>Welcome to the Pizza Restaurants API</h1>")
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!(
        "404 Not Found: The requested URL {} was not found on the server.",
        uri.path()
    ))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        pizza::get_pizza,
        pizza::delete_pizza,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::serializer::Restaurant,
            crate::serializer::Pizza,
            crate::serializer::RestaurantDetails,
            crate::serializer::PizzaDetails,
            crate::serializer::RestaurantPizzaWithPizza,
            crate::serializer::RestaurantPizzaWithRestaurant,
            crate::serializer::RestaurantPizzaDetails,
            restaurant_pizza::CreateRestaurantPizzaRequest,
            crate::error::ApiErrorResponse,
            crate::error::ValidationErrorResponse,
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "pizzas", description = "Pizza endpoints"),
        (name = "restaurant_pizzas", description = "Prices of pizzas at restaurants")
    ),
    info(
        title = "Pizza Restaurants API",
        description = "Restaurants, pizzas and the prices restaurants charge for them",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
