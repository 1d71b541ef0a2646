use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{info, instrument};

use crate::error::{ApiError, ApiErrorResponse};
use crate::models::Restaurant;
use crate::schema::{restaurant_pizzas, restaurants};
use crate::serializer::{self, serialize_restaurant, serialize_restaurant_details};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

fn restaurant_not_found() -> ApiError {
    ApiError::NotFound("Restaurant not found".to_string())
}

fn find_restaurant(conn: &mut SqliteConnection, id: i32) -> Result<Restaurant, ApiError> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(restaurant_not_found)
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [serializer::Restaurant]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<serializer::Restaurant>>, ApiError> {
    let results: Vec<Restaurant> = state.transaction(|conn| {
        Ok(restaurants::table
            .select(Restaurant::as_select())
            .order(restaurants::id)
            .load(conn)?)
    })?;

    Ok(Json(results.iter().map(serialize_restaurant).collect()))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details", body = serializer::RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    restaurant_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<serializer::RestaurantDetails>, ApiError> {
    let Path(restaurant_id) = restaurant_id.map_err(|_| restaurant_not_found())?;

    let (restaurant, restaurant_pizzas) = state.transaction(|conn| {
        let restaurant = find_restaurant(conn, restaurant_id)?;
        let restaurant_pizzas = restaurant.restaurant_pizzas(conn)?;
        Ok((restaurant, restaurant_pizzas))
    })?;

    Ok(Json(serialize_restaurant_details(
        &restaurant,
        &restaurant_pizzas,
    )))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its restaurant pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    restaurant_id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(restaurant_id) = restaurant_id.map_err(|_| restaurant_not_found())?;

    state.write_transaction(|conn| {
        let restaurant = find_restaurant(conn, restaurant_id)?;

        let removed = diesel::delete(
            restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(restaurant.id)),
        )
        .execute(conn)?;
        diesel::delete(&restaurant).execute(conn)?;

        info!(
            restaurant_id = restaurant.id,
            restaurant_pizzas = removed,
            "deleted restaurant"
        );
        Ok(())
    })?;

    Ok(StatusCode::NO_CONTENT)
}
