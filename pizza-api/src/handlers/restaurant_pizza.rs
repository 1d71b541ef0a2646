use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use diesel::prelude::*;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::error::{ApiError, ValidationErrorResponse};
use crate::models::{NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::serializer::{self, serialize_restaurant_pizza};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

/// Every field is required; they are optional here so a missing one is
/// reported as a validation error rather than a body rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price in whole currency units, 1 to 30
    pub price: Option<i32>,
    pub pizza_id: Option<i32>,
    pub restaurant_id: Option<i32>,
}

fn required(value: Option<i32>, field: &str) -> Result<i32, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = serializer::RestaurantPizzaDetails),
        (status = 400, description = "Missing field, invalid price or unknown reference", body = ValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serializer::RestaurantPizzaDetails>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let new_restaurant_pizza = NewRestaurantPizza::new(
        required(payload.restaurant_id, "restaurant_id")?,
        required(payload.pizza_id, "pizza_id")?,
        required(payload.price, "price")?,
    )?;

    let (restaurant_pizza, restaurant, pizza) = state.write_transaction(|conn| {
        let restaurant = restaurants::table
            .find(new_restaurant_pizza.restaurant_id)
            .select(Restaurant::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "restaurant {} does not exist",
                    new_restaurant_pizza.restaurant_id
                ))
            })?;
        let pizza = pizzas::table
            .find(new_restaurant_pizza.pizza_id)
            .select(Pizza::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "pizza {} does not exist",
                    new_restaurant_pizza.pizza_id
                ))
            })?;

        let restaurant_pizza = diesel::insert_into(restaurant_pizzas::table)
            .values(&new_restaurant_pizza)
            .returning(RestaurantPizza::as_returning())
            .get_result(conn)?;

        Ok((restaurant_pizza, restaurant, pizza))
    })?;

    info!(
        restaurant_pizza_id = restaurant_pizza.id,
        price = restaurant_pizza.price,
        "created restaurant pizza"
    );

    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza(
            &restaurant_pizza,
            &restaurant,
            &pizza,
        )),
    ))
}
