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
use crate::models::Pizza;
use crate::schema::{pizzas, restaurant_pizzas};
use crate::serializer::{self, serialize_pizza, serialize_pizza_details};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pizzas", get(list_pizzas))
        .route("/pizzas/{id}", get(get_pizza).delete(delete_pizza))
}

fn pizza_not_found() -> ApiError {
    ApiError::NotFound("Pizza not found".to_string())
}

fn find_pizza(conn: &mut SqliteConnection, id: i32) -> Result<Pizza, ApiError> {
    pizzas::table
        .find(id)
        .select(Pizza::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(pizza_not_found)
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "List of pizzas", body = [serializer::Pizza]),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(
    State(state): State<AppState>,
) -> Result<Json<Vec<serializer::Pizza>>, ApiError> {
    let results: Vec<Pizza> = state.transaction(|conn| {
        Ok(pizzas::table
            .select(Pizza::as_select())
            .order(pizzas::id)
            .load(conn)?)
    })?;

    Ok(Json(results.iter().map(serialize_pizza).collect()))
}

#[utoipa::path(
    get,
    path = "/pizzas/{id}",
    responses(
        (status = 200, description = "Pizza details", body = serializer::PizzaDetails),
        (status = 404, description = "Pizza not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Pizza ID")
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn get_pizza(
    State(state): State<AppState>,
    pizza_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<serializer::PizzaDetails>, ApiError> {
    let Path(pizza_id) = pizza_id.map_err(|_| pizza_not_found())?;

    let (pizza, restaurant_pizzas) = state.transaction(|conn| {
        let pizza = find_pizza(conn, pizza_id)?;
        let restaurant_pizzas = pizza.restaurant_pizzas(conn)?;
        Ok((pizza, restaurant_pizzas))
    })?;

    Ok(Json(serialize_pizza_details(&pizza, &restaurant_pizzas)))
}

#[utoipa::path(
    delete,
    path = "/pizzas/{id}",
    responses(
        (status = 204, description = "Pizza and its restaurant pizzas deleted"),
        (status = 404, description = "Pizza not found", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Pizza ID")
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn delete_pizza(
    State(state): State<AppState>,
    pizza_id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(pizza_id) = pizza_id.map_err(|_| pizza_not_found())?;

    state.write_transaction(|conn| {
        let pizza = find_pizza(conn, pizza_id)?;

        let removed =
            diesel::delete(restaurant_pizzas::table.filter(restaurant_pizzas::pizza_id.eq(pizza.id)))
                .execute(conn)?;
        diesel::delete(&pizza).execute(conn)?;

        info!(pizza_id = pizza.id, restaurant_pizzas = removed, "deleted pizza");
        Ok(())
    })?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPizza, NewRestaurantPizza};
    use crate::schema::restaurants;
    use crate::seed::seed_data;
    use crate::test_support::TestApp;
    use axum::http::Method;

    #[tokio::test]
    async fn test_list_pizzas() {
        let app = TestApp::new();
        let conn = &mut app.connect();
        seed_data(conn).unwrap();
        diesel::insert_into(pizzas::table)
            .values(&NewPizza {
                name: "Pepperoni".to_string(),
                ingredients: "Tomato, Mozzarella, Pepperoni".to_string(),
            })
            .execute(conn)
            .unwrap();

        let (status, body) = app.json(Method::GET, "/pizzas", None).await;

        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Margherita");
        assert_eq!(items[0]["ingredients"], "Tomato, Mozzarella, Basil");
        assert_eq!(items[1]["name"], "Pepperoni");
        assert!(items.iter().all(|p| p.get("restaurant_pizzas").is_none()));
    }

    #[tokio::test]
    async fn test_get_pizza() {
        let app = TestApp::new();
        let (restaurant, pizza, _) = seed_data(&mut app.connect()).unwrap();

        let (status, body) = app
            .json(Method::GET, &format!("/pizzas/{}", pizza.id), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Margherita");
        let entries = body["restaurant_pizzas"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["restaurant"]["id"], restaurant.id);
        assert!(entries[0].get("pizza").is_none());
        assert!(entries[0]["restaurant"].get("restaurant_pizzas").is_none());
    }

    #[tokio::test]
    async fn test_get_pizza_not_found() {
        let app = TestApp::new();

        let (status, body) = app.json(Method::GET, "/pizzas/7", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Pizza not found");
    }

    #[tokio::test]
    async fn test_delete_pizza_cascades() {
        let app = TestApp::new();
        let conn = &mut app.connect();
        let (restaurant, pizza, _) = seed_data(conn).unwrap();
        let pepperoni = diesel::insert_into(pizzas::table)
            .values(&NewPizza {
                name: "Pepperoni".to_string(),
                ingredients: "Tomato, Mozzarella, Pepperoni".to_string(),
            })
            .returning(Pizza::as_returning())
            .get_result(conn)
            .unwrap();
        diesel::insert_into(restaurant_pizzas::table)
            .values(&NewRestaurantPizza::new(restaurant.id, pepperoni.id, 12).unwrap())
            .execute(conn)
            .unwrap();

        let (status, _) = app
            .json(Method::DELETE, &format!("/pizzas/{}", pizza.id), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let remaining = restaurant_pizzas::table
            .select(restaurant_pizzas::pizza_id)
            .load::<i32>(conn)
            .unwrap();
        assert_eq!(remaining, vec![pepperoni.id]);
        assert_eq!(
            restaurants::table.count().get_result::<i64>(conn).unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_pizza_not_found() {
        let app = TestApp::new();
        seed_data(&mut app.connect()).unwrap();

        let (status, _) = app.json(Method::DELETE, "/pizzas/500", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            pizzas::table
                .count()
                .get_result::<i64>(&mut app.connect())
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_pizza_storage_failure_rolls_back() {
        let app = TestApp::new();
        let conn = &mut app.connect();
        let (_, pizza, _) = seed_data(conn).unwrap();
        diesel::sql_query(
            "CREATE TRIGGER refuse_pizza_delete BEFORE DELETE ON pizzas \
             BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .execute(conn)
        .unwrap();

        let (status, body) = app
            .json(Method::DELETE, &format!("/pizzas/{}", pizza.id), None)
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "boom"}));
        assert_eq!(
            restaurant_pizzas::table
                .count()
                .get_result::<i64>(conn)
                .unwrap(),
            1
        );
        assert!(pizzas::table.find(pizza.id).first::<Pizza>(conn).is_ok());
    }
}
