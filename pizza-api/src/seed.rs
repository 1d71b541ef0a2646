use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

/// Inserts the sample restaurant, pizza and the restaurant pizza linking them.
pub fn seed_data(
    conn: &mut SqliteConnection,
) -> Result<(Restaurant, Pizza, RestaurantPizza), Box<dyn std::error::Error + Send + Sync>> {
    conn.transaction(|conn| {
        let restaurant = diesel::insert_into(restaurants::table)
            .values(&NewRestaurant {
                name: "Pizza Place".to_string(),
                address: "123 Pizza Street".to_string(),
            })
            .returning(Restaurant::as_returning())
            .get_result(conn)?;

        let pizza = diesel::insert_into(pizzas::table)
            .values(&NewPizza {
                name: "Margherita".to_string(),
                ingredients: "Tomato, Mozzarella, Basil".to_string(),
            })
            .returning(Pizza::as_returning())
            .get_result(conn)?;

        let restaurant_pizza = diesel::insert_into(restaurant_pizzas::table)
            .values(&NewRestaurantPizza::new(restaurant.id, pizza.id, 10)?)
            .returning(RestaurantPizza::as_returning())
            .get_result(conn)?;

        info!(
            restaurant_id = restaurant.id,
            pizza_id = pizza.id,
            "seeded sample data"
        );

        Ok((restaurant, pizza, restaurant_pizza))
    })
}
