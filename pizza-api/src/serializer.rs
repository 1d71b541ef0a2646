//! Transport representations of the three records.
//!
//! Restaurants, pizzas and restaurant pizzas reference each other in a cycle,
//! so what gets nested depends on which record the serialization starts from:
//!
//! * listing restaurants or pizzas drops `restaurant_pizzas` entirely,
//! * a single restaurant (or pizza) embeds its restaurant pizzas, each of
//!   which embeds only the other side,
//! * a restaurant pizza embeds both its restaurant and its pizza, neither of
//!   which carries `restaurant_pizzas`.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Serialize, ToSchema)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantDetails {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizzaWithPizza>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PizzaDetails {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
    pub restaurant_pizzas: Vec<RestaurantPizzaWithRestaurant>,
}

/// A restaurant pizza seen from its restaurant.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizzaWithPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
}

/// A restaurant pizza seen from its pizza.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizzaWithRestaurant {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub restaurant: Restaurant,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizzaDetails {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

pub fn serialize_restaurant(restaurant: &models::Restaurant) -> Restaurant {
    Restaurant {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza(pizza: &models::Pizza) -> Pizza {
    Pizza {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_details(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetails {
    RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, pizza)| RestaurantPizzaWithPizza {
                id: rp.id,
                price: rp.price,
                pizza_id: rp.pizza_id,
                restaurant_id: rp.restaurant_id,
                pizza: serialize_pizza(pizza),
            })
            .collect(),
    }
}

pub fn serialize_pizza_details(
    pizza: &models::Pizza,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Restaurant)],
) -> PizzaDetails {
    PizzaDetails {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, restaurant)| RestaurantPizzaWithRestaurant {
                id: rp.id,
                price: rp.price,
                pizza_id: rp.pizza_id,
                restaurant_id: rp.restaurant_id,
                restaurant: serialize_restaurant(restaurant),
            })
            .collect(),
    }
}

pub fn serialize_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    restaurant: &models::Restaurant,
    pizza: &models::Pizza,
) -> RestaurantPizzaDetails {
    RestaurantPizzaDetails {
        id: restaurant_pizza.id,
        price: restaurant_pizza.price,
        pizza_id: restaurant_pizza.pizza_id,
        restaurant_id: restaurant_pizza.restaurant_id,
        pizza: serialize_pizza(pizza),
        restaurant: serialize_restaurant(restaurant),
    }
}
