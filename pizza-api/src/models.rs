use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub const MIN_PRICE: i32 = 1;
pub const MAX_PRICE: i32 = 30;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Price must be between 1 and 30")]
    PriceOutOfRange(i32),
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

impl Restaurant {
    /// Association rows of this restaurant together with the pizza each one points at.
    pub fn restaurant_pizzas(
        &self,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<(RestaurantPizza, Pizza)>> {
        RestaurantPizza::belonging_to(self)
            .inner_join(pizzas::table)
            .select((RestaurantPizza::as_select(), Pizza::as_select()))
            .order(restaurant_pizzas::id)
            .load(conn)
    }

    /// Pizzas sold by this restaurant. A pizza listed twice at different
    /// prices shows up twice.
    pub fn pizzas(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<Pizza>> {
        Ok(self
            .restaurant_pizzas(conn)?
            .into_iter()
            .map(|(_, pizza)| pizza)
            .collect())
    }
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

impl Pizza {
    pub fn restaurant_pizzas(
        &self,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<(RestaurantPizza, Restaurant)>> {
        RestaurantPizza::belonging_to(self)
            .inner_join(restaurants::table)
            .select((RestaurantPizza::as_select(), Restaurant::as_select()))
            .order(restaurant_pizzas::id)
            .load(conn)
    }

    pub fn restaurants(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<Restaurant>> {
        Ok(self
            .restaurant_pizzas(conn)?
            .into_iter()
            .map(|(_, restaurant)| restaurant)
            .collect())
    }
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = pizzas)]
pub struct NewPizza {
    pub name: String,
    pub ingredients: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(belongs_to(Pizza))]
#[diesel(table_name = restaurant_pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RestaurantPizza {
    pub id: i32,
    pub restaurant_id: i32,
    pub pizza_id: i32,
    pub price: i32,
}

impl RestaurantPizza {
    pub fn validate_price(price: i32) -> Result<i32, ModelError> {
        if (MIN_PRICE..=MAX_PRICE).contains(&price) {
            Ok(price)
        } else {
            Err(ModelError::PriceOutOfRange(price))
        }
    }
}

/// A restaurant pizza that has not been written yet.
///
/// The price can only be set through [`NewRestaurantPizza::new`] and
/// [`NewRestaurantPizza::set_price`], so an out-of-range price never reaches
/// an insert.
#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurant_pizzas)]
pub struct NewRestaurantPizza {
    pub restaurant_id: i32,
    pub pizza_id: i32,
    price: i32,
}

impl NewRestaurantPizza {
    pub fn new(restaurant_id: i32, pizza_id: i32, price: i32) -> Result<Self, ModelError> {
        Ok(Self {
            restaurant_id,
            pizza_id,
            price: RestaurantPizza::validate_price(price)?,
        })
    }

    pub fn price(&self) -> i32 {
        self.price
    }

    pub fn set_price(&mut self, price: i32) -> Result<(), ModelError> {
        self.price = RestaurantPizza::validate_price(price)?;
        Ok(())
    }
}
