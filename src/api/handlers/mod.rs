pub mod cart;
pub mod health;
pub mod products;
pub mod users;
