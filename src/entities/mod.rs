//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod location;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_category;
pub mod restaurant;
pub mod restaurant_menu_item;

// Re-export specific types to avoid conflicts
pub use location::{Column as LocationColumn, Entity as Location, Model as LocationModel};
pub use order::{
    Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus, PaymentType,
};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_category::{
    Column as ProductCategoryColumn, Entity as ProductCategory, Model as ProductCategoryModel,
};
pub use restaurant::{Column as RestaurantColumn, Entity as Restaurant, Model as RestaurantModel};
pub use restaurant_menu_item::{
    Column as RestaurantMenuItemColumn, Entity as RestaurantMenuItem,
    Model as RestaurantMenuItemModel,
};
