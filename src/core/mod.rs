/// Location cache and distance calculations
pub mod location;
/// Manager dashboard queries
pub mod manager;
/// Order registration, lookup and pricing
pub mod order;
/// Product and category catalogue
pub mod product;
/// Restaurants, menus and the availability filter
pub mod restaurant;
