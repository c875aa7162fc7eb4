//! Admin service layer.
//!
//! One service per admin screen. Each takes typed forms, validates them, runs its
//! pre-save steps (status transitions, geocoding) explicitly and then persists.

/// Typed forms submitted from the admin screens
pub mod forms;
/// Order add/change service
pub mod order;
/// Product and category service
pub mod product;
/// Post-save redirects and open-redirect protection
pub mod redirect;
/// Restaurant add/change service and menu editor
pub mod restaurant;

pub use forms::{OrderForm, RestaurantForm};
pub use order::OrderAdmin;
pub use product::ProductAdmin;
pub use redirect::{response_change, url_has_allowed_host_and_scheme};
pub use restaurant::RestaurantAdmin;
