use dotenvy::dotenv;
use foodcart::{
    config::{database, settings},
    core::{location, manager, order, restaurant},
    entities::OrderStatus,
    errors::Result,
    geocoder::YandexGeocoder,
};
use sea_orm::Iterable;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load settings
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connected."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Geocode every address that is not cached yet
    let geocoder = YandexGeocoder::from_settings(&settings.geocoder)
        .inspect_err(|e| error!("Geocoder is not configured: {}", e))?;

    let open_statuses: Vec<OrderStatus> =
        OrderStatus::iter().filter(|s| !s.is_terminal()).collect();
    let mut addresses: Vec<String> = restaurant::get_all_restaurants(&db)
        .await?
        .into_iter()
        .map(|r| r.address)
        .collect();
    addresses.extend(
        order::list_orders_with_price(&db, Some(open_statuses.as_slice()))
            .await?
            .into_iter()
            .map(|priced| priced.order.address),
    );
    let added = location::ensure_locations(&db, &geocoder, &addresses).await?;
    info!("Cached {} new locations.", added);

    // 6. Summarize open orders for managers
    for card in manager::unfinished_orders_with_restaurants(&db).await? {
        info!(
            order_id = card.order.id,
            status = ?card.order.status,
            price = card.price,
            candidates = card.restaurants.len(),
            "Open order"
        );
    }

    Ok(())
}
