use diesel::{Connection, PgConnection, QueryDsl, RunQueryDsl};
use food_ordering::{client::{AddressInput, FoodClient, ItemInput, RestaurantInput}, configuration::{DatabaseSettings, Settings}, domain::UserRole, models::{Address, Item, Restaurant, SessionUser}, schema::{order_items, orders, sessions}, startup::{run_migrations, Application}, telemetry::{get_subscriber, init_subscriber}, utils::{build_pool, DbPool}};
use fake::{faker::internet::en::SafeEmail, Fake};
use once_cell::sync::Lazy;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "food-ordering-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    }
});

pub const PASSWORD: &str = "password123";

pub fn password() -> SecretString {
    SecretString::from(PASSWORD.to_string())
}

pub fn random_email() -> String {
    SafeEmail().fake()
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub api_client: reqwest::Client
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(settings.server_url().expose_secret())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        build_pool(settings)
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let mut settings = Settings::get().expect("Failed to read configuration");
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();
        settings.database.migrate_on_startup = false;

        let pool = TestApp::create_db(&settings.database);
        run_migrations(&pool).await.expect("Failed to run migrations");

        let application = Application::build(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.server);

        let api_client = reqwest::Client::builder()
                            .redirect(Policy::none())
                            .cookie_store(true)
                            .build()
                            .unwrap();

        TestApp{
            host,
            port,
            pool,
            api_client
        }
    }

    // A separate browser: its own cookie jar, logged out
    pub fn new_client(&self) -> FoodClient {
        FoodClient::new(self.get_app_url(), 10).expect("Failed to build api client")
    }

    pub async fn signed_up(&self, role: UserRole) -> (FoodClient, SessionUser) {
        let client = self.new_client();
        let user = client.register(&random_email(), &password(), role)
            .await
            .expect("Failed to register user");

        (client, user)
    }

    pub fn order_count(&self) -> i64 {
        let mut conn = self.pool.get().unwrap();
        orders::table.count().get_result::<i64>(&mut conn).unwrap()
    }

    pub fn order_item_count(&self) -> i64 {
        let mut conn = self.pool.get().unwrap();
        order_items::table.count().get_result::<i64>(&mut conn).unwrap()
    }

    pub fn session_count(&self) -> i64 {
        let mut conn = self.pool.get().unwrap();
        sessions::table.count().get_result::<i64>(&mut conn).unwrap()
    }
}

pub fn sample_address() -> AddressInput {
    AddressInput{
        label: "Home".into(),
        street: "123 Main St".into(),
        city: "Sample City".into(),
        postal_code: "12345".into()
    }
}

pub async fn add_address(client: &FoodClient) -> Address {
    client.create_address(&sample_address())
        .await
        .expect("Failed to create address")
}

// Restaurant "Tasty Bites" with Burger 999 and Fries 499
pub async fn open_restaurant(owner: &FoodClient) -> (Restaurant, Vec<Item>) {
    let restaurant = owner.create_restaurant(&RestaurantInput{
        name: "Tasty Bites".into(),
        description: Some("Delicious sample food".into())
    })
    .await
    .expect("Failed to create restaurant");

    let mut menu = Vec::new();
    for (name, price) in [("Burger", 999), ("Fries", 499)] {
        let item = owner.create_item(restaurant.id, &ItemInput{
            name: name.into(),
            description: None,
            price
        })
        .await
        .expect("Failed to create item");
        menu.push(item);
    }

    (restaurant, menu)
}
