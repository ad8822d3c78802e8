use food_ordering::{configuration::Settings, seed::seed_database, startup::run_migrations, telemetry::{get_subscriber, init_subscriber}, utils::build_pool};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("food_ordering_seed".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let settings = Settings::get()?;
    let pool = build_pool(&settings.database);
    run_migrations(&pool).await?;

    let summary = seed_database(&pool).await?;
    tracing::info!(?summary, "Seeding done");

    Ok(())
}
