use conference_sessions::app::ConferenceApp;
use conference_sessions::application::ListConferenceSessionsQuery;
use conference_sessions::config::{AppConfig, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(config: &LoggingConfig) {
    let filter = config
        .env_filter()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging);
    config.validate()?;

    let app = ConferenceApp::open(&config).await?;
    tracing::info!(data_dir = %config.storage.data_dir.display(), "Stores opened");

    let mut conferences = app.stores.conferences.find_all().await;
    conferences.sort_by_key(|c| c.start_date());

    for conference in &conferences {
        println!("{} ({})", conference.name(), conference.period());
        let sessions = app
            .list_sessions
            .handle(ListConferenceSessionsQuery {
                conference_id: *conference.id(),
            })
            .await?;
        for session in sessions {
            println!(
                "  {}  {:<40} {} [{} registered]",
                session.window(),
                session.name(),
                session.room(),
                session.registered_attendees().len()
            );
        }
    }
    if conferences.is_empty() {
        println!("No conferences in {}", config.storage.data_dir.display());
    }

    Ok(())
}
