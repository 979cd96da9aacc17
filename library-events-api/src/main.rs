use dotenvy::dotenv;
use library_event_producer::{KafkaPublisher, LibraryEventProducer, utils};
use library_events_api::config::Config;
use library_events_api::{AppState, configure};
use log::{error, info};
use ntex::web;
use rdkafka::admin::AdminClient;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    info!(
        "Starting library events API on {}, broker={}, topic={}",
        config.bind_address, config.brokers, config.topic
    );

    let admin: AdminClient<_> = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .create()
        .map_err(std::io::Error::other)?;

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &config.brokers)
        .set("message.timeout.ms", config.message_timeout_ms.to_string())
        .create()
        .map_err(std::io::Error::other)?;

    for spec in config.topic_specs() {
        if let Err(e) = utils::ensure_topic(&admin, &spec).await {
            error!("Topic ensure failed for {}: {e}", spec.name);
        }
    }

    let producer = LibraryEventProducer::new(KafkaPublisher::new(producer), config.topic.clone());
    let state = AppState::new(producer);

    web::server(move || {
        web::App::new()
            .state(state.clone())
            .configure(configure::<KafkaPublisher>)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
