use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;
use library_event_producer::{Book, LibraryEvent};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::{Client, ClientBuilder};

const TITLES: &[&str] = &[
    "Kafka Using Spring Boot",
    "Designing Data-Intensive Applications",
    "Streaming Systems",
    "Kafka: The Definitive Guide",
    "Programming Rust",
];

const AUTHORS: &[&str] = &[
    "Aleksandar Grahovac",
    "Martin Kleppmann",
    "Tyler Akidau",
    "Gwen Shapira",
    "Jim Blandy",
];

#[derive(Parser, Debug)]
#[command(
    name = "library-event-generator",
    about = "Drives the library events API with synthetic new and update events"
)]
struct Args {
    /// Base URL of the library events API
    #[arg(long, env = "API_GATEWAY_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    /// Request rate (events / second) per worker
    #[arg(short, long, default_value_t = 10.0)]
    rate: f64,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 1)]
    concurrency: usize,

    /// Base seed; worker i uses seed + i
    #[arg(short, long, default_value_t = 42u64)]
    seed: u64,

    /// Optional number of events per worker (if omitted, runs until Ctrl-C)
    #[arg(short, long)]
    messages: Option<u64>,

    /// Fraction of events sent as updates (PUT with an id)
    #[arg(short, long, default_value_t = 0.2)]
    update_ratio: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    if args.concurrency == 0 {
        anyhow::bail!("concurrency must be > 0");
    }
    if args.rate <= 0.0 {
        anyhow::bail!("rate must be > 0");
    }
    if !(0.0..=1.0).contains(&args.update_ratio) {
        anyhow::bail!("update-ratio must be within 0..=1");
    }

    info!(
        "Starting library event generator: endpoint={}, rate={} ev/s, concurrency={}, seed={}, update_ratio={}, messages_per_worker={:?}",
        args.endpoint, args.rate, args.concurrency, args.seed, args.update_ratio, args.messages
    );

    let http_client = ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .build()?;
    let sleep_duration = Duration::from_secs_f64(1.0 / args.rate);

    let mut handles = Vec::with_capacity(args.concurrency);
    for worker in 0..args.concurrency {
        let client = http_client.clone();
        let endpoint = args.endpoint.trim_end_matches('/').to_string();
        let seed = args.seed + worker as u64;
        let messages = args.messages;
        let update_ratio = args.update_ratio;

        handles.push(tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            info!("worker={worker} started seed={seed} target_messages={messages:?}");

            let mut sent: u64 = 0;
            while messages.map_or(true, |limit| sent < limit) {
                let is_update = rng.gen_bool(update_ratio);
                let event = random_event(&mut rng, is_update);
                send_event(&client, &endpoint, &event, is_update, worker).await;

                sent += 1;
                if sent % 1000 == 0 {
                    info!("worker={worker} sent={sent}");
                }
                tokio::time::sleep(sleep_duration).await;
            }

            info!("worker={worker} finished total_sent={sent}");
        }));
    }

    if args.messages.is_none() {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl-C received, shutting down");
        for h in &handles {
            h.abort();
        }
    }

    for h in handles {
        let _ = h.await;
    }

    info!("library event generator exiting");
    Ok(())
}

fn random_event(rng: &mut StdRng, is_update: bool) -> LibraryEvent {
    let title = TITLES.choose(rng).copied().unwrap_or(TITLES[0]);
    let author = AUTHORS.choose(rng).copied().unwrap_or(AUTHORS[0]);
    let book = Book::new(rng.gen_range(1..10_000), title, author);
    let id = is_update.then(|| rng.gen_range(1..10_000));
    LibraryEvent::new(id, book)
}

async fn send_event(client: &Client, endpoint: &str, event: &LibraryEvent, is_update: bool, worker: usize) {
    let url = format!("{endpoint}/v1/asynchronous-libraryevent");
    let request = if is_update {
        client.put(&url)
    } else {
        client.post(&url)
    };

    match request.json(event).send().await {
        Ok(resp) if resp.status().is_success() => {}
        Ok(resp) => warn!(
            "worker={worker} event id={:?} rejected with {}",
            event.library_event_id,
            resp.status()
        ),
        Err(e) => error!("worker={worker} HTTP send error: {e}"),
    }
}
