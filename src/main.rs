use bell::{BellError, Message, Registry};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
struct OrderCreated {
    id: u32,
    total_cents: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BellError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bell=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bell demo");

    // Process-wide registry, configured from BELL_QUEUE_SIZE
    bell::listen("greeting", |msg: Message| {
        if let Some(name) = msg.value::<&str>() {
            info!(event = msg.event(), at = %msg.timestamp(), "Hello, {name}!");
        }
    })?;
    bell::ring("greeting", "bell")?;
    bell::wait();

    // Isolated registry with three workers sharing one buffered queue
    let orders: Registry<Message> = Registry::with_queue_size(4);
    orders.listen_n(
        "order.created",
        |msg: Message| {
            if let Some(order) = msg.value::<OrderCreated>() {
                std::thread::sleep(Duration::from_millis(20));
                info!(order_id = order.id, total_cents = order.total_cents, "Order processed");
            }
        },
        3,
    )?;

    for id in 1..=6 {
        let order = OrderCreated {
            id,
            total_cents: u64::from(id) * 1_250,
        };
        orders
            .ring_async("order.created", Message::new("order.created", order))
            .await?;
    }
    orders.wait_async().await?;

    info!(events = ?orders.list(), "Registered events");
    orders.remove_all();
    bell::remove_all();

    info!("Bell demo finished");
    Ok(())
}
