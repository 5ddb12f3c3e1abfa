use crate::control_system::signal_io::Actuator;
use crate::global_variables::QUEUE_SIGNAL_EVENTS;
use crate::shared_data::{current_timestamp, SignalEvent, SignalEventRecord};
use crate::simulation_engine::intersections::{Aspect, LaneId};
use amiquip::{
    Channel, Connection, ConsumerMessage, ConsumerOptions, Exchange, Publish,
    QueueDeclareOptions, Result as AmiquipResult,
};
use serde::Serialize;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Generic helper to append a record to a CSV file. Headers are written only
/// when the file is new.
pub fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<(), Box<dyn Error>> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn log_signal_event(path: &Path, record: &SignalEventRecord) {
    if let Err(e) = log_to_csv(path, record) {
        log::error!("Error logging signal event: {}", e);
    }
}

/// Publishes every lamp change to the `signal_events` queue.
pub struct AmqpPublisher {
    connection: Connection,
    channel: Channel,
}

impl AmqpPublisher {
    pub fn connect(url: &str) -> AmiquipResult<Self> {
        let mut connection = Connection::insecure_open(url)?;
        let channel = connection.open_channel(None)?;
        channel.queue_declare(QUEUE_SIGNAL_EVENTS, QueueDeclareOptions::default())?;
        log::info!("Publishing signal events to '{}'", QUEUE_SIGNAL_EVENTS);
        Ok(Self {
            connection,
            channel,
        })
    }

    pub fn publish(&self, event: &SignalEvent) -> Result<(), Box<dyn Error>> {
        let payload = serde_json::to_vec(event)?;
        let exchange = Exchange::direct(&self.channel);
        exchange.publish(Publish::new(&payload, QUEUE_SIGNAL_EVENTS))?;
        Ok(())
    }

    pub fn close(self) -> AmiquipResult<()> {
        self.connection.close()
    }
}

impl Actuator for AmqpPublisher {
    // A broker outage must not stall the signal heads, so failures are only logged.
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        let event = SignalEvent {
            at_ms: at.as_millis() as u64,
            lane,
            aspect,
        };
        if let Err(e) = self.publish(&event) {
            log::warn!("Failed to publish signal event {:?}: {}", event, e);
        }
    }
}

/// Parses a queue payload into a CSV record. Returns `None` for anything that
/// is not a `SignalEvent`.
pub fn decode_signal_event(body: &[u8], received_at: u64) -> Option<SignalEventRecord> {
    let json_str = std::str::from_utf8(body).ok()?;
    let event: SignalEvent = serde_json::from_str(json_str).ok()?;
    Some(SignalEventRecord::from_event(&event, received_at))
}

/// Listens to the "signal_events" queue and logs each incoming record.
pub async fn listen_signal_events(url: String, csv_path: PathBuf) -> AmiquipResult<()> {
    let listener = tokio::task::spawn_blocking(move || -> AmiquipResult<()> {
        let mut connection = Connection::insecure_open(&url)?;
        let channel = connection.open_channel(None)?;
        let queue = channel.queue_declare(QUEUE_SIGNAL_EVENTS, QueueDeclareOptions::default())?;
        let consumer = queue.consume(ConsumerOptions::default())?;
        log::info!("Listening for signal events...");
        for message in consumer.receiver() {
            match message {
                ConsumerMessage::Delivery(delivery) => {
                    match decode_signal_event(&delivery.body, current_timestamp()) {
                        Some(record) => log_signal_event(&csv_path, &record),
                        None => log::warn!("Dropping malformed signal event payload"),
                    }
                    consumer.ack(delivery)?;
                }
                other => {
                    log::info!("Signal events consumer ended: {:?}", other);
                    break;
                }
            }
        }
        connection.close()
    });
    match listener.await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Signal event listener task failed: {}", e);
            Ok(())
        }
    }
}
