use crate::client::Session;
use crate::error::CredwatchError;
use crate::types::{ChangeEvent, decode_change};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Channel name under which the listener registers its interest.
pub const CREDENTIALS_CHANNEL: &str = "credentials_channel";

/// A registered interest in row-level change events, backed by a background
/// task draining the event stream. Dropping the handle detaches the reader;
/// use [`Session::unsubscribe`] for an orderly release.
#[derive(Debug)]
pub struct Subscription {
    channel: String,
    reader: JoinHandle<()>,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Session {
    /// Register a wildcard change subscription on `table` and spawn a reader
    /// task that decodes each pushed event and hands it to `callback`.
    ///
    /// The callback is a pure observer: it runs on the reader task at an
    /// arbitrary point relative to the rest of the process and must not
    /// assume exclusive access to anything beyond what it owns.
    pub async fn subscribe<F>(
        &self,
        channel: &str,
        table: &str,
        callback: F,
    ) -> Result<Subscription, CredwatchError>
    where
        F: Fn(ChangeEvent) + Send + 'static,
    {
        let mut url = self.endpoint("realtime/v1/stream")?;
        url.query_pairs_mut()
            .append_pair("channel", channel)
            .append_pair("table", table)
            .append_pair("events", "*");

        // Registered on the untimed client: the stream must outlive the
        // bounded CRUD timeout.
        let resp = self
            .stream_http()
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::Subscription)?;

        let reader = tokio::spawn(async move {
            let mut stream = Box::pin(resp.bytes_stream().eventsource());
            while let Some(event) = stream.next().await {
                match event {
                    Ok(event) => match decode_change(&event.data) {
                        Ok(change) => callback(change),
                        Err(e) => {
                            warn!(error = %e, payload = %event.data, "undecodable change event; skipping");
                        }
                    },
                    Err(e) => {
                        warn!(error = %e, "realtime stream error; reader stopping");
                        break;
                    }
                }
            }
        });

        info!(channel = %channel, table = %table, "subscribed to realtime updates");
        Ok(Subscription {
            channel: channel.to_string(),
            reader,
        })
    }

    /// Deregister a subscription: stop the reader task, then tell the
    /// backend to drop the channel.
    pub async fn unsubscribe(&self, subscription: Subscription) -> Result<(), CredwatchError> {
        subscription.reader.abort();

        let mut url = self.endpoint("realtime/v1/stream")?;
        url.query_pairs_mut()
            .append_pair("channel", &subscription.channel);

        self.http()
            .delete(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(CredwatchError::Subscription)?;

        info!(channel = %subscription.channel, "realtime subscription removed");
        Ok(())
    }
}

/// Guards the active subscription so that shutdown performs exactly one
/// unsubscribe attempt, and none when subscribing never completed.
#[derive(Default)]
pub struct Listener {
    active: Option<Subscription>,
}

impl Listener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, subscription: Subscription) {
        self.active = Some(subscription);
    }

    pub fn is_listening(&self) -> bool {
        self.active.is_some()
    }

    /// Release the subscription if one is active. Returns whether an
    /// unsubscribe was attempted; a failed deregistration is logged, not
    /// propagated, so the process can still exit.
    pub async fn shutdown(&mut self, session: &Session) -> bool {
        let Some(subscription) = self.active.take() else {
            return false;
        };
        if let Err(e) = session.unsubscribe(subscription).await {
            warn!(error = %e, "failed to remove realtime subscription");
        }
        true
    }
}

/// Default observer for the `realtime` command: echo each change to output.
/// Deletes report the pre-deletion snapshot, inserts and updates the
/// post-change row.
pub fn log_change(event: ChangeEvent) {
    info!(kind = %event.kind(), "realtime event received");
    println!("{}", event.describe());
}
