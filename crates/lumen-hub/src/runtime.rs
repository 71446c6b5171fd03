//! Actor runtime - the single serializing owner of the hub
//!
//! All inbound events, the cleanup sweep, and deferred ambient releases
//! run on one task, so no two handlers ever execute concurrently against
//! shared state. Connection sinks receive routed outbound events; delivery
//! is best-effort and a closed sink is never an error.
//!
//! Shutdown is cooperative: dropping every `HubHandle` closes the command
//! channel and ends the loop. Pending deferred broadcasts are dropped at
//! that point; cancellation is best-effort by design.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use lumen_core::{ClientEvent, HubError, HubResult, HubTime, ParticipantId, ServerEvent};

use crate::{Hub, HubConfig, HubSnapshot, Outbound, SnapshotHandle};

enum Command {
    Connect {
        id: ParticipantId,
        sink: UnboundedSender<ServerEvent>,
    },
    Disconnect {
        id: ParticipantId,
    },
    Event {
        id: ParticipantId,
        event: ClientEvent,
    },
}

/// Cloneable client handle to a running hub
#[derive(Clone)]
pub struct HubHandle {
    tx: UnboundedSender<Command>,
    snapshot: SnapshotHandle,
}

impl HubHandle {
    /// Register a connection; the returned receiver yields every event
    /// routed to this participant, starting with `welcome`
    pub fn connect(&self, id: ParticipantId) -> HubResult<UnboundedReceiver<ServerEvent>> {
        let (sink, rx) = mpsc::unbounded_channel();
        self.tx
            .send(Command::Connect { id, sink })
            .map_err(|_| HubError::RuntimeClosed)?;
        Ok(rx)
    }

    pub fn disconnect(&self, id: ParticipantId) -> HubResult<()> {
        self.tx
            .send(Command::Disconnect { id })
            .map_err(|_| HubError::RuntimeClosed)
    }

    pub fn send(&self, id: ParticipantId, event: ClientEvent) -> HubResult<()> {
        self.tx
            .send(Command::Event { id, event })
            .map_err(|_| HubError::RuntimeClosed)
    }

    /// Last published read-only snapshot
    pub fn snapshot(&self) -> HubSnapshot {
        self.snapshot.read()
    }

    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }
}

/// The runtime task state
pub struct HubRuntime {
    hub: Hub,
    rx: UnboundedReceiver<Command>,
    sinks: HashMap<ParticipantId, UnboundedSender<ServerEvent>>,
    snapshot: SnapshotHandle,
    sweep_interval: Duration,
    pulse_interval: Duration,
}

impl HubRuntime {
    /// Spawn the hub actor; returns the client handle and the task handle
    pub fn spawn(config: HubConfig) -> (HubHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot = SnapshotHandle::new();
        let runtime = HubRuntime {
            sweep_interval: config.sweep_interval,
            pulse_interval: config.pulse_interval,
            hub: Hub::new(config),
            rx,
            sinks: HashMap::new(),
            snapshot: snapshot.clone(),
        };
        let handle = HubHandle { tx, snapshot };
        let join = tokio::spawn(runtime.run());
        (handle, join)
    }

    async fn run(mut self) {
        let mut sweep = tokio::time::interval(self.sweep_interval);
        let mut pulse = tokio::time::interval(self.pulse_interval);
        // consume the immediate first tick both intervals fire
        sweep.tick().await;
        pulse.tick().await;

        loop {
            tokio::select! {
                command = self.rx.recv() => {
                    match command {
                        Some(command) => self.apply(command),
                        None => break,
                    }
                }
                _ = sweep.tick() => {
                    self.hub.sweep(HubTime::now());
                }
                _ = pulse.tick() => {
                    self.hub.release_due(HubTime::now());
                }
            }
            self.flush();
        }
        debug!("hub runtime stopped");
    }

    fn apply(&mut self, command: Command) {
        let now = HubTime::now();
        match command {
            Command::Connect { id, sink } => {
                if self.sinks.contains_key(&id) {
                    // hub.connect would reject this too; keep the live sink
                    debug!(participant = %id, "duplicate connect ignored");
                    return;
                }
                self.sinks.insert(id.clone(), sink);
                self.hub.connect(id, now);
            }
            Command::Disconnect { id } => {
                self.sinks.remove(&id);
                self.hub.disconnect(&id, now);
            }
            Command::Event { id, event } => self.hub.handle(&id, event, now),
        }
    }

    /// Route queued outbound events and publish a fresh snapshot
    fn flush(&mut self) {
        for outbound in self.hub.drain_outgoing() {
            match outbound {
                Outbound::Broadcast(event) => {
                    for (id, sink) in &self.sinks {
                        if sink.send(event.clone()).is_err() {
                            debug!(participant = %id, "sink closed, delivery dropped");
                        }
                    }
                }
                Outbound::To(id, event) => {
                    if let Some(sink) = self.sinks.get(&id) {
                        if sink.send(event).is_err() {
                            debug!(participant = %id, "sink closed, delivery dropped");
                        }
                    }
                }
            }
        }
        self.snapshot.publish(self.hub.snapshot(HubTime::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::SendMessage;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn test_config() -> HubConfig {
        HubConfig {
            rng_seed: Some(9),
            ambient_probability: 0.0,
            pulse_interval: Duration::from_millis(5),
            ..HubConfig::default()
        }
    }

    async fn recv(rx: &mut UnboundedReceiver<ServerEvent>) -> ServerEvent {
        timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("sink closed")
    }

    fn chat(text: &str) -> ClientEvent {
        ClientEvent::SendMessage(SendMessage {
            text: text.to_owned(),
            effects: Vec::new(),
            kind: "chat".to_owned(),
            holographic: false,
            sound_effect: None,
        })
    }

    #[tokio::test]
    async fn test_connect_welcome_and_broadcast_roundtrip() {
        let (handle, join) = HubRuntime::spawn(test_config());

        let mut rx_a = handle.connect(ParticipantId::new("a")).unwrap();
        assert!(matches!(recv(&mut rx_a).await, ServerEvent::Welcome(_)));
        assert!(matches!(
            recv(&mut rx_a).await,
            ServerEvent::ParticipantsUpdate(_)
        ));

        let mut rx_b = handle.connect(ParticipantId::new("b")).unwrap();
        assert!(matches!(recv(&mut rx_b).await, ServerEvent::Welcome(_)));
        // a sees b join
        assert!(matches!(
            recv(&mut rx_a).await,
            ServerEvent::ParticipantsUpdate(_)
        ));

        handle.send(ParticipantId::new("a"), chat("hello")).unwrap();

        // both connections observe the message
        let ServerEvent::ParticipantsUpdate(_) = recv(&mut rx_b).await else {
            panic!("expected roster update for b");
        };
        let ServerEvent::NewMessage(for_a) = recv(&mut rx_a).await else {
            panic!("expected message for a");
        };
        let ServerEvent::NewMessage(for_b) = recv(&mut rx_b).await else {
            panic!("expected message for b");
        };
        assert_eq!(for_a.text, "hello");
        assert_eq!(for_b.text, "hello");

        drop(handle);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_published_after_commands() {
        let (handle, join) = HubRuntime::spawn(test_config());

        let mut rx = handle.connect(ParticipantId::new("a")).unwrap();
        recv(&mut rx).await; // welcome
        recv(&mut rx).await; // roster

        handle.send(ParticipantId::new("a"), chat("hi")).unwrap();
        recv(&mut rx).await; // new message
        recv(&mut rx).await; // roster

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.participant_count, 1);
        assert_eq!(snapshot.message_count, 1);

        drop(handle);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_ambient_response_delivered_after_author_disconnect() {
        let config = HubConfig {
            ambient_probability: 1.0,
            ambient_delay_min: Duration::from_millis(10),
            ambient_delay_max: Duration::from_millis(20),
            ..test_config()
        };
        let (handle, join) = HubRuntime::spawn(config);

        let mut rx_a = handle.connect(ParticipantId::new("a")).unwrap();
        let mut rx_b = handle.connect(ParticipantId::new("b")).unwrap();

        handle.send(ParticipantId::new("a"), chat("bye")).unwrap();
        handle.disconnect(ParticipantId::new("a")).unwrap();

        // the response scheduled before the disconnect still reaches b
        loop {
            match recv(&mut rx_b).await {
                ServerEvent::AiResponse(response) => {
                    assert!(!response.text.is_empty());
                    break;
                }
                _ => continue,
            }
        }

        drop(rx_a);
        drop(handle);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_disconnected_sink_receives_nothing_further() {
        let (handle, join) = HubRuntime::spawn(test_config());

        let mut rx_a = handle.connect(ParticipantId::new("a")).unwrap();
        let mut rx_b = handle.connect(ParticipantId::new("b")).unwrap();
        handle.disconnect(ParticipantId::new("b")).unwrap();

        handle.send(ParticipantId::new("a"), chat("solo")).unwrap();

        // b's sender was dropped by the runtime; the channel drains to None
        loop {
            match timeout(WAIT, rx_b.recv()).await.expect("timed out") {
                Some(ServerEvent::NewMessage(_)) => panic!("b still receiving after disconnect"),
                Some(_) => continue,
                None => break,
            }
        }

        // a still gets the message
        loop {
            if let ServerEvent::NewMessage(message) = recv(&mut rx_a).await {
                assert_eq!(message.text, "solo");
                break;
            }
        }

        drop(handle);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_after_shutdown_errors() {
        let (handle, join) = HubRuntime::spawn(test_config());

        join.abort();
        let _ = join.await;

        let err = handle
            .send(ParticipantId::new("a"), chat("too late"))
            .unwrap_err();
        assert!(matches!(err, HubError::RuntimeClosed));
    }
}
