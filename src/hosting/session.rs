use crate::Error;
use crate::ID;
use crate::Missing;
use crate::broadcast::Hub;
use crate::broadcast::Ticket;
use crate::store::Room;
use crate::store::Store;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Lifecycle of one match stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Subscribed,
    Closed,
}

/// One push-only subscription to a match's events.
pub struct Session {
    room: ID<Room>,
    hub: Arc<Hub>,
    ticket: Option<Ticket>,
    phase: Phase,
}

impl Session {
    pub fn new(room: ID<Room>, hub: Arc<Hub>) -> Self {
        Self {
            room,
            hub,
            ticket: None,
            phase: Phase::Connecting,
        }
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// Joins the match's audience if the room exists. Otherwise closes
    /// without ever subscribing.
    pub async fn connect(&mut self, store: &Store) -> Result<UnboundedReceiver<String>, Error> {
        if !store.contains(self.room).await {
            self.phase = Phase::Closed;
            log::info!("[session {}] refused: no such match", self.room);
            return Err(Missing::Room.into());
        }
        let (ticket, rx) = self.hub.subscribe(self.room).await;
        self.ticket = Some(ticket);
        self.phase = Phase::Subscribed;
        log::info!("[session {}] subscribed as {}", self.room, ticket);
        Ok(rx)
    }
    /// Leaves the audience. Safe to call in any phase, any number of times.
    pub async fn close(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.hub.unsubscribe(self.room, ticket).await;
            log::info!("[session {}] closed {}", self.room, ticket);
        }
        self.phase = Phase::Closed;
    }

    /// Pumps hub events into the websocket until either side goes away.
    /// Inbound text and binary frames are ignored.
    pub async fn bridge(
        mut self,
        store: &Store,
        mut socket: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> Result<(), Error> {
        use futures::StreamExt;
        let mut rx = self.connect(store).await?;
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Some(json) => if socket.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Ping(bytes))) => if socket.pong(&bytes).await.is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            self.close().await;
            let _ = socket.close(None).await;
        });
        Ok(())
    }
}
