use axum::Extension;
use axum::extract::Query;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;

use super::broker::{Broker, EventStream};
use super::types::Room;
use crate::actor::Actor;
use crate::error::AppError;
use crate::hospital::types::HospitalId;

#[derive(Debug, Deserialize)]
pub struct SubscribeParams {
    pub hospital_id: Option<String>,
}

/// Picks the rooms a connection may join: always global, plus the hospital room for its staff.
pub fn rooms_for(actor: &Actor, hospital_id: Option<&str>) -> Result<Vec<Room>, AppError> {
    let mut rooms = vec![Room::Global];
    if let Some(id) = hospital_id.map(str::trim).filter(|id| !id.is_empty()) {
        let hospital_id = HospitalId(id.to_string());
        actor.require_staff_of(&hospital_id)?;
        rooms.push(Room::Hospital(hospital_id));
    }
    Ok(rooms)
}

pub async fn handle_subscribe(
    ws: WebSocketUpgrade,
    actor: Actor,
    Query(params): Query<SubscribeParams>,
    Extension(broker): Extension<Arc<dyn Broker>>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = rooms_for(&actor, params.hospital_id.as_deref())?;
    tracing::info!("Observer joining {} room(s)", rooms.len());

    // Subscribe before the upgrade completes so nothing published in between is missed.
    let streams: Vec<EventStream> = rooms.iter().map(|room| broker.subscribe(room)).collect();
    let events: EventStream = Box::pin(futures_util::stream::select_all(streams));

    Ok(ws.on_upgrade(move |socket| forward_events(socket, events)))
}

async fn forward_events(socket: WebSocket, mut events: EventStream) {
    let (mut sink, mut incoming) = socket.split();

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::warn!("Failed to encode {}: {}", event.name(), e);
                        continue;
                    }
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    tracing::debug!("Observer went away mid-send");
                    break;
                }
            }
            message = incoming.next() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }

    let _ = sink.close().await;
    tracing::debug!("Observer disconnected");
}
