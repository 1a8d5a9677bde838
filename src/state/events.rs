use courtside_api::Scoreboard;
use courtside_api::client::map_scoreboard;
use courtside_api::wire::EventFrameWire;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Debug, Clone)]
pub enum PushEvent {
    Connected,
    Disconnected,
    /// Inline scoreboard payload. None clears the board (no active match).
    Scoreboard(Option<Scoreboard>),
    /// A resource changed upstream without an inline payload; refetch it.
    Changed(ChangedResource),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangedResource {
    Scoreboard,
    Standings,
    Bracket,
    Summary,
}

/// First frame sent after connecting; the backend scopes the stream to one
/// tournament.
#[derive(Debug, Serialize)]
struct SubscribeFrame<'a> {
    subscribe: &'a str,
}

/// Push-event channel to the backend. Built once by the composition root
/// with its URL and tournament slug, then run as a task; there is no
/// ambient singleton connection anywhere.
#[derive(Debug)]
pub struct EventChannel {
    url: String,
    tournament: String,
    events: mpsc::Sender<PushEvent>,
}

impl EventChannel {
    pub fn new(
        url: impl Into<String>,
        tournament: impl Into<String>,
        events: mpsc::Sender<PushEvent>,
    ) -> Self {
        Self {
            url: url.into(),
            tournament: tournament.into(),
            events,
        }
    }

    /// Connect, subscribe, and forward frames until the receiver goes away.
    /// Reconnects with a short pause after any drop.
    pub async fn run(self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    let _ = self.events.send(PushEvent::Connected).await;
                    let (mut write, mut read) = stream.split();

                    let subscribe = serde_json::to_string(&SubscribeFrame {
                        subscribe: &self.tournament,
                    })
                    .unwrap_or_default();
                    if let Err(e) = write.send(Message::Text(subscribe.into())).await {
                        let _ = self
                            .events
                            .send(PushEvent::Error(format!("subscribe failed: {e}")))
                            .await;
                        let _ = self.events.send(PushEvent::Disconnected).await;
                    } else {
                        while let Some(inbound) = read.next().await {
                            match inbound {
                                Ok(Message::Text(text)) => {
                                    if !self.handle_frame(&text).await {
                                        return;
                                    }
                                }
                                Ok(Message::Close(_)) => {
                                    let _ = self.events.send(PushEvent::Disconnected).await;
                                    break;
                                }
                                Ok(_) => {}
                                Err(e) => {
                                    let _ = self
                                        .events
                                        .send(PushEvent::Error(format!("event read failed: {e}")))
                                        .await;
                                    let _ = self.events.send(PushEvent::Disconnected).await;
                                    break;
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = self
                        .events
                        .send(PushEvent::Error(format!("event connect failed: {e}")))
                        .await;
                    let _ = self.events.send(PushEvent::Disconnected).await;
                }
            }

            sleep(Duration::from_secs(2)).await;
        }
    }

    /// Parse and forward one text frame. Returns false when the event
    /// receiver has been dropped and the channel should shut down.
    async fn handle_frame(&self, text: &str) -> bool {
        let frame = match serde_json::from_str::<EventFrameWire>(text) {
            Ok(frame) => frame,
            Err(e) => {
                return self
                    .events
                    .send(PushEvent::Error(format!("event parse error: {e}")))
                    .await
                    .is_ok();
            }
        };

        // Frames for other tournaments on a shared channel are not ours.
        if let Some(t) = frame.tournament.as_deref()
            && t != self.tournament
        {
            return true;
        }

        let event = match frame.kind.as_deref() {
            Some("scoreboard") => match frame.scoreboard {
                Some(wire) => PushEvent::Scoreboard(map_scoreboard(wire)),
                None => PushEvent::Changed(ChangedResource::Scoreboard),
            },
            Some("changed") => match frame.resource.as_deref().and_then(parse_resource) {
                Some(resource) => PushEvent::Changed(resource),
                None => return true,
            },
            _ => return true,
        };

        self.events.send(event).await.is_ok()
    }
}

fn parse_resource(s: &str) -> Option<ChangedResource> {
    match s {
        "scoreboard" => Some(ChangedResource::Scoreboard),
        "standings" => Some(ChangedResource::Standings),
        "bracket" => Some(ChangedResource::Bracket),
        "summary" => Some(ChangedResource::Summary),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_names_cover_the_fan_views() {
        assert_eq!(parse_resource("standings"), Some(ChangedResource::Standings));
        assert_eq!(parse_resource("bracket"), Some(ChangedResource::Bracket));
        assert_eq!(parse_resource("summary"), Some(ChangedResource::Summary));
        assert_eq!(parse_resource("tickets"), None);
    }

    #[tokio::test]
    async fn scoreboard_frame_maps_inline_payload() {
        let (tx, mut rx) = mpsc::channel(4);
        let channel = EventChannel::new("ws://unused", "city-cup", tx);

        let frame = r#"{
            "type": "scoreboard",
            "tournament": "city-cup",
            "scoreboard": {"matchId": "m-9", "status": "LIVE", "isRunning": true}
        }"#;
        assert!(channel.handle_frame(frame).await);

        match rx.recv().await {
            Some(PushEvent::Scoreboard(Some(sb))) => {
                assert_eq!(sb.match_id, "m-9");
                assert!(sb.timer.unwrap().is_running);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn frames_for_other_tournaments_are_dropped() {
        let (tx, mut rx) = mpsc::channel(4);
        let channel = EventChannel::new("ws://unused", "city-cup", tx);

        let frame = r#"{"type": "changed", "tournament": "other", "resource": "bracket"}"#;
        assert!(channel.handle_frame(frame).await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_frames_surface_as_errors_not_crashes() {
        let (tx, mut rx) = mpsc::channel(4);
        let channel = EventChannel::new("ws://unused", "city-cup", tx);

        assert!(channel.handle_frame("not json").await);
        assert!(matches!(rx.recv().await, Some(PushEvent::Error(_))));
    }
}
