use serde::{Deserialize, Serialize};
use std::fmt;

/// One independent external data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Video,
    Detections,
    Sensors,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [FeedKind::Video, FeedKind::Detections, FeedKind::Sensors];

    /// Prefix of the human-readable indicator.
    pub fn indicator_prefix(self) -> &'static str {
        match self {
            FeedKind::Video => "Video",
            FeedKind::Detections => "Boxes",
            FeedKind::Sensors => "Sensors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
    Failed,
}

impl ConnectionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionStatus::Disconnected | ConnectionStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn indicator_text(feed: FeedKind, status: ConnectionStatus) -> String {
    format!("{}: {}", feed.indicator_prefix(), status)
}

/// Link-level events every supervisor reduces its channel signals to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Up,
    Down,
    Failed,
}

/// Pure transition function shared by all feeds.
/// Returns the next status only when the status actually changes.
pub fn transition(current: ConnectionStatus, event: LinkEvent) -> Option<ConnectionStatus> {
    use ConnectionStatus::*;
    if current.is_terminal() {
        return None;
    }
    let next = match (current, event) {
        (_, LinkEvent::Up) => Connected,
        (_, LinkEvent::Down) => Disconnected,
        (_, LinkEvent::Failed) => Failed,
    };
    (next != current).then_some(next)
}

/// Connection state reported by the video transport (ICE connection states).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl TransportState {
    /// Only states with a clear meaning move the indicator. Transitional states
    /// map to nothing so an optimistic `Connected` never regresses to `Connecting`.
    pub fn link_event(self) -> Option<LinkEvent> {
        match self {
            TransportState::Connected | TransportState::Completed => Some(LinkEvent::Up),
            TransportState::Disconnected | TransportState::Failed => Some(LinkEvent::Down),
            TransportState::New | TransportState::Checking | TransportState::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionStatus::*;

    #[test]
    fn happy_path() {
        assert_eq!(transition(Connecting, LinkEvent::Up), Some(Connected));
        assert_eq!(transition(Connected, LinkEvent::Down), Some(Disconnected));
    }

    #[test]
    fn repeated_up_is_not_a_transition() {
        assert_eq!(transition(Connected, LinkEvent::Up), None);
    }

    #[test]
    fn terminal_states_stay_put() {
        for ev in [LinkEvent::Up, LinkEvent::Down, LinkEvent::Failed] {
            assert_eq!(transition(Disconnected, ev), None);
            assert_eq!(transition(Failed, ev), None);
        }
    }

    #[test]
    fn failure_before_open() {
        assert_eq!(transition(Connecting, LinkEvent::Failed), Some(Failed));
        assert_eq!(transition(Connecting, LinkEvent::Down), Some(Disconnected));
    }

    #[test]
    fn transport_states_map_to_link_events() {
        assert_eq!(TransportState::Completed.link_event(), Some(LinkEvent::Up));
        assert_eq!(TransportState::Failed.link_event(), Some(LinkEvent::Down));
        assert_eq!(TransportState::Checking.link_event(), None);
        assert_eq!(TransportState::New.link_event(), None);
    }

    #[test]
    fn indicator_labels() {
        assert_eq!(indicator_text(FeedKind::Video, Connected), "Video: Connected");
        assert_eq!(indicator_text(FeedKind::Detections, Disconnected), "Boxes: Disconnected");
        assert_eq!(indicator_text(FeedKind::Sensors, Failed), "Sensors: Failed");
    }
}
