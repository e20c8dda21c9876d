//! The iTerm2 scripting API as seen by the dispatcher.
//!
//! `Connector` opens one connection per invocation; `HostConnection` exposes
//! only the requests the bridge commands need. The websocket implementation
//! lives in [`websocket`]; tests use an in-memory host instead.

use async_trait::async_trait;

use crate::error::HostError;

pub mod proto;
pub mod resolve;
pub mod websocket;

pub use resolve::AppSnapshot;
pub use websocket::WebsocketConnector;

/// One terminal window and its tabs, in iTerm2's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLayout {
    pub window_id: String,
    pub tabs: Vec<TabLayout>,
}

/// One tab and the sessions (split panes) it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLayout {
    pub tab_id: String,
    pub session_ids: Vec<String>,
}

/// Key-window transitions reported by iTerm2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    BecameKey,
    IsCurrent,
    ResignedKey,
}

/// One focus fact from iTerm2's focus report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    ApplicationActive(bool),
    Window {
        window_id: String,
        status: WindowStatus,
    },
    SelectedTab(String),
    ActiveSession(String),
}

/// Opens a connection to the running iTerm2 instance.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn HostConnection>, HostError>;
}

/// Requests against one open iTerm2 connection.
#[async_trait]
pub trait HostConnection: Send {
    /// All terminal windows with their tabs and sessions.
    async fn list_windows(&mut self) -> Result<Vec<WindowLayout>, HostError>;

    /// Current focus: key window, selected tab per window, active session per tab.
    async fn focus(&mut self) -> Result<Vec<FocusEvent>, HostError>;

    /// Send literal text to a session's input.
    async fn send_text(&mut self, session_id: &str, text: &str) -> Result<(), HostError>;

    /// Text of each visible screen row, top to bottom.
    async fn screen_lines(&mut self, session_id: &str) -> Result<Vec<String>, HostError>;

    /// Value of a session variable, `None` when unset.
    async fn session_variable(
        &mut self,
        session_id: &str,
        name: &str,
    ) -> Result<Option<String>, HostError>;

    /// Release the connection.
    async fn close(&mut self) -> Result<(), HostError>;
}
