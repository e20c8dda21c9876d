//! Shared test fixtures for dispatch and resolution tests.
//!
//! `MockHost` plays both roles: it is the `Connector`, and every `connect`
//! hands out a connection that reads and records through the same shared
//! state, so a test can inspect what was sent after the run completes.
//! `LogCapture` collects formatted log lines for the current thread.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

use crate::error::HostError;
use crate::host::{
    Connector, FocusEvent, HostConnection, TabLayout, WindowLayout, WindowStatus,
};

#[derive(Debug, Default)]
struct MockState {
    windows: Vec<WindowLayout>,
    focus: Vec<FocusEvent>,
    screen: Vec<String>,
    variables: HashMap<(String, String), String>,
    connect_error: Option<String>,
    server_error: Option<String>,
    stale_session: bool,
    sent: Mutex<Vec<(String, String)>>,
    connections: AtomicUsize,
    closes: AtomicUsize,
}

/// In-memory iTerm2 with a fixed layout and focus.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    state: Arc<MockState>,
}

impl MockHost {
    fn from_parts(windows: Vec<WindowLayout>, focus: Vec<FocusEvent>) -> Self {
        Self {
            state: Arc::new(MockState {
                windows,
                focus,
                ..MockState::default()
            }),
        }
    }

    fn edit(mut self, apply: impl FnOnce(&mut MockState)) -> Self {
        let state = Arc::get_mut(&mut self.state).expect("configure MockHost before sharing it");
        apply(state);
        self
    }

    /// One key window with one selected tab holding one active session.
    pub fn single_session(session_id: &str) -> Self {
        Self::from_parts(
            vec![WindowLayout {
                window_id: "w1".into(),
                tabs: vec![TabLayout {
                    tab_id: "t1".into(),
                    session_ids: vec![session_id.to_string()],
                }],
            }],
            vec![
                FocusEvent::ApplicationActive(true),
                FocusEvent::Window {
                    window_id: "w1".into(),
                    status: WindowStatus::BecameKey,
                },
                FocusEvent::SelectedTab("t1".into()),
                FocusEvent::ActiveSession(session_id.to_string()),
            ],
        )
    }

    /// iTerm2 running with no windows at all.
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), vec![FocusEvent::ApplicationActive(false)])
    }

    /// A current window whose tab list is empty.
    pub fn window_without_tab() -> Self {
        Self::from_parts(
            vec![WindowLayout {
                window_id: "w1".into(),
                tabs: Vec::new(),
            }],
            vec![FocusEvent::Window {
                window_id: "w1".into(),
                status: WindowStatus::IsCurrent,
            }],
        )
    }

    /// A selected tab with no active session.
    pub fn tab_without_session() -> Self {
        Self::from_parts(
            vec![WindowLayout {
                window_id: "w1".into(),
                tabs: vec![TabLayout {
                    tab_id: "t1".into(),
                    session_ids: Vec::new(),
                }],
            }],
            vec![
                FocusEvent::Window {
                    window_id: "w1".into(),
                    status: WindowStatus::BecameKey,
                },
                FocusEvent::SelectedTab("t1".into()),
            ],
        )
    }

    /// Every connection attempt fails with `message`.
    pub fn unreachable(message: &str) -> Self {
        Self::empty().edit(|state| state.connect_error = Some(message.to_string()))
    }

    pub fn with_screen(self, lines: &[&str]) -> Self {
        let lines = lines.iter().map(|line| line.to_string()).collect();
        self.edit(|state| state.screen = lines)
    }

    pub fn with_variable(self, session_id: &str, name: &str, value: &str) -> Self {
        let key = (session_id.to_string(), name.to_string());
        let value = value.to_string();
        self.edit(|state| {
            state.variables.insert(key, value);
        })
    }

    /// Session requests fail as if the session closed after resolution.
    pub fn with_stale_session(self) -> Self {
        self.edit(|state| state.stale_session = true)
    }

    /// Session requests fail with an explicit iTerm2 error.
    pub fn with_server_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|state| state.server_error = Some(message))
    }

    /// `(session_id, text)` pairs in the order they were sent.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.state.sent.lock().expect("sent lock").clone()
    }

    /// Whether every opened connection was closed.
    pub fn was_closed(&self) -> bool {
        let closes = self.state.closes.load(Ordering::SeqCst);
        closes > 0 && closes == self.connections()
    }

    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockHost {
    async fn connect(&self) -> Result<Box<dyn HostConnection>, HostError> {
        if let Some(message) = &self.state.connect_error {
            return Err(HostError::Connect(message.clone()));
        }
        self.state.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    state: Arc<MockState>,
}

impl MockConnection {
    fn check_session(&self) -> Result<(), HostError> {
        if self.state.stale_session {
            return Err(HostError::SessionNotFound);
        }
        if let Some(message) = &self.state.server_error {
            return Err(HostError::Server(message.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl HostConnection for MockConnection {
    async fn list_windows(&mut self) -> Result<Vec<WindowLayout>, HostError> {
        Ok(self.state.windows.clone())
    }

    async fn focus(&mut self) -> Result<Vec<FocusEvent>, HostError> {
        Ok(self.state.focus.clone())
    }

    async fn send_text(&mut self, session_id: &str, text: &str) -> Result<(), HostError> {
        self.check_session()?;
        self.state
            .sent
            .lock()
            .expect("sent lock")
            .push((session_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn screen_lines(&mut self, _session_id: &str) -> Result<Vec<String>, HostError> {
        self.check_session()?;
        Ok(self.state.screen.clone())
    }

    async fn session_variable(
        &mut self,
        session_id: &str,
        name: &str,
    ) -> Result<Option<String>, HostError> {
        self.check_session()?;
        Ok(self
            .state
            .variables
            .get(&(session_id.to_string(), name.to_string()))
            .cloned())
    }

    async fn close(&mut self) -> Result<(), HostError> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory log sink installed as the thread's default subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Capture events passing `directive` until the guard drops.
    pub fn install(&self, directive: &str) -> DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(directive))
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let bytes = self.buffer.lock().expect("log lock");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().expect("log lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
