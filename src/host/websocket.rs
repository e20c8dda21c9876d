//! `HostConnection` over iTerm2's websocket API.
//!
//! iTerm2 listens on a private Unix socket and, when enabled, on
//! `ws://localhost:1912`. The Unix socket is preferred whenever it exists.
//! Each request is one binary frame holding a `ClientOriginatedMessage`; the
//! reply is the first `ServerOriginatedMessage` echoing the request id.
//!
//! The handshake carries iTerm2's auth cookie and key: taken from
//! `ITERM2_COOKIE`/`ITERM2_KEY` when iTerm2 launched us, otherwise requested
//! through `osascript`.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use prost::Message as _;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request as HandshakeRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, trace};

use super::proto::client_originated_message::Submessage as ClientRequest;
use super::proto::focus_changed_notification::{self, Event};
use super::proto::server_originated_message::Submessage as Reply;
use super::proto::split_tree_node::split_tree_link::Child;
use super::proto::{
    get_buffer_response, send_text_response, variable_request, variable_response,
    ClientOriginatedMessage, FocusRequest, FocusResponse, GetBufferRequest, LineRange,
    ListSessionsRequest, ListSessionsResponse, SendTextRequest, ServerOriginatedMessage,
    SplitTreeNode, VariableRequest,
};
use super::{Connector, FocusEvent, HostConnection, TabLayout, WindowLayout, WindowStatus};
use crate::build_info;
use crate::config::ConnectionConfig;
use crate::error::HostError;

/// Websocket subprotocol iTerm2 requires.
const SUBPROTOCOL: &str = "api.iterm2.com";
/// URL used for the handshake when connected over the Unix socket.
const UNIX_SOCKET_URL: &str = "ws://localhost/";
/// Origin iTerm2 accepts from local clients.
const ORIGIN: &str = "ws://localhost/";
/// Auth cookie iTerm2 exports to scripts it launches.
const COOKIE_ENV: &str = "ITERM2_COOKIE";
/// Auth key iTerm2 exports to scripts it launches.
const KEY_ENV: &str = "ITERM2_KEY";

trait Io: AsyncRead + AsyncWrite + Send {}
impl<T: AsyncRead + AsyncWrite + Send> Io for T {}

type BoxedIo = Pin<Box<dyn Io>>;

/// Where to reach iTerm2.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    Unix(PathBuf),
    Tcp(String),
}

impl Endpoint {
    fn select(config: &ConnectionConfig, exists: impl Fn(&Path) -> bool) -> Self {
        match &config.socket_path {
            Some(path) if exists(path) => Self::Unix(path.clone()),
            _ => Self::Tcp(config.url.clone()),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
            Self::Tcp(url) => write!(f, "{url}"),
        }
    }
}

/// Connects to the running iTerm2 over its websocket API.
#[derive(Debug, Clone)]
pub struct WebsocketConnector {
    config: ConnectionConfig,
}

impl WebsocketConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for WebsocketConnector {
    async fn connect(&self) -> Result<Box<dyn HostConnection>, HostError> {
        let endpoint = Endpoint::select(&self.config, Path::exists);
        debug!(%endpoint, "connecting to iTerm2");
        let (io, url) = open_stream(&endpoint).await?;
        let credentials = resolve_credentials(
            &self.config.advisory_name,
            |name| std::env::var(name).ok(),
            run_applescript,
        )
        .await;
        let request = handshake_request(&url, &self.config.advisory_name, credentials.as_ref())?;
        let (socket, _response) = tokio_tungstenite::client_async(request, io)
            .await
            .map_err(|e| HostError::Connect(e.to_string()))?;
        debug!(%endpoint, "connected to iTerm2");
        Ok(Box::new(WebsocketHost { socket, next_id: 0 }))
    }
}

async fn open_stream(endpoint: &Endpoint) -> Result<(BoxedIo, String), HostError> {
    match endpoint {
        #[cfg(unix)]
        Endpoint::Unix(path) => {
            let stream = tokio::net::UnixStream::connect(path)
                .await
                .map_err(|e| HostError::Connect(format!("{}: {e}", path.display())))?;
            let io: BoxedIo = Box::pin(stream);
            Ok((io, UNIX_SOCKET_URL.to_string()))
        }
        #[cfg(not(unix))]
        Endpoint::Unix(path) => Err(HostError::Connect(format!(
            "{}: unix sockets are not supported on this platform",
            path.display()
        ))),
        Endpoint::Tcp(url) => {
            let request = url
                .as_str()
                .into_client_request()
                .map_err(|e| HostError::Connect(format!("invalid url `{url}`: {e}")))?;
            let host = request.uri().host().unwrap_or("localhost").to_string();
            let port = request.uri().port_u16().unwrap_or(80);
            let stream = TcpStream::connect((host.as_str(), port))
                .await
                .map_err(|e| HostError::Connect(format!("{url}: {e}")))?;
            let io: BoxedIo = Box::pin(stream);
            Ok((io, url.clone()))
        }
    }
}

/// Cookie and key that let iTerm2 skip its automation permission prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    cookie: String,
    key: Option<String>,
}

/// Credentials exported by iTerm2 to scripts it launched, otherwise requested
/// from iTerm2 over AppleScript. `None` connects without them.
async fn resolve_credentials<E, R, Fut>(
    advisory_name: &str,
    env_lookup: E,
    run_script: R,
) -> Option<Credentials>
where
    E: Fn(&str) -> Option<String>,
    R: FnOnce(String) -> Fut,
    Fut: Future<Output = Option<String>>,
{
    if let Some(cookie) = env_lookup(COOKIE_ENV) {
        return Some(Credentials {
            cookie,
            key: env_lookup(KEY_ENV),
        });
    }
    let reply = run_script(cookie_request_script(advisory_name)).await?;
    let credentials = parse_cookie_reply(&reply);
    if credentials.is_none() {
        debug!(reply = %reply.trim(), "ignoring malformed cookie reply");
    }
    credentials
}

fn cookie_request_script(advisory_name: &str) -> String {
    let name = advisory_name.replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"tell application "iTerm2" to request cookie and key for app named "{name}""#)
}

/// iTerm2 answers with `<cookie> <key>`.
fn parse_cookie_reply(reply: &str) -> Option<Credentials> {
    let (cookie, key) = reply.trim().split_once(' ')?;
    if cookie.is_empty() || key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(Credentials {
        cookie: cookie.to_string(),
        key: Some(key.to_string()),
    })
}

async fn run_applescript(script: String) -> Option<String> {
    if !cfg!(target_os = "macos") {
        return None;
    }
    let output = match tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .await
    {
        Ok(output) => output,
        Err(err) => {
            debug!(error = %err, "osascript unavailable; connecting without cookie");
            return None;
        }
    };
    if !output.status.success() {
        debug!(
            status = ?output.status,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "iTerm2 refused the cookie request"
        );
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn handshake_request(
    url: &str,
    advisory_name: &str,
    credentials: Option<&Credentials>,
) -> Result<HandshakeRequest, HostError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| HostError::Connect(format!("invalid url `{url}`: {e}")))?;
    let headers = request.headers_mut();
    headers.insert("origin", header_value(ORIGIN)?);
    headers.insert("sec-websocket-protocol", header_value(SUBPROTOCOL)?);
    headers.insert(
        "x-iterm2-library-version",
        header_value(&build_info::library_version())?,
    );
    headers.insert("x-iterm2-advisory-name", header_value(advisory_name)?);
    if let Some(credentials) = credentials {
        headers.insert("x-iterm2-cookie", header_value(&credentials.cookie)?);
        if let Some(key) = &credentials.key {
            headers.insert("x-iterm2-key", header_value(key)?);
        }
    }
    Ok(request)
}

fn header_value(value: &str) -> Result<HeaderValue, HostError> {
    HeaderValue::from_str(value)
        .map_err(|e| HostError::Connect(format!("invalid handshake header `{value}`: {e}")))
}

/// One open websocket to iTerm2.
struct WebsocketHost {
    socket: WebSocketStream<BoxedIo>,
    next_id: i64,
}

impl WebsocketHost {
    /// Send one request and wait for the reply carrying its id.
    async fn call(&mut self, request: ClientRequest) -> Result<Reply, HostError> {
        self.next_id += 1;
        let id = self.next_id;
        let message = ClientOriginatedMessage {
            id: Some(id),
            submessage: Some(request),
        };
        self.socket
            .send(Message::Binary(message.encode_to_vec()))
            .await?;

        loop {
            let frame = match self.socket.next().await {
                Some(frame) => frame?,
                None => return Err(closed_by_peer()),
            };
            let payload = match frame {
                Message::Binary(payload) => payload,
                Message::Close(_) => return Err(closed_by_peer()),
                _ => continue,
            };
            let reply = ServerOriginatedMessage::decode(payload.as_slice())?;
            if reply.id != Some(id) {
                trace!(reply_id = ?reply.id, expected = id, "skipping unrelated message");
                continue;
            }
            return match reply.submessage {
                Some(Reply::Error(message)) => Err(HostError::Server(message)),
                Some(submessage) => Ok(submessage),
                None => Err(HostError::Protocol(format!("reply {id} has no payload"))),
            };
        }
    }
}

fn closed_by_peer() -> HostError {
    HostError::Transport("connection closed by iTerm2".into())
}

fn unexpected_reply(request: &str) -> HostError {
    HostError::Protocol(format!("unexpected reply to {request} request"))
}

#[async_trait]
impl HostConnection for WebsocketHost {
    async fn list_windows(&mut self) -> Result<Vec<WindowLayout>, HostError> {
        match self
            .call(ClientRequest::ListSessionsRequest(ListSessionsRequest {}))
            .await?
        {
            Reply::ListSessionsResponse(response) => Ok(windows_from_response(response)),
            _ => Err(unexpected_reply("list sessions")),
        }
    }

    async fn focus(&mut self) -> Result<Vec<FocusEvent>, HostError> {
        match self.call(ClientRequest::FocusRequest(FocusRequest {})).await? {
            Reply::FocusResponse(response) => Ok(focus_events(response)),
            _ => Err(unexpected_reply("focus")),
        }
    }

    async fn send_text(&mut self, session_id: &str, text: &str) -> Result<(), HostError> {
        let request = SendTextRequest {
            session: Some(session_id.to_string()),
            text: Some(text.to_string()),
            suppress_broadcast: None,
        };
        let Reply::SendTextResponse(response) =
            self.call(ClientRequest::SendTextRequest(request)).await?
        else {
            return Err(unexpected_reply("send text"));
        };
        match send_text_response::Status::try_from(response.status.unwrap_or_default()) {
            Ok(send_text_response::Status::Ok) => Ok(()),
            Ok(send_text_response::Status::SessionNotFound) => Err(HostError::SessionNotFound),
            Err(_) => Err(HostError::Protocol(format!(
                "send text failed with status {:?}",
                response.status
            ))),
        }
    }

    async fn screen_lines(&mut self, session_id: &str) -> Result<Vec<String>, HostError> {
        let request = GetBufferRequest {
            session: Some(session_id.to_string()),
            line_range: Some(LineRange {
                screen_contents_only: Some(true),
                trailing_lines: None,
            }),
        };
        let Reply::GetBufferResponse(response) =
            self.call(ClientRequest::GetBufferRequest(request)).await?
        else {
            return Err(unexpected_reply("get buffer"));
        };
        match get_buffer_response::Status::try_from(response.status.unwrap_or_default()) {
            Ok(get_buffer_response::Status::Ok) => Ok(response
                .contents
                .into_iter()
                .map(|line| line.text.unwrap_or_default())
                .collect()),
            Ok(get_buffer_response::Status::SessionNotFound) => Err(HostError::SessionNotFound),
            status => Err(HostError::Protocol(format!(
                "get buffer failed with status {status:?}"
            ))),
        }
    }

    async fn session_variable(
        &mut self,
        session_id: &str,
        name: &str,
    ) -> Result<Option<String>, HostError> {
        let request = VariableRequest {
            scope: Some(variable_request::Scope::SessionId(session_id.to_string())),
            get: vec![name.to_string()],
        };
        let Reply::VariableResponse(response) =
            self.call(ClientRequest::VariableRequest(request)).await?
        else {
            return Err(unexpected_reply("variable"));
        };
        match variable_response::Status::try_from(response.status.unwrap_or_default()) {
            Ok(variable_response::Status::Ok) => {
                Ok(response.values.first().and_then(|raw| decode_variable(raw)))
            }
            Ok(variable_response::Status::SessionNotFound) => Err(HostError::SessionNotFound),
            status => Err(HostError::Protocol(format!(
                "variable `{name}` lookup failed with status {status:?}"
            ))),
        }
    }

    async fn close(&mut self) -> Result<(), HostError> {
        self.socket.close(None).await?;
        Ok(())
    }
}

fn windows_from_response(response: ListSessionsResponse) -> Vec<WindowLayout> {
    response
        .windows
        .into_iter()
        .map(|window| WindowLayout {
            window_id: window.window_id.unwrap_or_default(),
            tabs: window
                .tabs
                .into_iter()
                .map(|tab| {
                    let mut session_ids = Vec::new();
                    if let Some(root) = &tab.root {
                        collect_session_ids(root, &mut session_ids);
                    }
                    TabLayout {
                        tab_id: tab.tab_id.unwrap_or_default(),
                        session_ids,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Depth-first walk of a split tree, collecting leaf session ids.
fn collect_session_ids(node: &SplitTreeNode, out: &mut Vec<String>) {
    for link in &node.links {
        match &link.child {
            Some(Child::Session(session)) => {
                if let Some(id) = &session.unique_identifier {
                    out.push(id.clone());
                }
            }
            Some(Child::Node(child)) => collect_session_ids(child, out),
            None => {}
        }
    }
}

fn focus_events(response: FocusResponse) -> Vec<FocusEvent> {
    response
        .notifications
        .into_iter()
        .filter_map(|notification| notification.event)
        .filter_map(|event| match event {
            Event::ApplicationActive(active) => Some(FocusEvent::ApplicationActive(active)),
            Event::Window(window) => Some(FocusEvent::Window {
                window_id: window.window_id?,
                status: window_status(window.window_status),
            }),
            Event::SelectedTab(tab_id) => Some(FocusEvent::SelectedTab(tab_id)),
            Event::Session(session_id) => Some(FocusEvent::ActiveSession(session_id)),
        })
        .collect()
}

fn window_status(raw: Option<i32>) -> WindowStatus {
    use focus_changed_notification::WindowStatus as Wire;
    // An absent status decodes as the proto2 default, BECAME_KEY.
    match Wire::try_from(raw.unwrap_or_default()) {
        Ok(Wire::TerminalWindowIsCurrent) => WindowStatus::IsCurrent,
        Ok(Wire::TerminalWindowResignedKey) => WindowStatus::ResignedKey,
        Ok(Wire::TerminalWindowBecameKey) | Err(_) => WindowStatus::BecameKey,
    }
}

/// Variable values arrive JSON-encoded; `null` means unset.
fn decode_variable(raw: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Null) => None,
        Ok(serde_json::Value::String(value)) => Some(value),
        Ok(other) => Some(other.to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
