//! In-process stand-in for iTerm2's websocket API.
//!
//! Serves one window with one tab and one session over TCP. Every reply is
//! preceded by an unrelated id-less message so clients must match replies by
//! id. Requests it receives are recorded for assertions.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use iterm_bridge::host::proto::client_originated_message::Submessage as Request;
use iterm_bridge::host::proto::focus_changed_notification::{self, Event};
use iterm_bridge::host::proto::list_sessions_response::{Tab, Window};
use iterm_bridge::host::proto::server_originated_message::Submessage as Reply;
use iterm_bridge::host::proto::split_tree_node::split_tree_link::Child;
use iterm_bridge::host::proto::split_tree_node::SplitTreeLink;
use iterm_bridge::host::proto::{
    ClientOriginatedMessage, FocusChangedNotification, FocusResponse, GetBufferResponse,
    LineContents, ListSessionsResponse, SendTextResponse, ServerOriginatedMessage, SessionSummary,
    SplitTreeNode, VariableResponse,
};
use prost::Message as _;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request as Handshake, Response,
};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

pub const SESSION_ID: &str = "w0t0p0:4F2C";
pub const TTY: &str = "/dev/ttys004";

/// What the fake server observed.
#[derive(Debug, Default)]
pub struct Observed {
    pub advisory_names: Vec<String>,
    pub sent_text: Vec<(String, String)>,
    pub connections: usize,
}

pub struct FakeIterm {
    pub url: String,
    pub observed: Arc<Mutex<Observed>>,
    task: JoinHandle<()>,
}

impl FakeIterm {
    pub async fn start(screen: &[&str]) -> FakeIterm {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let observed = Arc::new(Mutex::new(Observed::default()));
        let screen: Vec<String> = screen.iter().map(|line| line.to_string()).collect();

        let state = Arc::clone(&observed);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, screen.clone(), Arc::clone(&state)));
            }
        });

        FakeIterm {
            url: format!("ws://{addr}"),
            observed,
            task,
        }
    }
}

impl Drop for FakeIterm {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(stream: TcpStream, screen: Vec<String>, observed: Arc<Mutex<Observed>>) {
    let record = Arc::clone(&observed);
    let callback = move |request: &Handshake, mut response: Response| {
        let advisory = request
            .headers()
            .get("x-iterm2-advisory-name")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let mut observed = record.lock().expect("observed lock");
        observed.advisory_names.push(advisory);
        observed.connections += 1;
        response.headers_mut().insert(
            "sec-websocket-protocol",
            HeaderValue::from_static("api.iterm2.com"),
        );
        Ok::<_, ErrorResponse>(response)
    };
    let Ok(mut socket) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
        return;
    };

    while let Some(Ok(frame)) = socket.next().await {
        let Message::Binary(payload) = frame else {
            continue;
        };
        let Ok(request) = ClientOriginatedMessage::decode(payload.as_slice()) else {
            return;
        };
        let Some(submessage) = request.submessage else {
            continue;
        };

        let noise = ServerOriginatedMessage {
            id: None,
            submessage: Some(Reply::FocusResponse(FocusResponse::default())),
        };
        if socket.send(Message::Binary(noise.encode_to_vec())).await.is_err() {
            return;
        }

        let reply = ServerOriginatedMessage {
            id: request.id,
            submessage: Some(answer(submessage, &screen, &observed)),
        };
        if socket.send(Message::Binary(reply.encode_to_vec())).await.is_err() {
            return;
        }
    }
}

fn answer(request: Request, screen: &[String], observed: &Mutex<Observed>) -> Reply {
    match request {
        Request::ListSessionsRequest(_) => Reply::ListSessionsResponse(layout()),
        Request::FocusRequest(_) => Reply::FocusResponse(focus()),
        Request::SendTextRequest(send) => {
            observed.lock().expect("observed lock").sent_text.push((
                send.session.unwrap_or_default(),
                send.text.unwrap_or_default(),
            ));
            Reply::SendTextResponse(SendTextResponse { status: Some(0) })
        }
        Request::GetBufferRequest(_) => Reply::GetBufferResponse(GetBufferResponse {
            status: Some(0),
            contents: screen
                .iter()
                .map(|line| LineContents {
                    text: Some(line.clone()),
                })
                .collect(),
        }),
        Request::VariableRequest(_) => Reply::VariableResponse(VariableResponse {
            status: Some(0),
            values: vec![format!("\"{TTY}\"")],
        }),
    }
}

fn layout() -> ListSessionsResponse {
    ListSessionsResponse {
        windows: vec![Window {
            window_id: Some("pty-w0".into()),
            tabs: vec![Tab {
                tab_id: Some("1".into()),
                root: Some(SplitTreeNode {
                    vertical: Some(false),
                    links: vec![SplitTreeLink {
                        child: Some(Child::Session(SessionSummary {
                            unique_identifier: Some(SESSION_ID.into()),
                            title: Some("zsh".into()),
                        })),
                    }],
                }),
            }],
        }],
    }
}

fn focus() -> FocusResponse {
    let events = vec![
        Event::ApplicationActive(true),
        Event::Window(focus_changed_notification::Window {
            window_status: Some(
                focus_changed_notification::WindowStatus::TerminalWindowBecameKey as i32,
            ),
            window_id: Some("pty-w0".into()),
        }),
        Event::SelectedTab("1".into()),
        Event::Session(SESSION_ID.into()),
    ];
    FocusResponse {
        notifications: events
            .into_iter()
            .map(|event| FocusChangedNotification { event: Some(event) })
            .collect(),
    }
}
