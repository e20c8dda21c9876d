//! Protobuf messages of the iTerm2 API used by the bridge.
//!
//! A hand-maintained subset of iTerm2's `api.proto` (proto2). Field tags must
//! match upstream; fields the bridge never reads are left out and skipped by
//! the decoder as unknown fields.

/// Envelope for every request sent to iTerm2.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientOriginatedMessage {
    #[prost(int64, optional, tag = "1")]
    pub id: Option<i64>,
    #[prost(
        oneof = "client_originated_message::Submessage",
        tags = "100, 106, 107, 115, 117"
    )]
    pub submessage: Option<client_originated_message::Submessage>,
}

pub mod client_originated_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Submessage {
        #[prost(message, tag = "100")]
        GetBufferRequest(super::GetBufferRequest),
        #[prost(message, tag = "106")]
        ListSessionsRequest(super::ListSessionsRequest),
        #[prost(message, tag = "107")]
        SendTextRequest(super::SendTextRequest),
        #[prost(message, tag = "115")]
        VariableRequest(super::VariableRequest),
        #[prost(message, tag = "117")]
        FocusRequest(super::FocusRequest),
    }
}

/// Envelope for every reply and notification from iTerm2.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerOriginatedMessage {
    #[prost(int64, optional, tag = "1")]
    pub id: Option<i64>,
    #[prost(
        oneof = "server_originated_message::Submessage",
        tags = "2, 100, 106, 107, 115, 117"
    )]
    pub submessage: Option<server_originated_message::Submessage>,
}

pub mod server_originated_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Submessage {
        #[prost(string, tag = "2")]
        Error(String),
        #[prost(message, tag = "100")]
        GetBufferResponse(super::GetBufferResponse),
        #[prost(message, tag = "106")]
        ListSessionsResponse(super::ListSessionsResponse),
        #[prost(message, tag = "107")]
        SendTextResponse(super::SendTextResponse),
        #[prost(message, tag = "115")]
        VariableResponse(super::VariableResponse),
        #[prost(message, tag = "117")]
        FocusResponse(super::FocusResponse),
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListSessionsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListSessionsResponse {
    #[prost(message, repeated, tag = "1")]
    pub windows: Vec<list_sessions_response::Window>,
}

pub mod list_sessions_response {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Window {
        #[prost(message, repeated, tag = "1")]
        pub tabs: Vec<Tab>,
        #[prost(string, optional, tag = "2")]
        pub window_id: Option<String>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Tab {
        #[prost(string, optional, tag = "2")]
        pub tab_id: Option<String>,
        #[prost(message, optional, tag = "3")]
        pub root: Option<super::SplitTreeNode>,
    }
}

/// A tab's split-pane tree; leaves are sessions.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SplitTreeNode {
    #[prost(bool, optional, tag = "1")]
    pub vertical: Option<bool>,
    #[prost(message, repeated, tag = "2")]
    pub links: Vec<split_tree_node::SplitTreeLink>,
}

pub mod split_tree_node {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SplitTreeLink {
        #[prost(oneof = "split_tree_link::Child", tags = "1, 2")]
        pub child: Option<split_tree_link::Child>,
    }

    pub mod split_tree_link {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Child {
            #[prost(message, tag = "1")]
            Session(super::super::SessionSummary),
            #[prost(message, tag = "2")]
            Node(super::super::SplitTreeNode),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SessionSummary {
    #[prost(string, optional, tag = "1")]
    pub unique_identifier: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FocusRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FocusResponse {
    #[prost(message, repeated, tag = "1")]
    pub notifications: Vec<FocusChangedNotification>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FocusChangedNotification {
    #[prost(oneof = "focus_changed_notification::Event", tags = "1, 2, 3, 4")]
    pub event: Option<focus_changed_notification::Event>,
}

pub mod focus_changed_notification {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Window {
        #[prost(enumeration = "WindowStatus", optional, tag = "1")]
        pub window_status: Option<i32>,
        #[prost(string, optional, tag = "2")]
        pub window_id: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum WindowStatus {
        TerminalWindowBecameKey = 0,
        TerminalWindowIsCurrent = 1,
        TerminalWindowResignedKey = 2,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Event {
        #[prost(bool, tag = "1")]
        ApplicationActive(bool),
        #[prost(message, tag = "2")]
        Window(Window),
        #[prost(string, tag = "3")]
        SelectedTab(String),
        #[prost(string, tag = "4")]
        Session(String),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendTextRequest {
    #[prost(string, optional, tag = "1")]
    pub session: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub text: Option<String>,
    #[prost(bool, optional, tag = "3")]
    pub suppress_broadcast: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendTextResponse {
    #[prost(enumeration = "send_text_response::Status", optional, tag = "1")]
    pub status: Option<i32>,
}

pub mod send_text_response {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Status {
        Ok = 0,
        SessionNotFound = 1,
    }
}

// ---------------------------------------------------------------------------
// Screen buffer
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBufferRequest {
    #[prost(string, optional, tag = "1")]
    pub session: Option<String>,
    #[prost(message, optional, tag = "2")]
    pub line_range: Option<LineRange>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LineRange {
    #[prost(bool, optional, tag = "1")]
    pub screen_contents_only: Option<bool>,
    #[prost(int32, optional, tag = "2")]
    pub trailing_lines: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBufferResponse {
    #[prost(enumeration = "get_buffer_response::Status", optional, tag = "1")]
    pub status: Option<i32>,
    #[prost(message, repeated, tag = "3")]
    pub contents: Vec<LineContents>,
}

pub mod get_buffer_response {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Status {
        Ok = 0,
        SessionNotFound = 1,
        InvalidLineRange = 2,
        RequestMalformed = 3,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LineContents {
    #[prost(string, optional, tag = "1")]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VariableRequest {
    #[prost(oneof = "variable_request::Scope", tags = "1, 4, 5, 6")]
    pub scope: Option<variable_request::Scope>,
    #[prost(string, repeated, tag = "3")]
    pub get: Vec<String>,
}

pub mod variable_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Scope {
        #[prost(string, tag = "1")]
        SessionId(String),
        #[prost(string, tag = "4")]
        TabId(String),
        #[prost(bool, tag = "5")]
        App(bool),
        #[prost(string, tag = "6")]
        WindowId(String),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VariableResponse {
    #[prost(enumeration = "variable_response::Status", optional, tag = "1")]
    pub status: Option<i32>,
    /// JSON-encoded values, one per requested name.
    #[prost(string, repeated, tag = "2")]
    pub values: Vec<String>,
}

pub mod variable_response {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Status {
        Ok = 0,
        SessionNotFound = 1,
        InvalidName = 2,
        MissingScope = 3,
        TabNotFound = 4,
        MultiGetDisallowed = 5,
        WindowNotFound = 6,
    }
}
