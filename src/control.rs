//! Control-code lookup shared by every command that sends control bytes.

/// Accepted control-code names and the byte each one sends.
const CONTROL_CODES: &[(&str, u8)] = &[
    ("c", 3),       // Ctrl-C
    ("z", 26),      // Ctrl-Z
    ("d", 4),       // Ctrl-D
    ("l", 12),      // Ctrl-L
    ("]", 29),      // telnet escape
    ("escape", 27),
    ("esc", 27),
];

/// Look up a control-code name, ignoring case.
pub fn control_byte(name: &str) -> Option<u8> {
    let key = name.to_lowercase();
    CONTROL_CODES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, byte)| *byte)
}

/// Render a control byte as the one-character string sent to the session.
pub fn control_text(byte: u8) -> String {
    char::from(byte).to_string()
}
