//! Resolving "the current session" from layout plus focus.
//!
//! iTerm2 reports layout and focus separately. Focus events are applied in
//! order: a window event (other than resigning key) makes that window
//! current, a selected-tab event selects the tab in whichever window holds
//! it, and an active-session event activates the session in whichever tab
//! holds it. Ids that name nothing in the layout are ignored.

use super::{FocusEvent, WindowLayout, WindowStatus};

/// Application state for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    windows: Vec<AppWindow>,
    current_window_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppWindow {
    pub window_id: String,
    pub tabs: Vec<AppTab>,
    selected_tab_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTab {
    pub tab_id: String,
    pub session_ids: Vec<String>,
    active_session_id: Option<String>,
}

impl AppSnapshot {
    /// Build from a layout and the focus events that describe it.
    pub fn new(layout: Vec<WindowLayout>, focus: &[FocusEvent]) -> Self {
        let windows = layout
            .into_iter()
            .map(|window| AppWindow {
                window_id: window.window_id,
                tabs: window
                    .tabs
                    .into_iter()
                    .map(|tab| AppTab {
                        tab_id: tab.tab_id,
                        session_ids: tab.session_ids,
                        active_session_id: None,
                    })
                    .collect(),
                selected_tab_id: None,
            })
            .collect();
        let mut snapshot = Self {
            windows,
            current_window_id: None,
        };
        for event in focus {
            snapshot.apply_focus(event);
        }
        snapshot
    }

    pub fn apply_focus(&mut self, event: &FocusEvent) {
        match event {
            FocusEvent::ApplicationActive(_) => {}
            FocusEvent::Window { window_id, status } => {
                // The current terminal window survives losing key status.
                if *status != WindowStatus::ResignedKey {
                    self.current_window_id = Some(window_id.clone());
                }
            }
            FocusEvent::SelectedTab(tab_id) => {
                if let Some(window) = self
                    .windows
                    .iter_mut()
                    .find(|window| window.tabs.iter().any(|tab| &tab.tab_id == tab_id))
                {
                    window.selected_tab_id = Some(tab_id.clone());
                }
            }
            FocusEvent::ActiveSession(session_id) => {
                if let Some(tab) = self
                    .windows
                    .iter_mut()
                    .flat_map(|window| window.tabs.iter_mut())
                    .find(|tab| tab.session_ids.contains(session_id))
                {
                    tab.active_session_id = Some(session_id.clone());
                }
            }
        }
    }

    pub fn current_window(&self) -> Option<&AppWindow> {
        let id = self.current_window_id.as_deref()?;
        self.windows.iter().find(|window| window.window_id == id)
    }

    /// Walk current window, then its current tab, then that tab's session.
    pub fn current_session(&self) -> Option<&str> {
        self.current_window()?.current_tab()?.current_session()
    }
}

impl AppWindow {
    pub fn current_tab(&self) -> Option<&AppTab> {
        let id = self.selected_tab_id.as_deref()?;
        self.tabs.iter().find(|tab| tab.tab_id == id)
    }
}

impl AppTab {
    pub fn current_session(&self) -> Option<&str> {
        let id = self.active_session_id.as_deref()?;
        self.session_ids
            .iter()
            .find(|session| session.as_str() == id)
            .map(String::as_str)
    }
}
