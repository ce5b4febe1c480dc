//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Resume the session and load the Home tab before the first frame
        for cmd in self.state.startup() {
            let _ = self.network_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(id = response.id(), "network response");
                    for cmd in self.state.handle_response(response) {
                        let _ = self.network_tx.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab navigation
            UiEvent::SwitchTab(tab) => {
                let cmd = self.state.switch_tab(tab);
                self.send_opt(cmd);
            }

            // List navigation
            UiEvent::MoveUp => self.state.move_up(),
            UiEvent::MoveDown => {
                let cmd = self.state.move_down();
                self.send_opt(cmd);
            }
            UiEvent::OpenDetails => {
                for cmd in self.state.open_details() {
                    let _ = self.network_tx.send(cmd);
                }
            }

            // Home tab
            UiEvent::Refresh => {
                for cmd in self.state.refresh() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::LoadMore => {
                let cmd = self.state.load_more();
                self.send_opt(cmd);
            }

            // Search tab
            UiEvent::StartSearchInput => self.state.start_search_input(),
            UiEvent::StopSearchInput => self.state.stop_search_input(),
            UiEvent::SearchChar(c) => self.state.search_char(c),
            UiEvent::SearchBackspace => self.state.search_backspace(),
            UiEvent::SubmitSearch => {
                let cmd = self.state.submit_search();
                self.send_opt(cmd);
            }

            // Details view
            UiEvent::CloseDetails => self.state.close_details(),
            UiEvent::ToggleSaved => {
                let cmd = self.state.toggle_saved();
                self.send_opt(cmd);
            }
            UiEvent::DetailsScrollUp => self.state.details_scroll_up(),
            UiEvent::DetailsScrollDown => self.state.details_scroll_down(),

            // Auth popup
            UiEvent::OpenAuth(mode) => self.state.open_auth(mode),
            UiEvent::AuthChar(c) => self.state.auth_char(c),
            UiEvent::AuthBackspace => self.state.auth_backspace(),
            UiEvent::AuthNextField => self.state.auth_next_field(),
            UiEvent::AuthSubmit => {
                let cmd = self.state.auth_submit();
                self.send_opt(cmd);
            }
            UiEvent::AuthCancel => self.state.auth_cancel(),

            // Profile
            UiEvent::SignOut => {
                let cmd = self.state.sign_out();
                self.send_opt(cmd);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            UiEvent::Quit => return true,
        }
        false
    }

    fn send_opt(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }
}
