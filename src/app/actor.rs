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
        // Send initial render state
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
                    tracing::trace!(id = ?response.id(), "network response");
                    let commands = self.state.handle_response(response);
                    self.dispatch(commands);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, commands: Vec<NetworkCommand>) {
        for command in commands {
            let _ = self.network_tx.send(command);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let commands = match event {
            // Query editing
            UiEvent::StartEditing => {
                self.state.start_editing();
                Vec::new()
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                Vec::new()
            }
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::ClearQuery => self.state.clear_query(),
            UiEvent::CursorLeft => {
                self.state.move_cursor_left();
                Vec::new()
            }
            UiEvent::CursorRight => {
                self.state.move_cursor_right();
                Vec::new()
            }

            // Lists
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => {
                self.state.select_prev();
                Vec::new()
            }
            UiEvent::Open => self.state.open_selected(),

            // Navigation
            UiEvent::Back => self.state.back(),
            UiEvent::ShowFavorites => {
                self.state.show_favorites();
                Vec::new()
            }
            UiEvent::ToggleFavorite => {
                self.state.toggle_favorite();
                Vec::new()
            }

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                Vec::new()
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                Vec::new()
            }

            // System
            UiEvent::Quit => return true,
        };

        self.dispatch(commands);
        false
    }
}
