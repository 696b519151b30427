use log::warn;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{ChatClient, ServerInfo};
use crate::chat_widget::{ChatWidget, WidgetOptions};
use crate::config::Config;
use crate::log_view::LogView;
use crate::status_indicator::StatusIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Chat,
    QuitConfirm,
}

/// Backend reachability as reported by the startup health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Unknown,
    Online,
    Offline,
}

#[derive(Debug)]
enum AppEvent {
    ServerInfo(ServerInfo),
    Health(bool),
}

#[derive(Debug)]
pub struct App {
    pub screen: AppScreen,
    pub widget: ChatWidget,
    pub status_indicator: StatusIndicator,
    pub logs: LogView,
    pub chat_scroll: u16,
    pub server_info: Option<ServerInfo>,
    pub connection: Connection,
    pub should_quit: bool,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: &Config) -> App {
        let client = ChatClient::new(config.endpoint.clone());
        let widget = ChatWidget::new(client.clone(), WidgetOptions::from(config));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        spawn_startup_probes(client, events_tx);

        let mut logs = LogView::new();
        logs.add(format!("Endpoint: {}", config.endpoint));

        App {
            screen: AppScreen::Chat,
            widget,
            status_indicator: StatusIndicator::new(),
            logs,
            chat_scroll: 0,
            server_info: None,
            connection: Connection::Unknown,
            should_quit: false,
            events_rx,
        }
    }

    /// Drains widget completions and startup probe results. Any appended
    /// message snaps the view back to the newest entry.
    pub fn poll(&mut self) {
        let appended = self.widget.poll_events();
        if appended > 0 {
            for _ in 0..appended {
                self.logs.add("Resposta recebida do atendente");
            }
            self.scroll_to_bottom();
        }

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::ServerInfo(info) => {
                    self.logs.add(format!("Conectado a {}", info.company_name));
                    self.server_info = Some(info);
                }
                AppEvent::Health(healthy) => {
                    self.connection = if healthy {
                        Connection::Online
                    } else {
                        Connection::Offline
                    };
                    self.logs.add(if healthy {
                        "Servidor respondeu ao health check"
                    } else {
                        "Servidor não respondeu ao health check"
                    });
                }
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    // The draw pass clamps this to the real content height.
    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = u16::MAX;
    }
}

fn spawn_startup_probes(client: ChatClient, events_tx: UnboundedSender<AppEvent>) {
    let info_client = client.clone();
    let info_tx = events_tx.clone();
    tokio::spawn(async move {
        match info_client.fetch_server_info().await {
            Ok(info) => {
                let _ = info_tx.send(AppEvent::ServerInfo(info));
            }
            Err(e) => warn!("server info unavailable: {}", e),
        }
    });

    tokio::spawn(async move {
        let healthy = match client.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("health check failed: {}", e);
                false
            }
        };
        let _ = events_tx.send(AppEvent::Health(healthy));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::sleep;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: String) -> Config {
        Config {
            endpoint,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn startup_probes_populate_header_and_connection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "company_name": "Tochique"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let mut app = App::new(&test_config(server.uri()));
        for _ in 0..500 {
            app.poll();
            if app.server_info.is_some() && app.connection != Connection::Unknown {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(app.server_info.unwrap().company_name, "Tochique");
        assert_eq!(app.connection, Connection::Online);
    }

    #[tokio::test]
    async fn unreachable_backend_reports_offline() {
        let mut app = App::new(&test_config("http://127.0.0.1:9".to_string()));
        for _ in 0..500 {
            app.poll();
            if app.connection != Connection::Unknown {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(app.connection, Connection::Offline);
        assert!(app.server_info.is_none());
    }
}
