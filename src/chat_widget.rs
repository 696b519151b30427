// src/chat_widget.rs

use std::time::Duration;

use log::{info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::api::ChatClient;
use crate::chat_message::ChatMessage;
use crate::config::Config;
use crate::constants::GREETING_TEXT;

/// Completion events sent back to the widget by its spawned tasks.
#[derive(Debug)]
enum WidgetEvent {
    Reply(ChatMessage),
    Greeting,
    HideTyping,
}

/// Options the widget is constructed with. Derived from [`Config`] in the
/// binary; tests build them directly with short delays.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub greeting_delay: Duration,
    pub typing_linger: Duration,
    pub quick_replies: Vec<String>,
}

impl From<&Config> for WidgetOptions {
    fn from(config: &Config) -> Self {
        Self {
            greeting_delay: Duration::from_millis(config.greeting_delay_ms),
            typing_linger: Duration::from_millis(config.typing_linger_ms),
            quick_replies: config.quick_replies.clone(),
        }
    }
}

/// The chat controller: owns the message list, the input buffer, the
/// quick-reply labels, the pending-request count and the typing-indicator
/// flag, plus the greeting and linger timers.
///
/// All listeners and timers belong to the instance; nothing is wired at
/// module load. Spawned tasks report back over an unbounded channel that
/// the caller drains with [`ChatWidget::poll_events`].
#[derive(Debug)]
pub struct ChatWidget {
    client: ChatClient,
    options: WidgetOptions,
    messages: Vec<ChatMessage>,
    pub input: String,
    pub selected_quick_reply: Option<usize>,
    typing_visible: bool,
    in_flight: usize,
    greeting_scheduled: bool,
    greeting_timer: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<WidgetEvent>,
    events_rx: UnboundedReceiver<WidgetEvent>,
}

impl ChatWidget {
    pub fn new(client: ChatClient, options: WidgetOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            client,
            options,
            messages: Vec::new(),
            input: String::new(),
            selected_quick_reply: None,
            typing_visible: false,
            in_flight: 0,
            greeting_scheduled: false,
            greeting_timer: None,
            events_tx,
            events_rx,
        }
    }

    /// Schedules the one-shot greeting. Calling this again is a no-op; the
    /// greeting is appended at most once per widget.
    pub fn start(&mut self) {
        if self.greeting_scheduled {
            return;
        }
        self.greeting_scheduled = true;

        let tx = self.events_tx.clone();
        let delay = self.options.greeting_delay;
        self.greeting_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(WidgetEvent::Greeting);
        }));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn typing_indicator_visible(&self) -> bool {
        self.typing_visible
    }

    pub fn pending_requests(&self) -> usize {
        self.in_flight
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.options.quick_replies
    }

    /// Sends whatever is in the input buffer. Whitespace-only input is left
    /// in place: no message, no request, no clearing.
    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        self.submit_user_message(&text);
    }

    /// Appends a user message with the trimmed text and requests a reply.
    /// Empty text after trimming is ignored. Concurrent sends are allowed,
    /// unbounded; replies may resolve out of send order.
    pub fn submit_user_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.messages.push(ChatMessage::user(text));
        self.selected_quick_reply = None;
        self.typing_visible = true;
        self.in_flight += 1;
        info!("sending user message ({} chars)", text.len());

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let text = text.to_string();
        tokio::spawn(async move {
            let message = match client.request_reply(&text).await {
                Ok(reply) => ChatMessage::bot(reply),
                Err(e) => {
                    warn!("reply request failed: {}", e);
                    ChatMessage::bot(e.fallback_text())
                }
            };
            // The receiver only goes away when the widget itself does.
            let _ = tx.send(WidgetEvent::Reply(message));
        });
    }

    /// Sends the fixed label of one of the quick-reply chips, exactly as if
    /// the user had typed it.
    pub fn send_quick_reply(&mut self, index: usize) {
        if let Some(label) = self.options.quick_replies.get(index).cloned() {
            self.submit_user_message(&label);
        }
    }

    pub fn cycle_quick_reply(&mut self) {
        let count = self.options.quick_replies.len();
        if count == 0 {
            return;
        }
        self.selected_quick_reply = match self.selected_quick_reply {
            None => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            Some(_) => None,
        };
    }

    /// Drains completion events from the spawned tasks. Returns the number
    /// of messages appended so the caller can keep the view pinned to the
    /// bottom.
    pub fn poll_events(&mut self) -> usize {
        let mut appended = 0;

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                WidgetEvent::Reply(message) => {
                    self.messages.push(message);
                    appended += 1;
                    self.in_flight = self.in_flight.saturating_sub(1);
                    self.schedule_typing_hide();
                }
                WidgetEvent::Greeting => {
                    self.messages.push(ChatMessage::bot(GREETING_TEXT));
                    appended += 1;
                }
                WidgetEvent::HideTyping => {
                    // Unconditional: each completion hides the indicator a
                    // fixed delay later, even if another request is still
                    // pending. A new submission shows it again.
                    self.typing_visible = false;
                }
            }
        }

        appended
    }

    fn schedule_typing_hide(&self) {
        let tx = self.events_tx.clone();
        let linger = self.options.typing_linger;
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            let _ = tx.send(WidgetEvent::HideTyping);
        });
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        if let Some(timer) = self.greeting_timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_message::Origin;
    use crate::constants::{FALLBACK_NETWORK, FALLBACK_SERVER};
    use serde_json::json;
    use tokio::time::{advance, sleep};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_options() -> WidgetOptions {
        WidgetOptions {
            greeting_delay: Duration::from_millis(3000),
            typing_linger: Duration::from_millis(1000),
            quick_replies: vec!["Horário de atendimento".to_string()],
        }
    }

    fn test_widget(base_url: &str) -> ChatWidget {
        ChatWidget::new(ChatClient::new(base_url), test_options())
    }

    async fn mock_reply(server: &MockServer, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": reply})))
            .mount(server)
            .await;
    }

    /// Polls the widget until `pred` holds or the retry allowance runs out.
    async fn wait_for(widget: &mut ChatWidget, pred: impl Fn(&ChatWidget) -> bool) {
        for _ in 0..500 {
            widget.poll_events();
            if pred(widget) {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn submit_appends_one_trimmed_user_message() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.input = "  oi, tudo bem?  ".to_string();
        widget.submit_input();

        assert_eq!(widget.messages().len(), 1);
        assert_eq!(widget.messages()[0].content(), "oi, tudo bem?");
        assert_eq!(widget.messages()[0].origin(), Origin::User);
        assert!(widget.input.is_empty());
        assert!(widget.typing_indicator_visible());
        assert_eq!(widget.pending_requests(), 1);
    }

    #[tokio::test]
    async fn whitespace_only_input_sends_nothing_and_stays_put() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.input = "   ".to_string();
        widget.submit_input();

        assert!(widget.messages().is_empty());
        assert_eq!(widget.pending_requests(), 0);
        assert!(!widget.typing_indicator_visible());
        assert_eq!(widget.input, "   ");
    }

    #[tokio::test]
    async fn reply_is_rendered_verbatim() {
        let server = MockServer::start().await;
        mock_reply(&server, "Tudo certo!").await;

        let mut widget = test_widget(&server.uri());
        widget.submit_user_message("oi");

        wait_for(&mut widget, |w| w.messages().len() == 2).await;
        assert_eq!(widget.messages()[1].content(), "Tudo certo!");
        assert_eq!(widget.messages()[1].origin(), Origin::Bot);
        assert_eq!(widget.pending_requests(), 0);
    }

    #[tokio::test]
    async fn server_error_renders_the_unavailable_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut widget = test_widget(&server.uri());
        widget.submit_user_message("oi");

        wait_for(&mut widget, |w| w.messages().len() == 2).await;
        assert!(widget.messages()[1].content().ends_with(FALLBACK_SERVER));
    }

    #[tokio::test]
    async fn unreachable_endpoint_renders_the_connectivity_fallback() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.submit_user_message("oi");

        wait_for(&mut widget, |w| w.messages().len() == 2).await;
        assert!(widget.messages()[1].content().ends_with(FALLBACK_NETWORK));
    }

    #[tokio::test]
    async fn quick_reply_sends_its_label_as_a_user_message() {
        let server = MockServer::start().await;
        mock_reply(&server, "Atendemos de segunda a sexta.").await;

        let mut widget = test_widget(&server.uri());
        widget.send_quick_reply(0);

        assert_eq!(widget.messages()[0].content(), "Horário de atendimento");
        assert!(widget.messages()[0].is_from_user());

        wait_for(&mut widget, |w| w.messages().len() == 2).await;
        assert_eq!(widget.messages()[1].content(), "Atendemos de segunda a sexta.");
    }

    #[tokio::test]
    async fn out_of_range_quick_reply_is_ignored() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.send_quick_reply(7);
        assert!(widget.messages().is_empty());
    }

    #[tokio::test]
    async fn cycling_selection_wraps_through_none() {
        let mut widget = test_widget("http://127.0.0.1:9");
        assert_eq!(widget.selected_quick_reply, None);
        widget.cycle_quick_reply();
        assert_eq!(widget.selected_quick_reply, Some(0));
        widget.cycle_quick_reply();
        assert_eq!(widget.selected_quick_reply, None);
    }

    #[tokio::test]
    async fn messages_keep_invocation_order_without_overlap() {
        let server = MockServer::start().await;
        mock_reply(&server, "ok").await;

        let mut widget = test_widget(&server.uri());
        widget.submit_user_message("primeira");
        wait_for(&mut widget, |w| w.messages().len() == 2).await;
        widget.submit_user_message("segunda");
        wait_for(&mut widget, |w| w.messages().len() == 4).await;

        let contents: Vec<_> = widget.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["primeira", "ok", "segunda", "ok"]);
    }

    #[tokio::test(start_paused = true)]
    async fn greeting_appears_exactly_once_after_the_delay() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.start();
        // Let the spawned timer register its deadline before advancing.
        tokio::task::yield_now().await;

        advance(Duration::from_millis(2999)).await;
        tokio::task::yield_now().await;
        widget.poll_events();
        assert!(widget.messages().is_empty());

        advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        widget.poll_events();
        assert_eq!(widget.messages().len(), 1);
        assert_eq!(widget.messages()[0].content(), GREETING_TEXT);
        assert_eq!(widget.messages()[0].origin(), Origin::Bot);

        // A second start must not schedule a second greeting.
        widget.start();
        advance(Duration::from_millis(10_000)).await;
        tokio::task::yield_now().await;
        widget.poll_events();
        assert_eq!(widget.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_indicator_lingers_after_completion() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.typing_visible = true;
        widget.in_flight = 1;

        widget
            .events_tx
            .send(WidgetEvent::Reply(ChatMessage::bot("pronto")))
            .unwrap();
        widget.poll_events();
        // Let the spawned linger timer register its deadline.
        tokio::task::yield_now().await;

        assert_eq!(widget.messages().len(), 1);
        assert!(widget.typing_indicator_visible());

        advance(Duration::from_millis(999)).await;
        tokio::task::yield_now().await;
        widget.poll_events();
        assert!(widget.typing_indicator_visible());

        advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        widget.poll_events();
        assert!(!widget.typing_indicator_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn hide_is_per_completion_even_with_another_request_pending() {
        let mut widget = test_widget("http://127.0.0.1:9");
        widget.typing_visible = true;
        widget.in_flight = 2;

        widget
            .events_tx
            .send(WidgetEvent::Reply(ChatMessage::bot("primeira resposta")))
            .unwrap();
        widget.poll_events();
        assert_eq!(widget.pending_requests(), 1);
        tokio::task::yield_now().await;

        advance(Duration::from_millis(1001)).await;
        tokio::task::yield_now().await;
        widget.poll_events();

        // The indicator hides even though a request is still in flight.
        assert!(!widget.typing_indicator_visible());
        assert_eq!(widget.pending_requests(), 1);
    }
}
