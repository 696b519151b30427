use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppScreen};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match app.screen {
        AppScreen::Chat => handle_chat_input(app, key),
        AppScreen::QuitConfirm => handle_quit_confirm_input(app, key),
    }
}

fn handle_chat_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if app.widget.input.trim().is_empty() {
                // With an empty input, Enter activates the selected chip.
                if let Some(idx) = app.widget.selected_quick_reply {
                    app.widget.send_quick_reply(idx);
                    app.logs.add("Resposta rápida enviada");
                    app.scroll_to_bottom();
                }
            } else {
                app.widget.submit_input();
                app.logs.add("Mensagem enviada");
                app.scroll_to_bottom();
            }
        }
        KeyCode::Tab => app.widget.cycle_quick_reply(),
        KeyCode::Esc => {
            if app.widget.selected_quick_reply.is_some() {
                app.widget.selected_quick_reply = None;
            } else {
                app.screen = AppScreen::QuitConfirm;
            }
        }
        KeyCode::Up | KeyCode::PageUp => app.scroll_up(),
        KeyCode::Down | KeyCode::PageDown => app.scroll_down(),
        KeyCode::End => app.scroll_to_bottom(),
        KeyCode::Backspace => {
            app.widget.input.pop();
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.screen = AppScreen::QuitConfirm,
                    'u' => app.widget.input.clear(),
                    _ => {}
                }
            } else {
                app.widget.input.push(c);
                app.widget.selected_quick_reply = None;
            }
        }
        _ => {}
    }
}

fn handle_quit_confirm_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.should_quit = true;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.screen = AppScreen::Chat;
        }
        _ => {}
    }
}
