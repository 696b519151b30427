// src/ui.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppScreen, Connection};
use crate::chat_view::draw_chat;
use crate::constants::FALLBACK_TITLE;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .margin(1)
        .split(f.area());

    draw_header(f, chunks[0], app);

    match app.screen {
        AppScreen::Chat => draw_chat(f, app, chunks[1]),
        AppScreen::QuitConfirm => draw_quit_confirm(f, chunks[1]),
    }

    draw_footer(f, chunks[2], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let title = match &app.server_info {
        Some(info) if !info.work_hours.is_empty() => {
            format!("{} — {}", info.company_name, info.work_hours)
        }
        Some(info) => info.company_name.clone(),
        None => FALLBACK_TITLE.to_string(),
    };

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// Draws the footer with dynamic instructions.
fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let instructions = match app.screen {
        AppScreen::Chat => "Enter envia, Tab seleciona resposta rápida, Esc sai.",
        AppScreen::QuitConfirm => "Pressione 'y' para sair ou 'n' para voltar.",
    };

    let connection = match app.connection {
        Connection::Unknown => "",
        Connection::Online => "  [online]",
        Connection::Offline => "  [offline]",
    };

    let pending = app.widget.pending_requests();
    let pending_hint = if pending > 0 {
        format!("  [{} pendente(s)]", pending)
    } else {
        String::new()
    };

    let footer = Paragraph::new(format!("{}{}{}", instructions, connection, pending_hint))
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(footer, area);
}

fn draw_quit_confirm(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Encerrar")
        .style(Style::default().fg(Color::LightYellow));
    f.render_widget(block, area);

    let quit_text =
        "Deseja encerrar o atendimento?\n\nPressione 'y' para confirmar ou 'n' para cancelar.";

    let paragraph = Paragraph::new(quit_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
