use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::picker::{Focus, Mode, Picker};

use super::widgets::panel_block;

fn highlight(accent: Color) -> Style {
    Style::default()
        .bg(accent)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn season_item(label: &str, episodes: usize, checked: bool, enabled: bool) -> ListItem<'static> {
    let (icon, icon_color) = if checked {
        ("[x]", Color::Green)
    } else {
        ("[ ]", Color::DarkGray)
    };
    let text_style = if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    ListItem::new(Line::from(vec![
        Span::styled(icon.to_string(), Style::default().fg(icon_color)),
        Span::raw(" "),
        Span::styled(label.to_string(), text_style),
        Span::styled(
            format!(" ({} episodes)", episodes),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

pub fn render_picker_view(frame: &mut Frame, area: Rect, picker: &mut Picker, accent: Color) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let mode_line = Line::from(vec![
        Span::styled("Mode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            picker.mode.as_str(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(mode_line), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let shows: Vec<ListItem> = picker
        .shows
        .iter()
        .map(|show| ListItem::new(Line::from(show.clone())))
        .collect();
    let show_list = List::new(shows)
        .block(panel_block("Shows", accent, picker.focus == Focus::Shows))
        .highlight_style(highlight(accent))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(show_list, columns[0], &mut picker.show_state);

    let selectable = picker.mode == Mode::Selected;
    let seasons: Vec<ListItem> = picker
        .seasons
        .iter()
        .map(|s| season_item(&s.label, s.episodes, s.checked || !selectable, selectable))
        .collect();
    let season_list = List::new(seasons)
        .block(panel_block("Seasons", accent, picker.focus == Focus::Seasons))
        .highlight_style(if picker.focus == Focus::Seasons {
            highlight(accent)
        } else {
            Style::default()
        })
        .highlight_symbol(if picker.focus == Focus::Seasons { "▶ " } else { "  " });
    frame.render_stateful_widget(season_list, columns[1], &mut picker.season_state);

    let status_style = if picker.loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(picker.status.clone(), status_style)),
        rows[2],
    );
}
