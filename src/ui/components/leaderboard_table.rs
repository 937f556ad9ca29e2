use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Widget};
use rust_i18n::t;

use crate::app::Standings;
use crate::catalog::Domain;
use crate::ui::format_duration;
use crate::ui::theme::Theme;

/// Shown rows are capped so the table fits common terminal heights.
pub const MAX_ROWS: usize = 20;

pub struct LeaderboardTable<'a> {
    pub domain: Domain,
    pub standings: &'a Standings,
    pub theme: &'a Theme,
}

impl<'a> LeaderboardTable<'a> {
    pub fn new(domain: Domain, standings: &'a Standings, theme: &'a Theme) -> Self {
        Self {
            domain,
            standings,
            theme,
        }
    }
}

impl Widget for LeaderboardTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} · {} ", t!("leaderboard.title"), self.domain.label()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let entries = match self.standings {
            Standings::Loading => {
                Paragraph::new(Line::from(t!("leaderboard.loading").to_string()))
                    .style(Style::default().fg(colors.text_muted()))
                    .alignment(Alignment::Center)
                    .block(block)
                    .render(area, buf);
                return;
            }
            Standings::Failed(message) => {
                Paragraph::new(vec![
                    Line::from(t!("leaderboard.load_failed").to_string()),
                    Line::from(message.clone()),
                ])
                .style(Style::default().fg(colors.error()))
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
                return;
            }
            Standings::Loaded(entries) if entries.is_empty() => {
                Paragraph::new(Line::from(t!("leaderboard.empty").to_string()))
                    .style(Style::default().fg(colors.text_muted()))
                    .alignment(Alignment::Center)
                    .block(block)
                    .render(area, buf);
                return;
            }
            Standings::Loaded(entries) => entries,
        };

        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from(t!("leaderboard.player").to_string()),
            Cell::from(t!("leaderboard.time").to_string()),
            Cell::from(t!("leaderboard.level").to_string()),
            Cell::from(t!("leaderboard.date").to_string()),
        ])
        .style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = entries
            .iter()
            .take(MAX_ROWS)
            .enumerate()
            .map(|(i, entry)| {
                let time = if entry.completed {
                    format_duration(entry.elapsed_seconds)
                } else {
                    format!("{} ({})", format_duration(entry.elapsed_seconds), t!("leaderboard.dnf"))
                };
                let style = if i == 0 && entry.completed {
                    Style::default().fg(colors.streak())
                } else if entry.completed {
                    Style::default().fg(colors.fg())
                } else {
                    Style::default().fg(colors.text_muted())
                };
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(entry.player_name.clone()),
                    Cell::from(time),
                    Cell::from(entry.difficulty.to_string()),
                    Cell::from(entry.date.format("%Y-%m-%d").to_string()),
                ])
                .style(style)
            })
            .collect();

        Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(6),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(block)
        .render(area, buf);
    }
}
