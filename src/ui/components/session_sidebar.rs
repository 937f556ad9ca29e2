use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::REQUIRED_STREAK;
use crate::session::SessionController;
use crate::ui::format_duration;
use crate::ui::theme::Theme;

/// Live statistics for the running session.
pub struct SessionSidebar<'a> {
    session: &'a SessionController,
    now: Instant,
    theme: &'a Theme,
}

impl<'a> SessionSidebar<'a> {
    pub fn new(session: &'a SessionController, now: Instant, theme: &'a Theme) -> Self {
        Self {
            session,
            now,
            theme,
        }
    }
}

/// `●●○` style streak pips.
pub fn streak_pips(streak: u32) -> String {
    (0..REQUIRED_STREAK)
        .map(|i| if i < streak { '●' } else { '○' })
        .collect()
}

impl Widget for SessionSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.session.state();
        let (mastered, total) = self.session.progress();
        let label = Style::default().fg(colors.fg());

        let accuracy = state.accuracy();
        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{}: ", t!("sidebar.time")), label),
                Span::styled(
                    format_duration(self.session.elapsed_secs(self.now) as u64),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("sidebar.streak")), label),
                Span::styled(
                    streak_pips(self.session.streak()),
                    Style::default()
                        .fg(colors.streak())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("sidebar.mastered")), label),
                Span::styled(format!("{mastered}/{total}"), Style::default().fg(colors.success())),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", t!("sidebar.accuracy")), label),
                Span::styled(
                    format!("{accuracy:.1}%"),
                    Style::default().fg(if accuracy >= 90.0 {
                        colors.success()
                    } else if accuracy >= 70.0 {
                        colors.warning()
                    } else {
                        colors.error()
                    }),
                ),
            ]),
        ];

        if let Some(chunk) = self.session.chunk() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", t!("sidebar.chunk")), label),
                Span::styled(
                    format!("{}/{}", chunk.index + 1, chunk.count),
                    Style::default().fg(colors.accent()),
                ),
            ]));
        }

        let block = Block::bordered()
            .title(format!(" {} ", t!("sidebar.title")))
            .border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
