use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::app::SaveState;
use crate::session::result::SessionResult;
use crate::ui::format_duration;
use crate::ui::theme::Theme;

/// Summary shown after a session completes or is abandoned.
pub struct Dashboard<'a> {
    pub result: &'a SessionResult,
    pub player_name: &'a str,
    pub save_state: &'a SaveState,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        result: &'a SessionResult,
        player_name: &'a str,
        save_state: &'a SaveState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            result,
            player_name,
            save_state,
            theme,
        }
    }

    fn save_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        match self.save_state {
            SaveState::NotSaved => Line::from(Span::styled(
                t!("result.save_prompt").to_string(),
                Style::default().fg(colors.text_muted()),
            )),
            SaveState::Saving => Line::from(Span::styled(
                t!("result.saving").to_string(),
                Style::default().fg(colors.warning()),
            )),
            SaveState::Saved => Line::from(Span::styled(
                t!("result.saved", name = self.player_name).to_string(),
                Style::default().fg(colors.success()),
            )),
            SaveState::Failed(message) => Line::from(vec![
                Span::styled(
                    t!("result.save_failed").to_string(),
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {message}"), Style::default().fg(colors.error())),
            ]),
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.result.completed {
            t!("result.title_completed").to_string()
        } else {
            t!("result.title_abandoned").to_string()
        };
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let heading = format!(
            "{}  ·  {} {}",
            self.result.domain.label(),
            t!("result.difficulty"),
            self.result.difficulty
        );
        Paragraph::new(Line::from(Span::styled(
            heading,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let label_style = Style::default().fg(colors.fg());
        let time_line = Line::from(vec![
            Span::styled(format!("  {:<12}", t!("result.time")), label_style),
            Span::styled(
                format_duration(self.result.elapsed_seconds()),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(time_line).render(layout[1], buf);

        let acc_color = if self.result.accuracy() >= 90.0 {
            colors.success()
        } else if self.result.accuracy() >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let acc_line = Line::from(vec![
            Span::styled(format!("  {:<12}", t!("result.accuracy")), label_style),
            Span::styled(
                format!("{:.1}%", self.result.accuracy()),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{})", self.result.correct, self.result.attempts),
                Style::default().fg(colors.text_muted()),
            ),
        ]);
        Paragraph::new(acc_line).render(layout[2], buf);

        let mastered_line = Line::from(vec![
            Span::styled(format!("  {:<12}", t!("result.mastered")), label_style),
            Span::styled(
                format!("{}/{}", self.result.mastered, self.result.total_items),
                Style::default().fg(if self.result.completed {
                    colors.success()
                } else {
                    colors.fg()
                }),
            ),
        ]);
        Paragraph::new(mastered_line).render(layout[3], buf);

        Paragraph::new(self.save_line()).render(layout[4], buf);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(t!("result.help").to_string(), Style::default().fg(colors.accent())),
        ]));
        help.render(layout[6], buf);
    }
}
