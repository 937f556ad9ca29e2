use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::catalog::{Catalog, CatalogItem};
use crate::session::state::{Choice, Feedback};
use crate::ui::theme::Theme;

/// Text shown on an answer button.
pub fn choice_label(choice: &Choice, catalog: &Catalog) -> String {
    match choice {
        Choice::Classification(class) => class.label(),
        Choice::Item(id) => catalog
            .get(id)
            .map(|item| item.display_name().to_string())
            .unwrap_or_else(|| id.to_string()),
    }
}

/// Prompt, answer buttons and feedback line for the current item.
pub struct QuizCard<'a> {
    item: &'a CatalogItem,
    options: Vec<String>,
    correct_index: Option<usize>,
    selected: usize,
    chosen: Option<usize>,
    feedback: Option<&'a Feedback>,
    theme: &'a Theme,
}

impl<'a> QuizCard<'a> {
    pub fn new(
        item: &'a CatalogItem,
        choices: &[Choice],
        catalog: &Catalog,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            item,
            options: choices.iter().map(|c| choice_label(c, catalog)).collect(),
            correct_index: choices.iter().position(|c| c.answers(item) == Some(true)),
            selected,
            chosen: None,
            feedback: None,
            theme,
        }
    }

    pub fn with_feedback(mut self, feedback: Option<&'a Feedback>, chosen: Option<usize>) -> Self {
        self.feedback = feedback;
        self.chosen = chosen;
        self
    }

    fn prompt_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let title_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        match self.item {
            CatalogItem::Classification(item) => vec![
                Line::from(Span::styled(
                    t!("quiz.classify_prompt").to_string(),
                    Style::default().fg(colors.text_muted()),
                )),
                Line::from(""),
                Line::from(Span::styled(item.display_name.clone(), title_style)),
            ],
            CatalogItem::Identification(item) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        t!("quiz.identify_prompt").to_string(),
                        Style::default().fg(colors.text_muted()),
                    )),
                    Line::from(""),
                ];
                lines.extend(item.feature_lines.iter().map(|f| {
                    Line::from(Span::styled(
                        format!("• {f}"),
                        Style::default().fg(colors.fg()),
                    ))
                }));
                lines
            }
            CatalogItem::Concept(item) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        t!("quiz.concept_prompt").to_string(),
                        Style::default().fg(colors.text_muted()),
                    )),
                    Line::from(""),
                ];
                lines.extend(item.description_lines.iter().map(|d| {
                    Line::from(Span::styled(d.clone(), Style::default().fg(colors.fg())))
                }));
                lines
            }
        }
    }
}

impl Widget for QuizCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let option_rows = self.options.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(option_rows),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(self.prompt_lines())
            .wrap(Wrap { trim: false })
            .render(layout[0], buf);

        let answered = self.feedback.is_some();
        let option_lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let is_selected = i == self.selected && !answered;
                let mut style = Style::default().fg(colors.fg());
                if answered && Some(i) == self.correct_index {
                    style = style.fg(colors.success()).add_modifier(Modifier::BOLD);
                } else if answered && Some(i) == self.chosen {
                    style = style.fg(colors.error()).add_modifier(Modifier::CROSSED_OUT);
                } else if is_selected {
                    style = style
                        .bg(colors.option_selected_bg())
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD);
                }
                let indicator = if is_selected { ">" } else { " " };
                Line::from(Span::styled(format!(" {indicator} [{}] {label}", i + 1), style))
            })
            .collect();
        Paragraph::new(option_lines).render(layout[2], buf);

        if let Some(feedback) = self.feedback {
            let line = if feedback.correct {
                Line::from(Span::styled(
                    t!("quiz.correct").to_string(),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                let answer = feedback.correct_answer_label.clone().unwrap_or_default();
                Line::from(vec![
                    Span::styled(
                        t!("quiz.incorrect").to_string(),
                        Style::default()
                            .fg(colors.error())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        t!("quiz.correct_answer_was", answer = answer).to_string(),
                        Style::default().fg(colors.fg()),
                    ),
                ])
            };
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(layout[4], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Classification, Domain};

    #[test]
    fn test_card_marks_correct_button() {
        let catalog = Catalog::bundled(Domain::Classification).unwrap();
        let item = &catalog.items()[0];
        let choices: Vec<Choice> = Classification::ALL
            .into_iter()
            .map(Choice::Classification)
            .collect();
        let theme = Theme::default();
        let card = QuizCard::new(item, &choices, &catalog, 0, &theme);
        let expected = Classification::ALL
            .iter()
            .position(|c| Some(*c) == item.classification());
        assert_eq!(card.correct_index, expected);
        assert!(card.correct_index.is_some());
    }

    #[test]
    fn test_item_choice_label_uses_display_name() {
        let catalog = Catalog::bundled(Domain::Identification).unwrap();
        let first = &catalog.items()[0];
        let label = choice_label(&Choice::Item(first.id().clone()), &catalog);
        assert_eq!(label, first.display_name());
    }
}
