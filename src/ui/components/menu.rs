use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::catalog::Domain;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play(Domain),
    Leaderboard,
    ChangeName,
    Settings,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: Self::build_items(),
            selected: 0,
            theme,
        }
    }

    /// Rebuild labels after a locale change.
    pub fn refresh_labels(&mut self) {
        self.items = Self::build_items();
    }

    fn build_items() -> Vec<MenuItem> {
        let play = |key, domain: Domain, description: String| MenuItem {
            key,
            label: domain.label(),
            description,
            action: MenuAction::Play(domain),
        };
        vec![
            play(
                '1',
                Domain::Classification,
                t!("menu.classification_desc").to_string(),
            ),
            play(
                '2',
                Domain::Identification,
                t!("menu.identification_desc").to_string(),
            ),
            play('3', Domain::Concepts, t!("menu.concepts_desc").to_string()),
            MenuItem {
                key: 'l',
                label: t!("menu.leaderboard").to_string(),
                description: t!("menu.leaderboard_desc").to_string(),
                action: MenuAction::Leaderboard,
            },
            MenuItem {
                key: 'n',
                label: t!("menu.change_name").to_string(),
                description: t!("menu.change_name_desc").to_string(),
                action: MenuAction::ChangeName,
            },
            MenuItem {
                key: 'c',
                label: t!("menu.settings").to_string(),
                description: t!("menu.settings_desc").to_string(),
                action: MenuAction::Settings,
            },
            MenuItem {
                key: 'q',
                label: t!("menu.quit").to_string(),
                description: String::new(),
                action: MenuAction::Quit,
            },
        ]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|item| item.action)
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "genequiz",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("menu.subtitle").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|item| Constraint::Length(if item.description.is_empty() { 2 } else { 3 }))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    desc_text,
                    Style::default().fg(colors.text_muted()),
                )),
            ];

            if let Some(rect) = menu_layout.get(i) {
                Paragraph::new(lines).render(*rect, buf);
            }
        }
    }
}
