use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::controller::Card;
use crate::countdown::{Countdown, Phase};
use crate::i18n::{Language, Strings};
use crate::theme::Theme;

pub struct CardList;

impl CardList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        cards: &[Card],
        selected: usize,
        loading: bool,
        language: Language,
        theme: &Theme,
    ) {
        let strings = language.strings();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border)
            .title_bottom(Line::from(Span::styled(format!(" {} ", cards.len()), theme.dim)));

        if cards.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let lines = if loading {
                vec![Line::from(Span::styled(strings.loading, theme.dim))]
            } else {
                vec![
                    Line::from(Span::styled(strings.empty_title, theme.header)),
                    Line::from(Span::styled(strings.empty_subtitle, theme.dim)),
                ]
            };
            let y = inner.y + inner.height.saturating_sub(lines.len() as u16) / 2;
            let msg = Paragraph::new(lines).alignment(Alignment::Center);
            frame.render_widget(msg, Rect { y, height: inner.height.min(2), ..inner });
            return;
        }

        let items: Vec<ListItem> = cards
            .iter()
            .enumerate()
            .map(|(idx, card)| ListItem::new(card_lines(card, idx, language, theme)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.highlight);
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn card_lines(card: &Card, index: usize, language: Language, theme: &Theme) -> Vec<Line<'static>> {
    let strings = language.strings();
    let accent = Style::default().fg(Theme::card_color(index));
    let bar = || Span::styled("▌ ", accent);
    let event = &card.event;
    let countdown = &card.countdown;

    let mut title = vec![
        bar(),
        Span::styled(event.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(reaction) = &event.reaction {
        title.push(Span::raw(format!("  {reaction}")));
    }

    let date = countdown
        .event_date
        .map(|d| language.event_date(d))
        .unwrap_or_else(|| strings.invalid_date.to_string());
    let days_style = match countdown.phase() {
        Phase::Today => theme.today,
        _ => accent.add_modifier(Modifier::BOLD),
    };

    let mut lines = vec![
        Line::from(title),
        Line::from(vec![
            bar(),
            Span::styled(date, theme.dim),
            Span::raw("  "),
            Span::styled(days_text(countdown, strings), days_style),
        ]),
    ];
    if countdown.is_valid() {
        let clock_style = if countdown.is_past { theme.dim } else { accent };
        lines.push(Line::from(vec![
            bar(),
            Span::styled(countdown.clock_display(), clock_style),
        ]));
    }
    if !event.labels.is_empty() {
        let mut spans = vec![bar()];
        for label in event.labels.iter() {
            spans.push(Span::styled(format!("#{label}"), theme.highlight));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    if !event.comments.is_empty() {
        lines.push(Line::from(vec![
            bar(),
            Span::styled(event.comments.clone(), theme.dim.add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

/// `Today`, `12 Days left`, `3 Days ago` or the invalid-date label.
pub fn days_text(countdown: &Countdown, strings: &Strings) -> String {
    match countdown.phase() {
        Phase::Invalid => strings.invalid_date.to_string(),
        Phase::Today => strings.today.to_string(),
        Phase::Upcoming => format!("{} {}", countdown.absolute_days, strings.days_left),
        Phase::Past => format!("{} {}", countdown.absolute_days, strings.days_ago),
    }
}
