use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::components::event_form::{EventFormState, FormField};
use crate::config::Config;
use crate::controller::{Card, EventList, LoadOutcome, Partition};
use crate::effects::{EffectKind, Effects};
use crate::i18n::{Language, Strings};
use crate::journal::{Comment, EventStore, EventUpdate, NewComment, REACTIONS};
use crate::theme::{Theme, ThemeMode};

pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Countdown,
    Journal,
}

impl Tab {
    pub fn partition(self) -> Partition {
        match self {
            Tab::Countdown => Partition::Upcoming,
            Tab::Journal => Partition::Past,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Countdown => Tab::Journal,
            Tab::Journal => Tab::Countdown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    Reactions,
    Comments,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CommentsPanel {
    pub event_id: String,
    pub event_title: String,
    pub comments: Vec<Comment>,
    pub input: String,
    pub error: Option<String>,
}

pub struct App<S> {
    pub running: bool,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub language: Language,
    pub theme: Theme,
    pub now: DateTime<Local>,
    pub cards: Vec<Card>,
    pub selected: usize,
    pub form_state: Option<EventFormState>,
    pub reaction_index: usize,
    pub comments: Option<CommentsPanel>,
    pub notice: Option<Notice>,
    /// Set while the last read failed; drives the retry banner.
    pub load_failed: bool,
    pub loading: bool,
    pub hero_visible: bool,
    pub effects: Effects,
    effect_duration: Duration,
    author: String,
    list: EventList<S>,
}

impl<S: EventStore> App<S> {
    pub fn new(list: EventList<S>, config: &Config, now: DateTime<Local>) -> Self {
        let mode = ThemeMode::parse(list.theme_preference());
        let mut app = Self {
            running: true,
            tab: Tab::Countdown,
            input_mode: InputMode::Normal,
            language: config.language,
            theme: Theme::load(mode),
            now,
            cards: Vec::new(),
            selected: 0,
            form_state: None,
            reaction_index: 0,
            comments: None,
            notice: None,
            load_failed: false,
            loading: true,
            hero_visible: true,
            effects: Effects::default(),
            effect_duration: config.effect_duration,
            author: config.author.clone(),
            list,
        };
        app.refresh_cards();
        app
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.cards.get(self.selected)
    }

    /// Recomputes every countdown against one reading of the clock.
    pub fn on_tick(&mut self, now: DateTime<Local>) {
        self.now = now;
        self.refresh_cards();
    }

    /// Expires notices and finished effects.
    pub fn poll_timers(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) >= NOTICE_TTL)
        {
            self.notice = None;
        }
        if let Some(kind) = self.effects.poll(now) {
            debug!(effect = kind.name(), "effect cleared");
        }
    }

    fn refresh_cards(&mut self) {
        self.cards = self.list.cards(&self.now, self.tab.partition());
        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
    }

    fn notify(&mut self, text: &str, is_error: bool) {
        self.notice = Some(Notice {
            text: text.to_string(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ── Loading ──

    pub async fn reload(&mut self) {
        self.loading = true;
        match self.list.load().await {
            LoadOutcome::Fresh { count } => {
                debug!(count, "list refreshed");
                self.load_failed = false;
            }
            LoadOutcome::Fallback { error, cached } => {
                warn!(%error, ?cached, "showing fallback list");
                self.load_failed = true;
            }
        }
        self.loading = false;
        self.refresh_cards();
    }

    // ── Navigation ──

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected = 0;
            self.refresh_cards();
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.input_mode = if self.input_mode == InputMode::Help {
            InputMode::Normal
        } else {
            InputMode::Help
        };
    }

    pub fn toggle_hero(&mut self) {
        self.hero_visible = !self.hero_visible;
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggle();
        info!(language = %self.language, "language changed");
    }

    pub fn toggle_theme(&mut self) {
        let mode = self.theme.mode.toggle();
        self.theme = Theme::load(mode);
        self.list.set_theme_preference(mode.as_str());
        info!(mode = mode.as_str(), theme = %self.theme.name, "theme changed");
    }

    // ── Add / edit dialog ──

    pub fn open_event_form(&mut self) {
        self.form_state = Some(EventFormState::new(self.now.date_naive()));
        self.input_mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        self.form_state = Some(EventFormState::edit(&card.event));
        self.input_mode = InputMode::Form;
    }

    pub fn close_event_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn form_tab(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.active_field = form.active_field.next();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.active_field = form.active_field.prev();
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(form) = &mut self.form_state {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.backspace();
        }
    }

    pub fn form_chip_left(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.prev_chip();
        }
    }

    pub fn form_chip_right(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.next_chip();
        }
    }

    /// Enter on the label box adds a chip; anywhere else it submits.
    pub async fn form_enter(&mut self) {
        let on_label = self
            .form_state
            .as_ref()
            .is_some_and(|f| f.active_field == FormField::Label);
        if on_label {
            if let Some(form) = &mut self.form_state {
                form.commit_label();
            }
        } else {
            self.submit_event_form().await;
        }
    }

    /// Does nothing while the draft is invalid. On failure the dialog stays
    /// open with the typed values.
    pub async fn submit_event_form(&mut self) {
        let Some(form) = &self.form_state else {
            return;
        };
        let fields = match form.draft.validate() {
            Ok(fields) => fields,
            Err(e) => {
                debug!(error = %e, "submit ignored");
                return;
            }
        };

        match form.editing.clone() {
            Some(id) => {
                let update = match self.cards.iter().find(|c| c.event.id == id) {
                    Some(card) => EventUpdate::from_edit(&card.event, fields),
                    None => EventUpdate::Full(fields),
                };
                match self.list.update(&id, update).await {
                    Ok(_) => {
                        self.close_event_form();
                        self.notify("Event updated successfully", false);
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to save event");
                        self.notify("Failed to save event. Please try again.", true);
                    }
                }
            }
            None => match self.list.add(fields).await {
                Ok(created) => {
                    self.close_event_form();
                    self.notify("Event created successfully", false);
                    self.effects
                        .trigger(EffectKind::Celebration, self.effect_duration, Instant::now());
                    self.refresh_cards();
                    if let Some(idx) = self.cards.iter().position(|c| c.event.id == created.id) {
                        self.selected = idx;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to save event");
                    self.notify("Failed to save event. Please try again.", true);
                }
            },
        }
        self.refresh_cards();
    }

    // ── Delete ──

    pub async fn delete_selected_event(&mut self) {
        let Some(id) = self.selected_card().map(|c| c.event.id.clone()) else {
            return;
        };
        match self.list.remove(&id).await {
            Ok(_) => self.notify("Event deleted successfully", false),
            Err(e) => {
                warn!(error = %e, "failed to delete event");
                self.notify("Failed to delete event. Please try again.", true);
            }
        }
        self.refresh_cards();
    }

    // ── Reactions ──

    pub fn open_reactions(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        self.reaction_index = card
            .event
            .reaction
            .as_deref()
            .and_then(|r| REACTIONS.iter().position(|&p| p == r))
            .unwrap_or(0);
        self.input_mode = InputMode::Reactions;
    }

    pub fn close_reactions(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn reaction_next(&mut self) {
        self.reaction_index = (self.reaction_index + 1) % REACTIONS.len();
    }

    pub fn reaction_prev(&mut self) {
        self.reaction_index = (self.reaction_index + REACTIONS.len() - 1) % REACTIONS.len();
    }

    pub async fn pick_reaction(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.selected_card().map(|c| c.event.id.clone()) else {
            return;
        };
        let reaction = REACTIONS[self.reaction_index % REACTIONS.len()];
        match self.list.set_reaction(&id, reaction).await {
            Ok(true) => self.effects.trigger(
                EffectKind::for_reaction(reaction),
                self.effect_duration,
                Instant::now(),
            ),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "failed to update reaction");
                self.notify("Failed to add reaction. Please try again.", true);
            }
        }
        self.refresh_cards();
    }

    // ── Comments ──

    pub async fn open_comments(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        let mut panel = CommentsPanel {
            event_id: card.event.id.clone(),
            event_title: card.event.title.clone(),
            ..CommentsPanel::default()
        };
        match self.list.comments(&panel.event_id).await {
            Ok(comments) => panel.comments = comments,
            Err(e) => {
                warn!(error = %e, "failed to fetch comments");
                panel.error = Some(e.to_string());
            }
        }
        self.comments = Some(panel);
        self.input_mode = InputMode::Comments;
    }

    pub fn close_comments(&mut self) {
        self.comments = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn comment_input_char(&mut self, c: char) {
        if let Some(panel) = &mut self.comments {
            panel.input.push(c);
        }
    }

    pub fn comment_backspace(&mut self) {
        if let Some(panel) = &mut self.comments {
            panel.input.pop();
        }
    }

    pub async fn submit_comment(&mut self) {
        let Some(panel) = &self.comments else {
            return;
        };
        let content = panel.input.trim();
        if content.is_empty() {
            return;
        }
        let comment = NewComment::new(panel.event_id.clone(), content, &self.author);
        match self.list.add_comment(comment).await {
            Ok(created) => {
                if let Some(panel) = &mut self.comments {
                    panel.input.clear();
                    panel.comments.insert(0, created);
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to post comment");
                self.notify("Failed to post comment. Please try again.", true);
            }
        }
    }
}
