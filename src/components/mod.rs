pub mod card_list;
pub mod comments;
pub mod effects_overlay;
pub mod event_form;
pub mod header;
pub mod help;
pub mod reaction_picker;
pub mod status_bar;

pub use card_list::CardList;
pub use comments::CommentsPopup;
pub use effects_overlay::EffectsOverlay;
pub use event_form::EventForm;
pub use header::Header;
pub use help::HelpPopup;
pub use reaction_picker::ReactionPicker;
pub use status_bar::StatusBar;

use ratatui::layout::Rect;

/// Centered popup of at most `max_w` x `max_h`, shrunk to fit `area`.
pub fn popup_area(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let popup_w = area.width.min(max_w);
    let popup_h = area.height.min(max_h);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    Rect::new(x, y, popup_w, popup_h)
}
