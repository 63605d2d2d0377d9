use std::time::Instant;

use ratatui::{layout::Rect, style::Style, Frame};

use crate::effects::ActiveEffect;

pub struct EffectsOverlay;

impl EffectsOverlay {
    /// Draws particles straight into the buffer on top of whatever is there.
    pub fn render(frame: &mut Frame, area: Rect, effect: &ActiveEffect, now: Instant) {
        let buf = frame.buffer_mut();
        for sprite in effect.sprites(now, area.width, area.height) {
            buf.set_string(area.x + sprite.x, area.y + sprite.y, sprite.glyph, Style::default());
        }
    }
}
