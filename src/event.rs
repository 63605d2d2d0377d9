use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Resize,
}

/// Terminal input as an async stream. Key releases and repeats are dropped
/// so every physical press is seen once.
pub struct InputEvents {
    stream: EventStream,
}

impl InputEvents {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// `None` once the terminal input stream has ended.
    pub async fn next(&mut self) -> Option<color_eyre::Result<Input>> {
        loop {
            match self.stream.next().await? {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    return Some(Ok(Input::Key(key)))
                }
                Ok(Event::Resize(..)) => return Some(Ok(Input::Resize)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
