use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Correct,
    TryAgain,
}

impl Cue {
    fn bells(self) -> usize {
        match self {
            Cue::Correct => 1,
            Cue::TryAgain => 2,
        }
    }
}

/// Feedback sounds, rendered as terminal bells. Created once in `main` and
/// owned by the app; a muted handle plays nothing.
pub struct Sounds {
    enabled: bool,
}

impl Sounds {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn play(&self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let mut stdout = io::stdout();
        let bells = "\x07".repeat(cue.bells());
        // Audio is a nicety: a failed bell never interrupts the game.
        if let Err(e) = stdout.write_all(bells.as_bytes()).and_then(|_| stdout.flush()) {
            log::debug!("could not ring terminal bell: {e}");
        }
    }
}
