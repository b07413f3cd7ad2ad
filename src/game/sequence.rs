#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Available,
    /// Picked at this 1-based position.
    Selected(usize),
    Correct,
    Incorrect,
}

/// Selection state of the sequencing level: pick every card once, in the
/// order the player believes is ascending, then confirm.
#[derive(Clone, Debug)]
pub struct SequencePicker {
    cards: Vec<i64>,
    states: Vec<CardState>,
    picked: Vec<usize>,
    confirmed: bool,
}

impl SequencePicker {
    pub fn new(cards: Vec<i64>) -> Self {
        let states = vec![CardState::Available; cards.len()];
        Self {
            cards,
            states,
            picked: Vec::new(),
            confirmed: false,
        }
    }

    pub fn cards(&self) -> &[i64] {
        &self.cards
    }

    pub fn state(&self, index: usize) -> Option<CardState> {
        self.states.get(index).copied()
    }

    /// Pick the card at `index`. Returns false if it is out of range,
    /// already picked, or the answer was confirmed.
    pub fn select(&mut self, index: usize) -> bool {
        if self.confirmed || self.states.get(index) != Some(&CardState::Available) {
            return false;
        }
        self.picked.push(index);
        self.states[index] = CardState::Selected(self.picked.len());
        true
    }

    pub fn reset(&mut self) {
        if self.confirmed {
            return;
        }
        self.picked.clear();
        self.states.fill(CardState::Available);
    }

    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.picked.len() == self.cards.len()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Numbers in the order they were picked.
    pub fn sequence(&self) -> Vec<i64> {
        self.picked.iter().map(|&i| self.cards[i]).collect()
    }

    /// Lock the selection and mark each card by whether it was picked at its
    /// sorted position. Returns the picked sequence, or `None` if not every
    /// card has been picked yet.
    pub fn confirm(&mut self) -> Option<Vec<i64>> {
        if !self.is_complete() || self.confirmed {
            return None;
        }
        self.confirmed = true;

        let mut sorted = self.cards.clone();
        sorted.sort_unstable();
        for (position, &index) in self.picked.iter().enumerate() {
            self.states[index] = if sorted[position] == self.cards[index] {
                CardState::Correct
            } else {
                CardState::Incorrect
            };
        }
        Some(self.sequence())
    }
}
