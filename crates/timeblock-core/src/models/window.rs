//! Three-week sliding window used for week-by-week navigation.

use super::Week;

/// Previous, current and next week held in a fixed ring of three slots.
///
/// Shifting moves the ring offset instead of moving weeks around, so a
/// single navigation step only needs one freshly loaded week. The window
/// never refreshes itself: after a mutation the caller reloads the affected
/// week and installs it with one of the `set_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekWindow {
    slots: [Week; 3],
    current: usize,
}

impl WeekWindow {
    pub fn new(previous: Week, current: Week, next: Week) -> Self {
        Self {
            slots: [previous, current, next],
            current: 1,
        }
    }

    fn previous_index(&self) -> usize {
        (self.current + 2) % 3
    }

    fn next_index(&self) -> usize {
        (self.current + 1) % 3
    }

    pub fn previous(&self) -> &Week {
        &self.slots[self.previous_index()]
    }

    pub fn current(&self) -> &Week {
        &self.slots[self.current]
    }

    pub fn next(&self) -> &Week {
        &self.slots[self.next_index()]
    }

    /// Moves one week forward and installs `new_next` as the next week.
    ///
    /// Returns the week that dropped off the back of the window.
    pub fn shift_forward(&mut self, new_next: Week) -> Week {
        self.current = self.next_index();
        let slot = self.next_index();
        std::mem::replace(&mut self.slots[slot], new_next)
    }

    /// Moves one week backward and installs `new_previous` as the previous
    /// week.
    ///
    /// Returns the week that dropped off the front of the window.
    pub fn shift_backward(&mut self, new_previous: Week) -> Week {
        self.current = self.previous_index();
        let slot = self.previous_index();
        std::mem::replace(&mut self.slots[slot], new_previous)
    }

    pub fn set_previous(&mut self, week: Week) {
        let slot = self.previous_index();
        self.slots[slot] = week;
    }

    pub fn set_current(&mut self, week: Week) {
        self.slots[self.current] = week;
    }

    pub fn set_next(&mut self, week: Week) {
        let slot = self.next_index();
        self.slots[slot] = week;
    }
}
