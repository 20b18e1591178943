use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
    Quit,
}

const ACTION_COUNT: usize = 5;

/// Highest keyboard slot; slot bits occupy 0..=30 and bit 31 belongs to touch.
pub const MAX_KEY_SLOT: u8 = 30;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Jump,
        InputAction::Restart,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::Restart => 3,
            InputAction::Quit => 4,
        }
    }
}

/// A physical writer of logical actions. Each source owns one bit per action,
/// so releasing one source never clears an action another source still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(u8),
    Touch,
}

impl InputSource {
    const fn bit(self) -> u32 {
        match self {
            InputSource::Key(slot) => {
                let slot = if slot > MAX_KEY_SLOT {
                    MAX_KEY_SLOT
                } else {
                    slot
                };
                1 << slot
            }
            InputSource::Touch => 1 << 31,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Pressed/released state of every logical action, written by input callbacks
/// and read once per simulation tick. Safe to share across threads.
#[derive(Debug, Default)]
pub struct InputLatch {
    sources: [AtomicU32; ACTION_COUNT],
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, action: InputAction, source: InputSource, active: bool) {
        let slot = &self.sources[action.index()];
        let bit = source.bit();
        if active {
            slot.fetch_or(bit, Ordering::AcqRel);
        } else {
            slot.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    pub fn is_active(&self, action: InputAction) -> bool {
        self.sources[action.index()].load(Ordering::Acquire) != 0
    }

    /// Drops every keyboard hold, e.g. when the window loses focus and key-up
    /// events will never arrive. Touch holds are left to the pointer tracker.
    pub fn release_all_keys(&self) {
        let touch_bit = InputSource::Touch.bit();
        for slot in &self.sources {
            slot.fetch_and(touch_bit, Ordering::AcqRel);
        }
    }

    pub fn snapshot(&self) -> ActionStates {
        let mut states = ActionStates::default();
        for action in InputAction::ALL {
            states.set(action, self.is_active(action));
        }
        states
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn set_active_is_idempotent() {
        let latch = InputLatch::new();
        latch.set_active(InputAction::Jump, InputSource::Key(0), true);
        latch.set_active(InputAction::Jump, InputSource::Key(0), true);
        assert!(latch.is_active(InputAction::Jump));

        latch.set_active(InputAction::Jump, InputSource::Key(0), false);
        latch.set_active(InputAction::Jump, InputSource::Key(0), false);
        assert!(!latch.is_active(InputAction::Jump));
    }

    #[test]
    fn release_only_clears_the_releasing_source() {
        let latch = InputLatch::new();
        latch.set_active(InputAction::MoveLeft, InputSource::Key(0), true);
        latch.set_active(InputAction::MoveLeft, InputSource::Touch, true);

        latch.set_active(InputAction::MoveLeft, InputSource::Key(0), false);
        assert!(latch.is_active(InputAction::MoveLeft));

        latch.set_active(InputAction::MoveLeft, InputSource::Touch, false);
        assert!(!latch.is_active(InputAction::MoveLeft));
    }

    #[test]
    fn releasing_unheld_source_keeps_other_actions() {
        let latch = InputLatch::new();
        latch.set_active(InputAction::MoveRight, InputSource::Key(1), true);
        latch.set_active(InputAction::MoveLeft, InputSource::Key(1), false);

        assert!(latch.is_active(InputAction::MoveRight));
        assert!(!latch.is_active(InputAction::MoveLeft));
    }

    #[test]
    fn release_all_keys_keeps_touch_holds() {
        let latch = InputLatch::new();
        latch.set_active(InputAction::MoveRight, InputSource::Key(0), true);
        latch.set_active(InputAction::MoveLeft, InputSource::Touch, true);

        latch.release_all_keys();

        assert!(!latch.is_active(InputAction::MoveRight));
        assert!(latch.is_active(InputAction::MoveLeft));
    }

    #[test]
    fn out_of_range_key_slot_saturates_without_touching_touch_bit() {
        let latch = InputLatch::new();
        latch.set_active(InputAction::Jump, InputSource::Key(200), true);
        latch.set_active(InputAction::Jump, InputSource::Touch, false);
        assert!(latch.is_active(InputAction::Jump));
    }

    #[test]
    fn snapshot_copies_current_state() {
        let latch = InputLatch::new();
        latch.set_active(InputAction::MoveRight, InputSource::Key(0), true);
        let snapshot = latch.snapshot();
        latch.set_active(InputAction::MoveRight, InputSource::Key(0), false);

        assert!(snapshot.is_down(InputAction::MoveRight));
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(!latch.snapshot().is_down(InputAction::MoveRight));
    }

    #[test]
    fn writes_from_another_thread_are_visible() {
        let latch = InputLatch::new();
        thread::scope(|scope| {
            scope
                .spawn(|| latch.set_active(InputAction::Jump, InputSource::Touch, true))
                .join()
                .expect("writer thread");
        });
        assert!(latch.is_active(InputAction::Jump));

        latch.set_active(InputAction::Jump, InputSource::Touch, false);
        assert!(!latch.is_active(InputAction::Jump));
    }
}
