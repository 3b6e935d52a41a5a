// Maps keyboard input to actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use tracing::trace;

use crate::ui::actions::{Action, NavigateAction};

/// Maps keyboard input to pager actions
pub struct KeyMapper {
    mappings: HashMap<(KeyCode, KeyModifiers), Action>,

    /// Vim-style count buffer for motions
    count_buffer: String,
}

impl KeyMapper {
    pub fn new() -> Self {
        let mut mapper = Self {
            mappings: HashMap::new(),
            count_buffer: String::new(),
        };

        mapper.init_mappings();
        mapper
    }

    fn init_mappings(&mut self) {
        use KeyCode::*;
        use KeyModifiers as Mod;

        let nav = |action| Action::Navigate(action);

        // Arrow keys
        self.mappings.insert((Up, Mod::NONE), nav(NavigateAction::Up(1)));
        self.mappings.insert((Down, Mod::NONE), nav(NavigateAction::Down(1)));
        self.mappings.insert((Left, Mod::NONE), nav(NavigateAction::Left(1)));
        self.mappings.insert((Right, Mod::NONE), nav(NavigateAction::Right(1)));

        // Vim navigation
        self.mappings.insert((Char('k'), Mod::NONE), nav(NavigateAction::Up(1)));
        self.mappings.insert((Char('j'), Mod::NONE), nav(NavigateAction::Down(1)));
        self.mappings.insert((Char('h'), Mod::NONE), nav(NavigateAction::Left(1)));
        self.mappings.insert((Char('l'), Mod::NONE), nav(NavigateAction::Right(1)));

        // Paging
        self.mappings
            .insert((Char('n'), Mod::CONTROL), nav(NavigateAction::PageDown));
        self.mappings
            .insert((Char('p'), Mod::CONTROL), nav(NavigateAction::PageUp));
        self.mappings
            .insert((Char(' '), Mod::NONE), nav(NavigateAction::HalfPageDown));

        // g/G for top/bottom
        self.mappings.insert((Char('g'), Mod::NONE), nav(NavigateAction::Home));
        self.mappings.insert((Char('G'), Mod::NONE), nav(NavigateAction::End));

        self.mappings
            .insert((Char('w'), Mod::NONE), Action::CycleColumnWidthMode);
        self.mappings
            .insert((Char('l'), Mod::CONTROL), Action::RefreshView);

        self.mappings.insert((Char('q'), Mod::NONE), Action::Quit);
        self.mappings.insert((Char('c'), Mod::CONTROL), Action::Quit);
    }

    /// Map a key event to an action.
    /// Digits accumulate into a count that applies to the next motion.
    pub fn map_key(&mut self, key: KeyEvent) -> Option<Action> {
        if let KeyCode::Char(c) = key.code {
            if c.is_ascii_digit() && key.modifiers.is_empty() {
                self.count_buffer.push(c);
                trace!(target: "input", "Count buffer: {}", self.count_buffer);
                return None; // Collecting count, no action yet
            }
        }

        let action = self.map_key_internal(key);

        if self.count_buffer.is_empty() {
            return action;
        }

        let count = self.count_buffer.parse::<usize>();
        self.count_buffer.clear();
        match (action, count) {
            (Some(action), Ok(count)) => Some(Self::apply_count_to_action(action, count)),
            (action, _) => action,
        }
    }

    fn map_key_internal(&self, key: KeyEvent) -> Option<Action> {
        // Terminals report upper-case letters with SHIFT set
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
            _ => key.modifiers,
        };

        self.mappings.get(&(key.code, modifiers)).cloned()
    }

    /// Apply a count to an action (for vim-style motions)
    fn apply_count_to_action(action: Action, count: usize) -> Action {
        match action {
            Action::Navigate(NavigateAction::Up(_)) => Action::Navigate(NavigateAction::Up(count)),
            Action::Navigate(NavigateAction::Down(_)) => {
                Action::Navigate(NavigateAction::Down(count))
            }
            Action::Navigate(NavigateAction::Left(_)) => {
                Action::Navigate(NavigateAction::Left(count))
            }
            Action::Navigate(NavigateAction::Right(_)) => {
                Action::Navigate(NavigateAction::Right(count))
            }
            // Other actions don't take counts
            _ => action,
        }
    }

    /// Clear any pending state (like count buffer)
    pub fn clear_pending(&mut self) {
        self.count_buffer.clear();
    }

    /// Check if we're collecting a count
    pub fn is_collecting_count(&self) -> bool {
        !self.count_buffer.is_empty()
    }

    /// Get the current count buffer for display
    pub fn get_count_buffer(&self) -> &str {
        &self.count_buffer
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_basic_navigation_mapping() {
        let mut mapper = KeyMapper::new();

        let action = mapper.map_key(key(KeyCode::Down));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::Down(1))));

        let action = mapper.map_key(key(KeyCode::Char('k')));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::Up(1))));

        let action = mapper.map_key(key(KeyCode::Char(' ')));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::HalfPageDown)));
    }

    #[test]
    fn test_control_keys() {
        let mut mapper = KeyMapper::new();

        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(
            mapper.map_key(ctrl_n),
            Some(Action::Navigate(NavigateAction::PageDown))
        );

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(mapper.map_key(ctrl_c), Some(Action::Quit));

        // Plain 'n' is not bound
        assert_eq!(mapper.map_key(key(KeyCode::Char('n'))), None);
    }

    #[test]
    fn test_shifted_letter() {
        let mut mapper = KeyMapper::new();
        let shift_g = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(
            mapper.map_key(shift_g),
            Some(Action::Navigate(NavigateAction::End))
        );
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('g'))),
            Some(Action::Navigate(NavigateAction::Home))
        );
    }

    #[test]
    fn test_vim_count_motion() {
        let mut mapper = KeyMapper::new();

        assert_eq!(mapper.map_key(key(KeyCode::Char('4'))), None);
        assert!(mapper.is_collecting_count());
        assert_eq!(mapper.get_count_buffer(), "4");

        let action = mapper.map_key(key(KeyCode::Down));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::Down(4))));
        assert_eq!(mapper.get_count_buffer(), ""); // Buffer cleared
    }

    #[test]
    fn test_multi_digit_count_up() {
        let mut mapper = KeyMapper::new();
        mapper.map_key(key(KeyCode::Char('1')));
        mapper.map_key(key(KeyCode::Char('2')));

        let action = mapper.map_key(key(KeyCode::Char('k')));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::Up(12))));
    }

    #[test]
    fn test_count_ignored_by_other_actions() {
        let mut mapper = KeyMapper::new();
        mapper.map_key(key(KeyCode::Char('3')));

        let action = mapper.map_key(key(KeyCode::Char('G')));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::End)));
        assert!(!mapper.is_collecting_count());
    }

    #[test]
    fn test_count_dropped_on_unmapped_key() {
        let mut mapper = KeyMapper::new();
        mapper.map_key(key(KeyCode::Char('7')));

        assert_eq!(mapper.map_key(key(KeyCode::Char('z'))), None);
        assert!(!mapper.is_collecting_count());
    }

    #[test]
    fn test_overflowing_count_falls_back_to_single_step() {
        let mut mapper = KeyMapper::new();
        for _ in 0..40 {
            mapper.map_key(key(KeyCode::Char('9')));
        }

        let action = mapper.map_key(key(KeyCode::Char('j')));
        assert_eq!(action, Some(Action::Navigate(NavigateAction::Down(1))));
    }

    #[test]
    fn test_clear_pending() {
        let mut mapper = KeyMapper::new();
        mapper.map_key(key(KeyCode::Char('5')));
        mapper.clear_pending();
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('j'))),
            Some(Action::Navigate(NavigateAction::Down(1)))
        );
    }
}
