use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::campaign::{format_amount, parse_amount, Campaign, PRESET_AMOUNTS};

pub const WELCOME_MESSAGE: &str = "Welcome! Start adding donations.";
pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid positive number.";
pub const INVALID_TARGET_MESSAGE: &str = "Please enter a valid positive target amount.";
pub const RESET_MESSAGE: &str = "Thermometer reset successfully!";
pub const CONFIRM_RESET_PROMPT: &str =
    "Are you sure you want to reset the thermometer? This action cannot be undone.";

/// Longest text accepted in the amount / target fields
const MAX_INPUT_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Presets,
    Custom,   // Custom amount text field
    Controls, // Set target / reset buttons
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    SetTarget,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    SetTarget,
    ConfirmReset,
    Help,
}

/// Result of an attempted addition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Rejected,
    Added,
    /// Total is at or over target; `crossed` is true only for the addition that got it there
    Complete { crossed: bool },
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    TargetCrossed,
}

pub struct App {
    pub campaign: Campaign,
    pub section: Section,
    pub popup: Popup,

    pub selected_preset: usize,
    pub selected_control: Control,

    // Input buffers
    pub pending_input: String, // Custom amount, cleared after a successful add
    pub target_input: String,  // Target prompt popup

    // Outcome of the last action (always shown in the status line)
    pub status_message: String,

    pub title: String,
    pub tagline: String,
}

impl App {
    pub fn new(title: impl Into<String>, tagline: impl Into<String>) -> Self {
        Self {
            campaign: Campaign::new(),
            section: Section::Presets,
            popup: Popup::None,
            selected_preset: 0,
            selected_control: Control::SetTarget,
            pending_input: String::new(),
            target_input: String::new(),
            status_message: WELCOME_MESSAGE.to_string(),
            title: title.into(),
            tagline: tagline.into(),
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub fn confirm_reset_visible(&self) -> bool {
        self.popup == Popup::ConfirmReset
    }

    /// Parse `input` and add it to the running total
    pub fn add_amount(&mut self, input: &str) -> AddOutcome {
        match parse_amount(input) {
            Ok(amount) => self.apply_amount(amount),
            Err(e) => {
                tracing::debug!("Rejected amount {:?}: {}", input, e);
                self.set_status(INVALID_AMOUNT_MESSAGE);
                AddOutcome::Rejected
            }
        }
    }

    /// Add one of the preset amounts by index
    pub fn add_preset(&mut self, index: usize) -> AddOutcome {
        match PRESET_AMOUNTS.get(index) {
            Some(&amount) => self.apply_amount(amount),
            None => AddOutcome::Rejected,
        }
    }

    /// Submit whatever is in the custom amount field
    pub fn add_custom_amount(&mut self) -> AddOutcome {
        let input = self.pending_input.clone();
        self.add_amount(&input)
    }

    fn apply_amount(&mut self, amount: f64) -> AddOutcome {
        let was_complete = self.campaign.is_complete();
        let total = match self.campaign.add(amount) {
            Ok(total) => total,
            Err(e) => {
                tracing::debug!("Rejected amount {}: {}", amount, e);
                self.set_status(INVALID_AMOUNT_MESSAGE);
                return AddOutcome::Rejected;
            }
        };

        tracing::info!("Added {} (total {})", amount, total);
        self.set_status(format!(
            "Added ${}. Total: ${}",
            format_amount(amount),
            format_amount(total)
        ));
        self.pending_input.clear();

        if self.campaign.is_complete() {
            self.set_status(format!(
                "Congratulations! You have reached or exceeded the target of ${}!",
                format_amount(self.campaign.target())
            ));
            AddOutcome::Complete {
                crossed: !was_complete,
            }
        } else {
            AddOutcome::Added
        }
    }

    /// Replace the target with the parsed value of `input`
    pub fn set_target(&mut self, input: &str) -> bool {
        let parsed = parse_amount(input).and_then(|t| self.campaign.set_target(t).map(|_| t));
        match parsed {
            Ok(target) => {
                tracing::info!("Target set to {}", target);
                self.set_status(format!("Target amount set to ${}.", format_amount(target)));
                true
            }
            Err(e) => {
                tracing::debug!("Rejected target {:?}: {}", input, e);
                self.set_status(INVALID_TARGET_MESSAGE);
                false
            }
        }
    }

    /// Open the reset confirmation dialog
    pub fn request_reset(&mut self) {
        self.popup = Popup::ConfirmReset;
    }

    /// Perform the reset, but only while the confirmation dialog is showing
    pub fn confirm_reset(&mut self) -> bool {
        if !self.confirm_reset_visible() {
            return false;
        }
        self.reset();
        true
    }

    pub fn cancel_reset(&mut self) {
        if self.confirm_reset_visible() {
            self.popup = Popup::None;
        }
    }

    fn reset(&mut self) {
        self.popup = Popup::None;
        self.campaign.reset();
        tracing::info!("Campaign reset");
        self.set_status(RESET_MESSAGE);
    }

    fn open_target_prompt(&mut self) {
        self.target_input.clear();
        self.popup = Popup::SetTarget;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::Quit;
        }

        // Handle popups first
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return KeyOutcome::Continue;
        }

        if self.section == Section::Custom {
            if let Some(outcome) = self.handle_custom_key(key) {
                return outcome;
            }
        }

        self.handle_normal_key(key)
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::ConfirmReset => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm_reset();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel_reset(),
                _ => {}
            },
            Popup::SetTarget => match key.code {
                KeyCode::Enter => {
                    let input = std::mem::take(&mut self.target_input);
                    self.set_target(&input);
                    self.popup = Popup::None;
                }
                // Cancelling the prompt counts as an empty entry
                KeyCode::Esc => {
                    self.target_input.clear();
                    self.set_target("");
                    self.popup = Popup::None;
                }
                KeyCode::Backspace => {
                    self.target_input.pop();
                }
                KeyCode::Char(c) => push_numeric(&mut self.target_input, c),
                _ => {}
            },
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => {}
        }
    }

    /// Keys owned by the custom amount field; `None` falls through to normal handling
    fn handle_custom_key(&mut self, key: KeyEvent) -> Option<KeyOutcome> {
        match key.code {
            KeyCode::Enter => Some(outcome_of(self.add_custom_amount())),
            KeyCode::Backspace => {
                self.pending_input.pop();
                Some(KeyOutcome::Continue)
            }
            KeyCode::Esc => {
                self.section = Section::Presets;
                Some(KeyOutcome::Continue)
            }
            // Letters never act as shortcuts while typing an amount
            KeyCode::Char(c) => {
                push_numeric(&mut self.pending_input, c);
                Some(KeyOutcome::Continue)
            }
            _ => None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('q') if self.section != Section::Custom => return KeyOutcome::Quit,

            KeyCode::Tab => {
                self.section = match self.section {
                    Section::Presets => Section::Custom,
                    Section::Custom => Section::Controls,
                    Section::Controls => Section::Presets,
                };
            }
            KeyCode::BackTab => {
                self.section = match self.section {
                    Section::Presets => Section::Controls,
                    Section::Custom => Section::Presets,
                    Section::Controls => Section::Custom,
                };
            }

            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),

            KeyCode::Char(' ') | KeyCode::Enter => return self.activate(),

            // Preset shortcuts
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.selected_preset = index;
                return outcome_of(self.add_preset(index));
            }

            KeyCode::Char('c') => self.section = Section::Custom,
            KeyCode::Char('t') => self.open_target_prompt(),
            KeyCode::Char('r') => self.request_reset(),
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        KeyOutcome::Continue
    }

    fn move_left(&mut self) {
        match self.section {
            Section::Presets => {
                self.selected_preset = self
                    .selected_preset
                    .checked_sub(1)
                    .unwrap_or(PRESET_AMOUNTS.len() - 1);
            }
            Section::Controls => self.toggle_control(),
            Section::Custom => {}
        }
    }

    fn move_right(&mut self) {
        match self.section {
            Section::Presets => {
                self.selected_preset = (self.selected_preset + 1) % PRESET_AMOUNTS.len();
            }
            Section::Controls => self.toggle_control(),
            Section::Custom => {}
        }
    }

    fn toggle_control(&mut self) {
        self.selected_control = match self.selected_control {
            Control::SetTarget => Control::Reset,
            Control::Reset => Control::SetTarget,
        };
    }

    /// Enter/Space on the focused section
    fn activate(&mut self) -> KeyOutcome {
        match self.section {
            Section::Presets => outcome_of(self.add_preset(self.selected_preset)),
            Section::Custom => outcome_of(self.add_custom_amount()),
            Section::Controls => {
                match self.selected_control {
                    Control::SetTarget => self.open_target_prompt(),
                    Control::Reset => self.request_reset(),
                }
                KeyOutcome::Continue
            }
        }
    }
}

fn outcome_of(add: AddOutcome) -> KeyOutcome {
    match add {
        AddOutcome::Complete { crossed: true } => KeyOutcome::TargetCrossed,
        _ => KeyOutcome::Continue,
    }
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E')
}

fn push_numeric(buffer: &mut String, c: char) {
    if is_numeric_char(c) && buffer.len() < MAX_INPUT_LEN {
        buffer.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new("Auction Fundraiser", "Help us reach our goal!")
    }

    fn press(app: &mut App, code: KeyCode) -> KeyOutcome {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.campaign.raised(), 0.0);
        assert_eq!(app.campaign.target(), 100_000.0);
        assert_eq!(app.status_message, WELCOME_MESSAGE);
        assert!(app.pending_input.is_empty());
        assert!(!app.confirm_reset_visible());
    }

    #[test]
    fn test_add_then_reach_target() {
        let mut app = app();

        assert_eq!(app.add_amount("2500"), AddOutcome::Added);
        assert_eq!(app.campaign.raised(), 2500.0);
        assert_eq!(app.status_message, "Added $2500.00. Total: $2500.00");

        assert_eq!(
            app.add_amount("97500"),
            AddOutcome::Complete { crossed: true }
        );
        assert_eq!(app.campaign.raised(), 100_000.0);
        assert_eq!(
            app.status_message,
            "Congratulations! You have reached or exceeded the target of $100000.00!"
        );

        // Already over target: still complete, but not a fresh crossing
        assert_eq!(
            app.add_amount("1"),
            AddOutcome::Complete { crossed: false }
        );
        assert_eq!(app.campaign.raised(), 100_001.0);
    }

    #[test]
    fn test_invalid_amount_leaves_state() {
        let mut app = app();
        app.add_amount("100");
        app.pending_input = "abc".to_string();

        for bad in ["abc", "", "0", "-20", "inf"] {
            assert_eq!(app.add_amount(bad), AddOutcome::Rejected);
            assert_eq!(app.campaign.raised(), 100.0);
            assert_eq!(app.status_message, INVALID_AMOUNT_MESSAGE);
        }
        // Failed submissions keep whatever was typed
        assert_eq!(app.pending_input, "abc");
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let mut app = app();
        assert_eq!(
            app.add_amount("1e308"),
            AddOutcome::Complete { crossed: true }
        );
        assert_eq!(app.add_amount("1e308"), AddOutcome::Rejected);
        assert_eq!(app.campaign.raised(), 1e308);
        assert!(app.campaign.raised().is_finite());
        assert_eq!(app.status_message, INVALID_AMOUNT_MESSAGE);
    }

    #[test]
    fn test_preset_clears_pending_input() {
        let mut app = app();
        app.pending_input = "12".to_string();
        assert_eq!(app.add_preset(3), AddOutcome::Added);
        assert_eq!(app.campaign.raised(), 10_000.0);
        assert!(app.pending_input.is_empty());
        assert_eq!(app.add_preset(99), AddOutcome::Rejected);
    }

    #[test]
    fn test_set_target() {
        let mut app = app();
        assert!(app.set_target("5000"));
        assert_eq!(app.campaign.target(), 5000.0);
        assert_eq!(app.status_message, "Target amount set to $5000.00.");

        assert!(!app.set_target("nope"));
        assert!(!app.set_target("0"));
        assert_eq!(app.campaign.target(), 5000.0);
        assert_eq!(app.status_message, INVALID_TARGET_MESSAGE);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = app();
        app.add_amount("500");
        app.set_target("1000");

        assert!(!app.confirm_reset());
        assert_eq!(app.campaign.raised(), 500.0);

        app.request_reset();
        assert!(app.confirm_reset_visible());
        app.cancel_reset();
        assert!(!app.confirm_reset_visible());
        assert_eq!(app.campaign.raised(), 500.0);
        assert_eq!(app.campaign.target(), 1000.0);

        app.request_reset();
        assert!(app.confirm_reset());
        assert!(!app.confirm_reset_visible());
        assert_eq!(app.campaign.raised(), 0.0);
        assert_eq!(app.campaign.target(), 100_000.0);
        assert_eq!(app.status_message, RESET_MESSAGE);
    }

    #[test]
    fn test_preset_shortcut_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.campaign.raised(), 12_500.0);
        assert_eq!(app.selected_preset, 3);
    }

    #[test]
    fn test_preset_navigation_wraps() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_preset, 3);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_preset, 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.campaign.raised(), 2500.0);
    }

    #[test]
    fn test_custom_field_typing_and_submit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.section, Section::Custom);

        // Letters are not amount characters and 'q' must not quit while typing
        type_text(&mut app, "12x.5q");
        assert_eq!(app.pending_input, "12.5");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.pending_input, "12.0");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.campaign.raised(), 12.0);
        assert!(app.pending_input.is_empty());
        assert_eq!(app.status_message, "Added $12.00. Total: $12.00");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.section, Section::Presets);
    }

    #[test]
    fn test_custom_field_swallows_shortcut_letters() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        type_text(&mut app, "5trh?q");
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.section, Section::Custom);
        assert_eq!(app.pending_input, "5");

        // Navigation keys still leave the field
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.section, Section::Controls);
    }

    #[test]
    fn test_custom_field_rejects_malformed_amount() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        type_text(&mut app, "1..2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.campaign.raised(), 0.0);
        assert_eq!(app.status_message, INVALID_AMOUNT_MESSAGE);
        assert_eq!(app.pending_input, "1..2");
    }

    #[test]
    fn test_target_prompt_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.popup, Popup::SetTarget);
        type_text(&mut app, "250");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.campaign.target(), 250.0);

        // Esc keeps the target but reports the empty entry
        press(&mut app, KeyCode::Char('t'));
        type_text(&mut app, "9");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.campaign.target(), 250.0);
        assert!(app.target_input.is_empty());
        assert_eq!(app.status_message, INVALID_TARGET_MESSAGE);
    }

    #[test]
    fn test_reset_dialog_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));

        press(&mut app, KeyCode::Char('r'));
        assert!(app.confirm_reset_visible());
        // Other controls are inert while the dialog is up
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.campaign.raised(), 1000.0);
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.confirm_reset_visible());
        assert_eq!(app.campaign.raised(), 1000.0);

        // Reach the reset button through the controls row
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.section, Section::Controls);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_control, Control::Reset);
        press(&mut app, KeyCode::Enter);
        assert!(app.confirm_reset_visible());
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.campaign.raised(), 0.0);
        assert_eq!(app.status_message, RESET_MESSAGE);
    }

    #[test]
    fn test_target_crossing_outcome() {
        let mut app = app();
        app.set_target("3000");
        assert_eq!(press(&mut app, KeyCode::Char('2')), KeyOutcome::Continue);
        assert_eq!(press(&mut app, KeyCode::Char('1')), KeyOutcome::TargetCrossed);
        assert_eq!(press(&mut app, KeyCode::Char('1')), KeyOutcome::Continue);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), KeyOutcome::Quit);

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.popup, Popup::Help);
        assert_eq!(press(&mut app, KeyCode::Char('q')), KeyOutcome::Continue);
        assert_eq!(app.popup, Popup::None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.section = Section::Custom;
        assert_eq!(app.handle_key(ctrl_c), KeyOutcome::Quit);
    }
}
