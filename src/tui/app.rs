use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::ListState;
use std::time::Instant;

use crate::analytics::Analytics;
use crate::error::PlannerError;
use crate::models::{CalendarEntry, Notification, Task};
use crate::projection::{shift_days, CycleProjection, DateRange};
use crate::tui::error::TuiError;
use crate::utils::{parse_key_binding, today, ParsedKeyBinding};
use crate::{Config, Database, Planner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Calendar,
    Notifications,
    Analytics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Tasks, Tab::Calendar, Tab::Notifications, Tab::Analytics];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Calendar => "Calendar",
            Tab::Notifications => "Notifications",
            Tab::Analytics => "Analytics",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    NextTab,
    PrevTab,
    Up,
    Down,
    PrevMonth,
    NextMonth,
}

/// Config key bindings resolved to key codes
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(ParsedKeyBinding, Action)>,
}

impl KeyMap {
    pub fn from_config(config: &Config) -> Result<Self, TuiError> {
        let kb = &config.key_bindings;
        let pairs = [
            (&kb.quit, Action::Quit),
            (&kb.refresh, Action::Refresh),
            (&kb.next_tab, Action::NextTab),
            (&kb.prev_tab, Action::PrevTab),
            (&kb.list_up, Action::Up),
            (&kb.list_down, Action::Down),
            (&kb.prev_month, Action::PrevMonth),
            (&kb.next_month, Action::NextMonth),
        ];

        let mut bindings = Vec::with_capacity(pairs.len() + 2);
        for (key, action) in pairs {
            let parsed = parse_key_binding(key).map_err(TuiError::KeyBindingError)?;
            bindings.push((parsed, action));
        }
        // Arrow keys always move the selection
        bindings.push((ParsedKeyBinding { key_code: KeyCode::Up, requires_ctrl: false }, Action::Up));
        bindings.push((ParsedKeyBinding { key_code: KeyCode::Down, requires_ctrl: false }, Action::Down));

        Ok(Self { bindings })
    }

    pub fn action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(code, modifiers))
            .map(|(_, action)| *action)
    }

    /// Key hint for an action, as written in the config
    pub fn hint(&self, action: Action) -> String {
        self.bindings
            .iter()
            .find(|(_, a)| *a == action)
            .map(|(binding, _)| describe_key(binding))
            .unwrap_or_default()
    }
}

fn describe_key(binding: &ParsedKeyBinding) -> String {
    let key = match binding.key_code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "S-Tab".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        other => format!("{:?}", other),
    };
    if binding.requires_ctrl {
        format!("Ctrl+{}", key)
    } else {
        key
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub selected_index: usize,
    pub list_state: ListState,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

/// Read-only dashboard state for one owner
pub struct App {
    pub config: Config,
    pub planner: Planner<Database>,
    pub owner: String,
    pub keys: KeyMap,
    pub today: NaiveDate,
    /// Re-read the clock on every reload; off when `today` was pinned
    pub follow_clock: bool,
    /// Month shown on the Calendar tab
    pub month: DateRange,

    pub tasks: Vec<Task>,
    pub calendar: Vec<CalendarEntry>,
    pub notifications: Vec<Notification>,
    pub projection: Option<CycleProjection>,
    pub analytics: Analytics,

    pub ui: UiState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, planner: Planner<Database>, owner: String) -> Result<Self, TuiError> {
        let mut app = Self::with_today(config, planner, owner, today())?;
        app.follow_clock = true;
        Ok(app)
    }

    pub fn with_today(
        config: Config,
        planner: Planner<Database>,
        owner: String,
        today: NaiveDate,
    ) -> Result<Self, TuiError> {
        let keys = KeyMap::from_config(&config)?;
        let mut app = Self {
            config,
            planner,
            owner,
            keys,
            today,
            follow_clock: false,
            month: DateRange::month_of(today),
            tasks: Vec::new(),
            calendar: Vec::new(),
            notifications: Vec::new(),
            projection: None,
            analytics: Analytics::default(),
            ui: UiState {
                current_tab: Tab::Tasks,
                selected_index: 0,
                list_state: ListState::default(),
            },
            status: StatusState::default(),
        };
        app.load_data()?;
        app.sync_list_state();
        Ok(app)
    }

    /// Fetch everything the tabs show from the store
    pub fn load_data(&mut self) -> Result<(), PlannerError> {
        if self.follow_clock {
            self.today = today();
        }
        let dashboard = self.planner.dashboard(&self.owner, self.today)?;
        self.tasks = dashboard.tasks;
        self.notifications = dashboard.notifications;
        self.projection = dashboard.projection;
        self.analytics = self.planner.analytics(&self.owner, self.today)?;
        self.load_calendar()?;
        self.adjust_selected_index();
        tracing::debug!(owner = %self.owner, tasks = self.tasks.len(), "dashboard loaded");
        Ok(())
    }

    fn load_calendar(&mut self) -> Result<(), PlannerError> {
        let mut entries = self.planner.calendar(&self.owner, &self.month)?;
        entries.sort_by_key(|e| e.start);
        self.calendar = entries;
        Ok(())
    }

    /// Rows in the list of the current tab
    pub fn current_len(&self) -> usize {
        match self.ui.current_tab {
            Tab::Tasks => self.tasks.len(),
            Tab::Calendar => self.calendar.len(),
            Tab::Notifications => self.notifications.len(),
            Tab::Analytics => 0,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        if self.ui.current_tab != Tab::Tasks {
            return None;
        }
        self.tasks.get(self.ui.selected_index)
    }

    pub fn sync_list_state(&mut self) {
        if self.current_len() == 0 {
            self.ui.list_state.select(None);
        } else {
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn adjust_selected_index(&mut self) {
        let len = self.current_len();
        if self.ui.selected_index >= len {
            self.ui.selected_index = len.saturating_sub(1);
        }
        self.sync_list_state();
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index + 1 < self.current_len() {
            self.ui.selected_index += 1;
            self.sync_list_state();
        }
    }

    pub fn switch_tab(&mut self, new_tab: Tab) {
        self.ui.current_tab = new_tab;
        self.ui.selected_index = 0;
        self.sync_list_state();
    }

    pub fn show_previous_month(&mut self) -> Result<(), PlannerError> {
        self.month = DateRange::month_of(shift_days(self.month.start(), -1));
        self.load_calendar()?;
        self.ui.selected_index = 0;
        self.sync_list_state();
        Ok(())
    }

    pub fn show_next_month(&mut self) -> Result<(), PlannerError> {
        self.month = DateRange::month_of(self.month.end());
        self.load_calendar()?;
        self.ui.selected_index = 0;
        self.sync_list_state();
        Ok(())
    }

    /// Apply one action; returns true when the app should quit
    pub fn apply(&mut self, action: Action) -> bool {
        let result = match action {
            Action::Quit => return true,
            Action::Refresh => self.load_data().map(|_| {
                self.set_status_message("Reloaded".to_string());
            }),
            Action::NextTab => {
                self.switch_tab(self.ui.current_tab.next());
                Ok(())
            }
            Action::PrevTab => {
                self.switch_tab(self.ui.current_tab.prev());
                Ok(())
            }
            Action::Up => {
                self.move_selection_up();
                Ok(())
            }
            Action::Down => {
                self.move_selection_down();
                Ok(())
            }
            Action::PrevMonth if self.ui.current_tab == Tab::Calendar => self.show_previous_month(),
            Action::NextMonth if self.ui.current_tab == Tab::Calendar => self.show_next_month(),
            Action::PrevMonth | Action::NextMonth => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "dashboard action failed");
            self.set_status_message(format!("Error: {}", e));
        }
        false
    }

    pub fn key_hints(&self) -> Vec<String> {
        let mut hints = vec![
            format!("{}: quit", self.keys.hint(Action::Quit)),
            format!("{}: reload", self.keys.hint(Action::Refresh)),
            format!("{}/{}: tabs", self.keys.hint(Action::NextTab), self.keys.hint(Action::PrevTab)),
        ];
        if self.ui.current_tab == Tab::Calendar {
            hints.push(format!(
                "{}/{}: month",
                self.keys.hint(Action::PrevMonth),
                self.keys.hint(Action::NextMonth)
            ));
        }
        if self.current_len() > 0 {
            hints.push(format!("{}/{}: move", self.keys.hint(Action::Up), self.keys.hint(Action::Down)));
        }
        hints
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Drop the status message after a few seconds
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventDraft, Priority, TaskDraft};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_with_data() -> App {
        let planner = Planner::new(Database::open_in_memory().unwrap());
        let now = Utc::now();
        planner
            .add_task("ada", &TaskDraft::new("low", Priority::Low, Some(date(2024, 3, 5))), now)
            .unwrap();
        planner
            .add_task("ada", &TaskDraft::new("high", Priority::High, Some(date(2024, 3, 20))), now)
            .unwrap();
        planner
            .add_event("ada", &EventDraft::new("run", date(2024, 4, 2), "Workout"), now)
            .unwrap();
        App::with_today(Config::default(), planner, "ada".to_string(), date(2024, 3, 1)).unwrap()
    }

    #[test]
    fn loads_tasks_in_priority_order_and_current_month() {
        let app = app_with_data();
        let titles: Vec<&str> = app.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "low"]);
        assert_eq!(app.month.start(), date(2024, 3, 1));
        assert_eq!(app.calendar.len(), 2);
        assert!(app.calendar.windows(2).all(|w| w[0].start <= w[1].start));
        assert_eq!(app.selected_task().map(|t| t.title.as_str()), Some("high"));
    }

    #[test]
    fn reload_picks_up_the_current_date_when_following_the_clock() {
        let mut app = app_with_data();
        app.load_data().unwrap();
        assert_eq!(app.today, date(2024, 3, 1));

        app.follow_clock = true;
        app.load_data().unwrap();
        assert_eq!(app.today, today());
    }

    #[test]
    fn month_navigation_reloads_calendar() {
        let mut app = app_with_data();
        app.apply(Action::NextMonth);
        // only applies on the calendar tab
        assert_eq!(app.month.start(), date(2024, 3, 1));

        app.switch_tab(Tab::Calendar);
        app.apply(Action::NextMonth);
        assert_eq!(app.month.start(), date(2024, 4, 1));
        assert_eq!(app.calendar.len(), 1);
        assert_eq!(app.calendar[0].title, "run");

        app.apply(Action::PrevMonth);
        app.apply(Action::PrevMonth);
        assert_eq!(app.month.start(), date(2024, 2, 1));
        assert!(app.calendar.is_empty());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut app = app_with_data();
        app.apply(Action::Up);
        assert_eq!(app.ui.selected_index, 0);
        app.apply(Action::Down);
        app.apply(Action::Down);
        assert_eq!(app.ui.selected_index, 1);

        app.switch_tab(Tab::Analytics);
        assert_eq!(app.ui.list_state.selected(), None);
    }

    #[test]
    fn tabs_wrap_and_quit_is_reported() {
        let mut app = app_with_data();
        app.apply(Action::PrevTab);
        assert_eq!(app.ui.current_tab, Tab::Analytics);
        app.apply(Action::NextTab);
        assert_eq!(app.ui.current_tab, Tab::Tasks);
        assert!(app.apply(Action::Quit));
    }

    #[test]
    fn key_map_follows_config() {
        let mut config = Config::default();
        config.key_bindings.quit = "Ctrl+x".to_string();
        let keys = KeyMap::from_config(&config).unwrap();
        assert_eq!(keys.action(KeyCode::Char('x'), KeyModifiers::CONTROL), Some(Action::Quit));
        assert_eq!(keys.action(KeyCode::Char('q'), KeyModifiers::NONE), None);
        assert_eq!(keys.action(KeyCode::Down, KeyModifiers::NONE), Some(Action::Down));

        config.key_bindings.refresh = "NoSuchKey".to_string();
        assert!(matches!(KeyMap::from_config(&config), Err(TuiError::KeyBindingError(_))));
    }
}
