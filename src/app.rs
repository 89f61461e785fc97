//! Application state management for the missal CLI
//!
//! This module contains the main application state: the four views, keyboard
//! handling, and the cached resources that feed them. Fetches run on tokio
//! tasks; views read the latest [`FetchState`] of each resource every frame.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheFetchController, FetchState, KeyValueStore, Resource};
use crate::catalog::{categories, Favorites, PrayerFilter};
use crate::cli::StartupConfig;
use crate::config::Settings;
use crate::data::{
    bundled_explanation, bundled_prayer_of_day, bundled_prayers, bundled_readings,
    bundled_saint_of_day, saints_in_month, search_saints, DailyReadings, GeminiClient,
    GeminiError, Prayer, Saint, SaintOfDay,
};
use crate::rosary::{MysterySet, RosaryWalk};
use crate::sources::{Daily, Sources};

/// Upper bound for the readings scroll offset; the renderer clamps further
const MAX_READINGS_SCROLL: u16 = 500;

/// The top-level views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Prayers,
    Readings,
    Rosary,
    Saints,
}

impl View {
    /// Tab order
    pub const ALL: [View; 4] = [View::Prayers, View::Readings, View::Rosary, View::Saints];

    /// Parses a view name (case-insensitive, a few aliases accepted)
    pub fn parse(s: &str) -> Option<View> {
        match s.trim().to_lowercase().as_str() {
            "prayers" | "prayer" => Some(View::Prayers),
            "readings" | "reading" | "mass" => Some(View::Readings),
            "rosary" | "mysteries" => Some(View::Rosary),
            "saints" | "saint" => Some(View::Saints),
            _ => None,
        }
    }

    /// The view to the right, wrapping around
    pub fn next(self) -> View {
        let index = View::ALL.iter().position(|v| *v == self).unwrap_or(0);
        View::ALL[(index + 1) % View::ALL.len()]
    }

    /// The view to the left, wrapping around
    pub fn previous(self) -> View {
        let index = View::ALL.iter().position(|v| *v == self).unwrap_or(0);
        View::ALL[(index + View::ALL.len() - 1) % View::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Prayers => "Prayers",
            View::Readings => "Daily Readings",
            View::Rosary => "Rosary",
            View::Saints => "Saints",
        }
    }
}

/// Whether keys edit a search query or drive the view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// What a view should show for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<T> {
    /// Nothing to show yet
    Loading,
    /// Provider or cache content
    Live(T),
    /// Bundled content, with the provider error that caused the fallback
    Offline { value: T, error: Option<String> },
}

impl<T> Content<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Content::Loading => None,
            Content::Live(value) | Content::Offline { value, .. } => Some(value),
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Content::Offline { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Content::Offline { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

/// Maps a fetch state to displayable content, falling back to `bundled`
fn resolve<T>(state: FetchState<T>, offline: bool, bundled: impl FnOnce() -> T) -> Content<T> {
    if offline {
        return Content::Offline {
            value: bundled(),
            error: None,
        };
    }

    match state {
        FetchState::Idle | FetchState::Loading => Content::Loading,
        FetchState::Success(value) => Content::Live(value),
        FetchState::Error(error) => Content::Offline {
            value: bundled(),
            error: Some(error),
        },
    }
}

/// Runs a load or refetch of `resource` on a tokio task
fn spawn_fetch<T>(resource: &Resource<T>, force_refresh: bool)
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let resource = resource.clone();
    tokio::spawn(async move {
        if force_refresh {
            resource.refetch().await;
        } else {
            resource.load().await;
        }
    });
}

/// Main application struct managing state and data
pub struct App {
    /// Current view
    pub view: View,
    /// Keyboard mode; search edits the query of the current view
    pub input_mode: InputMode,
    /// Search, category and favorites-only criteria
    pub filter: PrayerFilter,
    /// Index into the filtered prayer list
    pub selected_index: usize,
    /// Whether the selected prayer's text is shown
    pub expanded: bool,
    /// Scroll offset of the readings view
    pub readings_scroll: u16,
    /// Index into the day's readings, for explanations
    pub selected_reading: usize,
    /// Whether the selected reading's explanation is shown
    pub show_explanation: bool,
    pub rosary: RosaryWalk,
    /// Month browsed in the saints view, 1 to 12
    pub saints_month: u32,
    /// Search across the whole calendar; empty shows `saints_month`
    pub saints_query: String,
    /// Index into the visible saints
    pub saints_selected: usize,
    pub favorites: Favorites,
    /// One-line message for the footer, cleared on the next key
    pub status_message: Option<String>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    offline: bool,
    refresh_on_start: bool,
    store: Arc<dyn KeyValueStore>,
    sources: Sources,
    prayers: Resource<Vec<Prayer>>,
    daily: Daily,
    explanations: HashMap<String, Resource<String>>,
}

impl App {
    /// Creates the application backed by the Gemini provider
    pub fn new(
        settings: &Settings,
        store: Arc<dyn KeyValueStore>,
        startup: StartupConfig,
    ) -> Result<Self, GeminiError> {
        let client = GeminiClient::with_timeout(settings.api_key.clone(), settings.request_timeout)?
            .with_model(settings.model.clone())
            .with_base_url(settings.base_url.clone());
        let controller = CacheFetchController::new(Arc::clone(&store));
        let sources = Sources::new(controller, Arc::new(client), settings);

        Ok(Self::with_sources(
            store,
            sources,
            Local::now().date_naive(),
            startup,
            settings.offline,
        ))
    }

    /// Creates the application over prebuilt sources, as of `today`
    pub fn with_sources(
        store: Arc<dyn KeyValueStore>,
        sources: Sources,
        today: NaiveDate,
        startup: StartupConfig,
        offline: bool,
    ) -> Self {
        let favorites = Favorites::load(store.as_ref());
        let prayers = sources.prayers();
        let daily = sources.daily(today);

        Self {
            view: startup.initial_view,
            input_mode: InputMode::Normal,
            filter: PrayerFilter::default(),
            selected_index: 0,
            expanded: false,
            readings_scroll: 0,
            selected_reading: 0,
            show_explanation: false,
            rosary: RosaryWalk::new(MysterySet::for_weekday(today.weekday())),
            saints_month: today.month(),
            saints_query: String::new(),
            saints_selected: 0,
            favorites,
            status_message: None,
            show_help: false,
            should_quit: false,
            offline,
            refresh_on_start: startup.force_refresh,
            store,
            sources,
            prayers,
            daily,
            explanations: HashMap::new(),
        }
    }

    /// Kicks off the initial loads; must run inside a tokio runtime
    pub fn start(&self) {
        if self.offline {
            info!("offline mode, showing bundled content");
            return;
        }
        spawn_fetch(&self.prayers, self.refresh_on_start);
        self.spawn_daily(self.refresh_on_start);
    }

    fn spawn_daily(&self, force_refresh: bool) {
        spawn_fetch(&self.daily.readings, force_refresh);
        spawn_fetch(&self.daily.prayer_of_day, force_refresh);
        spawn_fetch(&self.daily.saint_of_day, force_refresh);
    }

    /// Called once per event-loop iteration
    pub fn tick(&mut self) {
        self.roll_day_to(Local::now().date_naive());
    }

    /// Switches the day-keyed resources to `date` when the day has changed
    pub fn roll_day_to(&mut self, date: NaiveDate) {
        if date == self.daily.date {
            return;
        }
        info!(from = %self.daily.date, to = %date, "day changed, switching daily content");
        self.daily = self.sources.daily(date);
        self.readings_scroll = 0;
        self.selected_reading = 0;
        self.show_explanation = false;
        if !self.offline {
            self.spawn_daily(false);
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// The day whose readings, prayer and saint are shown
    pub fn today(&self) -> NaiveDate {
        self.daily.date
    }

    pub fn prayers(&self) -> &Resource<Vec<Prayer>> {
        &self.prayers
    }

    pub fn readings(&self) -> &Resource<DailyReadings> {
        &self.daily.readings
    }

    pub fn prayer_of_day(&self) -> &Resource<Prayer> {
        &self.daily.prayer_of_day
    }

    pub fn saint_of_day(&self) -> &Resource<SaintOfDay> {
        &self.daily.saint_of_day
    }

    /// Prayers to show, live or bundled
    pub fn prayers_content(&self) -> Content<Vec<Prayer>> {
        resolve(self.prayers.state(), self.offline, bundled_prayers)
    }

    /// Readings to show, live or bundled
    pub fn readings_content(&self) -> Content<DailyReadings> {
        let date = self.daily.date;
        resolve(self.daily.readings.state(), self.offline, || bundled_readings(date))
    }

    pub fn prayer_of_day_content(&self) -> Content<Prayer> {
        resolve(self.daily.prayer_of_day.state(), self.offline, bundled_prayer_of_day)
    }

    pub fn saint_of_day_content(&self) -> Content<SaintOfDay> {
        let date = self.daily.date;
        resolve(self.daily.saint_of_day.state(), self.offline, || {
            bundled_saint_of_day(date)
        })
    }

    /// Citation of the selected reading, once readings are available
    pub fn selected_citation(&self) -> Option<String> {
        let content = self.readings_content();
        let readings = content.value()?;
        readings
            .sections()
            .get(self.selected_reading)
            .map(|(_, reading)| reading.citation.clone())
    }

    /// Explanation of the selected reading, when one has been asked for
    pub fn explanation_content(&self) -> Option<Content<String>> {
        if !self.show_explanation {
            return None;
        }
        let citation = self.selected_citation()?;
        let state = self
            .explanations
            .get(&citation)
            .map(Resource::state)
            .unwrap_or(FetchState::Idle);
        Some(resolve(state, self.offline, || bundled_explanation(&citation)))
    }

    /// The filtered prayer list
    pub fn visible_prayers(&self) -> Vec<Prayer> {
        self.prayers_content()
            .value()
            .map(|prayers| {
                self.filter
                    .apply(prayers, &self.favorites)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Category choices for the current prayer list
    pub fn prayer_categories(&self) -> Vec<String> {
        self.prayers_content()
            .value()
            .map(|prayers| categories(prayers))
            .unwrap_or_else(|| categories(&[]))
    }

    /// Returns the currently selected prayer, if any
    pub fn selected_prayer(&self) -> Option<Prayer> {
        self.visible_prayers().into_iter().nth(self.selected_index)
    }

    /// Saints matching the search, or those of the browsed month
    pub fn visible_saints(&self) -> Vec<&'static Saint> {
        if self.saints_query.trim().is_empty() {
            saints_in_month(self.saints_month)
        } else {
            search_saints(&self.saints_query)
        }
    }

    pub fn selected_saint(&self) -> Option<&'static Saint> {
        self.visible_saints().get(self.saints_selected).copied()
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit; `Esc` collapses an expanded prayer first
    /// - `Tab`/`Shift+Tab`: Next / previous view
    /// - `r`: Refetch the current view, ignoring the cache
    /// - `?`: Toggle help
    /// - Prayers: `Up`/`k`, `Down`/`j`, `Enter` expand, `/` search,
    ///   `c` category, `f` favorite, `F` favorites only
    /// - Readings: `Up`/`k`, `Down`/`j`, `g`/`G` top/bottom,
    ///   `n`/`p` select reading, `e` explain
    /// - Rosary: `Space`/`l` next bead, `h` previous bead,
    ///   `n`/`p` decade, `m` other mysteries, `t` today's mysteries
    /// - Saints: `Up`/`k`, `Down`/`j`, `h`/`l` month, `t` this month, `/` search
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key_event);
            return;
        }

        self.status_message = None;

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.view == View::Prayers && self.expanded {
                    self.expanded = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => {
                self.view = self.view.next();
            }
            KeyCode::BackTab => {
                self.view = self.view.previous();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('r') => {
                self.refetch_current();
            }
            _ => match self.view {
                View::Prayers => self.handle_prayers_key(key_event),
                View::Readings => self.handle_readings_key(key_event),
                View::Rosary => self.handle_rosary_key(key_event),
                View::Saints => self.handle_saints_key(key_event),
            },
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.search_query_mut().clear();
                self.reset_selection();
            }
            KeyCode::Backspace => {
                self.search_query_mut().pop();
                self.reset_selection();
            }
            KeyCode::Char(c) => {
                self.search_query_mut().push(c);
                self.reset_selection();
            }
            _ => {}
        }
    }

    /// The query edited in search mode
    fn search_query_mut(&mut self) -> &mut String {
        match self.view {
            View::Saints => &mut self.saints_query,
            _ => &mut self.filter.query,
        }
    }

    fn handle_prayers_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Enter => {
                if self.selected_prayer().is_some() {
                    self.expanded = !self.expanded;
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('c') => {
                let categories = self.prayer_categories();
                self.filter.cycle_category(&categories);
                self.reset_selection();
            }
            KeyCode::Char('f') => {
                self.toggle_selected_favorite();
            }
            KeyCode::Char('F') => {
                self.filter.favorites_only = !self.filter.favorites_only;
                self.reset_selection();
            }
            _ => {}
        }
    }

    fn handle_readings_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.readings_scroll = self.readings_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.readings_scroll < MAX_READINGS_SCROLL {
                    self.readings_scroll += 1;
                }
            }
            KeyCode::Char('g') => {
                self.readings_scroll = 0;
            }
            KeyCode::Char('G') => {
                self.readings_scroll = MAX_READINGS_SCROLL;
            }
            KeyCode::Char('n') => {
                self.select_reading(1);
            }
            KeyCode::Char('p') => {
                self.select_reading(-1);
            }
            KeyCode::Char('e') => {
                self.toggle_explanation();
            }
            _ => {}
        }
    }

    fn handle_rosary_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => {
                self.rosary.advance();
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
                self.rosary.back();
            }
            KeyCode::Char('n') => {
                self.rosary.next_decade();
            }
            KeyCode::Char('p') => {
                self.rosary.previous_decade();
            }
            KeyCode::Char('m') => {
                let set = self.rosary.set.next();
                self.rosary.restart(set);
            }
            KeyCode::Char('t') => {
                self.rosary
                    .restart(MysterySet::for_weekday(self.daily.date.weekday()));
            }
            _ => {}
        }
    }

    fn handle_saints_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let count = self.visible_saints().len();
                if count > 0 {
                    self.saints_selected = (self.saints_selected + count - 1) % count;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.visible_saints().len();
                if count > 0 {
                    self.saints_selected = (self.saints_selected + 1) % count;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.saints_month = if self.saints_month <= 1 { 12 } else { self.saints_month - 1 };
                self.reset_selection();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.saints_month = self.saints_month % 12 + 1;
                self.reset_selection();
            }
            KeyCode::Char('t') => {
                self.saints_month = self.daily.date.month();
                self.reset_selection();
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            _ => {}
        }
    }

    /// Moves the reading selection by `step`, wrapping around
    fn select_reading(&mut self, step: isize) {
        let count = self
            .readings_content()
            .value()
            .map(|readings| readings.sections().len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        let next = (self.selected_reading as isize + step).rem_euclid(count as isize);
        self.selected_reading = next as usize;
        if self.show_explanation {
            self.request_explanation();
        }
    }

    fn toggle_explanation(&mut self) {
        if self.selected_citation().is_none() {
            return;
        }
        self.show_explanation = !self.show_explanation;
        if self.show_explanation {
            self.request_explanation();
        }
    }

    /// Starts loading the selected reading's explanation unless already asked
    fn request_explanation(&mut self) {
        if self.offline {
            return;
        }
        let Some(citation) = self.selected_citation() else {
            return;
        };
        if self.explanations.contains_key(&citation) {
            return;
        }
        debug!(%citation, "requesting explanation");
        let resource = self.sources.explanation(&citation);
        spawn_fetch(&resource, false);
        self.explanations.insert(citation, resource);
    }

    /// Refetches the resources behind the current view
    fn refetch_current(&mut self) {
        if self.offline {
            self.status_message = Some("Offline mode: showing bundled content".to_string());
            return;
        }
        match self.view {
            View::Prayers => spawn_fetch(&self.prayers, true),
            View::Readings => {
                spawn_fetch(&self.daily.readings, true);
                spawn_fetch(&self.daily.prayer_of_day, true);
                let shown = self
                    .selected_citation()
                    .filter(|_| self.show_explanation)
                    .and_then(|citation| self.explanations.get(&citation));
                if let Some(explanation) = shown {
                    spawn_fetch(explanation, true);
                }
            }
            View::Saints => spawn_fetch(&self.daily.saint_of_day, true),
            View::Rosary => {
                self.status_message = Some("The rosary is always available offline".to_string());
            }
        }
    }

    /// Flips the favorite flag of the selected prayer and persists the set
    fn toggle_selected_favorite(&mut self) {
        let Some(prayer) = self.selected_prayer() else {
            return;
        };

        let added = self.favorites.toggle(&prayer.title);
        if let Err(e) = self.favorites.save(self.store.as_ref()) {
            warn!(error = %e, "could not save favorites");
            self.status_message = Some(format!("Could not save favorites: {}", e));
            return;
        }

        self.status_message = Some(if added {
            format!("Added \"{}\" to favorites", prayer.title)
        } else {
            format!("Removed \"{}\" from favorites", prayer.title)
        });

        // The prayer may have left the favorites-only list
        let count = self.visible_prayers().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    fn reset_selection(&mut self) {
        match self.view {
            View::Saints => self.saints_selected = 0,
            _ => {
                self.selected_index = 0;
                self.expanded = false;
            }
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.visible_prayers().len();
        if count == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 || self.selected_index >= count {
            count - 1
        } else {
            self.selected_index - 1
        };
        self.expanded = false;
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.visible_prayers().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
        self.expanded = false;
    }
}
