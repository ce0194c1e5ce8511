//! Application state of the leave administration screen.
//!
//! [`AdminState`] is the single owner of the loaded dataset, the cached
//! filter options, the filter values, the selected period and the status of
//! the filter bar. UI callbacks mutate it through the methods below; async
//! work is described by [`FetchTicket`]s and its results are handed back
//! with the ticket token so stale responses can be dropped.

use chrono::{Datelike, NaiveDate};

use crate::calendar::{parse_year_input, CalendarMonth, CalendarService, YearRange};
use crate::config::AdminConfig;
use crate::error::LeaveAdminError;
use crate::filters::{
    active_chips, build_query, day_query, has_active_filters, ActiveFilterChip, FilterKind,
    FilterOptions, FilterState, SortOrder,
};
use crate::list::{layout_requests, ListLayout};
use crate::period::{PeriodPreset, PeriodSelector, PeriodTransition, SelectedPeriod};
use crate::{LeaveAdminScreenConfig, LeaveQuery, LeaveRequest};

pub const SELECT_PERIOD_MESSAGE: &str =
    "Seleziona un periodo dal calendario per visualizzare i giustificativi.";

/// Status of the filter bar and the list area
#[derive(Debug, Clone, PartialEq)]
pub enum FilterBarStatus {
    /// No period selected; filters disabled
    AwaitingPeriod,
    Loading,
    /// Filtered list for the selected period
    Ready,
    /// Requests covering a single clicked day, without a period
    DayPreview(NaiveDate),
    Failed(String),
}

/// Work the UI has to start after a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Nothing,
    RefreshList,
    LoadDay(NaiveDate),
}

/// A pending list fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub token: u64,
    pub query: LeaveQuery,
}

/// What the list area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<'a> {
    SelectPeriod,
    Loading,
    Error(String),
    Rows(ListLayout<'a>),
}

/// List area content for a status snapshot and its rows
pub fn list_view_for<'a>(status: &FilterBarStatus, results: &'a [LeaveRequest]) -> ListView<'a> {
    match status {
        FilterBarStatus::AwaitingPeriod => ListView::SelectPeriod,
        FilterBarStatus::Loading => ListView::Loading,
        FilterBarStatus::Failed(message) => ListView::Error(format!("Errore nel caricamento: {}", message)),
        FilterBarStatus::Ready | FilterBarStatus::DayPreview(_) => ListView::Rows(layout_requests(results)),
    }
}

#[derive(Debug, Clone)]
pub struct AdminState {
    config: AdminConfig,
    today: NaiveDate,
    dataset: Vec<LeaveRequest>,
    results: Vec<LeaveRequest>,
    cached_options: Option<FilterOptions>,
    options: FilterOptions,
    filters: FilterState,
    selector: PeriodSelector,
    period: Option<SelectedPeriod>,
    active_preset: Option<PeriodPreset>,
    displayed_years: YearRange,
    status: FilterBarStatus,
    filters_unlocked: bool,
    open_request: Option<i64>,
    default_applied: bool,
    fetch_token: u64,
}

impl AdminState {
    pub fn new(config: AdminConfig, today: NaiveDate) -> Self {
        Self {
            config,
            today,
            dataset: Vec::new(),
            results: Vec::new(),
            cached_options: None,
            options: FilterOptions::default(),
            filters: FilterState::default(),
            selector: PeriodSelector::default(),
            period: None,
            active_preset: None,
            displayed_years: YearRange::single(today.year()),
            status: FilterBarStatus::AwaitingPeriod,
            filters_unlocked: false,
            open_request: None,
            default_applied: false,
            fetch_token: 0,
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn dataset(&self) -> &[LeaveRequest] {
        &self.dataset
    }

    pub fn results(&self) -> &[LeaveRequest] {
        &self.results
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn period(&self) -> Option<&SelectedPeriod> {
        self.period.as_ref()
    }

    pub fn selector(&self) -> PeriodSelector {
        self.selector
    }

    pub fn active_preset(&self) -> Option<PeriodPreset> {
        self.active_preset
    }

    pub fn displayed_years(&self) -> YearRange {
        self.displayed_years
    }

    pub fn status(&self) -> &FilterBarStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FilterBarStatus::Loading
    }

    /// Filters unlock after a successful fetch and stay usable while a
    /// refresh is in flight. Failures and a missing period lock them.
    pub fn filters_enabled(&self) -> bool {
        self.filters_unlocked
    }

    pub fn chips(&self) -> Vec<ActiveFilterChip> {
        active_chips(&self.filters, &self.options, self.period.as_ref())
    }

    pub fn reset_enabled(&self) -> bool {
        has_active_filters(&self.filters, &self.options, self.period.as_ref())
    }

    // ---- ingestion -------------------------------------------------------

    /// Store the loaded dataset. Options fall back to the dataset while no
    /// configuration is cached.
    pub fn load_dataset(&mut self, requests: Vec<LeaveRequest>) {
        log::info!("Dataset loaded with {} requests", requests.len());
        self.dataset = requests;
        if self.cached_options.is_none() {
            self.options = FilterOptions::from_requests(&self.dataset);
            self.filters.clear_hidden(&self.options);
        }
    }

    /// Apply the screen configuration fetch result
    pub fn apply_screen_config(&mut self, result: Result<LeaveAdminScreenConfig, LeaveAdminError>) {
        let options = match result {
            Ok(config) => FilterOptions::from_config(&config),
            Err(err) => {
                log::warn!("Screen configuration unavailable: {}", err);
                None
            }
        };

        match options {
            Some(options) => {
                self.cached_options = Some(options.clone());
                self.options = options;
            }
            None if self.cached_options.is_none() => {
                self.options = FilterOptions::from_requests(&self.dataset);
            }
            None => {}
        }
        self.filters.clear_hidden(&self.options);
    }

    /// Apply "today .. today" once, after the first non-empty dataset
    pub fn apply_default_period(&mut self) -> FollowUp {
        if self.default_applied || self.dataset.is_empty() {
            return FollowUp::Nothing;
        }
        self.default_applied = true;
        self.apply_period(SelectedPeriod::single_day(self.today));
        self.ensure_period_visible();
        FollowUp::RefreshList
    }

    // ---- period ----------------------------------------------------------

    pub fn click_day(&mut self, day: NaiveDate) -> FollowUp {
        match self.selector.click(day) {
            PeriodTransition::Started(period) => {
                self.period = Some(period);
                self.active_preset = None;
                FollowUp::Nothing
            }
            PeriodTransition::Applied(period) => {
                self.active_preset = None;
                self.apply_period(period);
                FollowUp::RefreshList
            }
            PeriodTransition::Restarted(day) => {
                self.period = None;
                self.active_preset = None;
                self.results.clear();
                self.status = FilterBarStatus::AwaitingPeriod;
                self.filters_unlocked = false;
                FollowUp::LoadDay(day)
            }
        }
    }

    pub fn apply_preset(&mut self, preset: PeriodPreset) -> FollowUp {
        let period = preset.range(self.today);
        log::debug!("Preset {} → {}", preset.key(), period.chip_label());
        self.apply_period(period);
        self.active_preset = Some(preset);
        self.ensure_period_visible();
        FollowUp::RefreshList
    }

    pub fn clear_period(&mut self) {
        self.selector.clear();
        self.period = None;
        self.active_preset = None;
        self.results.clear();
        self.status = FilterBarStatus::AwaitingPeriod;
        self.filters_unlocked = false;
    }

    fn apply_period(&mut self, period: SelectedPeriod) {
        self.selector.set_range(&period);
        self.period = Some(period);
    }

    fn ensure_period_visible(&mut self) {
        if let Some(period) = &self.period {
            let year = period.start_date().year();
            if year < self.displayed_years.from || year > self.displayed_years.to {
                self.displayed_years = YearRange::single(year);
            }
        }
    }

    // ---- calendar --------------------------------------------------------

    pub fn set_displayed_years(&mut self, years: YearRange) {
        self.displayed_years = YearRange::new(
            years.from.clamp(self.config.min_year, self.config.max_year),
            years.to.clamp(self.config.min_year, self.config.max_year),
        );
    }

    /// Parse and apply the year picker text input
    pub fn apply_year_input(&mut self, input: &str) -> Result<YearRange, LeaveAdminError> {
        let years = parse_year_input(input, self.config.min_year, self.config.max_year)?;
        self.displayed_years = years;
        Ok(years)
    }

    pub fn calendar_years(&self) -> YearRange {
        CalendarService::display_years(self.displayed_years, self.period.as_ref())
    }

    pub fn calendar_months(&self) -> Vec<CalendarMonth> {
        CalendarService::new(self.today).generate_calendar(
            self.calendar_years(),
            &self.dataset,
            &self.selector.highlight(),
            self.open_request(),
        )
    }

    // ---- filters ---------------------------------------------------------

    /// Update the search text; the caller debounces the refresh
    pub fn set_search(&mut self, text: String) {
        self.filters.search = text;
    }

    pub fn set_type(&mut self, type_name: Option<String>) -> FollowUp {
        self.filters.type_name = type_name.filter(|name| !name.is_empty());
        FollowUp::RefreshList
    }

    pub fn set_department(&mut self, department: Option<String>) -> FollowUp {
        self.filters.department = department
            .filter(|name| !name.is_empty())
            .filter(|_| self.options.department_visible());
        FollowUp::RefreshList
    }

    pub fn set_task(&mut self, task: Option<String>) -> FollowUp {
        self.filters.task = task
            .filter(|name| !name.is_empty())
            .filter(|_| self.options.task_visible());
        FollowUp::RefreshList
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> FollowUp {
        self.filters.sort = sort;
        FollowUp::RefreshList
    }

    /// Chip remove button
    pub fn remove_filter(&mut self, kind: FilterKind) -> FollowUp {
        match kind {
            FilterKind::Period => self.clear_period(),
            other => self.filters.clear(other),
        }
        FollowUp::RefreshList
    }

    /// Clear every filter including the period and restore the cached options
    pub fn reset_all(&mut self) -> FollowUp {
        self.filters = FilterState::default();
        self.clear_period();
        self.options = match &self.cached_options {
            Some(cached) => cached.clone(),
            None => FilterOptions::from_requests(&self.dataset),
        };
        self.open_request = None;
        FollowUp::RefreshList
    }

    // ---- fetching --------------------------------------------------------

    /// Start a list refresh. Without a period nothing is fetched and the
    /// list asks the user to pick one.
    pub fn begin_refresh(&mut self) -> Option<FetchTicket> {
        let Some(period) = self.period else {
            self.status = FilterBarStatus::AwaitingPeriod;
            self.filters_unlocked = false;
            self.results.clear();
            return None;
        };

        self.fetch_token += 1;
        self.status = FilterBarStatus::Loading;
        Some(FetchTicket {
            token: self.fetch_token,
            query: build_query(&self.filters, &self.options, Some(&period), &self.dataset),
        })
    }

    /// Store a refresh result; returns false when it was stale
    pub fn finish_refresh(&mut self, token: u64, result: Result<Vec<LeaveRequest>, LeaveAdminError>) -> bool {
        if token != self.fetch_token || self.period.is_none() {
            log::debug!("Discarding stale list response {}", token);
            return false;
        }

        match result {
            Ok(requests) => {
                self.results = requests;
                self.status = FilterBarStatus::Ready;
                self.filters_unlocked = true;
                self.keep_open_request_visible();
            }
            Err(err) => {
                log::error!("Leave fetch failed: {}", err);
                self.results.clear();
                self.filters_unlocked = false;
                self.status = FilterBarStatus::Failed(err.to_string());
            }
        }
        true
    }

    /// Start loading the requests of a single day, only while no period is set
    pub fn begin_day_load(&mut self, day: NaiveDate) -> Option<FetchTicket> {
        if self.period.is_some() {
            return None;
        }
        self.fetch_token += 1;
        self.status = FilterBarStatus::Loading;
        Some(FetchTicket {
            token: self.fetch_token,
            query: day_query(day),
        })
    }

    /// Store a day load result, unless a period was applied in the meantime
    pub fn finish_day_load(
        &mut self,
        token: u64,
        day: NaiveDate,
        result: Result<Vec<LeaveRequest>, LeaveAdminError>,
    ) -> bool {
        if token != self.fetch_token || self.period.is_some() {
            log::debug!("Discarding day load for {} (period selected meanwhile)", day);
            return false;
        }

        match result {
            Ok(requests) => {
                if self.cached_options.is_none() && self.options.is_empty() {
                    self.options = FilterOptions::from_requests(&requests);
                }
                self.filters_unlocked = !requests.is_empty();
                self.results = requests;
                self.status = FilterBarStatus::DayPreview(day);
                self.keep_open_request_visible();
            }
            Err(err) => {
                log::error!("Day load failed: {}", err);
                self.results.clear();
                self.filters_unlocked = false;
                self.status = FilterBarStatus::Failed(err.to_string());
            }
        }
        true
    }

    pub fn list_view(&self) -> ListView<'_> {
        list_view_for(&self.status, &self.results)
    }

    // ---- detail card -----------------------------------------------------

    /// Open the card of a request, or close it when it is already open
    pub fn toggle_request(&mut self, id: i64) {
        self.open_request = if self.open_request == Some(id) { None } else { Some(id) };
    }

    pub fn open_request_id(&self) -> Option<i64> {
        self.open_request
    }

    pub fn open_request(&self) -> Option<&LeaveRequest> {
        let id = self.open_request?;
        self.results.iter().find(|request| request.id == id)
    }

    fn keep_open_request_visible(&mut self) {
        if let Some(id) = self.open_request {
            if !self.results.iter().any(|request| request.id == id) {
                self.open_request = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::run_leave_query;
    use crate::{ConfigBlock, Department, LeaveStatus, Task};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(id: i64, name: &str, start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_name: name.to_string(),
            fiscal_code: None,
            profile_pic: None,
            department: Department::default(),
            task: Task::default(),
            type_id: 1,
            type_name: "MALATTIA".to_string(),
            status: LeaveStatus::Approved,
            data_inizio: Some(start.to_string()),
            data_fine: Some(end.to_string()),
            note: None,
            moorea_obj: None,
            certificate: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn loaded_state() -> AdminState {
        let mut state = AdminState::new(AdminConfig::default(), date(2025, 3, 12));
        state.load_dataset(vec![
            request(1, "Mario Rossi", "2025-03-10", "2025-03-14"),
            request(2, "Anna Verdi", "2025-03-20", "2025-03-21"),
        ]);
        state
    }

    fn run(state: &mut AdminState) {
        let ticket = state.begin_refresh().expect("period selected");
        let rows = run_leave_query(state.dataset(), &ticket.query);
        assert!(state.finish_refresh(ticket.token, Ok(rows)));
    }

    #[test]
    fn test_filters_disabled_until_period_fetch_succeeds() {
        let mut state = loaded_state();
        assert!(!state.filters_enabled());
        assert_eq!(state.list_view(), ListView::SelectPeriod);
        assert!(state.begin_refresh().is_none());

        assert_eq!(state.apply_default_period(), FollowUp::RefreshList);
        assert_eq!(state.apply_default_period(), FollowUp::Nothing);

        let ticket = state.begin_refresh().unwrap();
        assert!(state.is_loading());
        assert!(!state.filters_enabled());
        assert_eq!(ticket.query.data_inizio.as_deref(), Some("2025-03-12"));

        let rows = run_leave_query(state.dataset(), &ticket.query);
        assert!(state.finish_refresh(ticket.token, Ok(rows)));
        assert!(state.filters_enabled());
        assert_eq!(state.results().len(), 1);
    }

    #[test]
    fn test_fetch_failure_disables_filters() {
        let mut state = loaded_state();
        state.apply_preset(PeriodPreset::Next15Days);
        let ticket = state.begin_refresh().unwrap();
        state.finish_refresh(ticket.token, Err(LeaveAdminError::Network("offline".to_string())));

        assert!(!state.filters_enabled());
        match state.list_view() {
            ListView::Error(message) => assert_eq!(message, "Errore nel caricamento: Errore di rete: offline"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_filters_stay_enabled_while_search_refreshes() {
        let mut state = loaded_state();
        state.apply_preset(PeriodPreset::NextMonth);
        run(&mut state);
        assert!(state.filters_enabled());

        state.set_search("ross".to_string());
        let ticket = state.begin_refresh().unwrap();
        assert!(state.is_loading());
        assert!(state.filters_enabled());

        state.finish_refresh(ticket.token, Err(LeaveAdminError::Network("offline".to_string())));
        assert!(!state.filters_enabled());

        state.clear_period();
        assert!(!state.filters_enabled());
    }

    #[test]
    fn test_reset_enabled_follows_active_filters() {
        let mut state = loaded_state();
        assert!(!state.reset_enabled());

        state.set_sort(SortOrder::LeastRecent);
        assert!(state.reset_enabled());

        state.reset_all();
        assert!(!state.reset_enabled());
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let mut state = loaded_state();
        state.apply_preset(PeriodPreset::LastMonth);
        let first = state.begin_refresh().unwrap();
        state.apply_preset(PeriodPreset::Next15Days);
        let second = state.begin_refresh().unwrap();

        assert!(!state.finish_refresh(first.token, Ok(vec![])));
        assert!(state.is_loading());
        assert!(state.finish_refresh(second.token, Ok(vec![])));
        assert_eq!(state.status(), &FilterBarStatus::Ready);
    }

    #[test]
    fn test_three_click_cycle_and_day_load() {
        let mut state = loaded_state();

        assert_eq!(state.click_day(date(2025, 3, 10)), FollowUp::Nothing);
        assert_eq!(state.period().map(|p| p.end_date()), Some(date(2025, 3, 10)));

        assert_eq!(state.click_day(date(2025, 3, 5)), FollowUp::RefreshList);
        let period = state.period().copied().unwrap();
        assert_eq!(period.start_date(), date(2025, 3, 5));
        assert_eq!(period.end_date(), date(2025, 3, 10));
        run(&mut state);

        assert_eq!(state.click_day(date(2025, 3, 20)), FollowUp::LoadDay(date(2025, 3, 20)));
        assert!(state.period().is_none());
        assert!(!state.filters_enabled());

        let ticket = state.begin_day_load(date(2025, 3, 20)).unwrap();
        let rows = run_leave_query(state.dataset(), &ticket.query);
        assert!(state.finish_day_load(ticket.token, date(2025, 3, 20), Ok(rows)));
        assert_eq!(state.status(), &FilterBarStatus::DayPreview(date(2025, 3, 20)));
        assert_eq!(state.results().len(), 1);
        assert!(state.filters_enabled());
    }

    #[test]
    fn test_day_load_discarded_when_period_applied_meanwhile() {
        let mut state = loaded_state();
        state.click_day(date(2025, 3, 1));
        state.click_day(date(2025, 3, 2));
        state.click_day(date(2025, 3, 11));

        let day_ticket = state.begin_day_load(date(2025, 3, 11)).unwrap();
        state.apply_preset(PeriodPreset::LastYear);
        let refresh = state.begin_refresh().unwrap();

        assert!(!state.finish_day_load(day_ticket.token, date(2025, 3, 11), Ok(vec![])));
        assert!(state.begin_day_load(date(2025, 3, 11)).is_none());
        assert!(state.finish_refresh(refresh.token, Ok(vec![])));
        assert_eq!(state.active_preset(), Some(PeriodPreset::LastYear));
        assert_eq!(state.displayed_years(), YearRange::single(2024));
    }

    #[test]
    fn test_config_options_are_cached_and_restored_on_reset() {
        let mut state = loaded_state();
        state.apply_screen_config(Ok(LeaveAdminScreenConfig {
            types: vec![],
            blocks: vec![
                ConfigBlock { code: Some(1), pretty_name: Some("Sala".to_string()), color: None },
                ConfigBlock { code: Some(2), pretty_name: Some("Bar".to_string()), color: None },
            ],
            tasks: vec![],
        }));
        assert!(state.options().department_visible());

        // a later dataset does not regenerate the options
        state.load_dataset(vec![request(9, "Nuovo", "2025-03-01", "2025-03-02")]);
        assert_eq!(state.options().departments.len(), 2);

        state.apply_preset(PeriodPreset::LastMonth);
        state.set_department(Some("Bar".to_string()));
        state.set_sort(SortOrder::LeastRecent);
        assert!(state.reset_enabled());

        assert_eq!(state.reset_all(), FollowUp::RefreshList);
        assert!(state.period().is_none());
        assert_eq!(state.filters(), &FilterState::default());
        assert_eq!(state.options().departments.len(), 2);
        assert!(!state.reset_enabled());
        assert!(state.begin_refresh().is_none());
    }

    #[test]
    fn test_config_failure_falls_back_to_dataset() {
        let mut state = loaded_state();
        state.apply_screen_config(Err(LeaveAdminError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        }));
        assert_eq!(state.options().types.len(), 1);
        assert!(!state.options().department_visible());
        assert_eq!(state.set_department(Some("Sala".to_string())), FollowUp::RefreshList);
        assert!(state.filters().department.is_none());
    }

    #[test]
    fn test_removing_period_chip_clears_selection() {
        let mut state = loaded_state();
        state.apply_preset(PeriodPreset::NextWeek);
        assert!(state.chips().iter().any(|chip| chip.kind == FilterKind::Period));

        state.remove_filter(FilterKind::Period);
        assert!(state.period().is_none());
        assert!(state.active_preset().is_none());
        assert_eq!(state.selector(), PeriodSelector::Empty);
    }

    #[test]
    fn test_calendar_follows_period_years() {
        let mut state = AdminState::new(AdminConfig::default(), date(2025, 12, 20));
        state.click_day(date(2025, 12, 28));
        state.click_day(date(2026, 1, 3));
        assert_eq!(state.calendar_months().len(), 24);

        assert!(state.apply_year_input("abc").is_err());
        assert_eq!(state.apply_year_input("2030").unwrap(), YearRange::single(2030));
        // the cross-year period still wins
        assert_eq!(state.calendar_years(), YearRange { from: 2025, to: 2026 });

        state.clear_period();
        assert_eq!(state.calendar_years(), YearRange::single(2030));
        assert_eq!(state.calendar_months().len(), 12);
    }

    #[test]
    fn test_toggle_request_card() {
        let mut state = loaded_state();
        state.apply_preset(PeriodPreset::Next15Days);
        run(&mut state);

        let id = state.results()[0].id;
        state.toggle_request(id);
        assert_eq!(state.open_request().map(|r| r.id), Some(id));
        state.toggle_request(id);
        assert!(state.open_request().is_none());
    }
}
