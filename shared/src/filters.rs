//! Filter bar model: select options, filter values, active chips and the
//! in-memory leave query.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_utils::parse_iso_date;
use crate::period::SelectedPeriod;
use crate::{LeaveAdminScreenConfig, LeaveQuery, LeaveRequest, SortDirection};

/// First entry of every select, meaning "no filter"
pub const ALL_OPTION_LABEL: &str = "Tutti";
pub const SORT_FIELD: &str = "dataInizio";

/// Sort order select
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest start date first
    #[default]
    MostRecent,
    /// Oldest start date first
    LeastRecent,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::MostRecent, SortOrder::LeastRecent];

    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::MostRecent => "data-recente",
            SortOrder::LeastRecent => "urgenza-decrescente",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::MostRecent => "Richiesta più recente",
            SortOrder::LeastRecent => "Richiesta meno recente",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.key() == key)
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            SortOrder::MostRecent => SortDirection::Desc,
            SortOrder::LeastRecent => SortDirection::Asc,
        }
    }
}

/// One entry of a filter select
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub id: Option<i64>,
    pub name: String,
    pub color: Option<String>,
}

/// Where the current option lists came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionsSource {
    #[default]
    Empty,
    Config,
    Dataset,
}

/// Option lists of the type, department and task selects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub types: Vec<FilterOption>,
    pub departments: Vec<FilterOption>,
    pub tasks: Vec<FilterOption>,
    pub source: OptionsSource,
}

impl FilterOptions {
    /// Build the lists from the screen configuration.
    ///
    /// Entries without a name (or without an id, for types and departments)
    /// are skipped. Returns `None` when no list has a usable entry.
    pub fn from_config(config: &LeaveAdminScreenConfig) -> Option<Self> {
        let types: Vec<FilterOption> = config
            .types
            .iter()
            .filter_map(|entry| {
                Some(FilterOption {
                    id: Some(entry.type_id?),
                    name: non_blank(entry.type_name.as_deref())?,
                    color: None,
                })
            })
            .collect();

        let departments: Vec<FilterOption> = config
            .blocks
            .iter()
            .filter_map(|block| {
                Some(FilterOption {
                    id: Some(block.code?),
                    name: non_blank(block.pretty_name.as_deref())?,
                    color: block.color.clone(),
                })
            })
            .collect();

        let tasks: Vec<FilterOption> = config
            .tasks
            .iter()
            .filter_map(|task| {
                Some(FilterOption {
                    id: task.task_id,
                    name: non_blank(task.task_name.as_deref())?,
                    color: task.color.clone(),
                })
            })
            .collect();

        if types.is_empty() && departments.is_empty() && tasks.is_empty() {
            log::warn!("Screen configuration has no usable filter entries");
            return None;
        }

        Some(Self {
            types,
            departments,
            tasks,
            source: OptionsSource::Config,
        })
    }

    /// Fallback lists derived from loaded requests: unique names with
    /// their first known id, sorted case-insensitively.
    pub fn from_requests(requests: &[LeaveRequest]) -> Self {
        Self {
            types: unique_options(
                requests
                    .iter()
                    .map(|r| (Some(r.type_name.as_str()), Some(r.type_id), None)),
            ),
            departments: unique_options(requests.iter().map(|r| {
                (r.department_name(), r.department.id, r.department.color.as_deref())
            })),
            tasks: unique_options(
                requests
                    .iter()
                    .map(|r| (r.task.name.as_deref(), r.task.id, r.task.color.as_deref())),
            ),
            source: OptionsSource::Dataset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.departments.is_empty() && self.tasks.is_empty()
    }

    pub fn department_visible(&self) -> bool {
        self.departments.len() >= 2
    }

    pub fn task_visible(&self) -> bool {
        self.tasks.len() >= 2
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn unique_options<'a>(
    entries: impl Iterator<Item = (Option<&'a str>, Option<i64>, Option<&'a str>)>,
) -> Vec<FilterOption> {
    let mut by_name: BTreeMap<String, FilterOption> = BTreeMap::new();
    for (name, id, color) in entries {
        let Some(name) = non_blank(name) else {
            continue;
        };
        let option = by_name.entry(name.clone()).or_insert_with(|| FilterOption {
            id: None,
            name,
            color: None,
        });
        if option.id.is_none() {
            option.id = id;
        }
        if option.color.is_none() {
            option.color = color.map(str::to_string);
        }
    }

    let mut options: Vec<FilterOption> = by_name.into_values().collect();
    options.sort_by_key(|option| option.name.to_lowercase());
    options
}

/// Filter dimensions, one per chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Search,
    Type,
    Department,
    Task,
    Period,
    Sort,
}

/// Current values of the filter bar (the period lives in the state controller)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub type_name: Option<String>,
    pub department: Option<String>,
    pub task: Option<String>,
    pub sort: SortOrder,
}

impl FilterState {
    pub fn search_term(&self) -> Option<&str> {
        Some(self.search.trim()).filter(|term| !term.is_empty())
    }

    /// Drop values of selects that are hidden
    pub fn clear_hidden(&mut self, options: &FilterOptions) {
        if !options.department_visible() {
            self.department = None;
        }
        if !options.task_visible() {
            self.task = None;
        }
    }

    /// Reset a single dimension. The period is owned elsewhere.
    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Search => self.search.clear(),
            FilterKind::Type => self.type_name = None,
            FilterKind::Department => self.department = None,
            FilterKind::Task => self.task = None,
            FilterKind::Sort => self.sort = SortOrder::default(),
            FilterKind::Period => {}
        }
    }
}

/// A removable chip describing an active filter
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFilterChip {
    pub kind: FilterKind,
    pub label: &'static str,
    pub value: String,
}

/// Chips for every active dimension, in bar order
pub fn active_chips(
    filters: &FilterState,
    options: &FilterOptions,
    period: Option<&SelectedPeriod>,
) -> Vec<ActiveFilterChip> {
    let mut chips = Vec::new();

    if let Some(term) = filters.search_term() {
        chips.push(ActiveFilterChip {
            kind: FilterKind::Search,
            label: "Ricerca",
            value: term.to_string(),
        });
    }
    if let Some(type_name) = &filters.type_name {
        chips.push(ActiveFilterChip {
            kind: FilterKind::Type,
            label: "Tipologia",
            value: type_name.clone(),
        });
    }
    if let Some(department) = filters.department.as_ref().filter(|_| options.department_visible()) {
        chips.push(ActiveFilterChip {
            kind: FilterKind::Department,
            label: "Reparto",
            value: department.clone(),
        });
    }
    if let Some(task) = filters.task.as_ref().filter(|_| options.task_visible()) {
        chips.push(ActiveFilterChip {
            kind: FilterKind::Task,
            label: "Mansione",
            value: task.clone(),
        });
    }
    if let Some(period) = period {
        chips.push(ActiveFilterChip {
            kind: FilterKind::Period,
            label: "Periodo",
            value: period.chip_label(),
        });
    }
    if filters.sort != SortOrder::default() {
        chips.push(ActiveFilterChip {
            kind: FilterKind::Sort,
            label: "Ordinamento",
            value: filters.sort.label().to_string(),
        });
    }

    chips
}

/// Whether any dimension is active; drives the reset button
pub fn has_active_filters(
    filters: &FilterState,
    options: &FilterOptions,
    period: Option<&SelectedPeriod>,
) -> bool {
    !active_chips(filters, options, period).is_empty()
}

/// Translate the filter bar into query parameters.
///
/// Names are mapped to ids through the option lists, falling back to the
/// first loaded request carrying that name.
pub fn build_query(
    filters: &FilterState,
    options: &FilterOptions,
    period: Option<&SelectedPeriod>,
    dataset: &[LeaveRequest],
) -> LeaveQuery {
    let type_id = filters.type_name.as_deref().and_then(|name| {
        option_id(&options.types, name).or_else(|| {
            dataset
                .iter()
                .find(|request| request.type_name == name)
                .map(|request| request.type_id)
        })
    });

    let department_id = filters
        .department
        .as_deref()
        .filter(|_| options.department_visible())
        .and_then(|name| {
            option_id(&options.departments, name).or_else(|| {
                dataset
                    .iter()
                    .find(|request| request.department_name() == Some(name))
                    .and_then(|request| request.department.id)
            })
        });

    let task_id = filters
        .task
        .as_deref()
        .filter(|_| options.task_visible())
        .and_then(|name| {
            option_id(&options.tasks, name).or_else(|| {
                dataset
                    .iter()
                    .find(|request| request.task.name.as_deref() == Some(name))
                    .and_then(|request| request.task.id)
            })
        });

    let (data_inizio, data_fine) = match period.map(SelectedPeriod::query_bounds) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    LeaveQuery {
        nome: filters.search_term().map(str::to_string),
        type_id,
        department_id,
        task_id,
        data_inizio,
        data_fine,
        sort_by: Some(SORT_FIELD.to_string()),
        sort_order: Some(filters.sort.direction()),
    }
}

/// Query covering a single day, used when a day is clicked without a period
pub fn day_query(day: NaiveDate) -> LeaveQuery {
    let (start, end) = SelectedPeriod::single_day(day).query_bounds();
    LeaveQuery {
        data_inizio: Some(start),
        data_fine: Some(end),
        ..Default::default()
    }
}

fn option_id(options: &[FilterOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.id)
}

/// Run a leave query over loaded requests, the way the leaves endpoint would
pub fn run_leave_query(requests: &[LeaveRequest], query: &LeaveQuery) -> Vec<LeaveRequest> {
    let search = query
        .nome
        .as_deref()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty());
    let period = match (
        query.data_inizio.as_deref().and_then(parse_iso_date),
        query.data_fine.as_deref().and_then(parse_iso_date),
    ) {
        (Some(start), Some(end)) => Some(SelectedPeriod::new(start, end)),
        _ => None,
    };

    let mut results: Vec<LeaveRequest> = requests
        .iter()
        .filter(|request| request.is_sick_leave())
        .filter(|request| match &search {
            Some(term) => request.employee_name.to_lowercase().contains(term),
            None => true,
        })
        .filter(|request| query.type_id.map_or(true, |id| request.type_id == id))
        .filter(|request| query.department_id.map_or(true, |id| request.department.id == Some(id)))
        .filter(|request| query.task_id.map_or(true, |id| request.task.id == Some(id)))
        .filter(|request| match &period {
            Some(period) => request
                .effective_range()
                .is_some_and(|(start, end)| period.overlaps(start, end)),
            None => true,
        })
        .cloned()
        .collect();

    if query.sort_by.as_deref() == Some(SORT_FIELD) {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let start_of = |request: &LeaveRequest| {
            request
                .data_inizio
                .as_deref()
                .and_then(parse_iso_date)
                .unwrap_or(epoch)
        };
        match query.sort_order {
            Some(SortDirection::Desc) => results.sort_by(|a, b| start_of(b).cmp(&start_of(a))),
            _ => results.sort_by_key(|request| start_of(request)),
        }
    }

    log::debug!("Leave query returned {} of {} requests", results.len(), requests.len());
    results
}
