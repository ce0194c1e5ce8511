use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use gloo::timers::callback::Timeout;
use shared::calendar::{CalendarMonth, YearRange};
use shared::filters::{ActiveFilterChip, FilterKind, FilterOptions, FilterState, SortOrder};
use shared::period::PeriodPreset;
use shared::state::{AdminState, FilterBarStatus, FollowUp};
use shared::{AdminConfig, LeaveRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::date_utils::{scroll_to_month, scroll_to_month_after_render, today};
use crate::services::logging::Logger;

const COMPONENT: &str = "leave-admin";

/// Render snapshot of the admin screen
#[derive(Clone)]
pub struct LeaveAdminState {
    pub months: Vec<CalendarMonth>,
    pub displayed_years: YearRange,
    pub min_year: i32,
    pub max_year: i32,
    pub year_picker_window: i32,
    pub year_input_error: Option<String>,
    pub active_preset: Option<PeriodPreset>,
    pub options: FilterOptions,
    pub filters: FilterState,
    pub chips: Vec<ActiveFilterChip>,
    pub filters_enabled: bool,
    pub reset_enabled: bool,
    pub status: FilterBarStatus,
    pub results: Vec<LeaveRequest>,
    pub open_request: Option<i64>,
}

pub struct UseLeaveAdminResult {
    pub state: LeaveAdminState,
    pub actions: UseLeaveAdminActions,
}

#[derive(Clone)]
pub struct UseLeaveAdminActions {
    pub on_day_click: Callback<NaiveDate>,
    pub on_preset: Callback<PeriodPreset>,
    pub on_search_input: Callback<String>,
    pub on_type_change: Callback<Option<String>>,
    pub on_department_change: Callback<Option<String>>,
    pub on_task_change: Callback<Option<String>>,
    pub on_sort_change: Callback<SortOrder>,
    pub on_remove_filter: Callback<FilterKind>,
    pub on_reset: Callback<()>,
    pub on_toggle_request: Callback<i64>,
    pub on_years_change: Callback<YearRange>,
    pub on_year_input: Callback<String>,
    pub on_scroll_today: Callback<()>,
}

/// Shared handles used by callbacks and the async tasks they spawn
#[derive(Clone)]
struct AdminContext {
    state: Rc<RefCell<AdminState>>,
    api: ApiClient,
    update: Callback<()>,
}

impl AdminContext {
    fn run(&self, follow_up: FollowUp) {
        match follow_up {
            FollowUp::Nothing => {}
            FollowUp::RefreshList => self.refresh(),
            FollowUp::LoadDay(day) => self.load_day(day),
        }
        self.update.emit(());
    }

    fn refresh(&self) {
        let ticket = self.state.borrow_mut().begin_refresh();
        let Some(ticket) = ticket else {
            Logger::debug_with_component(COMPONENT, "No period selected, list not refreshed");
            return;
        };
        let dataset = self.state.borrow().dataset().to_vec();

        let ctx = self.clone();
        spawn_local(async move {
            let result = ctx.api.query_leaves(&dataset, &ticket.query).await;
            if let Ok(rows) = &result {
                Logger::debug_with_component(COMPONENT, &format!("🔎 Query returned {} requests", rows.len()));
            }
            let applied = ctx.state.borrow_mut().finish_refresh(ticket.token, result);
            if applied {
                ctx.update.emit(());
            }
        });
    }

    fn load_day(&self, day: NaiveDate) {
        let ticket = self.state.borrow_mut().begin_day_load(day);
        let Some(ticket) = ticket else {
            return;
        };
        let dataset = self.state.borrow().dataset().to_vec();

        let ctx = self.clone();
        spawn_local(async move {
            let result = ctx.api.query_leaves(&dataset, &ticket.query).await;
            let applied = ctx.state.borrow_mut().finish_day_load(ticket.token, day, result);
            if applied {
                ctx.update.emit(());
            } else {
                Logger::debug_with_component(COMPONENT, &format!("Day load for {} discarded", day));
            }
        });
    }

    /// Dataset, then screen configuration, then the default period
    async fn bootstrap(self) {
        match self.api.load_dataset().await {
            Ok(requests) => self.state.borrow_mut().load_dataset(requests),
            Err(err) => Logger::error_with_component(
                COMPONENT,
                &format!("❌ Impossibile caricare il dataset: {}", err),
            ),
        }
        self.update.emit(());

        let config = self.api.fetch_screen_config().await;
        if let Err(err) = &config {
            Logger::warn_with_component(COMPONENT, &format!("Configurazione non disponibile: {}", err));
        }
        self.state.borrow_mut().apply_screen_config(config);

        let follow_up = self.state.borrow_mut().apply_default_period();
        self.run(follow_up);

        let today = self.state.borrow().today();
        scroll_to_month_after_render(today.year(), today.month0(), true);
    }
}

#[hook]
pub fn use_leave_admin(config: &AdminConfig, api_client: &ApiClient) -> UseLeaveAdminResult {
    let state = {
        let config = config.clone();
        use_mut_ref(move || AdminState::new(config, today()))
    };
    let year_input_error = use_state(|| Option::<String>::None);
    let search_timer = use_mut_ref(|| Option::<Timeout>::None);
    let force_update = use_force_update();

    let ctx = AdminContext {
        state: state.clone(),
        api: api_client.clone(),
        update: Callback::from(move |_| force_update.force_update()),
    };

    // Initial load
    {
        let ctx = ctx.clone();
        use_effect_with((), move |_| {
            Logger::info_with_component(COMPONENT, "🗓️ Avvio schermata giustificativi");
            spawn_local(ctx.bootstrap());
            || ()
        });
    }

    let on_day_click = {
        let ctx = ctx.clone();
        use_callback((), move |day: NaiveDate, _| {
            let follow_up = ctx.state.borrow_mut().click_day(day);
            ctx.run(follow_up);
        })
    };

    let on_preset = {
        let ctx = ctx.clone();
        use_callback((), move |preset: PeriodPreset, _| {
            let follow_up = ctx.state.borrow_mut().apply_preset(preset);
            ctx.run(follow_up);
            let start = ctx.state.borrow().period().map(|period| period.start_date());
            if let Some(start) = start {
                scroll_to_month_after_render(start.year(), start.month0(), false);
            }
        })
    };

    let on_search_input = {
        let ctx = ctx.clone();
        let search_timer = search_timer.clone();
        use_callback((), move |text: String, _| {
            ctx.state.borrow_mut().set_search(text);
            ctx.update.emit(());

            let delay = ctx.state.borrow().config().search_debounce_ms;
            let pending = ctx.clone();
            // replacing the timer drops (and cancels) the previous one
            *search_timer.borrow_mut() = Some(Timeout::new(delay, move || {
                pending.run(FollowUp::RefreshList);
            }));
        })
    };

    let on_type_change = {
        let ctx = ctx.clone();
        use_callback((), move |value: Option<String>, _| {
            let follow_up = ctx.state.borrow_mut().set_type(value);
            ctx.run(follow_up);
        })
    };

    let on_department_change = {
        let ctx = ctx.clone();
        use_callback((), move |value: Option<String>, _| {
            let follow_up = ctx.state.borrow_mut().set_department(value);
            ctx.run(follow_up);
        })
    };

    let on_task_change = {
        let ctx = ctx.clone();
        use_callback((), move |value: Option<String>, _| {
            let follow_up = ctx.state.borrow_mut().set_task(value);
            ctx.run(follow_up);
        })
    };

    let on_sort_change = {
        let ctx = ctx.clone();
        use_callback((), move |sort: SortOrder, _| {
            let follow_up = ctx.state.borrow_mut().set_sort(sort);
            ctx.run(follow_up);
        })
    };

    let on_remove_filter = {
        let ctx = ctx.clone();
        let search_timer = search_timer.clone();
        use_callback((), move |kind: FilterKind, _| {
            if kind == FilterKind::Search {
                search_timer.borrow_mut().take();
            }
            let follow_up = ctx.state.borrow_mut().remove_filter(kind);
            ctx.run(follow_up);
        })
    };

    let on_reset = {
        let ctx = ctx.clone();
        let search_timer = search_timer.clone();
        use_callback((), move |_: (), _| {
            search_timer.borrow_mut().take();
            Logger::info_with_component(COMPONENT, "🧹 Reset di tutti i filtri");
            let follow_up = ctx.state.borrow_mut().reset_all();
            ctx.run(follow_up);
        })
    };

    let on_toggle_request = {
        let ctx = ctx.clone();
        use_callback((), move |id: i64, _| {
            ctx.state.borrow_mut().toggle_request(id);
            ctx.update.emit(());
        })
    };

    let on_years_change = {
        let ctx = ctx.clone();
        let year_input_error = year_input_error.clone();
        use_callback((), move |years: YearRange, _| {
            ctx.state.borrow_mut().set_displayed_years(years);
            year_input_error.set(None);
            ctx.update.emit(());
        })
    };

    let on_year_input = {
        let ctx = ctx.clone();
        let year_input_error = year_input_error.clone();
        use_callback((), move |text: String, _| {
            let result = ctx.state.borrow_mut().apply_year_input(&text);
            match result {
                Ok(years) => {
                    year_input_error.set(None);
                    ctx.update.emit(());
                    scroll_to_month_after_render(years.from, 0, false);
                }
                Err(err) => year_input_error.set(Some(err.to_string())),
            }
        })
    };

    let on_scroll_today = {
        let ctx = ctx.clone();
        use_callback((), move |_: (), _| {
            let today = ctx.state.borrow().today();
            if !scroll_to_month(today.year(), today.month0(), false) {
                // current year not on screen: show it first
                ctx.state.borrow_mut().set_displayed_years(YearRange::single(today.year()));
                ctx.update.emit(());
                scroll_to_month_after_render(today.year(), today.month0(), false);
            }
        })
    };

    let snapshot = {
        let admin = state.borrow();
        let config = admin.config();
        LeaveAdminState {
            months: admin.calendar_months(),
            displayed_years: admin.calendar_years(),
            min_year: config.min_year,
            max_year: config.max_year,
            year_picker_window: config.year_picker_window,
            year_input_error: (*year_input_error).clone(),
            active_preset: admin.active_preset(),
            options: admin.options().clone(),
            filters: admin.filters().clone(),
            chips: admin.chips(),
            filters_enabled: admin.filters_enabled(),
            reset_enabled: admin.reset_enabled(),
            status: admin.status().clone(),
            results: admin.results().to_vec(),
            open_request: admin.open_request_id(),
        }
    };

    let actions = UseLeaveAdminActions {
        on_day_click,
        on_preset,
        on_search_input,
        on_type_change,
        on_department_change,
        on_task_change,
        on_sort_change,
        on_remove_filter,
        on_reset,
        on_toggle_request,
        on_years_change,
        on_year_input,
        on_scroll_today,
    };

    UseLeaveAdminResult {
        state: snapshot,
        actions,
    }
}
