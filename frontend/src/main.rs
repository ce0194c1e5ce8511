use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::{ApprovalList, Calendar, FilterBar, PeriodPresets, YearPicker};
use hooks::use_leave_admin;
use services::api::{runtime_config, ApiClient};
use services::logging::Logger;
use shared::state::FilterBarStatus;

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| runtime_config());
    let api_client = ApiClient::from_config(&config);
    let admin = use_leave_admin(&config, &api_client);
    let state = admin.state;
    let actions = admin.actions;

    html! {
        <div class="leave-admin">
            <header class="page-header">
                <h1>{"Giustificativi di malattia"}</h1>
            </header>

            <div class="leave-admin-layout">
                <aside class="calendar-panel">
                    <div class="calendar-toolbar">
                        <YearPicker
                            displayed={state.displayed_years}
                            min_year={state.min_year}
                            max_year={state.max_year}
                            window_size={state.year_picker_window}
                            error={state.year_input_error.clone()}
                            on_select={actions.on_years_change.clone()}
                            on_input={actions.on_year_input.clone()}
                            on_today={actions.on_scroll_today.clone()}
                        />
                        <PeriodPresets
                            active={state.active_preset}
                            on_select={actions.on_preset.clone()}
                        />
                    </div>
                    <Calendar
                        months={state.months.clone()}
                        on_day_click={actions.on_day_click.clone()}
                    />
                </aside>

                <main class="requests-panel">
                    <FilterBar
                        options={state.options.clone()}
                        filters={state.filters.clone()}
                        chips={state.chips.clone()}
                        enabled={state.filters_enabled}
                        loading={state.status == FilterBarStatus::Loading}
                        reset_enabled={state.reset_enabled}
                        on_search_input={actions.on_search_input.clone()}
                        on_type_change={actions.on_type_change.clone()}
                        on_department_change={actions.on_department_change.clone()}
                        on_task_change={actions.on_task_change.clone()}
                        on_sort_change={actions.on_sort_change.clone()}
                        on_remove_filter={actions.on_remove_filter.clone()}
                        on_reset={actions.on_reset.clone()}
                    />
                    <ApprovalList
                        status={state.status.clone()}
                        results={state.results.clone()}
                        open_request={state.open_request}
                        on_toggle_request={actions.on_toggle_request.clone()}
                    />
                </main>
            </div>
        </div>
    }
}

fn main() {
    Logger::init();
    yew::Renderer::<App>::new().render();
}
