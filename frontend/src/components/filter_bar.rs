use shared::filters::{ActiveFilterChip, FilterKind, FilterOption, FilterOptions, FilterState, SortOrder, ALL_OPTION_LABEL};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub options: FilterOptions,
    pub filters: FilterState,
    pub chips: Vec<ActiveFilterChip>,
    /// Disabled until a period fetch succeeds
    pub enabled: bool,
    pub loading: bool,
    pub reset_enabled: bool,
    pub on_search_input: Callback<String>,
    pub on_type_change: Callback<Option<String>>,
    pub on_department_change: Callback<Option<String>>,
    pub on_task_change: Callback<Option<String>>,
    pub on_sort_change: Callback<SortOrder>,
    pub on_remove_filter: Callback<FilterKind>,
    pub on_reset: Callback<()>,
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let disabled = !props.enabled;

    let on_search = {
        let on_search_input = props.on_search_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_search_input.emit(input.value());
        })
    };

    let on_sort = {
        let on_sort_change = props.on_sort_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(sort) = SortOrder::from_key(&select.value()) {
                on_sort_change.emit(sort);
            }
        })
    };

    let on_reset = {
        let on_reset = props.on_reset.clone();
        Callback::from(move |_: MouseEvent| on_reset.emit(()))
    };

    html! {
        <div class={classes!("filter-bar", disabled.then_some("disabled"))}>
            <div class="filter-row">
                <div class="filter-field search-field">
                    <i class="bi bi-search"></i>
                    <input
                        type="text"
                        class="filter-search"
                        placeholder="Cerca per nome"
                        value={props.filters.search.clone()}
                        {disabled}
                        oninput={on_search}
                    />
                </div>

                {option_select("Tipologia", &props.options.types, props.filters.type_name.as_deref(), disabled, &props.on_type_change)}

                {if props.options.department_visible() {
                    option_select("Reparto", &props.options.departments, props.filters.department.as_deref(), disabled, &props.on_department_change)
                } else {
                    html! {}
                }}

                {if props.options.task_visible() {
                    option_select("Mansione", &props.options.tasks, props.filters.task.as_deref(), disabled, &props.on_task_change)
                } else {
                    html! {}
                }}

                <div class="filter-field">
                    <label>{"Ordina per"}</label>
                    <select class="filter-select" {disabled} onchange={on_sort}>
                        {for SortOrder::ALL.into_iter().map(|sort| html! {
                            <option value={sort.key()} selected={props.filters.sort == sort}>{sort.label()}</option>
                        })}
                    </select>
                </div>

                <button class="reset-filters" disabled={!props.reset_enabled} onclick={on_reset}>
                    <i class="bi bi-arrow-counterclockwise"></i>
                    {"Reset"}
                </button>

                {if props.loading {
                    html! {
                        <div class="spinner-border spinner-border-sm filter-spinner" role="status">
                            <span class="visually-hidden">{"Caricamento..."}</span>
                        </div>
                    }
                } else {
                    html! {}
                }}
            </div>

            {if props.chips.is_empty() {
                html! {}
            } else {
                html! {
                    <div class="active-filters">
                        {for props.chips.iter().map(|chip| render_chip(chip, &props.on_remove_filter))}
                    </div>
                }
            }}
        </div>
    }
}

/// `Tutti` first, then one option per name
fn option_select(
    label: &'static str,
    options: &[FilterOption],
    selected: Option<&str>,
    disabled: bool,
    on_change: &Callback<Option<String>>,
) -> Html {
    let onchange = {
        let on_change = on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            on_change.emit((!value.is_empty()).then_some(value));
        })
    };

    html! {
        <div class="filter-field">
            <label>{label}</label>
            <select class="filter-select" {disabled} {onchange}>
                <option value="" selected={selected.is_none()}>{ALL_OPTION_LABEL}</option>
                {for options.iter().map(|option| html! {
                    <option
                        value={option.name.clone()}
                        selected={selected == Some(option.name.as_str())}
                    >
                        {&option.name}
                    </option>
                })}
            </select>
        </div>
    }
}

fn render_chip(chip: &ActiveFilterChip, on_remove: &Callback<FilterKind>) -> Html {
    let onclick = {
        let on_remove = on_remove.clone();
        let kind = chip.kind;
        Callback::from(move |_: MouseEvent| on_remove.emit(kind))
    };

    html! {
        <span class="filter-chip">
            <span class="chip-label">{format!("{}: ", chip.label)}</span>
            <span class="chip-value">{&chip.value}</span>
            <button class="chip-remove" title="Rimuovi filtro" {onclick}>{"×"}</button>
        </span>
    }
}
