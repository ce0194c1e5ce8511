use shared::calendar::{YearPicker as YearWindow, YearRange};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct YearPickerProps {
    pub displayed: YearRange,
    pub min_year: i32,
    pub max_year: i32,
    pub window_size: i32,
    /// Inline message for a rejected text input
    pub error: Option<String>,
    pub on_select: Callback<YearRange>,
    pub on_input: Callback<String>,
    pub on_today: Callback<()>,
}

/// Year dropdown: a sliding window of year buttons plus a free text
/// input accepting `2025` or `2024 - 2026`.
#[function_component(YearPicker)]
pub fn year_picker(props: &YearPickerProps) -> Html {
    let open = use_state(|| false);
    let window = {
        let (year, min, max, size) = (props.displayed.from, props.min_year, props.max_year, props.window_size);
        use_state(move || YearWindow::around(year, min, max, size))
    };
    let input = use_state(String::new);

    let toggle = {
        let open = open.clone();
        let window = window.clone();
        let props_window = YearWindow::around(
            props.displayed.from,
            props.min_year,
            props.max_year,
            props.window_size,
        );
        Callback::from(move |_: MouseEvent| {
            if !*open {
                window.set(props_window);
            }
            open.set(!*open);
        })
    };

    let previous = {
        let window = window.clone();
        Callback::from(move |_: MouseEvent| window.set(window.previous()))
    };

    let next = {
        let window = window.clone();
        Callback::from(move |_: MouseEvent| window.set(window.next()))
    };

    let on_text = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            let element: HtmlInputElement = e.target_unchecked_into();
            input.set(element.value());
        })
    };

    let submit = {
        let input = input.clone();
        let open = open.clone();
        let on_input = props.on_input.clone();
        move || {
            on_input.emit((*input).clone());
            open.set(false);
        }
    };

    let on_keydown = {
        let submit = submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                submit();
            }
        })
    };

    let on_go = Callback::from(move |_: MouseEvent| submit());

    let on_today = {
        let on_today = props.on_today.clone();
        Callback::from(move |_: MouseEvent| on_today.emit(()))
    };

    html! {
        <div class="year-picker">
            <button class="year-picker-toggle" onclick={toggle}>
                {props.displayed.label()}
                <i class="bi bi-chevron-down"></i>
            </button>
            <button class="today-button" onclick={on_today} title="Vai al mese corrente">{"Oggi"}</button>

            {if *open {
                html! {
                    <div class="year-picker-dropdown">
                        <div class="year-picker-nav">
                            <button class="year-nav prev" disabled={!window.can_go_back()} onclick={previous}>
                                <i class="bi bi-chevron-left"></i>
                            </button>
                            <span class="year-window-label">
                                {format!("{} - {}", window.window_start, window.years().last().copied().unwrap_or(window.window_start))}
                            </span>
                            <button class="year-nav next" disabled={!window.can_go_forward()} onclick={next}>
                                <i class="bi bi-chevron-right"></i>
                            </button>
                        </div>
                        <div class="year-grid">
                            {for window.years().into_iter().map(|year| {
                                let selected = year >= props.displayed.from && year <= props.displayed.to;
                                let on_select = props.on_select.clone();
                                let open = open.clone();
                                html! {
                                    <button
                                        class={classes!("year-option", selected.then_some("selected"))}
                                        onclick={Callback::from(move |_: MouseEvent| {
                                            on_select.emit(YearRange::single(year));
                                            open.set(false);
                                        })}
                                    >
                                        {year}
                                    </button>
                                }
                            })}
                        </div>
                        <div class="year-input-row">
                            <input
                                type="text"
                                class="year-input"
                                placeholder="es. 2025 oppure 2024 - 2026"
                                value={(*input).clone()}
                                oninput={on_text}
                                onkeydown={on_keydown}
                            />
                            <button class="year-input-go" onclick={on_go}>{"Vai"}</button>
                        </div>
                    </div>
                }
            } else {
                html! {}
            }}

            {if let Some(error) = &props.error {
                html! { <div class="year-input-error">{error}</div> }
            } else {
                html! {}
            }}
        </div>
    }
}
