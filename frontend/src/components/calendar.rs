use chrono::NaiveDate;
use shared::calendar::{CalendarDay, CalendarMonth};
use shared::date_utils::ITALIAN_WEEKDAYS_SHORT;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CalendarProps {
    pub months: Vec<CalendarMonth>,
    pub on_day_click: Callback<NaiveDate>,
}

#[function_component(Calendar)]
pub fn calendar(props: &CalendarProps) -> Html {
    html! {
        <div class="calendar-container">
            {for props.months.iter().map(|month| html! {
                <MonthBlock month={month.clone()} on_day_click={props.on_day_click.clone()} />
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct MonthBlockProps {
    month: CalendarMonth,
    on_day_click: Callback<NaiveDate>,
}

#[function_component(MonthBlock)]
fn month_block(props: &MonthBlockProps) -> Html {
    let month = &props.month;
    let block_class = classes!("month-block", month.is_current.then_some("current-month"));

    html! {
        <div class={block_class} id={month.anchor_id()}>
            <div class="month-header">{&month.label}</div>
            <div class="calendar-weekdays">
                {for ITALIAN_WEEKDAYS_SHORT.iter().map(|weekday| html! {
                    <div class="weekday">{*weekday}</div>
                })}
            </div>
            <div class="calendar-grid">
                {for (0..month.leading_blanks).map(|_| html! {
                    <div class="calendar-day empty"></div>
                })}
                {for month.days.iter().map(|day| render_day(day, &props.on_day_click))}
            </div>
        </div>
    }
}

fn render_day(day: &CalendarDay, on_day_click: &Callback<NaiveDate>) -> Html {
    let onclick = {
        let on_day_click = on_day_click.clone();
        let date = day.date;
        Callback::from(move |_: MouseEvent| on_day_click.emit(date))
    };

    html! {
        <div
            class={classes!(day.css_classes())}
            title={day.tooltip()}
            data-date={day.date.format("%Y-%m-%d").to_string()}
            {onclick}
        >
            <div class="day-number">{day.day()}</div>
            {if let Some(badge) = day.badge_label() {
                html! { <span class="sick-count-badge">{badge}</span> }
            } else {
                html! {}
            }}
        </div>
    }
}
