use shared::presentation::{
    date_text, date_tooltip, department_badge, quantity_display, task_badge, AvatarSource,
    BadgeStyle, StatusIcon, TypeBadge,
};
use shared::LeaveRequest;
use yew::prelude::*;

use crate::services::date_utils::random_avatar_seed;

#[derive(Properties, PartialEq)]
pub struct ApprovalRowProps {
    pub request: LeaveRequest,
    pub is_open: bool,
    pub on_toggle: Callback<i64>,
}

#[function_component(ApprovalRow)]
pub fn approval_row(props: &ApprovalRowProps) -> Html {
    let request = &props.request;

    // random avatars stay stable across re-renders of the same row
    let avatar_url = {
        let source = AvatarSource::for_request(request);
        use_memo((request.id, source), |(_, source)| source.url(random_avatar_seed))
    };

    let onclick = {
        let on_toggle = props.on_toggle.clone();
        let id = request.id;
        Callback::from(move |_: MouseEvent| on_toggle.emit(id))
    };

    let type_badge = TypeBadge::for_request(request);
    let status = StatusIcon::from(request.status);

    html! {
        <div class={classes!("approval-row", props.is_open.then_some("open"))} {onclick}>
            <img class="avatar" src={(*avatar_url).clone()} alt={request.employee_name.clone()} />

            <div class="employee">
                <div class="employee-name">{&request.employee_name}</div>
                <div class="employee-badges">
                    {badge(&department_badge(&request.department), "department-badge")}
                    {task_badge(&request.task).map(|style| badge(&style, "task-badge")).unwrap_or_default()}
                </div>
            </div>

            <span class={classes!(type_badge.css_classes())}>{&type_badge.label}</span>

            {match quantity_display(request) {
                Some(quantity) => html! {
                    <div class="quantity">
                        <span class="quantity-number">{quantity.number}</span>
                        <span class="quantity-label">{quantity.label}</span>
                    </div>
                },
                None => html! { <div class="quantity"></div> },
            }}

            <div class="request-dates" title={date_tooltip(request).unwrap_or_default()}>
                {date_text(request).map(|text| text.to_string()).unwrap_or_default()}
            </div>

            <div class={classes!("status-icon", status.css_class())}>
                {match status.icon_class() {
                    Some(icon) => html! { <i class={icon}></i> },
                    None => html! {},
                }}
            </div>
        </div>
    }
}

pub fn badge(style: &BadgeStyle, class: &'static str) -> Html {
    html! {
        <span class={classes!("badge", class)} style={style.inline_style()}>
            {&style.text}
        </span>
    }
}
