use shared::list::ListLayout;
use shared::state::{list_view_for, FilterBarStatus, ListView, SELECT_PERIOD_MESSAGE};
use shared::LeaveRequest;
use yew::prelude::*;

use crate::components::approval_row::ApprovalRow;
use crate::components::sickness_card::SicknessCard;

#[derive(Properties, PartialEq)]
pub struct ApprovalListProps {
    pub status: FilterBarStatus,
    pub results: Vec<LeaveRequest>,
    pub open_request: Option<i64>,
    pub on_toggle_request: Callback<i64>,
}

#[function_component(ApprovalList)]
pub fn approval_list(props: &ApprovalListProps) -> Html {
    let render_row = |request: &LeaveRequest| {
        let is_open = props.open_request == Some(request.id);
        html! {
            <div class="approval-item" key={request.id.to_string()}>
                <ApprovalRow
                    request={request.clone()}
                    {is_open}
                    on_toggle={props.on_toggle_request.clone()}
                />
                {if is_open {
                    html! { <SicknessCard request={request.clone()} /> }
                } else {
                    html! {}
                }}
            </div>
        }
    };

    let content = match list_view_for(&props.status, &props.results) {
        ListView::SelectPeriod => html! {
            <div class="list-message">{SELECT_PERIOD_MESSAGE}</div>
        },
        ListView::Loading => html! {
            <div class="list-loading">
                <div class="spinner-border" role="status">
                    <span class="visually-hidden">{"Caricamento..."}</span>
                </div>
            </div>
        },
        ListView::Error(message) => html! {
            <div class="list-message error">{message}</div>
        },
        ListView::Rows(ListLayout::Empty) => html! {
            <div class="empty-state-container">
                <img src="assets/image/desert.png" alt="Nessuna richiesta trovata" class="empty-state-image" />
            </div>
        },
        ListView::Rows(ListLayout::Flat(rows)) => html! {
            <>{for rows.into_iter().map(&render_row)}</>
        },
        ListView::Rows(ListLayout::Grouped(sections)) => html! {
            <>
                {for sections.into_iter().map(|section| html! {
                    <section class="department-section" key={section.label.clone()}>
                        <h3 class="department-header">{&section.label}</h3>
                        {for section.rows.into_iter().map(&render_row)}
                    </section>
                })}
            </>
        },
    };

    html! {
        <div class="approval-list">
            {content}
        </div>
    }
}
