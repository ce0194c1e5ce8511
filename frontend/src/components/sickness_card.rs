use shared::presentation::SicknessCardView;
use shared::LeaveRequest;
use yew::prelude::*;

use crate::components::approval_row::badge;
use crate::services::date_utils::random_avatar_seed;

#[derive(Properties, PartialEq)]
pub struct SicknessCardProps {
    pub request: LeaveRequest,
}

/// Accordion card with the certificate details of one request
#[function_component(SicknessCard)]
pub fn sickness_card(props: &SicknessCardProps) -> Html {
    let view = use_memo(props.request.clone(), SicknessCardView::from_request);
    let avatar_url = use_memo(view.avatar.clone(), |avatar| avatar.url(random_avatar_seed));

    let flags = if view.flags.is_empty() {
        html! { <span>{"-"}</span> }
    } else {
        html! {
            <>{for view.flags.iter().map(|flag| html! { <span class="card-flag">{flag}</span> })}</>
        }
    };

    html! {
        <div class="sickness-card">
            <div class="card-header">
                <img class="avatar" src={(*avatar_url).clone()} alt={view.employee_name.clone()} />
                <div class="card-title">
                    <div class="employee-name">{&view.employee_name}</div>
                    <div class="employee-badges">
                        {badge(&view.department, "department-badge")}
                        {view.task.as_ref().map(|task| badge(task, "task-badge")).unwrap_or_default()}
                    </div>
                </div>
                <div class="card-summary">
                    <span class="certificate-type">{view.certificate_type}</span>
                    <span class="certificate-period">{&view.period_text}</span>
                    <span class="certificate-duration">{&view.duration_text}</span>
                    {view.hours_text.as_ref().map(|hours| html! {
                        <span class="certificate-hours">{hours}</span>
                    }).unwrap_or_default()}
                </div>
            </div>

            <div class="card-body">
                <div class="card-section">
                    {field("Protocollo", &view.protocol)}
                    {field("Medico", &view.doctor)}
                    {field("Ruolo medico", view.doctor_role)}
                    {field("Tipo visita", view.visit_type)}
                </div>
                <div class="card-section">
                    {field("Residenza", &view.residence)}
                    <div class="card-field">
                        <span class="field-label">{"Reperibilità"}</span>
                        <span class="field-value">
                            {&view.reachability}
                            {view.reachability_contact.as_ref().map(|contact| html! {
                                <span class="reachability-contact">{format!(" {}", contact)}</span>
                            }).unwrap_or_default()}
                        </span>
                    </div>
                </div>
                <div class="card-section">
                    <div class="card-field">
                        <span class="field-label">{"Note"}</span>
                        <span class="field-value card-flags">{flags}</span>
                    </div>
                    {field("Data rilascio", &view.release_date)}
                </div>
            </div>
        </div>
    }
}

fn field(label: &'static str, value: &str) -> Html {
    html! {
        <div class="card-field">
            <span class="field-label">{label}</span>
            <span class="field-value">{value.to_string()}</span>
        </div>
    }
}
