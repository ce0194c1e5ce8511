use shared::period::PeriodPreset;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PeriodPresetsProps {
    pub active: Option<PeriodPreset>,
    pub on_select: Callback<PeriodPreset>,
}

#[function_component(PeriodPresets)]
pub fn period_presets(props: &PeriodPresetsProps) -> Html {
    html! {
        <div class="period-presets">
            {for PeriodPreset::ALL.into_iter().map(|preset| {
                let on_select = props.on_select.clone();
                let is_active = props.active == Some(preset);
                html! {
                    <button
                        class={classes!("preset-button", is_active.then_some("active"))}
                        data-preset={preset.key()}
                        onclick={Callback::from(move |_: MouseEvent| on_select.emit(preset))}
                    >
                        {preset.label()}
                    </button>
                }
            })}
        </div>
    }
}
