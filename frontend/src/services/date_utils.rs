use chrono::NaiveDate;
use gloo::timers::callback::Timeout;
use shared::calendar::month_anchor_id;
use shared::presentation::AVATAR_POOL;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// Current local date from the browser clock
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    let year = now.get_full_year() as i32;
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Random avatar number in `1..=70` for requests without name or picture
pub fn random_avatar_seed() -> u32 {
    (js_sys::Math::random() * f64::from(AVATAR_POOL)).floor() as u32 + 1
}

/// `Auto` jumps without animation; used for the first render
fn scroll_behavior(instant: bool) -> ScrollBehavior {
    if instant {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    }
}

/// Center a month block of the calendar, if it is rendered
pub fn scroll_to_month(year: i32, month0: u32, instant: bool) -> bool {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&month_anchor_id(year, month0)));

    match element {
        Some(element) => {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(scroll_behavior(instant));
            options.set_block(ScrollLogicalPosition::Center);
            element.scroll_into_view_with_scroll_into_view_options(&options);
            true
        }
        None => false,
    }
}

/// Scroll once the pending re-render has reached the DOM
pub fn scroll_to_month_after_render(year: i32, month0: u32, instant: bool) {
    let _ = Timeout::new(0, move || {
        scroll_to_month(year, month0, instant);
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_today_is_a_real_date() {
        let today = today();
        assert!(today.year() >= 2024);
    }

    #[wasm_bindgen_test]
    fn test_random_seed_in_pool() {
        for _ in 0..50 {
            let seed = random_avatar_seed();
            assert!((1..=AVATAR_POOL).contains(&seed));
        }
    }

    #[wasm_bindgen_test]
    fn test_scroll_to_missing_month() {
        assert!(!scroll_to_month(1900, 0, false));
    }

    #[wasm_bindgen_test]
    fn test_scroll_to_rendered_month() {
        let document = web_sys::window().unwrap().document().unwrap();
        let block = document.create_element("div").unwrap();
        block.set_id(&month_anchor_id(2025, 2));
        document.body().unwrap().append_child(&block).unwrap();

        assert!(scroll_to_month(2025, 2, true));
        assert!(scroll_to_month(2025, 2, false));
        block.remove();
    }

    #[wasm_bindgen_test]
    fn test_first_render_jumps_without_animation() {
        assert_eq!(scroll_behavior(true), ScrollBehavior::Auto);
        assert_eq!(scroll_behavior(false), ScrollBehavior::Smooth);
    }
}
