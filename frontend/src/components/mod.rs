pub mod approval_list;
pub mod approval_row;
pub mod calendar;
pub mod filter_bar;
pub mod period_presets;
pub mod sickness_card;
pub mod year_picker;

pub use approval_list::ApprovalList;
pub use calendar::Calendar;
pub use filter_bar::FilterBar;
pub use period_presets::PeriodPresets;
pub use year_picker::YearPicker;
