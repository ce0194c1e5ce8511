pub mod use_leave_admin;

pub use use_leave_admin::use_leave_admin;
