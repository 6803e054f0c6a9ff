pub mod button;
pub mod city_selector;
pub mod header;
pub mod insight_panel;
pub mod multi_city;
pub mod notice;
pub mod run_controls;
pub mod time_of_day;
