pub mod alg_display;
pub mod library_list;
pub mod menu;
pub mod settings;
pub mod stats_dashboard;
pub mod times_panel;
