pub mod feedback_panel;
pub mod gem_view;
pub mod level_header;
pub mod menu;
pub mod options_bar;
pub mod player_form;
pub mod progress_bar;
pub mod report_view;
pub mod sequence_cards;
