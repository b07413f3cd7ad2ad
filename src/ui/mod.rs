pub mod components;
pub mod layout;
pub mod text_field;
pub mod theme;
