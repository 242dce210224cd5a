pub mod widget_types;
pub mod widgets;
