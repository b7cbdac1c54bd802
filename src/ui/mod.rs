pub mod picker;
pub mod widgets;

pub use picker::render_picker_view;
