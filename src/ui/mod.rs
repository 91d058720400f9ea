// UI module exports
pub mod simple;

pub use simple::{
    render_form,
    render_history,
    render_hints,
    render_modal,
    render_toast,
};
