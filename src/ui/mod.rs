pub mod fields;
pub mod popup;

pub use fields::CoordinateFields;
pub use popup::{Popup, POPUP_LINE_BREAK};
