pub mod column;
mod layout;
mod options;
mod pagebreaks;
mod record;
mod render;
mod segments;
mod selection;
mod template;
mod types;

pub use column::{column_index, column_letters, column_number};
pub use layout::*;
pub use options::*;
pub use pagebreaks::*;
pub use record::*;
pub use render::*;
pub use segments::*;
pub use selection::*;
pub use template::*;
pub use types::*;
