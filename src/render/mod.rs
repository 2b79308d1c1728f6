/// HTML rendering of the positioning page
///
/// Rendering is pure: it reads a session and never talks to the network.

// Pretty-printing and preview truncation of JSON text
pub mod json;

// Handlebars page template and its view model
pub mod page;

pub use page::{PageRenderer, PageView};
