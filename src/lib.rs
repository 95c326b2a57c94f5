#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod fill;
pub mod history;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod stroke;
pub mod tools;
pub mod view;

pub use app::PaintApp;
pub use canvas::{Anchor, CanvasBuffer, Pixel};
pub use config::PaintConfig;
pub use error::{CanvasError, CanvasResult};
pub use file_handler::SaveFormat;
pub use fill::{flood_fill, Connectivity, FillOptions};
pub use history::{EditKind, History, Snapshot};
pub use input::{InputEvent, InputHandler, InputLocation};
pub use renderer::Renderer;
pub use session::{EditorSession, SessionState};
pub use stroke::{Pen, PenShape};
pub use tools::{ToolKind, ToolSettings};
pub use view::ViewTransform;
