// Flamedit Core Library
// Triangle editor for fractal flame transforms

pub mod genome;
pub mod basis;
pub mod triangle;
pub mod selection;
pub mod scene;
pub mod event;
pub mod settings;
pub mod undo;
pub mod editor;
pub mod file_io;

pub use editor::FigureEditor;
pub use genome::{Genome, XForm};
