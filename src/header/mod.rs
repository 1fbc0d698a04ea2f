mod c_literal;
mod renderer;

pub use renderer::{RenderError, render};
