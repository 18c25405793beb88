//! Geonote Render Library
//!
//! Renderer abstraction and implementations for Geonote.
//! The default implementation uses Vello for GPU-accelerated rendering.

pub mod page;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use page::{PageLayout, PageRect};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
