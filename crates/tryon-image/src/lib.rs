//! CPU image handling for the try-on overlay.
//!
//! # Overview
//!
//! ## Images and Views
//!
//! [`Image`] is an owned 8-bit sRGBA image. Overlay assets, camera frames and composited output
//! all use it.
//!
//! *Views* borrow an [`Image`] and look at an axis-aligned [`Rect`] of it. Immutable
//! [`ImageView`]s and mutable [`ImageViewMut`]s follow Rust's usual mutability rules, and the
//! [`AsImageView`] and [`AsImageViewMut`] traits let APIs accept owned images and views alike.
//!
//! Views may extend past the edges of the underlying image. Pixels outside of it read as
//! [`Color::NULL`] and ignore writes, which is exactly what an overlay that hangs off the side of
//! the frame needs.
//!
//! ## Blending
//!
//! [`ImageViewMut::blend_from`] stretches a source view over a destination view, alpha blending by
//! default.

mod blend;
mod color;
mod image;
mod rect;
mod resolution;

#[cfg(test)]
mod tests;

pub use crate::image::*;
pub use blend::*;
pub use color::Color;
pub use rect::Rect;
pub use resolution::{AspectRatio, Resolution};
