#![forbid(unsafe_code)]

//! Surface parameter sync.
//!
//! The host owns `viewBox`, `width`, `height`, and the surface style as
//! entries in its property store. Whenever any one of them changes, whether
//! by an external write or a `fit` with `changeView`, the full set is
//! re-applied to the surface root, unconditionally. The re-apply is
//! idempotent, so there is no diffing and no per-parameter dirty tracking.

use vellum_core::surface::{Dimension, Surface, SurfaceParams};

use crate::command::{CommandError, decode_style_map};

/// Keeps the surface root consistent with host-supplied parameters.
#[derive(Debug, Clone, Default)]
pub struct ParameterSync {
    params: SurfaceParams,
}

impl ParameterSync {
    #[must_use]
    pub fn new(params: SurfaceParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Re-apply the current full parameter set (used at render time).
    pub fn apply(&self, surface: &mut Surface) {
        surface.apply_parameters(&self.params);
    }

    pub fn set_view_box(&mut self, view_box: &str, surface: &mut Surface) {
        self.params.view_box = view_box.to_string();
        self.apply(surface);
    }

    pub fn set_width(&mut self, width: Dimension, surface: &mut Surface) {
        self.params.width = width;
        self.apply(surface);
    }

    pub fn set_height(&mut self, height: Dimension, surface: &mut Surface) {
        self.params.height = height;
        self.apply(surface);
    }

    /// Merge a serialized style mapping (`{"key": value, ...}`) into the
    /// parameter set and re-apply.
    pub fn set_style_json(&mut self, json: &str, surface: &mut Surface) -> Result<(), CommandError> {
        let style = decode_style_map(json)?;
        self.params.style.extend(style);
        self.apply(surface);
        Ok(())
    }
}
