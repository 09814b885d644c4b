//! Layered document model handed to encoders.

use crate::compose::frame::Frame;
use crate::layout::kind::ElementKind;
use crate::render::composite::blit_over;
use crate::render::raster::LayerRaster;

/// One rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Element display name.
    pub name: String,
    /// Index of the source element in the composed element list.
    pub element_index: usize,
    /// Renderer that produced the layer.
    pub kind: ElementKind,
    /// Placement on the canvas.
    pub frame: Frame,
    /// Layer opacity, applied by the encoder rather than baked into `raster`.
    pub opacity: u8,
    /// Frame-sized premultiplied pixels.
    pub raster: LayerRaster,
}

/// Canvas size plus layers, top-most first.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Layers in top-most-first order.
    pub children: Vec<Layer>,
}

impl Document {
    /// Empty document of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            children: Vec::new(),
        }
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.children.len()
    }

    /// Find a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.children.iter().find(|l| l.name == name)
    }

    /// Flatten every layer bottom-up onto a transparent canvas with source-over at layer opacity.
    pub fn flatten(&self) -> LayerRaster {
        let mut out = LayerRaster::transparent(self.width, self.height);
        for layer in self.children.iter().rev() {
            blit_over(
                &mut out,
                &layer.raster,
                layer.frame.left,
                layer.frame.top,
                layer.opacity,
            );
        }
        out
    }
}

#[cfg(test)]
#[path = "../tests/unit/document.rs"]
mod tests;
