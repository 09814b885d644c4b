use crate::compose::bounds::Bounds;
use crate::compose::frame::resolve_frame;
use crate::diagnostics::Stage;
use crate::document::Document;
use crate::layout::kind::ElementKind;
use crate::layout::model::Element;
use crate::render::RenderContext;

/// Result of compositing one element list.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    /// Layered document, top-most layer first.
    pub document: Document,
    /// Number of layers produced.
    pub layer_count: usize,
}

/// Element indices in render order: ascending `z_order`, ties kept in input order.
pub fn render_order(elements: &[Element]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by(|&a, &b| elements[a].z_order().total_cmp(&elements[b].z_order()));
    order
}

/// Render every element into a layer and assemble the document.
///
/// Elements without a frame, or whose renderer draws nothing, produce no layer. A frame the
/// raster backend cannot allocate is reported and the element dropped.
#[tracing::instrument(skip_all, fields(elements = elements.len(), width = bounds.width, height = bounds.height))]
pub fn compose_document(
    elements: &[Element],
    bounds: &Bounds,
    ctx: &mut RenderContext<'_>,
) -> Composed {
    let offset = bounds.offset();
    let mut layers = Vec::with_capacity(elements.len());

    for index in render_order(elements) {
        let element = &elements[index];
        let kind = ElementKind::from_type(&element.type_name);
        let Some(frame) = resolve_frame(element, kind, offset) else {
            tracing::debug!(index, kind = kind.as_str(), "element has no frame; skipped");
            continue;
        };

        match kind.render(ctx, element, index, frame) {
            Ok(Some(layer)) => layers.push(layer),
            Ok(None) => {
                tracing::debug!(index, kind = kind.as_str(), "element drew nothing; skipped");
            }
            Err(e) => {
                let name = element.display_name(index);
                ctx.diagnostics_mut()
                    .warn_element(Stage::Render, index, name, format!("layer dropped: {e}"));
            }
        }
    }

    layers.reverse();
    let document = Document {
        width: bounds.width,
        height: bounds.height,
        children: layers,
    };
    Composed {
        layer_count: document.children.len(),
        document,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
