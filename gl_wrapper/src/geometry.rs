use thiserror::Error;
use tracing::trace;

use crate::context::RenderContext;
use crate::program::ShaderProgram;
use crate::FLOAT_SIZE;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

/// One named attribute inside an interleaved vertex. `offset` is in bytes
/// from the start of the vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    pub name: String,
    pub attribute: VertexAttribute,
    pub offset: usize,
}

impl AttributeSlot {
    pub fn new(name: impl Into<String>, attribute: VertexAttribute, offset: usize) -> Self {
        Self {
            name: name.into(),
            attribute,
            offset,
        }
    }

    pub fn components(&self) -> usize {
        self.attribute.size()
    }

    fn byte_len(&self) -> usize {
        self.components() * FLOAT_SIZE
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Vertex layout has no attributes")]
    Empty,
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Stride of {0} bytes is not a whole number of floats")]
    MisalignedStride(usize),
    #[error("Attribute `{0}` does not fit inside the stride")]
    SlotOutOfBounds(String),
    #[error("Attributes `{0}` and `{1}` overlap")]
    OverlappingSlots(String, String),
    #[error("Expected data for {expected} attributes, got {actual}")]
    AttributeCountMismatch { expected: usize, actual: usize },
}

/// Packs attributes tightly in declaration order.
pub struct VertexLayoutBuilder {
    attributes: Vec<(String, VertexAttribute)>,
}

impl VertexLayoutBuilder {
    pub fn with_attribute(mut self, name: impl Into<String>, attr: VertexAttribute) -> Self {
        self.attributes.push((name.into(), attr));
        self
    }

    pub fn build(self) -> Result<VertexLayout, LayoutError> {
        let mut offset = 0;
        let mut slots = Vec::with_capacity(self.attributes.len());

        for (name, attr) in self.attributes {
            slots.push(AttributeSlot::new(name, attr, offset));
            offset += attr.size() * FLOAT_SIZE;
        }

        VertexLayout::from_slots(slots, offset)
    }
}

/// Describes one interleaved `f32` vertex buffer: which attribute lives at
/// which byte offset and how far apart consecutive vertices are.
///
/// Slots never overlap and every slot ends inside the stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    slots: Vec<AttributeSlot>,
    stride: usize,
}

impl VertexLayout {
    pub fn builder() -> VertexLayoutBuilder {
        VertexLayoutBuilder {
            attributes: Vec::new(),
        }
    }

    /// Builds a layout with explicit offsets, e.g. to leave padding.
    pub fn from_slots(slots: Vec<AttributeSlot>, stride: usize) -> Result<Self, LayoutError> {
        if slots.is_empty() {
            return Err(LayoutError::Empty);
        }

        if stride == 0 || stride % FLOAT_SIZE != 0 {
            return Err(LayoutError::MisalignedStride(stride));
        }

        for slot in &slots {
            if slot.offset % FLOAT_SIZE != 0 || slot.offset + slot.byte_len() > stride {
                return Err(LayoutError::SlotOutOfBounds(slot.name.clone()));
            }
        }

        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                let disjoint =
                    a.offset + a.byte_len() <= b.offset || b.offset + b.byte_len() <= a.offset;
                if !disjoint {
                    return Err(LayoutError::OverlappingSlots(a.name.clone(), b.name.clone()));
                }
            }
        }

        Ok(Self { slots, stride })
    }

    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    /// Distance between vertices in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.stride / FLOAT_SIZE
    }

    pub fn vertex_count(&self, data: &[f32]) -> Result<usize, LayoutError> {
        let per_vertex = self.floats_per_vertex();

        if data.len() % per_vertex != 0 {
            return Err(LayoutError::InvalidDataLength);
        }

        Ok(data.len() / per_vertex)
    }

    /// Interleaves per-attribute arrays, given in slot order, into one
    /// buffer. Padding inside the stride is zero-filled.
    pub fn interleave(&self, attributes: &[&[f32]]) -> Result<Vec<f32>, LayoutError> {
        if attributes.len() != self.slots.len() {
            return Err(LayoutError::AttributeCountMismatch {
                expected: self.slots.len(),
                actual: attributes.len(),
            });
        }

        let mut vertices = None;
        for (slot, values) in self.slots.iter().zip(attributes) {
            if values.len() % slot.components() != 0 {
                return Err(LayoutError::InvalidDataLength);
            }

            let count = values.len() / slot.components();
            if *vertices.get_or_insert(count) != count {
                return Err(LayoutError::InvalidDataLength);
            }
        }

        let vertices = vertices.unwrap_or(0);
        let per_vertex = self.floats_per_vertex();
        let mut data = vec![0.0; vertices * per_vertex];

        for (slot, values) in self.slots.iter().zip(attributes) {
            let start = slot.offset / FLOAT_SIZE;
            let n = slot.components();

            for (i, chunk) in values.chunks_exact(n).enumerate() {
                let base = i * per_vertex + start;
                data[base..base + n].copy_from_slice(chunk);
            }
        }

        Ok(data)
    }

    /// Splits an interleaved buffer back into one array per slot.
    pub fn deinterleave(&self, data: &[f32]) -> Result<Vec<Vec<f32>>, LayoutError> {
        let vertices = self.vertex_count(data)?;
        let per_vertex = self.floats_per_vertex();

        Ok(self
            .slots
            .iter()
            .map(|slot| {
                let start = slot.offset / FLOAT_SIZE;
                let n = slot.components();
                let mut out = Vec::with_capacity(vertices * n);

                for vertex in data.chunks_exact(per_vertex) {
                    out.extend_from_slice(&vertex[start..start + n]);
                }

                out
            })
            .collect())
    }

    /// Uploads `data` and points every slot at it. Slots whose attribute is
    /// not active in `program` are skipped. Returns the vertex count.
    pub fn bind<C>(&self, ctx: &mut C, program: &ShaderProgram, data: &[f32]) -> Result<usize, LayoutError>
    where
        C: RenderContext + ?Sized,
    {
        let vertices = self.vertex_count(data)?;

        ctx.upload_vertices(data);

        for slot in &self.slots {
            match program.attribute_location(&*ctx, &slot.name) {
                Some(location) => {
                    ctx.vertex_attrib_pointer(location, slot.components(), self.stride, slot.offset);
                    ctx.enable_vertex_attrib_array(location);
                }
                None => trace!(name = %slot.name, "skipping inactive attribute"),
            }
        }

        Ok(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingContext;

    fn color_layout() -> VertexLayout {
        VertexLayout::builder()
            .with_attribute("aPosition", VertexAttribute::Vec2)
            .with_attribute("aColor", VertexAttribute::Vec3)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_packs_tightly() {
        let layout = color_layout();

        assert_eq!(layout.stride(), 20);
        assert_eq!(layout.slots()[0].offset, 0);
        assert_eq!(layout.slots()[1].offset, 8);
        assert_eq!(layout.floats_per_vertex(), 5);
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert_eq!(VertexLayout::builder().build(), Err(LayoutError::Empty));
    }

    #[test]
    fn invalid_slots_are_rejected() {
        let overlap = VertexLayout::from_slots(
            vec![
                AttributeSlot::new("a", VertexAttribute::Vec2, 0),
                AttributeSlot::new("b", VertexAttribute::Vec2, 4),
            ],
            16,
        );
        assert_eq!(
            overlap,
            Err(LayoutError::OverlappingSlots("a".into(), "b".into()))
        );

        let too_small = VertexLayout::from_slots(
            vec![AttributeSlot::new("a", VertexAttribute::Vec3, 0)],
            8,
        );
        assert_eq!(too_small, Err(LayoutError::SlotOutOfBounds("a".into())));

        let misaligned = VertexLayout::from_slots(
            vec![AttributeSlot::new("a", VertexAttribute::Float, 0)],
            6,
        );
        assert_eq!(misaligned, Err(LayoutError::MisalignedStride(6)));
    }

    #[test]
    fn padded_layout_round_trips() {
        let layout = VertexLayout::from_slots(
            vec![
                AttributeSlot::new("aPosition", VertexAttribute::Vec2, 0),
                AttributeSlot::new("aTexPos", VertexAttribute::Vec2, 12),
            ],
            20,
        )
        .unwrap();

        let positions = [1.0, 2.0, 3.0, 4.0];
        let tex = [0.0, 1.0, 1.0, 0.0];
        let data = layout.interleave(&[&positions[..], &tex[..]]).unwrap();

        assert_eq!(data, vec![1.0, 2.0, 0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 1.0, 0.0]);
        assert_eq!(layout.deinterleave(&data).unwrap(), vec![positions.to_vec(), tex.to_vec()]);
    }

    #[test]
    fn mismatched_vertex_counts_are_rejected() {
        let layout = color_layout();

        let positions = [0.0, 0.0, 1.0, 1.0];
        let colors = [1.0, 0.0, 0.0];
        let err = layout.interleave(&[&positions[..], &colors[..]]);
        assert_eq!(err, Err(LayoutError::InvalidDataLength));

        let err = layout.interleave(&[&positions[..2]]);
        assert_eq!(
            err,
            Err(LayoutError::AttributeCountMismatch {
                expected: 2,
                actual: 1
            })
        );

        assert_eq!(layout.vertex_count(&[0.0; 7]), Err(LayoutError::InvalidDataLength));
    }

    #[test]
    fn bind_skips_inactive_attributes() {
        let mut ctx = RecordingContext::new();
        let mut program = ShaderProgram::new(
            "attribute vec2 aPosition;\nvoid main() { gl_Position = vec4(aPosition, 0.0, 1.0); }",
            "void main() { gl_FragColor = vec4(1.0); }",
        );
        program.setup(&mut ctx).unwrap();

        let layout = color_layout();
        let vertices = layout.bind(&mut ctx, &program, &[0.0; 15]).unwrap();

        assert_eq!(vertices, 3);
        assert_eq!(ctx.enabled_attributes().len(), 1);
        assert_eq!(ctx.last_upload(), Some(&[0.0; 15][..]));
    }
}
