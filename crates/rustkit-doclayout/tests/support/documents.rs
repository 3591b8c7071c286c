//! Renderer tree builders.

use rustkit_doclayout::{
    BlockRenderer, GridValue, LineRenderer, Properties, Property, PropertyValue, Renderer,
};

/// Height of every test line.
pub const LINE_HEIGHT: f32 = 10.0;

/// A paragraph of `lines` lines, each `LINE_HEIGHT` tall.
pub fn paragraph(lines: usize) -> Box<dyn Renderer> {
    Box::new(BlockRenderer::new(
        (0..lines)
            .map(|_| Box::new(LineRenderer::new(40.0, LINE_HEIGHT)) as Box<dyn Renderer>)
            .collect(),
    ))
}

/// Grid properties with fixed column tracks.
pub fn fixed_columns(widths: &[f32]) -> Properties {
    Properties::new().with(
        Property::GridTemplateColumns,
        PropertyValue::Template(widths.iter().map(|w| GridValue::Fixed(*w)).collect()),
    )
}

/// Multi-column properties.
pub fn columns(count: i32, gap: f32) -> Properties {
    Properties::new()
        .with(Property::ColumnCount, PropertyValue::Integer(count))
        .with(Property::ColumnGap, PropertyValue::Number(gap))
}
