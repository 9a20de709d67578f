use std::rc::Rc;
use super::*;
use crate::graphics_device::{
    GraphicsDevice, ProgramHandle, ShaderProgram, UniformValue,
    mock_graphics_device::MockGraphicsDevice,
};

fn setup(device: &mut MockGraphicsDevice) -> (ScreenQuad, ProgramHandle) {
    let mut ctx = RenderContext::new(device);
    let shader = Rc::new(ShaderProgram::new(&mut ctx, "quad", "vs", "fs").unwrap());
    let program = shader.program();
    let quad = ScreenQuad::new(&mut ctx, shader, QuadSettings::default()).unwrap();
    (quad, program)
}

#[test]
fn test_filter_mode_uniform_values() {
    assert_eq!(FilterMode::Passthrough.as_uniform(), 0);
    assert_eq!(FilterMode::Sobel.as_uniform(), 1);
    assert_eq!(FilterMode::Depth.as_uniform(), 2);
    assert_eq!(FilterMode::default(), FilterMode::Passthrough);
}

#[test]
fn test_render_sets_uniforms() {
    let mut device = MockGraphicsDevice::new();
    let (quad, program) = setup(&mut device);
    {
        let mut ctx = RenderContext::new(&mut device);
        quad.render(&mut ctx, FilterMode::Sobel, None, None).unwrap();
    }

    assert_eq!(device.uniform(program, "filter_mode"), Some(UniformValue::Int(1)));
    assert_eq!(device.uniform(program, "depth_scaling"), Some(UniformValue::Float(0.2)));
    assert_eq!(device.uniform(program, "near"), Some(UniformValue::Float(0.01)));
    assert_eq!(device.uniform(program, "far"), Some(UniformValue::Float(100.0)));
    assert_eq!(device.uniform(program, "color_texture"), Some(UniformValue::Int(0)));
    assert_eq!(device.uniform(program, "depth_texture"), Some(UniformValue::Int(1)));
}

#[test]
fn test_render_draws_two_triangles_with_both_units() {
    let mut device = MockGraphicsDevice::new();
    let (quad, program) = setup(&mut device);
    let color = device.create_texture().unwrap();
    let depth = device.create_texture().unwrap();
    {
        let mut ctx = RenderContext::new(&mut device);
        quad.render(&mut ctx, FilterMode::Passthrough, Some(color), Some(depth)).unwrap();
    }

    assert_eq!(device.draws.len(), 1);
    let draw = &device.draws[0];
    assert_eq!(draw.index_count, 6);
    assert_eq!(draw.program, Some(program));
    assert_eq!(draw.texture_units.get(&0), Some(&color));
    assert_eq!(draw.texture_units.get(&1), Some(&depth));
}

#[test]
fn test_units_unbound_after_render() {
    let mut device = MockGraphicsDevice::new();
    let (quad, _) = setup(&mut device);
    let color = device.create_texture().unwrap();
    let depth = device.create_texture().unwrap();

    let mut ctx = RenderContext::new(&mut device);
    quad.render(&mut ctx, FilterMode::Depth, Some(color), Some(depth)).unwrap();
    assert_eq!(ctx.texture_binding(0), None);
    assert_eq!(ctx.texture_binding(1), None);
    assert_eq!(ctx.active_program(), None);

    // Without textures the units are still explicitly cleared
    ctx.bind_texture(1, Some(depth));
    quad.render(&mut ctx, FilterMode::Depth, Some(color), None).unwrap();
    assert_eq!(ctx.texture_binding(0), None);
    assert_eq!(ctx.texture_binding(1), None);
}

#[test]
fn test_missing_texture_leaves_unit_unbound_during_draw() {
    let mut device = MockGraphicsDevice::new();
    let (quad, _) = setup(&mut device);
    let color = device.create_texture().unwrap();
    let stale = device.create_texture().unwrap();
    {
        let mut ctx = RenderContext::new(&mut device);
        quad.render(&mut ctx, FilterMode::Passthrough, Some(color), None).unwrap();

        // Left over from an earlier pass
        ctx.bind_texture(DEPTH_UNIT, Some(stale));
        ctx.bind_texture(COLOR_UNIT, Some(stale));
        quad.render(&mut ctx, FilterMode::Passthrough, None, None).unwrap();
        ctx.bind_texture(DEPTH_UNIT, Some(stale));
        quad.render(&mut ctx, FilterMode::Passthrough, Some(color), None).unwrap();
    }
    assert_eq!(device.draws.len(), 3);

    let clean = &device.draws[0];
    assert_eq!(clean.texture_units.get(&0), Some(&color));
    assert!(clean.texture_units.get(&1).is_none());

    let none = &device.draws[1];
    assert!(none.texture_units.get(&0).is_none());
    assert!(none.texture_units.get(&1).is_none());

    let stale_depth = &device.draws[2];
    assert_eq!(stale_depth.texture_units.get(&0), Some(&color));
    assert!(stale_depth.texture_units.get(&1).is_none());
    assert!(device.texture_units.is_empty());
}

#[test]
fn test_units_unbound_when_draw_fails() {
    let mut device = MockGraphicsDevice::new();
    let (quad, _) = setup(&mut device);
    let color = device.create_texture().unwrap();
    // Drop the geometry behind the quad's back
    device.buffers.clear();

    let mut ctx = RenderContext::new(&mut device);
    assert!(quad.render(&mut ctx, FilterMode::Passthrough, Some(color), None).is_err());
    assert_eq!(ctx.texture_binding(0), None);
    assert_eq!(ctx.active_program(), None);
}
