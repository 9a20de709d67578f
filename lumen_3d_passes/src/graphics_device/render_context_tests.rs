use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;

// ============================================================================
// Draw target tracking
// ============================================================================

#[test]
fn test_new_context_starts_on_default_target() {
    let mut device = MockGraphicsDevice::new();
    let ctx = RenderContext::new(&mut device);
    assert_eq!(ctx.bound_framebuffer(), None);
    assert_eq!(ctx.viewport(), None);
    assert_eq!(ctx.active_program(), None);
}

#[test]
fn test_bind_framebuffer_is_tracked_and_forwarded() {
    let mut device = MockGraphicsDevice::new();
    let fb = device.create_framebuffer().unwrap();
    {
        let mut ctx = RenderContext::new(&mut device);
        ctx.bind_framebuffer(Some(fb));
        assert_eq!(ctx.bound_framebuffer(), Some(fb));
    }
    assert_eq!(device.bound_framebuffer, Some(fb));
}

#[test]
fn test_ensure_not_bound_rejects_bound_target() {
    let mut device = MockGraphicsDevice::new();
    let fb = device.create_framebuffer().unwrap();
    let mut ctx = RenderContext::new(&mut device);

    ctx.bind_framebuffer(Some(fb));
    assert!(matches!(ctx.ensure_not_bound(fb), Err(Error::InvalidState(_))));

    ctx.bind_framebuffer(None);
    assert!(ctx.ensure_not_bound(fb).is_ok());
}

#[test]
fn test_delete_bound_framebuffer_falls_back_to_default() {
    let mut device = MockGraphicsDevice::new();
    let fb = device.create_framebuffer().unwrap();
    let mut ctx = RenderContext::new(&mut device);
    ctx.bind_framebuffer(Some(fb));

    ctx.delete_framebuffer(fb);
    assert_eq!(ctx.bound_framebuffer(), None);
}

// ============================================================================
// Texture units
// ============================================================================

#[test]
fn test_bind_and_unbind_texture_units() {
    let mut device = MockGraphicsDevice::new();
    let a = device.create_texture().unwrap();
    let b = device.create_texture().unwrap();
    {
        let mut ctx = RenderContext::new(&mut device);
        ctx.bind_texture(3, Some(a));
        ctx.bind_texture(4, Some(b));
        assert_eq!(ctx.texture_binding(3), Some(a));
        assert_eq!(ctx.texture_binding(4), Some(b));

        ctx.unbind_textures(&[3, 4]);
        assert_eq!(ctx.texture_binding(3), None);
        assert_eq!(ctx.texture_binding(4), None);
    }
    assert!(device.texture_units.is_empty());
}

#[test]
fn test_delete_texture_clears_its_units() {
    let mut device = MockGraphicsDevice::new();
    let a = device.create_texture().unwrap();
    let b = device.create_texture().unwrap();
    let mut ctx = RenderContext::new(&mut device);
    ctx.bind_texture(0, Some(a));
    ctx.bind_texture(1, Some(b));

    ctx.delete_texture(a);
    assert_eq!(ctx.texture_binding(0), None);
    assert_eq!(ctx.texture_binding(1), Some(b));
}

// ============================================================================
// Frame state
// ============================================================================

#[test]
fn test_set_viewport_is_tracked() {
    let mut device = MockGraphicsDevice::new();
    {
        let mut ctx = RenderContext::new(&mut device);
        ctx.set_viewport(Viewport::from_size(800, 600));
        assert_eq!(ctx.viewport(), Some(Viewport { x: 0, y: 0, width: 800, height: 600 }));
    }
    assert_eq!(device.viewport, (0, 0, 800, 600));
}

#[test]
fn test_clear_sets_color_then_clears() {
    let mut device = MockGraphicsDevice::new();
    {
        let mut ctx = RenderContext::new(&mut device);
        ctx.clear([0.2, 0.2, 0.2, 1.0], ClearFlags::COLOR | ClearFlags::DEPTH);
    }
    assert_eq!(device.commands, vec!["clear_color".to_string(), "clear".to_string()]);
    assert_eq!(device.clear_color, [0.2, 0.2, 0.2, 1.0]);
}
