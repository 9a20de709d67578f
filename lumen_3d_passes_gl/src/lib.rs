/*!
# Lumen 3D Passes - OpenGL Backend

OpenGL ES 3 / WebGL2 implementation of the lumen_3d_passes graphics device,
built on glow.

```no_run
use lumen_3d_passes::lumen3d::render::RenderContext;
use lumen_3d_passes_gl::GlGraphicsDevice;

# fn frame(gl: glow::Context) {
let mut device = GlGraphicsDevice::new(gl);
let mut ctx = RenderContext::new(&mut device);
# let _ = &mut ctx;
# }
```
*/

mod gl_format;
mod gl_device;

pub use gl_device::GlGraphicsDevice;
