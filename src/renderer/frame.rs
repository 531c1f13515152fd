//! Draw lists and the surface they are presented on

use glam::Vec2;

use super::sprites::SpriteId;
use super::vertex::Vertex;

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Flat triangle list
    Triangles(Vec<Vertex>),
    /// Image centered on `center`, stretched to `size`
    Sprite {
        id: SpriteId,
        center: Vec2,
        size: Vec2,
        alpha: f32,
    },
    /// Centered text line
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: [f32; 4],
    },
}

/// Drawing backend
///
/// The browser host implements this over a canvas 2D context. Triangles are
/// flat shaded with their first vertex's color.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: [f32; 4]);
    /// Translate everything drawn afterwards (screen shake)
    fn set_offset(&mut self, offset: Vec2);
    fn fill_triangles(&mut self, vertices: &[Vertex]);
    fn draw_sprite(&mut self, id: SpriteId, center: Vec2, size: Vec2, alpha: f32);
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: [f32; 4]);
}

/// Everything needed to draw one frame
///
/// `world` commands move with the screen shake, `overlay` commands (HUD
/// bar, flashes, the glitch intro) stay put.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub clear: [f32; 4],
    pub offset: Vec2,
    pub world: Vec<DrawCmd>,
    pub overlay: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(clear: [f32; 4], offset: Vec2) -> Self {
        Self {
            clear,
            offset,
            world: Vec::new(),
            overlay: Vec::new(),
        }
    }

    /// Add world geometry; empty batches are skipped
    pub fn geometry(&mut self, vertices: Vec<Vertex>) {
        if !vertices.is_empty() {
            self.world.push(DrawCmd::Triangles(vertices));
        }
    }

    pub fn sprite(&mut self, id: SpriteId, center: Vec2, size: Vec2, alpha: f32) {
        self.world.push(DrawCmd::Sprite {
            id,
            center,
            size,
            alpha,
        });
    }

    pub fn overlay_geometry(&mut self, vertices: Vec<Vertex>) {
        if !vertices.is_empty() {
            self.overlay.push(DrawCmd::Triangles(vertices));
        }
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: [f32; 4]) {
        self.overlay.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
        });
    }

    /// Iterate both layers in draw order
    pub fn commands(&self) -> impl Iterator<Item = &DrawCmd> {
        self.world.iter().chain(self.overlay.iter())
    }

    pub fn has_sprite(&self, id: SpriteId) -> bool {
        self.commands()
            .any(|cmd| matches!(cmd, DrawCmd::Sprite { id: s, .. } if *s == id))
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.commands()
            .any(|cmd| matches!(cmd, DrawCmd::Text { text, .. } if text == needle))
    }

    /// Draw onto `surface`
    pub fn present(&self, surface: &mut dyn Surface) {
        surface.clear(self.clear);

        surface.set_offset(self.offset);
        for cmd in &self.world {
            draw(surface, cmd);
        }

        surface.set_offset(Vec2::ZERO);
        for cmd in &self.overlay {
            draw(surface, cmd);
        }
    }
}

fn draw(surface: &mut dyn Surface, cmd: &DrawCmd) {
    match cmd {
        DrawCmd::Triangles(vertices) => surface.fill_triangles(vertices),
        DrawCmd::Sprite {
            id,
            center,
            size,
            alpha,
        } => surface.draw_sprite(*id, *center, *size, *alpha),
        DrawCmd::Text {
            text,
            pos,
            size,
            color,
        } => surface.draw_text(text, *pos, *size, *color),
    }
}

/// Surface that records calls (tests)
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<String>,
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(600.0, 700.0)
    }
    fn clear(&mut self, _color: [f32; 4]) {
        self.calls.push("clear".into());
    }
    fn set_offset(&mut self, offset: Vec2) {
        self.calls.push(format!("offset {} {}", offset.x, offset.y));
    }
    fn fill_triangles(&mut self, vertices: &[Vertex]) {
        self.calls.push(format!("triangles {}", vertices.len() / 3));
    }
    fn draw_sprite(&mut self, id: SpriteId, _center: Vec2, _size: Vec2, _alpha: f32) {
        self.calls.push(format!("sprite {:?}", id));
    }
    fn draw_text(&mut self, text: &str, _pos: Vec2, _size: f32, _color: [f32; 4]) {
        self.calls.push(format!("text {}", text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes;
    use crate::renderer::vertex::colors;

    #[test]
    fn test_present_order_and_offset() {
        let mut frame = Frame::new(colors::BACKGROUND, Vec2::new(3.0, -2.0));
        frame.text("RODNEY", Vec2::ZERO, 12.0, colors::BOSS_BAR);
        frame.geometry(shapes::rect(Vec2::ZERO, Vec2::ONE, colors::WHITE));
        frame.geometry(Vec::new());
        frame.sprite(SpriteId::Boss, Vec2::ZERO, Vec2::splat(120.0), 1.0);

        let mut surface = RecordingSurface::default();
        frame.present(&mut surface);
        assert_eq!(
            surface.calls,
            vec![
                "clear",
                "offset 3 -2",
                "triangles 2",
                "sprite Boss",
                "offset 0 0",
                "text RODNEY",
            ]
        );
    }
}
