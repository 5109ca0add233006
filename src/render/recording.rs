//! Headless draw target that records every call

use hashbrown::HashSet;

use super::{DrawContext, TextAlign};
use crate::util::color::Color;
use crate::util::geometry::{Rect, Vec2};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Alpha(f32),
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f32 },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color, line_width: f32 },
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    Text { text: String, at: Vec2, size: f32, color: Color, align: TextAlign },
    Image { key: String, rect: Rect },
}

/// `DrawContext` for tests and the simulator. Images listed in
/// `loaded_images` draw successfully; anything else reports missing.
#[derive(Debug)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    loaded_images: HashSet<String>,
    alpha_stack: Vec<f32>,
    alpha: f32,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            loaded_images: HashSet::new(),
            alpha_stack: Vec::new(),
            alpha: 1.0,
        }
    }

    pub fn with_images<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loaded_images: images.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Texts drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Alpha in effect after the recorded calls
    pub fn current_alpha(&self) -> f32 {
        self.alpha
    }

    /// Save/restore nesting left open
    pub fn depth(&self) -> usize {
        self.alpha_stack.len()
    }

    /// Forget recorded commands, keeping loaded images
    pub fn clear(&mut self) {
        self.commands.clear();
        self.alpha_stack.clear();
        self.alpha = 1.0;
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.alpha_stack.push(self.alpha);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.alpha_stack.pop() {
            self.alpha = alpha;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
        self.commands.push(DrawCommand::Alpha(self.alpha));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, line_width });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }

    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Color, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            size,
            color,
            align,
        });
    }

    fn draw_image(&mut self, key: &str, rect: Rect) -> bool {
        if !self.loaded_images.contains(key) {
            return false;
        }
        self.commands.push(DrawCommand::Image {
            key: key.to_string(),
            rect,
        });
        true
    }
}
