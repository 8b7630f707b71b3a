use crossterm::event::Event;
use std::io::Write;

pub mod show;

pub trait Scene {
    /// Terminal size in character cells.
    fn resize(&mut self, cols: usize, rows: usize);
    fn update(&mut self, dt: f32);
    fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()>;
    fn handle_event(&mut self, _event: &Event) {}
}
