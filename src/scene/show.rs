use super::Scene;
use crate::audio::Bell;
use crate::catalog::{self, CATALOG, FireworkKind, FireworkType};
use crate::color::{self, Rgb};
use crate::config::Config;
use crate::demo::{Cycle, Demo, Trigger};
use crate::sim::{Bounds, Effect, Simulation};
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use noise::{NoiseFn, Perlin};
use std::io::Write;

/// Height of the simulated sky in world units, whatever the terminal size.
pub const WORLD_HEIGHT: f32 = 720.0;

const ROCKET_COLOR: Rgb = (255, 247, 230);
const SMOKE_COLOR: Rgb = (120, 120, 120);
// Smoke opacity at the centre and at the rim of a puff.
const SMOKE_ALPHA: (f32, f32) = (0.25, 0.02);
const FOOTER_FG: Rgb = (150, 150, 160);

/// Per-pixel (intensity, colour). Intensity 3.0 is full colour.
struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<(f32, Rgb)>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: Vec::with_capacity(width * height),
        }
    }

    fn reset(&mut self, bg: Rgb) {
        self.cells.clear();
        self.cells.resize(self.width * self.height, (0.0, bg));
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Keeps whichever is brighter.
    fn brighten(&mut self, x: i32, y: i32, intensity: f32, color: Rgb) {
        if let Some(idx) = self.index(x, y) {
            if intensity > self.cells[idx].0 {
                self.cells[idx] = (intensity, color);
            }
        }
    }

    fn overwrite(&mut self, x: i32, y: i32, intensity: f32, color: Rgb) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = (intensity, color);
        }
    }

    /// Additive; tints the pixel only when nothing brighter is there.
    fn add(&mut self, x: i32, y: i32, intensity: f32, color: Rgb) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.cells[idx];
            if cell.0 < 0.05 {
                *cell = (cell.0 + intensity, color);
            } else {
                cell.0 += intensity;
            }
        }
    }

    fn shade(&self, idx: usize, bg: Rgb) -> Rgb {
        let (intensity, base) = self.cells[idx];
        if intensity > 0.05 {
            color::mix(bg, base, intensity / 3.0)
        } else {
            bg
        }
    }
}

/// Interactive fireworks show: keyboard triggers, scripted demos and the
/// screensaver cycle feeding one simulation, drawn with half-block pixels.
pub struct Show {
    cols: usize,
    canvas: Canvas,
    /// World units per pixel.
    scale: f32,
    sim: Simulation,
    bell: Bell,
    demo: Demo,
    cycle: Option<Cycle>,
    kind: usize,
    ty: usize,
    bg_color: Rgb,
    smoke_noise: Perlin,
    time: f32,
    output_buf: Vec<u8>,
}

/// Pixel grid for a terminal, keeping the bottom row for the footer.
fn pixel_size(cols: usize, rows: usize) -> (usize, usize) {
    (cols.max(1), rows.saturating_sub(1).max(1) * 2)
}

fn world_bounds(width: usize, height: usize) -> (Bounds, f32) {
    let scale = WORLD_HEIGHT / height as f32;
    (Bounds::new(width as f32 * scale, WORLD_HEIGHT), scale)
}

impl Show {
    pub fn new(config: &Config, cols: usize, rows: usize) -> Self {
        let (width, height) = pixel_size(cols, rows);
        let (bounds, scale) = world_bounds(width, height);

        let mut sim = match config.seed {
            Some(seed) => Simulation::with_seed(bounds, seed),
            None => Simulation::new(bounds),
        };
        let smoke_noise = Perlin::new(sim.rng().u32(..));

        let mut demo = Demo::new();
        if config.opening {
            demo.opening(bounds, sim.rng());
        }

        Self {
            cols: width,
            canvas: Canvas::new(width, height),
            scale,
            sim,
            bell: Bell::new(config.muted),
            demo,
            cycle: config.auto.then(Cycle::new),
            kind: config.kind.min(CATALOG.len() - 1),
            ty: config.ty,
            bg_color: config.bg_color,
            smoke_noise,
            time: 0.0,
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn is_muted(&self) -> bool {
        self.bell.is_muted()
    }

    pub fn selected(&self) -> (&'static FireworkKind, &'static FireworkType) {
        let kind = &CATALOG[self.kind];
        (kind, &kind.types[self.ty.min(kind.types.len() - 1)])
    }

    fn launch_selected(&mut self) {
        let (_, ty) = self.selected();
        let trigger = Trigger::launch(self.sim.bounds(), ty, self.sim.rng());
        trigger.fire(&mut self.sim, &mut self.bell);
    }

    fn preview_selected(&mut self) {
        let (_, ty) = self.selected();
        let trigger = Trigger::preview(self.sim.bounds(), ty, self.sim.rng());
        trigger.fire(&mut self.sim, &mut self.bell);
    }

    fn auto_show(&mut self) {
        let bounds = self.sim.bounds();
        let kind = self.demo.auto_show(bounds, self.sim.rng());
        log::debug!("auto show: {}", kind.name);
        self.kind = catalog::kind_index(kind.id).unwrap_or(0);
        self.ty = 0;
    }

    fn select_kind(&mut self, idx: usize) {
        if idx < CATALOG.len() {
            self.kind = idx;
            self.ty = 0;
        }
    }

    fn next_type(&mut self) {
        let count = CATALOG[self.kind].types.len();
        self.ty = (self.ty + 1) % count;
    }

    fn clear(&mut self) {
        log::debug!("clearing {} effects", self.sim.len());
        self.sim.clear();
    }

    fn draw_smoke(&mut self) {
        let scale = self.scale;
        let z = self.time as f64 * 0.4;

        for effect in self.sim.effects() {
            let Effect::Smoke(smoke) = effect else {
                continue;
            };
            let cx = smoke.x / scale;
            let cy = smoke.y / scale;
            let r = (smoke.radius / scale).max(1.0);
            let life = smoke.life.clamp(0.0, 1.0);
            let reach = r.ceil() as i32;

            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    let d = ((dx * dx + dy * dy) as f32).sqrt() / r;
                    if d > 1.0 {
                        continue;
                    }
                    let x = cx as i32 + dx;
                    let y = cy as i32 + dy;
                    let n = self.smoke_noise.get([x as f64 * 0.2, y as f64 * 0.2, z]) as f32;
                    let texture = 0.5 + 0.5 * n;
                    let alpha = (SMOKE_ALPHA.0 + (SMOKE_ALPHA.1 - SMOKE_ALPHA.0) * d) * life * texture;
                    self.canvas.add(x, y, alpha * 3.0, SMOKE_COLOR);
                }
            }
        }
    }

    fn draw_sparks(&mut self) {
        let scale = self.scale;

        for effect in self.sim.effects() {
            let Effect::Spark(spark) = effect else {
                continue;
            };
            let fade = spark.life.clamp(0.0, 1.0);
            let x = (spark.x / scale) as i32;
            let y = (spark.y / scale) as i32;

            self.canvas.brighten(x, y, fade * 2.5, spark.color);

            // Sparks swell as they fade; big ones get a halo.
            let radius = spark.radius * (1.0 + (1.0 - fade) * 1.5) / scale;
            if radius >= 0.75 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        self.canvas.brighten(x + dx, y + dy, fade * 0.8, spark.color);
                    }
                }
            }
        }
    }

    fn draw_rockets(&mut self) {
        let scale = self.scale;

        for effect in self.sim.effects() {
            let Effect::Rocket(rocket) = effect else {
                continue;
            };
            let x = rocket.x / scale;
            let y = rocket.y / scale;
            self.canvas.overwrite(x as i32, y as i32, 3.0, ROCKET_COLOR);

            // Trail - follows the rocket's trajectory
            let vel_magnitude = (rocket.vx * rocket.vx + rocket.vy * rocket.vy).sqrt();
            if vel_magnitude > 0.0 {
                let trail_dx = -rocket.vx / vel_magnitude;
                let trail_dy = -rocket.vy / vel_magnitude;

                for i in 1..5 {
                    let tx = (x + trail_dx * i as f32) as i32;
                    let ty = (y + trail_dy * i as f32) as i32;
                    let fade = 1.0 - (i as f32 * 0.2);
                    self.canvas.brighten(tx, ty, fade * 2.0, ROCKET_COLOR);
                }
            }
        }
    }

    fn footer(&self) -> String {
        let (kind, ty) = self.selected();
        let counts = self.sim.counts();
        let sound = if self.bell.is_muted() { "muted" } else { "bell" };
        let text = format!(
            " {} > {} [{}/{}]  {}  sparks {}  |  space launch  p preview  a auto  1-4 kind  tab type  m mute  c clear  q quit",
            kind.name,
            ty.label,
            self.ty + 1,
            kind.types.len(),
            sound,
            counts.sparks,
        );
        text.chars().take(self.cols).collect()
    }
}

impl Scene for Show {
    fn resize(&mut self, cols: usize, rows: usize) {
        let (width, height) = pixel_size(cols, rows);
        let (bounds, scale) = world_bounds(width, height);
        self.cols = width;
        self.canvas = Canvas::new(width, height);
        self.scale = scale;
        self.sim.set_bounds(bounds);
        log::debug!("resized to {cols}x{rows}, world {:.0}x{:.0}", bounds.width, bounds.height);
    }

    fn update(&mut self, dt: f32) {
        self.time += dt;
        // Wrap time to prevent floating point precision issues
        if self.time > 10000.0 {
            self.time -= 10000.0;
        }

        for trigger in self.demo.advance(dt) {
            trigger.fire(&mut self.sim, &mut self.bell);
        }

        if let Some(cycle) = &mut self.cycle {
            if let Some(trigger) = cycle.advance(dt, self.sim.bounds(), self.sim.rng()) {
                trigger.fire(&mut self.sim, &mut self.bell);
            }
        }

        self.sim.step(dt, &mut self.bell);
    }

    fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let bg_color = self.bg_color;
        self.canvas.reset(bg_color);
        self.draw_smoke();
        self.draw_sparks();
        self.draw_rockets();

        let width = self.canvas.width;
        let height = self.canvas.height;
        let mut prev_top_color: Rgb = (255, 255, 255);
        let mut prev_bot_color: Rgb = (255, 255, 255);

        // Render using half-blocks
        for y in (0..height).step_by(2) {
            for x in 0..width {
                let top_idx = y * width + x;
                let bot_idx = if y + 1 < height { (y + 1) * width + x } else { top_idx };

                let top_color = self.canvas.shade(top_idx, bg_color);
                let bot_color = self.canvas.shade(bot_idx, bg_color);

                if top_color != prev_top_color {
                    write!(
                        self.output_buf,
                        "\x1b[48;2;{};{};{}m",
                        top_color.0, top_color.1, top_color.2
                    )?;
                    prev_top_color = top_color;
                }
                if bot_color != prev_bot_color {
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        bot_color.0, bot_color.1, bot_color.2
                    )?;
                    prev_bot_color = bot_color;
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m\r\n");
            prev_top_color = (255, 255, 255);
            prev_bot_color = (255, 255, 255);
        }

        let footer = self.footer();
        write!(
            self.output_buf,
            "\x1b[48;2;{};{};{}m\x1b[38;2;{};{};{}m{}\x1b[K\x1b[0m",
            bg_color.0, bg_color.1, bg_color.2, FOOTER_FG.0, FOOTER_FG.1, FOOTER_FG.2, footer
        )?;

        out.write_all(&self.output_buf)?;
        self.bell.flush(out);
        out.flush()?;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char(' ') => self.launch_selected(),
                KeyCode::Char('p') | KeyCode::Char('P') => self.preview_selected(),
                KeyCode::Char('a') | KeyCode::Char('A') => self.auto_show(),
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    let muted = self.bell.toggle_mute();
                    log::info!("bell {}", if muted { "muted" } else { "on" });
                }
                KeyCode::Char('c') | KeyCode::Char('C') => self.clear(),
                KeyCode::Char(c @ '1'..='9') => self.select_kind(c as usize - '1' as usize),
                KeyCode::Tab | KeyCode::Char('t') | KeyCode::Char('T') => self.next_type(),
                _ => {}
            },
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => self.clear(),
            _ => {}
        }
    }
}
