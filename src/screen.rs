use std::fs;
use std::io;
use std::path::Path;

use rusttype::{point, Font, Scale};

use crate::colors::{Color, Rgba, BACKGROUND, FLAME, GREEN, LABEL, LOGO, TEXT, YELLOW};
use crate::game::{Feedback, GameView};
use crate::OPTION_COUNT;

// frame size consts
pub const WIDTH: u32 = 480;
pub const HEIGHT: u32 = 640;

const HEADER_HEIGHT: usize = 80;
const STATS_TOP: usize = 96;
const STAT_WIDTH: usize = WIDTH as usize / 4;
const MARGIN: usize = 30;

/// A filled rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// Where things go on the screen.
pub struct Layout;

impl Layout {
    pub const TARGET: Rect = Rect {
        x: MARGIN,
        y: 180,
        w: WIDTH as usize - 2 * MARGIN,
        h: 220,
    };

    const SWATCH_TOP: usize = 440;
    const SWATCH_SIZE: usize = 90;
    const SWATCH_GAP: usize = 20;

    /// The swatch for the `index`th option.
    pub fn option(index: usize) -> Rect {
        Rect {
            x: MARGIN + index * (Self::SWATCH_SIZE + Self::SWATCH_GAP),
            y: Self::SWATCH_TOP,
            w: Self::SWATCH_SIZE,
            h: Self::SWATCH_SIZE,
        }
    }

    /// Which option, if any, was clicked at frame pixel `(x, y)`.
    pub fn option_at(x: usize, y: usize) -> Option<usize> {
        (0..OPTION_COUNT).find(|&i| Self::option(i).contains(x, y))
    }
}

pub struct Screen {
    font: Option<Font<'static>>,
}

impl Screen {
    /// A screen that draws only shapes, no text.
    pub fn without_font() -> Self {
        Screen { font: None }
    }

    pub fn with_font(font: Font<'static>) -> Self {
        Screen { font: Some(font) }
    }

    pub fn load_font(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "not a usable font"))?;
        Ok(Screen::with_font(font))
    }

    /// Draw the whole frame for `view`.
    pub fn draw(&self, view: &GameView, frame: &mut [u8]) {
        Screen::clear(frame);
        self.draw_header(view, frame);
        self.draw_stats(view, frame);

        if view.is_over {
            self.draw_text(frame, "Game Over! Thanks for playing.", TEXT, 26.0, (30.0, 250.0));
            let total = format!("Your Total Score: {}", view.score);
            self.draw_text(frame, &total, TEXT, 24.0, (30.0, 300.0));
        } else {
            Screen::fill_rect(frame, Layout::TARGET, view.target.rgba());
            self.draw_text(frame, "What KOLOR is this?", TEXT, 28.0, (100.0, 272.0));
            for (i, color) in view.options.iter().enumerate() {
                Screen::fill_rect(frame, Layout::option(i), color.rgba());
            }
        }
    }

    fn clear(frame: &mut [u8]) {
        let background = BACKGROUND.rgba();
        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&background);
        }
    }

    fn draw_header(&self, view: &GameView, frame: &mut [u8]) {
        // 2x2 logo dots
        for (i, color) in LOGO.iter().enumerate() {
            let cx = 24 + 28 * (i % 2);
            let cy = 26 + 28 * (i / 2);
            Screen::fill_circle(frame, (cx, cy), 12, color.rgba());
        }
        self.draw_text(frame, "KOLOR", TEXT, 40.0, (90.0, 16.0));

        let color = match view.feedback {
            Feedback::Correct => GREEN,
            Feedback::Wrong => FLAME,
            Feedback::Timeout => YELLOW,
            Feedback::None => TEXT,
        };
        self.draw_text(frame, view.feedback.message(), color, 24.0, (300.0, 26.0));

        let rule = Rect {
            x: 0,
            y: HEADER_HEIGHT,
            w: WIDTH as usize,
            h: 2,
        };
        Screen::fill_rect(frame, rule, LABEL.rgba());
    }

    fn draw_stats(&self, view: &GameView, frame: &mut [u8]) {
        let stats = [
            ("TIME", view.time_text()),
            ("ROUND", view.round_text()),
            ("SCORE", view.score.to_string()),
            ("BEST", view.best_score.to_string()),
        ];
        for (i, (label, value)) in stats.iter().enumerate() {
            let x = (i * STAT_WIDTH + 16) as f32;
            self.draw_text(frame, label, LABEL, 16.0, (x, STATS_TOP as f32));
            self.draw_text(frame, value, TEXT, 32.0, (x, STATS_TOP as f32 + 20.0));
        }
    }

    fn draw_text(&self, frame: &mut [u8], text: &str, color: Color, height: f32, offset: (f32, f32)) {
        let font = match &self.font {
            Some(font) => font,
            None => return,
        };
        let scale = Scale {
            x: height,
            y: height,
        };

        let v_metrics = font.v_metrics(scale);
        let offset = point(offset.0, offset.1 + v_metrics.ascent);

        for glyph in font.layout(text, scale, offset) {
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| {
                    // Offset the position by the glyph bounding box
                    let x = x as i32 + bounding_box.min.x;
                    let y = y as i32 + bounding_box.min.y;
                    if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
                        return;
                    }
                    let index = (y as usize * WIDTH as usize + x as usize) * 4;
                    let under = &mut frame[index..index + 4];
                    // blend over whatever is already there
                    let blend = |bg: u8, fg: u8| (bg as f32 * (1.0 - v) + fg as f32 * v) as u8;
                    let blended = [
                        blend(under[0], color.r),
                        blend(under[1], color.g),
                        blend(under[2], color.b),
                        0xff,
                    ];
                    under.copy_from_slice(&blended);
                });
            }
        }
    }

    fn fill_rect(frame: &mut [u8], rect: Rect, color: Rgba) {
        let w = WIDTH as usize;
        let right = (rect.x + rect.w).min(w);
        let bottom = (rect.y + rect.h).min(HEIGHT as usize);
        if rect.x >= right {
            return;
        }
        // one line _across_ the rect
        let line: Vec<u8> = std::iter::repeat(color)
            .take(right - rect.x)
            .flatten()
            .collect();
        for y in rect.y..bottom {
            let start = (y * w + rect.x) * 4;
            frame[start..start + line.len()].copy_from_slice(&line);
        }
    }

    fn fill_circle(frame: &mut [u8], center: (usize, usize), radius: usize, color: Rgba) {
        let (cx, cy) = (center.0 as i64, center.1 as i64);
        let r = radius as i64;
        for y in (cy - r).max(0)..=(cy + r).min(HEIGHT as i64 - 1) {
            for x in (cx - r).max(0)..=(cx + r).min(WIDTH as i64 - 1) {
                if (x - cx).pow(2) + (y - cy).pow(2) <= r * r {
                    let index = (y as usize * WIDTH as usize + x as usize) * 4;
                    frame[index..index + 4].copy_from_slice(&color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> GameView {
        GameView {
            target: Color::new(10, 20, 30),
            options: [
                Color::new(1, 2, 3),
                Color::new(10, 20, 30),
                Color::new(4, 5, 6),
                Color::new(7, 8, 9),
            ],
            time_remaining: 12.34,
            round: 2,
            rounds: 5,
            score: 10,
            best_score: 30,
            feedback: Feedback::Wrong,
            is_over: false,
        }
    }

    fn pixel(frame: &[u8], x: usize, y: usize) -> &[u8] {
        let index = (y * WIDTH as usize + x) * 4;
        &frame[index..index + 4]
    }

    fn center(rect: Rect) -> (usize, usize) {
        (rect.x + rect.w / 2, rect.y + rect.h / 2)
    }

    #[test]
    fn swatches_do_not_overlap_and_fit() {
        for i in 0..OPTION_COUNT {
            let rect = Layout::option(i);
            assert!(rect.x + rect.w <= WIDTH as usize - MARGIN);
            let (x, y) = center(rect);
            assert_eq!(Layout::option_at(x, y), Some(i));
        }
        let gap_x = Layout::option(0).x + Layout::option(0).w + 1;
        assert_eq!(Layout::option_at(gap_x, Layout::option(0).y + 1), None);
        assert_eq!(Layout::option_at(0, 0), None);
    }

    #[test]
    fn draws_target_and_options() {
        let mut frame = vec![0; (WIDTH * HEIGHT * 4) as usize];
        let view = view();
        Screen::without_font().draw(&view, &mut frame);

        let (x, y) = center(Layout::TARGET);
        // the prompt text is skipped without a font, so the middle is pure target
        assert_eq!(pixel(&frame, x, y), &view.target.rgba()[..]);
        for (i, color) in view.options.iter().enumerate() {
            let (x, y) = center(Layout::option(i));
            assert_eq!(pixel(&frame, x, y), &color.rgba()[..]);
        }
        assert_eq!(pixel(&frame, WIDTH as usize - 1, HEIGHT as usize - 1), &BACKGROUND.rgba()[..]);
    }

    #[test]
    fn game_over_hides_the_board() {
        let mut frame = vec![0; (WIDTH * HEIGHT * 4) as usize];
        let mut view = view();
        view.is_over = true;
        Screen::without_font().draw(&view, &mut frame);

        let (x, y) = center(Layout::option(1));
        assert_eq!(pixel(&frame, x, y), &BACKGROUND.rgba()[..]);
        // logo stays up
        assert_eq!(pixel(&frame, 24, 26), &LOGO[0].rgba()[..]);
    }

    #[test]
    fn missing_font_is_an_error() {
        let path = std::env::temp_dir().join("kolor-no-such-font.ttf");
        assert!(Screen::load_font(&path).is_err());
    }
}
