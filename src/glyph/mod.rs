use crossterm::style::{Color, Stylize, force_color_output};

use crate::config::Layout;

/// 背景色の彩度（%）
pub const SATURATION: f64 = 100.0;
/// 背景色の明度（%）
pub const LIGHTNESS: f64 = 50.0;
/// 前景色は固定
pub const FOREGROUND: Color = Color::Black;

/// セル本体の作り方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphStyle {
    /// 0x20..=0x7E は文字で表示する
    pub printable_chars: bool,
    /// 各セルの後ろに色なしの空白を付ける
    pub separator: bool,
    /// 背景色を付ける
    pub color: bool,
}

impl GlyphStyle {
    pub fn from_layout(layout: &Layout, color: bool) -> Self {
        Self {
            printable_chars: layout.printable_chars,
            separator: layout.separator,
            color,
        }
    }
}

/// バイト値の色相（度）。0..=255 で単調増加し、256 で一周する。
pub fn hue_for(byte: u8) -> f64 {
    byte as f64 / 256.0 * 360.0
}

/// HSL（度, %, %）をRGBに変換。各チャンネルは切り捨て。
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h / 360.0;
    let s = s / 100.0;
    let l = l / 100.0;

    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return (v, v, v);
    }

    let t2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let t1 = 2.0 * l - t2;

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let mut t3 = h + 1.0 / 3.0 * -(i as f64 - 1.0);
        if t3 < 0.0 {
            t3 += 1.0;
        }
        if t3 > 1.0 {
            t3 -= 1.0;
        }

        let v = if 6.0 * t3 < 1.0 {
            t1 + (t2 - t1) * 6.0 * t3
        } else if 2.0 * t3 < 1.0 {
            t2
        } else if 3.0 * t3 < 2.0 {
            t1 + (t2 - t1) * (2.0 / 3.0 - t3) * 6.0
        } else {
            t1
        };
        // as u8 は切り捨てかつ 0..=255 に飽和する
        *channel = (v * 255.0) as u8;
    }

    (rgb[0], rgb[1], rgb[2])
}

/// バイト値の背景色
pub fn background_for(byte: u8) -> Color {
    let (r, g, b) = hsl_to_rgb(hue_for(byte), SATURATION, LIGHTNESS);
    Color::Rgb { r, g, b }
}

/// 1バイトを2桁分のセル文字列に変換
pub fn byte_to_cell(byte: u8, printable_chars: bool) -> String {
    if printable_chars && (0x20..=0x7E).contains(&byte) {
        format!("{} ", byte as char)
    } else {
        format!("{:02X}", byte)
    }
}

/// バイト値→グリフの対応表。起動時に一度だけ作り、以後は読むだけ。
#[derive(Debug, Clone)]
pub struct GlyphTable {
    glyphs: Vec<String>,
}

impl GlyphTable {
    /// 色を付けるかは呼び出し側で決定済み（NO_COLOR もそこで解決する）。
    /// crossterm 側の NO_COLOR 判定で色が消えないよう、色付きなら強制する。
    pub fn build(style: GlyphStyle) -> Self {
        if style.color {
            force_color_output(true);
        }

        let glyphs = (0..=u8::MAX)
            .map(|byte| {
                let cell = byte_to_cell(byte, style.printable_chars);
                let mut glyph = if style.color {
                    cell.with(FOREGROUND).on(background_for(byte)).to_string()
                } else {
                    cell
                };
                if style.separator {
                    glyph.push(' ');
                }
                glyph
            })
            .collect();

        Self { glyphs }
    }

    pub fn get(&self, byte: u8) -> &str {
        &self.glyphs[byte as usize]
    }
}
