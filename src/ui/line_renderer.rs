use std::io::{self, Write};

use crate::config::DisplayWidth;
use crate::glyph::GlyphTable;
use crate::source::Chunk;

/// アドレス文字列を生成（32ビット固定幅、8桁の大文字HEX）
pub fn format_addr(addr: u64) -> String {
    format!("{:08X}", addr & 0xFFFF_FFFF)
}

/// チャンクを端末出力用のテキストに変換する
///
/// 改行とアドレスの位置はファイル内の絶対位置だけで決まるので、
/// チャンクの切れ目が行の途中にあっても出力は変わらない。
pub struct LineRenderer<'a> {
    /// バイト値→グリフの対応表
    table: &'a GlyphTable,
    /// 1行あたりのバイト数
    width: DisplayWidth,
    /// 行頭にアドレスを付けるか
    address_column: bool,
}

impl<'a> LineRenderer<'a> {
    pub fn new(table: &'a GlyphTable, width: DisplayWidth) -> Self {
        Self {
            table,
            width,
            address_column: false,
        }
    }

    pub fn address_column(mut self, enabled: bool) -> Self {
        self.address_column = enabled;
        self
    }

    /// 1チャンク分のテキストを組み立てる
    pub fn render(&self, chunk: &Chunk<'_>) -> String {
        let width = self.width.get() as u64;
        let mut out = String::with_capacity(chunk.bytes.len() * 4);

        for (i, &byte) in chunk.bytes.iter().enumerate() {
            let position = chunk.offset + i as u64;
            let column = position % width;

            if self.address_column && column == 0 {
                out.push_str(&format_addr(position));
                out.push(' ');
            }

            out.push_str(self.table.get(byte));

            if column == width - 1 {
                out.push('\n');
            }
        }

        out
    }

    /// 1チャンク分をまとめて一度に書き出す
    pub fn write_chunk<W: Write>(&self, chunk: &Chunk<'_>, out: &mut W) -> io::Result<()> {
        out.write_all(self.render(chunk).as_bytes())
    }
}
