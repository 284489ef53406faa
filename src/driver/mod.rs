use std::io::{self, Read, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::config::Options;
use crate::glyph::{GlyphStyle, GlyphTable};
use crate::source::{CHUNK_SIZE, ChunkSource, SourceError};
use crate::ui::LineRenderer;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

impl RunError {
    /// 出力先が先に閉じられた（`| head` など）
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Write(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

/// ファイルを先頭から最後まで描画する
pub fn run<W: Write>(path: &Path, options: &Options, out: &mut W) -> Result<(), RunError> {
    let mut source = ChunkSource::open(path, CHUNK_SIZE, options.layout.drop_trailing_partial)?;
    render_source(&mut source, options, out)
}

/// チャンクを1つ読んでは描画する、を最後まで繰り返す
///
/// 読み込みと描画は交互に行い、先読みはしない。最後に改行を1つ書く。
pub fn render_source<R: Read, W: Write>(
    source: &mut ChunkSource<R>,
    options: &Options,
    out: &mut W,
) -> Result<(), RunError> {
    let table = GlyphTable::build(GlyphStyle::from_layout(&options.layout, options.color));
    let renderer =
        LineRenderer::new(&table, options.width).address_column(options.layout.address_column);

    debug!(
        "rendering {} bytes in {} chunks",
        source.len(),
        source.total_chunks()
    );

    while let Some(chunk) = source.read_next()? {
        renderer.write_chunk(&chunk, out)?;
    }

    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
