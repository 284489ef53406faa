use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use log::debug;

use super::SourceError;

/// 1回の読み込みサイズ（固定）
pub const CHUNK_SIZE: usize = 1 << 16;

/// ファイル長からチャンク数を計算
///
/// `drop_trailing_partial` が真なら末尾の半端なチャンクは数えない。
pub fn chunk_count(len: u64, chunk_size: usize, drop_trailing_partial: bool) -> u64 {
    let size = chunk_size.max(1) as u64;
    if drop_trailing_partial {
        len / size
    } else {
        len.div_ceil(size)
    }
}

/// ファイル内の連続したバイト列と、その絶対オフセット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub offset: u64,
    pub bytes: &'a [u8],
}

/// 先頭から順にチャンクを読み出す
///
/// 読み込みは常に1つずつ。前のチャンクを返すまで次の読み込みは行わない。
pub struct ChunkSource<R> {
    reader: R,
    len: u64,
    chunk_size: usize,
    total_chunks: u64,
    next_index: u64,
    buf: Vec<u8>,
}

impl ChunkSource<File> {
    /// ファイルを開く。先にメタデータで長さを確定させる。
    pub fn open(
        path: impl AsRef<Path>,
        chunk_size: usize,
        drop_trailing_partial: bool,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| SourceError::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            return Err(SourceError::NotAFile(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("opened {} ({} bytes)", path.display(), metadata.len());

        Ok(Self::new(file, metadata.len(), chunk_size, drop_trailing_partial))
    }
}

impl<R: Read> ChunkSource<R> {
    /// 長さが `len` バイトであるはずのリーダーから読む
    pub fn new(reader: R, len: u64, chunk_size: usize, drop_trailing_partial: bool) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            reader,
            len,
            chunk_size,
            total_chunks: chunk_count(len, chunk_size, drop_trailing_partial),
            next_index: 0,
            buf: Vec::new(),
        }
    }

    /// 読み込み開始時点でのファイル長
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_chunks(&self) -> u64 {
        self.total_chunks
    }

    /// 次のチャンクを読む。全チャンクを読み終えたら `None`。
    ///
    /// ファイルが途中で縮んだ場合も読み込みエラーになる。
    pub fn read_next(&mut self) -> Result<Option<Chunk<'_>>, SourceError> {
        if self.next_index >= self.total_chunks {
            return Ok(None);
        }

        let offset = self.next_index * self.chunk_size as u64;
        let length = (self.len - offset).min(self.chunk_size as u64) as usize;

        // 最終チャンクだけ長さが変わる
        if self.buf.len() != length {
            self.buf.resize(length, 0);
        }
        self.reader
            .read_exact(&mut self.buf)
            .map_err(|source| SourceError::Read { offset, source })?;

        self.next_index += 1;
        debug!(
            "chunk {}/{} at {:#X} ({} bytes)",
            self.next_index, self.total_chunks, offset, length
        );

        Ok(Some(Chunk {
            offset,
            bytes: &self.buf,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(source: &mut ChunkSource<Cursor<Vec<u8>>>) -> Vec<(u64, Vec<u8>)> {
        let mut chunks = Vec::new();
        while let Some(chunk) = source.read_next().unwrap() {
            chunks.push((chunk.offset, chunk.bytes.to_vec()));
        }
        chunks
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, 4, false), 0);
        assert_eq!(chunk_count(1, 4, false), 1);
        assert_eq!(chunk_count(8, 4, false), 2);
        assert_eq!(chunk_count(9, 4, false), 3);
        assert_eq!(chunk_count(9, 4, true), 2);
        assert_eq!(chunk_count(3, 4, true), 0);
        assert_eq!(chunk_count(8, 4, true), 2);
    }

    #[test]
    fn test_chunks_are_contiguous() {
        let data: Vec<u8> = (0..10).collect();
        let mut source = ChunkSource::new(Cursor::new(data.clone()), 10, 4, false);
        assert_eq!(source.total_chunks(), 3);

        let chunks = collect(&mut source);
        assert_eq!(
            chunks,
            vec![
                (0, vec![0, 1, 2, 3]),
                (4, vec![4, 5, 6, 7]),
                (8, vec![8, 9]),
            ]
        );
        let joined: Vec<u8> = chunks.into_iter().flat_map(|(_, bytes)| bytes).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn test_exact_multiple_has_no_short_chunk() {
        let data = vec![0xAB; 8];
        let mut source = ChunkSource::new(Cursor::new(data), 8, 4, false);
        let chunks = collect(&mut source);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|(_, bytes)| bytes.len() == 4));
    }

    #[test]
    fn test_empty_emits_nothing() {
        let mut source = ChunkSource::new(Cursor::new(Vec::new()), 0, 4, false);
        assert!(source.is_empty());
        assert!(source.read_next().unwrap().is_none());
    }

    #[test]
    fn test_drop_trailing_partial() {
        let data: Vec<u8> = (0..10).collect();
        let mut source = ChunkSource::new(Cursor::new(data), 10, 4, true);
        let chunks = collect(&mut source);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], (4, vec![4, 5, 6, 7]));
    }

    #[test]
    fn test_short_read_is_error() {
        // メタデータより実データが短い（読み込み中にファイルが縮んだ）
        let mut source = ChunkSource::new(Cursor::new(vec![1u8; 6]), 10, 4, false);
        assert!(source.read_next().unwrap().is_some());
        match source.read_next() {
            Err(SourceError::Read { offset, source }) => {
                assert_eq!(offset, 4);
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected read error, got {:?}", other.map(|c| c.is_some())),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        assert!(matches!(
            ChunkSource::open(&missing, CHUNK_SIZE, false),
            Err(SourceError::Stat { .. })
        ));
    }

    #[test]
    fn test_open_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ChunkSource::open(dir.path(), CHUNK_SIZE, false),
            Err(SourceError::NotAFile(_))
        ));
    }

    #[test]
    fn test_open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"hello").unwrap();

        let mut source = ChunkSource::open(file.path(), 2, false).unwrap();
        assert_eq!(source.len(), 5);
        assert_eq!(source.total_chunks(), 3);

        let mut bytes = Vec::new();
        while let Some(chunk) = source.read_next().unwrap() {
            assert_eq!(chunk.offset, bytes.len() as u64);
            bytes.extend_from_slice(chunk.bytes);
        }
        assert_eq!(bytes, b"hello");
    }
}
