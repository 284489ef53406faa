use std::num::NonZeroUsize;

use log::{info, warn};

/// アドレス列（"XXXXXXXX "）が占める桁数
pub const ADDRESS_RESERVE: usize = 9;

/// 端末幅が取得できないときの桁数
pub const FALLBACK_COLUMNS: u16 = 80;

/// 色付けモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// 標準出力が端末で、NO_COLOR が無いときだけ色を付ける
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// 実際に色を付けるかどうかを決定
    ///
    /// `no_color` は環境変数 NO_COLOR が空でない値で設定されているか。
    /// `Always` はそれより優先する。
    pub fn enabled(self, stdout_is_tty: bool, no_color: bool) -> bool {
        match self {
            Self::Auto => stdout_is_tty && !no_color,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// 表示レイアウト
///
/// 旧来の三つの派生版（アドレス付き、純HEX、区切り付き）を
/// フラグの組み合わせで表現する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// 行頭に8桁のアドレスを付ける
    pub address_column: bool,
    /// 印字可能なASCIIは文字そのものを表示する
    pub printable_chars: bool,
    /// 各セルの後ろに色なしの区切りを出す
    pub separator: bool,
    /// 末尾の半端なチャンクを捨てる（floor で数える）
    pub drop_trailing_partial: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            address_column: true,
            printable_chars: true,
            separator: false,
            drop_trailing_partial: false,
        }
    }
}

impl Layout {
    /// 1バイトが占める桁数
    pub fn cells_per_byte(&self) -> usize {
        if self.separator { 3 } else { 2 }
    }

    /// アドレス列のために確保する桁数
    pub fn address_reserve(&self) -> usize {
        if self.address_column { ADDRESS_RESERVE } else { 0 }
    }
}

/// 1行あたりのバイト数。起動時に一度だけ決まり、常に1以上。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWidth(NonZeroUsize);

impl DisplayWidth {
    pub fn new(width: usize) -> Option<Self> {
        NonZeroUsize::new(width).map(Self)
    }

    /// 端末の桁数から表示幅を計算する。
    /// 狭すぎて0になる場合は1に切り上げる。
    pub fn from_columns(columns: u16, layout: &Layout) -> Self {
        let usable = (columns as usize).saturating_sub(layout.address_reserve());
        let width = usable / layout.cells_per_byte();
        match Self::new(width) {
            Some(width) => width,
            None => {
                warn!(
                    "terminal is {} columns wide, too narrow for {:?}; clamping width to 1",
                    columns, layout
                );
                Self(NonZeroUsize::MIN)
            }
        }
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// 1回の実行で固定される設定一式
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub layout: Layout,
    pub width: DisplayWidth,
    pub color: bool,
}

impl Options {
    /// 端末の桁数（取得できなければ `None`）から設定を組み立てる
    pub fn resolve(layout: Layout, columns: Option<u16>, color: bool) -> Self {
        let columns = columns.unwrap_or_else(|| {
            info!(
                "terminal width unavailable, assuming {} columns",
                FALLBACK_COLUMNS
            );
            FALLBACK_COLUMNS
        });
        let width = DisplayWidth::from_columns(columns, &layout);
        info!(
            "columns={} width={} color={} layout={:?}",
            columns,
            width.get(),
            color,
            layout
        );
        Self {
            layout,
            width,
            color,
        }
    }
}
