use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use chx::config::{ColorMode, Layout, Options};
use chx::driver;

/// ファイルの中身を色付きのHEXグリッドで表示する
#[derive(Parser, Debug)]
#[command(name = "chx", version, about)]
struct Cli {
    /// 表示するファイル
    file: PathBuf,

    /// 行頭のアドレスを表示しない
    #[arg(long)]
    no_address: bool,

    /// 印字可能文字も常にHEXで表示する
    #[arg(long)]
    hex: bool,

    /// セルごとに色なしの区切りを入れる（1バイト3桁）
    #[arg(long)]
    separator: bool,

    /// 末尾の半端なチャンクを表示しない（データが欠ける）
    #[arg(long)]
    drop_partial: bool,

    /// 端末の桁数を指定する（既定は自動検出）
    #[arg(long, value_name = "N")]
    columns: Option<u16>,

    /// 色付け
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let layout = Layout {
        address_column: !cli.no_address,
        printable_chars: !cli.hex,
        separator: cli.separator,
        drop_trailing_partial: cli.drop_partial,
    };

    // 端末幅は起動時に一度だけ読む
    let columns = cli.columns.or_else(|| match crossterm::terminal::size() {
        Ok((cols, _)) => Some(cols),
        Err(e) => {
            debug!("terminal size unavailable: {}", e);
            None
        }
    });

    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let stdout = io::stdout();
    let color = cli.color.enabled(stdout.is_terminal(), no_color);
    let options = Options::resolve(layout, columns, color);

    let mut out = stdout.lock();
    match driver::run(&cli.file, &options, &mut out) {
        // 読み手が先に終了しただけなので成功扱い
        Err(e) if e.is_broken_pipe() => {
            debug!("output closed early: {}", e);
            Ok(())
        }
        result => result.with_context(|| format!("failed to render {}", cli.file.display())),
    }
}
