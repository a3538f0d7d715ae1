//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: fmt / clippy / test 门禁
//! - `cov-runtime`: slide-runtime 覆盖率
//! - `deck-check`: 批量检查幻灯片文档（解析、重复 id、悬空引用）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use slide_runtime::{DiagnosticLevel, DiagnosticResult, SlideDeck, analyze_deck, build_steps};
use walkdir::WalkDir;

/// 质量门禁：依次执行，任一步失败即停止
const GATES: [&[&str]; 3] = [
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

/// 执行一条 cargo 命令，非零退出视为失败
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let line = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {line}");
    let status = Command::new("cargo").args(args).status()?;
    anyhow::ensure!(status.success(), "{line} 失败: {status}");
    Ok(())
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            for gate in GATES {
                cargo(gate)?;
            }
        }
        "cov-runtime" => {
            if cargo(&["llvm-cov", "--version"]).is_err() {
                anyhow::bail!(
                    "需要 cargo-llvm-cov：cargo install cargo-llvm-cov && rustup component add llvm-tools-preview"
                );
            }
            cargo(&["llvm-cov", "-p", "slide-runtime", "--html"])?;
            eprintln!("\n覆盖率报告: target/llvm-cov/html/index.html");
        }
        "deck-check" => {
            let path = args.next();
            deck_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => print_help(),
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 幻灯片引擎开发工具

USAGE:
  cargo xtask <command> [args]

COMMANDS:
  check-all            fmt --check、clippy、test 三道门禁
  cov-runtime          slide-runtime 覆盖率（HTML）
  deck-check [path]    检查文档；path 可以是文件或目录，默认 decks/

deck-check 报告：
  ERROR  JSON 无法解析、重复的幻灯片 / 元素 / 交互 id
  WARN   未知效果类型、悬空的 target_id / target_slide_id
  INFO   隐藏元素上的时间轴交互（只计数；明细用 slide-cli check --all）
"#
    );
}

//=============================================================================
// deck-check 命令实现
//=============================================================================

const DEFAULT_DECKS_DIR: &str = "decks";

/// 文档检查结果
#[derive(Default)]
struct DeckCheckResult {
    decks_checked: usize,
    parse_errors: usize,
    steps_total: usize,
    diagnostics: DiagnosticResult,
}

fn deck_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_deck_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_DECKS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认文档目录不存在: {}\n请在 workspace 根目录运行，或指定文档路径",
                    dir.display()
                );
            }
            collect_deck_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到文档文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个文档...\n", files.len());

    let mut result = DeckCheckResult::default();
    for file in &files {
        check_deck_file(file, &mut result);
    }

    print_check_result(&result);

    if result.parse_errors > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("文档检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有 `.json` 文档，按路径排序
fn collect_deck_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn check_deck_file(file: &Path, result: &mut DeckCheckResult) {
    let name = file.display().to_string();
    result.decks_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", name, e);
            result.parse_errors += 1;
            return;
        }
    };

    let deck = match SlideDeck::from_json(&content) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", name, e);
            result.parse_errors += 1;
            return;
        }
    };

    result.steps_total += build_steps(&deck).len();
    result.diagnostics.merge(analyze_deck(&deck));
}

fn print_check_result(result: &DeckCheckResult) {
    for diag in result.diagnostics.filter_by_level(DiagnosticLevel::Warn) {
        eprintln!("{}", diag);
    }

    let errors = result.parse_errors + result.diagnostics.error_count();
    eprintln!(
        "\n{} 个文档 / {} 个步骤: {} 个错误, {} 个警告, {} 条提示",
        result.decks_checked,
        result.steps_total,
        errors,
        result.diagnostics.warn_count(),
        result.diagnostics.info_count()
    );
}
