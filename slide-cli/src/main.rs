//! # slide-cli
//!
//! 无界面宿主：加载幻灯片文档，在虚拟时钟上驱动时间轴并打印事件流。
//!
//! ## 用法
//!
//! ```bash
//! slide-cli play deck.json
//! slide-cli play deck.json --device mobile --width 375 --height 667 --json
//! slide-cli steps deck.json
//! slide-cli check deck.json
//! slide-cli init-config -c slide-cli.json
//! ```

mod config;
mod host;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use config::AppConfig;
use host::{Host, LoggingMediaPlayer, describe};
use slide_runtime::{DeviceClass, DiagnosticLevel, SlideDeck, TimelineScheduler, analyze_deck};

#[derive(Parser)]
#[command(name = "slide-cli")]
#[command(about = "幻灯片时间轴引擎 - 无界面宿主")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, default_value = "slide-cli.json", global = true)]
    config: PathBuf,

    /// 日志详细程度（-v: debug, -vv: trace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 播放时间轴并打印事件
    Play {
        /// 文档路径
        deck: PathBuf,

        /// 运行时长（毫秒），默认取配置文件
        #[arg(long)]
        run_ms: Option<u64>,

        /// 虚拟时钟步长（毫秒）
        #[arg(long)]
        tick_ms: Option<u64>,

        /// 设备类别（desktop / tablet / mobile）
        #[arg(long)]
        device: Option<String>,

        /// 容器宽度（像素）
        #[arg(long)]
        width: Option<f64>,

        /// 容器高度（像素）
        #[arg(long)]
        height: Option<f64>,

        /// 以 JSON 行输出事件
        #[arg(long)]
        json: bool,
    },

    /// 列出时间轴步骤
    Steps {
        /// 文档路径
        deck: PathBuf,
    },

    /// 静态检查文档
    Check {
        /// 文档路径
        deck: PathBuf,

        /// 显示 INFO 级别
        #[arg(long)]
        all: bool,
    },

    /// 写出当前生效的配置文件
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load(&cli.config);

    match cli.command {
        Commands::Play {
            deck,
            run_ms,
            tick_ms,
            device,
            width,
            height,
            json,
        } => {
            if let Some(run_ms) = run_ms {
                config.run_ms = run_ms;
            }
            if let Some(tick_ms) = tick_ms {
                config.tick_ms = tick_ms;
            }
            if let Some(device) = device {
                config.device = DeviceClass::from_str(&device)
                    .map_err(|_| anyhow::anyhow!("未知设备类别: {}", device))?;
            }
            if let Some(width) = width {
                config.container_width = width;
            }
            if let Some(height) = height {
                config.container_height = height;
            }
            config.validate()?;
            play(&deck, &config, json)
        }
        Commands::Steps { deck } => steps(&deck),
        Commands::Check { deck, all } => check(&deck, all),
        Commands::InitConfig => {
            config.save(&cli.config)?;
            println!("配置已写入 {:?}", cli.config);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_deck(path: &Path) -> Result<SlideDeck> {
    let text = fs::read_to_string(path).with_context(|| format!("读取文档失败: {:?}", path))?;
    let deck = SlideDeck::from_json(&text).with_context(|| format!("解析文档失败: {:?}", path))?;
    tracing::debug!(deck = %deck.id, slides = deck.len(), "文档已加载");
    Ok(deck)
}

fn play(path: &Path, config: &AppConfig, json: bool) -> Result<()> {
    let deck = load_deck(path)?;
    let mut scheduler =
        TimelineScheduler::with_media(deck, config.engine.clone(), Box::new(LoggingMediaPlayer));
    scheduler.set_viewport(config.device, Some(config.bounds()));

    let mut write_error = None;
    let summary = Host::new(scheduler, |at, event| {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(e) => write_error = Some(e),
            }
        } else {
            println!("{:>8}ms  {}", at, describe(event));
        }
    })
    .run(config.run_ms, config.tick_ms, true);

    if let Some(e) = write_error {
        return Err(e).context("事件序列化失败");
    }

    tracing::info!(
        elapsed_ms = summary.elapsed_ms,
        events = summary.events,
        warnings = summary.warnings,
        finished = summary.finished,
        "播放结束"
    );
    Ok(())
}

fn steps(path: &Path) -> Result<()> {
    let deck = load_deck(path)?;
    let scheduler = TimelineScheduler::new(deck, Default::default());
    for step in scheduler.steps() {
        println!("{}", step);
    }
    println!("共 {} 个步骤", scheduler.steps().len());
    Ok(())
}

fn check(path: &Path, all: bool) -> Result<()> {
    let deck = load_deck(path)?;
    let result = analyze_deck(&deck);

    let min_level = if all {
        DiagnosticLevel::Info
    } else {
        DiagnosticLevel::Warn
    };
    for diagnostic in result.filter_by_level(min_level) {
        println!("{}", diagnostic);
    }
    println!(
        "错误: {}，警告: {}，提示: {}",
        result.error_count(),
        result.warn_count(),
        result.info_count()
    );

    if result.has_errors() {
        bail!("文档检查失败: {} 个错误", result.error_count());
    }
    Ok(())
}
