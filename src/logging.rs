use tracing_subscriber::EnvFilter;

/// 初始化日志。`RUST_LOG` 优先，否则默认只输出警告，`--verbose` 时输出调试信息
pub fn init(verbose: bool) {
    let default_level = if verbose { "nyushi_scout=debug,info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
