use anyhow::Result;
use pylib_manager::{config, interpreter, tui};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 加载配置
    let config = config::Config::load_or_default()?;

    // 解释器优先级：命令行参数 > 配置文件 > PYLIB_PYTHON > PATH
    let cli_arg = std::env::args_os().nth(1).map(PathBuf::from);
    let python = interpreter::resolve(cli_arg, &config).unwrap_or_default();
    if python.as_os_str().is_empty() {
        log::warn!("未找到 Python 解释器，请在界面中按 e 手动输入路径");
    }

    tui::run(python, config).await?;

    Ok(())
}
