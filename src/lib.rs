//! PyLib Manager: 管理任意 Python 解释器已安装的库
//!
//! 所有内省都在目标解释器的子进程里完成（[`probe`]），
//! 安装 / 卸载通过 `<interpreter> -m pip` 执行（[`pip`]）。

pub mod config;
pub mod controller;
pub mod interpreter;
pub mod pip;
pub mod probe;
pub mod process;
pub mod pypi;
pub mod tui;
pub mod worker;
